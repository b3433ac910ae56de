//! Global-storage publishing
//!
//! Values derived from the partition configuration that later stages read.
//!
//! | Key | Value |
//! |-----|-------|
//! | `partitionChoices` | `{install, swap}` canonical names |
//! | `firmwareType` | `"efi"` or `"bios"` |
//! | `efiSystemPartition` | ESP mount point, default `/boot/efi` |
//! | `efiSystemPartitionSize` | only if configured |
//! | `efiSystemPartitionName` | only if configured |
//! | `requiredPartitionTableType` | list, verbatim from configuration |
//! | `requiredStorageGiB` | only if configured and nobody else set it |

use serde::Serialize;

use crate::config_file::ConfigurationMap;
use crate::global_storage::{GlobalStorage, SharedStorage};
use crate::hardware::FirmwareMode;
use crate::types::{InstallChoice, SwapChoice};

pub const PARTITION_CHOICES: &str = "partitionChoices";
pub const FIRMWARE_TYPE: &str = "firmwareType";
pub const EFI_SYSTEM_PARTITION: &str = "efiSystemPartition";
pub const EFI_SYSTEM_PARTITION_SIZE: &str = "efiSystemPartitionSize";
pub const EFI_SYSTEM_PARTITION_NAME: &str = "efiSystemPartitionName";
pub const REQUIRED_PARTITION_TABLE_TYPE: &str = "requiredPartitionTableType";
pub const REQUIRED_STORAGE_GIB: &str = "requiredStorageGiB";

pub const DEFAULT_EFI_MOUNT_POINT: &str = "/boot/efi";

/// Record stored under `partitionChoices`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartitionChoices {
    pub install: InstallChoice,
    pub swap: SwapChoice,
}

/// Publish the current choices. Skipped when there is no storage.
pub fn publish_choices(storage: Option<&SharedStorage>, install: InstallChoice, swap: SwapChoice) {
    if let Some(gs) = storage {
        tracing::debug!("Publishing partition choices install={} swap={}", install, swap);
        gs.borrow_mut()
            .insert_serialized(PARTITION_CHOICES, &PartitionChoices { install, swap });
    }
}

/// Publish firmware type and EFI system partition settings.
pub fn publish_efi_configuration(gs: &mut GlobalStorage, map: &ConfigurationMap, firmware: FirmwareMode) {
    gs.insert(FIRMWARE_TYPE, firmware.as_str());
    gs.insert(
        EFI_SYSTEM_PARTITION,
        map.get_string(EFI_SYSTEM_PARTITION, DEFAULT_EFI_MOUNT_POINT),
    );

    for key in [EFI_SYSTEM_PARTITION_SIZE, EFI_SYSTEM_PARTITION_NAME] {
        if map.contains(key) {
            gs.insert(key, map.get_string(key, ""));
        }
    }
}

/// Publish the storage threshold unless another module already did.
///
/// Returns true if a value was written.
pub fn publish_required_storage(gs: &mut GlobalStorage, required_storage_gib: Option<f64>) -> bool {
    match required_storage_gib {
        Some(gib) if !gs.contains(REQUIRED_STORAGE_GIB) => {
            gs.insert(REQUIRED_STORAGE_GIB, gib);
            true
        }
        _ => false,
    }
}
