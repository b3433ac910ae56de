//! Firmware detection
//!
//! Decides whether the machine booted through EFI or legacy BIOS. The
//! partition configuration only needs the answer, so detection sits behind the
//! [`FirmwareDetector`] trait and can be replaced by a fixed value (tests, or a
//! command-line override when preparing an image for another machine).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Detected firmware mode of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirmwareMode {
    /// UEFI firmware, needs an EFI system partition
    Efi,
    /// Legacy BIOS firmware
    Bios,
}

impl FirmwareMode {
    pub fn is_efi(self) -> bool {
        matches!(self, Self::Efi)
    }

    /// Value published as `firmwareType` for the bootloader stage
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Efi => "efi",
            Self::Bios => "bios",
        }
    }
}

impl fmt::Display for FirmwareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FirmwareMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "efi" | "uefi" => Ok(Self::Efi),
            "bios" => Ok(Self::Bios),
            _ => Err(format!("Invalid firmware type '{}'. Valid: efi, bios", s)),
        }
    }
}

/// Source of the firmware mode.
pub trait FirmwareDetector {
    fn firmware_mode(&self) -> FirmwareMode;
}

/// Detects EFI by the presence of the kernel's EFI sysfs directory.
///
/// The kernel exposes `/sys/firmware/efi` only when booted in UEFI mode.
#[derive(Debug, Clone)]
pub struct SysfsFirmware {
    efi_dir: PathBuf,
}

impl SysfsFirmware {
    pub fn new() -> Self {
        Self::with_efi_dir("/sys/firmware/efi")
    }

    /// Probe a different directory (chroots, tests)
    pub fn with_efi_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            efi_dir: path.into(),
        }
    }

    pub fn efi_dir(&self) -> &Path {
        &self.efi_dir
    }
}

impl Default for SysfsFirmware {
    fn default() -> Self {
        Self::new()
    }
}

impl FirmwareDetector for SysfsFirmware {
    fn firmware_mode(&self) -> FirmwareMode {
        if self.efi_dir.exists() {
            tracing::debug!("EFI firmware detected ({:?} exists)", self.efi_dir);
            FirmwareMode::Efi
        } else {
            tracing::debug!("BIOS firmware detected ({:?} not found)", self.efi_dir);
            FirmwareMode::Bios
        }
    }
}

/// Always reports the same mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedFirmware(pub FirmwareMode);

impl FirmwareDetector for FixedFirmware {
    fn firmware_mode(&self) -> FirmwareMode {
        self.0
    }
}
