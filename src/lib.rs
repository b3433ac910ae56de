//! partcfg library
//!
//! Resolves the partitioning module's configuration (install strategy, swap
//! setup, erase-mode filesystem) into one consistent state and publishes the
//! derived values to global storage for later install stages.

pub mod cli;
pub mod config;
pub mod config_file;
pub mod error;
pub mod events;
pub mod filesystem;
pub mod global_storage;
pub mod hardware;
pub mod names;
pub mod publish;
pub mod swap;
pub mod types;

// Re-export main types for convenience
pub use config::Config;
pub use config_file::ConfigurationMap;
pub use error::{ConfigWarning, PartcfgError};
pub use events::{ConfigEvent, ObserverId};
pub use filesystem::{FilesystemNames, KnownFilesystems};
pub use global_storage::{GlobalStorage, SharedStorage};
pub use hardware::{FirmwareDetector, FirmwareMode, FixedFirmware, SysfsFirmware};
pub use names::{NamedEnumTable, INSTALL_CHOICE_NAMES, SWAP_CHOICE_NAMES};
pub use publish::PartitionChoices;
pub use swap::{pick_one, resolve_swap_choices, SwapResolution};
pub use types::{InstallChoice, InvalidChoiceError, SwapChoice, SwapChoiceSet};
