//! Partition configuration state
//!
//! [`Config`] owns the user's current partitioning choices. It is filled once
//! from the module configuration, then updated by the UI. Every change is
//! validated, broadcast to observers, and published to global storage.
//!
//! # Loading
//!
//! ```text
//! ConfigurationMap ──► resolve_swap_choices ──► Config (initial choices)
//!                                                  │
//!                                                  ▼
//!                                            GlobalStorage
//! ```
//!
//! Nothing in here fails: problems become [`ConfigWarning`]s and a safe
//! default is used.

use std::fmt;

use crate::config_file::ConfigurationMap;
use crate::error::{record, ConfigWarning};
use crate::events::{ConfigEvent, ObserverId, Observers};
use crate::filesystem::{FilesystemNames, KnownFilesystems};
use crate::global_storage::SharedStorage;
use crate::hardware::{FirmwareDetector, SysfsFirmware};
use crate::names::{INSTALL_CHOICE_NAMES, SWAP_CHOICE_NAMES};
use crate::publish::{self, PartitionChoices};
use crate::swap::{pick_one, resolve_swap_choices};
use crate::types::{InstallChoice, SwapChoice, SwapChoiceSet};

const REQUIRED_STORAGE: &str = "requiredStorage";
const INITIAL_PARTITIONING_CHOICE: &str = "initialPartitioningChoice";
const INITIAL_SWAP_CHOICE: &str = "initialSwapChoice";
const ALLOW_MANUAL_PARTITIONING: &str = "allowManualPartitioning";
const AVAILABLE_FILE_SYSTEM_TYPES: &str = "availableFileSystemTypes";

/// Partitioning choices of the current installation.
pub struct Config {
    install_choice: InstallChoice,
    swap_choice: SwapChoice,
    swap_choices: SwapChoiceSet,

    initial_install_choice: InstallChoice,
    initial_swap_choice: SwapChoice,

    /// `None` when not configured here
    required_storage_gib: Option<f64>,
    allow_manual_partitioning: bool,

    erase_fs_type_choice: String,
    erase_fs_types: Vec<String>,
    required_partition_table_types: Vec<String>,

    storage: Option<SharedStorage>,
    firmware: Box<dyn FirmwareDetector>,
    filesystems: Box<dyn FilesystemNames>,
    observers: Observers,
    warnings: Vec<ConfigWarning>,
}

impl Config {
    /// Empty configuration publishing into `storage`.
    ///
    /// Without storage every publish is skipped; that is a supported setup
    /// (e.g. before the job queue exists), not an error.
    pub fn new(storage: Option<SharedStorage>) -> Self {
        Self {
            install_choice: InstallChoice::NoChoice,
            swap_choice: SwapChoice::NoSwap,
            swap_choices: SwapChoiceSet::new(),
            initial_install_choice: InstallChoice::NoChoice,
            initial_swap_choice: SwapChoice::NoSwap,
            required_storage_gib: None,
            allow_manual_partitioning: true,
            erase_fs_type_choice: String::new(),
            erase_fs_types: Vec::new(),
            required_partition_table_types: Vec::new(),
            storage,
            firmware: Box::new(SysfsFirmware::new()),
            filesystems: Box::new(KnownFilesystems),
            observers: Observers::new(),
            warnings: Vec::new(),
        }
    }

    /// Replace the firmware detector (defaults to sysfs)
    pub fn with_firmware_detector(mut self, detector: impl FirmwareDetector + 'static) -> Self {
        self.firmware = Box::new(detector);
        self
    }

    /// Replace the filesystem-name canonicalizer
    pub fn with_filesystem_names(mut self, names: impl FilesystemNames + 'static) -> Self {
        self.filesystems = Box::new(names);
        self
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn subscribe(&mut self, callback: impl FnMut(&ConfigEvent) + 'static) -> ObserverId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn install_choice(&self) -> InstallChoice {
        self.install_choice
    }

    pub fn swap_choice(&self) -> SwapChoice {
        self.swap_choice
    }

    /// Swap choices offered to the user
    pub fn swap_choices(&self) -> &SwapChoiceSet {
        &self.swap_choices
    }

    pub fn initial_install_choice(&self) -> InstallChoice {
        self.initial_install_choice
    }

    pub fn initial_swap_choice(&self) -> SwapChoice {
        self.initial_swap_choice
    }

    pub fn partition_choices(&self) -> PartitionChoices {
        PartitionChoices {
            install: self.install_choice,
            swap: self.swap_choice,
        }
    }

    pub fn required_storage_gib(&self) -> Option<f64> {
        self.required_storage_gib
    }

    pub fn allow_manual_partitioning(&self) -> bool {
        self.allow_manual_partitioning
    }

    /// Canonical name of the filesystem used in erase mode; may be empty
    pub fn erase_fs_type_choice(&self) -> &str {
        &self.erase_fs_type_choice
    }

    pub fn erase_fs_types(&self) -> &[String] {
        &self.erase_fs_types
    }

    pub fn required_partition_table_types(&self) -> &[String] {
        &self.required_partition_table_types
    }

    /// True if a disk with this partition table may be used.
    ///
    /// Any table type is fine when none is required.
    pub fn accepts_partition_table_type(&self, table_type: &str) -> bool {
        self.required_partition_table_types.is_empty()
            || self
                .required_partition_table_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(table_type))
    }

    /// Warnings recorded so far, oldest first
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<ConfigWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn storage(&self) -> Option<&SharedStorage> {
        self.storage.as_ref()
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    pub fn set_install_choice(&mut self, choice: InstallChoice) {
        if choice == self.install_choice {
            return;
        }
        tracing::debug!("Install choice {} -> {}", self.install_choice, choice);
        self.install_choice = choice;
        self.observers.notify(&ConfigEvent::InstallChoiceChanged(choice));
        publish::publish_choices(self.storage.as_ref(), self.install_choice, self.swap_choice);
    }

    /// Set the install choice from its integer encoding.
    ///
    /// Values outside the enum become [`InstallChoice::NoChoice`].
    pub fn set_install_choice_raw(&mut self, raw: i32) {
        let choice = InstallChoice::try_from(raw).unwrap_or_else(|source| {
            record(&mut self.warnings, ConfigWarning::OutOfRange { source });
            InstallChoice::NoChoice
        });
        self.set_install_choice(choice);
    }

    pub fn set_swap_choice(&mut self, choice: SwapChoice) {
        if choice == self.swap_choice {
            return;
        }
        tracing::debug!("Swap choice {} -> {}", self.swap_choice, choice);
        self.swap_choice = choice;
        self.observers.notify(&ConfigEvent::SwapChoiceChanged(choice));
        publish::publish_choices(self.storage.as_ref(), self.install_choice, self.swap_choice);
    }

    /// Set the swap choice from its integer encoding.
    ///
    /// Values outside the enum become [`SwapChoice::NoSwap`].
    pub fn set_swap_choice_raw(&mut self, raw: i32) {
        let choice = SwapChoice::try_from(raw).unwrap_or_else(|source| {
            record(&mut self.warnings, ConfigWarning::OutOfRange { source });
            SwapChoice::NoSwap
        });
        self.set_swap_choice(choice);
    }

    /// Choose the erase-mode filesystem.
    ///
    /// The name is canonicalized first. A name that cannot be resolved is
    /// still accepted, as the empty string.
    pub fn set_erase_fs_type_choice(&mut self, name: &str) {
        let canonical = match self.filesystems.canonical_name(name) {
            Some(canonical) => canonical,
            None => {
                record(
                    &mut self.warnings,
                    ConfigWarning::UnknownFilesystem {
                        name: name.to_string(),
                    },
                );
                String::new()
            }
        };

        if canonical != self.erase_fs_type_choice {
            tracing::debug!("Erase filesystem {:?} -> {:?}", self.erase_fs_type_choice, canonical);
            self.erase_fs_type_choice = canonical;
            self.observers
                .notify(&ConfigEvent::EraseFsTypeChanged(self.erase_fs_type_choice.clone()));
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Load the module configuration. Called once at startup.
    ///
    /// Each step stands on its own; a bad value in one never stops the
    /// others.
    pub fn set_configuration_map(&mut self, map: &ConfigurationMap) {
        // Overlaps with the welcome module's requirements check
        let required = map.get_f64(REQUIRED_STORAGE, -1.0);
        self.required_storage_gib = (required.is_finite() && required >= 0.0).then_some(required);

        let resolution = resolve_swap_choices(map);
        self.warnings.extend(resolution.warnings);
        self.swap_choices = resolution.choices;

        self.initial_install_choice = self.lookup_install_choice(map);
        self.set_install_choice(self.initial_install_choice);

        self.initial_swap_choice = self.lookup_initial_swap_choice(map);
        self.set_swap_choice(self.initial_swap_choice);

        self.allow_manual_partitioning = map.get_bool(ALLOW_MANUAL_PARTITIONING, true);

        if map.contains(AVAILABLE_FILE_SYSTEM_TYPES) {
            self.erase_fs_types = map.get_string_list(AVAILABLE_FILE_SYSTEM_TYPES);
            if let Some(first) = self.erase_fs_types.first() {
                self.erase_fs_type_choice = first.clone();
                self.observers
                    .notify(&ConfigEvent::EraseFsTypeChanged(self.erase_fs_type_choice.clone()));
            }
        }

        self.required_partition_table_types =
            map.get_string_list(publish::REQUIRED_PARTITION_TABLE_TYPE);

        if let Some(storage) = &self.storage {
            let mut gs = storage.borrow_mut();
            gs.insert(
                publish::REQUIRED_PARTITION_TABLE_TYPE,
                self.required_partition_table_types.clone(),
            );
            publish::publish_efi_configuration(&mut gs, map, self.firmware.firmware_mode());
        } else {
            tracing::debug!("No global storage, skipping firmware and partition-table settings");
        }

        tracing::info!(
            "Partition configuration loaded: install={} swap={} choices={}",
            self.install_choice,
            self.swap_choice,
            self.swap_choices
        );
    }

    /// Publish settings that other modules may also provide.
    ///
    /// Only fills gaps: a `requiredStorageGiB` already in storage (e.g. from
    /// the welcome module) is left alone. Safe to call repeatedly.
    pub fn fill_gs_secondary_configuration(&self) {
        if let Some(storage) = &self.storage {
            let written =
                publish::publish_required_storage(&mut storage.borrow_mut(), self.required_storage_gib);
            if written {
                tracing::debug!("Published required storage {:?} GiB", self.required_storage_gib);
            }
        }
    }

    fn lookup_install_choice(&mut self, map: &ConfigurationMap) -> InstallChoice {
        if !map.contains(INITIAL_PARTITIONING_CHOICE) {
            return INSTALL_CHOICE_NAMES.default_value();
        }
        let name = map.get_string(INITIAL_PARTITIONING_CHOICE, "");
        let (choice, found) = INSTALL_CHOICE_NAMES.find_or_default(&name);
        if !found {
            record(
                &mut self.warnings,
                ConfigWarning::UnrecognizedName {
                    key: INITIAL_PARTITIONING_CHOICE,
                    name,
                },
            );
        }
        choice
    }

    /// Initial swap choice, forced into the offered set
    fn lookup_initial_swap_choice(&mut self, map: &ConfigurationMap) -> SwapChoice {
        let configured = map.contains(INITIAL_SWAP_CHOICE);
        let name = map.get_string(INITIAL_SWAP_CHOICE, "");
        let (requested, found) = SWAP_CHOICE_NAMES.find_or_default(&name);
        if configured && !found {
            record(
                &mut self.warnings,
                ConfigWarning::UnrecognizedName {
                    key: INITIAL_SWAP_CHOICE,
                    name,
                },
            );
        }

        if self.swap_choices.contains(requested) {
            return requested;
        }

        let substituted = pick_one(&self.swap_choices);
        record(
            &mut self.warnings,
            ConfigWarning::InitialSwapNotOffered {
                requested,
                substituted,
            },
        );
        substituted
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("install_choice", &self.install_choice)
            .field("swap_choice", &self.swap_choice)
            .field("swap_choices", &self.swap_choices)
            .field("initial_install_choice", &self.initial_install_choice)
            .field("initial_swap_choice", &self.initial_swap_choice)
            .field("required_storage_gib", &self.required_storage_gib)
            .field("allow_manual_partitioning", &self.allow_manual_partitioning)
            .field("erase_fs_type_choice", &self.erase_fs_type_choice)
            .field("erase_fs_types", &self.erase_fs_types)
            .field("required_partition_table_types", &self.required_partition_table_types)
            .field("has_storage", &self.storage.is_some())
            .field("observers", &self.observers)
            .field("warnings", &self.warnings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::global_storage::GlobalStorage;
    use crate::hardware::{FirmwareMode, FixedFirmware};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(config: &mut Config) -> Rc<RefCell<Vec<ConfigEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        config.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    #[test]
    fn test_new_config_is_empty() {
        let config = Config::default();
        assert_eq!(config.install_choice(), InstallChoice::NoChoice);
        assert_eq!(config.swap_choice(), SwapChoice::NoSwap);
        assert!(config.swap_choices().is_empty());
        assert_eq!(config.required_storage_gib(), None);
        assert!(config.allow_manual_partitioning());
        assert!(config.erase_fs_type_choice().is_empty());
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn test_set_install_choice_notifies_and_publishes() {
        let gs = GlobalStorage::shared();
        let mut config = Config::new(Some(Rc::clone(&gs)));
        let events = recorder(&mut config);

        config.set_install_choice(InstallChoice::Erase);

        assert_eq!(*events.borrow(), vec![ConfigEvent::InstallChoiceChanged(InstallChoice::Erase)]);
        assert_eq!(
            gs.borrow().value(publish::PARTITION_CHOICES),
            Some(&json!({"install": "erase", "swap": "none"}))
        );
    }

    #[test]
    fn test_unchanged_choice_is_silent() {
        let gs = GlobalStorage::shared();
        let mut config = Config::new(Some(Rc::clone(&gs)));
        let events = recorder(&mut config);

        config.set_install_choice(InstallChoice::NoChoice);
        config.set_swap_choice(SwapChoice::NoSwap);

        assert!(events.borrow().is_empty());
        assert!(!gs.borrow().contains(publish::PARTITION_CHOICES));
    }

    #[test]
    fn test_raw_out_of_range_substitutes_default() {
        let mut config = Config::default();
        config.set_install_choice(InstallChoice::Manual);
        config.set_install_choice_raw(42);
        assert_eq!(config.install_choice(), InstallChoice::NoChoice);
        assert!(matches!(config.warnings()[0], ConfigWarning::OutOfRange { .. }));

        config.set_swap_choice_raw(4);
        assert_eq!(config.swap_choice(), SwapChoice::SwapFile);
        config.set_swap_choice_raw(-1);
        assert_eq!(config.swap_choice(), SwapChoice::NoSwap);
        assert_eq!(config.warnings().len(), 2);
    }

    #[test]
    fn test_swap_choice_publishes_both_values() {
        let gs = GlobalStorage::shared();
        let mut config = Config::new(Some(Rc::clone(&gs)));
        config.set_install_choice(InstallChoice::Replace);
        config.set_swap_choice(SwapChoice::SmallSwap);
        assert_eq!(
            gs.borrow().value(publish::PARTITION_CHOICES),
            Some(&json!({"install": "replace", "swap": "small"}))
        );
    }

    #[test]
    fn test_erase_fs_choice_is_canonicalized() {
        let mut config = Config::default();
        let events = recorder(&mut config);

        config.set_erase_fs_type_choice("Ext4");
        config.set_erase_fs_type_choice("ext4");
        assert_eq!(config.erase_fs_type_choice(), "ext4");
        assert_eq!(*events.borrow(), vec![ConfigEvent::EraseFsTypeChanged("ext4".into())]);
    }

    #[test]
    fn test_unknown_erase_fs_is_accepted_as_empty() {
        let mut config = Config::default();
        config.set_erase_fs_type_choice("btrfs");
        config.set_erase_fs_type_choice("bogusfs");
        assert_eq!(config.erase_fs_type_choice(), "");
        assert!(matches!(
            config.warnings().last(),
            Some(ConfigWarning::UnknownFilesystem { .. })
        ));
    }

    #[test]
    fn test_accepts_partition_table_type() {
        let mut config = Config::default();
        assert!(config.accepts_partition_table_type("msdos"));

        config.set_configuration_map(
            &ConfigurationMap::new().with("requiredPartitionTableType", json!(["gpt"])),
        );
        assert!(config.accepts_partition_table_type("GPT"));
        assert!(!config.accepts_partition_table_type("msdos"));
    }

    #[test]
    fn test_load_without_storage() {
        let mut config = Config::new(None).with_firmware_detector(FixedFirmware(FirmwareMode::Efi));
        config.set_configuration_map(
            &ConfigurationMap::new()
                .with("initialPartitioningChoice", "erase")
                .with("requiredPartitionTableType", "gpt"),
        );
        assert_eq!(config.install_choice(), InstallChoice::Erase);
        assert_eq!(config.required_partition_table_types(), ["gpt".to_string()]);
        config.fill_gs_secondary_configuration();
    }

    #[test]
    fn test_negative_required_storage_is_unset() {
        let mut config = Config::default();
        config.set_configuration_map(&ConfigurationMap::new().with("requiredStorage", -5));
        assert_eq!(config.required_storage_gib(), None);
    }

    #[test]
    fn test_non_finite_required_storage_is_unset() {
        let mut config = Config::default();
        config.set_configuration_map(&ConfigurationMap::new().with("requiredStorage", "inf"));
        assert_eq!(config.required_storage_gib(), None);
        config.set_configuration_map(&ConfigurationMap::new().with("requiredStorage", "NaN"));
        assert_eq!(config.required_storage_gib(), None);
    }

    #[test]
    fn test_debug_does_not_panic() {
        let config = Config::default();
        let text = format!("{:?}", config);
        assert!(text.contains("install_choice"));
    }
}
