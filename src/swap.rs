//! Swap-choice resolution
//!
//! Two schemas describe which swap setups the user may pick:
//!
//! | Schema | Keys |
//! |--------|------|
//! | legacy (deprecated) | `ensureSuspendToDisk` (default true), `neverCreateSwap` (default false) |
//! | current | `userSwapChoices`: list of swap-choice names |
//!
//! When both are given the current schema wins. The result is never empty
//! and never contains [`SwapChoice::ReuseSwap`], which is not implemented.

use crate::config_file::ConfigurationMap;
use crate::error::{record, ConfigWarning};
use crate::names::SWAP_CHOICE_NAMES;
use crate::types::{SwapChoice, SwapChoiceSet};

const USER_SWAP_CHOICES: &str = "userSwapChoices";
const ENSURE_SUSPEND_TO_DISK: &str = "ensureSuspendToDisk";
const NEVER_CREATE_SWAP: &str = "neverCreateSwap";

/// Swap choices the partitioning code can actually set up
const UNSUPPORTED: &[SwapChoice] = &[SwapChoice::ReuseSwap];

/// Outcome of resolving the swap settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapResolution {
    /// Choices offered to the user
    pub choices: SwapChoiceSet,
    /// Legacy view: suspend-to-disk is one of the requested choices
    pub ensure_suspend_to_disk: bool,
    /// Legacy view: swap is never created (`none` was the only request)
    pub never_create_swap: bool,
    /// Problems found while resolving, in the order they were seen
    pub warnings: Vec<ConfigWarning>,
}

/// Merge legacy and current swap settings into the set of offered choices.
pub fn resolve_swap_choices(map: &ConfigurationMap) -> SwapResolution {
    let mut warnings = Vec::new();

    let has_legacy = map.contains(ENSURE_SUSPEND_TO_DISK) || map.contains(NEVER_CREATE_SWAP);
    if map.contains(USER_SWAP_CHOICES) && has_legacy {
        record(&mut warnings, ConfigWarning::MixedSwapSettings);
    }

    if map.contains(ENSURE_SUSPEND_TO_DISK) {
        record(
            &mut warnings,
            ConfigWarning::DeprecatedSetting {
                key: ENSURE_SUSPEND_TO_DISK,
            },
        );
    }
    let mut ensure_suspend_to_disk = map.get_bool(ENSURE_SUSPEND_TO_DISK, true);

    if map.contains(NEVER_CREATE_SWAP) {
        record(
            &mut warnings,
            ConfigWarning::DeprecatedSetting {
                key: NEVER_CREATE_SWAP,
            },
        );
    }
    let mut never_create_swap = map.get_bool(NEVER_CREATE_SWAP, false);

    let mut choices = SwapChoiceSet::new();
    if map.contains(USER_SWAP_CHOICES) {
        let names = map.get_string_list(USER_SWAP_CHOICES);
        for name in &names {
            match SWAP_CHOICE_NAMES.find(name) {
                Some(choice) => {
                    choices.insert(choice);
                }
                None => record(
                    &mut warnings,
                    ConfigWarning::UnrecognizedName {
                        key: USER_SWAP_CHOICES,
                        name: name.clone(),
                    },
                ),
            }
        }

        if choices.is_empty() {
            record(&mut warnings, ConfigWarning::EmptySwapChoices { given: names });
            choices.insert(SwapChoice::FullSwap);
        }

        // Suspend if it is one of the requested choices; suppress swap only
        // if that is the only one. Unsupported choices still count here.
        ensure_suspend_to_disk = choices.contains(SwapChoice::FullSwap);
        never_create_swap = choices.is_only(SwapChoice::NoSwap);
    } else if never_create_swap {
        choices.insert(SwapChoice::NoSwap);
    } else if ensure_suspend_to_disk {
        choices.insert(SwapChoice::FullSwap);
    } else {
        choices.insert(SwapChoice::SmallSwap);
    }

    for &choice in UNSUPPORTED {
        if choices.remove(choice) {
            record(&mut warnings, ConfigWarning::UnsupportedSwapChoice { choice });
        }
    }
    // Only reachable when every requested choice was unsupported
    if choices.is_empty() {
        choices.insert(SwapChoice::FullSwap);
    }

    tracing::debug!(
        "Swap choices {} (suspend={}, never={})",
        choices,
        ensure_suspend_to_disk,
        never_create_swap
    );

    SwapResolution {
        choices,
        ensure_suspend_to_disk,
        never_create_swap,
        warnings,
    }
}

/// Pick a single swap choice from a set, preferring not to create swap.
///
/// Used when the configured initial choice is not on offer. An empty set
/// yields [`SwapChoice::NoSwap`].
pub fn pick_one(choices: &SwapChoiceSet) -> SwapChoice {
    if choices.len() == 1 {
        return choices.first().unwrap_or_default();
    }
    if choices.contains(SwapChoice::NoSwap) {
        return SwapChoice::NoSwap;
    }
    choices.first().unwrap_or_default()
}
