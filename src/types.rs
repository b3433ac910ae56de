//! Type-safe partitioning choices
//!
//! The two choice enums are closed sets. Raw integer encodings coming from
//! outside (UI models, saved settings) go through `TryFrom<i32>` so an invalid
//! value is a representable error instead of silent range arithmetic.

use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use strum::{EnumCount, EnumIter, FromRepr};
use thiserror::Error;

use crate::names::{INSTALL_CHOICE_NAMES, SWAP_CHOICE_NAMES};

/// Overall partitioning strategy selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(EnumIter, EnumCount, FromRepr)]
#[repr(i32)]
pub enum InstallChoice {
    #[default]
    NoChoice = 0,
    /// Shrink an existing partition and install next to it
    Alongside = 1,
    /// Wipe the whole disk
    Erase = 2,
    /// Replace the contents of one existing partition
    Replace = 3,
    /// Hand the disk over to the manual partitioning page
    Manual = 4,
}

/// One swap-provisioning strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(EnumIter, EnumCount, FromRepr)]
#[repr(i32)]
pub enum SwapChoice {
    #[default]
    NoSwap = 0,
    /// Enough swap to smooth out memory pressure, not for hibernation
    SmallSwap = 1,
    /// At least as large as RAM so suspend-to-disk works
    FullSwap = 2,
    /// Reuse a swap partition already on the disk (not supported yet)
    ReuseSwap = 3,
    /// Swap file on the root filesystem instead of a partition
    SwapFile = 4,
}

/// A raw integer did not name any variant of a choice enum.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid {kind} (int) {value}")]
pub struct InvalidChoiceError {
    pub kind: &'static str,
    pub value: i32,
}

impl InstallChoice {
    /// Canonical configuration name, as written to global storage
    pub fn name(self) -> &'static str {
        INSTALL_CHOICE_NAMES.name_of(self).unwrap_or_default()
    }
}

impl SwapChoice {
    /// Canonical configuration name, as written to global storage
    pub fn name(self) -> &'static str {
        SWAP_CHOICE_NAMES.name_of(self).unwrap_or_default()
    }
}

impl TryFrom<i32> for InstallChoice {
    type Error = InvalidChoiceError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or(InvalidChoiceError {
            kind: "install choice",
            value,
        })
    }
}

impl TryFrom<i32> for SwapChoice {
    type Error = InvalidChoiceError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or(InvalidChoiceError {
            kind: "swap choice",
            value,
        })
    }
}

impl fmt::Display for InstallChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for SwapChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for InstallChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl Serialize for SwapChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// The swap choices the administrator lets the user pick from.
///
/// Backed by an ordered set, so iteration follows declaration order of
/// [`SwapChoice`] and "first member" is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct SwapChoiceSet(BTreeSet<SwapChoice>);

impl SwapChoiceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the choice was not already present
    pub fn insert(&mut self, choice: SwapChoice) -> bool {
        self.0.insert(choice)
    }

    /// Returns true if the choice was present
    pub fn remove(&mut self, choice: SwapChoice) -> bool {
        self.0.remove(&choice)
    }

    pub fn contains(&self, choice: SwapChoice) -> bool {
        self.0.contains(&choice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First member in iteration order
    pub fn first(&self) -> Option<SwapChoice> {
        self.0.first().copied()
    }

    /// True if `choice` is the one and only member
    pub fn is_only(&self, choice: SwapChoice) -> bool {
        self.len() == 1 && self.contains(choice)
    }

    pub fn iter(&self) -> impl Iterator<Item = SwapChoice> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<SwapChoice> for SwapChoiceSet {
    fn from_iter<I: IntoIterator<Item = SwapChoice>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[SwapChoice; N]> for SwapChoiceSet {
    fn from(choices: [SwapChoice; N]) -> Self {
        choices.into_iter().collect()
    }
}

impl fmt::Display for SwapChoiceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(SwapChoice::name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_install_choice_from_raw() {
        assert_eq!(InstallChoice::try_from(0), Ok(InstallChoice::NoChoice));
        assert_eq!(InstallChoice::try_from(4), Ok(InstallChoice::Manual));
        assert!(InstallChoice::try_from(5).is_err());
        assert!(InstallChoice::try_from(-1).is_err());
    }

    #[test]
    fn test_swap_choice_from_raw() {
        assert_eq!(SwapChoice::try_from(2), Ok(SwapChoice::FullSwap));
        assert_eq!(SwapChoice::try_from(4), Ok(SwapChoice::SwapFile));

        let err = SwapChoice::try_from(17).unwrap_err();
        assert_eq!(err.value, 17);
        assert_eq!(err.to_string(), "Invalid swap choice (int) 17");
    }

    #[test]
    fn test_raw_values_match_declaration_order() {
        for (i, choice) in SwapChoice::iter().enumerate() {
            assert_eq!(choice as i32, i as i32);
        }
        assert_eq!(InstallChoice::COUNT, 5);
        assert_eq!(SwapChoice::COUNT, 5);
    }

    #[test]
    fn test_display_uses_canonical_name() {
        assert_eq!(InstallChoice::NoChoice.to_string(), "none");
        assert_eq!(SwapChoice::FullSwap.to_string(), "suspend");
        assert_eq!(SwapChoice::SwapFile.to_string(), "file");
    }

    #[test]
    fn test_serialize_as_name() {
        let json = serde_json::to_string(&InstallChoice::Erase).unwrap();
        assert_eq!(json, "\"erase\"");

        let set = SwapChoiceSet::from([SwapChoice::SwapFile, SwapChoice::NoSwap]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[\"none\",\"file\"]");
    }

    #[test]
    fn test_swap_choice_set_basics() {
        let mut set = SwapChoiceSet::new();
        assert!(set.is_empty());
        assert!(set.insert(SwapChoice::SmallSwap));
        assert!(!set.insert(SwapChoice::SmallSwap));
        assert!(set.is_only(SwapChoice::SmallSwap));

        set.insert(SwapChoice::NoSwap);
        assert_eq!(set.len(), 2);
        assert_eq!(set.first(), Some(SwapChoice::NoSwap));
        assert!(!set.is_only(SwapChoice::NoSwap));

        assert!(set.remove(SwapChoice::NoSwap));
        assert!(!set.remove(SwapChoice::NoSwap));
        assert_eq!(set.to_string(), "[small]");
    }
}
