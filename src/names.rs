//! Name tables for the choice enums
//!
//! Configuration files spell choices as short lowercase words. A table maps
//! each word to its value; several words may alias one value, and the first
//! entry for a value is its canonical name.

use crate::types::{InstallChoice, SwapChoice};

/// Fixed bidirectional mapping between names and enum values.
#[derive(Debug)]
pub struct NamedEnumTable<T: 'static> {
    entries: &'static [(&'static str, T)],
    default: T,
}

impl<T: Copy + PartialEq> NamedEnumTable<T> {
    pub const fn new(entries: &'static [(&'static str, T)], default: T) -> Self {
        Self { entries, default }
    }

    /// Look up a name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<T> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }

    /// Look up a name, falling back to the table default.
    ///
    /// The flag is false when the name was not found and the default was
    /// returned instead, so callers can warn.
    pub fn find_or_default(&self, name: &str) -> (T, bool) {
        match self.find(name) {
            Some(value) => (value, true),
            None => (self.default, false),
        }
    }

    /// Canonical name of a value: the first entry that maps to it.
    pub fn name_of(&self, value: T) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| *n)
    }

    pub fn default_value(&self) -> T {
        self.default
    }

    pub fn entries(&self) -> &'static [(&'static str, T)] {
        self.entries
    }
}

pub static INSTALL_CHOICE_NAMES: NamedEnumTable<InstallChoice> = NamedEnumTable::new(
    &[
        ("none", InstallChoice::NoChoice),
        ("nochoice", InstallChoice::NoChoice),
        ("alongside", InstallChoice::Alongside),
        ("erase", InstallChoice::Erase),
        ("replace", InstallChoice::Replace),
        ("manual", InstallChoice::Manual),
    ],
    InstallChoice::NoChoice,
);

pub static SWAP_CHOICE_NAMES: NamedEnumTable<SwapChoice> = NamedEnumTable::new(
    &[
        ("none", SwapChoice::NoSwap),
        ("small", SwapChoice::SmallSwap),
        ("suspend", SwapChoice::FullSwap),
        ("reuse", SwapChoice::ReuseSwap),
        ("file", SwapChoice::SwapFile),
    ],
    SwapChoice::NoSwap,
);

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_install_aliases_share_value() {
        assert_eq!(INSTALL_CHOICE_NAMES.find("none"), Some(InstallChoice::NoChoice));
        assert_eq!(INSTALL_CHOICE_NAMES.find("nochoice"), Some(InstallChoice::NoChoice));
        // Reverse lookup picks the first entry
        assert_eq!(INSTALL_CHOICE_NAMES.name_of(InstallChoice::NoChoice), Some("none"));
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(SWAP_CHOICE_NAMES.find("Suspend"), Some(SwapChoice::FullSwap));
        assert_eq!(INSTALL_CHOICE_NAMES.find("ERASE"), Some(InstallChoice::Erase));
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(
            INSTALL_CHOICE_NAMES.find_or_default("wipe-everything"),
            (InstallChoice::NoChoice, false)
        );
        assert_eq!(SWAP_CHOICE_NAMES.find_or_default(""), (SwapChoice::NoSwap, false));
        assert_eq!(SWAP_CHOICE_NAMES.find_or_default("file"), (SwapChoice::SwapFile, true));
    }

    #[test]
    fn test_every_value_has_a_name() {
        for choice in InstallChoice::iter() {
            let name = INSTALL_CHOICE_NAMES.name_of(choice).expect("install choice unnamed");
            assert_eq!(INSTALL_CHOICE_NAMES.find(name), Some(choice));
        }
        for choice in SwapChoice::iter() {
            let name = SWAP_CHOICE_NAMES.name_of(choice).expect("swap choice unnamed");
            assert_eq!(SWAP_CHOICE_NAMES.find(name), Some(choice));
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(INSTALL_CHOICE_NAMES.default_value(), InstallChoice::NoChoice);
        assert_eq!(SWAP_CHOICE_NAMES.default_value(), SwapChoice::NoSwap);
        assert_eq!(SWAP_CHOICE_NAMES.entries().len(), 5);
    }
}
