//! Shared key/value store for cross-module handoff
//!
//! Later install stages (bootloader, fstab, ...) read their inputs from this
//! store. It is owned outside the partition configuration; [`Config`] only
//! holds a [`SharedStorage`] handle and writes whole values into it.
//!
//! [`Config`]: crate::config::Config

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Handle to a store shared between modules on the install thread
pub type SharedStorage = Rc<RefCell<GlobalStorage>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalStorage {
    values: Map<String, Value>,
}

impl GlobalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh store in a shareable handle
    pub fn shared() -> SharedStorage {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Insert or overwrite a value
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Insert any serializable value.
    ///
    /// Values that fail to serialize are logged and skipped.
    pub fn insert_serialized<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(v) => self.insert(key, v),
            Err(e) => tracing::warn!("Could not store {}: {}", key, e),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.values).context("Failed to serialize global storage")
    }

    /// Save the store as JSON for stages that run in another process
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json_pretty()?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write global storage to {:?}", path.as_ref()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_overwrites() {
        let mut gs = GlobalStorage::new();
        gs.insert("firmwareType", "bios");
        gs.insert("firmwareType", "efi");
        assert_eq!(gs.len(), 1);
        assert_eq!(gs.value("firmwareType"), Some(&json!("efi")));
    }

    #[test]
    fn test_contains_and_remove() {
        let mut gs = GlobalStorage::new();
        assert!(!gs.contains("requiredStorageGiB"));
        gs.insert("requiredStorageGiB", 12.5);
        assert!(gs.contains("requiredStorageGiB"));
        assert_eq!(gs.remove("requiredStorageGiB"), Some(json!(12.5)));
        assert!(gs.is_empty());
    }

    #[test]
    fn test_insert_serialized() {
        #[derive(Serialize)]
        struct Pair {
            install: &'static str,
            swap: &'static str,
        }

        let mut gs = GlobalStorage::new();
        gs.insert_serialized("partitionChoices", &Pair { install: "erase", swap: "small" });
        assert_eq!(
            gs.value("partitionChoices"),
            Some(&json!({"install": "erase", "swap": "small"}))
        );
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gs.json");

        let mut gs = GlobalStorage::new();
        gs.insert("efiSystemPartition", "/boot/efi");
        gs.save_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, json!({"efiSystemPartition": "/boot/efi"}));
    }

    #[test]
    fn test_keys() {
        let gs = GlobalStorage::shared();
        gs.borrow_mut().insert("a", 1);
        gs.borrow_mut().insert("b", 2);
        let keys: Vec<String> = gs.borrow().keys().map(str::to_string).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
