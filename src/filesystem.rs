//! Filesystem name canonicalization
//!
//! Configuration files and users spell filesystem types loosely (`vfat`,
//! `Ext4`, `swap`). The partition engine wants one canonical name per type.

/// Maps a user-supplied filesystem name to its canonical form.
pub trait FilesystemNames {
    /// `None` when the name does not denote a known filesystem
    fn canonical_name(&self, name: &str) -> Option<String>;
}

/// Canonical names and their accepted aliases
const KNOWN_FILESYSTEMS: &[(&str, &[&str])] = &[
    ("ext2", &[]),
    ("ext3", &[]),
    ("ext4", &[]),
    ("btrfs", &[]),
    ("xfs", &[]),
    ("f2fs", &[]),
    ("jfs", &[]),
    ("reiserfs", &[]),
    ("fat16", &[]),
    ("fat32", &["vfat", "fat"]),
    ("ntfs", &[]),
    ("exfat", &[]),
    ("hfsplus", &["hfs+"]),
    ("udf", &[]),
    ("zfs", &[]),
    ("linuxswap", &["swap", "linux-swap"]),
];

/// Built-in table of the filesystems the partition engine can create.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownFilesystems;

impl FilesystemNames for KnownFilesystems {
    fn canonical_name(&self, name: &str) -> Option<String> {
        let name = name.trim();
        KNOWN_FILESYSTEMS
            .iter()
            .find(|(canonical, aliases)| {
                canonical.eq_ignore_ascii_case(name)
                    || aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
            })
            .map(|(canonical, _)| (*canonical).to_string())
    }
}
