//! Persistent key/value storage.
//!
//! The console keeps its durable state (API base URL and bearer tokens) in a
//! single JSON object of string keys to string values, scoped to the current
//! user's home directory.

use crate::consts::cli_consts::{STORAGE_DIR, STORAGE_FILE};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the path of the storage file under the user's home directory.
pub fn get_storage_path() -> Result<PathBuf, std::io::Error> {
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine the home directory",
        )
    })?;
    Ok(home.join(STORAGE_DIR).join(STORAGE_FILE))
}

/// File-backed string key/value store.
///
/// Every read goes to disk so that separate handles onto the same file observe
/// each other's writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if the file exists but cannot be read or holds invalid JSON.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, std::io::Error> {
        Ok(self.load()?.remove(key))
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), std::io::Error> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    /// Removes `key`. Removing a missing key is not an error.
    pub fn remove_item(&self, key: &str) -> Result<(), std::io::Error> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    /// Deletes the storage file entirely.
    pub fn clear(&self) -> Result<(), std::io::Error> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Loads all entries. A missing file is an empty store.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load(&self) -> Result<BTreeMap<String, String>, std::io::Error> {
        let buf = match fs::read(&self.path) {
            Ok(buf) => buf,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e),
        };
        serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Writes all entries, creating parent directories if they don't exist.
    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    // A value written through one handle is visible through another.
    fn test_set_item_is_visible_to_other_handles() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");

        LocalStorage::new(&path).set_item("k", "v").unwrap();

        let other = LocalStorage::new(&path);
        assert_eq!(other.get_item("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    // Writing should create directories if they don't exist.
    fn test_set_item_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent_dir").join("storage.json");

        let result = LocalStorage::new(&path).set_item("k", "v");

        assert!(result.is_ok(), "Failed to save storage");
        assert!(
            path.parent().unwrap().exists(),
            "Parent directory does not exist"
        );
    }

    #[test]
    // A missing file reads as an empty store rather than an error.
    fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("absent.json"));

        assert!(storage.load().unwrap().is_empty());
        assert_eq!(storage.get_item("anything").unwrap(), None);
    }

    #[test]
    // An empty string is stored as a value, distinct from absence.
    fn test_empty_value_is_not_absence() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("storage.json"));

        storage.set_item("base", "").unwrap();

        assert_eq!(storage.get_item("base").unwrap(), Some(String::new()));
        assert_eq!(storage.get_item("other").unwrap(), None);
    }

    #[test]
    fn test_remove_item_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("storage.json"));
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();

        storage.remove_item("a").unwrap();
        storage.remove_item("never-set").unwrap();

        assert_eq!(storage.get_item("a").unwrap(), None);
        assert_eq!(storage.get_item("b").unwrap(), Some("2".to_string()));
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_storage.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = LocalStorage::new(&path).load();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::InvalidData);
    }
}
