//! File-based storage.

use super::{Storage, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each key as a JSON file in a base directory.
pub struct FileStorage {
    /// Base directory for stored values.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/designboard/`
    /// On Windows: `%LOCALAPPDATA%\designboard\`
    pub fn default_location() -> StorageResult<Self> {
        Self::new(Self::default_dir()?)
    }

    /// Directory used by [`FileStorage::default_location`].
    pub fn default_dir() -> StorageResult<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Ok(base.join("designboard"))
    }

    /// File path for a key.
    fn key_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_key))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_path(key);
        fs::write(&path, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn read(&self, key: &str) -> StorageResult<String> {
        let path = self.key_path(key);
        if !path.exists() {
            return Err(StorageError::NotFound(key.to_string()));
        }
        fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.key_path(key).exists())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let mut keys = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_write_read() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        storage.write("designboard_layout", "[1, 2]").unwrap();
        assert_eq!(storage.read("designboard_layout").unwrap(), "[1, 2]");
        assert!(dir.path().join("designboard_layout.json").exists());
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert!(matches!(storage.read("nonexistent"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::new(nested.clone()).unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.base_path(), nested.as_path());
    }

    #[test]
    fn test_file_storage_keys() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        storage.write("one", "1").unwrap();
        storage.write("two", "2").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut keys = storage.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_file_storage_remove() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        storage.write("test", "x").unwrap();
        assert!(storage.exists("test").unwrap());
        storage.remove("test").unwrap();
        assert!(!storage.exists("test").unwrap());
    }

    #[test]
    fn test_file_storage_sanitizes_key() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        storage.write("../escape:key", "x").unwrap();
        assert_eq!(storage.read("../escape:key").unwrap(), "x");
        assert!(dir.path().join("___escape_key.json").exists());
    }
}
