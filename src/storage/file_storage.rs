use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BlogdeskError, Result};

use super::Storage;

pub const BLOGDESK_DIR: &str = ".blogdesk";

/// Slot storage backed by one JSON file per key inside a project's `.blogdesk/` directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Initialize a new blogdesk project under `root`
    pub fn init(root: &Path) -> Result<Self> {
        let dir = root.join(BLOGDESK_DIR);

        if dir.exists() {
            return Err(BlogdeskError::AlreadyInitialized);
        }

        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open an existing blogdesk project under `root`
    pub fn open(root: &Path) -> Result<Self> {
        let dir = root.join(BLOGDESK_DIR);

        if !dir.is_dir() {
            return Err(BlogdeskError::NotInitialized);
        }

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key);
        // Write then rename so a crash never leaves a half-written slot behind.
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path).map_err(|e| {
            BlogdeskError::Storage(format!("failed to replace {}: {}", path.display(), e))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_blogdesk_directory() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::init(tmp.path()).unwrap();
        assert!(tmp.path().join(".blogdesk").is_dir());
        assert_eq!(storage.dir(), tmp.path().join(".blogdesk"));
    }

    #[test]
    fn test_init_fails_if_already_initialized() {
        let tmp = TempDir::new().unwrap();
        FileStorage::init(tmp.path()).unwrap();
        let result = FileStorage::init(tmp.path());
        assert!(matches!(result, Err(BlogdeskError::AlreadyInitialized)));
    }

    #[test]
    fn test_open_fails_if_not_initialized() {
        let tmp = TempDir::new().unwrap();
        let result = FileStorage::open(tmp.path());
        assert!(matches!(result, Err(BlogdeskError::NotInitialized)));
    }

    #[test]
    fn test_absent_slot_reads_as_none() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::init(tmp.path()).unwrap();
        assert!(storage.get("blog_data").unwrap().is_none());
    }

    #[test]
    fn test_set_then_get_across_handles() {
        let tmp = TempDir::new().unwrap();
        let mut storage = FileStorage::init(tmp.path()).unwrap();
        storage.set("blog_data", "[]").unwrap();

        let reopened = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(reopened.get("blog_data").unwrap().as_deref(), Some("[]"));
        assert!(reopened.slot_path("blog_data").exists());
        assert!(!tmp.path().join(".blogdesk/.blog_data.json.tmp").exists());
    }
}
