use std::fs;
use std::path::{Component, Path};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{BlogdeskError, Result};
use crate::storage::{StoreOptions, DEFAULT_STORAGE_KEY, TRASH_RETENTION_DAYS};

pub const CONFIG_FILE: &str = "config.yaml";

/// Longest trash retention accepted from config, about a century.
pub const MAX_TRASH_RETENTION_DAYS: i64 = 36_500;

/// Project settings, read from `.blogdesk/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogdeskConfig {
    /// Slot the blog collection is persisted under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Posts per page in `blogdesk list`
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// How many recent posts the dashboard shows
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Days a trashed post is kept before it is purged on load
    #[serde(default = "default_trash_retention_days")]
    pub trash_retention_days: i64,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_page_size() -> usize {
    5
}

fn default_recent_limit() -> usize {
    3
}

fn default_trash_retention_days() -> i64 {
    TRASH_RETENTION_DAYS
}

impl Default for BlogdeskConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            page_size: default_page_size(),
            recent_limit: default_recent_limit(),
            trash_retention_days: default_trash_retention_days(),
        }
    }
}

impl BlogdeskConfig {
    /// Load the config from a `.blogdesk/` directory. A missing file yields defaults.
    pub fn load(blogdesk_dir: &Path) -> Result<Self> {
        let path = blogdesk_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        let config: Self = serde_yaml::from_str(&raw)
            .map_err(|e| BlogdeskError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config into a `.blogdesk/` directory.
    pub fn save(&self, blogdesk_dir: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(blogdesk_dir.join(CONFIG_FILE), yaml)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        validate_storage_key(&self.storage_key)?;
        if self.page_size == 0 {
            return Err(BlogdeskError::Config("page_size must be at least 1".to_string()));
        }
        if !(0..=MAX_TRASH_RETENTION_DAYS).contains(&self.trash_retention_days) {
            return Err(BlogdeskError::Config(format!(
                "trash_retention_days must be between 0 and {}, got {}",
                MAX_TRASH_RETENTION_DAYS, self.trash_retention_days
            )));
        }
        Ok(())
    }

    /// Store settings for this config. Retention is clamped to the accepted range.
    pub fn store_options(&self) -> StoreOptions {
        let days = self.trash_retention_days.clamp(0, MAX_TRASH_RETENTION_DAYS);
        StoreOptions::default()
            .with_storage_key(self.storage_key.clone())
            .with_retention(Duration::days(days))
    }
}

/// A slot key becomes a file name inside `.blogdesk/`, so it must be a single
/// plain path component.
fn validate_storage_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(BlogdeskError::Config("storage_key must not be empty".to_string()));
    }
    let mut components = Path::new(key).components();
    let plain = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
        && !key.contains(['/', '\\']);
    if !plain {
        return Err(BlogdeskError::Config(format!(
            "storage_key '{}' must be a plain name without path separators or '..'",
            key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = BlogdeskConfig::default();
        assert_eq!(config.storage_key, "blog_data");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.trash_retention_days, 30);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = BlogdeskConfig::load(tmp.path()).unwrap();
        assert_eq!(config, BlogdeskConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "page_size: 10\n").unwrap();
        let config = BlogdeskConfig::load(tmp.path()).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.storage_key, "blog_data");
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let config = BlogdeskConfig {
            recent_limit: 7,
            ..Default::default()
        };
        config.save(tmp.path()).unwrap();
        assert_eq!(BlogdeskConfig::load(tmp.path()).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "page_size: [oops").unwrap();
        let result = BlogdeskConfig::load(tmp.path());
        assert!(matches!(result, Err(BlogdeskError::Config(_))));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "page_size: 0\n").unwrap();
        assert!(matches!(
            BlogdeskConfig::load(tmp.path()),
            Err(BlogdeskError::Config(_))
        ));
    }

    #[test]
    fn test_oversized_retention_rejected() {
        let tmp = TempDir::new().unwrap();
        for days in ["100000000", "999999999999", "-1"] {
            fs::write(
                tmp.path().join(CONFIG_FILE),
                format!("trash_retention_days: {}\n", days),
            )
            .unwrap();
            assert!(matches!(
                BlogdeskConfig::load(tmp.path()),
                Err(BlogdeskError::Config(_))
            ));
        }

        fs::write(tmp.path().join(CONFIG_FILE), "trash_retention_days: 36500\n").unwrap();
        let config = BlogdeskConfig::load(tmp.path()).unwrap();
        assert_eq!(config.store_options().retention, Duration::days(36_500));
    }

    #[test]
    fn test_store_options_clamp_unvalidated_retention() {
        let config = BlogdeskConfig {
            trash_retention_days: 999_999_999_999,
            ..Default::default()
        };
        let options = config.store_options();
        assert_eq!(options.retention, Duration::days(MAX_TRASH_RETENTION_DAYS));
    }

    #[test]
    fn test_storage_key_must_stay_inside_project_dir() {
        for key in ["../x", "nested/slot", "..", "a\\b", "/etc/passwd", "."] {
            let config = BlogdeskConfig {
                storage_key: key.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(BlogdeskError::Config(_))),
                "accepted {:?}",
                key
            );
        }

        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "storage_key: ../escape\n").unwrap();
        assert!(matches!(
            BlogdeskConfig::load(tmp.path()),
            Err(BlogdeskError::Config(_))
        ));

        let config = BlogdeskConfig {
            storage_key: "posts.v2".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_store_options_carry_settings() {
        let config = BlogdeskConfig {
            storage_key: "posts".to_string(),
            trash_retention_days: 7,
            ..Default::default()
        };
        let options = config.store_options();
        assert_eq!(options.storage_key, "posts");
        assert_eq!(options.retention, Duration::days(7));
    }
}
