use crate::error::{JodHuayError, Result};
use crate::store::DEFAULT_PREFIX;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_RETENTION_DAYS: u32 = 7;

/// Configuration for jodhuay, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Prefix of every storage key (`{prefix}_underground`, ...)
    #[serde(default = "default_prefix")]
    pub key_prefix: String,

    /// Backups older than this are removed when storage runs out of space
    #[serde(default = "default_retention_days")]
    pub backup_retention_days: u32,

    /// Byte limit for the storage directory; unlimited when absent
    #[serde(default)]
    pub storage_quota_bytes: Option<u64>,

    /// Edited records move to the end of the list instead of keeping their place
    #[serde(default)]
    pub edit_moves_to_end: bool,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_prefix(),
            backup_retention_days: DEFAULT_RETENTION_DAYS,
            storage_quota_bytes: None,
            edit_moves_to_end: false,
        }
    }
}

impl AppConfig {
    pub const KEYS: [&'static str; 4] = [
        "key-prefix",
        "backup-retention-days",
        "storage-quota-bytes",
        "edit-moves-to-end",
    ];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(JodHuayError::Io)?;
        let config: AppConfig =
            serde_json::from_str(&content).map_err(JodHuayError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(JodHuayError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(JodHuayError::Serialization)?;
        fs::write(config_path, content).map_err(JodHuayError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "key-prefix" => Some(self.key_prefix.clone()),
            "backup-retention-days" => Some(self.backup_retention_days.to_string()),
            "storage-quota-bytes" => Some(
                self.storage_quota_bytes
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "unlimited".to_string()),
            ),
            "edit-moves-to-end" => Some(self.edit_moves_to_end.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "key-prefix" => {
                let valid = !value.is_empty()
                    && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
                if !valid {
                    return Err(format!(
                        "Invalid key prefix '{}': use letters, digits or '-'",
                        value
                    ));
                }
                self.key_prefix = value.to_string();
            }
            "backup-retention-days" => {
                self.backup_retention_days = value
                    .parse()
                    .map_err(|_| format!("Invalid number of days: {}", value))?;
            }
            "storage-quota-bytes" => {
                self.storage_quota_bytes = match value {
                    "unlimited" | "none" | "" => None,
                    v => Some(v.parse().map_err(|_| format!("Invalid byte count: {}", v))?),
                };
            }
            "edit-moves-to-end" => {
                self.edit_moves_to_end = match value {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    v => return Err(format!("Invalid boolean: {}", v)),
                };
            }
            other => return Err(format!("Unknown config key: {}", other)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.key_prefix, "lottery");
        assert_eq!(config.backup_retention_days, 7);
        assert!(!config.edit_moves_to_end);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.set("edit-moves-to-end", "yes").unwrap();
        config.set("storage-quota-bytes", "5000000").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = AppConfig::load(dir.path()).unwrap();
        assert!(loaded.edit_moves_to_end);
        assert_eq!(loaded.storage_quota_bytes, Some(5_000_000));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"backup_retention_days": 3}"#).unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.backup_retention_days, 3);
        assert_eq!(config.key_prefix, "lottery");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = AppConfig::default();
        assert!(config.set("key-prefix", "a_b").is_err());
        assert!(config.set("backup-retention-days", "-1").is_err());
        assert!(config.set("edit-moves-to-end", "maybe").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_get_every_key() {
        let config = AppConfig::default();
        for key in AppConfig::KEYS {
            assert!(config.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(config.get("storage-quota-bytes").as_deref(), Some("unlimited"));
    }
}
