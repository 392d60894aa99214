use super::backend::StorageBackend;
use crate::error::{JodHuayError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const VALUE_EXT: &str = ".json";

/// File-per-key storage under a single directory.
///
/// ```text
/// storage/
/// ├── lottery_underground.json
/// ├── lottery_government.json
/// ├── lottery_data_version.json
/// └── lottery_underground_backup_1718000000000.json
/// ```
pub struct FsBackend {
    root: PathBuf,
    quota: Option<u64>,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root, quota: None }
    }

    pub fn with_quota(mut self, quota: Option<u64>) -> Self {
        self.quota = quota;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(JodHuayError::Io)?;
        }
        Ok(())
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(JodHuayError::Store(format!("Invalid storage key: {}", key)));
        }
        Ok(self.root.join(format!("{}{}", key, VALUE_EXT)))
    }

    fn used_without(&self, key: &str) -> Result<u64> {
        let mut total = 0u64;
        for k in self.keys()? {
            if k == key {
                continue;
            }
            let meta = fs::metadata(self.path_for(&k)?).map_err(JodHuayError::Io)?;
            total += k.len() as u64 + meta.len();
        }
        Ok(total)
    }
}

fn map_write_error(e: io::Error) -> JodHuayError {
    if e.kind() == io::ErrorKind::StorageFull {
        JodHuayError::QuotaExceeded
    } else {
        JodHuayError::Io(e)
    }
}

impl StorageBackend for FsBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(JodHuayError::Io)?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let target = self.path_for(key)?;
        self.ensure_dir()?;

        if let Some(quota) = self.quota {
            let needed = self.used_without(key)? + (key.len() + value.len()) as u64;
            if needed > quota {
                return Err(JodHuayError::QuotaExceeded);
            }
        }

        // Atomic write
        let tmp = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp, value) {
            let _ = fs::remove_file(&tmp);
            return Err(map_write_error(e));
        }
        fs::rename(&tmp, target).map_err(map_write_error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(path).map_err(JodHuayError::Io)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(JodHuayError::Io)? {
            let path = entry.map_err(JodHuayError::Io)?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                if name.starts_with('.') {
                    continue;
                }
                if let Some(key) = name.strip_suffix(VALUE_EXT) {
                    keys.push(key.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
