use super::backend::StorageBackend;
use crate::error::{JodHuayError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since jodhuay is single-threaded.
/// An optional byte quota mimics a browser's storage limit: a write that
/// would push keys plus values past it fails with `QuotaExceeded`.
#[derive(Default)]
pub struct MemBackend {
    entries: RefCell<BTreeMap<String, String>>,
    quota: RefCell<Option<u64>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(self, bytes: u64) -> Self {
        *self.quota.borrow_mut() = Some(bytes);
        self
    }

    pub fn set_quota(&self, bytes: Option<u64>) {
        *self.quota.borrow_mut() = bytes;
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    fn used_without(&self, key: &str) -> u64 {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum()
    }
}

impl StorageBackend for MemBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(JodHuayError::Store("Simulated write error".to_string()));
        }
        if let Some(quota) = *self.quota.borrow() {
            let needed = self.used_without(key) + (key.len() + value.len()) as u64;
            if needed > quota {
                return Err(JodHuayError::QuotaExceeded);
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let backend = MemBackend::new();
        backend.set("a", "1").unwrap();
        assert_eq!(backend.get("a").unwrap().as_deref(), Some("1"));
        backend.remove("a").unwrap();
        assert_eq!(backend.get("a").unwrap(), None);
        backend.remove("a").unwrap();
    }

    #[test]
    fn quota_counts_replacement_not_sum() {
        let backend = MemBackend::new().with_quota(10);
        backend.set("k", "12345678").unwrap();
        // Replacing the same key only needs the new size.
        backend.set("k", "87654321").unwrap();
        assert!(matches!(
            backend.set("x", "12"),
            Err(JodHuayError::QuotaExceeded)
        ));
        assert_eq!(backend.get("x").unwrap(), None);
    }

    #[test]
    fn bytes_used_sums_keys_and_values() {
        let backend = MemBackend::new();
        backend.set("ab", "cde").unwrap();
        backend.set("f", "").unwrap();
        assert_eq!(backend.bytes_used().unwrap(), 6);
    }
}
