use crate::error::Result;

/// Raw key/value storage.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// [`LotteryStore`](super::LotteryStore) handles the "what": key layout,
/// migration, validation, backups and quota recovery.
///
/// Values are opaque strings. Implementations use `&self` and interior
/// mutability since the whole crate is single-threaded.
pub trait StorageBackend {
    /// Read a value. `Ok(None)` when the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    /// Returns [`JodHuayError::QuotaExceeded`](crate::error::JodHuayError::QuotaExceeded)
    /// when the backend has no room left; the previous value is then untouched.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Every key currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>>;

    /// Approximate bytes used by keys and values.
    fn bytes_used(&self) -> Result<u64> {
        let mut total = 0u64;
        for key in self.keys()? {
            let value_len = self.get(&key)?.map(|v| v.len()).unwrap_or(0);
            total += (key.len() + value_len) as u64;
        }
        Ok(total)
    }
}
