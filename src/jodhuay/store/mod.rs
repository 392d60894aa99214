//! # Storage Layer
//!
//! [`LotteryStore`] is the only component that talks to durable storage. It
//! owns the key layout and wraps every read and write with the integrity
//! rules the rest of the crate relies on:
//!
//! - **Migration**: stored data is upgraded to [`migrate::CURRENT_VERSION`]
//!   before it is read.
//! - **Self-healing reads**: loaded collections are validated and, if the
//!   validated form differs from what was stored, written back.
//! - **Corruption recovery**: unparseable values are copied to timestamped
//!   backup keys and the collections start over empty.
//! - **Quota recovery**: when a save runs out of space, backups older than
//!   the retention window are removed and the write is retried once.
//!
//! The raw I/O lives behind [`backend::StorageBackend`]:
//!
//! - [`fs_backend::FsBackend`]: production, one JSON file per key
//! - [`mem_backend::MemBackend`]: in-memory, for tests
//!
//! ## Key Layout
//!
//! ```text
//! {prefix}_underground                 JSON array of underground records
//! {prefix}_government                  JSON array of government records
//! {prefix}_data_version                schema version tag, e.g. "1.1"
//! {prefix}_{kind}_backup_{millis}      raw copy taken on corruption or import
//! ```

use crate::config::AppConfig;
use crate::error::{JodHuayError, Result};
use crate::model::{Collections, GovernmentRecord, Kind, UndergroundRecord};
use crate::validate::{validate_and_fix, validate_raw, ValidationReport};
use chrono::Utc;
use serde_json::Value;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod migrate;

use backend::StorageBackend;
use migrate::{migrate, MigrationOutcome};

pub const DEFAULT_PREFIX: &str = "lottery";
const BACKUP_MARKER: &str = "_backup_";
const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Storage key naming for one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn collection(&self, kind: Kind) -> String {
        format!("{}_{}", self.prefix, kind)
    }

    pub fn version(&self) -> String {
        format!("{}_data_version", self.prefix)
    }

    pub fn backup(&self, kind: Kind, millis: i64) -> String {
        format!("{}_{}{}{}", self.prefix, kind, BACKUP_MARKER, millis)
    }

    /// Whether `key` belongs to this prefix at all.
    pub fn owns(&self, key: &str) -> bool {
        key.strip_prefix(&self.prefix)
            .is_some_and(|rest| rest.starts_with('_'))
    }

    /// Timestamp of a backup key, or `None` for any other key.
    pub fn backup_timestamp(&self, key: &str) -> Option<i64> {
        if !self.owns(key) {
            return None;
        }
        let (_, millis) = key.split_once(BACKUP_MARKER)?;
        millis.parse().ok()
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// Something `load` recovered from instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// Migration did not complete; stored data was left untouched.
    MigrationFailed(String),
    /// Stored data could not be parsed; raw values were backed up and the
    /// collections reset to empty.
    Corrupted { reason: String, backups: Vec<String> },
    /// Records were dropped or backfilled and the fixed form written back.
    Repaired(ValidationReport),
    /// Records were fixed in memory but writing them back failed.
    RepairNotPersisted(String),
}

#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub collections: Collections,
    pub migration: Option<MigrationOutcome>,
    pub issues: Vec<LoadIssue>,
}

#[derive(Debug, Clone, Default)]
pub struct Saved {
    pub collections: Collections,
    pub report: ValidationReport,
    /// Backup keys removed to make room for this save.
    pub cleaned_backups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInfo {
    pub version: Option<String>,
    pub keys: Vec<String>,
    pub backups: Vec<String>,
    pub bytes_used: u64,
}

pub struct LotteryStore<B: StorageBackend> {
    pub(crate) backend: B,
    keys: StorageKeys,
    retention_millis: i64,
}

impl<B: StorageBackend> LotteryStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self::new(backend, &AppConfig::default())
    }

    pub fn new(backend: B, config: &AppConfig) -> Self {
        Self {
            backend,
            keys: StorageKeys::new(config.key_prefix.clone()),
            retention_millis: i64::from(config.backup_retention_days) * MILLIS_PER_DAY,
        }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Migrate, read, validate and self-heal both collections.
    ///
    /// Only backend I/O faults are returned as `Err`; corrupted content and
    /// failed migrations come back as [`LoadIssue`]s.
    ///
    /// After a failed migration the validated collections are returned but
    /// nothing is written back, so the stored data stays as it was.
    pub fn load(&self) -> Result<Loaded> {
        let mut loaded = Loaded::default();

        let mut migrated = true;
        match migrate(&self.backend, &self.keys) {
            Ok(outcome) => loaded.migration = Some(outcome),
            Err(JodHuayError::MigrationFailure { from, to, reason }) => {
                migrated = false;
                tracing::warn!(%from, %to, %reason, "migration failed, stored data left as is");
                loaded.issues.push(LoadIssue::MigrationFailed(format!(
                    "{} -> {}: {}",
                    from, to, reason
                )));
            }
            Err(e) => return Err(e),
        }

        let ug_raw = self.read_raw(Kind::Underground)?;
        let gov_raw = self.read_raw(Kind::Government)?;

        let parsed = parse_json(Kind::Underground, &ug_raw)
            .and_then(|ug| Ok((ug, parse_json(Kind::Government, &gov_raw)?)));
        let (ug_value, gov_value) = match parsed {
            Ok(values) => values,
            Err(JodHuayError::ParseCorruption(reason)) => {
                tracing::error!(%reason, "stored data is corrupted, resetting");
                let backups = self.backup_raw(Utc::now().timestamp_millis());
                loaded.issues.push(LoadIssue::Corrupted { reason, backups });
                return Ok(loaded);
            }
            Err(e) => return Err(e),
        };

        let underground = validate_raw::<UndergroundRecord>(&ug_value);
        let government = validate_raw::<GovernmentRecord>(&gov_value);

        let ug_encoded = serde_json::to_string(&underground.records)?;
        let gov_encoded = serde_json::to_string(&government.records)?;

        let changed = ug_encoded != ug_raw || gov_encoded != gov_raw;
        if changed && !migrated {
            tracing::warn!("stored data needs fixing but migration failed, leaving it as is");
        } else if changed {
            let mut report = underground.report;
            report.merge(government.report);
            match self.write_collections(&ug_encoded, &gov_encoded) {
                Ok(()) if report.is_clean() => {
                    tracing::debug!("stored data rewritten in canonical form");
                }
                Ok(()) => {
                    tracing::info!(
                        dropped = report.dropped,
                        repaired = report.repaired,
                        "stored data validated and fixed"
                    );
                    loaded.issues.push(LoadIssue::Repaired(report));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "could not write repaired data back");
                    loaded.issues.push(LoadIssue::RepairNotPersisted(e.to_string()));
                }
            }
        }

        loaded.collections = Collections {
            underground: underground.records,
            government: government.records,
        };
        Ok(loaded)
    }

    /// Validate and persist both collections, returning the validated forms.
    pub fn save(&self, collections: &Collections) -> Result<Saved> {
        self.save_at(collections, Utc::now().timestamp_millis())
    }

    pub(crate) fn save_at(&self, collections: &Collections, now_millis: i64) -> Result<Saved> {
        let underground = validate_and_fix(&collections.underground);
        let government = validate_and_fix(&collections.government);

        let ug_encoded = serde_json::to_string(&underground.records)?;
        let gov_encoded = serde_json::to_string(&government.records)?;

        let mut report = underground.report;
        report.merge(government.report);
        let mut saved = Saved {
            collections: Collections {
                underground: underground.records,
                government: government.records,
            },
            report,
            cleaned_backups: Vec::new(),
        };

        match self.write_collections(&ug_encoded, &gov_encoded) {
            Ok(()) => Ok(saved),
            Err(JodHuayError::QuotaExceeded) => {
                tracing::warn!("storage quota exceeded, removing old backups and retrying");
                saved.cleaned_backups = match self.cleanup_old_backups_at(now_millis) {
                    Ok(removed) => removed,
                    Err(e) => {
                        tracing::warn!(error = %e, "backup cleanup failed");
                        Vec::new()
                    }
                };
                match self.write_collections(&ug_encoded, &gov_encoded) {
                    Ok(()) => Ok(saved),
                    Err(JodHuayError::QuotaExceeded) => {
                        tracing::error!("storage still full after cleanup");
                        Err(JodHuayError::StorageFull)
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Copy the current raw values to backup keys (before an import overwrite).
    pub fn backup_current(&self) -> Vec<String> {
        self.backup_raw(Utc::now().timestamp_millis())
    }

    /// Remove backups older than the retention window. Returns removed keys.
    pub fn cleanup_old_backups(&self) -> Result<Vec<String>> {
        self.cleanup_old_backups_at(Utc::now().timestamp_millis())
    }

    pub(crate) fn cleanup_old_backups_at(&self, now_millis: i64) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        for key in self.backend.keys()? {
            let Some(ts) = self.keys.backup_timestamp(&key) else {
                continue;
            };
            if now_millis - ts > self.retention_millis {
                self.backend.remove(&key)?;
                tracing::info!(%key, "removed old backup");
                removed.push(key);
            }
        }
        Ok(removed)
    }

    /// Remove every key under this prefix, backups and version tag included.
    pub fn reset(&self) -> Result<usize> {
        let mut removed = 0;
        for key in self.backend.keys()? {
            if self.keys.owns(&key) {
                self.backend.remove(&key)?;
                removed += 1;
            }
        }
        tracing::info!(removed, "all stored data reset");
        Ok(removed)
    }

    pub fn info(&self) -> Result<StoreInfo> {
        let mut keys: Vec<String> = self
            .backend
            .keys()?
            .into_iter()
            .filter(|k| self.keys.owns(k))
            .collect();
        keys.sort();
        let backups = keys
            .iter()
            .filter(|k| self.keys.backup_timestamp(k).is_some())
            .cloned()
            .collect();
        Ok(StoreInfo {
            version: self.backend.get(&self.keys.version())?,
            keys,
            backups,
            bytes_used: self.backend.bytes_used()?,
        })
    }

    fn read_raw(&self, kind: Kind) -> Result<String> {
        Ok(self
            .backend
            .get(&self.keys.collection(kind))?
            .unwrap_or_else(|| "[]".to_string()))
    }

    fn write_collections(&self, underground: &str, government: &str) -> Result<()> {
        self.backend
            .set(&self.keys.collection(Kind::Underground), underground)?;
        self.backend
            .set(&self.keys.collection(Kind::Government), government)?;
        Ok(())
    }

    /// Best effort: failures are logged, never returned.
    ///
    /// A value identical to an existing backup of the same kind is not copied
    /// again; the existing key is reported instead.
    fn backup_raw(&self, millis: i64) -> Vec<String> {
        let mut written = Vec::new();
        let existing = match self.backend.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "could not list existing backups");
                Vec::new()
            }
        };
        for kind in Kind::ALL {
            let raw = match self.backend.get(&self.keys.collection(kind)) {
                Ok(Some(raw)) if !raw.is_empty() => raw,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(%kind, error = %e, "could not read data for backup");
                    continue;
                }
            };
            if let Some(key) = self.find_backup(&existing, kind, &raw) {
                tracing::debug!(%key, "identical backup already present");
                written.push(key);
                continue;
            }
            let key = self.keys.backup(kind, millis);
            match self.backend.set(&key, &raw) {
                Ok(()) => {
                    tracing::info!(%key, "backed up raw data");
                    written.push(key);
                }
                Err(e) => tracing::warn!(%key, error = %e, "backup failed"),
            }
        }
        written
    }

    fn find_backup(&self, keys: &[String], kind: Kind, raw: &str) -> Option<String> {
        let prefix = format!("{}{}", self.keys.collection(kind), BACKUP_MARKER);
        keys.iter()
            .filter(|k| k.starts_with(&prefix) && self.keys.backup_timestamp(k).is_some())
            .find(|k| matches!(self.backend.get(k), Ok(Some(v)) if v == raw))
            .cloned()
    }
}

fn parse_json(kind: Kind, raw: &str) -> Result<Value> {
    serde_json::from_str(raw)
        .map_err(|e| JodHuayError::ParseCorruption(format!("{} data: {}", kind, e)))
}

#[cfg(test)]
mod tests {
    use super::mem_backend::MemBackend;
    use super::*;
    use crate::model::{Catalog, GovernmentType, RecordId, UndergroundType};
    use proptest::prelude::*;

    fn store() -> LotteryStore<MemBackend> {
        LotteryStore::with_backend(MemBackend::new())
    }

    fn ug(number: &str, price: &str, amount: u64) -> UndergroundRecord {
        UndergroundRecord {
            id: RecordId::generate(),
            bet_type: UndergroundType::TwoTop,
            number: number.into(),
            price: price.into(),
            amount,
        }
    }

    fn gov(number: &str, qty: u32) -> GovernmentRecord {
        GovernmentRecord {
            id: RecordId::generate(),
            bet_type: GovernmentType::Back2,
            number: number.into(),
            qty,
        }
    }

    #[test]
    fn keys_follow_prefix() {
        let keys = StorageKeys::default();
        assert_eq!(keys.collection(Kind::Underground), "lottery_underground");
        assert_eq!(keys.version(), "lottery_data_version");
        assert_eq!(
            keys.backup(Kind::Government, 42),
            "lottery_government_backup_42"
        );
        assert_eq!(keys.backup_timestamp("lottery_government_backup_42"), Some(42));
        assert_eq!(keys.backup_timestamp("lottery_government"), None);
        assert_eq!(keys.backup_timestamp("other_x_backup_42"), None);
        assert!(!keys.owns("lotteryx_underground"));
    }

    #[test]
    fn empty_storage_loads_empty() {
        let store = store();
        let loaded = store.load().unwrap();
        assert!(loaded.collections.is_empty());
        assert!(loaded.issues.is_empty());
    }

    #[test]
    fn save_then_load_is_identity_after_validation() {
        let store = store();
        let collections = Collections {
            underground: vec![ug("25", "100 x 50", 0), ug("11", "20", 20)],
            government: vec![gov("34", 0), gov("99", 3)],
        };
        let saved = store.save(&collections).unwrap();
        let expected = Collections {
            underground: validate_and_fix(&collections.underground).records,
            government: validate_and_fix(&collections.government).records,
        };
        assert_eq!(saved.collections, expected);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.collections, expected);
        assert!(loaded.issues.is_empty());
    }

    #[test]
    fn load_writes_back_repaired_data() {
        let store = store();
        store.backend.set("lottery_data_version", "1.1").unwrap();
        store
            .backend
            .set(
                "lottery_government",
                r#"[{"id":1,"type":"back2","number":"34"},{"id":2,"type":"nope","number":"1"}]"#,
            )
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.collections.government.len(), 1);
        assert_eq!(loaded.collections.government[0].qty, 1);
        assert!(matches!(loaded.issues[0], LoadIssue::Repaired(r) if r.dropped == 1 && r.repaired == 1));
        assert_eq!(
            store.backend.get("lottery_government").unwrap().as_deref(),
            Some(r#"[{"id":1,"type":"back2","number":"34","qty":1}]"#)
        );
    }

    #[test]
    fn corrupted_underground_is_backed_up_and_reset() {
        let store = store();
        store.backend.set("lottery_data_version", "1.1").unwrap();
        store.backend.set("lottery_underground", "{oops").unwrap();
        store
            .backend
            .set("lottery_government", r#"[{"id":1,"type":"back2","number":"34","qty":1}]"#)
            .unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.collections.is_empty());
        let LoadIssue::Corrupted { backups, .. } = &loaded.issues[0] else {
            panic!("expected corruption issue, got {:?}", loaded.issues);
        };
        assert_eq!(backups.len(), 2);
        let ug_backup = backups
            .iter()
            .find(|k| k.starts_with("lottery_underground_backup_"))
            .unwrap();
        assert_eq!(store.backend.get(ug_backup).unwrap().as_deref(), Some("{oops"));
    }

    #[test]
    fn corrupted_data_with_old_version_reports_migration_too() {
        let store = store();
        store.backend.set("lottery_underground", "{oops").unwrap();

        let loaded = store.load().unwrap();
        assert!(matches!(loaded.issues[0], LoadIssue::MigrationFailed(_)));
        assert!(matches!(loaded.issues[1], LoadIssue::Corrupted { .. }));
        assert_eq!(store.backend.get("lottery_data_version").unwrap(), None);
    }

    #[test]
    fn legacy_data_is_migrated_on_load() {
        let store = store();
        store
            .backend
            .set(
                "lottery_underground",
                r#"[{"id":1700000000000.25,"type":"3bon","number":"123","price":"10 x กลับ 6"}]"#,
            )
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.collections.underground[0].amount, 60);
        assert!(matches!(
            loaded.migration,
            Some(MigrationOutcome::Migrated { .. })
        ));
        assert!(loaded.issues.is_empty());
    }

    #[test]
    fn quota_recovery_removes_old_backups_and_retries() {
        let backend = MemBackend::new();
        let day = MILLIS_PER_DAY;
        let now = 100 * day;
        backend
            .set(&format!("lottery_underground_backup_{}", now - 8 * day), &"x".repeat(400))
            .unwrap();
        backend
            .set(&format!("lottery_government_backup_{}", now - day), "[]")
            .unwrap();
        backend.set_quota(Some(600));
        let store = LotteryStore::with_backend(backend);

        let collections = Collections {
            underground: (0..4).map(|i| ug(&format!("{:02}", i), "100", 100)).collect(),
            government: vec![],
        };
        let saved = store.save_at(&collections, now).unwrap();

        assert_eq!(saved.cleaned_backups.len(), 1);
        assert_eq!(saved.collections, collections);
        let keys = store.backend.keys().unwrap();
        assert!(keys.contains(&format!("lottery_government_backup_{}", now - day)));
        assert_eq!(store.load().unwrap().collections, collections);
    }

    #[test]
    fn quota_still_exceeded_reports_storage_full() {
        let store = LotteryStore::with_backend(MemBackend::new().with_quota(10));
        let collections = Collections {
            underground: vec![ug("25", "100", 100)],
            government: vec![],
        };
        assert!(matches!(
            store.save(&collections),
            Err(JodHuayError::StorageFull)
        ));
    }

    #[test]
    fn other_write_errors_pass_through() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let store = LotteryStore::with_backend(backend);
        assert!(matches!(
            store.save(&Collections::default()),
            Err(JodHuayError::Store(_))
        ));
    }

    #[test]
    fn cleanup_keeps_recent_and_foreign_keys() {
        let store = store();
        let now = 30 * MILLIS_PER_DAY;
        let old = format!("lottery_underground_backup_{}", now - 7 * MILLIS_PER_DAY - 1);
        let edge = format!("lottery_underground_backup_{}", now - 7 * MILLIS_PER_DAY);
        store.backend.set(&old, "[]").unwrap();
        store.backend.set(&edge, "[]").unwrap();
        store.backend.set("other_underground_backup_1", "[]").unwrap();

        let removed = store.cleanup_old_backups_at(now).unwrap();
        assert_eq!(removed, vec![old]);
        assert!(store.backend.get(&edge).unwrap().is_some());
        assert!(store.backend.get("other_underground_backup_1").unwrap().is_some());
    }

    #[test]
    fn reset_removes_only_prefixed_keys() {
        let store = store();
        store.save(&Collections::default()).unwrap();
        store.backend.set("lottery_data_version", "1.1").unwrap();
        store.backend.set("lottery_underground_backup_5", "[]").unwrap();
        store.backend.set("unrelated", "keep").unwrap();

        assert_eq!(store.reset().unwrap(), 4);
        assert_eq!(store.backend.keys().unwrap(), vec!["unrelated"]);
    }

    #[test]
    fn info_lists_keys_and_backups() {
        let store = store();
        store.load().unwrap();
        store.backend.set("lottery_government_backup_7", "[]").unwrap();
        let info = store.info().unwrap();
        assert_eq!(info.version.as_deref(), Some("1.1"));
        assert_eq!(info.backups, vec!["lottery_government_backup_7"]);
        assert!(info.bytes_used > 0);
    }

    #[test]
    fn failed_migration_leaves_stored_data_untouched() {
        let store = store();
        let raw = r#"[{"id":1,"type":"2bon","number":"25","price":"100","amount":100,"note":"keep"},{"id":2,"type":"4bon","number":"2525","price":"10","amount":10}]"#;
        store.backend.set("lottery_data_version", "2.0").unwrap();
        store.backend.set("lottery_underground", raw).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.issues.len(), 1);
        assert!(matches!(loaded.issues[0], LoadIssue::MigrationFailed(_)));
        assert_eq!(loaded.collections.underground.len(), 1);

        assert_eq!(store.backend.get("lottery_underground").unwrap().as_deref(), Some(raw));
        assert_eq!(store.backend.get("lottery_government").unwrap(), None);
        assert_eq!(
            store.backend.get("lottery_data_version").unwrap().as_deref(),
            Some("2.0")
        );
    }

    #[test]
    fn repeated_corrupted_loads_keep_one_backup() {
        let store = store();
        store.backend.set("lottery_data_version", "1.1").unwrap();
        store.backend.set("lottery_underground", "{oops").unwrap();

        let mut reported = Vec::new();
        for _ in 0..3 {
            let loaded = store.load().unwrap();
            let LoadIssue::Corrupted { backups, .. } = &loaded.issues[0] else {
                panic!("expected corruption issue, got {:?}", loaded.issues);
            };
            reported.push(backups.clone());
        }

        let info = store.info().unwrap();
        assert_eq!(info.backups.len(), 1);
        assert!(reported.iter().all(|b| *b == info.backups));
    }

    #[test]
    fn changed_data_gets_a_new_backup() {
        let store = store();
        store.backend.set("lottery_data_version", "1.1").unwrap();
        store.backend.set("lottery_underground_backup_1", "{old").unwrap();
        store.backend.set("lottery_underground", "{new").unwrap();

        store.load().unwrap();
        assert_eq!(store.info().unwrap().backups.len(), 2);
    }

    fn id_strategy() -> impl Strategy<Value = RecordId> {
        prop_oneof![
            Just(()).prop_map(|_| RecordId::generate()),
            (1u64..2_000_000_000_000).prop_map(|n| RecordId::Legacy(n.into())),
        ]
    }

    fn number_strategy(digits: usize) -> impl Strategy<Value = String> {
        proptest::string::string_regex(&format!("[0-9]{{{}}}", digits)).unwrap()
    }

    fn underground_strategy() -> impl Strategy<Value = UndergroundRecord> {
        (
            id_strategy(),
            0usize..UndergroundType::ALL.len(),
            1u64..10_000,
            proptest::option::of(1u64..1_000),
            any::<bool>(),
        )
            .prop_flat_map(|(id, t, direct, tod, keep_amount)| {
                let bet_type = UndergroundType::ALL[t];
                let (price, amount) = match tod {
                    Some(tod) => (format!("{} x {}", direct, tod), direct + tod),
                    None => (direct.to_string(), direct),
                };
                number_strategy(bet_type.digits()).prop_map(move |number| UndergroundRecord {
                    id: id.clone(),
                    bet_type,
                    number,
                    price: price.clone(),
                    amount: if keep_amount { amount } else { 0 },
                })
            })
    }

    fn government_strategy() -> impl Strategy<Value = GovernmentRecord> {
        (id_strategy(), 0usize..GovernmentType::ALL.len(), 0u32..5).prop_flat_map(
            |(id, t, qty)| {
                let bet_type = GovernmentType::ALL[t];
                number_strategy(bet_type.digits()).prop_map(move |number| GovernmentRecord {
                    id: id.clone(),
                    bet_type,
                    number,
                    qty,
                })
            },
        )
    }

    proptest! {
        #[test]
        fn load_after_save_returns_validated_collections(
            underground in proptest::collection::vec(underground_strategy(), 0..12),
            government in proptest::collection::vec(government_strategy(), 0..12),
        ) {
            let store = store();
            let collections = Collections { underground, government };
            let expected = Collections {
                underground: validate_and_fix(&collections.underground).records,
                government: validate_and_fix(&collections.government).records,
            };

            let saved = store.save(&collections).unwrap();
            prop_assert_eq!(&saved.collections, &expected);

            let loaded = store.load().unwrap();
            prop_assert_eq!(&loaded.collections, &expected);
            prop_assert!(loaded.issues.is_empty());
        }
    }
}
