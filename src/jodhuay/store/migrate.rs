//! Schema version upgrades.
//!
//! The stored version tag walks a fixed chain (`1.0 -> 1.1 -> ...`). Steps
//! run against an in-memory snapshot; only when every step succeeded are the
//! changed values written, data first and the version tag last. A failed
//! step therefore leaves storage exactly as it was, and because each step
//! only fills in missing fields, re-running after a partial write is safe.

use super::backend::StorageBackend;
use super::StorageKeys;
use crate::error::{JodHuayError, Result};
use crate::price::decode_amount;
use crate::validate::raw_price;
use serde_json::Value;

pub const CURRENT_VERSION: &str = "1.1";
pub const BASE_VERSION: &str = "1.0";

struct Step {
    from: &'static str,
    to: &'static str,
    apply: fn(&mut Snapshot) -> std::result::Result<(), String>,
}

const STEPS: &[Step] = &[Step {
    from: "1.0",
    to: "1.1",
    apply: add_amounts,
}];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    UpToDate,
    Migrated { from: String, to: String },
}

/// Stored values touched by migration steps, parsed on first use.
struct Snapshot {
    underground_raw: Option<String>,
    underground: Option<Value>,
    underground_dirty: bool,
}

impl Snapshot {
    fn underground(&mut self) -> std::result::Result<Option<&mut Value>, String> {
        if self.underground.is_none() {
            if let Some(raw) = &self.underground_raw {
                let parsed: Value = serde_json::from_str(raw)
                    .map_err(|e| format!("underground data is not valid JSON: {}", e))?;
                self.underground = Some(parsed);
            }
        }
        Ok(self.underground.as_mut())
    }
}

pub fn migrate<B: StorageBackend>(backend: &B, keys: &StorageKeys) -> Result<MigrationOutcome> {
    let stored = backend
        .get(&keys.version())?
        .unwrap_or_else(|| BASE_VERSION.to_string());

    if stored == CURRENT_VERSION {
        return Ok(MigrationOutcome::UpToDate);
    }

    tracing::info!(from = %stored, to = CURRENT_VERSION, "migrating stored data");

    let failure = |reason: String| JodHuayError::MigrationFailure {
        from: stored.clone(),
        to: CURRENT_VERSION.to_string(),
        reason,
    };

    let mut snapshot = Snapshot {
        underground_raw: backend.get(&keys.collection(crate::model::Kind::Underground))?,
        underground: None,
        underground_dirty: false,
    };

    let mut version = stored.as_str();
    while version != CURRENT_VERSION {
        let step = STEPS
            .iter()
            .find(|s| s.from == version)
            .ok_or_else(|| failure(format!("unknown data version '{}'", version)))?;
        (step.apply)(&mut snapshot).map_err(&failure)?;
        tracing::debug!(from = step.from, to = step.to, "migration step applied");
        version = step.to;
    }

    if snapshot.underground_dirty {
        if let Some(value) = &snapshot.underground {
            let encoded = serde_json::to_string(value)?;
            backend.set(&keys.collection(crate::model::Kind::Underground), &encoded)?;
        }
    }
    backend.set(&keys.version(), CURRENT_VERSION)?;

    tracing::info!(from = %stored, to = CURRENT_VERSION, "migration completed");
    Ok(MigrationOutcome::Migrated {
        from: stored.clone(),
        to: CURRENT_VERSION.to_string(),
    })
}

/// 1.0 -> 1.1: underground records gain a stored `amount`.
fn add_amounts(snapshot: &mut Snapshot) -> std::result::Result<(), String> {
    if let Some(value) = snapshot.underground()? {
        if backfill_amounts(value) {
            snapshot.underground_dirty = true;
        }
    }
    Ok(())
}

/// Fills `amount` from `price` on every entry whose amount is missing or zero.
/// Non-zero amounts are never overwritten. Returns whether anything changed.
pub fn backfill_amounts(underground: &mut Value) -> bool {
    let Some(items) = underground.as_array_mut() else {
        return false;
    };

    let mut changed = false;
    for item in items.iter_mut().filter_map(Value::as_object_mut) {
        let has_amount = item
            .get("amount")
            .and_then(Value::as_f64)
            .is_some_and(|a| a != 0.0);
        if has_amount {
            continue;
        }
        let price = item.get("price").and_then(raw_price).unwrap_or_default();
        let amount = decode_amount(&price);
        let new_value = Value::from(amount);
        if item.get("amount") != Some(&new_value) {
            item.insert("amount".to_string(), new_value);
            changed = true;
        }
    }
    changed
}
