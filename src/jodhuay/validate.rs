//! Structural validation and repair of stored records.
//!
//! Validation never fails. Entries that cannot be interpreted are dropped,
//! recoverable defects (missing `amount`, missing or non-positive `qty`) are
//! filled in, and the surviving records come back as new values in their
//! original order.
//!
//! Two entry points share the same rules:
//! - [`validate_raw`] for untyped JSON coming from storage or an import file
//! - [`validate_and_fix`] for typed collections about to be persisted

use crate::model::{
    Catalog, GovernmentRecord, GovernmentType, Record, RecordId, UndergroundRecord,
    UndergroundType,
};
use crate::price::decode_amount;
use serde_json::{Map, Value};

/// What a validation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Entries removed because they could not be interpreted.
    pub dropped: usize,
    /// Entries kept after a field was backfilled.
    pub repaired: usize,
    /// Underground entries kept although their price yields no amount.
    pub unpriced: usize,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.dropped == 0 && self.repaired == 0
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.dropped += other.dropped;
        self.repaired += other.repaired;
        self.unpriced += other.unpriced;
    }
}

#[derive(Debug, Clone)]
pub struct Validated<R> {
    pub records: Vec<R>,
    pub report: ValidationReport,
}

/// One record after inspection: kept as-is or kept with a backfilled field.
#[derive(Debug, Clone)]
pub struct Checked<R> {
    pub record: R,
    pub repaired: bool,
}

/// Per-shape acceptance rules.
pub trait Validate: Record + Sized {
    /// Interprets one untyped entry. `None` drops it.
    fn from_raw(entry: &Map<String, Value>) -> Option<Checked<Self>>;

    /// Re-checks an already typed record. `None` drops it.
    fn check(&self) -> Option<Checked<Self>>;

    /// True when the record carries no usable amount.
    fn is_unpriced(&self) -> bool {
        false
    }
}

pub fn validate_raw<R: Validate>(value: &Value) -> Validated<R> {
    let Some(entries) = value.as_array() else {
        return Validated {
            records: Vec::new(),
            report: ValidationReport::default(),
        };
    };

    collect(entries.iter().map(|entry| entry.as_object().and_then(R::from_raw)), entries.len())
}

pub fn validate_and_fix<R: Validate>(records: &[R]) -> Validated<R> {
    collect(records.iter().map(R::check), records.len())
}

fn collect<R: Validate>(
    checked: impl Iterator<Item = Option<Checked<R>>>,
    total: usize,
) -> Validated<R> {
    let mut report = ValidationReport::default();
    let mut records = Vec::with_capacity(total);

    for item in checked {
        match item {
            Some(c) => {
                if c.repaired {
                    report.repaired += 1;
                }
                if c.record.is_unpriced() {
                    report.unpriced += 1;
                }
                records.push(c.record);
            }
            None => report.dropped += 1,
        }
    }

    let kind = R::KIND;
    if report.dropped > 0 || report.repaired > 0 {
        tracing::debug!(
            kind = %kind,
            dropped = report.dropped,
            repaired = report.repaired,
            "validation changed collection"
        );
    }
    if report.unpriced > 0 {
        tracing::warn!(kind = %kind, count = report.unpriced, "records with unreadable price");
    }

    Validated { records, report }
}

fn raw_id(entry: &Map<String, Value>) -> Option<RecordId> {
    let id: RecordId = serde_json::from_value(entry.get("id")?.clone()).ok()?;
    (!id.is_blank()).then_some(id)
}

fn raw_number(entry: &Map<String, Value>) -> Option<String> {
    entry
        .get("number")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Price text of a raw entry. Older data sometimes stored a bare number.
pub(crate) fn raw_price(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn raw_type<T: Catalog>(entry: &Map<String, Value>) -> Option<T> {
    T::from_code(entry.get("type")?.as_str()?)
}

impl Validate for UndergroundRecord {
    fn from_raw(entry: &Map<String, Value>) -> Option<Checked<Self>> {
        let id = raw_id(entry)?;
        let number = raw_number(entry)?;
        let bet_type: UndergroundType = raw_type(entry)?;
        let raw = entry.get("price")?;
        let price = raw_price(raw)?;
        let converted = !raw.is_string();

        let stored = entry.get("amount").and_then(Value::as_u64).filter(|a| *a > 0);
        let (amount, repaired) = match stored {
            Some(a) => (a, converted),
            None => (decode_amount(&price), true),
        };

        Some(Checked {
            record: UndergroundRecord {
                id,
                bet_type,
                number,
                price,
                amount,
            },
            repaired,
        })
    }

    fn check(&self) -> Option<Checked<Self>> {
        if self.id.is_blank() || self.number.is_empty() || self.price.is_empty() {
            return None;
        }
        if self.amount > 0 {
            return Some(Checked {
                record: self.clone(),
                repaired: false,
            });
        }
        Some(Checked {
            record: UndergroundRecord {
                amount: decode_amount(&self.price),
                ..self.clone()
            },
            repaired: true,
        })
    }

    fn is_unpriced(&self) -> bool {
        self.amount == 0
    }
}

impl Validate for GovernmentRecord {
    fn from_raw(entry: &Map<String, Value>) -> Option<Checked<Self>> {
        let id = raw_id(entry)?;
        let number = raw_number(entry)?;
        let bet_type: GovernmentType = raw_type(entry)?;

        let stored = entry
            .get("qty")
            .and_then(Value::as_u64)
            .filter(|q| *q > 0)
            .map(|q| u32::try_from(q).unwrap_or(u32::MAX));
        let (qty, repaired) = match stored {
            Some(q) => (q, false),
            None => (1, true),
        };

        Some(Checked {
            record: GovernmentRecord {
                id,
                bet_type,
                number,
                qty,
            },
            repaired,
        })
    }

    fn check(&self) -> Option<Checked<Self>> {
        if self.id.is_blank() || self.number.is_empty() {
            return None;
        }
        if self.qty > 0 {
            return Some(Checked {
                record: self.clone(),
                repaired: false,
            });
        }
        Some(Checked {
            record: GovernmentRecord {
                qty: 1,
                ..self.clone()
            },
            repaired: true,
        })
    }
}
