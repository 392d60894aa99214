//! # Record Selection
//!
//! Records are stored with opaque ids (UUIDs for new entries, millisecond
//! timestamps for data written by older versions). Nobody wants to type
//! those, so the CLI addresses records by their 1-based position in the
//! collection's insertion order, the same order used for display and export.
//!
//! A selector is either a position (`3`) or an id string. Any plain integer
//! up to [`MAX_POSITION`] is a position; legacy numeric ids are far larger,
//! so the two never collide. Ids that look like small numbers are reached
//! with the explicit `id:` form (`id:123`).

use crate::model::Record;
use std::fmt;
use std::str::FromStr;

pub const MAX_POSITION: usize = 1_000_000;
const ID_PREFIX: &str = "id:";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordSelector {
    Position(usize),
    Id(String),
}

impl fmt::Display for RecordSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSelector::Position(p) => write!(f, "{}", p),
            RecordSelector::Id(id) => write!(f, "id {}", id),
        }
    }
}

impl FromStr for RecordSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(id) = s.strip_prefix(ID_PREFIX) {
            let id = id.trim();
            if id.is_empty() {
                return Err("Empty record id".to_string());
            }
            return Ok(RecordSelector::Id(id.to_string()));
        }
        let s = s.trim_start_matches('#');
        if s.is_empty() {
            return Err("Empty record selector".to_string());
        }
        match s.parse::<usize>() {
            Ok(0) => Err("Positions start at 1".to_string()),
            Ok(n) if n <= MAX_POSITION => Ok(RecordSelector::Position(n)),
            _ => Ok(RecordSelector::Id(s.to_string())),
        }
    }
}

impl RecordSelector {
    /// Zero-based index of the selected record, if present.
    pub fn resolve<R: Record>(&self, records: &[R]) -> Option<usize> {
        match self {
            RecordSelector::Position(p) => (1..=records.len()).contains(p).then(|| p - 1),
            RecordSelector::Id(id) => records.iter().position(|r| r.id().to_string() == *id),
        }
    }
}

/// A record paired with its 1-based display position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord<R> {
    pub position: usize,
    pub record: R,
}
