use crate::book::Book;
use crate::commands::{CmdResult, Totals};
use crate::error::Result;
use crate::index::DisplayRecord;
use crate::model::{
    Catalog, Collections, GovernmentRecord, GovernmentType, Kind, Record, UndergroundRecord,
    UndergroundType,
};
use crate::store::backend::StorageBackend;

/// A filtered, read-only view over one collection.
///
/// Nothing is computed until [`Query::iter`] is called, and `iter` can be
/// called any number of times. Positions are the records' 1-based positions
/// in the full collection, not in the filtered result.
pub struct Query<'a, R: Record> {
    records: &'a [R],
    bet_type: Option<R::Type>,
    needle: Option<String>,
}

impl<'a, R: Record> Query<'a, R> {
    pub fn new(records: &'a [R]) -> Self {
        Self {
            records,
            bet_type: None,
            needle: None,
        }
    }

    /// Only records of exactly this type.
    pub fn of_type(mut self, bet_type: R::Type) -> Self {
        self.bet_type = Some(bet_type);
        self
    }

    /// Case-insensitive substring match against the number, the type's
    /// display name, and the price for underground records. Blank text
    /// matches everything.
    pub fn matching(mut self, text: &str) -> Self {
        let text = text.trim();
        self.needle = (!text.is_empty()).then(|| text.to_lowercase());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a R)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, r)| self.accepts(r))
            .map(|(i, r)| (i + 1, r))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn collect_display(&self) -> Vec<DisplayRecord<R>> {
        self.iter()
            .map(|(position, record)| DisplayRecord {
                position,
                record: record.clone(),
            })
            .collect()
    }

    fn accepts(&self, record: &R) -> bool {
        if self.bet_type.is_some_and(|t| t != record.bet_type()) {
            return false;
        }
        let Some(needle) = &self.needle else {
            return true;
        };
        record.number().to_lowercase().contains(needle)
            || record
                .bet_type()
                .display_name()
                .to_lowercase()
                .contains(needle)
            || record
                .search_text()
                .is_some_and(|s| s.to_lowercase().contains(needle))
    }
}

pub fn totals(collections: &Collections) -> Totals {
    Totals {
        underground_count: collections.underground.len(),
        underground_amount: collections
            .underground
            .iter()
            .fold(0u64, |sum, r| sum.saturating_add(r.amount)),
        government_count: collections.government.len(),
        government_tickets: collections
            .government
            .iter()
            .map(|r| u64::from(r.qty))
            .sum(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Restrict to one collection; both when unset.
    pub kind: Option<Kind>,
    pub underground_type: Option<UndergroundType>,
    pub government_type: Option<GovernmentType>,
    pub text: Option<String>,
}

/// Filtered records of the requested collections plus totals over
/// everything stored.
pub fn list<B: StorageBackend>(book: &Book<B>, filter: &ListFilter) -> Result<CmdResult> {
    let mut result = CmdResult::default().with_totals(totals(book.collections()));
    let text = filter.text.as_deref().unwrap_or("");

    if filter.kind != Some(Kind::Government) {
        let mut query = Query::new(book.records::<UndergroundRecord>()).matching(text);
        if let Some(t) = filter.underground_type {
            query = query.of_type(t);
        }
        result.listed_underground = query.collect_display();
    }
    if filter.kind != Some(Kind::Underground) {
        let mut query = Query::new(book.records::<GovernmentRecord>()).matching(text);
        if let Some(t) = filter.government_type {
            query = query.of_type(t);
        }
        result.listed_government = query.collect_display();
    }

    Ok(result)
}
