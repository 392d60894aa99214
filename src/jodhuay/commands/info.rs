use crate::book::Book;
use crate::commands::{CmdResult, InfoReport};
use crate::error::Result;
use crate::model::Kind;
use crate::store::backend::StorageBackend;

pub fn run<B: StorageBackend>(book: &Book<B>) -> Result<CmdResult> {
    let collections = book.collections();
    let report = InfoReport {
        store: book.store().info()?,
        underground_count: collections.len(Kind::Underground),
        government_count: collections.len(Kind::Government),
    };
    let mut result = CmdResult::default();
    result.info = Some(report);
    Ok(result)
}
