use crate::book::Book;
use crate::commands::{persist_with, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Record;
use crate::store::backend::StorageBackend;

/// Empties one collection.
pub fn run<R, B>(book: &mut Book<B>) -> Result<CmdResult>
where
    R: Record,
    B: StorageBackend,
{
    let mut result = CmdResult::default();
    let kind = R::KIND;
    let count = book.records::<R>().len();

    if count == 0 {
        result.add_message(CmdMessage::info(format!("No {} records, nothing to clear", kind)));
        return Ok(result);
    }

    if persist_with(book, |records: &mut Vec<R>| records.clear(), &mut result)? {
        tracing::info!(%kind, count, "collection cleared");
        result.add_message(CmdMessage::success(format!(
            "Cleared {} {} record(s)",
            count, kind
        )));
    }
    Ok(result)
}
