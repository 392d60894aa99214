use crate::book::Book;
use crate::commands::{persist_with, CmdMessage, CmdResult};
use crate::error::{JodHuayError, Result};
use crate::index::RecordSelector;
use crate::model::{Catalog, Record};
use crate::store::backend::StorageBackend;

/// Removes the selected records. Selectors that match nothing are reported
/// and skipped.
pub fn run<R, B>(book: &mut Book<B>, selectors: &[RecordSelector]) -> Result<CmdResult>
where
    R: Record,
    B: StorageBackend,
{
    let mut result = CmdResult::default();
    let kind = R::KIND;
    let records = book.records::<R>();

    // Resolve everything against the current order before removing anything.
    let mut targets: Vec<usize> = Vec::new();
    for selector in selectors {
        match selector.resolve(records) {
            Some(idx) if !targets.contains(&idx) => targets.push(idx),
            Some(_) => {}
            None => {
                tracing::debug!(%kind, %selector, "nothing to delete");
                let missing = JodHuayError::RecordNotFound {
                    kind,
                    selector: selector.to_string(),
                };
                result.add_message(CmdMessage::info(missing.to_string()));
            }
        }
    }

    if targets.is_empty() {
        return Ok(result);
    }

    let removed: Vec<R> = targets.iter().map(|&idx| records[idx].clone()).collect();
    let saved = persist_with(
        book,
        |records: &mut Vec<R>| {
            let mut idx = 0;
            records.retain(|_| {
                let keep = !targets.contains(&idx);
                idx += 1;
                keep
            });
        },
        &mut result,
    )?;

    if saved {
        for record in &removed {
            result.add_message(CmdMessage::success(format!(
                "Deleted {} {}",
                record.bet_type().display_name(),
                record.number()
            )));
        }
    }
    Ok(result)
}
