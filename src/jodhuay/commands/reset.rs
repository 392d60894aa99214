use crate::book::Book;
use crate::commands::{CmdMessage, CmdResult, Confirm};
use crate::error::Result;
use crate::store::backend::StorageBackend;

/// Deletes every stored key under the configured prefix, backups included.
pub fn run<B: StorageBackend, C: Confirm>(book: &mut Book<B>, confirm: &mut C) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !confirm.confirm("Delete ALL records and backups? This cannot be undone.") {
        result.add_message(CmdMessage::info("Reset cancelled"));
        return Ok(result);
    }

    let removed = book.store().reset()?;
    book.clear_memory();
    result.add_message(CmdMessage::success(format!(
        "All data cleared ({} stored key(s) removed)",
        removed
    )));
    Ok(result)
}
