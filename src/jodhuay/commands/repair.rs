use crate::book::Book;
use crate::commands::{issue_messages, persist, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::LoadIssue;

/// Re-reads storage, revalidates everything and writes the result back.
pub fn run<B: StorageBackend>(book: &mut Book<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let issues = book.reload()?;
    let repaired = issues
        .iter()
        .any(|i| matches!(i, LoadIssue::Repaired(_) | LoadIssue::Corrupted { .. }));
    result.messages.extend(issue_messages(&issues));

    let next = book.collections().clone();
    if persist(book, next, &mut result)? {
        let collections = book.collections();
        let summary = format!(
            "Checked {} underground and {} government record(s)",
            collections.underground.len(),
            collections.government.len()
        );
        if repaired {
            result.add_message(CmdMessage::success(summary));
        } else {
            result.add_message(CmdMessage::info(format!("{}, nothing to fix", summary)));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::book;
    use crate::commands::MessageLevel;
    use crate::model::GovernmentRecord;

    #[test]
    fn fixes_data_written_behind_our_back() {
        let mut book = book();
        book.store()
            .backend()
            .set(
                "lottery_government",
                r#"[{"id":1,"type":"back2","number":"34","qty":0},{"id":0,"type":"back2","number":"35"}]"#,
            )
            .unwrap();

        let result = run(&mut book).unwrap();
        assert_eq!(book.records::<GovernmentRecord>().len(), 1);
        assert_eq!(book.records::<GovernmentRecord>()[0].qty, 1);
        assert!(result.messages.iter().any(|m| m.content.contains("1 dropped, 1 repaired")));
        assert_eq!(result.messages.last().unwrap().level, MessageLevel::Success);
    }

    #[test]
    fn clean_data_reports_nothing_to_fix() {
        let mut book = book();
        let result = run(&mut book).unwrap();
        assert_eq!(result.messages.len(), 1);
        assert!(result.messages[0].content.ends_with("nothing to fix"));
    }
}
