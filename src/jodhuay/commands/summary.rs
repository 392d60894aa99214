use crate::book::Book;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::RecordSelector;
use crate::model::{Catalog, GovernmentRecord, Kind, Record, UndergroundRecord};
use crate::price::decode_amount;
use crate::store::backend::StorageBackend;
use std::fmt::Write;

const HEADER: &str = "JODHUAY - จดหวย";
const RULE: &str = "─────────────";
const CLOSING: &str = "ขอให้โชคดี!";

/// Plain-text summary of one collection, ready to paste into a chat.
///
/// With no selectors every record is included; otherwise only the selected
/// ones, still grouped by type in catalog order.
pub fn run<B: StorageBackend>(
    book: &Book<B>,
    kind: Kind,
    selectors: &[RecordSelector],
) -> Result<CmdResult> {
    let text = match kind {
        Kind::Underground => {
            let records = select(book.records::<UndergroundRecord>(), selectors);
            (!records.is_empty()).then(|| underground_text(&records))
        }
        Kind::Government => {
            let records = select(book.records::<GovernmentRecord>(), selectors);
            (!records.is_empty()).then(|| government_text(&records))
        }
    };

    match text {
        Some(text) => Ok(CmdResult::default().with_text(text)),
        None => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(format!("No {} records to summarize", kind)));
            Ok(result)
        }
    }
}

fn select<'a, R: Record>(records: &'a [R], selectors: &[RecordSelector]) -> Vec<&'a R> {
    if selectors.is_empty() {
        return records.iter().collect();
    }
    let mut picked: Vec<usize> = selectors
        .iter()
        .filter_map(|s| s.resolve(records))
        .collect();
    picked.sort_unstable();
    picked.dedup();
    picked.into_iter().map(|i| &records[i]).collect()
}

/// Writes the `[ name ]` sections in catalog order, skipping empty types.
fn write_groups<R: Record>(text: &mut String, records: &[&R], line: impl Fn(&R) -> String) {
    for bet_type in <R::Type as Catalog>::ALL {
        let group: Vec<&&R> = records.iter().filter(|r| r.bet_type() == *bet_type).collect();
        if group.is_empty() {
            continue;
        }
        let _ = write!(text, "\n[ {} ]\n", bet_type.display_name());
        for record in group {
            text.push_str(&line(*record));
            text.push('\n');
        }
    }
}

pub fn underground_text(records: &[&UndergroundRecord]) -> String {
    let mut text = format!("{}\n{}\n", HEADER, RULE);
    write_groups(&mut text, records, |r| format!("{} = {}", r.number, r.price));

    let total = records.iter().fold(0u64, |sum, r| {
        let amount = if r.amount > 0 {
            r.amount
        } else {
            decode_amount(&r.price)
        };
        sum.saturating_add(amount)
    });

    let _ = write!(
        text,
        "\n{}\nรวม {} รายการ\nยอดรวม: {} บาท\n{}",
        RULE,
        records.len(),
        group_thousands(total),
        CLOSING
    );
    text
}

pub fn government_text(records: &[&GovernmentRecord]) -> String {
    let mut text = format!("{}\n{}\n", HEADER, RULE);
    write_groups(&mut text, records, |r| {
        if r.qty > 1 {
            format!("{} ({} ใบ)", r.number, r.qty)
        } else {
            r.number.clone()
        }
    });
    let _ = write!(text, "\n{}\nรวม {} รายการ\n{}", RULE, records.len(), CLOSING);
    text
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
