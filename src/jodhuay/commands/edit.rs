use crate::book::Book;
use crate::commands::add::normalize_number;
use crate::commands::{persist_with, CmdMessage, CmdResult};
use crate::error::{JodHuayError, Rejection, Result};
use crate::index::RecordSelector;
use crate::model::{GovernmentRecord, GovernmentType, Record, UndergroundRecord, UndergroundType};
use crate::price::{Price, Reversal, Secondary};
use crate::store::backend::StorageBackend;

/// A set of field changes for one record shape. Unset fields keep the
/// existing value; the merged record is checked with the same rules as `add`.
pub trait Edit {
    type Target: Record;

    fn apply(self, existing: &Self::Target) -> std::result::Result<Self::Target, Rejection>;
}

#[derive(Debug, Clone, Default)]
pub struct UndergroundEdit {
    pub bet_type: Option<UndergroundType>,
    pub number: Option<String>,
    pub direct: Option<String>,
    /// A blank value removes the tod stake.
    pub tod: Option<String>,
    pub reversal: Option<Reversal>,
}

impl Edit for UndergroundEdit {
    type Target = UndergroundRecord;

    fn apply(self, existing: &UndergroundRecord) -> std::result::Result<UndergroundRecord, Rejection> {
        let bet_type = self.bet_type.unwrap_or(existing.bet_type);
        let number = normalize_number(self.number.as_deref().unwrap_or(&existing.number), bet_type)?;

        let current = Price::parse_lenient(&existing.price);
        let direct = match (self.direct, current) {
            (Some(d), _) => d,
            (None, Some(p)) => p.direct().to_string(),
            (None, None) => String::new(),
        };
        let (tod, reversal) = match (self.reversal, self.tod, current.map(|p| p.secondary())) {
            (Some(r), _, _) => (None, Some(r)),
            (None, Some(t), _) => (Some(t), None),
            (None, None, Some(Secondary::Tod(t))) => (Some(t.to_string()), None),
            (None, None, Some(Secondary::Reversed(r))) => (None, Some(r)),
            (None, None, _) => (None, None),
        };
        let price = Price::from_form(&direct, tod.as_deref(), reversal)?;

        Ok(UndergroundRecord {
            id: existing.id.clone(),
            bet_type,
            number,
            price: price.to_string(),
            amount: price.amount(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct GovernmentEdit {
    pub bet_type: Option<GovernmentType>,
    pub number: Option<String>,
    pub qty: Option<i64>,
}

impl Edit for GovernmentEdit {
    type Target = GovernmentRecord;

    fn apply(self, existing: &GovernmentRecord) -> std::result::Result<GovernmentRecord, Rejection> {
        let bet_type = self.bet_type.unwrap_or(existing.bet_type);
        let number = normalize_number(self.number.as_deref().unwrap_or(&existing.number), bet_type)?;
        let qty = match self.qty {
            None => existing.qty,
            Some(n) if n >= 1 => u32::try_from(n).map_err(|_| Rejection::NonPositiveQty)?,
            Some(_) => return Err(Rejection::NonPositiveQty),
        };
        Ok(GovernmentRecord {
            id: existing.id.clone(),
            bet_type,
            number,
            qty,
        })
    }
}

/// Edits one record in place. With `edit_moves_to_end` set the edited record
/// is moved to the end of its collection instead, keeping its id.
pub fn run<E, B>(book: &mut Book<B>, selector: &RecordSelector, edit: E) -> Result<CmdResult>
where
    E: Edit,
    B: StorageBackend,
{
    let mut result = CmdResult::default();
    let kind = <E::Target as Record>::KIND;
    let records = book.records::<E::Target>();

    let Some(idx) = selector.resolve(records) else {
        let missing = JodHuayError::RecordNotFound {
            kind,
            selector: selector.to_string(),
        };
        result.add_message(CmdMessage::error(missing.to_string()));
        return Ok(result);
    };

    let updated = match edit.apply(&records[idx]) {
        Ok(record) => record,
        Err(rejection) => {
            result.add_message(CmdMessage::error(JodHuayError::from(rejection).to_string()));
            return Ok(result);
        }
    };

    let move_to_end = book.edit_moves_to_end();
    let replacement = updated.clone();
    let saved = persist_with(
        book,
        |records: &mut Vec<E::Target>| {
            if move_to_end {
                records.remove(idx);
                records.push(replacement);
            } else {
                records[idx] = replacement;
            }
        },
        &mut result,
    )?;

    if saved {
        tracing::debug!(%kind, id = %updated.id(), move_to_end, "record edited");
        result.add_message(CmdMessage::success(format!("Updated {} record {}", kind, selector)));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add::{self, GovernmentEntry, UndergroundEntry};
    use crate::commands::test_support::{book, book_with};
    use crate::config::AppConfig;
    use crate::store::mem_backend::MemBackend;

    fn add_ug(book: &mut Book<MemBackend>, number: &str, direct: &str, tod: Option<&str>) {
        let entry = UndergroundEntry {
            bet_type: UndergroundType::TwoTop,
            number: number.into(),
            direct: direct.into(),
            tod: tod.map(Into::into),
            reversal: None,
        };
        add::underground(book, entry).unwrap();
    }

    #[test]
    fn edits_in_place_keeping_id() {
        let mut book = book();
        add_ug(&mut book, "11", "10", None);
        add_ug(&mut book, "22", "20", None);
        let id = book.records::<UndergroundRecord>()[0].id.clone();

        let edit = UndergroundEdit {
            number: Some("99".into()),
            ..Default::default()
        };
        run(&mut book, &RecordSelector::Position(1), edit).unwrap();

        let records = book.records::<UndergroundRecord>();
        assert_eq!(records[0].number, "99");
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].price, "10");
        assert_eq!(records[1].number, "22");
    }

    #[test]
    fn legacy_mode_moves_record_to_end() {
        let config = AppConfig {
            edit_moves_to_end: true,
            ..AppConfig::default()
        };
        let mut book = book_with(config);
        add_ug(&mut book, "11", "10", None);
        add_ug(&mut book, "22", "20", None);
        let id = book.records::<UndergroundRecord>()[0].id.clone();

        let edit = UndergroundEdit {
            direct: Some("15".into()),
            ..Default::default()
        };
        run(&mut book, &RecordSelector::Position(1), edit).unwrap();

        let records = book.records::<UndergroundRecord>();
        assert_eq!(records[1].id, id);
        assert_eq!(records[1].amount, 15);
    }

    #[test]
    fn price_changes_merge_with_existing_stakes() {
        let mut book = book();
        add_ug(&mut book, "11", "100", Some("50"));

        let edit = UndergroundEdit {
            direct: Some("200".into()),
            ..Default::default()
        };
        run(&mut book, &RecordSelector::Position(1), edit).unwrap();
        assert_eq!(book.records::<UndergroundRecord>()[0].price, "200 x 50");

        let edit = UndergroundEdit {
            reversal: Some(Reversal::Three),
            ..Default::default()
        };
        run(&mut book, &RecordSelector::Position(1), edit).unwrap();
        let record = &book.records::<UndergroundRecord>()[0];
        assert_eq!(record.price, "200 x กลับ 3");
        assert_eq!(record.amount, 600);

        let edit = UndergroundEdit {
            tod: Some(String::new()),
            ..Default::default()
        };
        run(&mut book, &RecordSelector::Position(1), edit).unwrap();
        assert_eq!(book.records::<UndergroundRecord>()[0].price, "200");
    }

    #[test]
    fn type_change_revalidates_number() {
        let mut book = book();
        add_ug(&mut book, "11", "10", None);

        let edit = UndergroundEdit {
            bet_type: Some(UndergroundType::ThreeTop),
            ..Default::default()
        };
        let result = run(&mut book, &RecordSelector::Position(1), edit).unwrap();
        assert!(result.has_errors());
        assert_eq!(
            book.records::<UndergroundRecord>()[0].bet_type,
            UndergroundType::TwoTop
        );
    }

    #[test]
    fn government_qty_edit() {
        let mut book = book();
        let entry = GovernmentEntry {
            bet_type: GovernmentType::Back3,
            number: "123".into(),
            qty: Some(2),
        };
        add::government(&mut book, entry).unwrap();

        let edit = GovernmentEdit {
            qty: Some(5),
            ..Default::default()
        };
        run(&mut book, &RecordSelector::Position(1), edit).unwrap();
        assert_eq!(book.records::<GovernmentRecord>()[0].qty, 5);

        let edit = GovernmentEdit {
            qty: Some(-1),
            ..Default::default()
        };
        let result = run(&mut book, &RecordSelector::Position(1), edit).unwrap();
        assert!(result.has_errors());
        assert_eq!(book.records::<GovernmentRecord>()[0].qty, 5);
    }

    #[test]
    fn unknown_selector_is_reported() {
        let mut book = book();
        let result = run(
            &mut book,
            &RecordSelector::Id("nope".into()),
            GovernmentEdit::default(),
        )
        .unwrap();
        assert!(result.has_errors());
        assert_eq!(result.messages[0].content, "No government record at id nope");
    }
}
