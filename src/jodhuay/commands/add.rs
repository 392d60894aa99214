use crate::book::Book;
use crate::commands::{persist_with, CmdMessage, CmdResult};
use crate::error::{JodHuayError, Rejection, Result};
use crate::model::{
    Catalog, GovernmentRecord, GovernmentType, RecordId, UndergroundRecord, UndergroundType,
};
use crate::price::{Price, Reversal};
use crate::store::backend::StorageBackend;

/// Underground entry form fields as typed by the user.
#[derive(Debug, Clone)]
pub struct UndergroundEntry {
    pub bet_type: UndergroundType,
    pub number: String,
    pub direct: String,
    pub tod: Option<String>,
    pub reversal: Option<Reversal>,
}

impl UndergroundEntry {
    pub fn into_record(self) -> std::result::Result<UndergroundRecord, Rejection> {
        let number = normalize_number(&self.number, self.bet_type)?;
        let price = Price::from_form(&self.direct, self.tod.as_deref(), self.reversal)?;
        Ok(UndergroundRecord {
            id: RecordId::generate(),
            bet_type: self.bet_type,
            number,
            price: price.to_string(),
            amount: price.amount(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct GovernmentEntry {
    pub bet_type: GovernmentType,
    pub number: String,
    /// Blank means one ticket.
    pub qty: Option<i64>,
}

impl GovernmentEntry {
    pub fn into_record(self) -> std::result::Result<GovernmentRecord, Rejection> {
        let number = normalize_number(&self.number, self.bet_type)?;
        let qty = match self.qty {
            None => 1,
            Some(n) if n >= 1 => u32::try_from(n).map_err(|_| Rejection::NonPositiveQty)?,
            Some(_) => return Err(Rejection::NonPositiveQty),
        };
        Ok(GovernmentRecord {
            id: RecordId::generate(),
            bet_type: self.bet_type,
            number,
            qty,
        })
    }
}

/// Strips whitespace and checks the digit count for `bet_type`.
pub fn normalize_number<T: Catalog>(
    raw: &str,
    bet_type: T,
) -> std::result::Result<String, Rejection> {
    let number: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(Rejection::NonNumeric);
    }
    if number.len() != bet_type.digits() {
        return Err(Rejection::WrongDigitCount {
            expected: bet_type.digits(),
        });
    }
    Ok(number)
}

pub fn underground<B: StorageBackend>(
    book: &mut Book<B>,
    entry: UndergroundEntry,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let record = match entry.into_record() {
        Ok(record) => record,
        Err(rejection) => {
            result.add_message(CmdMessage::error(JodHuayError::from(rejection).to_string()));
            return Ok(result);
        }
    };

    let added = record.clone();
    if persist_with(book, |records: &mut Vec<UndergroundRecord>| records.push(record), &mut result)? {
        tracing::debug!(id = %added.id, "underground record added");
        result.add_message(CmdMessage::success(format!(
            "Added {} {} = {}",
            added.bet_type, added.number, added.price
        )));
    }
    result.affected_underground.push(added);
    Ok(result)
}

pub fn government<B: StorageBackend>(
    book: &mut Book<B>,
    entry: GovernmentEntry,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let record = match entry.into_record() {
        Ok(record) => record,
        Err(rejection) => {
            result.add_message(CmdMessage::error(JodHuayError::from(rejection).to_string()));
            return Ok(result);
        }
    };

    let added = record.clone();
    if persist_with(book, |records: &mut Vec<GovernmentRecord>| records.push(record), &mut result)? {
        tracing::debug!(id = %added.id, "government record added");
        result.add_message(CmdMessage::success(format!(
            "Added {} {} ({} ใบ)",
            added.bet_type, added.number, added.qty
        )));
    }
    result.affected_government.push(added);
    Ok(result)
}
