use crate::book::Book;
use crate::commands::{persist, CmdMessage, CmdResult, Confirm};
use crate::error::{JodHuayError, Result};
use crate::model::{Collections, GovernmentRecord, UndergroundRecord};
use crate::store::backend::StorageBackend;
use crate::validate::{validate_raw, Validated};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Contents of a backup file after validation, before anything is replaced.
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub underground: Validated<UndergroundRecord>,
    pub government: Validated<GovernmentRecord>,
}

impl ImportPlan {
    /// Both arrays must be present; entries are then validated like stored data.
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| JodHuayError::InvalidImport(format!("not JSON: {}", e)))?;

        Ok(Self {
            underground: validate_raw(array_field(&value, "underground")?),
            government: validate_raw(array_field(&value, "government")?),
        })
    }

    pub fn prompt(&self) -> String {
        format!(
            "Found:\n- underground: {} record(s)\n- government: {} record(s)\n\nImport and replace the current data?",
            self.underground.records.len(),
            self.government.records.len()
        )
    }
}

fn array_field<'a>(value: &'a Value, name: &str) -> Result<&'a Value> {
    value
        .get(name)
        .filter(|v| v.is_array())
        .ok_or_else(|| JodHuayError::InvalidImport(format!("missing '{}' list", name)))
}

/// Replaces both collections with the contents of a backup file.
///
/// The current stored data is copied to backup keys first.
pub fn run<B: StorageBackend, C: Confirm>(
    book: &mut Book<B>,
    path: &Path,
    confirm: &mut C,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let plan = match fs::read_to_string(path)
        .map_err(JodHuayError::Io)
        .and_then(|content| ImportPlan::parse(&content))
    {
        Ok(plan) => plan,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "import rejected");
            result.add_message(CmdMessage::error(format!(
                "Cannot import {}: {}",
                path.display(),
                e
            )));
            return Ok(result);
        }
    };

    if !confirm.confirm(&plan.prompt()) {
        result.add_message(CmdMessage::info("Import cancelled"));
        return Ok(result);
    }

    let backups = book.store().backup_current();
    if !backups.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Previous data backed up as {}",
            backups.join(", ")
        )));
    }

    let mut report = plan.underground.report;
    report.merge(plan.government.report);
    let next = Collections {
        underground: plan.underground.records,
        government: plan.government.records,
    };
    let (ug_count, gov_count) = (next.underground.len(), next.government.len());

    if persist(book, next, &mut result)? {
        if report.dropped > 0 {
            result.add_message(CmdMessage::warning(format!(
                "Skipped {} invalid record(s) from the file",
                report.dropped
            )));
        }
        result.add_message(CmdMessage::success(format!(
            "Imported {} underground and {} government record(s)",
            ug_count, gov_count
        )));
    }
    Ok(result)
}
