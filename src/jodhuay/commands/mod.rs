//! # Commands
//!
//! One module per user operation. Every command takes the [`Book`] (or the
//! config directory) plus already-parsed arguments and returns a
//! [`CmdResult`]: the data to display and a list of [`CmdMessage`]s.
//!
//! Commands never print. Anything the user should hear about, including
//! recoverable failures like a rejected entry or a full disk, comes back as a
//! message. Only faults the command cannot work around are returned as `Err`.

use crate::book::Book;
use crate::config::AppConfig;
use crate::error::{JodHuayError, Result};
use crate::index::DisplayRecord;
use crate::model::{Collections, GovernmentRecord, Record, UndergroundRecord};
use crate::store::backend::StorageBackend;
use crate::store::{LoadIssue, Saved, StoreInfo};
use std::path::PathBuf;

pub mod add;
pub mod clear;
pub mod config;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod info;
pub mod query;
pub mod repair;
pub mod reset;
pub mod summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Running totals over both collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub underground_count: usize,
    pub underground_amount: u64,
    pub government_count: usize,
    pub government_tickets: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoReport {
    pub store: StoreInfo,
    pub underground_count: usize,
    pub government_count: usize,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_underground: Vec<UndergroundRecord>,
    pub affected_government: Vec<GovernmentRecord>,
    pub listed_underground: Vec<DisplayRecord<UndergroundRecord>>,
    pub listed_government: Vec<DisplayRecord<GovernmentRecord>>,
    pub totals: Option<Totals>,
    pub text: Option<String>,
    pub export_path: Option<PathBuf>,
    pub info: Option<InfoReport>,
    pub config: Option<AppConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_totals(mut self, totals: Totals) -> Self {
        self.totals = Some(totals);
        self
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}

/// Asks the user before something destructive happens.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Turns recovered load problems into user-facing messages.
pub fn issue_messages(issues: &[LoadIssue]) -> Vec<CmdMessage> {
    issues
        .iter()
        .map(|issue| match issue {
            LoadIssue::MigrationFailed(reason) => CmdMessage::warning(format!(
                "Could not upgrade stored data ({}); it was left unchanged",
                reason
            )),
            LoadIssue::Corrupted { reason, backups } => {
                let mut text = format!("Stored data was corrupted ({}) and has been reset", reason);
                if !backups.is_empty() {
                    text.push_str(&format!(". Backup saved as {}", backups.join(", ")));
                }
                CmdMessage::warning(text)
            }
            LoadIssue::Repaired(report) => CmdMessage::info(format!(
                "Fixed stored data: {} dropped, {} repaired",
                report.dropped, report.repaired
            )),
            LoadIssue::RepairNotPersisted(reason) => CmdMessage::warning(format!(
                "Fixed stored data in memory but could not save it: {}",
                reason
            )),
        })
        .collect()
}

/// Commits `next`, reporting a full disk as a message instead of an error.
/// Returns whether the save went through.
pub(crate) fn persist<B: StorageBackend>(
    book: &mut Book<B>,
    next: Collections,
    result: &mut CmdResult,
) -> Result<bool> {
    report_commit(book.commit(next), result)
}

/// Like [`persist`], applying `change` to the collection holding `R`.
pub(crate) fn persist_with<B, R, F>(
    book: &mut Book<B>,
    change: F,
    result: &mut CmdResult,
) -> Result<bool>
where
    B: StorageBackend,
    R: Record,
    F: FnOnce(&mut Vec<R>),
{
    report_commit(book.commit_with(change), result)
}

fn report_commit(outcome: Result<Saved>, result: &mut CmdResult) -> Result<bool> {
    match outcome {
        Ok(saved) => {
            if !saved.cleaned_backups.is_empty() {
                result.add_message(CmdMessage::info(format!(
                    "Removed {} old backup(s) to free space",
                    saved.cleaned_backups.len()
                )));
            }
            if saved.report.dropped > 0 {
                result.add_message(CmdMessage::warning(format!(
                    "{} invalid record(s) were not saved",
                    saved.report.dropped
                )));
            }
            Ok(true)
        }
        Err(JodHuayError::StorageFull) => {
            result.add_message(CmdMessage::error(JodHuayError::StorageFull.to_string()));
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
