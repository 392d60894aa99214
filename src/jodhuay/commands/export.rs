use crate::book::Book;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{JodHuayError, Result};
use crate::model::{Collections, GovernmentRecord, UndergroundRecord};
use crate::store::backend::StorageBackend;
use crate::store::migrate::CURRENT_VERSION;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Backup file layout shared by export and import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportFile {
    pub version: String,
    /// Milliseconds since the epoch.
    pub timestamp: i64,
    /// ISO-8601, UTC.
    pub date: String,
    pub underground: Vec<UndergroundRecord>,
    pub government: Vec<GovernmentRecord>,
}

impl ExportFile {
    pub fn new(collections: &Collections, now: DateTime<Utc>) -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            timestamp: now.timestamp_millis(),
            date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            underground: collections.underground.clone(),
            government: collections.government.clone(),
        }
    }
}

pub fn default_filename(now: DateTime<Utc>) -> String {
    format!("JodHuay_Backup_{}.json", now.timestamp_millis())
}

/// Writes both collections to `path`, or to a timestamped file in `dir`.
pub fn run<B: StorageBackend>(
    book: &Book<B>,
    path: Option<&Path>,
    dir: &Path,
) -> Result<CmdResult> {
    let now = Utc::now();
    let target: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => dir.join(default_filename(now)),
    };

    let export = ExportFile::new(book.collections(), now);
    let file = File::create(&target).map_err(JodHuayError::Io)?;
    let mut writer = BufWriter::new(file);
    write_export(&mut writer, &export)?;
    writer.flush().map_err(JodHuayError::Io)?;

    tracing::info!(path = %target.display(), "exported");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} underground and {} government record(s) to {}",
        export.underground.len(),
        export.government.len(),
        target.display()
    )));
    result.export_path = Some(target);
    Ok(result)
}

pub fn write_export<W: Write>(writer: W, export: &ExportFile) -> Result<()> {
    serde_json::to_writer_pretty(writer, export)?;
    Ok(())
}
