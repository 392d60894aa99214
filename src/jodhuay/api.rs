//! # API Facade
//!
//! The API layer is a thin facade over the command layer and the single
//! entry point for every operation, whatever the UI.
//!
//! The facade:
//! - **Dispatches** to the matching `commands::*::run`
//! - **Normalizes inputs** (selector strings become [`RecordSelector`]s,
//!   a [`Kind`] picks the record shape)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and holds no business rules. `LotteryApi<B>` is
//! generic over the storage backend: `FsBackend` in production,
//! `MemBackend` in tests.

use crate::book::Book;
use crate::commands::{self, Confirm};
use crate::config::AppConfig;
use crate::error::{JodHuayError, Result};
use crate::index::RecordSelector;
use crate::model::{GovernmentRecord, Kind, UndergroundRecord};
use crate::store::backend::StorageBackend;
use crate::store::LotteryStore;
use std::path::{Path, PathBuf};

pub struct LotteryApi<B: StorageBackend> {
    book: Book<B>,
    config_dir: PathBuf,
}

impl<B: StorageBackend> LotteryApi<B> {
    /// Loads stored data. Problems recovered from during the load are
    /// available from [`LotteryApi::startup_messages`].
    pub fn open(store: LotteryStore<B>, config: &AppConfig, config_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            book: Book::open(store, config)?,
            config_dir,
        })
    }

    pub fn startup_messages(&mut self) -> Vec<CmdMessage> {
        commands::issue_messages(&self.book.take_issues())
    }

    pub fn add_underground(&mut self, entry: commands::add::UndergroundEntry) -> Result<CmdResult> {
        commands::add::underground(&mut self.book, entry)
    }

    pub fn add_government(&mut self, entry: commands::add::GovernmentEntry) -> Result<CmdResult> {
        commands::add::government(&mut self.book, entry)
    }

    pub fn delete<I: AsRef<str>>(&mut self, kind: Kind, selectors: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        match kind {
            Kind::Underground => {
                commands::delete::run::<UndergroundRecord, _>(&mut self.book, &selectors)
            }
            Kind::Government => {
                commands::delete::run::<GovernmentRecord, _>(&mut self.book, &selectors)
            }
        }
    }

    pub fn edit_underground(
        &mut self,
        selector: &str,
        edit: commands::edit::UndergroundEdit,
    ) -> Result<CmdResult> {
        let selector = parse_selector(selector)?;
        commands::edit::run(&mut self.book, &selector, edit)
    }

    pub fn edit_government(
        &mut self,
        selector: &str,
        edit: commands::edit::GovernmentEdit,
    ) -> Result<CmdResult> {
        let selector = parse_selector(selector)?;
        commands::edit::run(&mut self.book, &selector, edit)
    }

    pub fn clear(&mut self, kind: Kind) -> Result<CmdResult> {
        match kind {
            Kind::Underground => commands::clear::run::<UndergroundRecord, _>(&mut self.book),
            Kind::Government => commands::clear::run::<GovernmentRecord, _>(&mut self.book),
        }
    }

    pub fn list(&self, filter: &ListFilter) -> Result<CmdResult> {
        commands::query::list(&self.book, filter)
    }

    pub fn summary<I: AsRef<str>>(&self, kind: Kind, selectors: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::summary::run(&self.book, kind, &selectors)
    }

    pub fn export(&self, path: Option<&Path>, dir: &Path) -> Result<CmdResult> {
        commands::export::run(&self.book, path, dir)
    }

    pub fn import<C: Confirm>(&mut self, path: &Path, confirm: &mut C) -> Result<CmdResult> {
        commands::import::run(&mut self.book, path, confirm)
    }

    pub fn repair(&mut self) -> Result<CmdResult> {
        commands::repair::run(&mut self.book)
    }

    pub fn info(&self) -> Result<CmdResult> {
        commands::info::run(&self.book)
    }

    pub fn reset<C: Confirm>(&mut self, confirm: &mut C) -> Result<CmdResult> {
        commands::reset::run(&mut self.book, confirm)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    pub fn book(&self) -> &Book<B> {
        &self.book
    }
}

fn parse_selector(input: &str) -> Result<RecordSelector> {
    input.parse().map_err(JodHuayError::Api)
}

fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<RecordSelector>> {
    inputs.iter().map(|s| parse_selector(s.as_ref())).collect()
}

pub use crate::commands::add::{GovernmentEntry, UndergroundEntry};
pub use crate::commands::config::ConfigAction;
pub use crate::commands::edit::{GovernmentEdit, UndergroundEdit};
pub use crate::commands::query::ListFilter;
pub use crate::commands::{CmdMessage, CmdResult, InfoReport, MessageLevel, Totals};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GovernmentType, UndergroundType};
    use crate::store::mem_backend::MemBackend;
    use tempfile::TempDir;

    fn api(dir: &TempDir) -> LotteryApi<MemBackend> {
        let config = AppConfig::default();
        let store = LotteryStore::new(MemBackend::new(), &config);
        LotteryApi::open(store, &config, dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn delete_dispatches_by_kind() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        api.add_government(GovernmentEntry {
            bet_type: GovernmentType::Back2,
            number: "34".into(),
            qty: None,
        })
        .unwrap();

        api.delete(Kind::Underground, &["1"]).unwrap();
        assert_eq!(api.book().collections().government.len(), 1);
        api.delete(Kind::Government, &["1"]).unwrap();
        assert!(api.book().collections().is_empty());
    }

    #[test]
    fn bad_selector_is_an_api_error() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        assert!(matches!(
            api.delete(Kind::Government, &["0"]),
            Err(JodHuayError::Api(_))
        ));
    }

    #[test]
    fn edit_passes_selector_through() {
        let dir = TempDir::new().unwrap();
        let mut api = api(&dir);
        api.add_underground(UndergroundEntry {
            bet_type: UndergroundType::RunBottom,
            number: "7".into(),
            direct: "20".into(),
            tod: None,
            reversal: None,
        })
        .unwrap();
        let id = api.book().collections().underground[0].id.to_string();

        let edit = UndergroundEdit {
            number: Some("8".into()),
            ..Default::default()
        };
        api.edit_underground(&id, edit).unwrap();
        assert_eq!(api.book().collections().underground[0].number, "8");
    }

    #[test]
    fn config_uses_config_dir() {
        let dir = TempDir::new().unwrap();
        let api = api(&dir);
        api.config(ConfigAction::Set("key-prefix".into(), "shop".into()))
            .unwrap();
        assert_eq!(AppConfig::load(dir.path()).unwrap().key_prefix, "shop");
    }

    #[test]
    fn startup_messages_drain_once() {
        let dir = TempDir::new().unwrap();
        let backend = MemBackend::new();
        backend.set("lottery_data_version", "1.1").unwrap();
        backend.set("lottery_underground", "][").unwrap();
        let config = AppConfig::default();
        let mut api = LotteryApi::open(
            LotteryStore::new(backend, &config),
            &config,
            dir.path().to_path_buf(),
        )
        .unwrap();

        assert_eq!(api.startup_messages().len(), 1);
        assert!(api.startup_messages().is_empty());
    }
}
