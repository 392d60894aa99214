//! # The Book
//!
//! [`Book`] holds the two in-memory collections and the store they came from.
//! It is the single source of truth while a command runs: commands read from
//! [`Book::collections`] and hand a complete next state to [`Book::commit`].
//!
//! `commit` keeps the in-memory state even when saving fails, so a full
//! disk never loses what the user just entered. The caller gets the error
//! and decides how to report it.

use crate::config::AppConfig;
use crate::error::Result;
use crate::model::{Collections, Record};
use crate::store::backend::StorageBackend;
use crate::store::{LoadIssue, LotteryStore, Saved};

pub struct Book<B: StorageBackend> {
    store: LotteryStore<B>,
    collections: Collections,
    issues: Vec<LoadIssue>,
    edit_moves_to_end: bool,
}

impl<B: StorageBackend> Book<B> {
    /// Load both collections. Recoverable load problems are kept for
    /// [`Book::take_issues`] rather than returned as errors.
    pub fn open(store: LotteryStore<B>, config: &AppConfig) -> Result<Self> {
        let loaded = store.load()?;
        Ok(Self {
            store,
            collections: loaded.collections,
            issues: loaded.issues,
            edit_moves_to_end: config.edit_moves_to_end,
        })
    }

    pub fn take_issues(&mut self) -> Vec<LoadIssue> {
        std::mem::take(&mut self.issues)
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub fn records<R: Record>(&self) -> &[R] {
        R::within(&self.collections)
    }

    pub fn store(&self) -> &LotteryStore<B> {
        &self.store
    }

    pub fn edit_moves_to_end(&self) -> bool {
        self.edit_moves_to_end
    }

    /// Replace the in-memory state with `next` and persist it.
    ///
    /// On success the validated forms become the in-memory state. On failure
    /// `next` stays in memory and the error is returned.
    pub fn commit(&mut self, next: Collections) -> Result<Saved> {
        self.collections = next;
        let saved = self.store.save(&self.collections)?;
        self.collections = saved.collections.clone();
        Ok(saved)
    }

    /// Apply `change` to the collection holding `R` and commit the result.
    pub fn commit_with<R, F>(&mut self, change: F) -> Result<Saved>
    where
        R: Record,
        F: FnOnce(&mut Vec<R>),
    {
        let mut next = self.collections.clone();
        change(R::within_mut(&mut next));
        self.commit(next)
    }

    /// Discard memory and read everything back from storage.
    pub fn reload(&mut self) -> Result<Vec<LoadIssue>> {
        let loaded = self.store.load()?;
        self.collections = loaded.collections;
        Ok(loaded.issues)
    }

    pub(crate) fn clear_memory(&mut self) {
        self.collections = Collections::default();
    }
}
