//! # JodHuay Architecture
//!
//! JodHuay ("จดหวย", *write down the lottery*) is a personal ledger for
//! lottery bets: underground-lottery bets with a price and a computed amount,
//! and government-lottery tickets with a quantity. It is a library first; the
//! `jodhuay` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, logging.rs)                         │
//! │  - Parses arguments, prints results, owns the exit code     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Thin facade: selector parsing, dispatch by collection    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs) over the Book (book.rs)           │
//! │  - Entry rules, edits, queries, summaries, import/export    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - Migration, self-healing loads, backups, quota recovery   │
//! │  - FsBackend (production), MemBackend (tests)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout or stderr and nothing
//! exits the process. Diagnostics go through `tracing`; whoever embeds the
//! library decides where they end up.
//!
//! ## Data Rules
//!
//! - Prices are stored as strings (`"100"`, `"100 x 50"`, `"100 x กลับ 3"`)
//!   next to a numeric `amount`. [`price`] owns that grammar.
//! - Everything read from storage or an import file goes through
//!   [`validate`], which drops what it cannot interpret and backfills what
//!   it can.
//! - Stored data carries a version tag and is upgraded by
//!   [`store::migrate`] before it is read.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`book`]: In-memory collections plus commit semantics
//! - [`store`]: Key layout, load/save integrity, storage backends
//! - [`model`]: Records, type catalogs, ids
//! - [`price`]: Price string grammar and amounts
//! - [`validate`]: Record validation and repair
//! - [`index`]: Addressing records by position or id
//! - [`config`]: `config.json` handling
//! - [`error`]: Error types

pub mod api;
pub mod book;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod price;
pub mod store;
pub mod validate;
