use crate::model::Kind;
use thiserror::Error;

/// Reason a candidate record was refused by `add` or `edit`.
///
/// These are user-facing: the `Display` text is what the CLI prints.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Please enter a {expected}-digit number")]
    WrongDigitCount { expected: usize },

    #[error("Numbers may only contain digits")]
    NonNumeric,

    #[error("Please enter a direct price")]
    MissingPrice,

    #[error("Direct price must be a positive whole number")]
    NonPositivePrice,

    #[error("Tod price must be a positive whole number")]
    NonPositiveTod,

    #[error("Ticket quantity must be at least 1")]
    NonPositiveQty,
}

#[derive(Error, Debug)]
pub enum JodHuayError {
    #[error("Stored data is corrupted: {0}")]
    ParseCorruption(String),

    #[error("{0}")]
    Rejected(#[from] Rejection),

    #[error("Storage quota exceeded")]
    QuotaExceeded,

    #[error("Storage is full, please delete old entries")]
    StorageFull,

    #[error("Migration from {from} to {to} failed: {reason}")]
    MigrationFailure {
        from: String,
        to: String,
        reason: String,
    },

    #[error("No {kind} record at {selector}")]
    RecordNotFound { kind: Kind, selector: String },

    #[error("Invalid import file: {0}")]
    InvalidImport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, JodHuayError>;
