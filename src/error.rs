//! Error types.

use chrono::NaiveDate;
use thiserror::Error;

use crate::VerseRange;

/// Failures reported by a [`Store`](crate::Store) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("unique constraint '{constraint}' violated by {key}")]
    UniqueViolation {
        /// Name of the violated constraint.
        constraint: &'static str,
        /// The offending key, rendered for diagnostics.
        key: String,
    },

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors produced by the parsing, query and scheduling core.
#[derive(Debug, Error)]
pub enum Error {
    /// The reference string is malformed.
    #[error("invalid reference '{input}': {reason}")]
    InvalidFormat { input: String, reason: &'static str },

    /// No book-matching strategy recognised the name.
    #[error("unknown book '{name}' (translation '{translation}')")]
    BookNotFound { name: String, translation: String },

    /// The translation slug is not loaded.
    #[error("unknown translation '{0}'")]
    TranslationNotFound(String),

    /// The range is well formed but no verses fall inside it.
    #[error("no verses found for {0}")]
    RangeNotFound(VerseRange),

    /// No schedule row exists for the date.
    #[error("no daily verse scheduled for {0}")]
    NotScheduled(NaiveDate),

    /// A schedule row already exists for a date in the batch.
    #[error("scheduling conflict on {date}; retry the whole batch")]
    SchedulingConflict { date: NaiveDate },

    /// The daily-verse pool has no entries to choose from.
    #[error("daily verse pool is empty")]
    EmptyPool,

    #[error("invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl Error {
    pub(crate) fn invalid(input: &str, reason: &'static str) -> Self {
        Error::InvalidFormat { input: input.to_string(), reason }
    }

    /// Errors the caller can fix by changing their input.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::InvalidFormat { .. } | Error::BookNotFound { .. })
    }

    /// Errors that are safe to retry as a whole operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::SchedulingConflict { .. })
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
