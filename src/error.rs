//! Error taxonomy for generation and sitemap runs.
//!
//! Only [`SiteError::CatalogLoad`] is fatal. Record, compose and write
//! failures are collected per record and reported in the run summary;
//! crawl read failures are logged and the path is skipped.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    /// The catalog document is missing, unreadable or not valid JSON.
    #[error("failed to load catalog {}: {reason}", path.display())]
    CatalogLoad { path: PathBuf, reason: String },

    /// A single record is missing a required field or carries an invalid value.
    #[error("record '{key}' is invalid: {reason}")]
    RecordValidation { key: String, reason: String },

    /// Narrative fragment substitution failed for a record.
    #[error("failed to compose '{key}': {reason}")]
    Compose { key: String, reason: String },

    /// Creating an output directory or writing a document failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A path under the crawl root could not be read.
    #[error("cannot read {}: {reason}", path.display())]
    CrawlRead { path: PathBuf, reason: String },
}

impl SiteError {
    pub fn record(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SiteError::RecordValidation {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// A named, isolated failure reported at the end of a run.
#[derive(Debug)]
pub struct RecordFailure {
    pub key: String,
    pub error: SiteError,
}

impl RecordFailure {
    pub fn new(key: impl Into<String>, error: SiteError) -> Self {
        Self {
            key: key.into(),
            error,
        }
    }
}
