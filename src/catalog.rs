//! Catalog store: loads and validates one record collection.
//!
//! A syntactically invalid document (or one without a record array) is a
//! [`SiteError::CatalogLoad`] and aborts the run. Anything wrong with a single
//! record only rejects that record; the rejection is kept on the catalog so the
//! generator can report it alongside write failures.

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{RecordFailure, SiteError};
use crate::traits::CatalogRecord;

/// Read-only record collection, loaded once per run.
#[derive(Debug)]
pub struct Catalog<R> {
    records: Vec<R>,
    rejected: Vec<RecordFailure>,
}

impl<R> Catalog<R> {
    /// Builds a catalog from records already in memory.
    pub fn from_records(records: Vec<R>) -> Self {
        Self {
            records,
            rejected: Vec::new(),
        }
    }

    /// Valid records, in catalog order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Records rejected during loading, in catalog order.
    pub fn rejected(&self) -> &[RecordFailure] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn load_catalog<R: CatalogRecord>(path: &Path) -> Result<Catalog<R>, SiteError> {
    let content = std::fs::read_to_string(path).map_err(|e| SiteError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let catalog = parse_catalog(&content, path)?;
    debug!(
        path = %path.display(),
        records = catalog.len(),
        rejected = catalog.rejected().len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Parses catalog JSON. `path` is only used in error messages.
pub fn parse_catalog<R: CatalogRecord>(
    content: &str,
    path: &Path,
) -> Result<Catalog<R>, SiteError> {
    let load_error = |reason: String| SiteError::CatalogLoad {
        path: path.to_path_buf(),
        reason,
    };

    let document: Value = serde_json::from_str(content).map_err(|e| load_error(e.to_string()))?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(R::COLLECTION) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(load_error(format!(
                    "expected an array under '{}'",
                    R::COLLECTION
                )))
            }
        },
        _ => return Err(load_error("expected an array or object".to_string())),
    };

    let mut records = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let label = item
            .get(R::KEY_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index));

        let record: R = match serde_json::from_value(item) {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %label, error = %e, "rejecting record");
                rejected.push(RecordFailure::new(
                    label.clone(),
                    SiteError::record(label, e.to_string()),
                ));
                continue;
            }
        };

        let checked = validate_key(record.key()).and_then(|_| record.validate());
        let failure = match checked {
            Err(reason) => Some(reason),
            Ok(()) if !seen.insert(record.key().to_string()) => {
                Some("duplicate key".to_string())
            }
            Ok(()) => None,
        };

        match failure {
            Some(reason) => {
                warn!(key = %label, reason = %reason, "rejecting record");
                rejected.push(RecordFailure::new(
                    label.clone(),
                    SiteError::record(label, reason),
                ));
            }
            None => records.push(record),
        }
    }

    Ok(Catalog { records, rejected })
}

/// Keys become directory names and URL path segments.
pub fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("key is empty".to_string());
    }
    if let Some(bad) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(format!("key '{}' contains '{}', which is not URL-safe", key, bad));
    }
    Ok(())
}
