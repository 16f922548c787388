//! Seams between the catalog store, the composers and the generator.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │ CatalogRecord│──▶│    SitePages     │──▶│  generate()  │
//! │ Area / Model │   │ AreaPages /      │   │ write + count│
//! └──────────────┘   │ ModelPages       │   └──────────────┘
//!                    └──────────────────┘
//! ```
//!
//! The generator only knows about [`SitePages`]; adding a third catalog means
//! one new record type and one new `SitePages` implementation.

use serde::de::DeserializeOwned;

use crate::catalog::Catalog;
use crate::error::SiteError;
use crate::models::{AreaRecord, ModelRecord};
use crate::variant::{FragmentSet, AREA_FRAGMENTS, MODEL_FRAGMENTS};

// ═══════════════════════════════════════════════════════════════════════
// CatalogRecord
// ═══════════════════════════════════════════════════════════════════════

/// A record that can be loaded from a catalog document.
pub trait CatalogRecord: DeserializeOwned {
    /// Field that wraps the record array when the document is an object,
    /// e.g. `{"suburbs": [...]}`.
    const COLLECTION: &'static str;

    /// Field holding the record key in the catalog document. Used to name
    /// records that fail to deserialize.
    const KEY_FIELD: &'static str = "slug";

    /// Stable, URL-safe key. Becomes the record's output directory name.
    fn key(&self) -> &str;

    /// Narrative fragment lists the variant selector draws from.
    fn fragments() -> &'static FragmentSet;

    /// Field checks beyond what deserialization enforces.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl CatalogRecord for AreaRecord {
    const COLLECTION: &'static str = "suburbs";

    fn key(&self) -> &str {
        &self.key
    }

    fn fragments() -> &'static FragmentSet {
        &AREA_FRAGMENTS
    }

    fn validate(&self) -> Result<(), String> {
        require_non_empty("name", &self.display_name)?;
        require_non_empty("region", &self.region)?;
        require_non_empty("postcode", &self.postal_code)
    }
}

impl CatalogRecord for ModelRecord {
    const COLLECTION: &'static str = "models";

    fn key(&self) -> &str {
        &self.key
    }

    fn fragments() -> &'static FragmentSet {
        &MODEL_FRAGMENTS
    }

    fn validate(&self) -> Result<(), String> {
        require_non_empty("title", &self.title)?;
        require_non_empty("shortName", &self.short_title)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("field '{}' is empty", field))
    } else {
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SitePages
// ═══════════════════════════════════════════════════════════════════════

/// Turns one catalog into documents.
///
/// Implementations must be pure: the same catalog always yields byte-identical
/// documents, so a generation run can be repeated unattended.
pub trait SitePages {
    type Record: CatalogRecord;

    /// Human-readable name used in logs and the run summary (`"areas"`).
    fn name(&self) -> &str;

    /// Directory, relative to the site root, holding this catalog's pages.
    fn section_dir(&self) -> &str;

    /// The loaded catalog this page set renders.
    fn catalog(&self) -> &Catalog<Self::Record>;

    /// Composes the document for a single record.
    fn compose_record(&self, record: &Self::Record) -> Result<String, SiteError>;

    /// Composes the catalog's listing document.
    fn compose_listing(&self) -> String;
}
