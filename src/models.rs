//! Core data types shared across the generation and sitemap pipelines.
//!
//! Catalog records are deserialized straight from the catalog JSON files, so
//! field renames here track the on-disk field names.

use std::fmt;

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A service-area (suburb) record.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AreaRecord {
    #[serde(rename = "slug")]
    pub key: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub region: String,
    #[serde(rename = "postcode", deserialize_with = "string_or_number")]
    pub postal_code: String,
    #[serde(rename = "local_context_text", default)]
    pub local_narrative: Option<String>,
}

/// A product-model record.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelRecord {
    #[serde(rename = "slug")]
    pub key: String,
    pub title: String,
    #[serde(rename = "shortName")]
    pub short_title: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub year: Option<String>,
    #[serde(rename = "displayType", default)]
    pub display_kind: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(rename = "chip", default)]
    pub chip_family: Option<String>,
    #[serde(rename = "trueTone", default)]
    pub has_color_adaptive_display: bool,
    pub category: ModelCategory,
}

pub const FALLBACK_YEAR: &str = "2024";
pub const FALLBACK_DISPLAY_KIND: &str = "Retina";
pub const FALLBACK_RESOLUTION: &str = "2560 x 1600";
pub const FALLBACK_CHIP: &str = "Intel";
pub const FALLBACK_IDENTIFIER: &str = "Various";

impl ModelRecord {
    pub fn year_or_default(&self) -> &str {
        self.year.as_deref().unwrap_or(FALLBACK_YEAR)
    }

    pub fn display_kind_or_default(&self) -> &str {
        self.display_kind.as_deref().unwrap_or(FALLBACK_DISPLAY_KIND)
    }

    pub fn resolution_or_default(&self) -> &str {
        self.resolution.as_deref().unwrap_or(FALLBACK_RESOLUTION)
    }

    pub fn chip_or_default(&self) -> &str {
        self.chip_family.as_deref().unwrap_or(FALLBACK_CHIP)
    }

    pub fn identifier_or_default(&self) -> &str {
        self.identifier.as_deref().unwrap_or(FALLBACK_IDENTIFIER)
    }

    /// Numeric model year, when the year field parses as one.
    pub fn year_number(&self) -> Option<u32> {
        self.year.as_deref().and_then(|y| y.trim().parse().ok())
    }

    pub fn is_apple_silicon(&self) -> bool {
        self.chip_family
            .as_deref()
            .is_some_and(|c| c.starts_with("Apple M"))
    }

    pub fn is_touch_bar(&self) -> bool {
        self.title.to_lowercase().contains("touch bar")
    }

    pub fn is_older(&self) -> bool {
        self.year_number().is_some_and(|y| y < 2016)
    }

    pub fn is_recent(&self) -> bool {
        self.year_number().is_some_and(|y| y > 2022)
    }

    /// "Air" or "Pro", for prose that names the product line.
    pub fn line(&self) -> &'static str {
        if self.title.contains("Air") {
            "Air"
        } else {
            "Pro"
        }
    }
}

/// Listing-page grouping for models.
///
/// [`ModelCategory::ALL`] is the canonical bucket order on the models listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ModelCategory {
    #[serde(rename = "MacBook Air - Apple Silicon")]
    AirAppleSilicon,
    #[serde(rename = "MacBook Air - Intel")]
    AirIntel,
    #[serde(rename = "MacBook Pro 14\" & 16\" - Apple Silicon")]
    ProLargeAppleSilicon,
    #[serde(rename = "MacBook Pro 13\" - Apple Silicon")]
    Pro13AppleSilicon,
    #[serde(rename = "MacBook Pro - Touch Bar Intel")]
    ProTouchBarIntel,
    #[serde(rename = "MacBook Pro - Retina Intel")]
    ProRetinaIntel,
    #[serde(rename = "MacBook Pro - Unibody")]
    ProUnibody,
    #[serde(rename = "MacBook 12\"")]
    MacBook12,
}

impl ModelCategory {
    pub const ALL: [ModelCategory; 8] = [
        ModelCategory::AirAppleSilicon,
        ModelCategory::AirIntel,
        ModelCategory::ProLargeAppleSilicon,
        ModelCategory::Pro13AppleSilicon,
        ModelCategory::ProTouchBarIntel,
        ModelCategory::ProRetinaIntel,
        ModelCategory::ProUnibody,
        ModelCategory::MacBook12,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ModelCategory::AirAppleSilicon => "MacBook Air - Apple Silicon",
            ModelCategory::AirIntel => "MacBook Air - Intel",
            ModelCategory::ProLargeAppleSilicon => "MacBook Pro 14\" & 16\" - Apple Silicon",
            ModelCategory::Pro13AppleSilicon => "MacBook Pro 13\" - Apple Silicon",
            ModelCategory::ProTouchBarIntel => "MacBook Pro - Touch Bar Intel",
            ModelCategory::ProRetinaIntel => "MacBook Pro - Retina Intel",
            ModelCategory::ProUnibody => "MacBook Pro - Unibody",
            ModelCategory::MacBook12 => "MacBook 12\"",
        }
    }
}

impl fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One composed page, addressed relative to the site root.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
    /// Relative path ending in the marker filename, e.g. `areas/parramatta/index.html`.
    pub route: String,
    pub content: String,
}

/// Sitemap `<changefreq>` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        };
        f.write_str(s)
    }
}

/// Sitemap `<priority>`, in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Priority(pub f64);

impl Priority {
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1.0 renders as "1.0", not "1"
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// One `<url>` element of the sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub location: String,
    pub last_modified: NaiveDate,
    pub change_frequency: ChangeFrequency,
    pub priority: Priority,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_string_or_number(deserializer)?.ok_or_else(|| D::Error::custom("value is null"))
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}
