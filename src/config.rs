use anyhow::{bail, Context, Result};
use globset::Glob;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::catalog::validate_key;
use crate::metadata::{Rule, RuleTable};
use crate::models::{ChangeFrequency, Priority};
use crate::neighbors::NeighborPolicy;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub catalogs: CatalogsConfig,
    pub neighbors: NeighborsConfig,
    pub sitemap: SitemapConfig,
    pub migrate: MigrateConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    /// Root of the output tree. Generation writes under it, the sitemap crawls it.
    pub root: PathBuf,
    /// Filename that marks a directory as a page.
    pub marker: String,
    pub brand: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://macbookscreenrepairsydney.com.au".to_string(),
            root: PathBuf::from("."),
            marker: "index.html".to_string(),
            brand: "Mac Screen Repair Sydney".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogsConfig {
    pub areas: PathBuf,
    pub models: PathBuf,
    pub areas_dir: String,
    pub models_dir: String,
}

impl Default for CatalogsConfig {
    fn default() -> Self {
        Self {
            areas: PathBuf::from("data/suburbs.json"),
            models: PathBuf::from("data/model-data.json"),
            areas_dir: "areas".to_string(),
            models_dir: "models".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NeighborsConfig {
    pub max: usize,
    pub min: usize,
}

impl Default for NeighborsConfig {
    fn default() -> Self {
        let policy = NeighborPolicy::default();
        Self {
            max: policy.max,
            min: policy.min,
        }
    }
}

impl NeighborsConfig {
    pub fn policy(&self) -> NeighborPolicy {
        NeighborPolicy {
            max: self.max,
            min: self.min,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SitemapConfig {
    /// Output file, relative to `site.root`.
    pub output: PathBuf,
    /// Directory names never descended into. Hidden directories are always skipped.
    pub skip_dirs: Vec<String>,
    /// Extra globs, matched against root-relative paths, for marker files to leave out.
    pub exclude_globs: Vec<String>,
    pub priority: RuleTable<Priority>,
    pub changefreq: RuleTable<ChangeFrequency>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("sitemap.xml"),
            skip_dirs: vec![
                "node_modules".to_string(),
                "target".to_string(),
                ".git".to_string(),
            ],
            exclude_globs: Vec::new(),
            priority: default_priority_table(),
            changefreq: default_changefreq_table(),
        }
    }
}

/// Listing pages come before their section prefix so they keep the higher priority.
fn default_priority_table() -> RuleTable<Priority> {
    let rules = [
        ("index.html", 1.0),
        ("services/index.html", 0.9),
        ("models/index.html", 0.9),
        ("areas/index.html", 0.9),
        ("pricing-guide/index.html", 0.9),
        ("book/index.html", 0.9),
        ("contact/index.html", 0.8),
        ("about/index.html", 0.8),
        ("warranty/index.html", 0.7),
        ("services/", 0.8),
        ("models/", 0.7),
        ("areas/", 0.6),
    ];
    RuleTable {
        default: Priority(0.5),
        rules: rules
            .iter()
            .map(|(path, value)| Rule {
                path: path.to_string(),
                value: Priority(*value),
            })
            .collect(),
    }
}

fn default_changefreq_table() -> RuleTable<ChangeFrequency> {
    let rules = [
        ("index.html", ChangeFrequency::Weekly),
        ("services/", ChangeFrequency::Monthly),
        ("models/", ChangeFrequency::Monthly),
        ("areas/", ChangeFrequency::Monthly),
        ("pricing-guide/", ChangeFrequency::Weekly),
    ];
    RuleTable {
        default: ChangeFrequency::Monthly,
        rules: rules
            .iter()
            .map(|(path, value)| Rule {
                path: path.to_string(),
                value: *value,
            })
            .collect(),
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MigrateConfig {
    /// Directories, relative to `site.root`, whose page subdirectories are migrated.
    pub dirs: Vec<String>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            dirs: vec!["models".to_string()],
        }
    }
}

impl Config {
    pub fn areas_catalog(&self) -> &Path {
        &self.catalogs.areas
    }

    pub fn models_catalog(&self) -> &Path {
        &self.catalogs.models
    }

    pub fn sitemap_path(&self) -> PathBuf {
        self.site.root.join(&self.sitemap.output)
    }
}

/// Loads the config file at `path`.
///
/// A missing file is not an error: every setting has a default, so commands
/// run without any flags. A file that exists but does not parse or validate is.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!(path = %path.display(), "no config file, using defaults");
        let config = Config::default();
        validate(&config)?;
        return Ok(config);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let base = &config.site.base_url;
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        bail!("site.base_url must start with http:// or https://, got '{}'", base);
    }

    if config.site.marker.is_empty() || config.site.marker.contains('/') {
        bail!(
            "site.marker must be a bare filename, got '{}'",
            config.site.marker
        );
    }

    // Section dirs land directly under the site root, so an empty or
    // multi-segment value would write listings over other pages.
    let catalogs = &config.catalogs;
    for (field, dir) in [
        ("catalogs.areas_dir", &catalogs.areas_dir),
        ("catalogs.models_dir", &catalogs.models_dir),
    ] {
        if let Err(reason) = validate_key(dir) {
            bail!("{} must be a single URL-safe path segment: {}", field, reason);
        }
    }
    if catalogs.areas_dir == catalogs.models_dir {
        bail!(
            "catalogs.areas_dir and catalogs.models_dir must differ, both are '{}'",
            catalogs.areas_dir
        );
    }

    if config.neighbors.max < 1 {
        bail!("neighbors.max must be >= 1");
    }
    if config.neighbors.min > config.neighbors.max {
        bail!(
            "neighbors.min ({}) must not exceed neighbors.max ({})",
            config.neighbors.min,
            config.neighbors.max
        );
    }

    let priority = &config.sitemap.priority;
    if !priority.default.is_valid() {
        bail!("sitemap.priority.default must be in [0.0, 1.0]");
    }
    for rule in &priority.rules {
        if !rule.value.is_valid() {
            bail!(
                "sitemap.priority rule '{}' must be in [0.0, 1.0], got {}",
                rule.path,
                rule.value
            );
        }
    }

    for pattern in &config.sitemap.exclude_globs {
        Glob::new(pattern)
            .with_context(|| format!("Invalid sitemap.exclude_globs pattern: {}", pattern))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.site.marker, "index.html");
        assert_eq!(config.neighbors.policy(), NeighborPolicy { max: 4, min: 3 });
        assert_eq!(config.sitemap.priority.rules.len(), 12);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sitegen.toml");
        std::fs::write(
            &path,
            r#"
[site]
base_url = "https://example.com"

[sitemap.priority]
default = 0.4
rules = [
    { path = "services/index.html", value = 0.9 },
    { path = "services/", value = 0.8 },
]
"#,
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.site.base_url, "https://example.com");
        assert_eq!(config.site.marker, "index.html");
        assert_eq!(config.sitemap.priority.default, Priority(0.4));
        assert_eq!(config.sitemap.priority.rules[1].path, "services/");
        assert_eq!(config.sitemap.changefreq.default, ChangeFrequency::Monthly);
    }

    #[test]
    fn test_rejects_out_of_range_priority() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sitegen.toml");
        std::fs::write(
            &path,
            "[sitemap.priority]\ndefault = 1.5\nrules = []\n",
        )
        .unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_rejects_min_above_max() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sitegen.toml");
        std::fs::write(&path, "[neighbors]\nmax = 2\nmin = 3\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_rejects_empty_section_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sitegen.toml");
        std::fs::write(&path, "[catalogs]\nareas_dir = \"\"\n").unwrap();
        let err = load_config(&path).unwrap_err().to_string();
        assert!(err.contains("catalogs.areas_dir"), "{}", err);
    }

    #[test]
    fn test_rejects_nested_or_parent_section_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sitegen.toml");
        for dir in ["..", "../outside", "models/extra"] {
            std::fs::write(&path, format!("[catalogs]\nmodels_dir = \"{}\"\n", dir)).unwrap();
            let err = load_config(&path).unwrap_err().to_string();
            assert!(err.contains("catalogs.models_dir"), "{}: {}", dir, err);
        }
    }

    #[test]
    fn test_rejects_shared_section_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sitegen.toml");
        std::fs::write(&path, "[catalogs]\nareas_dir = \"pages\"\nmodels_dir = \"pages\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_accepts_custom_section_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sitegen.toml");
        std::fs::write(&path, "[catalogs]\nareas_dir = \"suburbs\"\nmodels_dir = \"mac_books\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.catalogs.areas_dir, "suburbs");
    }

    #[test]
    fn test_rejects_unparseable_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sitegen.toml");
        std::fs::write(&path, "[site\nbase_url = ").unwrap();
        assert!(load_config(&path).is_err());
    }
}
