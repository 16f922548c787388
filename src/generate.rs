//! Generation pipeline: one document per catalog record plus a listing.
//!
//! Writes are unconditional. Whether a document is reported as `created`
//! or `updated` only depends on whether the file existed before the write,
//! so re-running over an unchanged catalog reproduces the same tree.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use crate::catalog::load_catalog;
use crate::compose::{AreaPages, ModelPages, SiteContext};
use crate::config::Config;
use crate::error::SiteError;
use crate::models::GeneratedDocument;
use crate::traits::{CatalogRecord, SitePages};

/// Counts for one generation run. `total` includes the listing document.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub created: usize,
    pub updated: usize,
    /// `(record key, reason)` for every record that produced no document.
    pub failed: Vec<(String, String)>,
    pub total: usize,
}

enum WriteOutcome {
    Created,
    Updated,
}

/// Composes and writes every record of `pages`, then the listing.
///
/// Record failures are isolated: they are collected in the report and the
/// run moves on. With `dry_run` nothing touches the filesystem; outcomes are
/// classified from what already exists.
pub fn generate<P: SitePages>(
    pages: &P,
    root: &Path,
    marker: &str,
    dry_run: bool,
) -> GenerateReport {
    let mut report = GenerateReport::default();
    let section = root.join(pages.section_dir());

    for rejected in pages.catalog().rejected() {
        report
            .failed
            .push((rejected.key.clone(), rejected.error.to_string()));
    }

    for record in pages.catalog().records() {
        let key = record.key();
        let document = match pages.compose_record(record) {
            Ok(content) => GeneratedDocument {
                route: format!("{}/{}/{}", pages.section_dir(), key, marker),
                content,
            },
            Err(e) => {
                warn!(catalog = pages.name(), key, error = %e, "compose failed");
                report.failed.push((key.to_string(), e.to_string()));
                continue;
            }
        };

        let path = section.join(key).join(marker);
        match write_document(&path, &document.content, dry_run) {
            Ok(outcome) => {
                debug!(route = %document.route, "document written");
                report.record(outcome);
            }
            Err(e) => {
                warn!(catalog = pages.name(), key, error = %e, "write failed");
                report.failed.push((key.to_string(), e.to_string()));
            }
        }
    }

    let listing = pages.compose_listing();
    let listing_path = section.join(marker);
    match write_document(&listing_path, &listing, dry_run) {
        Ok(outcome) => report.record(outcome),
        Err(e) => {
            warn!(catalog = pages.name(), error = %e, "listing write failed");
            report.failed.push((pages.section_dir().to_string(), e.to_string()));
        }
    }

    info!(
        catalog = pages.name(),
        created = report.created,
        updated = report.updated,
        failed = report.failed.len(),
        dry_run,
        "generation finished"
    );
    report
}

impl GenerateReport {
    fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Created => self.created += 1,
            WriteOutcome::Updated => self.updated += 1,
        }
        self.total += 1;
    }
}

fn write_document(path: &Path, content: &str, dry_run: bool) -> Result<WriteOutcome, SiteError> {
    let existed = path.exists();
    if !dry_run {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| write_error(dir, source))?;
        }
        std::fs::write(path, content).map_err(|source| write_error(path, source))?;
    }
    Ok(if existed {
        WriteOutcome::Updated
    } else {
        WriteOutcome::Created
    })
}

fn write_error(path: &Path, source: std::io::Error) -> SiteError {
    SiteError::Write {
        path: PathBuf::from(path),
        source,
    }
}

/// `sitegen areas`
pub fn run_areas(config: &Config, dry_run: bool) -> Result<()> {
    let catalog = load_catalog(config.areas_catalog())?;
    let site = SiteContext::from_config(config);
    let pages = AreaPages::new(&site, &catalog, config.neighbors.policy());
    finish(&pages, config, dry_run)
}

/// `sitegen models`
pub fn run_models(config: &Config, dry_run: bool) -> Result<()> {
    let catalog = load_catalog(config.models_catalog())?;
    let site = SiteContext::from_config(config);
    let pages = ModelPages::new(&site, &catalog, config.neighbors.max);
    finish(&pages, config, dry_run)
}

fn finish<P: SitePages>(pages: &P, config: &Config, dry_run: bool) -> Result<()> {
    let report = generate(pages, &config.site.root, &config.site.marker, dry_run);
    print_report(pages.name(), &report, dry_run);
    if !report.failed.is_empty() {
        bail!("{} {} record(s) failed", report.failed.len(), pages.name());
    }
    Ok(())
}

fn print_report(name: &str, report: &GenerateReport, dry_run: bool) {
    if dry_run {
        println!("{} (dry-run)", name);
    } else {
        println!("{}", name);
    }
    println!("  created: {}", report.created);
    println!("  updated: {}", report.updated);
    println!("  failed: {}", report.failed.len());
    println!("  total: {}", report.total);
    for (key, reason) in &report.failed {
        println!("  failed {}: {}", key, reason);
    }
    if report.failed.is_empty() {
        println!("ok");
    }
}
