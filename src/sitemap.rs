//! Sitemap serializer.
//!
//! Crawls the site root, classifies every marker document with the metadata
//! tables and writes a `urlset` document conforming to the sitemaps.org 0.9
//! schema. The file is regenerated wholesale on every run.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::crawl::{crawl, CrawlOptions};
use crate::error::SiteError;
use crate::metadata::resolve_metadata;
use crate::models::SitemapEntry;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Outcome of a sitemap run, printed as the command summary.
#[derive(Debug)]
pub struct SitemapReport {
    pub output: PathBuf,
    pub urls: usize,
}

pub fn run_sitemap(config: &Config) -> Result<SitemapReport> {
    let root = &config.site.root;
    let options = CrawlOptions {
        marker: &config.site.marker,
        skip_dirs: &config.sitemap.skip_dirs,
        exclude_globs: &config.sitemap.exclude_globs,
    };

    let paths = crawl(root, &options)?;
    info!(pages = paths.len(), root = %root.display(), "crawl complete");

    let entries = build_entries(root, &paths, config);
    let xml = serialize(&entries);

    let output = config.sitemap_path();
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&output, &xml)
        .with_context(|| format!("Failed to write sitemap: {}", output.display()))?;

    Ok(SitemapReport {
        output,
        urls: entries.len(),
    })
}

/// One entry per crawled path, in crawl order. Paths whose modification time
/// cannot be read are logged and left out.
pub fn build_entries(root: &Path, paths: &[String], config: &Config) -> Vec<SitemapEntry> {
    let mut entries = Vec::with_capacity(paths.len());

    for relative in paths {
        let full = root.join(relative);
        let modified = match std::fs::metadata(&full).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                warn!(
                    "{}",
                    SiteError::CrawlRead {
                        path: full,
                        reason: e.to_string(),
                    }
                );
                continue;
            }
        };

        let (priority, change_frequency) = resolve_metadata(
            relative,
            &config.sitemap.priority,
            &config.sitemap.changefreq,
        );

        entries.push(SitemapEntry {
            location: page_url(&config.site.base_url, relative, &config.site.marker),
            last_modified: DateTime::<Utc>::from(modified).date_naive(),
            change_frequency,
            priority,
        });
    }

    entries
}

/// Absolute URL for a root-relative marker path.
///
/// The root marker becomes `<base>/`; `dir/<marker>` becomes `<base>/dir/`.
/// Trailing slashes on `base_url` are dropped so the join has exactly one.
pub fn page_url(base_url: &str, relative_path: &str, marker: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if relative_path == marker {
        return format!("{}/", base);
    }
    let suffix = format!("/{}", marker);
    match relative_path.strip_suffix(&suffix) {
        Some(dir) => format!("{}/{}/", base, dir),
        None => format!("{}/{}", base, relative_path),
    }
}

pub fn serialize(entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{}\">", SITEMAP_NAMESPACE);

    for entry in entries {
        let lastmod = entry.last_modified.format("%Y-%m-%d").to_string();
        let changefreq = entry.change_frequency.to_string();
        let priority = entry.priority.to_string();

        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape(entry.location.as_str()));
        let _ = writeln!(xml, "    <lastmod>{}</lastmod>", escape(lastmod.as_str()));
        let _ = writeln!(xml, "    <changefreq>{}</changefreq>", escape(changefreq.as_str()));
        let _ = writeln!(xml, "    <priority>{}</priority>", escape(priority.as_str()));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}
