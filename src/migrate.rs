//! Legacy markup migration.
//!
//! Older hand-built pages used relative links and a `nav-links` header. The
//! migration rewrites them in place to the current chrome: absolute links,
//! the shared head imports, the current header and footer. A page without the
//! legacy `nav-links` marker is considered migrated and left untouched, so
//! running the migration twice changes nothing the second time.

use std::path::Path;

use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use tracing::{debug, info};

use crate::compose::{site_footer, site_header, SiteContext, HEAD_IMPORTS};
use crate::config::Config;

const LEGACY_MARKER: &str = "nav-links";

/// Compiled legacy-block patterns plus the replacement chrome for one site.
pub struct Migrator {
    head_imports: Regex,
    header: Regex,
    footer: Regex,
    site_header: String,
    site_footer: String,
}

impl Migrator {
    pub fn new(site: &SiteContext) -> Result<Self> {
        Ok(Self {
            head_imports: Regex::new(
                r#"[ \t]*<link rel="stylesheet" href="/css/style\.css">(?s:.*?)<link href="https://fonts\.googleapis\.com/css2\?family=Inter[^"]*" rel="stylesheet">"#,
            )?,
            header: Regex::new(r#"[ \t]*<header class="header">(?s:.*?)</header>"#)?,
            footer: Regex::new(r#"[ \t]*<footer class="footer">(?s:.*?)</footer>"#)?,
            site_header: site_header(site),
            site_footer: site_footer(site),
        })
    }

    /// Rewrites one legacy document. `section` is the directory the
    /// document's parent link (`href="../"`) points at. Returns `None` when
    /// the document is already migrated.
    pub fn migrate(&self, content: &str, section: &str) -> Option<String> {
        if is_migrated(content) {
            return None;
        }
        let section = section.trim_matches('/');

        let mut out = content
            .replace("href=\"../../", "href=\"/")
            .replace("href=\"../\"", &format!("href=\"/{}/\"", section))
            .replace("href=\"../", "href=\"/")
            .replace("src=\"../../", "src=\"/");

        out = self.head_imports.replace(&out, NoExpand(HEAD_IMPORTS)).into_owned();
        out = self
            .header
            .replace(&out, NoExpand(&self.site_header))
            .into_owned();
        out = self
            .footer
            .replace(&out, NoExpand(&self.site_footer))
            .into_owned();

        Some(
            out.replace("<a href=\"//\">Home</a>", "<a href=\"/\">Home</a>")
                .replace(
                    &format!("<a href=\"/{}//\">", section),
                    &format!("<a href=\"/{}/\">", section),
                ),
        )
    }
}

pub fn is_migrated(content: &str) -> bool {
    !content.contains(LEGACY_MARKER)
}

/// Outcome of a migration run, printed as the command summary.
#[derive(Debug, Default)]
pub struct MigrateReport {
    pub migrated: usize,
    pub skipped: usize,
}

/// `sitegen migrate`: every `<dir>/<child>/<marker>` under the site root.
pub fn run_migrate(config: &Config, dry_run: bool) -> Result<MigrateReport> {
    let mut report = MigrateReport::default();
    let migrator = Migrator::new(&SiteContext::from_config(config))?;
    let marker = &config.site.marker;

    for dir in &config.migrate.dirs {
        let section = config.site.root.join(dir);
        if !section.is_dir() {
            info!(dir = %section.display(), "migration directory missing, skipping");
            continue;
        }
        let mut children: Vec<_> = std::fs::read_dir(&section)
            .with_context(|| format!("Failed to list {}", section.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        children.sort();

        for child in children {
            let page = child.join(marker);
            if !page.is_file() {
                continue;
            }
            if migrate_file(&migrator, &page, dir, dry_run)? {
                report.migrated += 1;
            } else {
                report.skipped += 1;
            }
        }
    }

    if dry_run {
        println!("migrate (dry-run)");
    } else {
        println!("migrate");
    }
    println!("  migrated: {}", report.migrated);
    println!("  skipped: {}", report.skipped);
    println!("ok");
    Ok(report)
}

fn migrate_file(migrator: &Migrator, path: &Path, section: &str, dry_run: bool) -> Result<bool> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    match migrator.migrate(&content, section) {
        Some(updated) => {
            if !dry_run {
                std::fs::write(path, updated)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            info!(path = %path.display(), dry_run, "migrated");
            Ok(true)
        }
        None => {
            debug!(path = %path.display(), "already migrated");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(brand: &str) -> SiteContext {
        SiteContext {
            base_url: "https://example.com.au".to_string(),
            brand: brand.to_string(),
            areas_dir: "areas".to_string(),
            models_dir: "models".to_string(),
        }
    }

    const LEGACY: &str = r#"<!DOCTYPE html>
<html>
<head>
    <link rel="stylesheet" href="/css/style.css">
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;600&display=swap" rel="stylesheet">
</head>
<body>
    <header class="header">
        <ul class="nav-links">
            <li><a href="../../">Home</a></li>
            <li><a href="../">Models</a></li>
        </ul>
    </header>
    <div class="breadcrumb"><a href="../../index.html">Home</a></div>
    <img src="../../images/logo.svg">
    <footer class="footer">
        <p>old footer</p>
    </footer>
    <script src="/js/main.js"></script>
</body>
</html>
"#;

    #[test]
    fn test_legacy_page_is_rewritten() {
        let migrator = Migrator::new(&site("Mac Screen Repair Sydney")).unwrap();
        let out = migrator.migrate(LEGACY, "models").unwrap();
        assert!(is_migrated(&out));
        assert!(out.contains("<nav class=\"nav-menu\">"));
        assert!(out.contains("family=DM+Sans"));
        assert!(out.contains("<a href=\"/index.html\">Home</a>"));
        assert!(out.contains("src=\"/images/logo.svg\""));
        assert!(!out.contains("old footer"));
        assert!(!out.contains("../"));
        assert_eq!(out.matches("<header class=\"header\">").count(), 1);
        assert_eq!(out.matches("<footer class=\"footer\">").count(), 1);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let migrator = Migrator::new(&site("Brand")).unwrap();
        let once = migrator.migrate(LEGACY, "models").unwrap();
        assert!(migrator.migrate(&once, "models").is_none());
    }

    #[test]
    fn test_brand_with_dollar_is_literal() {
        let migrator = Migrator::new(&site("Screens $1 Off")).unwrap();
        let out = migrator.migrate(LEGACY, "models").unwrap();
        assert!(out.contains("alt=\"Screens $1 Off\""));
    }

    #[test]
    fn test_current_page_is_skipped() {
        let page = format!("<html><body>\n{}\n</body></html>", site_header(&site("Brand")));
        let migrator = Migrator::new(&site("Brand")).unwrap();
        assert!(migrator.migrate(&page, "models").is_none());
    }
}
