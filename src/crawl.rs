//! Directory crawler for the sitemap.
//!
//! Finds every marker document under the site root. Hidden directories and
//! the configured deny-list are pruned without being descended into.
//! Unreadable entries are logged and skipped. Symlinks are not descended
//! into, but a symlinked marker that resolves to a file is listed.

use anyhow::{bail, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::SiteError;

/// What to look for and what to leave out.
#[derive(Debug, Clone)]
pub struct CrawlOptions<'a> {
    pub marker: &'a str,
    pub skip_dirs: &'a [String],
    pub exclude_globs: &'a [String],
}

/// Root-relative, `/`-separated paths of every marker file under `root`,
/// sorted lexicographically.
pub fn crawl(root: &Path, options: &CrawlOptions<'_>) -> Result<Vec<String>> {
    if !root.is_dir() {
        bail!("Site root does not exist or is not a directory: {}", root.display());
    }

    let exclude_set = build_globset(options.exclude_globs)?;
    let mut paths = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry, options.skip_dirs));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                let err = SiteError::CrawlRead {
                    path,
                    reason: e.to_string(),
                };
                warn!("{}", err);
                continue;
            }
        };

        if entry.file_name() != options.marker || !is_marker_file(&entry) {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let rel_str = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if exclude_set.is_match(&rel_str) {
            debug!(path = %rel_str, "excluded by glob");
            continue;
        }

        paths.push(rel_str);
    }

    // Sort for deterministic ordering
    paths.sort();

    Ok(paths)
}

fn is_marker_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

fn is_skipped_dir(entry: &DirEntry, skip_dirs: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || skip_dirs.iter().any(|d| *d == name)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<html></html>").unwrap();
    }

    fn options<'a>(skip: &'a [String], exclude: &'a [String]) -> CrawlOptions<'a> {
        CrawlOptions {
            marker: "index.html",
            skip_dirs: skip,
            exclude_globs: exclude,
        }
    }

    #[test]
    fn test_finds_markers_sorted() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "models/index.html");
        touch(root, "areas/parramatta/index.html");
        touch(root, "index.html");
        touch(root, "areas/index.html");
        touch(root, "areas/castle-hill/index.html");
        touch(root, "areas/castle-hill/notes.html");
        touch(root, "css/style.css");

        let paths = crawl(root, &options(&[], &[])).unwrap();
        assert_eq!(
            paths,
            vec![
                "areas/castle-hill/index.html",
                "areas/index.html",
                "areas/parramatta/index.html",
                "index.html",
                "models/index.html",
            ]
        );
    }

    #[test]
    fn test_skips_hidden_and_denylisted_dirs() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "index.html");
        touch(root, ".git/index.html");
        touch(root, ".cache/page/index.html");
        touch(root, "node_modules/pkg/index.html");
        touch(root, "about/index.html");

        let skip = vec!["node_modules".to_string()];
        let paths = crawl(root, &options(&skip, &[])).unwrap();
        assert_eq!(paths, vec!["about/index.html", "index.html"]);
    }

    #[test]
    fn test_exclude_globs() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "index.html");
        touch(root, "drafts/new/index.html");

        let exclude = vec!["drafts/**".to_string()];
        let paths = crawl(root, &options(&[], &exclude)).unwrap();
        assert_eq!(paths, vec!["index.html"]);
    }

    #[test]
    fn test_crawl_twice_is_identical() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        for rel in ["b/index.html", "a/index.html", "a/z/index.html", "index.html"] {
            touch(root, rel);
        }
        let first = crawl(root, &options(&[], &[])).unwrap();
        let second = crawl(root, &options(&[], &[])).unwrap();
        assert_eq!(first, second);
        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(first, sorted);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_marker_is_listed() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "shared/page.html");
        fs::create_dir_all(root.join("linked")).unwrap();
        symlink(root.join("shared/page.html"), root.join("linked/index.html")).unwrap();
        // dangling link is not a page
        fs::create_dir_all(root.join("broken")).unwrap();
        symlink(root.join("missing.html"), root.join("broken/index.html")).unwrap();

        let paths = crawl(root, &options(&[], &[])).unwrap();
        assert_eq!(paths, vec!["linked/index.html"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_dir_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "a/index.html");
        touch(root, "locked/x/index.html");
        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores permission bits, so there is nothing to observe
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = crawl(root, &options(&[], &[]));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(result.unwrap(), vec!["a/index.html"]);
    }

    #[test]
    fn test_missing_root_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(crawl(&tmp.path().join("nope"), &options(&[], &[])).is_err());
    }
}
