//! # sitegen CLI
//!
//! The `sitegen` binary drives page generation, sitemap output and the
//! legacy markup migration.
//!
//! ## Usage
//!
//! ```bash
//! sitegen --config ./config/sitegen.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sitegen areas` | Generate one page per service area plus the areas listing |
//! | `sitegen models` | Generate one page per MacBook model plus the models listing |
//! | `sitegen sitemap` | Crawl the site root and write `sitemap.xml` |
//! | `sitegen migrate` | Rewrite legacy pages to the current header and footer |
//!
//! Every command runs without flags; a missing config file means defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sitegen::{config, generate, logging, migrate, sitemap};

/// Static page generator for the MacBook screen repair site.
#[derive(Parser)]
#[command(
    name = "sitegen",
    about = "Static page generator for service-area and model pages, plus sitemap output",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/sitegen.toml`. When the file does not exist,
    /// built-in defaults are used.
    #[arg(long, global = true, default_value = "./config/sitegen.toml")]
    config: PathBuf,

    /// Debug-level logging on stderr (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate service-area pages.
    ///
    /// Writes `<areas_dir>/<slug>/index.html` for every valid record and the
    /// `<areas_dir>/index.html` listing. Exits non-zero if any record failed.
    Areas {
        /// Compose every page and report counts without writing anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate MacBook model pages.
    ///
    /// Writes `<models_dir>/<slug>/index.html` for every valid record and the
    /// `<models_dir>/index.html` listing. Exits non-zero if any record failed.
    Models {
        /// Compose every page and report counts without writing anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Crawl the site root and write the sitemap.
    Sitemap,

    /// Migrate legacy pages to the current chrome.
    ///
    /// Pages without the legacy `nav-links` navigation are skipped, so this
    /// can be re-run safely.
    Migrate {
        /// Report which pages would change without writing them.
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::setup_logging(if cli.verbose {
        logging::VERBOSE_FILTER
    } else {
        logging::DEFAULT_FILTER
    });

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Areas { dry_run } => {
            generate::run_areas(&cfg, dry_run)?;
        }
        Commands::Models { dry_run } => {
            generate::run_models(&cfg, dry_run)?;
        }
        Commands::Sitemap => {
            let report = sitemap::run_sitemap(&cfg)?;
            println!("sitemap");
            println!("  urls: {}", report.urls);
            println!("  output: {}", report.output.display());
            println!("ok");
        }
        Commands::Migrate { dry_run } => {
            migrate::run_migrate(&cfg, dry_run)?;
        }
    }

    Ok(())
}
