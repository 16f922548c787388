//! # sitegen
//!
//! Static page generator for a MacBook screen repair site.
//!
//! Two small JSON catalogs (service areas and MacBook models) become a tree
//! of HTML documents, one per record plus a listing per catalog. A separate
//! command crawls the finished tree and writes `sitemap.xml`, classifying each
//! page with a priority and change frequency from prefix rules.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  Catalogs   │──▶│   Compose    │──▶│  Site tree   │
//! │ areas/models│   │ variant+nbrs │   │ */index.html │
//! └─────────────┘   └──────────────┘   └──────┬───────┘
//!                                             │
//!                                             ▼
//!                                      ┌──────────────┐
//!                                      │ Crawl + rules│
//!                                      │ sitemap.xml  │
//!                                      └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! sitegen areas                 # one page per service area
//! sitegen models                # one page per MacBook model
//! sitegen sitemap               # crawl the tree, write sitemap.xml
//! sitegen migrate --dry-run     # report legacy pages needing new chrome
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`catalog`] | Catalog loading and record validation |
//! | [`variant`] | Deterministic narrative fragment selection |
//! | [`neighbors`] | Region neighbors and listing groups |
//! | [`compose`] | Page templates for areas and models |
//! | [`generate`] | Writes one catalog's documents |
//! | [`crawl`] | Finds marker documents under the site root |
//! | [`metadata`] | Priority / change-frequency rule tables |
//! | [`sitemap`] | Sitemap serialization |
//! | [`migrate`] | Legacy markup migration |

pub mod catalog;
pub mod compose;
pub mod config;
pub mod crawl;
pub mod error;
pub mod generate;
pub mod logging;
pub mod metadata;
pub mod migrate;
pub mod models;
pub mod neighbors;
pub mod sitemap;
pub mod traits;
pub mod variant;
