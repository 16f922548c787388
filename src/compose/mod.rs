//! Template composer.
//!
//! Every page is assembled from the same ordered blocks: metadata head,
//! navigation header, hero, breadcrumb, main content with sidebar, FAQ,
//! call-to-action and footer. Composition is a pure function of its inputs,
//! so re-running over an unchanged catalog reproduces byte-identical output.
//!
//! Record values are HTML-escaped on the way in and never truncated.
//! Narrative fragments are trusted markup with `subst` placeholders.
//!
//! The markup keeps the class contract the browser script relies on:
//! `.mobile-toggle`/`.nav-menu`, `.dropdown`/`.dropdown-toggle`/`.dropdown-menu`,
//! `.accordion-item`/`.accordion-header`/`.accordion-body`, `.header`.

pub mod area;
pub mod model;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::config::Config;
use crate::error::SiteError;
use crate::variant::FaqEntry;

pub use area::AreaPages;
pub use model::ModelPages;

/// Site-wide values the composers interpolate.
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub base_url: String,
    pub brand: String,
    pub areas_dir: String,
    pub models_dir: String,
}

impl SiteContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.site.base_url.trim_end_matches('/').to_string(),
            brand: config.site.brand.clone(),
            areas_dir: config.catalogs.areas_dir.clone(),
            models_dir: config.catalogs.models_dir.clone(),
        }
    }

    /// Absolute URL for a site path such as `/areas/parramatta/`.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Escapes a record value for HTML text or attribute context.
pub fn html(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}

/// Placeholder values for one record, escaped once on insert.
#[derive(Debug, Default)]
pub struct Vars {
    map: HashMap<String, String>,
}

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: &str) -> Self {
        self.map.insert(name.to_string(), html(value).into_owned());
        self
    }

    /// Substitutes `$name` / `${name}` placeholders in a fragment.
    pub fn fill(&self, key: &str, template: &str) -> Result<String, SiteError> {
        subst::substitute(template, &self.map).map_err(|e| SiteError::Compose {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Metadata block for the `<head>`.
pub struct PageMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub canonical: &'a str,
    pub structured_data: Option<serde_json::Value>,
}

pub fn head(out: &mut String, meta: &PageMeta<'_>) {
    out.push_str("<!DOCTYPE html>\n<html lang=\"en-AU\">\n<head>\n");
    out.push_str("    <meta charset=\"UTF-8\">\n");
    out.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    let _ = writeln!(out, "    <title>{}</title>", html(meta.title));
    let _ = writeln!(
        out,
        "    <meta name=\"description\" content=\"{}\">",
        html(meta.description)
    );
    let _ = writeln!(
        out,
        "    <link rel=\"canonical\" href=\"{}\">",
        html(meta.canonical)
    );
    out.push_str(HEAD_IMPORTS);
    out.push('\n');
    if let Some(data) = &meta.structured_data {
        out.push_str("    <script type=\"application/ld+json\">\n");
        out.push_str(&json_ld(data));
        out.push_str("\n    </script>\n");
    }
    out.push_str("</head>\n<body>\n");
}

/// Pretty JSON that cannot close its own `<script>` element.
fn json_ld(data: &serde_json::Value) -> String {
    serde_json::to_string_pretty(data)
        .unwrap_or_default()
        .replace("</", "<\\/")
}

/// Stylesheet and font imports shared by every page.
pub const HEAD_IMPORTS: &str = r#"    <link rel="stylesheet" href="/css/style.css">
    <link rel="preconnect" href="https://fonts.googleapis.com">
    <link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>
    <link href="https://fonts.googleapis.com/css2?family=DM+Sans:wght@400;500;600;700&family=Inter+Tight:wght@400;500;600;700&display=swap" rel="stylesheet">
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css">"#;

/// Navigation header. Also the replacement block for legacy page migration.
pub fn site_header(site: &SiteContext) -> String {
    let brand = html(&site.brand);
    let areas = html(&site.areas_dir);
    let models = html(&site.models_dir);
    format!(
        r#"    <header class="header">
        <div class="header-inner">
            <a href="/" class="logo">
                <img src="/images/logo.svg" alt="{brand}" width="180" height="40">
            </a>
            <nav class="nav-menu">
                <a href="/">Home</a>
                <div class="dropdown">
                    <a href="/services/" class="dropdown-toggle">Services</a>
                    <div class="dropdown-menu">
                        <a href="/services/lcd-only-macbook-screen-repair/">LCD Only Replacement</a>
                        <a href="/services/full-display-macbook-screen-replacement/">Full Display Replacement</a>
                        <a href="/services/true-tone-missing-after-screen-repair/">True Tone Explained</a>
                    </div>
                </div>
                <div class="dropdown">
                    <a href="/{models}/" class="dropdown-toggle">Models</a>
                    <div class="dropdown-menu">
                        <a href="/{models}/">All MacBook Models</a>
                        <a href="/{models}/macbook-air-13-m3-screen-repair/">MacBook Air 13" M3</a>
                        <a href="/{models}/macbook-pro-14-m3-screen-repair/">MacBook Pro 14" M3</a>
                        <a href="/{models}/macbook-pro-16-m3-screen-repair/">MacBook Pro 16" M3</a>
                    </div>
                </div>
                <div class="dropdown">
                    <a href="/{areas}/" class="dropdown-toggle">Areas</a>
                    <div class="dropdown-menu">
                        <a href="/{areas}/">All Service Areas</a>
                        <a href="/{areas}/parramatta/">Parramatta</a>
                        <a href="/{areas}/castle-hill/">Castle Hill</a>
                        <a href="/{areas}/penrith/">Penrith</a>
                    </div>
                </div>
                <a href="/pricing-guide/">Pricing</a>
                <a href="/contact/">Contact</a>
                <div class="mobile-cta">
                    <a href="/book/" class="btn btn-primary">Book Repair</a>
                </div>
            </nav>
            <div class="header-actions">
                <a href="/book/" class="btn btn-primary">Book Repair</a>
                <button class="mobile-toggle" aria-label="Toggle menu">
                    <i class="fas fa-bars"></i>
                    <i class="fas fa-times"></i>
                </button>
            </div>
        </div>
    </header>"#
    )
}

/// Site footer. Also the replacement block for legacy page migration.
pub fn site_footer(site: &SiteContext) -> String {
    let brand = html(&site.brand);
    let areas = html(&site.areas_dir);
    let models = html(&site.models_dir);
    format!(
        r#"    <footer class="footer">
        <div class="footer-grid">
            <div class="footer-brand">
                <img src="/images/logo.svg" alt="{brand}" width="150" height="33">
                <p>Sydney's MacBook screen repair specialists. LCD repairs and full display replacements for all MacBook models.</p>
            </div>
            <div class="footer-links">
                <h4>Services</h4>
                <ul>
                    <li><a href="/services/lcd-only-macbook-screen-repair/">LCD Only Repair</a></li>
                    <li><a href="/services/full-display-macbook-screen-replacement/">Full Display Replacement</a></li>
                    <li><a href="/services/true-tone-missing-after-screen-repair/">True Tone Explained</a></li>
                </ul>
            </div>
            <div class="footer-links">
                <h4>Quick Links</h4>
                <ul>
                    <li><a href="/{models}/">All Models</a></li>
                    <li><a href="/{areas}/">Service Areas</a></li>
                    <li><a href="/pricing-guide/">Pricing Guide</a></li>
                    <li><a href="/warranty/">Warranty</a></li>
                    <li><a href="/contact/">Contact</a></li>
                </ul>
            </div>
            <div class="footer-links">
                <h4>Contact</h4>
                <ul>
                    <li>Sydney, Australia</li>
                    <li>Mon-Sat: 8am-6pm</li>
                </ul>
            </div>
        </div>
        <div class="footer-bottom">
            <p>&copy; 2025 {brand}. All rights reserved.</p>
        </div>
    </footer>"#
    )
}

pub fn hero(out: &mut String, heading: &str, subheading: &str) {
    out.push_str("\n    <section class=\"page-hero\">\n        <div class=\"container\">\n");
    let _ = writeln!(out, "            <h1>{}</h1>", html(heading));
    let _ = writeln!(out, "            <p>{}</p>", html(subheading));
    out.push_str("        </div>\n    </section>\n");
}

/// Breadcrumb trail. Every crumb but the last is a link.
pub fn breadcrumb(out: &mut String, crumbs: &[(&str, &str)]) {
    out.push_str("\n    <div class=\"container\">\n        <div class=\"breadcrumb\">\n");
    for (i, (label, href)) in crumbs.iter().enumerate() {
        if i > 0 {
            out.push_str("            <span>/</span>\n");
        }
        if i + 1 == crumbs.len() {
            let _ = writeln!(out, "            <span>{}</span>", html(label));
        } else {
            let _ = writeln!(out, "            <a href=\"{}\">{}</a>", html(href), html(label));
        }
    }
    out.push_str("        </div>\n    </div>\n");
}

/// Sidebar box of links. `links` are `(href, label)`.
pub fn sidebar_links(out: &mut String, heading: &str, links: &[(String, String)]) {
    out.push_str("                    <div class=\"sidebar-box\">\n");
    let _ = writeln!(out, "                        <h5>{}</h5>", html(heading));
    out.push_str("                        <div class=\"sidebar-links\">\n");
    for (href, label) in links {
        let _ = writeln!(
            out,
            "                            <a href=\"{}\">{}</a>",
            html(href),
            html(label)
        );
    }
    out.push_str("                        </div>\n                    </div>\n");
}

/// Service links shown in every record page's sidebar.
pub fn service_links() -> Vec<(String, String)> {
    [
        ("/services/lcd-only-macbook-screen-repair/", "LCD Only Replacement"),
        ("/services/full-display-macbook-screen-replacement/", "Full Display Replacement"),
        ("/pricing-guide/", "Pricing Guide"),
        ("/warranty/", "Warranty"),
    ]
    .iter()
    .map(|(href, label)| (href.to_string(), label.to_string()))
    .collect()
}

pub fn book_box(out: &mut String) {
    out.push_str(
        r#"                    <div class="sidebar-box sidebar-box-accent">
                        <h5>Book Assessment</h5>
                        <p>Drop off your MacBook for screen assessment.</p>
                        <a href="/book/" class="btn btn-white w-100">Book Now</a>
                    </div>
"#,
    );
}

/// FAQ accordion. Entries are already filled and escaped markup; the first
/// item starts open.
pub fn faq_block(out: &mut String, heading: &str, entries: &[(String, String)]) {
    out.push_str("\n    <section class=\"section section-gray\">\n        <div class=\"container\">\n");
    let _ = writeln!(out, "            <h2 class=\"text-center mb-4\">{}</h2>", html(heading));
    out.push_str("            <div class=\"faq-wrap\">\n                <div class=\"accordion\">\n");
    for (i, (question, answer)) in entries.iter().enumerate() {
        let class = if i == 0 {
            "accordion-item active"
        } else {
            "accordion-item"
        };
        let _ = write!(
            out,
            r#"                    <div class="{class}">
                        <div class="accordion-header">
                            <span>{question}</span>
                            <i class="fas fa-chevron-down"></i>
                        </div>
                        <div class="accordion-body">
                            {answer}
                        </div>
                    </div>
"#
        );
    }
    out.push_str("                </div>\n            </div>\n        </div>\n    </section>\n");
}

/// Fills a variant FAQ entry's question and answer.
pub fn fill_faq(vars: &Vars, key: &str, entry: &FaqEntry) -> Result<(String, String), SiteError> {
    Ok((vars.fill(key, entry.question)?, vars.fill(key, entry.answer)?))
}

pub fn cta(out: &mut String, heading: &str, text: &str, href: &str, button: &str) {
    out.push_str("\n    <section class=\"cta-section\">\n        <div class=\"container\">\n");
    let _ = writeln!(out, "            <h2>{}</h2>", html(heading));
    let _ = writeln!(out, "            <p>{}</p>", html(text));
    let _ = writeln!(
        out,
        "            <a href=\"{}\" class=\"btn btn-white\">{}</a>",
        html(href),
        html(button)
    );
    out.push_str("        </div>\n    </section>\n");
}

/// Footer, script include and document close.
pub fn tail(out: &mut String, site: &SiteContext) {
    out.push('\n');
    out.push_str(&site_footer(site));
    out.push_str("\n\n    <script src=\"/js/main.js\"></script>\n</body>\n</html>\n");
}
