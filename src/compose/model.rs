//! Product-model pages and the models listing.
//!
//! Besides the hashed variant, several sections depend on record attributes:
//! chip family, model year, Touch Bar titles and the color-adaptive display
//! flag. Those are still pure functions of the record.

use std::fmt::Write as _;

use serde_json::json;

use super::{
    book_box, breadcrumb, cta, faq_block, fill_faq, head, hero, html, service_links, sidebar_links,
    site_header, tail, PageMeta, SiteContext, Vars,
};
use crate::catalog::Catalog;
use crate::error::SiteError;
use crate::models::ModelRecord;
use crate::neighbors::{category_neighbors, group_by_category};
use crate::traits::SitePages;
use crate::variant::{select_variant, ContentVariant, FaqEntry};

/// Model catalog rendered as pages.
pub struct ModelPages<'a> {
    site: &'a SiteContext,
    catalog: &'a Catalog<ModelRecord>,
    related: usize,
}

impl<'a> ModelPages<'a> {
    /// `related` caps the same-category links in each page's sidebar.
    pub fn new(site: &'a SiteContext, catalog: &'a Catalog<ModelRecord>, related: usize) -> Self {
        Self {
            site,
            catalog,
            related,
        }
    }
}

impl SitePages for ModelPages<'_> {
    type Record = ModelRecord;

    fn name(&self) -> &str {
        "models"
    }

    fn section_dir(&self) -> &str {
        &self.site.models_dir
    }

    fn catalog(&self) -> &Catalog<ModelRecord> {
        self.catalog
    }

    fn compose_record(&self, record: &ModelRecord) -> Result<String, SiteError> {
        let variant = select_variant(record);
        let related = category_neighbors(record, self.catalog.records(), self.related);
        compose_model(self.site, record, &variant, &related)
    }

    fn compose_listing(&self) -> String {
        compose_model_listing(self.site, self.catalog.records())
    }
}

fn model_vars(model: &ModelRecord) -> Vars {
    Vars::new()
        .set("title", &model.title)
        .set("short", &model.short_title)
        .set("identifier", model.identifier_or_default())
        .set("display", model.display_kind_or_default())
        .set("resolution", model.resolution_or_default())
        .set("line", model.line())
        .set("year", model.year_or_default())
}

/// Questions every model page answers, before its variant question.
fn fixed_faqs(model: &ModelRecord) -> [FaqEntry; 4] {
    let adaptive = if model.has_color_adaptive_display {
        FaqEntry {
            question: "Will True Tone still work?",
            answer: "With LCD only yes. With a full assembly replacement it will not transfer.",
        }
    } else {
        FaqEntry {
            question: "Is LCD only cheaper than full assembly?",
            answer: "Yes LCD only costs less when your housing is in good condition.",
        }
    };
    let which = match (&model.identifier, &model.year) {
        (Some(_), Some(_)) => FaqEntry {
            question: "Is $identifier the $short?",
            answer: "Yes $identifier is the $title from $year.",
        },
        (Some(_), None) => FaqEntry {
            question: "Is $identifier the $short?",
            answer: "Yes $identifier is the $title.",
        },
        (None, _) => FaqEntry {
            question: "How do I know which model I have?",
            answer: "Check Apple menu &gt; About This Mac or look at the model number on the bottom case.",
        },
    };
    [
        FaqEntry {
            question: "How long does the repair take?",
            answer: "LCD only usually same day. Full assembly can be a day or two.",
        },
        adaptive,
        which,
        FaqEntry {
            question: "Do you need to keep the MacBook overnight?",
            answer: "Not usually for LCD only repairs. Depends on parts availability.",
        },
    ]
}

fn story_paragraph(model: &ModelRecord, variant: &ContentVariant) -> String {
    let story = variant.story;
    let which = match &model.identifier {
        Some(id) => format!("an {}", html(id)),
        None => "one".to_string(),
    };
    let duration = if model.is_older() {
        "two to three hours"
    } else {
        "a few hours"
    };
    let family = if model.is_apple_silicon() {
        "Apple Silicon"
    } else if model.is_older() {
        "these older"
    } else {
        "these"
    };
    format!(
        "<p>Had {} come in from a customer over in {} with {}. {}. Took about {} and they had it back same day. That is the kind of turnaround we aim for on {} MacBook {} models.</p>",
        which,
        story.location,
        story.issue,
        story.detail,
        duration,
        family,
        model.line()
    )
}

fn repair_story(model: &ModelRecord) -> String {
    let short = html(&model.short_title);
    if model.is_apple_silicon() {
        let condition = if model.is_recent() {
            "new enough that housings are usually still in good condition"
        } else {
            "well built and housings hold up unless there has been a serious impact"
        };
        format!(
            "<p>Most of the {} screens we see are candidates for LCD only. The machines are {}. We had one come in where someone had sat on it and bent the whole lid. Full assembly was the only option there. Cost more but the display works perfectly now.</p>",
            short, condition
        )
    } else {
        let age = if model.is_older() {
            "for quite a while now"
        } else {
            "a few years"
        };
        format!(
            "<p>The {} has been around {} so we see all sorts of conditions. Some housings are pristine despite cracked screens. Others have taken a beating over the years. We assess each one individually and recommend the most cost effective repair.</p>",
            short, age
        )
    }
}

fn additional_issues(model: &ModelRecord) -> String {
    let short = html(&model.short_title);
    if model.is_apple_silicon() {
        let lead = if model.is_recent() {
            format!(
                "The {} is still relatively new so we are not seeing wear related cable failures yet but",
                short
            )
        } else {
            "These can develop over time and".to_string()
        };
        format!(
            "<p>Some units come in with display cable issues. Flickering or intermittent blackouts. {} physical damage can affect the cable connection.</p>",
            lead
        )
    } else if model.is_touch_bar() {
        format!(
            "<p>The {} can also have issues with the display flex cable from regular opening and closing over time. Flickering or intermittent display problems sometimes point to cable rather than LCD issues. We diagnose properly before recommending repairs.</p>",
            short
        )
    } else if model.is_older() {
        format!(
            "<p>Older MacBook {} models can have backlight issues separate from LCD damage. We see units with working LCD panels but failed backlights. Different repair approach depending on what is actually wrong.</p>",
            model.line()
        )
    } else {
        "<p>Vertical lines and dead spots can show up too. These are usually LCD failure rather than physical damage but the repair approach is the same. We diagnose the actual issue before recommending anything.</p>".to_string()
    }
}

pub fn compose_model(
    site: &SiteContext,
    model: &ModelRecord,
    variant: &ContentVariant,
    related: &[&ModelRecord],
) -> Result<String, SiteError> {
    let key = model.key.as_str();
    let title_text = model.title.as_str();
    let identifier = model.identifier_or_default();
    let vars = model_vars(model);

    let models_href = format!("/{}/", site.models_dir);
    let canonical = site.absolute(&format!("/{}/{}/", site.models_dir, key));
    let title = format!(
        "{} Screen Repair | LCD Replacement {} Sydney",
        title_text, identifier
    );
    let description = format!(
        "{} screen repair in Sydney. LCD replacement and full display assembly for {} models. Professional service at {}.",
        title_text, identifier, site.brand
    );
    let mut structured_data = json!({
        "@context": "https://schema.org",
        "@type": "Service",
        "name": format!("{} Screen Repair", title_text),
        "description": format!(
            "LCD panel replacement and full display assembly replacement for the {}.",
            title_text
        ),
        "provider": {
            "@type": "LocalBusiness",
            "name": site.brand,
            "url": site.absolute("/"),
        },
        "areaServed": {
            "@type": "City",
            "name": "Sydney",
        },
        "about": {
            "@type": "Product",
            "name": title_text,
            "brand": "Apple",
        },
    });
    if let Some(id) = &model.identifier {
        structured_data["about"]["model"] = json!(id);
    }

    let mut out = String::new();
    head(
        &mut out,
        &PageMeta {
            title: &title,
            description: &description,
            canonical: &canonical,
            structured_data: Some(structured_data),
        },
    );
    out.push_str(&site_header(site));
    out.push('\n');
    hero(
        &mut out,
        &format!("{} Screen Repair", title_text),
        &format!(
            "{} display replacement for {} models in Sydney",
            model.display_kind_or_default(),
            identifier
        ),
    );
    breadcrumb(
        &mut out,
        &[("Home", "/"), ("Models", &models_href), (title_text, "")],
    );

    out.push_str(
        "\n    <section class=\"section section-light\">\n        <div class=\"container\">\n            <div class=\"two-col-content\">\n                <div class=\"content-block\">\n",
    );
    let _ = writeln!(out, "                    <h2>{} Screen Repairs</h2>", html(title_text));
    para(&mut out, &vars.fill(key, variant.intro)?);
    para(&mut out, &story_paragraph(model, variant));

    let options_title = if model.is_apple_silicon() {
        "LCD Only vs Full Display"
    } else {
        "Repair Options"
    };
    let _ = writeln!(out, "\n                    <h2>{}</h2>", options_title);
    para(&mut out, &vars.fill(key, variant.repair_path)?);
    para(&mut out, &vars.fill(key, variant.options)?);
    para(&mut out, &repair_story(model));

    if model.has_color_adaptive_display {
        let short = html(&model.short_title);
        let subject = model
            .identifier
            .as_deref()
            .map(html)
            .unwrap_or_else(|| short.clone());
        let _ = writeln!(out, "\n                    <h2>True Tone on the {}</h2>", short);
        para(
            &mut out,
            &format!(
                "<p>True Tone adjusts white balance based on ambient lighting. On the {} the True Tone data lives in the original display housing. LCD only repair preserves True Tone because the housing stays in place. Full assembly replacement means new hardware and the calibration does not transfer across automatically.</p>",
                subject
            ),
        );
        para(
            &mut out,
            "<p>Most people do not notice True Tone missing after a full assembly replacement. It works in the background. If it matters to your workflow we can discuss the options before proceeding.</p>",
        );
    }

    out.push_str("\n                    <h2>Common Issues We See</h2>\n");
    para(&mut out, &vars.fill(key, variant.issues)?);
    para(&mut out, &additional_issues(model));

    out.push_str("\n                    <h2>Pricing and Turnaround</h2>\n");
    para(&mut out, &vars.fill(key, variant.pricing)?);
    let turnaround_subject = model
        .identifier
        .as_deref()
        .unwrap_or(model.short_title.as_str());
    para(
        &mut out,
        &format!(
            "<p>For LCD only repairs on {} models we can usually turn around same day if parts are in stock. Full assembly might take a day or two depending on availability.</p>",
            html(turnaround_subject)
        ),
    );

    out.push_str("\n                    <h2>Service Areas</h2>\n");
    para(
        &mut out,
        &format!(
            "<p>We service {} repairs across Sydney including Parramatta, Castle Hill, Penrith and surrounding areas. Most customers drop off in person but we can discuss other arrangements if needed.</p>",
            html(title_text)
        ),
    );
    out.push_str("                </div>\n\n                <div class=\"sidebar\">\n");

    spec_box(&mut out, model);
    sidebar_links(&mut out, "Services", &service_links());
    let mut related_links: Vec<(String, String)> = related
        .iter()
        .map(|m| (format!("/{}/{}/", site.models_dir, m.key), m.title.clone()))
        .collect();
    related_links.push((models_href.clone(), "All Models".to_string()));
    sidebar_links(&mut out, "Related Models", &related_links);
    book_box(&mut out);
    out.push_str("                </div>\n            </div>\n        </div>\n    </section>\n");

    let mut faqs = Vec::with_capacity(5);
    for entry in fixed_faqs(model).iter().chain(std::iter::once(variant.faq)) {
        faqs.push(fill_faq(&vars, key, entry)?);
    }
    faq_block(&mut out, &format!("{} Questions", title_text), &faqs);

    cta(
        &mut out,
        &format!("Get Your {} Screen Fixed", model.short_title),
        "Bring it in for a free assessment. We take a look and give you an accurate quote.",
        "/book/",
        "Book Assessment",
    );
    tail(&mut out, site);

    Ok(out)
}

fn para(out: &mut String, markup: &str) {
    let _ = writeln!(out, "                    {}", markup);
}

fn spec_box(out: &mut String, model: &ModelRecord) {
    let rows = [
        ("Model", model.title.as_str()),
        ("Identifier", model.identifier_or_default()),
        ("Year", model.year_or_default()),
        ("Display", model.display_kind_or_default()),
        ("Resolution", model.resolution_or_default()),
        ("Chip", model.chip_or_default()),
        (
            "True Tone",
            if model.has_color_adaptive_display {
                "Yes"
            } else {
                "No"
            },
        ),
    ];
    out.push_str("                    <div class=\"sidebar-box\">\n                        <h5>Model Details</h5>\n                        <ul class=\"device-specs\">\n");
    for (label, value) in rows {
        let _ = writeln!(
            out,
            "                            <li><strong>{}:</strong> {}</li>",
            label,
            html(value)
        );
    }
    out.push_str("                        </ul>\n                    </div>\n");
}

/// Models listing grouped in canonical category order; empty categories omitted.
pub fn compose_model_listing(site: &SiteContext, models: &[ModelRecord]) -> String {
    let path = format!("/{}/", site.models_dir);
    let canonical = site.absolute(&path);
    let title = format!(
        "MacBook Models | Screen Repair for All MacBook Pro & Air Models | {}",
        site.brand
    );
    let description = format!(
        "Screen repair for MacBook Pro and MacBook Air models. Find your model and book a repair at {}.",
        site.brand
    );

    let mut out = String::new();
    head(
        &mut out,
        &PageMeta {
            title: &title,
            description: &description,
            canonical: &canonical,
            structured_data: None,
        },
    );
    out.push_str(&site_header(site));
    out.push('\n');
    hero(
        &mut out,
        "MacBook Models We Repair",
        "Screen repairs for every MacBook Pro and MacBook Air",
    );
    breadcrumb(&mut out, &[("Home", "/"), ("Models", "")]);

    out.push_str("\n    <section class=\"section section-light\">\n        <div class=\"container\">\n");
    out.push_str("            <p class=\"intro-text\">We repair screens on all MacBook Pro and MacBook Air models. Find your model below or <a href=\"/contact/\">get in touch</a> if you are not sure which one you have.</p>\n");
    for (category, members) in group_by_category(models) {
        let _ = writeln!(out, "\n            <h2>{}</h2>", html(category.label()));
        out.push_str("            <div class=\"model-grid\">\n");
        for model in members {
            let detail = model
                .identifier
                .as_deref()
                .unwrap_or(model.display_kind_or_default());
            let _ = writeln!(
                out,
                "                <a href=\"{}{}/\" class=\"model-card\">\n                    <h3>{}</h3>\n                    <p>{} &bull; {}</p>\n                </a>",
                html(&path),
                html(&model.key),
                html(&model.title),
                html(model.year_or_default()),
                html(detail)
            );
        }
        out.push_str("            </div>\n");
    }
    out.push_str("        </div>\n    </section>\n");

    cta(
        &mut out,
        "Not Sure Which Model You Have?",
        "No worries. Get in touch and we can help you identify it.",
        "/contact/",
        "Contact Us",
    );
    tail(&mut out, site);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelCategory;

    fn site() -> SiteContext {
        SiteContext {
            base_url: "https://example.com.au".to_string(),
            brand: "Mac Screen Repair Sydney".to_string(),
            areas_dir: "areas".to_string(),
            models_dir: "models".to_string(),
        }
    }

    fn air_m3() -> ModelRecord {
        ModelRecord {
            key: "macbook-air-13-m3-screen-repair".to_string(),
            title: "MacBook Air 13\" M3".to_string(),
            short_title: "Air M3".to_string(),
            identifier: Some("A3113".to_string()),
            year: Some("2024".to_string()),
            display_kind: Some("Liquid Retina".to_string()),
            resolution: Some("2560 x 1664".to_string()),
            chip_family: Some("Apple M3".to_string()),
            has_color_adaptive_display: true,
            category: ModelCategory::AirAppleSilicon,
        }
    }

    fn unibody() -> ModelRecord {
        ModelRecord {
            key: "macbook-pro-unibody-2010".to_string(),
            title: "MacBook Pro 13 Unibody".to_string(),
            short_title: "Pro Unibody".to_string(),
            identifier: None,
            year: Some("2010".to_string()),
            display_kind: None,
            resolution: None,
            chip_family: None,
            has_color_adaptive_display: false,
            category: ModelCategory::ProUnibody,
        }
    }

    fn compose(model: &ModelRecord, catalog: &Catalog<ModelRecord>) -> String {
        let site = site();
        ModelPages::new(&site, catalog, 4)
            .compose_record(model)
            .unwrap()
    }

    #[test]
    fn test_compose_is_idempotent() {
        let catalog = Catalog::from_records(vec![air_m3(), unibody()]);
        let first = compose(&catalog.records()[0], &catalog);
        let second = compose(&catalog.records()[0], &catalog);
        assert_eq!(first, second);
    }

    #[test]
    fn test_title_rendered_verbatim_and_escaped() {
        let catalog = Catalog::from_records(vec![air_m3()]);
        let page = compose(&catalog.records()[0], &catalog);
        assert!(page.contains("<h1>MacBook Air 13&quot; M3 Screen Repair</h1>"));
        assert!(page.contains(
            "<link rel=\"canonical\" href=\"https://example.com.au/models/macbook-air-13-m3-screen-repair/\">"
        ));
    }

    #[test]
    fn test_color_adaptive_section_follows_flag() {
        let catalog = Catalog::from_records(vec![air_m3(), unibody()]);
        let with = compose(&catalog.records()[0], &catalog);
        let without = compose(&catalog.records()[1], &catalog);
        assert!(with.contains("<h2>True Tone on the Air M3</h2>"));
        assert!(with.contains("Will True Tone still work?"));
        assert!(!without.contains("True Tone on the"));
        assert!(without.contains("Is LCD only cheaper than full assembly?"));
    }

    #[test]
    fn test_missing_attributes_use_fallbacks() {
        let catalog = Catalog::from_records(vec![unibody()]);
        let page = compose(&catalog.records()[0], &catalog);
        assert!(page.contains("<li><strong>Identifier:</strong> Various</li>"));
        assert!(page.contains("<li><strong>Resolution:</strong> 2560 x 1600</li>"));
        assert!(page.contains("<li><strong>Chip:</strong> Intel</li>"));
        assert!(page.contains("How do I know which model I have?"));
        assert!(page.contains("<h2>Repair Options</h2>"));
        assert!(page.contains("backlight issues"));
        assert!(!page.contains('$'));
    }

    #[test]
    fn test_apple_silicon_sections() {
        let catalog = Catalog::from_records(vec![air_m3()]);
        let page = compose(&catalog.records()[0], &catalog);
        assert!(page.contains("<h2>LCD Only vs Full Display</h2>"));
        assert!(page.contains("on Apple Silicon MacBook Air models"));
        assert!(page.contains("Is A3113 the Air M3?"));
        assert!(page.contains("Yes A3113 is the MacBook Air 13&quot; M3 from 2024."));
    }

    #[test]
    fn test_related_models_same_category() {
        let mut m2 = air_m3();
        m2.key = "macbook-air-13-m2-screen-repair".to_string();
        m2.title = "MacBook Air 13\" M2".to_string();
        let catalog = Catalog::from_records(vec![air_m3(), unibody(), m2]);
        let page = compose(&catalog.records()[0], &catalog);
        let start = page.find("<h5>Related Models</h5>").unwrap();
        let end = start + page[start..].find("</div>").unwrap();
        let related = &page[start..end];
        assert!(related.contains("/models/macbook-air-13-m2-screen-repair/"));
        assert!(!related.contains("unibody"));
        assert!(!related.contains("m3-screen-repair"));
    }

    #[test]
    fn test_listing_follows_category_order() {
        let site = site();
        let models = vec![unibody(), air_m3()];
        let listing = compose_model_listing(&site, &models);
        let air = listing.find("<h2>MacBook Air - Apple Silicon</h2>").unwrap();
        let uni = listing.find("<h2>MacBook Pro - Unibody</h2>").unwrap();
        assert!(air < uni);
        assert!(!listing.contains("<h2>MacBook Air - Intel</h2>"));
        assert!(listing.contains("<p>2024 &bull; A3113</p>"));
        assert!(listing.contains("<p>2010 &bull; Retina</p>"));
    }
}
