//! Service-area pages and the areas listing.

use std::fmt::Write as _;

use serde_json::json;

use super::{
    book_box, breadcrumb, cta, faq_block, fill_faq, head, hero, html, service_links, sidebar_links,
    site_header, tail, PageMeta, SiteContext, Vars,
};
use crate::catalog::Catalog;
use crate::error::SiteError;
use crate::models::AreaRecord;
use crate::neighbors::{group_by_region, region_neighbors, NeighborPolicy};
use crate::traits::SitePages;
use crate::variant::{select_variant, ContentVariant, FaqEntry};

/// Questions every area page answers, in order, before its variant question.
static FIXED_FAQS: [FaqEntry; 4] = [
    FaqEntry {
        question: "Do you service MacBooks from $name?",
        answer: "Yes we service MacBook owners from $name and all of $region. Drop off your MacBook for assessment and we can check the screen damage.",
    },
    FaqEntry {
        question: "How long does a screen repair take?",
        answer: "Most LCD only repairs are same day if we have parts in stock for your model. Full display replacement can take longer depending on parts availability. We give you a timeframe at assessment.",
    },
    FaqEntry {
        question: "Can you repair my MacBook if the frame is dented?",
        answer: "Frame damage means LCD only replacement is not possible. Full display replacement is the alternative which replaces the entire assembly including the housing. We explain options and pricing at assessment.",
    },
    FaqEntry {
        question: "What warranty do you offer?",
        answer: "We provide a 60 day limited warranty on LCD panel replacements. This covers the replaced component and our workmanship. Physical damage and liquid damage occurring after repair are not covered.",
    },
];

/// Area catalog rendered as pages.
pub struct AreaPages<'a> {
    site: &'a SiteContext,
    catalog: &'a Catalog<AreaRecord>,
    policy: NeighborPolicy,
}

impl<'a> AreaPages<'a> {
    pub fn new(site: &'a SiteContext, catalog: &'a Catalog<AreaRecord>, policy: NeighborPolicy) -> Self {
        Self {
            site,
            catalog,
            policy,
        }
    }
}

impl SitePages for AreaPages<'_> {
    type Record = AreaRecord;

    fn name(&self) -> &str {
        "areas"
    }

    fn section_dir(&self) -> &str {
        &self.site.areas_dir
    }

    fn catalog(&self) -> &Catalog<AreaRecord> {
        self.catalog
    }

    fn compose_record(&self, record: &AreaRecord) -> Result<String, SiteError> {
        let variant = select_variant(record);
        let neighbors = region_neighbors(record, self.catalog.records(), self.policy);
        compose_area(self.site, record, &variant, &neighbors)
    }

    fn compose_listing(&self) -> String {
        compose_area_listing(self.site, self.catalog.records())
    }
}

/// Narrative used when a record carries no local narrative of its own.
pub fn fallback_narrative(area: &AreaRecord) -> String {
    format!(
        "{} is part of {}. We see MacBooks from across the area when people need screen repairs done properly.",
        area.display_name, area.region
    )
}

pub fn compose_area(
    site: &SiteContext,
    area: &AreaRecord,
    variant: &ContentVariant,
    neighbors: &[&AreaRecord],
) -> Result<String, SiteError> {
    let key = area.key.as_str();
    let name = area.display_name.as_str();
    let region = area.region.as_str();
    let vars = Vars::new()
        .set("name", name)
        .set("region", region)
        .set("postcode", &area.postal_code);

    let path = format!("/{}/{}/", site.areas_dir, key);
    let canonical = site.absolute(&path);
    let title = format!(
        "MacBook Screen Repair {} | LCD Replacement {}",
        name, area.postal_code
    );
    let description = format!(
        "MacBook screen repair for {} and {}. LCD only and full display replacement. Drop off service for {} MacBook owners.",
        name, region, name
    );
    let structured_data = json!({
        "@context": "https://schema.org",
        "@type": "Service",
        "name": format!("MacBook Screen Repair {}", name),
        "description": format!(
            "MacBook LCD panel replacement and full display replacement for {} and {}.",
            name, region
        ),
        "provider": {
            "@type": "LocalBusiness",
            "name": site.brand,
            "url": site.absolute("/"),
        },
        "areaServed": {
            "@type": "City",
            "name": name,
            "address": {
                "@type": "PostalAddress",
                "postalCode": area.postal_code,
                "addressRegion": region,
            },
        },
    });

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
        &format!("MacBook Screen Repair {}", name),
        &format!("LCD only and full display replacement for {} and {}", name, region),
    );
    let areas_href = format!("/{}/", site.areas_dir);
    breadcrumb(&mut out, &[("Home", "/"), ("Areas", &areas_href), (name, "")]);

    let narrative = match &area.local_narrative {
        Some(text) if !text.trim().is_empty() => text.clone(),
        _ => fallback_narrative(area),
    };
    let story = variant.story;

    out.push_str(
        "\n    <section class=\"section section-light\">\n        <div class=\"container\">\n            <div class=\"two-col-content\">\n                <div class=\"content-block\">\n",
    );
    let _ = writeln!(out, "                    <h2>MacBook Screen Repair for {}</h2>", html(name));
    section_para(&mut out, &vars.fill(key, variant.intro)?);
    let _ = writeln!(out, "                    <p>{}</p>", html(&narrative));
    let _ = writeln!(
        out,
        "                    <p>Had a customer from {} come in after {} at {}. {}.</p>",
        html(name),
        story.issue,
        story.location,
        story.detail
    );

    out.push_str("\n                    <h2>Choosing the Right Repair</h2>\n");
    section_para(&mut out, &vars.fill(key, variant.repair_path)?);

    out.push_str("\n                    <h2>LCD Only or Full Display</h2>\n");
    section_para(&mut out, &vars.fill(key, variant.options)?);
    out.push_str(
        "                    <div class=\"info-box\">\n                        <p><strong>LCD Only Eligibility:</strong> Display housing must be undamaged with no dents, bends, liquid exposure or frame warping. Assessment determines eligibility.</p>\n                    </div>\n",
    );

    out.push_str("\n                    <h2>Common Screen Issues</h2>\n");
    section_para(&mut out, &vars.fill(key, variant.issues)?);

    out.push_str("\n                    <h2>Pricing and Turnaround</h2>\n");
    section_para(&mut out, &vars.fill(key, variant.pricing)?);

    let _ = writeln!(out, "\n                    <h2>{} Service</h2>", html(region));
    let _ = writeln!(
        out,
        "                    <p>We service MacBook owners across {}. {} and the surrounding suburbs. Most customers drop off in person which lets us assess the machine properly and give accurate pricing.</p>",
        html(region),
        html(name)
    );
    let _ = writeln!(
        out,
        "                    <div class=\"info-box\">\n                        <p><strong>MacBook screen damaged in {}?</strong> Drop off for assessment. We check the damage and give you honest pricing before any work starts.</p>\n                    </div>",
        html(name)
    );
    out.push_str("                </div>\n\n                <div class=\"sidebar\">\n");

    sidebar_links(&mut out, "Services", &service_links());
    let mut nearby: Vec<(String, String)> = neighbors
        .iter()
        .map(|n| (format!("/{}/{}/", site.areas_dir, n.key), n.display_name.clone()))
        .collect();
    nearby.push((areas_href.clone(), "All Areas".to_string()));
    sidebar_links(&mut out, "Nearby Areas", &nearby);
    book_box(&mut out);
    out.push_str("                </div>\n            </div>\n        </div>\n    </section>\n");

    let mut faqs = Vec::with_capacity(FIXED_FAQS.len() + 1);
    for entry in FIXED_FAQS.iter().chain(std::iter::once(variant.faq)) {
        faqs.push(fill_faq(&vars, key, entry)?);
    }
    faq_block(
        &mut out,
        &format!("{} MacBook Screen Repair Questions", name),
        &faqs,
    );

    cta(
        &mut out,
        &format!("MacBook Screen Damaged in {}?", name),
        "Drop off your MacBook for assessment. We check the damage and give you honest pricing.",
        "/book/",
        "Book Assessment",
    );
    tail(&mut out, site);

    Ok(out)
}

fn section_para(out: &mut String, filled: &str) {
    let _ = writeln!(out, "                    {}", filled);
}

/// Areas listing: regions in order of first appearance, areas in catalog order.
pub fn compose_area_listing(site: &SiteContext, areas: &[AreaRecord]) -> String {
    let path = format!("/{}/", site.areas_dir);
    let canonical = site.absolute(&path);
    let title = format!("Service Areas | MacBook Screen Repair | {}", site.brand);
    let groups = group_by_region(areas);
    let regions: Vec<&str> = groups.iter().map(|(region, _)| *region).collect();
    let description = format!(
        "MacBook screen repair for suburbs across {}. Find your area and book a drop off assessment.",
        join_names(&regions)
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
        "Areas We Service",
        "MacBook screen repairs for customers across Sydney",
    );
    breadcrumb(&mut out, &[("Home", "/"), ("Areas", "")]);

    out.push_str("\n    <section class=\"section section-light\">\n        <div class=\"container\">\n");
    out.push_str("            <p class=\"intro-text\">Find your suburb below or <a href=\"/contact/\">get in touch</a> if it is not listed.</p>\n");
    for (region, members) in groups {
        let _ = writeln!(out, "\n            <h2>{}</h2>", html(region));
        out.push_str("            <div class=\"area-grid\">\n");
        for area in members {
            let _ = writeln!(
                out,
                "                <a href=\"{}{}/\" class=\"area-card\">\n                    <h3>{}</h3>\n                    <p>{}</p>\n                </a>",
                html(&path),
                html(&area.key),
                html(&area.display_name),
                html(&area.postal_code)
            );
        }
        out.push_str("            </div>\n");
    }
    out.push_str("        </div>\n    </section>\n");

    cta(
        &mut out,
        "Not Sure If We Cover Your Area?",
        "Get in touch and we will let you know.",
        "/contact/",
        "Contact Us",
    );
    tail(&mut out, site);
    out
}

/// "A", "A and B", "A, B and C". Empty input reads as "Sydney".
fn join_names(names: &[&str]) -> String {
    match names {
        [] => "Sydney".to_string(),
        [only] => only.to_string(),
        [head @ .., last] => format!("{} and {}", head.join(", "), last),
    }
}
