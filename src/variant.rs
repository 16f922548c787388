//! Content variation selector.
//!
//! Every record gets one fragment per narrative slot, picked by hashing the
//! slot name together with the record key. The choice depends on the key
//! alone: adding, removing or reordering other records never changes it.
//!
//! Resizing a slot's fragment list re-maps the keys hashed into that slot, so
//! existing pages may switch fragments after such an edit. Slots are hashed
//! independently, so only the resized slot moves.
//!
//! Fragments are `subst` templates (`$name`, `${region}`, ...). The composers
//! supply already-escaped values, so fragments must not contain a literal `$`.

use sha2::{Digest, Sha256};

use crate::traits::CatalogRecord;

/// "How it was damaged" anecdote.
#[derive(Debug, PartialEq, Eq)]
pub struct Anecdote {
    pub location: &'static str,
    pub issue: &'static str,
    pub detail: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

/// Fixed fragment lists for one catalog, one list per slot.
#[derive(Debug)]
pub struct FragmentSet {
    pub intros: &'static [&'static str],
    pub repair_paths: &'static [&'static str],
    pub options: &'static [&'static str],
    pub issues: &'static [&'static str],
    pub pricing: &'static [&'static str],
    pub stories: &'static [Anecdote],
    pub faqs: &'static [FaqEntry],
}

/// The fragments selected for one record. Reused for every section of that
/// record's document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentVariant {
    pub intro: &'static str,
    /// "Why this repair path" framing.
    pub repair_path: &'static str,
    pub options: &'static str,
    pub issues: &'static str,
    pub pricing: &'static str,
    pub story: &'static Anecdote,
    pub faq: &'static FaqEntry,
}

pub fn select_variant<R: CatalogRecord>(record: &R) -> ContentVariant {
    select_from(R::fragments(), record.key())
}

pub fn select_from(set: &'static FragmentSet, key: &str) -> ContentVariant {
    ContentVariant {
        intro: set.intros[slot_index("intro", key, set.intros.len())],
        repair_path: set.repair_paths[slot_index("repair_path", key, set.repair_paths.len())],
        options: set.options[slot_index("options", key, set.options.len())],
        issues: set.issues[slot_index("issues", key, set.issues.len())],
        pricing: set.pricing[slot_index("pricing", key, set.pricing.len())],
        story: &set.stories[slot_index("story", key, set.stories.len())],
        faq: &set.faqs[slot_index("faq", key, set.faqs.len())],
    }
}

/// Stable index into a slot of `len` fragments.
///
/// SHA-256 of `slot \0 key`, first eight bytes big-endian, modulo `len`.
/// `len` must be non-zero.
pub fn slot_index(slot: &str, key: &str, len: usize) -> usize {
    let mut hasher = Sha256::new();
    hasher.update(slot.as_bytes());
    hasher.update([0u8]);
    hasher.update(key.as_bytes());
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % len as u64) as usize
}

// ═══════════════════════════════════════════════════════════════════════
// Area fragments: $name, $region, $postcode
// ═══════════════════════════════════════════════════════════════════════

pub static AREA_FRAGMENTS: FragmentSet = FragmentSet {
    intros: &[
        "<p>At Mac Screen Repair Sydney we service customers from $name and the surrounding $region area. The team provide LCD only replacement and full display assembly replacement for MacBook Air and MacBook Pro models. All repairs are drop off only with proper assessment before any work starts.</p>",
        "<p>MacBook owners in $name ($postcode) bring their machines to us when the screen cracks, flickers or goes dark. We only do MacBook screens, so every repair gets the attention of people who do this all day.</p>",
        "<p>If you are in $name or anywhere across $region and your MacBook display has failed, we can help. We replace just the LCD panel where the housing allows it, or the complete display assembly where it does not.</p>",
        "<p>We look after MacBook screen repairs for $name and the rest of $region. Drop the machine off, we assess the display and housing, and you get an honest recommendation before anything is touched.</p>",
    ],
    repair_paths: &[
        "<p>Most screens we see from $name are candidates for LCD only replacement. It keeps your original housing, camera and lid electronics, and it is the more targeted repair when the frame is straight.</p>",
        "<p>The repair path depends on the housing, not the crack. A straight, dry housing means LCD only. A bent lid or liquid exposure means the full assembly. We check this first so $name customers are never sold the wrong repair.</p>",
        "<p>We recommend the least invasive repair that will actually last. For plenty of MacBooks from around $region that is an LCD panel swap. When the housing is damaged, a new panel in a bent frame only creates new problems, so we go full assembly.</p>",
    ],
    options: &[
        "<p>LCD only replacement swaps the internal panel while the metal frame, camera module and backlight layers stay in place. Full display replacement swaps the entire lid assembly and is required when there is frame damage, liquid exposure or bent corners.</p>",
        "<p>There are two ways to fix a MacBook screen. LCD only keeps your housing and replaces the panel inside it. Full display replaces the whole top half of the machine. The first costs less, the second is the only option when the housing itself is damaged.</p>",
        "<p>LCD only has strict eligibility requirements: no dents, bends or warping in the frame, no liquid indicators around the display and bezels in good condition. If any of those fail, full display replacement is the reliable fix.</p>",
    ],
    issues: &[
        "<p>MacBooks from around $name come in with the usual range of screen issues. Cracked screens from drops, dead panels after an impact, flickering displays and lines running across the screen. Most are fixed with LCD only if the housing is undamaged.</p>",
        "<p>Backlight failures, pressure marks from a bag, vertical lines and cracked corners are the faults we see most from $region. Each one gets diagnosed properly before we recommend anything.</p>",
        "<p>Dead panels where the screen will not display anything, strobing or flickering, and dim patches where the backlight has failed. Sometimes it is impact damage, sometimes the panel simply gives out.</p>",
    ],
    pricing: &[
        "<p>Pricing depends on the model and on which repair the housing allows. We quote after assessment because photos rarely show housing damage accurately. There is no obligation until you approve the work.</p>",
        "<p>LCD only costs less than a full assembly because you are replacing one component rather than the whole lid. You get a firm price at assessment, before any work starts.</p>",
        "<p>Most LCD only repairs are same day if we have the panel in stock. Full display replacement can take a day or two depending on parts. You get both the price and the timeframe at assessment.</p>",
    ],
    stories: &[
        Anecdote {
            location: "the station",
            issue: "a cracked screen after a drop on the platform",
            detail: "The housing was in good shape so LCD only sorted it for far less than a full assembly",
        },
        Anecdote {
            location: "a cafe",
            issue: "a lid closed on a pair of earbuds",
            detail: "The LCD cracked right across but the housing was fine, so the repair cost less than they expected",
        },
        Anecdote {
            location: "the carpark",
            issue: "a backpack drop onto concrete",
            detail: "Corner impact cracked the panel. The housing held up so LCD only was the way to go",
        },
        Anecdote {
            location: "home",
            issue: "a cat knocking it off the table",
            detail: "Display cracked, housing survived. An LCD replacement had it back the same day",
        },
        Anecdote {
            location: "school",
            issue: "pressure damage from books stacked on the bag",
            detail: "The LCD failed in patches without a visible crack. Classic pressure damage",
        },
    ],
    faqs: &[
        FaqEntry {
            question: "Is there parking near the drop off point for $name customers?",
            answer: "Yes. Most customers from $name drive in and drop off in a few minutes. We assess while you wait where we can.",
        },
        FaqEntry {
            question: "Can I drop off on the way to work from $name?",
            answer: "Yes. Let us know when you book and we can have the assessment done by the time you pick it up.",
        },
        FaqEntry {
            question: "Do you charge extra for customers outside $region?",
            answer: "No. Pricing is the same wherever you are coming from. The repair and the model decide the price.",
        },
    ],
};

// ═══════════════════════════════════════════════════════════════════════
// Model fragments: $title, $short, $identifier, $display, $resolution, $line, $year
// ═══════════════════════════════════════════════════════════════════════

pub static MODEL_FRAGMENTS: FragmentSet = FragmentSet {
    intros: &[
        "<p>At Mac Screen Repair Sydney we specialise in screen repair for the $title. This model uses a $display display running at $resolution. We offer LCD only replacement and full display assembly replacement depending on what your machine needs.</p>",
        "<p>The $title comes through our workshop regularly. Its $display panel runs at $resolution, and we stock or source parts for both LCD only and full assembly repairs.</p>",
        "<p>Cracked or failed screen on your $short? We repair the $title display in house, either by replacing the LCD panel alone or by fitting a complete display assembly.</p>",
    ],
    repair_paths: &[
        "<p>The team assess every MacBook $line before recommending a repair path. LCD only means removing the damaged panel while keeping the original aluminium housing and camera assembly. The housing has to be free of dents and bends for this to work.</p>",
        "<p>We always start with the housing. If the $short lid is straight and dry, LCD only is the most cost effective fix. If there is structural damage, full display assembly is the way to go.</p>",
        "<p>On the $short the decision comes down to housing condition. A new panel in a bent frame will not seat properly and can crack again, so we only recommend LCD only when the frame passes inspection.</p>",
    ],
    options: &[
        "<p>LCD only replacement keeps your original display housing and swaps the panel inside it. Full display assembly replaces housing, panel, camera and hinges in one part. Both restore a perfect picture.</p>",
        "<p>Two repairs are available for the $short: an LCD panel replacement, which keeps your lid, and a full display assembly, which replaces it. We explain which one your machine qualifies for at assessment.</p>",
        "<p>LCD only is cheaper and keeps the factory housing. Full assembly costs more but is the only sound repair when the lid is bent, the hinges are damaged or liquid has got into the display.</p>",
    ],
    issues: &[
        "<p>Cracked screens from drops are the most common repair on $title models. Pressure damage is another one we see a lot, where something heavy has rested on the closed MacBook in a bag and the LCD fails in patches.</p>",
        "<p>On the $short we mostly see impact cracks, dead zones from pressure and lines across the panel. Each one is diagnosed before we recommend a repair.</p>",
        "<p>Typical faults on the $title are cracked glass, bleeding ink blots after a knock and flickering that comes and goes. The ink blots spread over time, so it is worth getting them looked at early.</p>",
    ],
    pricing: &[
        "<p>$title screen repair pricing varies with the type of repair needed. LCD only runs cheaper than full assembly when housing condition permits. The assessment is free with no obligation to go ahead.</p>",
        "<p>We quote the $short after looking at the machine since photos do not always show housing damage accurately. LCD only is the cheaper option whenever the housing allows it.</p>",
        "<p>Pricing for the $title depends on parts availability and on which repair the housing qualifies for. You get a firm quote at the free assessment.</p>",
    ],
    stories: &[
        Anecdote {
            location: "Parramatta",
            issue: "a cracked screen from a drop",
            detail: "The housing was in good shape so we did LCD only which saved them a lot compared to full assembly",
        },
        Anecdote {
            location: "Castle Hill",
            issue: "a lid closed on their earbuds",
            detail: "Cracked the LCD right across. Housing was fine though so LCD only worked out cheaper than they expected",
        },
        Anecdote {
            location: "Penrith",
            issue: "a backpack drop in the carpark",
            detail: "Corner impact cracked the display. Housing held up so LCD only was the way to go",
        },
        Anecdote {
            location: "Blacktown",
            issue: "pressure damage from something heavy on the bag",
            detail: "LCD failed in patches without visible cracks. Classic pressure damage",
        },
        Anecdote {
            location: "Rouse Hill",
            issue: "a drop getting out of the car",
            detail: "Classic impact damage in the corner spreading across the panel. Housing was fine so LCD only sorted it",
        },
        Anecdote {
            location: "Liverpool",
            issue: "a fall from the desk",
            detail: "Screen cracked on impact but the aluminium housing survived. LCD only repair saved money",
        },
        Anecdote {
            location: "Seven Hills",
            issue: "a cat knocking it off the table",
            detail: "These things happen. Display cracked but housing was fine. LCD replacement fixed it up",
        },
        Anecdote {
            location: "Epping",
            issue: "a toy closed in the lid",
            detail: "Localised crack that spread across the panel. Housing undamaged so LCD only",
        },
    ],
    faqs: &[
        FaqEntry {
            question: "Do you keep $short panels in stock?",
            answer: "We keep common $short panels on hand. If yours is not in stock we tell you the lead time before you commit.",
        },
        FaqEntry {
            question: "Will my data be safe during a $short screen repair?",
            answer: "Yes. A screen repair does not touch the storage. We still recommend a backup before any repair.",
        },
        FaqEntry {
            question: "Is it worth repairing an older $title?",
            answer: "Usually yes. LCD only is a fraction of the cost of a replacement machine and the rest of the $short is often in good shape.",
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AreaRecord;

    fn area(key: &str) -> AreaRecord {
        AreaRecord {
            key: key.to_string(),
            display_name: "Somewhere".to_string(),
            region: "Western Sydney".to_string(),
            postal_code: "2000".to_string(),
            local_narrative: None,
        }
    }

    #[test]
    fn test_same_key_same_variant() {
        let a = select_variant(&area("parramatta"));
        let b = select_variant(&area("parramatta"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_variant_ignores_non_key_fields() {
        let mut other = area("parramatta");
        other.display_name = "Renamed".to_string();
        other.region = "Elsewhere".to_string();
        assert_eq!(select_variant(&area("parramatta")), select_variant(&other));
    }

    #[test]
    fn test_slot_index_in_range_and_stable() {
        for key in ["a", "b", "castle-hill", "macbook-air-13-m3-screen-repair"] {
            for len in 1..10 {
                let idx = slot_index("story", key, len);
                assert!(idx < len);
                assert_eq!(idx, slot_index("story", key, len));
            }
        }
    }

    #[test]
    fn test_keys_spread_across_fragments() {
        let keys: Vec<String> = (0..64).map(|i| format!("suburb-{}", i)).collect();
        let distinct: std::collections::HashSet<usize> = keys
            .iter()
            .map(|k| slot_index("story", k, MODEL_FRAGMENTS.stories.len()))
            .collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_fragment_lists_non_empty_and_dollar_free() {
        for set in [&AREA_FRAGMENTS, &MODEL_FRAGMENTS] {
            for list in [set.intros, set.repair_paths, set.options, set.issues, set.pricing] {
                assert!(!list.is_empty());
            }
            assert!(!set.stories.is_empty());
            assert!(!set.faqs.is_empty());
            for story in set.stories {
                assert!(!story.detail.contains('$'));
                assert!(!story.issue.contains('$'));
            }
        }
    }
}
