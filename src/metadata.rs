//! Prefix-rule metadata resolution for sitemap entries.
//!
//! Resolution order for a root-relative path:
//!
//! 1. a rule whose `path` equals the whole path wins outright;
//! 2. otherwise the first rule, in table order, whose `path` is a prefix;
//! 3. otherwise the table default.
//!
//! Table order is significant. With `services/index.html` listed before
//! `services/`, the listing page keeps its own value while pages below it
//! fall through to the section prefix.

use serde::Deserialize;

use crate::models::{ChangeFrequency, Priority};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Rule<T> {
    /// Exact root-relative path, or a prefix of one.
    pub path: String,
    pub value: T,
}

/// Ordered rules plus a fallback.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleTable<T> {
    pub default: T,
    #[serde(default = "Vec::new")]
    pub rules: Vec<Rule<T>>,
}

impl<T> RuleTable<T> {
    pub fn resolve(&self, relative_path: &str) -> &T {
        if let Some(rule) = self.rules.iter().find(|r| r.path == relative_path) {
            return &rule.value;
        }
        self.rules
            .iter()
            .find(|r| relative_path.starts_with(r.path.as_str()))
            .map(|r| &r.value)
            .unwrap_or(&self.default)
    }
}

pub fn resolve_metadata(
    relative_path: &str,
    priorities: &RuleTable<Priority>,
    frequencies: &RuleTable<ChangeFrequency>,
) -> (Priority, ChangeFrequency) {
    (
        *priorities.resolve(relative_path),
        *frequencies.resolve(relative_path),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rules: &[(&str, f64)], default: f64) -> RuleTable<Priority> {
        RuleTable {
            default: Priority(default),
            rules: rules
                .iter()
                .map(|(path, value)| Rule {
                    path: path.to_string(),
                    value: Priority(*value),
                })
                .collect(),
        }
    }

    #[test]
    fn test_listing_page_beats_section_prefix() {
        let t = table(&[("services/index.html", 0.9), ("services/", 0.8)], 0.5);
        assert_eq!(*t.resolve("services/index.html"), Priority(0.9));
        assert_eq!(*t.resolve("services/foo/index.html"), Priority(0.8));
        assert_eq!(*t.resolve("other/index.html"), Priority(0.5));
    }

    #[test]
    fn test_exact_match_wins_even_when_listed_after_prefix() {
        let t = table(&[("services/", 0.8), ("services/index.html", 0.9)], 0.5);
        assert_eq!(*t.resolve("services/index.html"), Priority(0.9));
        assert_eq!(*t.resolve("services/foo/index.html"), Priority(0.8));
    }

    #[test]
    fn test_first_matching_prefix_in_table_order() {
        let broad_first = table(&[("models/", 0.7), ("models/macbook-air", 0.95)], 0.5);
        let narrow_first = table(&[("models/macbook-air", 0.95), ("models/", 0.7)], 0.5);
        let path = "models/macbook-air-13/index.html";
        assert_eq!(*broad_first.resolve(path), Priority(0.7));
        assert_eq!(*narrow_first.resolve(path), Priority(0.95));
    }

    #[test]
    fn test_root_marker_only_matches_itself() {
        let t = table(&[("index.html", 1.0), ("areas/", 0.6)], 0.5);
        assert_eq!(*t.resolve("index.html"), Priority(1.0));
        assert_eq!(*t.resolve("areas/index.html"), Priority(0.6));
        assert_eq!(*t.resolve("book/index.html"), Priority(0.5));
    }

    #[test]
    fn test_resolve_metadata_pairs_both_tables() {
        let priorities = table(&[("areas/", 0.6)], 0.5);
        let frequencies = RuleTable {
            default: ChangeFrequency::Monthly,
            rules: vec![Rule {
                path: "index.html".to_string(),
                value: ChangeFrequency::Weekly,
            }],
        };
        assert_eq!(
            resolve_metadata("index.html", &priorities, &frequencies),
            (Priority(0.5), ChangeFrequency::Weekly)
        );
        assert_eq!(
            resolve_metadata("areas/epping/index.html", &priorities, &frequencies),
            (Priority(0.6), ChangeFrequency::Monthly)
        );
    }
}
