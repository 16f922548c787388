//! Related-record selection for cross-links and listing groups.
//!
//! Proximity is shared region membership plus catalog order. No distances.

use crate::models::{AreaRecord, ModelCategory, ModelRecord};

/// Limits for [`region_neighbors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborPolicy {
    /// Maximum neighbors returned (N).
    pub max: usize,
    /// Below this many same-region neighbors, backfill from other regions.
    pub min: usize,
}

impl Default for NeighborPolicy {
    fn default() -> Self {
        Self { max: 4, min: 3 }
    }
}

/// Neighbors of `subject`: same-region records in catalog order, capped at
/// `policy.max`. When fewer than `policy.min` share the region, records from
/// other regions are appended in catalog order until `policy.max` is reached
/// or the catalog runs out.
///
/// Never contains `subject` itself and never repeats a key.
pub fn region_neighbors<'a>(
    subject: &AreaRecord,
    catalog: &'a [AreaRecord],
    policy: NeighborPolicy,
) -> Vec<&'a AreaRecord> {
    let mut chosen: Vec<&AreaRecord> = Vec::with_capacity(policy.max);

    for candidate in catalog {
        if chosen.len() >= policy.max {
            break;
        }
        if candidate.region == subject.region
            && candidate.key != subject.key
            && !contains_key(&chosen, &candidate.key)
        {
            chosen.push(candidate);
        }
    }

    if chosen.len() < policy.min {
        for candidate in catalog {
            if chosen.len() >= policy.max {
                break;
            }
            if candidate.key != subject.key && !contains_key(&chosen, &candidate.key) {
                chosen.push(candidate);
            }
        }
    }

    chosen
}

fn contains_key(chosen: &[&AreaRecord], key: &str) -> bool {
    chosen.iter().any(|r| r.key == key)
}

/// Other models in `subject`'s category, in catalog order, at most `max`.
pub fn category_neighbors<'a>(
    subject: &ModelRecord,
    catalog: &'a [ModelRecord],
    max: usize,
) -> Vec<&'a ModelRecord> {
    let mut chosen: Vec<&ModelRecord> = Vec::with_capacity(max);
    for candidate in catalog {
        if chosen.len() >= max {
            break;
        }
        if candidate.category == subject.category
            && candidate.key != subject.key
            && !chosen.iter().any(|c| c.key == candidate.key)
        {
            chosen.push(candidate);
        }
    }
    chosen
}

/// Partitions models into [`ModelCategory::ALL`] buckets, in that order,
/// omitting empty buckets. Records keep catalog order inside a bucket.
pub fn group_by_category(models: &[ModelRecord]) -> Vec<(ModelCategory, Vec<&ModelRecord>)> {
    ModelCategory::ALL
        .iter()
        .filter_map(|category| {
            let members: Vec<&ModelRecord> =
                models.iter().filter(|m| m.category == *category).collect();
            (!members.is_empty()).then_some((*category, members))
        })
        .collect()
}

/// Groups areas by region, regions in order of first appearance.
pub fn group_by_region(areas: &[AreaRecord]) -> Vec<(&str, Vec<&AreaRecord>)> {
    let mut groups: Vec<(&str, Vec<&AreaRecord>)> = Vec::new();
    for area in areas {
        match groups.iter_mut().find(|(region, _)| *region == area.region) {
            Some((_, members)) => members.push(area),
            None => groups.push((area.region.as_str(), vec![area])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn area(key: &str, region: &str) -> AreaRecord {
        AreaRecord {
            key: key.to_string(),
            display_name: key.to_uppercase(),
            region: region.to_string(),
            postal_code: "2000".to_string(),
            local_narrative: None,
        }
    }

    fn model(key: &str, category: ModelCategory) -> ModelRecord {
        ModelRecord {
            key: key.to_string(),
            title: key.to_string(),
            short_title: key.to_string(),
            identifier: None,
            year: None,
            display_kind: None,
            resolution: None,
            chip_family: None,
            has_color_adaptive_display: false,
            category,
        }
    }

    fn keys(records: &[&AreaRecord]) -> Vec<String> {
        records.iter().map(|r| r.key.clone()).collect()
    }

    #[test]
    fn test_same_region_in_catalog_order() {
        let catalog = vec![
            area("a", "West"),
            area("b", "West"),
            area("x", "North"),
            area("c", "West"),
            area("d", "West"),
        ];
        let result = region_neighbors(&catalog[4], &catalog, NeighborPolicy::default());
        assert_eq!(keys(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_five_records_four_west() {
        let catalog = vec![
            area("w1", "West"),
            area("w2", "West"),
            area("n1", "North"),
            area("w3", "West"),
            area("w4", "West"),
            area("w5", "West"),
        ];
        let result = region_neighbors(&catalog[5], &catalog, NeighborPolicy::default());
        assert_eq!(keys(&result), vec!["w1", "w2", "w3", "w4"]);
    }

    #[test]
    fn test_backfill_when_region_sparse() {
        let catalog = vec![
            area("n1", "North"),
            area("s1", "South"),
            area("h1", "Hills"),
            area("h2", "Hills"),
            area("n2", "North"),
        ];
        let result = region_neighbors(&catalog[2], &catalog, NeighborPolicy::default());
        // one same-region record, then other regions in catalog order
        assert_eq!(keys(&result), vec!["h2", "n1", "s1", "n2"]);
        assert!(result.len() >= NeighborPolicy::default().min);
    }

    #[test]
    fn test_backfill_stops_when_catalog_exhausted() {
        let catalog = vec![area("a", "A"), area("b", "B")];
        let result = region_neighbors(&catalog[0], &catalog, NeighborPolicy::default());
        assert_eq!(keys(&result), vec!["b"]);
    }

    #[test]
    fn test_neighbor_invariants_hold_for_every_record() {
        let regions = ["West", "Hills", "North"];
        let catalog: Vec<AreaRecord> = (0..17)
            .map(|i| area(&format!("s{}", i), regions[i % 3 * (i % 2)]))
            .collect();
        for policy in [
            NeighborPolicy { max: 4, min: 3 },
            NeighborPolicy { max: 2, min: 2 },
            NeighborPolicy { max: 6, min: 1 },
        ] {
            for subject in &catalog {
                let result = region_neighbors(subject, &catalog, policy);
                assert!(result.len() <= policy.max);
                assert!(result.iter().all(|r| r.key != subject.key));
                let unique: HashSet<&str> = result.iter().map(|r| r.key.as_str()).collect();
                assert_eq!(unique.len(), result.len());
            }
        }
    }

    #[test]
    fn test_category_order_follows_declaration_not_catalog() {
        let models = vec![
            model("twelve", ModelCategory::MacBook12),
            model("air-m2", ModelCategory::AirAppleSilicon),
            model("unibody", ModelCategory::ProUnibody),
            model("air-m1", ModelCategory::AirAppleSilicon),
        ];
        let groups = group_by_category(&models);
        let order: Vec<ModelCategory> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            order,
            vec![
                ModelCategory::AirAppleSilicon,
                ModelCategory::ProUnibody,
                ModelCategory::MacBook12
            ]
        );
        let air: Vec<&str> = groups[0].1.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(air, vec!["air-m2", "air-m1"]);
    }

    #[test]
    fn test_category_neighbors_same_bucket_only() {
        let models = vec![
            model("air-m1", ModelCategory::AirAppleSilicon),
            model("pro-13", ModelCategory::Pro13AppleSilicon),
            model("air-m2", ModelCategory::AirAppleSilicon),
            model("air-m3", ModelCategory::AirAppleSilicon),
            model("air-m4", ModelCategory::AirAppleSilicon),
        ];
        let result = category_neighbors(&models[2], &models, 2);
        let keys: Vec<&str> = result.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["air-m1", "air-m3"]);
        assert!(category_neighbors(&models[1], &models, 4).is_empty());
    }

    #[test]
    fn test_empty_catalog_yields_no_groups() {
        assert!(group_by_category(&[]).is_empty());
        assert!(group_by_region(&[]).is_empty());
    }

    #[test]
    fn test_region_groups_first_appearance() {
        let areas = vec![area("a", "West"), area("b", "Hills"), area("c", "West")];
        let groups = group_by_region(&areas);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "West");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "Hills");
    }
}
