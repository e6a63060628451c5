use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{CategoryRuleSet, PointOfInterest, PoiId};

/// an ad-hoc POI supplied with a request to simulate an intervention.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ScenarioPoi {
    pub lat: f64,
    pub lon: f64,
    pub category: String,
    pub name: Option<String>,
}

/// request-scoped overlay on the POI cache: points to add and ids to
/// suppress. never persisted; lives for one aggregation request.
#[derive(Clone, Debug, Default)]
pub struct ScenarioEdit {
    pub additions: Vec<ScenarioPoi>,
    pub removals: HashSet<PoiId>,
}

impl ScenarioEdit {
    pub fn new(additions: Vec<ScenarioPoi>, removals: Vec<PoiId>) -> ScenarioEdit {
        ScenarioEdit {
            additions,
            removals: removals.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}

/// the effective POI set for one request: cached POIs of each requested
/// category, unioned with scenario additions whose (lowercased) category
/// matches, minus every POI whose id is in the removal set. addition ids are
/// synthesized as `PoiId::User(index)` in request order, which cannot collide
/// with upstream ids. removing an id that is not present is a no-op.
pub fn consolidate_pois(
    cache: &HashMap<String, Vec<PointOfInterest>>,
    rules: &CategoryRuleSet,
    requested: &[String],
    scenario: &ScenarioEdit,
) -> Vec<PointOfInterest> {
    let categories = rules.normalize_requested(requested);
    let mut effective: Vec<PointOfInterest> = Vec::new();
    for category in &categories {
        if let Some(cached) = cache.get(category) {
            effective.extend(cached.iter().cloned());
        }
        for (index, addition) in scenario.additions.iter().enumerate() {
            if addition.category.to_lowercase() == *category {
                effective.push(PointOfInterest {
                    id: PoiId::User(index as u64),
                    lat: addition.lat,
                    lon: addition.lon,
                    category: category.clone(),
                    name: addition.name.clone(),
                });
            }
        }
    }
    effective.retain(|p| !scenario.removals.contains(&p.id));
    effective
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with(category: &str, ids: &[i64]) -> HashMap<String, Vec<PointOfInterest>> {
        let pois = ids
            .iter()
            .map(|id| PointOfInterest {
                id: PoiId::Osm(*id),
                lat: 51.2,
                lon: 6.8,
                category: String::from(category),
                name: None,
            })
            .collect();
        HashMap::from([(String::from(category), pois)])
    }

    fn park_request() -> Vec<String> {
        vec![String::from("park")]
    }

    #[test]
    fn test_add_then_remove_equals_never_added() {
        let cache = cache_with("park", &[1, 2]);
        let rules = CategoryRuleSet::default();
        let addition = ScenarioPoi {
            lat: 51.21,
            lon: 6.81,
            category: String::from("park"),
            name: Some(String::from("pocket park")),
        };
        let without = consolidate_pois(&cache, &rules, &park_request(), &ScenarioEdit::default());
        let add_and_remove = consolidate_pois(
            &cache,
            &rules,
            &park_request(),
            &ScenarioEdit::new(vec![addition], vec![PoiId::User(0)]),
        );
        assert_eq!(without, add_and_remove);
    }

    #[test]
    fn test_removing_unknown_id_is_noop() {
        let cache = cache_with("park", &[1, 2]);
        let rules = CategoryRuleSet::default();
        let result = consolidate_pois(
            &cache,
            &rules,
            &park_request(),
            &ScenarioEdit::new(vec![], vec![PoiId::Osm(999)]),
        );
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_removal_suppresses_cached_poi() {
        let cache = cache_with("park", &[1, 2]);
        let rules = CategoryRuleSet::default();
        let result = consolidate_pois(
            &cache,
            &rules,
            &park_request(),
            &ScenarioEdit::new(vec![], vec![PoiId::Osm(1)]),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, PoiId::Osm(2));
    }

    #[test]
    fn test_addition_category_matching_is_case_insensitive() {
        let cache = cache_with("park", &[]);
        let rules = CategoryRuleSet::default();
        let addition = ScenarioPoi {
            lat: 51.0,
            lon: 7.0,
            category: String::from("Park"),
            name: None,
        };
        let result = consolidate_pois(
            &cache,
            &rules,
            &park_request(),
            &ScenarioEdit::new(vec![addition], vec![]),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, PoiId::User(0));
        assert_eq!(result[0].category, "park");
    }

    #[test]
    fn test_unknown_requested_category_does_not_affect_others() {
        let cache = cache_with("park", &[1]);
        let rules = CategoryRuleSet::default();
        let requested = vec![String::from("bogus"), String::from("park")];
        let result = consolidate_pois(&cache, &rules, &requested, &ScenarioEdit::default());
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_addition_with_unconfigured_category_is_dropped() {
        let cache = cache_with("park", &[]);
        let rules = CategoryRuleSet::default();
        let addition = ScenarioPoi {
            lat: 51.0,
            lon: 7.0,
            category: String::from("heliport"),
            name: None,
        };
        let result = consolidate_pois(
            &cache,
            &rules,
            &park_request(),
            &ScenarioEdit::new(vec![addition], vec![]),
        );
        assert!(result.is_empty());
    }
}
