use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use xmin_core::model::poi::CategoryRuleSet;

use super::TagFilter;

/// element kinds a selector is expanded over; ways and relations rely on the
/// `out center` epilogue for a representative coordinate.
const ELEMENT_KINDS: [&str; 3] = ["node", "way", "relation"];

/// the fixed geographic bounding box POIs are ingested for, in Overpass
/// (south, west, north, east) order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct QueryBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Display for QueryBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

/// builds the Overpass query for one category: the union of
/// node/way/relation selectors for each of the category's rules inside the
/// bounding box, requesting center coordinates for non-point geometries.
pub fn build_category_query(
    rules: &CategoryRuleSet,
    category: &str,
    bounds: &QueryBounds,
    timeout_seconds: u64,
) -> String {
    let selectors = rules
        .rules_for(category)
        .into_iter()
        .flat_map(|rule| {
            let filter = TagFilter::from(rule);
            ELEMENT_KINDS
                .iter()
                .map(move |kind| format!("{kind}{filter}({bounds});"))
        })
        .collect::<Vec<_>>()
        .join("\n  ");
    format!("[out:json][timeout:{timeout_seconds}];\n(\n  {selectors}\n);\nout center;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmin_core::model::poi::{CategoryRule, CategoryRuleSet};

    fn bounds() -> QueryBounds {
        QueryBounds {
            south: 51.0679,
            west: 6.9357,
            north: 51.3221,
            east: 7.4343,
        }
    }

    #[test]
    fn test_single_rule_category_query() {
        let rules = CategoryRuleSet::new(vec![CategoryRule::new(
            "supermarket",
            "shop",
            &["supermarket"],
        )]);
        let query = build_category_query(&rules, "supermarket", &bounds(), 60);
        let expected = "[out:json][timeout:60];\n(\n  \
            node[\"shop\"=\"supermarket\"](51.0679,6.9357,51.3221,7.4343);\n  \
            way[\"shop\"=\"supermarket\"](51.0679,6.9357,51.3221,7.4343);\n  \
            relation[\"shop\"=\"supermarket\"](51.0679,6.9357,51.3221,7.4343);\n\
            );\nout center;";
        assert_eq!(query, expected);
    }

    #[test]
    fn test_multi_rule_category_unions_all_selectors() {
        let rules = CategoryRuleSet::default();
        let query = build_category_query(&rules, "public_transport", &bounds(), 60);
        // three rules x three element kinds
        assert_eq!(query.matches(';').count(), 3 * 3 + 3);
        assert!(query.contains("node[\"railway\"~\"^(halt|station|tram_stop)$\"]"));
        assert!(query.contains("relation[\"public_transport\"~\"^(platform|station|stop_position)$\"]"));
        assert!(query.ends_with("out center;"));
    }

    #[test]
    fn test_unknown_category_yields_empty_union() {
        let rules = CategoryRuleSet::default();
        let query = build_category_query(&rules, "heliport", &bounds(), 60);
        assert!(query.contains("(\n  \n);"));
    }
}
