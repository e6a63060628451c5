use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// one tag filter: elements whose `key` tag has one of `values` belong to
/// `category`. a category may own several rules (different keys).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CategoryRule {
    pub category: String,
    pub key: String,
    pub values: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: &str, key: &str, values: &[&str]) -> CategoryRule {
        CategoryRule {
            category: String::from(category),
            key: String::from(key),
            values: values.iter().map(|v| String::from(*v)).collect(),
        }
    }

    pub fn matches(&self, tags: &HashMap<String, String>) -> bool {
        match tags.get(&self.key) {
            None => false,
            Some(value) => self.values.iter().any(|v| v == value),
        }
    }
}

/// the configured, ordered category rule list. classification evaluates
/// rules in list order and the first match wins, so the order is part of the
/// configuration, never derived at runtime.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CategoryRuleSet {
    rules: Vec<CategoryRule>,
}

impl CategoryRuleSet {
    pub fn new(rules: Vec<CategoryRule>) -> CategoryRuleSet {
        CategoryRuleSet { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// rules owned by one category, in configured order.
    pub fn rules_for(&self, category: &str) -> Vec<&CategoryRule> {
        self.rules
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }

    /// distinct category names in first-appearance order.
    pub fn categories(&self) -> Vec<&str> {
        self.rules
            .iter()
            .map(|r| r.category.as_str())
            .unique()
            .collect()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.rules.iter().any(|r| r.category == category)
    }

    /// maps a tag set to its category. deterministic: same tags, same answer,
    /// regardless of call order.
    pub fn classify(&self, tags: &HashMap<String, String>) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.matches(tags))
            .map(|r| r.category.as_str())
    }

    /// normalizes a requested category list: lowercase, keep only configured
    /// categories, preserve request order, drop duplicates. unknown names are
    /// silently filtered and never affect the remaining entries.
    pub fn normalize_requested(&self, requested: &[String]) -> Vec<String> {
        requested
            .iter()
            .map(|c| c.to_lowercase())
            .filter(|c| self.contains(c))
            .unique()
            .collect()
    }
}

impl Default for CategoryRuleSet {
    fn default() -> Self {
        CategoryRuleSet::new(vec![
            CategoryRule::new(
                "education",
                "amenity",
                &["school", "kindergarten", "college", "university"],
            ),
            CategoryRule::new(
                "restaurant",
                "amenity",
                &[
                    "bar",
                    "biergarten",
                    "cafe",
                    "fast_food",
                    "food_court",
                    "pub",
                    "restaurant",
                ],
            ),
            CategoryRule::new(
                "supermarket",
                "shop",
                &["supermarket", "convenience", "food", "mall"],
            ),
            CategoryRule::new(
                "healthcare",
                "amenity",
                &["clinic", "dentist", "doctors", "hospital", "pharmacy"],
            ),
            CategoryRule::new(
                "park",
                "leisure",
                &[
                    "dog_park",
                    "garden",
                    "nature_reserve",
                    "park",
                    "playground",
                    "cemetery",
                ],
            ),
            CategoryRule::new("public_transport", "amenity", &["bus_station", "taxi"]),
            CategoryRule::new(
                "public_transport",
                "public_transport",
                &["station", "stop_position", "platform"],
            ),
            CategoryRule::new(
                "public_transport",
                "railway",
                &["station", "halt", "tram_stop"],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (String::from(*k), String::from(*v)))
            .collect()
    }

    #[test]
    fn test_classify_first_match_wins() {
        let rules = CategoryRuleSet::new(vec![
            CategoryRule::new("education", "amenity", &["school"]),
            CategoryRule::new("other", "amenity", &["school"]),
        ]);
        let t = tags(&[("amenity", "school")]);
        assert_eq!(rules.classify(&t), Some("education"));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let rules = CategoryRuleSet::default();
        let t = tags(&[("amenity", "cafe"), ("name", "some cafe")]);
        let first = rules.classify(&t).map(String::from);
        for _ in 0..10 {
            assert_eq!(rules.classify(&t).map(String::from), first);
        }
        assert_eq!(first.as_deref(), Some("restaurant"));
    }

    #[test]
    fn test_classify_no_match() {
        let rules = CategoryRuleSet::default();
        let t = tags(&[("highway", "residential")]);
        assert_eq!(rules.classify(&t), None);
    }

    #[test]
    fn test_multi_rule_category() {
        let rules = CategoryRuleSet::default();
        assert_eq!(
            rules.classify(&tags(&[("railway", "tram_stop")])),
            Some("public_transport")
        );
        assert_eq!(
            rules.classify(&tags(&[("amenity", "bus_station")])),
            Some("public_transport")
        );
        assert_eq!(rules.rules_for("public_transport").len(), 3);
    }

    #[test]
    fn test_normalize_requested_filters_unknown_case_insensitively() {
        let rules = CategoryRuleSet::default();
        let requested = vec![
            String::from("Park"),
            String::from("bogus"),
            String::from("HEALTHCARE"),
            String::from("park"),
        ];
        assert_eq!(
            rules.normalize_requested(&requested),
            vec![String::from("park"), String::from("healthcare")]
        );
    }
}
