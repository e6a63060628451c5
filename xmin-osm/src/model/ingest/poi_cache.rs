use std::collections::HashMap;

use xmin_core::model::poi::PointOfInterest;

/// the category-keyed POI collections serving every request. populated once
/// during startup warm-up and frozen; a later reload feature would have to
/// swap whole-category collections, never mutate them in place.
#[derive(Debug, Default)]
pub struct PoiCache {
    by_category: HashMap<String, Vec<PointOfInterest>>,
}

impl PoiCache {
    /// replaces a category's collection wholesale.
    pub fn insert(&mut self, category: &str, pois: Vec<PointOfInterest>) {
        self.by_category.insert(String::from(category), pois);
    }

    pub fn get(&self, category: &str) -> Option<&Vec<PointOfInterest>> {
        self.by_category.get(category)
    }

    pub fn by_category(&self) -> &HashMap<String, Vec<PointOfInterest>> {
        &self.by_category
    }

    pub fn total_pois(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }
}
