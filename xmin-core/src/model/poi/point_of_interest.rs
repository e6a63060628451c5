use serde::{Deserialize, Serialize};

use super::PoiId;

/// a categorized accessibility destination with a geographic coordinate.
/// category collections are replaced wholesale on refresh, never mutated in
/// place.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PointOfInterest {
    pub id: PoiId,
    pub lat: f64,
    pub lon: f64,
    pub category: String,
    pub name: Option<String>,
}
