use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// decoded body of an Overpass `[out:json]` response.
#[derive(Deserialize, Debug, Default)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// a fallback coordinate pair attached by `out center` for ways/relations.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ElementCenter {
    pub lat: Option<Value>,
    pub lon: Option<Value>,
}

/// one returned OSM element. coordinates are kept as raw JSON values:
/// upstream data quality is not trusted, and a malformed coordinate must be
/// observable (logged with its raw form) rather than failing the whole
/// response decode.
#[derive(Deserialize, Debug, Clone)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub id: i64,
    pub lat: Option<Value>,
    pub lon: Option<Value>,
    pub center: Option<ElementCenter>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl OverpassElement {
    /// the element's representative coordinate as validated finite numbers:
    /// the directly-attached pair, falling back to the `center` pair for
    /// non-point geometries. `None` when either component is missing or does
    /// not coerce to a finite f64.
    pub fn resolve_coordinate(&self) -> Option<(f64, f64)> {
        let center = self.center.clone().unwrap_or_default();
        let lat = coerce_finite(self.lat.as_ref().or(center.lat.as_ref()))?;
        let lon = coerce_finite(self.lon.as_ref().or(center.lon.as_ref()))?;
        Some((lat, lon))
    }

    pub fn name(&self) -> Option<String> {
        self.tags.get("name").cloned()
    }
}

/// coerces a raw JSON value to a finite f64. accepts numbers and numeric
/// strings; everything else (null, non-numeric strings, non-finite parses)
/// is rejected.
fn coerce_finite(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}
