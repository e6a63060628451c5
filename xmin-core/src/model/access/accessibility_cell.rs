use std::collections::BTreeMap;

use geojson::{Feature, FeatureCollection};
use serde_json::{json, Map};

use crate::model::crs::{CrsError, PlanarTransform};
use crate::model::grid::{grid_ops, GridCell};

/// the per-request output unit: one grid cell with its population, district
/// and one time-to-nearest-POI value per requested category.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessibilityCell {
    pub cell_id: String,
    pub population: Option<u32>,
    pub district_id: Option<i64>,
    /// one entry per requested category; `None` means no POI of that
    /// category was reachable or present
    pub travel_times: BTreeMap<String, Option<f64>>,
}

impl AccessibilityCell {
    /// left-join constructor: a cell absent from the aggregation table gets
    /// an all-absent row, so every queried cell is represented and sibling
    /// cells always carry the same property keys.
    pub fn from_parts(
        cell: &GridCell,
        times: Option<&BTreeMap<String, Option<f64>>>,
        requested: &[String],
    ) -> AccessibilityCell {
        let travel_times = match times {
            Some(row) => row.clone(),
            None => requested.iter().map(|c| (c.clone(), None)).collect(),
        };
        AccessibilityCell {
            cell_id: cell.cell_id.clone(),
            population: cell.population,
            district_id: cell.district_id,
            travel_times,
        }
    }

    /// renders the cell as a GeoJSON feature with its boundary in geographic
    /// coordinates and the flat `tt_<category>` property set.
    pub fn to_feature(
        &self,
        transform: &PlanarTransform,
        x: f64,
        y: f64,
        half_width: f64,
    ) -> Result<Feature, CrsError> {
        let polygon = grid_ops::cell_polygon_geographic(transform, x, y, half_width)?;
        let mut properties = Map::new();
        properties.insert(String::from("id"), json!(self.cell_id));
        properties.insert(String::from("pop"), json!(self.population));
        properties.insert(String::from("district_id"), json!(self.district_id));
        for (category, minutes) in &self.travel_times {
            properties.insert(format!("tt_{category}"), json!(minutes));
        }
        Ok(Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&polygon))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        })
    }
}

/// joins the aggregation table back onto the queried cells and emits the
/// feature collection. cells outside the selection never appear; cells
/// without travel-time data appear with all categories absent.
pub fn assemble_feature_collection(
    cells: &[&GridCell],
    table: &BTreeMap<String, BTreeMap<String, Option<f64>>>,
    requested: &[String],
    transform: &PlanarTransform,
    half_width: f64,
) -> Result<FeatureCollection, CrsError> {
    let features = cells
        .iter()
        .map(|cell| {
            AccessibilityCell::from_parts(cell, table.get(&cell.cell_id), requested)
                .to_feature(transform, cell.x, cell.y, half_width)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}
