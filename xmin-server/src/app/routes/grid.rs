use std::str::FromStr;

use axum::extract::{Query, State};
use axum::Json;
use geojson::{Feature, FeatureCollection};
use serde::Deserialize;
use serde_json::{json, Map};
use xmin_core::model::grid::{grid_ops, GridCell};
use xmin_core::model::roi::RegionOfInterest;

use crate::app::{ServerError, SharedState};

const DEFAULT_LIMIT: usize = 20_000;
const MAX_LIMIT: usize = 200_000;

#[derive(Deserialize, Debug)]
pub struct GridQuery {
    /// optional "minLon,minLat,maxLon,maxLat"
    pub bbox: Option<String>,
    pub limit: Option<usize>,
}

/// grid cells as a feature collection, optionally restricted to a bounding
/// box. the result is capped at `limit` cells, truncated in stable load
/// order.
pub async fn handle(
    State(state): State<SharedState>,
    Query(query): Query<GridQuery>,
) -> Result<Json<FeatureCollection>, ServerError> {
    let context = state.ready().await?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ServerError::BadRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}, found {limit}"
        )));
    }
    let mut cells: Vec<&GridCell> = match &query.bbox {
        Some(bbox) => {
            let roi = RegionOfInterest::from_str(bbox)?;
            context.grid.cells_in_bounding_box(
                &context.transform,
                roi.min_lon,
                roi.min_lat,
                roi.max_lon,
                roi.max_lat,
            )?
        }
        None => context.grid.iter().collect(),
    };
    cells.truncate(limit);

    let features = cells
        .into_iter()
        .map(|cell| {
            let polygon = grid_ops::cell_polygon_geographic(
                &context.transform,
                cell.x,
                cell.y,
                context.grid.half_width(),
            )?;
            let mut properties = Map::new();
            properties.insert(String::from("id"), json!(cell.cell_id));
            properties.insert(String::from("pop"), json!(cell.population));
            Ok(Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&polygon))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect::<Result<Vec<_>, ServerError>>()?;
    Ok(Json(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }))
}
