use std::str::FromStr;

use axum::extract::State;
use axum::Json;
use geojson::Feature;
use serde::Deserialize;
use serde_json::{json, Map};
use xmin_core::model::roi::TravelMode;

use crate::app::{ServerError, SharedState};

#[derive(Deserialize, Debug)]
pub struct IsochroneRequest {
    pub lat: f64,
    pub lon: f64,
    pub mode: String,
    /// time threshold in minutes
    pub threshold: u32,
}

/// the polygon reachable within the threshold from a single origin, as one
/// GeoJSON feature.
pub async fn handle(
    State(state): State<SharedState>,
    Json(request): Json<IsochroneRequest>,
) -> Result<Json<Feature>, ServerError> {
    let context = state.ready().await?;
    let mode = TravelMode::from_str(&request.mode).map_err(ServerError::BadRequest)?;
    let polygon = context
        .engine
        .isochrone(request.lat, request.lon, mode, request.threshold)
        .await?;
    let mut properties = Map::new();
    properties.insert(String::from("travel_time"), json!(request.threshold));
    Ok(Json(Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(&polygon))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }))
}
