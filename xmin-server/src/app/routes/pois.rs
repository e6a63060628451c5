use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use xmin_core::model::poi::PointOfInterest;

use crate::app::{ServerError, SharedState};

#[derive(Deserialize, Debug)]
pub struct PoisRequest {
    /// geographic box in (south, west, north, east) order
    pub bbox: Vec<f64>,
    pub categories: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct PoisResponse {
    pub pois: Vec<PointOfInterest>,
}

/// cached POIs within a bounding box for the requested categories. unknown
/// categories are filtered; zero valid categories is an empty result, not an
/// error. cached rows are re-validated defensively: a non-finite coordinate
/// that slipped into the cache is dropped and logged, never served.
pub async fn handle(
    State(state): State<SharedState>,
    Json(request): Json<PoisRequest>,
) -> Result<Json<PoisResponse>, ServerError> {
    let context = state.ready().await?;
    let [south, west, north, east] = request.bbox.as_slice() else {
        return Err(ServerError::BadRequest(String::from(
            "bbox must be [south,west,north,east]",
        )));
    };
    let categories = context.rules.normalize_requested(&request.categories);
    let mut pois: Vec<PointOfInterest> = Vec::new();
    for category in &categories {
        let cached = match context.poi_cache.get(category) {
            Some(cached) => cached,
            None => continue,
        };
        for poi in cached {
            if !poi.lat.is_finite() || !poi.lon.is_finite() {
                log::warn!(
                    "dropping invalid cached poi: category={} id={} lat={} lon={}",
                    category,
                    poi.id,
                    poi.lat,
                    poi.lon
                );
                continue;
            }
            let inside = poi.lat >= *south && poi.lat <= *north && poi.lon >= *west && poi.lon <= *east;
            if inside {
                pois.push(poi.clone());
            }
        }
    }
    Ok(Json(PoisResponse { pois }))
}
