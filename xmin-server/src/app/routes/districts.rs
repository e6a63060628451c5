use axum::extract::State;
use axum::Json;
use geojson::FeatureCollection;

use crate::app::{ServerError, SharedState};

/// the district polygons as loaded at startup.
pub async fn handle(
    State(state): State<SharedState>,
) -> Result<Json<FeatureCollection>, ServerError> {
    let context = state.ready().await?;
    Ok(Json(context.districts.feature_collection().clone()))
}
