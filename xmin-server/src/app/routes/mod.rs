pub mod cityscope;
pub mod districts;
pub mod grid;
pub mod isochrone;
pub mod pois;

use axum::routing::{get, post};
use axum::Router;

use super::SharedState;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/isochrone", post(isochrone::handle))
        .route("/api/pois", post(pois::handle))
        .route("/api/grid", get(grid::handle))
        .route("/api/districts", get(districts::handle))
        .route("/api/cityscope", post(cityscope::handle))
        .with_state(state)
}
