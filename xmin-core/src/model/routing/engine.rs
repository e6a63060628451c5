use std::time::Duration;

use chrono::NaiveDateTime;
use geo::{ConvexHull, Geometry, Polygon};
use serde::{Deserialize, Serialize};

use super::{EnginePoint, RoutingError, TravelTimeObservation};
use crate::model::roi::TravelMode;

/// body of the matrix request against the external routing collaborator.
#[derive(Serialize, Debug)]
struct MatrixRequest<'a> {
    origins: &'a [EnginePoint],
    destinations: &'a [EnginePoint],
    mode: TravelMode,
    departure: NaiveDateTime,
}

#[derive(Deserialize, Debug)]
struct MatrixResponse {
    travel_times: Vec<TravelTimeObservation>,
}

#[derive(Serialize, Debug)]
struct IsochroneRequest {
    lat: f64,
    lon: f64,
    mode: TravelMode,
    threshold: u32,
}

/// handle on the external shortest-path collaborator. the engine is opaque:
/// given origins, destinations, a mode and a departure time it returns a
/// sparse travel-time matrix, or for a single origin an isochrone geometry.
/// the matrix call dominates request latency and runs under a bounded
/// client-side timeout.
pub enum RoutingEngine {
    /// JSON-over-HTTP client for a running routing service
    Http {
        base_url: String,
        client: reqwest::Client,
        departure: NaiveDateTime,
    },
    /// canned results, used in tests and offline evaluation
    Fixed {
        observations: Vec<TravelTimeObservation>,
        isochrone: Option<Polygon>,
    },
}

impl RoutingEngine {
    pub fn http(
        base_url: &str,
        timeout: Duration,
        departure: NaiveDateTime,
    ) -> Result<RoutingEngine, RoutingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RoutingError::BuildError(e.to_string()))?;
        Ok(RoutingEngine::Http {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            departure,
        })
    }

    /// one travel-time matrix call for the whole request.
    pub async fn travel_time_matrix(
        &self,
        origins: &[EnginePoint],
        destinations: &[EnginePoint],
        mode: TravelMode,
    ) -> Result<Vec<TravelTimeObservation>, RoutingError> {
        match self {
            RoutingEngine::Http {
                base_url,
                client,
                departure,
            } => {
                log::debug!(
                    "requesting travel time matrix: {} origins, {} destinations, mode {}",
                    origins.len(),
                    destinations.len(),
                    mode
                );
                let body = MatrixRequest {
                    origins,
                    destinations,
                    mode,
                    departure: *departure,
                };
                let response = client
                    .post(format!("{base_url}/matrix"))
                    .json(&body)
                    .send()
                    .await?;
                if !response.status().is_success() {
                    return Err(RoutingError::StatusError(response.status().as_u16()));
                }
                let decoded: MatrixResponse = response
                    .json()
                    .await
                    .map_err(|e| RoutingError::DecodeError(e.to_string()))?;
                Ok(decoded.travel_times)
            }
            RoutingEngine::Fixed { observations, .. } => Ok(observations.clone()),
        }
    }

    /// the polygon reachable within `threshold` minutes from a single
    /// origin, reduced to its convex hull (engine output is ragged in
    /// practice).
    pub async fn isochrone(
        &self,
        lat: f64,
        lon: f64,
        mode: TravelMode,
        threshold: u32,
    ) -> Result<Polygon, RoutingError> {
        match self {
            RoutingEngine::Http {
                base_url, client, ..
            } => {
                let body = IsochroneRequest {
                    lat,
                    lon,
                    mode,
                    threshold,
                };
                let response = client
                    .post(format!("{base_url}/isochrone"))
                    .json(&body)
                    .send()
                    .await?;
                if !response.status().is_success() {
                    return Err(RoutingError::StatusError(response.status().as_u16()));
                }
                let geometry: geojson::Geometry = response
                    .json()
                    .await
                    .map_err(|e| RoutingError::DecodeError(e.to_string()))?;
                let geometry = Geometry::<f64>::try_from(&geometry)
                    .map_err(|e| RoutingError::DecodeError(e.to_string()))?;
                convex_hull(geometry)
            }
            RoutingEngine::Fixed { isochrone, .. } => {
                isochrone.clone().ok_or(RoutingError::NoFixedIsochrone)
            }
        }
    }
}

fn convex_hull(geometry: Geometry<f64>) -> Result<Polygon, RoutingError> {
    match geometry {
        Geometry::Polygon(g) => Ok(g.convex_hull()),
        Geometry::MultiPolygon(g) => Ok(g.convex_hull()),
        Geometry::MultiPoint(g) => Ok(g.convex_hull()),
        Geometry::LineString(g) => Ok(g.convex_hull()),
        Geometry::GeometryCollection(g) => Ok(g.convex_hull()),
        other => Err(RoutingError::UnsupportedGeometry(format!("{other:?}"))),
    }
}
