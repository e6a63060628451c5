use std::str::FromStr;

use axum::extract::State;
use axum::Json;
use geojson::FeatureCollection;
use serde::Deserialize;
use xmin_core::model::access::{self, access_ops};
use xmin_core::model::poi::{PoiId, ScenarioEdit, ScenarioPoi};
use xmin_core::model::roi::{RegionOfInterest, TravelMode};
use xmin_core::model::routing::EnginePoint;

use crate::app::{ServerError, SharedState};

#[derive(Deserialize, Debug)]
pub struct CityScopeRequest {
    /// "minLon,minLat,maxLon,maxLat"
    pub bbox: String,
    pub categories: Vec<String>,
    pub mode: String,
    #[serde(rename = "currentMinutes")]
    pub current_minutes: u32,
    #[serde(default)]
    pub user_pois: Vec<ScenarioPoi>,
    #[serde(default)]
    pub removed_poi_ids: Vec<PoiId>,
}

fn empty_collection() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: Vec::new(),
        foreign_members: None,
    }
}

/// the accessibility aggregation pipeline: select cells, consolidate the
/// scenario-adjusted POI set, prefilter destinations by the buffered ROI,
/// run one travel-time matrix call, reduce to the minimum per (cell,
/// category) and assemble the feature collection.
pub async fn handle(
    State(state): State<SharedState>,
    Json(request): Json<CityScopeRequest>,
) -> Result<Json<FeatureCollection>, ServerError> {
    let context = state.ready().await?;

    let categories = context.rules.normalize_requested(&request.categories);
    if categories.is_empty() {
        return Ok(Json(empty_collection()));
    }
    let mode = TravelMode::from_str(&request.mode).map_err(ServerError::BadRequest)?;
    let roi = RegionOfInterest::from_str(&request.bbox)?;

    let cells = context.grid.cells_in_bounding_box(
        &context.transform,
        roi.min_lon,
        roi.min_lat,
        roi.max_lon,
        roi.max_lat,
    )?;
    if cells.is_empty() {
        return Ok(Json(empty_collection()));
    }

    let scenario = ScenarioEdit::new(request.user_pois.clone(), request.removed_poi_ids.clone());
    let candidates = xmin_core::model::poi::consolidate_pois(
        context.poi_cache.by_category(),
        &context.rules,
        &categories,
        &scenario,
    );
    if candidates.is_empty() {
        return Ok(Json(empty_collection()));
    }

    let buffer_meters = context.speeds.buffer_meters(mode, request.current_minutes);
    let destinations = roi.prefilter_pois(&context.transform, buffer_meters, candidates)?;
    if destinations.is_empty() {
        return Ok(Json(empty_collection()));
    }

    let origins = cells
        .iter()
        .map(|cell| {
            let (lon, lat) = context.transform.to_geographic(cell.x, cell.y)?;
            Ok(EnginePoint {
                id: cell.cell_id.clone(),
                lat,
                lon,
            })
        })
        .collect::<Result<Vec<_>, ServerError>>()?;
    let destination_points = destinations
        .iter()
        .map(|poi| EnginePoint {
            id: poi.id.to_string(),
            lat: poi.lat,
            lon: poi.lon,
        })
        .collect::<Vec<_>>();

    let observations = context
        .engine
        .travel_time_matrix(&origins, &destination_points, mode)
        .await?;

    let index = access_ops::category_index(&destinations);
    let minima = access_ops::minimum_time_by_category(&observations, &index);
    let table = access_ops::materialize_category_times(&minima, &categories);
    let collection = access::assemble_feature_collection(
        &cells,
        &table,
        &categories,
        &context.transform,
        context.grid.half_width(),
    )?;
    Ok(Json(collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{ReadyContext, SharedState};
    use crate::io::DistrictStore;
    use serde_json::json;
    use xmin_core::model::crs::PlanarTransform;
    use xmin_core::model::grid::{GridCell, GridStore};
    use xmin_core::model::poi::{CategoryRuleSet, PointOfInterest};
    use xmin_core::model::roi::ModeSpeeds;
    use xmin_core::model::routing::{RoutingEngine, TravelTimeObservation};
    use xmin_osm::model::ingest::PoiCache;

    /// a ready state with two cells near the projection center, one cached
    /// park POI and a fixed engine that reaches the park from c1 only.
    async fn ready_state(observations: Vec<TravelTimeObservation>) -> SharedState {
        let transform = PlanarTransform::new();
        let cells = vec![
            GridCell {
                cell_id: String::from("c1"),
                x: 4_321_000.0,
                y: 3_210_000.0,
                population: Some(40),
                district_id: Some(1),
            },
            GridCell {
                cell_id: String::from("c2"),
                x: 4_321_100.0,
                y: 3_210_000.0,
                population: None,
                district_id: Some(1),
            },
        ];
        let (lon, lat) = transform.to_geographic(4_321_050.0, 3_210_050.0).unwrap();
        let mut poi_cache = PoiCache::default();
        poi_cache.insert(
            "park",
            vec![PointOfInterest {
                id: PoiId::Osm(7),
                lat,
                lon,
                category: String::from("park"),
                name: Some(String::from("central park")),
            }],
        );
        let state = SharedState::not_ready();
        state
            .publish(ReadyContext {
                transform,
                grid: GridStore::new(cells, 100.0),
                districts: DistrictStore::default(),
                poi_cache,
                engine: RoutingEngine::Fixed {
                    observations,
                    isochrone: None,
                },
                rules: CategoryRuleSet::default(),
                speeds: ModeSpeeds::default(),
            })
            .await;
        state
    }

    fn request(categories: Vec<&str>) -> Json<CityScopeRequest> {
        Json(CityScopeRequest {
            bbox: String::from("9.99,51.99,10.01,52.01"),
            categories: categories.into_iter().map(String::from).collect(),
            mode: String::from("walk"),
            current_minutes: 15,
            user_pois: Vec::new(),
            removed_poi_ids: Vec::new(),
        })
    }

    #[tokio::test]
    async fn test_not_ready_is_service_unavailable() {
        let state = SharedState::not_ready();
        let result = handle(State(state), request(vec!["park"])).await;
        assert!(matches!(result, Err(ServerError::NotReady)));
    }

    #[tokio::test]
    async fn test_empty_and_invalid_categories_yield_empty_collection() {
        let state = ready_state(vec![]).await;
        for categories in [vec![], vec!["bogus"]] {
            let Json(collection) = handle(State(state.clone()), request(categories))
                .await
                .unwrap();
            assert!(collection.features.is_empty());
            let rendered = serde_json::to_value(&collection).unwrap();
            assert_eq!(
                rendered,
                json!({"type": "FeatureCollection", "features": []})
            );
        }
    }

    #[tokio::test]
    async fn test_malformed_bbox_is_bad_request() {
        let state = ready_state(vec![]).await;
        let mut bad = request(vec!["park"]);
        bad.0.bbox = String::from("6.9,51.1");
        let result = handle(State(state), bad).await;
        assert!(matches!(result, Err(ServerError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_unreached_cell_has_null_travel_time() {
        let observations = vec![TravelTimeObservation {
            origin: String::from("c1"),
            destination: PoiId::Osm(7),
            minutes: Some(4.0),
        }];
        let state = ready_state(observations).await;
        let Json(collection) = handle(State(state), request(vec!["park"])).await.unwrap();
        assert_eq!(collection.features.len(), 2);
        let by_id = |id: &str| {
            collection
                .features
                .iter()
                .find(|f| {
                    f.properties.as_ref().and_then(|p| p.get("id"))
                        == Some(&json!(id))
                })
                .and_then(|f| f.properties.as_ref())
                .cloned()
                .unwrap()
        };
        let c1 = by_id("c1");
        let c2 = by_id("c2");
        assert_eq!(c1.get("tt_park"), Some(&json!(4.0)));
        // never Infinity, never a missing key: an explicit null
        assert_eq!(c2.get("tt_park"), Some(&json!(null)));
        assert_eq!(c2.get("pop"), Some(&json!(null)));
    }

    #[tokio::test]
    async fn test_scenario_removal_suppresses_cached_poi() {
        let observations = vec![TravelTimeObservation {
            origin: String::from("c1"),
            destination: PoiId::Osm(7),
            minutes: Some(4.0),
        }];
        let state = ready_state(observations).await;
        let mut req = request(vec!["park"]);
        req.0.removed_poi_ids = vec![PoiId::Osm(7)];
        let Json(collection) = handle(State(state), req).await.unwrap();
        // the only park was removed by the scenario: no destinations remain
        assert!(collection.features.is_empty());
    }
}
