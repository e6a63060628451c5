use std::time::Duration;

use thiserror::Error;
use xmin_core::model::crs::PlanarTransform;
use xmin_core::model::routing::{RoutingEngine, RoutingError};
use xmin_osm::model::ingest;
use xmin_osm::model::overpass::{OverpassClient, OverpassError};

use super::{AppConfiguration, ReadyContext, SharedState};
use crate::io::{district_store, grid_reader, DistrictError, GridReadError};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("failure loading population grid: {source}")]
    GridError {
        #[from]
        source: GridReadError,
    },
    #[error("failure loading districts: {source}")]
    DistrictError {
        #[from]
        source: DistrictError,
    },
    #[error("failure building routing engine client: {source}")]
    RoutingError {
        #[from]
        source: RoutingError,
    },
    #[error("failure building overpass client: {source}")]
    OverpassError {
        #[from]
        source: OverpassError,
    },
    #[error("failure binding {0}: {1}")]
    BindError(String, std::io::Error),
    #[error("server terminated: {0}")]
    ServeError(String),
}

/// one-time construction of the shared application context: reference data,
/// the routing engine handle, and the sequential POI cache warm-up. runs to
/// completion before the ready state is published; request serving callers
/// see 503 until then.
pub async fn initialize(config: &AppConfiguration) -> Result<ReadyContext, StartupError> {
    let transform = PlanarTransform::new();

    let grid = grid_reader::load_grid_store(
        &config.data.grid_csv,
        config.data.grid_delimiter as u8,
        config.data.cell_size_meters,
    )?;
    log::info!("population grid loaded, {} cells", grid.len());

    let districts = district_store::load_districts(&config.data.districts_geojson)?;
    log::info!("districts loaded, {} features", districts.len());

    let engine = RoutingEngine::http(
        &config.routing.url,
        Duration::from_secs(config.routing.timeout_seconds),
        config.routing.departure,
    )?;

    let overpass = OverpassClient::new(
        &config.overpass.url,
        Duration::from_secs(config.overpass.timeout_seconds),
    )?;
    let poi_cache = ingest::warm_up(
        &overpass,
        &config.category_rules,
        &config.city_bounds,
        config.overpass.query_timeout_seconds,
        &config.overpass.retry,
        Duration::from_secs(config.overpass.cooldown_seconds),
    )
    .await;

    Ok(ReadyContext {
        transform,
        grid,
        districts,
        poi_cache,
        engine,
        rules: config.category_rules.clone(),
        speeds: config.speeds,
    })
}

/// runs the warm-up on the runtime and publishes the ready state once it
/// finishes. a failed warm-up leaves the service in NotReady and logs the
/// cause; ingestion itself retries per its policy and does not fail here.
pub fn spawn_warmup(state: SharedState, config: AppConfiguration) {
    tokio::spawn(async move {
        match initialize(&config).await {
            Ok(context) => {
                state.publish(context).await;
                log::info!("startup complete, serving requests");
            }
            Err(e) => {
                log::error!("startup failed, service stays unavailable: {e}");
            }
        }
    });
}
