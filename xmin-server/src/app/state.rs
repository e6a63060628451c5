use std::sync::Arc;

use tokio::sync::RwLock;
use xmin_core::model::crs::PlanarTransform;
use xmin_core::model::grid::GridStore;
use xmin_core::model::poi::CategoryRuleSet;
use xmin_core::model::roi::ModeSpeeds;
use xmin_core::model::routing::RoutingEngine;
use xmin_osm::model::ingest::PoiCache;

use super::ServerError;
use crate::io::DistrictStore;

/// everything a request handler needs, built once by the warm-up task and
/// immutable afterward. requests clone the Arc and never mutate it, so no
/// further locking is needed on the contents.
pub struct ReadyContext {
    pub transform: PlanarTransform,
    pub grid: GridStore,
    pub districts: DistrictStore,
    pub poi_cache: PoiCache,
    pub engine: RoutingEngine,
    pub rules: CategoryRuleSet,
    pub speeds: ModeSpeeds,
}

/// typed readiness state: either the warm-up is still running, or the
/// context is published. replaces a free-floating status string.
pub enum AppPhase {
    NotReady,
    Ready(Arc<ReadyContext>),
}

/// handle shared between the warm-up task and all request handlers. the
/// phase is swapped exactly once, from NotReady to Ready.
#[derive(Clone)]
pub struct SharedState {
    phase: Arc<RwLock<AppPhase>>,
}

impl SharedState {
    pub fn not_ready() -> SharedState {
        SharedState {
            phase: Arc::new(RwLock::new(AppPhase::NotReady)),
        }
    }

    pub async fn publish(&self, context: ReadyContext) {
        let mut phase = self.phase.write().await;
        *phase = AppPhase::Ready(Arc::new(context));
    }

    /// the ready context, or the not-ready error every routing-dependent
    /// endpoint surfaces as 503.
    pub async fn ready(&self) -> Result<Arc<ReadyContext>, ServerError> {
        match &*self.phase.read().await {
            AppPhase::NotReady => Err(ServerError::NotReady),
            AppPhase::Ready(context) => Ok(context.clone()),
        }
    }
}
