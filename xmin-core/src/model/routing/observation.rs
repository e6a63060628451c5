use serde::{Deserialize, Serialize};

use crate::model::poi::PoiId;

/// one origin or destination handed to the routing engine, in geographic
/// coordinates with a stable id.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EnginePoint {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

/// one sparse travel-time matrix entry from the routing engine. ephemeral:
/// exists only within one request's processing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TravelTimeObservation {
    #[serde(rename = "from_id")]
    pub origin: String,
    #[serde(rename = "to_id")]
    pub destination: PoiId,
    #[serde(rename = "travel_time")]
    pub minutes: Option<f64>,
}
