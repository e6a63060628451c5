mod engine;
mod observation;
mod routing_error;

pub use engine::RoutingEngine;
pub use observation::{EnginePoint, TravelTimeObservation};
pub use routing_error::RoutingError;
