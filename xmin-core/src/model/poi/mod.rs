mod category_rule;
mod point_of_interest;
mod poi_id;
mod scenario;

pub use category_rule::{CategoryRule, CategoryRuleSet};
pub use point_of_interest::PointOfInterest;
pub use poi_id::PoiId;
pub use scenario::{consolidate_pois, ScenarioEdit, ScenarioPoi};
