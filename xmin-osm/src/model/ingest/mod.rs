mod poi_cache;
mod refresh;
mod retry_policy;

pub use poi_cache::PoiCache;
pub use refresh::{collect_category_pois, fetch_category, warm_up};
pub use retry_policy::RetryPolicy;
