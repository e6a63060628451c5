mod element;
mod overpass_client;
mod overpass_error;
mod overpass_query;
mod tag_filter;

pub use element::{ElementCenter, OverpassElement, OverpassResponse};
pub use overpass_client::OverpassClient;
pub use overpass_error::OverpassError;
pub use overpass_query::{build_category_query, QueryBounds};
pub use tag_filter::TagFilter;
