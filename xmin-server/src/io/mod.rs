pub mod district_store;
pub mod grid_reader;

pub use district_store::{DistrictError, DistrictStore};
pub use grid_reader::GridReadError;
