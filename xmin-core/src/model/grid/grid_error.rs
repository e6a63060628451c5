use thiserror::Error;

use crate::model::crs::CrsError;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("failure transforming grid query geometry: {source}")]
    TransformError {
        #[from]
        source: CrsError,
    },
    #[error("grid cell '{0}' has non-finite centroid ({1}, {2})")]
    NonFiniteCentroid(String, f64, f64),
}
