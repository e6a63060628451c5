use thiserror::Error;

use crate::model::crs::CrsError;

#[derive(Error, Debug)]
pub enum RoiError {
    #[error("invalid bbox format: '{0}', expected 'minLon,minLat,maxLon,maxLat'")]
    InvalidBoundingBox(String),
    #[error("failure transforming region of interest: {source}")]
    TransformError {
        #[from]
        source: CrsError,
    },
}
