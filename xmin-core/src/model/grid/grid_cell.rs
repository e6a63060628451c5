use serde::{Deserialize, Serialize};

/// one fixed-size cell of the population grid. centroids are stored in the
/// planar frame; geometry in either frame is derived on demand via
/// [`super::grid_ops`]. immutable after load.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GridCell {
    pub cell_id: String,
    /// planar centroid easting in meters
    pub x: f64,
    /// planar centroid northing in meters
    pub y: f64,
    pub population: Option<u32>,
    pub district_id: Option<i64>,
}
