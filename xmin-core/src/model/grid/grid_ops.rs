use geo::{LineString, Polygon};

use crate::model::crs::{CrsError, PlanarTransform};

/// the closed planar boundary ring of a cell, centroid ± half width.
pub fn cell_polygon_planar(x: f64, y: f64, half_width: f64) -> Polygon {
    let ring = vec![
        (x - half_width, y - half_width),
        (x + half_width, y - half_width),
        (x + half_width, y + half_width),
        (x - half_width, y + half_width),
        (x - half_width, y - half_width),
    ];
    Polygon::new(LineString::from(ring), vec![])
}

/// the cell boundary in geographic coordinates. each corner is transformed
/// independently; reusing a planar ring transformed as a whole would bake the
/// frames' relative rotation into the edges.
pub fn cell_polygon_geographic(
    transform: &PlanarTransform,
    x: f64,
    y: f64,
    half_width: f64,
) -> Result<Polygon, CrsError> {
    let corners = [
        (x - half_width, y - half_width),
        (x + half_width, y - half_width),
        (x + half_width, y + half_width),
        (x - half_width, y + half_width),
        (x - half_width, y - half_width),
    ];
    let ring = corners
        .iter()
        .map(|(cx, cy)| transform.to_geographic(*cx, *cy))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(LineString::from(ring), vec![]))
}
