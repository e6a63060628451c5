use rstar::{RTree, RTreeObject, AABB};

use super::{GridCell, GridError};
use crate::model::crs::PlanarTransform;

/// spatial index entry: a cell's planar centroid plus its position in the
/// load-ordered cell vector.
#[derive(Clone, Debug)]
struct CellPosition {
    x: f64,
    y: f64,
    index: usize,
}

impl RTreeObject for CellPosition {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

/// in-memory table of all population grid cells with an R-tree over their
/// planar centroids. built once at startup and read-only afterward.
pub struct GridStore {
    cells: Vec<GridCell>,
    rtree: RTree<CellPosition>,
    /// half of the cell edge length in meters
    half_width: f64,
}

impl GridStore {
    pub fn new(cells: Vec<GridCell>, cell_size_meters: f64) -> GridStore {
        let positions = cells
            .iter()
            .enumerate()
            .map(|(index, c)| CellPosition {
                x: c.x,
                y: c.y,
                index,
            })
            .collect();
        GridStore {
            cells,
            rtree: RTree::bulk_load(positions),
            half_width: cell_size_meters / 2.0,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    /// all cells whose centroid falls inside the geographic bounding box,
    /// expanded by one half cell-width on every side so cells whose footprint
    /// only partially overlaps the box are still included.
    ///
    /// the box's four corners are transformed to the planar frame
    /// independently and the axis-aligned envelope of the four transformed
    /// points is taken. a single transformed rectangle would be wrong: the
    /// two frames are rotated relative to each other, so edges of the
    /// geographic box do not map to axis-aligned planar edges.
    ///
    /// results are in stable load order. no implicit limit; callers cap on
    /// their own.
    pub fn cells_in_bounding_box(
        &self,
        transform: &PlanarTransform,
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    ) -> Result<Vec<&GridCell>, GridError> {
        let corners = transform.to_planar_all(&[
            (min_lon, min_lat),
            (max_lon, min_lat),
            (min_lon, max_lat),
            (max_lon, max_lat),
        ])?;
        let min_x = corners.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
        let max_x = corners
            .iter()
            .map(|(x, _)| *x)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
        let max_y = corners
            .iter()
            .map(|(_, y)| *y)
            .fold(f64::NEG_INFINITY, f64::max);

        let envelope = AABB::from_corners(
            [min_x - self.half_width, min_y - self.half_width],
            [max_x + self.half_width, max_y + self.half_width],
        );
        let mut indices = self
            .rtree
            .locate_in_envelope(&envelope)
            .map(|p| p.index)
            .collect::<Vec<_>>();
        indices.sort_unstable();
        Ok(indices.into_iter().map(|i| &self.cells[i]).collect())
    }
}
