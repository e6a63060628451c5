use std::str::FromStr;

use geo::{Intersects, LineString, MultiPolygon, Point, Polygon};

use super::RoiError;
use crate::model::crs::PlanarTransform;
use crate::model::poi::PointOfInterest;

/// the user-supplied query rectangle in geographic coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionOfInterest {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl FromStr for RegionOfInterest {
    type Err = RoiError;

    /// parses the `"minLon,minLat,maxLon,maxLat"` request form. wrong arity
    /// or unparsable components are a structural request error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| RoiError::InvalidBoundingBox(String::from(s)))?;
        match parts.as_slice() {
            [min_lon, min_lat, max_lon, max_lat]
                if parts.iter().all(|v| v.is_finite()) =>
            {
                Ok(RegionOfInterest {
                    min_lon: *min_lon,
                    min_lat: *min_lat,
                    max_lon: *max_lon,
                    max_lat: *max_lat,
                })
            }
            _ => Err(RoiError::InvalidBoundingBox(String::from(s))),
        }
    }
}

impl RegionOfInterest {
    /// the ROI as a planar polygon, each corner transformed independently,
    /// grown outward by `buffer_meters` with a proper polygon offset. used
    /// as the destination prefilter region.
    pub fn buffered_planar(
        &self,
        transform: &PlanarTransform,
        buffer_meters: f64,
    ) -> Result<MultiPolygon, RoiError> {
        let corners = transform.to_planar_all(&[
            (self.min_lon, self.min_lat),
            (self.max_lon, self.min_lat),
            (self.max_lon, self.max_lat),
            (self.min_lon, self.max_lat),
            (self.min_lon, self.min_lat),
        ])?;
        let quad = Polygon::new(LineString::from(corners), vec![]);
        Ok(geo_buffer::buffer_polygon(&quad, buffer_meters))
    }

    /// retains the candidate POIs whose planar point intersects the buffered
    /// region. bounds the destination set handed to the routing engine;
    /// must stay a superset of the POIs reachable within the time budget,
    /// so the buffer covers the full query region at the configured speed.
    /// retained POIs keep their geographic coordinates.
    pub fn prefilter_pois(
        &self,
        transform: &PlanarTransform,
        buffer_meters: f64,
        candidates: Vec<PointOfInterest>,
    ) -> Result<Vec<PointOfInterest>, RoiError> {
        let region = self.buffered_planar(transform, buffer_meters)?;
        let mut retained = Vec::with_capacity(candidates.len());
        for poi in candidates {
            let (x, y) = transform.to_planar(poi.lon, poi.lat)?;
            if region.intersects(&Point::new(x, y)) {
                retained.push(poi);
            }
        }
        Ok(retained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::poi::PoiId;
    use std::str::FromStr;

    fn poi(id: i64, lon: f64, lat: f64) -> PointOfInterest {
        PointOfInterest {
            id: PoiId::Osm(id),
            lat,
            lon,
            category: String::from("park"),
            name: None,
        }
    }

    #[test]
    fn test_parse_ok() {
        let roi = RegionOfInterest::from_str("6.9,51.1,7.4,51.3").unwrap();
        assert_eq!(roi.min_lon, 6.9);
        assert_eq!(roi.max_lat, 51.3);
    }

    #[test]
    fn test_parse_rejects_wrong_arity_and_garbage() {
        assert!(RegionOfInterest::from_str("6.9,51.1,7.4").is_err());
        assert!(RegionOfInterest::from_str("6.9,51.1,7.4,51.3,9.9").is_err());
        assert!(RegionOfInterest::from_str("a,b,c,d").is_err());
        assert!(RegionOfInterest::from_str("").is_err());
    }

    #[test]
    fn test_prefilter_keeps_inside_and_drops_far_away() {
        let t = PlanarTransform::new();
        let roi = RegionOfInterest::from_str("9.99,51.99,10.01,52.01").unwrap();
        let candidates = vec![
            poi(1, 10.0, 52.0),  // inside the rectangle
            poi(2, 10.02, 52.0), // ~1.4km east, inside a 2km buffer
            poi(3, 11.0, 52.0),  // ~68km east, far outside
        ];
        let retained = roi.prefilter_pois(&t, 2000.0, candidates).unwrap();
        let ids = retained.iter().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![PoiId::Osm(1), PoiId::Osm(2)]);
    }

    #[test]
    fn test_buffer_is_monotonic_in_minutes() {
        let t = PlanarTransform::new();
        let speeds = crate::model::roi::ModeSpeeds::default();
        let roi = RegionOfInterest::from_str("9.99,51.99,10.01,52.01").unwrap();
        let candidates = (0..20)
            .map(|i| poi(i, 10.0 + 0.005 * i as f64, 52.0))
            .collect::<Vec<_>>();
        let mut previous = 0usize;
        for minutes in [5u32, 10, 15, 30, 60] {
            let buffer = speeds.buffer_meters(crate::model::roi::TravelMode::Walk, minutes);
            let retained = roi
                .prefilter_pois(&t, buffer, candidates.clone())
                .unwrap()
                .len();
            assert!(
                retained >= previous,
                "retained set shrank when minutes grew: {previous} -> {retained}"
            );
            previous = retained;
        }
    }
}
