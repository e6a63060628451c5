use super::CrsError;

/// GRS80 semi-major axis in meters.
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
/// GRS80 flattening.
const FLATTENING: f64 = 1.0 / 298.257_222_101;
/// projection center latitude in degrees (European equal-area grid).
const CENTER_LAT_DEG: f64 = 52.0;
/// projection center longitude in degrees.
const CENTER_LON_DEG: f64 = 10.0;
/// false easting in meters.
const FALSE_EASTING: f64 = 4_321_000.0;
/// false northing in meters.
const FALSE_NORTHING: f64 = 3_210_000.0;

/// convergence threshold for the inverse latitude iteration, in radians.
const PHI_TOLERANCE: f64 = 1e-14;
const PHI_MAX_ITERATIONS: usize = 30;

/// bidirectional projection between geographic longitude/latitude and the
/// meters-based equal-area planar frame all distance and buffer math runs in:
/// the ellipsoidal Lambert azimuthal equal-area projection on GRS80, centered
/// at 52N 10E with false origin (4321000, 3210000). this is the frame the
/// population grid publishes its cell centroids in.
///
/// formulas follow Snyder, "Map Projections: A Working Manual", USGS PP 1395,
/// pp. 187-190 (oblique ellipsoidal case with authalic latitudes).
#[derive(Debug, Clone, Copy)]
pub struct PlanarTransform {
    e: f64,
    e2: f64,
    /// authalic q evaluated at the pole
    qp: f64,
    /// radius of the authalic sphere scaled for the projection
    rq: f64,
    sin_b1: f64,
    cos_b1: f64,
    d: f64,
}

impl Default for PlanarTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanarTransform {
    pub fn new() -> PlanarTransform {
        let e2 = FLATTENING * (2.0 - FLATTENING);
        let e = e2.sqrt();
        let qp = q_authalic(1.0, e, e2);
        let rq = SEMI_MAJOR_AXIS * (qp / 2.0).sqrt();
        let phi1 = CENTER_LAT_DEG.to_radians();
        let sin_b1 = (q_authalic(phi1.sin(), e, e2) / qp).clamp(-1.0, 1.0);
        let cos_b1 = sin_b1.asin().cos();
        let m1 = phi1.cos() / (1.0 - e2 * phi1.sin().powi(2)).sqrt();
        let d = SEMI_MAJOR_AXIS * m1 / (rq * cos_b1);
        PlanarTransform {
            e,
            e2,
            qp,
            rq,
            sin_b1,
            cos_b1,
            d,
        }
    }

    /// projects a geographic coordinate into the planar frame.
    ///
    /// # Arguments
    ///
    /// * `lon` - longitude in degrees
    /// * `lat` - latitude in degrees
    ///
    /// # Returns
    ///
    /// planar (x, y) in meters, or an error for non-finite input
    pub fn to_planar(&self, lon: f64, lat: f64) -> Result<(f64, f64), CrsError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(CrsError::NonFiniteGeographic(lon, lat));
        }
        let phi = lat.to_radians();
        let lam = (lon - CENTER_LON_DEG).to_radians();
        let q = q_authalic(phi.sin(), self.e, self.e2);
        let beta = (q / self.qp).clamp(-1.0, 1.0).asin();
        let b = self.rq
            * (2.0
                / (1.0
                    + self.sin_b1 * beta.sin()
                    + self.cos_b1 * beta.cos() * lam.cos()))
            .sqrt();
        let x = FALSE_EASTING + b * self.d * beta.cos() * lam.sin();
        let y = FALSE_NORTHING
            + (b / self.d) * (self.cos_b1 * beta.sin() - self.sin_b1 * beta.cos() * lam.cos());
        Ok((x, y))
    }

    /// inverse projection from the planar frame back to geographic degrees.
    pub fn to_geographic(&self, x: f64, y: f64) -> Result<(f64, f64), CrsError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(CrsError::NonFinitePlanar(x, y));
        }
        let xp = x - FALSE_EASTING;
        let yp = y - FALSE_NORTHING;
        let rho = ((xp / self.d).powi(2) + (self.d * yp).powi(2)).sqrt();
        if rho < f64::EPSILON {
            return Ok((CENTER_LON_DEG, CENTER_LAT_DEG));
        }
        let ratio = rho / (2.0 * self.rq);
        if ratio > 1.0 {
            return Err(CrsError::OutsideProjectionDomain(x, y));
        }
        let ce = 2.0 * ratio.asin();
        let q = self.qp * (ce.cos() * self.sin_b1 + self.d * yp * ce.sin() * self.cos_b1 / rho);
        let lam = (xp * ce.sin()).atan2(
            self.d * rho * self.cos_b1 * ce.cos()
                - self.d * self.d * yp * self.sin_b1 * ce.sin(),
        );
        let phi = self.latitude_from_q(q);
        Ok((CENTER_LON_DEG + lam.to_degrees(), phi.to_degrees()))
    }

    /// projects a slice of geographic coordinates, failing on the first
    /// invalid pair.
    pub fn to_planar_all(&self, coords: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, CrsError> {
        coords
            .iter()
            .map(|(lon, lat)| self.to_planar(*lon, *lat))
            .collect()
    }

    /// recovers latitude from the authalic q value by fixed-point iteration
    /// (Snyder eq. 3-16).
    fn latitude_from_q(&self, q: f64) -> f64 {
        if q.abs() >= self.qp {
            return (std::f64::consts::FRAC_PI_2).copysign(q);
        }
        let mut phi = (q / 2.0).clamp(-1.0, 1.0).asin();
        for _ in 0..PHI_MAX_ITERATIONS {
            let sin_phi = phi.sin();
            let es = self.e * sin_phi;
            let denom = 1.0 - self.e2 * sin_phi * sin_phi;
            let delta = (denom * denom / (2.0 * phi.cos()))
                * (q / (1.0 - self.e2) - sin_phi / denom
                    + (1.0 / (2.0 * self.e)) * ((1.0 - es) / (1.0 + es)).ln());
            phi += delta;
            if delta.abs() < PHI_TOLERANCE {
                break;
            }
        }
        phi
    }
}

/// Snyder's authalic q function (eq. 3-12) for a given sin(latitude).
fn q_authalic(sin_phi: f64, e: f64, e2: f64) -> f64 {
    let es = e * sin_phi;
    (1.0 - e2)
        * (sin_phi / (1.0 - e2 * sin_phi * sin_phi)
            - (1.0 / (2.0 * e)) * ((1.0 - es) / (1.0 + es)).ln())
}

#[cfg(test)]
mod tests {
    use super::PlanarTransform;

    #[test]
    fn test_projection_center_maps_to_false_origin() {
        let t = PlanarTransform::new();
        let (x, y) = t.to_planar(10.0, 52.0).unwrap();
        assert!((x - 4_321_000.0).abs() < 1e-6);
        assert!((y - 3_210_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let t = PlanarTransform::new();
        for lon in [-10.0, 0.0, 6.9357, 7.4343, 10.0, 20.0, 30.0] {
            for lat in [35.0, 45.0, 51.0679, 51.3221, 52.0, 60.0, 70.0] {
                let (x, y) = t.to_planar(lon, lat).unwrap();
                let (lon2, lat2) = t.to_geographic(x, y).unwrap();
                assert!(
                    (lon - lon2).abs() < 1e-9 && (lat - lat2).abs() < 1e-9,
                    "round trip failed at ({lon}, {lat}): got ({lon2}, {lat2})"
                );
            }
        }
    }

    #[test]
    fn test_false_origin_inverse_is_center() {
        let t = PlanarTransform::new();
        let (lon, lat) = t.to_geographic(4_321_000.0, 3_210_000.0).unwrap();
        assert!((lon - 10.0).abs() < 1e-9);
        assert!((lat - 52.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_input_is_an_error() {
        let t = PlanarTransform::new();
        assert!(t.to_planar(f64::NAN, 51.0).is_err());
        assert!(t.to_planar(7.0, f64::INFINITY).is_err());
        assert!(t.to_geographic(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_eastward_step_increases_x() {
        let t = PlanarTransform::new();
        let (x1, _) = t.to_planar(7.0, 51.0).unwrap();
        let (x2, _) = t.to_planar(7.1, 51.0).unwrap();
        assert!(x2 > x1);
    }
}
