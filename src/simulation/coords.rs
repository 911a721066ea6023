//! Cartesian <-> spherical conversion and angular distance on the sphere
//!
//! The pole axis is the y axis: latitude 0 sits at `(0, -r, 0)` and
//! latitude π at `(0, r, 0)`. Longitude is measured from +x towards +z.
//! At the poles longitude is undefined; `atan2(0, 0)` yields 0 there.

use std::f64::consts::PI;

use super::states::NVec3;

/// A point in spherical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCoords {
    pub radius: f64,    // rho
    pub latitude: f64,  // theta, 0..=π from the -y pole
    pub longitude: f64, // phi, -π..=π
}

impl SphereCoords {
    pub fn new(radius: f64, latitude: f64, longitude: f64) -> Self {
        Self { radius, latitude, longitude }
    }

    /// Convert a Cartesian point into spherical coordinates
    pub fn from_cartesian(p: &NVec3) -> Self {
        let horizontal = (p.x * p.x + p.z * p.z).sqrt();
        Self {
            radius: p.norm(),
            latitude: horizontal.atan2(-p.y),
            longitude: p.z.atan2(p.x),
        }
    }

    /// Convert back into a Cartesian point
    pub fn to_cartesian(&self) -> NVec3 {
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        let (sin_long, cos_long) = self.longitude.sin_cos();
        NVec3::new(
            self.radius * sin_lat * cos_long,
            -self.radius * cos_lat,
            self.radius * sin_lat * sin_long,
        )
    }

    pub fn latitude_degrees(&self) -> f64 {
        self.latitude.to_degrees()
    }

    pub fn longitude_degrees(&self) -> f64 {
        self.longitude.to_degrees()
    }

    /// Angle between this point and `other`, seen from the sphere centre
    pub fn angle_to(&self, other: &NVec3) -> f64 {
        angle_between(&self.to_cartesian(), other, self.radius)
    }
}

/// Angular separation of `a` and `b` on a sphere of `radius`
///
/// Law of cosines on the chord length. The argument is clamped because
/// rounding can push near-antipodal chords slightly past the diameter,
/// which would make `acos` return NaN.
pub fn angle_between(a: &NVec3, b: &NVec3, radius: f64) -> f64 {
    let dist2 = (b - a).norm_squared();
    let ratio = (dist2 / (2.0 * radius * radius)).clamp(0.0, 2.0);
    (1.0 - ratio).acos()
}

/// Wrap an absolute longitude difference onto the shorter path
pub fn shorter_longitude(diff: f64) -> f64 {
    if diff > PI {
        2.0 * PI - diff
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn round_trip_off_pole() {
        let points = [
            NVec3::new(0.3, -0.2, 0.9),
            NVec3::new(-1.5, 0.7, 0.1),
            NVec3::new(0.0, 0.4, -2.0),
            NVec3::new(-0.01, -0.99, -0.05),
        ];
        for p in points {
            let back = SphereCoords::from_cartesian(&p).to_cartesian();
            assert_abs_diff_eq!((back - p).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn poles_map_to_latitude_extremes() {
        let south = SphereCoords::from_cartesian(&NVec3::new(0.0, -2.0, 0.0));
        assert_abs_diff_eq!(south.latitude, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(south.longitude, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(south.radius, 2.0, epsilon = 1e-15);

        let north = SphereCoords::from_cartesian(&NVec3::new(0.0, 2.0, 0.0));
        assert_abs_diff_eq!(north.latitude, PI, epsilon = 1e-15);
    }

    #[test]
    fn antipodal_angle_is_not_nan() {
        let a = NVec3::new(0.0, 0.0, 1.0);
        // slightly longer than the diameter
        let b = NVec3::new(0.0, 0.0, -1.0 - 1e-12);
        let angle = angle_between(&a, &b, 1.0);
        assert!(angle.is_finite());
        assert_abs_diff_eq!(angle, PI, epsilon = 1e-6);
    }

    #[test]
    fn quarter_turn() {
        let s = SphereCoords::new(3.0, PI / 2.0, 0.0);
        let other = SphereCoords::new(3.0, PI / 2.0, PI / 2.0).to_cartesian();
        assert_abs_diff_eq!(s.angle_to(&other), PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn coincident_points_have_zero_angle() {
        let p = NVec3::new(0.2, 0.3, 0.4);
        assert_eq!(angle_between(&p, &p, p.norm()), 0.0);
    }

    #[test]
    fn longitude_wrap() {
        assert_abs_diff_eq!(shorter_longitude(1.5 * PI), 0.5 * PI, epsilon = 1e-15);
        assert_eq!(shorter_longitude(0.25), 0.25);
    }
}
