use crate::core::math::{normalize_degrees, Vector2};
use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference ellipsoid given by its semi-major axis (meters) and flattening.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ellipsoid {
    pub semi_major: f64,
    pub flattening: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major: 6_378_137.0,
        flattening: 1.0 / 298.257_223_563,
    };

    pub const GRS80: Ellipsoid = Ellipsoid {
        semi_major: 6_378_137.0,
        flattening: 1.0 / 298.257_222_101,
    };

    #[inline]
    pub fn semi_minor(&self) -> f64 {
        self.semi_major * (1.0 - self.flattening)
    }

    /// First eccentricity squared.
    #[inline]
    pub fn e2(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Mean radius `(2a + b) / 3` used by the spherical fallback.
    #[inline]
    pub fn mean_radius(&self) -> f64 {
        (2.0 * self.semi_major + self.semi_minor()) / 3.0
    }

    /// Radius of curvature in the prime vertical at latitude `lat` (radians).
    #[inline]
    pub fn prime_vertical_radius(&self, lat: f64) -> f64 {
        let s = lat.sin();
        self.semi_major / (1.0 - self.e2() * s * s).sqrt()
    }

    /// Meridional radius of curvature at latitude `lat` (radians).
    #[inline]
    pub fn meridional_radius(&self, lat: f64) -> f64 {
        let s = lat.sin();
        let w = 1.0 - self.e2() * s * s;
        self.semi_major * (1.0 - self.e2()) / (w * w.sqrt())
    }

    /// Length of the meridian arc from the equator to latitude `lat` (radians).
    pub fn meridian_arc(&self, lat: f64) -> f64 {
        let e2 = self.e2();
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        self.semi_major
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
    }
}

impl Default for Ellipsoid {
    #[inline]
    fn default() -> Self {
        Ellipsoid::WGS84
    }
}

/// Result of [geodesic_inverse].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeodesicInverse {
    /// Ellipsoidal distance in meters.
    pub distance: f64,
    /// Forward azimuth at the first point, decimal degrees `[0, 360)`.
    pub azimuth: f64,
    /// Azimuth of travel at the second point, decimal degrees `[0, 360)`.
    pub final_azimuth: f64,
}

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

/// Distance and azimuths between two geographic points (x = longitude, y = latitude, degrees).
///
/// Vincenty's inverse formula; falls back to a great circle on the mean sphere for nearly
/// antipodal points where the iteration does not converge.
///
/// # Examples
///
/// ```
/// # use survey_contours::cogo::*;
/// # use survey_contours::core::math::*;
/// // one degree of longitude along the equator
/// let r = geodesic_inverse(&Ellipsoid::WGS84, Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0));
/// assert!((r.distance - 111_319.491).abs() < 1e-3);
/// assert!((r.azimuth - 90.0).abs() < 1e-9);
/// ```
pub fn geodesic_inverse(ellipsoid: &Ellipsoid, p1: Vector2, p2: Vector2) -> GeodesicInverse {
    let a = ellipsoid.semi_major;
    let b = ellipsoid.semi_minor();
    let f = ellipsoid.flattening;

    let l = (p2.x - p1.x).to_radians();
    let u1 = ((1.0 - f) * p1.y.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * p2.y.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // coincident points
            return GeodesicInverse {
                distance: 0.0,
                azimuth: 0.0,
                final_azimuth: 0.0,
            };
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            // equatorial line
            0.0
        };

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let prev = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - prev).abs() < CONVERGENCE {
            let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = sigma_correction(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
            let (sin_lambda, cos_lambda) = lambda.sin_cos();
            let az1 = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
            let az2 = (cos_u1 * sin_lambda).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda);
            return GeodesicInverse {
                distance: b * big_a * (sigma - delta_sigma),
                azimuth: normalize_degrees(az1.to_degrees()),
                final_azimuth: normalize_degrees(az2.to_degrees()),
            };
        }
    }

    log::debug!("vincenty inverse did not converge, using spherical fallback");
    spherical_inverse(ellipsoid.mean_radius(), p1, p2)
}

/// Great circle distance and azimuths on a sphere of `radius` meters.
pub fn spherical_inverse(radius: f64, p1: Vector2, p2: Vector2) -> GeodesicInverse {
    let lat1 = p1.y.to_radians();
    let lat2 = p2.y.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (p2.x - p1.x).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let distance = 2.0 * radius * h.sqrt().min(1.0).asin();

    let bearing = |lat_a: f64, lat_b: f64, dlon: f64| {
        let y = dlon.sin() * lat_b.cos();
        let x = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * dlon.cos();
        normalize_degrees(y.atan2(x).to_degrees())
    };

    GeodesicInverse {
        distance,
        azimuth: bearing(lat1, lat2, dlon),
        final_azimuth: normalize_degrees(bearing(lat2, lat1, -dlon) + 180.0),
    }
}

/// Point reached travelling `distance` meters from `p1` (longitude, latitude degrees) along the
/// geodesic with initial azimuth `azimuth` (decimal degrees). Vincenty's direct formula.
///
/// # Examples
///
/// ```
/// # use survey_contours::cogo::*;
/// # use survey_contours::core::math::*;
/// let start = Vector2::new(-122.0, 45.0);
/// let end = geodesic_direct(&Ellipsoid::GRS80, start, 30.0, 250.0);
/// let back = geodesic_inverse(&Ellipsoid::GRS80, start, end);
/// assert!((back.distance - 250.0).abs() < 1e-6);
/// assert!((back.azimuth - 30.0).abs() < 1e-7);
/// ```
pub fn geodesic_direct(ellipsoid: &Ellipsoid, p1: Vector2, azimuth: f64, distance: f64) -> Vector2 {
    let a = ellipsoid.semi_major;
    let b = ellipsoid.semi_minor();
    let f = ellipsoid.flattening;

    let (sin_alpha1, cos_alpha1) = azimuth.to_radians().sin_cos();
    let tan_u1 = (1.0 - f) * p1.y.to_radians().tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;
    let sigma1 = tan_u1.atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let sigma0 = distance / (b * big_a);
    let mut sigma = sigma0;
    let mut iterations = 0;
    let cos_2sigma_m = loop {
        let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let next = sigma0 + sigma_correction(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
        let done = (next - sigma).abs() < CONVERGENCE || iterations >= MAX_ITERATIONS;
        sigma = next;
        iterations += 1;
        if done {
            break cos_2sigma_m;
        }
    };

    let (sin_sigma, cos_sigma) = sigma.sin_cos();
    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
    let lambda =
        (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

    Vector2::new(p1.x + l.to_degrees(), lat2.to_degrees())
}

#[inline]
fn sigma_correction(big_b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    let c2 = cos_2sigma_m * cos_2sigma_m;
    big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * c2)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * c2)))
}

/// Local planar frame (meters) centered on a geographic origin.
///
/// `x` is the parallel arc length from the origin meridian and `y` the meridian arc length from
/// the origin parallel, so both axes are true east and north at the origin. Used to build circular
/// arcs for geographic data, where arcs in degrees are not meaningful.
///
/// # Examples
///
/// ```
/// # use survey_contours::cogo::*;
/// # use survey_contours::core::math::*;
/// let frame = LocalFrame::new(Ellipsoid::WGS84, Vector2::new(10.0, 50.0));
/// let p = Vector2::new(10.001, 50.002);
/// let local = frame.forward(p);
/// assert!(local.x > 0.0 && local.y > 0.0);
/// let back = frame.inverse(local);
/// assert!((back.x - p.x).abs() < 1e-11 && (back.y - p.y).abs() < 1e-11);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LocalFrame {
    ellipsoid: Ellipsoid,
    origin: Vector2,
    origin_arc: f64,
}

impl LocalFrame {
    pub fn new(ellipsoid: Ellipsoid, origin: Vector2) -> Self {
        Self {
            ellipsoid,
            origin,
            origin_arc: ellipsoid.meridian_arc(origin.y.to_radians()),
        }
    }

    #[inline]
    pub fn origin(&self) -> Vector2 {
        self.origin
    }

    /// Geographic (longitude, latitude degrees) to local meters.
    pub fn forward(&self, p: Vector2) -> Vector2 {
        let lat = p.y.to_radians();
        let dlon = (p.x - self.origin.x).to_radians();
        let x = dlon * self.ellipsoid.prime_vertical_radius(lat) * lat.cos();
        let y = self.ellipsoid.meridian_arc(lat) - self.origin_arc;
        Vector2::new(x, y)
    }

    /// Local meters back to geographic (longitude, latitude degrees).
    pub fn inverse(&self, p: Vector2) -> Vector2 {
        let target = p.y + self.origin_arc;
        let mut lat = self.origin.y.to_radians() + p.y / self.ellipsoid.meridional_radius(0.0);
        for _ in 0..MAX_ITERATIONS {
            let step = (self.ellipsoid.meridian_arc(lat) - target)
                / self.ellipsoid.meridional_radius(lat);
            lat -= step;
            if step.abs() < CONVERGENCE {
                break;
            }
        }

        lat = lat.clamp(-PI / 2.0, PI / 2.0);
        let parallel_radius = self.ellipsoid.prime_vertical_radius(lat) * lat.cos();
        let dlon = if parallel_radius > 0.0 {
            p.x / parallel_radius
        } else {
            0.0
        };

        Vector2::new(self.origin.x + dlon.to_degrees(), lat.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meridian_arc_quarter() {
        // equator to pole on WGS84
        let q = Ellipsoid::WGS84.meridian_arc(PI / 2.0);
        assert!((q - 10_001_965.729).abs() < 0.01);
    }

    #[test]
    fn inverse_matches_known_line() {
        // Flinders Peak to Buninyong (Vincenty 1975 test line on GRS80 era ellipsoid)
        let p1 = Vector2::new(144.424_867_888_9, -37.951_033_416_7);
        let p2 = Vector2::new(143.926_495_527_8, -37.652_821_138_9);
        let r = geodesic_inverse(&Ellipsoid::GRS80, p1, p2);
        assert!((r.distance - 54_972.271).abs() < 0.01);
        assert!((r.azimuth - 306.868_159).abs() < 1e-5);
    }

    #[test]
    fn spherical_fallback_for_antipodes() {
        let r = geodesic_inverse(&Ellipsoid::WGS84, Vector2::new(0.0, 0.0), Vector2::new(180.0, 0.0));
        assert!(r.distance > 19_900_000.0 && r.distance < 20_100_000.0);
    }
}
