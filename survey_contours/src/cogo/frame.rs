use super::{geodesic_direct, geodesic_inverse, Ellipsoid, LocalFrame};
use crate::{
    core::{
        math::{azimuth_unit_vector, north_azimuth, normalize_degrees, Vector2},
        METERS_PER_DEGREE,
    },
    error::CogoError,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coordinate system of the dataset holding the geometry.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DatasetFrame {
    /// Planar coordinates, with the size of one dataset unit in meters.
    Projected { meters_per_unit: f64 },
    /// Longitude (x) and latitude (y) in decimal degrees on the given ellipsoid.
    Geographic(Ellipsoid),
}

/// Map frame settings used to convert between geometry and COGO attributes.
///
/// Attribute values are ground values: `ground distance = grid distance / scale_factor` and
/// `ground direction = grid direction - direction_offset`.
///
/// # Examples
///
/// ```
/// # use survey_contours::cogo::*;
/// let frame = CogoFrame::projected(0.3048)
///     .unwrap()
///     .with_scale_factor(0.9996)
///     .unwrap()
///     .with_direction_offset(-1.5);
/// assert!((frame.ground_to_grid_direction(0.0) - 358.5).abs() < 1e-12);
/// assert!((frame.grid_to_ground_distance(99.96) - 100.0).abs() < 1e-9);
/// assert!(!frame.is_geodetic());
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CogoFrame {
    dataset: DatasetFrame,
    grid_azimuth: bool,
    scale_factor: f64,
    direction_offset: f64,
}

impl CogoFrame {
    /// Frame for a projected dataset.
    pub fn projected(meters_per_unit: f64) -> Result<Self, CogoError> {
        if !(meters_per_unit > 0.0 && meters_per_unit.is_finite()) {
            return Err(CogoError::InvalidValue("meters_per_unit"));
        }

        Ok(Self::with_dataset(DatasetFrame::Projected { meters_per_unit }))
    }

    /// Frame for a geographic dataset on `ellipsoid`.
    pub fn geographic(ellipsoid: Ellipsoid) -> Self {
        Self::with_dataset(DatasetFrame::Geographic(ellipsoid))
    }

    fn with_dataset(dataset: DatasetFrame) -> Self {
        Self {
            dataset,
            grid_azimuth: false,
            scale_factor: 1.0,
            direction_offset: 0.0,
        }
    }

    /// Treat directions as grid azimuths even on geographic data (planar trigonometry in degree
    /// space instead of geodesics).
    pub fn with_grid_azimuth(mut self, grid_azimuth: bool) -> Self {
        self.grid_azimuth = grid_azimuth;
        self
    }

    /// Set the ground to grid combined scale factor.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Result<Self, CogoError> {
        if !(scale_factor > 0.0 && scale_factor.is_finite()) {
            return Err(CogoError::InvalidValue("scale_factor"));
        }

        self.scale_factor = scale_factor;
        Ok(self)
    }

    /// Set the rotation (decimal degrees) from ground directions to grid directions.
    pub fn with_direction_offset(mut self, degrees: f64) -> Self {
        self.direction_offset = degrees;
        self
    }

    #[inline]
    pub fn dataset(&self) -> DatasetFrame {
        self.dataset
    }

    #[inline]
    pub fn grid_azimuth(&self) -> bool {
        self.grid_azimuth
    }

    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    #[inline]
    pub fn direction_offset(&self) -> f64 {
        self.direction_offset
    }

    /// Ellipsoid to run geodesic computations on, `None` when planar trigonometry applies.
    #[inline]
    pub fn geodetic_ellipsoid(&self) -> Option<Ellipsoid> {
        match self.dataset {
            DatasetFrame::Geographic(ellipsoid) if !self.grid_azimuth => Some(ellipsoid),
            _ => None,
        }
    }

    #[inline]
    pub fn is_geodetic(&self) -> bool {
        self.geodetic_ellipsoid().is_some()
    }

    /// Meters per dataset unit for planar computations (meters per degree at the equator for
    /// geographic data).
    #[inline]
    pub fn planar_meters_per_unit(&self) -> f64 {
        match self.dataset {
            DatasetFrame::Projected { meters_per_unit } => meters_per_unit,
            DatasetFrame::Geographic(_) => METERS_PER_DEGREE,
        }
    }

    #[inline]
    pub fn grid_to_ground_distance(&self, distance: f64) -> f64 {
        distance / self.scale_factor
    }

    #[inline]
    pub fn ground_to_grid_distance(&self, distance: f64) -> f64 {
        distance * self.scale_factor
    }

    #[inline]
    pub fn grid_to_ground_direction(&self, direction: f64) -> f64 {
        normalize_degrees(direction - self.direction_offset)
    }

    #[inline]
    pub fn ground_to_grid_direction(&self, direction: f64) -> f64 {
        normalize_degrees(direction + self.direction_offset)
    }

    /// Grid distance (meters) and grid north azimuth (degrees) from `p0` to `p1`, geodesic when
    /// the frame [is_geodetic](Self::is_geodetic).
    pub fn measure(&self, p0: Vector2, p1: Vector2) -> (f64, f64) {
        match self.geodetic_ellipsoid() {
            Some(ellipsoid) => {
                let r = geodesic_inverse(&ellipsoid, p0, p1);
                (r.distance, r.azimuth)
            }
            None => (
                p0.distance_to(p1) * self.planar_meters_per_unit(),
                north_azimuth(p0, p1).to_degrees(),
            ),
        }
    }

    /// Point `distance` grid meters from `p0` along grid azimuth `direction` (degrees).
    pub fn travel(&self, p0: Vector2, direction: f64, distance: f64) -> Vector2 {
        match self.geodetic_ellipsoid() {
            Some(ellipsoid) => geodesic_direct(&ellipsoid, p0, direction, distance),
            None => {
                let step = distance / self.planar_meters_per_unit();
                p0 + azimuth_unit_vector(direction.to_radians()).scale(step)
            }
        }
    }

    /// Planar meter space anchored at `origin`, used to build circular arcs.
    pub fn metric_space(&self, origin: Vector2) -> MetricSpace {
        match self.geodetic_ellipsoid() {
            Some(ellipsoid) => MetricSpace::Local(LocalFrame::new(ellipsoid, origin)),
            None => MetricSpace::Scaled {
                origin,
                meters_per_unit: self.planar_meters_per_unit(),
            },
        }
    }
}

impl Default for CogoFrame {
    /// Metric projected dataset with no scale factor or rotation.
    #[inline]
    fn default() -> Self {
        Self::with_dataset(DatasetFrame::Projected {
            meters_per_unit: 1.0,
        })
    }
}

/// Planar meter coordinates around an origin, see [CogoFrame::metric_space].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MetricSpace {
    /// Dataset coordinates shifted to the origin and scaled to meters.
    Scaled { origin: Vector2, meters_per_unit: f64 },
    /// Geographic coordinates through a [LocalFrame].
    Local(LocalFrame),
}

impl MetricSpace {
    #[inline]
    pub fn forward(&self, p: Vector2) -> Vector2 {
        match self {
            MetricSpace::Scaled {
                origin,
                meters_per_unit,
            } => (p - *origin).scale(*meters_per_unit),
            MetricSpace::Local(frame) => frame.forward(p),
        }
    }

    #[inline]
    pub fn inverse(&self, p: Vector2) -> Vector2 {
        match self {
            MetricSpace::Scaled {
                origin,
                meters_per_unit,
            } => *origin + p.scale(1.0 / meters_per_unit),
            MetricSpace::Local(frame) => frame.inverse(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::vec2;

    #[test]
    fn planar_measure_and_travel_agree() {
        let frame = CogoFrame::projected(0.5).unwrap();
        let start = vec2(10.0, 20.0);
        let end = frame.travel(start, 135.0, 50.0);
        let (distance, direction) = frame.measure(start, end);
        assert!((distance - 50.0).abs() < 1e-9);
        assert!((direction - 135.0).abs() < 1e-9);
        // 50 m is 100 dataset units
        assert!((start.distance_to(end) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn grid_azimuth_disables_geodesics() {
        let frame = CogoFrame::geographic(Ellipsoid::WGS84);
        assert!(frame.is_geodetic());
        assert!(!frame.with_grid_azimuth(true).is_geodetic());
        assert!(CogoFrame::projected(0.0).is_err());
        assert!(CogoFrame::default().with_scale_factor(-1.0).is_err());
    }

    #[test]
    fn metric_space_round_trip() {
        let p = vec2(3.0, 4.0);
        let space = CogoFrame::projected(2.0)
            .unwrap()
            .metric_space(vec2(1.0, 1.0));
        assert!(space.forward(p).fuzzy_eq(vec2(4.0, 6.0)));
        assert!(space.inverse(space.forward(p)).fuzzy_eq(p));
    }
}
