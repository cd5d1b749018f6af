use super::traits::Real;
use crate::error::ToleranceError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Meters along one degree of arc on the WGS84 equator.
pub const METERS_PER_DEGREE: f64 = 111_319.490_793_273_57;

/// Per-operation tolerance bundle threaded through every planar kernel call.
///
/// Created once per caller operation (usually from the dataset spatial reference) and never
/// mutated; the `with_*` methods return a new value.
///
/// # Examples
///
/// ```
/// # use survey_contours::core::*;
/// # use survey_contours::core::traits::*;
/// // dataset in US survey feet with a 0.003 ft XY tolerance
/// let tol = ToleranceContext::new(0.003, 1200.0 / 3937.0)
///     .unwrap()
///     .with_user_max_offset(0.5);
/// assert!(tol.user_max_offset_meters().fuzzy_eq(0.5));
/// assert!(tol.to_meters(10.0).fuzzy_eq_eps(3.048006, 1e-6));
///
/// // offsets below the 1 mm floor are clamped
/// let tight = tol.with_user_max_offset(0.0);
/// assert!(tight.user_max_offset_meters().fuzzy_eq(0.001));
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ToleranceContext<T = f64> {
    xy_tolerance: T,
    meters_per_unit: T,
    user_max_offset_meters: T,
    max_offset_ceiling_meters: T,
    offset_ratio: T,
    flat_arc_repair: bool,
}

impl<T> ToleranceContext<T>
where
    T: Real,
{
    /// Smallest user max offset accepted (1 mm).
    pub const MIN_USER_OFFSET_METERS: f64 = 0.001;
    /// Default user max offset and absolute offset ceiling (2 m).
    pub const DEFAULT_MAX_OFFSET_METERS: f64 = 2.0;
    /// Default bend-vs-tangent discriminator (chord length over offset).
    pub const DEFAULT_OFFSET_RATIO: f64 = 250.0;

    /// Create a tolerance context for a dataset with the given XY tolerance (dataset units) and
    /// meters per dataset unit.
    pub fn new(xy_tolerance: T, meters_per_unit: T) -> Result<Self, ToleranceError> {
        if !(xy_tolerance > T::zero()) || !is_finite(xy_tolerance) {
            return Err(ToleranceError::XyTolerance(
                xy_tolerance.to_f64().unwrap_or(f64::NAN),
            ));
        }

        if !(meters_per_unit > T::zero()) || !is_finite(meters_per_unit) {
            return Err(ToleranceError::MetersPerUnit(
                meters_per_unit.to_f64().unwrap_or(f64::NAN),
            ));
        }

        Ok(Self {
            xy_tolerance,
            meters_per_unit,
            user_max_offset_meters: T::lit(Self::DEFAULT_MAX_OFFSET_METERS),
            max_offset_ceiling_meters: T::lit(Self::DEFAULT_MAX_OFFSET_METERS),
            offset_ratio: T::lit(Self::DEFAULT_OFFSET_RATIO),
            flat_arc_repair: true,
        })
    }

    /// Tolerance context for geographic (degree based) data: 1 mm expressed in degrees at the
    /// equator and meters per unit set to meters per degree.
    pub fn geographic() -> Self {
        let mpu = T::lit(METERS_PER_DEGREE);
        Self {
            xy_tolerance: T::lit(Self::MIN_USER_OFFSET_METERS) / mpu,
            meters_per_unit: mpu,
            user_max_offset_meters: T::lit(Self::DEFAULT_MAX_OFFSET_METERS),
            max_offset_ceiling_meters: T::lit(Self::DEFAULT_MAX_OFFSET_METERS),
            offset_ratio: T::lit(Self::DEFAULT_OFFSET_RATIO),
            flat_arc_repair: true,
        }
    }

    /// Set the hard ceiling on how far a merge may move the shape (meters). Values below 1 mm are
    /// raised to 1 mm.
    pub fn with_user_max_offset(mut self, meters: T) -> Self {
        let floor = T::lit(Self::MIN_USER_OFFSET_METERS);
        self.user_max_offset_meters = if meters >= floor { meters } else { floor };
        self
    }

    /// Set the absolute offset ceiling (meters) applied on top of the user max offset.
    pub fn with_max_offset_ceiling(mut self, meters: T) -> Self {
        let floor = T::lit(Self::MIN_USER_OFFSET_METERS);
        self.max_offset_ceiling_meters = if meters >= floor { meters } else { floor };
        self
    }

    /// Set the dimensionless chord-over-offset ratio separating bends from tangent noise.
    pub fn with_offset_ratio(mut self, ratio: T) -> Self {
        if ratio > T::zero() {
            self.offset_ratio = ratio;
        }
        self
    }

    /// Enable or disable rebuilding zero length arcs with distinct endpoints as flat arcs.
    pub fn with_flat_arc_repair(mut self, enabled: bool) -> Self {
        self.flat_arc_repair = enabled;
        self
    }

    #[inline]
    pub fn xy_tolerance(&self) -> T {
        self.xy_tolerance
    }

    #[inline]
    pub fn meters_per_unit(&self) -> T {
        self.meters_per_unit
    }

    #[inline]
    pub fn user_max_offset_meters(&self) -> T {
        self.user_max_offset_meters
    }

    #[inline]
    pub fn max_offset_ceiling_meters(&self) -> T {
        self.max_offset_ceiling_meters
    }

    #[inline]
    pub fn offset_ratio(&self) -> T {
        self.offset_ratio
    }

    #[inline]
    pub fn flat_arc_repair(&self) -> bool {
        self.flat_arc_repair
    }

    /// Smaller of the user max offset and the absolute ceiling (meters).
    #[inline]
    pub fn effective_max_offset_meters(&self) -> T {
        num_traits::real::Real::min(self.user_max_offset_meters, self.max_offset_ceiling_meters)
    }

    /// XY tolerance converted to meters.
    #[inline]
    pub fn xy_tolerance_meters(&self) -> T {
        self.xy_tolerance * self.meters_per_unit
    }

    /// Convert a dataset distance to meters.
    #[inline]
    pub fn to_meters(&self, distance: T) -> T {
        distance * self.meters_per_unit
    }

    /// Convert meters to a dataset distance.
    #[inline]
    pub fn from_meters(&self, meters: T) -> T {
        meters / self.meters_per_unit
    }
}

fn is_finite<T: Real>(value: T) -> bool {
    value.to_f64().is_some_and(f64::is_finite)
}

impl<T> Default for ToleranceContext<T>
where
    T: Real,
{
    /// 1 mm XY tolerance on a metric dataset.
    #[inline]
    fn default() -> Self {
        Self {
            xy_tolerance: T::lit(Self::MIN_USER_OFFSET_METERS),
            meters_per_unit: T::one(),
            user_max_offset_meters: T::lit(Self::DEFAULT_MAX_OFFSET_METERS),
            max_offset_ceiling_meters: T::lit(Self::DEFAULT_MAX_OFFSET_METERS),
            offset_ratio: T::lit(Self::DEFAULT_OFFSET_RATIO),
            flat_arc_repair: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;

    #[test]
    fn rejects_non_positive_inputs() {
        assert!(ToleranceContext::<f64>::new(0.0, 1.0).is_err());
        assert!(ToleranceContext::<f64>::new(0.001, -1.0).is_err());
        assert!(ToleranceContext::<f64>::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn geographic_tolerance_is_one_millimeter() {
        let tol = ToleranceContext::<f64>::geographic();
        assert!(tol.xy_tolerance_meters().fuzzy_eq(0.001));
        assert!(tol.xy_tolerance() < 1e-8);
    }

    #[test]
    fn effective_offset_is_smaller_of_user_and_ceiling() {
        let tol = ToleranceContext::<f64>::default().with_user_max_offset(5.0);
        assert!(tol.effective_max_offset_meters().fuzzy_eq(2.0));
        let tol = tol.with_user_max_offset(0.25);
        assert!(tol.effective_max_offset_meters().fuzzy_eq(0.25));
    }
}
