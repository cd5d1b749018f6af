use super::{CogoAttributes, CourseState};
use crate::{core::math::Vector2, error::CogoError};
use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One traverse course: a line or circular arc described by its chord.
///
/// `direction` is the chord's north azimuth in decimal degrees and `distance` its length. Arc
/// courses also carry a signed `radius` (negative curves counter clockwise) and `arc_length`.
/// A reversed course is travelled against its stored direction.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Course {
    pub direction: f64,
    pub distance: f64,
    pub radius: Option<f64>,
    pub arc_length: Option<f64>,
    pub is_major: bool,
    pub is_reversed: bool,
}

impl Course {
    #[inline]
    pub fn line(direction: f64, distance: f64) -> Self {
        Self {
            direction,
            distance,
            radius: None,
            arc_length: None,
            is_major: false,
            is_reversed: false,
        }
    }

    /// Arc course from its chord direction and length, signed radius and arc length.
    #[inline]
    pub fn arc(direction: f64, chord: f64, radius: f64, arc_length: f64, is_major: bool) -> Self {
        Self {
            direction,
            distance: chord,
            radius: Some(radius),
            arc_length: Some(arc_length),
            is_major,
            is_reversed: false,
        }
    }

    #[inline]
    pub fn with_reversed(mut self, is_reversed: bool) -> Self {
        self.is_reversed = is_reversed;
        self
    }

    /// Course from complete COGO attributes.
    ///
    /// Arc chords are computed from the radius and arc length (`2|r|·sin(L / 2|r|)`) and the
    /// course is major when the arc length exceeds half the circumference.
    ///
    /// # Examples
    ///
    /// ```
    /// # use survey_contours::cogo::*;
    /// let attrs = CogoAttributes::arc(0.0, -10.0, 10.0 * std::f64::consts::PI);
    /// let course = Course::from_attributes(&attrs, false).unwrap();
    /// assert!((course.distance - 20.0).abs() < 1e-9);
    /// assert!(!course.is_major);
    ///
    /// let partial = CogoAttributes { distance: Some(5.0), ..Default::default() };
    /// assert!(Course::from_attributes(&partial, false).is_err());
    /// ```
    pub fn from_attributes(attrs: &CogoAttributes, is_reversed: bool) -> Result<Self, CogoError> {
        let course = match attrs.classify() {
            CourseState::Line {
                direction,
                distance,
            } => Self::line(direction, distance),
            CourseState::CircularArc { radius, arc_length } => {
                let direction = attrs.direction.ok_or(CogoError::IncompleteCourse)?;
                let r = radius.abs();
                if !(r > 0.0 && r.is_finite()) {
                    return Err(CogoError::InvalidValue("radius"));
                }

                let chord = 2.0 * r * (arc_length / (2.0 * r)).sin();
                Self::arc(direction, chord, radius, arc_length, arc_length > PI * r)
            }
            CourseState::Conflicting => return Err(CogoError::ConflictingAttributes),
            CourseState::Empty => return Err(CogoError::NoAttributes),
            CourseState::PartialLine(_) | CourseState::PartialArc(_) => {
                return Err(CogoError::IncompleteCourse)
            }
        };

        Ok(course.with_reversed(is_reversed))
    }

    #[inline]
    pub fn is_arc(&self) -> bool {
        self.radius.is_some_and(|r| r != 0.0)
    }

    /// Direction actually travelled (reversed courses run 180 degrees from the stored direction).
    #[inline]
    pub fn travel_direction(&self) -> f64 {
        if self.is_reversed {
            self.direction + 180.0
        } else {
            self.direction
        }
    }

    /// Chord vector travelled by the course (x east, y north).
    ///
    /// # Examples
    ///
    /// ```
    /// # use survey_contours::cogo::*;
    /// # use survey_contours::core::math::*;
    /// let v = Course::line(90.0, 10.0).with_reversed(true).traverse_vector();
    /// assert!(v.fuzzy_eq_eps(Vector2::new(-10.0, 0.0), 1e-9));
    /// ```
    #[inline]
    pub fn traverse_vector(&self) -> Vector2 {
        let (sin, cos) = self.travel_direction().to_radians().sin_cos();
        Vector2::new(self.distance * sin, self.distance * cos)
    }

    /// Signed area between the chord and the arc (zero for lines).
    ///
    /// Positive for a counter clockwise arc (negative radius) travelled forward, matching the sign
    /// of a counter clockwise shoelace area. Adding it to the shoelace area of the chord polygon
    /// gives the area bounded by the arcs.
    pub fn segment_area(&self) -> f64 {
        let radius = match self.radius {
            Some(r) if r != 0.0 => r,
            _ => return 0.0,
        };

        let r = radius.abs();
        let half_angle = (self.distance / (2.0 * r)).min(1.0).asin();
        let mut theta = 2.0 * half_angle;
        if self.is_major {
            theta = 2.0 * PI - theta;
        }

        let area = 0.5 * r * r * (theta - theta.sin());
        let counter_clockwise = (radius < 0.0) != self.is_reversed;
        if counter_clockwise {
            area
        } else {
            -area
        }
    }
}
