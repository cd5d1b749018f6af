#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stored COGO attribute values of one course, any of which may be absent.
///
/// Direction is a north azimuth in decimal degrees, lengths are ground meters, and a negative
/// radius curves counter clockwise.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct CogoAttributes {
    pub direction: Option<f64>,
    pub distance: Option<f64>,
    pub radius: Option<f64>,
    pub arc_length: Option<f64>,
}

impl CogoAttributes {
    #[inline]
    pub fn line(direction: f64, distance: f64) -> Self {
        Self {
            direction: Some(direction),
            distance: Some(distance),
            radius: None,
            arc_length: None,
        }
    }

    #[inline]
    pub fn arc(direction: f64, radius: f64, arc_length: f64) -> Self {
        Self {
            direction: Some(direction),
            distance: None,
            radius: Some(radius),
            arc_length: Some(arc_length),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Sort the attribute combination into one of the mutually exclusive [CourseState]s.
    ///
    /// # Examples
    ///
    /// ```
    /// # use survey_contours::cogo::*;
    /// let attrs = CogoAttributes::line(45.0, 100.0);
    /// assert_eq!(attrs.classify(), CourseState::Line { direction: 45.0, distance: 100.0 });
    ///
    /// let attrs = CogoAttributes { radius: Some(-50.0), ..Default::default() };
    /// assert_eq!(attrs.classify(), CourseState::PartialArc(PartialArc::RadiusOnly(-50.0)));
    ///
    /// // a distance never combines with curve values
    /// let attrs = CogoAttributes { distance: Some(10.0), arc_length: Some(12.0), ..Default::default() };
    /// assert_eq!(attrs.classify(), CourseState::Conflicting);
    /// ```
    pub fn classify(&self) -> CourseState {
        match (self.direction, self.distance, self.radius, self.arc_length) {
            (_, Some(_), Some(_), _) | (_, Some(_), _, Some(_)) => CourseState::Conflicting,
            (_, None, Some(radius), Some(arc_length)) => {
                CourseState::CircularArc { radius, arc_length }
            }
            (_, None, None, Some(arc_length)) => {
                CourseState::PartialArc(PartialArc::ArcLengthOnly(arc_length))
            }
            (_, None, Some(radius), None) => {
                CourseState::PartialArc(PartialArc::RadiusOnly(radius))
            }
            (Some(direction), Some(distance), None, None) => CourseState::Line {
                direction,
                distance,
            },
            (None, Some(distance), None, None) => {
                CourseState::PartialLine(PartialLine::DistanceOnly(distance))
            }
            (Some(direction), None, None, None) => {
                CourseState::PartialLine(PartialLine::DirectionOnly(direction))
            }
            (None, None, None, None) => CourseState::Empty,
        }
    }
}

/// Which values of a course are usable for rebuilding its geometry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CourseState {
    /// Full direction and distance.
    Line { direction: f64, distance: f64 },
    PartialLine(PartialLine),
    /// Full radius and arc length (the chord comes from the existing geometry).
    CircularArc { radius: f64, arc_length: f64 },
    PartialArc(PartialArc),
    /// Distance combined with radius or arc length.
    Conflicting,
    Empty,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PartialLine {
    DistanceOnly(f64),
    DirectionOnly(f64),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PartialArc {
    ArcLengthOnly(f64),
    RadiusOnly(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_direction_is_optional() {
        let attrs = CogoAttributes {
            radius: Some(120.0),
            arc_length: Some(30.0),
            ..Default::default()
        };
        assert_eq!(
            attrs.classify(),
            CourseState::CircularArc {
                radius: 120.0,
                arc_length: 30.0
            }
        );
        assert_eq!(CogoAttributes::default().classify(), CourseState::Empty);
        assert!(CogoAttributes::default().is_empty());
    }

    #[test]
    fn partial_lines() {
        let attrs = CogoAttributes {
            direction: Some(10.0),
            ..Default::default()
        };
        assert_eq!(
            attrs.classify(),
            CourseState::PartialLine(PartialLine::DirectionOnly(10.0))
        );
        let attrs = CogoAttributes {
            distance: Some(3.5),
            ..Default::default()
        };
        assert_eq!(
            attrs.classify(),
            CourseState::PartialLine(PartialLine::DistanceOnly(3.5))
        );
    }
}
