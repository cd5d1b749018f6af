//! Text formats for north azimuth directions used by traverse and legal description reports.
use crate::{core::math::normalize_degrees, error::CogoError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Display format for a direction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum DirectionFormat {
    /// `45.500000`
    #[default]
    DecimalDegrees,
    /// `045-30-00.00`
    DegreesMinutesSeconds,
    /// `N45-30-00.00E`
    QuadrantBearing,
}

/// Format a north azimuth (decimal degrees) for display.
///
/// # Examples
///
/// ```
/// # use survey_contours::cogo::*;
/// assert_eq!(format_direction(45.5, DirectionFormat::DecimalDegrees), "45.500000");
/// assert_eq!(format_direction(45.5, DirectionFormat::DegreesMinutesSeconds), "045-30-00.00");
/// assert_eq!(format_direction(200.25, DirectionFormat::QuadrantBearing), "S20-15-00.00W");
/// assert_eq!(format_direction(-0.5, DirectionFormat::QuadrantBearing), "N00-30-00.00W");
/// ```
pub fn format_direction(azimuth: f64, format: DirectionFormat) -> String {
    let az = normalize_degrees(azimuth);
    match format {
        DirectionFormat::DecimalDegrees => format!("{:.6}", az),
        DirectionFormat::DegreesMinutesSeconds => {
            let (d, m, s) = to_dms(az);
            // 359-59-59.999 rounds up to a full circle
            let d = if d >= 360 { d - 360 } else { d };
            format!("{:03}-{:02}-{:05.2}", d, m, s)
        }
        DirectionFormat::QuadrantBearing => {
            let (ns, angle, ew) = if az <= 90.0 {
                ('N', az, 'E')
            } else if az <= 180.0 {
                ('S', 180.0 - az, 'E')
            } else if az <= 270.0 {
                ('S', az - 180.0, 'W')
            } else {
                ('N', 360.0 - az, 'W')
            };
            let (d, m, s) = to_dms(angle);
            format!("{}{:02}-{:02}-{:05.2}{}", ns, d, m, s, ew)
        }
    }
}

/// Split decimal degrees into whole degrees, minutes and seconds rounded to hundredths, carrying
/// rounding overflow upward.
fn to_dms(degrees: f64) -> (u32, u32, f64) {
    let hundredths = (degrees * 360_000.0).round() as u64;
    let d = hundredths / 360_000;
    let m = (hundredths % 360_000) / 6_000;
    let s = (hundredths % 6_000) as f64 / 100.0;
    (d as u32, m as u32, s)
}

/// Parse a direction into a north azimuth in decimal degrees `[0, 360)`.
///
/// Accepts decimal degrees (`45.5`), degrees-minutes-seconds separated by `-`, `:`, spaces or the
/// `° ' "` symbols (`045-30-15.5`), and quadrant bearings (`N45-30-15E`, `S 12.5 W`).
///
/// # Examples
///
/// ```
/// # use survey_contours::cogo::*;
/// assert!((parse_direction("45.5").unwrap() - 45.5).abs() < 1e-12);
/// assert!((parse_direction("045-30-00").unwrap() - 45.5).abs() < 1e-12);
/// assert!((parse_direction("S 12.5 W").unwrap() - 192.5).abs() < 1e-12);
/// assert!((parse_direction("n45°30'00\"e").unwrap() - 45.5).abs() < 1e-12);
/// assert!(parse_direction("N95E").is_err());
/// ```
pub fn parse_direction(text: &str) -> Result<f64, CogoError> {
    let err = || CogoError::DirectionParse(text.to_string());
    let trimmed = text.trim().to_ascii_uppercase();
    if trimmed.starts_with('-') {
        return Err(err());
    }

    let first = trimmed.chars().next().ok_or_else(err)?;
    let last = trimmed.chars().last().ok_or_else(err)?;
    if trimmed.len() > 2 && matches!(first, 'N' | 'S') && matches!(last, 'E' | 'W') {
        let inner = &trimmed[1..trimmed.len() - 1];
        let angle = parse_angle(inner).ok_or_else(err)?;
        if angle > 90.0 {
            return Err(err());
        }

        let az = match (first, last) {
            ('N', 'E') => angle,
            ('S', 'E') => 180.0 - angle,
            ('S', 'W') => 180.0 + angle,
            _ => 360.0 - angle,
        };
        return Ok(normalize_degrees(az));
    }

    let az = parse_angle(&trimmed).ok_or_else(err)?;
    if az > 360.0 {
        return Err(err());
    }

    Ok(normalize_degrees(az))
}

/// Parse non negative decimal degrees or degrees-minutes-seconds.
fn parse_angle(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text
        .split(|c: char| matches!(c, '-' | ':' | ' ' | '°' | '\'' | '"'))
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let values = parts
        .iter()
        .map(|p| p.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0))
        .collect::<Option<Vec<f64>>>()?;

    if values.len() == 1 {
        return Some(values[0]);
    }

    if values[0].fract() != 0.0 || values.iter().skip(1).any(|v| *v >= 60.0) {
        return None;
    }

    let minutes = values[1];
    let seconds = values.get(2).copied().unwrap_or(0.0);
    if values.len() == 3 && minutes.fract() != 0.0 {
        return None;
    }

    Some(values[0] + minutes / 60.0 + seconds / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dms_rounding_carries() {
        // 59.999 seconds rounds to the next minute
        let az = 10.0 + 59.0 / 60.0 + 59.999 / 3600.0;
        assert_eq!(
            format_direction(az, DirectionFormat::DegreesMinutesSeconds),
            "011-00-00.00"
        );
    }

    #[test]
    fn quadrant_round_trip() {
        for az in [0.0, 12.25, 90.0, 135.5, 180.0, 222.75, 300.125] {
            let text = format_direction(az, DirectionFormat::QuadrantBearing);
            let parsed = parse_direction(&text).unwrap();
            assert!((parsed - az).abs() < 1e-6, "{} -> {} -> {}", az, text, parsed);
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_direction("").is_err());
        assert!(parse_direction("north").is_err());
        assert!(parse_direction("45-75-00").is_err());
        assert!(parse_direction("-45").is_err());
        assert!(parse_direction("361").is_err());
    }
}
