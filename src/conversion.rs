use serde::Serialize;

use crate::constants::{Degree, Hour, DEGREES_PER_HOUR};

/// Right ascension hours → degrees.
#[inline]
pub fn hours_to_degrees(hours: Hour) -> Degree {
    hours * DEGREES_PER_HOUR
}

/// Right ascension degrees → hours.
#[inline]
pub fn degrees_to_hours(degrees: Degree) -> Hour {
    degrees / DEGREES_PER_HOUR
}

/// Equatorial position of a catalog entry, with right ascension kept in both units.
///
/// The two right ascension fields are always derived from one another, so a `SkyPosition`
/// can only be built through [`SkyPosition::from_hours`] or [`SkyPosition::from_degrees`],
/// depending on the unit the source catalog uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyPosition {
    ra_hours: Hour,
    ra_degrees: Degree,
    dec_degrees: Degree,
}

impl SkyPosition {
    /// Build a position from a right ascension in hours.
    pub fn from_hours(ra_hours: Hour, dec_degrees: Degree) -> Self {
        SkyPosition {
            ra_hours,
            ra_degrees: hours_to_degrees(ra_hours),
            dec_degrees,
        }
    }

    /// Build a position from a right ascension in degrees.
    pub fn from_degrees(ra_degrees: Degree, dec_degrees: Degree) -> Self {
        SkyPosition {
            ra_hours: degrees_to_hours(ra_degrees),
            ra_degrees,
            dec_degrees,
        }
    }

    pub fn ra_hours(&self) -> Hour {
        self.ra_hours
    }

    pub fn ra_degrees(&self) -> Degree {
        self.ra_degrees
    }

    pub fn dec_degrees(&self) -> Degree {
        self.dec_degrees
    }
}

/// Parse a right ascension string to degrees
///
/// Arguments
/// ---------
/// * `ra`: a string representing the right ascension in the format `HH MM SS.SS`
///
/// Returns
/// -------
/// * `Option<Degree>`: the right ascension in degrees, or `None` if the input format is invalid.
pub(crate) fn parse_ra_to_deg(ra: &str) -> Option<Degree> {
    let parts: Vec<&str> = ra.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }

    let h: f64 = parts[0].parse().ok()?;
    let m: f64 = parts[1].parse().ok()?;
    let s: f64 = parts[2].parse().ok()?;

    Some(hours_to_degrees(h + m / 60.0 + s / 3600.0))
}

/// Parse a declination string to degrees
///
/// Arguments
/// ---------
/// * `dec`: a string representing the declination in the format `±DD MM SS.SS`
///
/// Returns
/// -------
/// * `Option<Degree>`: the declination in degrees, or `None` if the input format is invalid.
pub(crate) fn parse_dec_to_deg(dec: &str) -> Option<Degree> {
    let parts: Vec<&str> = dec.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }

    // "-00 30 00" must stay negative, so the sign is read from the text, not the value
    let sign = if parts[0].starts_with('-') { -1.0 } else { 1.0 };
    let d: f64 = parts[0].trim_start_matches(&['-', '+'][..]).parse().ok()?;
    let m: f64 = parts[1].parse().ok()?;
    let s: f64 = parts[2].parse().ok()?;

    Some(sign * (d + m / 60.0 + s / 3600.0))
}
