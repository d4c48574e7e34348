// src/nmea/sentence.rs
//! Sentence classification and field extraction

use crate::error::{GpsError, Result};

/// GGA sentences carry at least this many comma-separated fields
/// up to and including the altitude (field 9).
const GGA_MIN_FIELDS: usize = 10;

/// RMC sentences carry at least this many fields up to and
/// including the UTC date (field 9).
const RMC_MIN_FIELDS: usize = 10;

/// The sentence kinds this logger understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceKind {
    /// `$GPGGA` - fix data: latitude, longitude, fix quality, altitude
    PositionFix,
    /// `$GPRMC` - recommended minimum: UTC time, status flag, UTC date
    TimeFix,
    /// Anything else, including empty frames; dropped without processing
    Unrecognized,
}

/// Identify a sentence kind from its leading marker.
///
/// Pure and total: unknown or short input is a normal outcome, never an
/// error. Matching is case-sensitive prefix only; checksums are not
/// verified.
pub fn classify(frame: &str) -> SentenceKind {
    if frame.starts_with("$GPGGA") {
        SentenceKind::PositionFix
    } else if frame.starts_with("$GPRMC") {
        SentenceKind::TimeFix
    } else {
        SentenceKind::Unrecognized
    }
}

/// Fields extracted from one classified sentence
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSet<'a> {
    Position {
        /// Degrees-and-minutes packed magnitude, e.g. 4807.038
        latitude: f64,
        /// 'N' or 'S'
        lat_hemisphere: char,
        longitude: f64,
        /// 'E' or 'W'
        lon_hemisphere: char,
        /// Meters above the reference datum; the field may be empty
        altitude_meters: Option<f64>,
    },
    Time {
        /// "HHMMSS" (a fractional suffix may follow)
        utc_time: &'a str,
        /// "DDMMYY"
        utc_date: &'a str,
    },
    /// GGA with fix quality "0": the receiver has no fix yet
    NoFix,
    /// RMC with a status flag other than "A": data marked void
    Inactive,
}

/// Split a classified sentence into its typed fields.
///
/// Fails with `GpsError::Malformed` when the field count is
/// insufficient or a numeric field does not parse. `NoFix` and
/// `Inactive` are valid non-error outcomes, distinct from malformed
/// input.
pub fn extract<'a>(frame: &'a str, kind: SentenceKind) -> Result<FieldSet<'a>> {
    let parts: Vec<&str> = frame.split(',').collect();

    match kind {
        SentenceKind::PositionFix => extract_position(&parts),
        SentenceKind::TimeFix => extract_time(&parts),
        SentenceKind::Unrecognized => {
            Err(GpsError::Malformed("unrecognized sentence kind".to_string()))
        }
    }
}

fn extract_position<'a>(parts: &[&'a str]) -> Result<FieldSet<'a>> {
    if parts.len() < GGA_MIN_FIELDS {
        return Err(GpsError::Malformed(format!(
            "GGA sentence has {} fields, need at least {}",
            parts.len(),
            GGA_MIN_FIELDS
        )));
    }

    // Fix quality (field 6): "0" means no fix, which is not an error
    if parts[6] == "0" {
        return Ok(FieldSet::NoFix);
    }

    let latitude = parse_magnitude(parts[2], "latitude")?;
    let lat_hemisphere = parse_hemisphere(parts[3], "latitude")?;
    let longitude = parse_magnitude(parts[4], "longitude")?;
    let lon_hemisphere = parse_hemisphere(parts[5], "longitude")?;

    // Altitude (field 9) is optional: an empty field is simply absent
    let altitude_meters = if parts[9].is_empty() {
        None
    } else {
        Some(parse_magnitude(parts[9], "altitude")?)
    };

    Ok(FieldSet::Position {
        latitude,
        lat_hemisphere,
        longitude,
        lon_hemisphere,
        altitude_meters,
    })
}

fn extract_time<'a>(parts: &[&'a str]) -> Result<FieldSet<'a>> {
    if parts.len() < RMC_MIN_FIELDS {
        return Err(GpsError::Malformed(format!(
            "RMC sentence has {} fields, need at least {}",
            parts.len(),
            RMC_MIN_FIELDS
        )));
    }

    // Status flag (field 2): anything other than "A" is void data
    if parts[2] != "A" {
        return Ok(FieldSet::Inactive);
    }

    Ok(FieldSet::Time {
        utc_time: parts[1],
        utc_date: parts[9],
    })
}

fn parse_magnitude(field: &str, name: &str) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|_| GpsError::Malformed(format!("bad {} field: {:?}", name, field)))
}

fn parse_hemisphere(field: &str, name: &str) -> Result<char> {
    field
        .chars()
        .next()
        .ok_or_else(|| GpsError::Malformed(format!("empty {} hemisphere field", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
    const RMC: &str = "$GPRMC,092751,A,4807.038,N,01131.000,E,022.4,084.4,180994,003.1,W*6A";

    #[test]
    fn test_classify() {
        assert_eq!(classify(GGA), SentenceKind::PositionFix);
        assert_eq!(classify(RMC), SentenceKind::TimeFix);
        assert_eq!(classify("$GPGSV,3,1,12,01,40,083,46*75"), SentenceKind::Unrecognized);
        assert_eq!(classify(""), SentenceKind::Unrecognized);
        assert_eq!(classify("$GP"), SentenceKind::Unrecognized);
        // Case-sensitive prefix match only
        assert_eq!(classify("$gpgga,123519"), SentenceKind::Unrecognized);
    }

    #[test]
    fn test_extract_position() {
        let fields = extract(GGA, SentenceKind::PositionFix).unwrap();
        assert_eq!(
            fields,
            FieldSet::Position {
                latitude: 4807.038,
                lat_hemisphere: 'N',
                longitude: 1131.0,
                lon_hemisphere: 'E',
                altitude_meters: Some(545.4),
            }
        );
    }

    #[test]
    fn test_extract_position_no_fix() {
        let gga = "$GPGGA,123519,,,,,0,00,,,M,,M,,*66";
        let fields = extract(gga, SentenceKind::PositionFix).unwrap();
        assert_eq!(fields, FieldSet::NoFix);
    }

    #[test]
    fn test_extract_position_missing_altitude() {
        let gga = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,,M,46.9,M,,*47";
        match extract(gga, SentenceKind::PositionFix).unwrap() {
            FieldSet::Position { altitude_meters, .. } => assert_eq!(altitude_meters, None),
            other => panic!("unexpected field set: {:?}", other),
        }
    }

    #[test]
    fn test_extract_position_short() {
        let result = extract("$GPGGA,123519,4807.038", SentenceKind::PositionFix);
        assert!(matches!(result, Err(GpsError::Malformed(_))));
    }

    #[test]
    fn test_extract_position_bad_numeric() {
        let gga = "$GPGGA,123519,not-a-number,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
        let result = extract(gga, SentenceKind::PositionFix);
        assert!(matches!(result, Err(GpsError::Malformed(_))));
    }

    #[test]
    fn test_extract_time() {
        let fields = extract(RMC, SentenceKind::TimeFix).unwrap();
        assert_eq!(
            fields,
            FieldSet::Time {
                utc_time: "092751",
                utc_date: "180994",
            }
        );
    }

    #[test]
    fn test_extract_time_void() {
        let rmc = "$GPRMC,092751,V,,,,,,,180994,,*6A";
        let fields = extract(rmc, SentenceKind::TimeFix).unwrap();
        assert_eq!(fields, FieldSet::Inactive);
    }

    #[test]
    fn test_extract_time_short() {
        let result = extract("$GPRMC,092751,A", SentenceKind::TimeFix);
        assert!(matches!(result, Err(GpsError::Malformed(_))));
    }
}
