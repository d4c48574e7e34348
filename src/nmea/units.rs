// src/nmea/units.rs
//! Coordinate and altitude unit conversions

const FEET_PER_METER: f64 = 3.28084;

/// Convert a packed degrees-and-minutes magnitude plus hemisphere into
/// signed decimal degrees.
///
/// The integer part above the last two digits is degrees, the remainder
/// is minutes: 4807.038 means 48 degrees 7.038 minutes. Southern and
/// western hemispheres are negative.
pub fn to_decimal(raw: f64, hemisphere: char) -> f64 {
    let degrees = (raw / 100.0).trunc();
    let minutes = raw % 100.0;
    let decimal = degrees + minutes / 60.0;

    match hemisphere {
        'S' | 'W' => -decimal,
        _ => decimal,
    }
}

/// Render decimal degrees with exactly six fractional digits.
pub fn format_degrees(degrees: f64) -> String {
    format!("{:.6}", degrees)
}

/// Convert meters to feet, rendered with two fractional digits and a
/// unit suffix. Altitude is an unsigned magnitude above the reference
/// datum; no hemisphere handling applies.
pub fn to_feet(meters: f64) -> String {
    format!("{:.2} ft", meters * FEET_PER_METER)
}
