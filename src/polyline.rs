//! Google encoded polyline format.
//!
//! Each coordinate is stored as the delta against the previous one, in units of
//! `10^-precision` degrees. A delta is zig-zag encoded, split into 5-bit groups
//! (least significant first), and every group except the last carries the `0x20`
//! continuation bit. Groups are offset by 63 to land in printable ASCII.

use geo_types::LineString;
use thiserror::Error;

use crate::data_types::common::{Coordinate, Path};

pub const DEFAULT_PRECISION: u32 = 5;
pub const MAX_PRECISION: u32 = 10;

const CHAR_OFFSET: i64 = 63;
const GROUP_MASK: i64 = 0x1f;
const CONTINUATION_BIT: i64 = 0x20;
const GROUP_BITS: u32 = 5;

// The format carries 32-bit values, which fit in 7 groups.
const MAX_GROUP_SHIFT: u32 = 30;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolylineError {
    #[error("polyline ends inside a value at index {index}")]
    Truncated { index: usize },
    #[error("invalid character {ch:?} at index {index}")]
    InvalidCharacter { index: usize, ch: char },
    #[error("value starting before index {index} does not fit in 32 bits")]
    Overflow { index: usize },
    #[error("coordinate {coordinate} decoded at index {index} is out of range")]
    OutOfRange { index: usize, coordinate: Coordinate },
    #[error("precision {0} is not supported (max {max})", max = MAX_PRECISION)]
    InvalidPrecision(u32),
}

/// Decodes a polyline at the default precision (5 decimal digits).
///
/// Malformed input is reported instead of producing garbage coordinates.
pub fn decode(encoded: &str) -> Result<Path, PolylineError> {
    decode_with_precision(encoded, DEFAULT_PRECISION)
}

/// `None` is treated like an empty polyline.
pub fn decode_optional(encoded: Option<&str>) -> Result<Path, PolylineError> {
    decode(encoded.unwrap_or_default())
}

pub fn decode_with_precision(encoded: &str, precision: u32) -> Result<Path, PolylineError> {
    let scale = scale_for(precision)?;
    let bytes = encoded.as_bytes();

    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut path = Path::new();

    while index < bytes.len() {
        let start = index;

        lat += next_delta(encoded, &mut index)?;
        if index >= bytes.len() {
            return Err(PolylineError::Truncated { index });
        }
        lng += next_delta(encoded, &mut index)?;

        let coordinate = Coordinate::new(lat as f64 * scale, lng as f64 * scale);
        if !coordinate.is_valid() {
            return Err(PolylineError::OutOfRange {
                index: start,
                coordinate,
            });
        }

        path.push(coordinate);
    }

    Ok(path)
}

fn next_delta(encoded: &str, index: &mut usize) -> Result<i64, PolylineError> {
    let bytes = encoded.as_bytes();
    let start = *index;
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&ch) = bytes.get(*index) else {
            return Err(PolylineError::Truncated { index: *index });
        };

        if !(b'?'..=b'~').contains(&ch) {
            let ch = encoded[*index..].chars().next().unwrap_or(ch as char);
            return Err(PolylineError::InvalidCharacter { index: *index, ch });
        }

        if shift > MAX_GROUP_SHIFT {
            return Err(PolylineError::Overflow { index: start });
        }

        let byte = ch as i64 - CHAR_OFFSET;
        *index += 1;

        result |= (byte & GROUP_MASK) << shift;
        shift += GROUP_BITS;

        if byte & CONTINUATION_BIT == 0 {
            break;
        }
    }

    if result > u32::MAX as i64 {
        return Err(PolylineError::Overflow { index: start });
    }

    Ok(unzigzag(result))
}

fn unzigzag(value: i64) -> i64 {
    if value & 1 == 1 {
        !(value >> 1)
    } else {
        value >> 1
    }
}

/// Reproduces the browser decoder exactly, including its behaviour on malformed
/// input: the string is read as UTF-16 code units with 32-bit integer arithmetic,
/// and reading past the end yields a zero group that terminates the value.
/// Never fails.
pub fn decode_lossy(encoded: &str) -> Path {
    let units: Vec<u16> = encoded.encode_utf16().collect();

    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut path = Path::new();

    while index < units.len() {
        lat += lossy_delta(&units, &mut index) as i64;
        lng += lossy_delta(&units, &mut index) as i64;

        path.push(Coordinate::new(lat as f64 * 1e-5, lng as f64 * 1e-5));
    }

    path
}

fn lossy_delta(units: &[u16], index: &mut usize) -> i32 {
    let mut result: i32 = 0;
    let mut shift: u32 = 0;

    loop {
        let unit = units.get(*index).copied();
        *index += 1;

        // Past the end the browser computes NaN, which ORs in nothing and fails the continuation test.
        let Some(unit) = unit else {
            break;
        };

        let byte = unit as i32 - CHAR_OFFSET as i32;
        result |= (byte & GROUP_MASK as i32).wrapping_shl(shift);
        shift = shift.wrapping_add(GROUP_BITS);

        if byte < CONTINUATION_BIT as i32 {
            break;
        }
    }

    if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    }
}

/// Encodes a path at the default precision.
pub fn encode(path: &[Coordinate]) -> String {
    encode_scaled(path, 10f64.powi(DEFAULT_PRECISION as i32))
}

pub fn encode_with_precision(path: &[Coordinate], precision: u32) -> Result<String, PolylineError> {
    scale_for(precision)?;
    Ok(encode_scaled(path, 10f64.powi(precision as i32)))
}

fn encode_scaled(path: &[Coordinate], factor: f64) -> String {
    let mut encoded = String::with_capacity(path.len() * 8);
    let mut previous = (0_i64, 0_i64);

    for coordinate in path {
        let lat = (coordinate.lat * factor).round() as i64;
        let lng = (coordinate.lng * factor).round() as i64;

        encode_value(lat - previous.0, &mut encoded);
        encode_value(lng - previous.1, &mut encoded);

        previous = (lat, lng);
    }

    encoded
}

fn encode_value(delta: i64, encoded: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };

    while value >= CONTINUATION_BIT {
        encoded.push(((CONTINUATION_BIT | (value & GROUP_MASK)) + CHAR_OFFSET) as u8 as char);
        value >>= GROUP_BITS;
    }

    encoded.push((value + CHAR_OFFSET) as u8 as char);
}

pub fn to_line_string(path: &[Coordinate]) -> LineString {
    path.iter().copied().map(geo_types::Coord::from).collect()
}

fn scale_for(precision: u32) -> Result<f64, PolylineError> {
    if precision > MAX_PRECISION {
        return Err(PolylineError::InvalidPrecision(precision));
    }

    Ok(1.0 / 10f64.powi(precision as i32))
}
