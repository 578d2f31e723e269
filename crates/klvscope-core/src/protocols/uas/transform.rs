//! Numeric transforms from raw field bytes to physical units.
//!
//! Every transform reads its bytes as one big-endian unsigned integer. At most
//! eight bytes are accumulated; empty or wider fields decode as "no data".
//! Mapping to `f64` is exact only up to 2^53, so 7- and 8-byte fields lose
//! low-order precision in the scaled transforms.

use super::value::FieldValue;
use crate::protocols::common::reader::{be_uint, full_scale, sign_extend};

pub const COORDINATE_SENTINEL: u32 = 0x8000_0000;
/// Denominator shared by latitude and longitude scaling (2^32 - 2).
pub const COORDINATE_SPAN: f64 = 4_294_967_294.0;
pub const ALTITUDE_MIN_M: f64 = -900.0;
pub const ALTITUDE_MAX_M: f64 = 19_000.0;
pub const OFFSET_CORNER_SENTINEL: u16 = 0x8000;
pub const OFFSET_CORNER_RANGE_DEG: f64 = 0.075;

/// Which geographic axis a coordinate field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn span_deg(self) -> f64 {
        match self {
            Axis::Latitude => 180.0,
            Axis::Longitude => 360.0,
        }
    }
}

/// How a field's raw bytes become a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Unscaled unsigned integer of any width up to eight bytes.
    Unsigned,
    /// Unsigned integer read from the first `n` bytes.
    FixedUnsigned(usize),
    /// Two's-complement integer read from the first `n` bytes.
    FixedSigned(usize),
    Text,
    /// Linear map onto `[min, max]`, signed when the range is symmetric.
    Angle { min: f64, max: f64 },
    Coordinate(Axis),
    Altitude,
    Distance { max: f64 },
    OffsetCorner,
    Bytes,
    /// Nested record sequence, expanded by the dispatcher.
    LocalSet,
}

impl Transform {
    /// Decode a terminal field.
    ///
    /// `LocalSet` is not expanded here; its raw bytes are passed through so
    /// that nothing is lost when the dispatcher stops recursing.
    pub fn apply(&self, raw: &[u8]) -> FieldValue {
        match *self {
            Transform::Unsigned => decode_unsigned(raw).into(),
            Transform::FixedUnsigned(width) => decode_fixed_unsigned(raw, width).into(),
            Transform::FixedSigned(width) => decode_fixed_signed(raw, width).into(),
            Transform::Text => FieldValue::Text(decode_text(raw)),
            Transform::Angle { min, max } => decode_angle(raw, min, max).into(),
            Transform::Coordinate(axis) => decode_coordinate(raw, axis).into(),
            Transform::Altitude => decode_altitude(raw).into(),
            Transform::Distance { max } => decode_distance(raw, max).into(),
            Transform::OffsetCorner => decode_offset_corner(raw).into(),
            Transform::Bytes | Transform::LocalSet => FieldValue::Bytes(raw.to_vec()),
        }
    }
}

pub fn decode_unsigned(raw: &[u8]) -> Option<u64> {
    be_uint(raw)
}

pub fn decode_fixed_unsigned(raw: &[u8], width: usize) -> Option<u64> {
    be_uint(raw.get(..width)?)
}

pub fn decode_fixed_signed(raw: &[u8], width: usize) -> Option<i64> {
    let value = be_uint(raw.get(..width)?)?;
    Some(sign_extend(value, width))
}

/// UTF-8 text with surrounding whitespace trimmed; invalid sequences are
/// replaced rather than rejected.
pub fn decode_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim().to_string()
}

/// Map a field of `raw.len()` bytes linearly onto `[min, max]`.
///
/// A symmetric range (`min == -max`) reads the field as two's complement over
/// `[-(2^(8w-1) - 1), 2^(8w-1) - 1]` and reserves `2^(8w-1)` as "no data".
/// Any other range reads it as unsigned over `[0, 2^(8w) - 1]`.
///
/// # Examples
/// ```
/// use klvscope_core::protocols::uas::transform::decode_angle;
///
/// assert_eq!(decode_angle(&[0x80, 0x00], -20.0, 20.0), None);
/// let heading = decode_angle(&[0x80, 0x00], 0.0, 360.0).unwrap();
/// assert!((heading - 180.0).abs() < 0.01);
/// ```
pub fn decode_angle(raw: &[u8], min: f64, max: f64) -> Option<f64> {
    let width = raw.len();
    let value = be_uint(raw)?;

    if min == -max {
        let half_scale = 1u64 << (width * 8 - 1);
        if value == half_scale {
            return None;
        }
        let signed = sign_extend(value, width) as f64;
        return Some(signed / (half_scale - 1) as f64 * max);
    }

    Some(min + value as f64 / full_scale(width) * (max - min))
}

/// Decode a 4-byte latitude or longitude in degrees; `0x80000000` is "no data".
///
/// # Examples
/// ```
/// use klvscope_core::protocols::uas::transform::{Axis, decode_coordinate};
///
/// assert_eq!(decode_coordinate(&[0x80, 0, 0, 0], Axis::Latitude), None);
/// assert_eq!(decode_coordinate(&[0, 0, 0, 0], Axis::Longitude), Some(0.0));
/// ```
pub fn decode_coordinate(raw: &[u8], axis: Axis) -> Option<f64> {
    let bytes: [u8; 4] = raw.get(..4)?.try_into().ok()?;
    let value = u32::from_be_bytes(bytes);
    if value == COORDINATE_SENTINEL {
        return None;
    }
    Some(f64::from(value as i32) * axis.span_deg() / COORDINATE_SPAN)
}

/// Map an unsigned field of any width onto `[-900, 19000]` meters.
pub fn decode_altitude(raw: &[u8]) -> Option<f64> {
    let value = be_uint(raw)?;
    Some(ALTITUDE_MIN_M + value as f64 / full_scale(raw.len()) * (ALTITUDE_MAX_M - ALTITUDE_MIN_M))
}

/// Map an unsigned field of any width onto `[0, max]` meters.
pub fn decode_distance(raw: &[u8], max: f64) -> Option<f64> {
    let value = be_uint(raw)?;
    Some(value as f64 / full_scale(raw.len()) * max)
}

/// Decode a 2-byte corner offset from the frame center, in degrees.
pub fn decode_offset_corner(raw: &[u8]) -> Option<f64> {
    let bytes: [u8; 2] = raw.get(..2)?.try_into().ok()?;
    let value = u16::from_be_bytes(bytes);
    if value == OFFSET_CORNER_SENTINEL {
        return None;
    }
    Some(f64::from(value as i16) / f64::from(i16::MAX) * OFFSET_CORNER_RANGE_DEG)
}
