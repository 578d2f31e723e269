//! BER length fields (short and long form).
//!
//! A byte with the high bit clear is the length itself (0..=127). With the
//! high bit set, the low seven bits count the big-endian bytes that follow.
//! The same encoding frames the outer packet and every local set record.

use super::common::reader::be_uint;

pub const LONG_FORM_FLAG: u8 = 0x80;
pub const LONG_FORM_COUNT_MASK: u8 = 0x7f;
pub const SHORT_FORM_MAX: u64 = 0x7f;

/// Decoded length and the number of bytes its encoding occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BerLength {
    pub value: u64,
    pub consumed: usize,
}

/// Decode a BER length starting at `offset`.
///
/// Returns `None` when `offset` is past the end, the long form announces zero
/// bytes or more bytes than remain, or the value does not fit in a `u64`.
/// Leading zero bytes in the long form are accepted.
///
/// # Examples
/// ```
/// use klvscope_core::decode_ber_length;
///
/// let short = decode_ber_length(&[0x2a], 0).unwrap();
/// assert_eq!((short.value, short.consumed), (42, 1));
///
/// let long = decode_ber_length(&[0x00, 0x82, 0x01, 0x00], 1).unwrap();
/// assert_eq!((long.value, long.consumed), (256, 3));
/// ```
pub fn decode_ber_length(data: &[u8], offset: usize) -> Option<BerLength> {
    let first = *data.get(offset)?;
    if first & LONG_FORM_FLAG == 0 {
        return Some(BerLength {
            value: u64::from(first),
            consumed: 1,
        });
    }

    let count = usize::from(first & LONG_FORM_COUNT_MASK);
    if count == 0 {
        return None;
    }
    let start = offset + 1;
    let bytes = data.get(start..start.checked_add(count)?)?;
    let leading_zeros = bytes.iter().take_while(|b| **b == 0).count();
    let significant = &bytes[leading_zeros..];
    let value = if significant.is_empty() {
        0
    } else {
        be_uint(significant)?
    };

    Some(BerLength {
        value,
        consumed: 1 + count,
    })
}

/// Encode a length in its shortest BER form.
///
/// # Examples
/// ```
/// use klvscope_core::encode_ber_length;
///
/// assert_eq!(encode_ber_length(5), vec![0x05]);
/// assert_eq!(encode_ber_length(300), vec![0x82, 0x01, 0x2c]);
/// ```
pub fn encode_ber_length(value: u64) -> Vec<u8> {
    if value <= SHORT_FORM_MAX {
        return vec![value as u8];
    }
    let bytes = value.to_be_bytes();
    let leading_zeros = bytes.iter().take_while(|b| **b == 0).count();
    let significant = &bytes[leading_zeros..];
    let mut out = Vec::with_capacity(1 + significant.len());
    out.push(LONG_FORM_FLAG | significant.len() as u8);
    out.extend_from_slice(significant);
    out
}
