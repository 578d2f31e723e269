/// Largest field width, in bytes, accumulated into a single integer.
pub(crate) const MAX_INT_WIDTH: usize = 8;

/// Accumulate a big-endian unsigned integer of 1 to 8 bytes.
///
/// Empty and wider inputs yield `None`.
pub(crate) fn be_uint(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() || bytes.len() > MAX_INT_WIDTH {
        return None;
    }
    Some(
        bytes
            .iter()
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)),
    )
}

/// Sign-extend the low `width` bytes of `value` as two's complement.
pub(crate) fn sign_extend(value: u64, width: usize) -> i64 {
    let shift = 64 - (width.clamp(1, MAX_INT_WIDTH) as u32) * 8;
    ((value << shift) as i64) >> shift
}

/// Largest unsigned value representable on `width` bytes, as `f64`.
pub(crate) fn full_scale(width: usize) -> f64 {
    if width >= MAX_INT_WIDTH {
        u64::MAX as f64
    } else {
        ((1u64 << (width * 8)) - 1) as f64
    }
}
