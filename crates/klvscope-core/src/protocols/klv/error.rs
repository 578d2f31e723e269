use thiserror::Error;

/// Reasons a buffer is not recognised as a KLV packet.
///
/// # Examples
/// ```
/// use klvscope_core::{KlvError, try_parse_klv_packet};
///
/// let err = try_parse_klv_packet(&[0u8; 4]).unwrap_err();
/// assert_eq!(err, KlvError::TooShort { needed: 16, actual: 4 });
/// assert!(err.to_string().contains("packet too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KlvError {
    #[error("packet too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("key mismatch: not a UAS Datalink Local Set packet")]
    KeyMismatch,
    #[error("invalid BER length at offset {offset}")]
    InvalidLength { offset: usize },
    #[error("value overrun: length {length} exceeds the {available} bytes available")]
    ValueOverrun { length: u64, available: usize },
}
