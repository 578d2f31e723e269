use super::error::KlvError;
use super::layout;
use super::reader::KlvReader;
use crate::protocols::uas::{DecodeOptions, LocalSet, decode_local_set_with};

/// A framed packet borrowing its value from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KlvPacket<'a> {
    pub key: [u8; layout::KEY_LEN],
    pub length: u64,
    /// Key plus BER length bytes.
    pub header_len: usize,
    pub value: &'a [u8],
}

impl<'a> KlvPacket<'a> {
    /// Bytes occupied by the whole packet in its input buffer.
    pub fn total_len(&self) -> usize {
        self.header_len + self.value.len()
    }

    pub fn decode(&self) -> LocalSet {
        self.decode_with(&DecodeOptions::default())
    }

    pub fn decode_with(&self, options: &DecodeOptions) -> LocalSet {
        decode_local_set_with(self.value, options)
    }
}

/// Parse one packet at the start of `data`, reporting why it was rejected.
///
/// Bytes after the packet's value are ignored.
pub fn try_parse_klv_packet(data: &[u8]) -> Result<KlvPacket<'_>, KlvError> {
    let reader = KlvReader::new(data);
    reader.require_len(layout::KEY_LEN)?;

    let key = reader.read_key()?;
    if key != layout::UAS_LOCAL_SET_KEY {
        return Err(KlvError::KeyMismatch);
    }

    let length = reader.read_length(layout::LENGTH_OFFSET)?;
    let header_len = layout::LENGTH_OFFSET + length.consumed;
    let value = reader.read_value(header_len, length.value)?;

    Ok(KlvPacket {
        key,
        length: length.value,
        header_len,
        value,
    })
}

/// Parse one packet at the start of `data`; `None` when it is not a
/// recognised UAS Datalink Local Set packet.
///
/// # Examples
/// ```
/// use klvscope_core::{UAS_LOCAL_SET_KEY, parse_klv_packet};
///
/// let mut data = UAS_LOCAL_SET_KEY.to_vec();
/// data.extend_from_slice(&[0x03, 0x41, 0x01, 0x11]);
/// let packet = parse_klv_packet(&data).unwrap();
/// assert_eq!(packet.length, 3);
/// assert_eq!(packet.value, &[0x41, 0x01, 0x11]);
///
/// assert!(parse_klv_packet(&data[..10]).is_none());
/// ```
pub fn parse_klv_packet(data: &[u8]) -> Option<KlvPacket<'_>> {
    try_parse_klv_packet(data).ok()
}
