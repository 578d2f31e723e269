use tracing::debug;

use super::layout;
use super::parser::{KlvPacket, try_parse_klv_packet};
use crate::protocols::uas::{DecodeOptions, LocalSet};

/// A packet found by [`KlvStream`] with its position in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamPacket<'a> {
    pub offset: usize,
    pub packet: KlvPacket<'a>,
}

/// Iterator over packets stored back to back in a byte buffer.
///
/// Bytes that do not start a valid packet are skipped up to the next
/// occurrence of the universal key; a truncated final packet is skipped as a
/// whole. `skipped_bytes` reports how much input was discarded so far.
///
/// # Examples
/// ```
/// use klvscope_core::{KlvStream, UAS_LOCAL_SET_KEY};
///
/// let mut data = vec![0xff, 0xff];
/// data.extend_from_slice(&UAS_LOCAL_SET_KEY);
/// data.extend_from_slice(&[0x03, 0x41, 0x01, 0x11]);
///
/// let mut stream = KlvStream::new(&data);
/// let found = stream.next().unwrap();
/// assert_eq!(found.offset, 2);
/// assert!(stream.next().is_none());
/// assert_eq!(stream.skipped_bytes(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct KlvStream<'a> {
    data: &'a [u8],
    offset: usize,
    skipped: usize,
}

impl<'a> KlvStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            skipped: 0,
        }
    }

    pub fn skipped_bytes(&self) -> usize {
        self.skipped
    }
}

impl<'a> Iterator for KlvStream<'a> {
    type Item = StreamPacket<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;
        while let Some(rest) = data.get(self.offset..).filter(|rest| !rest.is_empty()) {
            match try_parse_klv_packet(rest) {
                Ok(packet) => {
                    let offset = self.offset;
                    self.offset += packet.total_len();
                    return Some(StreamPacket { offset, packet });
                }
                Err(err) => {
                    let skip = rest
                        .get(1..)
                        .and_then(find_key)
                        .map(|pos| pos + 1)
                        .unwrap_or(rest.len());
                    debug!(
                        offset = self.offset,
                        skipped = skip,
                        error = %err,
                        "resynchronising KLV stream"
                    );
                    self.skipped += skip;
                    self.offset += skip;
                }
            }
        }
        None
    }
}

/// Position of the first universal key in `data`.
pub fn find_key(data: &[u8]) -> Option<usize> {
    data.windows(layout::KEY_LEN)
        .position(|window| window == layout::UAS_LOCAL_SET_KEY)
}

/// Decode every packet found in `data`.
pub fn decode_stream(data: &[u8], options: &DecodeOptions) -> Vec<LocalSet> {
    KlvStream::new(data)
        .map(|found| found.packet.decode_with(options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{KlvStream, decode_stream, find_key};
    use crate::protocols::ber::encode_ber_length;
    use crate::protocols::klv::layout::UAS_LOCAL_SET_KEY;
    use crate::protocols::uas::DecodeOptions;

    fn packet(value: &[u8]) -> Vec<u8> {
        let mut data = UAS_LOCAL_SET_KEY.to_vec();
        data.extend_from_slice(&encode_ber_length(value.len() as u64));
        data.extend_from_slice(value);
        data
    }

    #[test]
    fn iterates_consecutive_packets() {
        let first = packet(&[0x41, 0x01, 0x11]);
        let second = packet(&[0x41, 0x01, 0x12]);
        let mut data = first.clone();
        data.extend_from_slice(&second);

        let mut stream = KlvStream::new(&data);
        let a = stream.next().unwrap();
        let b = stream.next().unwrap();
        assert!(stream.next().is_none());
        assert_eq!(a.offset, 0);
        assert_eq!(b.offset, first.len());
        assert_eq!(b.packet.value, &[0x41, 0x01, 0x12]);
        assert_eq!(stream.skipped_bytes(), 0);
    }

    #[test]
    fn resynchronises_after_junk() {
        let mut data = vec![0x00, 0x06, 0x0e];
        data.extend_from_slice(&packet(&[0x41, 0x01, 0x11]));
        data.extend_from_slice(&[0x99; 5]);
        data.extend_from_slice(&packet(&[]));

        let offsets: Vec<usize> = KlvStream::new(&data).map(|p| p.offset).collect();
        assert_eq!(offsets, vec![3, 3 + 20 + 5]);

        let mut stream = KlvStream::new(&data);
        stream.by_ref().for_each(drop);
        assert_eq!(stream.skipped_bytes(), 8);
    }

    #[test]
    fn truncated_tail_is_skipped() {
        let mut data = packet(&[0x41, 0x01, 0x11]);
        let mut tail = packet(&[0x41, 0x01, 0x12]);
        tail.truncate(tail.len() - 2);
        data.extend_from_slice(&tail);

        let mut stream = KlvStream::new(&data);
        assert!(stream.next().is_some());
        assert!(stream.next().is_none());
        assert_eq!(stream.skipped_bytes(), tail.len());
    }

    #[test]
    fn empty_input_yields_nothing() {
        let mut stream = KlvStream::new(&[]);
        assert!(stream.next().is_none());
        assert_eq!(stream.skipped_bytes(), 0);
    }

    #[test]
    fn find_key_locates_first_occurrence() {
        let mut data = vec![1, 2, 3];
        data.extend_from_slice(&UAS_LOCAL_SET_KEY);
        assert_eq!(find_key(&data), Some(3));
        assert_eq!(find_key(&UAS_LOCAL_SET_KEY[..15]), None);
    }

    #[test]
    fn decode_stream_decodes_each_packet() {
        let mut data = packet(&[0x41, 0x01, 0x11]);
        data.extend_from_slice(&packet(&[0xc8, 0x01, 0xff]));
        let sets = decode_stream(&data, &DecodeOptions::default());
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].len(), 1);
        assert_eq!(sets[1].len(), 1);
    }
}
