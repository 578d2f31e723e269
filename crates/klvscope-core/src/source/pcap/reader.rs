use std::io::{Read, Seek, SeekFrom};

use super::error::PcapSourceError;
use super::layout;
use pcap_parser::Linktype;

/// Read the magic bytes and rewind the reader to the start.
///
/// # Errors
/// Returns `PcapSourceError::Io` when fewer than four bytes can be read or
/// the reader cannot be rewound.
pub fn read_magic_and_rewind<R: Read + Seek>(reader: &mut R) -> Result<[u8; 4], PcapSourceError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(magic)
}

pub fn is_pcapng_magic(magic: &[u8; 4]) -> bool {
    magic == &layout::PCAPNG_MAGIC
}

/// Link type and timestamp resolution of one PCAPNG interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interface {
    pub linktype: Linktype,
    pub tsresol: u8,
}

impl Default for Interface {
    fn default() -> Self {
        Self {
            linktype: Linktype::ETHERNET,
            tsresol: layout::DEFAULT_TSRESOL,
        }
    }
}

/// Interface `if_id`, defaulting to Ethernet with microsecond timestamps.
pub fn interface_for_id(interfaces: &[Interface], if_id: u32) -> Interface {
    interfaces
        .get(if_id as usize)
        .copied()
        .unwrap_or_default()
}

/// Timestamp units per second for an `if_tsresol` value.
pub fn ticks_per_second(tsresol: u8) -> f64 {
    let exponent = i32::from(tsresol & !layout::TSRESOL_BASE2_FLAG);
    if tsresol & layout::TSRESOL_BASE2_FLAG == 0 {
        10f64.powi(exponent)
    } else {
        2f64.powi(exponent)
    }
}

/// Convert a legacy PCAP seconds/fraction pair to seconds.
///
/// The fraction is nanoseconds for the `a1b23c4d` magic, microseconds
/// otherwise.
pub fn legacy_ts_to_seconds(ts_sec: u32, ts_frac: u32, nanosecond: bool) -> f64 {
    let per_second = if nanosecond {
        layout::NANOS_PER_SECOND
    } else {
        layout::MICROS_PER_SECOND
    };
    f64::from(ts_sec) + f64::from(ts_frac) / per_second
}

/// Convert a PCAPNG high/low timestamp to seconds using the interface's
/// `if_tsresol`.
pub fn pcapng_ts_to_seconds(ts_high: u32, ts_low: u32, tsresol: u8) -> f64 {
    let ts = (u64::from(ts_high) << 32) | u64::from(ts_low);
    ts as f64 / ticks_per_second(tsresol)
}
