//! klvscope core library for decoding MISB ST 0601 KLV metadata.
//!
//! The crate is layered the same way for every input: sources yield raw
//! bytes (PCAP frames or a flat KLV file), the analysis layer extracts UDP
//! payloads and walks KLV packets, and the protocol decoders
//! (layout/reader/parser) turn each packet into a [`LocalSet`] of named,
//! scaled fields. Results are collected into a deterministic [`Report`].
//! Parsing is byte-oriented and side-effect free; all I/O is isolated in
//! `source` modules.
//!
//! Invariants:
//! - Packet framing errors never produce partial packets.
//! - Local set decoding never fails; it stops at the first malformed record.
//! - Report ordering follows input order.
//!
//! # Examples
//! ```
//! use klvscope_core::{FieldValue, UAS_LOCAL_SET_KEY, parse_klv_packet};
//!
//! let mut data = UAS_LOCAL_SET_KEY.to_vec();
//! // Platform heading (tag 5), half of full scale.
//! data.extend_from_slice(&[0x04, 0x05, 0x02, 0x80, 0x00]);
//!
//! let packet = parse_klv_packet(&data).expect("valid packet");
//! let fields = packet.decode();
//! let heading = fields.value_by_name("platform_heading_angle").and_then(FieldValue::as_f64);
//! assert!((heading.unwrap() - 180.0).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod protocols;
mod source;

pub use analysis::{
    AnalysisError, analyze_bytes, analyze_klv_file, analyze_pcap_file, analyze_source,
};
pub use protocols::ber::{BerLength, decode_ber_length, encode_ber_length};
pub use protocols::common::hex::{parse_hex_string, to_hex};
pub use protocols::klv::{
    KlvError, KlvPacket, KlvStream, StreamPacket, UAS_LOCAL_SET_KEY, decode_stream,
    parse_klv_packet, try_parse_klv_packet,
};
pub use protocols::uas::{
    DEFAULT_MAX_DEPTH, DecodeOptions, Entry, FieldValue, LocalSet, decode_local_set,
    decode_local_set_with,
};
pub use source::{PacketEvent, PacketSource, PcapFileSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoding report for one input.
///
/// # Examples
/// ```
/// use klvscope_core::make_stub_report;
///
/// let report = make_stub_report("flight.klv", 123);
/// assert_eq!(report.report_version, klvscope_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp; the capture end time when known.
    pub generated_at: String,
    /// Input metadata.
    pub input: InputInfo,
    pub summary: DecodeSummary,
    /// Decoded packets in input order.
    pub packets: Vec<PacketReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Counters over the whole input.
///
/// # Examples
/// ```
/// use klvscope_core::DecodeSummary;
///
/// let summary = DecodeSummary {
///     skipped_bytes: 4,
///     ..DecodeSummary::default()
/// };
/// assert!(summary.has_anomalies());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeSummary {
    /// Frames read from a capture; absent for flat KLV input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_packets: Option<u64>,
    pub klv_packets: u64,
    /// Bytes discarded while resynchronising on the universal key.
    pub skipped_bytes: u64,
    /// Local sets (nested ones included) cut short by a malformed record.
    pub truncated_sets: u64,
    pub unknown_tags: u64,
    /// RFC3339 timestamp of the first frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the last frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

impl DecodeSummary {
    /// True when bytes were skipped or a set was truncated.
    pub fn has_anomalies(&self) -> bool {
        self.skipped_bytes > 0 || self.truncated_sets > 0
    }
}

/// One decoded KLV packet.
#[derive(Debug, Clone, Serialize)]
pub struct PacketReport {
    /// Zero-based position among decoded packets.
    pub index: u64,
    /// Byte offset of the key within its buffer (file or UDP payload).
    pub offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_time: Option<String>,
    /// Sender endpoint in `ip:port` form, for captured datagrams.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Declared value length.
    pub length: u64,
    /// Precision time stamp field rendered as RFC3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision_time: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    pub fields: LocalSet,
}

/// Build a stub report with base fields filled and no packets.
///
/// # Examples
/// ```
/// use klvscope_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcapng", 123);
/// assert!(report.packets.is_empty());
/// assert_eq!(report.tool.name, "klvscope");
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "klvscope".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        summary: DecodeSummary::default(),
        packets: vec![],
    }
}
