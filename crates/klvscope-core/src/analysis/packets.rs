use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::protocols::klv::KlvStream;
use crate::protocols::uas::tags::PRECISION_TIME_STAMP;
use crate::protocols::uas::{DecodeOptions, LocalSet};
use crate::{DecodeSummary, PacketReport};

/// Where a buffer of KLV bytes came from.
#[derive(Debug, Clone, Default)]
pub(crate) struct PacketOrigin {
    pub capture_time: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
}

/// Decodes KLV buffers into report entries and keeps the running summary.
pub(crate) struct PacketCollector {
    options: DecodeOptions,
    summary: DecodeSummary,
    packets: Vec<PacketReport>,
}

impl PacketCollector {
    pub fn new(options: DecodeOptions) -> Self {
        Self {
            options,
            summary: DecodeSummary::default(),
            packets: Vec::new(),
        }
    }

    pub fn collect(&mut self, data: &[u8], origin: &PacketOrigin) {
        let mut stream = KlvStream::new(data);
        for found in stream.by_ref() {
            let fields = found.packet.decode_with(&self.options);
            let truncated_sets = fields.truncated_count() as u64;
            self.summary.klv_packets += 1;
            self.summary.truncated_sets += truncated_sets;
            self.summary.unknown_tags += fields.unknown_count() as u64;
            self.packets.push(PacketReport {
                index: self.packets.len() as u64,
                offset: found.offset as u64,
                capture_time: origin.capture_time.clone(),
                source: origin.source.clone(),
                destination: origin.destination.clone(),
                length: found.packet.length,
                precision_time: precision_time(&fields),
                truncated: truncated_sets > 0,
                fields,
            });
        }
        self.summary.skipped_bytes += stream.skipped_bytes() as u64;
    }

    pub fn finish(self) -> (DecodeSummary, Vec<PacketReport>) {
        (self.summary, self.packets)
    }
}

fn precision_time(fields: &LocalSet) -> Option<String> {
    let micros = fields.value(PRECISION_TIME_STAMP)?.as_u64()?;
    micros_to_rfc3339(micros)
}

pub(crate) fn micros_to_rfc3339(micros: u64) -> Option<String> {
    let nanos = i128::from(micros) * 1_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

pub(crate) fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
