use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::protocols::klv::find_key;
use crate::protocols::uas::DecodeOptions;
use crate::source::{PacketEvent, PacketSource, PcapFileSource, SourceError};
use crate::{DEFAULT_GENERATED_AT, DecodeSummary, PacketReport, Report, make_stub_report};

mod packets;
mod udp;

use packets::{PacketCollector, PacketOrigin, ts_to_rfc3339};
use udp::parse_udp_datagram;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Decode the KLV packets carried over UDP in a PCAP/PCAPNG capture.
pub fn analyze_pcap_file(path: &Path, options: &DecodeOptions) -> Result<Report, AnalysisError> {
    let source = PcapFileSource::open(path)?;
    analyze_source(path, source, options)
}

/// Decode the KLV packets carried over UDP in frames from `source`.
///
/// Datagrams that contain no universal key are not KLV traffic and are
/// ignored without counting as skipped bytes.
pub fn analyze_source<S: PacketSource>(
    path: &Path,
    mut source: S,
    options: &DecodeOptions,
) -> Result<Report, AnalysisError> {
    let mut source_packets = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;
    let mut collector = PacketCollector::new(*options);

    while let Some(PacketEvent { ts, linktype, data }) = source.next_packet()? {
        source_packets += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);
        let datagram = match parse_udp_datagram(linktype, &data) {
            Ok(Some(datagram)) => datagram,
            Ok(None) => continue,
            Err(err) => {
                debug!(packet = source_packets, error = %err, "skipping undecodable frame");
                continue;
            }
        };
        if find_key(datagram.payload).is_none() {
            continue;
        }
        collector.collect(
            datagram.payload,
            &PacketOrigin {
                capture_time: ts_to_rfc3339(ts),
                source: Some(datagram.source.to_string()),
                destination: Some(datagram.destination.to_string()),
            },
        );
    }

    let (mut summary, packets) = collector.finish();
    summary.source_packets = Some(source_packets);
    summary.time_start = ts_to_rfc3339(first_ts);
    summary.time_end = ts_to_rfc3339(last_ts);

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.generated_at = summary
        .time_end
        .clone()
        .or_else(|| summary.time_start.clone())
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    Ok(finish_report(report, summary, packets))
}

/// Decode a file holding KLV packets back to back.
pub fn analyze_klv_file(path: &Path, options: &DecodeOptions) -> Result<Report, AnalysisError> {
    let data = fs::read(path)?;
    Ok(analyze_bytes(&path.display().to_string(), &data, options))
}

/// Decode an in-memory KLV byte stream; `input_path` only labels the report.
///
/// # Examples
/// ```
/// use klvscope_core::{DecodeOptions, UAS_LOCAL_SET_KEY, analyze_bytes};
///
/// let mut data = UAS_LOCAL_SET_KEY.to_vec();
/// data.extend_from_slice(&[0x03, 0x41, 0x01, 0x11]);
///
/// let report = analyze_bytes("memory", &data, &DecodeOptions::default());
/// assert_eq!(report.summary.klv_packets, 1);
/// assert_eq!(report.packets[0].length, 3);
/// ```
pub fn analyze_bytes(input_path: &str, data: &[u8], options: &DecodeOptions) -> Report {
    let mut collector = PacketCollector::new(*options);
    collector.collect(data, &PacketOrigin::default());
    let (summary, packets) = collector.finish();
    finish_report(make_stub_report(input_path, data.len() as u64), summary, packets)
}

fn finish_report(mut report: Report, summary: DecodeSummary, packets: Vec<PacketReport>) -> Report {
    debug!(
        klv_packets = summary.klv_packets,
        skipped_bytes = summary.skipped_bytes,
        truncated_sets = summary.truncated_sets,
        "decode finished"
    );
    report.summary = summary;
    report.packets = packets;
    report
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}
