//! Capture and KLV builders shared by the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use klvscope_core::encode_ber_length;

pub const ETHERTYPE_IPV4: u16 = 0x0800;
pub const UDP_PROTO: u8 = 17;
pub const KLV_PORT: u16 = 15000;
const IF_TSRESOL_OPTION: u16 = 9;
const PCAP_MAGIC_MICROS: u32 = 0xa1b2_c3d4;
const PCAP_MAGIC_NANOS: u32 = 0xa1b2_3c4d;

pub const UAS_KEY: [u8; 16] = [
    0x06, 0x0e, 0x2b, 0x34, 0x02, 0x0b, 0x01, 0x01, 0x0e, 0x01, 0x03, 0x01, 0x01, 0x00, 0x00, 0x00,
];

/// Unique path in the system temp dir; the caller removes it.
pub fn temp_path(name: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("klvscope_{}_{unique}_{name}", std::process::id()))
}

/// One local set record.
pub fn record(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend_from_slice(&encode_ber_length(value.len() as u64));
    out.extend_from_slice(value);
    out
}

/// Full KLV packet around an already encoded local set payload.
pub fn klv_packet(payload: &[u8]) -> Vec<u8> {
    let mut out = UAS_KEY.to_vec();
    out.extend_from_slice(&encode_ber_length(payload.len() as u64));
    out.extend_from_slice(payload);
    out
}

/// Packet with a precision time stamp, a mission id and a heading.
pub fn sample_packet(micros: u64, mission: &str, heading_raw: u16) -> Vec<u8> {
    let mut payload = record(2, &micros.to_be_bytes());
    payload.extend(record(3, mission.as_bytes()));
    payload.extend(record(5, &heading_raw.to_be_bytes()));
    payload.extend(record(65, &[17]));
    klv_packet(&payload)
}

pub fn build_ipv4_udp_packet(
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    src_port: u16,
    dst_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    let mut packet = Vec::new();
    packet.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    packet.extend_from_slice(&[0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f]);
    packet.extend_from_slice(&ETHERTYPE_IPV4.to_be_bytes());

    let total_len = 20u16 + 8u16 + (payload.len() as u16);
    let mut ip_header = [0u8; 20];
    ip_header[0] = 0x45;
    ip_header[2..4].copy_from_slice(&total_len.to_be_bytes());
    ip_header[8] = 64;
    ip_header[9] = UDP_PROTO;
    ip_header[12..16].copy_from_slice(&src_ip);
    ip_header[16..20].copy_from_slice(&dst_ip);
    let checksum = ipv4_checksum(&ip_header);
    ip_header[10..12].copy_from_slice(&checksum.to_be_bytes());
    packet.extend_from_slice(&ip_header);

    let udp_len = 8u16 + (payload.len() as u16);
    packet.extend_from_slice(&src_port.to_be_bytes());
    packet.extend_from_slice(&dst_port.to_be_bytes());
    packet.extend_from_slice(&udp_len.to_be_bytes());
    packet.extend_from_slice(&0u16.to_be_bytes());

    packet.extend_from_slice(payload);
    packet
}

/// Ethernet frame carrying `payload` from 10.0.0.1 to 10.0.0.2 on the KLV port.
pub fn klv_frame(payload: &[u8]) -> Vec<u8> {
    build_ipv4_udp_packet([10, 0, 0, 1], [10, 0, 0, 2], 5000, KLV_PORT, payload)
}

fn ipv4_checksum(header: &[u8; 20]) -> u16 {
    let mut sum = 0u32;
    for chunk in header.chunks(2) {
        let part = u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
        sum = sum.wrapping_add(part);
    }
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

/// Write an Ethernet PCAPNG capture; timestamps are microseconds.
pub fn write_pcapng(path: &Path, packets: &[(u64, Vec<u8>)]) {
    write_pcapng_with_tsresol(path, None, packets);
}

/// Write an Ethernet PCAPNG capture whose interface carries `if_tsresol`;
/// timestamps are in units of that resolution.
pub fn write_pcapng_with_tsresol(path: &Path, tsresol: Option<u8>, packets: &[(u64, Vec<u8>)]) {
    let mut output = Vec::new();
    output.extend_from_slice(&pcapng_block(0x0A0D0D0A, &section_header_body()));
    output.extend_from_slice(&pcapng_block(1, &interface_desc_body(tsresol)));

    for (ts, data) in packets {
        output.extend_from_slice(&pcapng_block(6, &enhanced_packet_body(*ts, data)));
    }

    fs::write(path, output).unwrap();
}

/// Write a legacy little-endian Ethernet PCAP capture; timestamps are
/// microseconds.
pub fn write_legacy_pcap(path: &Path, packets: &[(u64, Vec<u8>)]) {
    write_legacy(path, PCAP_MAGIC_MICROS, 1_000_000, packets);
}

/// Write a nanosecond-resolution legacy PCAP capture; timestamps are
/// nanoseconds.
pub fn write_legacy_pcap_nanos(path: &Path, packets: &[(u64, Vec<u8>)]) {
    write_legacy(path, PCAP_MAGIC_NANOS, 1_000_000_000, packets);
}

fn write_legacy(path: &Path, magic: u32, per_second: u64, packets: &[(u64, Vec<u8>)]) {
    let mut output = Vec::new();
    output.extend_from_slice(&magic.to_le_bytes());
    output.extend_from_slice(&2u16.to_le_bytes());
    output.extend_from_slice(&4u16.to_le_bytes());
    output.extend_from_slice(&0i32.to_le_bytes());
    output.extend_from_slice(&0u32.to_le_bytes());
    output.extend_from_slice(&65535u32.to_le_bytes());
    output.extend_from_slice(&1u32.to_le_bytes());

    for (ts, data) in packets {
        let secs = (ts / per_second) as u32;
        let frac = (ts % per_second) as u32;
        output.extend_from_slice(&secs.to_le_bytes());
        output.extend_from_slice(&frac.to_le_bytes());
        output.extend_from_slice(&(data.len() as u32).to_le_bytes());
        output.extend_from_slice(&(data.len() as u32).to_le_bytes());
        output.extend_from_slice(data);
    }

    fs::write(path, output).unwrap();
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (8 + body.len() + 4) as u32;
    let mut block = Vec::with_capacity(total_len as usize);
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

fn section_header_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B3C4Du32.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&(-1i64).to_be_bytes());
    body
}

fn interface_desc_body(tsresol: Option<u8>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&65535u32.to_be_bytes());
    if let Some(tsresol) = tsresol {
        body.extend_from_slice(&IF_TSRESOL_OPTION.to_be_bytes());
        body.extend_from_slice(&1u16.to_be_bytes());
        body.extend_from_slice(&[tsresol, 0, 0, 0]);
        body.extend_from_slice(&[0u8; 4]);
    }
    body
}

fn enhanced_packet_body(ts: u64, data: &[u8]) -> Vec<u8> {
    let ts_high = ((ts >> 32) & 0xFFFF_FFFF) as u32;
    let ts_low = (ts & 0xFFFF_FFFF) as u32;
    let cap_len = data.len() as u32;
    let mut body = Vec::new();
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&ts_high.to_be_bytes());
    body.extend_from_slice(&ts_low.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(data);
    let pad_len = (4 - (data.len() % 4)) % 4;
    body.extend(std::iter::repeat_n(0u8, pad_len));
    body
}
