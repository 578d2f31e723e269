//! PCAP/PCAPNG file source.
//!
//! Detects the container format from the file magic and emits every packet
//! block as a `PacketEvent`, resolving link types per interface for PCAPNG.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
