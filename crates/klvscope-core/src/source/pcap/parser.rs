use std::fs::File;
use std::path::Path;

use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader};

use crate::source::{PacketEvent, PacketSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    Interface, interface_for_id, is_pcapng_magic, legacy_ts_to_seconds, pcapng_ts_to_seconds,
    read_magic_and_rewind,
};

/// Packet source over a PCAP or PCAPNG file.
pub struct PcapFileSource {
    inner: PcapReader,
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
        nanosecond: bool,
    },
    Ng {
        reader: PcapNGReader<File>,
        interfaces: Vec<Interface>,
    },
}

/// Error contexts of one reader flavour.
struct Contexts {
    refill: &'static str,
    next: &'static str,
}

const LEGACY_CONTEXTS: Contexts = Contexts {
    refill: "pcap reader refill",
    next: "pcap reader next",
};

const NG_CONTEXTS: Contexts = Contexts {
    refill: "pcapng reader refill",
    next: "pcapng reader next",
};

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let inner = create_reader(file)?;
        Ok(Self { inner })
    }
}

impl PacketSource for PcapFileSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        let event = match &mut self.inner {
            PcapReader::Legacy {
                reader,
                linktype,
                nanosecond,
            } => {
                pull_event(reader, &LEGACY_CONTEXTS, |block| match block {
                    PcapBlockOwned::LegacyHeader(header) => {
                        *linktype = Some(header.network);
                        *nanosecond = header.is_nanosecond_precision();
                        None
                    }
                    PcapBlockOwned::Legacy(packet) => Some(PacketEvent {
                        ts: Some(legacy_ts_to_seconds(
                            packet.ts_sec,
                            packet.ts_usec,
                            *nanosecond,
                        )),
                        linktype: linktype.unwrap_or(Linktype::ETHERNET),
                        data: packet.data.to_vec(),
                    }),
                    _ => None,
                })?
            }
            PcapReader::Ng { reader, interfaces } => {
                pull_event(reader, &NG_CONTEXTS, |block| match block {
                    PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                        interfaces.push(Interface {
                            linktype: intf.linktype,
                            tsresol: intf.if_tsresol,
                        });
                        None
                    }
                    PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => {
                        let interface = interface_for_id(interfaces, packet.if_id);
                        Some(PacketEvent {
                            ts: Some(pcapng_ts_to_seconds(
                                packet.ts_high,
                                packet.ts_low,
                                interface.tsresol,
                            )),
                            linktype: interface.linktype,
                            data: packet.data.to_vec(),
                        })
                    }
                    _ => None,
                })?
            }
        };
        Ok(event)
    }
}

fn create_reader(mut file: File) -> Result<PcapReader, PcapSourceError> {
    let magic = read_magic_and_rewind(&mut file)?;

    if is_pcapng_magic(&magic) {
        let reader = PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file).map_err(|e| {
            PcapSourceError::Pcap {
                context: "pcapng reader init",
                message: e.to_string(),
            }
        })?;
        Ok(PcapReader::Ng {
            reader,
            interfaces: Vec::new(),
        })
    } else {
        let reader = LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file).map_err(|e| {
            PcapSourceError::Pcap {
                context: "pcap reader init",
                message: e.to_string(),
            }
        })?;
        Ok(PcapReader::Legacy {
            reader,
            linktype: None,
            nanosecond: false,
        })
    }
}

/// Advance `reader` until `on_block` turns a block into an event or the
/// file ends.
fn pull_event<R, F>(
    reader: &mut R,
    contexts: &Contexts,
    mut on_block: F,
) -> Result<Option<PacketEvent>, PcapSourceError>
where
    R: PcapReaderIterator,
    F: FnMut(PcapBlockOwned<'_>) -> Option<PacketEvent>,
{
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = on_block(block);
                reader.consume(offset);
                if event.is_some() {
                    return Ok(event);
                }
            }
            Err(PcapError::Eof) => return Ok(None),
            Err(PcapError::Incomplete(_)) => {
                reader.refill().map_err(|e| PcapSourceError::Pcap {
                    context: contexts.refill,
                    message: e.to_string(),
                })?;
            }
            Err(e) => {
                return Err(PcapSourceError::Pcap {
                    context: contexts.next,
                    message: e.to_string(),
                });
            }
        }
    }
}
