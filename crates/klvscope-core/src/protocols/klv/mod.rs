//! KLV packet framing for the UAS Datalink Local Set.
//!
//! A packet is a 16-byte universal key, a BER length and a value region
//! holding the local set records. The parser validates the key byte for byte
//! and the declared length against the input; anything else is rejected as a
//! whole (no partial packets). `stream` walks buffers holding many packets
//! back to back and resynchronises on the key after corrupt data.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod stream;

pub use error::KlvError;
pub use layout::UAS_LOCAL_SET_KEY;
pub use parser::{KlvPacket, parse_klv_packet, try_parse_klv_packet};
pub use stream::{KlvStream, StreamPacket, decode_stream, find_key};
