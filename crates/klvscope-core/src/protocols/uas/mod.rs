//! UAS Datalink Local Set decoding.
//!
//! The payload of a KLV packet is a flat run of records: a one-byte tag, a
//! BER length and that many value bytes. `reader` walks the records, `tags`
//! maps each tag to a name and a `transform`, and `parser` drives both,
//! recursing into container tags (security, RVT, VMTI and SAR sets) up to a
//! configurable depth. Decoding never fails; a malformed tail ends the scan
//! and leaves the fields decoded before it.

pub mod error;
pub mod parser;
pub mod reader;
pub mod tags;
pub mod transform;
pub mod value;

pub use parser::{DEFAULT_MAX_DEPTH, DecodeOptions, decode_local_set, decode_local_set_with};
pub use tags::FieldSpec;
pub use transform::{Axis, Transform};
pub use value::{Entry, FieldValue, LocalSet};
