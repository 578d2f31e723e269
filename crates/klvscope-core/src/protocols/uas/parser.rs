use tracing::debug;

use super::reader::{LocalSetReader, Record};
use super::tags;
use super::transform::Transform;
use super::value::{Entry, FieldValue, LocalSet};
use crate::protocols::common::hex::to_hex;

/// Nested local sets decoded below the top level by default.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Container tags deeper than this are kept as raw bytes.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Decode a local set payload with default options.
///
/// Never fails: a malformed record stops the scan and the fields decoded so
/// far are returned, with [`LocalSet::is_truncated`] set.
///
/// # Examples
/// ```
/// use klvscope_core::decode_local_set;
///
/// let set = decode_local_set(&[0xc8, 0x03, 0x01, 0x02, 0x03]);
/// assert_eq!(serde_json::to_value(&set).unwrap()["tag_200"], "010203");
///
/// assert!(decode_local_set(&[]).is_empty());
/// ```
pub fn decode_local_set(payload: &[u8]) -> LocalSet {
    decode_local_set_with(payload, &DecodeOptions::default())
}

pub fn decode_local_set_with(payload: &[u8], options: &DecodeOptions) -> LocalSet {
    decode_at_depth(payload, options, 0)
}

fn decode_at_depth(payload: &[u8], options: &DecodeOptions, depth: usize) -> LocalSet {
    let mut set = LocalSet::new();
    let mut reader = LocalSetReader::new(payload);
    loop {
        match reader.next_record() {
            Ok(Some(record)) => set.insert(decode_record(record, options, depth)),
            Ok(None) => break,
            Err(err) => {
                debug!(depth, error = %err, "local set scan stopped early");
                set.mark_truncated();
                break;
            }
        }
    }
    set
}

fn decode_record(record: Record<'_>, options: &DecodeOptions, depth: usize) -> Entry {
    let Some(spec) = tags::lookup(record.tag) else {
        return Entry::Unknown {
            tag: record.tag,
            hex: to_hex(record.raw),
        };
    };

    let value = match spec.transform {
        Transform::LocalSet if depth < options.max_depth => {
            FieldValue::Set(decode_at_depth(record.raw, options, depth + 1))
        }
        Transform::LocalSet => {
            debug!(
                tag = record.tag,
                depth, "nesting limit reached, keeping container bytes"
            );
            spec.transform.apply(record.raw)
        }
        transform => transform.apply(record.raw),
    };

    Entry::Known {
        tag: spec.tag,
        name: spec.name,
        value,
    }
}
