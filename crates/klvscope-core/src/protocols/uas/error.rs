use thiserror::Error;

/// Why a local set scan stopped before the end of its payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("tag {tag} at offset {offset}: missing or invalid BER length")]
    InvalidLength { tag: u8, offset: usize },
    #[error("tag {tag} at offset {offset}: length {length} exceeds the {available} bytes available")]
    Overrun {
        tag: u8,
        offset: usize,
        length: u64,
        available: usize,
    },
}
