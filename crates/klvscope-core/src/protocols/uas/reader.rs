use super::error::RecordError;
use crate::protocols::ber::decode_ber_length;

/// One tag-length-value record, borrowing its bytes from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub tag: u8,
    /// Offset of the tag byte within the payload.
    pub offset: usize,
    pub raw: &'a [u8],
}

/// Cursor over the records of a local set payload.
pub struct LocalSetReader<'a> {
    payload: &'a [u8],
    offset: usize,
}

impl<'a> LocalSetReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Read the next record; `Ok(None)` once the payload is exhausted.
    ///
    /// On error the cursor does not move.
    pub fn next_record(&mut self) -> Result<Option<Record<'a>>, RecordError> {
        let offset = self.offset;
        let Some(&tag) = self.payload.get(offset) else {
            return Ok(None);
        };

        let length = decode_ber_length(self.payload, offset + 1)
            .ok_or(RecordError::InvalidLength { tag, offset })?;
        let start = offset + 1 + length.consumed;
        let available = self.payload.len().saturating_sub(start);
        let overrun = RecordError::Overrun {
            tag,
            offset,
            length: length.value,
            available,
        };
        let end = usize::try_from(length.value)
            .ok()
            .and_then(|len| start.checked_add(len))
            .ok_or(overrun.clone())?;
        let raw = self.payload.get(start..end).ok_or(overrun)?;

        self.offset = end;
        Ok(Some(Record { tag, offset, raw }))
    }
}
