use super::error::KlvError;
use super::layout;
use crate::protocols::ber::{BerLength, decode_ber_length};

pub struct KlvReader<'a> {
    data: &'a [u8],
}

impl<'a> KlvReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), KlvError> {
        if self.data.len() < needed {
            return Err(KlvError::TooShort {
                needed,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], KlvError> {
        self.data.get(range.clone()).ok_or(KlvError::TooShort {
            needed: range.end,
            actual: self.data.len(),
        })
    }

    pub fn read_key(&self) -> Result<[u8; layout::KEY_LEN], KlvError> {
        let bytes = self.read_slice(layout::KEY_RANGE)?;
        bytes.try_into().map_err(|_| KlvError::TooShort {
            needed: layout::KEY_LEN,
            actual: bytes.len(),
        })
    }

    pub fn read_length(&self, offset: usize) -> Result<BerLength, KlvError> {
        decode_ber_length(self.data, offset).ok_or(KlvError::InvalidLength { offset })
    }

    /// Borrow `length` bytes starting at `start`.
    pub fn read_value(&self, start: usize, length: u64) -> Result<&'a [u8], KlvError> {
        let overrun = KlvError::ValueOverrun {
            length,
            available: self.data.len().saturating_sub(start),
        };
        let end = usize::try_from(length)
            .ok()
            .and_then(|len| start.checked_add(len))
            .ok_or(overrun.clone())?;
        self.data.get(start..end).ok_or(overrun)
    }
}

#[cfg(test)]
mod tests {
    use super::KlvReader;
    use crate::protocols::klv::error::KlvError;

    #[test]
    fn read_value_within_bounds() {
        let data = [1, 2, 3, 4];
        let reader = KlvReader::new(&data);
        assert_eq!(reader.read_value(1, 2).unwrap(), &[2, 3]);
        assert_eq!(reader.read_value(4, 0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn read_value_overrun() {
        let data = [1, 2, 3, 4];
        let reader = KlvReader::new(&data);
        let err = reader.read_value(2, 3).unwrap_err();
        assert_eq!(
            err,
            KlvError::ValueOverrun {
                length: 3,
                available: 2
            }
        );
    }

    #[test]
    fn read_value_huge_length_is_overrun() {
        let data = [0u8; 2];
        let reader = KlvReader::new(&data);
        let err = reader.read_value(1, u64::MAX).unwrap_err();
        assert!(matches!(err, KlvError::ValueOverrun { .. }));
    }

    #[test]
    fn read_key_requires_sixteen_bytes() {
        let data = [0u8; 15];
        let reader = KlvReader::new(&data);
        assert!(matches!(
            reader.read_key(),
            Err(KlvError::TooShort { needed: 16, .. })
        ));
    }
}
