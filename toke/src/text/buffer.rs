//! Growable owned byte buffer with explicit doubling growth

use super::TextError;
use crate::config::compile_time::text::{GROWTH_FACTOR, INITIAL_CAPACITY};

/// Heap-owned bytes that grow by `GROWTH_FACTOR` whenever an append finds them full.
///
/// Growth goes through `try_reserve_exact`, so a failed allocation is reported
/// as [`TextError::OutOfMemory`] rather than aborting the process.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    bytes: Vec<u8>,
}

impl TextBuffer {
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, TextError> {
        let mut buffer = Self::new();
        buffer.reserve_exact(capacity)?;
        Ok(buffer)
    }

    /// Copy `bytes` into a buffer sized exactly to them
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TextError> {
        let mut buffer = Self::with_capacity(bytes.len())?;
        buffer.bytes.extend_from_slice(bytes);
        Ok(buffer)
    }

    pub fn push(&mut self, byte: u8) -> Result<(), TextError> {
        if self.bytes.len() == self.bytes.capacity() {
            let target = next_capacity(self.bytes.capacity())?;
            self.reserve_exact(target)?;
        }
        self.bytes.push(byte);
        Ok(())
    }

    /// Trim capacity down to the current length
    pub fn fit(&mut self) {
        self.bytes.shrink_to_fit();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    fn reserve_exact(&mut self, total: usize) -> Result<(), TextError> {
        let additional = total.saturating_sub(self.bytes.len());
        self.bytes
            .try_reserve_exact(additional)
            .map_err(|_| TextError::OutOfMemory { requested: total })
    }
}

impl From<Vec<u8>> for TextBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

fn next_capacity(current: usize) -> Result<usize, TextError> {
    if current == 0 {
        return Ok(INITIAL_CAPACITY);
    }
    current
        .checked_mul(GROWTH_FACTOR)
        .ok_or(TextError::OutOfMemory { requested: usize::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_push_allocates_initial_capacity() {
        let mut buffer = TextBuffer::new();
        assert_eq!(buffer.capacity(), 0);

        buffer.push(b'a').unwrap();
        assert!(buffer.capacity() >= INITIAL_CAPACITY);
        assert_eq!(buffer.as_bytes(), b"a");
    }

    #[test]
    fn test_growth_doubles() {
        assert_eq!(next_capacity(0).unwrap(), INITIAL_CAPACITY);
        assert_eq!(next_capacity(2).unwrap(), 2 * GROWTH_FACTOR);
        assert_eq!(next_capacity(8).unwrap(), 8 * GROWTH_FACTOR);
        assert!(next_capacity(usize::MAX).is_err());
    }

    #[test]
    fn test_push_many_and_fit() {
        let mut buffer = TextBuffer::new();
        for byte in b"goober" {
            buffer.push(*byte).unwrap();
        }
        assert_eq!(buffer.as_bytes(), b"goober");
        assert!(buffer.capacity() >= 6);

        buffer.fit();
        assert_eq!(buffer.len(), 6);
        assert!(buffer.capacity() >= buffer.len());
    }

    #[test]
    fn test_from_slice() {
        let buffer = TextBuffer::from_slice(b"h1").unwrap();
        assert_eq!(buffer.as_bytes(), b"h1");
        assert_eq!(buffer.into_vec(), b"h1".to_vec());
    }

    #[test]
    fn test_impossible_reservation_is_reported() {
        let result = TextBuffer::with_capacity(usize::MAX);
        assert!(matches!(
            result,
            Err(TextError::OutOfMemory { requested }) if requested == usize::MAX
        ));
    }
}
