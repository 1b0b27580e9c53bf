//! Pull-style character sources consumed by the scanner

use std::io::{self, BufReader, Bytes, Read};

/// Yields one byte at a time; `None` marks the end of the source
pub trait CharSource {
    fn next_char(&mut self) -> Option<u8>;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn next_char(&mut self) -> Option<u8> {
        (**self).next_char()
    }
}

/// Source over bytes already in memory
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Bytes not yet handed out
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }
}

impl<'a> From<&'a [u8]> for SliceSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<'a> From<&'a str> for SliceSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl CharSource for SliceSource<'_> {
    fn next_char(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.position).copied()?;
        self.position += 1;
        Some(byte)
    }
}

/// Source over any reader, buffered internally.
///
/// The first I/O error ends the source; it is kept for [`ReaderSource::take_error`]
/// so callers can tell a failed read from a clean end of input.
pub struct ReaderSource<R: Read> {
    bytes: Bytes<BufReader<R>>,
    error: Option<io::Error>,
    finished: bool,
    bytes_read: usize,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
            error: None,
            finished: false,
            bytes_read: 0,
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }
}

impl<R: Read> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> Option<u8> {
        if self.finished {
            return None;
        }
        match self.bytes.next() {
            Some(Ok(byte)) => {
                self.bytes_read += 1;
                Some(byte)
            }
            Some(Err(error)) => {
                self.error = Some(error);
                self.finished = true;
                None
            }
            None => {
                self.finished = true;
                None
            }
        }
    }
}
