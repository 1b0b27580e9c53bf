//! Text spans: byte text that is either borrowed from the caller or owned
//!
//! A [`TextSpan::Borrowed`] span has no mutating operations of its own.
//! Appending to one first copies its content into a fresh [`TextBuffer`],
//! leaving the borrowed memory untouched.

pub mod buffer;

pub use buffer::TextBuffer;

use crate::logging::{codes, Code};
use bstr::BStr;
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("Out of memory growing text buffer to {requested} bytes")]
    OutOfMemory { requested: usize },
}

impl TextError {
    pub fn error_code(&self) -> Code {
        match self {
            TextError::OutOfMemory { .. } => codes::system::MEMORY_ALLOCATION_FAILURE,
        }
    }
}

/// Byte text with an explicit ownership tag
#[derive(Clone)]
pub enum TextSpan<'a> {
    /// Caller-owned memory; never appended to in place
    Borrowed(&'a [u8]),
    /// Heap-owned growable buffer
    Owned(TextBuffer),
}

impl<'a> TextSpan<'a> {
    /// An empty owned span with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Result<TextSpan<'static>, TextError> {
        Ok(TextSpan::Owned(TextBuffer::with_capacity(capacity)?))
    }

    pub const fn borrowed(bytes: &'a [u8]) -> Self {
        TextSpan::Borrowed(bytes)
    }

    /// Owned copy of `bytes`
    pub fn copied(bytes: &[u8]) -> Result<TextSpan<'static>, TextError> {
        Ok(TextSpan::Owned(TextBuffer::from_slice(bytes)?))
    }

    /// Point this span at caller memory, dropping any owned buffer
    pub fn set_from_literal(&mut self, bytes: &'a [u8]) {
        *self = TextSpan::Borrowed(bytes);
    }

    /// Append one byte, converting a borrowed span to an owned copy first
    pub fn push(&mut self, byte: u8) -> Result<(), TextError> {
        match self {
            TextSpan::Owned(buffer) => buffer.push(byte),
            TextSpan::Borrowed(bytes) => {
                let mut buffer = TextBuffer::from_slice(bytes)?;
                buffer.push(byte)?;
                *self = TextSpan::Owned(buffer);
                Ok(())
            }
        }
    }

    /// Shrink an owned span to its exact length; borrowed spans are left alone
    pub fn fit(&mut self) {
        if let TextSpan::Owned(buffer) = self {
            buffer.fit();
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            TextSpan::Borrowed(bytes) => bytes,
            TextSpan::Owned(buffer) => buffer.as_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, TextSpan::Owned(_))
    }

    /// Detach from borrowed memory by copying if needed
    pub fn into_owned(self) -> Result<TextSpan<'static>, TextError> {
        match self {
            TextSpan::Borrowed(bytes) => TextSpan::copied(bytes),
            TextSpan::Owned(buffer) => Ok(TextSpan::Owned(buffer)),
        }
    }

    /// The text as `&str` when it is valid UTF-8
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }
}

impl Default for TextSpan<'_> {
    fn default() -> Self {
        TextSpan::Borrowed(&[])
    }
}

impl<'a> From<&'a [u8]> for TextSpan<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        TextSpan::Borrowed(bytes)
    }
}

impl<'a> From<&'a str> for TextSpan<'a> {
    fn from(text: &'a str) -> Self {
        TextSpan::Borrowed(text.as_bytes())
    }
}

impl From<String> for TextSpan<'static> {
    fn from(text: String) -> Self {
        TextSpan::Owned(TextBuffer::from(text.into_bytes()))
    }
}

impl From<Vec<u8>> for TextSpan<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        TextSpan::Owned(TextBuffer::from(bytes))
    }
}

impl PartialEq for TextSpan<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for TextSpan<'_> {}

impl PartialEq<[u8]> for TextSpan<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<str> for TextSpan<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for TextSpan<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Hash for TextSpan<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl Borrow<[u8]> for TextSpan<'_> {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for TextSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(BStr::new(self.as_bytes()), f)
    }
}

impl fmt::Debug for TextSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSpan::Borrowed(bytes) => f.debug_tuple("Borrowed").field(&BStr::new(bytes)).finish(),
            TextSpan::Owned(buffer) => f
                .debug_tuple("Owned")
                .field(&BStr::new(buffer.as_bytes()))
                .finish(),
        }
    }
}

impl Serialize for TextSpan<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_push_on_borrowed_copies_first() {
        let source = b"div".to_vec();
        let mut span = TextSpan::borrowed(&source);
        assert!(!span.is_owned());

        span.push(b's').unwrap();

        assert!(span.is_owned());
        assert_eq!(span, "divs");
        assert_eq!(source, b"div");
    }

    #[test]
    fn test_set_from_literal_borrows() {
        let mut span = TextSpan::with_capacity(4).unwrap();
        span.push(b'x').unwrap();
        span.set_from_literal(b"goober");

        assert!(!span.is_owned());
        assert_eq!(span.as_bytes(), b"goober");
    }

    #[test]
    fn test_equality_is_by_content() {
        let owned = TextSpan::copied(b"h1").unwrap();
        let borrowed = TextSpan::from("h1");

        assert_eq!(owned, borrowed);
        assert_ne!(owned, TextSpan::from("h"));
        assert_eq!(TextSpan::default(), TextSpan::from(""));
    }

    #[test]
    fn test_hash_lookup_by_bytes() {
        let mut map: HashMap<TextSpan<'static>, usize> = HashMap::new();
        map.insert(TextSpan::from(String::from("<")), 0);
        map.insert(TextSpan::from("h1"), 1);

        assert_eq!(map.get(b"<".as_slice()), Some(&0));
        assert_eq!(map.get(b"h1".as_slice()), Some(&1));
        assert_eq!(map.get(b"h2".as_slice()), None);
    }

    #[test]
    fn test_fit_keeps_content() {
        let mut span = TextSpan::with_capacity(64).unwrap();
        for byte in b"abc" {
            span.push(*byte).unwrap();
        }
        span.fit();
        assert_eq!(span, "abc");
    }

    #[test]
    fn test_into_owned_detaches() {
        let text = String::from("float");
        let owned = TextSpan::from(text.as_str()).into_owned().unwrap();
        drop(text);
        assert!(owned.is_owned());
        assert_eq!(owned.to_str(), Some("float"));
    }

    #[test]
    fn test_display_is_lossy() {
        let span = TextSpan::borrowed(b"a\xffb");
        assert_eq!(span.to_string(), "a\u{FFFD}b");
        assert_eq!(span.to_str(), None);
        assert_eq!(format!("{:?}", TextSpan::from("<")), "Borrowed(\"<\")");
    }

    #[test]
    fn test_error_code() {
        let error = TextError::OutOfMemory { requested: 8 };
        assert_eq!(error.error_code().as_str(), "ERR003");
    }
}
