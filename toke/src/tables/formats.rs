//! Standard format predicates
//!
//! Each predicate inspects raw bytes and is false for empty input. Only ASCII
//! letters and digits are classified.

use serde::{Deserialize, Serialize};

/// Digits only
pub fn is_integer(text: &[u8]) -> bool {
    !text.is_empty() && text.iter().all(u8::is_ascii_digit)
}

/// Digits with at most one `.` anywhere, so integers and a lone `.` also pass
pub fn is_float(text: &[u8]) -> bool {
    let mut seen_point = false;
    for &byte in text {
        if byte == b'.' {
            if seen_point {
                return false;
            }
            seen_point = true;
        } else if !byte.is_ascii_digit() {
            return false;
        }
    }
    !text.is_empty()
}

pub fn is_number(text: &[u8]) -> bool {
    is_integer(text) || is_float(text)
}

/// Hex digits with an optional `x`/`X` at the start or right after a leading `0`
pub fn is_hex(text: &[u8]) -> bool {
    let mut seen_x = false;
    for (index, &byte) in text.iter().enumerate() {
        if byte == b'x' || byte == b'X' {
            let allowed_here = index == 0 || (index == 1 && text[0] == b'0');
            if seen_x || !allowed_here {
                return false;
            }
            seen_x = true;
        } else if !byte.is_ascii_hexdigit() {
            return false;
        }
    }
    !text.is_empty()
}

pub fn is_alphabetic(text: &[u8]) -> bool {
    !text.is_empty() && text.iter().all(u8::is_ascii_alphabetic)
}

pub fn is_alphanumeric(text: &[u8]) -> bool {
    !text.is_empty() && text.iter().all(u8::is_ascii_alphanumeric)
}

/// Built-in predicates addressable by name in token definition files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardFormat {
    Integer,
    Float,
    Number,
    Hex,
    Alphabetic,
    Alphanumeric,
}

impl StandardFormat {
    pub fn predicate(self) -> fn(&[u8]) -> bool {
        match self {
            StandardFormat::Integer => is_integer,
            StandardFormat::Float => is_float,
            StandardFormat::Number => is_number,
            StandardFormat::Hex => is_hex,
            StandardFormat::Alphabetic => is_alphabetic,
            StandardFormat::Alphanumeric => is_alphanumeric,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StandardFormat::Integer => "integer",
            StandardFormat::Float => "float",
            StandardFormat::Number => "number",
            StandardFormat::Hex => "hex",
            StandardFormat::Alphabetic => "alphabetic",
            StandardFormat::Alphanumeric => "alphanumeric",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_rejected_everywhere() {
        for format in [
            StandardFormat::Integer,
            StandardFormat::Float,
            StandardFormat::Number,
            StandardFormat::Hex,
            StandardFormat::Alphabetic,
            StandardFormat::Alphanumeric,
        ] {
            assert!(!format.predicate()(b""), "{} accepted empty", format.as_str());
        }
    }

    #[test]
    fn test_is_integer() {
        assert!(is_integer(b"42"));
        assert!(is_integer(b"007"));
        assert!(!is_integer(b"4.2"));
        assert!(!is_integer(b"-1"));
        assert!(!is_integer(b"4a"));
    }

    #[test]
    fn test_is_float() {
        assert!(is_float(b"3.14"));
        assert!(is_float(b"42"));
        assert!(is_float(b".5"));
        assert!(is_float(b"5."));
        assert!(is_float(b"."));
        assert!(!is_float(b"1.2.3"));
        assert!(!is_float(b"1e5"));
    }

    #[test]
    fn test_is_number() {
        assert!(is_number(b"12"));
        assert!(is_number(b"1.5"));
        assert!(!is_number(b"1..5"));
    }

    #[test]
    fn test_is_hex() {
        assert!(is_hex(b"ff"));
        assert!(is_hex(b"DEADbeef"));
        assert!(is_hex(b"0x1F"));
        assert!(is_hex(b"0X1f"));
        assert!(is_hex(b"x1f"));
        assert!(is_hex(b"x"));
        assert!(is_hex(b"0x"));
        assert!(!is_hex(b"1x2"));
        assert!(!is_hex(b"0x1x"));
        assert!(!is_hex(b"00x1"));
        assert!(!is_hex(b"0g"));
    }

    #[test]
    fn test_is_alphabetic_and_alphanumeric() {
        assert!(is_alphabetic(b"goober"));
        assert!(!is_alphabetic(b"h1"));
        assert!(is_alphanumeric(b"h1"));
        assert!(!is_alphanumeric(b"h-1"));
        assert!(!is_alphabetic("é".as_bytes()));
    }

    #[test]
    fn test_standard_format_names() {
        let format: StandardFormat = serde_json::from_str("\"alphanumeric\"").unwrap();
        assert_eq!(format, StandardFormat::Alphanumeric);
        assert_eq!(StandardFormat::Hex.as_str(), "hex");
        assert!(StandardFormat::Hex.predicate()(b"0xff"));
    }
}
