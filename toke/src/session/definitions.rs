//! Token definitions loaded from TOML
//!
//! ```toml
//! [[reserved]]
//! name = "OPEN TAG"
//! literal = "<"
//!
//! [[formats]]
//! name = "FLOAT"
//! validator = "float"
//!
//! [[formats]]
//! name = "GOOBER"
//! equals = "goober"
//! ```

use super::error::SessionError;
use crate::log_error;
use crate::tables::StandardFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedDefinition {
    pub name: String,
    pub literal: String,
}

/// A format validator: a standard predicate or an exact text match, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<StandardFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRule<'a> {
    Standard(StandardFormat),
    Equals(&'a str),
}

impl FormatDefinition {
    pub fn standard(name: impl Into<String>, format: StandardFormat) -> Self {
        Self {
            name: name.into(),
            validator: Some(format),
            equals: None,
        }
    }

    pub fn equals(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validator: None,
            equals: Some(text.into()),
        }
    }

    pub fn rule(&self) -> Result<FormatRule<'_>, SessionError> {
        match (self.validator, self.equals.as_deref()) {
            (Some(format), None) => Ok(FormatRule::Standard(format)),
            (None, Some(text)) => Ok(FormatRule::Equals(text)),
            (Some(_), Some(_)) => Err(SessionError::definitions(format!(
                "format '{}' sets both validator and equals",
                self.name
            ))),
            (None, None) => Err(SessionError::definitions(format!(
                "format '{}' needs a validator or an equals text",
                self.name
            ))),
        }
    }
}

/// Reserved tokens and format validators, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenDefinitions {
    pub reserved: Vec<ReservedDefinition>,
    pub formats: Vec<FormatDefinition>,
}

impl TokenDefinitions {
    pub fn from_toml_str(content: &str) -> Result<Self, SessionError> {
        let definitions: Self = toml::from_str(content).map_err(|e| {
            let error = SessionError::definitions(e.message().to_string());
            log_error!(error.error_code(), "Failed to parse token definitions",
                "error" => e.message());
            error
        })?;
        definitions.validate()?;
        Ok(definitions)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            let error =
                SessionError::definitions(format!("failed to read {}: {}", path.display(), e));
            log_error!(error.error_code(), "Failed to read token definitions",
                "path" => path.display(),
                "io_error" => e);
            error
        })?;
        Self::from_toml_str(&content)
    }

    /// Names must be non-empty and every format entry must pick exactly one
    /// rule. Empty literals are allowed; registering one only warns.
    pub fn validate(&self) -> Result<(), SessionError> {
        for reserved in &self.reserved {
            if reserved.name.is_empty() {
                let error = SessionError::definitions(format!(
                    "reserved entry with literal '{}' has an empty name",
                    reserved.literal
                ));
                log_error!(error.error_code(), "Invalid reserved definition",
                    "name" => &reserved.name,
                    "literal" => &reserved.literal);
                return Err(error);
            }
        }

        for format in &self.formats {
            let checked = if format.name.is_empty() {
                Err(SessionError::definitions("format entry has an empty name"))
            } else {
                format.rule().map(|_| ())
            };
            if let Err(error) = checked {
                log_error!(error.error_code(), "Invalid format definition",
                    "format" => &format.name,
                    "error" => &error);
                return Err(error);
            }
        }
        Ok(())
    }

    /// Append `other` after these definitions
    pub fn merge(&mut self, other: TokenDefinitions) {
        self.reserved.extend(other.reserved);
        self.formats.extend(other.formats);
    }

    pub fn is_empty(&self) -> bool {
        self.reserved.is_empty() && self.formats.is_empty()
    }

    /// Tokens for simple HTML documents
    pub fn html() -> Self {
        let reserved = [
            ("OPEN TAG", "<"),
            ("CLOSE TAG", ">"),
            ("SLASH", "/"),
            ("ASSIGNMENT", "="),
            ("QUOTATION", "\""),
            ("SEMICOLON", ";"),
            ("HEADER 1", "h1"),
            ("FLOAT", ""),
        ]
        .into_iter()
        .map(|(name, literal)| ReservedDefinition {
            name: name.to_string(),
            literal: literal.to_string(),
        })
        .collect();

        Self {
            reserved,
            formats: vec![
                FormatDefinition::standard("FLOAT", StandardFormat::Float),
                FormatDefinition::equals("GOOBER", "goober"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_definitions() {
        let definitions = TokenDefinitions::from_toml_str(
            r#"
            [[reserved]]
            name = "OPEN TAG"
            literal = "<"

            [[reserved]]
            name = "HEADER 1"
            literal = "h1"

            [[formats]]
            name = "INTEGER"
            validator = "integer"

            [[formats]]
            name = "GOOBER"
            equals = "goober"
            "#,
        )
        .unwrap();

        assert_eq!(definitions.reserved.len(), 2);
        assert_eq!(definitions.reserved[1].literal, "h1");
        assert_eq!(
            definitions.formats[0].rule().unwrap(),
            FormatRule::Standard(StandardFormat::Integer)
        );
        assert_eq!(definitions.formats[1].rule().unwrap(), FormatRule::Equals("goober"));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let definitions = TokenDefinitions::from_toml_str("").unwrap();
        assert!(definitions.is_empty());
    }

    #[test]
    fn test_format_needs_exactly_one_rule() {
        let both = r#"
            [[formats]]
            name = "X"
            validator = "hex"
            equals = "x"
        "#;
        assert_matches!(
            TokenDefinitions::from_toml_str(both),
            Err(SessionError::Definitions { .. })
        );

        let neither = r#"
            [[formats]]
            name = "X"
        "#;
        assert_matches!(
            TokenDefinitions::from_toml_str(neither),
            Err(SessionError::Definitions { .. })
        );
    }

    #[test]
    fn test_empty_literal_is_accepted() {
        let definitions = TokenDefinitions::from_toml_str(
            r#"
            [[reserved]]
            name = "FLOAT"
            literal = ""

            [[reserved]]
            name = "OPEN"
            literal = "<"
            "#,
        )
        .unwrap();

        assert_eq!(definitions.reserved.len(), 2);
        assert_eq!(definitions.reserved[0].literal, "");
        assert_eq!(definitions.reserved[1].literal, "<");
    }

    #[test]
    fn test_empty_reserved_name_is_rejected() {
        let result = TokenDefinitions::from_toml_str(
            r#"
            [[reserved]]
            name = ""
            literal = "<"
            "#,
        );
        assert_matches!(result, Err(SessionError::Definitions { .. }));
    }

    #[test]
    fn test_unknown_validator_is_rejected() {
        let result = TokenDefinitions::from_toml_str(
            r#"
            [[formats]]
            name = "DATE"
            validator = "date"
            "#,
        );
        assert_matches!(result, Err(SessionError::Definitions { .. }));
    }

    #[test]
    fn test_from_file_and_merge() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[[reserved]]\nname = \"SEMI\"\nliteral = \";\"").unwrap();

        let mut definitions = TokenDefinitions::html();
        definitions.merge(TokenDefinitions::from_file(file.path()).unwrap());

        assert_eq!(definitions.reserved.len(), 9);
        assert_eq!(definitions.reserved[8].name, "SEMI");
        assert_matches!(
            TokenDefinitions::from_file("missing/defs.toml"),
            Err(SessionError::Definitions { .. })
        );
    }

    #[test]
    fn test_demo_file_matches_html_preset() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/html.toml");
        assert_eq!(TokenDefinitions::from_file(path).unwrap(), TokenDefinitions::html());
    }

    #[test]
    fn test_html_preset_round_trips_through_toml() {
        let html = TokenDefinitions::html();
        let text = toml::to_string(&html).unwrap();
        assert_eq!(TokenDefinitions::from_toml_str(&text).unwrap(), html);
    }
}
