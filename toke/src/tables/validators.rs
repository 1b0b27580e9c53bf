//! Format validator table: ordered (type name, predicate) pairs

use super::formats::StandardFormat;
use crate::text::TextSpan;
use crate::tokens::TokenType;
use std::fmt;

pub type FormatPredicate = Box<dyn Fn(&[u8]) -> bool>;

/// A named predicate over token text
pub struct FormatValidator {
    name: TextSpan<'static>,
    predicate: FormatPredicate,
}

impl FormatValidator {
    pub fn new<F>(name: impl Into<TextSpan<'static>>, predicate: F) -> Self
    where
        F: Fn(&[u8]) -> bool + 'static,
    {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn name(&self) -> &TextSpan<'static> {
        &self.name
    }

    pub fn matches(&self, candidate: &[u8]) -> bool {
        (self.predicate)(candidate)
    }
}

impl fmt::Debug for FormatValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Validators in registration order
#[derive(Debug, Default)]
pub struct FormatValidatorTable {
    validators: Vec<FormatValidator>,
}

impl FormatValidatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<TextSpan<'static>>, predicate: F)
    where
        F: Fn(&[u8]) -> bool + 'static,
    {
        self.validators.push(FormatValidator::new(name, predicate));
    }

    pub fn register_standard(&mut self, name: impl Into<TextSpan<'static>>, format: StandardFormat) {
        self.register(name, format.predicate());
    }

    /// Validator that accepts exactly `expected`
    pub fn register_exact(
        &mut self,
        name: impl Into<TextSpan<'static>>,
        expected: impl Into<Vec<u8>>,
    ) {
        let expected = expected.into();
        self.register(name, move |candidate: &[u8]| candidate == expected.as_slice());
    }

    /// First validator accepting `candidate`
    pub fn find(&self, candidate: &[u8]) -> Option<&FormatValidator> {
        self.validators.iter().find(|v| v.matches(candidate))
    }

    /// Type name of the first validator accepting `candidate`, else `Untyped`
    pub fn lookup(&self, candidate: &[u8]) -> TokenType {
        self.find(candidate)
            .map(|v| TokenType::Typed(v.name.clone()))
            .unwrap_or(TokenType::Untyped)
    }

    pub fn names(&self) -> impl Iterator<Item = &TextSpan<'static>> {
        self.validators.iter().map(FormatValidator::name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FormatValidator> {
        self.validators.iter()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn fit(&mut self) {
        self.validators.shrink_to_fit();
    }
}
