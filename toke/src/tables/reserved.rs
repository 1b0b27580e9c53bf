//! Reserved token table: ordered (type name, literal) pairs with exact lookup

use crate::text::TextSpan;
use crate::tokens::TokenType;
use std::collections::HashMap;

/// One registered reserved token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedEntry {
    pub token_type: TokenType,
    pub literal: TextSpan<'static>,
}

impl ReservedEntry {
    pub fn new(name: impl Into<TextSpan<'static>>, literal: impl Into<TextSpan<'static>>) -> Self {
        Self {
            token_type: TokenType::typed(name),
            literal: literal.into(),
        }
    }

    pub fn is_untyped(&self) -> bool {
        self.token_type.is_untyped()
    }
}

/// Returned by lookups on a table whose sentinel was never installed
static UNTYPED_ENTRY: ReservedEntry = ReservedEntry {
    token_type: TokenType::Untyped,
    literal: TextSpan::Borrowed(&[]),
};

/// Reserved tokens in registration order.
///
/// `entries` is the source of truth; `index` maps each literal to the first
/// entry registered with it, which is exactly what a linear scan would find.
#[derive(Debug, Clone)]
pub struct ReservedTokenTable {
    entries: Vec<ReservedEntry>,
    index: HashMap<TextSpan<'static>, usize>,
    single_byte: [bool; 256],
    sentinel: Option<usize>,
}

impl ReservedTokenTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            single_byte: [false; 256],
            sentinel: None,
        }
    }

    /// Append an entry. Duplicates are kept; lookups return the first one.
    pub fn register(
        &mut self,
        name: impl Into<TextSpan<'static>>,
        literal: impl Into<TextSpan<'static>>,
    ) {
        self.push_entry(ReservedEntry::new(name, literal));
    }

    /// Add the implicit untyped entry with an empty literal, once
    pub fn install_sentinel(&mut self) {
        if self.has_type_name(&TokenType::Untyped) {
            return;
        }
        self.sentinel = Some(self.entries.len());
        self.push_entry(UNTYPED_ENTRY.clone());
    }

    fn push_entry(&mut self, entry: ReservedEntry) {
        let position = self.entries.len();
        if let [byte] = entry.literal.as_bytes() {
            if !entry.is_untyped() {
                self.single_byte[*byte as usize] = true;
            }
        }
        self.index.entry(entry.literal.clone()).or_insert(position);
        self.entries.push(entry);
    }

    /// First entry whose literal equals `candidate`, else the untyped sentinel
    pub fn lookup(&self, candidate: &[u8]) -> &ReservedEntry {
        self.index
            .get(candidate)
            .and_then(|&position| self.entries.get(position))
            .unwrap_or_else(|| self.sentinel_entry())
    }

    fn sentinel_entry(&self) -> &ReservedEntry {
        self.sentinel
            .and_then(|position| self.entries.get(position))
            .unwrap_or(&UNTYPED_ENTRY)
    }

    /// Whether `byte` on its own is a reserved token
    pub fn is_reserved_byte(&self, byte: u8) -> bool {
        self.single_byte[byte as usize]
    }

    pub fn has_type_name(&self, token_type: &TokenType) -> bool {
        self.entries.iter().any(|e| e.token_type == *token_type)
    }

    /// Whether an identical (type, literal) entry is registered
    pub fn has_entry(&self, entry: &ReservedEntry) -> bool {
        self.entries.iter().any(|e| e == entry)
    }

    pub fn has_literal(&self, literal: &[u8]) -> bool {
        self.index.contains_key(literal)
    }

    pub fn entries(&self) -> &[ReservedEntry] {
        &self.entries
    }

    /// Registered entries, not counting the sentinel
    pub fn len(&self) -> usize {
        self.entries.len() - usize::from(self.sentinel.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn fit(&mut self) {
        self.entries.shrink_to_fit();
        self.index.shrink_to_fit();
    }
}

impl Default for ReservedTokenTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html_table() -> ReservedTokenTable {
        let mut table = ReservedTokenTable::new();
        table.install_sentinel();
        table.register("OPEN TAG", "<");
        table.register("CLOSE TAG", ">");
        table.register("HEADER 1", "h1");
        table
    }

    #[test]
    fn test_lookup_exact_match() {
        let table = html_table();

        assert_eq!(table.lookup(b"<").token_type, TokenType::typed("OPEN TAG"));
        assert_eq!(table.lookup(b"h1").token_type, TokenType::typed("HEADER 1"));
        assert!(table.lookup(b"h").is_untyped());
        assert!(table.lookup(b"h12").is_untyped());
    }

    #[test]
    fn test_lookup_never_fails() {
        let empty = ReservedTokenTable::new();
        let entry = empty.lookup(b"anything");
        assert!(entry.is_untyped());
        assert!(entry.literal.is_empty());

        assert!(html_table().lookup(b"").is_untyped());
    }

    #[test]
    fn test_first_registered_wins() {
        let mut table = ReservedTokenTable::new();
        table.register("FIRST", "=");
        table.register("SECOND", "=");

        assert_eq!(table.lookup(b"=").token_type, TokenType::typed("FIRST"));
        assert_eq!(table.entries().len(), 2);
    }

    #[test]
    fn test_sentinel_is_installed_once() {
        let mut table = html_table();
        let before = table.entries().len();

        table.install_sentinel();

        assert_eq!(table.entries().len(), before);
        assert!(table.has_type_name(&TokenType::Untyped));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_reserved_bytes() {
        let table = html_table();

        assert!(table.is_reserved_byte(b'<'));
        assert!(table.is_reserved_byte(b'>'));
        assert!(!table.is_reserved_byte(b'h'));
        assert!(!table.is_reserved_byte(b' '));
    }

    #[test]
    fn test_membership_queries() {
        let table = html_table();

        assert!(table.has_type_name(&TokenType::typed("HEADER 1")));
        assert!(!table.has_type_name(&TokenType::typed("FOOTER")));
        assert!(table.has_entry(&ReservedEntry::new("OPEN TAG", "<")));
        assert!(!table.has_entry(&ReservedEntry::new("OPEN TAG", ">")));
        assert!(table.has_literal(b"h1"));
        assert!(!table.has_literal(b"h2"));
    }

    #[test]
    fn test_owned_and_borrowed_registrations_match_alike() {
        let mut table = ReservedTokenTable::new();
        table.register(String::from("SEMICOLON"), String::from(";"));

        assert_eq!(table.lookup(b";").token_type, TokenType::typed("SEMICOLON"));

        table.fit();
        assert!(table.is_reserved_byte(b';'));
    }
}
