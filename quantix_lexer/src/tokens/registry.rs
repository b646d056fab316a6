//! Name to category mapping for one rule set
use super::token::TokenType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TypeEntry {
    name: String,
    suppress: bool,
}

/// Maps rule names to token categories and records which categories a
/// downstream consumer should hide.
///
/// Every registry starts with `Error`, `EOF`, `tokid`, `char_lit` and
/// `string_lit` at the values of the matching [`TokenType`] constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
    by_name: BTreeMap<String, TokenType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::new(),
            by_name: BTreeMap::new(),
        };
        for name in ["Error", "EOF", "tokid", "char_lit", "string_lit"] {
            registry.register(name, false);
        }
        registry
    }

    /// Category for `name`, allocating one if the name is new. Registering an
    /// existing name returns its category and overwrites its suppress flag.
    pub fn register(&mut self, name: &str, suppress: bool) -> TokenType {
        if let Some(&typ) = self.by_name.get(name) {
            self.entries[typ.index()].suppress = suppress;
            return typ;
        }

        let typ = TokenType(self.entries.len() as u32);
        self.entries.push(TypeEntry {
            name: name.to_string(),
            suppress,
        });
        self.by_name.insert(name.to_string(), typ);
        typ
    }

    pub fn lookup(&self, name: &str) -> Option<TokenType> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, typ: TokenType) -> Option<&str> {
        self.entries.get(typ.index()).map(|e| e.name.as_str())
    }

    /// Name for display, falling back to the numeric form for unknown categories
    pub fn display_name(&self, typ: TokenType) -> String {
        self.name(typ)
            .map(str::to_string)
            .unwrap_or_else(|| typ.to_string())
    }

    pub fn is_suppressed(&self, typ: TokenType) -> bool {
        self.entries
            .get(typ.index())
            .map(|e| e.suppress)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All categories in allocation order as `(type, name, suppress)`
    pub fn iter(&self) -> impl Iterator<Item = (TokenType, &str, bool)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (TokenType(i as u32), e.name.as_str(), e.suppress))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names_match_constants() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.lookup("Error"), Some(TokenType::ERROR));
        assert_eq!(registry.lookup("EOF"), Some(TokenType::EOF));
        assert_eq!(registry.lookup("tokid"), Some(TokenType::TOK_ID));
        assert_eq!(registry.lookup("char_lit"), Some(TokenType::CHAR_LIT));
        assert_eq!(registry.lookup("string_lit"), Some(TokenType::STRING_LIT));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_register_allocates_in_order() {
        let mut registry = TypeRegistry::new();
        let colon = registry.register(":", false);
        let comment = registry.register("line_comment", true);

        assert_eq!(colon, TokenType(5));
        assert_eq!(comment, TokenType(6));
        assert_eq!(registry.name(comment), Some("line_comment"));
        assert!(registry.is_suppressed(comment));
        assert!(!registry.is_suppressed(colon));
    }

    #[test]
    fn test_reregister_updates_suppress() {
        let mut registry = TypeRegistry::new();
        let first = registry.register("ws", false);
        let second = registry.register("ws", true);

        assert_eq!(first, second);
        assert!(registry.is_suppressed(first));
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_unknown_type_display() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.display_name(TokenType(99)), "T_99");
        assert!(!registry.is_suppressed(TokenType(99)));
    }

    #[test]
    fn test_serde_round_trip_keeps_lookup() {
        let mut registry = TypeRegistry::new();
        registry.register("nt", false);
        let json = serde_json::to_string(&registry).unwrap();
        let restored: TypeRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.lookup("nt"), registry.lookup("nt"));
    }
}
