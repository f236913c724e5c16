//! Holder identity
//!
//! Registry extracts identify the same person inconsistently: with and
//! without accents, in mixed case, with a formatted or a bare tax id.
//! `HolderKey` folds every spelling of one holder into a single ledger key.

use std::fmt;

use unicode_normalization::UnicodeNormalization;

/// Canonical ledger key for one holder.
///
/// Derived from the tax id when present and non-empty, otherwise from the
/// normalized display name. Two spellings of the same tax id collide.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HolderKey(String);

impl HolderKey {
    /// Derive a key from an optional tax id and a display name.
    pub fn derive(tax_id: Option<&str>, name: &str) -> Self {
        match tax_id.map(normalize_tax_id) {
            Some(id) if !id.is_empty() => HolderKey(id),
            _ => HolderKey(normalize_name(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HolderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Holder({})", self.0)
    }
}

impl fmt::Display for HolderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Uppercase, alphanumeric-only form of a tax id.
///
/// `123.456.789-00` and `12345678900` are the same id.
fn normalize_tax_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Accent-stripped, upper-cased, alphanumeric-and-space form of a name.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_strips_accents() {
        assert_eq!(normalize_name("José da Conceição"), "JOSE DA CONCEICAO");
        assert_eq!(normalize_name("  Antônio  "), "ANTONIO");
    }

    #[test]
    fn test_normalize_name_drops_punctuation() {
        assert_eq!(normalize_name("O'Brien-Souza"), "OBRIENSOUZA");
    }

    #[test]
    fn test_key_prefers_tax_id() {
        let a = HolderKey::derive(Some("123.456.789-00"), "Maria");
        let b = HolderKey::derive(Some("12345678900"), "MARIA SILVA");
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_falls_back_to_name() {
        let a = HolderKey::derive(None, "João Pereira");
        let b = HolderKey::derive(Some("   "), "joao pereira");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "JOAO PEREIRA");
    }

    #[test]
    fn test_distinct_holders_do_not_collide() {
        let a = HolderKey::derive(Some("111"), "Maria");
        let b = HolderKey::derive(Some("222"), "Maria");
        assert_ne!(a, b);
    }
}
