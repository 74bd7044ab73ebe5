//! Punctuation vocabulary.
//!
//! This module defines the non-operator punctuation tokens used by the lexer/parser: delimiters, separators,
//! access/path markers and a few structural markers.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - This module is vocabulary only (spellings + metadata). It does not tokenize source text.
//!
//! ## Examples
//! ```rust
//! use tokenreflect_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str("::"), Some(PunctuationId::DoubleColon));
//! assert_eq!(punctuation::as_str(PunctuationId::Backslash), "\\");
//! ```

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets and braces.
    Delimiter,
    /// Separators like `,` and `;`.
    Separator,
    /// Access/path markers like `::`, `->` and `\`.
    Access,
    /// Misc markers like `?`, `&`, `...`.
    Marker,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    // Separators
    Comma,
    Semicolon,
    Colon,

    // Access / path
    DoubleColon,
    Arrow,
    NullsafeArrow,
    Backslash,
    DoubleArrow,

    // Markers
    Ellipsis,
    Question,
    Amp,
    At,
    Dollar,
    Backtick,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
    pub category: PunctuationCategory,
}

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::Comma, ",", PunctuationCategory::Separator),
    info(PunctuationId::Semicolon, ";", PunctuationCategory::Separator),
    info(PunctuationId::Colon, ":", PunctuationCategory::Separator),
    info(PunctuationId::DoubleColon, "::", PunctuationCategory::Access),
    info(PunctuationId::Arrow, "->", PunctuationCategory::Access),
    info(PunctuationId::NullsafeArrow, "?->", PunctuationCategory::Access),
    info(PunctuationId::Backslash, "\\", PunctuationCategory::Access),
    info(PunctuationId::DoubleArrow, "=>", PunctuationCategory::Access),
    info(PunctuationId::Ellipsis, "...", PunctuationCategory::Marker),
    info(PunctuationId::Question, "?", PunctuationCategory::Marker),
    info(PunctuationId::Amp, "&", PunctuationCategory::Marker),
    info(PunctuationId::At, "@", PunctuationCategory::Marker),
    info(PunctuationId::Dollar, "$", PunctuationCategory::Marker),
    info(PunctuationId::Backtick, "`", PunctuationCategory::Marker),
    info(PunctuationId::LParen, "(", PunctuationCategory::Delimiter),
    info(PunctuationId::RParen, ")", PunctuationCategory::Delimiter),
    info(PunctuationId::LBracket, "[", PunctuationCategory::Delimiter),
    info(PunctuationId::RBracket, "]", PunctuationCategory::Delimiter),
    info(PunctuationId::LBrace, "{", PunctuationCategory::Delimiter),
    info(PunctuationId::RBrace, "}", PunctuationCategory::Delimiter),
];

/// Canonical spelling.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Full metadata for a punctuation token.
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION.iter().find(|p| p.id == id).expect("punctuation info missing")
}

/// Lookup by exact spelling.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

/// For an opening delimiter, return its closing counterpart.
///
/// ## Examples
/// ```rust
/// use tokenreflect_core::lang::punctuation::{closing_of, PunctuationId};
///
/// assert_eq!(closing_of(PunctuationId::LBrace), Some(PunctuationId::RBrace));
/// assert_eq!(closing_of(PunctuationId::Comma), None);
/// ```
pub fn closing_of(id: PunctuationId) -> Option<PunctuationId> {
    match id {
        PunctuationId::LParen => Some(PunctuationId::RParen),
        PunctuationId::LBracket => Some(PunctuationId::RBracket),
        PunctuationId::LBrace => Some(PunctuationId::RBrace),
        _ => None,
    }
}

/// Return `true` for `(`, `[` and `{`.
pub fn is_opening(id: PunctuationId) -> bool {
    closing_of(id).is_some()
}

/// Return `true` for `)`, `]` and `}`.
pub fn is_closing(id: PunctuationId) -> bool {
    matches!(id, PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: PunctuationId, canonical: &'static str, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo { id, canonical, category }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_registry_parity() {
        for p in PUNCTUATION {
            assert_eq!(from_str(p.canonical), Some(p.id));
            assert_eq!(as_str(p.id), p.canonical);
        }
    }

    #[test]
    fn delimiters_pair_up() {
        for p in PUNCTUATION.iter().filter(|p| p.category == PunctuationCategory::Delimiter) {
            assert!(is_opening(p.id) != is_closing(p.id), "{} must be exactly one side", p.canonical);
        }
    }
}
