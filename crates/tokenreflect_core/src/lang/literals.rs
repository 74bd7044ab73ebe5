//! Literal words.
//!
//! PHP tokenizes `true`, `false` and `null` as ordinary identifiers and gives them meaning only at compile time.
//! Value classification treats them as literals instead of constant references.
//!
//! ## Examples
//! ```rust
//! use tokenreflect_core::lang::literals::{self, LiteralWord};
//!
//! assert_eq!(literals::from_str("TRUE"), Some(LiteralWord::True));
//! assert_eq!(literals::from_str("FOO"), None);
//! ```

/// One of PHP's three literal words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralWord {
    True,
    False,
    Null,
}

/// Lookup by spelling, ignoring ASCII case.
pub fn from_str(s: &str) -> Option<LiteralWord> {
    if s.eq_ignore_ascii_case("true") {
        Some(LiteralWord::True)
    } else if s.eq_ignore_ascii_case("false") {
        Some(LiteralWord::False)
    } else if s.eq_ignore_ascii_case("null") {
        Some(LiteralWord::Null)
    } else {
        None
    }
}

/// Return `true` if `s` is `true`, `false` or `null` in any case.
pub fn is_literal_word(s: &str) -> bool {
    from_str(s).is_some()
}
