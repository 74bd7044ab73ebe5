//! Token types for the PHP lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words and magic constants
//! - `Operator(OperatorId)` for operators
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - Every token keeps its exact source spelling in [`Token::text`]; the kind never replaces the text.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use tokenreflect_core::lang::keywords::{self, KeywordId};
use tokenreflect_core::lang::operators::OperatorId;
use tokenreflect_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Names and literals ==========
    /// Bare identifier (`Foo`, `true`, `null`, `strlen`).
    Ident,
    /// `$name`
    Variable,
    Int,
    Float,
    /// Quoted string, heredoc or nowdoc; the text keeps its delimiters.
    String,

    // ========== Trivia ==========
    Whitespace,
    Comment,
    DocComment,
    /// `#[...]` attribute group, kept whole.
    Attribute,

    // ========== Template boundaries ==========
    OpenTag,
    OpenTagWithEcho,
    CloseTag,
    InlineHtml,
}

/// A token with its kind, exact spelling and the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// Line the token ends on (multi-line comments and strings span several).
    pub fn end_line(&self) -> usize {
        self.line + self.text.matches('\n').count()
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
