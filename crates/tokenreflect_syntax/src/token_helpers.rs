//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to make it easy to work with ID-based
//! tokens.

use crate::lexer::{Token, TokenKind};
use tokenreflect_core::lang::keywords::{self, KeywordId};
use tokenreflect_core::lang::operators::OperatorId;
use tokenreflect_core::lang::punctuation::PunctuationId;

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return `true` if this is the given operator.
    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` for whitespace, comments, docblocks and attributes.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment | TokenKind::Attribute
        )
    }

    /// Return `true` for a modifier keyword (`public`, `static`, `final`, ...).
    pub fn is_modifier(&self) -> bool {
        self.keyword_id().is_some_and(keywords::is_modifier)
    }

    /// Return `true` for literal tokens (numbers and strings).
    pub fn is_literal(&self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Float | TokenKind::String)
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.punctuation_id()`.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }

    /// Return `true` if this token is trivia.
    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }
}
