//! Seekable token stream with cursor-relative navigation.
//!
//! A [`TokenStream`] owns the tokens of exactly one source unit and a cursor into them. Declaration builders move the
//! cursor; nothing else is mutable. Trivia (whitespace, comments, docblocks, attributes) stays in the stream so
//! builders can still look back for docblocks; skipping it is explicit.
//!
//! ## Examples
//! ```rust
//! use tokenreflect_core::lang::keywords::KeywordId;
//! use tokenreflect_syntax::{lexer, stream::TokenStream};
//!
//! let mut stream = TokenStream::new(lexer::lex("<?php /** d */ function f() {}").unwrap());
//! stream.advance_significant();
//! assert!(stream.is_keyword(KeywordId::Function));
//! let at = stream.position();
//! assert_eq!(stream.preceding_doc_comment(at).unwrap().text, "/** d */");
//! ```

use crate::diagnostics::SyntaxError;
use crate::lexer::{Token, TokenKind};
use tokenreflect_core::lang::keywords::KeywordId;
use tokenreflect_core::lang::operators::OperatorId;
use tokenreflect_core::lang::punctuation::{self, PunctuationId};

/// Token stream for one file-parse pass.
///
/// ## Notes
/// - Never shared: one stream serves one single-threaded parse.
/// - Queries past the end return `false`/`None`; only [`TokenStream::current`] and
///   [`TokenStream::current_text`] fail, with [`SyntaxError::UnexpectedEndOfStream`].
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    /// Create a stream positioned on the first token.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, position: 0 }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the current token.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor to `position` (clamped to the end of the stream).
    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.tokens.len());
    }

    /// Return `true` once the cursor has moved past the last token.
    pub fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// All tokens of the stream.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The token under the cursor.
    ///
    /// ## Errors
    /// [`SyntaxError::UnexpectedEndOfStream`] when the cursor is past the end.
    pub fn current(&self) -> Result<&Token, SyntaxError> {
        self.tokens
            .get(self.position)
            .ok_or(SyntaxError::UnexpectedEndOfStream { line: self.last_line() })
    }

    /// Spelling of the token under the cursor.
    pub fn current_text(&self) -> Result<&str, SyntaxError> {
        self.current().map(|t| t.text.as_str())
    }

    pub fn current_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.position).map(|t| t.kind)
    }

    /// Line of the current token, or of the last token once past the end.
    pub fn line(&self) -> usize {
        match self.tokens.get(self.position) {
            Some(t) => t.line,
            None => self.last_line(),
        }
    }

    fn last_line(&self) -> usize {
        self.tokens.last().map(Token::end_line).unwrap_or(1)
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Return `true` if the current token is of `kind`.
    pub fn is(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    /// Return `true` if the current token is spelled exactly `text`.
    pub fn is_text(&self, text: &str) -> bool {
        self.tokens.get(self.position).is_some_and(|t| t.text == text)
    }

    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.is(TokenKind::Keyword(id))
    }

    pub fn is_punct(&self, id: PunctuationId) -> bool {
        self.is(TokenKind::Punctuation(id))
    }

    pub fn is_op(&self, id: OperatorId) -> bool {
        self.is(TokenKind::Operator(id))
    }

    // ========================================================================
    // Movement
    // ========================================================================

    /// Move to the next token.
    pub fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Skip trivia starting at the current token (the current token itself is skipped if it is trivia).
    pub fn skip_whitespace_and_comments(&mut self) {
        while self.tokens.get(self.position).is_some_and(Token::is_trivia) {
            self.position += 1;
        }
    }

    /// Move to the next token, then skip trivia.
    pub fn advance_significant(&mut self) {
        self.advance();
        self.skip_whitespace_and_comments();
    }

    /// Index of the first non-trivia token at or after `from`.
    pub fn next_significant_index(&self, from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| !self.tokens[i].is_trivia())
    }

    /// The first non-trivia token after the current one, without moving.
    pub fn peek_significant(&self) -> Option<&Token> {
        self.next_significant_index(self.position + 1).map(|i| &self.tokens[i])
    }

    /// For a current `(`, `[` or `{`, return the index of its matching closing delimiter.
    ///
    /// Returns `None` if the current token is not an opening delimiter or the stream ends before it is closed.
    pub fn find_matching_bracket(&self) -> Option<usize> {
        let open = self.current_kind()?.punctuation_id()?;
        punctuation::closing_of(open)?;

        let mut depth = 0usize;
        for (index, token) in self.tokens.iter().enumerate().skip(self.position) {
            let Some(id) = token.punctuation_id() else {
                continue;
            };
            if punctuation::is_opening(id) {
                depth += 1;
            } else if punctuation::is_closing(id) {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
        }
        None
    }

    /// Nearest docblock before `index`, separated from it only by whitespace and attributes.
    pub fn preceding_doc_comment(&self, index: usize) -> Option<&Token> {
        self.tokens[..index.min(self.tokens.len())]
            .iter()
            .rev()
            .find(|t| !matches!(t.kind, TokenKind::Whitespace | TokenKind::Attribute))
            .filter(|t| t.kind == TokenKind::DocComment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn stream(source: &str) -> TokenStream {
        TokenStream::new(lex(source).unwrap())
    }

    #[test]
    fn test_current_past_end_is_an_error() {
        let mut s = stream("<?php\n");
        s.seek(100);
        assert!(s.at_end());
        assert_eq!(s.current(), Err(SyntaxError::UnexpectedEndOfStream { line: 2 }));
        assert!(!s.is_text(";"));
    }

    #[test]
    fn test_skip_whitespace_and_comments() {
        let mut s = stream("<?php /* a */ // b\n  const");
        s.advance();
        s.skip_whitespace_and_comments();
        assert!(s.is_keyword(KeywordId::Const));
        assert_eq!(s.current_text().unwrap(), "const");
    }

    #[test]
    fn test_find_matching_bracket_tracks_nesting() {
        let mut s = stream("<?php { ( [ ] ) { } } ;");
        s.advance_significant();
        let close = s.find_matching_bracket().unwrap();
        s.seek(close);
        assert!(s.is_punct(PunctuationId::RBrace));
        assert!(s.peek_significant().unwrap().kind.is_punctuation(PunctuationId::Semicolon));
    }

    #[test]
    fn test_find_matching_bracket_unclosed() {
        let mut s = stream("<?php { (");
        s.advance_significant();
        assert_eq!(s.find_matching_bracket(), None);
    }

    #[test]
    fn test_doc_comment_must_be_adjacent() {
        let mut s = stream("<?php /** d */ /* x */ function");
        s.advance_significant();
        while !s.is_keyword(KeywordId::Function) {
            s.advance();
        }
        assert!(s.preceding_doc_comment(s.position()).is_none());
    }

    #[test]
    fn test_doc_comment_skips_attributes() {
        let mut s = stream("<?php /** d */\n#[Attr]\n#[Other(1)] function");
        s.advance_significant();
        while !s.is_keyword(KeywordId::Function) {
            s.advance();
        }
        assert_eq!(s.preceding_doc_comment(s.position()).unwrap().text, "/** d */");
    }
}
