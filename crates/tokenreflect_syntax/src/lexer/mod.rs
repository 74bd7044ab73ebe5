//! Lexer for PHP source files
//!
//! Handles tokenization including:
//! - Template mode (inline HTML outside `<?php ... ?>`)
//! - Keywords (case-insensitive), identifiers and `$variables`
//! - Numeric and string literals (including heredoc/nowdoc)
//! - Operators and punctuation (longest match against the `tokenreflect_core::lang` registries)
//! - Trivia: whitespace, `//`/`#` comments, `/* */` comments, `/** */` docblocks, `#[...]` attributes
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `strings` - Quoted string and heredoc/nowdoc scanning
//! - `numbers` - Numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use crate::diagnostics::SyntaxError;
use tokenreflect_core::lang::keywords::KeywordId;
use tokenreflect_core::lang::punctuation::{self, PunctuationId};
use tokenreflect_core::lang::operators;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Lexer state diagram (simplified):
//
// [Html] → see "<?php" / "<?=" / "<?" → [Php]
// [Php]  → see "?>"                   → [Html]
// [Php]  → see "__halt_compiler" … ";" → rest of file is InlineHtml
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Html,
    Php,
}

/// Lexer for PHP source code.
///
/// Converts source text into a lossless stream of tokens. Positions are tracked as 1-based lines.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    mode: Mode,
    /// Set once `__halt_compiler` has been seen; the next `;` ends PHP code for good.
    halted: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            mode: Mode::Html,
            halted: false,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// ## Errors
    /// Returns the first [`SyntaxError`] encountered (unterminated literal or comment, malformed heredoc header,
    /// or a character PHP does not accept).
    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        while !self.is_at_end() {
            match self.mode {
                Mode::Html => self.scan_inline_html(),
                Mode::Php => self.scan_token()?,
            }
        }
        Ok(self.tokens)
    }

    // ========================================================================
    // Core byte handling
    // ========================================================================

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    /// Emit a token covering `start..self.pos`.
    fn add_token(&mut self, kind: TokenKind, start: usize) {
        let text = &self.source[start..self.pos];
        self.tokens.push(Token::new(kind, text, self.line));
        self.line += text.matches('\n').count();
    }

    fn last_significant_kind(&self) -> Option<TokenKind> {
        self.tokens.iter().rev().map(|t| t.kind).find(|k| !k.is_trivia())
    }

    // ========================================================================
    // Template mode
    // ========================================================================

    fn scan_inline_html(&mut self) {
        let start = self.pos;
        match find_open_tag(self.rest()) {
            Some((offset, tag_len, kind)) => {
                if offset > 0 {
                    self.pos = start + offset;
                    self.add_token(TokenKind::InlineHtml, start);
                }
                let tag_start = self.pos;
                self.pos += tag_len;
                self.add_token(kind, tag_start);
                self.mode = Mode::Php;
            }
            None => {
                self.pos = self.source.len();
                self.add_token(TokenKind::InlineHtml, start);
            }
        }
    }

    // ========================================================================
    // PHP mode
    // ========================================================================

    fn scan_token(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        let Some(b) = self.byte_at(0) else {
            return Ok(());
        };

        match b {
            b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c => {
                while matches!(self.byte_at(0), Some(b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)) {
                    self.pos += 1;
                }
                self.add_token(TokenKind::Whitespace, start);
            }
            b'?' if self.byte_at(1) == Some(b'>') => {
                self.pos += 2;
                // Like PHP, the close tag swallows a single directly following newline.
                if self.rest().starts_with("\r\n") {
                    self.pos += 2;
                } else if self.byte_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
                self.add_token(TokenKind::CloseTag, start);
                self.mode = Mode::Html;
            }
            b'#' if self.byte_at(1) == Some(b'[') => self.scan_attribute(start)?,
            b'#' => self.scan_line_comment(start),
            b'/' if self.byte_at(1) == Some(b'/') => self.scan_line_comment(start),
            b'/' if self.byte_at(1) == Some(b'*') => self.scan_block_comment(start)?,
            b'$' if self.byte_at(1).is_some_and(is_ident_start) => {
                self.pos += 1;
                self.consume_ident_continue();
                self.add_token(TokenKind::Variable, start);
            }
            b'\'' => self.scan_single_quoted(start)?,
            b'"' => self.scan_double_quoted(start)?,
            b'<' if self.rest().starts_with("<<<") => self.scan_heredoc(start)?,
            b'0'..=b'9' => self.scan_number(start),
            b'.' if self.byte_at(1).is_some_and(|c| c.is_ascii_digit()) => self.scan_number(start),
            c if is_ident_start(c) => self.scan_identifier(start),
            _ => self.scan_symbol(start)?,
        }

        if self.halted && self.tokens.last().is_some_and(|t| t.kind.is_punctuation(PunctuationId::Semicolon)) {
            let data_start = self.pos;
            if data_start < self.source.len() {
                self.pos = self.source.len();
                self.add_token(TokenKind::InlineHtml, data_start);
            }
        }
        Ok(())
    }

    fn consume_ident_continue(&mut self) {
        while self.byte_at(0).is_some_and(is_ident_continue) {
            self.pos += 1;
        }
    }

    fn scan_identifier(&mut self, start: usize) {
        self.consume_ident_continue();
        let spelling = &self.source[start..self.pos];

        // After `->`, `?->` and `::` every word is a member name, reserved or not (`Foo::class`, `$x->list`).
        let member_position = matches!(
            self.last_significant_kind(),
            Some(TokenKind::Punctuation(
                PunctuationId::Arrow | PunctuationId::NullsafeArrow | PunctuationId::DoubleColon
            ))
        );

        match keyword_id(spelling) {
            Some(id) if !member_position => {
                if id == KeywordId::HaltCompiler {
                    self.halted = true;
                }
                self.add_token(TokenKind::Keyword(id), start);
            }
            _ => self.add_token(TokenKind::Ident, start),
        }
    }

    fn scan_line_comment(&mut self, start: usize) {
        while let Some(b) = self.byte_at(0) {
            if b == b'\n' || (b == b'?' && self.byte_at(1) == Some(b'>')) {
                break;
            }
            self.pos += 1;
        }
        self.add_token(TokenKind::Comment, start);
    }

    fn scan_block_comment(&mut self, start: usize) -> Result<(), SyntaxError> {
        let is_doc = self.rest().starts_with("/**") && self.byte_at(3).is_some_and(|b| b.is_ascii_whitespace());
        let Some(close) = self.source[start + 2..].find("*/") else {
            return Err(SyntaxError::Unterminated {
                what: "comment",
                line: self.line,
            });
        };
        self.pos = start + 2 + close + 2;
        let kind = if is_doc { TokenKind::DocComment } else { TokenKind::Comment };
        self.add_token(kind, start);
        Ok(())
    }

    fn scan_attribute(&mut self, start: usize) -> Result<(), SyntaxError> {
        self.pos += 1;
        let mut depth = 0usize;
        while let Some(b) = self.byte_at(0) {
            self.pos += 1;
            match b {
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        self.add_token(TokenKind::Attribute, start);
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(SyntaxError::Unterminated {
            what: "attribute",
            line: self.line,
        })
    }

    /// Operators and punctuation, longest spelling first.
    fn scan_symbol(&mut self, start: usize) -> Result<(), SyntaxError> {
        for len in (1..=3).rev() {
            let Some(candidate) = self.rest().get(..len) else {
                continue;
            };
            let kind = if let Some(id) = punctuation::from_str(candidate) {
                TokenKind::Punctuation(id)
            } else if let Some(id) = operators::from_str(candidate) {
                TokenKind::Operator(id)
            } else {
                continue;
            };
            self.pos += len;
            self.add_token(kind, start);
            return Ok(());
        }

        let found = self.rest().chars().next().unwrap_or('\0');
        Err(SyntaxError::UnexpectedCharacter { found, line: self.line })
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Locate the next open tag: `(byte offset, tag length, kind)`.
fn find_open_tag(html: &str) -> Option<(usize, usize, TokenKind)> {
    let mut search_from = 0;
    while let Some(found) = html[search_from..].find("<?") {
        let at = search_from + found;
        let tail = &html[at..];
        if tail.get(..5).is_some_and(|s| s.eq_ignore_ascii_case("<?php")) {
            let next = tail.as_bytes().get(5);
            if next.is_none_or(|b| b.is_ascii_whitespace()) {
                return Some((at, 5, TokenKind::OpenTag));
            }
        } else if tail.starts_with("<?=") {
            return Some((at, 3, TokenKind::OpenTagWithEcho));
        } else {
            return Some((at, 2, TokenKind::OpenTag));
        }
        search_from = at + 2;
    }
    None
}

/// Check if a byte can start an identifier (PHP accepts any byte >= 0x80).
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

/// Check if a byte can continue an identifier.
fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_lexing_is_lossless() {
        let source = "<html><?php\n/** doc */\nnamespace A\\B;\nconst X = [1, 'a' => 2.5];\n?>\ntail";
        let tokens = lex(source).unwrap();
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_template_mode_switches() {
        let tokens = lex("<b><?php echo 1 ?>\n<i>").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::InlineHtml);
        assert_eq!(tokens[1].kind, TokenKind::OpenTag);
        let close = tokens.iter().find(|t| t.kind == TokenKind::CloseTag).unwrap();
        assert_eq!(close.text, "?>\n");
        assert_eq!(tokens.last().unwrap().text, "<i>");
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("<?php CLASS Foo"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Keyword(KeywordId::Class),
                TokenKind::Ident
            ]
        );
    }

    #[test]
    fn test_member_names_are_never_keywords() {
        let ks = kinds("<?php Foo::class; $a->list;");
        assert_eq!(ks[3], TokenKind::Ident);
        assert!(ks.iter().all(|k| *k != TokenKind::Keyword(KeywordId::List)));
    }

    #[test]
    fn test_qualified_names_split_on_backslash() {
        assert_eq!(
            kinds("<?php \\Foo\\Bar"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Punctuation(PunctuationId::Backslash),
                TokenKind::Ident,
                TokenKind::Punctuation(PunctuationId::Backslash),
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_doc_comment_vs_comment() {
        let tokens = lex("<?php /** a */ /**/ /* b */ // c\n# d").unwrap();
        let comments: Vec<_> = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Comment | TokenKind::DocComment))
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            comments,
            vec![
                TokenKind::DocComment,
                TokenKind::Comment,
                TokenKind::Comment,
                TokenKind::Comment,
                TokenKind::Comment
            ]
        );
    }

    #[test]
    fn test_longest_operator_match() {
        let ks = kinds("<?php $a ??= $b <=> ...$c;");
        assert_eq!(
            &ks[2..5],
            &[
                TokenKind::Operator(operators::OperatorId::CoalesceEq),
                TokenKind::Variable,
                TokenKind::Operator(operators::OperatorId::Spaceship),
            ]
        );
    }

    #[test]
    fn test_line_numbers() {
        let tokens = lex("<?php\n/*\n*/\nconst A = 1;").unwrap();
        let konst = tokens.iter().find(|t| t.kind == TokenKind::Keyword(KeywordId::Const)).unwrap();
        assert_eq!(konst.line, 4);
    }

    #[test]
    fn test_attribute_is_single_token() {
        let tokens = lex("<?php #[Attr([1, 2])] function f() {}").unwrap();
        let attr = tokens.iter().find(|t| t.kind == TokenKind::Attribute).unwrap();
        assert_eq!(attr.text, "#[Attr([1, 2])]");
    }

    #[test]
    fn test_unterminated_comment_is_an_error() {
        let err = lex("<?php\n/* open").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::Unterminated {
                what: "comment",
                line: 2
            }
        );
    }

    #[test]
    fn test_halt_compiler_ends_php_code() {
        let tokens = lex("<?php __halt_compiler(); \x01\x02 'junk").unwrap();
        assert_eq!(tokens.last().unwrap().kind, TokenKind::InlineHtml);
    }
}
