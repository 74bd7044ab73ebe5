//! Syntax-level errors: lexing failures and running off the end of a token stream.

use miette::Diagnostic;
use thiserror::Error;

/// An error raised while tokenizing source text or walking a token stream.
///
/// Every variant carries the 1-based source line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SyntaxError {
    #[error("unexpected character {found:?} on line {line}")]
    #[diagnostic(code(tokenreflect::syntax::unexpected_character))]
    UnexpectedCharacter { found: char, line: usize },

    #[error("unterminated {what} starting on line {line}")]
    #[diagnostic(code(tokenreflect::syntax::unterminated))]
    Unterminated { what: &'static str, line: usize },

    #[error("malformed heredoc header on line {line}")]
    #[diagnostic(
        code(tokenreflect::syntax::heredoc),
        help("a heredoc starts with `<<<IDENT`, `<<<\"IDENT\"` or `<<<'IDENT'` followed by a newline")
    )]
    MalformedHeredoc { line: usize },

    #[error("unexpected end of token stream after line {line}")]
    #[diagnostic(code(tokenreflect::syntax::unexpected_end))]
    UnexpectedEndOfStream { line: usize },
}

impl SyntaxError {
    /// Source line the error was detected on.
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::UnexpectedCharacter { line, .. }
            | SyntaxError::Unterminated { line, .. }
            | SyntaxError::MalformedHeredoc { line }
            | SyntaxError::UnexpectedEndOfStream { line } => *line,
        }
    }
}
