//! Reflection errors.
//!
//! Three families share one enum:
//! - structural (`UnexpectedEndOfStream`, `MalformedDeclaration`, `Syntax`) abort the file being registered,
//! - resolution (`SymbolNotFound`, `CircularConstantReference`, `UnsupportedExpression`, `InvalidLiteral`,
//!   `ResolutionDepthExceeded`) are returned by the accessor that triggered them,
//! - consistency (`DuplicateDeclaration`, `CircularInheritance`) surface at the point of conflict.

use miette::Diagnostic;
use thiserror::Error;
use tokenreflect_syntax::diagnostics::SyntaxError;

use crate::broker::SymbolKind;

/// An error raised while building, registering or resolving declarations.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ReflectionError {
    #[error("unexpected end of token stream after line {line}")]
    #[diagnostic(code(tokenreflect::unexpected_end))]
    UnexpectedEndOfStream { line: usize },

    #[error("malformed declaration on line {line}: {message}")]
    #[diagnostic(code(tokenreflect::malformed_declaration))]
    MalformedDeclaration { message: String, line: usize },

    #[error("{kind} '{name}' was not found")]
    #[diagnostic(
        code(tokenreflect::symbol_not_found),
        help("only declarations from files registered with the same broker can be resolved")
    )]
    SymbolNotFound { kind: SymbolKind, name: String },

    #[error("{kind} '{name}' is already declared")]
    #[diagnostic(code(tokenreflect::duplicate_declaration))]
    DuplicateDeclaration { kind: SymbolKind, name: String },

    #[error("circular constant reference: {chain}")]
    #[diagnostic(code(tokenreflect::circular_reference))]
    CircularConstantReference { chain: String },

    #[error("class '{class}' is part of an inheritance cycle")]
    #[diagnostic(code(tokenreflect::circular_inheritance))]
    CircularInheritance { class: String },

    #[error("cannot statically evaluate '{definition}'")]
    #[diagnostic(
        code(tokenreflect::unsupported_expression),
        help("only literals and references to constants can be evaluated")
    )]
    UnsupportedExpression { definition: String },

    #[error("invalid literal '{definition}': {reason}")]
    #[diagnostic(code(tokenreflect::invalid_literal))]
    InvalidLiteral { definition: String, reason: String },

    #[error("invalid name '{name}'")]
    #[diagnostic(code(tokenreflect::invalid_name))]
    InvalidName { name: String },

    #[error("resolving '{name}' exceeded the maximum depth of {limit}")]
    #[diagnostic(code(tokenreflect::resolution_depth))]
    ResolutionDepthExceeded { name: String, limit: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(SyntaxError),
}

impl ReflectionError {
    pub(crate) fn malformed(message: impl Into<String>, line: usize) -> Self {
        ReflectionError::MalformedDeclaration {
            message: message.into(),
            line,
        }
    }

    pub(crate) fn not_found(kind: SymbolKind, name: impl Into<String>) -> Self {
        ReflectionError::SymbolNotFound {
            kind,
            name: name.into(),
        }
    }
}

impl From<SyntaxError> for ReflectionError {
    fn from(err: SyntaxError) -> Self {
        match err {
            SyntaxError::UnexpectedEndOfStream { line } => ReflectionError::UnexpectedEndOfStream { line },
            other => ReflectionError::Syntax(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_stream_is_lifted_out_of_syntax_errors() {
        let err: ReflectionError = SyntaxError::UnexpectedEndOfStream { line: 4 }.into();
        assert_eq!(err, ReflectionError::UnexpectedEndOfStream { line: 4 });

        let err: ReflectionError = SyntaxError::MalformedHeredoc { line: 2 }.into();
        assert!(matches!(err, ReflectionError::Syntax(SyntaxError::MalformedHeredoc { line: 2 })));
    }

    #[test]
    fn test_messages_name_the_symbol() {
        let err = ReflectionError::not_found(SymbolKind::ClassConstant, "N\\A::C");
        assert_eq!(err.to_string(), "class constant 'N\\A::C' was not found");
    }
}
