//! Shared syntax layer for tokenreflect: PHP token model, lexer, token stream and syntax diagnostics.
//!
//! The lexer stands in for PHP's own tokenizer. It is lossless: every byte of the input lands in exactly one token,
//! whitespace and comments included, so concatenating token texts reproduces the source. Skipping trivia is the job
//! of [`stream::TokenStream`] and its callers, not of the lexer.
//!
//! ## Notes
//! - This crate is "syntax-only": it does not build declarations or resolve names.
//! - Vocabulary identity (keywords/operators/punctuation) comes from `tokenreflect_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use tokenreflect_syntax::lexer::{self, TokenKind};
//! use tokenreflect_syntax::stream::TokenStream;
//!
//! let tokens = lexer::lex("<?php const FOO = 1;").unwrap();
//! let mut stream = TokenStream::new(tokens);
//! stream.skip_whitespace_and_comments();
//! assert_eq!(stream.current().unwrap().kind, TokenKind::OpenTag);
//! ```

pub mod diagnostics;
pub mod lexer;
pub mod stream;
pub mod token_helpers;
