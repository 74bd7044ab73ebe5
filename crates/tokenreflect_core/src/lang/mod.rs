//! PHP vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: reserved keywords, magic constants, operators,
//! punctuation and builtin type names.
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `PunctuationId`) and look up spellings/metadata via
//! registry tables instead of comparing strings at every call site.
//!
//! ## Examples
//! ```rust
//! use tokenreflect_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("CLASS"), Some(KeywordId::Class));
//! assert_eq!(keywords::as_str(KeywordId::Class), "class");
//! ```

pub mod keywords;
pub mod literals;
pub mod operators;
pub mod punctuation;
pub mod types;
