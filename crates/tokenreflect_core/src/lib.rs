//! Provide the canonical PHP vocabulary shared by the tokenreflect lexer, parser and resolver.
//!
//! This crate is intentionally small and dependency-free. It holds registry tables only: stable IDs plus the
//! spellings and metadata tooling needs.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, and no parser-specific types.
//! - PHP keywords are matched case-insensitively; operators and punctuation are matched exactly.

pub mod lang;
