//! Builtin type names.
//!
//! Type hints naming one of these are never namespace-prefixed or alias-substituted; every other hint names a class.
//!
//! ## Examples
//! ```rust
//! use tokenreflect_core::lang::types;
//!
//! assert!(types::is_builtin("Array"));
//! assert!(types::is_relative_class("parent"));
//! assert!(!types::is_builtin("DateTime"));
//! ```

/// Scalar and pseudo types recognized in type hints (lowercase).
pub const BUILTIN_TYPES: &[&str] = &[
    "array", "callable", "bool", "int", "float", "string", "iterable", "object", "mixed", "void", "null", "never",
    "false", "true", "resource", "boolean", "integer", "double",
];

/// Class names that are relative to the declaring class rather than names of classes.
pub const RELATIVE_CLASS_NAMES: &[&str] = &["self", "static", "parent"];

/// Return `true` if `name` is a builtin type (case-insensitive).
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_TYPES.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// Return `true` for `self`, `static` and `parent` (case-insensitive).
pub fn is_relative_class(name: &str) -> bool {
    RELATIVE_CLASS_NAMES.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// Return `true` if a type-hint spelling must be kept verbatim during name resolution.
pub fn is_reserved_type_name(name: &str) -> bool {
    is_builtin(name) || is_relative_class(name)
}
