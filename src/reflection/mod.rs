//! Reflection records built from declarations.
//!
//! Ownership is a tree: a [`ReflectionFile`] owns its [`FileNamespace`] blocks, which own their classes, functions
//! and constants; a [`ReflectionClass`] owns its members; functions and methods own their parameters. Every
//! cross-reference (parent class, interfaces, traits, constant references) is stored as a fully-qualified *name*
//! and resolved through the [`crate::Broker`] on demand.

pub mod class;
pub mod constant;
pub mod file;
pub mod function;
pub mod method;
pub mod namespace;
pub mod parameter;
pub mod property;

use std::fmt;
use std::rc::Rc;

use tokenreflect_core::lang::types;

pub use class::{ClassKind, ReflectionClass};
pub use constant::ReflectionConstant;
pub use file::{FileNamespace, ReflectionFile};
pub use function::{FunctionLike, FunctionSignature, ReflectionFunction, StaticVariable};
pub use method::ReflectionMethod;
pub use namespace::ReflectionNamespace;
pub use parameter::ReflectionParameter;
pub use property::ReflectionProperty;

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        })
    }
}

/// Where a declaration lives in its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file_name: Rc<str>,
    /// Line of the first token, modifiers included.
    pub start_line: usize,
    /// Line of the closing `}` or `;`.
    pub end_line: usize,
    /// Raw text of the docblock directly preceding the declaration.
    pub doc_comment: Option<String>,
}

/// A type declaration on a parameter, property or return value.
///
/// Class names are resolved to FQNs; builtin types and `self`/`static`/`parent` are kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHint {
    pub(crate) written: String,
    pub(crate) types: Vec<String>,
    pub(crate) nullable: bool,
    pub(crate) intersection: bool,
}

impl TypeHint {
    /// The hint as it appears in the source (`?Foo`, `int|string`).
    pub fn written(&self) -> &str {
        &self.written
    }

    /// Member types of a union or intersection, or the single type.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// `?T` shorthand was used.
    pub fn is_nullable_shorthand(&self) -> bool {
        self.nullable
    }

    pub fn is_union(&self) -> bool {
        self.types.len() > 1 && !self.intersection
    }

    pub fn is_intersection(&self) -> bool {
        self.intersection
    }

    /// Return `true` if `null` satisfies this hint.
    pub fn allows_null(&self) -> bool {
        self.nullable
            || self
                .types
                .iter()
                .any(|t| t.eq_ignore_ascii_case("null") || t.eq_ignore_ascii_case("mixed"))
    }

    /// The single non-builtin type of this hint, if it names exactly one class (`?Foo` counts).
    pub fn class_name(&self) -> Option<&str> {
        match self.single() {
            Some(t) if !types::is_builtin(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        self.single().is_some_and(|t| t.eq_ignore_ascii_case("array"))
    }

    pub fn is_callable(&self) -> bool {
        self.single().is_some_and(|t| t.eq_ignore_ascii_case("callable"))
    }

    fn single(&self) -> Option<&str> {
        match self.types.as_slice() {
            [t] => Some(t.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for TypeHint {
    /// Resolved spelling (`?N\Foo`, `N\A|null`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            f.write_str("?")?;
        }
        let separator = if self.intersection { "&" } else { "|" };
        f.write_str(&self.types.join(separator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint(types: &[&str], nullable: bool) -> TypeHint {
        TypeHint {
            written: String::new(),
            types: types.iter().map(|t| t.to_string()).collect(),
            nullable,
            intersection: false,
        }
    }

    #[test]
    fn test_type_hint_queries() {
        let h = hint(&["N\\Foo"], true);
        assert_eq!(h.class_name(), Some("N\\Foo"));
        assert!(h.allows_null());
        assert_eq!(h.to_string(), "?N\\Foo");

        let h = hint(&["int", "null"], false);
        assert!(h.is_union());
        assert!(h.allows_null());
        assert_eq!(h.class_name(), None);
        assert_eq!(h.to_string(), "int|null");

        assert!(hint(&["Array"], false).is_array());
        assert!(hint(&["callable"], false).is_callable());
        assert!(!hint(&["string"], false).allows_null());
    }
}
