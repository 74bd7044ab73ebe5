//! Name resolution: turning names as written into fully-qualified names (FQNs).
//!
//! PHP resolves a name against the namespace block it appears in and that block's `use` imports. The rules for
//! class-like names, in order:
//!
//! 1. A rooted name (`\Foo\Bar`) is already fully qualified and is returned unchanged.
//! 2. A name containing `::` resolves its class part and keeps the member part verbatim.
//! 3. `self`, `static`, `parent` and builtin type names are returned unchanged.
//! 4. `namespace\Foo` resolves against the current namespace.
//! 5. If the first segment matches an import alias (case-insensitive), the alias is substituted.
//! 6. In the global namespace the name is returned unchanged.
//! 7. Otherwise the current namespace is prefixed.
//!
//! Functions and constants follow the same rules for qualified names, but unqualified names consult only the
//! `use function` / `use const` imports and may fall back to the global namespace at runtime.
//!
//! FQNs are written without a leading `\`, except that rooted names keep theirs as written; broker lookups trim it.
//!
//! ## Examples
//! ```rust
//! use tokenreflect::names::{self, AliasTable, ImportKind};
//!
//! let mut aliases = AliasTable::new();
//! aliases.add(ImportKind::Class, "Baz", "Foo\\Bar");
//! assert_eq!(names::resolve("Baz::Y", &aliases, "N").unwrap(), "Foo\\Bar::Y");
//! assert_eq!(names::resolve("Qux", &aliases, "N").unwrap(), "N\\Qux");
//! assert_eq!(names::resolve("\\Qux", &aliases, "N").unwrap(), "\\Qux");
//! ```

use tokenreflect_core::lang::types;

use crate::error::ReflectionError;

pub const NAMESPACE_SEPARATOR: char = '\\';

/// Which import table a `use` statement writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `use Foo\Bar;` (classes and namespaces)
    Class,
    /// `use function Foo\bar;`
    Function,
    /// `use const Foo\BAR;`
    Constant,
}

/// One `use` import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub kind: ImportKind,
    pub alias: String,
    pub name: String,
}

/// Import aliases of one namespace block, in declaration order.
///
/// Class and function aliases match case-insensitively; constant aliases match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    imports: Vec<Import>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import. A leading `\` on `name` is dropped.
    ///
    /// Returns `false` (and leaves the table unchanged) if `alias` is already taken for `kind`.
    pub fn add(&mut self, kind: ImportKind, alias: impl Into<String>, name: impl AsRef<str>) -> bool {
        let alias = alias.into();
        if self.get(kind, &alias).is_some() {
            return false;
        }
        self.imports.push(Import {
            kind,
            alias,
            name: trim_root(name.as_ref()).to_string(),
        });
        true
    }

    /// Look up the FQN imported under `alias`.
    pub fn get(&self, kind: ImportKind, alias: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|i| {
                i.kind == kind
                    && match kind {
                        ImportKind::Constant => i.alias == alias,
                        ImportKind::Class | ImportKind::Function => i.alias.eq_ignore_ascii_case(alias),
                    }
            })
            .map(|i| i.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Import> {
        self.imports.iter()
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}

/// A resolved function or constant name plus the global name PHP would try if it is not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub name: String,
    pub fallback: Option<String>,
}

/// Resolve a class-like name (or `Class::MEMBER`) to its FQN.
///
/// ## Errors
/// [`ReflectionError::InvalidName`] for an empty name or a name with an empty segment.
pub fn resolve(name: &str, aliases: &AliasTable, namespace: &str) -> Result<String, ReflectionError> {
    if let Some((class, member)) = name.split_once("::") {
        if member.is_empty() {
            return Err(invalid(name));
        }
        return Ok(format!("{}::{}", resolve(class, aliases, namespace)?, member));
    }
    validate(name)?;

    if is_rooted(name) || types::is_reserved_type_name(name) {
        return Ok(name.to_string());
    }
    if let Some(rest) = strip_relative_prefix(name) {
        return Ok(qualify(namespace, rest));
    }
    let (first, rest) = split_first(name);
    if let Some(target) = aliases.get(ImportKind::Class, first) {
        return Ok(match rest {
            Some(rest) => format!("{target}{NAMESPACE_SEPARATOR}{rest}"),
            None => target.to_string(),
        });
    }
    Ok(qualify(namespace, name))
}

/// Resolve a constant reference.
///
/// An unqualified name inside a namespace resolves to `namespace\NAME`; with `global_fallback` the global `NAME`
/// is recorded as the fallback.
pub fn resolve_constant(
    name: &str,
    aliases: &AliasTable,
    namespace: &str,
    global_fallback: bool,
) -> Result<ResolvedName, ReflectionError> {
    resolve_symbol(name, aliases, namespace, ImportKind::Constant, global_fallback)
}

fn resolve_symbol(
    name: &str,
    aliases: &AliasTable,
    namespace: &str,
    kind: ImportKind,
    global_fallback: bool,
) -> Result<ResolvedName, ReflectionError> {
    validate(name)?;
    let exact = |name: String| ResolvedName { name, fallback: None };

    if is_rooted(name) {
        return Ok(exact(name.to_string()));
    }
    if let Some(rest) = strip_relative_prefix(name) {
        return Ok(exact(qualify(namespace, rest)));
    }
    if name.contains(NAMESPACE_SEPARATOR) {
        // Qualified: the first segment is a namespace, so class imports apply.
        return Ok(exact(resolve(name, aliases, namespace)?));
    }
    if let Some(target) = aliases.get(kind, name) {
        return Ok(exact(target.to_string()));
    }
    if namespace.is_empty() {
        return Ok(exact(name.to_string()));
    }
    Ok(ResolvedName {
        name: qualify(namespace, name),
        fallback: global_fallback.then(|| name.to_string()),
    })
}

/// Join a namespace and a relative name.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}{NAMESPACE_SEPARATOR}{name}")
    }
}

/// Last segment of a name: `Foo\Bar` → `Bar`.
pub fn short_name(name: &str) -> &str {
    name.rsplit(NAMESPACE_SEPARATOR).next().unwrap_or(name)
}

/// Namespace part of a name: `Foo\Bar` → `Foo`, `Bar` → `""`.
pub fn namespace_of(name: &str) -> &str {
    match trim_root(name).rsplit_once(NAMESPACE_SEPARATOR) {
        Some((namespace, _)) => namespace,
        None => "",
    }
}

pub fn is_rooted(name: &str) -> bool {
    name.starts_with(NAMESPACE_SEPARATOR)
}

/// Drop the leading `\` of a rooted name.
pub fn trim_root(name: &str) -> &str {
    name.strip_prefix(NAMESPACE_SEPARATOR).unwrap_or(name)
}

/// Case-insensitive registry key for classes, functions and namespaces.
pub fn class_key(name: &str) -> String {
    trim_root(name).to_ascii_lowercase()
}

/// Registry key for constants: the namespace part folds case, the short name does not.
pub fn constant_key(name: &str) -> String {
    let name = trim_root(name);
    match name.rsplit_once(NAMESPACE_SEPARATOR) {
        Some((namespace, short)) => format!("{}{NAMESPACE_SEPARATOR}{short}", namespace.to_ascii_lowercase()),
        None => name.to_string(),
    }
}

// --- helpers -----------------------------------------------------------------

fn validate(name: &str) -> Result<(), ReflectionError> {
    let body = trim_root(name);
    if body.is_empty() || body.split(NAMESPACE_SEPARATOR).any(str::is_empty) {
        return Err(invalid(name));
    }
    Ok(())
}

fn invalid(name: &str) -> ReflectionError {
    ReflectionError::InvalidName { name: name.to_string() }
}

fn strip_relative_prefix(name: &str) -> Option<&str> {
    let (first, rest) = split_first(name);
    match rest {
        Some(rest) if first.eq_ignore_ascii_case("namespace") => Some(rest),
        _ => None,
    }
}

fn split_first(name: &str) -> (&str, Option<&str>) {
    match name.split_once(NAMESPACE_SEPARATOR) {
        Some((first, rest)) => (first, Some(rest)),
        None => (name, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> AliasTable {
        let mut aliases = AliasTable::new();
        aliases.add(ImportKind::Class, "Baz", "Foo\\Bar");
        aliases.add(ImportKind::Class, "Lib", "\\Vendor\\Library");
        aliases.add(ImportKind::Function, "helper", "Vendor\\helper");
        aliases.add(ImportKind::Constant, "LIMIT", "Vendor\\LIMIT");
        aliases
    }

    #[test]
    fn test_rooted_names_are_unchanged() {
        assert_eq!(resolve("\\Foo\\Bar", &aliases(), "N").unwrap(), "\\Foo\\Bar");
        assert_eq!(resolve("\\Baz", &aliases(), "N").unwrap(), "\\Baz");
    }

    #[test]
    fn test_alias_substitution() {
        assert_eq!(resolve("Baz", &aliases(), "N").unwrap(), "Foo\\Bar");
        assert_eq!(resolve("baz", &aliases(), "N").unwrap(), "Foo\\Bar");
        assert_eq!(resolve("Lib\\Thing", &aliases(), "N").unwrap(), "Vendor\\Library\\Thing");
    }

    #[test]
    fn test_class_constant_keeps_member() {
        assert_eq!(resolve("Baz::Y", &aliases(), "N").unwrap(), "Foo\\Bar::Y");
        assert_eq!(resolve("Other::Y", &aliases(), "N").unwrap(), "N\\Other::Y");
        assert!(resolve("Other::", &aliases(), "N").is_err());
    }

    #[test]
    fn test_namespace_prefix_and_global() {
        assert_eq!(resolve("Other", &aliases(), "N\\M").unwrap(), "N\\M\\Other");
        assert_eq!(resolve("Other", &aliases(), "").unwrap(), "Other");
        assert_eq!(resolve("namespace\\Other", &aliases(), "N").unwrap(), "N\\Other");
    }

    #[test]
    fn test_reserved_names_are_unchanged() {
        assert_eq!(resolve("self", &aliases(), "N").unwrap(), "self");
        assert_eq!(resolve("int", &aliases(), "N").unwrap(), "int");
        assert_eq!(resolve("Parent::X", &aliases(), "N").unwrap(), "Parent::X");
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(resolve("", &aliases(), "N"), Err(ReflectionError::InvalidName { name: String::new() }));
        assert!(resolve("\\", &aliases(), "N").is_err());
        assert!(resolve("Foo\\\\Bar", &aliases(), "N").is_err());
        assert!(resolve("Foo\\", &aliases(), "N").is_err());
    }

    #[test]
    fn test_constant_resolution() {
        let a = aliases();
        let r = resolve_constant("X", &a, "N", true).unwrap();
        assert_eq!(r.name, "N\\X");
        assert_eq!(r.fallback.as_deref(), Some("X"));

        assert_eq!(resolve_constant("X", &a, "N", false).unwrap().fallback, None);
        assert_eq!(resolve_constant("X", &a, "", true).unwrap().name, "X");
        assert_eq!(resolve_constant("LIMIT", &a, "N", true).unwrap().name, "Vendor\\LIMIT");
        // constant aliases are case-sensitive
        assert_eq!(resolve_constant("limit", &a, "N", true).unwrap().name, "N\\limit");
        assert_eq!(resolve_constant("Baz\\X", &a, "N", true).unwrap().name, "Foo\\Bar\\X");
        assert_eq!(resolve_constant("\\X", &a, "N", true).unwrap().name, "\\X");
    }

    #[test]
    fn test_alias_table_rejects_taken_alias() {
        let mut a = AliasTable::new();
        assert!(a.add(ImportKind::Class, "Foo", "A\\Foo"));
        assert!(!a.add(ImportKind::Class, "foo", "B\\Foo"));
        assert!(a.add(ImportKind::Function, "foo", "B\\foo"));
        assert_eq!(a.len(), 2);
        assert_eq!(a.get(ImportKind::Class, "FOO"), Some("A\\Foo"));
    }

    #[test]
    fn test_name_parts() {
        assert_eq!(short_name("Foo\\Bar"), "Bar");
        assert_eq!(short_name("Bar"), "Bar");
        assert_eq!(namespace_of("\\Foo\\Bar\\Baz"), "Foo\\Bar");
        assert_eq!(namespace_of("Baz"), "");
        assert_eq!(class_key("\\Foo\\Bar"), "foo\\bar");
        assert_eq!(constant_key("Foo\\BAR"), "foo\\BAR");
        assert_eq!(constant_key("\\BAR"), "BAR");
    }
}
