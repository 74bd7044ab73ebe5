//! Define the reserved keyword vocabulary of PHP.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings and categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-insensitive**, as PHP keywords are.
//! - Contextual words (`enum`, `mixed`, `self`, `parent`) are not reserved and lex as identifiers.
//! - `true`, `false` and `null` are *not* keywords here; PHP tokenizes them as plain identifiers. See
//!   [`crate::lang::literals`].
//! - Magic constants (`__LINE__`, `__CLASS__`, ...) live in this registry with
//!   [`KeywordCategory::MagicConstant`], mirroring how the PHP tokenizer emits a dedicated token for each.
//!
//! ## Examples
//! ```rust
//! use tokenreflect_core::lang::keywords::{self, KeywordCategory, KeywordId};
//!
//! assert_eq!(keywords::from_str("Namespace"), Some(KeywordId::Namespace));
//! assert_eq!(keywords::category(KeywordId::LineC), KeywordCategory::MagicConstant);
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Declarations
    Namespace,
    Use,
    As,
    Insteadof,
    Class,
    Interface,
    Trait,
    Extends,
    Implements,
    Function,
    Fn,
    Const,
    Var,

    // Modifiers
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    Readonly,

    // Type-ish keywords
    Array,
    Callable,

    // Statements / expressions
    If,
    Else,
    Elseif,
    Endif,
    While,
    Endwhile,
    Do,
    For,
    Endfor,
    Foreach,
    Endforeach,
    Switch,
    Endswitch,
    Case,
    Default,
    Match,
    Break,
    Continue,
    Return,
    Yield,
    Try,
    Catch,
    Finally,
    Throw,
    Goto,
    Declare,
    Enddeclare,
    Global,
    Echo,
    Print,
    New,
    Clone,
    Instanceof,
    List,
    Isset,
    Unset,
    Empty,
    Eval,
    Exit,
    Die,
    Include,
    IncludeOnce,
    Require,
    RequireOnce,
    HaltCompiler,
    LogicalAnd,
    LogicalOr,
    LogicalXor,

    // Magic constants
    LineC,
    FileC,
    DirC,
    NamespaceC,
    ClassC,
    TraitC,
    FunctionC,
    MethodC,
}

/// High-level grouping for documentation and tooling.
///
/// ## Notes
/// - Categories are metadata only; they do not enforce parsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Declaration,
    Modifier,
    Type,
    Statement,
    Operator,
    MagicConstant,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
}

/// Registry of all keywords.
///
/// ## Notes
/// - Canonical spellings are lowercase (magic constants uppercase, as PHP documents them).
pub const KEYWORDS: &[KeywordInfo] = &[
    // Declarations
    info(KeywordId::Namespace, "namespace", KeywordCategory::Declaration),
    info(KeywordId::Use, "use", KeywordCategory::Declaration),
    info(KeywordId::As, "as", KeywordCategory::Declaration),
    info(KeywordId::Insteadof, "insteadof", KeywordCategory::Declaration),
    info(KeywordId::Class, "class", KeywordCategory::Declaration),
    info(KeywordId::Interface, "interface", KeywordCategory::Declaration),
    info(KeywordId::Trait, "trait", KeywordCategory::Declaration),
    info(KeywordId::Extends, "extends", KeywordCategory::Declaration),
    info(KeywordId::Implements, "implements", KeywordCategory::Declaration),
    info(KeywordId::Function, "function", KeywordCategory::Declaration),
    info(KeywordId::Fn, "fn", KeywordCategory::Declaration),
    info(KeywordId::Const, "const", KeywordCategory::Declaration),
    info(KeywordId::Var, "var", KeywordCategory::Declaration),
    // Modifiers
    info(KeywordId::Public, "public", KeywordCategory::Modifier),
    info(KeywordId::Protected, "protected", KeywordCategory::Modifier),
    info(KeywordId::Private, "private", KeywordCategory::Modifier),
    info(KeywordId::Static, "static", KeywordCategory::Modifier),
    info(KeywordId::Abstract, "abstract", KeywordCategory::Modifier),
    info(KeywordId::Final, "final", KeywordCategory::Modifier),
    info(KeywordId::Readonly, "readonly", KeywordCategory::Modifier),
    // Type-ish keywords
    info(KeywordId::Array, "array", KeywordCategory::Type),
    info(KeywordId::Callable, "callable", KeywordCategory::Type),
    // Statements / expressions
    info(KeywordId::If, "if", KeywordCategory::Statement),
    info(KeywordId::Else, "else", KeywordCategory::Statement),
    info(KeywordId::Elseif, "elseif", KeywordCategory::Statement),
    info(KeywordId::Endif, "endif", KeywordCategory::Statement),
    info(KeywordId::While, "while", KeywordCategory::Statement),
    info(KeywordId::Endwhile, "endwhile", KeywordCategory::Statement),
    info(KeywordId::Do, "do", KeywordCategory::Statement),
    info(KeywordId::For, "for", KeywordCategory::Statement),
    info(KeywordId::Endfor, "endfor", KeywordCategory::Statement),
    info(KeywordId::Foreach, "foreach", KeywordCategory::Statement),
    info(KeywordId::Endforeach, "endforeach", KeywordCategory::Statement),
    info(KeywordId::Switch, "switch", KeywordCategory::Statement),
    info(KeywordId::Endswitch, "endswitch", KeywordCategory::Statement),
    info(KeywordId::Case, "case", KeywordCategory::Statement),
    info(KeywordId::Default, "default", KeywordCategory::Statement),
    info(KeywordId::Match, "match", KeywordCategory::Statement),
    info(KeywordId::Break, "break", KeywordCategory::Statement),
    info(KeywordId::Continue, "continue", KeywordCategory::Statement),
    info(KeywordId::Return, "return", KeywordCategory::Statement),
    info(KeywordId::Yield, "yield", KeywordCategory::Statement),
    info(KeywordId::Try, "try", KeywordCategory::Statement),
    info(KeywordId::Catch, "catch", KeywordCategory::Statement),
    info(KeywordId::Finally, "finally", KeywordCategory::Statement),
    info(KeywordId::Throw, "throw", KeywordCategory::Statement),
    info(KeywordId::Goto, "goto", KeywordCategory::Statement),
    info(KeywordId::Declare, "declare", KeywordCategory::Statement),
    info(KeywordId::Enddeclare, "enddeclare", KeywordCategory::Statement),
    info(KeywordId::Global, "global", KeywordCategory::Statement),
    info(KeywordId::Echo, "echo", KeywordCategory::Statement),
    info(KeywordId::Print, "print", KeywordCategory::Statement),
    info(KeywordId::New, "new", KeywordCategory::Operator),
    info(KeywordId::Clone, "clone", KeywordCategory::Operator),
    info(KeywordId::Instanceof, "instanceof", KeywordCategory::Operator),
    info(KeywordId::List, "list", KeywordCategory::Statement),
    info(KeywordId::Isset, "isset", KeywordCategory::Statement),
    info(KeywordId::Unset, "unset", KeywordCategory::Statement),
    info(KeywordId::Empty, "empty", KeywordCategory::Statement),
    info(KeywordId::Eval, "eval", KeywordCategory::Statement),
    info(KeywordId::Exit, "exit", KeywordCategory::Statement),
    info(KeywordId::Die, "die", KeywordCategory::Statement),
    info(KeywordId::Include, "include", KeywordCategory::Statement),
    info(KeywordId::IncludeOnce, "include_once", KeywordCategory::Statement),
    info(KeywordId::Require, "require", KeywordCategory::Statement),
    info(KeywordId::RequireOnce, "require_once", KeywordCategory::Statement),
    info(KeywordId::HaltCompiler, "__halt_compiler", KeywordCategory::Statement),
    info(KeywordId::LogicalAnd, "and", KeywordCategory::Operator),
    info(KeywordId::LogicalOr, "or", KeywordCategory::Operator),
    info(KeywordId::LogicalXor, "xor", KeywordCategory::Operator),
    // Magic constants
    info(KeywordId::LineC, "__LINE__", KeywordCategory::MagicConstant),
    info(KeywordId::FileC, "__FILE__", KeywordCategory::MagicConstant),
    info(KeywordId::DirC, "__DIR__", KeywordCategory::MagicConstant),
    info(KeywordId::NamespaceC, "__NAMESPACE__", KeywordCategory::MagicConstant),
    info(KeywordId::ClassC, "__CLASS__", KeywordCategory::MagicConstant),
    info(KeywordId::TraitC, "__TRAIT__", KeywordCategory::MagicConstant),
    info(KeywordId::FunctionC, "__FUNCTION__", KeywordCategory::MagicConstant),
    info(KeywordId::MethodC, "__METHOD__", KeywordCategory::MagicConstant),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Return `true` for `public`, `protected`, `private`, `static`, `abstract`, `final` and `readonly`.
pub fn is_modifier(id: KeywordId) -> bool {
    category(id) == KeywordCategory::Modifier
}

/// Return `true` for `__LINE__`, `__CLASS__` and the other magic constants.
pub fn is_magic_constant(id: KeywordId) -> bool {
    category(id) == KeywordCategory::MagicConstant
}

/// Full metadata for a keyword.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (a bug in this table; guarded by the parity test).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling, ignoring ASCII case.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is reserved.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical.eq_ignore_ascii_case(s)).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo { id, canonical, category }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyword_round_trips_through_its_spelling() {
        for k in KEYWORDS {
            assert_eq!(from_str(k.canonical), Some(k.id), "{}", k.canonical);
            assert_eq!(from_str(&k.canonical.to_ascii_uppercase()), Some(k.id));
        }
    }

    #[test]
    fn literal_words_are_not_keywords() {
        assert_eq!(from_str("true"), None);
        assert_eq!(from_str("NULL"), None);
        assert_eq!(from_str("self"), None);
    }

    #[test]
    fn magic_constants_are_categorized() {
        assert!(is_magic_constant(KeywordId::ClassC));
        assert!(!is_magic_constant(KeywordId::Class));
        assert!(is_modifier(KeywordId::Final));
    }
}
