//! Operator vocabulary.
//!
//! PHP's symbol operators (`=`, `.=`, `<=>`, `??=`, ...). The reflection engine never evaluates operators; the lexer
//! needs the full table so every byte of a source file lands in a token, and value classification needs to know an
//! operator when it sees one.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Word operators (`and`, `or`, `xor`, `instanceof`, `new`) are keywords; see [`crate::lang::keywords`].
//!
//! ## Examples
//! ```rust
//! use tokenreflect_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("??="), Some(OperatorId::CoalesceEq));
//! assert_eq!(operators::as_str(OperatorId::Spaceship), "<=>");
//! ```

/// Define whether an operator assigns, compares, or computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    Arithmetic,
    Bitwise,
    Comparison,
    Logical,
    Assignment,
    String,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,

    // Bitwise
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,

    // Comparison
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,
    LtGt,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Spaceship,

    // Logical
    Bang,
    AndAnd,
    OrOr,
    Coalesce,

    // String
    Dot,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    StarStarEq,
    SlashEq,
    PercentEq,
    DotEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    CoalesceEq,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub canonical: &'static str,
    pub category: OperatorCategory,
}

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    info(OperatorId::Plus, "+", OperatorCategory::Arithmetic),
    info(OperatorId::Minus, "-", OperatorCategory::Arithmetic),
    info(OperatorId::Star, "*", OperatorCategory::Arithmetic),
    info(OperatorId::StarStar, "**", OperatorCategory::Arithmetic),
    info(OperatorId::Slash, "/", OperatorCategory::Arithmetic),
    info(OperatorId::Percent, "%", OperatorCategory::Arithmetic),
    info(OperatorId::PlusPlus, "++", OperatorCategory::Arithmetic),
    info(OperatorId::MinusMinus, "--", OperatorCategory::Arithmetic),
    info(OperatorId::Pipe, "|", OperatorCategory::Bitwise),
    info(OperatorId::Caret, "^", OperatorCategory::Bitwise),
    info(OperatorId::Tilde, "~", OperatorCategory::Bitwise),
    info(OperatorId::Shl, "<<", OperatorCategory::Bitwise),
    info(OperatorId::Shr, ">>", OperatorCategory::Bitwise),
    info(OperatorId::EqEq, "==", OperatorCategory::Comparison),
    info(OperatorId::EqEqEq, "===", OperatorCategory::Comparison),
    info(OperatorId::NotEq, "!=", OperatorCategory::Comparison),
    info(OperatorId::NotEqEq, "!==", OperatorCategory::Comparison),
    info(OperatorId::LtGt, "<>", OperatorCategory::Comparison),
    info(OperatorId::Lt, "<", OperatorCategory::Comparison),
    info(OperatorId::LtEq, "<=", OperatorCategory::Comparison),
    info(OperatorId::Gt, ">", OperatorCategory::Comparison),
    info(OperatorId::GtEq, ">=", OperatorCategory::Comparison),
    info(OperatorId::Spaceship, "<=>", OperatorCategory::Comparison),
    info(OperatorId::Bang, "!", OperatorCategory::Logical),
    info(OperatorId::AndAnd, "&&", OperatorCategory::Logical),
    info(OperatorId::OrOr, "||", OperatorCategory::Logical),
    info(OperatorId::Coalesce, "??", OperatorCategory::Logical),
    info(OperatorId::Dot, ".", OperatorCategory::String),
    info(OperatorId::Eq, "=", OperatorCategory::Assignment),
    info(OperatorId::PlusEq, "+=", OperatorCategory::Assignment),
    info(OperatorId::MinusEq, "-=", OperatorCategory::Assignment),
    info(OperatorId::StarEq, "*=", OperatorCategory::Assignment),
    info(OperatorId::StarStarEq, "**=", OperatorCategory::Assignment),
    info(OperatorId::SlashEq, "/=", OperatorCategory::Assignment),
    info(OperatorId::PercentEq, "%=", OperatorCategory::Assignment),
    info(OperatorId::DotEq, ".=", OperatorCategory::Assignment),
    info(OperatorId::AmpEq, "&=", OperatorCategory::Assignment),
    info(OperatorId::PipeEq, "|=", OperatorCategory::Assignment),
    info(OperatorId::CaretEq, "^=", OperatorCategory::Assignment),
    info(OperatorId::ShlEq, "<<=", OperatorCategory::Assignment),
    info(OperatorId::ShrEq, ">>=", OperatorCategory::Assignment),
    info(OperatorId::CoalesceEq, "??=", OperatorCategory::Assignment),
];

/// Canonical spelling.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).canonical
}

/// Full metadata for an operator.
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Lookup by exact spelling.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.canonical == spelling).map(|o| o.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: OperatorId, canonical: &'static str, category: OperatorCategory) -> OperatorInfo {
    OperatorInfo { id, canonical, category }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::punctuation;

    #[test]
    fn operator_registry_parity() {
        for o in OPERATORS {
            assert_eq!(from_str(o.canonical), Some(o.id));
        }
    }

    #[test]
    fn operators_and_punctuation_do_not_overlap() {
        for o in OPERATORS {
            assert!(punctuation::from_str(o.canonical).is_none(), "{} is registered twice", o.canonical);
        }
    }
}
