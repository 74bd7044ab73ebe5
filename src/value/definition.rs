//! Value definitions: the raw right-hand side of a constant, default value or static variable.
//!
//! A definition is classified once, when its declaration is built:
//! - text made only of literal tokens is evaluated by [`super::literal`],
//! - a (possibly qualified) constant name or `Class::CONSTANT` is name-resolved on the spot and looked up through
//!   the broker when its value is first requested,
//! - anything else is kept verbatim and reported as [`ReflectionError::UnsupportedExpression`] on request.
//!
//! Evaluation is memoized. Successful results are stored in a [`OnceCell`]; a failed evaluation stores nothing and
//! can be retried.

use std::cell::{Cell, OnceCell};

use tokenreflect_core::lang::keywords::KeywordId;
use tokenreflect_core::lang::literals;
use tokenreflect_core::lang::punctuation::PunctuationId;
use tokenreflect_syntax::lexer::{Token, TokenKind};

use super::{Value, literal};
use crate::broker::{Broker, SymbolKind};
use crate::error::ReflectionError;
use crate::names::{self, AliasTable};

/// Naming context a definition is resolved in.
#[derive(Debug, Clone, Copy)]
pub struct ValueScope<'a> {
    pub namespace: &'a str,
    pub aliases: &'a AliasTable,
    /// FQN of the enclosing class-like, if any.
    pub class: Option<&'a str>,
    /// Declared parent of the enclosing class, if any.
    pub parent_class: Option<&'a str>,
    pub global_fallback: bool,
}

impl ValueScope<'_> {
    /// Resolve the class part of `Class::MEMBER`, binding `self`, `static` and `parent`.
    pub fn class_reference(&self, name: &str) -> Result<String, ReflectionError> {
        let bound = if name.eq_ignore_ascii_case("self") || name.eq_ignore_ascii_case("static") {
            self.class
        } else if name.eq_ignore_ascii_case("parent") {
            self.parent_class
        } else {
            return names::resolve(name, self.aliases, self.namespace);
        };
        bound
            .map(str::to_string)
            .ok_or_else(|| ReflectionError::InvalidName { name: name.to_string() })
    }
}

/// Classified form of a definition.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    /// Directly evaluable literal tokens (no trivia).
    Literal(Vec<Token>),
    /// `Foo::class`
    ClassName(String),
    /// Reference to a top-level constant; `fallback` is the global name tried when `name` is not registered.
    Constant { name: String, fallback: Option<String> },
    /// `Class::CONSTANT`
    ClassConstant { class: String, constant: String },
    /// A compound expression that cannot be evaluated statically.
    Unsupported,
}

/// The lazily evaluated right-hand side of a declaration.
#[derive(Debug)]
pub struct ValueDefinition {
    text: String,
    expr: ValueExpr,
    value: OnceCell<Value>,
    evaluations: Cell<usize>,
}

impl ValueDefinition {
    /// Classify the accumulated tokens of a definition.
    ///
    /// `tokens` may contain trivia; it is kept in [`ValueDefinition::text`] for literal definitions.
    pub fn classify(tokens: &[Token], scope: &ValueScope<'_>) -> Result<Self, ReflectionError> {
        let verbatim: String = tokens.iter().map(|t| t.text.as_str()).collect();
        let verbatim = verbatim.trim().to_string();
        let significant: Vec<Token> = tokens.iter().filter(|t| !t.is_trivia()).cloned().collect();
        let significant = strip_rooted_literal_words(significant);

        if significant.iter().all(is_literal_token) {
            return Ok(Self::new(verbatim, ValueExpr::Literal(significant)));
        }

        let (text, expr) = match reference(&significant) {
            Some(Reference::Constant(name)) => {
                let resolved = names::resolve_constant(&name, scope.aliases, scope.namespace, scope.global_fallback)?;
                let expr = ValueExpr::Constant {
                    name: names::trim_root(&resolved.name).to_string(),
                    fallback: resolved.fallback,
                };
                (resolved.name, expr)
            }
            Some(Reference::ClassMember { class, member }) => {
                let class = scope.class_reference(&class)?;
                let target = names::trim_root(&class).to_string();
                let expr = if member.eq_ignore_ascii_case("class") {
                    ValueExpr::ClassName(target)
                } else {
                    ValueExpr::ClassConstant {
                        class: target,
                        constant: member.clone(),
                    }
                };
                (format!("{class}::{member}"), expr)
            }
            None => (verbatim, ValueExpr::Unsupported),
        };
        Ok(Self::new(text, expr))
    }

    fn new(text: String, expr: ValueExpr) -> Self {
        Self {
            text,
            expr,
            value: OnceCell::new(),
            evaluations: Cell::new(0),
        }
    }

    /// Source text of the definition, with names resolved for symbolic references.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expr(&self) -> &ValueExpr {
        &self.expr
    }

    /// Return `true` if evaluating this definition needs the broker.
    pub fn is_symbolic(&self) -> bool {
        !matches!(self.expr, ValueExpr::Literal(_))
    }

    /// Return `true` for a bare `null` literal.
    pub fn is_null_literal(&self) -> bool {
        match &self.expr {
            ValueExpr::Literal(tokens) => {
                matches!(tokens.as_slice(), [t] if t.kind == TokenKind::Ident && t.text.eq_ignore_ascii_case("null"))
            }
            _ => false,
        }
    }

    /// The memoized value, if it has been computed.
    pub fn cached(&self) -> Option<&Value> {
        self.value.get()
    }

    /// How many times the underlying evaluation ran.
    pub fn evaluation_count(&self) -> usize {
        self.evaluations.get()
    }

    /// Evaluate (once) and return the value.
    ///
    /// `kind`/`key` identify the owner for cycle detection.
    pub(crate) fn evaluate(&self, kind: SymbolKind, key: &str, broker: &Broker) -> Result<&Value, ReflectionError> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let _guard = broker.enter(kind, key)?;
        self.evaluations.set(self.evaluations.get() + 1);
        tracing::trace!(%kind, key, definition = %self.text, "evaluating value definition");

        let value = match &self.expr {
            ValueExpr::Literal(tokens) => literal::evaluate(tokens, &self.text)?,
            ValueExpr::ClassName(name) => Value::String(name.clone()),
            ValueExpr::Constant { name, fallback } => broker.constant_value(name, fallback.as_deref())?.clone(),
            ValueExpr::ClassConstant { class, constant } => {
                let reflection = broker.class_constant(class, constant)?;
                reflection.value(broker)?.clone()
            }
            ValueExpr::Unsupported => {
                return Err(ReflectionError::UnsupportedExpression {
                    definition: self.text.clone(),
                });
            }
        };
        Ok(self.value.get_or_init(|| value))
    }
}

enum Reference {
    Constant(String),
    ClassMember { class: String, member: String },
}

/// Parse `Name`, `\Qualified\Name`, `namespace\Name` or `Class::MEMBER` from significant tokens.
fn reference(tokens: &[Token]) -> Option<Reference> {
    let split = tokens
        .iter()
        .position(|t| t.kind.is_punctuation(PunctuationId::DoubleColon));
    match split {
        Some(at) => {
            let [member] = &tokens[at + 1..] else {
                return None;
            };
            if !matches!(member.kind, TokenKind::Ident | TokenKind::Keyword(_)) {
                return None;
            }
            Some(Reference::ClassMember {
                class: qualified_name(&tokens[..at])?,
                member: member.text.clone(),
            })
        }
        None => qualified_name(tokens).map(Reference::Constant),
    }
}

fn qualified_name(tokens: &[Token]) -> Option<String> {
    let mut name = String::new();
    let mut expect_separator = false;
    for (i, t) in tokens.iter().enumerate() {
        let separator = t.kind.is_punctuation(PunctuationId::Backslash);
        let segment = matches!(t.kind, TokenKind::Ident | TokenKind::Keyword(_));
        match (expect_separator, separator, segment) {
            (true, true, _) => expect_separator = false,
            (false, true, _) if i == 0 => {}
            (false, false, true) => expect_separator = true,
            _ => return None,
        }
        name.push_str(&t.text);
    }
    expect_separator.then_some(name)
}

/// Drop the leading `\` of `\true`, `\false` and `\null`. A separator inside a longer name such as `A\true`
/// is kept, so that name stays a constant reference.
fn strip_rooted_literal_words(tokens: Vec<Token>) -> Vec<Token> {
    let rooted_literal = |i: usize| {
        tokens[i].kind.is_punctuation(PunctuationId::Backslash)
            && tokens
                .get(i + 1)
                .is_some_and(|next| next.kind == TokenKind::Ident && literals::is_literal_word(&next.text))
            && (i == 0 || !matches!(tokens[i - 1].kind, TokenKind::Ident | TokenKind::Keyword(_)))
    };
    let keep: Vec<bool> = (0..tokens.len()).map(|i| !rooted_literal(i)).collect();
    tokens
        .into_iter()
        .zip(keep)
        .filter_map(|(token, keep)| keep.then_some(token))
        .collect()
}

/// Tokens that can appear in a directly evaluable definition. Operators pass here and are rejected by the
/// literal evaluator.
fn is_literal_token(token: &Token) -> bool {
    match token.kind {
        TokenKind::Int | TokenKind::Float | TokenKind::String | TokenKind::Operator(_) => true,
        TokenKind::Ident => literals::is_literal_word(&token.text),
        TokenKind::Keyword(id) => id == KeywordId::Array,
        TokenKind::Punctuation(id) => !matches!(
            id,
            PunctuationId::Backslash
                | PunctuationId::DoubleColon
                | PunctuationId::Arrow
                | PunctuationId::NullsafeArrow
                | PunctuationId::Dollar
                | PunctuationId::Backtick
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::ImportKind;
    use tokenreflect_syntax::lexer::lex;

    fn tokens(expr: &str) -> Vec<Token> {
        lex(&format!("<?php {expr}")).unwrap().into_iter().skip(1).collect()
    }

    fn classify_in(expr: &str, namespace: &str, class: Option<&str>) -> Result<ValueDefinition, ReflectionError> {
        let mut aliases = AliasTable::new();
        aliases.add(ImportKind::Class, "Baz", "Foo\\Bar");
        let scope = ValueScope {
            namespace,
            aliases: &aliases,
            class,
            parent_class: Some("N\\Base"),
            global_fallback: true,
        };
        ValueDefinition::classify(&tokens(expr), &scope)
    }

    fn classify(expr: &str) -> ValueDefinition {
        classify_in(expr, "N", Some("N\\Owner")).unwrap()
    }

    #[test]
    fn test_literal_keeps_verbatim_text() {
        let d = classify("array( 1, 'a' => 2 )  ");
        assert_eq!(d.text(), "array( 1, 'a' => 2 )");
        assert!(!d.is_symbolic());
        assert!(matches!(d.expr(), ValueExpr::Literal(t) if t.len() == 8));
    }

    #[test]
    fn test_literal_words_are_not_symbolic() {
        assert!(!classify("TRUE").is_symbolic());
        assert!(classify("NULL").is_null_literal());
        assert!(!classify("'null'").is_null_literal());
    }

    #[test]
    fn test_rooted_literal_words_are_literals() {
        let d = classify("\\true");
        assert_eq!(d.text(), "\\true");
        assert!(!d.is_symbolic());
        assert!(classify("\\NULL").is_null_literal());
        assert!(!classify("[\\false, 1]").is_symbolic());
        assert!(classify("A\\true").is_symbolic());
    }

    #[test]
    fn test_unqualified_constant_in_namespace() {
        let d = classify("X");
        assert_eq!(d.text(), "N\\X");
        assert_eq!(
            d.expr(),
            &ValueExpr::Constant {
                name: "N\\X".into(),
                fallback: Some("X".into())
            }
        );
    }

    #[test]
    fn test_rooted_constant_keeps_its_backslash_in_text() {
        let d = classify("\\Vendor\\X");
        assert_eq!(d.text(), "\\Vendor\\X");
        assert_eq!(
            d.expr(),
            &ValueExpr::Constant {
                name: "Vendor\\X".into(),
                fallback: None
            }
        );
    }

    #[test]
    fn test_aliased_class_constant() {
        let d = classify("Baz::Y");
        assert_eq!(d.text(), "Foo\\Bar::Y");
        assert_eq!(
            d.expr(),
            &ValueExpr::ClassConstant {
                class: "Foo\\Bar".into(),
                constant: "Y".into()
            }
        );
    }

    #[test]
    fn test_self_and_parent_bind_to_the_declaring_class() {
        assert_eq!(classify("self::A").text(), "N\\Owner::A");
        assert_eq!(classify("static::A").text(), "N\\Owner::A");
        assert_eq!(classify("parent::A").text(), "N\\Base::A");
        assert!(matches!(
            classify_in("self::A", "N", None),
            Err(ReflectionError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_class_name_literal() {
        let d = classify("Baz::class");
        assert_eq!(d.expr(), &ValueExpr::ClassName("Foo\\Bar".into()));
    }

    #[test]
    fn test_compound_expressions_are_unsupported() {
        for expr in ["A + 1", "foo()", "Foo::bar()", "$x", "new Foo", "A::B::C"] {
            let d = classify(expr);
            assert_eq!(d.expr(), &ValueExpr::Unsupported, "{expr}");
            assert_eq!(d.text(), expr);
        }
    }

    #[test]
    fn test_global_namespace_constant() {
        let d = classify_in("PHP_EOL", "", None).unwrap();
        assert_eq!(
            d.expr(),
            &ValueExpr::Constant {
                name: "PHP_EOL".into(),
                fallback: None
            }
        );
    }
}
