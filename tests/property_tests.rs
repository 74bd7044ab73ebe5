//! Property-based tests for tokenreflect
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use proptest::prelude::*;
use tokenreflect::names::{self, AliasTable, ImportKind};
use tokenreflect::{Broker, Value, lexer};
use tokenreflect_core::lang::types;

// =============================================================================
// Strategies
// =============================================================================

/// A name segment that is not a reserved type name (`int`, `self`, ...).
fn segment_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,8}".prop_filter("Not a reserved name", |s| {
        !types::is_reserved_type_name(s) && !s.eq_ignore_ascii_case("namespace")
    })
}

fn qualified_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 1..4).prop_map(|segments| segments.join("\\"))
}

/// Source fragments that lex on their own and cannot merge with a neighbor when separated by a space.
fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,6}",
        "\\$[a-z_][a-z0-9_]{0,6}",
        "[0-9]{1,5}",
        "[0-9]{1,3}\\.[0-9]{1,3}",
        "'[a-z ]{0,8}'",
        "\"[a-z ]{0,8}\"",
        "// [a-z ]{0,8}\n",
        "/\\* [a-z ]{0,8} \\*/",
        "/\\*\\* [a-z ]{0,8} \\*/",
        "[ \t\n]{1,3}",
        prop::sample::select(vec!["=", "+", ";", "(", ")", "[", "]", "{", "}", ",", "::", "\\", "=>", "&", "|"])
            .prop_map(str::to_string),
    ]
}

fn source_strategy() -> impl Strategy<Value = String> {
    ("[a-z <>]{0,10}", prop::collection::vec(fragment_strategy(), 0..40))
        .prop_map(|(html, fragments)| format!("{html}<?php {}", fragments.join(" ")))
}

// =============================================================================
// Lexer Properties
// =============================================================================

proptest! {
    /// Property: concatenating token texts reproduces the source
    #[test]
    fn lexing_is_lossless(source in source_strategy()) {
        let tokens = lexer::lex(&source).expect("Lex failed");
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        prop_assert_eq!(rebuilt, source);
    }

    /// Property: line numbers never decrease
    #[test]
    fn token_lines_are_monotonic(source in source_strategy()) {
        let tokens = lexer::lex(&source).expect("Lex failed");
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].line <= pair[1].line);
        }
    }
}

// =============================================================================
// Name Resolution Properties
// =============================================================================

proptest! {
    /// Property: fully-qualified names are returned unchanged
    #[test]
    fn rooted_names_are_unchanged(name in qualified_strategy(), namespace in qualified_strategy()) {
        let rooted = format!("\\{name}");
        let mut aliases = AliasTable::new();
        aliases.add(ImportKind::Class, names::short_name(&name), "Elsewhere\\Target");
        prop_assert_eq!(names::resolve(&rooted, &aliases, &namespace).unwrap(), rooted);
    }

    /// Property: without imports, the global namespace leaves names alone
    #[test]
    fn global_namespace_is_identity(name in qualified_strategy()) {
        prop_assert_eq!(names::resolve(&name, &AliasTable::new(), "").unwrap(), name);
    }

    /// Property: without imports, a namespace is prefixed and the short name survives
    #[test]
    fn namespace_is_prefixed(name in qualified_strategy(), namespace in qualified_strategy()) {
        let resolved = names::resolve(&name, &AliasTable::new(), &namespace).unwrap();
        prop_assert_eq!(&resolved, &format!("{namespace}\\{name}"));
        prop_assert_eq!(names::short_name(&resolved), names::short_name(&name));
        prop_assert!(!names::is_rooted(&resolved));
    }

    /// Property: an import replaces exactly the first segment
    #[test]
    fn alias_replaces_first_segment(
        alias in segment_strategy(),
        target in qualified_strategy(),
        rest in prop::option::of(qualified_strategy()),
        namespace in qualified_strategy(),
    ) {
        let mut aliases = AliasTable::new();
        aliases.add(ImportKind::Class, alias.as_str(), &target);
        let (written, expected) = match &rest {
            Some(rest) => (format!("{alias}\\{rest}"), format!("{target}\\{rest}")),
            None => (alias.clone(), target.clone()),
        };
        prop_assert_eq!(names::resolve(&written, &aliases, &namespace).unwrap(), expected.clone());

        // Import aliases are case-insensitive.
        let shouted = format!("{}{}", alias.to_ascii_uppercase(), &written[alias.len()..]);
        prop_assert_eq!(names::resolve(&shouted, &aliases, &namespace).unwrap(), expected);
    }

    /// Property: `Class::MEMBER` resolves the class and keeps the member verbatim
    #[test]
    fn class_member_keeps_member(class in qualified_strategy(), member in "[A-Z_]{1,8}", namespace in qualified_strategy()) {
        let aliases = AliasTable::new();
        let resolved = names::resolve(&format!("{class}::{member}"), &aliases, &namespace).unwrap();
        let class_only = names::resolve(&class, &aliases, &namespace).unwrap();
        prop_assert_eq!(resolved, format!("{class_only}::{member}"));
    }
}

// =============================================================================
// Broker Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: a chain of forward references resolves regardless of declaration order,
    /// and every link is evaluated exactly once
    #[test]
    fn reference_chains_resolve_once(order in Just((0..20usize).collect::<Vec<_>>()).prop_shuffle(), end in any::<i32>()) {
        let declarations: Vec<String> = order
            .iter()
            .map(|&i| {
                if i == 19 {
                    format!("const C19 = {end};")
                } else {
                    format!("const C{i} = C{};", i + 1)
                }
            })
            .collect();
        let source = format!("<?php\nnamespace Chain;\n{}\n", declarations.join("\n"));

        let mut broker = Broker::new();
        broker.process_source(&source, "chain.php").expect("Process failed");

        let head = broker.get_constant("Chain\\C0").unwrap();
        prop_assert_eq!(head.value(&broker).unwrap(), &Value::Int(i64::from(end)));
        prop_assert_eq!(head.value(&broker).unwrap(), &Value::Int(i64::from(end)));
        for i in 0..20 {
            let link = broker.get_constant(&format!("Chain\\C{i}")).unwrap();
            prop_assert_eq!(link.evaluation_count(), 1);
        }
    }
}
