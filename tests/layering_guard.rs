//! Layering guardrails for the workspace crates.
//!
//! `tokenreflect_core` is the shared vocabulary and must stay dependency-free. `tokenreflect_syntax` sits between
//! the vocabulary and the reflection crate and must not depend on anything above it.

/// Names listed in the `[dependencies]` table of a manifest.
fn dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_vocabulary_has_no_dependencies() {
    let deps = dependencies(include_str!("../crates/tokenreflect_core/Cargo.toml"));
    assert!(deps.is_empty(), "`tokenreflect_core` must stay dependency-free, found {deps:?}");
}

#[test]
fn syntax_crate_does_not_depend_on_reflection() {
    let deps = dependencies(include_str!("../crates/tokenreflect_syntax/Cargo.toml"));
    assert!(deps.iter().any(|d| d == "tokenreflect_core"));
    assert!(
        !deps.iter().any(|d| d == "tokenreflect"),
        "`tokenreflect_syntax` must not depend on the reflection crate"
    );
}

#[test]
fn test_only_crates_stay_out_of_main_dependencies() {
    let deps = dependencies(include_str!("../Cargo.toml"));
    for dev_only in ["insta", "proptest", "tracing-subscriber"] {
        assert!(
            !deps.iter().any(|d| d == dev_only),
            "`{dev_only}` must not appear in [dependencies]; use [dev-dependencies] instead"
        );
    }
}
