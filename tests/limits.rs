// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Resource-limit tests: alias expansion quotas, nesting depth, and the
//! simple-key look-ahead budget.

use yaml_codec::{Error, compose_str};

/// Build the classic expanding-alias document with `levels` levels of
/// `width` references each.
fn laughs(levels: usize, width: usize) -> String {
    let item = "lol, ".repeat(width);
    let mut out = format!("a: &a [{}]\n", item.trim_end_matches(", "));
    let mut previous = 'a';
    for current in ('b'..='z').take(levels.saturating_sub(1)) {
        let refs = format!("*{previous}, ").repeat(width);
        out.push_str(&format!(
            "{current}: &{current} [{}]\n",
            refs.trim_end_matches(", ")
        ));
        previous = current;
    }
    out
}

#[test]
fn test_billion_laughs_is_rejected() {
    let err = compose_str(&laughs(9, 9)).expect_err("must fail");
    assert!(
        err.to_string().contains("document contains excessive aliasing"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_small_alias_fanout_is_allowed() {
    // Under a hundred aliased visits never trips the quota.
    let document = compose_str(&laughs(2, 9)).expect("compose").expect("document");
    assert_eq!(document.content[0].content.len(), 4);
}

#[test]
fn test_repeated_aliases_without_expansion_are_allowed() {
    let mut input = String::from("base: &base {k: v}\n");
    for i in 0..90 {
        input.push_str(&format!("ref{i}: *base\n"));
    }
    assert!(compose_str(&input).expect("compose").is_some());
}

/// The composer recurses once per nesting level, so the depth-limit tests
/// need more stack than the default test thread provides.
fn with_big_stack(f: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(f)
        .expect("spawn")
        .join()
        .expect("join");
}

#[test]
fn test_flow_nesting_depth_is_bounded() {
    with_big_stack(|| {
        let input = "[".repeat(10_500);
        let err = compose_str(&input).expect_err("must fail");
        assert!(
            err.to_string().contains("exceeded max depth"),
            "unexpected error: {err}"
        );
    });
}

#[test]
fn test_block_nesting_depth_is_bounded() {
    with_big_stack(|| {
        // Each line opens one more block mapping.
        let mut input = String::new();
        for depth in 0..10_500 {
            input.push_str(&" ".repeat(depth));
            input.push_str("k:\n");
        }
        let err = compose_str(&input).expect_err("must fail");
        assert!(
            err.to_string().contains("exceeded max depth"),
            "unexpected error: {err}"
        );
    });
}

#[test]
fn test_reasonable_nesting_is_fine() {
    let mut input = String::new();
    for depth in 0..64 {
        input.push_str(&" ".repeat(depth));
        input.push_str("k:\n");
    }
    assert!(compose_str(&input).expect("compose").is_some());
}

#[test]
fn test_simple_key_longer_than_budget_fails() {
    // A key of more than 1024 code points cannot be a simple key, so the
    // `:` that follows it is a hard error.
    let input = format!("{}: 1\n", "k".repeat(2000));
    let err = compose_str(&input).expect_err("must fail");
    assert!(matches!(err, Error::Syntax(_)), "unexpected error: {err}");
}

#[test]
fn test_simple_key_within_budget_works() {
    let key = "k".repeat(1000);
    let input = format!("{key}: 1\n");
    let document = compose_str(&input).expect("compose").expect("document");
    assert!(document.content[0].get(&key).is_some());
}
