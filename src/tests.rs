// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Pipeline tests through the public API.
//!
//! Unit tests live next to their modules; these exercise the full
//! scanner → parser → composer chain and the emitter round trip.

use super::*;

fn root(input: &str) -> Rc<Node> {
    let document = compose_str(input).expect("compose").expect("document");
    Rc::clone(&document.content[0])
}

fn round_trip(input: &str) -> String {
    let document = compose_str(input).expect("compose").expect("document");
    emit_to_string(&document).expect("emit")
}

#[test]
fn test_empty_input() {
    assert!(compose_str("").expect("compose").is_none());
    assert!(compose_all_str("").expect("compose").is_empty());
}

#[test]
fn test_nested_structures() {
    let input = "\
name: John
address:
  street: 123 Main St
  city: Springfield
pets:
  - cat
  - dog
";
    let root = root(input);
    assert_eq!(root.kind, NodeKind::Mapping);
    let address = root.get("address").expect("address");
    assert_eq!(address.get("city").expect("city").value, "Springfield");
    let pets = root.get("pets").expect("pets");
    assert_eq!(pets.kind, NodeKind::Sequence);
    assert_eq!(pets.content.len(), 2);
}

#[test]
fn test_flow_and_block_mixed() {
    let input = "\
items:
  - {name: foo, value: 1}
  - {name: bar, value: 2}
";
    let root = root(input);
    let items = root.get("items").expect("items");
    assert_eq!(items.content.len(), 2);
    assert_eq!(items.content[0].style, Style::Flow);
    assert_eq!(items.content[0].get("name").expect("name").value, "foo");
}

#[test]
fn test_round_trip_stability() {
    // The second pass over emitted output must be a fixed point.
    for input in [
        "a: 1\nb: 2\n",
        "- x\n- y\n- {k: v}\n",
        "a: &x [1, 2]\nb: *x\n",
        "text: |\n  line one\n  line two\n",
        "quoted: '123'\n",
        "deep:\n  deeper:\n    deepest: true\n",
    ] {
        let first = round_trip(input);
        let second = round_trip(&first);
        assert_eq!(first, second, "round trip of {input:?} is not stable");
    }
}

#[test]
fn test_round_trip_preserves_tree() {
    let input = "a: &x [1, 2]\nb: *x\nc: \"2015-02-24T18:19:39Z\"\n";
    let first = compose_str(input).expect("compose").expect("document");
    let emitted = emit_to_string(&first).expect("emit");
    let second = compose_str(&emitted).expect("recompose").expect("document");
    assert!(trees_equal(&first.content[0], &second.content[0]));
}

/// Structural equality for round-trip checks: kind, resolved tag, value,
/// anchor, and children; alias targets are compared through the same
/// relation.
fn trees_equal(a: &Rc<Node>, b: &Rc<Node>) -> bool {
    if a.kind != b.kind || a.tag != b.tag || a.value != b.value || a.anchor != b.anchor {
        return false;
    }
    if a.content.len() != b.content.len() {
        return false;
    }
    if let (Some(at), Some(bt)) = (&a.alias, &b.alias) {
        if !trees_equal(at, bt) {
            return false;
        }
    }
    a.content
        .iter()
        .zip(&b.content)
        .all(|(ac, bc)| trees_equal(ac, bc))
}

#[test]
fn test_utf16_inputs_match_utf8() {
    let text = "a: héllo\nb: [1, 2]\n";
    let utf8 = compose(text.as_bytes()).expect("utf8").expect("document");

    let mut le = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        le.extend(unit.to_le_bytes());
    }
    let utf16le = compose(&le).expect("utf16le").expect("document");

    let mut be = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        be.extend(unit.to_be_bytes());
    }
    let utf16be = compose(&be).expect("utf16be").expect("document");

    assert!(trees_equal(&utf8.content[0], &utf16le.content[0]));
    assert!(trees_equal(&utf8.content[0], &utf16be.content[0]));
}

#[test]
fn test_comment_round_trip() {
    let input = "# top comment\na: 1 # trailing\n";
    let document = compose_str(input).expect("compose").expect("document");
    let emitted = emit_to_string(&document).expect("emit");
    assert!(emitted.contains("# top comment"));
    assert!(emitted.contains("# trailing"));
}

#[test]
fn test_error_carries_position() {
    let err = compose_str("a: [1, 2\nb: 3\n").expect_err("must fail");
    let Error::Syntax(syntax) = err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert!(syntax.mark.line > 0);
    assert!(syntax.context.is_some());
}

#[test]
fn test_duplicate_keys_are_reported() {
    let err = compose_str("a: 1\na: 2\n").expect_err("duplicate keys must fail");
    let Error::TypeGroup(group) = &err else {
        panic!("expected a type error group, got {err:?}");
    };
    assert_eq!(group.len(), 1);
    assert!(err.to_string().contains("mapping key \"a\" already defined at line 1"));
}

#[test]
fn test_duplicate_keys_reported_per_document() {
    // The first document is fine; the second fails on its own.
    let err = compose_all_str("ok: 1\n---\na: 1\na: 2\n").expect_err("must fail");
    assert!(matches!(err, Error::TypeGroup(_)));
    assert!(compose_all_str("ok: 1\n---\na: 1\nb: 2\n").is_ok());
}

#[test]
fn test_structurally_equal_keys_are_duplicates() {
    // Key equality is textual: quoted and plain spellings collide, but
    // numeric forms are not canonicalized.
    assert!(compose_str("a: 1\n\"a\": 2\n").is_err());
    assert!(compose_str("10: x\n0xA: y\n").is_ok());
}

#[test]
fn test_stream_of_documents() {
    let documents = compose_all_str("---\na: 1\n---\nb: 2\n").expect("compose");
    assert_eq!(documents.len(), 2);
    let out = emit_all_to_string(&documents).expect("emit");
    assert_eq!(compose_all_str(&out).expect("recompose").len(), 2);
}
