// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! The composer: events in, node trees out.
//!
//! One document per [`Composer::compose`] call. Anchors are document
//! scoped; the anchor table is rebuilt for every document. Aliases share
//! their target via `Rc`, so merged and aliased subtrees are referenced,
//! never copied. A post-composition walk enforces the alias expansion
//! quota that bounds "billion laughs" documents.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::{Error, Result, TypeErrorGroup, UnmarshalError, UnmarshalErrorKind};
use crate::event::{CollectionStyle, Event, EventKind};
use crate::node::{Node, NodeKind, Style};
use crate::parser::Parser;
use crate::resolve::{self, MAP_TAG, MERGE_TAG, SEQ_TAG, STR_TAG};
use crate::span::Mark;
use crate::token::ScalarStyle;

/// Alias expansion quota: reject when more than 100 aliased visits, more
/// than 1000 total visits, and the aliased share exceeds a threshold that
/// declines with document size.
const ALIAS_RATIO_RANGE_LOW: u64 = 400_000;
const ALIAS_RATIO_RANGE_HIGH: u64 = 4_000_000;

fn allowed_alias_ratio(decode_count: u64) -> f64 {
    if decode_count <= ALIAS_RATIO_RANGE_LOW {
        0.99
    } else if decode_count >= ALIAS_RATIO_RANGE_HIGH {
        0.10
    } else {
        let progress = (decode_count - ALIAS_RATIO_RANGE_LOW) as f64
            / (ALIAS_RATIO_RANGE_HIGH - ALIAS_RATIO_RANGE_LOW) as f64;
        0.99 - 0.89 * progress
    }
}

/// Builds one node tree per document from a [`Parser`].
pub struct Composer<'r> {
    parser: Parser<'r>,
    /// Completed anchored nodes, by name. Later definitions shadow earlier
    /// ones.
    anchors: HashMap<String, Rc<Node>>,
    /// Anchors on the active composition path; an alias to one of these
    /// would make the node contain itself.
    parent_anchors: HashSet<String>,
    unique_keys: bool,
    type_errors: Vec<UnmarshalError>,
    stream_started: bool,
}

impl<'r> Composer<'r> {
    /// Compose documents from `parser`.
    #[must_use]
    pub fn new(parser: Parser<'r>) -> Self {
        Self {
            parser,
            anchors: HashMap::new(),
            parent_anchors: HashSet::new(),
            unique_keys: false,
            type_errors: Vec::new(),
            stream_started: false,
        }
    }

    /// Report duplicate mapping keys as soft errors. Off on a bare
    /// `Composer`; the crate-level `compose*` entry points turn it on and
    /// fail with the collected group.
    pub fn set_unique_keys(&mut self, unique_keys: bool) {
        self.unique_keys = unique_keys;
    }

    /// Soft type errors collected while composing the last document.
    #[must_use]
    pub fn type_errors(&self) -> &[UnmarshalError] {
        &self.type_errors
    }

    /// Take the collected soft errors, leaving the buffer empty.
    pub fn take_type_errors(&mut self) -> Vec<UnmarshalError> {
        std::mem::take(&mut self.type_errors)
    }

    /// Drain the collected soft errors into a single fatal error, the way
    /// a binding layer reports them after the document completes.
    pub fn finish(&mut self) -> Result<()> {
        if self.type_errors.is_empty() {
            Ok(())
        } else {
            Err(Error::TypeGroup(TypeErrorGroup {
                errors: self.take_type_errors(),
            }))
        }
    }

    /// Compose the next document, or `None` at the end of the stream.
    pub fn compose(&mut self) -> Result<Option<Rc<Node>>> {
        if !self.stream_started {
            let event = self.parser.next_event()?;
            if !matches!(event.kind, EventKind::StreamStart { .. }) {
                return Err(Error::syntax(
                    format!("expected stream start event, found {:?}", event.kind),
                    event.start,
                ));
            }
            self.stream_started = true;
        }
        if self.parser.peek_event()?.is_stream_end() {
            return Ok(None);
        }

        self.anchors.clear();
        self.parent_anchors.clear();
        self.type_errors.clear();

        let start = self.parser.next_event()?;
        let EventKind::DocumentStart { .. } = start.kind else {
            return Err(Error::syntax(
                format!("expected document start event, found {:?}", start.kind),
                start.start,
            ));
        };

        let mut document = Node::new(NodeKind::Document);
        document.mark = start.start;
        document.head_comment = start.head_comment;
        let child = self.compose_node()?;
        document.content.push(child);

        let end = self.parser.next_event()?;
        let EventKind::DocumentEnd { .. } = end.kind else {
            return Err(Error::syntax(
                format!("expected document end event, found {:?}", end.kind),
                end.start,
            ));
        };
        // Trailing own-line comments surface on the document end event.
        document.foot_comment = end.head_comment;

        let document = Rc::new(document);
        self.check_excessive_aliasing(&document)?;
        Ok(Some(document))
    }

    fn compose_node(&mut self) -> Result<Rc<Node>> {
        let event = self.parser.next_event()?;
        match event.kind {
            EventKind::Alias { .. } => self.compose_alias(event),
            EventKind::Scalar { .. } => self.compose_scalar(event),
            EventKind::SequenceStart { .. } => self.compose_sequence(event),
            EventKind::MappingStart { .. } => self.compose_mapping(event),
            EventKind::StreamEnd => Err(Error::syntax(
                "attempted to go past the end of the stream; corrupted value?",
                event.start,
            )),
            kind => Err(Error::syntax(
                format!("unexpected event while composing a node: {kind:?}"),
                event.start,
            )),
        }
    }

    fn compose_alias(&mut self, event: Event) -> Result<Rc<Node>> {
        let EventKind::Alias { anchor } = event.kind else {
            unreachable!()
        };
        if self.parent_anchors.contains(&anchor) {
            return Err(Error::syntax(
                format!("anchor {anchor:?} value contains itself"),
                event.start,
            ));
        }
        let Some(target) = self.anchors.get(&anchor) else {
            return Err(Error::syntax(
                format!("unknown anchor {anchor:?} referenced"),
                event.start,
            ));
        };
        let mut node = Node::new(NodeKind::Alias);
        node.value = anchor;
        node.alias = Some(Rc::clone(target));
        node.mark = event.start;
        node.head_comment = event.head_comment;
        node.line_comment = event.line_comment;
        Ok(Rc::new(node))
    }

    fn compose_scalar(&mut self, event: Event) -> Result<Rc<Node>> {
        let EventKind::Scalar {
            anchor,
            tag,
            value,
            style,
            ..
        } = event.kind
        else {
            unreachable!()
        };
        let mut node = Node::new(NodeKind::Scalar);
        node.mark = event.start;
        node.head_comment = event.head_comment;
        node.line_comment = event.line_comment;

        // Tag and style resolution. An explicit tag pins the node and is
        // re-emitted; otherwise plain scalars resolve through the core
        // schema and quoted/block scalars are strings. The `<<` merge key
        // only forms from a plain scalar (or the `!` non-specific tag).
        let tag = tag.unwrap_or_default();
        if !tag.is_empty() && tag != "!" {
            node.tag = resolve::long_tag(&tag);
            node.style = match style {
                ScalarStyle::SingleQuoted => Style::SingleQuoted,
                ScalarStyle::DoubleQuoted => Style::DoubleQuoted,
                ScalarStyle::Literal => Style::Literal,
                ScalarStyle::Folded => Style::Folded,
                _ => Style::Tagged,
            };
        } else {
            node.style = match style {
                ScalarStyle::SingleQuoted => Style::SingleQuoted,
                ScalarStyle::DoubleQuoted => Style::DoubleQuoted,
                ScalarStyle::Literal => Style::Literal,
                ScalarStyle::Folded => Style::Folded,
                _ => Style::Plain,
            };
            node.tag = if node.style == Style::Plain {
                if value == "<<" {
                    MERGE_TAG.to_owned()
                } else {
                    resolve::implicit_tag(&value).to_owned()
                }
            } else {
                STR_TAG.to_owned()
            };
        }
        node.value = value;
        node.anchor = anchor;

        let node = Rc::new(node);
        if let Some(name) = node.anchor.clone() {
            self.anchors.insert(name, Rc::clone(&node));
        }
        Ok(node)
    }

    fn compose_sequence(&mut self, event: Event) -> Result<Rc<Node>> {
        let EventKind::SequenceStart {
            anchor,
            tag,
            style,
            ..
        } = event.kind
        else {
            unreachable!()
        };
        let mut node = Node::new(NodeKind::Sequence);
        node.mark = event.start;
        node.head_comment = event.head_comment;
        node.line_comment = event.line_comment;
        node.style = if style == CollectionStyle::Flow {
            Style::Flow
        } else {
            Style::Block
        };
        node.tag = collection_tag(tag, SEQ_TAG);
        node.anchor = anchor;

        if let Some(name) = node.anchor.clone() {
            self.parent_anchors.insert(name);
        }
        loop {
            let next = self.parser.peek_event()?;
            if matches!(next.kind, EventKind::SequenceEnd) {
                let end = self.parser.next_event()?;
                if node.line_comment.is_empty() {
                    node.line_comment = end.line_comment;
                }
                node.foot_comment = end.head_comment;
                break;
            }
            let child = self.compose_node()?;
            node.content.push(child);
        }
        if let Some(name) = node.anchor.clone() {
            self.parent_anchors.remove(&name);
        }

        let node = Rc::new(node);
        if let Some(name) = node.anchor.clone() {
            self.anchors.insert(name, Rc::clone(&node));
        }
        Ok(node)
    }

    fn compose_mapping(&mut self, event: Event) -> Result<Rc<Node>> {
        let EventKind::MappingStart {
            anchor,
            tag,
            style,
            ..
        } = event.kind
        else {
            unreachable!()
        };
        let mut node = Node::new(NodeKind::Mapping);
        node.mark = event.start;
        node.head_comment = event.head_comment;
        node.line_comment = event.line_comment;
        node.style = if style == CollectionStyle::Flow {
            Style::Flow
        } else {
            Style::Block
        };
        node.tag = collection_tag(tag, MAP_TAG);
        node.anchor = anchor;

        if let Some(name) = node.anchor.clone() {
            self.parent_anchors.insert(name);
        }
        loop {
            let next = self.parser.peek_event()?;
            if matches!(next.kind, EventKind::MappingEnd) {
                let end = self.parser.next_event()?;
                if node.line_comment.is_empty() {
                    node.line_comment = end.line_comment;
                }
                node.foot_comment = end.head_comment;
                break;
            }
            let key = self.compose_node()?;
            let value = self.compose_node()?;
            node.content.push(key);
            node.content.push(value);
        }
        if let Some(name) = node.anchor.clone() {
            self.parent_anchors.remove(&name);
        }

        if self.unique_keys {
            self.report_duplicate_keys(&node);
        }
        node.content = self.expand_merge_keys(std::mem::take(&mut node.content))?;

        let node = Rc::new(node);
        if let Some(name) = node.anchor.clone() {
            self.anchors.insert(name, Rc::clone(&node));
        }
        Ok(node)
    }

    /// Pairwise duplicate detection over the direct keys, before merge
    /// expansion. Soft errors; composition continues.
    fn report_duplicate_keys(&mut self, node: &Node) {
        let pairs: Vec<_> = node.pairs().collect();
        for i in 0..pairs.len() {
            for j in (i + 1)..pairs.len() {
                let (first, _) = pairs[i];
                let (second, _) = pairs[j];
                if first.equal_key(second) {
                    self.type_errors.push(UnmarshalError {
                        mark: second.mark,
                        kind: UnmarshalErrorKind::DuplicateKey {
                            key: second.value.clone(),
                            first: first.mark,
                        },
                    });
                }
            }
        }
    }

    /// Expand `<<` merge keys into the enclosing mapping.
    ///
    /// Direct keys win over merged keys; among merged sources, earlier
    /// ones win. When several `<<` keys are present, the last one is the
    /// effective merge source, matching the implementation this
    /// round-trips with.
    fn expand_merge_keys(&mut self, content: Vec<Rc<Node>>) -> Result<Vec<Rc<Node>>> {
        let has_merge = content
            .chunks_exact(2)
            .any(|pair| is_merge_key(&pair[0]));
        if !has_merge {
            return Ok(content);
        }

        let mut direct: Vec<Rc<Node>> = Vec::with_capacity(content.len());
        let mut merge_value: Option<Rc<Node>> = None;
        let mut merge_mark = Mark::default();
        for pair in content.chunks_exact(2) {
            if is_merge_key(&pair[0]) {
                merge_mark = pair[0].mark;
                merge_value = Some(Rc::clone(&pair[1]));
            } else {
                direct.push(Rc::clone(&pair[0]));
                direct.push(Rc::clone(&pair[1]));
            }
        }
        let Some(merge_value) = merge_value else {
            return Ok(direct);
        };

        let mut merged = direct;
        self.merge_into(&merge_value, merge_mark, &mut merged)?;
        Ok(merged)
    }

    /// Merge `source` (a mapping, an alias to a mapping, or a sequence of
    /// such) into `target`, inserting keys not already present.
    fn merge_into(
        &mut self,
        source: &Rc<Node>,
        mark: Mark,
        target: &mut Vec<Rc<Node>>,
    ) -> Result<()> {
        match source.kind {
            NodeKind::Mapping => {
                for (key, value) in source.pairs() {
                    let present = target
                        .chunks_exact(2)
                        .any(|pair| pair[0].equal_key(key));
                    if !present {
                        target.push(Rc::clone(key));
                        target.push(Rc::clone(value));
                    }
                }
                Ok(())
            }
            NodeKind::Alias => {
                let resolved = source.resolved();
                if resolved.kind != NodeKind::Mapping {
                    return Err(merge_error(mark));
                }
                self.merge_into(&resolved, mark, target)
            }
            NodeKind::Sequence => {
                for item in &source.content {
                    let resolved = item.resolved();
                    if resolved.kind != NodeKind::Mapping {
                        return Err(merge_error(item.mark));
                    }
                    self.merge_into(&resolved, mark, target)?;
                }
                Ok(())
            }
            _ => Err(merge_error(mark)),
        }
    }

    /// Walk the composed tree, following aliases, and reject documents
    /// whose alias expansion crosses the quota.
    fn check_excessive_aliasing(&self, root: &Rc<Node>) -> Result<()> {
        let mut counts = AliasCounts::default();
        self.count_visits(root, &mut counts, 0)
    }

    fn count_visits(&self, node: &Rc<Node>, counts: &mut AliasCounts, alias_depth: u32) -> Result<()> {
        counts.decode_count += 1;
        if alias_depth > 0 {
            counts.alias_count += 1;
        }
        if counts.alias_count > 100
            && counts.decode_count > 1000
            && (counts.alias_count as f64 / counts.decode_count as f64)
                > allowed_alias_ratio(counts.decode_count)
        {
            return Err(Error::syntax(
                "document contains excessive aliasing",
                node.mark,
            ));
        }
        if node.kind == NodeKind::Alias {
            if let Some(target) = &node.alias {
                self.count_visits(target, counts, alias_depth + 1)?;
            }
            return Ok(());
        }
        for child in &node.content {
            self.count_visits(child, counts, alias_depth)?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct AliasCounts {
    decode_count: u64,
    alias_count: u64,
}

/// A merge key is a scalar `<<` whose tag is the merge tag (the composer
/// has already resolved plain and `!`-tagged spellings to it).
fn is_merge_key(node: &Node) -> bool {
    node.kind == NodeKind::Scalar && node.value == "<<" && node.tag == MERGE_TAG
}

fn merge_error(mark: Mark) -> Error {
    Error::syntax("map merge requires map or sequence of maps as the value", mark)
}

fn collection_tag(tag: Option<String>, default: &str) -> String {
    match tag {
        Some(tag) if !tag.is_empty() && tag != "!" => resolve::long_tag(&tag),
        _ => default.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use crate::resolve::{BOOL_TAG, INT_TAG, NULL_TAG};
    use crate::scanner::Scanner;

    fn composer(input: &str) -> Composer<'_> {
        // The borrow is tied to the input slice's lifetime, so build the
        // pipeline from the caller's bytes.
        Composer::new(Parser::new(Scanner::new(Reader::new(input.as_bytes()))))
    }

    fn compose_one(input: &str) -> Rc<Node> {
        let mut composer = Composer::new(Parser::new(Scanner::new(Reader::new(input.as_bytes()))));
        let document = composer
            .compose()
            .expect("compose")
            .expect("expected a document");
        assert_eq!(document.kind, NodeKind::Document);
        Rc::clone(&document.content[0])
    }

    #[test]
    fn test_empty_input_is_end_of_stream() {
        let mut composer = composer("");
        assert!(composer.compose().expect("compose").is_none());
        // Repeated calls stay at end of stream.
        assert!(composer.compose().expect("compose").is_none());
    }

    #[test]
    fn test_simple_mapping_resolution() {
        let root = compose_one("a: 1\nb: 2\n");
        assert_eq!(root.kind, NodeKind::Mapping);
        let values: Vec<_> = root
            .content
            .iter()
            .map(|n| (n.tag.clone(), n.value.clone()))
            .collect();
        assert_eq!(
            values,
            vec![
                (STR_TAG.to_owned(), "a".to_owned()),
                (INT_TAG.to_owned(), "1".to_owned()),
                (STR_TAG.to_owned(), "b".to_owned()),
                (INT_TAG.to_owned(), "2".to_owned()),
            ]
        );
    }

    #[test]
    fn test_core_schema_resolution() {
        let root = compose_one("[null, true, 3, 4.5, hi]\n");
        let tags: Vec<_> = root.content.iter().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, vec![NULL_TAG, BOOL_TAG, INT_TAG, "tag:yaml.org,2002:float", STR_TAG]);
    }

    #[test]
    fn test_alias_shares_target() {
        let root = compose_one("a: &x [1, 2]\nb: *x\n");
        let a_value = root.get("a").expect("a");
        let b_value = root.get("b").expect("b");
        assert_eq!(b_value.kind, NodeKind::Alias);
        assert_eq!(b_value.value, "x");
        let target = b_value.alias.as_ref().expect("target");
        assert!(Rc::ptr_eq(target, a_value));
    }

    #[test]
    fn test_unknown_anchor_fails() {
        let mut composer = composer("a: *nope\n");
        let err = composer.compose().expect_err("must fail");
        assert!(err.to_string().contains("unknown anchor \"nope\" referenced"));
    }

    #[test]
    fn test_anchor_containing_itself_fails() {
        let mut composer = composer("&x\nc: *x\n");
        let err = composer.compose().expect_err("must fail");
        assert!(err.to_string().contains("value contains itself"));
    }

    #[test]
    fn test_anchor_redefinition_shadows() {
        let root = compose_one("a: &x 1\nb: &x 2\nc: *x\n");
        let c_value = root.get("c").expect("c").resolved();
        assert_eq!(c_value.value, "2");
    }

    #[test]
    fn test_anchors_are_document_scoped() {
        let input = "a: &x 1\n---\nb: *x\n";
        let mut composer = composer(input);
        composer.compose().expect("first document").expect("some");
        let err = composer.compose().expect_err("second must fail");
        assert!(err.to_string().contains("unknown anchor"));
    }

    #[test]
    fn test_merge_key_union() {
        let root = compose_one("base: &base\n  y: 2\nderived:\n  <<: *base\n  x: 1\n");
        let derived = root.get("derived").expect("derived");
        assert_eq!(derived.get("x").expect("x").value, "1");
        assert_eq!(derived.get("y").expect("y").value, "2");
        // The merge key itself is gone.
        assert!(derived.get("<<").is_none());
    }

    #[test]
    fn test_merge_direct_keys_win() {
        let root = compose_one("base: &base\n  x: 9\n  y: 2\nderived:\n  <<: *base\n  x: 1\n");
        let derived = root.get("derived").expect("derived");
        assert_eq!(derived.get("x").expect("x").value, "1");
        assert_eq!(derived.get("y").expect("y").value, "2");
    }

    #[test]
    fn test_merge_sequence_earlier_wins() {
        let input = "\
a: &a\n  x: 1\nb: &b\n  x: 2\n  y: 2\nm:\n  <<: [*a, *b]\n";
        let root = compose_one(input);
        let merged = root.get("m").expect("m");
        assert_eq!(merged.get("x").expect("x").value, "1");
        assert_eq!(merged.get("y").expect("y").value, "2");
    }

    #[test]
    fn test_merge_inline_mapping() {
        let root = compose_one("m:\n  <<: {x: 1, y: 2}\n  y: 3\n");
        let merged = root.get("m").expect("m");
        assert_eq!(merged.get("x").expect("x").value, "1");
        assert_eq!(merged.get("y").expect("y").value, "3");
    }

    #[test]
    fn test_merge_with_explicit_tag() {
        let root = compose_one("base: &base\n  y: 2\nm:\n  !!merge <<: *base\n  x: 1\n");
        let merged = root.get("m").expect("m");
        assert_eq!(merged.get("y").expect("y").value, "2");
    }

    #[test]
    fn test_merge_requires_mapping() {
        let mut composer = composer("m:\n  <<: [1, 2]\n");
        let err = composer.compose().expect_err("must fail");
        assert!(
            err.to_string()
                .contains("map merge requires map or sequence of maps")
        );
    }

    #[test]
    fn test_quoted_merge_key_is_literal() {
        // A quoted "<<" is a plain string key, not a merge.
        let root = compose_one("base: &base\n  y: 2\nm:\n  \"<<\": *base\n  x: 1\n");
        let mapping = root.get("m").expect("m");
        assert!(mapping.get("<<").is_some());
        assert!(mapping.get("y").is_none());
    }

    #[test]
    fn test_duplicate_keys_reported_when_enabled() {
        let input = "a: 1\na: 2\n";
        let mut composer = composer(input);
        composer.set_unique_keys(true);
        composer.compose().expect("compose").expect("document");
        let errors = composer.type_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("already defined"));
    }

    #[test]
    fn test_finish_reports_group() {
        let mut composer = composer("a: 1\na: 2\n");
        composer.set_unique_keys(true);
        composer.compose().expect("compose").expect("document");
        let err = composer.finish().expect_err("group expected");
        assert!(matches!(err, Error::TypeGroup(_)));
        assert!(err.to_string().contains("unmarshal errors"));
        // Drained; a second finish succeeds.
        composer.finish().expect("drained");
    }

    #[test]
    fn test_duplicate_keys_ignored_when_disabled() {
        let mut composer = composer("a: 1\na: 2\n");
        composer.set_unique_keys(false);
        composer.compose().expect("compose").expect("document");
        assert!(composer.type_errors().is_empty());
        composer.finish().expect("nothing collected");
    }

    #[test]
    fn test_excessive_aliasing_rejected() {
        // The classic billion-laughs shape.
        let mut input = String::from("a: &a [lol, lol, lol, lol, lol, lol, lol, lol, lol]\n");
        for (previous, current) in ('a'..'i').zip('b'..='i') {
            input.push_str(&format!(
                "{current}: &{current} [*{previous}, *{previous}, *{previous}, *{previous}, \
                 *{previous}, *{previous}, *{previous}, *{previous}, *{previous}]\n"
            ));
        }
        let mut composer = composer(&input);
        let err = composer.compose().expect_err("must fail");
        assert!(err.to_string().contains("document contains excessive aliasing"));
    }

    #[test]
    fn test_modest_aliasing_allowed() {
        let root = compose_one("a: &a [1, 2, 3]\nb: [*a, *a, *a]\n");
        assert_eq!(root.get("b").expect("b").content.len(), 3);
    }

    #[test]
    fn test_styles_preserved() {
        let root = compose_one("a: 'single'\nb: \"double\"\nc: |\n  lit\nd: [1]\n");
        assert_eq!(root.get("a").expect("a").style, Style::SingleQuoted);
        assert_eq!(root.get("b").expect("b").style, Style::DoubleQuoted);
        assert_eq!(root.get("c").expect("c").style, Style::Literal);
        assert_eq!(root.get("d").expect("d").style, Style::Flow);
    }

    #[test]
    fn test_literal_scalar_value() {
        let root = compose_one("a: |\n  hello\n  world\n");
        let scalar = root.get("a").expect("a");
        assert_eq!(scalar.value, "hello\nworld\n");
        assert_eq!(scalar.tag, STR_TAG);
    }

    #[test]
    fn test_binary_scalar_decodes() {
        let root = compose_one("v: !!binary gIGC\n");
        let value = root.get("v").expect("v");
        assert_eq!(value.tag, "tag:yaml.org,2002:binary");
        assert_eq!(value.decode_binary().expect("decode"), vec![0x80, 0x81, 0x82]);
    }

    #[test]
    fn test_timestamp_string_stays_quoted_string() {
        let root = compose_one("a: \"2015-02-24T18:19:39Z\"\nb: 2015-02-24T18:19:39Z\n");
        assert_eq!(root.get("a").expect("a").tag, STR_TAG);
        assert_eq!(
            root.get("b").expect("b").tag,
            "tag:yaml.org,2002:timestamp"
        );
    }

    #[test]
    fn test_document_positions_are_one_based() {
        let root = compose_one("a: 1\nb: 2\n");
        let b_key = &root.content[2];
        assert_eq!(b_key.line(), 2);
        assert_eq!(b_key.column(), 1);
    }

    #[test]
    fn test_multiple_documents() {
        let input = "---\na\n---\nb\n";
        let mut composer = composer(input);
        let first = composer.compose().expect("first").expect("some");
        let second = composer.compose().expect("second").expect("some");
        assert_eq!(first.content[0].value, "a");
        assert_eq!(second.content[0].value, "b");
        assert!(composer.compose().expect("end").is_none());
    }

    #[test]
    fn test_trailing_garbage_after_document_end() {
        let input = "a: 1\n...\ngarbage: [\n";
        let mut composer = composer(input);
        let first = composer.compose().expect("first").expect("some");
        assert_eq!(first.content[0].kind, NodeKind::Mapping);
        assert!(composer.compose().is_err());
    }
}
