// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! The composed node tree.
//!
//! A [`Node`] is the output of composition and the input to serialization.
//! Mapping children are a flat `[k0, v0, k1, v1, …]` list preserving source
//! order. Nodes are reference-counted so that alias targets and merged
//! entries share structure instead of expanding it.

use std::collections::HashMap;
use std::rc::Rc;

use crate::resolve;
use crate::span::Mark;

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The per-document wrapper; exactly one child.
    Document,
    /// A scalar leaf; text in `value`.
    Scalar,
    /// An ordered sequence.
    Sequence,
    /// A mapping with interleaved key/value children.
    Mapping,
    /// A reference to an anchored node; the anchor name in `value`, the
    /// target in `alias`.
    Alias,
}

/// How a node was written, or should be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Unset; the emitter chooses.
    #[default]
    Any,
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
    /// Inline collection layout.
    Flow,
    /// Indentation-based collection layout.
    Block,
    /// Carries an explicit tag that must be re-emitted.
    Tagged,
}

/// A node in the composed tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub kind: NodeKind,
    pub style: Style,
    /// Resolved long-form tag (`tag:yaml.org,2002:str` and friends). The
    /// short form is computed on demand by [`Node::short_tag`].
    pub tag: String,
    /// Scalar text, or the anchor name for alias nodes.
    pub value: String,
    /// Anchor defined on this node, if any.
    pub anchor: Option<String>,
    /// Target of an alias node. Always another node from the same document
    /// that was composed before this one.
    pub alias: Option<Rc<Node>>,
    /// Children, in source order. For mappings: `[k0, v0, k1, v1, …]`.
    pub content: Vec<Rc<Node>>,
    /// Where the node started in the source.
    pub mark: Mark,
    /// Own-line comments immediately above the node.
    pub head_comment: String,
    /// Trailing comment on the node's line.
    pub line_comment: String,
    /// Comment block following the node.
    pub foot_comment: String,
}

impl Default for NodeKind {
    fn default() -> Self {
        Self::Scalar
    }
}

impl Node {
    /// Create an empty node of the given kind.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Create a scalar node with a resolved tag.
    #[must_use]
    pub fn scalar(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Scalar,
            tag: tag.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Attach an anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    /// Set the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// 1-based source line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.mark.display_line()
    }

    /// 1-based source column.
    #[must_use]
    pub fn column(&self) -> usize {
        self.mark.display_column()
    }

    /// The short form of the node's tag (`!!str` for
    /// `tag:yaml.org,2002:str`), computed on demand.
    #[must_use]
    pub fn short_tag(&self) -> String {
        resolve::short_tag(&self.tag)
    }

    /// Iterate a mapping's `(key, value)` pairs.
    ///
    /// Mapping children always have even length; a trailing odd child would
    /// be a composer bug and is skipped.
    pub fn pairs(&self) -> impl Iterator<Item = (&Rc<Node>, &Rc<Node>)> {
        self.content.chunks_exact(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Look up a mapping value by scalar key text.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Rc<Node>> {
        self.pairs()
            .find(|(k, _)| k.kind == NodeKind::Scalar && k.value == key)
            .map(|(_, v)| v)
    }

    /// Follow alias indirection to the underlying node.
    #[must_use]
    pub fn resolved(self: &Rc<Self>) -> Rc<Self> {
        match (&self.kind, &self.alias) {
            (NodeKind::Alias, Some(target)) => Rc::clone(target),
            _ => Rc::clone(self),
        }
    }

    /// Decode the scalar as base64, the representation of `!!binary`.
    pub fn decode_binary(&self) -> crate::error::Result<Vec<u8>> {
        resolve::decode_base64(&self.value, self.mark)
    }

    /// Shallow key equality, used for duplicate detection and merge-key
    /// bookkeeping at composition time.
    ///
    /// Compares kind, scalar text, and structure recursively. Tags are not
    /// compared, and numeric forms are not canonicalized (`10` ≠ `0xA`);
    /// both choices match the source this processor round-trips with.
    #[must_use]
    pub fn equal_key(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match self.kind {
            NodeKind::Scalar => self.value == other.value,
            NodeKind::Sequence | NodeKind::Document => {
                self.content.len() == other.content.len()
                    && self
                        .content
                        .iter()
                        .zip(&other.content)
                        .all(|(a, b)| a.equal_key(b))
            }
            NodeKind::Mapping => self.equal_mapping_key(other),
            NodeKind::Alias => match (&self.alias, &other.alias) {
                (Some(a), Some(b)) => a.equal_key(b),
                _ => false,
            },
        }
    }

    /// Mapping key equality is order-insensitive: bucket one side by a
    /// cheap key signature, then require every pair on the other side to
    /// match its bucket.
    fn equal_mapping_key(&self, other: &Self) -> bool {
        if self.content.len() != other.content.len() {
            return false;
        }
        type Signature<'a> = (NodeKind, &'a str, usize);
        let mut buckets: HashMap<Signature<'_>, Vec<(&Rc<Node>, &Rc<Node>)>> = HashMap::new();
        for (key, value) in self.pairs() {
            buckets
                .entry((key.kind, key.value.as_str(), key.content.len()))
                .or_default()
                .push((key, value));
        }
        for (key, value) in other.pairs() {
            let signature = (key.kind, key.value.as_str(), key.content.len());
            let Some(bucket) = buckets.get(&signature) else {
                return false;
            };
            for (bucket_key, bucket_value) in bucket {
                if !bucket_key.equal_key(key) || !bucket_value.equal_key(value) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{INT_TAG, STR_TAG};

    fn rc(node: Node) -> Rc<Node> {
        Rc::new(node)
    }

    #[test]
    fn test_short_tag_on_demand() {
        let node = Node::scalar(STR_TAG, "hello");
        assert_eq!(node.short_tag(), "!!str");
    }

    #[test]
    fn test_pairs_and_get() {
        let mut mapping = Node::new(NodeKind::Mapping);
        mapping.content = vec![
            rc(Node::scalar(STR_TAG, "a")),
            rc(Node::scalar(INT_TAG, "1")),
            rc(Node::scalar(STR_TAG, "b")),
            rc(Node::scalar(INT_TAG, "2")),
        ];
        assert_eq!(mapping.pairs().count(), 2);
        assert_eq!(mapping.get("b").map(|n| n.value.as_str()), Some("2"));
        assert!(mapping.get("c").is_none());
    }

    #[test]
    fn test_equal_key_scalars() {
        let a = Node::scalar(STR_TAG, "10");
        let b = Node::scalar(INT_TAG, "10");
        // Tags are not compared.
        assert!(a.equal_key(&b));
        // Values are not canonicalized.
        let hex = Node::scalar(INT_TAG, "0xA");
        assert!(!a.equal_key(&hex));
    }

    #[test]
    fn test_equal_key_mapping_order_insensitive() {
        let build = |pairs: &[(&str, &str)]| {
            let mut node = Node::new(NodeKind::Mapping);
            for (k, v) in pairs {
                node.content.push(rc(Node::scalar(STR_TAG, *k)));
                node.content.push(rc(Node::scalar(STR_TAG, *v)));
            }
            node
        };
        let ab = build(&[("a", "1"), ("b", "2")]);
        let ba = build(&[("b", "2"), ("a", "1")]);
        let ax = build(&[("a", "1"), ("b", "3")]);
        assert!(ab.equal_key(&ba));
        assert!(!ab.equal_key(&ax));
    }

    #[test]
    fn test_equal_key_alias_follows_target() {
        let target = rc(Node::scalar(STR_TAG, "x"));
        let mut alias = Node::new(NodeKind::Alias);
        alias.value = "a".to_owned();
        alias.alias = Some(Rc::clone(&target));
        let direct = Node::scalar(STR_TAG, "x");
        assert!(!alias.equal_key(&direct));
        let mut other = Node::new(NodeKind::Alias);
        other.value = "b".to_owned();
        other.alias = Some(target);
        assert!(alias.equal_key(&other));
    }

    #[test]
    fn test_resolved_follows_alias() {
        let target = rc(Node::scalar(STR_TAG, "x"));
        let mut alias = Node::new(NodeKind::Alias);
        alias.alias = Some(Rc::clone(&target));
        let alias = rc(alias);
        assert!(Rc::ptr_eq(&alias.resolved(), &target));
        assert!(Rc::ptr_eq(&target.resolved(), &target));
    }
}
