// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! The serializer: node trees in, events out.
//!
//! Walks a composed (or hand-built) tree and drives an [`Emitter`] with
//! the mirrored event stream. Implicit-tag flags are recomputed here so
//! that values which would change type on re-parse come out quoted or
//! tagged, keeping the round trip lossless.

use std::io;
use std::rc::Rc;

use crate::emitter::Emitter;
use crate::error::{Error, Result};
use crate::event::{CollectionStyle, Event, EventKind};
use crate::node::{Node, NodeKind, Style};
use crate::resolve::{self, MAP_TAG, MERGE_TAG, SEQ_TAG, STR_TAG};
use crate::span::Mark;
use crate::token::ScalarStyle;

/// Drives an [`Emitter`] from node trees, one document per
/// [`serialize`](Serializer::serialize) call.
pub struct Serializer<W: io::Write> {
    emitter: Emitter<W>,
    opened: bool,
    closed: bool,
    documents: usize,
}

impl<W: io::Write> Serializer<W> {
    /// Serialize through `emitter`.
    #[must_use]
    pub fn new(emitter: Emitter<W>) -> Self {
        Self {
            emitter,
            opened: false,
            closed: false,
            documents: 0,
        }
    }

    /// Emit the stream start. Called automatically by the first
    /// [`serialize`](Self::serialize).
    pub fn open(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::marshal("serializer is closed"));
        }
        if !self.opened {
            self.emitter.emit(Event::new(
                EventKind::StreamStart {
                    encoding: crate::reader::Encoding::Utf8,
                },
                Mark::default(),
                Mark::default(),
            ))?;
            self.opened = true;
        }
        Ok(())
    }

    /// Emit the stream end and flush the sink.
    pub fn close(&mut self) -> Result<()> {
        self.open()?;
        if !self.closed {
            self.emitter.emit(Event::new(
                EventKind::StreamEnd,
                Mark::default(),
                Mark::default(),
            ))?;
            self.closed = true;
        }
        Ok(())
    }

    /// Recover the sink. The stream must be closed first.
    pub fn into_inner(self) -> W {
        self.emitter.into_inner()
    }

    /// Serialize one document. Documents after the first are separated
    /// with an explicit `---`.
    pub fn serialize(&mut self, node: &Rc<Node>) -> Result<()> {
        self.open()?;
        let (root, head, foot) = match node.kind {
            NodeKind::Document => {
                let Some(child) = node.content.first() else {
                    return Err(Error::marshal("cannot serialize an empty document node"));
                };
                (
                    Rc::clone(child),
                    node.head_comment.clone(),
                    node.foot_comment.clone(),
                )
            }
            _ => (Rc::clone(node), String::new(), String::new()),
        };

        // A document whose root renders as nothing (an empty null scalar)
        // needs its `---` to exist on the wire at all.
        let empty_root = root.kind == NodeKind::Scalar && root.value.is_empty();
        let mut start = Event::new(
            EventKind::DocumentStart {
                version: None,
                tag_directives: Vec::new(),
                implicit: self.documents == 0 && !empty_root,
            },
            Mark::default(),
            Mark::default(),
        );
        start.head_comment = head;
        self.emitter.emit(start)?;

        self.serialize_node(&root)?;

        let mut end = Event::new(
            EventKind::DocumentEnd { implicit: true },
            Mark::default(),
            Mark::default(),
        );
        end.head_comment = foot;
        self.emitter.emit(end)?;
        self.documents += 1;
        Ok(())
    }

    fn serialize_node(&mut self, node: &Rc<Node>) -> Result<()> {
        match node.kind {
            NodeKind::Alias => {
                if node.value.is_empty() {
                    return Err(Error::marshal("cannot serialize an alias with no anchor"));
                }
                let mut event = Event::new(
                    EventKind::Alias {
                        anchor: node.value.clone(),
                    },
                    Mark::default(),
                    Mark::default(),
                );
                event.line_comment = node.line_comment.clone();
                self.emitter.emit(event)
            }
            NodeKind::Scalar => self.serialize_scalar(node),
            NodeKind::Sequence => self.serialize_sequence(node),
            NodeKind::Mapping => self.serialize_mapping(node),
            NodeKind::Document => Err(Error::marshal(
                "cannot serialize a document inside another document",
            )),
        }
    }

    fn serialize_scalar(&mut self, node: &Node) -> Result<()> {
        let tag = if node.tag.is_empty() {
            plain_resolution(&node.value).to_owned()
        } else {
            node.tag.clone()
        };
        let plain_implicit = tag == plain_resolution(&node.value);
        let quoted_implicit = tag == STR_TAG;
        let style = match node.style {
            Style::Plain => ScalarStyle::Plain,
            Style::SingleQuoted => ScalarStyle::SingleQuoted,
            Style::DoubleQuoted => ScalarStyle::DoubleQuoted,
            Style::Literal => ScalarStyle::Literal,
            Style::Folded => ScalarStyle::Folded,
            _ => ScalarStyle::Any,
        };
        let mut event = Event::new(
            EventKind::Scalar {
                anchor: node.anchor.clone(),
                tag: Some(tag),
                value: node.value.clone(),
                plain_implicit,
                quoted_implicit,
                style,
            },
            node.mark,
            node.mark,
        );
        event.head_comment = node.head_comment.clone();
        event.line_comment = node.line_comment.clone();
        self.emitter.emit(event)
    }

    fn serialize_sequence(&mut self, node: &Node) -> Result<()> {
        let tag = if node.tag.is_empty() {
            SEQ_TAG.to_owned()
        } else {
            node.tag.clone()
        };
        let implicit = tag == SEQ_TAG;
        let mut event = Event::new(
            EventKind::SequenceStart {
                anchor: node.anchor.clone(),
                tag: Some(tag),
                implicit,
                style: collection_style(node.style),
            },
            node.mark,
            node.mark,
        );
        event.head_comment = node.head_comment.clone();
        self.emitter.emit(event)?;
        for child in &node.content {
            self.serialize_node(child)?;
        }
        let mut end = Event::new(EventKind::SequenceEnd, Mark::default(), Mark::default());
        end.head_comment = node.foot_comment.clone();
        end.line_comment = node.line_comment.clone();
        self.emitter.emit(end)
    }

    fn serialize_mapping(&mut self, node: &Node) -> Result<()> {
        if node.content.len() % 2 != 0 {
            return Err(Error::marshal(
                "cannot serialize a mapping with an odd number of children",
            ));
        }
        let tag = if node.tag.is_empty() {
            MAP_TAG.to_owned()
        } else {
            node.tag.clone()
        };
        let implicit = tag == MAP_TAG;
        let mut event = Event::new(
            EventKind::MappingStart {
                anchor: node.anchor.clone(),
                tag: Some(tag),
                implicit,
                style: collection_style(node.style),
            },
            node.mark,
            node.mark,
        );
        event.head_comment = node.head_comment.clone();
        self.emitter.emit(event)?;
        for child in &node.content {
            self.serialize_node(child)?;
        }
        let mut end = Event::new(EventKind::MappingEnd, Mark::default(), Mark::default());
        end.head_comment = node.foot_comment.clone();
        end.line_comment = node.line_comment.clone();
        self.emitter.emit(end)
    }
}

/// The tag a plain rendering of `value` resolves to, including the merge
/// key special case.
fn plain_resolution(value: &str) -> &'static str {
    if value == "<<" {
        MERGE_TAG
    } else {
        resolve::implicit_tag(value)
    }
}

fn collection_style(style: Style) -> CollectionStyle {
    if style == Style::Flow {
        CollectionStyle::Flow
    } else {
        CollectionStyle::Block
    }
}
