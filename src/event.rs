// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Parse events.
//!
//! Events are the interface between the parser and the composer on the way
//! in, and between the serializer and the emitter on the way out. The
//! alphabet mirrors the token stream at document granularity: collections
//! become balanced start/end pairs, node properties ride on the start
//! events.

use crate::reader::Encoding;
use crate::span::Mark;
use crate::token::{ScalarStyle, TagDirective};

/// Layout of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionStyle {
    /// Let the emitter choose. Never produced by the parser.
    #[default]
    Any,
    /// Indentation-based layout.
    Block,
    /// Inline `[…]`/`{…}` layout.
    Flow,
}

/// A parse event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// First event of every stream.
    StreamStart {
        /// Detected (decoding) or requested (encoding) character encoding.
        encoding: Encoding,
    },
    /// Last event of every stream.
    StreamEnd,
    /// Start of a document.
    DocumentStart {
        /// `%YAML` version, when the document declared one.
        version: Option<(u32, u32)>,
        /// `%TAG` directives in effect for this document.
        tag_directives: Vec<TagDirective>,
        /// True when the document had no explicit `---` marker.
        implicit: bool,
    },
    /// End of a document.
    DocumentEnd {
        /// True when the document had no explicit `...` marker.
        implicit: bool,
    },
    /// `*anchor`
    Alias { anchor: String },
    /// A scalar value.
    Scalar {
        anchor: Option<String>,
        /// Resolved long-form tag, or `None` for non-specific.
        tag: Option<String>,
        value: String,
        /// True when omitting the tag on a plain rendering round-trips.
        plain_implicit: bool,
        /// True when omitting the tag on a quoted rendering round-trips.
        quoted_implicit: bool,
        style: ScalarStyle,
    },
    /// Start of a sequence.
    SequenceStart {
        anchor: Option<String>,
        tag: Option<String>,
        /// True when the tag may be omitted on output.
        implicit: bool,
        style: CollectionStyle,
    },
    /// End of a sequence.
    SequenceEnd,
    /// Start of a mapping.
    MappingStart {
        anchor: Option<String>,
        tag: Option<String>,
        /// True when the tag may be omitted on output.
        implicit: bool,
        style: CollectionStyle,
    },
    /// End of a mapping.
    MappingEnd,
}

/// An event with its source span and best-effort comment attachments.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub start: Mark,
    pub end: Mark,
    /// Own-line comments preceding the node.
    pub head_comment: String,
    /// Trailing comment on the node's line.
    pub line_comment: String,
    /// Comment block following the node.
    pub foot_comment: String,
}

impl Event {
    /// Create an event spanning `start..end` with no comments attached.
    #[must_use]
    pub fn new(kind: EventKind, start: Mark, end: Mark) -> Self {
        Self {
            kind,
            start,
            end,
            head_comment: String::new(),
            line_comment: String::new(),
            foot_comment: String::new(),
        }
    }

    /// True for `StreamEnd`.
    #[must_use]
    pub fn is_stream_end(&self) -> bool {
        matches!(self.kind, EventKind::StreamEnd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_construction() {
        let event = Event::new(EventKind::StreamEnd, Mark::default(), Mark::default());
        assert!(event.is_stream_end());
        assert!(event.head_comment.is_empty());
    }
}
