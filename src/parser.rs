// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! The parser: tokens in, events out.
//!
//! A deterministic push-down automaton. `state` is the current production,
//! `states` the continuation stack; every transition consumes zero or more
//! tokens and produces exactly one event. The grammar is the YAML 1.2
//! production set collapsed onto the scanner's token alphabet.

use crate::error::{Error, Result};
use crate::event::{CollectionStyle, Event, EventKind};
use crate::resolve::DEFAULT_PREFIX;
use crate::scanner::{MAX_NESTING, Scanner};
use crate::span::Mark;
use crate::token::{ScalarStyle, TagDirective, Token, TokenKind};

/// Parser productions. One continuation is pushed per nested construct, so
/// the stack depth bounds the document's nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StreamStart,
    ImplicitDocumentStart,
    DocumentStart,
    DocumentContent,
    DocumentEnd,
    BlockNode,
    BlockSequenceFirstEntry,
    BlockSequenceEntry,
    IndentlessSequenceEntry,
    BlockMappingFirstKey,
    BlockMappingKey,
    BlockMappingValue,
    FlowSequenceFirstEntry,
    FlowSequenceEntry,
    FlowSequenceEntryMappingKey,
    FlowSequenceEntryMappingValue,
    FlowSequenceEntryMappingEnd,
    FlowMappingFirstKey,
    FlowMappingKey,
    FlowMappingValue,
    FlowMappingEmptyValue,
    End,
}

/// Pull parser over a [`Scanner`].
pub struct Parser<'r> {
    scanner: Scanner<'r>,
    state: State,
    states: Vec<State>,
    /// Start marks of the open constructs, for error context.
    marks: Vec<Mark>,
    /// Handle table for the current document, defaults included.
    tag_directives: Vec<TagDirective>,
    version: Option<(u32, u32)>,
    /// One-event look-ahead buffer.
    current: Option<Event>,
    /// Comments absorbed from consumed tokens, waiting for the next event.
    pending_head: String,
    pending_line: String,
}

impl<'r> Parser<'r> {
    /// Parse events from `scanner`.
    #[must_use]
    pub fn new(scanner: Scanner<'r>) -> Self {
        Self {
            scanner,
            state: State::StreamStart,
            states: Vec::new(),
            marks: Vec::new(),
            tag_directives: default_tag_directives(),
            version: None,
            current: None,
            pending_head: String::new(),
            pending_line: String::new(),
        }
    }

    /// The `%YAML` version of the current document, if declared.
    #[must_use]
    pub fn version(&self) -> Option<(u32, u32)> {
        self.version
    }

    /// Look at the next event without consuming it.
    pub fn peek_event(&mut self) -> Result<&Event> {
        if self.current.is_none() {
            self.current = Some(self.state_machine()?);
        }
        Ok(self.current.as_ref().unwrap_or_else(|| unreachable!()))
    }

    /// Consume and return the next event.
    pub fn next_event(&mut self) -> Result<Event> {
        if let Some(event) = self.current.take() {
            return Ok(event);
        }
        self.state_machine()
    }

    // --- token access ----------------------------------------------------

    fn peek_token(&mut self) -> Result<&Token> {
        self.scanner.peek_token()
    }

    /// Consume the current token, absorbing its comments.
    fn skip_token(&mut self) -> Result<Token> {
        let token = self.scanner.next_token()?;
        if !token.head_comment.is_empty() {
            if !self.pending_head.is_empty() {
                self.pending_head.push('\n');
            }
            self.pending_head.push_str(&token.head_comment);
        }
        if !token.line_comment.is_empty() {
            if !self.pending_line.is_empty() {
                self.pending_line.push(' ');
            }
            self.pending_line.push_str(&token.line_comment);
        }
        Ok(token)
    }

    /// Build an event, attaching and clearing pending comments.
    fn event(&mut self, kind: EventKind, start: Mark, end: Mark) -> Event {
        let mut event = Event::new(kind, start, end);
        event.head_comment = std::mem::take(&mut self.pending_head);
        event.line_comment = std::mem::take(&mut self.pending_line);
        event
    }

    fn push_state(&mut self, state: State) -> Result<()> {
        if self.states.len() >= MAX_NESTING {
            return Err(Error::syntax(
                format!("exceeded max depth of {MAX_NESTING}"),
                self.scanner.mark(),
            ));
        }
        self.states.push(state);
        Ok(())
    }

    fn pop_state(&mut self) -> State {
        self.states.pop().unwrap_or(State::End)
    }

    // --- the automaton ---------------------------------------------------

    fn state_machine(&mut self) -> Result<Event> {
        match self.state {
            State::StreamStart => self.parse_stream_start(),
            State::ImplicitDocumentStart => self.parse_document_start(true),
            State::DocumentStart => self.parse_document_start(false),
            State::DocumentContent => self.parse_document_content(),
            State::DocumentEnd => self.parse_document_end(),
            State::BlockNode => self.parse_node(true, false),
            State::BlockSequenceFirstEntry => self.parse_block_sequence_entry(true),
            State::BlockSequenceEntry => self.parse_block_sequence_entry(false),
            State::IndentlessSequenceEntry => self.parse_indentless_sequence_entry(),
            State::BlockMappingFirstKey => self.parse_block_mapping_key(true),
            State::BlockMappingKey => self.parse_block_mapping_key(false),
            State::BlockMappingValue => self.parse_block_mapping_value(),
            State::FlowSequenceFirstEntry => self.parse_flow_sequence_entry(true),
            State::FlowSequenceEntry => self.parse_flow_sequence_entry(false),
            State::FlowSequenceEntryMappingKey => self.parse_flow_sequence_entry_mapping_key(),
            State::FlowSequenceEntryMappingValue => self.parse_flow_sequence_entry_mapping_value(),
            State::FlowSequenceEntryMappingEnd => self.parse_flow_sequence_entry_mapping_end(),
            State::FlowMappingFirstKey => self.parse_flow_mapping_key(true),
            State::FlowMappingKey => self.parse_flow_mapping_key(false),
            State::FlowMappingValue => self.parse_flow_mapping_value(false),
            State::FlowMappingEmptyValue => self.parse_flow_mapping_value(true),
            State::End => Err(Error::syntax(
                "attempted to read past the end of the stream",
                self.scanner.mark(),
            )),
        }
    }

    fn parse_stream_start(&mut self) -> Result<Event> {
        let token = self.skip_token()?;
        let TokenKind::StreamStart(encoding) = token.kind else {
            return Err(Error::syntax(
                format!("expected stream start but found {}", token.kind),
                token.start,
            ));
        };
        self.state = State::ImplicitDocumentStart;
        Ok(self.event(EventKind::StreamStart { encoding }, token.start, token.end))
    }

    fn parse_document_start(&mut self, implicit: bool) -> Result<Event> {
        if !implicit {
            // Extra `...` markers between documents are allowed.
            while self.peek_token()?.kind == TokenKind::DocumentEnd {
                self.skip_token()?;
            }
        }

        let token_kind = self.peek_token()?.kind.clone();
        let starts_directive = matches!(
            token_kind,
            TokenKind::VersionDirective { .. } | TokenKind::TagDirective(_)
        );

        if implicit
            && !starts_directive
            && token_kind != TokenKind::DocumentStart
            && token_kind != TokenKind::StreamEnd
        {
            // Bare content: an implicit document.
            self.tag_directives = default_tag_directives();
            let mark = self.peek_token()?.start;
            self.push_state(State::DocumentEnd)?;
            self.state = State::BlockNode;
            return Ok(self.event(
                EventKind::DocumentStart {
                    version: None,
                    tag_directives: Vec::new(),
                    implicit: true,
                },
                mark,
                mark,
            ));
        }

        if self.peek_token()?.kind == TokenKind::StreamEnd {
            let token = self.skip_token()?;
            self.state = State::End;
            return Ok(self.event(EventKind::StreamEnd, token.start, token.end));
        }

        let start_mark = self.peek_token()?.start;
        let (version, declared) = self.process_directives()?;
        let token = self.peek_token()?;
        if token.kind != TokenKind::DocumentStart {
            return Err(Error::syntax(
                "did not find expected <document start>",
                token.start,
            ));
        }
        let token = self.skip_token()?;
        self.push_state(State::DocumentEnd)?;
        self.state = State::DocumentContent;
        Ok(self.event(
            EventKind::DocumentStart {
                version,
                tag_directives: declared,
                implicit: false,
            },
            start_mark,
            token.end,
        ))
    }

    /// Consume `%YAML`/`%TAG` tokens, returning the declared version and
    /// tag directives, and install the handle table (defaults included).
    fn process_directives(&mut self) -> Result<(Option<(u32, u32)>, Vec<TagDirective>)> {
        let mut version: Option<(u32, u32)> = None;
        let mut declared: Vec<TagDirective> = Vec::new();
        loop {
            let token = self.peek_token()?;
            match &token.kind {
                TokenKind::VersionDirective { major, minor } => {
                    if version.is_some() {
                        return Err(Error::syntax("found duplicate %YAML directive", token.start));
                    }
                    if *major != 1 {
                        return Err(Error::syntax(
                            "found incompatible YAML document",
                            token.start,
                        ));
                    }
                    version = Some((*major, *minor));
                    self.skip_token()?;
                }
                TokenKind::TagDirective(directive) => {
                    if declared.iter().any(|d| d.handle == directive.handle) {
                        return Err(Error::syntax("found duplicate %TAG directive", token.start));
                    }
                    declared.push(directive.clone());
                    self.skip_token()?;
                }
                _ => break,
            }
        }
        let mut table = declared.clone();
        for default in default_tag_directives() {
            if !table.iter().any(|d| d.handle == default.handle) {
                table.push(default);
            }
        }
        self.tag_directives = table;
        self.version = version;
        Ok((version, declared))
    }

    fn parse_document_content(&mut self) -> Result<Event> {
        let token = self.peek_token()?;
        if matches!(
            token.kind,
            TokenKind::VersionDirective { .. }
                | TokenKind::TagDirective(_)
                | TokenKind::DocumentStart
                | TokenKind::DocumentEnd
                | TokenKind::StreamEnd
        ) {
            let mark = token.start;
            self.state = self.pop_state();
            return Ok(self.empty_scalar(mark));
        }
        self.parse_node(true, false)
    }

    fn parse_document_end(&mut self) -> Result<Event> {
        let token = self.peek_token()?;
        let start_mark = token.start;
        let mut end_mark = token.start;
        let implicit = if token.kind == TokenKind::DocumentEnd {
            let token = self.skip_token()?;
            end_mark = token.end;
            false
        } else {
            true
        };
        // Handles are document-scoped.
        self.tag_directives = default_tag_directives();
        self.version = None;
        self.state = State::DocumentStart;
        Ok(self.event(EventKind::DocumentEnd { implicit }, start_mark, end_mark))
    }

    /// Parse a node: properties (anchor, tag) followed by content.
    ///
    /// `block` allows block collections; `indentless_sequence` allows a
    /// sequence whose entries sit at the parent mapping's indentation.
    fn parse_node(&mut self, block: bool, indentless_sequence: bool) -> Result<Event> {
        let token = self.peek_token()?;

        if let TokenKind::Alias(_) = &token.kind {
            let token = self.skip_token()?;
            let TokenKind::Alias(anchor) = token.kind else {
                unreachable!()
            };
            self.state = self.pop_state();
            return Ok(self.event(EventKind::Alias { anchor }, token.start, token.end));
        }

        let start_mark = token.start;
        let mut end_mark = token.start;
        let mut anchor: Option<String> = None;
        let mut tag: Option<String> = None;
        let mut tag_mark = start_mark;

        // Properties may come in either order, once each.
        loop {
            let token = self.peek_token()?;
            match &token.kind {
                TokenKind::Anchor(_) if anchor.is_none() => {
                    let token = self.skip_token()?;
                    let TokenKind::Anchor(name) = token.kind else {
                        unreachable!()
                    };
                    anchor = Some(name);
                    end_mark = token.end;
                }
                TokenKind::Tag { .. } if tag.is_none() => {
                    tag_mark = token.start;
                    let token = self.skip_token()?;
                    let TokenKind::Tag { handle, suffix } = token.kind else {
                        unreachable!()
                    };
                    tag = Some(self.resolve_tag(&handle, suffix, tag_mark, start_mark)?);
                    end_mark = token.end;
                }
                _ => break,
            }
        }

        let token = self.peek_token()?;
        match &token.kind {
            TokenKind::BlockEntry if indentless_sequence => {
                let mark = token.start;
                let implicit = tag.is_none();
                self.state = State::IndentlessSequenceEntry;
                Ok(self.event(
                    EventKind::SequenceStart {
                        anchor,
                        tag,
                        implicit,
                        style: CollectionStyle::Block,
                    },
                    start_mark,
                    mark,
                ))
            }
            TokenKind::Scalar { .. } => {
                let token = self.skip_token()?;
                let TokenKind::Scalar { value, style } = token.kind else {
                    unreachable!()
                };
                let plain_implicit =
                    style == ScalarStyle::Plain && (tag.is_none() || tag.as_deref() == Some("!"));
                let quoted_implicit = style != ScalarStyle::Plain && tag.is_none();
                self.state = self.pop_state();
                Ok(self.event(
                    EventKind::Scalar {
                        anchor,
                        tag,
                        value,
                        plain_implicit,
                        quoted_implicit,
                        style,
                    },
                    start_mark,
                    token.end,
                ))
            }
            TokenKind::FlowSequenceStart => {
                let mark = token.end;
                let implicit = tag.is_none();
                self.state = State::FlowSequenceFirstEntry;
                Ok(self.event(
                    EventKind::SequenceStart {
                        anchor,
                        tag,
                        implicit,
                        style: CollectionStyle::Flow,
                    },
                    start_mark,
                    mark,
                ))
            }
            TokenKind::FlowMappingStart => {
                let mark = token.end;
                let implicit = tag.is_none();
                self.state = State::FlowMappingFirstKey;
                Ok(self.event(
                    EventKind::MappingStart {
                        anchor,
                        tag,
                        implicit,
                        style: CollectionStyle::Flow,
                    },
                    start_mark,
                    mark,
                ))
            }
            TokenKind::BlockSequenceStart if block => {
                let mark = token.end;
                let implicit = tag.is_none();
                self.state = State::BlockSequenceFirstEntry;
                Ok(self.event(
                    EventKind::SequenceStart {
                        anchor,
                        tag,
                        implicit,
                        style: CollectionStyle::Block,
                    },
                    start_mark,
                    mark,
                ))
            }
            TokenKind::BlockMappingStart if block => {
                let mark = token.end;
                let implicit = tag.is_none();
                self.state = State::BlockMappingFirstKey;
                Ok(self.event(
                    EventKind::MappingStart {
                        anchor,
                        tag,
                        implicit,
                        style: CollectionStyle::Block,
                    },
                    start_mark,
                    mark,
                ))
            }
            _ if anchor.is_some() || tag.is_some() => {
                // Properties with no content: an empty scalar.
                let plain_implicit = tag.is_none();
                self.state = self.pop_state();
                Ok(self.event(
                    EventKind::Scalar {
                        anchor,
                        tag,
                        value: String::new(),
                        plain_implicit,
                        quoted_implicit: false,
                        style: ScalarStyle::Plain,
                    },
                    start_mark,
                    end_mark,
                ))
            }
            _ => {
                let context = if block {
                    "while parsing a block node"
                } else {
                    "while parsing a flow node"
                };
                Err(Error::syntax_in(
                    "did not find expected node content",
                    token.start,
                    context,
                    start_mark,
                ))
            }
        }
    }

    /// Expand a tag handle against the document's `%TAG` table.
    fn resolve_tag(
        &mut self,
        handle: &str,
        suffix: String,
        tag_mark: Mark,
        start_mark: Mark,
    ) -> Result<String> {
        if handle.is_empty() {
            // Verbatim tag.
            return Ok(suffix);
        }
        if handle == "!" && suffix.is_empty() {
            return Ok("!".to_owned());
        }
        for directive in &self.tag_directives {
            if directive.handle == handle {
                return Ok(format!("{}{}", directive.prefix, suffix));
            }
        }
        if handle == "!" {
            // The primary handle defaults to itself.
            return Ok(format!("!{suffix}"));
        }
        Err(Error::syntax_in(
            format!("found undefined tag handle {handle:?}"),
            tag_mark,
            "while parsing a node",
            start_mark,
        ))
    }

    fn empty_scalar(&mut self, mark: Mark) -> Event {
        self.event(
            EventKind::Scalar {
                anchor: None,
                tag: None,
                value: String::new(),
                plain_implicit: true,
                quoted_implicit: false,
                style: ScalarStyle::Plain,
            },
            mark,
            mark,
        )
    }

    // --- block collections ------------------------------------------------

    fn parse_block_sequence_entry(&mut self, first: bool) -> Result<Event> {
        if first {
            let token = self.skip_token()?;
            debug_assert_eq!(token.kind, TokenKind::BlockSequenceStart);
            self.marks.push(token.start);
        }
        let token = self.peek_token()?;
        match token.kind {
            TokenKind::BlockEntry => {
                let token = self.skip_token()?;
                let next = self.peek_token()?;
                if matches!(next.kind, TokenKind::BlockEntry | TokenKind::BlockEnd) {
                    let mark = token.end;
                    self.state = State::BlockSequenceEntry;
                    Ok(self.empty_scalar(mark))
                } else {
                    self.push_state(State::BlockSequenceEntry)?;
                    self.parse_node(true, false)
                }
            }
            TokenKind::BlockEnd => {
                let token = self.skip_token()?;
                self.marks.pop();
                self.state = self.pop_state();
                Ok(self.event(EventKind::SequenceEnd, token.start, token.end))
            }
            _ => {
                let mark = token.start;
                let context_mark = self.marks.last().copied().unwrap_or_default();
                Err(Error::syntax_in(
                    "did not find expected '-' indicator",
                    mark,
                    "while parsing a block collection",
                    context_mark,
                ))
            }
        }
    }

    fn parse_indentless_sequence_entry(&mut self) -> Result<Event> {
        let token = self.peek_token()?;
        if token.kind == TokenKind::BlockEntry {
            let token = self.skip_token()?;
            let next = self.peek_token()?;
            if matches!(
                next.kind,
                TokenKind::BlockEntry | TokenKind::Key | TokenKind::Value | TokenKind::BlockEnd
            ) {
                let mark = token.end;
                self.state = State::IndentlessSequenceEntry;
                Ok(self.empty_scalar(mark))
            } else {
                self.push_state(State::IndentlessSequenceEntry)?;
                self.parse_node(true, false)
            }
        } else {
            let mark = token.start;
            self.state = self.pop_state();
            Ok(self.event(EventKind::SequenceEnd, mark, mark))
        }
    }

    fn parse_block_mapping_key(&mut self, first: bool) -> Result<Event> {
        if first {
            let token = self.skip_token()?;
            debug_assert_eq!(token.kind, TokenKind::BlockMappingStart);
            self.marks.push(token.start);
        }
        let token = self.peek_token()?;
        match token.kind {
            TokenKind::Key => {
                let token = self.skip_token()?;
                let next = self.peek_token()?;
                if matches!(
                    next.kind,
                    TokenKind::Key | TokenKind::Value | TokenKind::BlockEnd
                ) {
                    let mark = token.end;
                    self.state = State::BlockMappingValue;
                    Ok(self.empty_scalar(mark))
                } else {
                    self.push_state(State::BlockMappingValue)?;
                    self.parse_node(true, true)
                }
            }
            TokenKind::BlockEnd => {
                let token = self.skip_token()?;
                self.marks.pop();
                self.state = self.pop_state();
                Ok(self.event(EventKind::MappingEnd, token.start, token.end))
            }
            _ => {
                let mark = token.start;
                let context_mark = self.marks.last().copied().unwrap_or_default();
                Err(Error::syntax_in(
                    "did not find expected key",
                    mark,
                    "while parsing a block mapping",
                    context_mark,
                ))
            }
        }
    }

    fn parse_block_mapping_value(&mut self) -> Result<Event> {
        let token = self.peek_token()?;
        if token.kind == TokenKind::Value {
            let token = self.skip_token()?;
            let next = self.peek_token()?;
            if matches!(
                next.kind,
                TokenKind::Key | TokenKind::Value | TokenKind::BlockEnd
            ) {
                let mark = token.end;
                self.state = State::BlockMappingKey;
                Ok(self.empty_scalar(mark))
            } else {
                self.push_state(State::BlockMappingKey)?;
                self.parse_node(true, true)
            }
        } else {
            let mark = token.start;
            self.state = State::BlockMappingKey;
            Ok(self.empty_scalar(mark))
        }
    }

    // --- flow collections -------------------------------------------------

    fn parse_flow_sequence_entry(&mut self, first: bool) -> Result<Event> {
        if first {
            let token = self.skip_token()?;
            debug_assert_eq!(token.kind, TokenKind::FlowSequenceStart);
            self.marks.push(token.start);
        }
        let token = self.peek_token()?;
        if token.kind != TokenKind::FlowSequenceEnd {
            if !first {
                if token.kind == TokenKind::FlowEntry {
                    self.skip_token()?;
                } else {
                    let mark = token.start;
                    let context_mark = self.marks.last().copied().unwrap_or_default();
                    return Err(Error::syntax_in(
                        "did not find expected ',' or ']'",
                        mark,
                        "while parsing a flow sequence",
                        context_mark,
                    ));
                }
            }
            let token = self.peek_token()?;
            match token.kind {
                TokenKind::Key => {
                    // A single-pair mapping inside a flow sequence.
                    let token = self.skip_token()?;
                    self.state = State::FlowSequenceEntryMappingKey;
                    return Ok(self.event(
                        EventKind::MappingStart {
                            anchor: None,
                            tag: None,
                            implicit: true,
                            style: CollectionStyle::Flow,
                        },
                        token.start,
                        token.end,
                    ));
                }
                TokenKind::FlowSequenceEnd => {}
                _ => {
                    self.push_state(State::FlowSequenceEntry)?;
                    return self.parse_node(false, false);
                }
            }
        }
        let token = self.skip_token()?;
        self.marks.pop();
        self.state = self.pop_state();
        Ok(self.event(EventKind::SequenceEnd, token.start, token.end))
    }

    fn parse_flow_sequence_entry_mapping_key(&mut self) -> Result<Event> {
        let token = self.peek_token()?;
        if matches!(
            token.kind,
            TokenKind::Value | TokenKind::FlowEntry | TokenKind::FlowSequenceEnd
        ) {
            let mark = token.start;
            self.state = State::FlowSequenceEntryMappingValue;
            Ok(self.empty_scalar(mark))
        } else {
            self.push_state(State::FlowSequenceEntryMappingValue)?;
            self.parse_node(false, false)
        }
    }

    fn parse_flow_sequence_entry_mapping_value(&mut self) -> Result<Event> {
        let token = self.peek_token()?;
        if token.kind == TokenKind::Value {
            let token = self.skip_token()?;
            let next = self.peek_token()?;
            if matches!(
                next.kind,
                TokenKind::FlowEntry | TokenKind::FlowSequenceEnd
            ) {
                let mark = token.end;
                self.state = State::FlowSequenceEntryMappingEnd;
                Ok(self.empty_scalar(mark))
            } else {
                self.push_state(State::FlowSequenceEntryMappingEnd)?;
                self.parse_node(false, false)
            }
        } else {
            let mark = token.start;
            self.state = State::FlowSequenceEntryMappingEnd;
            Ok(self.empty_scalar(mark))
        }
    }

    fn parse_flow_sequence_entry_mapping_end(&mut self) -> Result<Event> {
        let mark = self.peek_token()?.start;
        self.state = State::FlowSequenceEntry;
        Ok(self.event(EventKind::MappingEnd, mark, mark))
    }

    fn parse_flow_mapping_key(&mut self, first: bool) -> Result<Event> {
        if first {
            let token = self.skip_token()?;
            debug_assert_eq!(token.kind, TokenKind::FlowMappingStart);
            self.marks.push(token.start);
        }
        let token = self.peek_token()?;
        if token.kind != TokenKind::FlowMappingEnd {
            if !first {
                if token.kind == TokenKind::FlowEntry {
                    self.skip_token()?;
                } else {
                    let mark = token.start;
                    let context_mark = self.marks.last().copied().unwrap_or_default();
                    return Err(Error::syntax_in(
                        "did not find expected ',' or '}'",
                        mark,
                        "while parsing a flow mapping",
                        context_mark,
                    ));
                }
            }
            let token = self.peek_token()?;
            match token.kind {
                TokenKind::Key => {
                    let token = self.skip_token()?;
                    let next = self.peek_token()?;
                    if matches!(
                        next.kind,
                        TokenKind::Value | TokenKind::FlowEntry | TokenKind::FlowMappingEnd
                    ) {
                        let mark = token.end;
                        self.state = State::FlowMappingValue;
                        return Ok(self.empty_scalar(mark));
                    }
                    self.push_state(State::FlowMappingValue)?;
                    return self.parse_node(false, false);
                }
                TokenKind::FlowMappingEnd => {}
                _ => {
                    // A value-less entry: the node is the key, the value is
                    // an empty scalar.
                    self.push_state(State::FlowMappingEmptyValue)?;
                    return self.parse_node(false, false);
                }
            }
        }
        let token = self.skip_token()?;
        self.marks.pop();
        self.state = self.pop_state();
        Ok(self.event(EventKind::MappingEnd, token.start, token.end))
    }

    fn parse_flow_mapping_value(&mut self, empty: bool) -> Result<Event> {
        let token = self.peek_token()?;
        let mark = token.start;
        if empty {
            self.state = State::FlowMappingKey;
            return Ok(self.empty_scalar(mark));
        }
        if token.kind == TokenKind::Value {
            let token = self.skip_token()?;
            let next = self.peek_token()?;
            if !matches!(
                next.kind,
                TokenKind::FlowEntry | TokenKind::FlowMappingEnd
            ) {
                self.push_state(State::FlowMappingKey)?;
                return self.parse_node(false, false);
            }
            let mark = token.end;
            self.state = State::FlowMappingKey;
            return Ok(self.empty_scalar(mark));
        }
        self.state = State::FlowMappingKey;
        Ok(self.empty_scalar(mark))
    }
}

fn default_tag_directives() -> Vec<TagDirective> {
    vec![
        TagDirective {
            handle: "!".to_owned(),
            prefix: "!".to_owned(),
        },
        TagDirective {
            handle: "!!".to_owned(),
            prefix: DEFAULT_PREFIX.to_owned(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;

    fn events(input: &str) -> Vec<EventKind> {
        let mut parser = Parser::new(Scanner::new(Reader::new(input.as_bytes())));
        let mut out = Vec::new();
        loop {
            let event = parser.next_event().expect("parse");
            let done = event.is_stream_end();
            out.push(event.kind);
            if done {
                break;
            }
        }
        out
    }

    fn scalar_values(kinds: &[EventKind]) -> Vec<&str> {
        kinds
            .iter()
            .filter_map(|kind| match kind {
                EventKind::Scalar { value, .. } => Some(value.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_stream_events() {
        let kinds = events("");
        assert!(matches!(kinds[0], EventKind::StreamStart { .. }));
        assert_eq!(kinds[1], EventKind::StreamEnd);
    }

    #[test]
    fn test_simple_mapping_events() {
        let kinds = events("a: 1\n");
        assert!(matches!(kinds[1], EventKind::DocumentStart { implicit: true, .. }));
        assert!(matches!(
            kinds[2],
            EventKind::MappingStart {
                style: CollectionStyle::Block,
                ..
            }
        ));
        assert_eq!(scalar_values(&kinds), vec!["a", "1"]);
        assert!(matches!(kinds[5], EventKind::MappingEnd));
        assert!(matches!(kinds[6], EventKind::DocumentEnd { implicit: true }));
    }

    #[test]
    fn test_explicit_document_events() {
        let kinds = events("---\na\n...\n");
        assert!(matches!(
            kinds[1],
            EventKind::DocumentStart { implicit: false, .. }
        ));
        assert!(matches!(kinds[3], EventKind::DocumentEnd { implicit: false }));
    }

    #[test]
    fn test_multi_document_events() {
        let kinds = events("---\na\n---\nb\n");
        let doc_starts = kinds
            .iter()
            .filter(|kind| matches!(kind, EventKind::DocumentStart { .. }))
            .count();
        assert_eq!(doc_starts, 2);
        assert_eq!(scalar_values(&kinds), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_value_becomes_empty_scalar() {
        let kinds = events("a:\nb: 1\n");
        assert_eq!(scalar_values(&kinds), vec!["a", "", "b", "1"]);
    }

    #[test]
    fn test_indentless_sequence() {
        let kinds = events("a:\n- 1\n- 2\n");
        assert!(kinds.iter().any(|kind| matches!(
            kind,
            EventKind::SequenceStart {
                style: CollectionStyle::Block,
                ..
            }
        )));
        assert_eq!(scalar_values(&kinds), vec!["a", "1", "2"]);
    }

    #[test]
    fn test_flow_sequence_with_pair() {
        let kinds = events("[a, b: c]\n");
        // The `b: c` entry becomes an implicit single-pair mapping.
        assert!(kinds.iter().any(|kind| matches!(
            kind,
            EventKind::MappingStart {
                style: CollectionStyle::Flow,
                ..
            }
        )));
        assert_eq!(scalar_values(&kinds), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_anchor_and_alias_events() {
        let kinds = events("a: &x [1, 2]\nb: *x\n");
        assert!(kinds.iter().any(|kind| matches!(
            kind,
            EventKind::SequenceStart { anchor: Some(anchor), .. } if anchor == "x"
        )));
        assert!(kinds.iter().any(|kind| matches!(
            kind,
            EventKind::Alias { anchor } if anchor == "x"
        )));
    }

    #[test]
    fn test_tag_events() {
        let kinds = events("!!str 123\n");
        assert!(kinds.iter().any(|kind| matches!(
            kind,
            EventKind::Scalar { tag: Some(tag), .. } if tag == "tag:yaml.org,2002:str"
        )));
    }

    #[test]
    fn test_tag_directive_resolution() {
        let kinds = events("%TAG !e! tag:example.com,2000:\n---\n!e!foo bar\n");
        assert!(kinds.iter().any(|kind| matches!(
            kind,
            EventKind::Scalar { tag: Some(tag), .. } if tag == "tag:example.com,2000:foo"
        )));
    }

    #[test]
    fn test_undefined_tag_handle_fails() {
        let mut parser = Parser::new(Scanner::new(Reader::new(b"!e!foo bar\n".as_ref())));
        let mut failed = false;
        for _ in 0..8 {
            match parser.next_event() {
                Err(_) => {
                    failed = true;
                    break;
                }
                Ok(event) if event.is_stream_end() => break,
                Ok(_) => {}
            }
        }
        assert!(failed);
    }

    #[test]
    fn test_incompatible_version_fails() {
        let mut parser = Parser::new(Scanner::new(Reader::new(b"%YAML 2.0\n---\na\n".as_ref())));
        let mut failed = false;
        for _ in 0..8 {
            match parser.next_event() {
                Err(_) => {
                    failed = true;
                    break;
                }
                Ok(event) if event.is_stream_end() => break,
                Ok(_) => {}
            }
        }
        assert!(failed);
    }

    #[test]
    fn test_version_minor_is_tolerated() {
        let kinds = events("%YAML 1.1\n---\na\n");
        assert!(kinds.iter().any(|kind| matches!(
            kind,
            EventKind::DocumentStart { version: Some((1, 1)), .. }
        )));
    }

    #[test]
    fn test_content_after_document_end_requires_marker() {
        let mut parser = Parser::new(Scanner::new(Reader::new(
            b"a\n...\ngarbage: here\n".as_ref(),
        )));
        let mut failed = false;
        for _ in 0..16 {
            match parser.next_event() {
                Err(_) => {
                    failed = true;
                    break;
                }
                Ok(event) if event.is_stream_end() => break,
                Ok(_) => {}
            }
        }
        assert!(failed);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut parser = Parser::new(Scanner::new(Reader::new(b"a\n".as_ref())));
        let peeked = parser.peek_event().expect("peek").kind.clone();
        let taken = parser.next_event().expect("next").kind;
        assert_eq!(peeked, taken);
    }
}
