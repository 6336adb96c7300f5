// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! The emitter: events in, YAML bytes out.
//!
//! A state machine mirroring the parser's, driving an output sink. Events
//! are buffered just far enough to decide whether a mapping key fits on
//! one line as a simple key. Output is always UTF-8 without a BOM.

mod scalar;

use std::collections::VecDeque;
use std::io;

use crate::error::{Error, Result};
use crate::event::{CollectionStyle, Event, EventKind};
use crate::resolve::DEFAULT_PREFIX;
use crate::token::{ScalarStyle, TagDirective};

use scalar::ScalarAnalysis;

/// Longest scalar that may be used as a simple key, matching the scanner's
/// look-ahead budget.
const MAX_SIMPLE_KEY_LENGTH: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StreamStart,
    FirstDocumentStart,
    DocumentStart,
    DocumentContent,
    DocumentEnd,
    FlowSequenceFirstItem,
    FlowSequenceItem,
    FlowMappingFirstKey,
    FlowMappingKey,
    FlowMappingSimpleValue,
    FlowMappingValue,
    BlockSequenceFirstItem,
    BlockSequenceItem,
    BlockMappingFirstKey,
    BlockMappingKey,
    BlockMappingSimpleValue,
    BlockMappingValue,
    End,
}

/// Prepared tag text for the current node.
#[derive(Debug, Default, Clone)]
struct TagData {
    handle: String,
    suffix: String,
}

/// Event consumer producing YAML text on a sink.
pub struct Emitter<W: io::Write> {
    sink: W,
    state: State,
    states: Vec<State>,
    events: VecDeque<Event>,
    indents: Vec<i64>,
    indent: i64,
    flow_level: usize,

    /// Configured indentation step (1..=9).
    best_indent: usize,
    /// Soft wrap column.
    best_width: usize,

    // Output position tracking.
    column: usize,
    /// Last emitted character was whitespace.
    whitespace: bool,
    /// Only indentation has been written on the current line.
    indention: bool,
    /// The previous document ended without an explicit `...`.
    open_ended: bool,

    // Context flags for the node currently being emitted.
    root_context: bool,
    mapping_context: bool,
    simple_key_context: bool,

    tag_directives: Vec<TagDirective>,
    anchor_data: Option<(String, bool)>,
    tag_data: Option<TagData>,
    analysis: Option<ScalarAnalysis>,
    chosen_style: ScalarStyle,
}

impl<W: io::Write> Emitter<W> {
    /// Emit to `sink` with the default indent (4) and width (80).
    #[must_use]
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: State::StreamStart,
            states: Vec::new(),
            events: VecDeque::new(),
            indents: Vec::new(),
            indent: -1,
            flow_level: 0,
            best_indent: 4,
            best_width: 80,
            column: 0,
            whitespace: true,
            indention: true,
            open_ended: false,
            root_context: false,
            mapping_context: false,
            simple_key_context: false,
            tag_directives: Vec::new(),
            anchor_data: None,
            tag_data: None,
            analysis: None,
            chosen_style: ScalarStyle::Any,
        }
    }

    /// Set the indentation step. Values outside 1..=9 fall back to 4.
    pub fn set_indent(&mut self, indent: usize) {
        self.best_indent = if (1..=9).contains(&indent) { indent } else { 4 };
    }

    /// Set the soft wrap column. Values below 8 disable wrapping.
    pub fn set_width(&mut self, width: usize) {
        self.best_width = if width >= 8 { width } else { usize::MAX };
    }

    /// Recover the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Queue `event` and emit everything that is decidable.
    pub fn emit(&mut self, event: Event) -> Result<()> {
        self.events.push_back(event);
        while !self.need_more_events() {
            let event = self
                .events
                .pop_front()
                .unwrap_or_else(|| unreachable!("need_more_events checked non-empty"));
            self.emit_event(event)?;
        }
        Ok(())
    }

    /// Whether the queued events are insufficient to decide the next step
    /// (a collection start needs look-ahead for simple-key analysis).
    fn need_more_events(&self) -> bool {
        let Some(front) = self.events.front() else {
            return true;
        };
        let accumulate = match front.kind {
            EventKind::DocumentStart { .. } => 1,
            EventKind::SequenceStart { .. } => 2,
            EventKind::MappingStart { .. } => 3,
            _ => return false,
        };
        if self.events.len() > accumulate {
            return false;
        }
        // Enough once the front construct is balanced in the queue.
        let mut level = 0i64;
        for event in &self.events {
            match event.kind {
                EventKind::StreamStart { .. }
                | EventKind::DocumentStart { .. }
                | EventKind::SequenceStart { .. }
                | EventKind::MappingStart { .. } => level += 1,
                EventKind::StreamEnd
                | EventKind::DocumentEnd { .. }
                | EventKind::SequenceEnd
                | EventKind::MappingEnd => level -= 1,
                _ => {}
            }
            if level == 0 {
                return false;
            }
        }
        true
    }

    fn emit_event(&mut self, event: Event) -> Result<()> {
        match self.state {
            State::StreamStart => self.emit_stream_start(&event),
            State::FirstDocumentStart => self.emit_document_start(event, true),
            State::DocumentStart => self.emit_document_start(event, false),
            State::DocumentContent => {
                self.states.push(State::DocumentEnd);
                self.emit_node(event, true, false, false)
            }
            State::DocumentEnd => self.emit_document_end(&event),
            State::FlowSequenceFirstItem => self.emit_flow_sequence_item(event, true),
            State::FlowSequenceItem => self.emit_flow_sequence_item(event, false),
            State::FlowMappingFirstKey => self.emit_flow_mapping_key(event, true),
            State::FlowMappingKey => self.emit_flow_mapping_key(event, false),
            State::FlowMappingSimpleValue => self.emit_flow_mapping_value(event, true),
            State::FlowMappingValue => self.emit_flow_mapping_value(event, false),
            State::BlockSequenceFirstItem => self.emit_block_sequence_item(event, true),
            State::BlockSequenceItem => self.emit_block_sequence_item(event, false),
            State::BlockMappingFirstKey => self.emit_block_mapping_key(event, true),
            State::BlockMappingKey => self.emit_block_mapping_key(event, false),
            State::BlockMappingSimpleValue => self.emit_block_mapping_value(event, true),
            State::BlockMappingValue => self.emit_block_mapping_value(event, false),
            State::End => Err(Error::marshal("expected nothing after stream end")),
        }
    }

    fn emit_stream_start(&mut self, event: &Event) -> Result<()> {
        if !matches!(event.kind, EventKind::StreamStart { .. }) {
            return Err(Error::marshal("expected stream start event"));
        }
        self.indent = -1;
        self.column = 0;
        self.whitespace = true;
        self.indention = true;
        self.state = State::FirstDocumentStart;
        Ok(())
    }

    fn emit_document_start(&mut self, event: Event, first: bool) -> Result<()> {
        match &event.kind {
            EventKind::DocumentStart {
                version,
                tag_directives,
                implicit,
            } => {
                let declared = tag_directives.clone();
                let version = *version;
                let mut implicit = *implicit && first && version.is_none() && declared.is_empty();

                if (version.is_some() || !declared.is_empty()) && self.open_ended {
                    self.write_indicator("...", true, false, false)?;
                    self.write_indent()?;
                }
                self.open_ended = false;

                if let Some((major, minor)) = version {
                    self.write_indicator(&format!("%YAML {major}.{minor}"), true, false, false)?;
                    self.write_indent()?;
                    implicit = false;
                }
                for directive in &declared {
                    validate_tag_handle(&directive.handle)?;
                    self.write_indicator(
                        &format!("%TAG {} {}", directive.handle, directive.prefix),
                        true,
                        false,
                        false,
                    )?;
                    self.write_indent()?;
                    implicit = false;
                }
                self.tag_directives = declared;
                for default in [
                    TagDirective {
                        handle: "!".to_owned(),
                        prefix: "!".to_owned(),
                    },
                    TagDirective {
                        handle: "!!".to_owned(),
                        prefix: DEFAULT_PREFIX.to_owned(),
                    },
                ] {
                    if !self
                        .tag_directives
                        .iter()
                        .any(|d| d.handle == default.handle)
                    {
                        self.tag_directives.push(default);
                    }
                }

                self.write_head_comment(&event.head_comment)?;
                if !implicit {
                    self.write_indent()?;
                    self.write_indicator("---", true, false, false)?;
                }
                self.state = State::DocumentContent;
                Ok(())
            }
            EventKind::StreamEnd => {
                self.flush()?;
                self.state = State::End;
                Ok(())
            }
            kind => Err(Error::marshal(format!(
                "expected document start or stream end event, found {kind:?}"
            ))),
        }
    }

    fn emit_document_end(&mut self, event: &Event) -> Result<()> {
        let EventKind::DocumentEnd { implicit } = event.kind else {
            return Err(Error::marshal("expected document end event"));
        };
        self.write_head_comment(&event.head_comment)?;
        self.write_indent()?;
        if !implicit {
            self.write_indicator("...", true, false, false)?;
            self.write_indent()?;
        }
        self.open_ended = implicit;
        self.flush()?;
        self.state = State::DocumentStart;
        self.tag_directives.clear();
        Ok(())
    }

    // --- nodes ------------------------------------------------------------

    fn emit_node(
        &mut self,
        mut event: Event,
        root: bool,
        mapping: bool,
        simple_key: bool,
    ) -> Result<()> {
        self.root_context = root;
        self.mapping_context = mapping;
        self.simple_key_context = simple_key;
        if root && !event.head_comment.is_empty() {
            let comment = std::mem::take(&mut event.head_comment);
            self.write_head_comment(&comment)?;
        }
        match &event.kind {
            EventKind::Alias { .. } => self.emit_alias(&event),
            EventKind::Scalar { .. } => self.emit_scalar(event),
            EventKind::SequenceStart { .. } => self.emit_sequence_start(&event),
            EventKind::MappingStart { .. } => self.emit_mapping_start(&event),
            kind => Err(Error::marshal(format!(
                "expected a node event, found {kind:?}"
            ))),
        }
    }

    fn emit_alias(&mut self, event: &Event) -> Result<()> {
        let EventKind::Alias { anchor } = &event.kind else {
            unreachable!()
        };
        validate_anchor(anchor)?;
        self.write_indicator(&format!("*{anchor}"), true, false, false)?;
        if self.flow_level == 0 && !self.simple_key_context {
            self.write_line_comment(&event.line_comment)?;
        }
        self.state = self.states.pop().unwrap_or(State::End);
        Ok(())
    }

    fn emit_sequence_start(&mut self, event: &Event) -> Result<()> {
        let EventKind::SequenceStart {
            anchor,
            tag,
            implicit,
            style,
        } = &event.kind
        else {
            unreachable!()
        };
        self.prepare_properties(anchor.as_deref(), tag.as_deref(), *implicit)?;
        self.process_anchor()?;
        self.process_tag()?;
        let flow = *style == CollectionStyle::Flow || self.flow_level > 0;
        self.state = if flow {
            State::FlowSequenceFirstItem
        } else {
            State::BlockSequenceFirstItem
        };
        Ok(())
    }

    fn emit_mapping_start(&mut self, event: &Event) -> Result<()> {
        let EventKind::MappingStart {
            anchor,
            tag,
            implicit,
            style,
        } = &event.kind
        else {
            unreachable!()
        };
        self.prepare_properties(anchor.as_deref(), tag.as_deref(), *implicit)?;
        self.process_anchor()?;
        self.process_tag()?;
        let flow = *style == CollectionStyle::Flow || self.flow_level > 0;
        self.state = if flow {
            State::FlowMappingFirstKey
        } else {
            State::BlockMappingFirstKey
        };
        Ok(())
    }

    // --- flow collections --------------------------------------------------

    fn emit_flow_sequence_item(&mut self, event: Event, first: bool) -> Result<()> {
        if first {
            self.write_indicator("[", true, true, false)?;
            self.increase_indent(true, false);
            self.flow_level += 1;
        }
        if matches!(event.kind, EventKind::SequenceEnd) {
            self.flow_level -= 1;
            self.indent = self.indents.pop().unwrap_or(-1);
            self.write_indicator("]", false, false, false)?;
            if self.flow_level == 0 {
                self.write_line_comment(&event.line_comment)?;
            }
            self.state = self.states.pop().unwrap_or(State::End);
            return Ok(());
        }
        if !first {
            self.write_indicator(",", false, false, false)?;
        }
        if self.column > self.best_width {
            self.write_indent()?;
        }
        self.states.push(State::FlowSequenceItem);
        self.emit_node(event, false, false, false)
    }

    fn emit_flow_mapping_key(&mut self, event: Event, first: bool) -> Result<()> {
        if first {
            self.write_indicator("{", true, true, false)?;
            self.increase_indent(true, false);
            self.flow_level += 1;
        }
        if matches!(event.kind, EventKind::MappingEnd) {
            self.flow_level -= 1;
            self.indent = self.indents.pop().unwrap_or(-1);
            self.write_indicator("}", false, false, false)?;
            if self.flow_level == 0 {
                self.write_line_comment(&event.line_comment)?;
            }
            self.state = self.states.pop().unwrap_or(State::End);
            return Ok(());
        }
        if !first {
            self.write_indicator(",", false, false, false)?;
        }
        if self.column > self.best_width {
            self.write_indent()?;
        }
        if self.check_simple_key(&event) {
            self.states.push(State::FlowMappingSimpleValue);
            self.emit_node(event, false, true, true)
        } else {
            self.write_indicator("?", true, false, false)?;
            self.states.push(State::FlowMappingValue);
            self.emit_node(event, false, true, false)
        }
    }

    fn emit_flow_mapping_value(&mut self, event: Event, simple: bool) -> Result<()> {
        if simple {
            self.write_indicator(":", false, false, false)?;
        } else {
            if self.column > self.best_width {
                self.write_indent()?;
            }
            self.write_indicator(":", true, false, false)?;
        }
        self.states.push(State::FlowMappingKey);
        self.emit_node(event, false, true, false)
    }

    // --- block collections -------------------------------------------------

    fn emit_block_sequence_item(&mut self, event: Event, first: bool) -> Result<()> {
        if first {
            // Sequence entries inside a mapping sit at the mapping's
            // indentation; the `- ` itself provides the nested indent.
            let indentless = self.mapping_context && !self.indention;
            self.increase_indent(false, indentless);
        }
        if matches!(event.kind, EventKind::SequenceEnd) {
            if !event.head_comment.is_empty() {
                let comment = event.head_comment.clone();
                self.write_head_comment(&comment)?;
            }
            self.indent = self.indents.pop().unwrap_or(-1);
            self.state = self.states.pop().unwrap_or(State::End);
            return Ok(());
        }
        let mut event = event;
        if !event.head_comment.is_empty() {
            let comment = std::mem::take(&mut event.head_comment);
            self.write_head_comment(&comment)?;
        }
        self.write_indent()?;
        self.write_indicator("-", true, false, true)?;
        self.states.push(State::BlockSequenceItem);
        self.emit_node(event, false, false, false)
    }

    fn emit_block_mapping_key(&mut self, event: Event, first: bool) -> Result<()> {
        if first {
            self.increase_indent(false, false);
        }
        if matches!(event.kind, EventKind::MappingEnd) {
            if !event.head_comment.is_empty() {
                let comment = event.head_comment.clone();
                self.write_head_comment(&comment)?;
            }
            self.indent = self.indents.pop().unwrap_or(-1);
            self.state = self.states.pop().unwrap_or(State::End);
            return Ok(());
        }
        let mut event = event;
        if !event.head_comment.is_empty() {
            let comment = std::mem::take(&mut event.head_comment);
            self.write_head_comment(&comment)?;
        }
        self.write_indent()?;
        if self.check_simple_key(&event) {
            self.states.push(State::BlockMappingSimpleValue);
            self.emit_node(event, false, true, true)
        } else {
            self.write_indicator("?", true, false, true)?;
            self.states.push(State::BlockMappingValue);
            self.emit_node(event, false, true, false)
        }
    }

    fn emit_block_mapping_value(&mut self, event: Event, simple: bool) -> Result<()> {
        if simple {
            self.write_indicator(":", false, false, false)?;
        } else {
            self.write_indent()?;
            self.write_indicator(":", true, false, true)?;
        }
        self.states.push(State::BlockMappingKey);
        self.emit_node(event, false, true, false)
    }

    /// A key may be emitted inline when it is a short alias or scalar, or
    /// an empty collection.
    fn check_simple_key(&self, event: &Event) -> bool {
        match &event.kind {
            EventKind::Alias { anchor } => anchor.len() <= MAX_SIMPLE_KEY_LENGTH,
            EventKind::Scalar { value, anchor, tag, .. } => {
                if value.is_empty() && anchor.is_none() {
                    // An empty key has no inline rendering; use `?`.
                    return false;
                }
                let mut length = value.chars().count();
                length += anchor.as_deref().map_or(0, str::len);
                length += tag.as_deref().map_or(0, str::len);
                length <= MAX_SIMPLE_KEY_LENGTH && !ScalarAnalysis::new(value).multiline
            }
            EventKind::SequenceStart { .. } => {
                matches!(self.events.front().map(|e| &e.kind), Some(EventKind::SequenceEnd))
            }
            EventKind::MappingStart { .. } => {
                matches!(self.events.front().map(|e| &e.kind), Some(EventKind::MappingEnd))
            }
            _ => false,
        }
    }

    // --- properties --------------------------------------------------------

    /// Validate and stage the anchor and tag of the current node.
    fn prepare_properties(
        &mut self,
        anchor: Option<&str>,
        tag: Option<&str>,
        implicit: bool,
    ) -> Result<()> {
        self.anchor_data = match anchor {
            Some(anchor) => {
                validate_anchor(anchor)?;
                Some((anchor.to_owned(), false))
            }
            None => None,
        };
        self.tag_data = self.prepare_tag(tag, implicit)?;
        Ok(())
    }

    fn prepare_tag(&self, tag: Option<&str>, implicit: bool) -> Result<Option<TagData>> {
        let Some(tag) = tag else {
            return Ok(None);
        };
        if tag.is_empty() {
            return Err(Error::marshal("tag value must not be empty"));
        }
        if implicit && tag != "!" {
            return Ok(None);
        }
        if tag == "!" {
            return Ok(Some(TagData {
                handle: "!".to_owned(),
                suffix: String::new(),
            }));
        }
        for directive in &self.tag_directives {
            if directive.handle == "!" && directive.prefix == "!" {
                continue;
            }
            if let Some(suffix) = tag.strip_prefix(directive.prefix.as_str()) {
                if !suffix.is_empty() {
                    return Ok(Some(TagData {
                        handle: directive.handle.clone(),
                        suffix: suffix.to_owned(),
                    }));
                }
            }
        }
        if let Some(suffix) = tag.strip_prefix(DEFAULT_PREFIX) {
            return Ok(Some(TagData {
                handle: "!!".to_owned(),
                suffix: suffix.to_owned(),
            }));
        }
        if let Some(suffix) = tag.strip_prefix('!') {
            // A local tag.
            return Ok(Some(TagData {
                handle: "!".to_owned(),
                suffix: suffix.to_owned(),
            }));
        }
        Ok(Some(TagData {
            handle: String::new(),
            suffix: tag.to_owned(),
        }))
    }

    fn process_anchor(&mut self) -> Result<()> {
        if let Some((anchor, alias)) = self.anchor_data.take() {
            let indicator = if alias { "*" } else { "&" };
            self.write_indicator(&format!("{indicator}{anchor}"), true, false, false)?;
        }
        Ok(())
    }

    fn process_tag(&mut self) -> Result<()> {
        let Some(tag) = self.tag_data.take() else {
            return Ok(());
        };
        if tag.handle.is_empty() {
            // Verbatim.
            let escaped = escape_tag_uri(&tag.suffix);
            self.write_indicator(&format!("!<{escaped}>"), true, false, false)?;
        } else {
            let escaped = escape_tag_uri(&tag.suffix);
            self.write_indicator(&format!("{}{escaped}", tag.handle), true, false, false)?;
        }
        Ok(())
    }

    // --- low-level writing -------------------------------------------------

    fn write_raw(&mut self, text: &str) -> Result<()> {
        self.sink
            .write_all(text.as_bytes())
            .map_err(|err| Error::marshal(format!("write error: {err}")))?;
        for c in text.chars() {
            if c == '\n' {
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        Ok(())
    }

    pub(crate) fn write_break(&mut self) -> Result<()> {
        self.write_raw("\n")?;
        self.whitespace = true;
        self.indention = true;
        Ok(())
    }

    pub(crate) fn write_indent(&mut self) -> Result<()> {
        let indent = if self.indent < 0 { 0 } else { self.indent as usize };
        if !self.indention || self.column > indent || (self.column == indent && !self.whitespace) {
            self.write_break()?;
        }
        while self.column < indent {
            self.write_raw(" ")?;
        }
        self.whitespace = true;
        self.indention = true;
        Ok(())
    }

    pub(crate) fn write_indicator(
        &mut self,
        indicator: &str,
        need_whitespace: bool,
        is_whitespace: bool,
        is_indention: bool,
    ) -> Result<()> {
        if need_whitespace && !self.whitespace {
            self.write_raw(" ")?;
        }
        self.write_raw(indicator)?;
        self.whitespace = is_whitespace;
        self.indention = self.indention && is_indention;
        Ok(())
    }

    fn increase_indent(&mut self, flow: bool, indentless: bool) {
        self.indents.push(self.indent);
        if self.indent < 0 {
            self.indent = if flow { self.best_indent as i64 } else { 0 };
        } else if !indentless {
            self.indent += self.best_indent as i64;
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.sink
            .flush()
            .map_err(|err| Error::marshal(format!("write error: {err}")))
    }

    // --- comments ----------------------------------------------------------

    /// Write own-line comments above the upcoming node.
    fn write_head_comment(&mut self, comment: &str) -> Result<()> {
        if comment.is_empty() {
            return Ok(());
        }
        for line in comment.lines() {
            self.write_indent()?;
            if line.is_empty() {
                self.write_raw("#")?;
            } else {
                self.write_raw(&format!("# {line}"))?;
            }
            self.write_break()?;
        }
        // Re-establish indentation for the node itself.
        self.whitespace = true;
        self.indention = true;
        Ok(())
    }

    /// Write a trailing comment after a value, before the next break.
    pub(crate) fn write_line_comment(&mut self, comment: &str) -> Result<()> {
        if comment.is_empty() {
            return Ok(());
        }
        if !self.whitespace {
            self.write_raw(" ")?;
        }
        self.write_raw(&format!("# {comment}"))?;
        self.whitespace = false;
        self.indention = false;
        Ok(())
    }
}

/// Anchor and alias names: non-empty, and only characters from the YAML
/// anchor production (no whitespace, no flow indicators).
fn validate_anchor(anchor: &str) -> Result<()> {
    if anchor.is_empty() {
        return Err(Error::marshal("anchor value must not be empty"));
    }
    for c in anchor.chars() {
        if c.is_whitespace() || matches!(c, '[' | ']' | '{' | '}' | ',') {
            return Err(Error::marshal(format!(
                "invalid character {c:?} in anchor {anchor:?}"
            )));
        }
    }
    Ok(())
}

fn validate_tag_handle(handle: &str) -> Result<()> {
    let ok = handle.starts_with('!')
        && handle.ends_with('!')
        && handle[1..handle.len().saturating_sub(1)]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok || handle == "!" {
        Ok(())
    } else {
        Err(Error::marshal(format!("invalid tag handle {handle:?}")))
    }
}

/// Escape characters outside the tag URI set as `%XX`.
fn escape_tag_uri(suffix: &str) -> String {
    let mut out = String::with_capacity(suffix.len());
    for c in suffix.chars() {
        let allowed = c.is_ascii_alphanumeric()
            || matches!(
                c,
                ';' | '/' | '?' | ':' | '@' | '&' | '=' | '+' | '$' | ',' | '_' | '.' | '~'
                    | '*' | '\'' | '(' | ')' | '[' | ']' | '-' | '!' | '%'
            );
        if allowed {
            out.push(c);
        } else {
            let mut buffer = [0u8; 4];
            for byte in c.encode_utf8(&mut buffer).as_bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Encoding;
    use crate::span::Mark;

    fn event(kind: EventKind) -> Event {
        Event::new(kind, Mark::default(), Mark::default())
    }

    fn scalar_event(value: &str) -> Event {
        event(EventKind::Scalar {
            anchor: None,
            tag: None,
            value: value.to_owned(),
            plain_implicit: true,
            quoted_implicit: true,
            style: ScalarStyle::Any,
        })
    }

    fn emit_all(events: Vec<Event>) -> String {
        let mut emitter = Emitter::new(Vec::new());
        for event in events {
            emitter.emit(event).expect("emit");
        }
        String::from_utf8(emitter.into_inner()).expect("utf8")
    }

    fn document(body: Vec<Event>) -> Vec<Event> {
        let mut events = vec![
            event(EventKind::StreamStart {
                encoding: Encoding::Utf8,
            }),
            event(EventKind::DocumentStart {
                version: None,
                tag_directives: Vec::new(),
                implicit: true,
            }),
        ];
        events.extend(body);
        events.push(event(EventKind::DocumentEnd { implicit: true }));
        events.push(event(EventKind::StreamEnd));
        events
    }

    #[test]
    fn test_emit_plain_scalar_document() {
        let out = emit_all(document(vec![scalar_event("hello")]));
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn test_emit_block_mapping() {
        let out = emit_all(document(vec![
            event(EventKind::MappingStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: CollectionStyle::Block,
            }),
            scalar_event("a"),
            scalar_event("1"),
            scalar_event("b"),
            scalar_event("2"),
            event(EventKind::MappingEnd),
        ]));
        assert_eq!(out, "a: 1\nb: 2\n");
    }

    #[test]
    fn test_emit_block_sequence() {
        let out = emit_all(document(vec![
            event(EventKind::SequenceStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: CollectionStyle::Block,
            }),
            scalar_event("x"),
            scalar_event("y"),
            event(EventKind::SequenceEnd),
        ]));
        assert_eq!(out, "- x\n- y\n");
    }

    #[test]
    fn test_emit_flow_sequence() {
        let out = emit_all(document(vec![
            event(EventKind::SequenceStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: CollectionStyle::Flow,
            }),
            scalar_event("1"),
            scalar_event("2"),
            event(EventKind::SequenceEnd),
        ]));
        assert_eq!(out, "[1, 2]\n");
    }

    #[test]
    fn test_emit_nested_block() {
        let out = emit_all(document(vec![
            event(EventKind::MappingStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: CollectionStyle::Block,
            }),
            scalar_event("outer"),
            event(EventKind::MappingStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: CollectionStyle::Block,
            }),
            scalar_event("inner"),
            scalar_event("1"),
            event(EventKind::MappingEnd),
            event(EventKind::MappingEnd),
        ]));
        assert_eq!(out, "outer:\n    inner: 1\n");
    }

    #[test]
    fn test_sequence_in_mapping_same_column() {
        let out = emit_all(document(vec![
            event(EventKind::MappingStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: CollectionStyle::Block,
            }),
            scalar_event("items"),
            event(EventKind::SequenceStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: CollectionStyle::Block,
            }),
            scalar_event("a"),
            scalar_event("b"),
            event(EventKind::SequenceEnd),
            event(EventKind::MappingEnd),
        ]));
        assert_eq!(out, "items:\n- a\n- b\n");
    }

    #[test]
    fn test_emit_anchor_and_alias() {
        let out = emit_all(document(vec![
            event(EventKind::MappingStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: CollectionStyle::Block,
            }),
            scalar_event("a"),
            event(EventKind::Scalar {
                anchor: Some("x".to_owned()),
                tag: None,
                value: "1".to_owned(),
                plain_implicit: true,
                quoted_implicit: true,
                style: ScalarStyle::Any,
            }),
            scalar_event("b"),
            event(EventKind::Alias {
                anchor: "x".to_owned(),
            }),
            event(EventKind::MappingEnd),
        ]));
        assert_eq!(out, "a: &x 1\nb: *x\n");
    }

    #[test]
    fn test_emit_explicit_document_markers() {
        let out = emit_all(vec![
            event(EventKind::StreamStart {
                encoding: Encoding::Utf8,
            }),
            event(EventKind::DocumentStart {
                version: None,
                tag_directives: Vec::new(),
                implicit: false,
            }),
            scalar_event("a"),
            event(EventKind::DocumentEnd { implicit: false }),
            event(EventKind::StreamEnd),
        ]);
        assert_eq!(out, "--- a\n...\n");
    }

    #[test]
    fn test_emit_tagged_scalar() {
        let out = emit_all(document(vec![event(EventKind::Scalar {
            anchor: None,
            tag: Some("tag:yaml.org,2002:str".to_owned()),
            value: "123".to_owned(),
            plain_implicit: false,
            quoted_implicit: false,
            style: ScalarStyle::Any,
        })]));
        assert_eq!(out, "!!str 123\n");
    }

    #[test]
    fn test_invalid_anchor_rejected() {
        let mut emitter = Emitter::new(Vec::new());
        emitter
            .emit(event(EventKind::StreamStart {
                encoding: Encoding::Utf8,
            }))
            .expect("stream start");
        emitter
            .emit(event(EventKind::DocumentStart {
                version: None,
                tag_directives: Vec::new(),
                implicit: true,
            }))
            .expect("doc start");
        let err = emitter
            .emit(event(EventKind::Scalar {
                anchor: Some("bad anchor".to_owned()),
                tag: None,
                value: "x".to_owned(),
                plain_implicit: true,
                quoted_implicit: true,
                style: ScalarStyle::Any,
            }))
            .expect_err("must fail");
        assert!(matches!(err, Error::Marshal { .. }));
    }

    #[test]
    fn test_indent_option() {
        let mut emitter = Emitter::new(Vec::new());
        emitter.set_indent(2);
        for e in document(vec![
            event(EventKind::MappingStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: CollectionStyle::Block,
            }),
            scalar_event("outer"),
            event(EventKind::MappingStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: CollectionStyle::Block,
            }),
            scalar_event("inner"),
            scalar_event("1"),
            event(EventKind::MappingEnd),
            event(EventKind::MappingEnd),
        ]) {
            emitter.emit(e).expect("emit");
        }
        let out = String::from_utf8(emitter.into_inner()).expect("utf8");
        assert_eq!(out, "outer:\n  inner: 1\n");
    }
}
