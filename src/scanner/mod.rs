// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! The scanner: code points in, tokens out.
//!
//! YAML forces deferred decisions: whether a scalar is a simple mapping key
//! is only known once a `:` shows up, which may be up to 1024 code points
//! later. The scanner therefore keeps a FIFO of formed tokens and inserts
//! `Key` and `BlockMappingStart` tokens retroactively when the `:` arrives.
//!
//! Block structure is tracked with an indentation stack: every increase
//! opens a block collection, every decrease emits `BlockEnd` tokens until
//! the stack matches. Inside flow collections (`flow_level > 0`)
//! indentation is ignored.

mod directive;
mod scalar;

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::reader::{LOOKAHEAD, Reader};
use crate::span::Mark;
use crate::token::{Token, TokenKind};

/// Hard stop for nested flow collections; block nesting is bounded by the
/// parser's state stack with the same limit.
pub const MAX_NESTING: usize = 10_000;

/// A simple key may span at most this many code points before the `:`.
const MAX_SIMPLE_KEY_LENGTH: usize = 1024;

/// A potential simple key: the earliest position on the current line that
/// could still become a mapping key.
#[derive(Debug, Clone, Copy, Default)]
struct SimpleKey {
    /// Whether this position can still become a key.
    possible: bool,
    /// In block context after `?` or `:` the key is mandatory; failing to
    /// find the `:` is an error rather than a plain scalar.
    required: bool,
    /// Index of the would-be `Key` token, counted from the start of the
    /// stream.
    token_number: usize,
    mark: Mark,
}

/// Pull tokenizer over a [`Reader`].
pub struct Scanner<'r> {
    reader: Reader<'r>,
    /// Formed tokens not yet handed to the parser.
    tokens: VecDeque<Token>,
    /// Number of tokens already handed out.
    tokens_taken: usize,
    /// Current block-context indentation column (-1 before the first).
    indent: i64,
    /// Indentation levels of the open block collections.
    indents: Vec<i64>,
    /// One potential simple key per flow level, plus the block-level one.
    simple_keys: Vec<SimpleKey>,
    /// Depth of nested flow collections.
    flow_level: usize,
    /// Whether a simple key may start at the current position.
    simple_key_allowed: bool,
    stream_start_produced: bool,
    stream_end_produced: bool,
    /// Own-line comments waiting for the next token.
    pending_head: String,
}

impl<'r> Scanner<'r> {
    /// Scan tokens from `reader`.
    #[must_use]
    pub fn new(reader: Reader<'r>) -> Self {
        Self {
            reader,
            tokens: VecDeque::new(),
            tokens_taken: 0,
            indent: -1,
            indents: Vec::new(),
            simple_keys: Vec::new(),
            flow_level: 0,
            simple_key_allowed: false,
            stream_start_produced: false,
            stream_end_produced: false,
            pending_head: String::new(),
        }
    }

    /// The mark of the next unconsumed code point.
    #[must_use]
    pub fn mark(&self) -> Mark {
        self.reader.mark()
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        while self.need_more_tokens()? {
            self.fetch_next_token()?;
        }
        let Some(token) = self.tokens.pop_front() else {
            return Err(Error::syntax(
                "attempted to read past the end of the stream",
                self.reader.mark(),
            ));
        };
        self.tokens_taken += 1;
        Ok(token)
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<&Token> {
        while self.need_more_tokens()? {
            self.fetch_next_token()?;
        }
        self.tokens.front().ok_or_else(|| {
            Error::syntax(
                "attempted to read past the end of the stream",
                self.reader.mark(),
            )
        })
    }

    fn need_more_tokens(&mut self) -> Result<bool> {
        if self.stream_end_produced {
            return Ok(false);
        }
        if self.tokens.is_empty() {
            return Ok(true);
        }
        // A queued token may still become a simple key; keep scanning until
        // the decision is made.
        self.stale_simple_keys()?;
        Ok(self
            .simple_keys
            .iter()
            .any(|key| key.possible && key.token_number == self.tokens_taken))
    }

    /// Dismiss simple keys whose `:` can no longer arrive: the line ended,
    /// or the key grew past the 1024 code point budget.
    fn stale_simple_keys(&mut self) -> Result<()> {
        let mark = self.reader.mark();
        for key in &mut self.simple_keys {
            if key.possible
                && (key.mark.line < mark.line || key.mark.index + MAX_SIMPLE_KEY_LENGTH < mark.index)
            {
                if key.required {
                    return Err(Error::syntax_in(
                        "could not find expected ':'",
                        mark,
                        "while scanning a simple key",
                        key.mark,
                    ));
                }
                key.possible = false;
            }
        }
        Ok(())
    }

    fn fetch_next_token(&mut self) -> Result<()> {
        if !self.stream_start_produced {
            return self.fetch_stream_start();
        }
        self.scan_to_next_token()?;
        self.stale_simple_keys()?;
        self.unroll_obsolete_indents()?;

        self.reader.cache(LOOKAHEAD)?;
        if self.reader.ch(0).is_none() {
            return self.fetch_stream_end();
        }

        let mark = self.reader.mark();
        let c = self.reader.ch(0).unwrap_or('\0');

        if mark.column == 0 && c == '%' {
            return self.fetch_directive();
        }
        if mark.column == 0 && self.check_document_indicator("---") {
            return self.fetch_document_indicator(TokenKind::DocumentStart);
        }
        if mark.column == 0 && self.check_document_indicator("...") {
            return self.fetch_document_indicator(TokenKind::DocumentEnd);
        }
        match c {
            '[' => self.fetch_flow_collection_start(TokenKind::FlowSequenceStart),
            '{' => self.fetch_flow_collection_start(TokenKind::FlowMappingStart),
            ']' => self.fetch_flow_collection_end(TokenKind::FlowSequenceEnd),
            '}' => self.fetch_flow_collection_end(TokenKind::FlowMappingEnd),
            ',' if self.flow_level > 0 => self.fetch_flow_entry(),
            '-' if self.blankz_at(1) => self.fetch_block_entry(),
            '?' if self.flow_level > 0 || self.blankz_at(1) => self.fetch_key(),
            ':' if self.blankz_at(1) || (self.flow_level > 0 && !self.simple_key_allowed) => {
                self.fetch_value()
            }
            '*' => self.fetch_anchor_or_alias(false),
            '&' => self.fetch_anchor_or_alias(true),
            '!' => self.fetch_tag(),
            '|' if self.flow_level == 0 => self.fetch_block_scalar(true),
            '>' if self.flow_level == 0 => self.fetch_block_scalar(false),
            '\'' => self.fetch_flow_scalar(true),
            '"' => self.fetch_flow_scalar(false),
            _ if self.can_start_plain_scalar(c) => self.fetch_plain_scalar(),
            _ => Err(Error::syntax(
                format!("found character {c:?} that cannot start any token"),
                mark,
            )),
        }
    }

    /// True when a `-`, `?`, or `:` (or any regular character) may start a
    /// plain scalar here.
    fn can_start_plain_scalar(&self, c: char) -> bool {
        let plain_unsafe = matches!(
            c,
            '-' | '?' | ':' | ',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>'
                | '\'' | '"' | '%' | '@' | '`'
        );
        if !plain_unsafe {
            return true;
        }
        match c {
            '-' => !self.blankz_at(1),
            '?' | ':' => {
                !self.blankz_at(1) && !(self.flow_level > 0 && self.flow_indicator_at(1))
            }
            // Indicators never start a plain scalar, though most may appear
            // inside one.
            _ => false,
        }
    }

    // --- character classification ---------------------------------------

    fn blankz_at(&self, i: usize) -> bool {
        match self.reader.ch(i) {
            None => true,
            Some(c) => is_blank(c) || is_break(c),
        }
    }

    fn flow_indicator_at(&self, i: usize) -> bool {
        matches!(self.reader.ch(i), Some(',' | '[' | ']' | '{' | '}'))
    }

    fn check_document_indicator(&self, marker: &str) -> bool {
        debug_assert_eq!(marker.len(), 3);
        for (i, expected) in marker.chars().enumerate() {
            if self.reader.ch(i) != Some(expected) {
                return false;
            }
        }
        self.blankz_at(3)
    }

    // --- whitespace and comments ----------------------------------------

    /// Skip blanks, breaks, and comments up to the next token. Line breaks
    /// re-enable simple keys in block context. Comments are captured for
    /// best-effort attachment.
    ///
    /// Tabs are ordinary separation whitespace, except in the indentation
    /// of a line in block context: a tab there followed by a token on the
    /// same line is an error.
    fn scan_to_next_token(&mut self) -> Result<()> {
        let mut leading = self.reader.mark().column == 0;
        let mut tab_mark: Option<Mark> = None;
        loop {
            self.reader.cache(1)?;
            let Some(c) = self.reader.ch(0) else {
                return Ok(());
            };
            match c {
                ' ' => {
                    self.reader.consume();
                }
                '\t' => {
                    if leading && self.flow_level == 0 && tab_mark.is_none() {
                        tab_mark = Some(self.reader.mark());
                    }
                    self.reader.consume();
                }
                '#' => {
                    self.scan_comment()?;
                }
                _ if is_break(c) => {
                    self.skip_break()?;
                    leading = true;
                    tab_mark = None;
                    if self.flow_level == 0 {
                        self.simple_key_allowed = true;
                    }
                }
                _ => {
                    if let Some(mark) = tab_mark {
                        return Err(Error::syntax(
                            "found a tab character where an indentation space is expected",
                            mark,
                        ));
                    }
                    return Ok(());
                }
            }
        }
    }

    /// Scan a `#` comment to the end of the line and attach it.
    fn scan_comment(&mut self) -> Result<()> {
        let start = self.reader.mark();
        self.reader.consume(); // '#'
        let mut text = String::new();
        loop {
            self.reader.cache(1)?;
            match self.reader.ch(0) {
                None => break,
                Some(c) if is_break(c) => break,
                Some(c) => {
                    text.push(c);
                    self.reader.consume();
                }
            }
        }
        let text = text.trim().to_owned();
        // A comment on the same line as the last produced token trails it;
        // an own-line comment heads whatever comes next.
        let same_line = self
            .tokens
            .back()
            .is_some_and(|token| token.end.line == start.line);
        if same_line {
            if let Some(last) = self.tokens.back_mut() {
                if !last.line_comment.is_empty() {
                    last.line_comment.push(' ');
                }
                last.line_comment.push_str(&text);
            }
        } else {
            if !self.pending_head.is_empty() {
                self.pending_head.push('\n');
            }
            self.pending_head.push_str(&text);
        }
        Ok(())
    }

    fn skip_break(&mut self) -> Result<()> {
        self.reader.cache(2)?;
        if self.reader.check('\r') && self.reader.check_at('\n', 1) {
            self.reader.consume();
        }
        self.reader.consume();
        Ok(())
    }

    /// Consume a break and push a normalized `\n` onto `out`.
    fn read_break(&mut self, out: &mut String) -> Result<()> {
        self.skip_break()?;
        out.push('\n');
        Ok(())
    }

    // --- token bookkeeping ----------------------------------------------

    /// Append a token, attaching any pending head comment.
    fn push_token(&mut self, mut token: Token) {
        if !self.pending_head.is_empty() {
            token.head_comment = std::mem::take(&mut self.pending_head);
        }
        self.tokens.push_back(token);
    }

    /// Insert a token at an absolute stream position (for retroactive
    /// `Key`/`BlockMappingStart` insertion).
    fn insert_token(&mut self, number: usize, token: Token) {
        let index = number - self.tokens_taken;
        self.tokens.insert(index, token);
    }

    /// Record that the current position could start a simple key.
    fn save_simple_key(&mut self) -> Result<()> {
        let mark = self.reader.mark();
        let required = self.flow_level == 0 && self.indent == mark.column as i64;
        if self.simple_key_allowed {
            let key = SimpleKey {
                possible: true,
                required,
                token_number: self.tokens_taken + self.tokens.len(),
                mark,
            };
            self.remove_simple_key()?;
            if let Some(last) = self.simple_keys.last_mut() {
                *last = key;
            }
        }
        Ok(())
    }

    /// Dismiss the pending simple key at the current level.
    fn remove_simple_key(&mut self) -> Result<()> {
        let mark = self.reader.mark();
        if let Some(key) = self.simple_keys.last_mut() {
            if key.possible && key.required {
                return Err(Error::syntax_in(
                    "could not find expected ':'",
                    mark,
                    "while scanning a simple key",
                    key.mark,
                ));
            }
            key.possible = false;
        }
        Ok(())
    }

    // --- indentation ----------------------------------------------------

    /// Open a block collection if the column increases the indentation.
    /// `number` is the absolute token position to insert at, or `None` to
    /// append.
    fn roll_indent(&mut self, column: i64, number: Option<usize>, kind: TokenKind, mark: Mark) {
        if self.flow_level > 0 {
            return;
        }
        if self.indent < column {
            self.indents.push(self.indent);
            self.indent = column;
            let token = Token::new(kind, mark, mark);
            match number {
                Some(number) => self.insert_token(number, token),
                None => self.push_token(token),
            }
        }
    }

    /// Close block collections until the indentation matches `column`.
    fn unroll_indent(&mut self, column: i64) {
        if self.flow_level > 0 {
            return;
        }
        while self.indent > column {
            let mark = self.reader.mark();
            self.indent = self.indents.pop().unwrap_or(-1);
            self.push_token(Token::new(TokenKind::BlockEnd, mark, mark));
        }
    }

    /// On a new line in block context, close collections deeper than the
    /// current column.
    fn unroll_obsolete_indents(&mut self) -> Result<()> {
        self.reader.cache(1)?;
        let mark = self.reader.mark();
        if self.simple_key_allowed {
            self.unroll_indent(mark.column as i64);
        }
        Ok(())
    }

    // --- fetchers --------------------------------------------------------

    fn fetch_stream_start(&mut self) -> Result<()> {
        self.reader.cache(1)?;
        let mark = self.reader.mark();
        self.indent = -1;
        self.simple_keys.push(SimpleKey::default());
        self.simple_key_allowed = true;
        self.stream_start_produced = true;
        self.push_token(Token::new(
            TokenKind::StreamStart(self.reader.encoding()),
            mark,
            mark,
        ));
        Ok(())
    }

    fn fetch_stream_end(&mut self) -> Result<()> {
        let mark = self.reader.mark();
        self.unroll_indent(-1);
        self.remove_simple_key()?;
        self.simple_key_allowed = false;
        self.stream_end_produced = true;
        self.push_token(Token::new(TokenKind::StreamEnd, mark, mark));
        Ok(())
    }

    fn fetch_document_indicator(&mut self, kind: TokenKind) -> Result<()> {
        self.unroll_indent(-1);
        self.remove_simple_key()?;
        self.simple_key_allowed = false;
        let start = self.reader.mark();
        self.reader.consume();
        self.reader.consume();
        self.reader.consume();
        let end = self.reader.mark();
        self.push_token(Token::new(kind, start, end));
        Ok(())
    }

    fn fetch_flow_collection_start(&mut self, kind: TokenKind) -> Result<()> {
        self.save_simple_key()?;
        if self.flow_level >= MAX_NESTING {
            return Err(Error::syntax(
                format!("exceeded max depth of {MAX_NESTING}"),
                self.reader.mark(),
            ));
        }
        self.flow_level += 1;
        self.simple_keys.push(SimpleKey::default());
        self.simple_key_allowed = true;
        let start = self.reader.mark();
        self.reader.consume();
        let end = self.reader.mark();
        self.push_token(Token::new(kind, start, end));
        Ok(())
    }

    fn fetch_flow_collection_end(&mut self, kind: TokenKind) -> Result<()> {
        self.remove_simple_key()?;
        if self.flow_level > 0 {
            self.flow_level -= 1;
            self.simple_keys.pop();
        }
        self.simple_key_allowed = false;
        let start = self.reader.mark();
        self.reader.consume();
        let end = self.reader.mark();
        self.push_token(Token::new(kind, start, end));
        Ok(())
    }

    fn fetch_flow_entry(&mut self) -> Result<()> {
        self.remove_simple_key()?;
        self.simple_key_allowed = true;
        let start = self.reader.mark();
        self.reader.consume();
        let end = self.reader.mark();
        self.push_token(Token::new(TokenKind::FlowEntry, start, end));
        Ok(())
    }

    fn fetch_block_entry(&mut self) -> Result<()> {
        if self.flow_level > 0 {
            return Err(Error::syntax(
                "block sequence entries are not allowed in this context",
                self.reader.mark(),
            ));
        }
        if !self.simple_key_allowed {
            return Err(Error::syntax(
                "block sequence entries are not allowed in this context",
                self.reader.mark(),
            ));
        }
        let mark = self.reader.mark();
        self.roll_indent(
            mark.column as i64,
            None,
            TokenKind::BlockSequenceStart,
            mark,
        );
        self.remove_simple_key()?;
        self.simple_key_allowed = true;
        let start = self.reader.mark();
        self.reader.consume();
        let end = self.reader.mark();
        self.push_token(Token::new(TokenKind::BlockEntry, start, end));
        Ok(())
    }

    fn fetch_key(&mut self) -> Result<()> {
        let mark = self.reader.mark();
        if self.flow_level == 0 {
            if !self.simple_key_allowed {
                return Err(Error::syntax(
                    "mapping keys are not allowed in this context",
                    mark,
                ));
            }
            self.roll_indent(mark.column as i64, None, TokenKind::BlockMappingStart, mark);
        }
        self.remove_simple_key()?;
        self.simple_key_allowed = self.flow_level == 0;
        let start = self.reader.mark();
        self.reader.consume();
        let end = self.reader.mark();
        self.push_token(Token::new(TokenKind::Key, start, end));
        Ok(())
    }

    fn fetch_value(&mut self) -> Result<()> {
        let key = self.simple_keys.last().copied().unwrap_or_default();
        if key.possible {
            // The queued tokens back to `token_number` form the key.
            self.insert_token(
                key.token_number,
                Token::new(TokenKind::Key, key.mark, key.mark),
            );
            self.roll_indent(
                key.mark.column as i64,
                Some(key.token_number),
                TokenKind::BlockMappingStart,
                key.mark,
            );
            if let Some(last) = self.simple_keys.last_mut() {
                last.possible = false;
            }
            self.simple_key_allowed = false;
        } else {
            if self.flow_level == 0 {
                if !self.simple_key_allowed {
                    return Err(Error::syntax(
                        "mapping values are not allowed in this context",
                        self.reader.mark(),
                    ));
                }
                let mark = self.reader.mark();
                self.roll_indent(mark.column as i64, None, TokenKind::BlockMappingStart, mark);
            }
            self.simple_key_allowed = self.flow_level == 0;
        }
        let start = self.reader.mark();
        self.reader.consume();
        let end = self.reader.mark();
        self.push_token(Token::new(TokenKind::Value, start, end));
        Ok(())
    }

    fn fetch_anchor_or_alias(&mut self, is_anchor: bool) -> Result<()> {
        self.save_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_anchor(is_anchor)?;
        self.push_token(token);
        Ok(())
    }

    fn fetch_tag(&mut self) -> Result<()> {
        self.save_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_tag()?;
        self.push_token(token);
        Ok(())
    }

    fn fetch_block_scalar(&mut self, literal: bool) -> Result<()> {
        self.remove_simple_key()?;
        self.simple_key_allowed = true;
        let token = self.scan_block_scalar(literal)?;
        self.push_token(token);
        Ok(())
    }

    fn fetch_flow_scalar(&mut self, single: bool) -> Result<()> {
        self.save_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_flow_scalar(single)?;
        self.push_token(token);
        Ok(())
    }

    fn fetch_plain_scalar(&mut self) -> Result<()> {
        self.save_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_plain_scalar()?;
        self.push_token(token);
        Ok(())
    }

    fn fetch_directive(&mut self) -> Result<()> {
        self.unroll_indent(-1);
        self.remove_simple_key()?;
        self.simple_key_allowed = false;
        if let Some(token) = self.scan_directive()? {
            self.push_token(token);
        }
        Ok(())
    }
}

/// Space or tab.
pub(crate) fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Any line break character. CRLF is folded by the break consumers.
pub(crate) fn is_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{ScalarStyle, TokenKind};

    /// Collect the token kinds for `input`, stopping after stream end.
    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(Reader::new(input.as_bytes()));
        let mut out = Vec::new();
        loop {
            let token = scanner.next_token().expect("scan");
            let done = token.kind == TokenKind::StreamEnd;
            out.push(token.kind);
            if done {
                break;
            }
        }
        out
    }

    fn scalar(value: &str) -> TokenKind {
        TokenKind::Scalar {
            value: value.to_owned(),
            style: ScalarStyle::Plain,
        }
    }

    #[test]
    fn test_empty_stream() {
        let kinds = kinds("");
        assert!(matches!(kinds[0], TokenKind::StreamStart(_)));
        assert_eq!(kinds[1], TokenKind::StreamEnd);
    }

    #[test]
    fn test_simple_mapping_tokens() {
        let kinds = kinds("a: 1\nb: 2\n");
        assert_eq!(
            &kinds[1..kinds.len() - 1],
            &[
                TokenKind::BlockMappingStart,
                TokenKind::Key,
                scalar("a"),
                TokenKind::Value,
                scalar("1"),
                TokenKind::Key,
                scalar("b"),
                TokenKind::Value,
                scalar("2"),
                TokenKind::BlockEnd,
            ]
        );
    }

    #[test]
    fn test_block_sequence_tokens() {
        let kinds = kinds("- a\n- b\n");
        assert_eq!(
            &kinds[1..kinds.len() - 1],
            &[
                TokenKind::BlockSequenceStart,
                TokenKind::BlockEntry,
                scalar("a"),
                TokenKind::BlockEntry,
                scalar("b"),
                TokenKind::BlockEnd,
            ]
        );
    }

    #[test]
    fn test_nested_block_mapping() {
        let kinds = kinds("a:\n  b: 1\n");
        assert_eq!(
            &kinds[1..kinds.len() - 1],
            &[
                TokenKind::BlockMappingStart,
                TokenKind::Key,
                scalar("a"),
                TokenKind::Value,
                TokenKind::BlockMappingStart,
                TokenKind::Key,
                scalar("b"),
                TokenKind::Value,
                scalar("1"),
                TokenKind::BlockEnd,
                TokenKind::BlockEnd,
            ]
        );
    }

    #[test]
    fn test_flow_sequence_tokens() {
        let kinds = kinds("[a, b]");
        assert_eq!(
            &kinds[1..kinds.len() - 1],
            &[
                TokenKind::FlowSequenceStart,
                scalar("a"),
                TokenKind::FlowEntry,
                scalar("b"),
                TokenKind::FlowSequenceEnd,
            ]
        );
    }

    #[test]
    fn test_flow_mapping_with_implicit_key() {
        let kinds = kinds("{a: 1}");
        assert_eq!(
            &kinds[1..kinds.len() - 1],
            &[
                TokenKind::FlowMappingStart,
                TokenKind::Key,
                scalar("a"),
                TokenKind::Value,
                scalar("1"),
                TokenKind::FlowMappingEnd,
            ]
        );
    }

    #[test]
    fn test_document_markers() {
        let kinds = kinds("---\na\n...\n");
        assert_eq!(
            &kinds[1..kinds.len() - 1],
            &[TokenKind::DocumentStart, scalar("a"), TokenKind::DocumentEnd]
        );
    }

    #[test]
    fn test_plain_scalar_with_colon_no_space() {
        // `a:b` is one plain scalar in block context.
        let kinds = kinds("a:b\n");
        assert_eq!(&kinds[1..kinds.len() - 1], &[scalar("a:b")]);
    }

    #[test]
    fn test_adjacent_value_after_quoted_key_in_flow() {
        let kinds = kinds("{\"a\":1}");
        assert_eq!(
            &kinds[1..kinds.len() - 1],
            &[
                TokenKind::FlowMappingStart,
                TokenKind::Key,
                TokenKind::Scalar {
                    value: "a".to_owned(),
                    style: ScalarStyle::DoubleQuoted,
                },
                TokenKind::Value,
                scalar("1"),
                TokenKind::FlowMappingEnd,
            ]
        );
    }

    #[test]
    fn test_anchor_and_alias_tokens() {
        let kinds = kinds("a: &x 1\nb: *x\n");
        assert!(kinds.contains(&TokenKind::Anchor("x".to_owned())));
        assert!(kinds.contains(&TokenKind::Alias("x".to_owned())));
    }

    #[test]
    fn test_tab_indentation_is_error() {
        let mut scanner = Scanner::new(Reader::new(b"a: 1\n\tb: 2\n".as_ref()));
        let mut result = Ok(());
        for _ in 0..32 {
            match scanner.next_token() {
                Ok(token) => {
                    if token.kind == TokenKind::StreamEnd {
                        break;
                    }
                }
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }
        let err = result.expect_err("tab indentation must fail");
        assert!(err.to_string().contains("tab"));
    }

    #[test]
    fn test_simple_key_over_budget_is_dismissed() {
        // A very long scalar on one line without a ':' is fine...
        let long = "x".repeat(2000);
        let kinds = kinds(&long);
        assert_eq!(&kinds[1..kinds.len() - 1], &[scalar(&long)]);
    }

    #[test]
    fn test_comment_attaches_to_token() {
        let mut scanner = Scanner::new(Reader::new(b"# top\na: 1 # trailing\n".as_ref()));
        let mut saw_head = false;
        let mut saw_line = false;
        loop {
            let token = scanner.next_token().expect("scan");
            if token.head_comment.contains("top") {
                saw_head = true;
            }
            if token.line_comment.contains("trailing") {
                saw_line = true;
            }
            if token.kind == TokenKind::StreamEnd {
                break;
            }
        }
        assert!(saw_head);
        assert!(saw_line);
    }

    #[test]
    fn test_crlf_mapping() {
        let kinds = kinds("a: 1\r\nb: 2\r\n");
        assert_eq!(
            kinds
                .iter()
                .filter(|kind| matches!(kind, TokenKind::Key))
                .count(),
            2
        );
    }
}
