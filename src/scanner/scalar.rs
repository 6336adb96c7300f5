// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Scalar scanning: plain, quoted, and block styles.
//!
//! All scanners return fully cooked values: escapes are decoded, line
//! breaks are folded, and chomping is applied. Breaks are normalized to
//! `\n` on the way in.

use super::{Scanner, is_blank, is_break};
use crate::error::{Error, Result};
use crate::span::Mark;
use crate::token::{ScalarStyle, Token, TokenKind};

impl Scanner<'_> {
    /// Scan a plain (unquoted) scalar.
    ///
    /// The scalar ends at a `: ` or ` #`, at a document indicator, on a
    /// dedent below the enclosing block, or (in flow context) at a flow
    /// indicator.
    pub(super) fn scan_plain_scalar(&mut self) -> Result<Token> {
        let start_mark = self.reader.mark();
        let mut end_mark = start_mark;
        let indent = self.indent + 1;

        let mut value = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();
        let mut whitespaces = String::new();
        let mut leading_blanks = false;

        loop {
            self.reader.cache(4)?;
            let mark = self.reader.mark();
            if mark.column == 0
                && (self.check_document_indicator("---") || self.check_document_indicator("..."))
            {
                break;
            }
            if self.reader.check('#') {
                break;
            }

            // Consume non-blank characters.
            while let Some(c) = self.reader.ch(0) {
                if is_blank(c) || is_break(c) {
                    break;
                }
                if c == ':'
                    && (self.blankz_at(1) || (self.flow_level > 0 && self.flow_indicator_at(1)))
                {
                    break;
                }
                if self.flow_level > 0 && matches!(c, ',' | '[' | ']' | '{' | '}') {
                    break;
                }
                // Join folded breaks or pending whitespace before content.
                if leading_blanks || !whitespaces.is_empty() {
                    if leading_blanks {
                        if trailing_breaks.is_empty() {
                            value.push(' ');
                        } else {
                            value.push_str(&trailing_breaks);
                            trailing_breaks.clear();
                        }
                        leading_break.clear();
                        leading_blanks = false;
                    } else {
                        value.push_str(&whitespaces);
                        whitespaces.clear();
                    }
                }
                value.push(c);
                self.reader.consume();
                end_mark = self.reader.mark();
                self.reader.cache(2)?;
            }

            // The scalar continues only over blanks and breaks.
            let next_is_blank = self.reader.ch(0).is_some_and(is_blank);
            let next_is_break = self.reader.ch(0).is_some_and(is_break);
            if !next_is_blank && !next_is_break {
                break;
            }
            while let Some(c) = self.reader.ch(0) {
                if is_blank(c) {
                    if leading_blanks && (self.reader.mark().column as i64) < indent && c == '\t' {
                        return Err(Error::syntax_in(
                            "found a tab character that violates indentation",
                            self.reader.mark(),
                            "while scanning a plain scalar",
                            start_mark,
                        ));
                    }
                    if leading_blanks {
                        self.reader.consume();
                    } else {
                        whitespaces.push(c);
                        self.reader.consume();
                    }
                } else if is_break(c) {
                    if leading_blanks {
                        self.read_break(&mut trailing_breaks)?;
                    } else {
                        whitespaces.clear();
                        self.read_break(&mut leading_break)?;
                        leading_blanks = true;
                    }
                } else {
                    break;
                }
                self.reader.cache(2)?;
            }

            // A dedent ends the scalar in block context.
            if self.flow_level == 0 && (self.reader.mark().column as i64) < indent {
                break;
            }
        }

        // A multi-line plain scalar cannot be a simple key, but content may
        // follow it on a fresh line.
        if leading_blanks {
            self.simple_key_allowed = true;
        }

        Ok(Token::new(
            TokenKind::Scalar {
                value,
                style: ScalarStyle::Plain,
            },
            start_mark,
            end_mark,
        ))
    }

    /// Scan a single- or double-quoted scalar.
    pub(super) fn scan_flow_scalar(&mut self, single: bool) -> Result<Token> {
        let start_mark = self.reader.mark();
        self.reader.consume(); // opening quote

        let mut value = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();
        let mut whitespaces = String::new();
        let mut leading_blanks;

        loop {
            self.reader.cache(4)?;
            let mark = self.reader.mark();
            if mark.column == 0
                && (self.check_document_indicator("---") || self.check_document_indicator("..."))
            {
                return Err(Error::syntax_in(
                    "found unexpected document indicator",
                    mark,
                    "while scanning a quoted scalar",
                    start_mark,
                ));
            }
            if self.reader.ch(0).is_none() {
                return Err(Error::syntax_in(
                    "found unexpected end of stream",
                    mark,
                    "while scanning a quoted scalar",
                    start_mark,
                ));
            }

            leading_blanks = false;
            let mut done = false;
            while let Some(c) = self.reader.ch(0) {
                if is_blank(c) || is_break(c) {
                    break;
                }
                if single && c == '\'' && self.reader.check_at('\'', 1) {
                    // `''` is an escaped single quote.
                    value.push('\'');
                    self.reader.consume();
                    self.reader.consume();
                } else if (single && c == '\'') || (!single && c == '"') {
                    done = true;
                    break;
                } else if !single && c == '\\' && self.reader.ch(1).is_some_and(is_break) {
                    // Escaped line break: the break is removed entirely.
                    self.reader.consume();
                    self.skip_break()?;
                    leading_blanks = true;
                    whitespaces.clear();
                    break;
                } else if !single && c == '\\' {
                    self.scan_escape(&mut value, start_mark)?;
                } else {
                    value.push(c);
                    self.reader.consume();
                }
                self.reader.cache(4)?;
            }
            if done {
                break;
            }

            // Blanks and breaks between content runs.
            self.reader.cache(1)?;
            while let Some(c) = self.reader.ch(0) {
                if is_blank(c) {
                    if leading_blanks {
                        self.reader.consume();
                    } else {
                        whitespaces.push(c);
                        self.reader.consume();
                    }
                } else if is_break(c) {
                    if leading_blanks {
                        self.read_break(&mut trailing_breaks)?;
                    } else {
                        whitespaces.clear();
                        self.read_break(&mut leading_break)?;
                        leading_blanks = true;
                    }
                } else {
                    break;
                }
                self.reader.cache(2)?;
            }
            // Loop back; the joining happens lazily before the next content.
            if leading_blanks {
                self.fold_breaks(
                    &mut value,
                    &mut leading_break,
                    &mut trailing_breaks,
                );
            } else {
                value.push_str(&whitespaces);
                whitespaces.clear();
            }
            leading_blanks = false;
        }

        self.reader.consume(); // closing quote
        let end_mark = self.reader.mark();
        Ok(Token::new(
            TokenKind::Scalar {
                value,
                style: if single {
                    ScalarStyle::SingleQuoted
                } else {
                    ScalarStyle::DoubleQuoted
                },
            },
            start_mark,
            end_mark,
        ))
    }

    /// One break folds to a space; N breaks fold to N-1 breaks. An escaped
    /// break (empty `leading_break`) folds to nothing.
    fn fold_breaks(
        &mut self,
        value: &mut String,
        leading_break: &mut String,
        trailing_breaks: &mut String,
    ) {
        if leading_break.is_empty() {
            value.push_str(trailing_breaks);
        } else if trailing_breaks.is_empty() {
            value.push(' ');
        } else {
            value.push_str(trailing_breaks);
        }
        leading_break.clear();
        trailing_breaks.clear();
    }

    /// Scan one `\…` escape sequence in a double-quoted scalar.
    fn scan_escape(&mut self, value: &mut String, start_mark: Mark) -> Result<()> {
        let escape_mark = self.reader.mark();
        self.reader.consume(); // backslash
        self.reader.cache(1)?;
        let Some(code) = self.reader.ch(0) else {
            return Err(Error::syntax_in(
                "found unexpected end of stream",
                self.reader.mark(),
                "while parsing a quoted scalar",
                start_mark,
            ));
        };
        let simple = match code {
            '0' => Some('\0'),
            'a' => Some('\x07'),
            'b' => Some('\x08'),
            't' | '\t' => Some('\t'),
            'n' => Some('\n'),
            'v' => Some('\x0B'),
            'f' => Some('\x0C'),
            'r' => Some('\r'),
            'e' => Some('\x1B'),
            ' ' => Some(' '),
            '"' => Some('"'),
            '/' => Some('/'),
            '\\' => Some('\\'),
            'N' => Some('\u{85}'),
            '_' => Some('\u{A0}'),
            'L' => Some('\u{2028}'),
            'P' => Some('\u{2029}'),
            _ => None,
        };
        if let Some(c) = simple {
            value.push(c);
            self.reader.consume();
            return Ok(());
        }
        let width = match code {
            'x' => 2,
            'u' => 4,
            'U' => 8,
            _ => {
                return Err(Error::syntax_in(
                    format!("found unknown escape character {code:?}"),
                    escape_mark,
                    "while parsing a quoted scalar",
                    start_mark,
                ));
            }
        };
        self.reader.consume(); // x/u/U
        let unit = self.scan_hex_digits(width, start_mark)?;
        let code_point = match unit {
            // A high surrogate escape must be completed by a low one; the
            // pair combines into a single code point.
            0xD800..=0xDBFF => {
                self.reader.cache(2)?;
                if !(self.reader.check('\\') && self.reader.check_at('u', 1)) {
                    return Err(Error::syntax_in(
                        "found a high surrogate escape with no matching low surrogate",
                        escape_mark,
                        "while parsing a quoted scalar",
                        start_mark,
                    ));
                }
                self.reader.consume();
                self.reader.consume();
                let low = self.scan_hex_digits(4, start_mark)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(Error::syntax_in(
                        "found an invalid Unicode surrogate pair",
                        escape_mark,
                        "while parsing a quoted scalar",
                        start_mark,
                    ));
                }
                0x1_0000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(Error::syntax_in(
                    "found an unexpected low surrogate escape",
                    escape_mark,
                    "while parsing a quoted scalar",
                    start_mark,
                ));
            }
            _ => unit,
        };
        let Some(c) = char::from_u32(code_point) else {
            return Err(Error::syntax_in(
                "found an invalid Unicode character escape",
                escape_mark,
                "while parsing a quoted scalar",
                start_mark,
            ));
        };
        value.push(c);
        Ok(())
    }

    fn scan_hex_digits(&mut self, width: usize, start_mark: Mark) -> Result<u32> {
        self.reader.cache(width)?;
        let mut unit: u32 = 0;
        for i in 0..width {
            let Some(digit) = self.reader.ch(i).and_then(|c| c.to_digit(16)) else {
                return Err(Error::syntax_in(
                    "did not find expected hexadecimal number",
                    self.reader.mark(),
                    "while parsing a quoted scalar",
                    start_mark,
                ));
            };
            unit = (unit << 4) + digit;
        }
        for _ in 0..width {
            self.reader.consume();
        }
        Ok(unit)
    }

    /// Scan a `|` or `>` block scalar, including its header.
    pub(super) fn scan_block_scalar(&mut self, literal: bool) -> Result<Token> {
        let start_mark = self.reader.mark();
        self.reader.consume(); // '|' or '>'

        // Header: chomping and indentation indicators, in either order.
        let mut chomping: i8 = 0;
        let mut increment: i64 = 0;
        self.reader.cache(1)?;
        if matches!(self.reader.ch(0), Some('+' | '-')) {
            chomping = if self.reader.check('+') { 1 } else { -1 };
            self.reader.consume();
            self.reader.cache(1)?;
            if let Some(c) = self.reader.ch(0) {
                if c.is_ascii_digit() {
                    if c == '0' {
                        return Err(Error::syntax_in(
                            "found an indentation indicator equal to 0",
                            self.reader.mark(),
                            "while scanning a block scalar",
                            start_mark,
                        ));
                    }
                    increment = i64::from(c.to_digit(10).unwrap_or(0));
                    self.reader.consume();
                }
            }
        } else if let Some(c) = self.reader.ch(0) {
            if c.is_ascii_digit() {
                if c == '0' {
                    return Err(Error::syntax_in(
                        "found an indentation indicator equal to 0",
                        self.reader.mark(),
                        "while scanning a block scalar",
                        start_mark,
                    ));
                }
                increment = i64::from(c.to_digit(10).unwrap_or(0));
                self.reader.consume();
                self.reader.cache(1)?;
                if matches!(self.reader.ch(0), Some('+' | '-')) {
                    chomping = if self.reader.check('+') { 1 } else { -1 };
                    self.reader.consume();
                }
            }
        }

        // Only blanks and a comment may follow the header.
        self.reader.cache(1)?;
        while self.reader.ch(0).is_some_and(is_blank) {
            self.reader.consume();
            self.reader.cache(1)?;
        }
        if self.reader.check('#') {
            self.scan_comment()?;
        }
        self.reader.cache(1)?;
        match self.reader.ch(0) {
            None => {}
            Some(c) if is_break(c) => self.skip_break()?,
            Some(_) => {
                return Err(Error::syntax_in(
                    "did not find expected comment or line break",
                    self.reader.mark(),
                    "while scanning a block scalar",
                    start_mark,
                ));
            }
        }
        let mut end_mark = self.reader.mark();

        let mut indent: i64 = if increment > 0 {
            if self.indent >= 0 {
                self.indent + increment
            } else {
                increment
            }
        } else {
            0
        };

        let mut value = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();

        self.scan_block_scalar_breaks(&mut indent, &mut trailing_breaks, start_mark, &mut end_mark)?;

        let mut leading_blank = false;
        self.reader.cache(1)?;
        while self.reader.mark().column as i64 == indent && self.reader.ch(0).is_some() {
            let trailing_blank = self.reader.ch(0).is_some_and(is_blank);
            // Folded style: a single break between two non-blank lines
            // becomes a space; blank lines and more-indented lines keep
            // their breaks.
            if !literal && leading_break.starts_with('\n') && !leading_blank && !trailing_blank {
                if trailing_breaks.is_empty() {
                    value.push(' ');
                }
                leading_break.clear();
            } else {
                value.push_str(&leading_break);
                leading_break.clear();
            }
            value.push_str(&trailing_breaks);
            trailing_breaks.clear();
            leading_blank = trailing_blank;

            while let Some(c) = self.reader.ch(0) {
                if is_break(c) {
                    break;
                }
                value.push(c);
                self.reader.consume();
                self.reader.cache(1)?;
            }
            end_mark = self.reader.mark();
            self.reader.cache(2)?;
            if self.reader.ch(0).is_none() {
                break;
            }
            self.read_break(&mut leading_break)?;
            self.scan_block_scalar_breaks(
                &mut indent,
                &mut trailing_breaks,
                start_mark,
                &mut end_mark,
            )?;
            self.reader.cache(1)?;
        }

        // Chomping: clip keeps one trailing break, keep retains them all,
        // strip drops them.
        if chomping != -1 {
            value.push_str(&leading_break);
        }
        if chomping == 1 {
            value.push_str(&trailing_breaks);
        }

        Ok(Token::new(
            TokenKind::Scalar {
                value,
                style: if literal {
                    ScalarStyle::Literal
                } else {
                    ScalarStyle::Folded
                },
            },
            start_mark,
            end_mark,
        ))
    }

    /// Consume blank lines and indentation inside a block scalar,
    /// auto-detecting the content indentation when no indicator was given.
    fn scan_block_scalar_breaks(
        &mut self,
        indent: &mut i64,
        breaks: &mut String,
        start_mark: Mark,
        end_mark: &mut Mark,
    ) -> Result<()> {
        let mut max_indent: i64 = 0;
        *end_mark = self.reader.mark();
        loop {
            self.reader.cache(1)?;
            while (*indent == 0 || (self.reader.mark().column as i64) < *indent)
                && self.reader.check(' ')
            {
                self.reader.consume();
                self.reader.cache(1)?;
            }
            if self.reader.mark().column as i64 > max_indent {
                max_indent = self.reader.mark().column as i64;
            }
            if (*indent == 0 || (self.reader.mark().column as i64) < *indent)
                && self.reader.check('\t')
            {
                return Err(Error::syntax_in(
                    "found a tab character where an indentation space is expected",
                    self.reader.mark(),
                    "while scanning a block scalar",
                    start_mark,
                ));
            }
            match self.reader.ch(0) {
                Some(c) if is_break(c) => {
                    self.read_break(breaks)?;
                    *end_mark = self.reader.mark();
                }
                _ => break,
            }
        }
        if *indent == 0 {
            *indent = max_indent.max(self.indent + 1).max(1);
        }
        Ok(())
    }
}
