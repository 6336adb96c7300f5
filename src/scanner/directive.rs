// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Directives, anchors, aliases, and tags.

use log::warn;

use super::{Scanner, is_blank, is_break};
use crate::error::{Error, Result};
use crate::span::Mark;
use crate::token::{TagDirective, Token, TokenKind};

/// Anchor and alias names may use any non-space, non-flow-indicator
/// character.
fn is_anchor_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '[' | ']' | '{' | '}' | ',')
}

/// Characters allowed in a tag URI, besides alphanumerics.
fn is_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            ';' | '/' | '?' | ':' | '@' | '&' | '=' | '+' | '$' | ',' | '_' | '.' | '!' | '~'
                | '*' | '\'' | '(' | ')' | '[' | ']' | '-' | '%'
        )
}

impl Scanner<'_> {
    /// Scan a `%` directive at column 0. Unknown directives are skipped
    /// with a warning rather than an error.
    pub(super) fn scan_directive(&mut self) -> Result<Option<Token>> {
        let start_mark = self.reader.mark();
        self.reader.consume(); // '%'

        let name = self.scan_directive_name(start_mark)?;
        let token = match name.as_str() {
            "YAML" => {
                let (major, minor) = self.scan_version_directive_value(start_mark)?;
                Some(Token::new(
                    TokenKind::VersionDirective { major, minor },
                    start_mark,
                    self.reader.mark(),
                ))
            }
            "TAG" => {
                let directive = self.scan_tag_directive_value(start_mark)?;
                Some(Token::new(
                    TokenKind::TagDirective(directive),
                    start_mark,
                    self.reader.mark(),
                ))
            }
            _ => {
                warn!("found unknown directive %{name}, skipping");
                // Skip the rest of the line.
                loop {
                    self.reader.cache(1)?;
                    match self.reader.ch(0) {
                        None => break,
                        Some(c) if is_break(c) => break,
                        Some(_) => {
                            self.reader.consume();
                        }
                    }
                }
                None
            }
        };

        // Only blanks and a comment may follow a directive.
        if token.is_some() {
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
                        "while scanning a directive",
                        start_mark,
                    ));
                }
            }
        }
        Ok(token)
    }

    fn scan_directive_name(&mut self, start_mark: Mark) -> Result<String> {
        let mut name = String::new();
        self.reader.cache(1)?;
        while let Some(c) = self.reader.ch(0) {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                name.push(c);
                self.reader.consume();
                self.reader.cache(1)?;
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(Error::syntax_in(
                "could not find expected directive name",
                self.reader.mark(),
                "while scanning a directive",
                start_mark,
            ));
        }
        if !self.blankz_at(0) {
            return Err(Error::syntax_in(
                "found unexpected non-alphabetical character",
                self.reader.mark(),
                "while scanning a directive",
                start_mark,
            ));
        }
        Ok(name)
    }

    fn scan_version_directive_value(&mut self, start_mark: Mark) -> Result<(u32, u32)> {
        self.skip_directive_blanks()?;
        let major = self.scan_version_number(start_mark)?;
        self.reader.cache(1)?;
        if !self.reader.check('.') {
            return Err(Error::syntax_in(
                "did not find expected digit or '.' character",
                self.reader.mark(),
                "while scanning a %YAML directive",
                start_mark,
            ));
        }
        self.reader.consume();
        let minor = self.scan_version_number(start_mark)?;
        Ok((major, minor))
    }

    fn scan_version_number(&mut self, start_mark: Mark) -> Result<u32> {
        let mut value: u32 = 0;
        let mut digits = 0;
        self.reader.cache(1)?;
        while let Some(digit) = self.reader.ch(0).and_then(|c| c.to_digit(10)) {
            digits += 1;
            if digits > 9 {
                return Err(Error::syntax_in(
                    "found extra digits in version number",
                    self.reader.mark(),
                    "while scanning a %YAML directive",
                    start_mark,
                ));
            }
            value = value * 10 + digit;
            self.reader.consume();
            self.reader.cache(1)?;
        }
        if digits == 0 {
            return Err(Error::syntax_in(
                "did not find expected version number",
                self.reader.mark(),
                "while scanning a %YAML directive",
                start_mark,
            ));
        }
        Ok(value)
    }

    fn scan_tag_directive_value(&mut self, start_mark: Mark) -> Result<TagDirective> {
        self.skip_directive_blanks()?;
        let handle = self.scan_tag_handle(true, start_mark)?;
        self.reader.cache(1)?;
        if !self.reader.ch(0).is_some_and(is_blank) {
            return Err(Error::syntax_in(
                "did not find expected whitespace",
                self.reader.mark(),
                "while scanning a %TAG directive",
                start_mark,
            ));
        }
        self.skip_directive_blanks()?;
        let prefix = self.scan_tag_uri(None, start_mark)?;
        if prefix.is_empty() {
            return Err(Error::syntax_in(
                "did not find expected tag prefix",
                self.reader.mark(),
                "while scanning a %TAG directive",
                start_mark,
            ));
        }
        if !self.blankz_at(0) {
            return Err(Error::syntax_in(
                "did not find expected whitespace or line break",
                self.reader.mark(),
                "while scanning a %TAG directive",
                start_mark,
            ));
        }
        Ok(TagDirective { handle, prefix })
    }

    fn skip_directive_blanks(&mut self) -> Result<()> {
        self.reader.cache(1)?;
        while self.reader.ch(0).is_some_and(is_blank) {
            self.reader.consume();
            self.reader.cache(1)?;
        }
        Ok(())
    }

    /// Scan an `&anchor` or `*alias` token.
    pub(super) fn scan_anchor(&mut self, is_anchor: bool) -> Result<Token> {
        let start_mark = self.reader.mark();
        self.reader.consume(); // '&' or '*'

        let mut name = String::new();
        self.reader.cache(1)?;
        while let Some(c) = self.reader.ch(0) {
            if is_anchor_char(c) {
                name.push(c);
                self.reader.consume();
                self.reader.cache(1)?;
            } else {
                break;
            }
        }
        if name.is_empty() {
            let what = if is_anchor { "an anchor" } else { "an alias" };
            return Err(Error::syntax_in(
                "did not find expected anchor name",
                self.reader.mark(),
                format!("while scanning {what}"),
                start_mark,
            ));
        }
        let end_mark = self.reader.mark();
        let kind = if is_anchor {
            TokenKind::Anchor(name)
        } else {
            TokenKind::Alias(name)
        };
        Ok(Token::new(kind, start_mark, end_mark))
    }

    /// Scan a tag: `!`, `!suffix`, `!!suffix`, `!handle!suffix`, or
    /// verbatim `!<uri>`.
    pub(super) fn scan_tag(&mut self) -> Result<Token> {
        let start_mark = self.reader.mark();
        self.reader.cache(2)?;

        let (handle, suffix);
        if self.reader.check_at('<', 1) {
            // Verbatim tag.
            handle = String::new();
            self.reader.consume();
            self.reader.consume();
            suffix = self.scan_tag_uri(None, start_mark)?;
            if suffix.is_empty() {
                return Err(Error::syntax_in(
                    "did not find expected tag URI",
                    self.reader.mark(),
                    "while scanning a tag",
                    start_mark,
                ));
            }
            self.reader.cache(1)?;
            if !self.reader.check('>') {
                return Err(Error::syntax_in(
                    "did not find the expected '>'",
                    self.reader.mark(),
                    "while scanning a tag",
                    start_mark,
                ));
            }
            self.reader.consume();
        } else if self.blankz_at(1) || (self.flow_level > 0 && self.flow_indicator_at(1)) {
            // The non-specific tag `!`.
            handle = "!".to_owned();
            suffix = String::new();
            self.reader.consume();
        } else {
            let scanned_handle = self.scan_tag_handle(false, start_mark)?;
            if scanned_handle.len() > 1 && scanned_handle.ends_with('!') {
                handle = scanned_handle;
                suffix = self.scan_tag_uri(None, start_mark)?;
                if suffix.is_empty() {
                    return Err(Error::syntax_in(
                        "did not find expected tag URI",
                        self.reader.mark(),
                        "while scanning a tag",
                        start_mark,
                    ));
                }
            } else {
                // What looked like a handle is really the suffix of the
                // primary `!` handle.
                handle = "!".to_owned();
                suffix = self.scan_tag_uri(Some(&scanned_handle[1..]), start_mark)?;
            }
        }

        // The tag must be followed by whitespace or, in flow context, a
        // flow indicator.
        self.reader.cache(1)?;
        if !self.blankz_at(0) && !(self.flow_level > 0 && self.flow_indicator_at(0)) {
            return Err(Error::syntax_in(
                "did not find expected whitespace or line break",
                self.reader.mark(),
                "while scanning a tag",
                start_mark,
            ));
        }
        let end_mark = self.reader.mark();
        Ok(Token::new(
            TokenKind::Tag { handle, suffix },
            start_mark,
            end_mark,
        ))
    }

    /// Scan a tag handle: `!`, `!!`, or `!word!`.
    ///
    /// In a `%TAG` directive the closing `!` is mandatory for named
    /// handles; in node position a missing closing `!` means the word was
    /// actually a suffix.
    fn scan_tag_handle(&mut self, directive: bool, start_mark: Mark) -> Result<String> {
        self.reader.cache(1)?;
        if !self.reader.check('!') {
            return Err(Error::syntax_in(
                "did not find expected '!'",
                self.reader.mark(),
                "while scanning a tag",
                start_mark,
            ));
        }
        let mut handle = String::from('!');
        self.reader.consume();
        self.reader.cache(1)?;
        while let Some(c) = self.reader.ch(0) {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                handle.push(c);
                self.reader.consume();
                self.reader.cache(1)?;
            } else {
                break;
            }
        }
        if self.reader.check('!') {
            handle.push('!');
            self.reader.consume();
        } else if directive && handle != "!" {
            return Err(Error::syntax_in(
                "did not find expected '!'",
                self.reader.mark(),
                "while scanning a tag directive",
                start_mark,
            ));
        }
        Ok(handle)
    }

    /// Scan a tag URI, decoding `%XX` escapes. `head` is text already
    /// consumed as part of a would-be handle.
    fn scan_tag_uri(&mut self, head: Option<&str>, start_mark: Mark) -> Result<String> {
        let mut uri = head.unwrap_or("").to_owned();
        let mut escaped: Vec<u8> = Vec::new();
        self.reader.cache(1)?;
        while let Some(c) = self.reader.ch(0) {
            if !is_uri_char(c) {
                break;
            }
            // Flow indicators delimit the tag in flow context.
            if self.flow_level > 0 && matches!(c, ',' | '[' | ']') {
                break;
            }
            if c == '%' {
                escaped.push(self.scan_uri_escape(start_mark)?);
            } else {
                if !escaped.is_empty() {
                    uri.push_str(&decode_percent_bytes(&escaped, start_mark)?);
                    escaped.clear();
                }
                uri.push(c);
                self.reader.consume();
            }
            self.reader.cache(1)?;
        }
        if !escaped.is_empty() {
            uri.push_str(&decode_percent_bytes(&escaped, start_mark)?);
        }
        Ok(uri)
    }

    /// Scan one `%XX` escape byte.
    fn scan_uri_escape(&mut self, start_mark: Mark) -> Result<u8> {
        self.reader.cache(3)?;
        self.reader.consume(); // '%'
        let mut byte: u8 = 0;
        for _ in 0..2 {
            let Some(digit) = self.reader.ch(0).and_then(|c| c.to_digit(16)) else {
                return Err(Error::syntax_in(
                    "did not find expected hexadecimal number",
                    self.reader.mark(),
                    "while scanning a tag",
                    start_mark,
                ));
            };
            byte = (byte << 4) | digit as u8;
            self.reader.consume();
        }
        Ok(byte)
    }
}

/// Decode accumulated `%XX` bytes as UTF-8.
fn decode_percent_bytes(bytes: &[u8], start_mark: Mark) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| {
        Error::syntax_in(
            "found an invalid UTF-8 octet sequence in a URI escape",
            start_mark,
            "while scanning a tag",
            start_mark,
        )
    })
}

#[cfg(test)]
mod tests {
    use crate::reader::Reader;
    use crate::scanner::Scanner;
    use crate::token::{TagDirective, TokenKind};

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

    #[test]
    fn test_yaml_directive() {
        let kinds = kinds("%YAML 1.2\n---\na\n");
        assert!(kinds.contains(&TokenKind::VersionDirective { major: 1, minor: 2 }));
        assert!(kinds.contains(&TokenKind::DocumentStart));
    }

    #[test]
    fn test_tag_directive() {
        let kinds = kinds("%TAG !e! tag:example.com,2000:app/\n---\n!e!foo bar\n");
        assert!(kinds.contains(&TokenKind::TagDirective(TagDirective {
            handle: "!e!".to_owned(),
            prefix: "tag:example.com,2000:app/".to_owned(),
        })));
        assert!(kinds.contains(&TokenKind::Tag {
            handle: "!e!".to_owned(),
            suffix: "foo".to_owned(),
        }));
    }

    #[test]
    fn test_unknown_directive_is_skipped() {
        let kinds = kinds("%FOOBAR zzz\n---\na\n");
        assert!(kinds.contains(&TokenKind::DocumentStart));
        assert!(
            !kinds
                .iter()
                .any(|kind| matches!(kind, TokenKind::VersionDirective { .. }))
        );
    }

    #[test]
    fn test_secondary_handle_tag() {
        let kinds = kinds("!!str abc\n");
        assert!(kinds.contains(&TokenKind::Tag {
            handle: "!!".to_owned(),
            suffix: "str".to_owned(),
        }));
    }

    #[test]
    fn test_primary_handle_tag() {
        let kinds = kinds("!local abc\n");
        assert!(kinds.contains(&TokenKind::Tag {
            handle: "!".to_owned(),
            suffix: "local".to_owned(),
        }));
    }

    #[test]
    fn test_non_specific_tag() {
        let kinds = kinds("! abc\n");
        assert!(kinds.contains(&TokenKind::Tag {
            handle: "!".to_owned(),
            suffix: String::new(),
        }));
    }

    #[test]
    fn test_verbatim_tag() {
        let kinds = kinds("!<tag:yaml.org,2002:str> abc\n");
        assert!(kinds.contains(&TokenKind::Tag {
            handle: String::new(),
            suffix: "tag:yaml.org,2002:str".to_owned(),
        }));
    }

    #[test]
    fn test_uri_escape_in_tag() {
        let kinds = kinds("!e%21m abc\n");
        assert!(kinds.contains(&TokenKind::Tag {
            handle: "!".to_owned(),
            suffix: "e!m".to_owned(),
        }));
    }

    #[test]
    fn test_anchor_name_set() {
        // Anchor names take any non-space, non-flow-indicator character.
        let kinds = kinds("a: &x:y 1\n");
        assert!(kinds.contains(&TokenKind::Anchor("x:y".to_owned())));
    }

    #[test]
    fn test_empty_anchor_name_fails() {
        let mut scanner = Scanner::new(Reader::new(b"a: & b\n".as_ref()));
        let mut failed = false;
        for _ in 0..16 {
            match scanner.next_token() {
                Err(_) => {
                    failed = true;
                    break;
                }
                Ok(token) if token.kind == TokenKind::StreamEnd => break,
                Ok(_) => {}
            }
        }
        assert!(failed);
    }
}
