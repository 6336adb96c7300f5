// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Input reader: bytes in, code points out.
//!
//! The reader detects the input encoding from the first bytes (BOM, or the
//! null-byte pattern from the YAML detection table), transcodes UTF-16 on
//! the fly, and hands the scanner a peekable sequence of code points with a
//! running [`Mark`]. The scanner promises to call [`Reader::cache`] before
//! peeking, which keeps the peek accessors infallible.

use std::collections::VecDeque;
use std::io;

use crate::error::{Error, Result};
use crate::span::Mark;

/// Character encoding of the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Not determined yet, or "choose for me" on output.
    #[default]
    Any,
    /// UTF-8, the output encoding and the no-BOM default.
    Utf8,
    /// UTF-16 little endian.
    Utf16Le,
    /// UTF-16 big endian.
    Utf16Be,
}

/// Chunk size for stream refills.
const READ_CHUNK: usize = 4096;

/// How many decoded code points [`Reader::cache`] keeps ahead at minimum.
/// Sized for the scanner's longest fixed look-ahead (`---` plus a blank).
pub const LOOKAHEAD: usize = 4;

enum Source<'r> {
    Buffer(&'r [u8]),
    Stream(Box<dyn io::Read + 'r>),
}

/// A decoded code point together with its width in raw input bytes.
#[derive(Debug, Clone, Copy)]
struct Decoded {
    ch: char,
    width: usize,
}

/// Buffered, position-tracking code point reader.
pub struct Reader<'r> {
    source: Source<'r>,
    /// Raw bytes fetched but not yet decoded. For buffer sources this stays
    /// empty; decoding reads straight from the slice.
    raw: VecDeque<u8>,
    /// Decode offset into a buffer source.
    slice_pos: usize,
    /// True once the source has no more bytes.
    raw_eof: bool,
    /// Decoded code points not yet consumed.
    pending: VecDeque<Decoded>,
    /// Raw byte offset of the decode frontier (for error reporting).
    decoded_offset: usize,
    encoding: Encoding,
    mark: Mark,
}

impl<'r> Reader<'r> {
    /// Read from a byte slice.
    #[must_use]
    pub fn new(input: &'r [u8]) -> Self {
        Self::with_source(Source::Buffer(input))
    }

    /// Read from an [`io::Read`] source, refilled on demand.
    #[must_use]
    pub fn from_reader(reader: impl io::Read + 'r) -> Self {
        Self::with_source(Source::Stream(Box::new(reader)))
    }

    fn with_source(source: Source<'r>) -> Self {
        Self {
            source,
            raw: VecDeque::new(),
            slice_pos: 0,
            raw_eof: false,
            pending: VecDeque::new(),
            decoded_offset: 0,
            encoding: Encoding::Any,
            mark: Mark::default(),
        }
    }

    /// The detected input encoding. `Any` until the first [`cache`] call.
    ///
    /// [`cache`]: Self::cache
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The mark of the next unconsumed code point.
    #[must_use]
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Make sure at least `n` code points are decoded, unless the input
    /// ends first.
    pub fn cache(&mut self, n: usize) -> Result<()> {
        if self.encoding == Encoding::Any {
            self.detect_encoding()?;
        }
        while self.pending.len() < n {
            if !self.decode_one()? {
                break;
            }
        }
        Ok(())
    }

    /// Peek the code point `i` positions ahead. Requires a prior
    /// [`cache`](Self::cache) of at least `i + 1`.
    #[must_use]
    pub fn ch(&self, i: usize) -> Option<char> {
        self.pending.get(i).map(|d| d.ch)
    }

    /// True when the next code point equals `c`.
    #[must_use]
    pub fn check(&self, c: char) -> bool {
        self.ch(0) == Some(c)
    }

    /// True when the code point `i` ahead equals `c`.
    #[must_use]
    pub fn check_at(&self, c: char, i: usize) -> bool {
        self.ch(i) == Some(c)
    }

    /// Consume and return the next code point, advancing the mark.
    pub fn consume(&mut self) -> Option<char> {
        let decoded = self.pending.pop_front()?;
        self.mark.index += decoded.width;
        match decoded.ch {
            '\n' | '\u{85}' | '\u{2028}' | '\u{2029}' => {
                self.mark.line += 1;
                self.mark.column = 0;
            }
            // CRLF counts as a single break, attributed to the LF.
            '\r' => {
                if self.ch(0) != Some('\n') {
                    self.mark.line += 1;
                    self.mark.column = 0;
                } else {
                    self.mark.column += 1;
                }
            }
            _ => self.mark.column += 1,
        }
        Some(decoded.ch)
    }

    /// True once every code point has been consumed.
    ///
    /// Only meaningful after a [`cache`](Self::cache) call attempted to
    /// decode at least one more code point.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pending.is_empty() && self.raw_eof && self.raw.is_empty() && self.slice_exhausted()
    }

    fn slice_exhausted(&self) -> bool {
        match &self.source {
            Source::Buffer(data) => self.slice_pos >= data.len(),
            Source::Stream(_) => true,
        }
    }

    // --- raw byte access -------------------------------------------------

    /// Peek the raw byte `i` ahead of the decode frontier.
    fn raw_byte(&mut self, i: usize) -> Result<Option<u8>> {
        loop {
            match &self.source {
                Source::Buffer(data) => {
                    return Ok(data.get(self.slice_pos + i).copied());
                }
                Source::Stream(_) => {
                    if i < self.raw.len() {
                        return Ok(Some(self.raw[i]));
                    }
                    if self.raw_eof {
                        return Ok(None);
                    }
                    self.refill()?;
                }
            }
        }
    }

    fn refill(&mut self) -> Result<()> {
        let Source::Stream(reader) = &mut self.source else {
            return Ok(());
        };
        let mut chunk = [0u8; READ_CHUNK];
        match reader.read(&mut chunk) {
            Ok(0) => self.raw_eof = true,
            Ok(n) => self.raw.extend(&chunk[..n]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => {
                return Err(Error::reader(
                    format!("read failed: {err}"),
                    self.decoded_offset,
                ));
            }
        }
        Ok(())
    }

    /// Drop `n` raw bytes at the decode frontier.
    fn raw_advance(&mut self, n: usize) {
        match &self.source {
            Source::Buffer(_) => self.slice_pos += n,
            Source::Stream(_) => {
                self.raw.drain(..n);
            }
        }
        self.decoded_offset += n;
    }

    // --- encoding --------------------------------------------------------

    /// Inspect the first bytes of the input and fix the encoding.
    ///
    /// A BOM selects the encoding directly and is consumed. Without a BOM,
    /// a null byte in the first two bytes selects the UTF-16 variant per
    /// the YAML detection table; anything else is UTF-8.
    fn detect_encoding(&mut self) -> Result<()> {
        let b0 = self.raw_byte(0)?;
        let b1 = self.raw_byte(1)?;
        let b2 = self.raw_byte(2)?;
        match (b0, b1, b2) {
            (Some(0xEF), Some(0xBB), Some(0xBF)) => {
                self.encoding = Encoding::Utf8;
                self.raw_advance(3);
                self.mark.index = 3;
            }
            (Some(0xFF), Some(0xFE), _) => {
                self.encoding = Encoding::Utf16Le;
                self.raw_advance(2);
                self.mark.index = 2;
            }
            (Some(0xFE), Some(0xFF), _) => {
                self.encoding = Encoding::Utf16Be;
                self.raw_advance(2);
                self.mark.index = 2;
            }
            (Some(0x00), Some(b), _) if b != 0x00 => self.encoding = Encoding::Utf16Be,
            (Some(b), Some(0x00), _) if b != 0x00 => self.encoding = Encoding::Utf16Le,
            _ => self.encoding = Encoding::Utf8,
        }
        Ok(())
    }

    /// Decode one code point into `pending`. Returns false at end of input.
    fn decode_one(&mut self) -> Result<bool> {
        let decoded = match self.encoding {
            Encoding::Utf8 | Encoding::Any => self.decode_utf8()?,
            Encoding::Utf16Le => self.decode_utf16(true)?,
            Encoding::Utf16Be => self.decode_utf16(false)?,
        };
        let Some(decoded) = decoded else {
            return Ok(false);
        };
        self.check_printable(decoded.ch)?;
        self.raw_advance(decoded.width);
        self.pending.push_back(decoded);
        Ok(true)
    }

    fn decode_utf8(&mut self) -> Result<Option<Decoded>> {
        let Some(first) = self.raw_byte(0)? else {
            return Ok(None);
        };
        let width = match first {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => {
                return Err(Error::reader(
                    "invalid leading UTF-8 octet",
                    self.decoded_offset,
                ));
            }
        };
        let mask: u32 = match width {
            1 => 0x7F,
            2 => 0x1F,
            3 => 0x0F,
            _ => 0x07,
        };
        let mut value = u32::from(first) & mask;
        for i in 1..width {
            let Some(byte) = self.raw_byte(i)? else {
                return Err(Error::reader(
                    "incomplete UTF-8 octet sequence",
                    self.decoded_offset,
                ));
            };
            if byte & 0xC0 != 0x80 {
                return Err(Error::reader(
                    "invalid trailing UTF-8 octet",
                    self.decoded_offset,
                ));
            }
            value = (value << 6) | (u32::from(byte) & 0x3F);
        }
        // Reject overlong forms and values outside the Unicode range.
        let min = match width {
            2 => 0x80,
            3 => 0x800,
            4 => 0x1_0000,
            _ => 0,
        };
        if value < min {
            return Err(Error::reader(
                "overlong UTF-8 octet sequence",
                self.decoded_offset,
            ));
        }
        let Some(ch) = char::from_u32(value) else {
            return Err(Error::reader(
                "invalid Unicode character",
                self.decoded_offset,
            ));
        };
        Ok(Some(Decoded { ch, width }))
    }

    fn decode_utf16(&mut self, little_endian: bool) -> Result<Option<Decoded>> {
        let Some(unit) = self.raw_unit16(0, little_endian)? else {
            return Ok(None);
        };
        match unit {
            0xDC00..=0xDFFF => Err(Error::reader(
                "unexpected low surrogate area",
                self.decoded_offset,
            )),
            0xD800..=0xDBFF => {
                let Some(low) = self.raw_unit16(2, little_endian)? else {
                    return Err(Error::reader(
                        "unexpected end of a surrogate pair",
                        self.decoded_offset,
                    ));
                };
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(Error::reader(
                        "expected low surrogate area",
                        self.decoded_offset,
                    ));
                }
                let value =
                    0x1_0000 + ((u32::from(unit) & 0x3FF) << 10) + (u32::from(low) & 0x3FF);
                let ch = char::from_u32(value).ok_or_else(|| {
                    Error::reader("invalid Unicode character", self.decoded_offset)
                })?;
                Ok(Some(Decoded { ch, width: 4 }))
            }
            _ => {
                let ch = char::from_u32(u32::from(unit)).ok_or_else(|| {
                    Error::reader("invalid Unicode character", self.decoded_offset)
                })?;
                Ok(Some(Decoded { ch, width: 2 }))
            }
        }
    }

    /// Read the 16-bit unit starting `at` bytes past the decode frontier.
    fn raw_unit16(&mut self, at: usize, little_endian: bool) -> Result<Option<u16>> {
        let Some(b0) = self.raw_byte(at)? else {
            return Ok(None);
        };
        let Some(b1) = self.raw_byte(at + 1)? else {
            return Err(Error::reader(
                "incomplete UTF-16 character",
                self.decoded_offset,
            ));
        };
        Ok(Some(if little_endian {
            u16::from_le_bytes([b0, b1])
        } else {
            u16::from_be_bytes([b0, b1])
        }))
    }

    /// Reject code points YAML does not allow in a character stream.
    /// Escaped control characters inside double-quoted scalars never reach
    /// this check; they are produced by the scanner from ASCII escapes.
    fn check_printable(&self, ch: char) -> Result<()> {
        let ok = matches!(ch,
            '\t' | '\n' | '\r' | '\u{85}'
            | '\u{20}'..='\u{7E}'
            | '\u{A0}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}');
        if ok {
            Ok(())
        } else {
            Err(Error::reader(
                "control characters are not allowed",
                self.decoded_offset,
            ))
        }
    }
}
