// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Core-schema tag resolution.
//!
//! Plain scalars without an explicit tag resolve in the order null, bool,
//! int, float, timestamp, string. Only recognition happens here; mapping
//! scalar text onto native values is the binding collaborator's job.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{Error, Result};
use crate::span::Mark;

/// `tag:yaml.org,2002:` — the prefix behind the `!!` handle.
pub const DEFAULT_PREFIX: &str = "tag:yaml.org,2002:";

pub const NULL_TAG: &str = "tag:yaml.org,2002:null";
pub const BOOL_TAG: &str = "tag:yaml.org,2002:bool";
pub const STR_TAG: &str = "tag:yaml.org,2002:str";
pub const INT_TAG: &str = "tag:yaml.org,2002:int";
pub const FLOAT_TAG: &str = "tag:yaml.org,2002:float";
pub const TIMESTAMP_TAG: &str = "tag:yaml.org,2002:timestamp";
pub const SEQ_TAG: &str = "tag:yaml.org,2002:seq";
pub const MAP_TAG: &str = "tag:yaml.org,2002:map";
pub const BINARY_TAG: &str = "tag:yaml.org,2002:binary";
pub const MERGE_TAG: &str = "tag:yaml.org,2002:merge";

/// A broken-down `!!timestamp` value.
///
/// Only recognition and field validation happen here; arithmetic belongs to
/// whatever date-time type the binding maps this onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
    /// Offset from UTC in minutes, when the source carried a timezone.
    pub tz_offset_minutes: Option<i32>,
}

/// Convert a long-form tag to its short form: `tag:yaml.org,2002:str`
/// becomes `!!str`. Tags outside the default prefix are returned unchanged.
#[must_use]
pub fn short_tag(tag: &str) -> String {
    if let Some(suffix) = tag.strip_prefix(DEFAULT_PREFIX) {
        format!("!!{suffix}")
    } else {
        tag.to_owned()
    }
}

/// Convert a short-form tag to its long form: `!!str` becomes
/// `tag:yaml.org,2002:str`. Anything else is returned unchanged.
#[must_use]
pub fn long_tag(tag: &str) -> String {
    if let Some(suffix) = tag.strip_prefix("!!") {
        format!("{DEFAULT_PREFIX}{suffix}")
    } else {
        tag.to_owned()
    }
}

/// The implicit core-schema tag of a plain scalar.
#[must_use]
pub fn implicit_tag(value: &str) -> &'static str {
    match value {
        "" | "~" | "null" | "Null" | "NULL" => return NULL_TAG,
        "true" | "True" | "TRUE" | "false" | "False" | "FALSE" => return BOOL_TAG,
        _ => {}
    }
    if is_int(value) {
        return INT_TAG;
    }
    if is_float(value) {
        return FLOAT_TAG;
    }
    if parse_timestamp(value).is_some() {
        return TIMESTAMP_TAG;
    }
    STR_TAG
}

// --- integers ------------------------------------------------------------

/// Recognize a core-schema integer: decimal, `0x`, `0o`, `0b`, optional
/// sign, `_` separators, and a representable magnitude.
fn is_int(value: &str) -> bool {
    let (negative, rest) = split_sign(value);
    let (radix, digits) = if let Some(hex) = rest.strip_prefix("0x") {
        (16, hex)
    } else if let Some(oct) = rest.strip_prefix("0o") {
        (8, oct)
    } else if let Some(bin) = rest.strip_prefix("0b") {
        (2, bin)
    } else {
        (10, rest)
    };
    if digits.is_empty() {
        return false;
    }
    let mut clean = String::with_capacity(digits.len());
    let mut prev_underscore = true;
    for c in digits.chars() {
        if c == '_' {
            // No leading, trailing, or doubled separators.
            if prev_underscore {
                return false;
            }
            prev_underscore = true;
            continue;
        }
        if !c.is_digit(radix) {
            return false;
        }
        clean.push(c);
        prev_underscore = false;
    }
    if prev_underscore && clean.len() != digits.len() {
        return false;
    }
    if clean.is_empty() {
        return false;
    }
    match u64::from_str_radix(&clean, radix) {
        // i64::MIN is representable; nothing larger in magnitude is.
        Ok(magnitude) => !negative || magnitude <= i64::MAX as u64 + 1,
        Err(_) => false,
    }
}

// --- floats --------------------------------------------------------------

/// Recognize a core-schema float, including `.inf`/`.nan` spellings.
fn is_float(value: &str) -> bool {
    let (negative, rest) = split_sign(value);
    match rest {
        ".inf" | ".Inf" | ".INF" => return true,
        ".nan" | ".NaN" | ".NAN" => return !negative,
        _ => {}
    }
    // Grammar: ( digits [ "." digits* ] | "." digits ) [ e [sign] digits ],
    // with `_` separators in the digit runs.
    let cleaned: String = rest.chars().filter(|c| *c != '_').collect();
    if rest.contains("__") || rest.starts_with('_') || rest.ends_with('_') {
        return false;
    }
    let mut chars = cleaned.chars().peekable();
    let mut mantissa_digits = 0usize;
    let mut saw_dot = false;
    let mut saw_exponent = false;
    while let Some(&c) = chars.peek() {
        match c {
            '0'..='9' => {
                mantissa_digits += 1;
                chars.next();
            }
            '.' if !saw_dot && !saw_exponent => {
                saw_dot = true;
                chars.next();
            }
            'e' | 'E' if !saw_exponent && mantissa_digits > 0 => {
                saw_exponent = true;
                chars.next();
                if matches!(chars.peek(), Some('+' | '-')) {
                    chars.next();
                }
                let mut exponent_digits = 0usize;
                while matches!(chars.peek(), Some('0'..='9')) {
                    exponent_digits += 1;
                    chars.next();
                }
                if exponent_digits == 0 {
                    return false;
                }
            }
            _ => return false,
        }
    }
    if mantissa_digits == 0 || (!saw_dot && !saw_exponent) {
        // A bare digit run is an int, not a float.
        return false;
    }
    cleaned.parse::<f64>().is_ok()
}

fn split_sign(value: &str) -> (bool, &str) {
    if let Some(rest) = value.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = value.strip_prefix('+') {
        (false, rest)
    } else {
        (false, value)
    }
}

// --- timestamps ----------------------------------------------------------

/// Parse a `!!timestamp` value: `yyyy-mm-dd`, optionally followed by a
/// `T`/`t`/space separator, a `h:m:s` time with optional fractional
/// seconds, and an optional timezone (`Z`, `±hh`, `±hhmm`, `±hh:mm`).
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let mut cursor = Cursor::new(value);
    let year = cursor.digits(4, 4)? as i32;
    cursor.expect('-')?;
    let month = cursor.digits(1, 2)? as u8;
    cursor.expect('-')?;
    let day = cursor.digits(1, 2)? as u8;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let mut ts = Timestamp {
        year,
        month,
        day,
        hour: 0,
        minute: 0,
        second: 0,
        nanosecond: 0,
        tz_offset_minutes: None,
    };
    if cursor.done() {
        return Some(ts);
    }
    match cursor.peek()? {
        'T' | 't' => {
            cursor.next();
        }
        ' ' => cursor.skip_spaces(),
        _ => return None,
    }
    ts.hour = cursor.digits(1, 2)? as u8;
    cursor.expect(':')?;
    ts.minute = cursor.digits(1, 2)? as u8;
    cursor.expect(':')?;
    ts.second = cursor.digits(1, 2)? as u8;
    if ts.hour > 23 || ts.minute > 59 || ts.second > 59 {
        return None;
    }
    if cursor.peek() == Some('.') {
        cursor.next();
        let (fraction, len) = cursor.digit_run(9)?;
        // Scale to nanoseconds regardless of how many digits were given.
        ts.nanosecond = fraction * 10u32.pow(9 - len as u32);
    }
    if cursor.done() {
        return Some(ts);
    }
    cursor.skip_spaces();
    match cursor.peek()? {
        'Z' => {
            cursor.next();
            ts.tz_offset_minutes = Some(0);
        }
        '+' | '-' => {
            let negative = cursor.next() == Some('-');
            let hours = cursor.digits(1, 2)? as i32;
            let minutes = if cursor.peek() == Some(':') {
                cursor.next();
                cursor.digits(2, 2)? as i32
            } else if !cursor.done() {
                cursor.digits(2, 2)? as i32
            } else {
                0
            };
            if hours > 23 || minutes > 59 {
                return None;
            }
            let total = hours * 60 + minutes;
            ts.tz_offset_minutes = Some(if negative { -total } else { total });
        }
        _ => return None,
    }
    if cursor.done() { Some(ts) } else { None }
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(value: &'a str) -> Self {
        Self {
            chars: value.chars().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn next(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn done(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn expect(&mut self, c: char) -> Option<()> {
        (self.next() == Some(c)).then_some(())
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(' ') {
            self.next();
        }
    }

    /// Read between `min` and `max` decimal digits.
    fn digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let mut value: u32 = 0;
        let mut count = 0;
        while count < max {
            match self.peek() {
                Some(c @ '0'..='9') => {
                    value = value * 10 + c.to_digit(10)?;
                    count += 1;
                    self.next();
                }
                _ => break,
            }
        }
        (count >= min).then_some(value)
    }

    /// Read up to `max` digits, returning the value and the digit count.
    fn digit_run(&mut self, max: usize) -> Option<(u32, usize)> {
        let mut value: u32 = 0;
        let mut count = 0;
        while count < max {
            match self.peek() {
                Some(c @ '0'..='9') => {
                    value = value * 10 + c.to_digit(10)?;
                    count += 1;
                    self.next();
                }
                _ => break,
            }
        }
        // Swallow extra precision beyond nanoseconds.
        while matches!(self.peek(), Some('0'..='9')) {
            self.next();
        }
        (count > 0).then_some((value, count))
    }
}

// --- binary --------------------------------------------------------------

/// Decode a `!!binary` payload. Whitespace and line breaks from block or
/// folded layouts are stripped before decoding.
pub fn decode_base64(value: &str, mark: Mark) -> Result<Vec<u8>> {
    let compact: String = value.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    BASE64.decode(compact.as_bytes()).map_err(|err| {
        Error::Syntax(crate::error::SyntaxError {
            problem: format!("decode !!binary: {err}"),
            mark,
            context: None,
        })
    })
}

/// Encode bytes for a `!!binary` scalar. Line wrapping is the emitter's job.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Encode bytes for a `!!binary` scalar, wrapped at 76 columns. Payloads
/// longer than one line are meant for the literal block style.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = BASE64.encode(data);
    if encoded.len() <= 76 {
        return encoded;
    }
    let mut out = String::with_capacity(encoded.len() + encoded.len() / 76 + 1);
    let bytes = encoded.as_bytes();
    for chunk in bytes.chunks(76) {
        out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        out.push('\n');
    }
    out
}
