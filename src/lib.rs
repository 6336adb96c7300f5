// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! An event-driven YAML 1.2 processor.
//!
//! This crate implements the full decode and encode pipeline:
//!
//! ```text
//! bytes → Reader → Scanner → Parser → Composer → Node tree
//! Node tree → Serializer → Emitter → bytes
//! ```
//!
//! Each stage is usable on its own — the [`Scanner`] and [`Parser`] expose
//! pull APIs for token- and event-level consumers — and the convenience
//! functions below wire the whole pipeline together.
//!
//! # Example
//!
//! ```
//! use yaml_codec::{compose_str, emit_to_string};
//!
//! let doc = compose_str("a: 1\nb: [x, y]\n").unwrap().unwrap();
//! let root = &doc.content[0];
//! assert_eq!(root.get("a").unwrap().value, "1");
//!
//! let out = emit_to_string(&doc).unwrap();
//! assert_eq!(out, "a: 1\nb: [x, y]\n");
//! ```
//!
//! Input may be UTF-8 or UTF-16 (either endianness, with or without a
//! BOM); output is always UTF-8 without a BOM. The composer resolves
//! anchors and aliases, expands `<<` merge keys, applies the core-schema
//! tag resolution, and rejects both alias cycles and documents whose alias
//! expansion grows pathologically ("billion laughs").

mod compose;
mod emitter;
mod error;
mod event;
mod node;
mod parser;
mod reader;
mod resolve;
mod scanner;
mod serialize;
mod span;
mod token;

pub use compose::Composer;
pub use emitter::Emitter;
pub use error::{Error, Result, SyntaxError, TypeErrorGroup, UnmarshalError, UnmarshalErrorKind};
pub use event::{CollectionStyle, Event, EventKind};
pub use node::{Node, NodeKind, Style};
pub use parser::Parser;
pub use reader::{Encoding, Reader};
pub use resolve::{
    BINARY_TAG, BOOL_TAG, FLOAT_TAG, INT_TAG, MAP_TAG, MERGE_TAG, NULL_TAG, SEQ_TAG, STR_TAG,
    TIMESTAMP_TAG, Timestamp, decode_base64, encode_base64, encode_base64_wrapped, implicit_tag,
    long_tag, parse_timestamp, short_tag,
};
pub use scanner::Scanner;
pub use serialize::Serializer;
pub use span::Mark;
pub use token::{ScalarStyle, TagDirective, Token, TokenKind};

use std::rc::Rc;

/// Compose the first document from `input`, or `None` for an empty stream.
///
/// Duplicate mapping keys are reported as an [`Error::TypeGroup`]. Build a
/// [`Composer`] directly to opt out of that check.
pub fn compose(input: &[u8]) -> Result<Option<Rc<Node>>> {
    let mut composer = Composer::new(Parser::new(Scanner::new(Reader::new(input))));
    composer.set_unique_keys(true);
    let document = composer.compose()?;
    composer.finish()?;
    Ok(document)
}

/// Compose every document in `input`.
///
/// Duplicate mapping keys are reported as an [`Error::TypeGroup`] for the
/// document that contains them.
pub fn compose_all(input: &[u8]) -> Result<Vec<Rc<Node>>> {
    let mut composer = Composer::new(Parser::new(Scanner::new(Reader::new(input))));
    composer.set_unique_keys(true);
    let mut documents = Vec::new();
    while let Some(document) = composer.compose()? {
        composer.finish()?;
        documents.push(document);
    }
    Ok(documents)
}

/// Compose the first document from a string.
pub fn compose_str(input: &str) -> Result<Option<Rc<Node>>> {
    compose(input.as_bytes())
}

/// Compose every document from a string.
pub fn compose_all_str(input: &str) -> Result<Vec<Rc<Node>>> {
    compose_all(input.as_bytes())
}

/// Render one node tree to a YAML string.
pub fn emit_to_string(node: &Rc<Node>) -> Result<String> {
    emit_all_to_string(std::slice::from_ref(node))
}

/// Render a stream of node trees to a YAML string, with `---` between
/// subsequent documents.
pub fn emit_all_to_string(nodes: &[Rc<Node>]) -> Result<String> {
    let mut serializer = Serializer::new(Emitter::new(Vec::new()));
    for node in nodes {
        serializer.serialize(node)?;
    }
    serializer.close()?;
    String::from_utf8(serializer.into_inner())
        .map_err(|_| Error::marshal("emitter produced invalid UTF-8"))
}

#[cfg(test)]
mod tests;
