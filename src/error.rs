// Copyright (c) 2026 Arista Networks, Inc.
// Use of this source code is governed by the Apache License 2.0
// that can be found in the LICENSE file.

//! Error types for the YAML pipeline.
//!
//! The taxonomy splits into fatal errors ([`Error`]) that abort the current
//! document and leave the instance unusable, and soft type errors
//! ([`UnmarshalError`]) that are collected into a [`TypeErrorGroup`] while
//! processing continues. Every error that has a position carries a [`Mark`].

use std::fmt;

use derive_more::Display;

use crate::span::Mark;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A fatal pipeline error.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum Error {
    /// Scanner, parser, or composer structural failure. Fatal for the
    /// current document; no recovery to the next `---` is attempted.
    #[display("{_0}")]
    Syntax(SyntaxError),

    /// I/O or encoding failure while reading input.
    #[display("yaml: input error: {problem} at byte {offset}")]
    Reader {
        /// Description of the failure.
        problem: String,
        /// Byte offset into the raw input where the failure was detected.
        offset: usize,
    },

    /// Emitter-time failure (invalid anchor, invalid UTF-8 in a `!!str`
    /// value, write error from the sink).
    #[display("yaml: {problem}")]
    Marshal {
        /// Description of the failure.
        problem: String,
    },

    /// One or more soft type errors collected during composition.
    #[display("{_0}")]
    TypeGroup(TypeErrorGroup),
}

impl std::error::Error for Error {}

impl Error {
    /// Build a reader error.
    #[must_use]
    pub fn reader(problem: impl Into<String>, offset: usize) -> Self {
        Self::Reader {
            problem: problem.into(),
            offset,
        }
    }

    /// Build a marshal error.
    #[must_use]
    pub fn marshal(problem: impl Into<String>) -> Self {
        Self::Marshal {
            problem: problem.into(),
        }
    }

    /// Build a syntax error at `mark`.
    #[must_use]
    pub fn syntax(problem: impl Into<String>, mark: Mark) -> Self {
        Self::Syntax(SyntaxError {
            problem: problem.into(),
            mark,
            context: None,
        })
    }

    /// Build a syntax error with a context mark (e.g. where the enclosing
    /// construct started).
    #[must_use]
    pub fn syntax_in(
        problem: impl Into<String>,
        mark: Mark,
        context: impl Into<String>,
        context_mark: Mark,
    ) -> Self {
        Self::Syntax(SyntaxError {
            problem: problem.into(),
            mark,
            context: Some((context.into(), context_mark)),
        })
    }
}

/// A scanner/parser/composer failure with position information.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    /// What went wrong.
    pub problem: String,
    /// Where it went wrong.
    pub mark: Mark,
    /// Where the surrounding construct started, when that helps
    /// (e.g. "while parsing a block mapping").
    pub context: Option<(String, Mark)>,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((context, context_mark)) = &self.context {
            write!(
                f,
                "yaml: line {}: {} ({} at line {}, column {})",
                self.mark.display_line(),
                self.problem,
                context,
                context_mark.display_line(),
                context_mark.display_column(),
            )
        } else {
            write!(f, "yaml: line {}: {}", self.mark.display_line(), self.problem)
        }
    }
}

impl std::error::Error for SyntaxError {}

/// A soft error raised while mapping composed nodes onto a destination.
///
/// The composer produces these for duplicate keys; the binding collaborator
/// produces them for unknown fields and incompatible values. They are
/// recoverable: processing continues and the collected group is returned at
/// the end.
#[derive(Debug, Clone, PartialEq)]
pub struct UnmarshalError {
    /// Position of the offending node.
    pub mark: Mark,
    /// The specific failure.
    pub kind: UnmarshalErrorKind,
}

/// The kind of soft type error.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum UnmarshalErrorKind {
    /// A mapping key equal to an earlier key in the same mapping.
    #[display("mapping key {key:?} already defined at line {}", first.display_line())]
    DuplicateKey {
        /// Rendered key text.
        key: String,
        /// Position of the first occurrence.
        first: Mark,
    },

    /// A mapping key with no corresponding field in the target type.
    /// Produced by the binding collaborator when `known_fields` is on.
    #[display("field {field:?} not found in type {target}")]
    UnknownField {
        /// The unmatched key.
        field: String,
        /// Description of the destination type.
        target: String,
    },

    /// A node whose resolved type cannot populate the target.
    /// Produced by the binding collaborator.
    #[display("cannot unmarshal {tag} {value:?} into {target}")]
    Incompatible {
        /// Short form of the node's resolved tag.
        tag: String,
        /// Truncated scalar text.
        value: String,
        /// Description of the destination type.
        target: String,
    },
}

impl fmt::Display for UnmarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mark == Mark::default() {
            write!(f, "yaml: {}", self.kind)
        } else {
            write!(f, "yaml: line {}: {}", self.mark.display_line(), self.kind)
        }
    }
}

impl std::error::Error for UnmarshalError {}

/// A collection of soft type errors from one document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeErrorGroup {
    /// The collected errors, in source order.
    pub errors: Vec<UnmarshalError>,
}

impl TypeErrorGroup {
    /// True when no soft errors were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of collected errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for TypeErrorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "yaml: unmarshal errors:")?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  line {}: {}", err.mark.display_line(), err.kind)?;
        }
        Ok(())
    }
}

impl std::error::Error for TypeErrorGroup {}
