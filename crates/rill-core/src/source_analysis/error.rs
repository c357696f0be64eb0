// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical error types.
//!
//! The lexer uses error recovery: it records a [`LexError`] as a
//! [`Diagnostic`](super::Diagnostic) and keeps going, so a single pass
//! reports every lexical problem in a file. The kinds here carry the
//! canonical message text; miette integration comes for free for callers
//! that want structured reports instead of the accumulated diagnostics.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use super::{Diagnostic, Severity, SourceSpan};

/// A lexical error encountered during tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct LexError {
    /// The kind of lexical error.
    #[source]
    pub kind: LexErrorKind,
    /// The source location of the error.
    #[label("here")]
    pub span: SourceSpan,
}

impl LexError {
    /// Creates a new lexical error.
    #[must_use]
    pub fn new(kind: LexErrorKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    /// Creates an "unexpected character" error.
    #[must_use]
    pub fn unexpected_char(c: char, span: SourceSpan) -> Self {
        Self::new(LexErrorKind::UnexpectedCharacter(c), span)
    }

    /// Creates an "unterminated string" error.
    #[must_use]
    pub fn unterminated_string(span: SourceSpan) -> Self {
        Self::new(LexErrorKind::UnterminatedString, span)
    }

    /// Creates an "unterminated block comment" error.
    #[must_use]
    pub fn unterminated_comment(span: SourceSpan) -> Self {
        Self::new(LexErrorKind::UnterminatedComment, span)
    }

    /// Creates an "unrecognized escape sequence" error.
    #[must_use]
    pub fn invalid_escape(c: char, span: SourceSpan) -> Self {
        Self::new(LexErrorKind::InvalidEscape(c), span)
    }

    /// Creates an "invalid number literal" error.
    #[must_use]
    pub fn invalid_number(span: SourceSpan) -> Self {
        Self::new(LexErrorKind::InvalidNumber, span)
    }
}

impl From<LexError> for Diagnostic {
    fn from(error: LexError) -> Self {
        Diagnostic::new(error.span, Severity::Error, error.kind.to_string())
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A character with no place in the language was encountered.
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// A string literal ran into a raw newline or the end of the file.
    #[error("string not terminated")]
    UnterminatedString,

    /// A block comment ran into the end of the file.
    #[error("multiline comment did not end")]
    UnterminatedComment,

    /// A backslash escape other than `\a`, `\n`, `\t`, or `\\`.
    #[error("unrecognized escape sequence '\\{0}'")]
    InvalidEscape(char),

    /// A number literal that does not fit its representation.
    #[error("invalid number literal")]
    InvalidNumber,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = LexError::unexpected_char('#', SourceSpan::new("a.rl", 0, 1));
        assert_eq!(err.to_string(), "Unexpected character '#'");

        let err = LexError::unterminated_string(SourceSpan::new("a.rl", 0, 10));
        assert_eq!(err.to_string(), "string not terminated");

        let err = LexError::invalid_escape('q', SourceSpan::new("a.rl", 3, 2));
        assert_eq!(err.to_string(), "unrecognized escape sequence '\\q'");
    }

    #[test]
    fn lex_error_to_diagnostic() {
        let span = SourceSpan::new("a.rl", 5, 2);
        let diag: Diagnostic = LexError::unterminated_comment(span.clone()).into();
        assert_eq!(diag.span, span);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "multiline comment did not end");
    }
}
