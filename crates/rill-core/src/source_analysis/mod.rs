// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source analysis for Rill: lexing, parsing, and diagnostics.
//!
//! # Lexical Analysis
//!
//! [`lex`] (or [`Lexer`]) converts source text into a stream of [`Token`]s
//! that always ends with a single [`TokenKind::Null`] sentinel. Each token
//! carries its [`SourceSpan`].
//!
//! ```
//! use rill_core::source_analysis::{lex, TokenKind};
//!
//! let (tokens, diagnostics) = lex("m.rl", "x + 1");
//! assert!(diagnostics.is_empty());
//! assert_eq!(tokens.len(), 4); // x, +, 1, <end of file>
//! ```
//!
//! # Parsing
//!
//! [`parse`] (or [`Parser`]) converts a token stream into a
//! [`Module`](crate::ast::Module) AST.
//!
//! # Error Handling
//!
//! Neither stage aborts on error: both accumulate [`Diagnostic`]s, and the
//! parser resynchronizes at statement boundaries so one run reports every
//! discoverable problem. Callers gate later passes on
//! [`Severity::is_error`].

mod diagnostic;
mod error;
mod lexer;
mod parser;
mod span;
mod token;


pub use diagnostic::{Diagnostic, Severity};
pub use error::{LexError, LexErrorKind};
pub use lexer::{Lexer, lex};
pub use parser::{Parser, parse};
pub use span::SourceSpan;
pub use token::{Token, TokenKind, TokenValue};
