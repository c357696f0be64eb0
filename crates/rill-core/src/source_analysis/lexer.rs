// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Rill source code.
//!
//! This module converts source text into a stream of [`Token`]s. The lexer
//! is hand-written for maximum control over error recovery and span
//! placement.
//!
//! # Design Principles
//!
//! - **Error recovery**: a lexical error is recorded as a diagnostic and
//!   lexing continues; the lexer never aborts.
//! - **Precise spans**: every token carries the exact byte range it was
//!   read from. The end-of-stream sentinel is the only zero-length token.
//! - **One token of lookahead is enough**: compound operators are resolved
//!   with a single character of lookahead against `=`.
//!
//! # Example
//!
//! ```
//! use rill_core::source_analysis::{lex, TokenKind};
//!
//! let (tokens, diagnostics) = lex("main.rl", "var x = 1;");
//! assert!(diagnostics.is_empty());
//! assert_eq!(tokens.last().unwrap().kind(), TokenKind::Null);
//! assert_eq!(tokens.len(), 6); // var, x, =, 1, ;, <end of file>
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{Diagnostic, LexError, SourceSpan, Token, TokenKind, TokenValue};

/// Tokenizes `source`, attributing spans to `file`.
///
/// Returns the token stream (always ending in exactly one
/// [`TokenKind::Null`] sentinel) and the lexical diagnostics, in emission
/// order.
#[must_use]
pub fn lex(file: impl Into<EcoString>, source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    Lexer::new(file, source).lex()
}

/// A lexer that tokenizes Rill source code.
///
/// The lexer owns a cursor over the source text for the duration of
/// [`Lexer::lex`]; it is single-use and single-threaded.
pub struct Lexer<'src> {
    /// File path used for span attribution.
    file: EcoString,
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    position: usize,
    /// Byte position where the current token started.
    start: u32,
    /// Tokens produced so far.
    tokens: Vec<Token>,
    /// Accumulated diagnostics.
    diagnostics: Vec<Diagnostic>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("file", &self.file)
            .field("position", &self.position)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given file path and source text.
    #[must_use]
    pub fn new(file: impl Into<EcoString>, source: &'src str) -> Self {
        Self {
            file: file.into(),
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            start: 0,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Runs the lexer to completion.
    ///
    /// The returned token stream always ends with a single zero-length
    /// [`TokenKind::Null`] token, even for empty input.
    #[must_use]
    pub fn lex(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        loop {
            self.skip_trivia();
            self.start = self.current_position();
            let Some(c) = self.peek_char() else { break };
            self.lex_token(c);
        }

        self.start = self.current_position();
        let span = self.span_from_start();
        self.tokens.push(Token::new(TokenKind::Null, span));

        (self.tokens, self.diagnostics)
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is the same as
    /// `peek_char`).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next();
        }
        iter.next().map(|(_, c)| c)
    }

    /// Consumes the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    /// Consumes the next character if it equals `expected`.
    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes characters while the predicate is true.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns the current byte position.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    /// Creates a span from `pos` to the current position.
    fn span_from(&self, pos: u32) -> SourceSpan {
        SourceSpan::new(self.file.clone(), pos, self.current_position() - pos)
    }

    /// Creates a span from the current token start to the current position.
    fn span_from_start(&self) -> SourceSpan {
        self.span_from(self.start)
    }

    /// Pushes a token with no payload covering the current marker.
    fn push(&mut self, kind: TokenKind) {
        let span = self.span_from_start();
        self.tokens.push(Token::new(kind, span));
    }

    /// Pushes a token with a payload covering the current marker.
    fn push_value(&mut self, kind: TokenKind, value: TokenValue) {
        let span = self.span_from_start();
        self.tokens.push(Token::with_value(kind, value, span));
    }

    /// Records a lexical error.
    fn report(&mut self, error: LexError) {
        self.diagnostics.push(error.into());
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Skips whitespace and comments, rolling the marker forward without
    /// emitting tokens.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
                }
                Some('/') if self.peek_char_n(1) == Some('/') => {
                    self.advance_while(|c| c != '\n');
                }
                Some('/') if self.peek_char_n(1) == Some('*') => {
                    self.skip_block_comment();
                }
                _ => break,
            }
        }
    }

    /// Skips a block comment, reporting an error at the opening `/*` if the
    /// end of the file arrives before `*/`.
    fn skip_block_comment(&mut self) {
        let open = self.current_position();
        self.advance(); // /
        self.advance(); // *

        loop {
            match self.peek_char() {
                None => {
                    let span = SourceSpan::new(self.file.clone(), open, 2);
                    self.report(LexError::unterminated_comment(span));
                    break;
                }
                Some('*') if self.peek_char_n(1) == Some('/') => {
                    self.advance(); // *
                    self.advance(); // /
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    /// Lexes one token starting at `c`.
    fn lex_token(&mut self, c: char) {
        match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Period),
            ':' => self.single(TokenKind::Colon),
            ';' => self.single(TokenKind::Semicolon),

            '-' => self.operator(TokenKind::Minus, TokenKind::MinusEq),
            '+' => self.operator(TokenKind::Plus, TokenKind::PlusEq),
            '*' => self.operator(TokenKind::Star, TokenKind::StarEq),
            // Comment forms were consumed as trivia, so '/' here is division.
            '/' => self.operator(TokenKind::Slash, TokenKind::SlashEq),
            '%' => self.operator(TokenKind::Percent, TokenKind::PercentEq),
            '!' => self.operator(TokenKind::Not, TokenKind::NotEq),
            '=' => self.operator(TokenKind::Eq, TokenKind::EqEq),
            '>' => self.operator(TokenKind::Greater, TokenKind::GreaterEq),
            '<' => self.operator(TokenKind::Less, TokenKind::LessEq),

            '"' => self.lex_string(),
            '0'..='9' => self.lex_number(),
            'a'..='z' | 'A'..='Z' | '_' => self.lex_identifier(),

            _ => {
                self.advance();
                let span = self.span_from_start();
                self.report(LexError::unexpected_char(c, span));
            }
        }
    }

    /// Emits a single-character token.
    fn single(&mut self, kind: TokenKind) {
        self.advance();
        self.push(kind);
    }

    /// Emits `compound` if the operator is followed by `=`, else `single`.
    fn operator(&mut self, single: TokenKind, compound: TokenKind) {
        self.advance();
        let kind = if self.advance_if('=') { compound } else { single };
        self.push(kind);
    }

    /// Lexes a string literal. The opening quote is the current character.
    ///
    /// The literal is collected raw first, then decoded in a second pass by
    /// [`Lexer::decode_string`]. A raw newline or end of file terminates the
    /// literal with an error and no token.
    fn lex_string(&mut self) {
        self.advance(); // opening quote
        let content_start = self.position;

        loop {
            match self.peek_char() {
                None => {
                    let span = self.span_from_start();
                    self.report(LexError::unterminated_string(span));
                    return;
                }
                Some('\n') => {
                    self.advance();
                    let span = self.span_from_start();
                    self.report(LexError::unterminated_string(span));
                    return;
                }
                Some('\\') => {
                    // Keep the pair raw; the decode pass interprets it. An
                    // escaped quote must not close the literal here.
                    self.advance();
                    if self.peek_char() == Some('"') {
                        self.advance();
                    }
                }
                Some('"') => {
                    let content_end = self.position;
                    self.advance(); // closing quote
                    let value = self.decode_string(content_start, content_end);
                    self.push_value(TokenKind::String, TokenValue::Str(value));
                    return;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Decodes the escapes in the raw string content at
    /// `source[content_start..content_end]`.
    ///
    /// Recognized escapes are `\a`, `\n`, `\t`, `\\`, and `\"`. Anything
    /// else is reported with a two-character span and dropped from the
    /// decoded value.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn decode_string(&mut self, content_start: usize, content_end: usize) -> EcoString {
        let raw = &self.source[content_start..content_end];
        let mut value = String::new();

        let mut chars = raw.char_indices();
        while let Some((i, c)) = chars.next() {
            if c != '\\' {
                value.push(c);
                continue;
            }
            match chars.next() {
                Some((_, 'a')) => value.push('\u{7}'),
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, '"')) => value.push('"'),
                Some((_, other)) => {
                    let pos = (content_start + i) as u32;
                    let length = (c.len_utf8() + other.len_utf8()) as u32;
                    let span = SourceSpan::new(self.file.clone(), pos, length);
                    self.report(LexError::invalid_escape(other, span));
                }
                // A trailing backslash cannot occur: the collection loop
                // always keeps a character after one.
                None => {}
            }
        }

        EcoString::from(value)
    }

    /// Lexes an integer or real literal. The first digit is the current
    /// character.
    ///
    /// A `.` only continues the literal when at least one digit follows, so
    /// `1.x` lexes as integer, period, identifier. There is no exponent
    /// form; a sign is a unary operator, not part of the literal.
    fn lex_number(&mut self) {
        self.advance_while(|c| c.is_ascii_digit());

        let is_real = self.peek_char() == Some('.')
            && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit());
        if is_real {
            self.advance(); // .
            self.advance_while(|c| c.is_ascii_digit());
        }

        let text = &self.source[self.start as usize..self.position];
        if is_real {
            match text.parse::<f64>() {
                Ok(v) => self.push_value(TokenKind::Real, TokenValue::Real(v)),
                Err(_) => {
                    let span = self.span_from_start();
                    self.report(LexError::invalid_number(span));
                    self.push_value(TokenKind::Real, TokenValue::Real(0.0));
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => self.push_value(TokenKind::Integer, TokenValue::Int(v)),
                Err(_) => {
                    let span = self.span_from_start();
                    self.report(LexError::invalid_number(span));
                    self.push_value(TokenKind::Integer, TokenValue::Int(0));
                }
            }
        }
    }

    /// Lexes an identifier or reserved word. The first character is the
    /// current character.
    fn lex_identifier(&mut self) {
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = &self.source[self.start as usize..self.position];

        if let Some(keyword) = TokenKind::keyword_from_str(text) {
            self.push(keyword);
        } else {
            let value = TokenValue::Str(EcoString::from(text));
            self.push_value(TokenKind::Ident, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, _) = lex("test.rl", source);
        tokens.iter().map(Token::kind).collect()
    }

    fn lex_ok(source: &str) -> Vec<Token> {
        let (tokens, diagnostics) = lex("test.rl", source);
        assert!(
            diagnostics.is_empty(),
            "expected no diagnostics, got: {diagnostics:?}"
        );
        tokens
    }

    #[test]
    fn empty_input_is_just_the_sentinel() {
        let tokens = lex_ok("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Null);
        assert!(tokens[0].span().is_empty());
    }

    #[test]
    fn stream_ends_with_exactly_one_sentinel() {
        let tokens = lex_ok("var x = 1;");
        let nulls = tokens
            .iter()
            .filter(|t| t.kind() == TokenKind::Null)
            .count();
        assert_eq!(nulls, 1);
        assert_eq!(tokens.last().unwrap().kind(), TokenKind::Null);
    }

    #[test]
    fn every_real_token_covers_at_least_one_byte() {
        let source = "module m; func f() { return 1 + 2.5; }";
        let tokens = lex_ok(source);
        for token in &tokens {
            if token.kind() == TokenKind::Null {
                assert!(token.span().is_empty());
            } else {
                assert!(token.span().length() >= 1, "zero-length {token:?}");
            }
            assert!(token.span().end() as usize <= source.len());
        }
    }

    #[test]
    fn delimiters() {
        assert_eq!(
            kinds("(){}[],.:;"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Comma,
                TokenKind::Period,
                TokenKind::Colon,
                TokenKind::Semicolon,
                TokenKind::Null,
            ]
        );
    }

    #[test]
    fn compound_operators_take_one_lookahead() {
        assert_eq!(
            kinds("+ += - -= * *= / /= % %= ! != = == > >= < <="),
            vec![
                TokenKind::Plus,
                TokenKind::PlusEq,
                TokenKind::Minus,
                TokenKind::MinusEq,
                TokenKind::Star,
                TokenKind::StarEq,
                TokenKind::Slash,
                TokenKind::SlashEq,
                TokenKind::Percent,
                TokenKind::PercentEq,
                TokenKind::Not,
                TokenKind::NotEq,
                TokenKind::Eq,
                TokenKind::EqEq,
                TokenKind::Greater,
                TokenKind::GreaterEq,
                TokenKind::Less,
                TokenKind::LessEq,
                TokenKind::Null,
            ]
        );
    }

    #[test]
    fn adjacent_equals_pair_up_greedily() {
        // `===` is `==` then `=`; `!==` is `!=` then `=`.
        assert_eq!(
            kinds("=== !=="),
            vec![
                TokenKind::EqEq,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::Eq,
                TokenKind::Null,
            ]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        let tokens = lex_ok("module m; import other as alias;");
        let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Module,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Import,
                TokenKind::Ident,
                TokenKind::As,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Null,
            ]
        );
        assert_eq!(tokens[1].string_value().unwrap(), "m");
        assert_eq!(tokens[4].string_value().unwrap(), "other");
    }

    #[test]
    fn keywords_are_case_sensitive_and_whole_word() {
        let tokens = lex_ok("If module_ moduleX");
        assert!(tokens[..3].iter().all(|t| t.kind() == TokenKind::Ident));
    }

    #[test]
    fn underscore_starts_an_identifier() {
        let tokens = lex_ok("_private _1");
        assert_eq!(tokens[0].string_value().unwrap(), "_private");
        assert_eq!(tokens[1].string_value().unwrap(), "_1");
    }

    #[test]
    fn integer_literal() {
        let tokens = lex_ok("42");
        assert_eq!(tokens[0].kind(), TokenKind::Integer);
        assert_eq!(tokens[0].int_value(), Some(42));
    }

    #[test]
    fn real_literal() {
        let tokens = lex_ok("3.25");
        assert_eq!(tokens[0].kind(), TokenKind::Real);
        assert_eq!(tokens[0].real_value(), Some(3.25));
    }

    #[test]
    fn dot_without_digit_is_not_a_real() {
        let tokens = lex_ok("1.x");
        assert_eq!(tokens[0].kind(), TokenKind::Integer);
        assert_eq!(tokens[1].kind(), TokenKind::Period);
        assert_eq!(tokens[2].kind(), TokenKind::Ident);
    }

    #[test]
    fn out_of_range_integer_reports_invalid_number() {
        let (tokens, diagnostics) = lex("test.rl", "99999999999999999999");
        assert_eq!(tokens[0].kind(), TokenKind::Integer);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "invalid number literal");
    }

    #[test]
    fn string_literal_plain() {
        let tokens = lex_ok("\"hello\"");
        assert_eq!(tokens[0].kind(), TokenKind::String);
        assert_eq!(tokens[0].string_value().unwrap(), "hello");
        // Span covers both quotes.
        assert_eq!(tokens[0].span().pos(), 0);
        assert_eq!(tokens[0].span().length(), 7);
    }

    #[test]
    fn string_escapes_decode() {
        let tokens = lex_ok(r#""a\nb\"c""#);
        assert_eq!(tokens[0].string_value().unwrap(), "a\nb\"c");
    }

    #[test]
    fn string_all_canonical_escapes() {
        let tokens = lex_ok(r#""\a\n\t\\""#);
        assert_eq!(tokens[0].string_value().unwrap(), "\u{7}\n\t\\");
    }

    #[test]
    fn string_unknown_escape_is_reported_and_dropped() {
        let (tokens, diagnostics) = lex("test.rl", r#""x\qy""#);
        assert_eq!(tokens[0].string_value().unwrap(), "xy");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "unrecognized escape sequence '\\q'");
        // The span points at the two offending characters.
        assert_eq!(diagnostics[0].span.pos(), 2);
        assert_eq!(diagnostics[0].span.length(), 2);
    }

    #[test]
    fn string_with_raw_newline_is_an_error() {
        let (tokens, diagnostics) = lex("test.rl", "\"abc\ndef\"");
        assert_eq!(diagnostics.len(), 2, "{diagnostics:?}");
        assert_eq!(diagnostics[0].message, "string not terminated");
        // No String token was produced for the first fragment.
        assert!(tokens.iter().all(|t| t.kind() != TokenKind::String));
    }

    #[test]
    fn string_hitting_eof_is_an_error() {
        let (tokens, diagnostics) = lex("test.rl", "\"abc");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "string not terminated");
        assert_eq!(tokens.len(), 1); // just the sentinel
    }

    #[test]
    fn line_comment_is_skipped() {
        let tokens = lex_ok("1 // two three\n4");
        assert_eq!(tokens[0].int_value(), Some(1));
        assert_eq!(tokens[1].int_value(), Some(4));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn block_comment_is_skipped() {
        let tokens = lex_ok("1 /* 2\n3 */ 4");
        assert_eq!(tokens[0].int_value(), Some(1));
        assert_eq!(tokens[1].int_value(), Some(4));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn unterminated_block_comment_reports_at_opening() {
        let (tokens, diagnostics) = lex("test.rl", "1 /* never ends");
        assert_eq!(tokens.len(), 2); // 1 and the sentinel
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "multiline comment did not end");
        assert_eq!(diagnostics[0].span.pos(), 2);
        assert_eq!(diagnostics[0].span.length(), 2);
    }

    #[test]
    fn unexpected_character_is_reported_and_skipped() {
        let (tokens, diagnostics) = lex("test.rl", "a ? b");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Unexpected character '?'");
        assert_eq!(
            tokens.iter().map(Token::kind).collect::<Vec<_>>(),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Null]
        );
    }

    #[test]
    fn spans_are_contiguous_and_ordered() {
        let source = "var x = 10 + 2.5; // tail";
        let tokens = lex_ok(source);
        for window in tokens.windows(2) {
            assert!(
                window[1].span().pos() >= window[0].span().end(),
                "overlapping spans: {:?} then {:?}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn token_spans_slice_back_to_their_lexemes() {
        let source = "while done != true { poll(); }";
        let tokens = lex_ok(source);
        for (token, expected) in tokens.iter().zip([
            "while", "done", "!=", "true", "{", "poll", "(", ")", ";", "}",
        ]) {
            assert_eq!(&source[token.span().as_range()], expected);
        }
    }
}
