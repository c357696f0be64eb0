// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Rill source code.
//!
//! The parser consumes the lexer's token stream and builds a [`Module`]
//! AST, accumulating diagnostics instead of stopping at the first error.
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** — the parser always produces a module;
//!   callers check the diagnostics to decide whether to run later passes.
//! - **Multiple errors per file** — a parse error unwinds to the nearest
//!   recovery point via [`ParseFault`] and parsing continues, so one run
//!   reports every discoverable error with a bounded cascade.
//! - **Precise spans** — every diagnostic points at the offending token.
//!
//! # Recovery
//!
//! Any parsing primitive may signal a *parse fault* (a [`Result`] error
//! carried up with `?`). Statement parsing catches faults and skips to the
//! next `;`; the top-level definition loop catches faults and calls
//! [`Parser::synchronize`]; a fault in the module header aborts parsing of
//! the file.
//!
//! # Usage
//!
//! ```
//! use rill_core::source_analysis::{lex, parse};
//!
//! let (tokens, _) = lex("m.rl", "module m; var x = 3 + 4;");
//! let (module, diagnostics) = parse("m.rl", &tokens);
//!
//! assert!(diagnostics.is_empty());
//! assert_eq!(module.def.name(), "m");
//! assert_eq!(module.definitions.len(), 1);
//! ```

use camino::Utf8PathBuf;
use ecow::EcoString;

use crate::ast::{ForeignImport, GlobalDefinition, Identifier, Module, ModuleImport};
use crate::source_analysis::{Diagnostic, SourceSpan, Token, TokenKind};

mod declarations;
mod expressions;
mod statements;
mod types;


/// The signal raised by a parsing primitive on error.
///
/// A fault means a diagnostic has already been recorded; it carries no
/// payload and unwinds with `?` to the nearest recovery site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParseFault;

/// The result type of fallible parsing productions.
pub(crate) type ParseResult<T> = Result<T, ParseFault>;

/// Parses a token stream into a module.
///
/// This is the main entry point for parsing. It always returns a
/// [`Module`], even for erroneous input; check the returned diagnostics
/// before running later passes. The token stream must be a lexer output:
/// non-empty and ending with a single [`TokenKind::Null`].
#[must_use]
pub fn parse(
    file_path: impl Into<Utf8PathBuf>,
    tokens: &[Token],
) -> (Module, Vec<Diagnostic>) {
    Parser::new(file_path, tokens).parse()
}

/// The parser state: a monotonically advancing cursor into an immutable
/// token stream.
///
/// The token stream is borrowed, so it must outlive the parser.
pub struct Parser<'t> {
    /// Path of the file the tokens came from.
    file_path: Utf8PathBuf,
    /// The tokens being parsed.
    tokens: &'t [Token],
    /// Current token index.
    current: usize,
    /// Accumulated diagnostics.
    diagnostics: Vec<Diagnostic>,
}

impl<'t> Parser<'t> {
    /// Creates a parser over a lexer's token stream.
    #[must_use]
    pub fn new(file_path: impl Into<Utf8PathBuf>, tokens: &'t [Token]) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|t| t.kind() == TokenKind::Null),
            "token stream must end with the Null sentinel"
        );
        Self {
            file_path: file_path.into(),
            tokens,
            current: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Runs the parser to completion, returning the module and the
    /// diagnostics in emission order.
    #[must_use]
    pub fn parse(mut self) -> (Module, Vec<Diagnostic>) {
        let module = self.parse_module();
        (module, self.diagnostics)
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the current token. At the end of input this is the `Null`
    /// sentinel.
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    /// Returns the token immediately before the cursor.
    pub(super) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Returns `true` while the cursor is strictly before the terminal
    /// `Null`.
    pub(super) fn is_good(&self) -> bool {
        self.current + 1 < self.tokens.len()
    }

    /// Moves the cursor forward and returns the consumed token.
    pub(super) fn advance(&mut self) -> &Token {
        if self.is_good() {
            self.current += 1;
        }
        self.previous()
    }

    /// Consumes the current token if it has the given kind.
    pub(super) fn check(&mut self, kind: TokenKind) -> bool {
        if self.is_good() && self.peek().kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token, faulting with `message` if its kind is
    /// not `kind`.
    ///
    /// The advance happens even on failure so that synchronization always
    /// makes progress.
    pub(super) fn ensure(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if !self.is_good() {
            let span = self.previous().span().clone();
            self.error(message, span);
            return Err(ParseFault);
        }

        self.advance();
        let token = self.previous().clone();
        if token.kind() == kind {
            Ok(token)
        } else {
            let span = token.span().clone();
            self.error(message, span);
            Err(ParseFault)
        }
    }

    /// Rewinds the cursor by one token.
    ///
    /// Used where dispatch has consumed a token that a sub-parser wants to
    /// see again.
    pub(super) fn backtrack(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Returns the raw cursor index, for speculative scans that restore it
    /// with [`Parser::rewind_to`].
    pub(super) fn cursor(&self) -> usize {
        self.current
    }

    /// Restores the cursor to a position saved with [`Parser::cursor`].
    pub(super) fn rewind_to(&mut self, index: usize) {
        self.current = index;
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Records an error diagnostic.
    pub(super) fn error(&mut self, message: impl Into<EcoString>, span: SourceSpan) {
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    /// Records a note diagnostic attached to the preceding error.
    pub(super) fn note(&mut self, message: impl Into<EcoString>, span: SourceSpan) {
        self.diagnostics.push(Diagnostic::note(message, span));
    }

    /// Synchronizes to a safe recovery point after a fault.
    ///
    /// Advances until a `;` has just been consumed (possibly by the failing
    /// production itself) or a token that can start a definition or
    /// statement is current.
    pub(super) fn synchronize(&mut self) {
        while self.is_good() {
            if self.previous().kind() == TokenKind::Semicolon {
                return;
            }
            match self.peek().kind() {
                TokenKind::Class
                | TokenKind::Func
                | TokenKind::Enum
                | TokenKind::Var
                | TokenKind::Const
                | TokenKind::Static
                | TokenKind::Export
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::Ident => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ========================================================================
    // Module Parsing
    // ========================================================================

    /// Parses the whole token stream into a module.
    fn parse_module(&mut self) -> Module {
        let mut module = Module::new(self.file_path.clone());

        if self.tokens.len() <= 1 {
            let span = self.peek().span().clone();
            self.error("file is empty", span);
            return module;
        }

        // A fault in the module header or an import aborts the file; faults
        // in definitions are caught per definition below.
        let _ = self.parse_module_contents(&mut module);
        module
    }

    fn parse_module_contents(&mut self, module: &mut Module) -> ParseResult<()> {
        self.ensure(TokenKind::Module, "expected module definition")?;
        module.def = self.parse_identifier()?;
        self.ensure(TokenKind::Semicolon, "expected semicolon ';'")?;

        while self.check(TokenKind::Import) {
            self.parse_import(module)?;
        }

        while self.is_good() {
            match self.parse_global_definition() {
                Ok(def) => module.definitions.push(def),
                Err(ParseFault) => self.synchronize(),
            }
        }

        Ok(())
    }

    /// Parses a dotted identifier: one or more identifier tokens separated
    /// by `.`.
    pub(super) fn parse_identifier(&mut self) -> ParseResult<Identifier> {
        let mut path = vec![self.ensure(TokenKind::Ident, "expected identifier")?];
        while self.check(TokenKind::Period) {
            path.push(self.ensure(TokenKind::Ident, "expected identifier")?);
        }
        Ok(Identifier::new(path))
    }

    /// Parses one import clause; the `import` keyword is already consumed.
    ///
    /// `import extern` with anything but a string payload records an error
    /// plus a note and resynchronizes to the next `;` instead of faulting.
    fn parse_import(&mut self, module: &mut Module) -> ParseResult<()> {
        if self.check(TokenKind::Extern) {
            let extern_tok = self.previous().clone();
            match self.ensure(TokenKind::String, "expected string") {
                Ok(path) => module.foreign_imports.push(ForeignImport { path }),
                Err(_) => {
                    self.note(
                        "to import a Rill module, remove 'extern'",
                        extern_tok.span().clone(),
                    );
                    while self.is_good() && !self.check(TokenKind::Semicolon) {
                        self.advance();
                    }
                    return Ok(());
                }
            }
        } else {
            let imported = self.parse_identifier()?;
            let alias = if self.check(TokenKind::As) {
                self.parse_identifier()?
            } else {
                imported.clone()
            };
            module.imports.push(ModuleImport { imported, alias });
        }

        self.ensure(TokenKind::Semicolon, "expected semicolon ';'")?;
        Ok(())
    }

    /// Parses a global definition with its optional `export` marker.
    fn parse_global_definition(&mut self) -> ParseResult<GlobalDefinition> {
        let exported = self.check(TokenKind::Export);
        let def = self.parse_definition()?;
        Ok(GlobalDefinition { exported, def })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Definition, Expression, Statement};
    use crate::source_analysis::{Severity, lex};

    /// Lexes and parses, asserting the lexer saw nothing wrong.
    pub(super) fn parse_source(source: &str) -> (Module, Vec<Diagnostic>) {
        let (tokens, lex_diagnostics) = lex("test.rl", source);
        assert!(
            lex_diagnostics.is_empty(),
            "unexpected lexical errors: {lex_diagnostics:?}"
        );
        parse("test.rl", &tokens)
    }

    /// Parses a source string and asserts there are no diagnostics.
    pub(super) fn parse_ok(source: &str) -> Module {
        let (module, diagnostics) = parse_source(source);
        assert!(
            diagnostics.is_empty(),
            "expected no errors, got: {diagnostics:?}"
        );
        module
    }

    /// Parses a source string expecting diagnostics.
    pub(super) fn parse_err(source: &str) -> (Module, Vec<Diagnostic>) {
        let (module, diagnostics) = parse_source(source);
        assert!(!diagnostics.is_empty(), "expected errors for {source:?}");
        (module, diagnostics)
    }

    #[test]
    fn empty_file_is_an_error() {
        let (module, diagnostics) = parse_err("");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "file is empty");
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert!(module.def.path.is_empty());
        assert!(module.definitions.is_empty());
    }

    #[test]
    fn minimal_module() {
        let module = parse_ok("module m;");
        assert_eq!(module.def.name(), "m");
        assert!(module.imports.is_empty());
        assert!(module.foreign_imports.is_empty());
        assert!(module.definitions.is_empty());
        assert_eq!(module.file_path, "test.rl");
    }

    #[test]
    fn dotted_module_name() {
        let module = parse_ok("module collections.map;");
        assert_eq!(module.def.name(), "collections.map");
        assert_eq!(module.def.path.len(), 2);
    }

    #[test]
    fn missing_module_header_is_an_error() {
        let (_, diagnostics) = parse_err("var x = 1;");
        assert_eq!(diagnostics[0].message, "expected module definition");
    }

    #[test]
    fn import_without_alias_defaults_to_imported_name() {
        let module = parse_ok("module m; import collections.map;");
        assert_eq!(module.imports.len(), 1);
        assert_eq!(module.imports[0].imported.name(), "collections.map");
        assert_eq!(module.imports[0].alias.name(), "collections.map");
    }

    #[test]
    fn import_with_alias() {
        let module = parse_ok("module m; import collections.map as cm;");
        assert_eq!(module.imports[0].imported.name(), "collections.map");
        assert_eq!(module.imports[0].alias.name(), "cm");
    }

    #[test]
    fn foreign_import() {
        let module = parse_ok("module m; import extern \"vendor/io.h\";");
        assert_eq!(module.foreign_imports.len(), 1);
        assert_eq!(
            module.foreign_imports[0].path.string_value().unwrap(),
            "vendor/io.h"
        );
    }

    #[test]
    fn foreign_import_with_non_string_payload() {
        let (module, diagnostics) = parse_err("module m; import extern other; var x = 1;");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].message, "expected string");
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(
            diagnostics[1].message,
            "to import a Rill module, remove 'extern'"
        );
        assert_eq!(diagnostics[1].severity, Severity::Note);
        // Recovery skipped to the `;` and kept parsing.
        assert_eq!(module.definitions.len(), 1);
    }

    #[test]
    fn mixed_imports_in_order() {
        let module = parse_ok("module m; import a; import extern \"b.h\"; import c as d;");
        assert_eq!(module.imports.len(), 2);
        assert_eq!(module.foreign_imports.len(), 1);
    }

    #[test]
    fn export_marks_the_definition() {
        let module = parse_ok("module m; export var x = 1; var y = 2;");
        assert!(module.definitions[0].exported);
        assert!(!module.definitions[1].exported);
    }

    #[test]
    fn recovery_continues_after_a_bad_definition() {
        let (module, diagnostics) = parse_err("module m; var x = ; var y = 1;");
        assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
        assert_eq!(diagnostics[0].message, "expected expression");
        // The second definition still parsed.
        assert_eq!(module.definitions.len(), 1);
        assert_eq!(
            module.definitions[0].def.ident().string_value().unwrap(),
            "y"
        );
    }

    #[test]
    fn recovery_reports_several_errors_in_one_pass() {
        let (module, diagnostics) =
            parse_err("module m; var a = ; var b = ; var c = 3;");
        assert_eq!(
            diagnostics
                .iter()
                .filter(|d| d.message == "expected expression")
                .count(),
            2
        );
        assert_eq!(module.definitions.len(), 1);
        assert_eq!(
            module.definitions[0].def.ident().string_value().unwrap(),
            "c"
        );
    }

    #[test]
    fn garbage_between_definitions_is_skipped() {
        let (module, diagnostics) = parse_err("module m; 42 var x = 1;");
        assert!(!diagnostics.is_empty());
        assert_eq!(module.definitions.len(), 1);
    }

    #[test]
    fn parser_consumes_every_token_of_valid_input() {
        let source = "module m; import a; export func f(x) : int { return x; }";
        let (tokens, _) = lex("test.rl", source);
        let mut parser = Parser::new("test.rl", &tokens);
        let _ = parser.parse_module();
        assert!(!parser.is_good(), "cursor should rest at the Null sentinel");
        assert_eq!(parser.peek().kind(), TokenKind::Null);
    }

    #[test]
    fn diagnostics_arrive_in_source_order() {
        let (_, diagnostics) = parse_err("module m; var a = ; var b = ;");
        let mut last = 0;
        for diagnostic in &diagnostics {
            assert!(diagnostic.span.pos() >= last);
            last = diagnostic.span.pos();
        }
    }

    #[test]
    fn string_escapes_flow_into_the_ast() {
        let module = parse_ok("module m; export const s : char[] = \"a\\nb\\\"c\";");
        let Definition::Var(var) = &module.definitions[0].def else {
            panic!("expected var");
        };
        let Some(Expression::Literal(token)) = &var.value else {
            panic!("expected literal initializer");
        };
        // Decoded value is the five characters a, newline, b, quote, c.
        assert_eq!(token.string_value().unwrap(), "a\nb\"c");
    }

    #[test]
    fn var_definition_as_statement() {
        let module = parse_ok("module m; func f() { var local = 1; }");
        let Definition::Function(func) = &module.definitions[0].def else {
            panic!("expected function");
        };
        assert!(matches!(
            func.func.body.statements[0],
            Statement::Definition(Definition::Var(_))
        ));
    }

    #[test]
    fn statement_recovery_leaves_a_placeholder() {
        let (module, diagnostics) = parse_err("module m; func f() { var x = ; x = 1; }");
        assert!(!diagnostics.is_empty());
        let Definition::Function(func) = &module.definitions[0].def else {
            panic!("expected function");
        };
        // The failed statement became the empty placeholder and the next
        // statement still parsed.
        assert!(func
            .func
            .body
            .statements
            .iter()
            .any(|s| matches!(s, Statement::Expression(None))));
        assert!(func
            .func
            .body
            .statements
            .iter()
            .any(|s| matches!(
                s,
                Statement::Expression(Some(Expression::Assignment { .. }))
            )));
    }
}
