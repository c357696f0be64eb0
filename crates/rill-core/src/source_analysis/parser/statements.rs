// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing for Rill.
//!
//! Statements are where error recovery lives: [`Parser::parse_statement`]
//! catches any fault from the construct it dispatched to, skips to the
//! next `;`, and yields an empty expression-statement placeholder so the
//! enclosing block keeps its shape.

use crate::ast::{
    Block, CatchClause, ConditionFor, ElseIf, Expression, ForInit, If, RangeFor, Statement, Try,
    While,
};
use crate::source_analysis::TokenKind;

use super::{ParseFault, ParseResult, Parser};

impl Parser<'_> {
    /// Parses a braced block of statements; faults if the `{` is missing.
    pub(super) fn parse_block(&mut self) -> ParseResult<Block> {
        self.ensure(TokenKind::LBrace, "expected block")?;

        let mut block = Block::default();
        while !self.check(TokenKind::RBrace) && self.is_good() {
            block.statements.push(self.parse_statement());
        }

        Ok(block)
    }

    /// Parses one statement, recovering from faults at the next `;`.
    pub(super) fn parse_statement(&mut self) -> Statement {
        match self.try_parse_statement() {
            Ok(statement) => statement,
            Err(ParseFault) => {
                while self.is_good() && !self.check(TokenKind::Semicolon) {
                    self.advance();
                }
                Statement::Expression(None)
            }
        }
    }

    /// Statement dispatch on the current token.
    fn try_parse_statement(&mut self) -> ParseResult<Statement> {
        if self.peek().kind().starts_definition() {
            return Ok(Statement::Definition(self.parse_definition()?));
        }

        match self.peek().kind() {
            TokenKind::While => {
                self.advance();
                self.parse_while()
            }
            TokenKind::For => {
                self.advance();
                self.parse_for()
            }
            TokenKind::If => {
                self.advance();
                self.parse_if()
            }
            TokenKind::Try => {
                self.advance();
                self.parse_try()
            }
            TokenKind::Return => {
                self.advance();
                let value = self.parse_optional_value()?;
                Ok(Statement::Return(value))
            }
            TokenKind::Throw => {
                self.advance();
                let value = self.parse_optional_value()?;
                Ok(Statement::Throw(value))
            }
            TokenKind::Break => {
                self.advance();
                self.ensure(TokenKind::Semicolon, "expected semicolon ';'")?;
                Ok(Statement::Break)
            }
            TokenKind::Continue => {
                self.advance();
                self.ensure(TokenKind::Semicolon, "expected semicolon ';'")?;
                Ok(Statement::Continue)
            }
            TokenKind::LBrace => Ok(Statement::Block(self.parse_block()?)),
            _ => {
                let expr = self.parse_expression()?;
                self.ensure(TokenKind::Semicolon, "expected semicolon ';'")?;
                Ok(Statement::Expression(Some(expr)))
            }
        }
    }

    /// Parses the `expr? ;` tail shared by `return` and `throw`.
    fn parse_optional_value(&mut self) -> ParseResult<Option<Expression>> {
        if self.check(TokenKind::Semicolon) {
            return Ok(None);
        }
        let value = self.parse_expression()?;
        self.ensure(TokenKind::Semicolon, "expected semicolon ';'")?;
        Ok(Some(value))
    }

    fn parse_while(&mut self) -> ParseResult<Statement> {
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Statement::While(While { condition, body }))
    }

    /// Parses a `for` loop; the keyword is already consumed.
    ///
    /// A speculative scan decides the form: the first `in` before the body
    /// `{` makes it a range loop, otherwise it is the condition form. The
    /// cursor is restored before the chosen form is parsed for real.
    fn parse_for(&mut self) -> ParseResult<Statement> {
        let start = self.cursor();
        let mut is_range = false;
        while self.is_good() {
            if self.check(TokenKind::LBrace) {
                break;
            }
            if self.advance().kind() == TokenKind::In {
                is_range = true;
                break;
            }
        }
        self.rewind_to(start);

        if is_range {
            self.parse_range_for()
        } else {
            self.parse_condition_for()
        }
    }

    fn parse_range_for(&mut self) -> ParseResult<Statement> {
        let ident = self.ensure(TokenKind::Ident, "expected range-based for identifier")?;
        self.ensure(TokenKind::In, "expected keyword in")?;
        let range = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Statement::RangeFor(RangeFor { ident, range, body }))
    }

    /// Parses the condition form. All three clauses are optional; the body
    /// `{` terminates the increment clause.
    fn parse_condition_for(&mut self) -> ParseResult<Statement> {
        let init = if self.check(TokenKind::Semicolon) {
            None
        } else if self.peek().kind().starts_definition() {
            Some(ForInit::Definition(Box::new(self.parse_definition()?)))
        } else {
            let expr = self.parse_expression()?;
            self.ensure(TokenKind::Semicolon, "expected semicolon ';'")?;
            Some(ForInit::Expression(expr))
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            let expr = self.parse_expression()?;
            self.ensure(TokenKind::Semicolon, "expected semicolon ';'")?;
            Some(expr)
        };

        let increment = if self.peek().kind() == TokenKind::LBrace {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let body = self.parse_block()?;
        Ok(Statement::ConditionFor(ConditionFor {
            init,
            condition,
            increment,
            body,
        }))
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        let condition = self.parse_expression()?;
        let true_branch = self.parse_block()?;

        let mut else_ifs = Vec::new();
        let mut else_branch = None;
        while self.check(TokenKind::Else) {
            if self.check(TokenKind::If) {
                let condition = self.parse_expression()?;
                let block = self.parse_block()?;
                else_ifs.push(ElseIf { condition, block });
            } else {
                else_branch = Some(self.parse_block()?);
                break;
            }
        }

        Ok(Statement::If(If {
            condition,
            true_branch,
            else_ifs,
            else_branch,
        }))
    }

    /// Parses a `try` statement. Zero catch clauses is an error, but the
    /// statement is still produced.
    fn parse_try(&mut self) -> ParseResult<Statement> {
        let body = self.parse_block()?;

        let mut catches = Vec::new();
        while self.check(TokenKind::Catch) {
            let param = self.parse_param()?;
            let body = self.parse_block()?;
            catches.push(CatchClause { param, body });
        }

        if catches.is_empty() {
            let span = self.previous().span().clone();
            self.error("expected catch block", span);
        }

        Ok(Statement::Try(Try { body, catches }))
    }
}
