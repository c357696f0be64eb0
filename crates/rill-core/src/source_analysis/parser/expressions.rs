// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing for Rill.
//!
//! The grammar is a classic precedence ladder, each level left-associative
//! except assignment:
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | assignment | `=` | Right |
//! | or | `or` | Left |
//! | and | `and` | Left |
//! | equality | `==` `!=` | Left |
//! | comparison | `>` `>=` `<` `<=` | Left |
//! | term | `+` `-` | Left |
//! | factor | `*` `/` `%` | Left |
//! | unary | `!` `-` (prefix) | — |
//! | call | `callee(args)` | — |
//! | primary | literals, variables, `copy`, `{...}`, `(...)` | — |
//!
//! A `(` at primary level is ambiguous between a grouping and an anonymous
//! function; [`Parser::is_function`] resolves it with a bounded scan-ahead.

use crate::ast::{Expression, Function, Identifier, Parameter, Type};
use crate::source_analysis::TokenKind;

use super::{ParseFault, ParseResult, Parser};

impl Parser<'_> {
    /// Parses one expression.
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_assignment()
    }

    /// Assignment is right-associative: `a = b = c` assigns `c` to `b`
    /// first.
    ///
    /// The target must have reduced to a variable access; anything else
    /// records an error and yields the already-parsed left-hand expression
    /// unchanged.
    fn parse_assignment(&mut self) -> ParseResult<Expression> {
        let expr = self.parse_or()?;

        if self.check(TokenKind::Eq) {
            let value = self.parse_assignment()?;
            return match expr {
                Expression::VarAccess { var, .. } | Expression::ArrayIndex { var, .. } => {
                    Ok(Expression::Assignment {
                        var,
                        value: Box::new(value),
                    })
                }
                other => {
                    let span = self.previous().span().clone();
                    self.error("invalid assignment, can only assign to variables.", span);
                    Ok(other)
                }
            };
        }

        Ok(expr)
    }

    fn parse_or(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_and()?;

        while self.check(TokenKind::Or) {
            let operator = self.previous().clone();
            let right = self.parse_and()?;
            expr = Expression::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn parse_and(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_equality()?;

        while self.check(TokenKind::And) {
            let operator = self.previous().clone();
            let right = self.parse_equality()?;
            expr = Expression::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn parse_equality(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_comparison()?;

        while self.check(TokenKind::NotEq) || self.check(TokenKind::EqEq) {
            let operator = self.previous().clone();
            let right = self.parse_comparison()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_term()?;

        while self.check(TokenKind::Greater)
            || self.check(TokenKind::GreaterEq)
            || self.check(TokenKind::Less)
            || self.check(TokenKind::LessEq)
        {
            let operator = self.previous().clone();
            let right = self.parse_term()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_factor()?;

        while self.check(TokenKind::Minus) || self.check(TokenKind::Plus) {
            let operator = self.previous().clone();
            let right = self.parse_factor()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_unary()?;

        while self.check(TokenKind::Slash)
            || self.check(TokenKind::Star)
            || self.check(TokenKind::Percent)
        {
            let operator = self.previous().clone();
            let right = self.parse_unary()?;
            expr = Expression::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        if self.check(TokenKind::Not) || self.check(TokenKind::Minus) {
            let operator = self.previous().clone();
            let right = self.parse_unary()?;
            return Ok(Expression::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.parse_call()
    }

    fn parse_call(&mut self) -> ParseResult<Expression> {
        let callee = self.parse_primary()?;

        if self.check(TokenKind::LParen) {
            let mut args = Vec::new();
            if !self.check(TokenKind::RParen) {
                loop {
                    args.push(self.parse_expression()?);
                    if !self.check(TokenKind::Comma) {
                        break;
                    }
                }
                self.ensure(TokenKind::RParen, "expected closing parenthesis ')'")?;
            }
            return Ok(Expression::Call {
                callee: Box::new(callee),
                args,
            });
        }

        Ok(callee)
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        if self.check(TokenKind::True)
            || self.check(TokenKind::False)
            || self.check(TokenKind::Integer)
            || self.check(TokenKind::Real)
            || self.check(TokenKind::String)
        {
            return Ok(Expression::Literal(self.previous().clone()));
        }

        if self.check(TokenKind::Ident) {
            self.backtrack();
            let var = self.parse_identifier()?;
            return self.finish_var_access(var, false);
        }

        if self.check(TokenKind::Copy) {
            let copy_tok = self.previous().clone();
            let var = match self.parse_identifier() {
                Ok(var) => var,
                Err(fault) => {
                    self.note("can only copy variables", copy_tok.span().clone());
                    self.note("consider removing 'copy'", copy_tok.span().clone());
                    return Err(fault);
                }
            };
            return self.finish_var_access(var, true);
        }

        if self.check(TokenKind::LBrace) {
            let mut data = Vec::new();
            if !self.check(TokenKind::RBrace) {
                loop {
                    data.push(self.parse_expression()?);
                    if !self.check(TokenKind::Comma) {
                        break;
                    }
                }
                self.ensure(TokenKind::RBrace, "expected closing brace '}'")?;
            }
            return Ok(Expression::InitializerList(data));
        }

        if self.check(TokenKind::LParen) {
            if self.is_function() {
                return Ok(Expression::Function(Box::new(self.parse_function()?)));
            }
            let expr = self.parse_expression()?;
            self.ensure(TokenKind::RParen, "expected closing parenthesis ')'")?;
            return Ok(Expression::Group(Box::new(expr)));
        }

        let span = self.previous().span().clone();
        self.error("expected expression", span);
        Err(ParseFault)
    }

    /// Completes a variable access, taking an optional `[index]` suffix.
    fn finish_var_access(&mut self, var: Identifier, is_copy: bool) -> ParseResult<Expression> {
        if self.check(TokenKind::LBracket) {
            let index = self.parse_expression()?;
            self.ensure(TokenKind::RBracket, "expected closing bracket ']'")?;
            return Ok(Expression::ArrayIndex {
                var,
                is_copy,
                index: Box::new(index),
            });
        }

        Ok(Expression::VarAccess { var, is_copy })
    }

    /// Decides whether a just-consumed `(` begins an anonymous function.
    ///
    /// Scans past a possibly-empty identifier list and the matching `)`; a
    /// following `:` (typed return) or `{` (body) means a function. On a
    /// hit the cursor is repositioned at the `(` so that
    /// [`Parser::parse_function`] sees the full parameter list; otherwise
    /// the cursor is restored unchanged.
    fn is_function(&mut self) -> bool {
        let start = self.cursor();

        if !matches!(self.peek().kind(), TokenKind::Ident | TokenKind::RParen) {
            return false;
        }
        while self.is_good() && !self.check(TokenKind::RParen) {
            self.advance();
        }

        if matches!(self.peek().kind(), TokenKind::Colon | TokenKind::LBrace) {
            // Reposition at the '(' itself so parse_function re-consumes it.
            self.rewind_to(start.saturating_sub(1));
            true
        } else {
            self.rewind_to(start);
            false
        }
    }

    /// Parses an anonymous function; the cursor sits at the opening `(`.
    ///
    /// A `...` closing the parameter list marks the function variadic. A
    /// `:` introduces the return type, optionally marked `const`.
    pub(super) fn parse_function(&mut self) -> ParseResult<Function> {
        self.ensure(TokenKind::LParen, "expected opening parenthesis '('")?;

        let mut params = Vec::new();
        let mut is_variadic = false;
        if !self.check(TokenKind::RParen) {
            loop {
                if self.check(TokenKind::Period) {
                    if self.check(TokenKind::Period) && self.check(TokenKind::Period) {
                        is_variadic = true;
                        break;
                    }
                    let span = self.previous().span().clone();
                    self.error("expected variadic '...'", span);
                    return Err(ParseFault);
                }

                params.push(self.parse_param()?);
                if !self.check(TokenKind::Comma) {
                    break;
                }
            }
            self.ensure(TokenKind::RParen, "expected closing parenthesis ')'")?;
        }

        let mut return_type = None;
        let mut is_return_const = false;
        if self.check(TokenKind::Colon) {
            is_return_const = self.check(TokenKind::Const);
            let anchor = self.previous().clone();
            match self.parse_type() {
                Ok(ty) => return_type = Some(ty),
                Err(fault) => {
                    self.note(
                        "consider removing if function does not return any value",
                        anchor.span().clone(),
                    );
                    return Err(fault);
                }
            }
        }

        let body = self.parse_block()?;
        Ok(Function {
            params,
            return_type,
            is_return_const,
            is_variadic,
            body,
        })
    }

    /// Parses one parameter: `name [: [const] [Type]]`.
    ///
    /// Both the annotation and the type itself may be omitted; the
    /// parameter then takes the inferred generic type.
    pub(super) fn parse_param(&mut self) -> ParseResult<Parameter> {
        let ident = self.ensure(TokenKind::Ident, "expected parameter name identifier")?;

        let mut is_const = false;
        let data_type = if self.check(TokenKind::Colon) {
            is_const = self.check(TokenKind::Const);
            if matches!(self.peek().kind(), TokenKind::Comma | TokenKind::RParen) {
                Type::generic(ident.clone())
            } else {
                self.parse_type()?
            }
        } else {
            Type::generic(ident.clone())
        };

        Ok(Parameter {
            ident,
            is_const,
            data_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_err, parse_ok};
    use crate::ast::{Definition, Expression, SimpleType, TypeKind};
    use crate::source_analysis::{Severity, TokenKind};

    /// Extracts the initializer of the first (var) definition in `source`.
    fn value_of(source: &str) -> Expression {
        let module = parse_ok(source);
        match &module.definitions[0].def {
            Definition::Var(var) => var.value.clone().expect("initializer"),
            other => panic!("expected var, got {other:?}"),
        }
    }

    fn int_literal(expr: &Expression, expected: i64) -> bool {
        matches!(expr, Expression::Literal(tok) if tok.int_value() == Some(expected))
    }

    #[test]
    fn literals() {
        assert!(int_literal(&value_of("module m; var x = 42;"), 42));
        assert!(matches!(
            value_of("module m; var x = true;"),
            Expression::Literal(tok) if tok.kind() == TokenKind::True
        ));
        assert!(matches!(
            value_of("module m; var x = \"hi\";"),
            Expression::Literal(tok) if tok.string_value().unwrap() == "hi"
        ));
        assert!(matches!(
            value_of("module m; var x = 2.5;"),
            Expression::Literal(tok) if tok.real_value() == Some(2.5)
        ));
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        // 1 + 2 * 3 - 4 == 5  parses as  (((1 + (2 * 3)) - 4) == 5)
        let expr = value_of("module m; var x = 1 + 2 * 3 - 4 == 5;");

        let Expression::Binary {
            left: eq_left,
            operator: eq_op,
            right: eq_right,
        } = expr
        else {
            panic!("expected == at the root");
        };
        assert_eq!(eq_op.kind(), TokenKind::EqEq);
        assert!(int_literal(&eq_right, 5));

        let Expression::Binary {
            left: minus_left,
            operator: minus_op,
            right: minus_right,
        } = *eq_left
        else {
            panic!("expected - below ==");
        };
        assert_eq!(minus_op.kind(), TokenKind::Minus);
        assert!(int_literal(&minus_right, 4));

        let Expression::Binary {
            left: plus_left,
            operator: plus_op,
            right: plus_right,
        } = *minus_left
        else {
            panic!("expected + below -");
        };
        assert_eq!(plus_op.kind(), TokenKind::Plus);
        assert!(int_literal(&plus_left, 1));

        let Expression::Binary {
            left: star_left,
            operator: star_op,
            right: star_right,
        } = *plus_right
        else {
            panic!("expected * below +");
        };
        assert_eq!(star_op.kind(), TokenKind::Star);
        assert!(int_literal(&star_left, 2));
        assert!(int_literal(&star_right, 3));
    }

    #[test]
    fn subtraction_is_left_associative() {
        // a - b - c  parses as  (a - b) - c
        let expr = value_of("module m; var x = a - b - c;");
        let Expression::Binary { left, right, .. } = expr else {
            panic!("expected binary");
        };
        assert!(matches!(*left, Expression::Binary { .. }));
        assert!(matches!(
            *right,
            Expression::VarAccess { ref var, .. } if var.name() == "c"
        ));
    }

    #[test]
    fn assignment_is_right_associative() {
        // a = b = c  parses as  a = (b = c)
        let expr = value_of("module m; var x = (a = b = c);");
        let Expression::Group(inner) = expr else {
            panic!("expected group");
        };
        let Expression::Assignment { var, value } = *inner else {
            panic!("expected assignment");
        };
        assert_eq!(var.name(), "a");
        let Expression::Assignment { var, value } = *value else {
            panic!("expected nested assignment");
        };
        assert_eq!(var.name(), "b");
        assert!(matches!(
            *value,
            Expression::VarAccess { ref var, .. } if var.name() == "c"
        ));
    }

    #[test]
    fn logical_operators_nest_or_above_and() {
        // a or b and c  parses as  a or (b and c)
        let expr = value_of("module m; var x = a or b and c;");
        let Expression::Logical {
            operator, right, ..
        } = expr
        else {
            panic!("expected logical");
        };
        assert_eq!(operator.kind(), TokenKind::Or);
        assert!(matches!(
            *right,
            Expression::Logical { ref operator, .. } if operator.kind() == TokenKind::And
        ));
    }

    #[test]
    fn unary_operators_stack() {
        let expr = value_of("module m; var x = !-a;");
        let Expression::Unary { operator, right } = expr else {
            panic!("expected unary");
        };
        assert_eq!(operator.kind(), TokenKind::Not);
        assert!(matches!(
            *right,
            Expression::Unary { ref operator, .. } if operator.kind() == TokenKind::Minus
        ));
    }

    #[test]
    fn call_with_arguments() {
        let expr = value_of("module m; var x = f(1, g(2), 3);");
        let Expression::Call { callee, args } = expr else {
            panic!("expected call");
        };
        assert!(matches!(
            *callee,
            Expression::VarAccess { ref var, .. } if var.name() == "f"
        ));
        assert_eq!(args.len(), 3);
        assert!(matches!(args[1], Expression::Call { .. }));
    }

    #[test]
    fn dotted_variable_access() {
        let expr = value_of("module m; var x = geometry.shapes.area;");
        assert!(matches!(
            expr,
            Expression::VarAccess { ref var, is_copy: false } if var.name() == "geometry.shapes.area"
        ));
    }

    #[test]
    fn copy_access_sets_the_flag() {
        let expr = value_of("module m; var x = copy buffer;");
        assert!(matches!(expr, Expression::VarAccess { is_copy: true, .. }));
    }

    #[test]
    fn copy_of_a_non_variable_notes_the_fix() {
        let (_, diagnostics) = parse_err("module m; var x = copy 42;");
        assert!(diagnostics
            .iter()
            .any(|d| d.severity == Severity::Note && d.message == "consider removing 'copy'"));
    }

    #[test]
    fn array_index() {
        let expr = value_of("module m; var x = xs[i + 1];");
        let Expression::ArrayIndex { var, is_copy, index } = expr else {
            panic!("expected array index");
        };
        assert_eq!(var.name(), "xs");
        assert!(!is_copy);
        assert!(matches!(*index, Expression::Binary { .. }));
    }

    #[test]
    fn copy_array_index() {
        let expr = value_of("module m; var x = copy xs[0];");
        assert!(matches!(expr, Expression::ArrayIndex { is_copy: true, .. }));
    }

    #[test]
    fn initializer_list() {
        let expr = value_of("module m; var x = { 1, 2, 3 };");
        let Expression::InitializerList(data) = expr else {
            panic!("expected initializer list");
        };
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn empty_initializer_list() {
        let expr = value_of("module m; var x = {};");
        assert!(matches!(expr, Expression::InitializerList(ref data) if data.is_empty()));
    }

    #[test]
    fn group_wraps_the_inner_expression() {
        let expr = value_of("module m; var x = (1 + 2) * 3;");
        let Expression::Binary { left, .. } = expr else {
            panic!("expected binary");
        };
        assert!(matches!(*left, Expression::Group(_)));
    }

    #[test]
    fn anonymous_function_with_body_brace() {
        let expr = value_of("module m; var f = (a, b) { return a; };");
        let Expression::Function(func) = expr else {
            panic!("expected function, got something else");
        };
        assert_eq!(func.params.len(), 2);
        assert!(func.return_type.is_none());
        assert!(!func.is_variadic);
    }

    #[test]
    fn anonymous_function_with_typed_return() {
        let expr = value_of("module m; var f = (a : int) : int { return a; };");
        let Expression::Function(func) = expr else {
            panic!("expected function");
        };
        assert!(matches!(
            func.return_type.as_ref().unwrap().kind,
            TypeKind::Simple(SimpleType::Int)
        ));
    }

    #[test]
    fn empty_parameter_list_function() {
        let expr = value_of("module m; var f = () { };");
        let Expression::Function(func) = expr else {
            panic!("expected function");
        };
        assert!(func.params.is_empty());
    }

    #[test]
    fn variadic_function() {
        let expr = value_of("module m; var f = (fmt, ...) { };");
        let Expression::Function(func) = expr else {
            panic!("expected function");
        };
        assert!(func.is_variadic);
        assert_eq!(func.params.len(), 1);
    }

    #[test]
    fn incomplete_variadic_dots_are_an_error() {
        let (_, diagnostics) = parse_err("module m; var f = (a, ..) { };");
        assert!(diagnostics
            .iter()
            .any(|d| d.message == "expected variadic '...'"));
    }

    #[test]
    fn unannotated_parameter_gets_the_generic_type() {
        let expr = value_of("module m; var f = (a) { };");
        let Expression::Function(func) = expr else {
            panic!("expected function");
        };
        assert!(matches!(
            func.params[0].data_type.kind,
            TypeKind::Simple(SimpleType::Generic)
        ));
    }

    #[test]
    fn const_parameter_without_type_stays_generic() {
        let expr = value_of("module m; var f = (a : const, b) { };");
        let Expression::Function(func) = expr else {
            panic!("expected function");
        };
        assert!(func.params[0].is_const);
        assert!(matches!(
            func.params[0].data_type.kind,
            TypeKind::Simple(SimpleType::Generic)
        ));
    }

    #[test]
    fn parenthesized_expression_is_not_a_function() {
        let expr = value_of("module m; var x = (a);");
        assert!(matches!(expr, Expression::Group(_)));
    }

    #[test]
    fn assignment_to_a_literal_is_an_error_but_keeps_the_value() {
        let (module, diagnostics) = parse_err("module m; var x = (1 = 2);");
        assert!(diagnostics
            .iter()
            .any(|d| d.message == "invalid assignment, can only assign to variables."));
        // The left-hand expression survives as the result.
        assert_eq!(module.definitions.len(), 1);
    }

    #[test]
    fn assignment_through_an_index_targets_the_variable() {
        let expr = value_of("module m; var x = (xs[0] = 1);");
        let Expression::Group(inner) = expr else {
            panic!("expected group");
        };
        assert!(matches!(
            *inner,
            Expression::Assignment { ref var, .. } if var.name() == "xs"
        ));
    }
}
