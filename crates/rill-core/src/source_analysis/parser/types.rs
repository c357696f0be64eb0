// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type expression parsing for Rill.
//!
//! Type grammar: the primaries are the built-in simples (`int`, `real`,
//! `char`, `bool`), function types, `typeof` expressions, tuples,
//! parenthesized types, and class paths. Any type may then take `[size?]`
//! suffixes, each wrapping the type parsed so far in an array.

use crate::ast::{SimpleType, Type, TypeKind};
use crate::source_analysis::TokenKind;

use super::{ParseFault, ParseResult, Parser};

impl Parser<'_> {
    /// Parses a type expression.
    pub(super) fn parse_type(&mut self) -> ParseResult<Type> {
        let token = self.advance().clone();

        let mut ty = match token.kind() {
            TokenKind::IntType => Type::new(token, TypeKind::Simple(SimpleType::Int)),
            TokenKind::RealType => Type::new(token, TypeKind::Simple(SimpleType::Real)),
            TokenKind::CharType => Type::new(token, TypeKind::Simple(SimpleType::Char)),
            TokenKind::BoolType => Type::new(token, TypeKind::Simple(SimpleType::Bool)),
            TokenKind::Func => {
                let kind = self.parse_func_type()?;
                Type::new(token, kind)
            }
            TokenKind::TypeOf => {
                let expr = self.parse_expression()?;
                Type::new(token, TypeKind::TypeOf(Box::new(expr)))
            }
            TokenKind::Tuple => {
                let kind = self.parse_tuple_type()?;
                Type::new(token, kind)
            }
            TokenKind::LParen => {
                let inner = self.parse_type()?;
                self.ensure(TokenKind::RParen, "expected closing parenthesis ')'")?;
                // Re-anchor at the paren for diagnostics.
                Type::new(token, inner.kind)
            }
            TokenKind::Ident => {
                self.backtrack();
                let ident = self.parse_identifier()?;
                Type::new(token, TypeKind::Class(ident))
            }
            _ => {
                self.error("expected type", token.span().clone());
                return Err(ParseFault);
            }
        };

        while self.check(TokenKind::LBracket) {
            let bracket = self.previous().clone();
            let size = if self.check(TokenKind::RBracket) {
                None
            } else {
                let size = self.parse_expression()?;
                self.ensure(TokenKind::RBracket, "expected closing bracket ']'")?;
                Some(Box::new(size))
            };
            ty = Type::new(
                bracket,
                TypeKind::Array {
                    hold_type: Box::new(ty),
                    size,
                },
            );
        }

        Ok(ty)
    }

    /// Parses a function type; the `func` keyword is already consumed.
    fn parse_func_type(&mut self) -> ParseResult<TypeKind> {
        self.ensure(TokenKind::LParen, "expected opening parenthesis '('")?;

        let mut param_types = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                param_types.push(self.parse_type()?);
                if !self.check(TokenKind::Comma) {
                    break;
                }
            }
            self.ensure(TokenKind::RParen, "expected closing parenthesis ')'")?;
        }

        let return_type = if self.check(TokenKind::Colon) {
            Some(Box::new(self.parse_type()?))
        } else {
            None
        };

        Ok(TypeKind::Func {
            return_type,
            param_types,
        })
    }

    /// Parses a tuple type; the `tuple` keyword is already consumed.
    fn parse_tuple_type(&mut self) -> ParseResult<TypeKind> {
        self.ensure(TokenKind::Less, "expected opening angle bracket '<'")?;

        let mut types = Vec::new();
        loop {
            types.push(self.parse_type()?);
            if !self.check(TokenKind::Comma) {
                break;
            }
        }

        self.ensure(TokenKind::Greater, "expected closing angle bracket '>'")?;
        Ok(TypeKind::Tuple(types))
    }
}
