// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Definition parsing for Rill.
//!
//! This module handles every definition form: variables, functions, enums,
//! and classes with their member clauses (methods with `static`/`const`
//! modifiers, abstract methods, constructors, getters, setters, and
//! operator overloads sorted into visibility buckets).

use crate::ast::{
    AbstractMethod, ClassDefinition, ClassMember, Constructor, Definition, EnumDefinition,
    FunctionDefinition, Getter, Method, OperatorOverload, Setter, VarDefinition, VarKind,
};
use crate::source_analysis::{Token, TokenKind};

use super::{ParseFault, ParseResult, Parser};

/// The bucket new class members are placed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Public,
    Protected,
    Private,
}

impl Parser<'_> {
    /// Parses one definition, dispatching on its introducing token.
    pub(super) fn parse_definition(&mut self) -> ParseResult<Definition> {
        let token = self.advance().clone();
        match token.kind() {
            TokenKind::Func => Ok(Definition::Function(self.parse_function_definition()?)),
            TokenKind::Class => Ok(Definition::Class(self.parse_class_definition()?)),
            TokenKind::Enum => Ok(Definition::Enum(self.parse_enum_definition()?)),
            TokenKind::Var | TokenKind::Const | TokenKind::Static => {
                Ok(Definition::Var(self.parse_var_definition(&token)?))
            }
            _ => {
                self.error(
                    "expected definition (var, func, enum, or class)",
                    token.span().clone(),
                );
                Err(ParseFault)
            }
        }
    }

    /// Parses a named function definition; the `func` keyword is already
    /// consumed.
    pub(super) fn parse_function_definition(&mut self) -> ParseResult<FunctionDefinition> {
        let ident = self.ensure(TokenKind::Ident, "expected function name identifier")?;
        let func = self.parse_function()?;
        Ok(FunctionDefinition { ident, func })
    }

    /// Parses a variable definition; `keyword` is the consumed
    /// `var`/`const`/`static` token.
    ///
    /// A definition with neither type nor initializer records an error but
    /// is still produced.
    pub(super) fn parse_var_definition(&mut self, keyword: &Token) -> ParseResult<VarDefinition> {
        let var_kind = match keyword.kind() {
            TokenKind::Const => VarKind::Const,
            TokenKind::Static => VarKind::Static,
            _ => VarKind::Var,
        };
        let ident = self.ensure(TokenKind::Ident, "expected variable name identifier")?;

        let mut data_type = None;
        if self.check(TokenKind::Colon) {
            data_type = Some(self.parse_type()?);
        }

        let mut value = None;
        if self.check(TokenKind::Eq) {
            value = Some(self.parse_expression()?);
        } else if data_type.is_none() {
            let span = self.previous().span().clone();
            self.error("type can only be omitted if variable is initialized", span);
        }

        self.ensure(TokenKind::Semicolon, "expected semicolon ';'")?;
        Ok(VarDefinition {
            var_kind,
            ident,
            data_type,
            value,
        })
    }

    /// Parses an enum definition; the `enum` keyword is already consumed.
    pub(super) fn parse_enum_definition(&mut self) -> ParseResult<EnumDefinition> {
        let ident = self.ensure(TokenKind::Ident, "expected enum name identifier")?;
        self.ensure(TokenKind::LBrace, "expected block")?;

        let mut elements = Vec::new();
        if !self.check(TokenKind::RBrace) {
            loop {
                elements.push(self.ensure(TokenKind::Ident, "expected identifier")?);
                if !self.check(TokenKind::Comma) {
                    break;
                }
            }
            self.ensure(TokenKind::RBrace, "expected closing brace '}'")?;
        }

        self.ensure(TokenKind::Semicolon, "expected semicolon ';'")?;
        Ok(EnumDefinition { ident, elements })
    }

    // ========================================================================
    // Class Definition Parsing
    // ========================================================================

    /// Parses a class definition; the `class` keyword is already consumed.
    ///
    /// Members before any visibility label land in the `public` bucket; a
    /// `public:` / `protected:` / `private:` label re-aims the destination
    /// until the next label.
    pub(super) fn parse_class_definition(&mut self) -> ParseResult<ClassDefinition> {
        let ident = self.ensure(TokenKind::Ident, "expected class name identifier")?;
        let mut def = ClassDefinition {
            ident,
            bases: Vec::new(),
            public: Vec::new(),
            protected: Vec::new(),
            private: Vec::new(),
        };

        if self.check(TokenKind::Colon) {
            loop {
                def.bases.push(self.parse_identifier()?);
                if !self.check(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.ensure(TokenKind::LBrace, "expected definition block")?;

        let mut visibility = Visibility::Public;
        while !self.check(TokenKind::RBrace) {
            if self.check(TokenKind::Public) {
                self.ensure(TokenKind::Colon, "expected colon ':'")?;
                visibility = Visibility::Public;
            } else if self.check(TokenKind::Protected) {
                self.ensure(TokenKind::Colon, "expected colon ':'")?;
                visibility = Visibility::Protected;
            } else if self.check(TokenKind::Private) {
                self.ensure(TokenKind::Colon, "expected colon ':'")?;
                visibility = Visibility::Private;
            }

            let member = self.parse_class_member()?;
            match visibility {
                Visibility::Public => def.public.push(member),
                Visibility::Protected => def.protected.push(member),
                Visibility::Private => def.private.push(member),
            }
        }

        self.ensure(TokenKind::Semicolon, "expected semicolon ';'")?;
        Ok(def)
    }

    /// Parses one member clause of a class body.
    fn parse_class_member(&mut self) -> ParseResult<ClassMember> {
        if self.check(TokenKind::Var) {
            let keyword = self.previous().clone();
            let var = self.parse_var_definition(&keyword)?;
            Ok(ClassMember::Definition(Definition::Var(var)))
        } else if self.check(TokenKind::Static) || self.check(TokenKind::Const) {
            self.parse_modified_member()
        } else if self.check(TokenKind::Class) {
            let class = self.parse_class_definition()?;
            Ok(ClassMember::Definition(Definition::Class(class)))
        } else if self.check(TokenKind::Enum) {
            let en = self.parse_enum_definition()?;
            Ok(ClassMember::Definition(Definition::Enum(en)))
        } else if self.check(TokenKind::Func) {
            let def = self.parse_function_definition()?;
            Ok(ClassMember::Method(Method {
                is_static: false,
                is_const: false,
                def,
            }))
        } else if self.check(TokenKind::Abstract) {
            Ok(ClassMember::Abstract(self.parse_abstract(false)?))
        } else if self.check(TokenKind::Construct) {
            Ok(ClassMember::Constructor(self.parse_constructor()?))
        } else if self.check(TokenKind::Ident) {
            self.parse_getter_setter_or_operator()
        } else {
            let span = self.peek().span().clone();
            self.error("expected definition in class", span);
            Err(ParseFault)
        }
    }

    /// Parses a member that started with `static` or `const` (already
    /// consumed): a method, an abstract method, an operator overload, or a
    /// variable with that storage class.
    fn parse_modified_member(&mut self) -> ParseResult<ClassMember> {
        let modifier = self.previous().clone();

        // `static op +` / `const op !` route to an operator overload.
        if self.check(TokenKind::Ident) {
            if self.previous().string_value().is_some_and(|s| s == "op") {
                return Ok(ClassMember::Operator(self.parse_operator()?));
            }
            self.backtrack();
        }

        let next = self.peek().kind();
        if (modifier.kind() == TokenKind::Const && next == TokenKind::Static)
            || (modifier.kind() == TokenKind::Static && next == TokenKind::Const)
        {
            let span = self.peek().span().clone();
            self.error("function cannot be marked static and const", span);
            return Err(ParseFault);
        }

        if self.check(TokenKind::Func) {
            let def = self.parse_function_definition()?;
            Ok(ClassMember::Method(Method {
                is_static: modifier.kind() == TokenKind::Static,
                is_const: modifier.kind() == TokenKind::Const,
                def,
            }))
        } else if self.check(TokenKind::Abstract) {
            if modifier.kind() == TokenKind::Static {
                let span = self.previous().span().clone();
                self.error("function cannot be marked static and abstract", span);
                return Err(ParseFault);
            }
            Ok(ClassMember::Abstract(self.parse_abstract(true)?))
        } else {
            let var = self.parse_var_definition(&modifier)?;
            Ok(ClassMember::Definition(Definition::Var(var)))
        }
    }

    /// Parses an abstract method; the `abstract` keyword is already
    /// consumed and `is_const` reflects a preceding `const`.
    fn parse_abstract(&mut self, is_const: bool) -> ParseResult<AbstractMethod> {
        let ident = self.ensure(TokenKind::Ident, "expected abstract function identifier")?;

        self.ensure(TokenKind::LParen, "expected opening parenthesis '('")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
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
            return_type = Some(self.parse_type()?);
        }

        self.ensure(TokenKind::Semicolon, "expected semicolon ';'")?;
        Ok(AbstractMethod {
            ident,
            params,
            return_type,
            is_return_const,
            is_const,
        })
    }

    /// Parses a constructor; the `construct` keyword is already consumed.
    fn parse_constructor(&mut self) -> ParseResult<Constructor> {
        self.ensure(TokenKind::LParen, "expected opening parenthesis '('")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.check(TokenKind::Comma) {
                    break;
                }
            }
            self.ensure(TokenKind::RParen, "expected closing parenthesis ')'")?;
        }

        let body = self.parse_block()?;
        Ok(Constructor { params, body })
    }

    /// Dispatches a member clause that started with a bare identifier
    /// (already consumed): an operator overload when the identifier is `op`
    /// followed by an operator, otherwise a getter or setter.
    fn parse_getter_setter_or_operator(&mut self) -> ParseResult<ClassMember> {
        let ident = self.previous().clone();

        if ident.string_value().is_some_and(|s| s == "op") && self.peek().kind().is_operator() {
            return Ok(ClassMember::Operator(self.parse_operator()?));
        }

        if self.check(TokenKind::Colon) {
            let get_type = self.parse_type()?;
            let body = self.parse_block()?;
            Ok(ClassMember::Getter(Getter {
                ident,
                get_type,
                body,
            }))
        } else if self.check(TokenKind::LParen) {
            let param = self.parse_param()?;
            self.ensure(TokenKind::RParen, "expected closing parenthesis ')'")?;
            let body = self.parse_block()?;
            Ok(ClassMember::Setter(Setter { ident, param, body }))
        } else {
            self.error("expected getter or setter", ident.span().clone());
            Err(ParseFault)
        }
    }

    /// Parses an operator overload; the `op` identifier is already
    /// consumed.
    ///
    /// Exactly one parameter makes a unary overload (allowed for `-` and
    /// `!` only, with `left` and `right` sharing the parameter); two make a
    /// binary one (every overloadable operator except `!`). The return
    /// type is mandatory.
    fn parse_operator(&mut self) -> ParseResult<OperatorOverload> {
        let operator = self.advance().clone();
        if !operator.kind().is_overloadable() {
            self.error("cannot overload", operator.span().clone());
            return Err(ParseFault);
        }

        self.ensure(TokenKind::LParen, "expected opening parenthesis '('")?;
        let left = self.parse_param()?;
        let is_unary = !self.check(TokenKind::Comma);
        let right = if is_unary {
            if !matches!(operator.kind(), TokenKind::Minus | TokenKind::Not) {
                self.error(
                    "only '-' and '!' are allowed unary overloads",
                    operator.span().clone(),
                );
                return Err(ParseFault);
            }
            left.clone()
        } else {
            if operator.kind() == TokenKind::Not {
                self.error(
                    "'!' can only be overloaded as a unary",
                    operator.span().clone(),
                );
                return Err(ParseFault);
            }
            self.parse_param()?
        };
        self.ensure(TokenKind::RParen, "expected closing parenthesis ')'")?;

        if let Err(fault) = self.ensure(TokenKind::Colon, "expected return type") {
            let span = self.previous().span().clone();
            self.note("operator overloads must have a return type", span);
            return Err(fault);
        }
        let return_type = self.parse_type()?;

        let body = self.parse_block()?;
        Ok(OperatorOverload {
            operator,
            is_unary,
            left,
            right,
            return_type,
            body,
        })
    }
}
