// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! AST pretty-printer.
//!
//! Renders a parsed [`Module`] as a human-readable outline, one construct
//! per line with nesting shown by indentation. This is the example
//! consumer of the AST: it threads a numeric indent level through an
//! exhaustive traversal of every node family, which is exactly the shape a
//! semantic pass takes.
//!
//! ```
//! use rill_core::print::print_module;
//! use rill_core::source_analysis::{lex, parse};
//!
//! let (tokens, _) = lex("m.rl", "module m; export var x : int = 1;");
//! let (module, _) = parse("m.rl", &tokens);
//! let rendering = print_module(&module);
//! assert!(rendering.starts_with("module m"));
//! assert!(rendering.contains("exported var x"));
//! ```

use std::fmt::Write as _;

use crate::ast::{
    Block, ClassMember, Definition, Expression, ForInit, Function, Module, Parameter, Statement,
    Type, TypeKind, VarKind,
};

/// Renders a module as an indented outline.
#[must_use]
pub fn print_module(module: &Module) -> String {
    let mut printer = TreePrinter::default();
    printer.module(module);
    printer.out
}

#[derive(Default)]
struct TreePrinter {
    out: String,
}

impl TreePrinter {
    fn line(&mut self, indent: usize, text: &str) {
        for _ in 0..indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn module(&mut self, module: &Module) {
        self.line(0, &format!("module {}", module.def));

        for import in &module.imports {
            if import.alias == import.imported {
                self.line(0, &format!("import {}", import.imported));
            } else {
                self.line(
                    0,
                    &format!("import {} as {}", import.imported, import.alias),
                );
            }
        }
        for foreign in &module.foreign_imports {
            self.line(0, &format!("import extern {}", foreign.path));
        }

        for global in &module.definitions {
            let prefix = if global.exported { "exported " } else { "" };
            self.definition(0, prefix, &global.def);
        }
    }

    fn definition(&mut self, indent: usize, prefix: &str, def: &Definition) {
        match def {
            Definition::Var(var) => {
                let kind = match var.var_kind {
                    VarKind::Var => "var",
                    VarKind::Const => "const",
                    VarKind::Static => "static",
                };
                let mut text = format!("{prefix}{kind} {}", var.ident);
                if let Some(ty) = &var.data_type {
                    let _ = write!(text, " : {}", type_text(ty));
                }
                if let Some(value) = &var.value {
                    let _ = write!(text, " = {}", expr_text(value));
                }
                self.line(indent, &text);
            }
            Definition::Function(func) => {
                let text = format!(
                    "{prefix}func {}{}",
                    func.ident,
                    signature_text(&func.func)
                );
                self.line(indent, &text);
                self.block(indent + 1, &func.func.body);
            }
            Definition::Class(class) => {
                let mut text = format!("{prefix}class {}", class.ident);
                if !class.bases.is_empty() {
                    let bases: Vec<_> =
                        class.bases.iter().map(ToString::to_string).collect();
                    let _ = write!(text, " : {}", bases.join(", "));
                }
                self.line(indent, &text);
                for (label, members) in [
                    ("public:", &class.public),
                    ("protected:", &class.protected),
                    ("private:", &class.private),
                ] {
                    if members.is_empty() {
                        continue;
                    }
                    self.line(indent + 1, label);
                    for member in members {
                        self.class_member(indent + 2, member);
                    }
                }
            }
            Definition::Enum(en) => {
                let elements: Vec<_> = en.elements.iter().map(ToString::to_string).collect();
                self.line(
                    indent,
                    &format!("{prefix}enum {} {{ {} }}", en.ident, elements.join(", ")),
                );
            }
        }
    }

    fn class_member(&mut self, indent: usize, member: &ClassMember) {
        match member {
            ClassMember::Definition(def) => self.definition(indent, "", def),
            ClassMember::Method(method) => {
                let mut text = String::new();
                if method.is_static {
                    text.push_str("static ");
                }
                if method.is_const {
                    text.push_str("const ");
                }
                let _ = write!(
                    text,
                    "func {}{}",
                    method.def.ident,
                    signature_text(&method.def.func)
                );
                self.line(indent, &text);
                self.block(indent + 1, &method.def.func.body);
            }
            ClassMember::Abstract(abs) => {
                let mut text = String::new();
                if abs.is_const {
                    text.push_str("const ");
                }
                let _ = write!(text, "abstract {}({})", abs.ident, params_text(&abs.params));
                if let Some(ty) = &abs.return_type {
                    let _ = write!(text, " : ");
                    if abs.is_return_const {
                        text.push_str("const ");
                    }
                    text.push_str(&type_text(ty));
                }
                self.line(indent, &text);
            }
            ClassMember::Constructor(ctor) => {
                self.line(indent, &format!("construct({})", params_text(&ctor.params)));
                self.block(indent + 1, &ctor.body);
            }
            ClassMember::Getter(getter) => {
                self.line(
                    indent,
                    &format!("get {} : {}", getter.ident, type_text(&getter.get_type)),
                );
                self.block(indent + 1, &getter.body);
            }
            ClassMember::Setter(setter) => {
                self.line(
                    indent,
                    &format!("set {}({})", setter.ident, param_text(&setter.param)),
                );
                self.block(indent + 1, &setter.body);
            }
            ClassMember::Operator(op) => {
                let params = if op.is_unary {
                    param_text(&op.left)
                } else {
                    format!("{}, {}", param_text(&op.left), param_text(&op.right))
                };
                self.line(
                    indent,
                    &format!(
                        "op {} ({}) : {}",
                        op.operator,
                        params,
                        type_text(&op.return_type)
                    ),
                );
                self.block(indent + 1, &op.body);
            }
        }
    }

    fn block(&mut self, indent: usize, block: &Block) {
        for statement in &block.statements {
            self.statement(indent, statement);
        }
    }

    fn statement(&mut self, indent: usize, statement: &Statement) {
        match statement {
            Statement::Block(block) => {
                self.line(indent, "block");
                self.block(indent + 1, block);
            }
            Statement::Expression(Some(expr)) => self.line(indent, &expr_text(expr)),
            Statement::Expression(None) => self.line(indent, "<error>"),
            Statement::If(ifs) => {
                self.line(indent, &format!("if {}", expr_text(&ifs.condition)));
                self.block(indent + 1, &ifs.true_branch);
                for else_if in &ifs.else_ifs {
                    self.line(indent, &format!("else if {}", expr_text(&else_if.condition)));
                    self.block(indent + 1, &else_if.block);
                }
                if let Some(else_branch) = &ifs.else_branch {
                    self.line(indent, "else");
                    self.block(indent + 1, else_branch);
                }
            }
            Statement::While(w) => {
                self.line(indent, &format!("while {}", expr_text(&w.condition)));
                self.block(indent + 1, &w.body);
            }
            Statement::ConditionFor(cond) => {
                self.line(indent, "for");
                match &cond.init {
                    Some(ForInit::Definition(def)) => self.definition(indent + 1, "init: ", def),
                    Some(ForInit::Expression(expr)) => {
                        self.line(indent + 1, &format!("init: {}", expr_text(expr)));
                    }
                    None => {}
                }
                if let Some(expr) = &cond.condition {
                    self.line(indent + 1, &format!("cond: {}", expr_text(expr)));
                }
                if let Some(expr) = &cond.increment {
                    self.line(indent + 1, &format!("incr: {}", expr_text(expr)));
                }
                self.block(indent + 1, &cond.body);
            }
            Statement::RangeFor(range) => {
                self.line(
                    indent,
                    &format!("for {} in {}", range.ident, expr_text(&range.range)),
                );
                self.block(indent + 1, &range.body);
            }
            Statement::Return(value) => match value {
                Some(expr) => self.line(indent, &format!("return {}", expr_text(expr))),
                None => self.line(indent, "return"),
            },
            Statement::Break => self.line(indent, "break"),
            Statement::Continue => self.line(indent, "continue"),
            Statement::Try(t) => {
                self.line(indent, "try");
                self.block(indent + 1, &t.body);
                for catch in &t.catches {
                    self.line(indent, &format!("catch {}", param_text(&catch.param)));
                    self.block(indent + 1, &catch.body);
                }
            }
            Statement::Throw(value) => match value {
                Some(expr) => self.line(indent, &format!("throw {}", expr_text(expr))),
                None => self.line(indent, "throw"),
            },
            Statement::Definition(def) => self.definition(indent, "", def),
        }
    }
}

fn signature_text(func: &Function) -> String {
    let mut text = format!("({}", params_text(&func.params));
    if func.is_variadic {
        if !func.params.is_empty() {
            text.push_str(", ");
        }
        text.push_str("...");
    }
    text.push(')');
    if let Some(ty) = &func.return_type {
        text.push_str(" : ");
        if func.is_return_const {
            text.push_str("const ");
        }
        text.push_str(&type_text(ty));
    }
    text
}

fn params_text(params: &[Parameter]) -> String {
    let rendered: Vec<_> = params.iter().map(param_text).collect();
    rendered.join(", ")
}

fn param_text(param: &Parameter) -> String {
    let mut text = param.ident.to_string();
    text.push_str(" : ");
    if param.is_const {
        text.push_str("const ");
    }
    text.push_str(&type_text(&param.data_type));
    text
}

fn type_text(ty: &Type) -> String {
    match &ty.kind {
        TypeKind::Simple(simple) => {
            use crate::ast::SimpleType;
            match simple {
                SimpleType::Int => "int".into(),
                SimpleType::Real => "real".into(),
                SimpleType::Char => "char".into(),
                SimpleType::Bool => "bool".into(),
                SimpleType::Generic => "<inferred>".into(),
            }
        }
        TypeKind::Class(ident) => ident.to_string(),
        TypeKind::Func {
            return_type,
            param_types,
        } => {
            let params: Vec<_> = param_types.iter().map(type_text).collect();
            let mut text = format!("func({})", params.join(", "));
            if let Some(ret) = return_type {
                let _ = write!(text, " : {}", type_text(ret));
            }
            text
        }
        TypeKind::Array { hold_type, size } => match size {
            Some(size) => format!("{}[{}]", type_text(hold_type), expr_text(size)),
            None => format!("{}[]", type_text(hold_type)),
        },
        TypeKind::Tuple(types) => {
            let rendered: Vec<_> = types.iter().map(type_text).collect();
            format!("tuple<{}>", rendered.join(", "))
        }
        TypeKind::TypeOf(expr) => format!("typeof {}", expr_text(expr)),
    }
}

fn expr_text(expr: &Expression) -> String {
    match expr {
        Expression::Assignment { var, value } => {
            format!("{var} = {}", expr_text(value))
        }
        Expression::Logical {
            left,
            operator,
            right,
        }
        | Expression::Binary {
            left,
            operator,
            right,
        } => {
            format!("({} {operator} {})", expr_text(left), expr_text(right))
        }
        Expression::Unary { operator, right } => format!("({operator}{})", expr_text(right)),
        Expression::Call { callee, args } => {
            let rendered: Vec<_> = args.iter().map(expr_text).collect();
            format!("{}({})", expr_text(callee), rendered.join(", "))
        }
        Expression::Literal(token) => token.to_string(),
        Expression::VarAccess { var, is_copy } => {
            if *is_copy {
                format!("copy {var}")
            } else {
                var.to_string()
            }
        }
        Expression::ArrayIndex {
            var,
            is_copy,
            index,
        } => {
            let copy = if *is_copy { "copy " } else { "" };
            format!("{copy}{var}[{}]", expr_text(index))
        }
        Expression::Group(inner) => format!("({})", expr_text(inner)),
        Expression::InitializerList(data) => {
            let rendered: Vec<_> = data.iter().map(expr_text).collect();
            format!("{{ {} }}", rendered.join(", "))
        }
        Expression::Function(func) => format!("func{}", signature_text(func)),
    }
}
