// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Rill.
//!
//! The AST is a closed family of tagged variants organized in four
//! hierarchies: [`Definition`], [`Statement`], [`Expression`], and [`Type`]
//! (plus [`ClassMember`] for the definitions that are only admissible inside
//! a class body). A [`Module`] exclusively owns its nested nodes and each
//! node exclusively owns its children: ownership is tree-shaped, with no
//! sharing and no cycles.
//!
//! Tokens are embedded where downstream passes need the original span or
//! payload: identifiers keep their token path, literals keep their literal
//! token, operators keep their operator token.
//!
//! # Example
//!
//! ```
//! use rill_core::source_analysis::{lex, parse};
//!
//! let (tokens, _) = lex("demo.rl", "module demo; export var answer = 42;");
//! let (module, diagnostics) = parse("demo.rl", &tokens);
//!
//! assert!(diagnostics.is_empty());
//! assert_eq!(module.def.name(), "demo");
//! assert!(module.definitions[0].exported);
//! ```

use camino::Utf8PathBuf;
use ecow::EcoString;

use crate::source_analysis::{SourceSpan, Token};

/// A dotted identifier path like `collections.map.Entry`.
///
/// The path is non-empty for any identifier the parser produced from
/// source; each element is an identifier token.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Identifier {
    /// The identifier tokens in the path, in source order.
    pub path: Vec<Token>,
}

impl Identifier {
    /// Creates an identifier from its path tokens.
    #[must_use]
    pub fn new(path: Vec<Token>) -> Self {
        Self { path }
    }

    /// Returns the dotted name, e.g. `"collections.map.Entry"`.
    #[must_use]
    pub fn name(&self) -> EcoString {
        let mut name = EcoString::new();
        for (i, token) in self.path.iter().enumerate() {
            if i > 0 {
                name.push('.');
            }
            if let Some(part) = token.string_value() {
                name.push_str(part);
            }
        }
        name
    }

    /// Returns the span covering the whole path.
    ///
    /// Returns `None` for the empty placeholder identifier a recovered
    /// parse can leave behind.
    #[must_use]
    pub fn span(&self) -> Option<SourceSpan> {
        let first = self.path.first()?;
        let last = self.path.last()?;
        Some(first.span().merge(last.span()))
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

/// A native module import: `import a.b [as c];`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleImport {
    /// The module that was imported.
    pub imported: Identifier,
    /// The name the module is visible under; defaults to `imported` when no
    /// `as` clause was written.
    pub alias: Identifier,
}

/// A foreign import: `import extern "vendor/header.h";`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignImport {
    /// The imported path; a string token.
    pub path: Token,
}

/// A top-level definition together with its export flag.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDefinition {
    /// Whether the definition is visible to importing modules.
    pub exported: bool,
    /// The definition itself.
    pub def: Definition,
}

/// The AST root for one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// The declared module name.
    pub def: Identifier,
    /// Native imports, in source order.
    pub imports: Vec<ModuleImport>,
    /// Foreign imports, in source order.
    pub foreign_imports: Vec<ForeignImport>,
    /// Top-level definitions, in source order.
    pub definitions: Vec<GlobalDefinition>,
    /// Path of the file this module was parsed from.
    pub file_path: Utf8PathBuf,
}

impl Module {
    /// Creates an empty module for the given file.
    ///
    /// The module name stays the empty placeholder until the header is
    /// parsed.
    #[must_use]
    pub fn new(file_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            def: Identifier::default(),
            imports: Vec::new(),
            foreign_imports: Vec::new(),
            definitions: Vec::new(),
            file_path: file_path.into(),
        }
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// The storage class of a variable definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// `var`
    Var,
    /// `const`
    Const,
    /// `static`
    Static,
}

/// A variable definition: `var x : int = 1;`.
///
/// The type may be omitted when an initializer is present (it is then
/// inferred), and the initializer may be omitted when a type is present.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDefinition {
    /// The storage class the definition was introduced with.
    pub var_kind: VarKind,
    /// The variable name token.
    pub ident: Token,
    /// The declared type, if written.
    pub data_type: Option<Type>,
    /// The initializer, if written.
    pub value: Option<Expression>,
}

/// A named function definition: `func f(a, b) : int { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    /// The function name token.
    pub ident: Token,
    /// The function itself.
    pub func: Function,
}

/// A class definition with its base list and visibility buckets.
///
/// Members written before any visibility label land in `public`; a
/// `public:` / `protected:` / `private:` label re-aims the destination
/// bucket until the next label. Every member appears in exactly one bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinition {
    /// The class name token.
    pub ident: Token,
    /// Base classes, in declaration order.
    pub bases: Vec<Identifier>,
    /// Members in the `public` bucket.
    pub public: Vec<ClassMember>,
    /// Members in the `protected` bucket.
    pub protected: Vec<ClassMember>,
    /// Members in the `private` bucket.
    pub private: Vec<ClassMember>,
}

/// An enum definition: `enum Color { Red, Green, Blue };`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDefinition {
    /// The enum name token.
    pub ident: Token,
    /// The element name tokens, in declaration order.
    pub elements: Vec<Token>,
}

/// A definition of a variable, function, class, or enum.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// A variable definition.
    Var(VarDefinition),
    /// A function definition.
    Function(FunctionDefinition),
    /// A class definition.
    Class(ClassDefinition),
    /// An enum definition.
    Enum(EnumDefinition),
}

impl Definition {
    /// Returns the name token of the defined entity.
    #[must_use]
    pub fn ident(&self) -> &Token {
        match self {
            Self::Var(def) => &def.ident,
            Self::Function(def) => &def.ident,
            Self::Class(def) => &def.ident,
            Self::Enum(def) => &def.ident,
        }
    }
}

// ============================================================================
// Class members
// ============================================================================

/// A class method: a function definition with optional `static` or `const`.
///
/// A method may carry at most one of the two modifiers; `static const` is
/// rejected by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// Whether the method was marked `static`.
    pub is_static: bool,
    /// Whether the method was marked `const`.
    pub is_const: bool,
    /// The underlying function definition.
    pub def: FunctionDefinition,
}

/// An abstract method: a signature with no body, terminated by `;`.
///
/// Abstract methods must not be static.
#[derive(Debug, Clone, PartialEq)]
pub struct AbstractMethod {
    /// The method name token.
    pub ident: Token,
    /// The parameter list.
    pub params: Vec<Parameter>,
    /// The declared return type, if any.
    pub return_type: Option<Type>,
    /// Whether the return type was marked `const`.
    pub is_return_const: bool,
    /// Whether the method was marked `const`.
    pub is_const: bool,
}

/// A class constructor: `construct(params) { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    /// The parameter list.
    pub params: Vec<Parameter>,
    /// The constructor body.
    pub body: Block,
}

/// A property getter: `name : Type { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Getter {
    /// The property name token.
    pub ident: Token,
    /// The type the getter yields.
    pub get_type: Type,
    /// The getter body.
    pub body: Block,
}

/// A property setter: `name(param) { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Setter {
    /// The property name token.
    pub ident: Token,
    /// The value parameter.
    pub param: Parameter,
    /// The setter body.
    pub body: Block,
}

/// An operator overload: `op + (left, right) : Type { ... }`.
///
/// The overloadable operators are `+ - * / % == != ! > >= < <=`. Unary
/// overloads are allowed only for `-` and `!`; `!` is unary-only. For a
/// unary overload, `left` and `right` hold the same parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorOverload {
    /// The overloaded operator token.
    pub operator: Token,
    /// Whether this is a unary overload.
    pub is_unary: bool,
    /// The left operand parameter.
    pub left: Parameter,
    /// The right operand parameter.
    pub right: Parameter,
    /// The mandatory return type.
    pub return_type: Type,
    /// The overload body.
    pub body: Block,
}

/// A definition inside a class body.
///
/// Nested variables, classes, and enums reuse [`Definition`]; the remaining
/// variants are admissible only inside a class.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// A nested variable, class, or enum definition.
    Definition(Definition),
    /// A method.
    Method(Method),
    /// An abstract method.
    Abstract(AbstractMethod),
    /// A constructor.
    Constructor(Constructor),
    /// A getter.
    Getter(Getter),
    /// A setter.
    Setter(Setter),
    /// An operator overload.
    Operator(OperatorOverload),
}

// ============================================================================
// Statements
// ============================================================================

/// A braced sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// The statements, in source order.
    pub statements: Vec<Statement>,
}

/// An `else if` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    /// The clause condition.
    pub condition: Expression,
    /// The clause body.
    pub block: Block,
}

/// An `if` statement with its `else if` ladder and optional `else`.
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    /// The condition of the leading `if`.
    pub condition: Expression,
    /// The body taken when the condition holds.
    pub true_branch: Block,
    /// The `else if` clauses, evaluated in order.
    pub else_ifs: Vec<ElseIf>,
    /// The final `else` body, if any.
    pub else_branch: Option<Block>,
}

/// A `while` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct While {
    /// The loop condition.
    pub condition: Expression,
    /// The loop body.
    pub body: Block,
}

/// The initializer clause of a condition `for` loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// A definition initializer, e.g. `var i = 0`.
    Definition(Box<Definition>),
    /// An expression initializer.
    Expression(Expression),
}

/// A C-style `for` loop: `for init; cond; incr { ... }`.
///
/// Each clause is optional; the body `{` terminates the increment clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionFor {
    /// The initializer clause.
    pub init: Option<ForInit>,
    /// The condition clause.
    pub condition: Option<Expression>,
    /// The increment clause.
    pub increment: Option<Expression>,
    /// The loop body.
    pub body: Block,
}

/// A range `for` loop: `for x in range { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFor {
    /// The loop variable token.
    pub ident: Token,
    /// The range expression.
    pub range: Expression,
    /// The loop body.
    pub body: Block,
}

/// A single `catch` clause of a `try` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// The caught value parameter.
    pub param: Parameter,
    /// The handler body.
    pub body: Block,
}

/// A `try` statement. At least one catch clause is required.
#[derive(Debug, Clone, PartialEq)]
pub struct Try {
    /// The guarded body.
    pub body: Block,
    /// The catch clauses, tried in order.
    pub catches: Vec<CatchClause>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A nested block.
    Block(Block),
    /// An expression evaluated for its effects.
    ///
    /// The expression is `None` only for the placeholder a recovered parse
    /// error leaves behind.
    Expression(Option<Expression>),
    /// An `if` statement.
    If(If),
    /// A `while` loop.
    While(While),
    /// A C-style `for` loop.
    ConditionFor(ConditionFor),
    /// A range `for` loop.
    RangeFor(RangeFor),
    /// A `return`, with an optional value.
    Return(Option<Expression>),
    /// A `break`.
    Break,
    /// A `continue`.
    Continue,
    /// A `try` statement.
    Try(Try),
    /// A `throw`, with an optional value.
    Throw(Option<Expression>),
    /// A local definition.
    Definition(Definition),
}

// ============================================================================
// Expressions
// ============================================================================

/// An anonymous function: `(params) [: [const] Type] { ... }`.
///
/// Named functions wrap one of these in a [`FunctionDefinition`].
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// The parameter list.
    pub params: Vec<Parameter>,
    /// The declared return type, if any.
    pub return_type: Option<Type>,
    /// Whether the return type was marked `const`.
    pub is_return_const: bool,
    /// Whether the parameter list ended with `...`.
    pub is_variadic: bool,
    /// The function body.
    pub body: Block,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// An assignment: `x = value`. The target must have reduced to a
    /// variable access.
    Assignment {
        /// The assigned variable.
        var: Identifier,
        /// The assigned value.
        value: Box<Expression>,
    },
    /// A short-circuiting `and` / `or`.
    Logical {
        /// The left operand.
        left: Box<Expression>,
        /// The operator token (`and` or `or`).
        operator: Token,
        /// The right operand.
        right: Box<Expression>,
    },
    /// A binary operation: equality, comparison, additive, multiplicative.
    Binary {
        /// The left operand.
        left: Box<Expression>,
        /// The operator token.
        operator: Token,
        /// The right operand.
        right: Box<Expression>,
    },
    /// A unary operation: `-x` or `!x`.
    Unary {
        /// The operator token (`-` or `!`).
        operator: Token,
        /// The operand.
        right: Box<Expression>,
    },
    /// A call: `callee(args)`.
    Call {
        /// The called expression.
        callee: Box<Expression>,
        /// The arguments, in source order.
        args: Vec<Expression>,
    },
    /// A literal: `true`, `false`, an integer, a real, or a string.
    Literal(Token),
    /// A variable access, optionally prefixed with `copy`.
    VarAccess {
        /// The accessed variable.
        var: Identifier,
        /// Whether the access was prefixed with `copy`.
        is_copy: bool,
    },
    /// An indexed variable access: `xs[i]`, optionally prefixed with `copy`.
    ArrayIndex {
        /// The accessed variable.
        var: Identifier,
        /// Whether the access was prefixed with `copy`.
        is_copy: bool,
        /// The index expression.
        index: Box<Expression>,
    },
    /// A parenthesized expression.
    Group(Box<Expression>),
    /// A brace-enclosed initializer list: `{ a, b, c }`.
    InitializerList(Vec<Expression>),
    /// An anonymous function used as an expression.
    Function(Box<Function>),
}

// ============================================================================
// Types
// ============================================================================

/// A built-in or inferred type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleType {
    /// `int`
    Int,
    /// `real`
    Real,
    /// `char`
    Char,
    /// `bool`
    Bool,
    /// The inferred type of an unannotated parameter.
    Generic,
}

/// The shape of a type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// A built-in or inferred type.
    Simple(SimpleType),
    /// A class type named by an identifier path.
    Class(Identifier),
    /// A function type: `func(T1, T2) : R`.
    Func {
        /// The return type, if any.
        return_type: Option<Box<Type>>,
        /// The parameter types, in source order.
        param_types: Vec<Type>,
    },
    /// An array type: `T[]` or `T[size]`. Applies as a suffix, repeatably.
    Array {
        /// The element type.
        hold_type: Box<Type>,
        /// The size expression, if one was written.
        size: Option<Box<Expression>>,
    },
    /// A tuple type: `tuple<T1, T2, ...>`.
    Tuple(Vec<Type>),
    /// The type of an expression: `typeof expr`.
    TypeOf(Box<Expression>),
}

/// A type expression with the token it was introduced by.
///
/// The token is kept for diagnostic quality in later passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    /// The representative token of the type expression.
    pub tok: Token,
    /// The shape of the type.
    pub kind: TypeKind,
}

impl Type {
    /// Creates a type from its representative token and shape.
    #[must_use]
    pub fn new(tok: Token, kind: TypeKind) -> Self {
        Self { tok, kind }
    }

    /// Creates the inferred type for an unannotated parameter, anchored at
    /// the parameter's own token.
    #[must_use]
    pub fn generic(tok: Token) -> Self {
        Self::new(tok, TypeKind::Simple(SimpleType::Generic))
    }
}

/// A function, constructor, setter, or catch parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// The parameter name token.
    pub ident: Token,
    /// Whether the parameter was marked `const`.
    pub is_const: bool,
    /// The declared type; the inferred [`SimpleType::Generic`] when
    /// omitted.
    pub data_type: Type,
}
