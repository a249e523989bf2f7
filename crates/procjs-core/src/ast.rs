// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract syntax tree for transformed PDE documents.
//!
//! This AST is lighter than a conventional compiler AST: statement and
//! expression *text* stays textual (with placeholder tokens for extracted
//! literals and transforms), while the structure the renderer needs to
//! reason about - classes, methods, constructors, fields, control-flow
//! shape - is reified as nodes.
//!
//! Every node has exactly one rendering contract, implemented by the
//! emitter in [`crate::codegen`]. Nodes never look up atoms themselves;
//! everything textual they need is captured at construction time.
//!
//! Class bodies carry the [`ClassId`] of their registry record. Owner
//! links between inner and enclosing classes live in the registry as ids,
//! so the AST itself stays acyclic and plainly owned.

use ecow::EcoString;

use crate::session::ClassId;

/// The whole document: a flat statement list.
///
/// Rendering partitions it into classes first, then everything else, and
/// wraps both in the host-library closure parameterized by `$p`.
#[derive(Debug)]
pub struct Root {
    /// Top-level statements in source order.
    pub statements: Vec<Statement>,
}

/// One entry of a statement stream.
#[derive(Debug)]
pub enum Statement {
    /// Pass-through text: separators, whitespace, keywords the scanner
    /// does not model. Emitted verbatim.
    Raw(String),
    /// An expression statement (terminator handled by the adjacent `Raw`).
    Expression(Expression),
    /// A local variable declaration list.
    Var(Var),
    /// A braced statements block.
    Block(StatementsBlock),
    /// `for` head.
    For(ForStatement),
    /// `catch` head.
    Catch(CatchStatement),
    /// A control-flow keyword with an optional parenthesized argument.
    Prefix(PrefixStatement),
    /// `case expr:`.
    SwitchCase(SwitchCase),
    /// `label:` (also covers `default:`).
    Label(Label),
    /// A class or interface declaration.
    Class(ClassDeclaration),
    /// A global (sketch-level) method.
    Method(GlobalMethod),
    /// A global `function` declaration.
    Function(Function),
}

/// A named class or interface declaration bound to a variable and
/// republished onto `$p`.
#[derive(Debug)]
pub struct ClassDeclaration {
    /// Declared name.
    pub name: EcoString,
    /// The body, class- or interface-shaped.
    pub body: ClassBodyKind,
}

impl ClassDeclaration {
    /// Registry id of the declared class.
    #[must_use]
    pub fn class_id(&self) -> ClassId {
        match &self.body {
            ClassBodyKind::Class(body) => body.id,
            ClassBodyKind::Interface(body) => body.id,
        }
    }
}

/// Either kind of type body.
#[derive(Debug)]
pub enum ClassBodyKind {
    /// A concrete class body.
    Class(ClassBody),
    /// An interface body.
    Interface(InterfaceBody),
}

/// The members of a class, grouped the way the renderer emits them.
#[derive(Debug)]
pub struct ClassBody {
    /// Registry id of this class.
    pub id: ClassId,
    /// Class name (synthetic for inline classes).
    pub name: EcoString,
    /// Textual base class name from `extends`, unresolved.
    pub base_name: Option<EcoString>,
    /// Textual interface names from `implements`, unresolved.
    pub interface_names: Vec<EcoString>,
    /// Inline `function` declarations, emitted verbatim first.
    pub functions: Vec<Function>,
    /// Inner classes and interfaces.
    pub inner_classes: Vec<InnerClass>,
    /// Field declaration groups.
    pub fields: Vec<ClassField>,
    /// Methods, in source order; overload ids are assigned at render time.
    pub methods: Vec<ClassMethod>,
    /// Constructors, dispatched on arity by the synthetic `$constr`.
    pub cstrs: Vec<Constructor>,
    /// Free-form trailing text between declarations.
    pub trailing_misc: String,
}

/// The members of an interface.
///
/// Interfaces carry no code: methods are names only, fields are static
/// constants, and instantiation throws at runtime.
#[derive(Debug)]
pub struct InterfaceBody {
    /// Registry id of this interface.
    pub id: ClassId,
    /// Interface name.
    pub name: EcoString,
    /// Textual base interface names from `extends`, unresolved.
    pub base_names: Vec<EcoString>,
    /// Declared method names.
    pub method_names: Vec<EcoString>,
    /// Constant declarations (always static).
    pub fields: Vec<ClassField>,
    /// Nested classes and interfaces.
    pub inner_classes: Vec<InnerClass>,
}

/// An inner class: delegates to its body, published on the enclosing
/// instance (and on the class itself when static).
#[derive(Debug)]
pub struct InnerClass {
    /// Declared name.
    pub name: EcoString,
    /// Whether the declaration carried `static`.
    pub is_static: bool,
    /// The nested body.
    pub body: ClassBodyKind,
}

impl InnerClass {
    /// Registry id of the inner class.
    #[must_use]
    pub fn class_id(&self) -> ClassId {
        match &self.body {
            ClassBodyKind::Class(body) => body.id,
            ClassBodyKind::Interface(body) => body.id,
        }
    }
}

/// A method of a class.
#[derive(Debug)]
pub struct ClassMethod {
    /// Declared name (before overload suffixing).
    pub name: EcoString,
    /// Parameter list.
    pub params: Params,
    /// Body block.
    pub body: StatementsBlock,
    /// Whether the declaration carried `static`.
    pub is_static: bool,
}

/// A sketch-level method, published onto `$p`.
#[derive(Debug)]
pub struct GlobalMethod {
    /// Declared name.
    pub name: EcoString,
    /// Parameter list.
    pub params: Params,
    /// Body block.
    pub body: StatementsBlock,
}

/// A constructor; emitted as `$constr_N` where N is the arity.
#[derive(Debug)]
pub struct Constructor {
    /// Parameter list.
    pub params: Params,
    /// Body block.
    pub body: StatementsBlock,
}

/// A JavaScript-style function expression or declaration.
#[derive(Debug)]
pub struct Function {
    /// Function name; `None` for anonymous functions.
    pub name: Option<EcoString>,
    /// Parameter list.
    pub params: Params,
    /// Body block.
    pub body: StatementsBlock,
}

/// A positional parameter list, with an optional trailing varargs
/// parameter bound from `arguments` inside the body.
#[derive(Debug, Default)]
pub struct Params {
    /// Fixed positional parameters.
    pub params: Vec<Param>,
    /// Varargs parameter (`Type... name`), if any.
    pub varargs: Option<Param>,
}

impl Params {
    /// Names of all parameters, varargs included.
    pub fn names(&self) -> impl Iterator<Item = &EcoString> {
        self.params
            .iter()
            .chain(self.varargs.as_ref())
            .map(|p| &p.name)
    }

    /// Arity used for overload and constructor dispatch (fixed params only).
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// One parameter.
#[derive(Debug)]
pub struct Param {
    /// Parameter name (type and dimensions erased).
    pub name: EcoString,
}

/// A group of field definitions sharing one declared type.
#[derive(Debug)]
pub struct ClassField {
    /// Individual `name [= value]` definitions.
    pub definitions: Vec<VarDefinition>,
    /// The declared type, used for default values.
    pub declared_type: EcoString,
    /// Whether the declaration carried `static`.
    pub is_static: bool,
}

/// A local `var` declaration list.
#[derive(Debug)]
pub struct Var {
    /// Individual definitions.
    pub definitions: Vec<VarDefinition>,
    /// The declared type.
    pub declared_type: EcoString,
}

impl Var {
    /// Declared names, for block-local scope computation.
    pub fn names(&self) -> impl Iterator<Item = &EcoString> {
        self.definitions.iter().map(|def| &def.name)
    }
}

/// One `name [= value]` definition.
///
/// When the source omits the initializer, the declared type's default
/// literal is emitted instead and `is_default` is set.
#[derive(Debug)]
pub struct VarDefinition {
    /// Definition name.
    pub name: EcoString,
    /// Initializer expression, absent for defaulted definitions.
    pub value: Option<Expression>,
    /// Default literal for the declared type (`0`, `false`, `null`, ...).
    pub default_literal: &'static str,
}

impl VarDefinition {
    /// Whether this definition falls back to the type default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.value.is_none()
    }
}

/// A braced block; computes its local-name set at render time so inner
/// statements shadow class members and globals.
#[derive(Debug)]
pub struct StatementsBlock {
    /// Statements inside the braces.
    pub statements: Vec<Statement>,
}

/// `for` head with its loop form.
#[derive(Debug)]
pub struct ForStatement {
    /// The parenthesized loop head.
    pub arg: ForArg,
}

/// The three recognized `for` head forms.
#[derive(Debug)]
pub enum ForArg {
    /// `init; cond; step`.
    Classic {
        /// Initialization statement (a `Var` or expression).
        init: Box<Statement>,
        /// Loop condition.
        cond: Expression,
        /// Step expression.
        step: Expression,
    },
    /// `decl in container` (key enumeration).
    In {
        /// Declaration statement.
        init: Box<Statement>,
        /// The enumerated container.
        container: Expression,
    },
    /// `decl : container` (value iteration via `ObjectIterator`).
    Each {
        /// Declaration statement.
        init: Box<Statement>,
        /// The iterated container.
        container: Expression,
    },
}

/// `catch` head. The parameter name scopes over the sibling block.
#[derive(Debug)]
pub struct CatchStatement {
    /// Catch parameters (one, in well-formed input).
    pub params: Params,
}

/// A control-flow keyword with an optional argument
/// (`if (...)`, `while (...)`, `return`, `else`, ...).
#[derive(Debug)]
pub struct PrefixStatement {
    /// The keyword itself.
    pub keyword: EcoString,
    /// Parenthesized argument for `if`/`switch`/`while`.
    pub arg: Option<Expression>,
}

/// `case expr:`.
#[derive(Debug)]
pub struct SwitchCase {
    /// The case guard expression.
    pub expr: Expression,
}

/// A statement label, emitted verbatim.
#[derive(Debug)]
pub struct Label {
    /// Label text including the colon.
    pub text: String,
}

/// Processed expression text plus the transforms extracted from it.
///
/// The text still contains `'N'` string placeholders (restored at the very
/// end) and `"!N"` transform placeholders, which rendering replaces with
/// the stringified entry of `transforms` *after* identifier context
/// substitution has run over the text.
#[derive(Debug)]
pub struct Expression {
    /// Rewritten expression text.
    pub text: String,
    /// Extracted function/inline-class/inline-object transforms.
    pub transforms: Vec<Transform>,
}

impl Expression {
    /// An expression with no embedded transforms.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            transforms: Vec::new(),
        }
    }
}

/// A transform embedded in expression text as `"!N"`.
#[derive(Debug)]
pub enum Transform {
    /// A function expression.
    Function(Function),
    /// An anonymous class (`new T() {...}`).
    InlineClass(InlineClass),
    /// An inline object literal.
    InlineObject(InlineObject),
}

/// An anonymous class with a synthetic name; emits `new (<body>)`.
#[derive(Debug)]
pub struct InlineClass {
    /// Synthetic name (`Base$classN`).
    pub name: EcoString,
    /// The class body, implementing the named base.
    pub body: ClassBody,
}

/// An inline object literal; emits comma-separated `label: value` pairs.
#[derive(Debug)]
pub struct InlineObject {
    /// Object members in source order.
    pub members: Vec<ObjectMember>,
}

/// One member of an inline object.
#[derive(Debug)]
pub struct ObjectMember {
    /// Member label; unlabeled members carry `None`.
    pub label: Option<String>,
    /// Member value.
    pub value: Expression,
}
