// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! JavaScript rendering.
//!
//! The renderer is the final, read-only traversal of the AST. It walks
//! statements in source order - except classes, which emit first and in
//! descending dependency weight - and threads the name-resolution context
//! stack through every scope it enters. All output is plain string
//! building; the emitted document still carries `'N'` string placeholders
//! and escape sequences, which [`unescape_identifiers`] and
//! [`inject_strings`] clear up as the last stage.

mod classes;
mod context;
mod globals;
mod reinject;

#[cfg(test)]
mod property_tests;
#[cfg(test)]
mod tests;

pub use reinject::{inject_strings, unescape_identifiers};

use std::collections::HashSet;

use ecow::EcoString;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::ast::{
    CatchStatement, Expression, ForArg, ForStatement, Function, GlobalMethod, Params,
    PrefixStatement, Root, Statement, StatementsBlock, Transform, Var, VarDefinition,
};
use crate::options::TransformOptions;
use crate::session::TransformSession;

use context::{Frame, NameUse, ResolutionContext};

/// Renders the parsed document to JavaScript.
#[must_use]
pub fn generate(session: &TransformSession, options: &TransformOptions, root: &Root) -> String {
    debug!(
        classes = session.class_ids().count(),
        atoms = session.atom_count(),
        "rendering"
    );
    let mut emitter = Emitter {
        session,
        options,
        ctx: ResolutionContext::default(),
        iterator_seed: 0,
    };
    emitter.emit_root(root)
}

/// The rendering walker: one per invocation, owning the context stack and
/// the for-each iterator counter.
pub(crate) struct Emitter<'a> {
    pub(crate) session: &'a TransformSession,
    options: &'a TransformOptions,
    pub(crate) ctx: ResolutionContext,
    iterator_seed: usize,
}

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\.\s*)?((?:\b[A-Za-z_]|\$)[\w$]*)(\s*\.\s*([A-Za-z_$][\w$]*)(\s*\()?)?")
        .expect("identifier pattern")
});

static TRANSFORM_SLOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""!(\d+)""#).expect("transform slot pattern"));

impl Emitter<'_> {
    /// Applies the resolution context to every free identifier in `text`.
    pub(crate) fn resolve_text(&self, text: &str) -> String {
        let is_global =
            |name: &str| globals::is_runtime_member(name) || self.options.provides(name);
        let (out, _) = crate::parse::util::replace_all_opt(&IDENTIFIER, text, |caps| {
            if caps.get(1).is_some() {
                // Member access: the head was already resolved.
                return None;
            }
            let use_ = NameUse {
                name: &caps[2],
                member: caps.get(4).map(|m| m.as_str()),
                has_call: caps.get(5).is_some(),
            };
            let resolved = self.ctx.resolve(use_, &is_global);
            let suffix = caps.get(3).map_or("", |m| m.as_str());
            Some(format!("{resolved}{suffix}"))
        });
        out
    }

    fn emit_root(&mut self, root: &Root) -> String {
        let mut classes: Vec<&Statement> = Vec::new();
        let mut others: Vec<&Statement> = Vec::new();
        for statement in &root.statements {
            if matches!(statement, Statement::Class(_)) {
                classes.push(statement);
            } else {
                others.push(statement);
            }
        }
        classes.sort_by_key(|statement| {
            let Statement::Class(decl) = statement else {
                unreachable!("partitioned above");
            };
            std::cmp::Reverse(self.session.class(decl.class_id()).weight)
        });

        self.ctx.push(Frame::Root {
            locals: local_names(&root.statements),
        });
        let mut out = String::from("// this code was autogenerated from PDE\n(function($p) {\n");
        for statement in classes {
            out.push_str(&self.emit_statement(statement));
        }
        out.push('\n');
        for statement in others {
            out.push_str(&self.emit_statement(statement));
        }
        out.push_str("\n})");
        self.ctx.pop();
        out
    }

    pub(crate) fn emit_statement(&mut self, statement: &Statement) -> String {
        match statement {
            Statement::Raw(text) => text.clone(),
            Statement::Expression(expr) => self.emit_expression(expr),
            Statement::Var(var) => self.emit_var(var),
            Statement::Block(block) => self.emit_block(block),
            Statement::For(for_statement) => self.emit_for(for_statement),
            Statement::Catch(catch) => self.emit_catch(catch),
            Statement::Prefix(prefix) => self.emit_prefix(prefix),
            Statement::SwitchCase(case) => {
                format!("case {}:", self.emit_expression(&case.expr))
            }
            Statement::Label(label) => label.text.clone(),
            Statement::Class(decl) => self.emit_class_declaration(decl),
            Statement::Method(method) => self.emit_global_method(method),
            Statement::Function(function) => self.emit_function(function),
        }
    }

    pub(crate) fn emit_expression(&mut self, expr: &Expression) -> String {
        let resolved = self.resolve_text(&expr.text);
        let (out, _) = crate::parse::util::replace_all_opt(&TRANSFORM_SLOT, &resolved, |caps| {
            let index: usize = caps[1].parse().unwrap_or(0);
            expr.transforms
                .get(index)
                .map(|transform| self.emit_transform(transform))
        });
        out
    }

    fn emit_transform(&mut self, transform: &Transform) -> String {
        match transform {
            Transform::Function(function) => self.emit_function(function),
            Transform::InlineClass(inline) => {
                format!("new ({})", self.emit_class_body(&inline.body))
            }
            Transform::InlineObject(object) => {
                let members: Vec<String> = object
                    .members
                    .iter()
                    .map(|member| {
                        let value = self.emit_expression(&member.value);
                        match &member.label {
                            Some(label) => format!("{label}: {value}"),
                            None => value,
                        }
                    })
                    .collect();
                members.join(", ")
            }
        }
    }

    pub(crate) fn emit_function(&mut self, function: &Function) -> String {
        self.ctx
            .push(Frame::Locals(function.params.names().cloned().collect()));
        let body = self.emit_block(&function.body);
        let body = prepend_varargs(&function.params, body);
        self.ctx.pop();
        let name = function
            .name
            .as_ref()
            .map_or(String::new(), |n| format!(" {n}"));
        format!(
            "function{name}{params} {body}",
            params = emit_params(&function.params)
        )
    }

    fn emit_global_method(&mut self, method: &GlobalMethod) -> String {
        self.ctx
            .push(Frame::Locals(method.params.names().cloned().collect()));
        let body = self.emit_block(&method.body);
        let body = prepend_varargs(&method.params, body);
        self.ctx.pop();
        format!(
            "function {name}{params} {body}\n$p.{name} = {name};\n",
            name = method.name,
            params = emit_params(&method.params)
        )
    }

    pub(crate) fn emit_block(&mut self, block: &StatementsBlock) -> String {
        let locals = local_names(&block.statements);
        let pushed = !locals.is_empty();
        if pushed {
            self.ctx.push(Frame::Locals(locals));
        }
        let mut out = String::from("{\n");
        for statement in &block.statements {
            out.push_str(&self.emit_statement(statement));
        }
        out.push_str("\n}");
        if pushed {
            self.ctx.pop();
        }
        out
    }

    fn emit_var(&mut self, var: &Var) -> String {
        let definitions: Vec<String> = var
            .definitions
            .iter()
            .map(|def| self.emit_var_definition(def))
            .collect();
        format!("var {}", definitions.join(","))
    }

    pub(crate) fn emit_var_definition(&mut self, def: &VarDefinition) -> String {
        let value = def
            .value
            .as_ref()
            .map_or_else(|| def.default_literal.to_string(), |v| self.emit_expression(v));
        format!("{} = {}", def.name, value)
    }

    fn emit_for(&mut self, for_statement: &ForStatement) -> String {
        match &for_statement.arg {
            ForArg::Classic { init, cond, step } => {
                let init = self.emit_statement(init);
                let cond = self.emit_expression(cond);
                let step = self.emit_expression(step);
                format!("for ({init}; {cond}; {step})")
            }
            ForArg::In { init, container } => {
                let init = self.emit_statement(init);
                let head = init.find('=').map_or(init.as_str(), |eq| &init[..eq]);
                let container = self.emit_expression(container);
                format!("for ({head} in {container})")
            }
            ForArg::Each { init, container } => {
                let iterator = format!("$it{}", self.iterator_seed);
                self.iterator_seed += 1;
                let name = match &**init {
                    Statement::Var(var) => var
                        .definitions
                        .first()
                        .map(|d| d.name.to_string())
                        .unwrap_or_default(),
                    other => self.emit_statement(other),
                };
                let container = self.emit_expression(container);
                format!(
                    "for (var {iterator} = new $p.ObjectIterator({container}), \
                     {name} = void(0); {iterator}.hasNext() && (({name} = \
                     {iterator}.next()) || true);)"
                )
            }
        }
    }

    fn emit_catch(&mut self, catch: &CatchStatement) -> String {
        format!("catch {}", emit_params(&catch.params))
    }

    fn emit_prefix(&mut self, prefix: &PrefixStatement) -> String {
        match &prefix.arg {
            Some(arg) => format!("{} {}", prefix.keyword, self.emit_expression(arg)),
            None => prefix.keyword.to_string(),
        }
    }
}

/// Renders a parameter list.
pub(crate) fn emit_params(params: &Params) -> String {
    let names: Vec<&str> = params.params.iter().map(|p| p.name.as_str()).collect();
    format!("({})", names.join(", "))
}

/// Binds a varargs parameter from `arguments` at the top of a body block.
pub(crate) fn prepend_varargs(params: &Params, body: String) -> String {
    let Some(varargs) = &params.varargs else {
        return body;
    };
    let binding = format!(
        "{{\nvar {} = Array.prototype.slice.call(arguments, {});\n",
        varargs.name,
        params.arity()
    );
    body.replacen('{', &binding, 1)
}

/// Names a statement list declares, for scope shadowing: `var` lists,
/// `for` heads, catch parameters, and named declarations.
pub(crate) fn local_names(statements: &[Statement]) -> HashSet<EcoString> {
    let mut names = HashSet::new();
    for statement in statements {
        match statement {
            Statement::Var(var) => names.extend(var.names().cloned()),
            Statement::For(for_statement) => {
                let (ForArg::Classic { init, .. }
                | ForArg::In { init, .. }
                | ForArg::Each { init, .. }) = &for_statement.arg;
                if let Statement::Var(var) = &**init {
                    names.extend(var.names().cloned());
                }
            }
            Statement::Catch(catch) => names.extend(catch.params.names().cloned()),
            Statement::Class(decl) => {
                names.insert(decl.name.clone());
            }
            Statement::Method(method) => {
                names.insert(method.name.clone());
            }
            Statement::Function(function) => {
                if let Some(name) = &function.name {
                    names.insert(name.clone());
                }
            }
            _ => {}
        }
    }
    names
}
