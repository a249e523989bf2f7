// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Class and interface emission.
//!
//! A class body becomes an IIFE producing the constructor function. The
//! member order inside is fixed: self pointer, super plumbing, inline
//! functions, inner classes (heaviest first), fields, methods, trailing
//! text, constructors, the arity dispatcher, and finally the one
//! `$constr.apply` that runs the matching overload. Static members and
//! metadata attach to the constructor after the IIFE body.

use std::collections::HashMap;

use ecow::EcoString;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{
    ClassBody, ClassBodyKind, ClassDeclaration, ClassMethod, Constructor, InnerClass,
    InterfaceBody,
};
use crate::session::ClassId;

use super::context::{ClassFrame, Frame};
use super::{Emitter, emit_params, prepend_varargs};

static SUPER_OR_CONSTR_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(superCstr|constr)\b").expect("constructor call pattern"));

impl Emitter<'_> {
    pub(crate) fn emit_class_declaration(&mut self, decl: &ClassDeclaration) -> String {
        let body = self.emit_class_kind(&decl.body);
        format!(
            "var {name} = {body};\n$p.{name} = {name};\n",
            name = decl.name
        )
    }

    pub(crate) fn emit_class_kind(&mut self, kind: &ClassBodyKind) -> String {
        match kind {
            ClassBodyKind::Class(body) => self.emit_class_body(body),
            ClassBodyKind::Interface(body) => self.emit_interface_body(body),
        }
    }

    /// Scope depth of a class: one per enclosing class owner, so the
    /// outermost body uses `$this_1`.
    fn scope_depth(&self, id: ClassId) -> usize {
        let mut depth = 1;
        let mut scope = self.session.class(id).scope;
        while let Some(outer) = scope {
            depth += 1;
            scope = self.session.class(outer).scope;
        }
        depth
    }

    fn class_frame(&self, body: &ClassBody, self_id: &str) -> ClassFrame {
        let mut fields = HashMap::new();
        for field in &body.fields {
            for def in &field.definitions {
                fields.insert(def.name.clone(), field.is_static);
            }
        }
        let methods = body
            .methods
            .iter()
            .map(|m| (m.name.clone(), m.is_static))
            .collect();
        let inners = body
            .inner_classes
            .iter()
            .map(|inner| inner.name.clone())
            .collect();
        ClassFrame {
            class_name: body.name.clone(),
            self_id: self_id.to_string(),
            fields,
            methods,
            inners,
        }
    }

    #[allow(clippy::too_many_lines)]
    pub(crate) fn emit_class_body(&mut self, body: &ClassBody) -> String {
        let self_id = format!("$this_{}", self.scope_depth(body.id));
        self.ctx
            .push(Frame::Class(self.class_frame(body, &self_id)));

        let name = &body.name;
        let mut result = format!("var {self_id} = this;\n");
        let mut statics = String::new();
        let mut metadata = String::new();

        if let Some(base_name) = &body.base_name {
            let base = self.resolve_text(base_name);
            result.push_str(&format!("var $super = {{ $upcast: {self_id} }};\n"));
            result.push_str(&format!(
                "function $superCstr(){{{base}.apply($super,arguments);\
                 if(!('$self' in $super)) $p.extendClassChain($super)}}\n"
            ));
            metadata.push_str(&format!("{name}.$base = {base};\n"));
            if self.session.class(body.id).base.is_some() {
                metadata.push_str(&format!("$p.extendStaticMembers({name}, {base});\n"));
            }
        } else {
            result.push_str(&format!(
                "function $superCstr(){{$p.extendClassChain({self_id})}}\n"
            ));
        }

        let resolved = self.resolved_interfaces(body.id, &body.interface_names);
        for interface in &resolved {
            metadata.push_str(&format!("$p.extendInterfaceMembers({name}, {interface});\n"));
        }
        if !body.interface_names.is_empty() {
            metadata.push_str(&format!(
                "{name}.$interfaces = [{}];\n",
                resolved.join(", ")
            ));
        }

        for function in &body.functions {
            result.push_str(&self.emit_function(function));
            result.push('\n');
        }

        for inner in self.sorted_inners(&body.inner_classes) {
            let emitted = self.emit_class_kind(&inner.body);
            if inner.is_static {
                statics.push_str(&format!("{name}.{} = {emitted};\n", inner.name));
                result.push_str(&format!(
                    "{self_id}.{inner_name} = {name}.{inner_name};\n",
                    inner_name = inner.name
                ));
            } else {
                result.push_str(&format!("{self_id}.{} = {emitted};\n", inner.name));
            }
        }

        for field in &body.fields {
            if field.is_static {
                for def in &field.definitions {
                    let rendered = self.emit_var_definition(def);
                    statics.push_str(&format!("{name}.{rendered};\n"));
                    result.push_str(&format!(
                        "$p.defineProperty({self_id}, '{field_name}', {{ \
                         get: function(){{return {name}.{field_name}}}, \
                         set: function(value){{{name}.{field_name} = value}} }});\n",
                        field_name = def.name
                    ));
                }
            } else {
                for def in &field.definitions {
                    let rendered = self.emit_var_definition(def);
                    result.push_str(&format!("{self_id}.{rendered};\n"));
                }
            }
        }

        let mut overloads: HashMap<EcoString, usize> = HashMap::new();
        for method in &body.methods {
            let seen = overloads.entry(method.name.clone()).or_insert(0);
            *seen += 1;
            let method_id = if *seen == 1 {
                format!("{}${}", method.name, method.params.arity())
            } else {
                format!("{}${}_{}", method.name, method.params.arity(), seen)
            };
            let has_varargs = method.params.varargs.is_some();
            let rendered = self.emit_class_method(method, &method_id);
            let register = |target: &str| {
                format!(
                    "$p.addMethod({target}, '{}', {method_id}, {has_varargs});\n",
                    method.name
                )
            };
            if method.is_static {
                statics.push_str(&rendered);
                statics.push_str(&register(name));
                result.push_str(&register(&self_id));
            } else {
                result.push_str(&rendered);
                result.push_str(&register(&self_id));
            }
        }

        let misc = body.trailing_misc.trim();
        if !misc.is_empty() {
            result.push_str(misc);
            result.push('\n');
        }

        for cstr in &body.cstrs {
            result.push_str(&self.emit_constructor(cstr));
        }
        result.push_str("function $constr() {\n");
        for (i, cstr) in body.cstrs.iter().enumerate() {
            let arity = cstr.params.arity();
            let op = if cstr.params.varargs.is_some() {
                ">="
            } else {
                "==="
            };
            if i > 0 {
                result.push_str(" else ");
            }
            result.push_str(&format!(
                "if(arguments.length {op} {arity}) {{ $constr_{arity}.apply({self_id}, arguments); }}"
            ));
        }
        if !body.cstrs.is_empty() {
            result.push_str(" else ");
        }
        result.push_str("$superCstr();\n}\n");
        result.push_str("$constr.apply(null, arguments);\n");

        self.ctx.pop();
        format!(
            "(function() {{\nfunction {name}() {{\n{result}}}\n{statics}{metadata}return {name};\n}})()"
        )
    }

    pub(crate) fn emit_interface_body(&mut self, body: &InterfaceBody) -> String {
        let self_id = format!("$this_{}", self.scope_depth(body.id));
        let mut fields = HashMap::new();
        for field in &body.fields {
            for def in &field.definitions {
                fields.insert(def.name.clone(), true);
            }
        }
        self.ctx.push(Frame::Class(ClassFrame {
            class_name: body.name.clone(),
            self_id,
            fields,
            methods: HashMap::new(),
            inners: body
                .inner_classes
                .iter()
                .map(|inner| inner.name.clone())
                .collect(),
        }));

        let name = &body.name;
        let mut statics = String::new();
        let mut metadata = String::new();

        for inner in self.sorted_inners(&body.inner_classes) {
            let emitted = self.emit_class_kind(&inner.body);
            statics.push_str(&format!("{name}.{} = {emitted};\n", inner.name));
        }
        for field in &body.fields {
            for def in &field.definitions {
                let rendered = self.emit_var_definition(def);
                statics.push_str(&format!("{name}.{rendered};\n"));
            }
        }

        let resolved = self.resolved_interfaces(body.id, &body.base_names);
        for interface in &resolved {
            metadata.push_str(&format!("$p.extendInterfaceMembers({name}, {interface});\n"));
        }
        if !body.base_names.is_empty() {
            metadata.push_str(&format!(
                "{name}.$interfaces = [{}];\n",
                resolved.join(", ")
            ));
        }
        let method_list: Vec<String> = body
            .method_names
            .iter()
            .map(|m| format!("'{m}'"))
            .collect();
        metadata.push_str(&format!(
            "{name}.$methods = [{}];\n",
            method_list.join(", ")
        ));
        metadata.push_str(&format!("{name}.$isInterface = true;\n"));

        self.ctx.pop();
        format!(
            "(function() {{\nfunction {name}() {{ throw 'Unable to create an instance of the interface'; }}\n\
             {statics}{metadata}return {name};\n}})()"
        )
    }

    /// Interface names that resolved in the registry, rendered through the
    /// current context. Unresolved names are omitted.
    fn resolved_interfaces(&self, id: ClassId, names: &[EcoString]) -> Vec<String> {
        let record = self.session.class(id);
        names
            .iter()
            .enumerate()
            .filter(|(i, _)| record.interfaces.get(*i).copied().flatten().is_some())
            .map(|(_, name)| self.resolve_text(name))
            .collect()
    }

    fn sorted_inners<'b>(&self, inners: &'b [InnerClass]) -> Vec<&'b InnerClass> {
        let mut sorted: Vec<&InnerClass> = inners.iter().collect();
        sorted.sort_by_key(|inner| std::cmp::Reverse(self.session.class(inner.class_id()).weight));
        sorted
    }

    fn emit_class_method(&mut self, method: &ClassMethod, method_id: &str) -> String {
        self.ctx
            .push(Frame::Locals(method.params.names().cloned().collect()));
        let body = self.emit_block(&method.body);
        let body = prepend_varargs(&method.params, body);
        self.ctx.pop();
        format!(
            "function {method_id}{params} {body}\n",
            params = emit_params(&method.params)
        )
    }

    fn emit_constructor(&mut self, cstr: &Constructor) -> String {
        self.ctx
            .push(Frame::Locals(cstr.params.names().cloned().collect()));
        let body = self.emit_block(&cstr.body);
        let body = prepend_varargs(&cstr.params, body);
        self.ctx.pop();
        // A constructor that neither chains to another overload nor calls
        // the super constructor still has to run the base chain.
        let body = if SUPER_OR_CONSTR_CALL.is_match(&body) {
            body
        } else {
            body.replacen('{', "{\n$superCstr();", 1)
        };
        format!(
            "function $constr_{arity}{params} {body}\n",
            arity = cstr.params.arity(),
            params = emit_params(&cstr.params)
        )
    }
}
