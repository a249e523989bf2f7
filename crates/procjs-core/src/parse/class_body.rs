// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Class and interface body assembly.
//!
//! A class body atom is taken apart in three steps: declaration extraction
//! folds member headers into `D`/`E`/`G`/`H` atoms, the placeholders are
//! collected out of the residue, and what is left splits on `;` into field
//! declarations and free-form trailing text. Members parse bottom-up with
//! the session's `current_scope` pointing at the class being built, so
//! nested registrations (inner classes, anonymous classes in method bodies)
//! link to the right owner.
//!
//! Every atom here was created by one of the extraction patterns, so a
//! header that fails to re-parse is a transformer bug: debug builds
//! assert, release builds surface [`TransformError::Internal`].

use ecow::EcoString;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{
    ClassBody, ClassBodyKind, ClassDeclaration, ClassField, ClassMethod, Constructor,
    GlobalMethod, InnerClass, InterfaceBody,
};
use crate::error::TransformError;
use crate::session::{ClassId, ClassRecord, TransformSession};

use super::declarations::{
    CLASS_RE, METHOD_RE, extract_constructors, extract_declarations, match_field,
};
use super::expressions::{transform_function, transform_params};
use super::statements::{transform_statements_block, transform_var_definition};
use super::util::{atom_index, default_value_for_type, split_trim, try_replace_all};

static MEMBER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([DEGH])(\d+)""#).expect("member token pattern"));

static CONSTRUCTOR_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""B(\d+)"(?:[^"]|"C\d+")*"A(\d+)""#).expect("constructor parts"));

static NAME_LIST_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*").expect("name list pattern"));

/// A parsed class/interface header.
struct ClassHeader {
    is_static: bool,
    is_interface: bool,
    name: EcoString,
    extends_names: Vec<EcoString>,
    implements_names: Vec<EcoString>,
    body_index: usize,
}

fn parse_class_header(text: &str) -> Result<ClassHeader, TransformError> {
    let Some(caps) = CLASS_RE.captures(text) else {
        debug_assert!(false, "malformed class atom: {text}");
        return Err(TransformError::internal(format!(
            "malformed class atom: {text}"
        )));
    };
    let split_names = |clause: Option<regex::Match<'_>>, keyword: &str| -> Vec<EcoString> {
        clause
            .map(|m| {
                let names = m.as_str().trim();
                let names = names.strip_prefix(keyword).unwrap_or(names);
                NAME_LIST_SEPARATOR
                    .split(names.trim())
                    .filter(|n| !n.is_empty())
                    .map(Into::into)
                    .collect()
            })
            .unwrap_or_default()
    };
    Ok(ClassHeader {
        is_static: caps[1].contains("static"),
        is_interface: &caps[2] == "interface",
        name: caps[3].into(),
        extends_names: split_names(caps.get(4), "extends"),
        implements_names: split_names(caps.get(5), "implements"),
        body_index: atom_index(&caps[6])?,
    })
}

/// Parses an `E` atom at the top level into a class/interface declaration.
pub fn transform_global_class(
    session: &mut TransformSession,
    text: &str,
) -> Result<ClassDeclaration, TransformError> {
    let (name, _, body) = transform_any_class(session, text)?;
    Ok(ClassDeclaration { name, body })
}

/// Parses an `E` atom inside a class body into an inner class.
pub(crate) fn transform_inner_class(
    session: &mut TransformSession,
    text: &str,
) -> Result<InnerClass, TransformError> {
    let (name, is_static, body) = transform_any_class(session, text)?;
    Ok(InnerClass {
        name,
        is_static,
        body,
    })
}

fn transform_any_class(
    session: &mut TransformSession,
    text: &str,
) -> Result<(EcoString, bool, ClassBodyKind), TransformError> {
    let header = parse_class_header(text)?;
    let enclosing = session.current_scope;
    let id = session.register_class(ClassRecord::new(
        header.name.clone(),
        header.is_interface,
        enclosing,
    ));
    session.current_scope = Some(id);
    let body_text = session.atom_text(header.body_index)?.to_string();
    let body = if header.is_interface {
        transform_interface_body(session, &body_text, id, &header.name, header.extends_names)
            .map(ClassBodyKind::Interface)
    } else {
        transform_class_body(
            session,
            &body_text,
            id,
            &header.name,
            header.extends_names.into_iter().next(),
            header.implements_names,
        )
        .map(ClassBodyKind::Class)
    };
    session.current_scope = enclosing;
    Ok((header.name, header.is_static, body?))
}

/// Assembles a class body from its `A` atom content.
pub(crate) fn transform_class_body(
    session: &mut TransformSession,
    body: &str,
    id: ClassId,
    name: &str,
    base_name: Option<EcoString>,
    interface_names: Vec<EcoString>,
) -> Result<ClassBody, TransformError> {
    {
        let record = session.class_mut(id);
        record.base_name = base_name.clone();
        record.interface_names = interface_names.clone();
        record.interfaces = vec![None; interface_names.len()];
    }

    let inner = body
        .strip_prefix('{')
        .and_then(|b| b.strip_suffix('}'))
        .unwrap_or(body);
    let decls = extract_declarations(session, inner);
    let decls = extract_constructors(session, &decls, name);

    let mut method_atoms = Vec::new();
    let mut class_atoms = Vec::new();
    let mut cstr_atoms = Vec::new();
    let mut function_atoms = Vec::new();
    let (residue, _) = try_replace_all(&MEMBER_TOKEN, &decls, |caps| {
        let index = atom_index(&caps[0])?;
        match &caps[1] {
            "D" => method_atoms.push(index),
            "E" => class_atoms.push(index),
            "G" => cstr_atoms.push(index),
            _ => function_atoms.push(index),
        }
        Ok(Some(String::new()))
    })?;

    let (fields, trailing_misc) = split_fields(session, &residue)?;

    let functions = function_atoms
        .into_iter()
        .map(|i| {
            let text = session.atom_text(i)?.to_string();
            transform_function(session, &text)
        })
        .collect::<Result<Vec<_>, TransformError>>()?;
    let methods = method_atoms
        .into_iter()
        .map(|i| {
            let text = session.atom_text(i)?.to_string();
            transform_class_method(session, &text)
        })
        .collect::<Result<Vec<_>, TransformError>>()?;
    let cstrs = cstr_atoms
        .into_iter()
        .map(|i| {
            let text = session.atom_text(i)?.to_string();
            transform_constructor(session, &text)
        })
        .collect::<Result<Vec<_>, TransformError>>()?;
    let inner_classes = class_atoms
        .into_iter()
        .map(|i| {
            let text = session.atom_text(i)?.to_string();
            transform_inner_class(session, &text)
        })
        .collect::<Result<Vec<_>, TransformError>>()?;

    Ok(ClassBody {
        id,
        name: name.into(),
        base_name,
        interface_names,
        functions,
        inner_classes,
        fields,
        methods,
        cstrs,
        trailing_misc,
    })
}

/// Assembles an interface body: method names, constant fields, nested types.
pub(crate) fn transform_interface_body(
    session: &mut TransformSession,
    body: &str,
    id: ClassId,
    name: &str,
    base_names: Vec<EcoString>,
) -> Result<InterfaceBody, TransformError> {
    {
        let record = session.class_mut(id);
        record.interface_names = base_names.clone();
        record.interfaces = vec![None; base_names.len()];
    }

    let inner = body
        .strip_prefix('{')
        .and_then(|b| b.strip_suffix('}'))
        .unwrap_or(body);
    let decls = extract_declarations(session, inner);

    let mut method_names = Vec::new();
    let mut class_atoms = Vec::new();
    let (residue, _) = try_replace_all(&MEMBER_TOKEN, &decls, |caps| {
        let index = atom_index(&caps[0])?;
        match &caps[1] {
            "D" => {
                if let Some(m) = METHOD_RE.captures(session.atom_text(index)?) {
                    method_names.push(EcoString::from(&m[3]));
                }
            }
            "E" => class_atoms.push(index),
            _ => {}
        }
        Ok(Some(String::new()))
    })?;

    let (mut fields, _) = split_fields(session, &residue)?;
    for field in &mut fields {
        field.is_static = true;
    }
    let inner_classes = class_atoms
        .into_iter()
        .map(|i| {
            let text = session.atom_text(i)?.to_string();
            transform_inner_class(session, &text)
        })
        .collect::<Result<Vec<_>, TransformError>>()?;

    Ok(InterfaceBody {
        id,
        name: name.into(),
        base_names,
        method_names,
        fields,
        inner_classes,
    })
}

/// Splits extraction residue on `;` into field declarations and free-form
/// trailing text.
fn split_fields(
    session: &mut TransformSession,
    residue: &str,
) -> Result<(Vec<ClassField>, String), TransformError> {
    let mut fields = Vec::new();
    let mut misc = String::new();
    let segments: Vec<&str> = residue.split(';').collect();
    let last = segments.len().saturating_sub(1);
    for (i, segment) in segments.iter().enumerate() {
        let (_, middle, _) = split_trim(segment);
        if let Some(field) = match_field(middle) {
            let default_literal = default_value_for_type(field.type_name.trim());
            let is_static = field.modifiers.contains("static");
            let definitions = field
                .definitions
                .split(',')
                .map(|def| transform_var_definition(session, def, default_literal))
                .collect::<Result<Vec<_>, TransformError>>()?;
            fields.push(ClassField {
                definitions,
                declared_type: field.type_name.trim().into(),
                is_static,
            });
        } else {
            misc.push_str(segment);
            if i != last {
                misc.push(';');
            }
        }
    }
    Ok((fields, misc))
}

/// Parses a `D` atom inside a class into a method.
fn transform_class_method(
    session: &mut TransformSession,
    text: &str,
) -> Result<ClassMethod, TransformError> {
    let Some(caps) = METHOD_RE.captures(text) else {
        debug_assert!(false, "malformed method atom: {text}");
        return Err(TransformError::internal(format!(
            "malformed method atom: {text}"
        )));
    };
    let is_static = caps[1].contains("static");
    let name = EcoString::from(&caps[3]);
    let params_text = session.atom_text(atom_index(&caps[4])?)?.to_string();
    let body_text = if &caps[6] == ";" {
        "{}".to_string()
    } else {
        session.atom_text(atom_index(&caps[6])?)?.to_string()
    };
    Ok(ClassMethod {
        name,
        params: transform_params(&params_text),
        body: transform_statements_block(session, &body_text)?,
        is_static,
    })
}

/// Parses a `D` atom at the top level into a sketch-level method.
pub fn transform_global_method(
    session: &mut TransformSession,
    text: &str,
) -> Result<GlobalMethod, TransformError> {
    let method = transform_class_method(session, text)?;
    Ok(GlobalMethod {
        name: method.name,
        params: method.params,
        body: method.body,
    })
}

/// Parses a `G` atom into a constructor.
fn transform_constructor(
    session: &mut TransformSession,
    text: &str,
) -> Result<Constructor, TransformError> {
    let Some(caps) = CONSTRUCTOR_PARTS.captures(text) else {
        debug_assert!(false, "malformed constructor atom: {text}");
        return Err(TransformError::internal(format!(
            "malformed constructor atom: {text}"
        )));
    };
    let params_text = session.atom_text(atom_index(&caps[1])?)?.to_string();
    let body_text = session.atom_text(atom_index(&caps[2])?)?.to_string();
    Ok(Constructor {
        params: transform_params(&params_text),
        body: transform_statements_block(session, &body_text)?,
    })
}
