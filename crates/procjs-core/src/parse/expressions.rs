// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression lowering.
//!
//! Expressions stay textual: [`transform_expression`] expands bracket atoms
//! back into their content, runs the rewrite ladder over every nesting
//! level, and extracts the three transform kinds (functions, anonymous
//! classes, inline objects) into `"!N"` placeholders restored at render
//! time.
//!
//! The ladder's rewrites are regex-driven and applied to closure: the
//! prototype-method and `instanceof` rewrites loop until a pass produces no
//! change, because rewriting an outer call buries the inner one in a fresh
//! atom that the next expansion level revisits.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::ast::{
    Expression, Function, InlineClass, InlineObject, ObjectMember, Param, Params, Transform,
};
use crate::error::TransformError;
use crate::session::{AtomKind, ClassRecord, TransformSession};

use super::class_body;
use super::statements;
use super::util::{atom_index, replace_all_opt, split_trim, try_replace_all};

const DOTTED: &str = r"[A-Za-z_$][\w$]*\b(?:\s*\.\s*[A-Za-z_$][\w$]*\b)*";

static NEW_ARRAY_WITH_INIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"\bnew\s+{DOTTED}(?:\s*"C\d+")+\s*("A\d+")"#
    ))
    .expect("array initializer pattern")
});

static NEW_INLINE_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r#"\bnew\s+{DOTTED}\s*"B\d+"\s*"A\d+""#)).expect("inline class pattern")
});

static FUNCTION_EXPR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bfunction(?:\s+[A-Za-z_$][\w$]*)?\s*"B\d+"\s*"A\d+""#)
        .expect("function expression pattern")
});

static NEW_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r#"\bnew\s+({DOTTED})((?:\s*"C\d+")+)"#)).expect("array pattern")
});

static ARRAY_DIM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""C(\d+)""#).expect("dimension pattern"));

static DOT_LENGTH_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\.\s*length)\s*"B\d+""#).expect("length pattern"));

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([0-9A-Fa-f]{6})\b").expect("color pattern"));

static CAST_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""B(\d+)"(\s*(?:['\w$]|"B))"#).expect("cast candidate pattern"));

static CAST_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r#"^\(\s*{DOTTED}\s*(?:"C\d+"\s*)*\)$"#)).expect("cast shape pattern")
});

static INT_CAST_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\s*int\s*\)$").expect("int cast shape pattern"));

static EMPTY_DIM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\s*\]$").expect("empty dimension pattern"));

static EMPTY_DIM_ANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*\]").expect("any empty dimension pattern"));

static DIM_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\]\s*\[\s*").expect("dimension separator pattern"));

static INT_CAST_ARG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(int\)([^,\])}?:*+\-/^|%&~<>=]+)").expect("int cast pattern")
});

static SUPER_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bsuper(\s*"B\d+")"#).expect("super call pattern"));

static SUPER_MEMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bsuper(\s*\.)").expect("super member pattern"));

static THIS_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bthis(\s*"B\d+")"#).expect("this call pattern"));

static LEADING_ZEROS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b0+((\d*)(?:\.\d*)?(?:[eE][+\-]?\d+)?[fF]?)\b").expect("leading zero pattern")
});

static FLOAT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\.?\d+\.?)[fF]\b").expect("float suffix pattern"));

static MOD_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S)%([^=\s])").expect("modulo pattern"));

static STATE_GLOBALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(frameRate|keyPressed|mousePressed)\b(\s*"B)?"#).expect("state global pattern")
});

static PARSE_PRIMITIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(boolean|byte|char|float|int)\s*("B\d+")"#).expect("parse primitive pattern")
});

static PIXELS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bpixels\b\s*(("C(\d+)")|\.\s*length)?(\s*=(=?)([^,\])}]+))?"#)
        .expect("pixels pattern")
});

static PROTOTYPE_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"((?:'\d+'|\b[A-Za-z_$][\w$]*\s*(?:"[BC]\d+")*)\s*\.\s*(?:[A-Za-z_$][\w$]*\s*(?:"[BC]\d+"\s*)*\.\s*)*)({METHODS})\s*"B(\d+)""#,
        METHODS = "replaceAll|replaceFirst|replace|contains|equalsIgnoreCase|equals|hashCode|toCharArray|printStackTrace|split|startsWith|endsWith|codePointAt|matches"
    ))
    .expect("prototype method pattern")
});

static INSTANCEOF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"((?:'\d+'|\b[A-Za-z_$][\w$]*\s*(?:"[BC]\d+")*)\s*(?:\.\s*[A-Za-z_$][\w$]*\s*(?:"[BC]\d+"\s*)*)*)instanceof\s+({DOTTED})"#
    ))
    .expect("instanceof pattern")
});

static TRAILING_DOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\s*$").expect("trailing dot pattern"));

static INLINE_OBJECT_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{\s*(?:[A-Za-z_$][\w$]*|'\d+')\s*:").expect("object start pattern")
});

static ATOM_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([ABC])(\d+)""#).expect("atom token pattern"));

static TRANSFORM_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b([A-Za-z_$][\w$]*)\s*"B(\d+)"\s*"A(\d+)""#).expect("transform parts pattern")
});

static INLINE_CLASS_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r#"\bnew\s+({DOTTED})\s*"B\d+"\s*"A(\d+)""#))
        .expect("inline class parts pattern")
});

static PARAM_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_$][\w$]*)\s*(?:"C\d+"\s*)*$"#).expect("parameter name pattern")
});

/// Runs the targeted rewrite ladder over one nesting level of expression
/// text. Creates atoms as a side effect (arrays, rewritten calls, inline
/// classes, functions).
#[allow(clippy::too_many_lines)]
pub(crate) fn pre_expression_transform(
    session: &mut TransformSession,
    text: &str,
) -> Result<String, TransformError> {
    // new T[] {...} keeps only the initializer.
    let (s, _) = replace_all_opt(&NEW_ARRAY_WITH_INIT, text, |caps| Some(caps[1].to_string()));

    // new T() { body } becomes an anonymous class atom.
    let (s, _) = replace_all_opt(&NEW_INLINE_CLASS, &s, |caps| {
        Some(session.add_atom(AtomKind::InlineClass, &caps[0]))
    });

    // function literals become atoms restored as transforms.
    let (s, _) = replace_all_opt(&FUNCTION_EXPR, &s, |caps| {
        Some(session.add_atom(AtomKind::Function, &caps[0]))
    });

    // new T[e][f] becomes a host array construction.
    let (s, _) = try_replace_all(&NEW_ARRAY, &s, |caps| {
        let type_name = caps[1].to_string();
        let dims = caps[2].to_string();
        let (dims, _) = try_replace_all(&ARRAY_DIM, &dims, |dim| {
            Ok(Some(session.atom_text(atom_index(&dim[0])?)?.to_string()))
        })?;
        // "[5][ ]" -> "[5][null]" -> "[5, null]" -> "{5, null}"
        let dims = EMPTY_DIM_ANY.replace_all(&dims, "[null]");
        let dims = DIM_SEPARATOR.replace_all(&dims, ", ");
        let inner = dims.trim();
        let inner = inner
            .strip_prefix('[')
            .and_then(|d| d.strip_suffix(']'))
            .unwrap_or(inner);
        let initializer = session.add_atom(AtomKind::Brace, format!("{{{inner}}}"));
        let call = session.add_atom(AtomKind::Paren, format!("('{type_name}', {initializer})"));
        Ok(Some(format!("$p.createJavaArray{call}")))
    })?;

    // Array .length() is a property, not a call.
    let (s, _) = replace_all_opt(&DOT_LENGTH_CALL, &s, |caps| Some(caps[1].to_string()));

    // #RRGGBB color literals.
    let (s, _) = replace_all_opt(&HEX_COLOR, &s, |caps| Some(format!("0xFF{}", &caps[1])));

    // Delete (T) casts; (int) survives as a marker for the next rewrite.
    let (s, _) = try_replace_all(&CAST_CANDIDATE, &s, |caps| {
        let atom = session.atom_text(atom_index(&caps[1])?)?;
        if !CAST_SHAPE.is_match(atom) {
            return Ok(None);
        }
        if INT_CAST_SHAPE.is_match(atom) {
            return Ok(Some(format!("(int){}", &caps[2])));
        }
        if let Some(dim) = ARRAY_DIM.captures(atom) {
            let dim_atom = session.atom_text(atom_index(&dim[0])?)?;
            if !EMPTY_DIM.is_match(dim_atom) {
                return Ok(None);
            }
        }
        Ok(Some(caps[2].to_string()))
    })?;

    // (int)x becomes an explicit truncation helper.
    let (s, _) = replace_all_opt(&INT_CAST_ARG, &s, |caps| {
        let (left, middle, right) = split_trim(&caps[1]);
        Some(format!("{left}__int_cast({middle}){right}"))
    });

    // Super constructor calls and member access.
    let (s, _) = replace_all_opt(&SUPER_CALL, &s, |caps| {
        Some(format!("$superCstr{}", &caps[1]))
    });
    let (s, _) = replace_all_opt(&SUPER_MEMBER, &s, |caps| Some(format!("$super{}", &caps[1])));

    // Numeric literal normalization.
    let (s, _) = replace_all_opt(&LEADING_ZEROS, &s, |caps| {
        let without_zeros = &caps[1];
        let int_part = &caps[2];
        if without_zeros == int_part {
            return None; // octal-looking integer, leave it alone
        }
        Some(if int_part.is_empty() {
            format!("0{without_zeros}")
        } else {
            without_zeros.to_string()
        })
    });
    let (s, _) = replace_all_opt(&FLOAT_SUFFIX, &s, |caps| Some(caps[1].to_string()));

    // Keep % away from adjoining tokens.
    let (s, _) = replace_all_opt(&MOD_SPACING, &s, |caps| {
        Some(format!("{} % {}", &caps[1], &caps[2]))
    });

    // frameRate the value vs frameRate() the call, and friends.
    let (s, _) = replace_all_opt(&STATE_GLOBALS, &s, |caps| {
        if caps.get(2).is_some() {
            return None;
        }
        Some(format!("__{}", &caps[1]))
    });

    // boolean(x) and friends parse, they do not cast.
    let (s, _) = replace_all_opt(&PARSE_PRIMITIVE, &s, |caps| {
        let name = &caps[1];
        let mut chars = name.chars();
        let first = chars.next().unwrap_or_default().to_ascii_uppercase();
        Some(format!("parse{first}{}{}", chars.as_str(), &caps[2]))
    });

    // The pixels proxy.
    let (s, _) = try_replace_all(&PIXELS, &s, |caps| {
        let index_atom = caps.get(3).map(|m| m.as_str().to_string());
        let is_length = caps.get(1).is_some() && index_atom.is_none();
        let assign = caps.get(4).map(|m| m.as_str().to_string());
        let is_comparison = caps.get(5).is_some_and(|m| m.as_str() == "=");
        let value = caps.get(6).map(|m| m.as_str().to_string());

        if let Some(index) = index_atom {
            let content = session.atom_text(atom_index(&index)?)?.to_string();
            let inner = content
                .strip_prefix('[')
                .and_then(|c| c.strip_suffix(']'))
                .unwrap_or(&content)
                .to_string();
            if let (Some(value), false) = (value, is_comparison) {
                let call = session.add_atom(AtomKind::Paren, format!("({inner},{value})"));
                return Ok(Some(format!("pixels.setPixel{call}")));
            }
            let call = session.add_atom(AtomKind::Paren, format!("({inner})"));
            let tail = if is_comparison {
                assign.unwrap_or_default()
            } else {
                String::new()
            };
            return Ok(Some(format!("pixels.getPixel{call}{tail}")));
        }
        if is_length {
            let call = session.add_atom(AtomKind::Paren, "()");
            return Ok(Some(format!("pixels.getLength{call}")));
        }
        if let (Some(value), false) = (value, is_comparison) {
            let call = session.add_atom(AtomKind::Paren, format!("({value})"));
            return Ok(Some(format!("pixels.set{call}")));
        }
        let call = session.add_atom(AtomKind::Paren, "()");
        Ok(Some(format!(
            "pixels.toArray{call}{}",
            assign.unwrap_or_default()
        )))
    })?;

    // String/Object method renames, to closure.
    let mut s = s;
    loop {
        let (next, changed) = try_replace_all(&PROTOTYPE_METHOD, &s, |caps| {
            let subject = TRAILING_DOT.replace(&caps[1], "").into_owned();
            let method = caps[2].to_string();
            let args = session.atom_text(atom_index(&caps[3])?)?;
            let inner = args
                .strip_prefix('(')
                .and_then(|a| a.strip_suffix(')'))
                .unwrap_or(args);
            let (_, middle, _) = split_trim(inner);
            let call = if middle.is_empty() {
                format!("({subject})")
            } else {
                format!("({subject},{middle})")
            };
            let call = session.add_atom(AtomKind::Paren, call);
            Ok(Some(format!("__{method}{call}")))
        })?;
        s = next;
        if !changed {
            break;
        }
    }

    // instanceof, to closure.
    loop {
        let (next, changed) = replace_all_opt(&INSTANCEOF, &s, |caps| {
            let subject = caps[1].trim().to_string();
            let type_name = caps[2].to_string();
            let call = session.add_atom(AtomKind::Paren, format!("({subject}, {type_name})"));
            Some(format!("__instanceof{call}"))
        });
        s = next;
        if !changed {
            break;
        }
    }

    // this(...) chains to another constructor overload.
    let (s, _) = replace_all_opt(&THIS_CALL, &s, |caps| Some(format!("$constr{}", &caps[1])));
    Ok(s)
}

/// Recursively expands bracket atoms back into text, classifying brace
/// atoms as inline objects or array literals, and rewriting every level.
pub(crate) fn expand_expression(
    session: &mut TransformSession,
    expr: &str,
) -> Result<String, TransformError> {
    if expr.starts_with('(') || expr.starts_with('[') {
        let inner = &expr[1..expr.len() - 1];
        let expanded = expand_expression(session, inner)?;
        let open = &expr[..1];
        let close = &expr[expr.len() - 1..];
        return Ok(format!("{open}{expanded}{close}"));
    }
    if expr.starts_with('{') {
        let inner = expr[1..expr.len() - 1].to_string();
        if INLINE_OBJECT_START.is_match(expr) {
            let placeholder = session.add_atom(AtomKind::InlineObject, inner);
            return Ok(format!("{{{placeholder}}}"));
        }
        let expanded = expand_expression(session, &inner)?;
        return Ok(format!("[{expanded}]"));
    }
    let (left, middle, right) = split_trim(expr);
    let transformed = pre_expression_transform(session, middle)?;
    let (expanded, _) = try_replace_all(&ATOM_TOKEN, &transformed, |caps| {
        let content = session.atom_text(atom_index(&caps[0])?)?.to_string();
        Ok(Some(expand_expression(session, &content)?))
    })?;
    Ok(format!("{left}{expanded}{right}"))
}

static H_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r#""H(\d+)""#).expect("H token pattern"));
static F_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r#""F(\d+)""#).expect("F token pattern"));
static I_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r#""I(\d+)""#).expect("I token pattern"));

/// Lowers one expression: expansion, the rewrite ladder, then extraction
/// of function/inline-class/inline-object transforms into `"!N"` slots.
///
/// # Errors
///
/// Surfaces [`TransformError::Internal`] when a placeholder fails to
/// resolve (a transformer bug, not an input error).
pub fn transform_expression(
    session: &mut TransformSession,
    expr: &str,
) -> Result<Expression, TransformError> {
    let expanded = expand_expression(session, expr)?;
    let mut transforms = Vec::new();

    let mut replace_kind = |session: &mut TransformSession,
                            text: &str,
                            re: &Regex,
                            letter: char|
     -> Result<String, TransformError> {
        let (out, _) = try_replace_all(re, text, |caps: &Captures<'_>| {
            let content = session.atom_text(atom_index(&caps[0])?)?.to_string();
            let transform = match letter {
                'H' => Transform::Function(transform_function(session, &content)?),
                'F' => Transform::InlineClass(transform_inline_class(session, &content)?),
                _ => Transform::InlineObject(transform_inline_object(session, &content)?),
            };
            transforms.push(transform);
            Ok(Some(format!("\"!{}\"", transforms.len() - 1)))
        })?;
        Ok(out)
    };

    let text = replace_kind(session, &expanded, &H_TOKEN, 'H')?;
    let text = replace_kind(session, &text, &F_TOKEN, 'F')?;
    let text = replace_kind(session, &text, &I_TOKEN, 'I')?;

    Ok(Expression { text, transforms })
}

/// Parses an `H` atom (`function name? "B.." "A.."`) into a function node.
pub(crate) fn transform_function(
    session: &mut TransformSession,
    text: &str,
) -> Result<Function, TransformError> {
    let Some(caps) = TRANSFORM_PARTS.captures(text) else {
        debug_assert!(false, "malformed function atom: {text}");
        return Err(TransformError::internal(format!(
            "malformed function atom: {text}"
        )));
    };
    let name = (&caps[1] != "function").then(|| caps[1].into());
    let params_text = session.atom_text(atom_index(&caps[2])?)?.to_string();
    let body_text = session.atom_text(atom_index(&caps[3])?)?.to_string();
    Ok(Function {
        name,
        params: transform_params(&params_text),
        body: statements::transform_statements_block(session, &body_text)?,
    })
}

/// Parses an `F` atom (`new T() {...}`) into an anonymous class with a
/// synthetic name, implementing the named base.
pub(crate) fn transform_inline_class(
    session: &mut TransformSession,
    text: &str,
) -> Result<InlineClass, TransformError> {
    let Some(caps) = INLINE_CLASS_PARTS.captures(text) else {
        debug_assert!(false, "malformed inline class atom: {text}");
        return Err(TransformError::internal(format!(
            "malformed inline class atom: {text}"
        )));
    };
    let base = caps[1].to_string();
    let body_index = atom_index(&caps[2])?;
    let enclosing = session.current_scope;
    let id = session.register_class(ClassRecord::new("".into(), false, enclosing));
    let name = ecow::eco_format!("{base}${}", id.label());
    session.class_mut(id).name = name.clone();
    session.current_scope = Some(id);
    let body_text = session.atom_text(body_index)?.to_string();
    let body =
        class_body::transform_class_body(session, &body_text, id, &name, None, vec![base.into()]);
    session.current_scope = enclosing;
    Ok(InlineClass { name, body: body? })
}

/// Parses an `I` atom into an inline object literal.
pub(crate) fn transform_inline_object(
    session: &mut TransformSession,
    text: &str,
) -> Result<InlineObject, TransformError> {
    let members = text
        .split(',')
        .map(|member| {
            Ok(match member.find(':') {
                Some(colon) => ObjectMember {
                    label: Some(member[..colon].trim().to_string()),
                    value: transform_expression(session, member[colon + 1..].trim())?,
                },
                None => ObjectMember {
                    label: None,
                    value: transform_expression(session, member)?,
                },
            })
        })
        .collect::<Result<Vec<_>, TransformError>>()?;
    Ok(InlineObject { members })
}

/// Parses a `B` atom's content into a parameter list, erasing types and
/// dimensions and recognizing a trailing varargs parameter.
pub(crate) fn transform_params(text: &str) -> Params {
    let inner = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(text);
    let mut params = Params::default();
    if inner.trim().is_empty() {
        return params;
    }
    for piece in inner.split(',') {
        let Some(caps) = PARAM_NAME.captures(piece) else {
            continue;
        };
        let param = Param {
            name: caps[1].into(),
        };
        if piece.contains("...") {
            params.varargs = Some(param);
        } else {
            params.params.push(param);
        }
    }
    params
}
