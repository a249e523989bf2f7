// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement scanning.
//!
//! A single combined matcher walks atomized statement text looking for
//! control-flow keywords, extracted-declaration placeholders, block atoms,
//! `case`/label heads and semicolons. Everything between recognized heads
//! passes through as raw text, so constructs the scanner does not model
//! survive unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{
    CatchStatement, ForArg, ForStatement, Label, PrefixStatement, Statement, StatementsBlock,
    SwitchCase, Var, VarDefinition,
};
use crate::error::TransformError;
use crate::session::TransformSession;

use super::class_body;
use super::declarations::match_field;
use super::expressions::{transform_expression, transform_function, transform_params};
use super::util::{atom_index, default_value_for_type, replace_all_opt, split_trim};

static NEXT_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        \b(catch|for|if|switch|while)\s*"B(\d+)"
        | \b(do|else|finally|return|throw|try|break|continue)\b
        | ("([ADEH])(\d+)")
        | \b(case)\s+([^:]+):
        | \b([A-Za-z_$][\w$]*\s*:)
        | (;)
        "#,
    )
    .expect("statement pattern")
});

static MULTI_CATCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(catch\s*"B\d+"\s*"A\d+")(\s*catch\s*"B\d+"\s*"A\d+")+"#)
        .expect("multi catch pattern")
});

static DIMENSION_TOKENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\s*"C\d+")+"#).expect("dimension tokens pattern"));

/// Collapses multiple `catch` blocks into the first. The erased exception
/// types leave no way to dispatch between them at runtime.
fn pre_statements_transform(text: &str) -> String {
    let (out, _) = replace_all_opt(&MULTI_CATCH, text, |caps| Some(caps[1].to_string()));
    out
}

/// Scans atomized statement text into a statement list.
#[allow(clippy::too_many_lines)]
pub fn transform_statements(
    session: &mut TransformSession,
    text: &str,
) -> Result<Vec<Statement>, TransformError> {
    let text = pre_statements_transform(text);
    let mut res = Vec::new();
    // `last` trails the end of the last *accepted* construct; `search` can
    // run ahead of it past rejected label candidates.
    let mut last = 0;
    let mut search = 0;

    while let Some(caps) = NEXT_STATEMENT.captures_at(&text, search) {
        let whole = caps.get(0).expect("whole match");
        search = whole.end();

        if let Some(keyword) = caps.get(1) {
            res.push(Statement::Raw(text[last..keyword.start()].to_string()));
            let atom = session.atom_text(atom_index(&caps[2])?)?.to_string();
            res.push(match keyword.as_str() {
                "for" => Statement::For(ForStatement {
                    arg: transform_for_expression(session, &atom)?,
                }),
                "catch" => Statement::Catch(CatchStatement {
                    params: transform_params(&atom),
                }),
                other => Statement::Prefix(PrefixStatement {
                    keyword: other.into(),
                    arg: Some(transform_expression(session, &atom)?),
                }),
            });
        } else if let Some(keyword) = caps.get(3) {
            res.push(Statement::Raw(text[last..keyword.start()].to_string()));
            res.push(Statement::Prefix(PrefixStatement {
                keyword: keyword.as_str().into(),
                arg: None,
            }));
        } else if let Some(token) = caps.get(4) {
            res.push(Statement::Raw(text[last..token.start()].to_string()));
            let index = atom_index(&caps[6])?;
            let content = session.atom_text(index)?.to_string();
            res.push(match &caps[5] {
                "D" => Statement::Method(class_body::transform_global_method(session, &content)?),
                "E" => Statement::Class(class_body::transform_global_class(session, &content)?),
                "H" => Statement::Function(transform_function(session, &content)?),
                _ => Statement::Block(transform_statements_block(session, &content)?),
            });
        } else if let Some(case_keyword) = caps.get(7) {
            res.push(Statement::Raw(text[last..case_keyword.start()].to_string()));
            res.push(Statement::SwitchCase(SwitchCase {
                expr: transform_expression(session, caps[8].trim())?,
            }));
        } else if let Some(label) = caps.get(9) {
            // A bare `name:` only labels a statement when nothing precedes
            // it; anywhere else it is the arm of a ternary.
            if text[last..label.start()].trim().is_empty() {
                res.push(Statement::Raw(text[last..label.start()].to_string()));
                res.push(Statement::Label(Label {
                    text: label.as_str().to_string(),
                }));
            } else {
                continue;
            }
        } else {
            let segment = &text[last..whole.start()];
            let (left, middle, right) = split_trim(segment);
            res.push(Statement::Raw(left.to_string()));
            if !middle.is_empty() {
                res.push(transform_statement(session, middle)?);
            }
            res.push(Statement::Raw(format!(";{right}")));
        }
        last = search;
    }

    let tail = &text[last..];
    let (left, middle, right) = split_trim(tail);
    res.push(Statement::Raw(left.to_string()));
    if !middle.is_empty() {
        res.push(Statement::Expression(transform_expression(session, middle)?));
    }
    res.push(Statement::Raw(right.to_string()));
    Ok(res)
}

/// Strips the braces off an `A` atom and scans its content.
pub fn transform_statements_block(
    session: &mut TransformSession,
    block: &str,
) -> Result<StatementsBlock, TransformError> {
    let inner = block
        .strip_prefix('{')
        .and_then(|b| b.strip_suffix('}'))
        .unwrap_or(block);
    Ok(StatementsBlock {
        statements: transform_statements(session, inner)?,
    })
}

/// Classifies one semicolon-terminated statement: a typed declaration
/// becomes a `var` list, anything else stays an expression.
pub(crate) fn transform_statement(
    session: &mut TransformSession,
    statement: &str,
) -> Result<Statement, TransformError> {
    if let Some(field) = match_field(statement) {
        let default_literal = default_value_for_type(field.type_name.trim());
        let definitions = field
            .definitions
            .split(',')
            .map(|def| transform_var_definition(session, def, default_literal))
            .collect::<Result<Vec<_>, TransformError>>()?;
        return Ok(Statement::Var(Var {
            definitions,
            declared_type: field.type_name.trim().into(),
        }));
    }
    Ok(Statement::Expression(transform_expression(
        session, statement,
    )?))
}

/// Parses one `name [= expr]` definition.
pub(crate) fn transform_var_definition(
    session: &mut TransformSession,
    def: &str,
    default_literal: &'static str,
) -> Result<VarDefinition, TransformError> {
    let (name_text, value) = match def.find('=') {
        Some(eq) => (
            &def[..eq],
            Some(transform_expression(session, def[eq + 1..].trim())?),
        ),
        None => (def, None),
    };
    let name = DIMENSION_TOKENS.replace_all(name_text, "");
    Ok(VarDefinition {
        name: name.trim().into(),
        value,
        default_literal,
    })
}

/// Classifies a `for` head into its classic, `in` or for-each form.
pub(crate) fn transform_for_expression(
    session: &mut TransformSession,
    head: &str,
) -> Result<ForArg, TransformError> {
    let inner = head
        .strip_prefix('(')
        .and_then(|h| h.strip_suffix(')'))
        .unwrap_or(head);

    static IN_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bin\b").expect("in pattern"));
    if let Some(found) = IN_KEYWORD.find(inner) {
        let init = transform_statement(session, inner[..found.start()].trim())?;
        let container = transform_expression(session, inner[found.end()..].trim())?;
        return Ok(ForArg::In {
            init: Box::new(init),
            container,
        });
    }
    if let Some(colon) = inner.find(':').filter(|_| !inner.contains(';')) {
        let init = transform_statement(session, inner[..colon].trim())?;
        let container = transform_expression(session, inner[colon + 1..].trim())?;
        return Ok(ForArg::Each {
            init: Box::new(init),
            container,
        });
    }
    let mut parts = inner.splitn(3, ';');
    let init = transform_statement(session, parts.next().unwrap_or("").trim())?;
    let cond = transform_expression(session, parts.next().unwrap_or(""))?;
    let step = transform_expression(session, parts.next().unwrap_or(""))?;
    Ok(ForArg::Classic {
        init: Box::new(init),
        cond,
        step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::atomize;

    fn scan(source: &str) -> (TransformSession, Vec<Statement>) {
        let mut session = TransformSession::new();
        atomize(&mut session, source).expect("balanced");
        let top = session.atom_text(0).expect("root atom").to_string();
        let statements = transform_statements(&mut session, &top).expect("statements");
        (session, statements)
    }

    fn non_raw(statements: &[Statement]) -> Vec<&Statement> {
        statements
            .iter()
            .filter(|s| !matches!(s, Statement::Raw(_)))
            .collect()
    }

    #[test]
    fn typed_declaration_becomes_var() {
        let (_, statements) = scan("int x = 5;");
        let nodes = non_raw(&statements);
        assert_eq!(nodes.len(), 1);
        let Statement::Var(var) = nodes[0] else {
            panic!("expected var, got {:?}", nodes[0]);
        };
        assert_eq!(var.declared_type, "int");
        assert_eq!(var.definitions[0].name, "x");
        assert!(!var.definitions[0].is_default());
    }

    #[test]
    fn missing_initializer_takes_type_default() {
        let (_, statements) = scan("boolean done;");
        let nodes = non_raw(&statements);
        let Statement::Var(var) = nodes[0] else {
            panic!("expected var");
        };
        assert!(var.definitions[0].is_default());
        assert_eq!(var.definitions[0].default_literal, "false");
    }

    #[test]
    fn if_else_chain_scans() {
        let (_, statements) = scan("if (a) { b(); } else { c(); }");
        let nodes = non_raw(&statements);
        assert!(matches!(nodes[0], Statement::Prefix(p) if p.keyword == "if"));
        assert!(matches!(nodes[1], Statement::Block(_)));
        assert!(matches!(nodes[2], Statement::Prefix(p) if p.keyword == "else"));
        assert!(matches!(nodes[3], Statement::Block(_)));
    }

    #[test]
    fn classic_for_head() {
        let (_, statements) = scan("for (int i = 0; i < 10; i++) { }");
        let nodes = non_raw(&statements);
        let Statement::For(ForStatement {
            arg: ForArg::Classic { init, cond, .. },
        }) = nodes[0]
        else {
            panic!("expected classic for");
        };
        assert!(matches!(&**init, Statement::Var(_)));
        assert_eq!(cond.text, " i < 10");
    }

    #[test]
    fn for_each_head() {
        let (_, statements) = scan("for (int i : list) { }");
        let nodes = non_raw(&statements);
        assert!(matches!(
            nodes[0],
            Statement::For(ForStatement {
                arg: ForArg::Each { .. }
            })
        ));
    }

    #[test]
    fn for_in_head() {
        let (_, statements) = scan("for (var k in table) { }");
        let nodes = non_raw(&statements);
        assert!(matches!(
            nodes[0],
            Statement::For(ForStatement {
                arg: ForArg::In { .. }
            })
        ));
    }

    #[test]
    fn ternary_colon_is_not_a_label() {
        let (_, statements) = scan("x = flag ? a : b;");
        let nodes = non_raw(&statements);
        assert_eq!(nodes.len(), 1);
        let Statement::Expression(expr) = nodes[0] else {
            panic!("expected expression, got {:?}", nodes[0]);
        };
        assert!(expr.text.contains('?'));
    }

    #[test]
    fn leading_label_is_recognized() {
        let (_, statements) = scan("outer: while (running) { }");
        let nodes = non_raw(&statements);
        assert!(matches!(nodes[0], Statement::Label(l) if l.text.starts_with("outer")));
    }

    #[test]
    fn switch_case_head() {
        let (_, statements) = scan("switch (key) { case 'a': break; default: break; }");
        let (_, block) = scan("case 'a': break; default: break;");
        let nodes = non_raw(&block);
        assert!(matches!(nodes[0], Statement::SwitchCase(_)));
        assert!(matches!(nodes[1], Statement::Prefix(p) if p.keyword == "break"));
        assert!(matches!(nodes[2], Statement::Label(_)));
        assert!(matches!(nodes[3], Statement::Prefix(p) if p.keyword == "break"));
        drop(statements);
    }

    #[test]
    fn adjacent_catch_blocks_collapse() {
        let collapsed = pre_statements_transform(
            r#"try "A1" catch "B2" "A3" catch "B4" "A5""#,
        );
        assert_eq!(collapsed, r#"try "A1" catch "B2" "A3""#);
    }

    #[test]
    fn multiple_definitions_share_a_type() {
        let (_, statements) = scan("float w = 1.5, h;");
        let nodes = non_raw(&statements);
        let Statement::Var(var) = nodes[0] else {
            panic!("expected var");
        };
        assert_eq!(var.definitions.len(), 2);
        assert_eq!(var.definitions[1].name, "h");
        assert_eq!(var.definitions[1].default_literal, "0");
    }
}
