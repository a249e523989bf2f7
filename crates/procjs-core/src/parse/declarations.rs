// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration extraction over atomized text.
//!
//! Class, method, `function` and constructor headers are recognized by
//! pattern match against the atom tokens and folded into new atoms of their
//! own (`E`, `D`, `H`, `G`), leaving placeholders behind. Field
//! declarations are *not* atomized; [`match_field`] classifies the residue
//! after extraction.
//!
//! Extraction order matters: classes first (so a method regex never eats a
//! class header), then methods, then functions.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::session::{AtomKind, TransformSession};

use super::util::replace_all_opt;

const ID: &str = r"[A-Za-z_$][\w$]*\b";
const DOTTED: &str = r"[A-Za-z_$][\w$]*\b(?:\s*\.\s*[A-Za-z_$][\w$]*\b)*";

/// Words that can never be a method return type or a field type.
const NON_TYPE_KEYWORDS: &[&str] = &[
    "else", "new", "return", "throw", "function", "public", "private", "protected", "case",
    "break", "continue", "do", "try", "finally", "in", "instanceof",
];

pub(crate) static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"\b((?:(?:public|private|final|protected|static|abstract)\s+)*)(class|interface)\s+({ID})(\s+extends\s+{DOTTED}(?:\s*,\s*{DOTTED})*)?(\s+implements\s+{DOTTED}(?:\s*,\s*{DOTTED})*)?\s*("A\d+")"#
    ))
    .expect("class pattern")
});

pub(crate) static METHOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"\b((?:(?:public|private|final|protected|static|abstract|synchronized)\s+)*)({DOTTED}(?:\s*"C\d+")*)\s*({ID})\s*("B\d+")(\s*throws\s+{DOTTED}(?:\s*,\s*{DOTTED})*)?\s*("A\d+"|;)"#
    ))
    .expect("method pattern")
});

pub(crate) static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"\bfunction(?:\s+({ID}))?\s*("B\d+")\s*("A\d+")"#
    ))
    .expect("function pattern")
});

/// Replaces class/interface, method and `function` headers with `E`, `D`
/// and `H` atoms.
pub fn extract_declarations(session: &mut TransformSession, text: &str) -> String {
    let (text, _) = replace_all_opt(&CLASS_RE, text, |caps: &Captures<'_>| {
        Some(session.add_atom(AtomKind::Class, &caps[0]))
    });
    let (text, _) = replace_all_opt(&METHOD_RE, &text, |caps: &Captures<'_>| {
        let return_type = caps[2].trim();
        if NON_TYPE_KEYWORDS.contains(&return_type) {
            return None;
        }
        Some(session.add_atom(AtomKind::Method, &caps[0]))
    });
    let (text, _) = replace_all_opt(&FUNCTION_RE, &text, |caps: &Captures<'_>| {
        Some(session.add_atom(AtomKind::Function, &caps[0]))
    });
    text
}

/// Replaces constructor headers of the named class with `G` atoms.
///
/// Only meaningful inside a class body, where the class name is known.
pub fn extract_constructors(
    session: &mut TransformSession,
    text: &str,
    class_name: &str,
) -> String {
    let re = Regex::new(&format!(
        r#"\b((?:(?:public|private|final|protected)\s+)*)({name})\s*("B\d+")(\s*throws\s+{DOTTED}(?:\s*,\s*{DOTTED})*)?\s*("A\d+")"#,
        name = regex::escape(class_name),
    ))
    .expect("constructor pattern");
    let (text, _) = replace_all_opt(&re, text, |caps: &Captures<'_>| {
        Some(session.add_atom(AtomKind::Constructor, &caps[0]))
    });
    text
}

static ATTR_AND_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"^\s*((?:(?:public|private|final|protected|static|abstract)\s+)*)({DOTTED})((?:\s*"C\d+")*)\s+"#
    ))
    .expect("field prefix pattern")
});

static DEFINITION_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[A-Za-z_$][\w$]*\b\s*(?:"C\d+"\s*)*(=|,|$)"#).expect("definition pattern")
});

/// A recognized field (or local variable) declaration prefix.
#[derive(Debug)]
pub(crate) struct FieldMatch<'a> {
    /// Modifier run, possibly empty (`"public static "`).
    pub modifiers: &'a str,
    /// The declared type, dots preserved, dimensions dropped.
    pub type_name: &'a str,
    /// The definition list after the type (`"x = 5, y"`).
    pub definitions: &'a str,
}

/// Tests whether a `;`-separated segment is a field/variable declaration:
/// an attribute+type prefix followed by one or more `name [= expr]`
/// definitions.
pub(crate) fn match_field(segment: &str) -> Option<FieldMatch<'_>> {
    let caps = ATTR_AND_TYPE_RE.captures(segment)?;
    let type_name = caps.get(2).expect("type group").as_str();
    if NON_TYPE_KEYWORDS.contains(&type_name.trim()) {
        return None;
    }
    let rest = &segment[caps.get(0).expect("prefix").end()..];
    DEFINITION_START_RE.captures(rest)?;
    Some(FieldMatch {
        modifiers: caps.get(1).expect("modifier group").as_str(),
        type_name,
        definitions: rest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TransformSession;
    use crate::source_analysis::atomize;

    fn extract(source: &str) -> (TransformSession, String) {
        let mut session = TransformSession::new();
        atomize(&mut session, source).expect("balanced");
        let top = session.atom_text(0).expect("root atom").to_string();
        let out = extract_declarations(&mut session, &top);
        (session, out)
    }

    #[test]
    fn class_header_becomes_e_atom() {
        let (session, out) = extract("class Ball extends Mover { }");
        assert_eq!(out, "\"E2\"");
        assert!(session.atom_text(2).expect("atom").starts_with("class Ball extends Mover"));
    }

    #[test]
    fn method_header_becomes_d_atom() {
        let (_, out) = extract("void draw() { line(0, 0, w, h); }");
        assert_eq!(out.trim(), "\"D4\"");
    }

    #[test]
    fn array_return_type_is_a_method() {
        let (_, out) = extract("int[] histogram() { return counts; }");
        assert_eq!(out.trim(), "\"D4\"");
    }

    #[test]
    fn return_statement_is_not_a_method() {
        let (_, out) = extract("int f() { } void g() { }");
        // Both headers extract; nothing inside the bodies does.
        assert_eq!(out.trim(), "\"D5\" \"D6\"");
    }

    #[test]
    fn function_keyword_becomes_h_atom() {
        let (_, out) = extract("function helper(a) { return a; }");
        assert_eq!(out.trim(), "\"H3\"");
    }

    #[test]
    fn constructors_extract_by_class_name() {
        let mut session = TransformSession::new();
        atomize(&mut session, "Ball() { } Ball(int r) { } void hit() { }").expect("balanced");
        let top = session.atom_text(0).expect("root atom").to_string();
        let top = extract_declarations(&mut session, &top);
        let out = extract_constructors(&mut session, &top, "Ball");
        assert_eq!(out.trim(), "\"G8\" \"G9\" \"D7\"");
    }

    #[test]
    fn field_segments_classify() {
        assert!(match_field("int x = 5").is_some());
        assert!(match_field("public static float g = 9.8, h").is_some());
        assert!(match_field("PVector origin").is_some());
        assert!(match_field("x = 5").is_none());
        assert!(match_field("return x").is_none());
        assert!(match_field("count++").is_none());
    }

    #[test]
    fn field_match_splits_prefix() {
        let m = match_field("static int w = 10, h").expect("field");
        assert_eq!(m.modifiers.trim(), "static");
        assert_eq!(m.type_name, "int");
        assert_eq!(m.definitions, "w = 10, h");
    }
}
