// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for source preparation.
//!
//! 1. **Elision fidelity** - every elided literal is stored verbatim in
//!    the string table.
//! 2. **Generics idempotence** - stripping the stripper's own output
//!    changes nothing.
//! 3. **Atom conservation** - reassembling the atom table reproduces the
//!    atomized document exactly.

use proptest::prelude::*;

use crate::session::TransformSession;

use super::{atomize, elide_literals, strip_generics};

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,6}"
}

fn string_literal() -> impl Strategy<Value = String> {
    "[ a-zA-Z0-9_.!?]{0,12}".prop_map(|body| format!("\"{body}\""))
}

fn generic_type() -> impl Strategy<Value = String> {
    (identifier(), identifier(), identifier()).prop_map(|(outer, a, b)| {
        format!("{outer}<{a}, {b}<{a}>>")
    })
}

fn balanced_source() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        identifier(),
        string_literal(),
        Just("1 + 2".to_string()),
        Just("x = 5;".to_string()),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a}({b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a} {{ {b} }}")),
            inner.prop_map(|a| format!("[{a}]")),
        ]
    })
}

proptest! {
    /// Every string literal the elider removes is stored verbatim.
    #[test]
    fn elided_literals_are_stored_verbatim(body in "[ a-zA-Z0-9_.!?]{0,16}") {
        let literal = format!("\"{body}\"");
        let source = format!("println({literal});");
        let mut session = TransformSession::new();
        let out = elide_literals(&mut session, &source);
        prop_assert_eq!(session.string_at(0), Some(literal.as_str()));
        prop_assert_eq!(out, "println('0');");
    }

    /// The generics stripper is idempotent on its own output.
    #[test]
    fn generics_stripping_is_idempotent(ty in generic_type(), name in identifier()) {
        let source = format!("{ty} {name};");
        let once = strip_generics(&source);
        let twice = strip_generics(&once);
        prop_assert_eq!(once, twice);
    }

    /// The stripper never touches text without angle brackets.
    #[test]
    fn generics_stripping_preserves_plain_text(source in "[a-zA-Z0-9 _.;(){}\\[\\]]{0,40}") {
        prop_assert_eq!(strip_generics(&source), source);
    }

    /// Expanding every atom back into its placeholder reproduces the
    /// atomized document.
    #[test]
    fn atoms_reassemble_to_the_document(source in balanced_source()) {
        let mut session = TransformSession::new();
        prop_assume!(atomize(&mut session, &source).is_ok());
        let reassembled = expand(&session, session.atom_text(0).expect("root atom"));
        prop_assert_eq!(reassembled, source);
    }
}

/// Recursively replaces `"Kn"` placeholders with their atom text.
fn expand(session: &TransformSession, text: &str) -> String {
    let token = regex::Regex::new(r#""[ABC](\d+)""#).expect("token pattern");
    let mut out = String::new();
    let mut last = 0;
    for caps in token.captures_iter(text) {
        let m = caps.get(0).expect("match");
        out.push_str(&text[last..m.start()]);
        let index: usize = caps[1].parse().expect("index");
        out.push_str(&expand(session, session.atom_text(index).expect("atom")));
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}
