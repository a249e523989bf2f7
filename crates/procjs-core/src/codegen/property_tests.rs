// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the whole transform.
//!
//! 1. **`transform` never panics** - near-valid input returns `Ok` or
//!    `Err`, never aborts.
//! 2. **Closure shape** - successful output is always the host-library
//!    closure.
//! 3. **String fidelity** - every string literal of the input appears
//!    verbatim in the output.

use proptest::prelude::*;

use crate::{TransformOptions, transform};

/// Near-valid PDE fragments.
const FRAGMENTS: &[&str] = &[
    "int x = 5;",
    "float f = 3.0f;",
    "color c = #FF8040;",
    "String s = \"hi\";",
    "char k = 'a';",
    "void setup() { size(200, 200); }",
    "void draw() { background(0); ellipse(mouseX, mouseY, 10, 10); }",
    "class A { int x; A() { x = 1; } }",
    "class B extends A { B() { super(); } }",
    "interface I { void go(); }",
    "for (int i = 0; i < 10; i++) { println(i); }",
    "for (int v : values) { sum += v; }",
    "if (keyPressed) { frameRate(30); } else { noLoop(); }",
    "int[] counts = new int[12];",
    "s = s.replace(\"a\", \"b\");",
    "boolean hit = p instanceof PVector;",
];

fn fragment() -> impl Strategy<Value = String> {
    prop::sample::select(FRAGMENTS).prop_map(str::to_string)
}

fn near_valid_pde() -> impl Strategy<Value = String> {
    prop_oneof![
        fragment(),
        // Two fragments in sequence.
        (fragment(), fragment()).prop_map(|(a, b)| format!("{a}\n{b}")),
        // Truncated at a character boundary.
        (fragment(), 0..32usize).prop_map(|(s, cut)| {
            let cut = s
                .char_indices()
                .map(|(i, _)| i)
                .take_while(|&i| i <= cut)
                .last()
                .unwrap_or(0);
            s[..cut].to_string()
        }),
    ]
}

proptest! {
    /// The transformer returns, it never panics.
    #[test]
    fn transform_never_panics(source in near_valid_pde()) {
        let _ = transform(&source, &TransformOptions::default());
    }

    /// Successful output always has the host-closure shape.
    #[test]
    fn output_is_always_a_closure(source in near_valid_pde()) {
        if let Ok(js) = transform(&source, &TransformOptions::default()) {
            prop_assert!(js.starts_with("// this code was autogenerated from PDE\n(function($p) {"), "unexpected prefix");
            prop_assert!(js.ends_with("})"), "unexpected suffix");
        }
    }

    /// Input string literals survive to the output verbatim.
    #[test]
    fn string_literals_survive(body in "[ a-zA-Z0-9_.!?]{0,12}") {
        let literal = format!("\"{body}\"");
        let source = format!("String s = {literal};");
        let js = transform(&source, &TransformOptions::default()).expect("balanced input");
        prop_assert!(js.contains(&literal), "missing {} in {}", literal, js);
    }
}
