// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Generics erasure.
//!
//! The emitted JavaScript is untyped, so `<...>` type parameter lists are
//! erased wholesale. A match is refused when flanked by `<` on the left or
//! `=` on the right, which keeps shift (`<<`) and comparison (`<=`, `>=`)
//! operators intact. Erasure iterates to a fixed point: removing an inner
//! list (`List<Integer>`) is what makes the outer one
//! (`Map<String, List>`) recognizable.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static GENERICS: Lazy<Regex> = Lazy::new(|| {
    let id = r"[A-Za-z_$][\w$]*\b(?:\s*\.\s*[A-Za-z_$][\w$]*\b)*";
    let type_arg = format!(
        r"(?:\?|{id})(?:\[\])*(?:\s+(?:extends|super)\s+(?:\?|{id}))?",
        id = id
    );
    Regex::new(&format!(
        r"(<)?<\s*{type_arg}(?:\s*,\s*{type_arg})*\s*>(=)?",
        type_arg = type_arg
    ))
    .expect("generics pattern")
});

/// Erases type parameter lists until no further change.
#[must_use]
pub fn strip_generics(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let mut removed = false;
        let next = GENERICS
            .replace_all(&current, |caps: &Captures<'_>| {
                if caps.get(1).is_some() || caps.get(2).is_some() {
                    caps[0].to_string()
                } else {
                    removed = true;
                    String::new()
                }
            })
            .into_owned();
        current = next;
        if !removed {
            return current;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_parameter_list() {
        assert_eq!(strip_generics("ArrayList<String> names"), "ArrayList names");
    }

    #[test]
    fn nested_lists_need_two_passes() {
        assert_eq!(
            strip_generics("HashMap<String, ArrayList<Integer>> table"),
            "HashMap table"
        );
    }

    #[test]
    fn wildcard_and_bounds() {
        assert_eq!(strip_generics("List<? extends PVector> vs"), "List vs");
        assert_eq!(strip_generics("Box<T super Shape> b"), "Box b");
    }

    #[test]
    fn shift_and_comparison_survive() {
        assert_eq!(strip_generics("a << 2"), "a << 2");
        assert_eq!(strip_generics("x<y>=z"), "x<y>=z");
    }

    #[test]
    fn idempotent_on_own_output() {
        let once = strip_generics("HashMap<String, ArrayList<Integer>> t");
        assert_eq!(strip_generics(&once), once);
    }

    #[test]
    fn array_dimension_in_argument() {
        assert_eq!(strip_generics("List<int[]> rows"), "List rows");
    }
}
