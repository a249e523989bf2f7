// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Small text helpers shared by the parse stages.

use regex::{Captures, Regex};

use crate::error::TransformError;

/// Splits `text` into leading whitespace, trimmed middle, and trailing
/// whitespace, so rewrites can preserve the original spacing around a
/// fragment.
pub(crate) fn split_trim(text: &str) -> (&str, &str, &str) {
    let middle_start = text.len() - text.trim_start().len();
    let middle_end = text.trim_end().len();
    if middle_start >= middle_end {
        return (text, "", "");
    }
    (
        &text[..middle_start],
        &text[middle_start..middle_end],
        &text[middle_end..],
    )
}

/// Extracts the numeric index from a placeholder token such as `"B12"`.
///
/// Tokens are produced by the session itself, so a parse failure is a
/// transformer bug. Debug builds assert; release builds surface
/// [`TransformError::Internal`].
pub(crate) fn atom_index(token: &str) -> Result<usize, TransformError> {
    let digits: String = token.chars().filter(char::is_ascii_digit).collect();
    debug_assert!(!digits.is_empty(), "placeholder without index: {token}");
    digits
        .parse()
        .map_err(|_| TransformError::internal(format!("placeholder without index: {token}")))
}

/// `Regex::replace_all` with skippable replacements and a fallible
/// callback.
///
/// The callback returns `Ok(None)` to keep a match unchanged; an `Err`
/// aborts the scan. The boolean result reports whether any replacement
/// happened, which drives the fixed-point loops of the expression
/// rewriter.
pub(crate) fn try_replace_all(
    re: &Regex,
    text: &str,
    mut f: impl FnMut(&Captures<'_>) -> Result<Option<String>, TransformError>,
) -> Result<(String, bool), TransformError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut changed = false;
    for caps in re.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        out.push_str(&text[last..m.start()]);
        match f(&caps)? {
            Some(replacement) => {
                changed = true;
                out.push_str(&replacement);
            }
            None => out.push_str(m.as_str()),
        }
        last = m.end();
    }
    out.push_str(&text[last..]);
    Ok((out, changed))
}

/// Infallible variant of [`try_replace_all`] for callbacks that only
/// build text.
pub(crate) fn replace_all_opt(
    re: &Regex,
    text: &str,
    mut f: impl FnMut(&Captures<'_>) -> Option<String>,
) -> (String, bool) {
    try_replace_all(re, text, |caps| Ok(f(caps))).expect("infallible callback")
}

/// The default literal the declared type falls back to when a definition
/// has no initializer.
pub(crate) fn default_value_for_type(type_name: &str) -> &'static str {
    match type_name {
        "int" | "float" | "long" | "double" | "byte" | "short" => "0",
        "boolean" => "false",
        "color" => "0x00000000",
        _ => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_trim_preserves_edges() {
        assert_eq!(split_trim("  a b \n"), ("  ", "a b", " \n"));
        assert_eq!(split_trim("x"), ("", "x", ""));
        assert_eq!(split_trim("   "), ("   ", "", ""));
    }

    #[test]
    fn atom_index_reads_token_digits() {
        assert_eq!(atom_index("\"B12\"").expect("index"), 12);
        assert_eq!(atom_index("\"A3\"").expect("index"), 3);
    }

    #[test]
    fn try_replace_all_propagates_errors() {
        let re = Regex::new(r"\d+").expect("pattern");
        let err = try_replace_all(&re, "a 1 b", |_| {
            Err(TransformError::internal("boom"))
        })
        .unwrap_err();
        assert!(matches!(err, TransformError::Internal(_)));
    }

    #[test]
    fn type_defaults() {
        assert_eq!(default_value_for_type("int"), "0");
        assert_eq!(default_value_for_type("boolean"), "false");
        assert_eq!(default_value_for_type("color"), "0x00000000");
        assert_eq!(default_value_for_type("PVector"), "null");
    }
}
