// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Final literal restoration.
//!
//! Runs on the fully rendered document: identifier escapes unwind first
//! (so nothing inside the restored literals is touched), then every `'N'`
//! placeholder brings its original literal back. Single-character entries
//! box into `$p.Character` so they behave like Java `char`s under the
//! host's comparison helpers; regex literals come back verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parse::util::replace_all_opt;
use crate::session::TransformSession;

static HEX_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__x([0-9A-F]{4})").expect("hex escape pattern"));

static STRING_SLOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"'(\d+)'").expect("slot pattern"));

static CHARACTER_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^'(?:[^'\\\n]|\\.[0-9A-Fa-f]*)'$").expect("character pattern")
});

/// Reverses the identifier escaping of the preparation stage.
///
/// One uniform rule restores both layers: `__x0024` becomes `$`, and the
/// escape-of-the-escape `__x005F_xHHHH` becomes `__xHHHH` because its
/// first five characters decode to `_`.
#[must_use]
pub fn unescape_identifiers(text: &str) -> String {
    let (out, _) = replace_all_opt(&HEX_ESCAPE, text, |caps| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
    });
    out
}

/// Restores string, character and regex literals from the session table.
#[must_use]
pub fn inject_strings(session: &TransformSession, text: &str) -> String {
    let (out, _) = replace_all_opt(&STRING_SLOT, text, |caps| {
        let index: usize = caps[1].parse().unwrap_or(usize::MAX);
        let value = session.string_at(index)?;
        if value.starts_with('/') {
            return Some(value.to_string());
        }
        if CHARACTER_LITERAL.is_match(value) {
            return Some(format!("(new $p.Character({value}))"));
        }
        Some(value.to_string())
    });
    out
}
