// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Literal elision and identifier escaping.
//!
//! A single linear pass over the source recognizes, in priority order:
//! double-quoted strings, single-quoted characters, regex literals, `//`
//! line comments and `/* */` block comments. Strings, characters and
//! regexes move into the session string table and are replaced by `'N'`
//! placeholders; comments collapse to a space, or a newline when they
//! spanned one, so statement separation by line survives.
//!
//! A `/` opens a regex literal only when the last significant character
//! before it is one of `[ ( = | & ! ^ : ?` - anywhere else it is division.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::session::TransformSession;

/// Characters that put the scanner into regex-literal context.
const REGEX_CONTEXT: &[char] = &['[', '(', '=', '|', '&', '!', '^', ':', '?'];

/// Normalizes line endings and elides strings, characters, regexes and
/// comments into the session string table.
pub fn elide_literals(session: &mut TransformSession, source: &str) -> String {
    let normalized = source.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(normalized.len());
    let mut last_significant = '\0';
    let mut chars = normalized.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match c {
            '"' | '\'' => {
                if let Some(literal) = scan_quoted(&normalized[index..], c) {
                    for _ in 0..literal.chars().count() - 1 {
                        chars.next();
                    }
                    out.push_str(&session.add_string(literal));
                    last_significant = c;
                } else {
                    out.push(c);
                    last_significant = c;
                }
            }
            '/' => match chars.peek().map(|&(_, next)| next) {
                Some('/') => {
                    let mut saw_newline = false;
                    for (_, comment_char) in chars.by_ref() {
                        if comment_char == '\n' {
                            saw_newline = true;
                            break;
                        }
                    }
                    out.push(if saw_newline { '\n' } else { ' ' });
                }
                Some('*') => {
                    chars.next();
                    let mut saw_newline = false;
                    let mut prev = '\0';
                    for (_, comment_char) in chars.by_ref() {
                        saw_newline |= comment_char == '\n';
                        if prev == '*' && comment_char == '/' {
                            break;
                        }
                        prev = comment_char;
                    }
                    out.push(if saw_newline { '\n' } else { ' ' });
                }
                _ if REGEX_CONTEXT.contains(&last_significant) => {
                    if let Some(literal) = scan_regex(&normalized[index..]) {
                        for _ in 0..literal.chars().count() - 1 {
                            chars.next();
                        }
                        out.push_str(&session.add_string(literal));
                        last_significant = '/';
                    } else {
                        out.push(c);
                        last_significant = c;
                    }
                }
                _ => {
                    out.push(c);
                    last_significant = c;
                }
            },
            _ => {
                out.push(c);
                if !c.is_whitespace() {
                    last_significant = c;
                }
            }
        }
    }
    out
}

/// Scans a quoted literal (string or character) at the start of `text`.
///
/// Backslash escapes are honored; an unterminated literal (newline or end of
/// input before the closing quote) returns `None` and the caller falls back
/// to emitting the quote verbatim.
fn scan_quoted(text: &str, quote: char) -> Option<String> {
    let mut chars = text.char_indices().skip(1);
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next()?;
            }
            '\n' => return None,
            _ if c == quote => return Some(text[..index + c.len_utf8()].to_string()),
            _ => {}
        }
    }
    None
}

/// Scans a regex literal `/.../<flags>` at the start of `text`.
fn scan_regex(text: &str) -> Option<String> {
    let mut chars = text.char_indices().skip(1);
    let mut end = None;
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next()?;
            }
            '\n' => return None,
            '/' => {
                end = Some(index + 1);
                break;
            }
            _ => {}
        }
    }
    let mut end = end?;
    for c in text[end..].chars() {
        if matches!(c, 'g' | 'i' | 'm') {
            end += 1;
        } else {
            break;
        }
    }
    Some(text[..end].to_string())
}

static EXISTING_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__x([0-9A-F]{4})").expect("escape pattern"));
static RETURN_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\breturn\s*\n\s*").expect("return pattern"));

/// Escapes `$` so user identifiers survive the renderer's `$`-prefixed
/// synthetic names, and guards `return` against semicolon insertion.
///
/// Existing `__xHHHH` sequences are escaped first (`__x005F_xHHHH`) so the
/// final unescape is a single uniform rewrite.
#[must_use]
pub fn escape_identifiers(text: &str) -> String {
    let escaped = EXISTING_ESCAPE.replace_all(text, "__x005F_x$1");
    let escaped = escaped.replace('$', "__x0024");
    RETURN_BREAK.replace_all(&escaped, "return ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elide(source: &str) -> (TransformSession, String) {
        let mut session = TransformSession::new();
        let out = elide_literals(&mut session, source);
        (session, out)
    }

    #[test]
    fn strings_become_placeholders() {
        let (session, out) = elide(r#"text("hello", 10, 'c');"#);
        assert_eq!(out, "text('0', 10, '1');");
        assert_eq!(session.string_at(0), Some("\"hello\""));
        assert_eq!(session.string_at(1), Some("'c'"));
    }

    #[test]
    fn escapes_inside_strings_are_kept() {
        let (session, out) = elide(r#"println("a \"quoted\" word");"#);
        assert_eq!(out, "println('0');");
        assert_eq!(session.string_at(0), Some(r#""a \"quoted\" word""#));
    }

    #[test]
    fn line_comment_collapses_to_newline() {
        let (_, out) = elide("int x; // trailing\nint y;");
        assert_eq!(out, "int x; \nint y;");
    }

    #[test]
    fn intra_line_block_comment_collapses_to_space() {
        let (_, out) = elide("int /* type */ x;");
        assert_eq!(out, "int   x;");
    }

    #[test]
    fn spanning_block_comment_keeps_a_newline() {
        let (_, out) = elide("int x; /* a\nb */ int y;");
        assert_eq!(out, "int x; \n int y;");
    }

    #[test]
    fn regex_after_context_char_is_elided() {
        let (session, out) = elide("var m = /ab+c/g;");
        assert_eq!(out, "var m = '0';");
        assert_eq!(session.string_at(0), Some("/ab+c/g"));
    }

    #[test]
    fn division_is_not_a_regex() {
        let (_, out) = elide("float r = a / b / c;");
        assert_eq!(out, "float r = a / b / c;");
    }

    #[test]
    fn carriage_returns_are_normalized() {
        let (_, out) = elide("a;\r\nb;\rc;");
        assert_eq!(out, "a;\nb;\nc;");
    }

    #[test]
    fn dollar_and_existing_escapes() {
        assert_eq!(escape_identifiers("a$b"), "a__x0024b");
        assert_eq!(escape_identifiers("__x0041"), "__x005F_x0041");
    }

    #[test]
    fn return_line_break_is_guarded() {
        assert_eq!(escape_identifiers("return\n  x;"), "return x;");
        assert_eq!(escape_identifiers("returning\nx;"), "returning\nx;");
    }
}
