// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Bracket atomization.
//!
//! Splits the prepared source on the six bracket characters and folds every
//! balanced group into the session atom table, innermost first. A completed
//! group is replaced in its enclosing buffer by the placeholder token the
//! table hands back, so by the end the whole document is a flat stream of
//! text and `"A<n>"` / `"B<n>"` / `"C<n>"` tokens. The bracket-free
//! remainder becomes atom 0.
//!
//! Bracket imbalance is the one fatal input error of the whole core.

use crate::error::TransformError;
use crate::session::{AtomKind, TransformSession};

/// Atomizes `text` into the session, filling atom 0 with the top level.
///
/// # Errors
///
/// Returns [`TransformError::UnbalancedBrackets`] when a closer arrives with
/// no group open, or when groups remain open at end of input.
pub fn atomize(session: &mut TransformSession, text: &str) -> Result<(), TransformError> {
    debug_assert_eq!(session.atom_count(), 0, "atomizer must run on a fresh session");
    session.add_atom(AtomKind::Brace, String::new());

    let mut stack: Vec<(String, usize, char)> = Vec::new();
    let mut current = String::new();

    for (offset, c) in text.char_indices() {
        match c {
            '{' | '[' | '(' => {
                stack.push((std::mem::take(&mut current), offset, c));
                current.push(c);
            }
            '}' | ']' | ')' => {
                let expected = match c {
                    '}' => '{',
                    ')' => '(',
                    _ => '[',
                };
                let Some((enclosing, _, opener)) = stack.pop() else {
                    return Err(TransformError::unbalanced(offset));
                };
                if opener != expected {
                    return Err(TransformError::unbalanced(offset));
                }
                current.push(c);
                let kind = match c {
                    '}' => AtomKind::Brace,
                    ')' => AtomKind::Paren,
                    _ => AtomKind::Bracket,
                };
                let placeholder = session.add_atom(kind, std::mem::take(&mut current));
                current = enclosing;
                current.push_str(&placeholder);
            }
            _ => current.push(c),
        }
    }

    if let Some(&(_, offset, _)) = stack.last() {
        return Err(TransformError::unbalanced(offset));
    }
    session.set_atom_text(0, current);
    Ok(())
}
