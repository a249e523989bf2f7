// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for the PDE transformer.
//!
//! The core is best-effort: unrecognized constructs pass through unchanged,
//! so almost nothing is fatal. Errors integrate with [`miette`] so the host
//! can render a labeled span.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// An error produced while transforming a PDE document.
#[derive(Debug, Error, Diagnostic)]
pub enum TransformError {
    /// The source contains mismatched `{}`, `[]` or `()`.
    ///
    /// The offset is a byte position into the prepared source (after literal
    /// elision), which matches the original source closely enough for a
    /// useful caret.
    #[error("unbalanced brackets at offset {offset}")]
    #[diagnostic(code(procjs::unbalanced_brackets))]
    UnbalancedBrackets {
        /// Byte offset of the offending bracket.
        offset: usize,
        /// The same position as a labeled span.
        #[label("bracket here")]
        span: SourceSpan,
    },

    /// A transformer-internal invariant was violated.
    ///
    /// This indicates a bug in the transformer, not in the input: a
    /// placeholder that resolves to no atom, or an extracted atom whose
    /// text no longer matches the pattern that created it. Debug builds
    /// assert at the offending site; release builds surface this error
    /// instead of emitting corrupt output.
    #[error("internal transformer error: {0}")]
    #[diagnostic(code(procjs::internal))]
    Internal(String),
}

impl TransformError {
    /// Creates an "unbalanced brackets" error at the given byte offset.
    #[must_use]
    pub fn unbalanced(offset: usize) -> Self {
        Self::UnbalancedBrackets {
            offset,
            span: (offset, 1).into(),
        }
    }

    /// Creates an internal-invariant error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates the internal error for an atom index that resolves to no
    /// table entry.
    #[must_use]
    pub fn missing_atom(index: usize) -> Self {
        Self::Internal(format!("missing atom index {index}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbalanced_display() {
        let err = TransformError::unbalanced(17);
        assert_eq!(err.to_string(), "unbalanced brackets at offset 17");
    }

    #[test]
    fn internal_display() {
        let err = TransformError::missing_atom(9);
        assert_eq!(err.to_string(), "internal transformer error: missing atom index 9");
    }
}
