// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Core PDE-to-JavaScript transformer.
//!
//! This crate contains the whole translation front end:
//! - Source preparation (literal elision, identifier escaping, generics
//!   erasure, bracket atomization)
//! - Parsing (declaration extraction, expression and statement lowering,
//!   class body assembly)
//! - Semantic analysis (base/interface resolution, emission weighting)
//! - Code generation (JavaScript rendering with scoped name resolution,
//!   literal reinjection)
//!
//! One call to [`transform`] converts one source document end-to-end and
//! returns a string shaped as `(function($p) { ... })`, to be evaluated by
//! the host sketch engine, which supplies the runtime object `$p`. The
//! core does no I/O and keeps no state across invocations.

pub mod ast;
pub mod codegen;
mod error;
pub mod options;
pub mod parse;
pub mod semantic_analysis;
mod session;
pub mod source_analysis;

pub use error::TransformError;
pub use options::{DefaultScope, NameSet, TransformOptions};
pub use session::{Atom, AtomKind, ClassId, ClassRecord, TransformSession};

use tracing::debug;

/// Re-export of commonly used types.
pub mod prelude {
    pub use crate::ast::{Expression, Root, Statement};
    pub use crate::options::{DefaultScope, NameSet, TransformOptions};
    pub use crate::{TransformError, transform};
}

/// Transforms one PDE document into JavaScript.
///
/// The pipeline is strictly top-down: each stage consumes the previous
/// stage's output plus the session's append-only atom and string tables.
///
/// # Errors
///
/// Returns [`TransformError::UnbalancedBrackets`] for mismatched bracket
/// nesting; everything else the core does not recognize passes through
/// unchanged. [`TransformError::Internal`] reports a transformer bug (a
/// placeholder that resolves to no atom), never an input problem.
///
/// # Example
///
/// ```
/// use procjs_core::{TransformOptions, transform};
///
/// let js = transform("int x = 5;", &TransformOptions::default())?;
/// assert!(js.contains("var x = 5"));
/// # Ok::<(), procjs_core::TransformError>(())
/// ```
pub fn transform(source: &str, options: &TransformOptions) -> Result<String, TransformError> {
    let mut session = TransformSession::new();

    debug!(len = source.len(), "preparing source");
    let prepared = source_analysis::elide_literals(&mut session, source);
    let prepared = source_analysis::escape_identifiers(&prepared);
    let prepared = source_analysis::strip_generics(&prepared);
    source_analysis::atomize(&mut session, &prepared)?;
    debug!(atoms = session.atom_count(), "atomized");

    let root = parse::parse_root(&mut session)?;
    semantic_analysis::analyse(&mut session);

    let rendered = codegen::generate(&session, options, &root);
    let rendered = codegen::unescape_identifiers(&rendered);
    Ok(codegen::inject_strings(&session, &rendered))
}
