// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! AST construction over atomized source.
//!
//! The parse stages run strictly after source preparation
//! ([`crate::source_analysis`]) and build the AST bottom-up from the atom
//! table:
//!
//! - `declarations` - folds class/method/function/constructor headers
//!   into atoms of their own.
//! - `expressions` - expands and rewrites expression text, extracting
//!   functions, anonymous classes and inline objects as transforms.
//! - `statements` - scans statement streams for control flow.
//! - `class_body` - assembles class and interface members.
//!
//! Everything here is best-effort: unrecognized text flows through as raw
//! statements and is emitted unchanged.

pub(crate) mod class_body;
pub(crate) mod declarations;
pub(crate) mod expressions;
pub(crate) mod statements;
pub(crate) mod util;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::Root;
use crate::error::TransformError;
use crate::session::TransformSession;

static IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bimport\s+[^;]+;").expect("import pattern"));

/// Parses the prepared document (atom 0) into a [`Root`].
///
/// Java-style `import` statements have no JavaScript counterpart; the host
/// resolves libraries through its own registry, so they are dropped here.
///
/// # Errors
///
/// Surfaces [`TransformError::Internal`] when a placeholder fails to
/// resolve to its atom (a transformer bug, not an input error).
pub fn parse_root(session: &mut TransformSession) -> Result<Root, TransformError> {
    let top = session.atom_text(0)?.to_string();
    let extracted = declarations::extract_declarations(session, &top);
    let (without_imports, _) =
        util::replace_all_opt(&IMPORT, &extracted, |_| Some(String::new()));
    Ok(Root {
        statements: statements::transform_statements(session, &without_imports)?,
    })
}
