// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Post-parse analysis over the class registry.
//!
//! Runs after the full AST exists and before rendering:
//!
//! 1. [`resolve_metadata`] - binds textual `extends`/`implements` names to
//!    registry ids, searching the chain of enclosing scopes, and records
//!    the reverse `derived` links.
//! 2. [`assign_weights`] - computes emission weights so every class emits
//!    after its base, its enclosing scope and its interfaces.
//!
//! Unknown names stay unresolved; the renderer falls back to emitting them
//! textually and the metadata arrays omit them.

mod hierarchy;

pub use hierarchy::{assign_weights, resolve_metadata};

use crate::session::TransformSession;

/// Runs both analysis passes in order.
pub fn analyse(session: &mut TransformSession) {
    resolve_metadata(session);
    assign_weights(session);
}
