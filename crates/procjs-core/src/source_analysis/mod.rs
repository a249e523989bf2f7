// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source preparation for PDE documents.
//!
//! These are the leaf stages of the pipeline. They turn raw source text into
//! the masked, atomized form the declaration and statement transformers work
//! on:
//!
//! 1. [`elide_literals`] - strings, characters, regexes and comments are
//!    pulled out of the text so no later regex can be confused by their
//!    contents.
//! 2. [`escape_identifiers`] - literal `$` is rewritten to a reserved hex
//!    escape so it survives the `$`-based synthetic names the renderer
//!    introduces. Reversed after rendering.
//! 3. [`strip_generics`] - type parameter lists are erased to a fixed point.
//! 4. [`atomize`] - every balanced bracket group becomes an indexed atom,
//!    leaving a flat token stream.
//!
//! Each stage consumes the previous stage's output; the session's atom and
//! string tables are append-only.

mod atomizer;
mod elider;
mod generics;

#[cfg(test)]
mod property_tests;

pub use atomizer::atomize;
pub use elider::{elide_literals, escape_identifiers};
pub use generics::strip_generics;
