// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Host-facing transformer options.
//!
//! The host sketch engine owns the runtime environment the emitted code runs
//! in; these options describe the parts of that environment the resolver
//! must know about - which free identifiers live on the runtime object `$p`.

use std::collections::{BTreeMap, BTreeSet};

use ecow::EcoString;

/// A read-only set of identifier names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSet(BTreeSet<EcoString>);

impl NameSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Number of names in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<EcoString>> FromIterator<S> for NameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// The default scope the host exposes to sketches.
///
/// `constants` is the nested `PConstants` name set (`PI`, `CORNER`, `RGB`,
/// ...); both sets resolve to members of `$p`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultScope {
    /// Names exported by the default scope itself.
    pub names: NameSet,
    /// The nested `PConstants` name set.
    pub constants: NameSet,
}

impl DefaultScope {
    /// Membership across both nested sets.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name) || self.constants.contains(name)
    }
}

/// Options for one transform invocation.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// The host's default scope, consulted by the identifier resolver.
    pub default_scope: DefaultScope,
    /// Custom host-global definitions; the keys join the global name set.
    pub a_functions: BTreeMap<EcoString, String>,
    /// Names exported by registered host libraries (the flattened `exports`
    /// arrays of the host's plug-in registry).
    pub library_exports: Vec<EcoString>,
}

impl TransformOptions {
    /// Whether `name` is supplied by the host environment beyond the fixed
    /// runtime member list.
    #[must_use]
    pub fn provides(&self, name: &str) -> bool {
        self.default_scope.contains(name)
            || self.a_functions.contains_key(name)
            || self.library_exports.iter().any(|export| export == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scope_spans_both_sets() {
        let scope = DefaultScope {
            names: ["println"].into_iter().collect(),
            constants: ["PI", "CORNER"].into_iter().collect(),
        };
        assert!(scope.contains("println"));
        assert!(scope.contains("PI"));
        assert!(!scope.contains("TWO_PI"));
    }

    #[test]
    fn library_exports_and_functions_resolve() {
        let mut options = TransformOptions::default();
        options
            .a_functions
            .insert("customHelper".into(), "function(){}".into());
        options.library_exports.push("glitchFilter".into());
        assert!(options.provides("customHelper"));
        assert!(options.provides("glitchFilter"));
        assert!(!options.provides("missing"));
    }
}
