// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Per-invocation transformer state.
//!
//! A [`TransformSession`] owns the append-only atom table, the string table
//! and the class registry for a single `transform` call. It is threaded by
//! mutable reference through every pipeline stage; nothing here is a process
//! global, so concurrent invocations never share state.
//!
//! # Atom table
//!
//! Atoms are source fragments extracted from the working text and replaced
//! by placeholder tokens of the form `"K<n>"` (quotes literal), where `K` is
//! the [`AtomKind`] letter and `<n>` indexes this table. Atom 0 is always
//! the bracket-free top level of the document. Atoms are created during
//! lexing and extraction and never mutated afterwards.
//!
//! # Class registry
//!
//! Class records form an arena indexed by [`ClassId`]. Cross-references
//! (enclosing scope, base class, derived classes) are ids, not references,
//! so the ownership cycles of the source model cost nothing here.

use ecow::EcoString;

use crate::error::TransformError;

/// Kind tag of an atom table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    /// `{...}` brace body.
    Brace,
    /// `(...)` paren group.
    Paren,
    /// `[...]` bracket group.
    Bracket,
    /// Extracted method declaration.
    Method,
    /// Extracted class or interface declaration.
    Class,
    /// Anonymous-class `new T() {...}` expression.
    InlineClass,
    /// Extracted constructor declaration.
    Constructor,
    /// Extracted `function` declaration.
    Function,
    /// Inline-object `{label: value}` body.
    InlineObject,
}

impl AtomKind {
    /// The single-letter tag used inside placeholder tokens.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Brace => 'A',
            Self::Paren => 'B',
            Self::Bracket => 'C',
            Self::Method => 'D',
            Self::Class => 'E',
            Self::InlineClass => 'F',
            Self::Constructor => 'G',
            Self::Function => 'H',
            Self::InlineObject => 'I',
        }
    }
}

/// One entry of the atom table: a source fragment plus its kind tag.
#[derive(Debug, Clone)]
pub struct Atom {
    /// Kind tag.
    pub kind: AtomKind,
    /// The fragment text, brackets included for bracket atoms.
    pub text: String,
}

/// Identifier of a class record in the session registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) usize);

impl ClassId {
    /// The textual label used for synthetic inline-class names.
    ///
    /// Ids are rendered 1-based (`class1`, `class2`, ...), so an anonymous
    /// `new Runnable() {...}` becomes `Runnable$class3` for the third
    /// registered class.
    #[must_use]
    pub fn label(self) -> String {
        format!("class{}", self.0 + 1)
    }
}

/// A class or interface known to the session.
#[derive(Debug, Clone)]
pub struct ClassRecord {
    /// Declared (or synthetic) name.
    pub name: EcoString,
    /// Whether this record is an interface.
    pub is_interface: bool,
    /// Enclosing class, if this is an inner class.
    pub scope: Option<ClassId>,
    /// Textual base class name from the `extends` clause.
    pub base_name: Option<EcoString>,
    /// Textual interface names from the `implements` clause
    /// (or `extends` list for interfaces).
    pub interface_names: Vec<EcoString>,
    /// Resolved base class, filled by the metadata pass.
    pub base: Option<ClassId>,
    /// Resolved interfaces, index-aligned with `interface_names`.
    /// `None` marks a name that resolves to nothing in scope.
    pub interfaces: Vec<Option<ClassId>>,
    /// Classes that extend or implement this one.
    pub derived: Vec<ClassId>,
    /// Emission weight. A class weighs strictly less than everything it
    /// depends on; siblings emit in descending weight order.
    pub weight: u32,
}

impl ClassRecord {
    /// Creates an unresolved record for a newly parsed class.
    #[must_use]
    pub fn new(name: EcoString, is_interface: bool, scope: Option<ClassId>) -> Self {
        Self {
            name,
            is_interface,
            scope,
            base_name: None,
            interface_names: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            derived: Vec::new(),
            weight: 0,
        }
    }
}

/// All mutable state of one transform invocation.
#[derive(Debug, Default)]
pub struct TransformSession {
    atoms: Vec<Atom>,
    strings: Vec<String>,
    classes: Vec<ClassRecord>,
    /// Class currently being parsed; scope for nested registrations.
    pub(crate) current_scope: Option<ClassId>,
}

impl TransformSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an atom and returns its placeholder token (`"K<n>"`).
    pub fn add_atom(&mut self, kind: AtomKind, text: impl Into<String>) -> String {
        let index = self.atoms.len();
        self.atoms.push(Atom {
            kind,
            text: text.into(),
        });
        format!("\"{}{}\"", kind.letter(), index)
    }

    /// Returns the text of the atom at `index`.
    ///
    /// A missing index is a transformer bug: every placeholder written into
    /// working text refers to an atom that was appended when the placeholder
    /// was created. Debug builds assert; release builds surface
    /// [`TransformError::Internal`] instead of emitting corrupt output.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Internal`] when no atom exists at `index`.
    pub fn atom_text(&self, index: usize) -> Result<&str, TransformError> {
        debug_assert!(index < self.atoms.len(), "missing atom index {index}");
        self.atoms
            .get(index)
            .map(|atom| atom.text.as_str())
            .ok_or_else(|| TransformError::missing_atom(index))
    }

    /// Number of atoms currently in the table.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Fills in the text of a reserved atom slot.
    ///
    /// Only the atomizer uses this, to finish atom 0 (the bracket-free top
    /// level) after the scan completes.
    pub(crate) fn set_atom_text(&mut self, index: usize, text: String) {
        self.atoms[index].text = text;
    }

    /// Appends a string-table entry and returns its placeholder (`'N'`).
    pub fn add_string(&mut self, text: impl Into<String>) -> String {
        let index = self.strings.len();
        self.strings.push(text.into());
        format!("'{index}'")
    }

    /// Returns the original literal at `index`, if it exists.
    #[must_use]
    pub fn string_at(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Registers a class record and returns its id.
    pub fn register_class(&mut self, record: ClassRecord) -> ClassId {
        let id = ClassId(self.classes.len());
        self.classes.push(record);
        id
    }

    /// Immutable access to a class record.
    #[must_use]
    pub fn class(&self, id: ClassId) -> &ClassRecord {
        &self.classes[id.0]
    }

    /// Mutable access to a class record.
    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassRecord {
        &mut self.classes[id.0]
    }

    /// All registered class ids, in insertion order.
    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.classes.len()).map(ClassId)
    }

    /// Classes declared directly inside `scope` (`None` for the top level),
    /// in insertion order.
    pub fn classes_in_scope(&self, scope: Option<ClassId>) -> impl Iterator<Item = ClassId> + '_ {
        self.class_ids()
            .filter(move |id| self.class(*id).scope == scope)
    }
}
