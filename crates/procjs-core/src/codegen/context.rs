// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The name-resolution context stack.
//!
//! Rendering rewrites every free identifier in expression text into one of:
//! a local (unchanged), a `this`-field, a `this`-method, a static class
//! member, a host-runtime member (`$p.<name>`), or itself. The rules live
//! in a stack of frames searched innermost-first, so function parameters
//! shadow block locals, which shadow class members, which shadow globals.
//!
//! The stack is threaded explicitly through the emitter rather than closed
//! over, so one emitter owns exactly one mutable context.

use std::collections::{HashMap, HashSet};

use ecow::EcoString;

/// A free identifier occurrence: `name`, an optional immediate `.member`,
/// and whether that member is being called.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NameUse<'a> {
    pub name: &'a str,
    pub member: Option<&'a str>,
    pub has_call: bool,
}

/// How one class scope resolves its members.
#[derive(Debug)]
pub(crate) struct ClassFrame {
    /// The class name, target for static member access.
    pub class_name: EcoString,
    /// The `$this_K` self pointer of this scope depth.
    pub self_id: String,
    /// Field name to staticness.
    pub fields: HashMap<EcoString, bool>,
    /// Method name to staticness.
    pub methods: HashMap<EcoString, bool>,
    /// Inner class names.
    pub inners: HashSet<EcoString>,
}

/// One entry of the resolution stack.
#[derive(Debug)]
pub(crate) enum Frame {
    /// Top-level scope: root locals, then host globals.
    Root { locals: HashSet<EcoString> },
    /// A class body scope.
    Class(ClassFrame),
    /// Parameters, catch parameters or block locals.
    Locals(HashSet<EcoString>),
}

/// The resolution stack itself.
#[derive(Debug, Default)]
pub(crate) struct ResolutionContext {
    frames: Vec<Frame>,
}

impl ResolutionContext {
    pub(crate) fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    /// Resolves one identifier occurrence. `is_global` decides membership
    /// in the host-runtime name set (fixed table plus option sets).
    pub(crate) fn resolve(&self, use_: NameUse<'_>, is_global: &dyn Fn(&str) -> bool) -> String {
        for frame in self.frames.iter().rev() {
            match frame {
                Frame::Locals(names) => {
                    if names.contains(use_.name) {
                        return use_.name.to_string();
                    }
                }
                Frame::Class(class) => {
                    if use_.name == "this" {
                        // A call or a standalone value wants the published
                        // object; a member access wants the raw scope
                        // pointer.
                        return if use_.has_call || use_.member.is_none() {
                            format!("{}.$self", class.self_id)
                        } else {
                            class.self_id.clone()
                        };
                    }
                    if let Some(&is_static) = class.fields.get(use_.name) {
                        return if is_static {
                            format!("{}.{}", class.class_name, use_.name)
                        } else {
                            format!("{}.{}", class.self_id, use_.name)
                        };
                    }
                    if class.inners.contains(use_.name) {
                        return format!("{}.{}", class.self_id, use_.name);
                    }
                    if let Some(&is_static) = class.methods.get(use_.name) {
                        return if is_static {
                            format!("{}.{}", class.class_name, use_.name)
                        } else {
                            format!("{}.$self.{}", class.self_id, use_.name)
                        };
                    }
                }
                Frame::Root { locals } => {
                    if locals.contains(use_.name) {
                        return use_.name.to_string();
                    }
                    if is_global(use_.name) {
                        return format!("$p.{}", use_.name);
                    }
                }
            }
        }
        use_.name.to_string()
    }
}
