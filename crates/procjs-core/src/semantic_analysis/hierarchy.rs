// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Base/interface resolution and topological weighting.

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use crate::session::{ClassId, TransformSession};

/// Resolves a (possibly dotted) type name as seen from `from`.
///
/// The first segment is searched through the chain of enclosing scopes:
/// the classes declared beside `from`, then beside each enclosing class,
/// finally the top level. Remaining segments walk inner classes by name.
fn resolve_name(session: &TransformSession, from: ClassId, name: &str) -> Option<ClassId> {
    let mut parts = name.split('.').map(str::trim);
    let first = parts.next()?;

    let mut scope = session.class(from).scope;
    let head = loop {
        let found = session
            .classes_in_scope(scope)
            .find(|id| session.class(*id).name == first);
        if let Some(found) = found {
            break found;
        }
        match scope {
            Some(outer) => scope = session.class(outer).scope,
            None => return None,
        }
    };

    parts.try_fold(head, |current, part| {
        session
            .classes_in_scope(Some(current))
            .find(|id| session.class(*id).name == part)
    })
}

/// Binds every class's `base_name` and `interface_names` to registry ids
/// and records the reverse `derived` links.
pub fn resolve_metadata(session: &mut TransformSession) {
    let ids: Vec<ClassId> = session.class_ids().collect();
    for id in ids {
        if let Some(base_name) = session.class(id).base_name.clone() {
            if let Some(base) = resolve_name(session, id, &base_name) {
                session.class_mut(id).base = Some(base);
                session.class_mut(base).derived.push(id);
            } else {
                trace!(class = %session.class(id).name, base = %base_name, "unresolved base");
            }
        }
        let names = session.class(id).interface_names.clone();
        for (i, name) in names.iter().enumerate() {
            if let Some(target) = resolve_name(session, id, name) {
                if let Some(slot) = session.class_mut(id).interfaces.get_mut(i) {
                    *slot = Some(target);
                    session.class_mut(target).derived.push(id);
                }
            }
        }
    }
}

/// Assigns emission weights with a worklist.
///
/// Classes with no inner classes and no derived classes seed the queue at
/// weight 0. Every other class waits on that dependency set; when the last
/// member of the set is popped, the waiter enqueues one weight level above
/// it. Siblings then emit in descending weight order, so a base always
/// precedes everything built on it.
pub fn assign_weights(session: &mut TransformSession) {
    let ids: Vec<ClassId> = session.class_ids().collect();
    let mut pending: HashMap<ClassId, Vec<ClassId>> = HashMap::new();
    let mut queue: VecDeque<ClassId> = VecDeque::new();

    for &id in &ids {
        let mut depends: Vec<ClassId> = session.classes_in_scope(Some(id)).collect();
        depends.extend(&session.class(id).derived);
        if depends.is_empty() {
            session.class_mut(id).weight = 0;
            queue.push_back(id);
        } else {
            pending.insert(id, depends);
        }
    }

    while let Some(id) = queue.pop_front() {
        let weight = session.class(id).weight;
        let mut waiters = Vec::new();
        if let Some(scope) = session.class(id).scope {
            waiters.push(scope);
        }
        if let Some(base) = session.class(id).base {
            waiters.push(base);
        }
        waiters.extend(session.class(id).interfaces.iter().flatten().copied());

        for waiter in waiters {
            if settle(&mut pending, waiter, id) {
                session.class_mut(waiter).weight = weight + 1;
                queue.push_back(waiter);
            }
        }
    }
}

/// Removes `popped` from `waiter`'s dependency set; true when the set just
/// drained and the waiter is ready to be weighted.
fn settle(pending: &mut HashMap<ClassId, Vec<ClassId>>, waiter: ClassId, popped: ClassId) -> bool {
    let Some(depends) = pending.get_mut(&waiter) else {
        return false;
    };
    let Some(position) = depends.iter().position(|d| *d == popped) else {
        return false;
    };
    depends.remove(position);
    if depends.is_empty() {
        pending.remove(&waiter);
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ClassRecord;

    fn class(session: &mut TransformSession, name: &str, scope: Option<ClassId>) -> ClassId {
        session.register_class(ClassRecord::new(name.into(), false, scope))
    }

    #[test]
    fn base_resolves_through_global_scope() {
        let mut session = TransformSession::new();
        let a = class(&mut session, "A", None);
        let b = class(&mut session, "B", None);
        session.class_mut(b).base_name = Some("A".into());
        resolve_metadata(&mut session);
        assert_eq!(session.class(b).base, Some(a));
        assert_eq!(session.class(a).derived, vec![b]);
    }

    #[test]
    fn inner_name_shadows_global() {
        let mut session = TransformSession::new();
        let _global_t = class(&mut session, "T", None);
        let outer = class(&mut session, "Outer", None);
        let inner_t = class(&mut session, "T", Some(outer));
        let user = class(&mut session, "User", Some(outer));
        session.class_mut(user).base_name = Some("T".into());
        resolve_metadata(&mut session);
        assert_eq!(session.class(user).base, Some(inner_t));
    }

    #[test]
    fn dotted_name_walks_inner_classes() {
        let mut session = TransformSession::new();
        let outer = class(&mut session, "Outer", None);
        let inner = class(&mut session, "Inner", Some(outer));
        let user = class(&mut session, "User", None);
        session.class_mut(user).base_name = Some("Outer.Inner".into());
        resolve_metadata(&mut session);
        assert_eq!(session.class(user).base, Some(inner));
    }

    #[test]
    fn weights_order_bases_before_derived() {
        let mut session = TransformSession::new();
        // Declared in reverse order on purpose.
        let c = class(&mut session, "C", None);
        let b = class(&mut session, "B", None);
        let a = class(&mut session, "A", None);
        session.class_mut(c).base_name = Some("B".into());
        session.class_mut(b).base_name = Some("A".into());
        resolve_metadata(&mut session);
        assign_weights(&mut session);
        assert_eq!(session.class(c).weight, 0);
        assert_eq!(session.class(b).weight, 1);
        assert_eq!(session.class(a).weight, 2);
    }

    #[test]
    fn enclosing_class_outweighs_inner() {
        let mut session = TransformSession::new();
        let outer = class(&mut session, "Outer", None);
        let inner = class(&mut session, "Inner", Some(outer));
        assign_weights(&mut session);
        assert!(session.class(outer).weight > session.class(inner).weight);
    }

    #[test]
    fn interface_outweighs_implementor() {
        let mut session = TransformSession::new();
        let shape = class(&mut session, "Drawable", None);
        session.class_mut(shape).is_interface = true;
        let circle = class(&mut session, "Circle", None);
        session.class_mut(circle).interface_names = vec!["Drawable".into()];
        session.class_mut(circle).interfaces = vec![None];
        resolve_metadata(&mut session);
        assign_weights(&mut session);
        assert!(session.class(shape).weight > session.class(circle).weight);
    }
}
