// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble Focus: keyboard focus ownership and traversal.
//!
//! This crate models focus as:
//! - A single **owner** tracked by [`Focus`]: at most one component holds
//!   keyboard focus at a time.
//! - Pluggable **traversal policies** ([`TraversalPolicy`]) that enumerate
//!   focus candidates within a scope. The stock [`PreOrderPolicy`] walks the
//!   tree in pre-order (parents before children, siblings bottom to top).
//!
//! Transfers are transactional: a transfer fires `Lost` to the previous
//! holder, then `Gained` to the new one, and only then records the new
//! owner. Each event names the other end of the transfer in its `opposite`
//! field. Requesting focus for the current holder is a successful no-op and
//! fires nothing.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use bramble_focus::Focus;
//! use bramble_tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(Rect::new(0.0, 0.0, 100.0, 100.0));
//! let a = tree.insert(Rect::new(0.0, 0.0, 10.0, 10.0));
//! let b = tree.insert(Rect::new(20.0, 0.0, 30.0, 10.0));
//! tree.add_child(root, a).unwrap();
//! tree.add_child(root, b).unwrap();
//! tree.set_focusable(a, true);
//! tree.set_focusable(b, true);
//!
//! let mut focus = Focus::new();
//! assert!(focus.request_focus(&mut tree, a, false));
//! assert_eq!(focus.focused(), Some(a));
//!
//! // Tab forward: a -> b, then wrap back to a.
//! assert!(focus.transfer_next(&mut tree, root));
//! assert_eq!(focus.focused(), Some(b));
//! assert!(focus.transfer_next(&mut tree, root));
//! assert_eq!(focus.focused(), Some(a));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use bramble_events::{FocusEvent, FocusEventKind};
use bramble_tree::{ComponentFlags, ComponentId, Tree};

/// Whether `id` can take focus within `scope`.
///
/// The component itself must be focusable, visible, and enabled, and every
/// ancestor up to its root must be visible and enabled. A collapsed or
/// disabled container removes its whole subtree from traversal.
pub fn is_focus_candidate(tree: &Tree, id: ComponentId) -> bool {
    let Some(flags) = tree.flags(id) else {
        return false;
    };
    if !flags.contains(ComponentFlags::FOCUSABLE | ComponentFlags::VISIBLE | ComponentFlags::ENABLED)
    {
        return false;
    }
    let mut cur = tree.parent_of(id);
    while let Some(p) = cur {
        let Some(pf) = tree.flags(p) else {
            return false;
        };
        if !pf.contains(ComponentFlags::VISIBLE | ComponentFlags::ENABLED) {
            return false;
        }
        cur = tree.parent_of(p);
    }
    true
}

/// Enumerates focus candidates within a scope, without wrapping.
///
/// [`Focus`] layers wrap-around on top: when `after` runs off the end of the
/// scope it retries from `first`, and symmetrically for backward traversal.
pub trait TraversalPolicy {
    /// First candidate in the scope's traversal order.
    fn first(&self, tree: &Tree, scope: ComponentId) -> Option<ComponentId>;

    /// Last candidate in the scope's traversal order.
    fn last(&self, tree: &Tree, scope: ComponentId) -> Option<ComponentId>;

    /// Candidate following `of`, or `None` at the end of the scope.
    fn after(&self, tree: &Tree, scope: ComponentId, of: ComponentId) -> Option<ComponentId>;

    /// Candidate preceding `of`, or `None` at the start of the scope.
    fn before(&self, tree: &Tree, scope: ComponentId, of: ComponentId) -> Option<ComponentId>;
}

/// Pre-order traversal: parents before children, siblings bottom to top.
///
/// This matches attachment order, so Tab visits components in the order the
/// host built them.
#[derive(Copy, Clone, Debug, Default)]
pub struct PreOrderPolicy;

impl TraversalPolicy for PreOrderPolicy {
    fn first(&self, tree: &Tree, scope: ComponentId) -> Option<ComponentId> {
        let mut cur = tree.first_in(scope)?;
        loop {
            if is_focus_candidate(tree, cur) {
                return Some(cur);
            }
            cur = tree.next_pre_order(scope, cur)?;
        }
    }

    fn last(&self, tree: &Tree, scope: ComponentId) -> Option<ComponentId> {
        let mut cur = tree.last_in(scope)?;
        loop {
            if is_focus_candidate(tree, cur) {
                return Some(cur);
            }
            cur = tree.prev_pre_order(scope, cur)?;
        }
    }

    fn after(&self, tree: &Tree, scope: ComponentId, of: ComponentId) -> Option<ComponentId> {
        let mut cur = tree.next_pre_order(scope, of)?;
        loop {
            if is_focus_candidate(tree, cur) {
                return Some(cur);
            }
            cur = tree.next_pre_order(scope, cur)?;
        }
    }

    fn before(&self, tree: &Tree, scope: ComponentId, of: ComponentId) -> Option<ComponentId> {
        let mut cur = tree.prev_pre_order(scope, of)?;
        loop {
            if is_focus_candidate(tree, cur) {
                return Some(cur);
            }
            cur = tree.prev_pre_order(scope, cur)?;
        }
    }
}

/// The focus owner and its transfer machinery.
///
/// Holds at most one focused component and performs transfers against a
/// [`Tree`], firing `Lost`/`Gained` events through the tree's dispatch.
#[derive(Debug, Default)]
pub struct Focus<P = PreOrderPolicy> {
    policy: P,
    current: Option<ComponentId>,
}

impl Focus<PreOrderPolicy> {
    /// Create a focus manager with the stock pre-order policy.
    pub fn new() -> Self {
        Self::with_policy(PreOrderPolicy)
    }
}

impl<P: TraversalPolicy> Focus<P> {
    /// Create a focus manager with a custom traversal policy.
    pub fn with_policy(policy: P) -> Self {
        Self {
            policy,
            current: None,
        }
    }

    /// The component currently holding focus, if any.
    pub fn focused(&self) -> Option<ComponentId> {
        self.current
    }

    /// Transfer focus to `target`.
    ///
    /// Fails (returning `false`, firing nothing) when the target is stale or
    /// not an eligible candidate. Re-requesting focus for the current holder
    /// succeeds without firing events. `temporary` is carried through to the
    /// event payloads untouched.
    pub fn request_focus(&mut self, tree: &mut Tree, target: ComponentId, temporary: bool) -> bool {
        if self.current == Some(target) {
            return true;
        }
        if !is_focus_candidate(tree, target) {
            log::trace!("focus request rejected: {target:?} is not a candidate");
            return false;
        }
        let old = self.current;
        if let Some(old) = old {
            let lost = FocusEvent::new(old, FocusEventKind::Lost, Some(target), temporary, tree.now());
            tree.dispatch_focus(old, &lost);
        }
        let gained = FocusEvent::new(target, FocusEventKind::Gained, old, temporary, tree.now());
        tree.dispatch_focus(target, &gained);
        self.current = Some(target);
        log::debug!("focus moved: {old:?} -> {target:?}");
        true
    }

    /// Drop focus entirely, firing `Lost` to the previous holder.
    pub fn clear(&mut self, tree: &mut Tree) {
        if let Some(old) = self.current.take() {
            let lost = FocusEvent::new(old, FocusEventKind::Lost, None, false, tree.now());
            tree.dispatch_focus(old, &lost);
            log::debug!("focus cleared: {old:?}");
        }
    }

    /// Move focus forward within `scope`, wrapping at the end.
    ///
    /// With no current focus (or focus outside the scope), starts at the
    /// scope's first candidate. Returns `false` when the scope has none.
    pub fn transfer_next(&mut self, tree: &mut Tree, scope: ComponentId) -> bool {
        let candidate = match self.current.filter(|c| tree.is_descendant_or_self(scope, *c)) {
            Some(cur) => self
                .policy
                .after(tree, scope, cur)
                .or_else(|| self.policy.first(tree, scope)),
            None => self.policy.first(tree, scope),
        };
        match candidate {
            Some(next) => self.request_focus(tree, next, false),
            None => false,
        }
    }

    /// Move focus backward within `scope`, wrapping at the start.
    pub fn transfer_previous(&mut self, tree: &mut Tree, scope: ComponentId) -> bool {
        let candidate = match self.current.filter(|c| tree.is_descendant_or_self(scope, *c)) {
            Some(cur) => self
                .policy
                .before(tree, scope, cur)
                .or_else(|| self.policy.last(tree, scope)),
            None => self.policy.last(tree, scope),
        };
        match candidate {
            Some(prev) => self.request_focus(tree, prev, false),
            None => false,
        }
    }

    /// Reconcile focus ahead of removing `removed`'s subtree.
    ///
    /// Call while the subtree is still attached. If the focused component
    /// lies inside it, focus moves to the next candidate outside the subtree
    /// (forward from the holder, wrapping within its root); with no such
    /// candidate, focus is cleared. This never fails: worst case the toolkit
    /// ends up with nothing focused.
    pub fn on_detach(&mut self, tree: &mut Tree, removed: ComponentId) {
        let Some(cur) = self.current else {
            return;
        };
        if !tree.is_descendant_or_self(removed, cur) {
            return;
        }
        let mut scope = cur;
        while let Some(p) = tree.parent_of(scope) {
            scope = p;
        }
        let start = self
            .policy
            .after(tree, scope, cur)
            .or_else(|| self.policy.first(tree, scope));
        let mut candidate = start;
        // Scan forward past the doomed subtree; stop after one full lap.
        while let Some(c) = candidate {
            if !tree.is_descendant_or_self(removed, c) {
                self.request_focus(tree, c, false);
                return;
            }
            candidate = self.policy.after(tree, scope, c);
            if candidate.is_none() && start != self.policy.first(tree, scope) {
                candidate = self.policy.first(tree, scope);
            }
            if candidate == start {
                break;
            }
        }
        self.clear(tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use kurbo::Rect;

    use bramble_events::FocusListener;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    fn focusable(tree: &mut Tree, parent: ComponentId, r: Rect) -> ComponentId {
        let id = tree.insert(r);
        tree.add_child(parent, id).unwrap();
        tree.set_focusable(id, true);
        id
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Transfer {
        Gained(ComponentId, Option<ComponentId>),
        Lost(ComponentId, Option<ComponentId>),
    }

    struct Recorder(Rc<RefCell<Vec<Transfer>>>);

    impl FocusListener<ComponentId> for Recorder {
        fn focus_gained(&mut self, event: &FocusEvent<ComponentId>) {
            self.0
                .borrow_mut()
                .push(Transfer::Gained(event.source, event.opposite));
        }
        fn focus_lost(&mut self, event: &FocusEvent<ComponentId>) {
            self.0
                .borrow_mut()
                .push(Transfer::Lost(event.source, event.opposite));
        }
    }

    fn record(tree: &mut Tree, id: ComponentId, log: &Rc<RefCell<Vec<Transfer>>>) {
        if let Some(listeners) = tree.listeners_mut(id) {
            listeners.focus.add(Box::new(Recorder(log.clone())));
        }
    }

    #[test]
    fn transfer_fires_lost_then_gained_with_opposites() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 100.0, 100.0));
        let a = focusable(&mut tree, root, rect(0.0, 0.0, 10.0, 10.0));
        let b = focusable(&mut tree, root, rect(20.0, 0.0, 10.0, 10.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut tree, a, &log);
        record(&mut tree, b, &log);

        let mut focus = Focus::new();
        assert!(focus.request_focus(&mut tree, a, false));
        assert!(focus.request_focus(&mut tree, b, false));

        assert_eq!(
            *log.borrow(),
            vec![
                Transfer::Gained(a, None),
                Transfer::Lost(a, Some(b)),
                Transfer::Gained(b, Some(a)),
            ]
        );
        assert_eq!(focus.focused(), Some(b));
    }

    #[test]
    fn refocusing_the_holder_is_a_silent_success() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 100.0, 100.0));
        let a = focusable(&mut tree, root, rect(0.0, 0.0, 10.0, 10.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut tree, a, &log);

        let mut focus = Focus::new();
        assert!(focus.request_focus(&mut tree, a, false));
        log.borrow_mut().clear();
        assert!(focus.request_focus(&mut tree, a, false));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn ineligible_targets_are_rejected() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 100.0, 100.0));
        let panel = tree.insert(rect(0.0, 0.0, 50.0, 50.0));
        tree.add_child(root, panel).unwrap();
        let a = focusable(&mut tree, panel, rect(0.0, 0.0, 10.0, 10.0));
        let plain = tree.insert(rect(0.0, 0.0, 10.0, 10.0));
        tree.add_child(root, plain).unwrap();

        let mut focus = Focus::new();
        // Not focusable.
        assert!(!focus.request_focus(&mut tree, plain, false));
        // Hidden ancestor shields the candidate.
        tree.set_visible(panel, false);
        assert!(!focus.request_focus(&mut tree, a, false));
        tree.set_visible(panel, true);
        assert!(focus.request_focus(&mut tree, a, false));
        // Disabling the candidate itself also rejects.
        tree.set_enabled(a, false);
        let b = focusable(&mut tree, root, rect(60.0, 0.0, 10.0, 10.0));
        assert!(focus.request_focus(&mut tree, b, false));
        assert!(!focus.request_focus(&mut tree, a, false));
    }

    #[test]
    fn pre_order_traversal_wraps() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 100.0, 100.0));
        let a = focusable(&mut tree, root, rect(0.0, 0.0, 10.0, 10.0));
        let b = tree.insert(rect(20.0, 0.0, 30.0, 30.0));
        tree.add_child(root, b).unwrap();
        let b1 = focusable(&mut tree, b, rect(0.0, 0.0, 5.0, 5.0));
        let b2 = focusable(&mut tree, b, rect(10.0, 0.0, 5.0, 5.0));
        let c = focusable(&mut tree, root, rect(60.0, 0.0, 10.0, 10.0));

        let mut focus = Focus::new();
        let mut order = Vec::new();
        for _ in 0..5 {
            assert!(focus.transfer_next(&mut tree, root));
            order.push(focus.focused().unwrap());
        }
        // b is not focusable, so the cycle is a, b1, b2, c, then wrap to a.
        assert_eq!(order, vec![a, b1, b2, c, a]);

        assert!(focus.transfer_previous(&mut tree, root));
        assert_eq!(focus.focused(), Some(c));
    }

    #[test]
    fn transfer_next_without_focus_starts_at_the_first_candidate() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 100.0, 100.0));
        let a = focusable(&mut tree, root, rect(0.0, 0.0, 10.0, 10.0));
        let _b = focusable(&mut tree, root, rect(20.0, 0.0, 10.0, 10.0));

        let mut focus = Focus::new();
        assert!(focus.transfer_next(&mut tree, root));
        assert_eq!(focus.focused(), Some(a));
    }

    #[test]
    fn detach_moves_focus_outside_the_doomed_subtree() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 100.0, 100.0));
        let panel = tree.insert(rect(0.0, 0.0, 50.0, 50.0));
        tree.add_child(root, panel).unwrap();
        let inner = focusable(&mut tree, panel, rect(0.0, 0.0, 10.0, 10.0));
        let outside = focusable(&mut tree, root, rect(60.0, 0.0, 10.0, 10.0));

        let mut focus = Focus::new();
        assert!(focus.request_focus(&mut tree, inner, false));
        focus.on_detach(&mut tree, panel);
        assert_eq!(focus.focused(), Some(outside));

        // With no candidate left outside, focus simply clears.
        focus.on_detach(&mut tree, outside);
        tree.remove(outside);
        assert!(focus.request_focus(&mut tree, inner, false));
        focus.on_detach(&mut tree, panel);
        assert_eq!(focus.focused(), None);
    }

    #[test]
    fn detach_elsewhere_leaves_focus_alone() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 100.0, 100.0));
        let a = focusable(&mut tree, root, rect(0.0, 0.0, 10.0, 10.0));
        let b = focusable(&mut tree, root, rect(20.0, 0.0, 10.0, 10.0));

        let mut focus = Focus::new();
        assert!(focus.request_focus(&mut tree, a, false));
        focus.on_detach(&mut tree, b);
        assert_eq!(focus.focused(), Some(a));
    }
}
