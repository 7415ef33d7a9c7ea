// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modal scoping: a stack of anchors restricting where input may land.

use alloc::vec::Vec;

use bramble_tree::{ComponentId, Tree};

/// Errors from modal stack operations.
///
/// All failures leave the stack order untouched.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ModalError {
    /// The anchor identifier is stale; only live components can anchor a
    /// modal scope.
    #[error("modal anchor is not attached to the tree")]
    NotAttached,
    /// The anchor is in the stack but not on top; scopes must unwind in
    /// reverse order of establishment.
    #[error("modal anchor is not the top of the stack")]
    NotTop,
    /// The anchor is not in the stack at all.
    #[error("modal anchor is not active")]
    NotActive,
}

/// An ordered stack of modal anchors.
///
/// While non-empty, the topmost anchor's subtree is the only part of the
/// tree that can receive fresh pointer and wheel input; everything outside
/// it misses. Nesting is allowed and the most recent anchor is
/// authoritative. Unwinding is strict: only the top may be popped.
#[derive(Debug, Default)]
pub struct ModalStack {
    anchors: Vec<ComponentId>,
}

impl ModalStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self {
            anchors: Vec::new(),
        }
    }

    /// Establish a modal scope anchored at `anchor`.
    ///
    /// Sets `MODAL_ROOT` on the anchor. Fails with [`ModalError::NotAttached`]
    /// for stale identifiers.
    pub fn push(&mut self, tree: &mut Tree, anchor: ComponentId) -> Result<(), ModalError> {
        if !tree.is_alive(anchor) {
            return Err(ModalError::NotAttached);
        }
        tree.set_modal_root(anchor, true);
        self.anchors.push(anchor);
        log::debug!("modal pushed: {anchor:?} (depth {})", self.anchors.len());
        Ok(())
    }

    /// Dismiss the modal scope anchored at `anchor`.
    ///
    /// Strict: only the current top may be popped. An anchor buried deeper
    /// in the stack yields [`ModalError::NotTop`] and the stack is left as
    /// it was; an unknown anchor yields [`ModalError::NotActive`].
    pub fn pop(&mut self, tree: &mut Tree, anchor: ComponentId) -> Result<(), ModalError> {
        match self.anchors.last() {
            Some(&top) if top == anchor => {
                self.anchors.pop();
                if !self.anchors.contains(&anchor) {
                    tree.set_modal_root(anchor, false);
                }
                log::debug!("modal popped: {anchor:?} (depth {})", self.anchors.len());
                Ok(())
            }
            _ if self.anchors.contains(&anchor) => Err(ModalError::NotTop),
            _ => Err(ModalError::NotActive),
        }
    }

    /// The authoritative anchor, if any scope is active.
    pub fn top(&self) -> Option<ComponentId> {
        self.anchors.last().copied()
    }

    /// Whether no scope is active.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Number of active scopes.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Drop every anchor inside `removed`'s subtree, ahead of its removal.
    ///
    /// Never fails; survivors keep their relative order.
    pub fn remove_anchors_in(&mut self, tree: &Tree, removed: ComponentId) {
        self.anchors
            .retain(|a| tree.is_alive(*a) && !tree.is_descendant_or_self(removed, *a));
    }
}
