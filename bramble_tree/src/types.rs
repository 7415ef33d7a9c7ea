// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifiers, flags, and structural errors.

use bitflags::bitflags;

/// Stable identifier for a component in a [`Tree`](crate::Tree).
///
/// Identifiers are generational: removing a component and reusing its slot
/// bumps the generation, so identifiers held across a removal go stale
/// rather than aliasing the new occupant. Accessors return `None` for stale
/// identifiers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ComponentId {
    idx: u32,
    generation: u32,
}

impl ComponentId {
    /// Create an identifier from a slot index and generation.
    pub(crate) fn new(idx: u32, generation: u32) -> Self {
        Self { idx, generation }
    }

    /// Slot index into the tree's storage.
    pub(crate) fn idx(self) -> usize {
        self.idx as usize
    }

    /// Generation this identifier was minted with.
    pub(crate) fn generation(self) -> u32 {
        self.generation
    }
}

bitflags! {
    /// Per-component behavior flags.
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct ComponentFlags: u8 {
        /// Participates in painting and hit testing.
        const VISIBLE = 1 << 0;
        /// Accepts input. Disabled components are skipped by hit testing
        /// and focus traversal but remain visible.
        const ENABLED = 1 << 1;
        /// Eligible to receive keyboard focus.
        const FOCUSABLE = 1 << 2;
        /// Anchor of an active modal scope.
        const MODAL_ROOT = 1 << 3;
    }
}

impl Default for ComponentFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::ENABLED
    }
}

/// Structural errors from attaching components.
///
/// All attachment failures leave the tree unmodified.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// The child already has a parent; detach it first.
    #[error("component is already attached to a parent")]
    AlreadyAttached,
    /// A component cannot be its own child.
    #[error("cannot attach a component to itself")]
    AttachToSelf,
    /// The prospective parent is a descendant of the child.
    #[error("attachment would create a cycle")]
    Cycle,
    /// One of the identifiers refers to a removed component.
    #[error("stale component identifier")]
    Stale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_are_visible_and_enabled() {
        let flags = ComponentFlags::default();
        assert!(flags.contains(ComponentFlags::VISIBLE));
        assert!(flags.contains(ComponentFlags::ENABLED));
        assert!(!flags.contains(ComponentFlags::FOCUSABLE));
        assert!(!flags.contains(ComponentFlags::MODAL_ROOT));
    }
}
