// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, geometry, hit testing, dispatch.

use alloc::vec::Vec;
use core::any::Any;
use kurbo::{Point, Rect, Vec2};

use bramble_events::{
    ComponentEvent, ComponentEventKind, FocusEvent, FocusEventKind, KeyEvent, KeyEventKind,
    Listeners, MouseEvent, MouseEventKind, PaintEvent, WheelEvent,
};

use crate::types::{ComponentFlags, ComponentId, TreeError};

/// The component tree.
///
/// Components are stored in a generational slot arena. Each carries
/// parent-relative bounds, behavior flags, and per-capability listener sets.
/// Structure is explicit: [`Tree::insert`] creates a detached component and
/// [`Tree::add_child`] attaches it, appending to the parent's child list.
/// Later siblings stack on top of earlier ones, so hit testing walks
/// children back to front.
///
/// The tree owns no clock; the host advances one with [`Tree::set_now`] and
/// synthesized notifications (bounds and visibility changes) are stamped
/// with it.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use bramble_tree::{QueryFilter, Tree};
///
/// let mut tree = Tree::new();
/// let root = tree.insert(Rect::new(0.0, 0.0, 100.0, 100.0));
/// let child = tree.insert(Rect::new(10.0, 10.0, 50.0, 50.0));
/// tree.add_child(root, child).unwrap();
///
/// let hit = tree.hit_test(Point::new(20.0, 20.0), QueryFilter::new().visible());
/// assert_eq!(hit, Some(child));
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    now_us: u64,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("now_us", &self.now_us)
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Filters applied during hit testing.
///
/// A component whose flags do not satisfy the filter is skipped *together
/// with its entire subtree*: a hidden or disabled container shields its
/// children from queries.
#[derive(Clone, Copy, Debug)]
pub struct QueryFilter {
    /// Bitfield of required flags. Only components containing all of these
    /// flags participate.
    pub required_flags: ComponentFlags,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            required_flags: ComponentFlags::empty(),
        }
    }
}

impl QueryFilter {
    /// Create a new empty filter (includes all components).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter to only visible components.
    pub fn visible(mut self) -> Self {
        self.required_flags |= ComponentFlags::VISIBLE;
        self
    }

    /// Filter to only enabled components.
    pub fn enabled(mut self) -> Self {
        self.required_flags |= ComponentFlags::ENABLED;
        self
    }

    /// Filter to only focusable components.
    pub fn focusable(mut self) -> Self {
        self.required_flags |= ComponentFlags::FOCUSABLE;
        self
    }

    /// Check if a component's flags satisfy this filter.
    pub fn matches(&self, flags: ComponentFlags) -> bool {
        flags.contains(self.required_flags)
    }
}

struct Node {
    generation: u32,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
    /// Bounds relative to the parent's origin (surface origin for roots).
    bounds: Rect,
    flags: ComponentFlags,
    listeners: Listeners<ComponentId>,
}

impl Node {
    fn new(generation: u32, bounds: Rect, flags: ComponentFlags) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            bounds,
            flags,
            listeners: Listeners::default(),
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            now_us: 0,
        }
    }

    /// Advance the tree's clock. Synthesized notifications carry this value.
    pub fn set_now(&mut self, timestamp_us: u64) {
        self.now_us = timestamp_us;
    }

    /// The tree's current clock value in microseconds.
    pub fn now(&self) -> u64 {
        self.now_us
    }

    /// Insert a new detached component with the given parent-relative bounds.
    ///
    /// The component starts visible and enabled, not focusable, with no
    /// listeners and no parent. Attach it with [`Tree::add_child`] or leave
    /// it detached to act as a root.
    pub fn insert(&mut self, bounds: Rect) -> ComponentId {
        self.insert_with_flags(bounds, ComponentFlags::default())
    }

    /// Insert a new detached component with explicit flags.
    pub fn insert_with_flags(&mut self, bounds: Rect, flags: ComponentFlags) -> ComponentId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, bounds, flags));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ComponentId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, bounds, flags)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ComponentId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        ComponentId::new(idx, generation)
    }

    /// Attach `child` as the last (topmost) child of `parent`.
    ///
    /// Fails without modifying the tree if either identifier is stale, the
    /// child already has a parent, the two are the same component, or the
    /// attachment would close a cycle.
    pub fn add_child(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), TreeError> {
        if parent == child {
            return Err(TreeError::AttachToSelf);
        }
        if !self.is_alive(parent) || !self.is_alive(child) {
            return Err(TreeError::Stale);
        }
        if self.node(child).parent.is_some() {
            return Err(TreeError::AlreadyAttached);
        }
        if self.is_descendant_or_self(child, parent) {
            return Err(TreeError::Cycle);
        }
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Remove a component and its entire subtree.
    ///
    /// All identifiers into the removed subtree become stale. Removing a
    /// stale identifier is a no-op. Removal by itself performs no routing
    /// cleanup; hosts that route input through a
    /// `Router` should remove through it instead.
    pub fn remove(&mut self, id: ComponentId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent
            && self.is_alive(parent)
        {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Whether `id` refers to a live component.
    pub fn is_alive(&self, id: ComponentId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .is_some_and(|n| n.generation == id.generation())
    }

    /// The parent of a live component, if attached.
    pub fn parent_of(&self, id: ComponentId) -> Option<ComponentId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// The children of a live component, bottom to top.
    pub fn children_of(&self, id: ComponentId) -> &[ComponentId] {
        self.node_opt(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Flags of a live component.
    pub fn flags(&self, id: ComponentId) -> Option<ComponentFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Parent-relative bounds of a live component.
    pub fn bounds(&self, id: ComponentId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.bounds)
    }

    /// Absolute bounds in toolkit surface space.
    ///
    /// Computed on demand by summing ancestor origins; nothing is cached.
    pub fn abs_bounds(&self, id: ComponentId) -> Option<Rect> {
        let bounds = self.bounds(id)?;
        let mut offset = Vec2::ZERO;
        let mut cur = self.parent_of(id);
        while let Some(p) = cur {
            let b = self.bounds(p)?;
            offset += b.origin().to_vec2();
            cur = self.parent_of(p);
        }
        Some(bounds + offset)
    }

    /// All live components without a parent, in slot order.
    pub fn roots(&self) -> Vec<ComponentId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "ComponentId uses 32-bit indices by design."
                    )]
                    Some(ComponentId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect()
    }

    /// Whether `id` is `ancestor` itself or lies in its subtree.
    pub fn is_descendant_or_self(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(id) {
            return false;
        }
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent_of(c);
        }
        false
    }

    /// Update a component's parent-relative bounds.
    ///
    /// Fires `Moved` to the component's own listeners when the origin
    /// changes and `Resized` when the size changes, stamped with the tree
    /// clock. No-op on stale identifiers.
    pub fn set_bounds(&mut self, id: ComponentId, bounds: Rect) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        let old = n.bounds;
        if old == bounds {
            return;
        }
        n.bounds = bounds;
        if old.origin() != bounds.origin() {
            let ev = ComponentEvent::new(id, ComponentEventKind::Moved, self.now_us);
            self.dispatch_component(id, &ev);
        }
        if old.size() != bounds.size() {
            let ev = ComponentEvent::new(id, ComponentEventKind::Resized, self.now_us);
            self.dispatch_component(id, &ev);
        }
    }

    /// Show or hide a component.
    ///
    /// Fires `Shown` or `Hidden` to the component's own listeners on an
    /// actual change. Hiding does not touch routing state by itself; the
    /// router reconciles hover on the next pointer move.
    pub fn set_visible(&mut self, id: ComponentId, visible: bool) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        if n.flags.contains(ComponentFlags::VISIBLE) == visible {
            return;
        }
        n.flags.set(ComponentFlags::VISIBLE, visible);
        let kind = if visible {
            ComponentEventKind::Shown
        } else {
            ComponentEventKind::Hidden
        };
        let ev = ComponentEvent::new(id, kind, self.now_us);
        self.dispatch_component(id, &ev);
    }

    /// Enable or disable a component.
    pub fn set_enabled(&mut self, id: ComponentId, enabled: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags.set(ComponentFlags::ENABLED, enabled);
        }
    }

    /// Mark a component as focus-eligible or not.
    pub fn set_focusable(&mut self, id: ComponentId, focusable: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags.set(ComponentFlags::FOCUSABLE, focusable);
        }
    }

    /// Mark or clear a component as the anchor of a modal scope.
    ///
    /// Maintained by the router's modal stack; hosts normally do not call
    /// this directly.
    pub fn set_modal_root(&mut self, id: ComponentId, modal: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags.set(ComponentFlags::MODAL_ROOT, modal);
        }
    }

    /// Access a component's listener sets mutably.
    pub fn listeners_mut(&mut self, id: ComponentId) -> Option<&mut Listeners<ComponentId>> {
        self.node_opt_mut(id).map(|n| &mut n.listeners)
    }

    /// Hit test an absolute point against every root, topmost first.
    ///
    /// Returns the innermost component that contains the point and whose
    /// ancestors (up to the root) all satisfy `filter`.
    pub fn hit_test(&self, point: Point, filter: QueryFilter) -> Option<ComponentId> {
        for root in self.roots().into_iter().rev() {
            if let Some(hit) = self.hit_node(root, point, filter) {
                return Some(hit);
            }
        }
        None
    }

    /// Hit test an absolute point within the subtree rooted at `root`.
    pub fn hit_test_from(
        &self,
        root: ComponentId,
        point: Point,
        filter: QueryFilter,
    ) -> Option<ComponentId> {
        // Translate into the root's parent space before descending.
        let mut offset = Vec2::ZERO;
        let mut cur = self.parent_of(root);
        while let Some(p) = cur {
            offset += self.bounds(p)?.origin().to_vec2();
            cur = self.parent_of(p);
        }
        self.hit_node(root, point - offset, filter)
    }

    /// Recursive hit test; `point` is in the node's parent space.
    fn hit_node(&self, id: ComponentId, point: Point, filter: QueryFilter) -> Option<ComponentId> {
        let node = self.node_opt(id)?;
        if !filter.matches(node.flags) || !node.bounds.contains(point) {
            return None;
        }
        let inner = point - node.bounds.origin().to_vec2();
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.hit_node(child, inner, filter) {
                return Some(hit);
            }
        }
        Some(id)
    }

    /// First component of a pre-order walk of `scope`'s subtree: the scope
    /// itself.
    pub fn first_in(&self, scope: ComponentId) -> Option<ComponentId> {
        self.is_alive(scope).then_some(scope)
    }

    /// Last component of a pre-order walk of `scope`'s subtree: the deepest
    /// last descendant.
    pub fn last_in(&self, scope: ComponentId) -> Option<ComponentId> {
        if !self.is_alive(scope) {
            return None;
        }
        let mut cur = scope;
        while let Some(&last) = self.children_of(cur).last() {
            cur = last;
        }
        Some(cur)
    }

    /// Pre-order successor of `of` within `scope`'s subtree, without
    /// wrapping. `None` once the walk leaves the scope.
    pub fn next_pre_order(&self, scope: ComponentId, of: ComponentId) -> Option<ComponentId> {
        if !self.is_alive(of) {
            return None;
        }
        if let Some(&first) = self.children_of(of).first() {
            return Some(first);
        }
        let mut cur = of;
        while cur != scope {
            let parent = self.parent_of(cur)?;
            let siblings = self.children_of(parent);
            let pos = siblings.iter().position(|c| *c == cur)?;
            if let Some(&next) = siblings.get(pos + 1) {
                return Some(next);
            }
            cur = parent;
        }
        None
    }

    /// Pre-order predecessor of `of` within `scope`'s subtree, without
    /// wrapping. `None` for the scope itself.
    pub fn prev_pre_order(&self, scope: ComponentId, of: ComponentId) -> Option<ComponentId> {
        if !self.is_alive(of) || of == scope {
            return None;
        }
        let parent = self.parent_of(of)?;
        let siblings = self.children_of(parent);
        let pos = siblings.iter().position(|c| *c == of)?;
        match pos.checked_sub(1).and_then(|p| siblings.get(p)) {
            Some(&prev) => self.last_in(prev),
            None => Some(parent),
        }
    }

    /// Deliver a mouse event to the listeners of `id`, routed by kind.
    ///
    /// Every registered listener runs regardless of the event's consumed
    /// flag; consumption only matters between components.
    pub fn dispatch_mouse(&mut self, id: ComponentId, event: &mut MouseEvent<ComponentId>) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        match event.kind {
            MouseEventKind::Moved => {
                for l in n.listeners.motion.iter_mut() {
                    l.mouse_moved(event);
                }
            }
            MouseEventKind::Dragged => {
                for l in n.listeners.motion.iter_mut() {
                    l.mouse_dragged(event);
                }
            }
            MouseEventKind::Pressed => {
                for l in n.listeners.mouse.iter_mut() {
                    l.mouse_pressed(event);
                }
            }
            MouseEventKind::Released => {
                for l in n.listeners.mouse.iter_mut() {
                    l.mouse_released(event);
                }
            }
            MouseEventKind::Clicked => {
                for l in n.listeners.mouse.iter_mut() {
                    l.mouse_clicked(event);
                }
            }
            MouseEventKind::Entered => {
                for l in n.listeners.mouse.iter_mut() {
                    l.mouse_entered(event);
                }
            }
            MouseEventKind::Exited => {
                for l in n.listeners.mouse.iter_mut() {
                    l.mouse_exited(event);
                }
            }
        }
    }

    /// Deliver a wheel event to the listeners of `id`.
    pub fn dispatch_wheel(&mut self, id: ComponentId, event: &mut WheelEvent<ComponentId>) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        for l in n.listeners.wheel.iter_mut() {
            l.wheel_moved(event);
        }
    }

    /// Deliver a key event to the listeners of `id`, routed by kind.
    pub fn dispatch_key(&mut self, id: ComponentId, event: &mut KeyEvent<ComponentId>) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        match event.kind {
            KeyEventKind::Down => {
                for l in n.listeners.key.iter_mut() {
                    l.key_pressed(event);
                }
            }
            KeyEventKind::Up => {
                for l in n.listeners.key.iter_mut() {
                    l.key_released(event);
                }
            }
            KeyEventKind::Typed => {
                for l in n.listeners.key.iter_mut() {
                    l.key_typed(event);
                }
            }
        }
    }

    /// Deliver a focus event to the listeners of `id`, routed by kind.
    pub fn dispatch_focus(&mut self, id: ComponentId, event: &FocusEvent<ComponentId>) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        match event.kind {
            FocusEventKind::Gained => {
                for l in n.listeners.focus.iter_mut() {
                    l.focus_gained(event);
                }
            }
            FocusEventKind::Lost => {
                for l in n.listeners.focus.iter_mut() {
                    l.focus_lost(event);
                }
            }
        }
    }

    /// Deliver a component event to the listeners of `id`, routed by kind.
    pub fn dispatch_component(&mut self, id: ComponentId, event: &ComponentEvent<ComponentId>) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        match event.kind {
            ComponentEventKind::Moved => {
                for l in n.listeners.component.iter_mut() {
                    l.component_moved(event);
                }
            }
            ComponentEventKind::Resized => {
                for l in n.listeners.component.iter_mut() {
                    l.component_resized(event);
                }
            }
            ComponentEventKind::Shown => {
                for l in n.listeners.component.iter_mut() {
                    l.component_shown(event);
                }
            }
            ComponentEventKind::Hidden => {
                for l in n.listeners.component.iter_mut() {
                    l.component_hidden(event);
                }
            }
        }
    }

    /// Repaint the whole tree: a pre-order walk of every visible component,
    /// parents before children, firing paint listeners with absolute bounds.
    pub fn repaint(&mut self, surface: &mut dyn Any) {
        for root in self.roots() {
            self.repaint_node(root, Vec2::ZERO, surface);
        }
    }

    fn repaint_node(&mut self, id: ComponentId, offset: Vec2, surface: &mut dyn Any) {
        let (bounds, children) = {
            let Some(n) = self.node_opt(id) else {
                return;
            };
            if !n.flags.contains(ComponentFlags::VISIBLE) {
                return;
            }
            (n.bounds, n.children.clone())
        };
        let abs = bounds + offset;
        if let Some(n) = self.node_opt_mut(id) {
            let mut ev = PaintEvent {
                source: id,
                bounds: abs,
                surface: &mut *surface,
            };
            for l in n.listeners.paint.iter_mut() {
                l.paint(&mut ev);
            }
        }
        for child in children {
            self.repaint_node(child, offset + bounds.origin().to_vec2(), surface);
        }
    }

    fn node(&self, id: ComponentId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ComponentId")
    }

    fn node_mut(&mut self, id: ComponentId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling ComponentId")
    }

    fn node_opt(&self, id: ComponentId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|n| n.generation == id.generation())
    }

    fn node_opt_mut(&mut self, id: ComponentId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|n| n.generation == id.generation())
    }
}
