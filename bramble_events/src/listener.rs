// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener capabilities and ordered listener sets.
//!
//! A component registers interest in an event family by adding a boxed
//! listener to the matching [`ListenerSet`]. Sets preserve registration
//! order and support structural removal by [`ListenerHandle`] identity;
//! there is no tombstoning and no error for removing an unknown handle.
//!
//! Dispatch invokes every listener in a set, in order, unconditionally.
//! An event's consumed flag is never consulted between siblings on the same
//! node; it only stops the event from bubbling to an ancestor.

use alloc::boxed::Box;
use core::num::NonZeroU64;

use smallvec::SmallVec;

use crate::event::{ComponentEvent, FocusEvent, KeyEvent, MouseEvent, PaintEvent, WheelEvent};

/// Receives button and crossing events: press, release, click, enter, exit.
pub trait MouseListener<K> {
    /// A pointer button was pressed over the source component.
    fn mouse_pressed(&mut self, event: &mut MouseEvent<K>) {
        let _ = event;
    }
    /// A pointer button was released.
    fn mouse_released(&mut self, event: &mut MouseEvent<K>) {
        let _ = event;
    }
    /// A press/release pair completed on the source component.
    fn mouse_clicked(&mut self, event: &mut MouseEvent<K>) {
        let _ = event;
    }
    /// The pointer entered the source component's bounds.
    fn mouse_entered(&mut self, event: &mut MouseEvent<K>) {
        let _ = event;
    }
    /// The pointer left the source component's bounds.
    fn mouse_exited(&mut self, event: &mut MouseEvent<K>) {
        let _ = event;
    }
}

/// Receives pointer motion: moves and drags.
pub trait MotionListener<K> {
    /// The pointer moved with no active grab.
    fn mouse_moved(&mut self, event: &mut MouseEvent<K>) {
        let _ = event;
    }
    /// The pointer moved while the source component holds the grab.
    fn mouse_dragged(&mut self, event: &mut MouseEvent<K>) {
        let _ = event;
    }
}

/// Receives wheel scroll events.
pub trait WheelListener<K> {
    /// The wheel rotated over the source component.
    fn wheel_moved(&mut self, event: &mut WheelEvent<K>) {
        let _ = event;
    }
}

/// Receives keyboard events; delivered only while the component is focused.
pub trait KeyListener<K> {
    /// A key went down.
    fn key_pressed(&mut self, event: &mut KeyEvent<K>) {
        let _ = event;
    }
    /// A key came up.
    fn key_released(&mut self, event: &mut KeyEvent<K>) {
        let _ = event;
    }
    /// A character was produced.
    fn key_typed(&mut self, event: &mut KeyEvent<K>) {
        let _ = event;
    }
}

/// Receives focus transfer notifications.
pub trait FocusListener<K> {
    /// The source component gained keyboard focus.
    fn focus_gained(&mut self, event: &FocusEvent<K>) {
        let _ = event;
    }
    /// The source component lost keyboard focus.
    fn focus_lost(&mut self, event: &FocusEvent<K>) {
        let _ = event;
    }
}

/// Receives bounds and visibility change notifications.
pub trait ComponentListener<K> {
    /// The component's origin changed relative to its parent.
    fn component_moved(&mut self, event: &ComponentEvent<K>) {
        let _ = event;
    }
    /// The component's size changed.
    fn component_resized(&mut self, event: &ComponentEvent<K>) {
        let _ = event;
    }
    /// The component became visible.
    fn component_shown(&mut self, event: &ComponentEvent<K>) {
        let _ = event;
    }
    /// The component became invisible.
    fn component_hidden(&mut self, event: &ComponentEvent<K>) {
        let _ = event;
    }
}

/// Paints component content into the host's drawing surface each repaint.
pub trait PaintListener<K> {
    /// Paint the component. `event.surface` is the host's opaque surface.
    fn paint(&mut self, event: &mut PaintEvent<'_, K>);
}

/// Identity of one registered listener within a [`ListenerSet`].
///
/// Handles are unique per set for the lifetime of the set and are never
/// reused, so a stale handle simply fails to remove anything.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerHandle(NonZeroU64);

/// An ordered, append-only collection of listeners of one capability.
///
/// Replaces chained listener combinators with a flat sequence: adding
/// appends, removal is structural by handle, and iteration yields listeners
/// in registration order. Most components carry at most a couple of
/// listeners per capability, so storage is a [`SmallVec`] with inline room
/// for two.
pub struct ListenerSet<L: ?Sized> {
    items: SmallVec<[(ListenerHandle, Box<L>); 2]>,
    next: NonZeroU64,
}

impl<L: ?Sized> ListenerSet<L> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            items: SmallVec::new(),
            next: NonZeroU64::MIN,
        }
    }

    /// Append a listener; returns its removal handle.
    pub fn add(&mut self, listener: Box<L>) -> ListenerHandle {
        let handle = ListenerHandle(self.next);
        self.next = self.next.saturating_add(1);
        self.items.push((handle, listener));
        handle
    }

    /// Remove the listener registered under `handle`.
    ///
    /// Returns `false` (without error) when the handle is not present.
    pub fn remove(&mut self, handle: ListenerHandle) -> bool {
        let before = self.items.len();
        self.items.retain(|(h, _)| *h != handle);
        self.items.len() != before
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate listeners mutably, in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut L> {
        self.items.iter_mut().map(|(_, l)| l.as_mut())
    }
}

impl<L: ?Sized> Default for ListenerSet<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> core::fmt::Debug for ListenerSet<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.items.len())
            .finish_non_exhaustive()
    }
}

/// One listener set per capability; lives on each tree component.
#[derive(Debug)]
pub struct Listeners<K> {
    /// Button and crossing listeners.
    pub mouse: ListenerSet<dyn MouseListener<K>>,
    /// Motion listeners.
    pub motion: ListenerSet<dyn MotionListener<K>>,
    /// Wheel listeners.
    pub wheel: ListenerSet<dyn WheelListener<K>>,
    /// Keyboard listeners.
    pub key: ListenerSet<dyn KeyListener<K>>,
    /// Focus listeners.
    pub focus: ListenerSet<dyn FocusListener<K>>,
    /// Bounds/visibility listeners.
    pub component: ListenerSet<dyn ComponentListener<K>>,
    /// Paint listeners.
    pub paint: ListenerSet<dyn PaintListener<K>>,
}

// Not derived: empty sets exist for any key type, so no `K: Default` bound.
impl<K> Default for Listeners<K> {
    fn default() -> Self {
        Self {
            mouse: ListenerSet::new(),
            motion: ListenerSet::new(),
            wheel: ListenerSet::new(),
            key: ListenerSet::new(),
            focus: ListenerSet::new(),
            component: ListenerSet::new(),
            paint: ListenerSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Modifiers, MouseEventKind};
    use alloc::vec::Vec;
    use kurbo::Point;

    struct Tag(&'static str, alloc::rc::Rc<core::cell::RefCell<Vec<&'static str>>>);

    impl MouseListener<u32> for Tag {
        fn mouse_pressed(&mut self, _event: &mut MouseEvent<u32>) {
            self.1.borrow_mut().push(self.0);
        }
    }

    fn press_event() -> MouseEvent<u32> {
        MouseEvent::new(
            1,
            MouseEventKind::Pressed,
            Point::new(0.0, 0.0),
            Modifiers::empty(),
            1,
            0,
        )
    }

    #[test]
    fn empty_listeners_exist_for_any_key_type() {
        // Keys only need Copy + Eq; a key with no Default still gets a bundle.
        #[derive(Clone, Copy, PartialEq, Eq, Debug)]
        struct Opaque(u64);

        let bundle: Listeners<Opaque> = Listeners::default();
        assert!(bundle.mouse.is_empty());
        assert!(bundle.paint.is_empty());
    }

    #[test]
    fn listeners_fire_in_registration_order() {
        let log = alloc::rc::Rc::new(core::cell::RefCell::new(Vec::new()));
        let mut set: ListenerSet<dyn MouseListener<u32>> = ListenerSet::new();
        set.add(Box::new(Tag("a", log.clone())));
        set.add(Box::new(Tag("b", log.clone())));
        set.add(Box::new(Tag("c", log.clone())));

        let mut ev = press_event();
        for l in set.iter_mut() {
            l.mouse_pressed(&mut ev);
        }
        assert_eq!(*log.borrow(), ["a", "b", "c"]);
    }

    #[test]
    fn remove_is_structural_and_order_preserving() {
        let log = alloc::rc::Rc::new(core::cell::RefCell::new(Vec::new()));
        let mut set: ListenerSet<dyn MouseListener<u32>> = ListenerSet::new();
        let _a = set.add(Box::new(Tag("a", log.clone())));
        let b = set.add(Box::new(Tag("b", log.clone())));
        let _c = set.add(Box::new(Tag("c", log.clone())));

        assert!(set.remove(b));
        assert_eq!(set.len(), 2);
        // Removing the same handle again is a no-op, not an error.
        assert!(!set.remove(b));

        let mut ev = press_event();
        for l in set.iter_mut() {
            l.mouse_pressed(&mut ev);
        }
        assert_eq!(*log.borrow(), ["a", "c"]);
    }

    #[test]
    fn consumption_does_not_skip_siblings() {
        struct Consume(alloc::rc::Rc<core::cell::RefCell<Vec<&'static str>>>);
        impl MouseListener<u32> for Consume {
            fn mouse_pressed(&mut self, event: &mut MouseEvent<u32>) {
                self.0.borrow_mut().push("consume");
                event.consume();
            }
        }

        let log = alloc::rc::Rc::new(core::cell::RefCell::new(Vec::new()));
        let mut set: ListenerSet<dyn MouseListener<u32>> = ListenerSet::new();
        set.add(Box::new(Consume(log.clone())));
        set.add(Box::new(Tag("after", log.clone())));

        let mut ev = press_event();
        for l in set.iter_mut() {
            l.mouse_pressed(&mut ev);
        }
        // The sibling registered after the consumer still runs.
        assert_eq!(*log.borrow(), ["consume", "after"]);
        assert!(ev.is_consumed());
    }

    #[test]
    fn handles_are_never_reused() {
        let log = alloc::rc::Rc::new(core::cell::RefCell::new(Vec::new()));
        let mut set: ListenerSet<dyn MouseListener<u32>> = ListenerSet::new();
        let a = set.add(Box::new(Tag("a", log.clone())));
        assert!(set.remove(a));
        let b = set.add(Box::new(Tag("b", log.clone())));
        assert_ne!(a, b);
        assert!(!set.remove(a));
        assert!(set.remove(b));
    }
}
