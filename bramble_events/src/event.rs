// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event envelopes: component, focus, mouse, wheel, and key events.
//!
//! Every event carries its source node key, a stable numeric kind id, and a
//! monotonic timestamp in microseconds supplied by the host. Input events
//! additionally carry a [`Modifiers`] bitmask and a one-way consumed flag:
//! [`MouseEvent::consume`] is the only mutation exposed, and once set the
//! flag never clears. Whether a consumed event keeps propagating is decided
//! by the dispatcher between nodes, not by the event itself.

use core::any::Any;

use kurbo::{Point, Rect};

bitflags::bitflags! {
    /// Toolkit modifier bitmask, decoupled from any host encoding.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        /// Shift key held.
        const SHIFT   = 1 << 0;
        /// Control key held.
        const CTRL    = 1 << 1;
        /// Alt/Option key held.
        const ALT     = 1 << 2;
        /// Meta/Command key held.
        const META    = 1 << 3;
        /// Primary pointer button held.
        const BUTTON1 = 1 << 4;
        /// Secondary pointer button held.
        const BUTTON2 = 1 << 5;
        /// Tertiary pointer button held.
        const BUTTON3 = 1 << 6;
    }
}

/// Key codes for keys the routing core itself reacts to.
///
/// Clients are free to use their own codes for everything else; the values
/// here follow the common virtual-key assignments.
pub mod keys {
    /// Tab: focus traversal.
    pub const TAB: u32 = 0x09;
    /// Enter/Return.
    pub const ENTER: u32 = 0x0D;
    /// Escape.
    pub const ESCAPE: u32 = 0x1B;
    /// Space bar.
    pub const SPACE: u32 = 0x20;
    /// Left arrow.
    pub const LEFT: u32 = 0x25;
    /// Up arrow.
    pub const UP: u32 = 0x26;
    /// Right arrow.
    pub const RIGHT: u32 = 0x27;
    /// Down arrow.
    pub const DOWN: u32 = 0x28;
}

/// Kind of a [`ComponentEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentEventKind {
    /// The component's origin changed relative to its parent.
    Moved,
    /// The component's size changed.
    Resized,
    /// The component became visible.
    Shown,
    /// The component became invisible.
    Hidden,
}

impl ComponentEventKind {
    /// Stable numeric id for this kind.
    pub const fn id(self) -> u32 {
        match self {
            Self::Moved => 100,
            Self::Resized => 101,
            Self::Shown => 102,
            Self::Hidden => 103,
        }
    }
}

/// Notification of a structural or visibility change on a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentEvent<K> {
    /// The component this event describes.
    pub source: K,
    /// What changed.
    pub kind: ComponentEventKind,
    /// Monotonic timestamp in microseconds.
    pub timestamp_us: u64,
}

impl<K> ComponentEvent<K> {
    /// Create a new component event.
    pub const fn new(source: K, kind: ComponentEventKind, timestamp_us: u64) -> Self {
        Self {
            source,
            kind,
            timestamp_us,
        }
    }

    /// Stable numeric id of this event's kind.
    pub const fn id(&self) -> u32 {
        self.kind.id()
    }
}

/// Kind of a [`FocusEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusEventKind {
    /// The source component gained keyboard focus.
    Gained,
    /// The source component lost keyboard focus.
    Lost,
}

impl FocusEventKind {
    /// Stable numeric id for this kind.
    pub const fn id(self) -> u32 {
        match self {
            Self::Gained => 200,
            Self::Lost => 201,
        }
    }
}

/// Notification of a keyboard-focus transfer.
///
/// `opposite` names the other end of the transfer: for `Gained` the previous
/// holder, for `Lost` the new holder (`None` when focus came from or went to
/// nowhere). `temporary` marks transfers expected to auto-revert; it changes
/// only the payload, never the transfer mechanics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusEvent<K> {
    /// The component gaining or losing focus.
    pub source: K,
    /// Gained or lost.
    pub kind: FocusEventKind,
    /// The other component involved in the transfer, if any.
    pub opposite: Option<K>,
    /// Whether this is a temporary transfer.
    pub temporary: bool,
    /// Monotonic timestamp in microseconds.
    pub timestamp_us: u64,
}

impl<K> FocusEvent<K> {
    /// Create a new focus event.
    pub const fn new(
        source: K,
        kind: FocusEventKind,
        opposite: Option<K>,
        temporary: bool,
        timestamp_us: u64,
    ) -> Self {
        Self {
            source,
            kind,
            opposite,
            temporary,
            timestamp_us,
        }
    }

    /// Stable numeric id of this event's kind.
    pub const fn id(&self) -> u32 {
        self.kind.id()
    }
}

/// Kind of a [`MouseEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// A pointer button went down over the source.
    Pressed,
    /// A pointer button was released; routed to the grab holder.
    Released,
    /// A press/release pair completed on the same component.
    Clicked,
    /// The pointer entered the source's bounds.
    Entered,
    /// The pointer left the source's bounds.
    Exited,
    /// The pointer moved with no button held.
    Moved,
    /// The pointer moved while the source holds the grab.
    Dragged,
}

impl MouseEventKind {
    /// Stable numeric id for this kind.
    pub const fn id(self) -> u32 {
        match self {
            Self::Pressed => 300,
            Self::Released => 301,
            Self::Clicked => 302,
            Self::Entered => 303,
            Self::Exited => 304,
            Self::Moved => 305,
            Self::Dragged => 306,
        }
    }
}

/// A pointer event in toolkit surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseEvent<K> {
    /// The component this event is delivered to.
    pub source: K,
    /// What happened.
    pub kind: MouseEventKind,
    /// Pointer position in toolkit surface space (bottom-left origin).
    pub point: Point,
    /// Modifier and button state at the time of the event.
    pub modifiers: Modifiers,
    /// Click count for `Pressed`/`Clicked` chains; 0 for motion events.
    pub click_count: u32,
    /// Monotonic timestamp in microseconds.
    pub timestamp_us: u64,
    consumed: bool,
}

impl<K> MouseEvent<K> {
    /// Create a new mouse event.
    pub const fn new(
        source: K,
        kind: MouseEventKind,
        point: Point,
        modifiers: Modifiers,
        click_count: u32,
        timestamp_us: u64,
    ) -> Self {
        Self {
            source,
            kind,
            point,
            modifiers,
            click_count,
            timestamp_us,
            consumed: false,
        }
    }

    /// Stable numeric id of this event's kind.
    pub const fn id(&self) -> u32 {
        self.kind.id()
    }

    /// Mark the event handled. One-way: a consumed event never resets.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// Whether a listener has marked this event handled.
    pub const fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// Wheel scroll granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollKind {
    /// Scroll by lines/units.
    Unit,
    /// Scroll by pages/blocks.
    Block,
}

/// A wheel scroll event in toolkit surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent<K> {
    /// The component this event is delivered to.
    pub source: K,
    /// Unit or block scrolling.
    pub scroll_kind: ScrollKind,
    /// Units (or blocks) to scroll per wheel notch.
    pub scroll_amount: i32,
    /// Signed number of notches the wheel rotated.
    pub rotation: i32,
    /// Pointer position in toolkit surface space.
    pub point: Point,
    /// Modifier state at the time of the event.
    pub modifiers: Modifiers,
    /// Monotonic timestamp in microseconds.
    pub timestamp_us: u64,
    consumed: bool,
}

impl<K> WheelEvent<K> {
    /// Stable numeric id for wheel events.
    pub const ID: u32 = 400;

    /// Create a new wheel event.
    pub const fn new(
        source: K,
        scroll_kind: ScrollKind,
        scroll_amount: i32,
        rotation: i32,
        point: Point,
        modifiers: Modifiers,
        timestamp_us: u64,
    ) -> Self {
        Self {
            source,
            scroll_kind,
            scroll_amount,
            rotation,
            point,
            modifiers,
            timestamp_us,
            consumed: false,
        }
    }

    /// Total units to scroll: `scroll_amount * rotation`.
    pub const fn units_to_scroll(&self) -> i32 {
        self.scroll_amount * self.rotation
    }

    /// Mark the event handled. One-way: a consumed event never resets.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// Whether a listener has marked this event handled.
    pub const fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// Kind of a [`KeyEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    /// A key went down.
    Down,
    /// A key came up.
    Up,
    /// A character was produced.
    Typed,
}

impl KeyEventKind {
    /// Stable numeric id for this kind.
    pub const fn id(self) -> u32 {
        match self {
            Self::Down => 500,
            Self::Up => 501,
            Self::Typed => 502,
        }
    }
}

/// A keyboard event, routed to the focused component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent<K> {
    /// The component this event is delivered to.
    pub source: K,
    /// Down, up, or typed.
    pub kind: KeyEventKind,
    /// Virtual key code; see [`keys`] for the codes the core reacts to.
    pub code: u32,
    /// The character produced, for `Typed` events.
    pub ch: Option<char>,
    /// Modifier state at the time of the event.
    pub modifiers: Modifiers,
    /// Monotonic timestamp in microseconds.
    pub timestamp_us: u64,
    consumed: bool,
}

impl<K> KeyEvent<K> {
    /// Create a new key event.
    pub const fn new(
        source: K,
        kind: KeyEventKind,
        code: u32,
        ch: Option<char>,
        modifiers: Modifiers,
        timestamp_us: u64,
    ) -> Self {
        Self {
            source,
            kind,
            code,
            ch,
            modifiers,
            timestamp_us,
            consumed: false,
        }
    }

    /// Stable numeric id of this event's kind.
    pub const fn id(&self) -> u32 {
        self.kind.id()
    }

    /// Mark the event handled. One-way: a consumed event never resets.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// Whether a listener has marked this event handled.
    pub const fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// A repaint request delivered to paint listeners.
///
/// `surface` is an opaque drawing-surface handle owned by the host renderer;
/// listeners downcast it to whatever concrete surface the host paints into.
/// The routing core never interprets it.
pub struct PaintEvent<'a, K> {
    /// The component being painted.
    pub source: K,
    /// Absolute bounds of the component in toolkit surface space.
    pub bounds: Rect,
    /// Opaque drawing surface supplied by the host.
    pub surface: &'a mut dyn Any,
}

impl<K: core::fmt::Debug> core::fmt::Debug for PaintEvent<'_, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaintEvent")
            .field("source", &self.source)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_is_one_way() {
        let mut ev = MouseEvent::new(
            1_u32,
            MouseEventKind::Pressed,
            Point::new(0.0, 0.0),
            Modifiers::empty(),
            1,
            0,
        );
        assert!(!ev.is_consumed());
        ev.consume();
        assert!(ev.is_consumed());
        // No API exists to clear the flag; consuming again is idempotent.
        ev.consume();
        assert!(ev.is_consumed());
    }

    #[test]
    fn wheel_units_to_scroll_multiplies_amount_and_rotation() {
        let ev = WheelEvent::new(
            1_u32,
            ScrollKind::Unit,
            3,
            -2,
            Point::new(0.0, 0.0),
            Modifiers::empty(),
            0,
        );
        assert_eq!(ev.units_to_scroll(), -6);
    }

    #[test]
    fn kind_ids_are_stable_and_distinct() {
        let ids = [
            ComponentEventKind::Moved.id(),
            ComponentEventKind::Resized.id(),
            ComponentEventKind::Shown.id(),
            ComponentEventKind::Hidden.id(),
            FocusEventKind::Gained.id(),
            FocusEventKind::Lost.id(),
            MouseEventKind::Pressed.id(),
            MouseEventKind::Released.id(),
            MouseEventKind::Clicked.id(),
            MouseEventKind::Entered.id(),
            MouseEventKind::Exited.id(),
            MouseEventKind::Moved.id(),
            MouseEventKind::Dragged.id(),
            WheelEvent::<u32>::ID,
            KeyEventKind::Down.id(),
            KeyEventKind::Up.id(),
            KeyEventKind::Typed.id(),
        ];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b, "event ids must be unique");
            }
        }
    }

    #[test]
    fn focus_event_carries_opposite_and_temporary() {
        let ev = FocusEvent::new(2_u32, FocusEventKind::Lost, Some(3), true, 42);
        assert_eq!(ev.opposite, Some(3));
        assert!(ev.temporary);
        assert_eq!(ev.id(), 201);
    }
}
