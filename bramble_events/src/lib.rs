// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble Events: the toolkit-native event model and listener registry.
//!
//! This crate defines the event envelopes delivered by the Bramble routing
//! core and the per-component listener registrations they fan out to.
//!
//! - **Events** ([`MouseEvent`], [`WheelEvent`], [`KeyEvent`], [`FocusEvent`],
//!   [`ComponentEvent`], [`PaintEvent`]): immutable envelopes carrying a
//!   source node key, a stable numeric kind id, a monotonic microsecond
//!   timestamp, and for input events a [`Modifiers`] bitmask and a one-way
//!   consumed flag.
//! - **Capabilities** ([`MouseListener`], [`MotionListener`],
//!   [`WheelListener`], [`KeyListener`], [`FocusListener`],
//!   [`ComponentListener`], [`PaintListener`]): the seven listener
//!   interfaces a component may register interest in.
//! - **Listener sets** ([`ListenerSet`], [`Listeners`]): an ordered,
//!   append-only collection of boxed listeners per capability, with
//!   structural removal by [`ListenerHandle`] identity.
//!
//! ## Multicast semantics
//!
//! Dispatching an event to a node invokes **every** listener in the matching
//! set, in registration order, unconditionally. Consuming an event
//! ([`MouseEvent::consume`] and friends) never short-circuits sibling
//! listeners on the same node; it is advisory metadata that the dispatcher
//! reads *between* nodes to stop an event from bubbling to an ancestor.
//!
//! ## Minimal example
//!
//! ```rust
//! use bramble_events::{ListenerSet, Modifiers, MouseEvent, MouseEventKind, MouseListener};
//! use kurbo::Point;
//!
//! struct Counter(u32);
//! impl MouseListener<u32> for Counter {
//!     fn mouse_pressed(&mut self, _event: &mut MouseEvent<u32>) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut set: ListenerSet<dyn MouseListener<u32>> = ListenerSet::new();
//! let handle = set.add(Box::new(Counter(0)));
//!
//! let mut ev = MouseEvent::new(
//!     7,
//!     MouseEventKind::Pressed,
//!     Point::new(4.0, 5.0),
//!     Modifiers::BUTTON1,
//!     1,
//!     1_000,
//! );
//! for l in set.iter_mut() {
//!     l.mouse_pressed(&mut ev);
//! }
//!
//! assert!(set.remove(handle));
//! assert!(set.is_empty());
//! ```
//!
//! The event types are generic over the node key `K`, so callers can use any
//! small, copyable handle (for example `bramble_tree::ComponentId`, or an
//! application-specific id).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod event;
mod listener;
mod metrics;

pub use event::{
    ComponentEvent, ComponentEventKind, FocusEvent, FocusEventKind, KeyEvent, KeyEventKind,
    Modifiers, MouseEvent, MouseEventKind, PaintEvent, ScrollKind, WheelEvent, keys,
};
pub use listener::{
    ComponentListener, FocusListener, KeyListener, ListenerHandle, ListenerSet, Listeners,
    MotionListener, MouseListener, PaintListener, WheelListener,
};
pub use metrics::TextMetrics;
