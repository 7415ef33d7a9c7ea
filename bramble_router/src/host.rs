// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host boundary: raw notifications and the coordinate/modifier translator.
//!
//! The host windowing system reports positions with a top-left origin and
//! its own modifier encoding. Everything past this module speaks toolkit
//! surface coordinates (bottom-left origin) and [`Modifiers`]. The flip
//! happens exactly once, in [`HostTranslator::point`]; no other layer ever
//! adjusts the y axis.

use bitflags::bitflags;
use kurbo::Point;

use bramble_events::{KeyEventKind, Modifiers, ScrollKind};
use bramble_focus::TraversalPolicy;

use crate::router::Router;

bitflags! {
    /// Modifier and button state in the host's own encoding.
    ///
    /// Bit positions follow the host wire format and deliberately differ
    /// from [`Modifiers`]; translate with [`HostTranslator::modifiers`].
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct HostModifiers: u16 {
        /// Shift key held.
        const SHIFT = 1 << 0;
        /// Control key held.
        const CTRL = 1 << 1;
        /// Meta/command key held.
        const META = 1 << 2;
        /// Alt/option key held.
        const ALT = 1 << 3;
        /// Primary button held.
        const BUTTON1 = 1 << 4;
        /// Secondary button held.
        const BUTTON2 = 1 << 5;
        /// Middle button held.
        const BUTTON3 = 1 << 6;
    }
}

/// A raw input notification from the host windowing system.
///
/// Coordinates are host-native: pixels from the top-left corner of the
/// surface. Timestamps are microseconds on the host's monotonic clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// A pointer button went down.
    PointerPressed {
        /// Host x coordinate, from the left edge.
        x: f64,
        /// Host y coordinate, from the top edge.
        y: f64,
        /// Host modifier state.
        modifiers: HostModifiers,
        /// Host timestamp in microseconds.
        timestamp_us: u64,
    },
    /// A pointer button came up.
    PointerReleased {
        /// Host x coordinate, from the left edge.
        x: f64,
        /// Host y coordinate, from the top edge.
        y: f64,
        /// Host modifier state.
        modifiers: HostModifiers,
        /// Host timestamp in microseconds.
        timestamp_us: u64,
    },
    /// The pointer moved.
    PointerMoved {
        /// Host x coordinate, from the left edge.
        x: f64,
        /// Host y coordinate, from the top edge.
        y: f64,
        /// Host modifier state.
        modifiers: HostModifiers,
        /// Host timestamp in microseconds.
        timestamp_us: u64,
    },
    /// The wheel rotated.
    Wheel {
        /// Host x coordinate, from the left edge.
        x: f64,
        /// Host y coordinate, from the top edge.
        y: f64,
        /// Unit or block scrolling.
        scroll_kind: ScrollKind,
        /// Units (or blocks) per wheel notch.
        scroll_amount: i32,
        /// Signed notches rotated.
        rotation: i32,
        /// Host modifier state.
        modifiers: HostModifiers,
        /// Host timestamp in microseconds.
        timestamp_us: u64,
    },
    /// A key changed state or produced a character.
    Key {
        /// Down, up, or typed.
        kind: KeyEventKind,
        /// Virtual key code.
        code: u32,
        /// Character produced, for typed events.
        ch: Option<char>,
        /// Host modifier state.
        modifiers: HostModifiers,
        /// Host timestamp in microseconds.
        timestamp_us: u64,
    },
}

/// Translates host notifications into toolkit terms.
///
/// Holds the current surface height so the top-left host origin can be
/// flipped to the toolkit's bottom-left origin:
/// `toolkit_y = surface_height - 1 - host_y`. The flip is its own inverse,
/// so round-tripping a coordinate is lossless.
#[derive(Clone, Copy, Debug)]
pub struct HostTranslator {
    surface_height: f64,
}

impl HostTranslator {
    /// Create a translator for a surface of the given height in pixels.
    pub fn new(surface_height: f64) -> Self {
        Self { surface_height }
    }

    /// Update the surface height after a host resize.
    pub fn set_surface_height(&mut self, surface_height: f64) {
        self.surface_height = surface_height;
    }

    /// The current surface height.
    pub fn surface_height(&self) -> f64 {
        self.surface_height
    }

    /// Convert a host position to toolkit surface coordinates.
    pub fn point(&self, x: f64, y: f64) -> Point {
        Point::new(x, self.surface_height - 1.0 - y)
    }

    /// Convert host modifier state to toolkit [`Modifiers`].
    pub fn modifiers(&self, host: HostModifiers) -> Modifiers {
        let mut out = Modifiers::empty();
        out.set(Modifiers::SHIFT, host.contains(HostModifiers::SHIFT));
        out.set(Modifiers::CTRL, host.contains(HostModifiers::CTRL));
        out.set(Modifiers::ALT, host.contains(HostModifiers::ALT));
        out.set(Modifiers::META, host.contains(HostModifiers::META));
        out.set(Modifiers::BUTTON1, host.contains(HostModifiers::BUTTON1));
        out.set(Modifiers::BUTTON2, host.contains(HostModifiers::BUTTON2));
        out.set(Modifiers::BUTTON3, host.contains(HostModifiers::BUTTON3));
        out
    }

    /// Translate one host notification and forward it to the router.
    ///
    /// Pure plumbing: the translator never selects a target or consults
    /// routing state.
    pub fn feed<P: TraversalPolicy>(&self, router: &mut Router<'_, P>, event: HostEvent) {
        match event {
            HostEvent::PointerPressed {
                x,
                y,
                modifiers,
                timestamp_us,
            } => {
                router.pointer_pressed(self.point(x, y), self.modifiers(modifiers), timestamp_us);
            }
            HostEvent::PointerReleased {
                x,
                y,
                modifiers,
                timestamp_us,
            } => {
                router.pointer_released(self.point(x, y), self.modifiers(modifiers), timestamp_us);
            }
            HostEvent::PointerMoved {
                x,
                y,
                modifiers,
                timestamp_us,
            } => {
                router.pointer_moved(self.point(x, y), self.modifiers(modifiers), timestamp_us);
            }
            HostEvent::Wheel {
                x,
                y,
                scroll_kind,
                scroll_amount,
                rotation,
                modifiers,
                timestamp_us,
            } => {
                router.wheel(
                    self.point(x, y),
                    scroll_kind,
                    scroll_amount,
                    rotation,
                    self.modifiers(modifiers),
                    timestamp_us,
                );
            }
            HostEvent::Key {
                kind,
                code,
                ch,
                modifiers,
                timestamp_us,
            } => {
                router.key(kind, code, ch, self.modifiers(modifiers), timestamp_us);
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_flip_is_its_own_inverse() {
        let tr = HostTranslator::new(600.0);
        let p = tr.point(10.0, 0.0);
        assert_eq!(p, Point::new(10.0, 599.0));
        // Applying the flip to the toolkit y recovers the host y.
        assert_eq!(600.0 - 1.0 - p.y, 0.0);

        let q = tr.point(0.0, 599.0);
        assert_eq!(q, Point::new(0.0, 0.0));
    }

    #[test]
    fn modifier_bits_map_one_to_one() {
        let tr = HostTranslator::new(100.0);
        let host = HostModifiers::SHIFT | HostModifiers::META | HostModifiers::BUTTON1;
        let got = tr.modifiers(host);
        assert_eq!(
            got,
            Modifiers::SHIFT | Modifiers::META | Modifiers::BUTTON1
        );
        assert_eq!(tr.modifiers(HostModifiers::empty()), Modifiers::empty());
        assert_eq!(
            tr.modifiers(HostModifiers::all()),
            Modifiers::SHIFT
                | Modifiers::CTRL
                | Modifiers::ALT
                | Modifiers::META
                | Modifiers::BUTTON1
                | Modifiers::BUTTON2
                | Modifiers::BUTTON3
        );
    }
}
