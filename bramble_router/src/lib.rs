// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble Router: host input translation and event routing.
//!
//! This crate is the top of the toolkit core. It turns raw host
//! notifications into toolkit events and delivers them against a
//! [`bramble_tree::Tree`]:
//!
//! - [`HostTranslator`] flips the host's top-left-origin coordinates into
//!   toolkit surface space and maps [`HostModifiers`] onto
//!   [`bramble_events::Modifiers`], exactly once per event.
//! - [`RoutingState`] bundles everything routing mutates: the focus owner,
//!   the modal stack, the pointer grab, the hovered record, and click
//!   accumulation.
//! - [`Router`] pairs a tree with its routing state for one notification:
//!   hit testing within the active modal scope, grab-aware motion and
//!   release delivery, enter/exit bookkeeping, click synthesis, and
//!   focus-directed key routing with Tab traversal.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use bramble_router::{HostEvent, HostModifiers, HostTranslator, Router, RoutingState};
//! use bramble_tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(Rect::new(0.0, 0.0, 640.0, 480.0));
//! let button = tree.insert(Rect::new(10.0, 10.0, 110.0, 40.0));
//! tree.add_child(root, button).unwrap();
//! tree.set_focusable(button, true);
//!
//! let translator = HostTranslator::new(480.0);
//! let mut state = RoutingState::new();
//! let mut router = Router::new(&mut tree, &mut state);
//!
//! // Host y is measured from the top; the button's toolkit y range
//! // 10..40 corresponds to host y 440..470.
//! translator.feed(
//!     &mut router,
//!     HostEvent::PointerPressed {
//!         x: 20.0,
//!         y: 450.0,
//!         modifiers: HostModifiers::BUTTON1,
//!         timestamp_us: 1_000,
//!     },
//! );
//! assert_eq!(router.grab(), Some(button));
//! assert_eq!(router.focused(), Some(button));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod click;
mod host;
mod modal;
mod router;

pub use click::ClickTracker;
pub use host::{HostEvent, HostModifiers, HostTranslator};
pub use modal::{ModalError, ModalStack};
pub use router::{FrameTick, Router, RoutingState};
