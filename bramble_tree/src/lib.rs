// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A retained component tree with z-ordered hit testing.
//!
//! This crate stores the structural half of the toolkit core: a generational
//! arena of components, each with parent-relative bounds, behavior flags
//! ([`ComponentFlags`]), and listener sets from [`bramble_events`]. It knows
//! nothing about focus, grabs, or modality; those live in the routing layer
//! and drive this tree through its public surface.
//!
//! ## Coordinate model
//!
//! Bounds are stored relative to the parent's origin. Absolute bounds are
//! derived on demand by [`Tree::abs_bounds`], which sums ancestor origins;
//! there is no cached world-space state and no commit step. Sibling order is
//! paint order: the last-attached child is topmost and is hit-tested first.
//!
//! ## Hit testing
//!
//! [`Tree::hit_test`] finds the innermost component containing a point,
//! honoring a [`QueryFilter`]. A component that fails the filter shields its
//! whole subtree, so a hidden or disabled container cannot leak hits from
//! its children.
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use bramble_tree::{QueryFilter, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(Rect::new(0.0, 0.0, 200.0, 200.0));
//! let button = tree.insert(Rect::new(20.0, 20.0, 80.0, 44.0));
//! tree.add_child(root, button).unwrap();
//!
//! let filter = QueryFilter::new().visible().enabled();
//! assert_eq!(tree.hit_test(Point::new(30.0, 30.0), filter), Some(button));
//! assert_eq!(tree.hit_test(Point::new(150.0, 150.0), filter), Some(root));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::{QueryFilter, Tree};
pub use types::{ComponentFlags, ComponentId, TreeError};
