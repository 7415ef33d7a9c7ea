// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-supplied text measurement.

/// Measures text in the host's current font.
///
/// The routing core never rasterizes text; components that lay out labels
/// ask the host for metrics through this trait.
pub trait TextMetrics {
    /// Horizontal advance of `ch` in surface units.
    fn advance_width(&self, ch: char) -> f64;

    /// Baseline-to-baseline line height in surface units.
    fn line_height(&self) -> f64;
}
