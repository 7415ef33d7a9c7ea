// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click synthesis: press/release pairing and multi-click accumulation.

use kurbo::Point;

use bramble_tree::ComponentId;

/// Default inter-click interval for chaining, in microseconds.
const DEFAULT_INTERVAL_US: u64 = 500_000;

/// Default inter-click distance for chaining, in pixels.
const DEFAULT_DISTANCE: f64 = 5.0;

#[derive(Clone, Copy, Debug)]
struct ClickRecord {
    target: ComponentId,
    point: Point,
    timestamp_us: u64,
    count: u32,
}

/// Pairs presses with releases and accumulates click counts.
///
/// A click is synthesized when a release lands on the same component the
/// press did. Consecutive clicks chain into double, triple, and higher
/// counts while they stay on one component, within the inter-click
/// interval, and within the inter-click distance of the previous press;
/// any violation resets the chain to 1. The anticipated count is available
/// at press time so `Pressed` events can carry it.
///
/// Thresholds are tuning constants; the defaults are 500 ms and 5 px.
#[derive(Debug)]
pub struct ClickTracker {
    interval_us: u64,
    distance: f64,
    last_click: Option<ClickRecord>,
    pending: Option<ClickRecord>,
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickTracker {
    /// Create a tracker with the default thresholds.
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_INTERVAL_US, DEFAULT_DISTANCE)
    }

    /// Create a tracker with custom chaining thresholds.
    pub fn with_thresholds(interval_us: u64, distance: f64) -> Self {
        Self {
            interval_us,
            distance,
            last_click: None,
            pending: None,
        }
    }

    /// Record a press and return the anticipated click count.
    ///
    /// The count the eventual `Clicked` event will carry if this press
    /// completes: previous count plus one when chaining applies, else 1.
    pub fn on_press(&mut self, target: ComponentId, point: Point, timestamp_us: u64) -> u32 {
        let count = match self.last_click {
            Some(last)
                if last.target == target
                    && timestamp_us.saturating_sub(last.timestamp_us) <= self.interval_us
                    && last.point.distance(point) <= self.distance =>
            {
                last.count + 1
            }
            _ => 1,
        };
        self.pending = Some(ClickRecord {
            target,
            point,
            timestamp_us,
            count,
        });
        count
    }

    /// Pair a release with the pending press.
    ///
    /// `under` is the component under the release point. Returns the click
    /// target and count when the release completes a click; a release
    /// somewhere else discards the pending press and breaks the chain.
    pub fn on_release(
        &mut self,
        under: Option<ComponentId>,
        point: Point,
        timestamp_us: u64,
    ) -> Option<(ComponentId, u32)> {
        let pending = self.pending.take()?;
        if under != Some(pending.target) {
            self.last_click = None;
            return None;
        }
        self.last_click = Some(ClickRecord {
            target: pending.target,
            point,
            timestamp_us,
            count: pending.count,
        });
        Some((pending.target, pending.count))
    }

    /// Click count of the in-flight press, or 0 with none pending.
    pub fn pending_count(&self) -> u32 {
        self.pending.map_or(0, |p| p.count)
    }

    /// Abandon any pending press and break the chain.
    ///
    /// Used when the press target disappears mid-interaction.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_click = None;
    }
}
