// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Selects a target for each translated notification, delivers the event,
//! and lets it bubble toward the root until a listener consumes it.
//!
//! ## Target selection
//!
//! - Pointer and wheel events go to the innermost component under the
//!   pointer, restricted to the active modal scope.
//! - While a pointer grab is active, motion and release bypass hit testing
//!   and go to the grab holder.
//! - Key events go to the focus holder; with none they are dropped.
//!
//! ## Bubbling
//!
//! Press, release, click, wheel, and key events bubble: after the target's
//! listeners run, the event moves to the parent, with `source` updated at
//! each hop, until a listener consumes it, the modal anchor is passed, or
//! the root is reached. Motion and crossing events never bubble. Consuming
//! never skips listeners on the node that consumed.

use kurbo::Point;

use bramble_events::{
    KeyEvent, KeyEventKind, Modifiers, MouseEvent, MouseEventKind, ScrollKind, WheelEvent, keys,
};
use bramble_focus::{Focus, PreOrderPolicy, TraversalPolicy};
use bramble_tree::{ComponentId, QueryFilter, Tree};

use crate::click::ClickTracker;
use crate::modal::{ModalError, ModalStack};

/// Driven by the host's periodic redraw driver.
///
/// Implementations only schedule painting (typically [`Tree::repaint`]);
/// they must not reach into routing state, which belongs to the input
/// delivery context.
pub trait FrameTick {
    /// One redraw period has elapsed.
    fn on_frame_tick(&mut self);
}

/// All mutable routing state, bundled explicitly.
///
/// Owned by the toolkit root's controller and threaded through a
/// [`Router`] for each notification. Everything here is mutated only on
/// the single input-delivery context; there is no locking because there is
/// no concurrent writer.
#[derive(Debug)]
pub struct RoutingState<P = PreOrderPolicy> {
    /// Keyboard focus owner and traversal.
    pub focus: Focus<P>,
    /// Active modal scopes, innermost on top.
    pub modal: ModalStack,
    /// Pointer grab: set on press, cleared on release.
    pub grab: Option<ComponentId>,
    /// Component currently under the pointer.
    pub hovered: Option<ComponentId>,
    /// Click pairing and multi-click accumulation.
    pub clicks: ClickTracker,
}

impl RoutingState<PreOrderPolicy> {
    /// Routing state with the stock pre-order focus policy.
    pub fn new() -> Self {
        Self::with_policy(PreOrderPolicy)
    }
}

impl Default for RoutingState<PreOrderPolicy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: TraversalPolicy> RoutingState<P> {
    /// Routing state with a custom focus traversal policy.
    pub fn with_policy(policy: P) -> Self {
        Self {
            focus: Focus::with_policy(policy),
            modal: ModalStack::new(),
            grab: None,
            hovered: None,
            clicks: ClickTracker::new(),
        }
    }
}

/// Routes one notification against a tree and its routing state.
///
/// A `Router` is a short-lived pairing of `&mut Tree` and
/// `&mut RoutingState`; construct one per notification (or hold one across
/// a batch) and call the handler matching the input. No handler blocks or
/// suspends, and every handler leaves the state consistent even when the
/// event misses.
pub struct Router<'a, P = PreOrderPolicy> {
    tree: &'a mut Tree,
    state: &'a mut RoutingState<P>,
}

impl<P> core::fmt::Debug for Router<'_, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Router")
            .field("grab", &self.state.grab)
            .field("hovered", &self.state.hovered)
            .finish_non_exhaustive()
    }
}

impl<'a, P: TraversalPolicy> Router<'a, P> {
    /// Pair a tree with its routing state.
    pub fn new(tree: &'a mut Tree, state: &'a mut RoutingState<P>) -> Self {
        Self { tree, state }
    }

    /// The keyboard focus owner.
    pub fn focused(&self) -> Option<ComponentId> {
        self.state.focus.focused()
    }

    /// The pointer grab holder.
    pub fn grab(&self) -> Option<ComponentId> {
        self.state.grab
    }

    /// The component under the pointer, per the last move.
    pub fn hovered(&self) -> Option<ComponentId> {
        self.state.hovered
    }

    /// Transfer focus to `target`; silent no-op if ineligible.
    pub fn request_focus(&mut self, target: ComponentId) -> bool {
        self.state.focus.request_focus(self.tree, target, false)
    }

    /// Establish a modal scope anchored at `anchor`.
    pub fn push_modal(&mut self, anchor: ComponentId) -> Result<(), ModalError> {
        self.state.modal.push(self.tree, anchor)
    }

    /// Dismiss the modal scope anchored at `anchor` (top only).
    pub fn pop_modal(&mut self, anchor: ComponentId) -> Result<(), ModalError> {
        self.state.modal.pop(self.tree, anchor)
    }

    /// A pointer button went down at `point` (toolkit coordinates).
    ///
    /// Hit tests within the modal scope, records the grab, delivers
    /// `Pressed` with the anticipated click count (bubbling until
    /// consumed), then requests permanent focus on the target. A press on
    /// the background clears any stale grab and delivers nothing.
    /// Returns the component the press routed to.
    pub fn pointer_pressed(
        &mut self,
        point: Point,
        modifiers: Modifiers,
        timestamp_us: u64,
    ) -> Option<ComponentId> {
        self.tree.set_now(timestamp_us);
        let filter = QueryFilter::new().visible().enabled();
        let Some(target) = self.hit_in_scope(point, filter) else {
            self.state.grab = None;
            log::trace!("press missed at {point:?}");
            return None;
        };
        self.state.grab = Some(target);
        let count = self.state.clicks.on_press(target, point, timestamp_us);
        let mut ev = MouseEvent::new(
            target,
            MouseEventKind::Pressed,
            point,
            modifiers,
            count,
            timestamp_us,
        );
        self.bubble_mouse(target, &mut ev);
        self.state.focus.request_focus(self.tree, target, false);
        Some(target)
    }

    /// The pointer moved to `point` (toolkit coordinates).
    ///
    /// Reconciles the hovered record (firing `Exited`/`Entered`, which
    /// never bubble), then delivers motion: `Dragged` to the grab holder
    /// with the real coordinates, or `Moved` to the component under the
    /// pointer. While a grab is active the hovered record keeps tracking
    /// reality, but crossing events are suppressed for the grab holder
    /// itself.
    pub fn pointer_moved(&mut self, point: Point, modifiers: Modifiers, timestamp_us: u64) {
        self.tree.set_now(timestamp_us);
        let under = self.hit_in_scope(point, QueryFilter::new().visible());
        let old = self.state.hovered.filter(|h| self.tree.is_alive(*h));
        if old != under {
            if let Some(old_id) = old
                && Some(old_id) != self.state.grab
            {
                let mut ev = MouseEvent::new(
                    old_id,
                    MouseEventKind::Exited,
                    point,
                    modifiers,
                    0,
                    timestamp_us,
                );
                self.tree.dispatch_mouse(old_id, &mut ev);
            }
            if let Some(new_id) = under
                && Some(new_id) != self.state.grab
            {
                let mut ev = MouseEvent::new(
                    new_id,
                    MouseEventKind::Entered,
                    point,
                    modifiers,
                    0,
                    timestamp_us,
                );
                self.tree.dispatch_mouse(new_id, &mut ev);
            }
        }
        self.state.hovered = under;

        match self.state.grab.filter(|g| self.tree.is_alive(*g)) {
            Some(grabbed) => {
                let mut ev = MouseEvent::new(
                    grabbed,
                    MouseEventKind::Dragged,
                    point,
                    modifiers,
                    0,
                    timestamp_us,
                );
                self.tree.dispatch_mouse(grabbed, &mut ev);
            }
            None => {
                if let Some(under) = under {
                    let mut ev = MouseEvent::new(
                        under,
                        MouseEventKind::Moved,
                        point,
                        modifiers,
                        0,
                        timestamp_us,
                    );
                    self.tree.dispatch_mouse(under, &mut ev);
                }
            }
        }
    }

    /// A pointer button came up at `point` (toolkit coordinates).
    ///
    /// Routes `Released` to the grab holder (clearing the grab), or by hit
    /// test with no grab; bubbles until consumed. When the release lands on
    /// the press target, a `Clicked` with the accumulated count follows.
    /// Returns the component the release routed to.
    pub fn pointer_released(
        &mut self,
        point: Point,
        modifiers: Modifiers,
        timestamp_us: u64,
    ) -> Option<ComponentId> {
        self.tree.set_now(timestamp_us);
        let filter = QueryFilter::new().visible().enabled();
        let under = self.hit_in_scope(point, filter);
        let grabbed = self.state.grab.take().filter(|g| self.tree.is_alive(*g));
        let Some(target) = grabbed.or(under) else {
            self.state.clicks.on_release(None, point, timestamp_us);
            return None;
        };
        let count = self.state.clicks.pending_count();
        let mut ev = MouseEvent::new(
            target,
            MouseEventKind::Released,
            point,
            modifiers,
            count,
            timestamp_us,
        );
        self.bubble_mouse(target, &mut ev);

        if let Some((click_target, count)) = self.state.clicks.on_release(under, point, timestamp_us)
        {
            let mut click = MouseEvent::new(
                click_target,
                MouseEventKind::Clicked,
                point,
                modifiers,
                count,
                timestamp_us,
            );
            self.bubble_mouse(click_target, &mut click);
        }
        Some(target)
    }

    /// The wheel rotated over `point` (toolkit coordinates).
    ///
    /// Delivered to the component under the pointer, bubbling until
    /// consumed. Returns the component the event routed to.
    pub fn wheel(
        &mut self,
        point: Point,
        scroll_kind: ScrollKind,
        scroll_amount: i32,
        rotation: i32,
        modifiers: Modifiers,
        timestamp_us: u64,
    ) -> Option<ComponentId> {
        self.tree.set_now(timestamp_us);
        let target = self.hit_in_scope(point, QueryFilter::new().visible().enabled())?;
        let mut ev = WheelEvent::new(
            target,
            scroll_kind,
            scroll_amount,
            rotation,
            point,
            modifiers,
            timestamp_us,
        );
        self.bubble_wheel(target, &mut ev);
        Some(target)
    }

    /// A key changed state or produced a character.
    ///
    /// Delivered to the focus holder, bubbling until consumed; dropped
    /// silently with no focus. An unconsumed `Down` of [`keys::TAB`] moves
    /// focus forward within the active scope, or backward with `SHIFT`.
    pub fn key(
        &mut self,
        kind: KeyEventKind,
        code: u32,
        ch: Option<char>,
        modifiers: Modifiers,
        timestamp_us: u64,
    ) {
        self.tree.set_now(timestamp_us);
        let Some(holder) = self
            .state
            .focus
            .focused()
            .filter(|f| self.tree.is_alive(*f))
        else {
            log::trace!("key dropped: no focus holder");
            return;
        };
        let mut ev = KeyEvent::new(holder, kind, code, ch, modifiers, timestamp_us);
        self.bubble_key(holder, &mut ev);

        if kind == KeyEventKind::Down && code == keys::TAB && !ev.is_consumed() {
            let scope = self.scope_top().unwrap_or_else(|| self.root_of(holder));
            if modifiers.contains(Modifiers::SHIFT) {
                self.state.focus.transfer_previous(self.tree, scope);
            } else {
                self.state.focus.transfer_next(self.tree, scope);
            }
        }
    }

    /// Remove `id`'s subtree, reconciling routing state first.
    ///
    /// Unconditional and never fails: clears the grab and pending click if
    /// the grab holder is inside the subtree, silently drops the hovered
    /// record (a dying component gets no exit event), removes modal anchors
    /// in the subtree, transfers focus out, then removes the subtree.
    pub fn remove_component(&mut self, id: ComponentId) {
        if let Some(grabbed) = self.state.grab
            && self.tree.is_descendant_or_self(id, grabbed)
        {
            self.state.grab = None;
            self.state.clicks.cancel();
        }
        if let Some(hovered) = self.state.hovered
            && self.tree.is_descendant_or_self(id, hovered)
        {
            self.state.hovered = None;
        }
        self.state.modal.remove_anchors_in(self.tree, id);
        self.state.focus.on_detach(self.tree, id);
        self.tree.remove(id);
    }

    /// The live modal anchor restricting routing, if any.
    fn scope_top(&self) -> Option<ComponentId> {
        self.state.modal.top().filter(|a| self.tree.is_alive(*a))
    }

    fn root_of(&self, id: ComponentId) -> ComponentId {
        let mut cur = id;
        while let Some(p) = self.tree.parent_of(cur) {
            cur = p;
        }
        cur
    }

    fn hit_in_scope(&self, point: Point, filter: QueryFilter) -> Option<ComponentId> {
        match self.scope_top() {
            Some(anchor) => self.tree.hit_test_from(anchor, point, filter),
            None => self.tree.hit_test(point, filter),
        }
    }

    fn bubble_mouse(&mut self, start: ComponentId, ev: &mut MouseEvent<ComponentId>) {
        let limit = self.scope_top();
        let mut cur = Some(start);
        while let Some(id) = cur {
            ev.source = id;
            self.tree.dispatch_mouse(id, ev);
            if ev.is_consumed() || Some(id) == limit {
                break;
            }
            cur = self.tree.parent_of(id);
        }
    }

    fn bubble_wheel(&mut self, start: ComponentId, ev: &mut WheelEvent<ComponentId>) {
        let limit = self.scope_top();
        let mut cur = Some(start);
        while let Some(id) = cur {
            ev.source = id;
            self.tree.dispatch_wheel(id, ev);
            if ev.is_consumed() || Some(id) == limit {
                break;
            }
            cur = self.tree.parent_of(id);
        }
    }

    fn bubble_key(&mut self, start: ComponentId, ev: &mut KeyEvent<ComponentId>) {
        let limit = self.scope_top();
        let mut cur = Some(start);
        while let Some(id) = cur {
            ev.source = id;
            self.tree.dispatch_key(id, ev);
            if ev.is_consumed() || Some(id) == limit {
                break;
            }
            cur = self.tree.parent_of(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use kurbo::Rect;

    use bramble_events::{
        FocusEvent, FocusListener, KeyListener, MotionListener, MouseListener, WheelListener,
    };

    type Log = Rc<RefCell<Vec<(&'static str, ComponentId, i32)>>>;

    /// Records every event it sees; optionally consumes one kind.
    #[derive(Clone)]
    struct Probe {
        log: Log,
        consume: Option<&'static str>,
    }

    impl Probe {
        fn hit(&mut self, kind: &'static str, source: ComponentId, value: i32) -> bool {
            self.log.borrow_mut().push((kind, source, value));
            self.consume == Some(kind)
        }
    }

    impl MouseListener<ComponentId> for Probe {
        fn mouse_pressed(&mut self, ev: &mut MouseEvent<ComponentId>) {
            if self.hit("pressed", ev.source, ev.click_count as i32) {
                ev.consume();
            }
        }
        fn mouse_released(&mut self, ev: &mut MouseEvent<ComponentId>) {
            if self.hit("released", ev.source, ev.click_count as i32) {
                ev.consume();
            }
        }
        fn mouse_clicked(&mut self, ev: &mut MouseEvent<ComponentId>) {
            if self.hit("clicked", ev.source, ev.click_count as i32) {
                ev.consume();
            }
        }
        fn mouse_entered(&mut self, ev: &mut MouseEvent<ComponentId>) {
            self.hit("entered", ev.source, 0);
        }
        fn mouse_exited(&mut self, ev: &mut MouseEvent<ComponentId>) {
            self.hit("exited", ev.source, 0);
        }
    }

    impl MotionListener<ComponentId> for Probe {
        fn mouse_moved(&mut self, ev: &mut MouseEvent<ComponentId>) {
            self.hit("moved", ev.source, 0);
        }
        fn mouse_dragged(&mut self, ev: &mut MouseEvent<ComponentId>) {
            self.hit("dragged", ev.source, 0);
        }
    }

    impl WheelListener<ComponentId> for Probe {
        fn wheel_moved(&mut self, ev: &mut WheelEvent<ComponentId>) {
            if self.hit("wheel", ev.source, ev.units_to_scroll()) {
                ev.consume();
            }
        }
    }

    impl KeyListener<ComponentId> for Probe {
        fn key_pressed(&mut self, ev: &mut KeyEvent<ComponentId>) {
            if self.hit("key_down", ev.source, ev.code as i32) {
                ev.consume();
            }
        }
        fn key_released(&mut self, ev: &mut KeyEvent<ComponentId>) {
            if self.hit("key_up", ev.source, ev.code as i32) {
                ev.consume();
            }
        }
        fn key_typed(&mut self, ev: &mut KeyEvent<ComponentId>) {
            self.hit("key_typed", ev.source, ev.code as i32);
        }
    }

    impl FocusListener<ComponentId> for Probe {
        fn focus_gained(&mut self, ev: &FocusEvent<ComponentId>) {
            self.log.borrow_mut().push(("focus_gained", ev.source, 0));
        }
        fn focus_lost(&mut self, ev: &FocusEvent<ComponentId>) {
            self.log.borrow_mut().push(("focus_lost", ev.source, 0));
        }
    }

    fn probe(tree: &mut Tree, id: ComponentId, log: &Log) {
        probe_consuming(tree, id, log, None);
    }

    fn probe_consuming(tree: &mut Tree, id: ComponentId, log: &Log, consume: Option<&'static str>) {
        let p = Probe {
            log: log.clone(),
            consume,
        };
        let listeners = tree.listeners_mut(id).unwrap();
        listeners.mouse.add(Box::new(p.clone()));
        listeners.motion.add(Box::new(p.clone()));
        listeners.wheel.add(Box::new(p.clone()));
        listeners.key.add(Box::new(p.clone()));
        listeners.focus.add(Box::new(p));
    }

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    fn events_for(log: &Log, id: ComponentId) -> Vec<(&'static str, i32)> {
        log.borrow()
            .iter()
            .filter(|(_, src, _)| *src == id)
            .map(|(kind, _, v)| (*kind, *v))
            .collect()
    }

    #[test]
    fn press_and_release_bubble_then_click_and_focus() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 200.0, 200.0));
        let button = tree.insert(rect(10.0, 10.0, 50.0, 50.0));
        tree.add_child(root, button).unwrap();
        tree.set_focusable(button, true);
        let log = Log::default();
        probe(&mut tree, root, &log);
        probe(&mut tree, button, &log);

        let mut state = RoutingState::new();
        let mut router = Router::new(&mut tree, &mut state);
        let p = Point::new(20.0, 20.0);

        assert_eq!(router.pointer_pressed(p, Modifiers::BUTTON1, 1_000), Some(button));
        assert_eq!(router.grab(), Some(button));
        assert_eq!(router.focused(), Some(button));

        assert_eq!(router.pointer_released(p, Modifiers::empty(), 2_000), Some(button));
        assert_eq!(router.grab(), None);

        assert_eq!(
            *log.borrow(),
            vec![
                ("pressed", button, 1),
                ("pressed", root, 1),
                ("focus_gained", button, 0),
                ("released", button, 1),
                ("released", root, 1),
                ("clicked", button, 1),
                ("clicked", root, 1),
            ]
        );
    }

    #[test]
    fn consuming_stops_bubbling_but_not_siblings() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 200.0, 200.0));
        let button = tree.insert(rect(10.0, 10.0, 50.0, 50.0));
        tree.add_child(root, button).unwrap();
        let log = Log::default();
        probe(&mut tree, root, &log);
        probe_consuming(&mut tree, button, &log, Some("pressed"));
        probe(&mut tree, button, &log); // sibling listener after the consumer

        let mut state = RoutingState::new();
        let mut router = Router::new(&mut tree, &mut state);
        router.pointer_pressed(Point::new(20.0, 20.0), Modifiers::BUTTON1, 0);

        // Both of the button's listeners ran; the root saw nothing.
        assert_eq!(events_for(&log, button), vec![("pressed", 1), ("pressed", 1)]);
        assert_eq!(events_for(&log, root), vec![]);
    }

    #[test]
    fn dragging_never_crosses_the_grab_target() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 300.0, 300.0));
        let x = tree.insert(rect(0.0, 0.0, 50.0, 50.0));
        let y = tree.insert(rect(100.0, 100.0, 50.0, 50.0));
        tree.add_child(root, x).unwrap();
        tree.add_child(root, y).unwrap();
        let log = Log::default();
        probe(&mut tree, x, &log);
        probe(&mut tree, y, &log);

        struct DragPoints(Rc<RefCell<Vec<Point>>>);
        impl MotionListener<ComponentId> for DragPoints {
            fn mouse_dragged(&mut self, ev: &mut MouseEvent<ComponentId>) {
                self.0.borrow_mut().push(ev.point);
            }
        }
        let drags = Rc::new(RefCell::new(Vec::new()));
        tree.listeners_mut(x)
            .unwrap()
            .motion
            .add(Box::new(DragPoints(drags.clone())));

        let mut state = RoutingState::new();
        let mut router = Router::new(&mut tree, &mut state);
        let none = Modifiers::empty();

        router.pointer_moved(Point::new(10.0, 10.0), none, 0);
        router.pointer_pressed(Point::new(10.0, 10.0), Modifiers::BUTTON1, 1);
        // Drag across y and back; x holds the grab throughout.
        router.pointer_moved(Point::new(120.0, 120.0), Modifiers::BUTTON1, 2);
        assert_eq!(router.hovered(), Some(y));
        router.pointer_moved(Point::new(10.0, 10.0), Modifiers::BUTTON1, 3);
        assert_eq!(router.hovered(), Some(x));
        // Release away from x: no click.
        router.pointer_released(Point::new(120.0, 120.0), none, 4);

        let x_events = events_for(&log, x);
        // One crossing pair from the initial move; none from the drag.
        assert_eq!(
            x_events,
            vec![
                ("entered", 0),
                ("moved", 0),
                ("pressed", 1),
                ("dragged", 0),
                ("dragged", 0),
                ("released", 1),
            ]
        );
        // The bystander still sees the pointer cross it mid-drag.
        assert_eq!(events_for(&log, y), vec![("entered", 0), ("exited", 0)]);
        assert!(!log.borrow().iter().any(|(k, _, _)| *k == "clicked"));
        // Drags carried the real coordinates, even outside x's bounds.
        assert_eq!(
            *drags.borrow(),
            vec![Point::new(120.0, 120.0), Point::new(10.0, 10.0)]
        );
    }

    #[test]
    fn modal_scope_blocks_outside_input_but_exits_stale_hover() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 300.0, 300.0));
        let outside = tree.insert(rect(0.0, 0.0, 50.0, 50.0));
        let dialog = tree.insert(rect(100.0, 100.0, 100.0, 100.0));
        let inner = tree.insert(rect(10.0, 10.0, 30.0, 30.0));
        tree.add_child(root, outside).unwrap();
        tree.add_child(root, dialog).unwrap();
        tree.add_child(dialog, inner).unwrap();
        let log = Log::default();
        probe(&mut tree, root, &log);
        probe(&mut tree, outside, &log);
        probe(&mut tree, dialog, &log);
        probe(&mut tree, inner, &log);

        let mut state = RoutingState::new();
        let mut router = Router::new(&mut tree, &mut state);
        let none = Modifiers::empty();
        let outside_point = Point::new(20.0, 20.0);
        let inner_point = Point::new(120.0, 120.0);

        // Hover the outside button first.
        router.pointer_moved(outside_point, none, 0);
        assert_eq!(router.hovered(), Some(outside));

        router.push_modal(dialog).unwrap();

        // Presses outside the scope miss entirely.
        assert_eq!(router.pointer_pressed(outside_point, Modifiers::BUTTON1, 1), None);
        assert!(!events_for(&log, outside).contains(&("pressed", 1)));

        // The stale hover still resolves: moving fires the exit.
        router.pointer_moved(outside_point, none, 2);
        assert_eq!(router.hovered(), None);
        assert!(events_for(&log, outside).contains(&("exited", 0)));

        // Inside the scope, presses work and bubbling stops at the anchor.
        assert_eq!(
            router.pointer_pressed(inner_point, Modifiers::BUTTON1, 3),
            Some(inner)
        );
        assert_eq!(events_for(&log, inner), vec![("pressed", 1)]);
        assert_eq!(events_for(&log, dialog), vec![("pressed", 1)]);
        assert_eq!(events_for(&log, root), vec![]);

        // The press left a grab on the inner button; releasing anywhere
        // still routes to it.
        assert_eq!(router.pointer_released(inner_point, none, 4), Some(inner));
        assert_eq!(router.grab(), None);

        router.pop_modal(dialog).unwrap();
        // With the scope gone, hit testing reaches the outside button again.
        assert_eq!(
            router.pointer_pressed(outside_point, Modifiers::BUTTON1, 5),
            Some(outside)
        );
    }

    #[test]
    fn keys_route_to_focus_and_tab_moves_it() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 200.0, 200.0));
        let a = tree.insert(rect(0.0, 0.0, 50.0, 50.0));
        let b = tree.insert(rect(60.0, 0.0, 50.0, 50.0));
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        tree.set_focusable(a, true);
        tree.set_focusable(b, true);
        let log = Log::default();
        probe(&mut tree, root, &log);
        probe(&mut tree, a, &log);
        probe(&mut tree, b, &log);

        let mut state = RoutingState::new();
        let mut router = Router::new(&mut tree, &mut state);
        assert!(router.request_focus(a));

        router.key(KeyEventKind::Down, 0x41, None, Modifiers::empty(), 0);
        // Delivered to the holder and bubbled to the root.
        assert!(events_for(&log, a).contains(&("key_down", 0x41)));
        assert!(events_for(&log, root).contains(&("key_down", 0x41)));

        router.key(KeyEventKind::Down, keys::TAB, None, Modifiers::empty(), 1);
        assert_eq!(router.focused(), Some(b));
        router.key(KeyEventKind::Down, keys::TAB, None, Modifiers::SHIFT, 2);
        assert_eq!(router.focused(), Some(a));
        // Wrap backward from the first candidate.
        router.key(KeyEventKind::Down, keys::TAB, None, Modifiers::SHIFT, 3);
        assert_eq!(router.focused(), Some(b));
    }

    #[test]
    fn consumed_tab_does_not_traverse() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 200.0, 200.0));
        let a = tree.insert(rect(0.0, 0.0, 50.0, 50.0));
        let b = tree.insert(rect(60.0, 0.0, 50.0, 50.0));
        tree.add_child(root, a).unwrap();
        tree.add_child(root, b).unwrap();
        tree.set_focusable(a, true);
        tree.set_focusable(b, true);
        let log = Log::default();
        probe_consuming(&mut tree, a, &log, Some("key_down"));

        let mut state = RoutingState::new();
        let mut router = Router::new(&mut tree, &mut state);
        assert!(router.request_focus(a));

        router.key(KeyEventKind::Down, keys::TAB, None, Modifiers::empty(), 0);
        assert_eq!(router.focused(), Some(a));
    }

    #[test]
    fn keys_without_focus_are_dropped() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 200.0, 200.0));
        let log = Log::default();
        probe(&mut tree, root, &log);

        let mut state = RoutingState::new();
        let mut router = Router::new(&mut tree, &mut state);
        router.key(KeyEventKind::Down, 0x41, None, Modifiers::empty(), 0);
        router.key(KeyEventKind::Typed, 0x41, Some('a'), Modifiers::empty(), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn rapid_clicks_accumulate_through_the_router() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 200.0, 200.0));
        let button = tree.insert(rect(10.0, 10.0, 50.0, 50.0));
        tree.add_child(root, button).unwrap();
        let log = Log::default();
        probe(&mut tree, button, &log);

        let mut state = RoutingState::new();
        let mut router = Router::new(&mut tree, &mut state);
        let p = Point::new(20.0, 20.0);
        let m = Modifiers::BUTTON1;

        router.pointer_pressed(p, m, 0);
        router.pointer_released(p, m, 10_000);
        router.pointer_pressed(p, m, 100_000);
        router.pointer_released(p, m, 110_000);
        // Far past the interval: the chain resets.
        router.pointer_pressed(p, m, 5_000_000);
        router.pointer_released(p, m, 5_010_000);

        let clicks: Vec<i32> = log
            .borrow()
            .iter()
            .filter(|(k, _, _)| *k == "clicked")
            .map(|(_, _, v)| *v)
            .collect();
        assert_eq!(clicks, vec![1, 2, 1]);
    }

    #[test]
    fn wheel_bubbles_until_consumed() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 200.0, 200.0));
        let list = tree.insert(rect(10.0, 10.0, 100.0, 100.0));
        tree.add_child(root, list).unwrap();
        let log = Log::default();
        probe(&mut tree, root, &log);
        probe_consuming(&mut tree, list, &log, Some("wheel"));

        let mut state = RoutingState::new();
        let mut router = Router::new(&mut tree, &mut state);
        let target = router.wheel(
            Point::new(20.0, 20.0),
            ScrollKind::Unit,
            3,
            -2,
            Modifiers::empty(),
            0,
        );
        assert_eq!(target, Some(list));

        // Three units per notch, two notches up: minus six units total.
        assert_eq!(events_for(&log, list), vec![("wheel", -6)]);
        // Consumed at the list: the root never sees it.
        assert_eq!(events_for(&log, root), vec![]);
    }

    #[test]
    fn removal_reconciles_grab_focus_and_modal() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 300.0, 300.0));
        let outside = tree.insert(rect(0.0, 0.0, 50.0, 50.0));
        let dialog = tree.insert(rect(100.0, 100.0, 100.0, 100.0));
        let inner = tree.insert(rect(10.0, 10.0, 30.0, 30.0));
        tree.add_child(root, outside).unwrap();
        tree.add_child(root, dialog).unwrap();
        tree.add_child(dialog, inner).unwrap();
        tree.set_focusable(outside, true);
        tree.set_focusable(inner, true);

        let mut state = RoutingState::new();
        let mut router = Router::new(&mut tree, &mut state);
        router.push_modal(dialog).unwrap();
        router.pointer_pressed(Point::new(120.0, 120.0), Modifiers::BUTTON1, 0);
        assert_eq!(router.grab(), Some(inner));
        assert_eq!(router.focused(), Some(inner));

        router.remove_component(dialog);

        assert_eq!(router.grab(), None);
        assert_eq!(router.hovered(), None);
        // Focus transferred out of the removed subtree, not dropped.
        assert_eq!(router.focused(), Some(outside));
        assert!(!tree.is_alive(dialog));
        assert!(!tree.is_alive(inner));
        // The modal scope died with its anchor: outside input flows again.
        let mut router = Router::new(&mut tree, &mut state);
        assert_eq!(
            router.pointer_pressed(Point::new(20.0, 20.0), Modifiers::BUTTON1, 1),
            Some(outside)
        );
    }

    #[test]
    fn removing_an_uninvolved_subtree_leaves_routing_state_alone() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 200.0, 200.0));
        let a = tree.insert(rect(0.0, 0.0, 50.0, 50.0));
        tree.add_child(root, a).unwrap();
        tree.set_focusable(a, true);

        let mut state = RoutingState::new();
        let mut router = Router::new(&mut tree, &mut state);
        router.pointer_moved(Point::new(10.0, 10.0), Modifiers::empty(), 0);
        assert!(router.request_focus(a));

        // A subtree that holds no focus, grab, or modal role comes and goes
        // without disturbing any of them.
        let extra = router.tree.insert(rect(100.0, 100.0, 50.0, 50.0));
        router.tree.add_child(root, extra).unwrap();
        router.remove_component(extra);

        assert_eq!(router.focused(), Some(a));
        assert_eq!(router.hovered(), Some(a));
        assert_eq!(router.grab(), None);
        assert!(router.state.modal.is_empty());
    }

    #[test]
    fn background_press_clears_a_stale_grab() {
        let mut tree = Tree::new();
        let root = tree.insert(rect(0.0, 0.0, 100.0, 100.0));

        let mut state = RoutingState::new();
        state.grab = Some(root);
        let mut router = Router::new(&mut tree, &mut state);
        assert_eq!(
            router.pointer_pressed(Point::new(500.0, 500.0), Modifiers::BUTTON1, 0),
            None
        );
        assert_eq!(router.grab(), None);
    }
}
