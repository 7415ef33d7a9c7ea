// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end event routing: host notifications through to listeners.
//!
//! This example shows how to combine:
//! - `bramble_tree` for the component tree and hit testing,
//! - `bramble_router` for grab, hover, click, modal, and focus routing,
//! - `HostTranslator` for converting host notifications with a top-left
//!   origin into toolkit events with a bottom-left origin.
//!
//! Run:
//! - `cargo run -p bramble_demos --example pointer_routing`

use kurbo::Rect;

use bramble_events::{ComponentEvent, ComponentListener, FocusEvent, FocusListener, MouseEvent, MouseListener, keys};
use bramble_router::{HostEvent, HostModifiers, HostTranslator, Router, RoutingState};
use bramble_tree::{ComponentId, Tree};

/// Prints what a component hears, tagged with a human-readable name.
struct Narrator(&'static str);

impl MouseListener<ComponentId> for Narrator {
    fn mouse_pressed(&mut self, ev: &mut MouseEvent<ComponentId>) {
        println!("[{}] pressed at {:?}", self.0, ev.point);
    }
    fn mouse_clicked(&mut self, ev: &mut MouseEvent<ComponentId>) {
        println!("[{}] clicked (count {})", self.0, ev.click_count);
        // Stop the click here so ancestors do not also react.
        ev.consume();
    }
    fn mouse_entered(&mut self, _ev: &mut MouseEvent<ComponentId>) {
        println!("[{}] pointer entered", self.0);
    }
    fn mouse_exited(&mut self, _ev: &mut MouseEvent<ComponentId>) {
        println!("[{}] pointer exited", self.0);
    }
}

impl FocusListener<ComponentId> for Narrator {
    fn focus_gained(&mut self, _ev: &FocusEvent<ComponentId>) {
        println!("[{}] focus gained", self.0);
    }
    fn focus_lost(&mut self, _ev: &FocusEvent<ComponentId>) {
        println!("[{}] focus lost", self.0);
    }
}

impl ComponentListener<ComponentId> for Narrator {
    fn component_shown(&mut self, _ev: &ComponentEvent<ComponentId>) {
        println!("[{}] shown", self.0);
    }
    fn component_hidden(&mut self, _ev: &ComponentEvent<ComponentId>) {
        println!("[{}] hidden", self.0);
    }
}

fn narrate(tree: &mut Tree, id: ComponentId, name: &'static str) {
    let listeners = tree.listeners_mut(id).expect("component is alive");
    listeners.mouse.add(Box::new(Narrator(name)));
    listeners.focus.add(Box::new(Narrator(name)));
    listeners.component.add(Box::new(Narrator(name)));
}

fn main() {
    // A 640x480 surface. Toolkit coordinates grow upward from the
    // bottom-left corner; the host reports top-left based positions.
    let mut tree = Tree::new();
    let window = tree.insert(Rect::new(0.0, 0.0, 640.0, 480.0));
    let ok = tree.insert(Rect::new(40.0, 40.0, 160.0, 80.0));
    let cancel = tree.insert(Rect::new(200.0, 40.0, 320.0, 80.0));
    tree.add_child(window, ok).unwrap();
    tree.add_child(window, cancel).unwrap();
    tree.set_focusable(ok, true);
    tree.set_focusable(cancel, true);
    narrate(&mut tree, ok, "ok");
    narrate(&mut tree, cancel, "cancel");

    let mut state = RoutingState::new();
    let translator = HostTranslator::new(480.0);

    // The host's y=420 lands at toolkit y=59, inside both buttons' band.
    let script = [
        HostEvent::PointerMoved {
            x: 100.0,
            y: 420.0,
            modifiers: HostModifiers::empty(),
            timestamp_us: 1_000,
        },
        HostEvent::PointerPressed {
            x: 100.0,
            y: 420.0,
            modifiers: HostModifiers::BUTTON1,
            timestamp_us: 2_000,
        },
        HostEvent::PointerReleased {
            x: 100.0,
            y: 420.0,
            modifiers: HostModifiers::empty(),
            timestamp_us: 3_000,
        },
        // Tab moves focus from "ok" to "cancel".
        HostEvent::Key {
            kind: bramble_events::KeyEventKind::Down,
            code: keys::TAB,
            ch: None,
            modifiers: HostModifiers::empty(),
            timestamp_us: 4_000,
        },
        // Drift over to "cancel" and click it too.
        HostEvent::PointerMoved {
            x: 250.0,
            y: 420.0,
            modifiers: HostModifiers::empty(),
            timestamp_us: 5_000,
        },
        HostEvent::PointerPressed {
            x: 250.0,
            y: 420.0,
            modifiers: HostModifiers::BUTTON1,
            timestamp_us: 6_000,
        },
        HostEvent::PointerReleased {
            x: 250.0,
            y: 420.0,
            modifiers: HostModifiers::empty(),
            timestamp_us: 7_000,
        },
    ];

    {
        let mut router = Router::new(&mut tree, &mut state);
        for event in script {
            translator.feed(&mut router, event);
        }
        println!("focused: {:?}", router.focused());
    }

    // A modal dialog swallows input outside its subtree.
    let dialog = tree.insert(Rect::new(160.0, 160.0, 480.0, 320.0));
    let confirm = tree.insert(Rect::new(20.0, 20.0, 140.0, 60.0));
    tree.add_child(window, dialog).unwrap();
    tree.add_child(dialog, confirm).unwrap();
    tree.set_focusable(confirm, true);
    narrate(&mut tree, confirm, "confirm");

    let mut router = Router::new(&mut tree, &mut state);
    router.push_modal(dialog).unwrap();

    // The "ok" button is outside the modal scope now, so this press misses.
    translator.feed(
        &mut router,
        HostEvent::PointerPressed {
            x: 100.0,
            y: 420.0,
            modifiers: HostModifiers::BUTTON1,
            timestamp_us: 8_000,
        },
    );
    // "confirm" sits at toolkit (180..300, 180..220); host y for 200 is 279.
    translator.feed(
        &mut router,
        HostEvent::PointerPressed {
            x: 200.0,
            y: 279.0,
            modifiers: HostModifiers::BUTTON1,
            timestamp_us: 9_000,
        },
    );
    translator.feed(
        &mut router,
        HostEvent::PointerReleased {
            x: 200.0,
            y: 279.0,
            modifiers: HostModifiers::empty(),
            timestamp_us: 10_000,
        },
    );
    println!("focused inside dialog: {:?}", router.focused());

    router.pop_modal(dialog).unwrap();
    router.remove_component(dialog);
    println!("focused after dialog closed: {:?}", router.focused());
}
