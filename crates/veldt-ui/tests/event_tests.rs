//! Event routing: hover tracking, push grabs, overlay dispatch.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;
use veldt_core::geometry::Rect;
use veldt_core::math::Vec2;
use veldt_ui::base::widget_at;
use veldt_ui::hook::{HookBinding, WidgetHook};
use veldt_ui::style::StyleRegistry;
use veldt_ui::widgets::{Scrollbar, Window};
use veldt_ui::{
    DrawCommand, DrawContext, Event, MouseButton, Ui, Widget,
};

fn move_to(x: f32, y: f32) -> Event {
    Event::Move { pos: Vec2::new(x, y) }
}

#[test]
fn test_hover_tracks_topmost_widget() {
    let styles = StyleRegistry::default();
    let mut window = Window::new(&styles, 200, 200, "hover");
    let bar = Scrollbar::new(&styles, Rect::new(0, 0, 20, 200));
    let bar_id = bar.base().id();
    let win_id = window.base().id();
    window.add(bar);
    let mut ui = Ui::new(styles, window);
    let t0 = Instant::now();

    ui.handle(move_to(10.0, 100.0), t0);
    assert_eq!(ui.router().hovered(), Some(bar_id));

    ui.handle(move_to(100.0, 100.0), t0);
    assert_eq!(ui.router().hovered(), Some(win_id));

    ui.handle(move_to(500.0, 100.0), t0);
    assert_eq!(ui.router().hovered(), None);
}

#[test]
fn test_widget_at_prefers_later_siblings() {
    let styles = StyleRegistry::default();
    let mut window = Window::new(&styles, 200, 200, "stack");
    let below = Scrollbar::new(&styles, Rect::new(0, 0, 100, 100));
    let above = Scrollbar::new(&styles, Rect::new(50, 50, 100, 100));
    let above_id = above.base().id();
    window.add(below);
    window.add(above);

    // In the overlap region the widget added last is on top.
    assert_eq!(widget_at(&window, Vec2::new(75.0, 75.0)), Some(above_id));
}

#[test]
fn test_widget_at_skips_hidden() {
    let styles = StyleRegistry::default();
    let mut window = Window::new(&styles, 200, 200, "hidden");
    let mut bar = Scrollbar::new(&styles, Rect::new(0, 0, 100, 100));
    bar.hide();
    let win_id = window.base().id();
    window.add(bar);
    assert_eq!(widget_at(&window, Vec2::new(50.0, 50.0)), Some(win_id));
}

#[test]
fn test_unconsumed_press_leaves_no_grab() {
    let styles = StyleRegistry::default();
    let window = Window::new(&styles, 200, 200, "empty");
    let mut ui = Ui::new(styles, window);
    let t0 = Instant::now();

    // An empty window consumes nothing.
    assert!(!ui.handle(
        Event::Push { pos: Vec2::new(50.0, 50.0), button: MouseButton::Left },
        t0
    ));
    assert_eq!(ui.router().pushed(), None);
}

struct OverlayHook {
    drawn: Rc<Cell<u32>>,
}

impl WidgetHook for OverlayHook {
    fn draw_overlay(&self, widget: &mut dyn Widget, ctx: &mut DrawContext<'_>) {
        let bounds = widget.base().bounds();
        ctx.list.quad(
            Rect::new(bounds.x, bounds.y, bounds.w, 2),
            veldt_core::color::Color::RED,
        );
        self.drawn.set(self.drawn.get() + 1);
    }
}

#[test]
fn test_overlay_draws_after_tree() {
    let styles = StyleRegistry::default();
    let mut window = Window::new(&styles, 200, 200, "overlay");
    let drawn = Rc::new(Cell::new(0));
    window
        .base_mut()
        .set_hooks(HookBinding::new(Rc::new(OverlayHook { drawn: Rc::clone(&drawn) })));
    window.add(Scrollbar::new(&styles, Rect::new(0, 0, 20, 200)));
    let mut ui = Ui::new(styles, window);

    let list = ui.draw();
    assert_eq!(drawn.get(), 1);
    // The overlay quad is the last command of the frame.
    let overlay_rect = Rect::new(0, 0, 200, 2);
    match list.commands().last() {
        Some(DrawCommand::Quad { rect, .. }) => assert_eq!(*rect, overlay_rect),
        other => panic!("expected overlay quad last, got {other:?}"),
    }
}

#[test]
fn test_needs_redraw_reflects_damage() {
    let styles = StyleRegistry::default();
    let mut window = Window::new(&styles, 200, 200, "damage");
    let bar = Scrollbar::new(&styles, Rect::new(0, 0, 20, 200));
    let bar_id = bar.base().id();
    window.add(bar);
    let mut ui = Ui::new(styles, window);

    assert!(ui.needs_redraw());
    ui.draw();
    assert!(!ui.needs_redraw());

    ui.find_mut(bar_id).unwrap().base_mut().redraw();
    assert!(ui.needs_redraw());
}
