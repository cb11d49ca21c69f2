//! Scrollbar: a slider with stepping end boxes and an auto-repeat timer.
//!
//! The track region delegates to the embedded slider's drag machine. The
//! two square end boxes step the value by `linesize`; holding one pressed
//! repeats the step on a timer, starting after half a second and then every
//! 50 ms. The repeat timer is armed exactly while an end box is pushed.

use crate::base::{Widget, WidgetBase};
use crate::damage::Damage;
use crate::draw::{self, BoxKind, DrawContext};
use crate::event::{Event, EventContext, Key};
use crate::style::StyleRegistry;
use crate::widgets::slider::{Orientation, Slider};
use std::any::Any;
use std::time::Duration;
use veldt_core::geometry::Rect;
use veldt_core::math::Vec2;
use veldt_core::timer::TimerToken;

/// Delay before the first auto-repeat step.
pub const INITIAL_REPEAT: Duration = Duration::from_millis(500);
/// Interval between subsequent auto-repeat steps.
pub const REPEAT: Duration = Duration::from_millis(50);

/// Which end box is currently held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pushed {
    None,
    /// The box at the low-coordinate end of the long axis.
    Decrement,
    /// The box at the high-coordinate end.
    Increment,
}

pub struct Scrollbar {
    slider: Slider,
    linesize: i32,
    pushed: Pushed,
    repeat: Option<TimerToken>,
}

impl Scrollbar {
    /// A vertical scrollbar.
    pub fn new(styles: &StyleRegistry, bounds: Rect<i32>) -> Self {
        Self::with_orientation(styles, bounds, Orientation::Vertical)
    }

    /// A horizontal scrollbar.
    pub fn horizontal(styles: &StyleRegistry, bounds: Rect<i32>) -> Self {
        Self::with_orientation(styles, bounds, Orientation::Horizontal)
    }

    fn with_orientation(styles: &StyleRegistry, bounds: Rect<i32>, orientation: Orientation) -> Self {
        let linesize = styles.class("scrollbar").linesize;
        Self {
            slider: Slider::with_class("scrollbar", styles, bounds, orientation),
            linesize,
            pushed: Pushed::None,
            repeat: None,
        }
    }

    pub fn value(&self) -> f64 {
        self.slider.value()
    }

    pub fn set_value(&mut self, v: f64) -> bool {
        self.slider.set_value(v)
    }

    pub fn set_range(&mut self, minimum: f64, maximum: f64) {
        self.slider.set_range(minimum, maximum);
    }

    pub fn minimum(&self) -> f64 {
        self.slider.minimum()
    }

    pub fn maximum(&self) -> f64 {
        self.slider.maximum()
    }

    pub fn clamp(&self, v: f64) -> f64 {
        self.slider.clamp(v)
    }

    pub fn linesize(&self) -> i32 {
        self.linesize
    }

    pub fn set_linesize(&mut self, linesize: i32) {
        self.linesize = linesize;
    }

    pub fn slider_size(&self) -> f64 {
        self.slider.slider_size()
    }

    pub fn set_slider_size(&mut self, fraction: f64) {
        self.slider.set_slider_size(fraction);
    }

    /// Configure the bar for scrolling a window of `window` lines over
    /// `total` lines starting at `first`, positioned at `pos`.
    pub fn scroll_value(&mut self, pos: f64, window: f64, first: f64, total: f64) -> bool {
        if total > 0.0 {
            self.slider.set_slider_size(window / total);
        }
        self.slider.set_range(first, first + (total - window).max(0.0));
        self.slider.set_value(pos)
    }

    pub fn pushed(&self) -> Pushed {
        self.pushed
    }

    /// True while the auto-repeat timer is armed. Holds exactly when an end
    /// box is pushed.
    pub fn repeat_armed(&self) -> bool {
        self.repeat.is_some()
    }

    fn is_horizontal(&self) -> bool {
        self.slider.is_horizontal()
    }

    /// End boxes and inner track, or `None` when the bar is too short for
    /// end boxes (long axis under three times the breadth).
    fn end_boxes(&self) -> Option<(Rect<i32>, Rect<i32>, Rect<i32>)> {
        let b = self.slider.base().bounds();
        if self.is_horizontal() {
            if b.w < 3 * b.h {
                return None;
            }
            let dec = Rect::new(b.x, b.y, b.h, b.h);
            let inc = Rect::new(b.x + b.w - b.h, b.y, b.h, b.h);
            let track = Rect::new(b.x + b.h, b.y, b.w - 2 * b.h, b.h);
            Some((dec, inc, track))
        } else {
            if b.h < 3 * b.w {
                return None;
            }
            let dec = Rect::new(b.x, b.y, b.w, b.w);
            let inc = Rect::new(b.x, b.y + b.h - b.w, b.w, b.w);
            let track = Rect::new(b.x, b.y + b.w, b.w, b.h - 2 * b.w);
            Some((dec, inc, track))
        }
    }

    /// One step in the direction of the pushed end box; sign accounts for
    /// inverted ranges.
    fn increment(&mut self) {
        let towards_max =
            (self.pushed == Pushed::Increment) == (self.slider.maximum() >= self.slider.minimum());
        let delta = if towards_max {
            self.linesize as f64
        } else {
            -(self.linesize as f64)
        };
        let v = self.slider.clamp(self.slider.value() + delta);
        self.slider.handle_drag(v);
    }

    fn handle_key(&mut self, key: Key) -> bool {
        let ls = if self.slider.maximum() >= self.slider.minimum() {
            self.linesize as f64
        } else {
            -(self.linesize as f64)
        };
        let mut v = self.slider.value();
        if self.is_horizontal() {
            match key {
                Key::Left => v -= ls,
                Key::Right => v += ls,
                _ => return false,
            }
        } else {
            match key {
                Key::Up => v -= ls,
                Key::Down => v += ls,
                Key::PageUp => {
                    if self.slider.slider_size() >= 1.0 {
                        return false;
                    }
                    let ss = self.slider.slider_size();
                    v -= (self.slider.maximum() - self.slider.minimum()) * ss / (1.0 - ss);
                    v += ls;
                }
                Key::PageDown => {
                    if self.slider.slider_size() >= 1.0 {
                        return false;
                    }
                    let ss = self.slider.slider_size();
                    v += (self.slider.maximum() - self.slider.minimum()) * ss / (1.0 - ss);
                    v -= ls;
                }
                Key::Home => v = self.slider.minimum(),
                Key::End => v = self.slider.maximum(),
                _ => return false,
            }
        }
        let v = self.slider.clamp(v);
        if v != self.slider.value() {
            self.slider.set_value(v);
            self.slider.base_mut().add_damage(Damage::VALUE);
            self.slider.base().do_callback();
        }
        true
    }

    // Arrow triangles centered in the end boxes, sized from the breadth
    // (odd sizes only, wings at a third).
    fn draw_arrows(&self, ctx: &mut DrawContext<'_>) {
        let b = self.slider.base().bounds();
        let col = self.slider.base().label_color();
        if self.is_horizontal() {
            let w1 = (b.h - 1) | 1;
            let y = (b.y + w1 / 2) as f32;
            let (wx, wy) = ((w1 / 3) as f32, (w1 / 3) as f32);
            let x = (b.x + w1 / 2) as f32 + wx / 2.0;
            ctx.list.polygon(
                vec![
                    Vec2::new(x - wx, y),
                    Vec2::new(x, y - wy),
                    Vec2::new(x, y + wy),
                ],
                col,
            );
            let x = (b.x + b.w) as f32 - (x - b.x as f32) - 1.0;
            ctx.list.polygon(
                vec![
                    Vec2::new(x + wx, y),
                    Vec2::new(x, y + wy),
                    Vec2::new(x, y - wy),
                ],
                col,
            );
        } else {
            let w1 = (b.w - 1) | 1;
            let x = (b.x + w1 / 2) as f32;
            let (wx, wy) = ((w1 / 3) as f32, (w1 / 3) as f32);
            let y = (b.y + w1 / 2) as f32 + wy / 2.0;
            ctx.list.polygon(
                vec![
                    Vec2::new(x, y - wy),
                    Vec2::new(x + wx, y),
                    Vec2::new(x - wx, y),
                ],
                col,
            );
            let y = (b.y + b.h) as f32 - (y - b.y as f32) - 1.0;
            ctx.list.polygon(
                vec![
                    Vec2::new(x, y + wy),
                    Vec2::new(x - wx, y),
                    Vec2::new(x + wx, y),
                ],
                col,
            );
        }
    }
}

impl Widget for Scrollbar {
    fn base(&self) -> &WidgetBase {
        self.slider.base()
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        self.slider.base_mut()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn debug_name(&self) -> &'static str {
        "scrollbar"
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        match self.end_boxes() {
            None => {
                let bounds = self.slider.base().bounds();
                self.slider.draw_in(bounds, ctx);
            }
            Some((dec, inc, track)) => {
                self.slider.draw_in(track, ctx);
                if self.slider.base().damage().needs_full_redraw() {
                    let col = self.slider.base().selection_color();
                    let dec_box = if self.pushed == Pushed::Decrement {
                        BoxKind::Down
                    } else {
                        BoxKind::Up
                    };
                    let inc_box = if self.pushed == Pushed::Increment {
                        BoxKind::Down
                    } else {
                        BoxKind::Up
                    };
                    draw::draw_box(ctx.list, dec_box, dec, col);
                    draw::draw_box(ctx.list, inc_box, inc, col);
                    self.draw_arrows(ctx);
                }
            }
        }
        self.slider.base_mut().clear_damage();
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> bool {
        if self.pushed == Pushed::None {
            match self.end_boxes() {
                None => {
                    let bounds = self.slider.base().bounds();
                    return self.slider.handle_in(bounds, event, ctx);
                }
                Some((_, _, track)) => {
                    if self.slider.handle_in(track, event, ctx) {
                        return true;
                    }
                }
            }
        }
        match event {
            Event::Release { .. } => {
                if self.pushed != Pushed::None {
                    if let Some(token) = self.repeat.take() {
                        ctx.remove_timeout(token);
                    }
                    self.pushed = Pushed::None;
                    self.slider.base_mut().redraw();
                    tracing::trace!(id = ?self.slider.base().id(), "scrollbar release");
                }
                true
            }
            Event::Push { pos, .. } => {
                if let Some((dec, inc, _)) = self.end_boxes() {
                    let (px, py) = (pos.x as i32, pos.y as i32);
                    if dec.contains(px, py) {
                        self.pushed = Pushed::Decrement;
                    }
                    if inc.contains(px, py) {
                        self.pushed = Pushed::Increment;
                    }
                    if self.pushed != Pushed::None {
                        let owner = self.slider.base().id();
                        self.repeat = Some(ctx.add_timeout(INITIAL_REPEAT, owner));
                        self.increment();
                        self.slider.base_mut().redraw();
                        tracing::trace!(pushed = ?self.pushed, "scrollbar end box pushed");
                    }
                }
                true
            }
            Event::Drag { .. } => self.pushed != Pushed::None,
            Event::Timer { token } => {
                if self.repeat != Some(*token) || self.pushed == Pushed::None {
                    return false;
                }
                self.increment();
                let owner = self.slider.base().id();
                self.repeat = Some(ctx.add_timeout(REPEAT, owner));
                true
            }
            Event::KeyDown { key } => self.handle_key(*key),
            _ => false,
        }
    }
}
