//! Linear valuator with a draggable thumb.
//!
//! The slider is both a standalone widget and the track engine inside
//! [`crate::widgets::scrollbar::Scrollbar`], which is why the drag state
//! machine operates on an arbitrary sub-rectangle (`handle_in`) rather than
//! the widget bounds: a scrollbar delegates only its inner track region.

use crate::base::{Widget, WidgetBase};
use crate::damage::Damage;
use crate::draw::{self, BoxKind, DrawContext};
use crate::event::{Event, EventContext};
use crate::style::StyleRegistry;
use std::any::Any;
use veldt_core::geometry::Rect;

/// Minimum thumb length along the track, in pixels.
const MIN_THUMB: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A widget controlling a floating point value over a range.
///
/// The range may be inverted (`minimum > maximum`); all clamping and
/// interpolation honors that.
pub struct Slider {
    base: WidgetBase,
    orientation: Orientation,
    value: f64,
    minimum: f64,
    maximum: f64,
    /// Thumb length as a fraction of the track, 0..=1.
    slider_size: f64,
    dragging: bool,
    /// Pointer offset into the thumb when the drag started.
    drag_anchor: f64,
}

impl Slider {
    pub fn new(styles: &StyleRegistry, bounds: Rect<i32>, orientation: Orientation) -> Self {
        Self::with_class("slider", styles, bounds, orientation)
    }

    pub(crate) fn with_class(
        class: &'static str,
        styles: &StyleRegistry,
        bounds: Rect<i32>,
        orientation: Orientation,
    ) -> Self {
        Self {
            base: WidgetBase::new(class, styles, bounds),
            orientation,
            value: 0.0,
            minimum: 0.0,
            maximum: 1.0,
            slider_size: 0.0,
            dragging: false,
            drag_anchor: 0.0,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn set_range(&mut self, minimum: f64, maximum: f64) {
        self.minimum = minimum;
        self.maximum = maximum;
    }

    pub fn slider_size(&self) -> f64 {
        self.slider_size
    }

    pub fn set_slider_size(&mut self, fraction: f64) {
        self.slider_size = fraction.clamp(0.0, 1.0);
    }

    /// Force `v` into the configured range, whichever way around it is.
    pub fn clamp(&self, v: f64) -> f64 {
        let (lo, hi) = if self.minimum <= self.maximum {
            (self.minimum, self.maximum)
        } else {
            (self.maximum, self.minimum)
        };
        v.clamp(lo, hi)
    }

    /// Clamp and store a new value. Returns true (and damages the value
    /// region) only when the stored value actually changed.
    pub fn set_value(&mut self, v: f64) -> bool {
        let v = self.clamp(v);
        if v == self.value {
            return false;
        }
        self.value = v;
        self.base.add_damage(Damage::VALUE | Damage::EXPOSE);
        true
    }

    /// Store a drag-produced value and notify the callback on change.
    pub fn handle_drag(&mut self, v: f64) {
        if self.set_value(v) {
            self.base.do_callback();
        }
    }

    fn axis(&self, track: Rect<i32>) -> (f64, f64) {
        match self.orientation {
            Orientation::Horizontal => (track.x as f64, track.w as f64),
            Orientation::Vertical => (track.y as f64, track.h as f64),
        }
    }

    /// Thumb position and length along the track axis.
    fn thumb_span(&self, track: Rect<i32>) -> (f64, f64) {
        let (start, length) = self.axis(track);
        let thumb = (self.slider_size * length).max(MIN_THUMB).min(length);
        let travel = length - thumb;
        let range = self.maximum - self.minimum;
        let frac = if range == 0.0 {
            0.0
        } else {
            ((self.value - self.minimum) / range).clamp(0.0, 1.0)
        };
        (start + frac * travel, thumb)
    }

    /// The thumb rectangle within `track`.
    pub fn thumb_rect(&self, track: Rect<i32>) -> Rect<i32> {
        let (pos, len) = self.thumb_span(track);
        match self.orientation {
            Orientation::Horizontal => Rect::new(pos as i32, track.y, len.ceil() as i32, track.h),
            Orientation::Vertical => Rect::new(track.x, pos as i32, track.w, len.ceil() as i32),
        }
    }

    fn drag_to(&mut self, along: f64, track: Rect<i32>) {
        let (start, length) = self.axis(track);
        let (_, thumb) = self.thumb_span(track);
        let travel = length - thumb;
        if travel <= 0.0 {
            return;
        }
        let frac = ((along - self.drag_anchor - start) / travel).clamp(0.0, 1.0);
        let v = self.minimum + frac * (self.maximum - self.minimum);
        self.handle_drag(v);
    }

    /// Run the drag state machine against an arbitrary track rectangle.
    pub fn handle_in(&mut self, track: Rect<i32>, event: &Event, _ctx: &mut EventContext<'_>) -> bool {
        match event {
            Event::Push { pos, .. } => {
                if !track.contains(pos.x as i32, pos.y as i32) {
                    return false;
                }
                let along = match self.orientation {
                    Orientation::Horizontal => pos.x as f64,
                    Orientation::Vertical => pos.y as f64,
                };
                let (thumb_pos, thumb_len) = self.thumb_span(track);
                if along >= thumb_pos && along < thumb_pos + thumb_len {
                    self.drag_anchor = along - thumb_pos;
                } else {
                    // Jump the thumb to the pointer, then drag from its middle.
                    self.drag_anchor = thumb_len / 2.0;
                    self.drag_to(along, track);
                }
                self.dragging = true;
                true
            }
            Event::Drag { pos } => {
                if !self.dragging {
                    return false;
                }
                let along = match self.orientation {
                    Orientation::Horizontal => pos.x as f64,
                    Orientation::Vertical => pos.y as f64,
                };
                self.drag_to(along, track);
                true
            }
            Event::Release { .. } => {
                if !self.dragging {
                    return false;
                }
                self.dragging = false;
                self.base.add_damage(Damage::VALUE);
                true
            }
            _ => false,
        }
    }

    /// Paint the trough and thumb into `track`.
    pub fn draw_in(&mut self, track: Rect<i32>, ctx: &mut DrawContext<'_>) {
        draw::draw_box(ctx.list, self.base.box_kind(), track, self.base.color());
        let thumb = self.thumb_rect(track);
        draw::draw_box(ctx.list, BoxKind::Up, thumb, self.base.selection_color());
    }
}

impl Widget for Slider {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn debug_name(&self) -> &'static str {
        "slider"
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        let bounds = self.base.bounds();
        self.draw_in(bounds, ctx);
        self.base.clear_damage();
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> bool {
        let bounds = self.base.bounds();
        self.handle_in(bounds, event, ctx)
    }
}
