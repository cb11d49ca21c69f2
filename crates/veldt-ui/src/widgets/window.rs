//! Top-level window widget.
//!
//! A window is a group rooted at the origin. It is the only widget kind
//! with the `draw_overlay` virtual: after the whole tree has been painted,
//! the frame driver dispatches `draw_overlay` so subclass hooks can paint
//! rubber-band style decorations above everything else.

use crate::base::{Group, Widget, WidgetBase};
use crate::draw::DrawContext;
use crate::event::{Event, EventContext};
use crate::style::StyleRegistry;
use std::any::Any;
use veldt_core::geometry::Rect;

pub struct Window {
    group: Group,
}

impl Window {
    pub fn new(styles: &StyleRegistry, width: i32, height: i32, label: impl Into<String>) -> Self {
        let mut group = Group::with_class("window", styles, Rect::new(0, 0, width, height));
        group.base_mut().set_label(label);
        Self { group }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn group_mut(&mut self) -> &mut Group {
        &mut self.group
    }

    pub fn add(&mut self, child: impl Widget) {
        self.group.add(child);
    }

    pub fn add_boxed(&mut self, child: Box<dyn Widget>) {
        self.group.add_boxed(child);
    }
}

impl Widget for Window {
    fn base(&self) -> &WidgetBase {
        self.group.base()
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        self.group.base_mut()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn debug_name(&self) -> &'static str {
        "window"
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        self.group.draw(ctx);
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> bool {
        self.group.handle(event, ctx)
    }

    fn as_group(&self) -> Option<&Group> {
        Some(&self.group)
    }

    fn as_group_mut(&mut self) -> Option<&mut Group> {
        Some(&mut self.group)
    }
}
