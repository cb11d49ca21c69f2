//! Retained draw list.
//!
//! Widgets paint by pushing commands onto a [`DrawList`]; a renderer backend
//! (out of scope here) encodes the list for the screen. The list is the
//! whole drawing boundary: tests assert on emitted commands instead of
//! pixels, and z-order follows emission order.

use crate::measure::LabelMeasure;
use crate::style::StyleRegistry;
use veldt_core::color::Color;
use veldt_core::geometry::Rect;
use veldt_core::math::Vec2;

/// Horizontal alignment for label commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Identifier of an image participating in draw commands. Allocated by the
/// image itself (see [`crate::image`]); the renderer resolves it to a
/// texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u64);

/// High-level draw command for a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A filled axis-aligned rectangle.
    Quad { rect: Rect<i32>, color: Color },
    /// A filled polygon.
    Polygon { points: Vec<Vec2>, color: Color },
    /// An open polyline (bevel edges, tab outlines).
    Polyline { points: Vec<Vec2>, color: Color },
    /// A text label laid out inside `rect`.
    Label {
        text: String,
        rect: Rect<i32>,
        align: Align,
        color: Color,
    },
    /// One image tile.
    Image { id: ImageId, rect: Rect<i32> },
    /// Push a clip rectangle; subsequent commands are clipped to it.
    PushClip(Rect<i32>),
    /// Pop the innermost clip rectangle.
    PopClip,
}

/// An append-only list of draw commands for one frame.
#[derive(Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    clip_depth: usize,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quad(&mut self, rect: Rect<i32>, color: Color) {
        if !rect.is_empty() {
            self.commands.push(DrawCommand::Quad { rect, color });
        }
    }

    pub fn polygon(&mut self, points: Vec<Vec2>, color: Color) {
        if points.len() >= 3 {
            self.commands.push(DrawCommand::Polygon { points, color });
        }
    }

    pub fn polyline(&mut self, points: Vec<Vec2>, color: Color) {
        if points.len() >= 2 {
            self.commands.push(DrawCommand::Polyline { points, color });
        }
    }

    pub fn label(&mut self, text: &str, rect: Rect<i32>, align: Align, color: Color) {
        if !text.is_empty() {
            self.commands.push(DrawCommand::Label {
                text: text.to_string(),
                rect,
                align,
                color,
            });
        }
    }

    pub fn image(&mut self, id: ImageId, rect: Rect<i32>) {
        if !rect.is_empty() {
            self.commands.push(DrawCommand::Image { id, rect });
        }
    }

    pub fn push_clip(&mut self, rect: Rect<i32>) {
        self.clip_depth += 1;
        self.commands.push(DrawCommand::PushClip(rect));
    }

    pub fn pop_clip(&mut self) {
        debug_assert!(self.clip_depth > 0, "pop_clip without matching push_clip");
        self.clip_depth = self.clip_depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopClip);
    }

    /// Current clip nesting depth; zero once every push has been popped.
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_depth = 0;
    }
}

/// The visual frame drawn behind a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxKind {
    /// No decoration, fill only.
    Flat,
    /// Raised bevel.
    Up,
    /// Sunken bevel, used for pushed buttons and end boxes.
    Down,
    /// One-pixel raised bevel, the tab strip default.
    ThinUp,
    /// Outline only, no fill.
    Frame,
    /// Rounded-corner fill with outline.
    Rounded,
}

impl BoxKind {
    /// Vertical inset the frame consumes on each edge.
    pub fn dy(&self) -> i32 {
        match self {
            BoxKind::Flat => 0,
            BoxKind::Up | BoxKind::Down => 2,
            BoxKind::ThinUp | BoxKind::Frame | BoxKind::Rounded => 1,
        }
    }
}

// Rounded corners walk this offset table out of the corner; the curve radius
// is 2/5 of the short side, capped at 15 px.
const CORNER_OFFSET: [f32; 5] = [0.0, 0.07612, 0.29289, 0.61732, 1.0];
const CORNER_RADIUS_MAX: f32 = 15.0;

fn rounded_points(rect: Rect<i32>) -> Vec<Vec2> {
    let (x, y) = (rect.x as f32, rect.y as f32);
    let (w, h) = (rect.w as f32, rect.h as f32);
    let rs = (w * 2.0 / 5.0).min(h * 2.0 / 5.0).min(CORNER_RADIUS_MAX);

    let n = CORNER_OFFSET.len();
    let mut pts = Vec::with_capacity(4 * n);
    for i in 0..n {
        pts.push(Vec2::new(x + CORNER_OFFSET[n - i - 1] * rs, y + CORNER_OFFSET[i] * rs));
    }
    for i in 0..n {
        pts.push(Vec2::new(
            x + CORNER_OFFSET[i] * rs,
            y + h - 1.0 - CORNER_OFFSET[n - i - 1] * rs,
        ));
    }
    for i in 0..n {
        pts.push(Vec2::new(
            x + w - 1.0 - CORNER_OFFSET[n - i - 1] * rs,
            y + h - 1.0 - CORNER_OFFSET[i] * rs,
        ));
    }
    for i in 0..n {
        pts.push(Vec2::new(
            x + w - 1.0 - CORNER_OFFSET[i] * rs,
            y + CORNER_OFFSET[n - i - 1] * rs,
        ));
    }
    pts
}

fn bevel(list: &mut DrawList, rect: Rect<i32>, top_left: Color, bottom_right: Color) {
    let (x0, y0) = (rect.x as f32, rect.y as f32);
    let (x1, y1) = ((rect.right() - 1) as f32, (rect.bottom() - 1) as f32);
    list.polyline(
        vec![Vec2::new(x0, y1), Vec2::new(x0, y0), Vec2::new(x1, y0)],
        top_left,
    );
    list.polyline(
        vec![Vec2::new(x1, y0), Vec2::new(x1, y1), Vec2::new(x0, y1)],
        bottom_right,
    );
}

/// Draw a widget frame of the given kind into `rect`.
pub fn draw_box(list: &mut DrawList, kind: BoxKind, rect: Rect<i32>, color: Color) {
    if rect.is_empty() {
        return;
    }
    match kind {
        BoxKind::Flat => list.quad(rect, color),
        BoxKind::Up => {
            list.quad(rect.inset(2), color);
            bevel(list, rect, color.lighter(), color.darker());
            bevel(list, rect.inset(1), color.lighter(), color.darker());
        }
        BoxKind::Down => {
            list.quad(rect.inset(2), color);
            bevel(list, rect, color.darker(), color.lighter());
            bevel(list, rect.inset(1), color.darker(), color.lighter());
        }
        BoxKind::ThinUp => {
            list.quad(rect.inset(1), color);
            bevel(list, rect, color.lighter(), color.darker());
        }
        BoxKind::Frame => bevel(list, rect, color.darker(), color.darker()),
        BoxKind::Rounded => {
            list.polygon(rounded_points(rect), color);
            list.polyline(rounded_points(rect), color.darker());
        }
    }
}

/// Everything a widget needs while painting.
pub struct DrawContext<'a> {
    pub list: &'a mut DrawList,
    pub styles: &'a StyleRegistry,
    pub measure: &'a dyn LabelMeasure,
}
