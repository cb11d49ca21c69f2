//! Widget base state and the `Widget` trait.
//!
//! Every widget embeds a [`WidgetBase`] carrying identity, bounds, label,
//! visibility, damage and the optional override-hook binding. Containers own
//! their children as boxed trait objects; references *into* a child list
//! (selected tab, pushed tab) are stored as indices or [`WidgetId`] handles,
//! never as raw references.

use crate::damage::Damage;
use crate::draw::{BoxKind, DrawContext};
use crate::event::{Event, EventContext};
use crate::hook::{self, HookBinding, WidgetHook};
use crate::measure::LabelMeasure;
use crate::style::StyleRegistry;
use std::any::Any;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use veldt_core::color::Color;
use veldt_core::geometry::{Rect, Size};
use veldt_core::math::Vec2;

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier for a widget instance.
///
/// Ids stay valid for the widget's lifetime and are the only way state
/// outside the tree (event grabs, timers) refers to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(pub u64);

impl WidgetId {
    fn next() -> Self {
        WidgetId(NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Callback invoked when a widget's value changes or it is activated.
pub type Callback = Rc<dyn Fn(WidgetId)>;

/// State shared by every widget kind.
pub struct WidgetBase {
    id: WidgetId,
    class: &'static str,
    bounds: Rect<i32>,
    label: Option<String>,
    /// Measured extent override, e.g. when an image is attached as label.
    label_extent: Option<Size<i32>>,
    box_kind: BoxKind,
    color: Color,
    selection_color: Color,
    label_color: Color,
    label_size: f32,
    visible: bool,
    damage: Damage,
    callback: Option<Callback>,
    hooks: Option<HookBinding<dyn WidgetHook>>,
}

impl WidgetBase {
    /// A base for class `class`, styled from the registry, at `bounds`.
    pub fn new(class: &'static str, styles: &StyleRegistry, bounds: Rect<i32>) -> Self {
        let style = styles.class(class);
        Self {
            id: WidgetId::next(),
            class,
            bounds,
            label: None,
            label_extent: None,
            box_kind: style.box_kind,
            color: style.color,
            selection_color: style.selection_color,
            label_color: style.label_color,
            label_size: style.label_size,
            visible: true,
            damage: Damage::ALL,
            callback: None,
            hooks: None,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    pub fn bounds(&self) -> Rect<i32> {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect<i32>) {
        self.bounds = bounds;
    }

    pub fn x(&self) -> i32 {
        self.bounds.x
    }

    pub fn y(&self) -> i32 {
        self.bounds.y
    }

    pub fn w(&self) -> i32 {
        self.bounds.w
    }

    pub fn h(&self) -> i32 {
        self.bounds.h
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
        self.add_damage(Damage::ALL);
    }

    pub fn clear_label(&mut self) {
        self.label = None;
    }

    pub fn label_extent(&self) -> Option<Size<i32>> {
        self.label_extent
    }

    /// Force the measured label extent, overriding text measurement. Used
    /// when an image is attached as the widget's label.
    pub fn set_label_extent(&mut self, extent: Option<Size<i32>>) {
        self.label_extent = extent;
    }

    /// Pixel extent of the label: the forced extent if one is set, otherwise
    /// the measured text, otherwise `None` for unlabeled widgets.
    pub fn measure_label(&self, measure: &dyn LabelMeasure) -> Option<Size<i32>> {
        if let Some(extent) = self.label_extent {
            return Some(extent);
        }
        self.label
            .as_deref()
            .map(|text| measure.measure(text, self.label_size))
    }

    pub fn box_kind(&self) -> BoxKind {
        self.box_kind
    }

    pub fn set_box_kind(&mut self, kind: BoxKind) {
        self.box_kind = kind;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.add_damage(Damage::ALL);
    }

    pub fn selection_color(&self) -> Color {
        self.selection_color
    }

    pub fn label_color(&self) -> Color {
        self.label_color
    }

    pub fn label_size(&self) -> f32 {
        self.label_size
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn damage(&self) -> Damage {
        self.damage
    }

    pub fn add_damage(&mut self, damage: Damage) {
        self.damage |= damage;
    }

    /// Mark the whole widget for repaint.
    pub fn redraw(&mut self) {
        self.damage |= Damage::ALL;
    }

    pub fn clear_damage(&mut self) {
        self.damage = Damage::NONE;
    }

    pub fn set_callback(&mut self, callback: Callback) {
        self.callback = Some(callback);
    }

    /// Invoke the widget's callback, if any.
    pub fn do_callback(&self) {
        if let Some(cb) = &self.callback {
            cb(self.id);
        }
    }

    pub fn hooks(&self) -> Option<&HookBinding<dyn WidgetHook>> {
        self.hooks.as_ref()
    }

    /// Attach an override hook. The binding's in-flight mask is shared with
    /// every clone, so re-entrant calls through any path see the same state.
    pub fn set_hooks(&mut self, hooks: HookBinding<dyn WidgetHook>) {
        self.hooks = Some(hooks);
    }

    pub fn clear_hooks(&mut self) {
        self.hooks = None;
    }
}

/// Base trait for all widgets.
///
/// The methods `draw`, `handle`, `resize`, `show` and `hide` are the
/// *canonical* implementations of the widget's virtual operations. Outside
/// callers and containers must go through [`crate::hook::dispatch`], which
/// routes each call through the widget's override hook (when present) with
/// the re-entrancy guard; calling the trait method directly bypasses the
/// override on purpose and is what a hook does to run the original.
pub trait Widget: Any {
    fn base(&self) -> &WidgetBase;
    fn base_mut(&mut self) -> &mut WidgetBase;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn debug_name(&self) -> &'static str {
        "widget"
    }

    /// Paint the widget into the draw list.
    fn draw(&mut self, ctx: &mut DrawContext<'_>);

    /// React to an input event; returns true when the event was consumed.
    fn handle(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> bool {
        let _ = (event, ctx);
        false
    }

    /// Move/resize the widget.
    fn resize(&mut self, bounds: Rect<i32>) {
        self.base_mut().set_bounds(bounds);
        self.base_mut().redraw();
    }

    fn show(&mut self) {
        if !self.base().visible() {
            self.base_mut().set_visible(true);
            self.base_mut().redraw();
        }
    }

    fn hide(&mut self) {
        if self.base().visible() {
            self.base_mut().set_visible(false);
            self.base_mut().redraw();
        }
    }

    /// Paint overlay content above the whole tree. Windows only; the default
    /// does nothing.
    fn draw_overlay(&mut self, ctx: &mut DrawContext<'_>) {
        let _ = ctx;
    }

    /// Query if this widget is a container.
    fn as_group(&self) -> Option<&Group> {
        None
    }

    /// Query if this widget is a container (mutable).
    fn as_group_mut(&mut self) -> Option<&mut Group> {
        None
    }
}

/// A container widget owning an ordered list of children.
pub struct Group {
    base: WidgetBase,
    children: Vec<Box<dyn Widget>>,
}

impl Group {
    pub fn new(styles: &StyleRegistry, bounds: Rect<i32>) -> Self {
        Self::with_class("group", styles, bounds)
    }

    /// A group styled as a different widget class, for containers that embed
    /// one (tabs, windows).
    pub fn with_class(class: &'static str, styles: &StyleRegistry, bounds: Rect<i32>) -> Self {
        Self {
            base: WidgetBase::new(class, styles, bounds),
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, child: impl Widget) {
        self.add_boxed(Box::new(child));
    }

    pub fn add_boxed(&mut self, child: Box<dyn Widget>) {
        self.children.push(child);
        self.base.add_damage(Damage::ALL);
    }

    pub fn insert(&mut self, index: usize, child: Box<dyn Widget>) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
        self.base.add_damage(Damage::ALL);
    }

    /// Remove a child by id, returning ownership of it.
    pub fn remove(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        let i = self.children.iter().position(|c| c.base().id() == id)?;
        self.base.add_damage(Damage::ALL);
        Some(self.children.remove(i))
    }

    pub fn children(&self) -> &[Box<dyn Widget>] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Box<dyn Widget>] {
        &mut self.children
    }

    pub fn child(&self, index: usize) -> Option<&dyn Widget> {
        self.children.get(index).map(|c| c.as_ref())
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut (dyn Widget + 'static)> {
        self.children.get_mut(index).map(|c| c.as_mut())
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the child with id `id`, if it is a direct child.
    pub fn index_of(&self, id: WidgetId) -> Option<usize> {
        self.children.iter().position(|c| c.base().id() == id)
    }
}

impl Widget for Group {
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
        "group"
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        crate::draw::draw_box(ctx.list, self.base.box_kind(), self.base.bounds(), self.base.color());
        for child in self.children.iter_mut() {
            if child.base().visible() {
                hook::dispatch::draw(child.as_mut(), ctx);
            }
        }
        self.base.clear_damage();
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> bool {
        match event {
            Event::Push { pos, .. } | Event::Move { pos } => {
                // Topmost child first: later children draw above earlier ones.
                for child in self.children.iter_mut().rev() {
                    let b = child.base();
                    if b.visible() && b.bounds().contains(pos.x as i32, pos.y as i32) {
                        if hook::dispatch::handle(child.as_mut(), event, ctx) {
                            return true;
                        }
                    }
                }
                false
            }
            Event::KeyDown { .. } => {
                for child in self.children.iter_mut() {
                    if child.base().visible() {
                        if hook::dispatch::handle(child.as_mut(), event, ctx) {
                            return true;
                        }
                    }
                }
                false
            }
            _ => false,
        }
    }

    fn resize(&mut self, bounds: Rect<i32>) {
        let old = self.base.bounds();
        self.base.set_bounds(bounds);
        let (dx, dy) = (bounds.x - old.x, bounds.y - old.y);
        if dx != 0 || dy != 0 {
            for child in self.children.iter_mut() {
                let cb = child.base().bounds().offset(dx, dy);
                hook::dispatch::resize(child.as_mut(), cb);
            }
        }
        self.base.redraw();
    }

    fn as_group(&self) -> Option<&Group> {
        Some(self)
    }

    fn as_group_mut(&mut self) -> Option<&mut Group> {
        Some(self)
    }
}

/// Depth-first search for the widget with id `id`.
pub fn find_widget_mut<'a>(root: &'a mut dyn Widget, id: WidgetId) -> Option<&'a mut dyn Widget> {
    if root.base().id() == id {
        return Some(root);
    }
    let group = root.as_group_mut()?;
    for child in group.children_mut().iter_mut() {
        if let Some(found) = find_widget_mut(child.as_mut(), id) {
            return Some(found);
        }
    }
    None
}

/// Depth-first search for the widget with id `id` (immutable).
pub fn find_widget<'a>(root: &'a dyn Widget, id: WidgetId) -> Option<&'a dyn Widget> {
    if root.base().id() == id {
        return Some(root);
    }
    let group = root.as_group()?;
    for child in group.children().iter() {
        if let Some(found) = find_widget(child.as_ref(), id) {
            return Some(found);
        }
    }
    None
}

/// The deepest visible widget containing `pos`, front to back.
pub fn widget_at(root: &dyn Widget, pos: Vec2) -> Option<WidgetId> {
    let base = root.base();
    if !base.visible() || !base.bounds().contains(pos.x as i32, pos.y as i32) {
        return None;
    }
    if let Some(group) = root.as_group() {
        for child in group.children().iter().rev() {
            if let Some(id) = widget_at(child.as_ref(), pos) {
                return Some(id);
            }
        }
    }
    Some(base.id())
}

/// True if any widget in the tree carries damage.
pub fn needs_redraw(root: &dyn Widget) -> bool {
    if !root.base().damage().is_empty() {
        return true;
    }
    if let Some(group) = root.as_group() {
        return group.children().iter().any(|c| needs_redraw(c.as_ref()));
    }
    false
}
