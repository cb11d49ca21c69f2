//! Line-oriented list widget.
//!
//! Every item operation (traversal, measurement, drawing, selection) is a
//! virtual call with a canonical implementation over the item vector, and
//! can be intercepted through a [`ListHook`]. The widget's own draw and
//! event code goes through [`dispatch`] for each item operation, so a hook
//! that overrides, say, traversal changes what gets painted without
//! touching the paint loop.

use crate::base::{Widget, WidgetBase};
use crate::damage::Damage;
use crate::draw::{self, Align, DrawContext};
use crate::event::{Event, EventContext};
use crate::hook::{HookBinding, Vcall, WidgetHook};
use crate::measure::LabelMeasure;
use crate::style::StyleRegistry;
use std::any::Any;
use std::rc::Rc;
use veldt_core::alloc::HashSet;
use veldt_core::geometry::Rect;

pub struct ListView {
    base: WidgetBase,
    items: Vec<String>,
    selected: HashSet<usize>,
    list_hooks: Option<HookBinding<dyn ListHook>>,
}

impl ListView {
    pub fn new(styles: &StyleRegistry, bounds: Rect<i32>) -> Self {
        Self {
            base: WidgetBase::new("listview", styles, bounds),
            items: Vec::new(),
            selected: HashSet::new(),
            list_hooks: None,
        }
    }

    pub fn add_item(&mut self, text: impl Into<String>) {
        self.items.push(text.into());
        self.base.add_damage(Damage::ALL);
    }

    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        self.selected.clear();
        self.base.add_damage(Damage::ALL);
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn list_hooks(&self) -> Option<&HookBinding<dyn ListHook>> {
        self.list_hooks.as_ref()
    }

    /// Install a hook for both the widget family and the item family. Both
    /// views share one in-flight mask, since they wrap the same object.
    pub fn set_list_hooks(&mut self, hook: Rc<dyn ListHook>) {
        let binding = HookBinding::new(Rc::clone(&hook));
        let widget_view: Rc<dyn WidgetHook> = hook;
        self.base
            .set_hooks(HookBinding::with_mask(widget_view, binding.mask()));
        self.list_hooks = Some(binding);
    }

    pub fn clear_list_hooks(&mut self) {
        self.list_hooks = None;
        self.base.clear_hooks();
    }

    // Canonical item operations.

    pub fn item_first(&self) -> Option<usize> {
        if self.items.is_empty() { None } else { Some(0) }
    }

    pub fn item_next(&self, item: usize) -> Option<usize> {
        if item + 1 < self.items.len() { Some(item + 1) } else { None }
    }

    pub fn item_prev(&self, item: usize) -> Option<usize> {
        if item > 0 && item <= self.items.len() { Some(item - 1) } else { None }
    }

    pub fn item_last(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    pub fn item_height(&self, _item: usize) -> i32 {
        (self.base.label_size() * 1.2).ceil() as i32 + 2
    }

    pub fn item_width(&self, item: usize, measure: &dyn LabelMeasure) -> i32 {
        match self.items.get(item) {
            Some(text) => measure.measure(text, self.base.label_size()).width + 4,
            None => 0,
        }
    }

    /// A cheap height estimate for layout passes that must not touch slow
    /// measurement; canonically the same as `item_height`.
    pub fn item_quick_height(&self, item: usize) -> i32 {
        self.item_height(item)
    }

    pub fn item_draw(&mut self, item: usize, rect: Rect<i32>, ctx: &mut DrawContext<'_>) {
        let selected = self.selected.contains(&item);
        let Some(text) = self.items.get(item) else {
            return;
        };
        if selected {
            ctx.list.quad(rect, self.base.selection_color());
        }
        let color = if selected {
            veldt_core::color::Color::WHITE
        } else {
            self.base.label_color()
        };
        ctx.list.label(text, rect.inset(2), Align::Left, color);
    }

    pub fn item_text(&self, item: usize) -> Option<String> {
        self.items.get(item).cloned()
    }

    pub fn item_swap(&mut self, a: usize, b: usize) {
        if a >= self.items.len() || b >= self.items.len() || a == b {
            return;
        }
        self.items.swap(a, b);
        let sa = self.selected.contains(&a);
        let sb = self.selected.contains(&b);
        if sa != sb {
            if sa {
                self.selected.remove(&a);
                self.selected.insert(b);
            } else {
                self.selected.remove(&b);
                self.selected.insert(a);
            }
        }
        self.base.add_damage(Damage::ALL);
    }

    pub fn item_at(&self, index: usize) -> Option<usize> {
        if index < self.items.len() { Some(index) } else { None }
    }

    pub fn full_width(&mut self, measure: &dyn LabelMeasure) -> i32 {
        let mut width = 0;
        let mut it = dispatch::item_first(self);
        while let Some(i) = it {
            width = width.max(dispatch::item_width(self, i, measure));
            it = dispatch::item_next(self, i);
        }
        width
    }

    pub fn full_height(&mut self) -> i32 {
        let mut height = 0;
        let mut it = dispatch::item_first(self);
        while let Some(i) = it {
            height += dispatch::item_height(self, i);
            it = dispatch::item_next(self, i);
        }
        height
    }

    /// Height step used to convert a pixel offset into an item index.
    pub fn incr_height(&self) -> i32 {
        self.item_height(0)
    }

    pub fn item_select(&mut self, item: usize, selected: bool) {
        if item >= self.items.len() {
            return;
        }
        let changed = if selected {
            self.selected.insert(item)
        } else {
            self.selected.remove(&item)
        };
        if changed {
            self.base.add_damage(Damage::EXPOSE);
        }
    }

    pub fn item_selected(&self, item: usize) -> bool {
        self.selected.contains(&item)
    }

    fn inner(&self) -> Rect<i32> {
        self.base.bounds().inset(self.base.box_kind().dy())
    }
}

impl Widget for ListView {
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
        "listview"
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        draw::draw_box(ctx.list, self.base.box_kind(), self.base.bounds(), self.base.color());
        let inner = self.inner();
        ctx.list.push_clip(inner);
        let mut y = inner.y;
        let mut it = dispatch::item_first(self);
        while let Some(i) = it {
            if y >= inner.bottom() {
                break;
            }
            let h = dispatch::item_height(self, i);
            dispatch::item_draw(self, i, Rect::new(inner.x, y, inner.w, h), ctx);
            y += h;
            it = dispatch::item_next(self, i);
        }
        ctx.list.pop_clip();
        self.base.clear_damage();
    }

    fn handle(&mut self, event: &Event, _ctx: &mut EventContext<'_>) -> bool {
        match event {
            Event::Push { pos, .. } => {
                let inner = self.inner();
                if !inner.contains(pos.x as i32, pos.y as i32) {
                    return false;
                }
                let mut y = inner.y;
                let mut it = dispatch::item_first(self);
                while let Some(i) = it {
                    let h = dispatch::item_height(self, i);
                    if (pos.y as i32) < y + h {
                        let previous: Vec<usize> = self.selected.iter().copied().collect();
                        for j in previous {
                            dispatch::item_select(self, j, false);
                        }
                        dispatch::item_select(self, i, true);
                        self.base.do_callback();
                        return true;
                    }
                    y += h;
                    it = dispatch::item_next(self, i);
                }
                true
            }
            _ => false,
        }
    }
}

/// Override hooks for the list-item operation family. Defaults run the
/// canonical implementation; inside an override, call the matching
/// [`dispatch`] function to chain to the original.
pub trait ListHook: WidgetHook {
    fn item_first(&self, list: &mut ListView) -> Option<usize> {
        list.item_first()
    }

    fn item_next(&self, list: &mut ListView, item: usize) -> Option<usize> {
        list.item_next(item)
    }

    fn item_prev(&self, list: &mut ListView, item: usize) -> Option<usize> {
        list.item_prev(item)
    }

    fn item_last(&self, list: &mut ListView) -> Option<usize> {
        list.item_last()
    }

    fn item_height(&self, list: &mut ListView, item: usize) -> i32 {
        list.item_height(item)
    }

    fn item_width(&self, list: &mut ListView, item: usize, measure: &dyn LabelMeasure) -> i32 {
        list.item_width(item, measure)
    }

    fn item_quick_height(&self, list: &mut ListView, item: usize) -> i32 {
        list.item_quick_height(item)
    }

    fn item_draw(&self, list: &mut ListView, item: usize, rect: Rect<i32>, ctx: &mut DrawContext<'_>) {
        list.item_draw(item, rect, ctx);
    }

    fn item_text(&self, list: &mut ListView, item: usize) -> Option<String> {
        list.item_text(item)
    }

    fn item_swap(&self, list: &mut ListView, a: usize, b: usize) {
        list.item_swap(a, b);
    }

    fn item_at(&self, list: &mut ListView, index: usize) -> Option<usize> {
        list.item_at(index)
    }

    fn full_width(&self, list: &mut ListView, measure: &dyn LabelMeasure) -> i32 {
        list.full_width(measure)
    }

    fn full_height(&self, list: &mut ListView) -> i32 {
        list.full_height()
    }

    fn incr_height(&self, list: &mut ListView) -> i32 {
        list.incr_height()
    }

    fn item_select(&self, list: &mut ListView, item: usize, selected: bool) {
        list.item_select(item, selected);
    }

    fn item_selected(&self, list: &mut ListView, item: usize) -> bool {
        list.item_selected(item)
    }
}

/// Hook-aware entry points for the item operation family.
pub mod dispatch {
    use super::*;

    macro_rules! list_vcall {
        ($name:ident, $bit:ident, ($($arg:ident: $ty:ty),*), $ret:ty) => {
            pub fn $name(list: &mut ListView $(, $arg: $ty)*) -> $ret {
                let Some(binding) = list.list_hooks().cloned() else {
                    return list.$name($($arg),*);
                };
                if binding.in_flight(Vcall::$bit) {
                    return list.$name($($arg),*);
                }
                let hook = binding.hook();
                let _guard = binding.acquire(Vcall::$bit);
                hook.$name(list $(, $arg)*)
            }
        };
    }

    list_vcall!(item_first, ITEM_FIRST, (), Option<usize>);
    list_vcall!(item_next, ITEM_NEXT, (item: usize), Option<usize>);
    list_vcall!(item_prev, ITEM_PREV, (item: usize), Option<usize>);
    list_vcall!(item_last, ITEM_LAST, (), Option<usize>);
    list_vcall!(item_height, ITEM_HEIGHT, (item: usize), i32);
    list_vcall!(item_width, ITEM_WIDTH, (item: usize, measure: &dyn LabelMeasure), i32);
    list_vcall!(item_quick_height, ITEM_QUICK_HEIGHT, (item: usize), i32);
    list_vcall!(item_draw, ITEM_DRAW, (item: usize, rect: Rect<i32>, ctx: &mut DrawContext<'_>), ());
    list_vcall!(item_text, ITEM_TEXT, (item: usize), Option<String>);
    list_vcall!(item_swap, ITEM_SWAP, (a: usize, b: usize), ());
    list_vcall!(item_at, ITEM_AT, (index: usize), Option<usize>);
    list_vcall!(full_width, FULL_WIDTH, (measure: &dyn LabelMeasure), i32);
    list_vcall!(full_height, FULL_HEIGHT, (), i32);
    list_vcall!(incr_height, INCR_HEIGHT, (), i32);
    list_vcall!(item_select, ITEM_SELECT, (item: usize, selected: bool), ());
    list_vcall!(item_selected, ITEM_SELECTED, (item: usize), bool);
}
