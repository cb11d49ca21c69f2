//! File-card tab container.
//!
//! Each child widget is a card; its label is printed on the card's tab and
//! clicking the tab makes that card visible. The tab band sits above or
//! below the cards depending on where the children leave room.
//!
//! Tab layout is a two-pass compression: ideal edges come from label
//! measurement plus the slope margin; when they overflow, tabs are packed
//! against the right edge (never closer than one slope to their ideal
//! neighbor), then against the left edge with width truncation. The
//! selected tab's edges are re-derived afterwards so it always shows at its
//! full width while neighbors overlap.

use crate::base::{Group, Widget, WidgetBase, WidgetId};
use crate::damage::Damage;
use crate::draw::{Align, DrawContext};
use crate::event::{Event, EventContext};
use crate::hook::dispatch;
use crate::measure::LabelMeasure;
use crate::style::StyleRegistry;
use std::any::Any;
use veldt_core::geometry::Rect;
use veldt_core::math::Vec2;

/// Computed tab band geometry: left edges (one extra for the edge past the
/// last tab), drawn widths, and the selected index the layout was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLayout {
    pub edges: Vec<i32>,
    pub widths: Vec<i32>,
    pub selected: usize,
}

#[derive(Clone, Copy, PartialEq)]
enum TabSide {
    Left,
    Right,
    Selected,
}

pub struct Tabs {
    group: Group,
    selected: Option<usize>,
    pushed_tab: Option<usize>,
    slope: i32,
}

impl Tabs {
    pub fn new(styles: &StyleRegistry, bounds: Rect<i32>) -> Self {
        Self {
            group: Group::with_class("tabs", styles, bounds),
            selected: None,
            pushed_tab: None,
            slope: styles.class("tabs").slope,
        }
    }

    pub fn slope(&self) -> i32 {
        self.slope
    }

    pub fn add(&mut self, child: impl Widget) {
        self.group.add(child);
    }

    pub fn add_boxed(&mut self, child: Box<dyn Widget>) {
        self.group.add_boxed(child);
    }

    /// Remove a card, keeping the selected/pushed indices pointing at the
    /// same surviving children.
    pub fn remove(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        let index = self.group.index_of(id)?;
        let removed = self.group.remove(id)?;
        self.selected = adjust_index(self.selected, index);
        self.pushed_tab = adjust_index(self.pushed_tab, index);
        Some(removed)
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn group_mut(&mut self) -> &mut Group {
        &mut self.group
    }

    /// Left edges and widths for every tab. Edges are relative to the
    /// widget's left side and describe the left edge of each tab's slope.
    pub fn tab_positions(&self, measure: &dyn LabelMeasure) -> TabLayout {
        let n = self.group.len();
        let selected = self.selected.unwrap_or(0).min(n.saturating_sub(1));
        let mut p = vec![0i32; n + 1];
        let mut w = vec![0i32; n];
        for i in 0..n {
            w[i] = match self.group.child(i).and_then(|c| c.base().measure_label(measure)) {
                Some(extent) => extent.width + self.slope,
                None => 2 * self.slope,
            };
            p[i + 1] = p[i] + w[i];
        }
        let mut r = self.group.base().w() - self.slope - 1;
        if n == 0 || p[n] <= r {
            return TabLayout { edges: p, widths: w, selected };
        }

        // Too big: pack against the right edge, one slope apart at most.
        p[n] = r;
        for i in (0..n).rev() {
            let mut l = r - w[i];
            if p[i + 1] - self.slope < l {
                l = p[i + 1] - self.slope;
            }
            if p[i] <= l {
                break;
            }
            p[i] = l;
            r -= self.slope;
        }
        // Pack against the left edge, truncating widths that still overflow.
        for i in 0..n {
            if p[i] >= i as i32 * self.slope {
                break;
            }
            p[i] = i as i32 * self.slope;
            let remaining = self.group.base().w() - 1 - self.slope * (n - i) as i32 - p[i];
            if w[i] > remaining {
                w[i] = remaining;
            }
        }
        // Re-derive edges right of the selection so the selected tab keeps
        // its full width.
        for i in ((selected + 1)..=n).rev() {
            p[i] = p[i - 1] + w[i - 1];
        }
        TabLayout { edges: p, widths: w, selected }
    }

    /// Height of the tab band: positive for tabs on top, negative for tabs
    /// on the bottom, zero when the children leave no room.
    pub fn tab_height(&self) -> i32 {
        let b = self.group.base().bounds();
        let mut top = b.h;
        let mut bottom = b.y;
        for child in self.group.children() {
            let cb = child.base().bounds();
            if cb.y - b.y < top {
                top = cb.y - b.y;
            }
            if cb.bottom() > bottom {
                bottom = cb.bottom();
            }
        }
        let below = b.y + b.h - bottom;
        let dy = self.group.base().box_kind().dy();
        if below > top {
            let h = below - dy;
            if h <= 0 { 0 } else { -h - 1 }
        } else {
            let h = top - dy;
            if h <= 0 { 0 } else { h + 1 }
        }
    }

    /// Which tab is under `(ex, ey)`, accounting for the slanted edges: the
    /// boundary between two tabs shifts by up to one slope across the band
    /// height.
    pub fn which(&self, ex: i32, ey: i32, measure: &dyn LabelMeasure) -> Option<usize> {
        let b = self.group.base().bounds();
        let hh = self.tab_height();
        if hh == 0 {
            return None;
        }
        if hh < 0 {
            if ey > b.bottom() || ey < b.bottom() + hh {
                return None;
            }
        } else if ey > b.y + hh || ey < b.y {
            return None;
        }
        if ex < b.x {
            return None;
        }
        let lay = self.tab_positions(measure);
        let band_base = if hh >= 0 { b.y } else { b.bottom() };
        let d = (ey - band_base) * self.slope / hh;
        for i in 0..self.group.len() {
            let shift = if i < lay.selected { self.slope - d } else { d };
            if ex < b.x + lay.edges[i + 1] + shift {
                return Some(i);
            }
        }
        None
    }

    /// Track the tab under the pointer during a press. Damages the band
    /// only when the highlight actually moves, and never for the selected
    /// tab (pressing it changes nothing).
    pub fn push(&mut self, tab: Option<usize>) -> bool {
        if self.pushed_tab == tab {
            return false;
        }
        let leaving = self.pushed_tab.is_some() && self.pushed_tab != self.selected;
        let entering = tab.is_some() && tab != self.selected;
        if leaving || entering {
            self.group.base_mut().add_damage(Damage::EXPOSE);
        }
        self.pushed_tab = tab;
        true
    }

    /// The selected card's index, defaulting to the first visible child on
    /// first access and hiding every other card as a side effect.
    pub fn value(&mut self) -> Option<usize> {
        if self.selected.is_none() {
            let mut selected = None;
            for (i, child) in self.group.children_mut().iter_mut().enumerate() {
                if selected.is_some() {
                    dispatch::hide(child.as_mut());
                } else if child.base().visible() {
                    selected = Some(i);
                }
            }
            self.selected = selected;
        }
        self.selected
    }

    /// The selected card's widget id.
    pub fn value_id(&mut self) -> Option<WidgetId> {
        let i = self.value()?;
        self.group.child(i).map(|c| c.base().id())
    }

    /// Select a card: shows it, hides the previously selected card, redraws
    /// and notifies the callback. Selecting the current card is a no-op
    /// with no damage and no callback.
    pub fn set_value(&mut self, index: usize) -> bool {
        if index >= self.group.len() || self.selected == Some(index) {
            return false;
        }
        let old = self.selected;
        self.selected = Some(index);
        if let Some(child) = self.group.child_mut(index) {
            dispatch::show(child);
        }
        if let Some(old_index) = old {
            if let Some(child) = self.group.child_mut(old_index) {
                dispatch::hide(child);
            }
        }
        self.group.base_mut().redraw();
        self.group.base().do_callback();
        tracing::debug!(index, "tab selected");
        true
    }

    /// Select a card by widget id.
    pub fn set_value_id(&mut self, id: WidgetId) -> bool {
        match self.group.index_of(id) {
            Some(i) => self.set_value(i),
            None => false,
        }
    }

    fn draw_tab(&self, ctx: &mut DrawContext<'_>, lay: &TabLayout, i: usize, what: TabSide, hh: i32) {
        let b = self.group.base().bounds();
        let slope = self.slope;
        let mut x1 = b.x + lay.edges[i];
        let mut x2 = b.x + lay.edges[i + 1];
        let wi = lay.widths[i];
        if x2 < x1 + wi {
            // Overlapped by a neighbor: extend the covered side under it.
            if what == TabSide::Left {
                if x1 + wi < x2 + slope {
                    x2 = x1 + wi;
                } else {
                    x2 += slope;
                }
            } else if x1 + wi < x2 + slope {
                x1 = x2 - wi;
            } else {
                x1 -= slope;
            }
        }
        let Some(child) = self.group.child(i) else {
            return;
        };
        let sel = if what == TabSide::Selected { 1 } else { 0 };
        let color = child.base().color();
        let pushed = self.pushed_tab == Some(i) && what != TabSide::Selected;
        let light = color.lighter();
        let dark = color.darker();
        let (xf1, xf2) = (x1 as f32, x2 as f32);
        let sf = slope as f32;
        if hh >= 0 {
            let y0 = b.y as f32;
            let y1 = (b.y + hh + sel) as f32;
            ctx.list.polygon(
                vec![
                    Vec2::new(xf1, y1),
                    Vec2::new(xf1 + sf, y0),
                    Vec2::new(xf2, y0),
                    Vec2::new(xf2 + sf, y1),
                ],
                color,
            );
            let rise = if pushed { dark } else { light };
            let fall = if pushed { light } else { dark };
            ctx.list.polyline(
                vec![
                    Vec2::new(xf1, (b.y + hh) as f32),
                    Vec2::new(xf1 + sf, y0),
                    Vec2::new(xf2, y0),
                ],
                rise,
            );
            if what == TabSide::Selected {
                let band_y = (b.y + hh) as f32;
                if x1 > b.x {
                    ctx.list.polyline(
                        vec![Vec2::new(b.x as f32, band_y), Vec2::new(xf1, band_y)],
                        rise,
                    );
                }
                if x2 + slope < b.x + b.w - 1 {
                    ctx.list.polyline(
                        vec![Vec2::new(xf2 + sf, band_y), Vec2::new((b.x + b.w - 1) as f32, band_y)],
                        rise,
                    );
                }
            }
            ctx.list.polyline(
                vec![Vec2::new(xf2, y0), Vec2::new(xf2 + sf, (b.y + hh) as f32)],
                fall,
            );
        } else {
            let y0 = b.bottom() as f32;
            let y1 = (b.bottom() + hh - sel) as f32;
            ctx.list.polygon(
                vec![
                    Vec2::new(xf1, y1),
                    Vec2::new(xf1 + sf, y0),
                    Vec2::new(xf2, y0),
                    Vec2::new(xf2 + sf, y1),
                ],
                color,
            );
            let rise = if pushed { light } else { dark };
            let fall = if pushed { dark } else { light };
            ctx.list.polyline(
                vec![
                    Vec2::new(xf1 + sf, y0 - 1.0),
                    Vec2::new(xf2, y0 - 1.0),
                    Vec2::new(xf2 + sf, (b.bottom() + hh) as f32),
                ],
                rise,
            );
            if what == TabSide::Selected {
                let band_y = (b.bottom() + hh) as f32;
                if x1 > b.x {
                    ctx.list.polyline(
                        vec![Vec2::new(b.x as f32, band_y), Vec2::new(xf1, band_y)],
                        rise,
                    );
                }
                if x2 + slope < b.x + b.w - 1 {
                    ctx.list.polyline(
                        vec![Vec2::new(xf2 + sf, band_y), Vec2::new((b.x + b.w - 1) as f32, band_y)],
                        rise,
                    );
                }
            }
            ctx.list.polyline(
                vec![Vec2::new(xf1, (b.bottom() + hh) as f32), Vec2::new(xf1 + sf, y0 - 1.0)],
                fall,
            );
        }
        if wi > slope {
            if let Some(text) = child.base().label() {
                let lx = if what == TabSide::Left { x1 + slope } else { x2 - wi + slope };
                let ly = if hh < 0 { b.bottom() + hh - 3 } else { b.y };
                let lh = hh.abs() + 3;
                ctx.list.label(
                    text,
                    Rect::new(lx, ly, wi - slope, lh),
                    Align::Center,
                    child.base().label_color(),
                );
            }
        }
    }
}

impl Widget for Tabs {
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
        "tabs"
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        let selected = self.value();
        let damage = self.group.base().damage();
        let hh = self.tab_height();

        if let Some(sel) = selected {
            if let Some(child) = self.group.child_mut(sel) {
                let child_damaged = !child.base().damage().is_empty();
                if child.base().visible()
                    && (damage.intersects(Damage::ALL | Damage::CHILD) || child_damaged)
                {
                    dispatch::draw(child, ctx);
                }
            }
            if hh != 0 && damage.intersects(Damage::EXPOSE | Damage::ALL) {
                let lay = self.tab_positions(ctx.measure);
                let n = self.group.len();
                let b = self.group.base().bounds();
                if damage.needs_full_redraw() && n > 0 {
                    let band = Rect::new(
                        b.x,
                        if hh >= 0 { b.y } else { b.bottom() + hh },
                        lay.edges[n - 1] + lay.widths[n - 1] + self.slope,
                        hh.abs(),
                    );
                    ctx.list.push_clip(band);
                    ctx.list.quad(band, self.group.base().color());
                    ctx.list.pop_clip();
                }
                // Overlap z-order: left of the selection left-to-right,
                // right of it right-to-left, selected on top.
                for i in 0..lay.selected {
                    self.draw_tab(ctx, &lay, i, TabSide::Left, hh);
                }
                for i in ((lay.selected + 1)..n).rev() {
                    self.draw_tab(ctx, &lay, i, TabSide::Right, hh);
                }
                self.draw_tab(ctx, &lay, lay.selected, TabSide::Selected, hh);
            }
        }
        self.group.base_mut().clear_damage();
    }

    fn handle(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> bool {
        match event {
            Event::Push { pos, .. } => {
                let hh = self.tab_height();
                let b = self.group.base().bounds();
                let ey = pos.y as i32;
                let in_band = if hh >= 0 { ey <= b.y + hh } else { ey >= b.bottom() + hh };
                if !in_band {
                    self.value();
                    return self.group.handle(event, ctx);
                }
                let hit = self.which(pos.x as i32, ey, ctx.measure);
                self.push(hit);
                true
            }
            Event::Drag { pos } => {
                let hit = self.which(pos.x as i32, pos.y as i32, ctx.measure);
                self.push(hit);
                true
            }
            Event::Release { pos, .. } => {
                let hit = self.which(pos.x as i32, pos.y as i32, ctx.measure);
                self.push(None);
                if let Some(i) = hit {
                    self.set_value(i);
                }
                true
            }
            _ => {
                self.value();
                self.group.handle(event, ctx)
            }
        }
    }

    fn as_group(&self) -> Option<&Group> {
        Some(&self.group)
    }

    fn as_group_mut(&mut self) -> Option<&mut Group> {
        Some(&mut self.group)
    }
}

fn adjust_index(slot: Option<usize>, removed: usize) -> Option<usize> {
    match slot {
        Some(i) if i == removed => None,
        Some(i) if i > removed => Some(i - 1),
        other => other,
    }
}
