//! The front object tying a widget tree to events, timers and drawing.
//!
//! Everything runs on one thread: the host loop feeds translated input
//! events into [`Ui::handle`], pumps [`Ui::run_timers`] with the current
//! instant, and encodes [`Ui::draw`]'s command list when anything is
//! damaged. Timers are the only asynchronous trigger and fire here, on the
//! same thread, as [`crate::event::Event::Timer`] deliveries.

use crate::base::{self, Widget, WidgetId};
use crate::draw::{DrawContext, DrawList};
use crate::event::{Event, EventContext, EventRouter};
use crate::hook::dispatch;
use crate::measure::{FixedMetrics, LabelMeasure};
use crate::style::StyleRegistry;
use crate::widgets::Window;
use std::time::Instant;
use veldt_core::timer::TimerQueue;

pub struct Ui {
    root: Window,
    router: EventRouter,
    timers: TimerQueue<WidgetId>,
    styles: StyleRegistry,
    measure: Box<dyn LabelMeasure>,
    list: DrawList,
}

impl Ui {
    pub fn new(styles: StyleRegistry, root: Window) -> Self {
        Self {
            root,
            router: EventRouter::new(),
            timers: TimerQueue::new(),
            styles,
            measure: Box::new(FixedMetrics),
            list: DrawList::new(),
        }
    }

    /// Replace the label measurer (e.g. with a real font backend).
    pub fn set_measure(&mut self, measure: Box<dyn LabelMeasure>) {
        self.measure = measure;
    }

    pub fn root(&self) -> &Window {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Window {
        &mut self.root
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub fn timers(&self) -> &TimerQueue<WidgetId> {
        &self.timers
    }

    pub fn find_mut(&mut self, id: WidgetId) -> Option<&mut dyn Widget> {
        base::find_widget_mut(&mut self.root, id)
    }

    /// Deliver one input event. `now` anchors any timers the handling
    /// widgets schedule.
    pub fn handle(&mut self, event: Event, now: Instant) -> bool {
        let mut ctx = EventContext::new(&mut self.timers, now, &self.styles, self.measure.as_ref());
        self.router.route(&mut self.root, &event, &mut ctx)
    }

    /// Fire every timer due at `now`, delivering [`Event::Timer`] to the
    /// widget that scheduled it. Returns true if any timer was handled.
    pub fn run_timers(&mut self, now: Instant) -> bool {
        let due = self.timers.fire_due(now);
        let mut any = false;
        for (token, owner) in due {
            let mut ctx =
                EventContext::new(&mut self.timers, now, &self.styles, self.measure.as_ref());
            if let Some(widget) = base::find_widget_mut(&mut self.root, owner) {
                any |= dispatch::handle(widget, &Event::Timer { token }, &mut ctx);
            }
        }
        any
    }

    pub fn needs_redraw(&self) -> bool {
        base::needs_redraw(&self.root)
    }

    /// Rebuild the frame's draw list: the tree first, then window overlays
    /// on top.
    pub fn draw(&mut self) -> &DrawList {
        self.list.clear();
        let mut ctx = DrawContext {
            list: &mut self.list,
            styles: &self.styles,
            measure: self.measure.as_ref(),
        };
        dispatch::draw(&mut self.root, &mut ctx);
        dispatch::draw_overlay(&mut self.root, &mut ctx);
        &self.list
    }
}
