//! Input events and routing.
//!
//! Events come from the platform layer already translated into the
//! [`Event`] enum. The [`EventRouter`] owns the cross-widget interaction
//! state: the push grab (the widget that consumed a press receives every
//! drag and the release, wherever the pointer goes) and hover tracking with
//! synthesized Enter/Leave events.

use crate::base::{self, Widget, WidgetId, widget_at};
use crate::hook::dispatch;
use crate::measure::LabelMeasure;
use crate::style::StyleRegistry;
use std::time::{Duration, Instant};
use veldt_core::math::Vec2;
use veldt_core::timer::{TimerQueue, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the toolkit routes as shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

/// An input event dispatched to widgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Mouse button pressed.
    Push { pos: Vec2, button: MouseButton },
    /// Pointer moved while a button is held.
    Drag { pos: Vec2 },
    /// Mouse button released.
    Release { pos: Vec2, button: MouseButton },
    /// Pointer moved with no button held.
    Move { pos: Vec2 },
    /// Pointer entered the widget.
    Enter,
    /// Pointer left the widget.
    Leave,
    /// Keyboard shortcut.
    KeyDown { key: Key },
    /// A timer scheduled by this widget fired.
    Timer { token: TimerToken },
}

impl Event {
    /// The pointer position, for events that carry one.
    pub fn pos(&self) -> Option<Vec2> {
        match self {
            Event::Push { pos, .. }
            | Event::Drag { pos }
            | Event::Release { pos, .. }
            | Event::Move { pos } => Some(*pos),
            _ => None,
        }
    }
}

/// Services available to widgets while handling an event.
pub struct EventContext<'a> {
    timers: &'a mut TimerQueue<WidgetId>,
    pub now: Instant,
    pub styles: &'a StyleRegistry,
    pub measure: &'a dyn LabelMeasure,
    pushed_candidate: Option<WidgetId>,
}

impl<'a> EventContext<'a> {
    pub fn new(
        timers: &'a mut TimerQueue<WidgetId>,
        now: Instant,
        styles: &'a StyleRegistry,
        measure: &'a dyn LabelMeasure,
    ) -> Self {
        Self {
            timers,
            now,
            styles,
            measure,
            pushed_candidate: None,
        }
    }

    /// Schedule a one-shot timer owned by `owner`; it will receive
    /// [`Event::Timer`] when due.
    pub fn add_timeout(&mut self, delay: Duration, owner: WidgetId) -> TimerToken {
        self.timers.schedule(self.now, delay, owner)
    }

    /// Cancel a pending timer. Returns false if it already fired.
    pub fn remove_timeout(&mut self, token: TimerToken) -> bool {
        self.timers.cancel(token).is_some()
    }

    pub fn has_timeout(&self, token: TimerToken) -> bool {
        self.timers.is_scheduled(token)
    }

    /// Record the widget that consumed the current press. The deepest
    /// consuming widget calls first and wins.
    pub(crate) fn offer_pushed(&mut self, id: WidgetId) {
        if self.pushed_candidate.is_none() {
            self.pushed_candidate = Some(id);
        }
    }

    pub(crate) fn take_pushed(&mut self) -> Option<WidgetId> {
        self.pushed_candidate.take()
    }
}

/// Routes events from the platform into the widget tree.
pub struct EventRouter {
    pushed: Option<WidgetId>,
    hovered: Option<WidgetId>,
    mouse: Vec2,
}

impl EventRouter {
    pub fn new() -> Self {
        Self {
            pushed: None,
            hovered: None,
            mouse: Vec2::ZERO,
        }
    }

    /// The widget holding the push grab, if any.
    pub fn pushed(&self) -> Option<WidgetId> {
        self.pushed
    }

    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse
    }

    /// Deliver one event to the tree; returns true if a widget consumed it.
    pub fn route(
        &mut self,
        root: &mut dyn Widget,
        event: &Event,
        ctx: &mut EventContext<'_>,
    ) -> bool {
        match event {
            Event::Push { pos, .. } => {
                self.mouse = *pos;
                let consumed = dispatch::handle(root, event, ctx);
                if consumed {
                    self.pushed = ctx.take_pushed();
                    tracing::trace!(pushed = ?self.pushed, "push grab");
                }
                consumed
            }
            Event::Drag { pos } => {
                self.mouse = *pos;
                match self.pushed {
                    Some(id) => self.deliver_to(root, id, event, ctx),
                    None => dispatch::handle(root, event, ctx),
                }
            }
            Event::Release { pos, .. } => {
                self.mouse = *pos;
                match self.pushed.take() {
                    Some(id) => self.deliver_to(root, id, event, ctx),
                    None => dispatch::handle(root, event, ctx),
                }
            }
            Event::Move { pos } => {
                self.mouse = *pos;
                self.update_hover(root, ctx);
                dispatch::handle(root, event, ctx)
            }
            Event::KeyDown { .. } => match self.pushed {
                Some(id) => self.deliver_to(root, id, event, ctx),
                None => dispatch::handle(root, event, ctx),
            },
            Event::Timer { .. } | Event::Enter | Event::Leave => {
                dispatch::handle(root, event, ctx)
            }
        }
    }

    fn deliver_to(
        &mut self,
        root: &mut dyn Widget,
        id: WidgetId,
        event: &Event,
        ctx: &mut EventContext<'_>,
    ) -> bool {
        match base::find_widget_mut(root, id) {
            Some(widget) => dispatch::handle(widget, event, ctx),
            None => {
                // The grabbed widget was removed mid-interaction.
                self.pushed = None;
                false
            }
        }
    }

    fn update_hover(&mut self, root: &mut dyn Widget, ctx: &mut EventContext<'_>) {
        let now_hovered = widget_at(root, self.mouse);
        if now_hovered == self.hovered {
            return;
        }
        if let Some(old) = self.hovered {
            if let Some(widget) = base::find_widget_mut(root, old) {
                dispatch::handle(widget, &Event::Leave, ctx);
            }
        }
        if let Some(new) = now_hovered {
            if let Some(widget) = base::find_widget_mut(root, new) {
                dispatch::handle(widget, &Event::Enter, ctx);
            }
        }
        self.hovered = now_hovered;
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}
