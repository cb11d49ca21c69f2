//! Veldt - a retained-mode widget toolkit core.
//!
//! This facade re-exports the toolkit crates:
//!
//! - [`core`](veldt_core) - geometry, color, collections, logging, timers
//! - [`ui`](veldt_ui) - widgets, events, hooks, draw lists
//!
//! # Quick Start
//!
//! ```
//! use veldt::prelude::*;
//!
//! let styles = StyleRegistry::default();
//! let mut window = Window::new(&styles, 640, 480, "hello");
//! let mut tabs = Tabs::new(&styles, Rect::new(0, 0, 640, 480));
//! let mut card = Group::new(&styles, Rect::new(0, 24, 640, 456));
//! card.base_mut().set_label("General");
//! tabs.add(card);
//! window.add(tabs);
//!
//! let ui = Ui::new(styles, window);
//! assert!(ui.needs_redraw());
//! ```

pub use veldt_core as core;
pub use veldt_ui as ui;

/// Common imports for applications.
pub mod prelude {
    pub use veldt_core::color::Color;
    pub use veldt_core::geometry::{Pos, Rect, Size};
    pub use veldt_core::timer::{TimerQueue, TimerToken};
    pub use veldt_ui::{
        Align, BoxKind, Callback, ClassStyle, Damage, DrawCommand, DrawContext, DrawList, Event,
        EventContext, EventRouter, FixedMetrics, Group, HookBinding, Image, ImageHook, Key,
        LabelMeasure, ListHook, ListView, MouseButton, Orientation, Pushed, Scrollbar, Slider,
        StyleRegistry, TabLayout, Tabs, Ui, Vcall, Widget, WidgetBase, WidgetHook, WidgetId,
        Window,
    };
}
