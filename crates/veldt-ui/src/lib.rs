//! Veldt UI - retained-mode widget toolkit core.
//!
//! This crate provides the toolkit's hard center:
//! - Widget base behaviors (draw/handle/resize/show/hide) over an owned
//!   widget tree with damage tracking
//! - An override-hook layer with a per-binding re-entrancy guard, so
//!   external code can wrap any virtual operation and still call the
//!   original without looping
//! - The interaction-heavy container widgets: scrollbar (end-box stepping
//!   with an auto-repeat timer) and tab strip (compressing slanted-tab
//!   layout with slope-aware hit-testing)
//! - A retained draw list and an event router as the only boundaries to the
//!   platform layers
//!
//! ## Quick Start
//!
//! ```
//! use veldt_ui::style::StyleRegistry;
//! use veldt_ui::ui::Ui;
//! use veldt_ui::widgets::{Scrollbar, Window};
//! use veldt_core::geometry::Rect;
//!
//! let styles = StyleRegistry::default();
//! let mut window = Window::new(&styles, 400, 300, "demo");
//! let mut bar = Scrollbar::new(&styles, Rect::new(380, 0, 20, 300));
//! bar.set_range(0.0, 100.0);
//! window.add(bar);
//!
//! let mut ui = Ui::new(styles, window);
//! // In the host loop:
//! // ui.handle(event, Instant::now());
//! // ui.run_timers(Instant::now());
//! // encode(ui.draw());
//! ```

pub mod base;
pub mod damage;
pub mod draw;
pub mod event;
pub mod hook;
pub mod image;
pub mod measure;
pub mod style;
pub mod ui;
pub mod widgets;

pub use base::{Callback, Group, Widget, WidgetBase, WidgetId};
pub use damage::Damage;
pub use draw::{Align, BoxKind, DrawCommand, DrawContext, DrawList, ImageId};
pub use event::{Event, EventContext, EventRouter, Key, MouseButton};
pub use hook::{HookBinding, Vcall, VcallGuard, WidgetHook};
pub use image::{BitmapImage, Image, ImageHook, TiledImage};
pub use measure::{FixedMetrics, LabelMeasure};
pub use style::{ClassStyle, StyleRegistry};
pub use ui::Ui;
pub use widgets::{ListHook, ListView, Orientation, Pushed, Scrollbar, Slider, TabLayout, Tabs, Window};
