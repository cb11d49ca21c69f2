//! Built-in widgets.

pub mod list_view;
pub mod scrollbar;
pub mod slider;
pub mod tabs;
pub mod window;

pub use list_view::{ListHook, ListView};
pub use scrollbar::{Pushed, Scrollbar};
pub use slider::{Orientation, Slider};
pub use tabs::{TabLayout, Tabs};
pub use window::Window;
