//! Per-class widget styling.
//!
//! Every widget class reads its visual defaults from an immutable
//! [`StyleRegistry`] built once at startup, instead of lazily loading global
//! style state on first draw. Widgets copy what they need at construction;
//! the registry itself never changes afterwards.

use crate::draw::BoxKind;
use indexmap::IndexMap;
use veldt_core::color::Color;

/// Visual defaults for one widget class.
#[derive(Debug, Clone, Copy)]
pub struct ClassStyle {
    pub box_kind: BoxKind,
    pub color: Color,
    pub selection_color: Color,
    pub label_color: Color,
    pub label_size: f32,
    /// Diagonal pixel width of slanted tab edges.
    pub slope: i32,
    /// Default step for line-wise scrolling.
    pub linesize: i32,
}

impl Default for ClassStyle {
    fn default() -> Self {
        Self {
            box_kind: BoxKind::Flat,
            color: Color::from_rgb_u8(192, 192, 192),
            selection_color: Color::from_rgb_u8(128, 128, 160),
            label_color: Color::BLACK,
            label_size: 14.0,
            slope: 8,
            linesize: 16,
        }
    }
}

/// Immutable registry mapping widget class names to their styles.
///
/// Iteration follows registration order, which keeps debug dumps stable.
pub struct StyleRegistry {
    classes: IndexMap<&'static str, ClassStyle>,
}

impl StyleRegistry {
    /// An empty registry. Most callers want [`StyleRegistry::default`].
    pub fn new() -> Self {
        Self {
            classes: IndexMap::new(),
        }
    }

    /// Register a class style. Intended for setup code only; last write wins.
    pub fn register(&mut self, class: &'static str, style: ClassStyle) {
        self.classes.insert(class, style);
    }

    /// The style for `class`, falling back to the base widget style.
    pub fn class(&self, class: &str) -> ClassStyle {
        self.classes
            .get(class)
            .or_else(|| self.classes.get("widget"))
            .copied()
            .unwrap_or_default()
    }

    /// Registered class names, in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.classes.keys().copied()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        let mut reg = Self::new();
        reg.register("widget", ClassStyle::default());
        reg.register(
            "window",
            ClassStyle {
                box_kind: BoxKind::Flat,
                ..ClassStyle::default()
            },
        );
        reg.register(
            "group",
            ClassStyle {
                box_kind: BoxKind::Flat,
                ..ClassStyle::default()
            },
        );
        reg.register(
            "slider",
            ClassStyle {
                box_kind: BoxKind::Down,
                ..ClassStyle::default()
            },
        );
        reg.register(
            "scrollbar",
            ClassStyle {
                box_kind: BoxKind::Flat,
                color: Color::from_rgb_u8(160, 160, 160),
                ..ClassStyle::default()
            },
        );
        reg.register(
            "tabs",
            ClassStyle {
                box_kind: BoxKind::ThinUp,
                ..ClassStyle::default()
            },
        );
        reg.register(
            "listview",
            ClassStyle {
                box_kind: BoxKind::Down,
                color: Color::WHITE,
                ..ClassStyle::default()
            },
        );
        reg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_class_falls_back_to_widget() {
        let reg = StyleRegistry::default();
        let base = reg.class("widget");
        let unknown = reg.class("does-not-exist");
        assert_eq!(unknown.box_kind, base.box_kind);
        assert_eq!(unknown.slope, base.slope);
    }

    #[test]
    fn test_registration_order_stable() {
        let reg = StyleRegistry::default();
        assert_eq!(reg.classes().next(), Some("widget"));
    }
}
