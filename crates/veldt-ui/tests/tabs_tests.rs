//! Tab strip layout, hit-testing, selection and draw order.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;
use veldt_core::geometry::{Rect, Size};
use veldt_core::math::Vec2;
use veldt_core::timer::TimerQueue;
use veldt_ui::measure::LabelMeasure;
use veldt_ui::style::StyleRegistry;
use veldt_ui::widgets::{Tabs, Window};
use veldt_ui::{
    Damage, DrawCommand, DrawContext, DrawList, Event, EventContext, Group, MouseButton, Ui,
    Widget,
};

/// Fixed-advance metrics so ideal tab widths are exact in tests.
struct CharMetrics(i32);

impl LabelMeasure for CharMetrics {
    fn measure(&self, text: &str, _size: f32) -> Size<i32> {
        Size::new(text.chars().count() as i32 * self.0, 14)
    }
}

fn tabs_with(labels: &[&str], width: i32) -> (StyleRegistry, Tabs) {
    let styles = StyleRegistry::default();
    let mut tabs = Tabs::new(&styles, Rect::new(0, 0, width, 200));
    for label in labels {
        let mut card = Group::new(&styles, Rect::new(0, 25, width, 175));
        card.base_mut().set_label(*label);
        tabs.add(card);
    }
    (styles, tabs)
}

#[test]
fn test_band_height_from_child_extents() {
    let (_, tabs) = tabs_with(&["a", "b"], 300);
    // Children start 25px down and the thin-up box eats one pixel.
    assert_eq!(tabs.tab_height(), 25);
}

#[test]
fn test_band_height_negative_for_bottom_tabs() {
    let styles = StyleRegistry::default();
    let mut tabs = Tabs::new(&styles, Rect::new(0, 0, 300, 200));
    let mut card = Group::new(&styles, Rect::new(0, 0, 300, 175));
    card.base_mut().set_label("a");
    tabs.add(card);
    assert_eq!(tabs.tab_height(), -25);
}

#[test]
fn test_ideal_layout_when_tabs_fit() {
    let (_, tabs) = tabs_with(&["ab", "ab", "ab"], 300);
    let lay = tabs.tab_positions(&CharMetrics(9));
    // 18px labels plus the slope margin.
    assert_eq!(lay.edges, vec![0, 26, 52, 78]);
    assert_eq!(lay.widths, vec![26, 26, 26]);
    assert_eq!(lay.selected, 0);
}

#[test]
fn test_unlabeled_tab_gets_stub_width() {
    let styles = StyleRegistry::default();
    let mut tabs = Tabs::new(&styles, Rect::new(0, 0, 300, 200));
    tabs.add(Group::new(&styles, Rect::new(0, 25, 300, 175)));
    let lay = tabs.tab_positions(&CharMetrics(9));
    assert_eq!(lay.widths, vec![16]);
}

#[test]
fn test_selected_tab_keeps_ideal_width_under_compression() {
    // Five 80px tabs (400 ideal) in a 300px strip, tab 2 selected: its
    // edges stay ideal while the right neighbors collapse to one slope.
    let (_, mut tabs) = tabs_with(
        &["tab_0000", "tab_1111", "tab_2222", "tab_3333", "tab_4444"],
        300,
    );
    tabs.value();
    tabs.set_value(2);
    let lay = tabs.tab_positions(&CharMetrics(9));

    assert_eq!(lay.selected, 2);
    assert_eq!(lay.edges, vec![0, 80, 160, 240, 283, 291]);
    assert_eq!(lay.widths, vec![80, 80, 80, 80, 80]);
    // Selected edges equal the ideal, uncompressed positions.
    assert_eq!(lay.edges[2], 160);
    assert_eq!(lay.edges[3], 240);
    // Everything fits inside the strip minus the trailing slope.
    assert!(lay.edges[5] <= 300 - tabs.slope() - 1);
}

#[test]
fn test_deep_right_compression_edges() {
    // Twelve 48px tabs in 150px: three levels of overlap on each side of
    // the selection.
    let labels: Vec<String> = (0..12).map(|i| format!("tab_{i:04}")).collect();
    let refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
    let (_, mut tabs) = tabs_with(&refs, 150);
    tabs.value();
    tabs.set_value(5);
    let lay = tabs.tab_positions(&CharMetrics(5));

    assert_eq!(
        lay.edges,
        vec![0, 13, 21, 29, 37, 45, 93, 101, 109, 117, 125, 133, 141]
    );
    assert_eq!(lay.widths, vec![48; 12]);
    // Selected keeps full width; edges stay ordered.
    assert_eq!(lay.edges[6] - lay.edges[5], 48);
    assert!(lay.edges.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_left_compression_truncates_widths() {
    // Six 48px tabs in 70px: the left pass clamps edges to i*slope and
    // truncates every drawn width to the remaining space.
    let labels: Vec<String> = (0..6).map(|i| format!("tab_{i:04}")).collect();
    let refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
    let (_, mut tabs) = tabs_with(&refs, 70);
    tabs.value();
    let lay = tabs.tab_positions(&CharMetrics(5));

    assert_eq!(lay.widths, vec![21; 6]);
    assert_eq!(lay.edges, vec![0, 21, 29, 37, 45, 53, 61]);
    assert_eq!(lay.edges[1] - lay.edges[0], lay.widths[0]);
    assert!(lay.edges[6] <= 70 - tabs.slope() - 1);
}

#[test]
fn test_hit_test_at_ideal_centers() {
    let (_, mut tabs) = tabs_with(&["ab", "ab", "ab"], 300);
    tabs.value();
    let metrics = CharMetrics(9);
    let lay = tabs.tab_positions(&metrics);
    for i in 0..3 {
        let center = (lay.edges[i] + lay.edges[i + 1]) / 2;
        assert_eq!(tabs.which(center, 12, &metrics), Some(i), "tab {i}");
    }
    // Below the band there is no tab.
    assert_eq!(tabs.which(13, 50, &metrics), None);
    // Left of the widget there is no tab.
    assert_eq!(tabs.which(-1, 12, &metrics), None);
}

#[test]
fn test_hit_test_bottom_band() {
    let styles = StyleRegistry::default();
    let mut tabs = Tabs::new(&styles, Rect::new(0, 0, 300, 200));
    for label in ["ab", "cd"] {
        let mut card = Group::new(&styles, Rect::new(0, 0, 300, 175));
        card.base_mut().set_label(label);
        tabs.add(card);
    }
    tabs.value();
    let metrics = CharMetrics(9);
    assert_eq!(tabs.which(13, 190, &metrics), Some(0));
    assert_eq!(tabs.which(39, 190, &metrics), Some(1));
    assert_eq!(tabs.which(13, 150, &metrics), None);
}

#[test]
fn test_first_access_selects_first_visible_and_hides_rest() {
    let (_, mut tabs) = tabs_with(&["a", "b", "c"], 300);
    assert_eq!(tabs.value(), Some(0));
    assert!(tabs.group().child(0).unwrap().base().visible());
    assert!(!tabs.group().child(1).unwrap().base().visible());
    assert!(!tabs.group().child(2).unwrap().base().visible());
}

#[test]
fn test_first_access_skips_hidden_children() {
    let (_, mut tabs) = tabs_with(&["a", "b", "c"], 300);
    tabs.group_mut().child_mut(0).unwrap().hide();
    assert_eq!(tabs.value(), Some(1));
    assert!(!tabs.group().child(0).unwrap().base().visible());
    assert!(tabs.group().child(1).unwrap().base().visible());
    assert!(!tabs.group().child(2).unwrap().base().visible());
}

#[test]
fn test_set_value_is_idempotent() {
    let (_, mut tabs) = tabs_with(&["a", "b", "c"], 300);
    let count = Rc::new(Cell::new(0u32));
    let seen = Rc::clone(&count);
    tabs.base_mut()
        .set_callback(Rc::new(move |_| seen.set(seen.get() + 1)));
    tabs.value();

    assert!(tabs.set_value(1));
    assert_eq!(count.get(), 1);
    assert!(tabs.base().damage().needs_full_redraw());
    assert!(tabs.group().child(1).unwrap().base().visible());
    assert!(!tabs.group().child(0).unwrap().base().visible());

    tabs.base_mut().clear_damage();
    assert!(!tabs.set_value(1));
    assert_eq!(count.get(), 1, "no callback on a no-op selection");
    assert!(tabs.base().damage().is_empty(), "no damage on a no-op selection");
}

#[test]
fn test_remove_keeps_selection_stable() {
    let (_, mut tabs) = tabs_with(&["a", "b", "c"], 300);
    tabs.value();
    tabs.set_value(2);
    let removed_id = tabs.group().child(0).unwrap().base().id();
    tabs.remove(removed_id).unwrap();
    // Still pointing at the same card, now at index 1.
    assert_eq!(tabs.value(), Some(1));
    assert_eq!(
        tabs.group().child(1).unwrap().base().label(),
        Some("c")
    );
}

#[test]
fn test_push_damages_expose_only_when_highlight_changes() {
    let (_, mut tabs) = tabs_with(&["a", "b", "c"], 300);
    tabs.value();
    tabs.base_mut().clear_damage();

    assert!(tabs.push(Some(1)));
    assert_eq!(tabs.base().damage(), Damage::EXPOSE);
    tabs.base_mut().clear_damage();

    // Same tab again: no state change, no damage.
    assert!(!tabs.push(Some(1)));
    assert!(tabs.base().damage().is_empty());

    // Pushing the selected tab highlights nothing.
    tabs.push(None);
    tabs.base_mut().clear_damage();
    assert!(tabs.push(Some(0)));
    assert!(tabs.base().damage().is_empty());
}

#[test]
fn test_click_selects_tab_through_event_flow() {
    let (styles, mut tabs) = tabs_with(&["ab", "cd", "ef"], 300);
    tabs.value();
    let metrics = CharMetrics(9);
    let lay = tabs.tab_positions(&metrics);
    let center1 = ((lay.edges[1] + lay.edges[2]) / 2) as f32;

    let mut timers = TimerQueue::new();
    let mut ctx = EventContext::new(&mut timers, Instant::now(), &styles, &metrics);
    let down = Event::Push { pos: Vec2::new(center1, 12.0), button: MouseButton::Left };
    let up = Event::Release { pos: Vec2::new(center1, 12.0), button: MouseButton::Left };
    assert!(tabs.handle(&down, &mut ctx));
    assert_eq!(tabs.value(), Some(0), "selection changes on release, not press");
    assert!(tabs.handle(&up, &mut ctx));
    assert_eq!(tabs.value(), Some(1));
}

#[test]
fn test_draw_emits_selected_tab_last() {
    let (styles, mut tabs) = tabs_with(&["alpha", "beta", "gamma"], 300);
    tabs.value();
    tabs.set_value(1);
    let mut window = Window::new(&styles, 300, 200, "z-order");
    window.add(tabs);
    let mut ui = Ui::new(styles, window);

    let list = ui.draw();
    let label_index = |text: &str| {
        list.commands()
            .iter()
            .position(|c| matches!(c, DrawCommand::Label { text: t, .. } if t == text))
            .unwrap_or_else(|| panic!("label {text} not drawn"))
    };
    let alpha = label_index("alpha");
    let beta = label_index("beta");
    let gamma = label_index("gamma");
    assert!(beta > alpha, "selected tab must draw above its left neighbors");
    assert!(beta > gamma, "selected tab must draw above its right neighbors");
    assert_eq!(list.clip_depth(), 0);
}

#[test]
fn test_expose_damage_skips_child_redraw() {
    let (styles, mut tabs) = tabs_with(&["ab", "cd"], 300);
    tabs.value();
    let metrics = CharMetrics(9);

    let mut full = DrawList::new();
    let mut ctx = DrawContext { list: &mut full, styles: &styles, measure: &metrics };
    tabs.draw(&mut ctx);
    let child_rect = Rect::new(0, 25, 300, 175);
    assert!(
        full.commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Quad { rect, .. } if *rect == child_rect)),
        "full draw paints the selected card"
    );

    tabs.push(Some(1));
    let mut partial = DrawList::new();
    let mut ctx = DrawContext { list: &mut partial, styles: &styles, measure: &metrics };
    tabs.draw(&mut ctx);
    assert!(
        !partial
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Quad { rect, .. } if *rect == child_rect)),
        "expose-only damage must not repaint the card"
    );
    assert!(
        partial
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Polygon { .. })),
        "the band itself is repainted"
    );
}
