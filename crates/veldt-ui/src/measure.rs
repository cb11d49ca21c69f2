//! Label measurement seam.
//!
//! Widgets never talk to a font backend directly; they measure label text
//! through [`LabelMeasure`]. The toolkit ships [`FixedMetrics`], a
//! deterministic estimate, and real backends plug in behind the same trait.

use veldt_core::geometry::Size;

/// Measures the pixel extent of a label string at a given font size.
pub trait LabelMeasure {
    fn measure(&self, text: &str, size: f32) -> Size<i32>;
}

/// Deterministic fallback metrics: 0.6 em advance per character, 1.2 em line
/// height. Good enough for layout when no font backend is attached, and
/// stable for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMetrics;

impl LabelMeasure for FixedMetrics {
    fn measure(&self, text: &str, size: f32) -> Size<i32> {
        let chars = text.chars().count() as f32;
        Size::new(
            (chars * size * 0.6).ceil() as i32,
            (size * 1.2).ceil() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_metrics_scales_with_length() {
        let m = FixedMetrics;
        let a = m.measure("ab", 10.0);
        let b = m.measure("abcd", 10.0);
        assert_eq!(a.width * 2, b.width);
        assert_eq!(a.height, b.height);
        assert_eq!(m.measure("", 10.0).width, 0);
    }
}
