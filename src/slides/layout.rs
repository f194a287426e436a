//! Canvas geometry and row layout.
use crate::pptx::unit::inches;

/// Coordinate space of a slide, in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: i64,
    pub height: i64,
}

impl Canvas {
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// The 16" x 9" canvas every generated deck uses.
    pub fn widescreen() -> Self {
        Self::new(inches(16.0), inches(9.0))
    }

    /// Left edge that centers an element of `width` horizontally.
    pub fn centered_x(&self, width: i64) -> i64 {
        (self.width - width) / 2
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::widescreen()
    }
}

/// Left edges of `n` boxes of width `box_width` separated by `gap`, centered
/// as a group on a canvas of `canvas_width`.
///
/// Box `i` starts at `(canvas_width - (n * box_width + (n - 1) * gap)) / 2 + i * (box_width + gap)`.
pub fn row_offsets(canvas_width: i64, n: usize, box_width: i64, gap: i64) -> Vec<i64> {
    if n == 0 {
        return Vec::new();
    }
    let count = n as i64;
    let start = (canvas_width - (count * box_width + (count - 1) * gap)) / 2;
    (0..count).map(|i| start + i * (box_width + gap)).collect()
}

/// Width of each of `n` boxes that fit between the side margins, capped at `max_width`.
pub fn fitted_box_width(canvas_width: i64, n: usize, max_width: i64, gap: i64, margin: i64) -> i64 {
    if n == 0 {
        return max_width;
    }
    let count = n as i64;
    let available = canvas_width - 2 * margin - (count - 1) * gap;
    max_width.min(available / count).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_summary_columns_are_centered() {
        let canvas = Canvas::widescreen();
        let offsets = row_offsets(canvas.width, 3, inches(4.5), inches(0.5));
        assert_eq!(offsets, vec![inches(0.75), inches(5.75), inches(10.75)]);
    }

    #[test]
    fn test_empty_row() {
        assert!(row_offsets(inches(16.0), 0, inches(4.5), inches(0.5)).is_empty());
    }

    #[test]
    fn test_fitted_box_width() {
        let c = inches(16.0);
        assert_eq!(fitted_box_width(c, 2, inches(4.5), inches(0.5), inches(0.5)), inches(4.5));
        // 16 - 1 - 4 * 0.5 = 13 inches shared by 5 boxes
        assert_eq!(
            fitted_box_width(c, 5, inches(4.5), inches(0.5), inches(0.5)),
            inches(13.0) / 5
        );
    }

    #[test]
    fn test_centered_x() {
        let canvas = Canvas::widescreen();
        assert_eq!(canvas.centered_x(inches(12.0)), inches(2.0));
    }

    proptest! {
        #[test]
        fn test_row_offsets_formula(
            canvas_width in 1i64..30_000_000,
            n in 1usize..12,
            box_width in 0i64..5_000_000,
            gap in 0i64..1_000_000,
        ) {
            let offsets = row_offsets(canvas_width, n, box_width, gap);
            prop_assert_eq!(offsets.len(), n);
            let count = n as i64;
            let start = (canvas_width - (count * box_width + (count - 1) * gap)) / 2;
            for (i, left) in offsets.iter().enumerate() {
                prop_assert_eq!(*left, start + i as i64 * (box_width + gap));
            }
            // Symmetric margins up to integer rounding
            let right = offsets[n - 1] + box_width;
            prop_assert!(((canvas_width - right) - offsets[0]).abs() <= 1);
        }
    }
}
