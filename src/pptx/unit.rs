//! Length units used by DrawingML.
//!
//! Every position and size in a slide part is an integer number of EMUs
//! (English Metric Units). Font sizes are written in hundredths of a point.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;

/// Convert inches to EMUs, rounding to the nearest unit.
#[inline]
pub fn inches(value: f64) -> i64 {
    (value * EMUS_PER_INCH as f64).round() as i64
}

/// Convert points to EMUs, rounding to the nearest unit.
#[inline]
pub fn pt_to_emu(value: f64) -> i64 {
    (value * EMUS_PER_PT as f64).round() as i64
}

/// Convert a font size in points to the `sz` attribute value (1/100 pt).
#[inline]
pub fn font_size_attr(points: f64) -> u32 {
    (points * 100.0).round() as u32
}

/// Width in EMUs that keeps an image's aspect ratio at the given height.
#[inline]
pub fn scaled_width(pixel_width: u32, pixel_height: u32, height: i64) -> i64 {
    if pixel_height == 0 {
        return height;
    }
    ((height as f64) * (pixel_width as f64) / (pixel_height as f64)).round() as i64
}

/// Picture extent at the given height, shrunk proportionally to fit
/// `max_width`. Neither side is ever smaller than one EMU.
pub fn fit_extent(pixel_width: u32, pixel_height: u32, max_width: i64, height: i64) -> (i64, i64) {
    let width = scaled_width(pixel_width, pixel_height, height);
    if width <= max_width {
        return (width.max(1), height.max(1));
    }
    let scaled_height = ((height as f64) * (max_width as f64) / (width as f64)).round() as i64;
    (max_width.max(1), scaled_height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches() {
        assert_eq!(inches(1.0), 914_400);
        assert_eq!(inches(16.0), 14_630_400);
        assert_eq!(inches(9.0), 8_229_600);
        assert_eq!(inches(4.5), 4_114_800);
        assert_eq!(inches(0.05), 45_720);
    }

    #[test]
    fn test_points() {
        assert_eq!(pt_to_emu(1.0), 12_700);
        assert_eq!(font_size_attr(18.0), 1800);
        assert_eq!(font_size_attr(54.0), 5400);
    }

    #[test]
    fn test_scaled_width() {
        assert_eq!(scaled_width(200, 100, inches(1.0)), inches(2.0));
        assert_eq!(scaled_width(100, 100, inches(1.0)), inches(1.0));
        assert_eq!(scaled_width(10, 0, 500), 500);
    }

    #[test]
    fn test_fit_extent() {
        let h = inches(1.0);
        assert_eq!(fit_extent(100, 100, inches(1.1), h), (h, h));
        // wide: width capped, height follows
        assert_eq!(fit_extent(400, 100, inches(2.0), h), (inches(2.0), inches(0.5)));
        // extremely tall: width never collapses to zero
        assert_eq!(fit_extent(1, 2_000_000, inches(1.1), h), (1, h));
        // extremely wide: height never collapses to zero
        assert_eq!(fit_extent(2_000_000_000, 1, 10, h), (10, 1));
    }
}
