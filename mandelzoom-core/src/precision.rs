//! Working precision for high precision boundaries.
//!
//! Determines how many significant decimal digits mapped coordinates need to
//! tell adjacent pixels apart at the boundary's zoom level.

use crate::boundary::HighPrecisionBoundary;
use crate::selection::CanvasSize;

/// Safety margin for rounding errors in the remapping arithmetic.
const SAFETY_DIGITS: isize = 16;

/// Never drop below this many digits, even for shallow boundaries.
pub const MIN_PRECISION_DIGITS: usize = 32;

/// Calculate required significant digits for a high precision boundary.
///
/// Needs enough digits to:
/// 1. Represent the largest coordinate magnitude
/// 2. Resolve one pixel step of the narrower axis
///
/// Rounded up to a power of two, minimum [`MIN_PRECISION_DIGITS`].
pub fn calculate_precision_digits(boundary: &HighPrecisionBoundary, canvas: CanvasSize) -> usize {
    // log10 of one pixel step; digit counts are only order-of-magnitude accurate
    let pixel_digits = |span: Option<isize>, pixels: u32| {
        span.map(|exp| exp - (pixels.max(1) as f64).log10().ceil() as isize)
    };
    let step_x = pixel_digits(boundary.width().order_of_magnitude(), canvas.width);
    let step_y = pixel_digits(boundary.height().order_of_magnitude(), canvas.height);
    let min_step = match (step_x, step_y) {
        (Some(x), Some(y)) => x.min(y),
        (Some(v), None) | (None, Some(v)) => v,
        (None, None) => return MIN_PRECISION_DIGITS,
    };

    let magnitude = [
        &boundary.re_start,
        &boundary.re_end,
        &boundary.im_start,
        &boundary.im_end,
    ]
    .iter()
    .filter_map(|v| v.order_of_magnitude())
    .max()
    .unwrap_or(0)
    .max(0);

    let digits = (magnitude - min_step + 1).max(0) + SAFETY_DIGITS;

    (digits as usize).next_power_of_two().max(MIN_PRECISION_DIGITS)
}
