//! Linear remapping between numeric intervals.
//!
//! Pixel selections are turned into complex-plane boundaries by mapping each
//! edge from the canvas interval onto the current boundary interval. The
//! imaginary axis is flipped: the canvas bottom (largest y) maps to `im_start`.

use crate::boundary::{Boundary, HighPrecisionBoundary};
use crate::decimal::BigDecimal;
use crate::error::CoordinateError;
use crate::selection::{CanvasSize, Selection};

/// Map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Fails with `DegenerateInterval` when `in_min == in_max` instead of
/// producing NaN or infinity.
pub fn map(
    value: f64,
    in_min: f64,
    in_max: f64,
    out_min: f64,
    out_max: f64,
) -> Result<f64, CoordinateError> {
    if in_max == in_min {
        return Err(CoordinateError::DegenerateInterval {
            bound: in_min.to_string(),
        });
    }
    Ok(out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min))
}

/// Same formula as [`map`], evaluated in arbitrary precision decimal arithmetic.
///
/// The result carries the largest precision among the operands.
pub fn map_high_precision(
    value: &BigDecimal,
    in_min: &BigDecimal,
    in_max: &BigDecimal,
    out_min: &BigDecimal,
    out_max: &BigDecimal,
) -> Result<BigDecimal, CoordinateError> {
    let in_span = in_max.sub(in_min);
    let offset = value.sub(in_min);
    let out_span = out_max.sub(out_min);

    let fraction = offset
        .checked_div(&in_span)
        .ok_or_else(|| CoordinateError::DegenerateInterval {
            bound: in_min.to_string(),
        })?;

    Ok(out_min.add(&fraction.mul(&out_span)))
}

/// Map a pixel-space selection into the plane using native f64 arithmetic.
pub fn selection_to_boundary(
    selection: &Selection,
    current: &Boundary,
    canvas: CanvasSize,
) -> Result<Boundary, CoordinateError> {
    let width = canvas.width as f64;
    let height = canvas.height as f64;

    let boundary = Boundary {
        re_start: map(selection.left, 0.0, width, current.re_start, current.re_end)?,
        re_end: map(selection.right, 0.0, width, current.re_start, current.re_end)?,
        im_start: map(selection.bottom, height, 0.0, current.im_start, current.im_end)?,
        im_end: map(selection.top, height, 0.0, current.im_start, current.im_end)?,
    };
    boundary.ensure_finite()?;
    Ok(boundary)
}

/// Map a pixel-space selection into the plane at `precision_digits` of precision.
pub fn selection_to_high_precision_boundary(
    selection: &Selection,
    current: &HighPrecisionBoundary,
    canvas: CanvasSize,
    precision_digits: usize,
) -> Result<HighPrecisionBoundary, CoordinateError> {
    let pixel = |v: f64| BigDecimal::from_f64(v, precision_digits);
    let zero = BigDecimal::zero(precision_digits);
    let width = pixel(canvas.width as f64)?;
    let height = pixel(canvas.height as f64)?;

    let re_start = current.re_start.with_precision(precision_digits);
    let re_end = current.re_end.with_precision(precision_digits);
    let im_start = current.im_start.with_precision(precision_digits);
    let im_end = current.im_end.with_precision(precision_digits);

    Ok(HighPrecisionBoundary {
        re_start: map_high_precision(&pixel(selection.left)?, &zero, &width, &re_start, &re_end)?,
        re_end: map_high_precision(&pixel(selection.right)?, &zero, &width, &re_start, &re_end)?,
        im_start: map_high_precision(
            &pixel(selection.bottom)?,
            &height,
            &zero,
            &im_start,
            &im_end,
        )?,
        im_end: map_high_precision(&pixel(selection.top)?, &height, &zero, &im_start, &im_end)?,
    })
}
