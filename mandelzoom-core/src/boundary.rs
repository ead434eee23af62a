use crate::decimal::BigDecimal;
use crate::error::CoordinateError;
use crate::fixed_point::{decimal_to_fixed_point, FixedPoint};
use serde::{Deserialize, Serialize};

/// Real-axis width below which f64 stops resolving further zoom.
pub const PRECISION_THRESHOLD: f64 = 1e-13;

/// Rectangle in the complex plane with native f64 precision
///
/// `im_start` is the lower plane edge, which is the bottom of the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boundary {
    pub re_start: f64,
    pub re_end: f64,
    pub im_start: f64,
    pub im_end: f64,
}

impl Boundary {
    pub fn new(re_start: f64, re_end: f64, im_start: f64, im_end: f64) -> Self {
        Self {
            re_start,
            re_end,
            im_start,
            im_end,
        }
    }

    pub fn width(&self) -> f64 {
        self.re_end - self.re_start
    }

    pub fn height(&self) -> f64 {
        self.im_end - self.im_start
    }

    /// True when both axes are finite and strictly increasing.
    pub fn is_valid(&self) -> bool {
        self.ensure_finite().is_ok() && self.re_start < self.re_end && self.im_start < self.im_end
    }

    pub fn ensure_finite(&self) -> Result<(), CoordinateError> {
        for value in [self.re_start, self.re_end, self.im_start, self.im_end] {
            if !value.is_finite() {
                return Err(CoordinateError::NonFinite(value.to_string()));
            }
        }
        Ok(())
    }

    /// Whether the real-axis width has dropped below [`PRECISION_THRESHOLD`].
    pub fn needs_high_precision(&self) -> bool {
        self.width() < PRECISION_THRESHOLD
    }

    /// Convert every edge to a [`BigDecimal`] with explicit precision.
    pub fn to_high_precision(
        &self,
        precision_digits: usize,
    ) -> Result<HighPrecisionBoundary, CoordinateError> {
        Ok(HighPrecisionBoundary {
            re_start: BigDecimal::from_f64(self.re_start, precision_digits)?,
            re_end: BigDecimal::from_f64(self.re_end, precision_digits)?,
            im_start: BigDecimal::from_f64(self.im_start, precision_digits)?,
            im_end: BigDecimal::from_f64(self.im_end, precision_digits)?,
        })
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::new(-2.0, 1.0, -1.0, 1.0)
    }
}

/// Rectangle in the complex plane with arbitrary precision decimal edges
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighPrecisionBoundary {
    pub re_start: BigDecimal,
    pub re_end: BigDecimal,
    pub im_start: BigDecimal,
    pub im_end: BigDecimal,
}

impl HighPrecisionBoundary {
    /// Create boundary from decimal literals (for coordinates beyond f64 precision)
    pub fn from_strings(
        re_start: &str,
        re_end: &str,
        im_start: &str,
        im_end: &str,
        precision_digits: usize,
    ) -> Result<Self, CoordinateError> {
        Ok(Self {
            re_start: BigDecimal::from_string(re_start, precision_digits)?,
            re_end: BigDecimal::from_string(re_end, precision_digits)?,
            im_start: BigDecimal::from_string(im_start, precision_digits)?,
            im_end: BigDecimal::from_string(im_end, precision_digits)?,
        })
    }

    pub fn width(&self) -> BigDecimal {
        self.re_end.sub(&self.re_start)
    }

    pub fn height(&self) -> BigDecimal {
        self.im_end.sub(&self.im_start)
    }

    pub fn is_valid(&self) -> bool {
        self.re_start < self.re_end && self.im_start < self.im_end
    }

    /// Both axes must still have positive extent.
    pub fn ensure_extent(&self) -> Result<(), CoordinateError> {
        if self.re_start >= self.re_end {
            return Err(CoordinateError::Collapsed { axis: "real" });
        }
        if self.im_start >= self.im_end {
            return Err(CoordinateError::Collapsed { axis: "imaginary" });
        }
        Ok(())
    }

    /// Largest precision among the four edges
    pub fn precision_digits(&self) -> usize {
        [&self.re_start, &self.re_end, &self.im_start, &self.im_end]
            .iter()
            .map(|v| v.precision_digits())
            .max()
            .unwrap_or(0)
    }

    /// Edges as decimal strings in `[re_start, re_end, im_start, im_end]` order.
    pub fn to_decimal_strings(&self) -> [String; 4] {
        [
            self.re_start.to_string(),
            self.re_end.to_string(),
            self.im_start.to_string(),
            self.im_end.to_string(),
        ]
    }

    /// Encode every edge into the renderer's 4-limb fixed point format.
    pub fn to_fixed_point(&self) -> Result<FixedPointBoundary, CoordinateError> {
        Ok(FixedPointBoundary {
            re_start: decimal_to_fixed_point(self.re_start.as_dbig())?,
            re_end: decimal_to_fixed_point(self.re_end.as_dbig())?,
            im_start: decimal_to_fixed_point(self.im_start.as_dbig())?,
            im_end: decimal_to_fixed_point(self.im_end.as_dbig())?,
        })
    }
}

/// Boundary edges encoded as fixed point limbs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedPointBoundary {
    pub re_start: FixedPoint,
    pub re_end: FixedPoint,
    pub im_start: FixedPoint,
    pub im_end: FixedPoint,
}

/// The active boundary. Exactly one precision mode is live at a time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "boundary", rename_all = "snake_case")]
pub enum BoundaryMode {
    Native(Boundary),
    HighPrecision(HighPrecisionBoundary),
}

impl BoundaryMode {
    pub fn is_high_precision(&self) -> bool {
        matches!(self, BoundaryMode::HighPrecision(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            BoundaryMode::Native(_) => "native",
            BoundaryMode::HighPrecision(_) => "high_precision",
        }
    }

    /// Real-axis width, lossy in high precision mode (for logging).
    pub fn width_f64(&self) -> f64 {
        match self {
            BoundaryMode::Native(boundary) => boundary.width(),
            BoundaryMode::HighPrecision(boundary) => boundary.width().to_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_point::fixed_to_decimal;

    #[test]
    fn default_boundary_is_the_full_set() {
        let boundary = Boundary::default();
        assert_eq!(boundary.width(), 3.0);
        assert_eq!(boundary.height(), 2.0);
        assert!(boundary.is_valid());
        assert!(!boundary.needs_high_precision());
    }

    #[test]
    fn threshold_is_strict() {
        let at = Boundary::new(0.0, PRECISION_THRESHOLD, 0.0, 1e-13);
        assert!(!at.needs_high_precision());
        let below = Boundary::new(0.0, 9e-14, 0.0, 6e-14);
        assert!(below.needs_high_precision());
    }

    #[test]
    fn inverted_or_nan_boundary_is_invalid() {
        assert!(!Boundary::new(1.0, -2.0, -1.0, 1.0).is_valid());
        assert!(!Boundary::new(f64::NAN, 1.0, -1.0, 1.0).is_valid());
    }

    #[test]
    fn to_high_precision_keeps_printed_values() {
        // Up to 15 significant digits print back exactly.
        let boundary = Boundary::new(-0.1530048850375, -0.1530048850374, 1.0396113703, 1.03961137031);
        let high = boundary.to_high_precision(64).unwrap();
        assert_eq!(
            high.re_start,
            BigDecimal::from_string("-0.1530048850375", 64).unwrap()
        );
        assert_eq!(high.im_end, BigDecimal::from_string("1.03961137031", 64).unwrap());
        assert!(high.is_valid());
    }

    #[test]
    fn fixed_point_encoding_round_trips_binary_fractions() {
        let high = HighPrecisionBoundary::from_strings("-1.5", "0.25", "-0.125", "0.0625", 64).unwrap();
        let fixed = high.to_fixed_point().unwrap();
        assert!(fixed.re_start.is_negative());
        assert_eq!(&fixed_to_decimal(&fixed.re_end), high.re_end.as_dbig());
        assert_eq!(&fixed_to_decimal(&fixed.im_start), high.im_start.as_dbig());
    }

    #[test]
    fn fixed_point_encoding_reports_overflow() {
        let high = HighPrecisionBoundary::from_strings("-3e9", "0", "0", "1", 64).unwrap();
        assert!(matches!(
            high.to_fixed_point(),
            Err(CoordinateError::Range { .. })
        ));
    }

    #[test]
    fn collapsed_high_precision_axis_is_reported() {
        let flat = HighPrecisionBoundary::from_strings("-1.5", "-1.5", "0", "1e-40", 64).unwrap();
        assert!(!flat.is_valid());
        assert_eq!(
            flat.ensure_extent(),
            Err(CoordinateError::Collapsed { axis: "real" })
        );

        let thin = HighPrecisionBoundary::from_strings("-1.5", "-1.4999", "1e-40", "1e-40", 64).unwrap();
        assert_eq!(
            thin.ensure_extent(),
            Err(CoordinateError::Collapsed { axis: "imaginary" })
        );

        let fine = HighPrecisionBoundary::from_strings("-1.5", "-1.4999", "0", "1e-40", 64).unwrap();
        assert_eq!(fine.ensure_extent(), Ok(()));
    }

    #[test]
    fn boundary_mode_serialization_roundtrip() {
        let modes = [
            BoundaryMode::Native(Boundary::default()),
            BoundaryMode::HighPrecision(
                HighPrecisionBoundary::from_strings(
                    "-0.743643887037158704752191506114774",
                    "-0.743643887037158704752191506114770",
                    "0.131825904205311970493132056385139",
                    "0.131825904205311970493132056385142",
                    64,
                )
                .unwrap(),
            ),
        ];
        for mode in modes {
            let json = serde_json::to_string(&mode).unwrap();
            let restored: BoundaryMode = serde_json::from_str(&json).unwrap();
            assert_eq!(restored, mode);
        }
    }

    #[test]
    fn native_boundary_uses_camel_case_fields() {
        let json = serde_json::to_string(&Boundary::default()).unwrap();
        assert!(json.contains("\"reStart\":-2.0"));
        assert!(json.contains("\"imEnd\":1.0"));
    }
}
