use crate::error::CoordinateError;
use dashu_base::Abs;
use dashu_float::DBig;
use serde::{Deserialize, Serialize};

/// Arbitrary precision decimal with explicit precision enforcement
///
/// Precision is counted in significant decimal digits. Every stored value is
/// rounded to its precision on construction, so arithmetic never runs at the
/// unlimited precision of a freshly parsed literal.
#[derive(Clone, Debug)]
pub struct BigDecimal {
    value: DBig,
    precision_digits: usize,
}

impl BigDecimal {
    /// Wrap a `DBig`, rounding it to `precision_digits` significant digits.
    ///
    /// NO DEFAULT - precision must always be specified
    pub fn from_dbig(value: DBig, precision_digits: usize) -> Self {
        let precision_digits = precision_digits.max(1);
        Self {
            value: value.with_precision(precision_digits).value(),
            precision_digits,
        }
    }

    /// Create BigDecimal from a decimal literal such as `"-0.7436438870371587"` or `"1e-40"`
    pub fn from_string(val: &str, precision_digits: usize) -> Result<Self, CoordinateError> {
        let parsed = val
            .trim()
            .parse::<DBig>()
            .map_err(|e| CoordinateError::InvalidDecimal {
                literal: val.to_string(),
                reason: format!("{:?}", e),
            })?;
        Ok(Self::from_dbig(parsed, precision_digits))
    }

    /// Create BigDecimal from an f64.
    ///
    /// Uses the shortest decimal string that round-trips to the same f64,
    /// which is what a user sees when the coordinate is printed.
    pub fn from_f64(val: f64, precision_digits: usize) -> Result<Self, CoordinateError> {
        if !val.is_finite() {
            return Err(CoordinateError::NonFinite(val.to_string()));
        }
        Self::from_string(&val.to_string(), precision_digits)
    }

    pub fn zero(precision_digits: usize) -> Self {
        Self::from_dbig(DBig::ZERO, precision_digits)
    }

    pub fn precision_digits(&self) -> usize {
        self.precision_digits
    }

    pub fn as_dbig(&self) -> &DBig {
        &self.value
    }

    pub fn into_dbig(self) -> DBig {
        self.value
    }

    /// Re-round to a different precision.
    pub fn with_precision(&self, precision_digits: usize) -> Self {
        Self::from_dbig(self.value.clone(), precision_digits)
    }

    /// Convert to f64 (for display and logging only)
    pub fn to_f64(&self) -> f64 {
        self.value.to_string().parse::<f64>().unwrap_or(f64::NAN)
    }

    pub fn is_zero(&self) -> bool {
        self.value == DBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.value < DBig::ZERO
    }

    /// floor(log10(|self|)), or None for zero.
    pub fn order_of_magnitude(&self) -> Option<isize> {
        if self.is_zero() {
            return None;
        }
        let repr = self.value.repr();
        let digits = repr
            .significand()
            .to_string()
            .trim_start_matches('-')
            .len() as isize;
        Some(repr.exponent() + digits - 1)
    }

    /// Add two BigDecimals, preserving max precision
    pub fn add(&self, other: &Self) -> Self {
        let precision = self.precision_digits.max(other.precision_digits);
        let sum = &self.lift(precision) + &other.lift(precision);
        Self::from_dbig(sum, precision)
    }

    /// Subtract two BigDecimals, preserving max precision
    pub fn sub(&self, other: &Self) -> Self {
        let precision = self.precision_digits.max(other.precision_digits);
        let difference = &self.lift(precision) - &other.lift(precision);
        Self::from_dbig(difference, precision)
    }

    /// Multiply two BigDecimals, preserving max precision
    pub fn mul(&self, other: &Self) -> Self {
        let precision = self.precision_digits.max(other.precision_digits);
        let product = &self.lift(precision) * &other.lift(precision);
        Self::from_dbig(product, precision)
    }

    /// Divide two BigDecimals, preserving max precision. None when dividing by zero.
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        let precision = self.precision_digits.max(other.precision_digits);
        let quotient = &self.lift(precision) / &other.lift(precision);
        Some(Self::from_dbig(quotient, precision))
    }

    pub fn abs(&self) -> Self {
        Self {
            value: self.value.clone().abs(),
            precision_digits: self.precision_digits,
        }
    }

    fn lift(&self, precision_digits: usize) -> DBig {
        self.value.clone().with_precision(precision_digits).value()
    }
}

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for BigDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl std::fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Serialize, Deserialize)]
struct BigDecimalSerde {
    value: String,
    precision_digits: usize,
}

impl Serialize for BigDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let serde = BigDecimalSerde {
            value: self.value.to_string(),
            precision_digits: self.precision_digits,
        };

        serde.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BigDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let serde = BigDecimalSerde::deserialize(deserializer)?;
        BigDecimal::from_string(&serde.value, serde.precision_digits)
            .map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abs_returns_positive_for_negative_value() {
        let neg = BigDecimal::from_string("-5.25", 32).unwrap();
        assert_eq!(neg.abs(), BigDecimal::from_string("5.25", 32).unwrap());
    }

    #[test]
    fn abs_preserves_precision() {
        let neg = BigDecimal::from_string("-5", 256).unwrap();
        assert_eq!(neg.abs().precision_digits(), 256);
    }

    #[test]
    fn from_f64_uses_shortest_round_trip_form() {
        let value = BigDecimal::from_f64(0.1, 64).unwrap();
        assert_eq!(value, BigDecimal::from_string("0.1", 64).unwrap());
    }

    #[test]
    fn from_f64_rejects_nan_and_infinity() {
        assert!(matches!(
            BigDecimal::from_f64(f64::NAN, 64),
            Err(CoordinateError::NonFinite(_))
        ));
        assert!(BigDecimal::from_f64(f64::INFINITY, 64).is_err());
    }

    #[test]
    fn from_string_rejects_garbage() {
        let result = BigDecimal::from_string("minus two", 64);
        assert!(matches!(result, Err(CoordinateError::InvalidDecimal { .. })));
    }

    #[test]
    fn arithmetic_is_exact_beyond_f64() {
        let a = BigDecimal::from_string("0.1000000000000000000000000000001", 64).unwrap();
        let b = BigDecimal::from_string("0.0000000000000000000000000000001", 64).unwrap();
        let expected = BigDecimal::from_string("0.1", 64).unwrap();
        assert_eq!(a.sub(&b), expected);
    }

    #[test]
    fn mixed_precision_uses_the_larger_precision() {
        let a = BigDecimal::from_string("1", 16).unwrap();
        let b = BigDecimal::from_string("3", 64).unwrap();
        let third = a.checked_div(&b).unwrap();
        assert_eq!(third.precision_digits(), 64);
        assert!(third.to_string().matches('3').count() > 40);
    }

    #[test]
    fn checked_div_by_zero_is_none() {
        let a = BigDecimal::from_string("1", 32).unwrap();
        assert!(a.checked_div(&BigDecimal::zero(32)).is_none());
    }

    #[test]
    fn order_of_magnitude_matches_exponent() {
        let tiny = BigDecimal::from_string("3.5e-14", 64).unwrap();
        assert_eq!(tiny.order_of_magnitude(), Some(-14));
        let large = BigDecimal::from_string("-1234.5", 64).unwrap();
        assert_eq!(large.order_of_magnitude(), Some(3));
        assert_eq!(BigDecimal::zero(64).order_of_magnitude(), None);
    }

    #[test]
    fn serialization_roundtrip_preserves_digits() {
        let value =
            BigDecimal::from_string("-0.743643887037158704752191506114774", 64).unwrap();
        let json = serde_json::to_string(&value).unwrap();
        let restored: BigDecimal = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, value);
        assert_eq!(restored.precision_digits(), 64);
    }
}
