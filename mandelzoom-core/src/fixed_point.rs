//! Multi-limb binary fixed point and its decimal codec.
//!
//! A [`FixedPoint`] is four 32-bit limbs: one integer limb followed by three
//! fractional limbs (96 fractional bits, most significant first). Negative
//! values are the two's complement of the full 128-bit pattern, so bit 31 of
//! limb 0 is the sign bit. This is the coordinate format the external renderer
//! iterates in once native f64 stops resolving the zoom.

use crate::error::CoordinateError;
use dashu::integer::{IBig, UBig};
use dashu_base::UnsignedAbs;
use dashu_float::DBig;
use serde::{Deserialize, Serialize};

pub const LIMB_COUNT: usize = 4;
pub const FRACTION_LIMBS: usize = 3;
pub const FRACTION_BITS: usize = FRACTION_LIMBS * 32;

const LIMB_MASK: u64 = 0xFFFF_FFFF;
const SIGN_BIT: u32 = 1 << 31;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedPoint([u32; LIMB_COUNT]);

impl FixedPoint {
    pub const ZERO: Self = Self([0; LIMB_COUNT]);
    /// Smallest positive value, 2^-96.
    pub const EPSILON: Self = Self([0, 0, 0, 1]);

    pub const fn from_limbs(limbs: [u32; LIMB_COUNT]) -> Self {
        Self(limbs)
    }

    pub const fn limbs(&self) -> [u32; LIMB_COUNT] {
        self.0
    }

    pub const fn is_negative(&self) -> bool {
        self.0[0] & SIGN_BIT != 0
    }

    /// The same bit pattern as an i128 holding `value * 2^96`.
    pub fn to_bits(&self) -> i128 {
        let [l0, l1, l2, l3] = self.0;
        (((l0 as u128) << 96) | ((l1 as u128) << 64) | ((l2 as u128) << 32) | l3 as u128) as i128
    }

    pub fn from_bits(bits: i128) -> Self {
        let bits = bits as u128;
        Self([
            (bits >> 96) as u32,
            (bits >> 64) as u32,
            (bits >> 32) as u32,
            bits as u32,
        ])
    }

    /// Lossy conversion for logging and display.
    pub fn to_f64(&self) -> f64 {
        self.to_bits() as f64 / 2f64.powi(FRACTION_BITS as i32)
    }

    /// Limb-wise addition, carry propagated from limb 3 up to limb 0.
    /// A carry out of limb 0 is dropped.
    pub fn wrapping_add(&self, other: &Self) -> Self {
        let mut limbs = [0u32; LIMB_COUNT];
        let mut carry = 0u64;
        for i in (0..LIMB_COUNT).rev() {
            let sum = self.0[i] as u64 + other.0[i] as u64 + carry;
            carry = sum >> 32;
            limbs[i] = (sum & LIMB_MASK) as u32;
        }
        Self(limbs)
    }

    /// Add one unit in the last place (2^-96).
    pub fn increment(&self) -> Self {
        self.wrapping_add(&Self::EPSILON)
    }

    /// Two's complement across all four limbs: invert, then increment.
    pub fn wrapping_neg(&self) -> Self {
        let inverted = Self(self.0.map(|limb| !limb));
        inverted.increment()
    }

    pub fn wrapping_sub(&self, other: &Self) -> Self {
        self.wrapping_add(&other.wrapping_neg())
    }

    /// Signed product truncated to 96 fractional bits.
    ///
    /// Magnitudes are multiplied limb by limb into an 8-limb buffer; buffer
    /// limb 1 carries the integer part and limbs 2..5 the fraction. Integer
    /// overflow beyond limb 0 is discarded.
    pub fn truncating_mul(&self, other: &Self) -> Self {
        let negate = self.is_negative() != other.is_negative();
        let a = self.magnitude_limbs();
        let b = other.magnitude_limbs();

        let mut buffer = [0u64; LIMB_COUNT * 2];
        for i in (0..LIMB_COUNT).rev() {
            if a[i] == 0 {
                continue;
            }
            for j in (0..LIMB_COUNT).rev() {
                if b[j] == 0 {
                    continue;
                }
                let product = a[i] as u64 * b[j] as u64;
                buffer[i + j + 1] += product & LIMB_MASK;
                buffer[i + j] += product >> 32;
            }
        }
        for i in (1..buffer.len()).rev() {
            buffer[i - 1] += buffer[i] >> 32;
            buffer[i] &= LIMB_MASK;
        }

        let product = Self([
            buffer[1] as u32,
            buffer[2] as u32,
            buffer[3] as u32,
            buffer[4] as u32,
        ]);
        if negate {
            product.wrapping_neg()
        } else {
            product
        }
    }

    /// Limbs of |self|. The most negative value maps onto itself, which reads
    /// correctly as an unsigned magnitude of 2^31.
    fn magnitude_limbs(&self) -> [u32; LIMB_COUNT] {
        if self.is_negative() {
            self.wrapping_neg().0
        } else {
            self.0
        }
    }
}

impl PartialOrd for FixedPoint {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FixedPoint {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_bits().cmp(&other.to_bits())
    }
}

/// Encode a decimal as fixed point, truncating toward zero magnitude.
///
/// The whole part must fit the signed integer limb: `-2^31 <= v < 2^31`.
/// The fraction is produced one limb at a time by multiplying the remainder by
/// 2^32 and truncating, so the error is below 2^-96 and never overshoots.
pub fn decimal_to_fixed_point(value: &DBig) -> Result<FixedPoint, CoordinateError> {
    let out_of_range = || CoordinateError::Range {
        value: value.to_string(),
    };

    let repr = value.repr();
    let negative = *repr.significand() < IBig::ZERO;
    let magnitude = repr.significand().unsigned_abs();
    let exponent = repr.exponent();

    // |value| = whole + remainder / denominator
    let (whole, mut remainder, denominator) = if exponent >= 0 {
        let scale = UBig::from(10u8).pow(exponent as usize);
        (magnitude * scale, UBig::ZERO, UBig::ONE)
    } else {
        let denominator = UBig::from(10u8).pow(exponent.unsigned_abs());
        let whole = &magnitude / &denominator;
        let remainder = &magnitude % &denominator;
        (whole, remainder, denominator)
    };

    let mut fraction = [0u32; FRACTION_LIMBS];
    for limb in fraction.iter_mut() {
        remainder = remainder << 32;
        let digit = &remainder / &denominator;
        remainder = &remainder % &denominator;
        *limb = u32::try_from(digit).map_err(|_| out_of_range())?;
    }

    let sign_boundary = UBig::from(SIGN_BIT);
    let fits = if negative {
        whole < sign_boundary || (whole == sign_boundary && fraction == [0; FRACTION_LIMBS])
    } else {
        whole < sign_boundary
    };
    if !fits {
        return Err(out_of_range());
    }
    let whole = u32::try_from(whole).map_err(|_| out_of_range())?;

    let magnitude = FixedPoint([whole, fraction[0], fraction[1], fraction[2]]);
    Ok(if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    })
}

/// Decode fixed point limbs back to an exact decimal.
///
/// Every fixed point value is a multiple of 2^-96, so the result is exact:
/// the fraction bits are accumulated as a numerator over 2^96 and scaled by
/// 5^96 into a decimal with exponent -96.
pub fn fixed_to_decimal(fixed: &FixedPoint) -> DBig {
    let negative = fixed.is_negative();
    let [whole, f0, f1, f2] = fixed.magnitude_limbs();

    let mut numerator = UBig::from(whole);
    for limb in [f0, f1, f2] {
        numerator = (numerator << 32) + UBig::from(limb);
    }

    let scaled = IBig::from(numerator * UBig::from(5u8).pow(FRACTION_BITS));
    let significand = if negative { -scaled } else { scaled };
    DBig::from_parts(significand, -(FRACTION_BITS as isize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> DBig {
        s.parse().unwrap()
    }

    #[test]
    fn zero_encodes_as_all_zero_limbs() {
        let fixed = decimal_to_fixed_point(&DBig::ZERO).unwrap();
        assert_eq!(fixed, FixedPoint::ZERO);
        assert!(!fixed.is_negative());
        assert_eq!(fixed_to_decimal(&fixed), DBig::ZERO);
    }

    #[test]
    fn one_and_a_half_sets_top_fraction_bit() {
        let fixed = decimal_to_fixed_point(&dec("1.5")).unwrap();
        assert_eq!(fixed.limbs(), [1, 0x8000_0000, 0, 0]);
    }

    #[test]
    fn minus_one_is_all_ones_in_the_integer_limb() {
        let fixed = decimal_to_fixed_point(&dec("-1")).unwrap();
        assert_eq!(fixed.limbs(), [0xFFFF_FFFF, 0, 0, 0]);
        assert!(fixed.is_negative());
    }

    #[test]
    fn negative_fraction_borrows_through_every_limb() {
        let fixed = decimal_to_fixed_point(&dec("-0.5")).unwrap();
        assert_eq!(fixed.limbs(), [0xFFFF_FFFF, 0x8000_0000, 0, 0]);
        assert_eq!(fixed_to_decimal(&fixed), dec("-0.5"));
    }

    #[test]
    fn large_exponent_integer_is_decoded() {
        let fixed = decimal_to_fixed_point(&dec("12e3")).unwrap();
        assert_eq!(fixed.limbs(), [12_000, 0, 0, 0]);
    }

    #[test]
    fn truncates_instead_of_rounding() {
        // 2^-96 * 0.75 is below the last place and must vanish, not round up.
        let below_ulp = fixed_to_decimal(&FixedPoint::EPSILON);
        let three_quarters = &below_ulp * &dec("0.75");
        let fixed = decimal_to_fixed_point(&three_quarters).unwrap();
        assert_eq!(fixed, FixedPoint::ZERO);
    }

    #[test]
    fn most_negative_integer_round_trips() {
        let fixed = decimal_to_fixed_point(&dec("-2147483648")).unwrap();
        assert_eq!(fixed.limbs(), [0x8000_0000, 0, 0, 0]);
        assert_eq!(fixed_to_decimal(&fixed), dec("-2147483648"));
    }

    #[test]
    fn integer_limb_overflow_is_a_range_error() {
        assert!(matches!(
            decimal_to_fixed_point(&dec("2147483648")),
            Err(CoordinateError::Range { .. })
        ));
        assert!(matches!(
            decimal_to_fixed_point(&dec("-2147483648.5")),
            Err(CoordinateError::Range { .. })
        ));
        assert!(decimal_to_fixed_point(&dec("2147483647.999")).is_ok());
    }

    #[test]
    fn bits_match_limb_layout() {
        let fixed = FixedPoint::from_limbs([0xFFFF_FFFE, 0x8000_0000, 0, 0]);
        assert_eq!(fixed.to_bits(), -(3i128 << 95));
        assert_eq!(FixedPoint::from_bits(fixed.to_bits()), fixed);
        assert_eq!(fixed.to_f64(), -1.5);
    }

    #[test]
    fn increment_carries_into_integer_limb() {
        let fixed = FixedPoint::from_limbs([0, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF]);
        assert_eq!(fixed.increment().limbs(), [1, 0, 0, 0]);
    }

    #[test]
    fn negating_zero_is_zero() {
        assert_eq!(FixedPoint::ZERO.wrapping_neg(), FixedPoint::ZERO);
    }
}
