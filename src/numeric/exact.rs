// ============================================================================
// Exact Values
// Unrounded arithmetic results carried as a ratio of two integers
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::fixed_decimal::{pow10, FixedDecimal};

/// The exact outcome of a multiplication or division, before rounding.
///
/// Stored as `numer / denom` with `denom > 0`. Range checks compare against
/// this value so they see the true magnitude, not a rounded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactValue {
    numer: i128,
    denom: i128,
}

impl ExactValue {
    /// Build a ratio, moving the sign onto the numerator.
    ///
    /// # Errors
    /// - `DivisionByZero` if `denom` is zero
    /// - `Overflow` if normalising the sign does not fit
    pub fn new(numer: i128, denom: i128) -> NumericResult<Self> {
        if denom == 0 {
            return Err(NumericError::DivisionByZero);
        }
        if denom < 0 {
            let numer = numer.checked_neg().ok_or(NumericError::Overflow)?;
            let denom = denom.checked_neg().ok_or(NumericError::Overflow)?;
            return Ok(Self { numer, denom });
        }
        Ok(Self { numer, denom })
    }

    /// A raw fixed-point value at the given (positive) scale.
    pub(crate) const fn from_scaled(raw: i128, scale: i128) -> Self {
        Self {
            numer: raw,
            denom: scale,
        }
    }

    #[inline]
    pub const fn numer(self) -> i128 {
        self.numer
    }

    #[inline]
    pub const fn denom(self) -> i128 {
        self.denom
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.numer == 0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.numer < 0
    }

    /// True when `|self| > bound`, compared without any rounding.
    ///
    /// A bound whose scaled form does not fit cannot be exceeded.
    pub fn exceeds(self, bound: u128) -> bool {
        match bound.checked_mul(self.denom.unsigned_abs()) {
            Some(limit) => self.numer.unsigned_abs() > limit,
            None => false,
        }
    }

    /// Round to `D` fractional digits using round-half-to-even.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the scaled value does not fit.
    pub fn round_half_even<const D: u8>(self) -> NumericResult<FixedDecimal<D>> {
        self.round_half_even_to::<D>(D)
    }

    /// Round to `places` fractional digits (half-to-even), stored at scale `D`.
    ///
    /// # Errors
    /// - `PrecisionLoss` if `places` is larger than `D`
    /// - `Overflow` or `Underflow` if the scaled value does not fit
    pub fn round_half_even_to<const D: u8>(self, places: u8) -> NumericResult<FixedDecimal<D>> {
        if places > D {
            return Err(NumericError::PrecisionLoss);
        }
        let range_error = if self.is_negative() {
            NumericError::Underflow
        } else {
            NumericError::Overflow
        };

        let scaled = self.numer.checked_mul(pow10(places)).ok_or(range_error)?;

        let quotient = scaled / self.denom;
        let remainder = (scaled % self.denom).unsigned_abs();
        // |remainder| < denom <= i128::MAX, so doubling stays within u128
        let twice = remainder * 2;
        let denom = self.denom.unsigned_abs();

        let round_away = twice > denom || (twice == denom && quotient % 2 != 0);
        let rounded = if round_away {
            let step = if scaled < 0 { -1 } else { 1 };
            quotient.checked_add(step).ok_or(range_error)?
        } else {
            quotient
        };

        rounded
            .checked_mul(pow10(D - places))
            .map(FixedDecimal::from_raw)
            .ok_or(range_error)
    }
}
