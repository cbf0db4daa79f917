// ============================================================================
// Fixed-Point Decimal
// Checked fixed-point arithmetic with compile-time precision
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::exact::ExactValue;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Fixed-point decimal number with compile-time precision.
///
/// Internally stores `value × 10^DECIMALS` as an i128.
///
/// # Type Parameter
/// - `DECIMALS`: Number of decimal places (0-18). Default is 4.
///
/// # Value Range
/// With DECIMALS=4 (default) the range is roughly ±1.7 × 10^34, far beyond
/// anything two bounded operands can produce. Every operation is still
/// checked so that a wrapped value can never escape.
///
/// # Example
/// ```
/// use bounded_calc::numeric::Amount;
///
/// let price: Amount = "100".parse().unwrap();
/// let qty: Amount = "2.5".parse().unwrap();
/// let total = price.checked_mul(qty).unwrap().round_half_even::<4>().unwrap();
/// assert_eq!(total.to_string(), "250.0000");
/// ```
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct FixedDecimal<const DECIMALS: u8 = 4>(i128);

// ============================================================================
// Scale Constants
// ============================================================================

/// Compute 10^n at compile time
pub(crate) const fn pow10(n: u8) -> i128 {
    let mut result: i128 = 1;
    let mut i = 0;
    while i < n {
        result *= 10;
        i += 1;
    }
    result
}

impl<const D: u8> FixedDecimal<D> {
    /// The scale factor (10^DECIMALS)
    pub const SCALE: i128 = pow10(D);

    /// Number of fractional digits carried by this type
    pub const DECIMALS: u8 = D;

    /// Zero value
    pub const ZERO: Self = Self(0);

    /// One (1.0)
    pub const ONE: Self = Self(pow10(D));

    /// Maximum representable value
    pub const MAX: Self = Self(i128::MAX);

    /// Minimum representable value
    pub const MIN: Self = Self(i128::MIN);

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from raw internal representation (already scaled).
    #[inline]
    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    /// Create from an integer value.
    ///
    /// # Errors
    /// Returns `Overflow` if the value is too large to represent.
    #[inline]
    pub fn from_integer(value: i128) -> NumericResult<Self> {
        value
            .checked_mul(Self::SCALE)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    /// Create from integer and fractional parts.
    ///
    /// # Arguments
    /// - `integer`: The integer part (can be negative)
    /// - `fraction`: The fractional part (must be < SCALE, always positive)
    ///
    /// # Example
    /// ```
    /// use bounded_calc::numeric::FixedDecimal;
    ///
    /// // 123.456 with 4 decimals
    /// let x = FixedDecimal::<4>::from_parts(123, 4_560).unwrap();
    /// assert_eq!(x.to_string(), "123.4560");
    /// ```
    #[inline]
    pub fn from_parts(integer: i128, fraction: u128) -> NumericResult<Self> {
        if fraction >= Self::SCALE as u128 {
            return Err(NumericError::InvalidInput);
        }

        let int_scaled = integer
            .checked_mul(Self::SCALE)
            .ok_or(NumericError::Overflow)?;

        let frac_signed = if integer < 0 {
            -(fraction as i128)
        } else {
            fraction as i128
        };

        int_scaled
            .checked_add(frac_signed)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the raw internal value (scaled).
    #[inline]
    pub const fn raw_value(self) -> i128 {
        self.0
    }

    /// Get the integer part (truncated toward zero).
    #[inline]
    pub const fn integer_part(self) -> i128 {
        self.0 / Self::SCALE
    }

    /// Get the fractional part as a positive value.
    #[inline]
    pub const fn fractional_part(self) -> u128 {
        (self.0 % Self::SCALE).unsigned_abs()
    }

    /// Check if value is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Check if value is positive.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Check if value is negative.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Get absolute value.
    #[inline]
    pub fn abs(self) -> NumericResult<Self> {
        self.0.checked_abs().map(Self).ok_or(NumericError::Overflow)
    }

    /// Checked negation.
    #[inline]
    pub fn checked_neg(self) -> NumericResult<Self> {
        self.0.checked_neg().map(Self).ok_or(NumericError::Overflow)
    }

    /// True when `|self| > bound`, with `bound` given in whole units.
    #[inline]
    pub fn exceeds(self, bound: u128) -> bool {
        match bound.checked_mul(Self::SCALE as u128) {
            Some(limit) => self.0.unsigned_abs() > limit,
            None => false,
        }
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Checked addition. Exact at the shared scale.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    #[inline]
    pub fn checked_add(self, rhs: Self) -> NumericResult<Self> {
        self.0.checked_add(rhs.0).map(Self).ok_or_else(|| {
            if rhs.0 > 0 {
                NumericError::Overflow
            } else {
                NumericError::Underflow
            }
        })
    }

    /// Checked subtraction. Exact at the shared scale.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    #[inline]
    pub fn checked_sub(self, rhs: Self) -> NumericResult<Self> {
        self.0.checked_sub(rhs.0).map(Self).ok_or_else(|| {
            if rhs.0 < 0 {
                NumericError::Overflow
            } else {
                NumericError::Underflow
            }
        })
    }

    /// Checked multiplication.
    ///
    /// The product keeps all `2 × DECIMALS` fractional digits; rounding is left
    /// to the caller so range checks can run on the exact value first.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the raw product does not fit in i128.
    #[inline]
    pub fn checked_mul(self, rhs: Self) -> NumericResult<ExactValue> {
        let product = self.0.checked_mul(rhs.0).ok_or_else(|| {
            if self.is_negative() != rhs.is_negative() {
                NumericError::Underflow
            } else {
                NumericError::Overflow
            }
        })?;
        let denom = Self::SCALE
            .checked_mul(Self::SCALE)
            .ok_or(NumericError::Overflow)?;

        ExactValue::new(product, denom)
    }

    /// Checked division producing the exact quotient as a ratio.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `rhs` is zero.
    #[inline]
    pub fn checked_div(self, rhs: Self) -> NumericResult<ExactValue> {
        if rhs.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        // Both sides share the scale, so it cancels out of the ratio.
        ExactValue::new(self.0, rhs.0)
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Returns the minimum of two values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Returns the maximum of two values.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// A view whose `Display` drops trailing fractional zeros.
    #[inline]
    pub fn normalized(self) -> Normalized<D> {
        Normalized(self)
    }

    /// Render without trailing fractional zeros, using `separator` between the
    /// integer and fractional digits.
    pub fn to_plain_string(self, separator: char) -> String {
        let mut out = String::new();
        let magnitude = self.0.unsigned_abs();
        let scale = Self::SCALE as u128;
        let int_part = magnitude / scale;
        let frac_part = magnitude % scale;

        if self.0 < 0 {
            out.push('-');
        }
        out.push_str(&int_part.to_string());

        if frac_part != 0 {
            let digits = format!("{:0>width$}", frac_part, width = D as usize);
            out.push(separator);
            out.push_str(digits.trim_end_matches('0'));
        }
        out
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl<const D: u8> Default for FixedDecimal<D> {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const D: u8> PartialEq for FixedDecimal<D> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<const D: u8> Eq for FixedDecimal<D> {}

impl<const D: u8> PartialOrd for FixedDecimal<D> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const D: u8> Ord for FixedDecimal<D> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<const D: u8> Hash for FixedDecimal<D> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<const D: u8> From<FixedDecimal<D>> for ExactValue {
    fn from(value: FixedDecimal<D>) -> Self {
        ExactValue::from_scaled(value.0, FixedDecimal::<D>::SCALE)
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl<const D: u8> fmt::Debug for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedDecimal<{}>({}, raw={})", D, self, self.0)
    }
}

impl<const D: u8> fmt::Display for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int_part = self.integer_part();
        let frac_part = self.fractional_part();

        if D == 0 {
            write!(f, "{}", int_part)
        } else if self.0 < 0 && int_part == 0 {
            // Handle -0.xxx case
            write!(f, "-0.{:0>width$}", frac_part, width = D as usize)
        } else {
            write!(f, "{}.{:0>width$}", int_part, frac_part, width = D as usize)
        }
    }
}

/// Display adapter returned by [`FixedDecimal::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized<const D: u8>(FixedDecimal<D>);

impl<const D: u8> fmt::Display for Normalized<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_plain_string('.'))
    }
}

// ============================================================================
// Conversion from rust_decimal (for API boundaries)
// ============================================================================

impl<const D: u8> FixedDecimal<D> {
    /// Convert from rust_decimal::Decimal.
    ///
    /// # Errors
    /// - `PrecisionLoss` if significant digits would be lost
    /// - `Overflow` if the value is too large
    pub fn from_decimal(d: rust_decimal::Decimal) -> NumericResult<Self> {
        let mantissa = d.mantissa();
        let decimal_scale = d.scale();
        let target_scale = D as u32;

        let raw = if decimal_scale > target_scale {
            let divisor = pow10((decimal_scale - target_scale) as u8);
            if mantissa % divisor != 0 {
                return Err(NumericError::PrecisionLoss);
            }
            mantissa / divisor
        } else {
            mantissa
                .checked_mul(pow10((target_scale - decimal_scale) as u8))
                .ok_or(NumericError::Overflow)?
        };

        Ok(Self(raw))
    }

    /// Convert to rust_decimal::Decimal, keeping all `DECIMALS` digits.
    ///
    /// # Errors
    /// Returns `Overflow` if the value exceeds the 96-bit decimal mantissa.
    pub fn to_decimal(self) -> NumericResult<rust_decimal::Decimal> {
        rust_decimal::Decimal::try_from_i128_with_scale(self.0, D as u32)
            .map_err(|_| NumericError::Overflow)
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl<const D: u8> std::str::FromStr for FixedDecimal<D> {
    type Err = NumericError;

    /// Parse from a strict decimal string: `[+-]digits[.digits]`.
    ///
    /// No surrounding whitespace, grouping characters or exponent are accepted.
    ///
    /// # Examples
    /// - "123" -> 123.0000
    /// - "+123.456" -> 123.4560
    /// - "-0.001" -> -0.0010
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (is_negative, unsigned) = if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (false, rest)
        } else {
            (false, s)
        };

        let (int_str, frac_str) = match unsigned.split_once('.') {
            Some((int_str, frac_str)) => (int_str, Some(frac_str)),
            None => (unsigned, None),
        };

        if int_str.is_empty() || !int_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NumericError::InvalidInput);
        }

        let frac_val: u128 = match frac_str {
            None => 0,
            Some(frac) => {
                if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(NumericError::InvalidInput);
                }
                if frac.len() > D as usize {
                    return Err(NumericError::PrecisionLoss);
                }
                // Pad with zeros to reach DECIMALS length
                let padded = format!("{:0<width$}", frac, width = D as usize);
                padded.parse().map_err(|_| NumericError::InvalidInput)?
            }
        };

        // Only ASCII digits remain, so a failure here means the value is too large
        let int_val: i128 = int_str.parse().map_err(|_| NumericError::Overflow)?;

        let magnitude = Self::from_parts(int_val, frac_val)?;
        if is_negative {
            magnitude.checked_neg()
        } else {
            Ok(magnitude)
        }
    }
}

// ============================================================================
// Type Aliases for Common Use Cases
// ============================================================================

/// Operand and result value with 4 decimal places
pub type Amount = FixedDecimal<4>;

// ============================================================================
// Tests
// ============================================================================
