// ============================================================================
// Evaluator Configuration
// Limits and number format applied by every evaluation stage
// ============================================================================

use crate::numeric::Amount;

// ============================================================================
// Number Format
// ============================================================================

/// Separators used when reading operands and rendering results.
///
/// Passed explicitly to the parser and formatter; nothing reads ambient
/// locale state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    /// Character between integer and fractional digits
    pub fractional_separator: char,
    /// Digit-grouping character, always rejected in operands
    pub grouping_separator: char,
}

impl NumberFormat {
    /// Locale-independent format: `.` fractional separator, `,` grouping.
    pub const INVARIANT: Self = Self {
        fractional_separator: '.',
        grouping_separator: ',',
    };
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::INVARIANT
    }
}

// ============================================================================
// Evaluator Configuration
// ============================================================================

/// Default maximum input length, in characters
pub const DEFAULT_MAX_INPUT_LEN: usize = 100;

/// Default maximum number of fractional digits per operand
pub const DEFAULT_MAX_FRACTION_DIGITS: u8 = 4;

/// Default bound on `|operand|`
pub const DEFAULT_OPERAND_BOUND: u128 = 1_000_000;

/// Default bound on `|result|` before rounding
pub const DEFAULT_RESULT_BOUND: u128 = 1_000_000_000;

/// Limits enforced by the evaluation pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Longest accepted input, counted in characters
    pub max_input_len: usize,

    /// Fractional digits allowed in an operand (and kept in a result)
    pub max_fraction_digits: u8,

    /// Inclusive bound on the magnitude of each operand
    pub operand_bound: u128,

    /// Inclusive bound on the magnitude of the unrounded result
    pub result_bound: u128,

    /// Separators for parsing and formatting
    pub format: NumberFormat,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            max_fraction_digits: DEFAULT_MAX_FRACTION_DIGITS,
            operand_bound: DEFAULT_OPERAND_BOUND,
            result_bound: DEFAULT_RESULT_BOUND,
            format: NumberFormat::INVARIANT,
        }
    }
}

impl EvaluatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Set maximum input length
    pub fn with_max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = len;
        self
    }

    /// Builder method: Set maximum fractional digits per operand
    pub fn with_max_fraction_digits(mut self, digits: u8) -> Self {
        self.max_fraction_digits = digits;
        self
    }

    /// Builder method: Set operand magnitude bound
    pub fn with_operand_bound(mut self, bound: u128) -> Self {
        self.operand_bound = bound;
        self
    }

    /// Builder method: Set result magnitude bound
    pub fn with_result_bound(mut self, bound: u128) -> Self {
        self.result_bound = bound;
        self
    }

    /// Builder method: Set number format
    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_input_len == 0 {
            return Err("Maximum input length must be positive".to_string());
        }

        if self.max_fraction_digits > Amount::DECIMALS {
            return Err(format!(
                "At most {} fractional digits are supported",
                Amount::DECIMALS
            ));
        }

        if self.operand_bound == 0 {
            return Err("Operand bound must be positive".to_string());
        }

        if self.result_bound == 0 {
            return Err("Result bound must be positive".to_string());
        }

        let NumberFormat {
            fractional_separator,
            grouping_separator,
        } = self.format;
        if fractional_separator == grouping_separator {
            return Err("Fractional and grouping separators must differ".to_string());
        }
        for separator in [fractional_separator, grouping_separator] {
            if separator.is_ascii_digit()
                || separator.is_whitespace()
                || matches!(separator, '+' | '-' | '*' | '/')
            {
                return Err(format!("Separator {separator:?} clashes with expression syntax"));
            }
        }

        Ok(())
    }
}

/// Render an integer bound with `,` thousands grouping, e.g. `1,000,000`.
pub(crate) fn group_thousands(value: &u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
