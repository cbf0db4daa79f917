// ============================================================================
// Operand Parsing & Validation
// Strict numeral reading with precision limits, then the operand range check
// ============================================================================

use crate::domain::{EvalError, EvaluatorConfig, NumberFormat, OperandError};
use crate::numeric::{Amount, NumericError};
use std::borrow::Cow;

/// Read one operand text into a 4-digit fixed-point value.
///
/// Checks run in a fixed order: fractional digit count, grouping separator,
/// then the strict numeral parse.
///
/// # Errors
/// - `MissingFractionDigits` for a trailing separator
/// - `TooManyFractionDigits` past `config.max_fraction_digits`
/// - `GroupingSeparator` if the grouping character appears anywhere
/// - `TooLarge` for a well-formed numeral too large to hold
/// - `Unparsable` for anything else
pub fn parse_operand(text: &str, config: &EvaluatorConfig) -> Result<Amount, OperandError> {
    let NumberFormat {
        fractional_separator,
        grouping_separator,
    } = config.format;

    if let Some((_, fraction)) = text.split_once(fractional_separator) {
        let digits = fraction.chars().count();
        if digits == 0 {
            return Err(OperandError::MissingFractionDigits);
        }
        if digits > config.max_fraction_digits as usize {
            return Err(OperandError::TooManyFractionDigits {
                max: config.max_fraction_digits,
            });
        }
    }

    if text.contains(grouping_separator) {
        return Err(OperandError::GroupingSeparator {
            separator: fractional_separator,
        });
    }

    // The numeral grammar itself is written with `.`
    let canonical: Cow<'_, str> = if fractional_separator == '.' {
        Cow::Borrowed(text)
    } else if text.contains('.') {
        return Err(OperandError::Unparsable);
    } else {
        Cow::Owned(text.replace(fractional_separator, "."))
    };

    canonical.parse::<Amount>().map_err(|err| match err {
        NumericError::PrecisionLoss => OperandError::TooManyFractionDigits {
            max: config.max_fraction_digits,
        },
        err if err.is_range_error() => OperandError::TooLarge,
        _ => OperandError::Unparsable,
    })
}

/// Check both operands against the configured magnitude bound.
///
/// # Errors
/// A single `OperandOutOfRange` when either side is out of range.
pub fn validate_operands(
    left: Amount,
    right: Amount,
    config: &EvaluatorConfig,
) -> Result<(), EvalError> {
    if left.exceeds(config.operand_bound) || right.exceeds(config.operand_bound) {
        return Err(EvalError::OperandOutOfRange {
            bound: config.operand_bound,
        });
    }
    Ok(())
}
