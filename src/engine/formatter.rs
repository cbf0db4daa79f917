// ============================================================================
// Result Formatter
// ============================================================================

use crate::domain::NumberFormat;
use crate::numeric::Amount;

/// Render a rounded result: no grouping, no exponent, no `+`, trailing
/// fractional zeros dropped, separator omitted for integral values.
pub fn format(value: Amount, number_format: &NumberFormat) -> String {
    value.to_plain_string(number_format.fractional_separator)
}
