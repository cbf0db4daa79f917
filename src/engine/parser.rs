// ============================================================================
// Expression Parser
// Recognises `<number> <operator> <number>` and splits it into its parts
// ============================================================================

use crate::domain::{EvalError, EvaluatorConfig, OperandError, Operator, ParsedExpression};
use regex::Regex;

/// Shape recogniser for a single binary expression.
///
/// The pattern is anchored at both ends: optional whitespace, a signed
/// numeral, the operator, a second signed numeral, optional whitespace.
/// Digits are ASCII only.
#[derive(Debug, Clone)]
pub struct ExpressionParser {
    pattern: Regex,
    max_input_len: usize,
    fractional_separator: char,
    grouping_separator: char,
}

impl ExpressionParser {
    /// Build a parser for the configured separator and length limit.
    pub fn new(config: &EvaluatorConfig) -> Result<Self, String> {
        let separator = regex::escape(&config.format.fractional_separator.to_string());
        let numeral = format!(r"[+-]?[0-9]+(?:{separator}[0-9]+)?");
        let pattern = Regex::new(&format!(r"^\s*({numeral})\s*([-+*/])\s*({numeral})\s*$"))
            .map_err(|e| format!("Invalid expression pattern: {e}"))?;

        Ok(Self {
            pattern,
            max_input_len: config.max_input_len,
            fractional_separator: config.format.fractional_separator,
            grouping_separator: config.format.grouping_separator,
        })
    }

    /// Split `input` into operand texts and operator.
    ///
    /// # Errors
    /// - `InputTooLong` when `input` has more characters than allowed
    /// - `InvalidOperand(GroupingSeparator)` when the shape does not match and
    ///   the input contains the grouping character
    /// - `MalformedExpression` when the shape does not match otherwise
    pub fn parse(&self, input: &str) -> Result<ParsedExpression, EvalError> {
        if input.chars().count() > self.max_input_len {
            return Err(EvalError::InputTooLong {
                max: self.max_input_len,
            });
        }

        let Some(captures) = self.pattern.captures(input) else {
            // A grouping character is the likeliest reason, so name it
            if input.contains(self.grouping_separator) {
                return Err(OperandError::GroupingSeparator {
                    separator: self.fractional_separator,
                }
                .into());
            }
            return Err(EvalError::MalformedExpression {
                separator: self.fractional_separator,
            });
        };

        let group = |index: usize| {
            captures
                .get(index)
                .map(|m| m.as_str())
                .ok_or_else(|| EvalError::Internal(format!("capture group {index} missing")))
        };
        let left = group(1)?;
        let symbol = group(2)?;
        let right = group(3)?;

        let operator = symbol
            .chars()
            .next()
            .and_then(Operator::from_symbol)
            .ok_or_else(|| EvalError::Internal(format!("unsupported operator {symbol:?}")))?;

        Ok(ParsedExpression::new(left, operator, right))
    }
}
