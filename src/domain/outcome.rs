// ============================================================================
// Evaluation Outcome
// Error kinds raised along the pipeline and the tagged result of one evaluation
// ============================================================================

use super::config::{group_thousands, NumberFormat};
use crate::engine::format;
use crate::numeric::Amount;
use std::fmt;
use thiserror::Error;

/// Why a single operand could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperandError {
    /// Fractional separator with nothing after it
    #[error("no digits after decimal point.")]
    MissingFractionDigits,

    /// More fractional digits than the configured scale
    #[error("at most {max} digits after decimal point.")]
    TooManyFractionDigits { max: u8 },

    /// Digit-grouping character present
    #[error("use `{separator}` as the fractional separator")]
    GroupingSeparator { separator: char },

    /// Anything else the strict numeral parser refuses
    #[error("could not parse number.")]
    Unparsable,

    /// Well-formed numeral whose magnitude does not fit the storage type.
    /// The evaluator reports it as an out-of-range operand.
    #[error("number is too large.")]
    TooLarge,
}

impl OperandError {
    /// True when the numeral is well-formed but too large to hold.
    pub fn is_too_large(&self) -> bool {
        matches!(self, OperandError::TooLarge)
    }
}

/// Every way one evaluation can fail, in pipeline order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("expression too long.")]
    InputTooLong { max: usize },

    #[error(
        "expected expression of form <number> <operator> <number> with `{separator}` as fractional separator."
    )]
    MalformedExpression { separator: char },

    #[error(transparent)]
    InvalidOperand(#[from] OperandError),

    #[error(
        "operands must be within the allowed range of [-{}, {}].",
        group_thousands(.bound),
        group_thousands(.bound)
    )]
    OperandOutOfRange { bound: u128 },

    #[error("division by zero is not allowed.")]
    DivisionByZero,

    #[error("overflow during computation; refine the values.")]
    ArithmeticOverflow,

    #[error(
        "result exceeds the allowed range of [-{}, {}].",
        group_thousands(.bound),
        group_thousands(.bound)
    )]
    ResultOutOfRange { bound: u128 },

    /// A condition the grammar should already have excluded
    #[error("internal error: {0}")]
    Internal(String),
}

impl EvalError {
    /// True for failures that indicate a bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, EvalError::Internal(_))
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Result of evaluating one expression: exactly one of value or error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    Success(Amount),
    Failure(EvalError),
}

impl EvalOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EvalOutcome::Success(_))
    }

    pub fn value(&self) -> Option<Amount> {
        match self {
            EvalOutcome::Success(value) => Some(*value),
            EvalOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&EvalError> {
        match self {
            EvalOutcome::Success(_) => None,
            EvalOutcome::Failure(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<Amount, EvalError> {
        match self {
            EvalOutcome::Success(value) => Ok(value),
            EvalOutcome::Failure(err) => Err(err),
        }
    }

    /// Process exit code for one-shot mode: 0 on success, 1 on failure.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// The formatted value, or `Error: <message>`.
    pub fn render(&self, number_format: &NumberFormat) -> String {
        match self {
            EvalOutcome::Success(value) => format(*value, number_format),
            EvalOutcome::Failure(err) => format!("Error: {err}"),
        }
    }
}

impl From<Result<Amount, EvalError>> for EvalOutcome {
    fn from(result: Result<Amount, EvalError>) -> Self {
        match result {
            Ok(value) => EvalOutcome::Success(value),
            Err(err) => EvalOutcome::Failure(err),
        }
    }
}

impl fmt::Display for EvalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&NumberFormat::INVARIANT))
    }
}
