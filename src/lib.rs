// ============================================================================
// Bounded Calculator Library
// Single binary-expression evaluator with bounded fixed-point arithmetic
// ============================================================================

//! # Bounded Calc
//!
//! Evaluates exactly one `<number> <operator> <number>` expression at a time
//! under fixed range and precision limits.
//!
//! ## Features
//!
//! - **Strict parsing**: ASCII digits, `.` as the only fractional separator,
//!   at most 4 fractional digits, grouping commas rejected
//! - **Bounded arithmetic**: operands within ±1,000,000, results within
//!   ±1,000,000,000, overflow reported instead of wrapped
//! - **Banker's rounding** of the exact result to 4 fractional digits
//! - **Invariant formatting** with trailing zeros dropped
//!
//! ## Example
//!
//! ```rust
//! use bounded_calc::prelude::*;
//!
//! let outcome = bounded_calc::evaluate("12.5 * 3");
//! assert_eq!(outcome.to_string(), "37.5");
//!
//! let outcome = bounded_calc::evaluate("5 / 0");
//! assert_eq!(outcome.error(), Some(&EvalError::DivisionByZero));
//! assert_eq!(outcome.to_string(), "Error: division by zero is not allowed.");
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;

use std::sync::LazyLock;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        EvalError, EvalOutcome, EvaluatorConfig, NumberFormat, OperandError, Operator,
        ParsedExpression,
    };
    pub use crate::engine::{format, parse_operand, Evaluator, ExpressionParser};
    pub use crate::interfaces::{
        EvaluationEvent, EventHandler, LoggingEventHandler, NoOpEventHandler, Stage,
    };
    pub use crate::numeric::{Amount, ExactValue, FixedDecimal, NumericError};
}

static DEFAULT_EVALUATOR: LazyLock<engine::Evaluator> = LazyLock::new(engine::Evaluator::default);

/// Evaluate one expression with the default limits.
///
/// Pure with respect to its input; safe to call from any number of threads.
pub fn evaluate(text: &str) -> domain::EvalOutcome {
    DEFAULT_EVALUATOR.evaluate(text)
}
