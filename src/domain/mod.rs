// ============================================================================
// Domain Models Module
// Expression model, evaluator limits and evaluation outcomes
// ============================================================================

pub mod config;
pub mod expression;
pub mod outcome;

pub use config::{EvaluatorConfig, NumberFormat};
pub use expression::{Operator, ParsedExpression};
pub use outcome::{EvalError, EvalOutcome, OperandError};
