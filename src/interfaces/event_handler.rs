// ============================================================================
// Event Handler Interface
// Defines the contract for observing evaluation progress
// ============================================================================

use crate::domain::{EvalError, Operator};
use crate::numeric::Amount;
use std::fmt;

/// Pipeline stage at which an evaluation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Input length check
    Length,
    /// Expression shape match
    Shape,
    /// Operand parsing
    Operand,
    /// Operand range check
    OperandRange,
    /// Arithmetic with overflow detection
    Arithmetic,
    /// Result range check
    ResultRange,
    /// Rounding to the result scale
    Rounding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Length => "length",
            Stage::Shape => "shape",
            Stage::Operand => "operand",
            Stage::OperandRange => "operand-range",
            Stage::Arithmetic => "arithmetic",
            Stage::ResultRange => "result-range",
            Stage::Rounding => "rounding",
        };
        f.write_str(name)
    }
}

/// Events emitted by the evaluator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationEvent {
    /// Input received, before any check
    Received { length: usize },

    /// Both operands parsed and within range
    OperandsAccepted {
        left: Amount,
        operator: Operator,
        right: Amount,
    },

    /// Evaluation finished with a value
    Completed { value: Amount },

    /// Evaluation stopped at `stage`
    Rejected { stage: Stage, error: EvalError },
}

/// Event handler trait for observing evaluations.
/// Implementations can handle logging, metrics, auditing, etc.
pub trait EventHandler: Send + Sync {
    /// Handle an evaluation event
    fn on_event(&self, event: EvaluationEvent);
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: EvaluationEvent) {}
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: EvaluationEvent) {
        match event {
            EvaluationEvent::Rejected { stage, error } if error.is_internal() => {
                tracing::error!(%stage, %error, "evaluation hit an internal error");
            }
            EvaluationEvent::Rejected { stage, error } => {
                tracing::debug!(%stage, %error, "evaluation rejected");
            }
            EvaluationEvent::Completed { value } => {
                tracing::trace!(value = %value.normalized(), "evaluation completed");
            }
            other => tracing::trace!("evaluator event: {:?}", other),
        }
    }
}
