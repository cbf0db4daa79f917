// ============================================================================
// Engine Module
// Contains the expression evaluation pipeline
// ============================================================================

mod evaluator;
mod formatter;
mod operand;
mod parser;

pub use evaluator::{apply, round_result, Evaluator};
pub use formatter::format;
pub use operand::{parse_operand, validate_operands};
pub use parser::ExpressionParser;
