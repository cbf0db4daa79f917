// ============================================================================
// Numeric Module
// Fixed-point arithmetic for bounded decimal calculations
// ============================================================================
//
// This module provides:
// - FixedDecimal<D>: Fixed-point decimal with compile-time precision
// - ExactValue: Unrounded product/quotient, rounded half-to-even on demand
// - NumericError: Error types for arithmetic operations
// - Amount: the 4-digit alias used for operands and results
//
// Design principles:
// - No floating-point operations
// - All arithmetic returns Result (no panics)
// - i128 representation, so bounded operands never approach the limits
// - Compile-time configurable precision via const generics

mod errors;
mod exact;
mod fixed_decimal;

pub use errors::{NumericError, NumericResult};
pub use exact::ExactValue;
pub use fixed_decimal::{Amount, FixedDecimal, Normalized};
