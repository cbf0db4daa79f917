// ============================================================================
// Evaluator
// Runs one expression through every stage, stopping at the first failure
// ============================================================================
//
// Input -> length -> shape -> operand x2 -> operand range
//       -> arithmetic -> result range -> rounding -> Output

use super::operand::{parse_operand, validate_operands};
use super::parser::ExpressionParser;
use crate::domain::{EvalError, EvalOutcome, EvaluatorConfig, Operator};
use crate::interfaces::{EvaluationEvent, EventHandler, LoggingEventHandler, Stage};
use crate::numeric::{Amount, ExactValue, NumericError};
use std::sync::Arc;

/// Apply `operator` to two validated operands, returning the exact result.
///
/// # Errors
/// - `DivisionByZero` when dividing by zero
/// - `ArithmeticOverflow` when an intermediate value does not fit
pub fn apply(operator: Operator, left: Amount, right: Amount) -> Result<ExactValue, EvalError> {
    let result = match operator {
        Operator::Add => left.checked_add(right).map(ExactValue::from),
        Operator::Subtract => left.checked_sub(right).map(ExactValue::from),
        Operator::Multiply => left.checked_mul(right),
        Operator::Divide => {
            if right.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            left.checked_div(right)
        }
    };

    result.map_err(|err| match err {
        err if err.is_range_error() => EvalError::ArithmeticOverflow,
        NumericError::DivisionByZero => EvalError::DivisionByZero,
        other => EvalError::Internal(format!("unexpected arithmetic failure: {other}")),
    })
}

/// Check the exact result against the result bound, then round it
/// half-to-even to the configured number of fractional digits.
///
/// # Errors
/// - `ResultOutOfRange` when `|exact|` is above the bound
/// - `ArithmeticOverflow` if rounding cannot be represented
pub fn round_result(exact: ExactValue, config: &EvaluatorConfig) -> Result<Amount, EvalError> {
    if exact.exceeds(config.result_bound) {
        return Err(EvalError::ResultOutOfRange {
            bound: config.result_bound,
        });
    }

    exact
        .round_half_even_to(config.max_fraction_digits)
        .map_err(|err| match err {
            NumericError::PrecisionLoss => EvalError::Internal(format!(
                "cannot round to {} fractional digits",
                config.max_fraction_digits
            )),
            _ => EvalError::ArithmeticOverflow,
        })
}

/// Evaluates `<number> <operator> <number>` expressions.
///
/// Holds only immutable state, so one instance can be shared across threads.
#[derive(Clone)]
pub struct Evaluator {
    config: EvaluatorConfig,
    parser: ExpressionParser,
    event_handler: Arc<dyn EventHandler>,
}

impl Evaluator {
    /// Create an evaluator, validating the configuration first.
    pub fn new(config: EvaluatorConfig) -> Result<Self, String> {
        config.validate()?;
        let parser = ExpressionParser::new(&config)?;

        Ok(Self {
            config,
            parser,
            event_handler: Arc::new(LoggingEventHandler),
        })
    }

    /// Replace the event handler (logging by default).
    pub fn with_event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate one expression. Never panics on user input.
    pub fn evaluate(&self, input: &str) -> EvalOutcome {
        self.event_handler.on_event(EvaluationEvent::Received {
            length: input.chars().count(),
        });

        match self.run(input) {
            Ok(value) => {
                self.event_handler
                    .on_event(EvaluationEvent::Completed { value });
                EvalOutcome::Success(value)
            }
            Err((stage, error)) => {
                self.event_handler.on_event(EvaluationEvent::Rejected {
                    stage,
                    error: error.clone(),
                });
                EvalOutcome::Failure(error)
            }
        }
    }

    fn run(&self, input: &str) -> Result<Amount, (Stage, EvalError)> {
        let expression = self.parser.parse(input).map_err(|err| {
            let stage = match err {
                EvalError::InputTooLong { .. } => Stage::Length,
                _ => Stage::Shape,
            };
            (stage, err)
        })?;

        let left = parse_operand(&expression.left, &self.config);
        let right = parse_operand(&expression.right, &self.config);

        // Malformed operands are reported before oversized ones
        for side in [&left, &right] {
            if let Err(err) = side {
                if !err.is_too_large() {
                    return Err((Stage::Operand, EvalError::from(err.clone())));
                }
            }
        }
        let (Ok(left), Ok(right)) = (left, right) else {
            return Err((
                Stage::OperandRange,
                EvalError::OperandOutOfRange {
                    bound: self.config.operand_bound,
                },
            ));
        };

        validate_operands(left, right, &self.config).map_err(|err| (Stage::OperandRange, err))?;

        self.event_handler.on_event(EvaluationEvent::OperandsAccepted {
            left,
            operator: expression.operator,
            right,
        });

        let exact =
            apply(expression.operator, left, right).map_err(|err| (Stage::Arithmetic, err))?;

        round_result(exact, &self.config).map_err(|err| {
            let stage = match err {
                EvalError::ResultOutOfRange { .. } => Stage::ResultRange,
                _ => Stage::Rounding,
            };
            (stage, err)
        })
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvaluatorConfig::default()).expect("default configuration is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OperandError;
    use parking_lot::Mutex;
    use proptest::prelude::*;
    use rust_decimal::{Decimal, RoundingStrategy};

    fn eval(input: &str) -> EvalOutcome {
        Evaluator::default().evaluate(input)
    }

    fn ok(input: &str) -> String {
        match eval(input) {
            EvalOutcome::Success(value) => value.normalized().to_string(),
            EvalOutcome::Failure(err) => panic!("{input:?} failed: {err}"),
        }
    }

    fn err(input: &str) -> EvalError {
        match eval(input) {
            EvalOutcome::Success(value) => panic!("{input:?} unexpectedly gave {value}"),
            EvalOutcome::Failure(err) => err,
        }
    }

    fn amount(text: &str) -> Amount {
        text.parse().unwrap()
    }

    /// Records every event for inspection
    #[derive(Default)]
    struct RecordingEventHandler {
        events: Mutex<Vec<EvaluationEvent>>,
    }

    impl EventHandler for RecordingEventHandler {
        fn on_event(&self, event: EvaluationEvent) {
            self.events.lock().push(event);
        }
    }

    // ========================================================================
    // Stage functions
    // ========================================================================

    #[test]
    fn test_apply_each_operator() {
        let six = amount("6");
        let four = amount("4");

        let cases = [
            (Operator::Add, "10"),
            (Operator::Subtract, "2"),
            (Operator::Multiply, "24"),
            (Operator::Divide, "1.5"),
        ];
        for (op, expected) in cases {
            let exact = apply(op, six, four).unwrap();
            let rounded: Amount = exact.round_half_even().unwrap();
            assert_eq!(rounded.normalized().to_string(), expected, "{op}");
        }
    }

    #[test]
    fn test_apply_division_by_zero() {
        assert_eq!(
            apply(Operator::Divide, Amount::ONE, Amount::ZERO),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn test_apply_reports_overflow() {
        assert_eq!(
            apply(Operator::Multiply, Amount::MAX, Amount::MAX),
            Err(EvalError::ArithmeticOverflow)
        );
        assert_eq!(
            apply(Operator::Multiply, Amount::MAX, Amount::MIN),
            Err(EvalError::ArithmeticOverflow)
        );
        assert_eq!(
            apply(Operator::Add, Amount::MAX, Amount::ONE),
            Err(EvalError::ArithmeticOverflow)
        );
        assert_eq!(
            apply(Operator::Subtract, Amount::MIN, Amount::ONE),
            Err(EvalError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_round_result_bound_is_checked_before_rounding() {
        let config = EvaluatorConfig::default();
        // 1,000,000,000.00004 rounds to the bound but is already beyond it
        let exact = ExactValue::new(100_000_000_000_004, 100_000).unwrap();
        assert_eq!(
            round_result(exact, &config),
            Err(EvalError::ResultOutOfRange {
                bound: 1_000_000_000
            })
        );

        let at_bound = ExactValue::new(-1_000_000_000, 1).unwrap();
        assert_eq!(
            round_result(at_bound, &config).unwrap(),
            amount("-1000000000")
        );
    }

    // ========================================================================
    // Full pipeline
    // ========================================================================

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(ok("12.5 * 3"), "37.5");
        assert_eq!(ok("1 + 2"), "3");
        assert_eq!(ok("1.5 - 2.25"), "-0.75");
        assert_eq!(ok("-4 / 2"), "-2");
        assert_eq!(ok("  7 -  -3  "), "10");
        assert_eq!(ok("0.1 + 0.2"), "0.3");
    }

    #[test]
    fn test_division_rounding() {
        assert_eq!(ok("1 / 3"), "0.3333");
        assert_eq!(ok("2 / 3"), "0.6667");
        assert_eq!(ok("-1 / 3"), "-0.3333");
        assert_eq!(ok("1 / 8"), "0.125");
        assert_eq!(ok("0.0001 / 1000000"), "0");
    }

    #[test]
    fn test_bankers_rounding_on_products() {
        // exact 0.00005 -> 0
        assert_eq!(ok("0.0001 * 0.5"), "0");
        // exact 0.00015 -> 0.0002
        assert_eq!(ok("0.0003 * 0.5"), "0.0002");
        // exact 0.00025 -> 0.0002
        assert_eq!(ok("0.0005 * 0.5"), "0.0002");
        // exact -0.00015 -> -0.0002
        assert_eq!(ok("-0.0003 * 0.5"), "-0.0002");
        // exact 0.00005 via division
        assert_eq!(ok("0.0001 / 2"), "0");
        assert_eq!(ok("0.0003 / 2"), "0.0002");
    }

    #[test]
    fn test_tiny_negative_result_keeps_sign() {
        assert_eq!(ok("0 - 0.0001"), "-0.0001");
        assert_eq!(ok("-0.0001 * 1"), "-0.0001");
    }

    #[test]
    fn test_error_order_and_kinds() {
        assert_eq!(err(&"1".repeat(101)), EvalError::InputTooLong { max: 100 });
        assert_eq!(
            err("1 + 2 + 3"),
            EvalError::MalformedExpression { separator: '.' }
        );
        assert_eq!(
            err("1.12345 + 1"),
            EvalError::InvalidOperand(OperandError::TooManyFractionDigits { max: 4 })
        );
        assert_eq!(
            err("1000000.0001 + 1"),
            EvalError::OperandOutOfRange { bound: 1_000_000 }
        );
        assert_eq!(
            err("1 + -1000001"),
            EvalError::OperandOutOfRange { bound: 1_000_000 }
        );
        assert_eq!(err("5 / 0"), EvalError::DivisionByZero);
        assert_eq!(err("5 / -0.0000"), EvalError::DivisionByZero);
        assert_eq!(
            err("1000000 * 1001"),
            EvalError::ResultOutOfRange {
                bound: 1_000_000_000
            }
        );
        assert_eq!(
            err("1000000 / 0.0001"),
            EvalError::ResultOutOfRange {
                bound: 1_000_000_000
            }
        );
    }

    #[test]
    fn test_huge_integer_operand_is_out_of_range() {
        let huge = "1".repeat(40);
        assert_eq!(
            err(&format!("{huge} + 1")),
            EvalError::OperandOutOfRange { bound: 1_000_000 }
        );
        assert_eq!(
            err(&format!("1 * -{huge}.25")),
            EvalError::OperandOutOfRange { bound: 1_000_000 }
        );
        // A malformed operand on either side still wins
        assert_eq!(
            err(&format!("{huge} + 1.00001")),
            EvalError::InvalidOperand(OperandError::TooManyFractionDigits { max: 4 })
        );
        assert_eq!(
            eval(&format!("{huge} - 2")).to_string(),
            "Error: operands must be within the allowed range of [-1,000,000, 1,000,000]."
        );
    }

    #[test]
    fn test_comma_is_never_a_decimal_point() {
        let outcome = eval("1,5 + 2");
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.error(),
            Some(&EvalError::InvalidOperand(
                OperandError::GroupingSeparator { separator: '.' }
            ))
        );
        assert_eq!(
            outcome.to_string(),
            "Error: use `.` as the fractional separator"
        );
    }

    #[test]
    fn test_operand_range_boundaries() {
        assert_eq!(ok("1000000 + 0"), "1000000");
        assert_eq!(ok("-1000000 - 0"), "-1000000");
        assert_eq!(ok("1000000 * 1000"), "1000000000");
        assert_eq!(ok("-1000000 * 1000"), "-1000000000");
        assert_eq!(
            err("1000000 * -1000000"),
            EvalError::ResultOutOfRange {
                bound: 1_000_000_000
            }
        );
    }

    #[test]
    fn test_events_describe_the_run() {
        let recorder = Arc::new(RecordingEventHandler::default());
        let evaluator = Evaluator::default().with_event_handler(recorder.clone());

        evaluator.evaluate("2 * 3");
        evaluator.evaluate("2 / 0");

        let events = recorder.events.lock();
        assert_eq!(
            events.as_slice(),
            &[
                EvaluationEvent::Received { length: 5 },
                EvaluationEvent::OperandsAccepted {
                    left: amount("2"),
                    operator: Operator::Multiply,
                    right: amount("3"),
                },
                EvaluationEvent::Completed { value: amount("6") },
                EvaluationEvent::Received { length: 5 },
                EvaluationEvent::OperandsAccepted {
                    left: amount("2"),
                    operator: Operator::Divide,
                    right: Amount::ZERO,
                },
                EvaluationEvent::Rejected {
                    stage: Stage::Arithmetic,
                    error: EvalError::DivisionByZero,
                },
            ]
        );
    }

    #[test]
    fn test_rejection_stages() {
        let recorder = Arc::new(RecordingEventHandler::default());
        let evaluator = Evaluator::default().with_event_handler(recorder.clone());

        let cases = [
            ("9".repeat(101), Stage::Length),
            ("nope".to_string(), Stage::Shape),
            ("1,5 + 1".to_string(), Stage::Shape),
            ("1.00001 + 1".to_string(), Stage::Operand),
            ("2000000 + 1".to_string(), Stage::OperandRange),
            ("1 / 0".to_string(), Stage::Arithmetic),
            ("1000000 * 1000000".to_string(), Stage::ResultRange),
        ];
        for (input, _) in &cases {
            evaluator.evaluate(input);
        }

        let stages: Vec<Stage> = recorder
            .events
            .lock()
            .iter()
            .filter_map(|event| match event {
                EvaluationEvent::Rejected { stage, .. } => Some(*stage),
                _ => None,
            })
            .collect();
        let expected: Vec<Stage> = cases.iter().map(|(_, stage)| *stage).collect();
        assert_eq!(stages, expected);
    }

    #[test]
    fn test_custom_limits() {
        let config = EvaluatorConfig::new()
            .with_max_fraction_digits(2)
            .with_operand_bound(100)
            .with_result_bound(1_000);
        let evaluator = Evaluator::new(config).unwrap();

        assert_eq!(
            evaluator.evaluate("1 / 8").value().unwrap().normalized().to_string(),
            "0.12"
        );
        assert_eq!(
            evaluator.evaluate("101 + 1").error(),
            Some(&EvalError::OperandOutOfRange { bound: 100 })
        );
        assert_eq!(
            evaluator.evaluate("100 * 11").error(),
            Some(&EvalError::ResultOutOfRange { bound: 1_000 })
        );
        assert_eq!(
            evaluator.evaluate("100 * 11").to_string(),
            "Error: result exceeds the allowed range of [-1,000, 1,000]."
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Evaluator::new(EvaluatorConfig::new().with_max_input_len(0)).is_err());
    }

    #[test]
    fn test_shared_across_threads() {
        let evaluator = Evaluator::default();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (1..=8i32)
                .map(|i| {
                    let evaluator = &evaluator;
                    scope.spawn(move || evaluator.evaluate(&format!("{i} * {i}")))
                })
                .collect();
            for (i, handle) in (1..=8i32).zip(handles) {
                let outcome = handle.join().unwrap();
                assert_eq!(outcome.to_string(), (i * i).to_string());
            }
        });
    }

    // ========================================================================
    // Properties
    // ========================================================================

    const OPERAND_RAW_BOUND: i128 = 1_000_000 * 10_000;

    fn operand_text(raw: i128) -> String {
        Amount::from_raw(raw).normalized().to_string()
    }

    fn decimal(raw: i128) -> Decimal {
        Decimal::from_i128_with_scale(raw, 4)
    }

    proptest! {
        #[test]
        fn prop_matches_exact_arithmetic(
            a in -OPERAND_RAW_BOUND..=OPERAND_RAW_BOUND,
            b in -OPERAND_RAW_BOUND..=OPERAND_RAW_BOUND,
            op_index in 0usize..4,
        ) {
            let op = Operator::ALL[op_index];
            let input = format!("{} {} {}", operand_text(a), op, operand_text(b));
            let outcome = Evaluator::default().evaluate(&input);

            let (x, y) = (decimal(a), decimal(b));
            let exact = match op {
                Operator::Add => x.checked_add(y),
                Operator::Subtract => x.checked_sub(y),
                Operator::Multiply => x.checked_mul(y),
                Operator::Divide => x.checked_div(y),
            };

            match exact {
                None => {
                    prop_assert_eq!(outcome.error(), Some(&EvalError::DivisionByZero));
                }
                Some(exact) if exact.abs() > Decimal::from(1_000_000_000) => {
                    prop_assert_eq!(
                        outcome.error(),
                        Some(&EvalError::ResultOutOfRange { bound: 1_000_000_000 })
                    );
                }
                Some(exact) => {
                    let expected =
                        exact.round_dp_with_strategy(4, RoundingStrategy::MidpointNearestEven);
                    let value = outcome.value().expect("in-range expression succeeds");
                    prop_assert_eq!(value.to_decimal().unwrap(), expected);
                }
            }
        }

        #[test]
        fn prop_out_of_range_operands_fail(
            over in (OPERAND_RAW_BOUND + 1)..(OPERAND_RAW_BOUND * 1_000),
            other in -OPERAND_RAW_BOUND..=OPERAND_RAW_BOUND,
            negate in any::<bool>(),
            on_left in any::<bool>(),
            op_index in 0usize..4,
        ) {
            let over = if negate { -over } else { over };
            let (left, right) = if on_left { (over, other) } else { (other, over) };
            let input = format!(
                "{} {} {}",
                operand_text(left),
                Operator::ALL[op_index],
                operand_text(right)
            );
            let outcome = Evaluator::default().evaluate(&input);
            prop_assert_eq!(
                outcome.error(),
                Some(&EvalError::OperandOutOfRange { bound: 1_000_000 })
            );
        }

        #[test]
        fn prop_oversized_integers_are_out_of_range(
            digits in "[1-9][0-9]{39,60}",
            negate in any::<bool>(),
            on_left in any::<bool>(),
            op_index in 0usize..4,
        ) {
            let huge = if negate { format!("-{digits}") } else { digits };
            let (left, right) = if on_left {
                (huge.as_str(), "1")
            } else {
                ("1", huge.as_str())
            };
            let input = format!("{} {} {}", left, Operator::ALL[op_index], right);
            let outcome = Evaluator::default().evaluate(&input);
            prop_assert_eq!(
                outcome.error(),
                Some(&EvalError::OperandOutOfRange { bound: 1_000_000 })
            );
        }

        #[test]
        fn prop_formatted_result_reparses(
            a in -OPERAND_RAW_BOUND..=OPERAND_RAW_BOUND,
            b in 1i128..=OPERAND_RAW_BOUND,
            op_index in 0usize..4,
        ) {
            let config = EvaluatorConfig::default();
            let input = format!(
                "{} {} {}",
                operand_text(a),
                Operator::ALL[op_index],
                operand_text(b)
            );
            if let EvalOutcome::Success(value) = Evaluator::default().evaluate(&input) {
                if !value.exceeds(config.operand_bound) {
                    let text = crate::engine::format(value, &config.format);
                    prop_assert_eq!(parse_operand(&text, &config), Ok(value));
                }
            }
        }
    }
}
