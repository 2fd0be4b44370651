//! Assertion recorder
//!
//! Every operation takes its operands as zero-argument closures returning
//! `anyhow::Result<T>`. Operands are evaluated exactly once, inside a
//! `catch_unwind` boundary, so an operand that returns `Err` or panics is
//! recorded as an unexpected failure instead of escaping the test method.
//!
//! # API
//!
//! ## Equality
//! - `equal(a, b, msg)` / `not_equal(a, b, msg)` — any `PartialEq + Debug`
//!   value: options, vectors, slices, tuples, ranges, maps
//! - `equal_with_accuracy(a, b, acc, msg)` / `not_equal_with_accuracy(..)`
//!
//! ## Ordering
//! - `greater_than`, `greater_than_or_equal`, `less_than`, `less_than_or_equal`
//!
//! ## Option / bool
//! - `is_nil(v, msg)` / `not_nil(v, msg)`
//! - `is_true(v, msg)` / `is_false(v, msg)`
//!
//! ## Control
//! - `fail(msg)` — always fails
//! - `throws_error(op, msg, handler)` — passes iff `op` fails

use crate::console::Console;
use crate::error::{panic_message, EvalError};
use crate::failure::{Failure, FailureHandler, SourceLocation};
use crate::outcome::{Check, Outcome};
use crate::result::TestResult;
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe, Location};
use std::rc::Rc;

const UNKNOWN_FUNCTION: &str = "<unknown>";

/// Records assertion outcomes for one run.
///
/// The runner creates one `Assert` per run and passes it by `&mut` into every
/// test method; it owns the run's [`TestResult`].
///
/// Operand panics are caught, but the process panic hook still runs first and
/// writes its message (and a backtrace under `RUST_BACKTRACE`) to stderr.
/// Install a quiet hook with [`std::panic::set_hook`] for clean output.
pub struct Assert {
    result: TestResult,
    console: Console,
    failure_handler: Option<FailureHandler>,
    function: String,
}

impl Default for Assert {
    fn default() -> Self {
        Self::new(Console::default())
    }
}

impl Assert {
    pub fn new(console: Console) -> Self {
        Self {
            result: TestResult::default(),
            console,
            failure_handler: None,
            function: UNKNOWN_FUNCTION.to_string(),
        }
    }

    /// Register a callback invoked with every failed assertion
    pub fn with_failure_handler(mut self, handler: impl Fn(&Failure) + 'static) -> Self {
        self.failure_handler = Some(Rc::new(handler));
        self
    }

    pub(crate) fn set_failure_handler(&mut self, handler: Option<FailureHandler>) {
        self.failure_handler = handler;
    }

    /// Name reported as the function of subsequent failures
    pub fn set_function(&mut self, function: impl Into<String>) {
        self.function = function.into();
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    /// Snapshot of the counters so far
    pub fn result(&self) -> TestResult {
        self.result
    }

    pub(crate) fn result_mut(&mut self) -> &mut TestResult {
        &mut self.result
    }

    pub fn into_result(self) -> TestResult {
        self.result
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    // ========================================================================
    // Equality
    // ========================================================================

    #[track_caller]
    pub fn equal<T, A, B>(&mut self, lhs: A, rhs: B, message: &str) -> bool
    where
        T: PartialEq + Debug,
        A: FnOnce() -> anyhow::Result<T>,
        B: FnOnce() -> anyhow::Result<T>,
    {
        let location = Location::caller();
        let outcome = compare(lhs, rhs, |a, b| {
            if a == b {
                Outcome::Success
            } else {
                Outcome::ExpectedFailure(Some(format!("{:?} != {:?}", a, b)))
            }
        });
        self.record(Check::Equal, message, location, outcome)
    }

    #[track_caller]
    pub fn not_equal<T, A, B>(&mut self, lhs: A, rhs: B, message: &str) -> bool
    where
        T: PartialEq + Debug,
        A: FnOnce() -> anyhow::Result<T>,
        B: FnOnce() -> anyhow::Result<T>,
    {
        let location = Location::caller();
        let outcome = compare(lhs, rhs, |a, b| {
            if a != b {
                Outcome::Success
            } else {
                Outcome::ExpectedFailure(Some(format!("{:?} is equal to {:?}", a, b)))
            }
        });
        self.record(Check::NotEqual, message, location, outcome)
    }

    /// Passes iff `|lhs - rhs| <= |accuracy|`
    #[track_caller]
    pub fn equal_with_accuracy<T, A, B>(
        &mut self,
        lhs: A,
        rhs: B,
        accuracy: T,
        message: &str,
    ) -> bool
    where
        T: Into<f64> + Copy + Debug,
        A: FnOnce() -> anyhow::Result<T>,
        B: FnOnce() -> anyhow::Result<T>,
    {
        let location = Location::caller();
        let outcome = compare(lhs, rhs, |a, b| {
            if within(a, b, accuracy) {
                Outcome::Success
            } else {
                Outcome::ExpectedFailure(Some(format!(
                    "{:?} != {:?} +/- (\"{:?}\")",
                    a, b, accuracy
                )))
            }
        });
        self.record(Check::EqualWithAccuracy, message, location, outcome)
    }

    /// Passes iff `|lhs - rhs| > |accuracy|`
    #[track_caller]
    pub fn not_equal_with_accuracy<T, A, B>(
        &mut self,
        lhs: A,
        rhs: B,
        accuracy: T,
        message: &str,
    ) -> bool
    where
        T: Into<f64> + Copy + Debug,
        A: FnOnce() -> anyhow::Result<T>,
        B: FnOnce() -> anyhow::Result<T>,
    {
        let location = Location::caller();
        let outcome = compare(lhs, rhs, |a, b| {
            if within(a, b, accuracy) {
                Outcome::ExpectedFailure(Some(format!(
                    "{:?} is equal to {:?} +/- (\"{:?}\")",
                    a, b, accuracy
                )))
            } else {
                Outcome::Success
            }
        });
        self.record(Check::NotEqualWithAccuracy, message, location, outcome)
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    #[track_caller]
    pub fn greater_than<T, A, B>(&mut self, lhs: A, rhs: B, message: &str) -> bool
    where
        T: PartialOrd + Debug,
        A: FnOnce() -> anyhow::Result<T>,
        B: FnOnce() -> anyhow::Result<T>,
    {
        let location = Location::caller();
        let outcome = compare(lhs, rhs, |a, b| {
            ordered(a > b, || format!("{:?} is not greater than {:?}", a, b))
        });
        self.record(Check::GreaterThan, message, location, outcome)
    }

    #[track_caller]
    pub fn greater_than_or_equal<T, A, B>(&mut self, lhs: A, rhs: B, message: &str) -> bool
    where
        T: PartialOrd + Debug,
        A: FnOnce() -> anyhow::Result<T>,
        B: FnOnce() -> anyhow::Result<T>,
    {
        let location = Location::caller();
        let outcome = compare(lhs, rhs, |a, b| {
            ordered(a >= b, || format!("{:?} is less than {:?}", a, b))
        });
        self.record(Check::GreaterThanOrEqual, message, location, outcome)
    }

    #[track_caller]
    pub fn less_than<T, A, B>(&mut self, lhs: A, rhs: B, message: &str) -> bool
    where
        T: PartialOrd + Debug,
        A: FnOnce() -> anyhow::Result<T>,
        B: FnOnce() -> anyhow::Result<T>,
    {
        let location = Location::caller();
        let outcome = compare(lhs, rhs, |a, b| {
            ordered(a < b, || format!("{:?} is not less than {:?}", a, b))
        });
        self.record(Check::LessThan, message, location, outcome)
    }

    #[track_caller]
    pub fn less_than_or_equal<T, A, B>(&mut self, lhs: A, rhs: B, message: &str) -> bool
    where
        T: PartialOrd + Debug,
        A: FnOnce() -> anyhow::Result<T>,
        B: FnOnce() -> anyhow::Result<T>,
    {
        let location = Location::caller();
        let outcome = compare(lhs, rhs, |a, b| {
            ordered(a <= b, || format!("{:?} is greater than {:?}", a, b))
        });
        self.record(Check::LessThanOrEqual, message, location, outcome)
    }

    // ========================================================================
    // Option and bool
    // ========================================================================

    #[track_caller]
    pub fn is_nil<T, A>(&mut self, value: A, message: &str) -> bool
    where
        T: Debug,
        A: FnOnce() -> anyhow::Result<Option<T>>,
    {
        let location = Location::caller();
        let outcome = check(value, |v| match v {
            None => Outcome::Success,
            Some(inner) => Outcome::ExpectedFailure(Some(format!("{:?}", inner))),
        });
        self.record(Check::Nil, message, location, outcome)
    }

    #[track_caller]
    pub fn not_nil<T, A>(&mut self, value: A, message: &str) -> bool
    where
        A: FnOnce() -> anyhow::Result<Option<T>>,
    {
        let location = Location::caller();
        let outcome = check(value, |v| match v {
            Some(_) => Outcome::Success,
            None => Outcome::ExpectedFailure(None),
        });
        self.record(Check::NotNil, message, location, outcome)
    }

    #[track_caller]
    pub fn is_true<A>(&mut self, value: A, message: &str) -> bool
    where
        A: FnOnce() -> anyhow::Result<bool>,
    {
        let location = Location::caller();
        let outcome = check(value, flag);
        self.record(Check::True, message, location, outcome)
    }

    #[track_caller]
    pub fn is_false<A>(&mut self, value: A, message: &str) -> bool
    where
        A: FnOnce() -> anyhow::Result<bool>,
    {
        let location = Location::caller();
        let outcome = check(value, |v| flag(!v));
        self.record(Check::False, message, location, outcome)
    }

    // ========================================================================
    // Control
    // ========================================================================

    /// Record an unconditional failure
    #[track_caller]
    pub fn fail(&mut self, message: &str) -> bool {
        let location = Location::caller();
        self.record(Check::Fail, message, location, Outcome::ExpectedFailure(None))
    }

    /// Passes iff `operation` returns `Err` or panics; the captured error is
    /// handed to `handler`.
    #[track_caller]
    pub fn throws_error<T, F, H>(&mut self, operation: F, message: &str, handler: H) -> bool
    where
        F: FnOnce() -> anyhow::Result<T>,
        H: FnOnce(EvalError),
    {
        let location = Location::caller();
        let outcome = match evaluate(operation) {
            Ok(_) => Outcome::ExpectedFailure(Some("did not throw error".to_string())),
            Err(error) => {
                handler(error);
                Outcome::Success
            }
        };
        self.record(Check::ThrowsError, message, location, outcome)
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    fn record(
        &mut self,
        check: Check,
        message: &str,
        location: &'static Location<'static>,
        outcome: Outcome,
    ) -> bool {
        if outcome.is_success() {
            self.result.passed += 1;
            self.console.write(".");
            return true;
        }

        self.result.failed += 1;
        self.console.write("\n");

        let mut text = outcome.painted_description(&self.console);
        if !message.is_empty() {
            text.push_str(" - ");
            text.push_str(message);
        }
        self.console
            .log_at(location.file(), location.line(), &self.function, &text);

        let failure = Failure {
            check,
            message: message.to_string(),
            failure_description: outcome.failure_description(),
            expected: outcome.expected(),
            location: SourceLocation {
                file: location.file().to_string(),
                function: self.function.clone(),
                line: location.line(),
            },
        };
        tracing::debug!(
            check = check.name(),
            function = %failure.location.function,
            line = failure.location.line,
            expected = failure.expected,
            "assertion failed: {}",
            failure.failure_description
        );

        if let Some(handler) = &self.failure_handler {
            handler(&failure);
        }
        false
    }
}

// ============================================================================
// Evaluation helpers
// ============================================================================

/// Run an operand, turning `Err` and panics into an `EvalError`.
fn evaluate<T>(operand: impl FnOnce() -> anyhow::Result<T>) -> Result<T, EvalError> {
    match panic::catch_unwind(AssertUnwindSafe(operand)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(EvalError::Raised(error)),
        Err(payload) => Err(EvalError::Panicked(panic_message(payload))),
    }
}

fn check<T>(
    operand: impl FnOnce() -> anyhow::Result<T>,
    decide: impl FnOnce(T) -> Outcome,
) -> Outcome {
    match evaluate(operand) {
        Ok(value) => decide(value),
        Err(error) => Outcome::UnexpectedFailure(error),
    }
}

/// Evaluate `lhs` then `rhs`; `rhs` is skipped when `lhs` fails.
fn compare<T>(
    lhs: impl FnOnce() -> anyhow::Result<T>,
    rhs: impl FnOnce() -> anyhow::Result<T>,
    decide: impl FnOnce(&T, &T) -> Outcome,
) -> Outcome {
    let a = match evaluate(lhs) {
        Ok(value) => value,
        Err(error) => return Outcome::UnexpectedFailure(error),
    };
    let b = match evaluate(rhs) {
        Ok(value) => value,
        Err(error) => return Outcome::UnexpectedFailure(error),
    };
    decide(&a, &b)
}

fn ordered(holds: bool, details: impl FnOnce() -> String) -> Outcome {
    if holds {
        Outcome::Success
    } else {
        Outcome::ExpectedFailure(Some(details()))
    }
}

fn within<T: Into<f64> + Copy>(a: &T, b: &T, accuracy: T) -> bool {
    let distance = ((*a).into() - (*b).into()).abs();
    distance <= accuracy.into().abs()
}

fn flag(holds: bool) -> Outcome {
    if holds {
        Outcome::Success
    } else {
        Outcome::ExpectedFailure(None)
    }
}
