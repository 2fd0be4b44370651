//! Test runner - execute discovered test methods and print the summary

use crate::assert::Assert;
use crate::case::{discover, TestCase, TestCaseType};
use crate::console::{Console, Tone};
use crate::error::{panic_message, RunError};
use crate::failure::{Failure, FailureHandler};
use crate::result::TestResult;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Method name reported when `Default` panics
const CONSTRUCTOR: &str = "default";

/// One invocation of a test method
#[derive(Debug)]
pub struct MethodRun {
    pub case: &'static str,
    pub method: &'static str,
    pub duration: Duration,
    /// Assertions that passed during this method
    pub passed: usize,
    /// Assertions that failed during this method
    pub failed: usize,
    /// Error or panic that escaped the method body
    pub error: Option<RunError>,
}

impl MethodRun {
    pub fn is_pass(&self) -> bool {
        self.failed == 0 && self.error.is_none()
    }
}

/// State shared by every test-case type during one run
pub(crate) struct Session<'r> {
    assert: Assert,
    filter: Option<&'r str>,
    runs: Vec<MethodRun>,
}

impl Session<'_> {
    fn selects(&self, method: &str) -> bool {
        self.filter.map_or(true, |pattern| method.contains(pattern))
    }

    fn report_error(&mut self, error: RunError) -> RunError {
        self.assert.result_mut().errors += 1;
        tracing::warn!(method = error.method(), "{}", error);
        let console = self.assert.console();
        console.write("\n");
        console.writeln(&console.paint(&error.to_string(), Tone::Red));
        error
    }
}

/// Test runner with configuration
///
/// Methods run sequentially on the calling thread. Panics escaping a method or
/// a `Default` impl are contained, but the process panic hook still prints
/// them to stderr; swap in a silent hook around [`TestRunner::run`] to keep
/// the progress line clean.
pub struct TestRunner {
    console: Console,
    failure_handler: Option<FailureHandler>,
    filter: Option<String>,
    runs: Vec<MethodRun>,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    /// Create a runner printing to stdout
    pub fn new() -> Self {
        Self {
            console: Console::stdout(),
            failure_handler: None,
            filter: None,
            runs: Vec::new(),
        }
    }

    /// Send all output to `console`
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// Disable colored output
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.console = self.console.with_no_color(no_color);
        self
    }

    /// Invoke `handler` with every failed assertion
    pub fn with_failure_handler(mut self, handler: impl Fn(&Failure) + 'static) -> Self {
        self.failure_handler = Some(Rc::new(handler));
        self
    }

    /// Only run test methods whose name contains `pattern`
    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(pattern.into());
        self
    }

    /// Method records of the most recent run.
    ///
    /// A type whose `Default` panicked contributes a single record named
    /// `default` carrying the error.
    pub fn runs(&self) -> &[MethodRun] {
        &self.runs
    }

    /// Run every test-case type in order and return the final counters.
    ///
    /// Counters start from zero on every call.
    pub fn run(&mut self, cases: &[TestCaseType]) -> TestResult {
        let started_at = Instant::now();
        self.console.writeln("Started");
        tracing::debug!(cases = cases.len(), "starting test run");

        let mut assert = Assert::new(self.console.clone());
        assert.set_failure_handler(self.failure_handler.clone());
        let mut session = Session {
            assert,
            filter: self.filter.as_deref(),
            runs: Vec::new(),
        };

        for case in cases {
            case.execute(&mut session);
            session.assert.result_mut().tests += 1;
        }

        let Session { assert, runs, .. } = session;
        let result = assert.into_result();
        self.runs = runs;

        self.print_summary(&result, started_at.elapsed());
        tracing::debug!(
            tests = result.tests,
            passed = result.passed,
            failed = result.failed,
            errors = result.errors,
            "test run finished"
        );
        result
    }

    fn print_summary(&self, result: &TestResult, elapsed: Duration) {
        self.console.write(&format!(
            "\nFinished in {} seconds.\n\n",
            format_seconds(elapsed.as_secs_f64())
        ));

        let line = result.to_string();
        let line = if result.failed > 0 {
            self.console.paint(&line, Tone::Red)
        } else if result.passed > 0 {
            self.console.paint(&line, Tone::Green)
        } else {
            line
        };
        self.console.writeln(&line);
    }
}

/// Instantiate `T` once and invoke each discovered method on it.
pub(crate) fn run_case<T: TestCase>(session: &mut Session<'_>) {
    let case = T::name();
    let methods: Vec<_> = discover::<T>()
        .into_iter()
        .filter(|method| session.selects(method.name))
        .collect();
    tracing::debug!(case, methods = methods.len(), "running test case");

    let mut instance = match panic::catch_unwind(T::default) {
        Ok(instance) => instance,
        Err(payload) => {
            let error = session.report_error(RunError::Panicked {
                case: case.to_string(),
                method: CONSTRUCTOR.to_string(),
                message: panic_message(payload),
            });
            session.runs.push(MethodRun {
                case,
                method: CONSTRUCTOR,
                duration: Duration::ZERO,
                passed: 0,
                failed: 0,
                error: Some(error),
            });
            return;
        }
    };

    for method in methods {
        session.assert.set_function(method.name);
        let before = session.assert.result();
        let started_at = Instant::now();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            method.invoke(&mut instance, &mut session.assert)
        }));
        let duration = started_at.elapsed();

        let error = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(source)) => Some(RunError::Failed {
                case: case.to_string(),
                method: method.name.to_string(),
                source,
            }),
            Err(payload) => Some(RunError::Panicked {
                case: case.to_string(),
                method: method.name.to_string(),
                message: panic_message(payload),
            }),
        };
        let error = error.map(|error| session.report_error(error));

        let after = session.assert.result();
        session.runs.push(MethodRun {
            case,
            method: method.name,
            duration,
            passed: after.passed - before.passed,
            failed: after.failed - before.failed,
            error,
        });
    }
}

/// Format seconds like C's `%.3g`: three significant digits, trailing zeros
/// trimmed, exponent form outside `1e-4 ..< 1e3`.
pub(crate) fn format_seconds(secs: f64) -> String {
    let scientific = format!("{:.2e}", secs);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return secs.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return secs.to_string();
    };

    if !(-4..3).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.abs()
        );
    }

    let decimals = (2 - exponent) as usize;
    trim_fraction(&format!("{:.*}", decimals, secs)).to_string()
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
