//! Aggregate counters for a single run

use std::fmt;

/// Counters accumulated over one run.
///
/// `tests` counts test-case types, not methods. `passed` and `failed` count
/// assertion operations, so `passed + failed` is the number of assertions
/// evaluated. `errors` counts test methods whose body escaped with an error
/// or a panic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestResult {
    pub tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
}

impl TestResult {
    /// Total number of assertion operations evaluated
    pub fn assertions(&self) -> usize {
        self.passed + self.failed
    }

    /// True when nothing failed and no error escaped a test method
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tests, {} assertions, {} failures, {} errors",
            self.tests, self.passed, self.failed, self.errors
        )
    }
}
