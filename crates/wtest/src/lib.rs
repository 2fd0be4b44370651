//! wtest - a small unit-testing toolkit
//!
//! Two pieces:
//! - [`Assert`], the assertion recorder: each operation evaluates its deferred
//!   operands, classifies the check as pass, expected failure or unexpected
//!   failure, updates the run's [`TestResult`] and prints a progress dot or a
//!   failure line with its source location.
//! - [`TestRunner`], which takes an ordered list of [`TestCaseType`]s, runs
//!   every registered method whose name starts with `"test"` on a single
//!   default-constructed instance, and prints a summary.
//!
//! # Example
//!
//! ```no_run
//! use wtest::{methods, Assert, TestCase, TestCaseType, TestMethod};
//!
//! #[derive(Default)]
//! struct StringTests;
//!
//! impl StringTests {
//!     fn test_concat(&mut self, t: &mut Assert) -> anyhow::Result<()> {
//!         t.equal(|| Ok(format!("{}{}", "a", "b")), || Ok("ab".to_string()), "");
//!         Ok(())
//!     }
//!
//!     fn test_parse(&mut self, t: &mut Assert) -> anyhow::Result<()> {
//!         t.throws_error(|| Ok("x1".parse::<i32>()?), "", |_| {});
//!         Ok(())
//!     }
//! }
//!
//! impl TestCase for StringTests {
//!     fn methods() -> Vec<TestMethod<Self>> {
//!         methods![test_concat, test_parse]
//!     }
//! }
//!
//! let result = wtest::run(&[TestCaseType::of::<StringTests>()]);
//! assert_eq!(result.failed, 0);
//! ```

pub mod assert;
pub mod case;
pub mod console;
pub mod error;
pub mod failure;
pub mod outcome;
pub mod result;
pub mod runner;

pub use assert::Assert;
pub use case::{discover, TestCase, TestCaseType, TestMethod, TEST_PREFIX};
pub use console::Console;
pub use error::{EvalError, RunError};
pub use failure::{Failure, FailureHandler, SourceLocation};
pub use outcome::{Check, Outcome};
pub use result::TestResult;
pub use runner::{MethodRun, TestRunner};

/// Run `cases` with default settings, printing to stdout
pub fn run(cases: &[TestCaseType]) -> TestResult {
    TestRunner::new().run(cases)
}
