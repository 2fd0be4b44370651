//! Runner integration tests: discovery, counting, output and colour

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::cell::RefCell;
use std::rc::Rc;
use wtest::{methods, Assert, Console, TestCase, TestCaseType, TestMethod, TestResult, TestRunner};

thread_local! {
    static INVOKED: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

fn invoked() -> Vec<&'static str> {
    INVOKED.with(|calls| calls.borrow().clone())
}

fn reset_invoked() {
    INVOKED.with(|calls| calls.borrow_mut().clear());
}

fn mark(name: &'static str) {
    INVOKED.with(|calls| calls.borrow_mut().push(name));
}

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Default)]
struct ArithmeticTests;

impl ArithmeticTests {
    fn test_addition(&mut self, t: &mut Assert) -> anyhow::Result<()> {
        mark("test_addition");
        t.equal(|| Ok(2 + 2), || Ok(4), "");
        Ok(())
    }

    fn helper_setup(&mut self, _t: &mut Assert) -> anyhow::Result<()> {
        mark("helper_setup");
        Ok(())
    }

    fn test_subtraction(&mut self, t: &mut Assert) -> anyhow::Result<()> {
        mark("test_subtraction");
        t.equal(|| Ok(5 - 3), || Ok(2), "");
        Ok(())
    }
}

impl TestCase for ArithmeticTests {
    fn methods() -> Vec<TestMethod<Self>> {
        methods![test_addition, helper_setup, test_subtraction]
    }
}

#[derive(Default)]
struct BrokenTests;

impl BrokenTests {
    fn test_wrong_sum(&mut self, t: &mut Assert) -> anyhow::Result<()> {
        mark("test_wrong_sum");
        t.equal(|| Ok(1 + 1), || Ok(3), "");
        Ok(())
    }
}

impl TestCase for BrokenTests {
    fn methods() -> Vec<TestMethod<Self>> {
        methods![test_wrong_sum]
    }
}

#[derive(Default)]
struct EmptyTests;

impl TestCase for EmptyTests {
    fn methods() -> Vec<TestMethod<Self>> {
        Vec::new()
    }
}

#[derive(Default)]
struct PanickingTests;

impl PanickingTests {
    fn test_operand_panics(&mut self, t: &mut Assert) -> anyhow::Result<()> {
        t.equal(|| -> anyhow::Result<u8> { panic!("operand blew up") }, || Ok(1), "");
        Ok(())
    }

    fn test_body_panics(&mut self, _t: &mut Assert) -> anyhow::Result<()> {
        panic!("body blew up");
    }
}

impl TestCase for PanickingTests {
    fn methods() -> Vec<TestMethod<Self>> {
        methods![test_operand_panics, test_body_panics]
    }
}

fn buffered_runner() -> (TestRunner, Console) {
    let console = Console::buffered();
    (TestRunner::new().with_console(console.clone()), console)
}

/// Replace the elapsed time so output can be compared verbatim
fn normalize(output: &str) -> String {
    output
        .lines()
        .map(|line| {
            if line.starts_with("Finished in ") {
                "Finished in <elapsed> seconds."
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Counting
// ============================================================================

#[test]
fn test_two_types_counting() {
    let (mut runner, _) = buffered_runner();
    let result = runner.run(&[
        TestCaseType::of::<ArithmeticTests>(),
        TestCaseType::of::<BrokenTests>(),
    ]);

    assert_eq!(
        result,
        TestResult {
            tests: 2,
            passed: 2,
            failed: 1,
            errors: 0,
        }
    );
}

#[test]
fn test_tests_counts_types_not_methods() {
    let (mut runner, _) = buffered_runner();
    let result = runner.run(&[
        TestCaseType::of::<ArithmeticTests>(),
        TestCaseType::of::<EmptyTests>(),
    ]);
    assert_eq!(result.tests, 2);
    assert_eq!(runner.runs().len(), 2);
}

#[test]
fn test_independent_runs_are_identical() {
    let cases = [
        TestCaseType::of::<ArithmeticTests>(),
        TestCaseType::of::<BrokenTests>(),
    ];
    let first = buffered_runner().0.run(&cases);
    let second = buffered_runner().0.run(&cases);
    assert_eq!(first, second);
}

// ============================================================================
// Discovery
// ============================================================================

#[test]
fn test_helper_never_invoked() {
    reset_invoked();
    let (mut runner, _) = buffered_runner();
    runner.run(&[TestCaseType::of::<ArithmeticTests>()]);

    let calls = invoked();
    assert_eq!(calls, vec!["test_addition", "test_subtraction"]);
    assert!(!calls.contains(&"helper_setup"));
}

#[test]
fn test_each_test_method_invoked_once_per_run() {
    reset_invoked();
    let (mut runner, _) = buffered_runner();
    runner.run(&[TestCaseType::of::<ArithmeticTests>()]);
    runner.run(&[TestCaseType::of::<ArithmeticTests>()]);

    let additions = invoked()
        .into_iter()
        .filter(|name| *name == "test_addition")
        .count();
    assert_eq!(additions, 2);
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_console_output_format() {
    let (mut runner, console) = buffered_runner();
    runner.run(&[
        TestCaseType::of::<ArithmeticTests>(),
        TestCaseType::of::<BrokenTests>(),
    ]);

    let output = console.contents().unwrap_or_default();
    let failure_line = output
        .lines()
        .find(|line| line.contains("test_wrong_sum"))
        .unwrap_or_default()
        .to_string();
    assert!(failure_line.starts_with("runner_tests.rs #"));
    assert!(failure_line.ends_with(" test_wrong_sum Failed: 2 != 3"));

    let expected = format!(
        "Started\n..\n{}\n\nFinished in <elapsed> seconds.\n\n2 tests, 2 assertions, 1 failures, 0 errors",
        failure_line
    );
    assert_eq!(normalize(&output), expected);
    assert!(output.ends_with("errors\n"));
}

#[test]
fn test_failure_handler_sees_every_failure() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut runner = TestRunner::new()
        .with_console(Console::buffered())
        .with_failure_handler(move |failure| sink.borrow_mut().push(failure.to_string()));

    runner.run(&[TestCaseType::of::<BrokenTests>()]);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains(": error: test_wrong_sum : Failed: 2 != 3"));
}

#[test]
#[serial]
fn test_silent_panic_hook_keeps_results() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));
    let (mut runner, console) = buffered_runner();
    let result = runner.run(&[TestCaseType::of::<PanickingTests>()]);
    std::panic::set_hook(previous);

    assert_eq!(
        result,
        TestResult {
            tests: 1,
            passed: 0,
            failed: 1,
            errors: 1,
        }
    );
    let output = console.contents().unwrap_or_default();
    assert!(output.contains("threw error \"panicked: operand blew up\""));
    assert!(output.contains("PanickingTests.test_body_panics panicked: body blew up"));
}

// ============================================================================
// Colour
// ============================================================================

fn colored_run(cases: &[TestCaseType]) -> String {
    colored::control::set_override(true);
    let console = Console::buffered().with_no_color(false);
    TestRunner::new()
        .with_console(console.clone())
        .run(cases);
    colored::control::unset_override();
    console.contents().unwrap_or_default()
}

fn summary_line(output: &str) -> &str {
    output.lines().last().unwrap_or_default()
}

#[test]
#[serial]
fn test_summary_colored_on_failure() {
    let output = colored_run(&[TestCaseType::of::<BrokenTests>()]);
    let summary = summary_line(&output);
    assert!(summary.starts_with("\u{1b}["), "summary: {:?}", summary);
    assert!(summary.contains("1 tests, 0 assertions, 1 failures, 0 errors"));
}

#[test]
#[serial]
fn test_summary_colored_on_success() {
    let output = colored_run(&[TestCaseType::of::<ArithmeticTests>()]);
    let summary = summary_line(&output);
    assert!(summary.starts_with("\u{1b}["), "summary: {:?}", summary);
    assert!(summary.contains("1 tests, 2 assertions, 0 failures, 0 errors"));
}

#[test]
#[serial]
fn test_summary_plain_without_assertions() {
    let output = colored_run(&[TestCaseType::of::<EmptyTests>()]);
    assert_eq!(
        summary_line(&output),
        "1 tests, 0 assertions, 0 failures, 0 errors"
    );
}

#[test]
#[serial]
fn test_no_color_strips_failure_segments() {
    colored::control::set_override(true);
    let console = Console::buffered();
    TestRunner::new()
        .with_console(console.clone())
        .with_no_color(true)
        .run(&[TestCaseType::of::<BrokenTests>()]);
    colored::control::unset_override();

    assert!(!console.contents().unwrap_or_default().contains('\u{1b}'));
}
