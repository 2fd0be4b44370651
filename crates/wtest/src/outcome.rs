//! Assertion kinds and the classified outcome of one assertion

use crate::console::{Console, Tone};
use crate::error::EvalError;
use std::fmt;

/// The kind of check an assertion performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    Equal,
    NotEqual,
    EqualWithAccuracy,
    NotEqualWithAccuracy,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Nil,
    NotNil,
    True,
    False,
    Fail,
    ThrowsError,
}

impl Check {
    /// Name of the `Assert` operation performing this check
    pub fn name(self) -> &'static str {
        match self {
            Check::Equal => "equal",
            Check::NotEqual => "not_equal",
            Check::EqualWithAccuracy => "equal_with_accuracy",
            Check::NotEqualWithAccuracy => "not_equal_with_accuracy",
            Check::GreaterThan => "greater_than",
            Check::GreaterThanOrEqual => "greater_than_or_equal",
            Check::LessThan => "less_than",
            Check::LessThanOrEqual => "less_than_or_equal",
            Check::Nil => "is_nil",
            Check::NotNil => "not_nil",
            Check::True => "is_true",
            Check::False => "is_false",
            Check::Fail => "fail",
            Check::ThrowsError => "throws_error",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of evaluating one assertion
#[derive(Debug)]
pub enum Outcome {
    Success,
    /// The check ran and did not hold
    ExpectedFailure(Option<String>),
    /// An operand failed before the check could run
    UnexpectedFailure(EvalError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// False only for failures caused by an operand error
    pub fn expected(&self) -> bool {
        !matches!(self, Outcome::UnexpectedFailure(_))
    }

    /// Human-readable description of the outcome
    pub fn failure_description(&self) -> String {
        match self {
            Outcome::Success => "passed".to_string(),
            Outcome::ExpectedFailure(Some(details)) => format!("Failed: {}", details),
            Outcome::ExpectedFailure(None) => "Failed".to_string(),
            Outcome::UnexpectedFailure(error) => format!("threw error \"{}\"", error),
        }
    }

    /// Same as `failure_description`, with the `Failed:` marker painted red
    pub(crate) fn painted_description(&self, console: &Console) -> String {
        match self {
            Outcome::ExpectedFailure(Some(details)) => {
                format!("{} {}", console.paint("Failed:", Tone::Red), details)
            }
            other => other.failure_description(),
        }
    }
}
