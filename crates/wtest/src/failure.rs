//! Structured failure records handed to the failure handler

use crate::outcome::Check;
use std::fmt;
use std::rc::Rc;

/// Callback invoked with every failed assertion
pub type FailureHandler = Rc<dyn Fn(&Failure)>;

/// Where an assertion was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub function: String,
    pub line: u32,
}

/// One failed assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub check: Check,
    /// Message supplied by the caller, empty if none
    pub message: String,
    pub failure_description: String,
    /// False when the failure came from an operand error rather than a mismatch
    pub expected: bool,
    pub location: SourceLocation,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}error: {} : {}",
            self.location.file,
            self.location.line,
            if self.expected { "" } else { "unexpected " },
            self.location.function,
            self.failure_description
        )?;
        if !self.message.is_empty() {
            write!(f, " - {}", self.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(expected: bool, message: &str) -> Failure {
        Failure {
            check: Check::Equal,
            message: message.to_string(),
            failure_description: "Failed: 1 != 2".to_string(),
            expected,
            location: SourceLocation {
                file: "tests/math.rs".to_string(),
                function: "test_addition".to_string(),
                line: 7,
            },
        }
    }

    #[test]
    fn test_display_expected() {
        assert_eq!(
            failure(true, "sums differ").to_string(),
            "tests/math.rs:7: error: test_addition : Failed: 1 != 2 - sums differ"
        );
    }

    #[test]
    fn test_display_unexpected_without_message() {
        assert_eq!(
            failure(false, "").to_string(),
            "tests/math.rs:7: unexpected error: test_addition : Failed: 1 != 2"
        );
    }
}
