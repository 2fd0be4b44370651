//! Error types for operand evaluation and test method execution

use std::any::Any;
use thiserror::Error;

/// An operand (or an operation under `throws_error`) failed while being
/// evaluated inside an assertion.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error(transparent)]
    Raised(#[from] anyhow::Error),

    #[error("panicked: {0}")]
    Panicked(String),
}

/// An error that escaped a test method body.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("{case}.{method} returned an error: {source}")]
    Failed {
        case: String,
        method: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{case}.{method} panicked: {message}")]
    Panicked {
        case: String,
        method: String,
        message: String,
    },
}

impl RunError {
    /// Name of the test method the error escaped from
    pub fn method(&self) -> &str {
        match self {
            RunError::Failed { method, .. } | RunError::Panicked { method, .. } => method,
        }
    }
}

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
