//! Error taxonomy shared by handlers, the execution engine and key dispatch.

use std::time::Duration;

use thiserror::Error;

/// Errors a handler returns from `change`/`execute`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler rejected the value it was given.
    #[error("invalid value: {0}")]
    Validation(String),
    /// The operation itself failed.
    #[error("{0}")]
    Execution(String),
}

impl HandlerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }
}

/// Terminal failure of one engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error(transparent)]
    Handler(#[from] HandlerError),
    #[error("operation timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
    #[error("operation cancelled")]
    Cancelled,
    #[error("handler panicked: {0}")]
    PanicRecovered(String),
}

/// A shortcut or navigation request addressed a slot that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("tab {tab} does not exist")]
    StaleTab { tab: usize },
    #[error("field {field} does not exist in tab {tab}")]
    StaleField { tab: usize, field: usize },
    #[error("field {field} in tab {tab} is {found:?}, expected {expected:?}")]
    HandlerMismatch {
        tab: usize,
        field: usize,
        expected: String,
        found: String,
    },
}
