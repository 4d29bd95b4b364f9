//! devdash - keyboard-driven terminal dashboards for developer tools.
//!
//! Modules:
//! - handler: the six field kinds behind one `HandlerFacade`
//! - field / tab: fields with their edit buffers, grouped into tabs with a message ledger
//! - engine: inline and background execution with timeout and cancellation
//! - ledger: per-tab message rows, updated in place per operation
//! - app: `DevDash`, the editing state machine, navigation and shortcuts
//! - tui: crossterm/ratatui frontend (feature `tui`)

pub mod app;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod field;
pub mod handler;
pub mod ledger;
pub mod logging;
pub mod tab;
#[cfg(feature = "tui")]
pub mod tui;

pub use app::{DashView, DevDash, EventResult};
pub use config::DashConfig;
pub use engine::{OperationContext, ProgressSink};
pub use error::{DispatchError, HandlerError, OperationError};
pub use handler::{
    DisplayHandler, EditHandler, ExecutionHandler, Handler, HandlerFacade, InteractiveHandler,
    MessageTracker, Shortcut, TrackerWriterHandler, WriterHandler,
};
pub use ledger::{Fragment, MessageEntry, MessageLedger, MessageType};
pub use tab::{TabSection, TabWriter};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;
