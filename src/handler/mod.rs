//! Handler contracts.
//!
//! A field's behavior comes from exactly one handler. Each variant is its own trait over the
//! common [`Handler`] supertrait; [`HandlerFacade`] folds them into one call surface.

mod facade;

pub use facade::{HandlerFacade, HandlerKind, HandlerVariant, Operation};

use std::sync::Arc;
use std::time::Duration;

use crate::engine::OperationContext;
use crate::error::HandlerError;

pub trait Handler: Send + Sync + 'static {
    fn name(&self) -> String;

    /// Capability query for [`MessageTracker`], asked once when the handler is registered.
    ///
    /// Implementors that also implement `MessageTracker` override this with `Some(self)`.
    fn tracker(self: Arc<Self>) -> Option<Arc<dyn MessageTracker>> {
        None
    }
}

/// Lets a handler carry its correlation token across invocations so repeated operations
/// rewrite one ledger row instead of appending new ones.
pub trait MessageTracker: Send + Sync {
    fn last_operation_id(&self) -> String;
    fn set_last_operation_id(&self, id: &str);
}

/// Read-only field; its content is shown as soon as it is focused.
pub trait DisplayHandler: Handler {
    fn label(&self) -> String;
    fn content(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: char,
    pub value: String,
    pub description: String,
}

impl Shortcut {
    pub fn new(key: char, value: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
            description: description.into(),
        }
    }
}

pub trait EditHandler: Handler {
    fn label(&self) -> String;
    fn value(&self) -> String;
    fn change(&self, value: &str, ctx: &OperationContext) -> Result<(), HandlerError>;

    fn editable(&self) -> bool {
        true
    }

    /// Zero runs `change` inline on the UI loop.
    fn timeout(&self) -> Duration {
        Duration::ZERO
    }

    /// Global single-key shortcuts that apply a literal value to this field.
    fn shortcuts(&self) -> Vec<Shortcut> {
        Vec::new()
    }
}

/// Button-like field.
pub trait ExecutionHandler: Handler {
    fn label(&self) -> String;
    fn execute(&self, ctx: &OperationContext) -> Result<(), HandlerError>;

    fn timeout(&self) -> Duration {
        Duration::ZERO
    }
}

/// Append-only log sink. Never updates a previous line.
pub trait WriterHandler: Handler {}

/// Log sink that rewrites its previous line while it keeps reporting the same token.
pub trait TrackerWriterHandler: WriterHandler + MessageTracker {}

/// Field that shows content only through its progress sink and may ask for input.
pub trait InteractiveHandler: Handler {
    fn label(&self) -> String;
    fn value(&self) -> String;
    fn change(&self, value: &str, ctx: &OperationContext) -> Result<(), HandlerError>;

    /// True while the handler expects the user to type something.
    fn waiting_for_user(&self) -> bool;

    fn editable(&self) -> bool {
        self.waiting_for_user()
    }

    fn timeout(&self) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
#[path = "../../tests/unit/handler/facade.rs"]
mod tests;
