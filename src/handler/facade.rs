use std::sync::Arc;
use std::time::Duration;

use super::{
    DisplayHandler, EditHandler, ExecutionHandler, InteractiveHandler, MessageTracker, Shortcut,
    TrackerWriterHandler, WriterHandler,
};
use crate::engine::OperationContext;
use crate::error::HandlerError;

#[derive(Clone)]
pub enum HandlerKind {
    Display(Arc<dyn DisplayHandler>),
    Edit(Arc<dyn EditHandler>),
    Execution(Arc<dyn ExecutionHandler>),
    Writer(Arc<dyn WriterHandler>),
    TrackerWriter(Arc<dyn TrackerWriterHandler>),
    Interactive(Arc<dyn InteractiveHandler>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerVariant {
    Display,
    Edit,
    Execution,
    Writer,
    TrackerWriter,
    Interactive,
}

impl HandlerVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            HandlerVariant::Display => "display",
            HandlerVariant::Edit => "edit",
            HandlerVariant::Execution => "execution",
            HandlerVariant::Writer => "writer",
            HandlerVariant::TrackerWriter => "tracker_writer",
            HandlerVariant::Interactive => "interactive",
        }
    }
}

/// What the engine should ask the handler to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Change(String),
    Execute,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Change(_) => "change",
            Operation::Execute => "execute",
        }
    }
}

/// `TrackerWriterHandler` already is a `MessageTracker`; this re-exposes it as one without
/// trait upcasting.
struct WriterTracker(Arc<dyn TrackerWriterHandler>);

impl MessageTracker for WriterTracker {
    fn last_operation_id(&self) -> String {
        self.0.last_operation_id()
    }

    fn set_last_operation_id(&self, id: &str) {
        self.0.set_last_operation_id(id);
    }
}

/// Uniform surface over every handler variant. Operations a variant does not support
/// return empty values or do nothing.
#[derive(Clone)]
pub struct HandlerFacade {
    kind: HandlerKind,
    name: String,
    tracker: Option<Arc<dyn MessageTracker>>,
}

impl HandlerFacade {
    pub fn new(kind: HandlerKind) -> Self {
        let (name, tracker) = match &kind {
            HandlerKind::Display(h) => (h.name(), Arc::clone(h).tracker()),
            HandlerKind::Edit(h) => (h.name(), Arc::clone(h).tracker()),
            HandlerKind::Execution(h) => (h.name(), Arc::clone(h).tracker()),
            HandlerKind::Writer(h) => (h.name(), Arc::clone(h).tracker()),
            HandlerKind::TrackerWriter(h) => {
                let tracker: Arc<dyn MessageTracker> = Arc::new(WriterTracker(Arc::clone(h)));
                (h.name(), Some(tracker))
            }
            HandlerKind::Interactive(h) => (h.name(), Arc::clone(h).tracker()),
        };
        tracing::debug!(
            handler = %name,
            variant = kind_variant(&kind).as_str(),
            tracking = tracker.is_some(),
            "handler registered"
        );
        Self {
            kind,
            name,
            tracker,
        }
    }

    pub fn display(handler: Arc<dyn DisplayHandler>) -> Self {
        Self::new(HandlerKind::Display(handler))
    }

    pub fn edit(handler: Arc<dyn EditHandler>) -> Self {
        Self::new(HandlerKind::Edit(handler))
    }

    pub fn execution(handler: Arc<dyn ExecutionHandler>) -> Self {
        Self::new(HandlerKind::Execution(handler))
    }

    pub fn writer(handler: Arc<dyn WriterHandler>) -> Self {
        Self::new(HandlerKind::Writer(handler))
    }

    pub fn tracker_writer(handler: Arc<dyn TrackerWriterHandler>) -> Self {
        Self::new(HandlerKind::TrackerWriter(handler))
    }

    pub fn interactive(handler: Arc<dyn InteractiveHandler>) -> Self {
        Self::new(HandlerKind::Interactive(handler))
    }

    pub fn kind(&self) -> &HandlerKind {
        &self.kind
    }

    pub fn variant(&self) -> HandlerVariant {
        kind_variant(&self.kind)
    }

    /// Cached at registration; handler names are not expected to change.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> String {
        match &self.kind {
            HandlerKind::Display(h) => h.label(),
            HandlerKind::Edit(h) => h.label(),
            HandlerKind::Execution(h) => h.label(),
            HandlerKind::Interactive(h) => h.label(),
            HandlerKind::Writer(_) | HandlerKind::TrackerWriter(_) => self.name.clone(),
        }
    }

    /// Text a renderer shows in the field's value slot.
    pub fn value(&self) -> String {
        match &self.kind {
            HandlerKind::Display(h) => h.content(),
            HandlerKind::Edit(h) => h.value(),
            HandlerKind::Execution(h) => h.label(),
            HandlerKind::Interactive(h) => h.value(),
            HandlerKind::Writer(_) | HandlerKind::TrackerWriter(_) => String::new(),
        }
    }

    pub fn content(&self) -> String {
        match &self.kind {
            HandlerKind::Display(h) => h.content(),
            _ => String::new(),
        }
    }

    pub fn editable(&self) -> bool {
        match &self.kind {
            HandlerKind::Edit(h) => h.editable(),
            HandlerKind::Interactive(h) => h.editable(),
            _ => false,
        }
    }

    pub fn timeout(&self) -> Duration {
        match &self.kind {
            HandlerKind::Edit(h) => h.timeout(),
            HandlerKind::Execution(h) => h.timeout(),
            HandlerKind::Interactive(h) => h.timeout(),
            _ => Duration::ZERO,
        }
    }

    pub fn waiting_for_user(&self) -> bool {
        match &self.kind {
            HandlerKind::Interactive(h) => h.waiting_for_user(),
            _ => false,
        }
    }

    pub fn shortcuts(&self) -> Vec<Shortcut> {
        match &self.kind {
            HandlerKind::Edit(h) => h.shortcuts(),
            _ => Vec::new(),
        }
    }

    pub fn is_writer(&self) -> bool {
        matches!(
            self.kind,
            HandlerKind::Writer(_) | HandlerKind::TrackerWriter(_)
        )
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.kind, HandlerKind::Interactive(_))
    }

    pub fn is_execution(&self) -> bool {
        matches!(self.kind, HandlerKind::Execution(_))
    }

    /// Whether the handler does anything for `op`.
    pub fn supports(&self, op: &Operation) -> bool {
        matches!(
            (&self.kind, op),
            (HandlerKind::Edit(_), Operation::Change(_))
                | (HandlerKind::Interactive(_), Operation::Change(_))
                | (HandlerKind::Execution(_), Operation::Execute)
        )
    }

    pub fn has_tracker(&self) -> bool {
        self.tracker.is_some()
    }

    /// Empty when the handler has no tracker or has not run yet.
    pub fn last_operation_id(&self) -> String {
        self.tracker
            .as_ref()
            .map(|t| t.last_operation_id())
            .unwrap_or_default()
    }

    pub fn set_last_operation_id(&self, id: &str) {
        if let Some(tracker) = &self.tracker {
            tracker.set_last_operation_id(id);
        }
    }

    /// Runs the handler body. Unsupported operations succeed without doing anything.
    pub fn invoke(&self, op: &Operation, ctx: &OperationContext) -> Result<(), HandlerError> {
        match (&self.kind, op) {
            (HandlerKind::Edit(h), Operation::Change(value)) => h.change(value, ctx),
            (HandlerKind::Interactive(h), Operation::Change(value)) => h.change(value, ctx),
            (HandlerKind::Execution(h), Operation::Execute) => h.execute(ctx),
            _ => Ok(()),
        }
    }
}

fn kind_variant(kind: &HandlerKind) -> HandlerVariant {
    match kind {
        HandlerKind::Display(_) => HandlerVariant::Display,
        HandlerKind::Edit(_) => HandlerVariant::Edit,
        HandlerKind::Execution(_) => HandlerVariant::Execution,
        HandlerKind::Writer(_) => HandlerVariant::Writer,
        HandlerKind::TrackerWriter(_) => HandlerVariant::TrackerWriter,
        HandlerKind::Interactive(_) => HandlerVariant::Interactive,
    }
}

impl std::fmt::Debug for HandlerFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFacade")
            .field("name", &self.name)
            .field("variant", &self.variant())
            .field("tracking", &self.tracker.is_some())
            .finish()
    }
}
