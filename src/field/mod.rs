//! A handler bound to one slot of a tab, plus the transient edit and async state the UI
//! loop keeps for it.

mod buffer;

pub use buffer::EditBuffer;

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::handler::HandlerFacade;

/// Position of a field: tab index and field index within the tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldAddress {
    pub tab: usize,
    pub field: usize,
}

impl FieldAddress {
    pub fn new(tab: usize, field: usize) -> Self {
        Self { tab, field }
    }
}

#[derive(Debug, Default)]
pub struct AsyncState {
    is_running: bool,
    operation_id: String,
    cancel: Option<CancellationToken>,
    start_time: Option<Instant>,
}

impl AsyncState {
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub(crate) fn start(&mut self, operation_id: &str, cancel: CancellationToken) {
        self.is_running = true;
        self.operation_id = operation_id.to_string();
        self.cancel = Some(cancel);
        self.start_time = Some(Instant::now());
    }

    /// Requests cancellation of the in-flight operation. Returns false when idle.
    pub(crate) fn cancel(&self) -> bool {
        match (&self.cancel, self.is_running) {
            (Some(token), true) => {
                token.cancel();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug)]
pub struct Field {
    handler: HandlerFacade,
    buffer: EditBuffer,
    async_state: AsyncState,
    index: usize,
    color: Option<String>,
}

impl Field {
    pub fn new(handler: HandlerFacade, index: usize) -> Self {
        Self {
            handler,
            buffer: EditBuffer::new(),
            async_state: AsyncState::default(),
            index,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn handler(&self) -> &HandlerFacade {
        &self.handler
    }

    pub fn name(&self) -> &str {
        self.handler.name()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn editable(&self) -> bool {
        self.handler.editable()
    }

    pub fn value(&self) -> String {
        self.handler.value()
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut EditBuffer {
        &mut self.buffer
    }

    pub fn async_state(&self) -> &AsyncState {
        &self.async_state
    }

    pub(crate) fn async_state_mut(&mut self) -> &mut AsyncState {
        &mut self.async_state
    }

    pub fn is_running(&self) -> bool {
        self.async_state.is_running()
    }

    /// Prepares the buffer for a new edit session. Blank unless `prefill` is set.
    pub fn begin_edit(&mut self, prefill: bool) {
        if prefill {
            let value = self.handler.value();
            self.buffer.set(&value);
        } else {
            self.buffer.clear();
        }
    }

    /// Whether committing the buffer would change anything.
    pub fn buffer_differs(&self) -> bool {
        self.buffer.text() != self.handler.value()
    }
}
