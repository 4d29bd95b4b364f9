use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::ledger::{combine, Fragment, MessageLedger, MessageType, Record, RecordOutcome};

/// Where a running operation reports status. Every write lands on the operation's ledger
/// row. Once the engine closes the sink (timeout, cancellation) further writes are dropped.
/// The closed flag is held across each ledger write, so a write that races the close either
/// lands before the terminal row or not at all.
#[derive(Clone)]
pub struct ProgressSink {
    ledger: Arc<MessageLedger>,
    handler_name: Arc<str>,
    operation_id: Arc<str>,
    closed: Arc<Mutex<bool>>,
}

impl ProgressSink {
    pub(crate) fn new(ledger: Arc<MessageLedger>, handler_name: &str, operation_id: &str) -> Self {
        Self {
            ledger,
            handler_name: Arc::from(handler_name),
            operation_id: Arc::from(operation_id),
            closed: Arc::new(Mutex::new(false)),
        }
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.closed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_closed(&self) -> bool {
        *self.lock()
    }

    /// Reports one non-terminal update built from `fragments`.
    pub fn send(&self, fragments: &[Fragment]) -> Option<RecordOutcome> {
        let (kind, text) = combine(fragments);
        self.write(kind, &text, true)
    }

    pub fn info(&self, text: impl AsRef<str>) -> Option<RecordOutcome> {
        self.write(MessageType::Info, text.as_ref(), true)
    }

    pub fn success(&self, text: impl AsRef<str>) -> Option<RecordOutcome> {
        self.write(MessageType::Success, text.as_ref(), true)
    }

    pub fn warning(&self, text: impl AsRef<str>) -> Option<RecordOutcome> {
        self.write(MessageType::Warning, text.as_ref(), true)
    }

    pub fn error(&self, text: impl AsRef<str>) -> Option<RecordOutcome> {
        self.write(MessageType::Error, text.as_ref(), true)
    }

    fn write(&self, kind: MessageType, text: &str, is_progress: bool) -> Option<RecordOutcome> {
        let closed = self.lock();
        if *closed {
            tracing::debug!(
                handler = %self.handler_name,
                operation = %self.operation_id,
                "dropping write on closed progress sink"
            );
            return None;
        }
        Some(
            self.ledger.record(
                Record::new(kind, text, &self.handler_name)
                    .operation(&self.operation_id)
                    .progress(is_progress),
            ),
        )
    }

    /// Writes the terminal row and closes the sink. Returns `None` if it was already closed,
    /// so at most one terminal row is ever written per operation.
    pub(crate) fn finish_with(&self, kind: MessageType, text: &str) -> Option<RecordOutcome> {
        let mut closed = self.lock();
        if *closed {
            return None;
        }
        *closed = true;
        Some(
            self.ledger.record(
                Record::new(kind, text, &self.handler_name)
                    .operation(&self.operation_id)
                    .progress(false),
            ),
        )
    }

    /// Marks whatever the handler last wrote as terminal and closes the sink.
    pub(crate) fn finish_ok(&self) -> bool {
        let mut closed = self.lock();
        if *closed {
            return false;
        }
        *closed = true;
        self.ledger
            .complete(&self.operation_id, &self.handler_name)
    }
}

impl std::fmt::Debug for ProgressSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSink")
            .field("handler_name", &self.handler_name)
            .field("operation_id", &self.operation_id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Handed to a handler body for the duration of one operation.
#[derive(Debug, Clone)]
pub struct OperationContext {
    progress: ProgressSink,
    cancel: CancellationToken,
}

impl OperationContext {
    pub(crate) fn new(progress: ProgressSink, cancel: CancellationToken) -> Self {
        Self { progress, cancel }
    }

    /// Context outside the engine, for driving a handler directly (tests, scripts).
    pub fn detached(ledger: Arc<MessageLedger>, handler_name: &str, operation_id: &str) -> Self {
        Self::new(
            ProgressSink::new(ledger, handler_name, operation_id),
            CancellationToken::new(),
        )
    }

    pub fn progress(&self) -> &ProgressSink {
        &self.progress
    }

    pub fn operation_id(&self) -> &str {
        self.progress.operation_id()
    }

    /// Long-running handlers should poll this and return early once it flips.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/progress.rs"]
mod tests;
