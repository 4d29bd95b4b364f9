//! Runs handler operations.
//!
//! A zero timeout runs the handler inline on the caller's thread. Anything else is started
//! as a background task: the handler body runs on the blocking pool while a supervising
//! task races it against the deadline and the operation's cancellation token. The
//! supervising task writes the terminal ledger row and then reports back to the UI loop over
//! a channel; it never touches UI-owned state.

mod progress;
mod runtime;

pub use progress::{OperationContext, ProgressSink};
pub use runtime::{AsyncExecutor, AsyncRuntime, BoxFuture};

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::OperationError;
use crate::field::{Field, FieldAddress};
use crate::handler::{HandlerFacade, Operation};
use crate::ledger::{MessageLedger, MessageType};

/// Messages from background operations to the UI loop.
#[derive(Debug, Clone)]
pub enum EngineMessage {
    Finished {
        target: FieldAddress,
        operation_id: String,
        outcome: Result<(), OperationError>,
        elapsed: Duration,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The field already has an operation in flight; nothing was started.
    Busy,
    /// The handler has nothing to run for this operation.
    Unsupported,
    /// Ran inline and already finished.
    Completed {
        operation_id: String,
        outcome: Result<(), OperationError>,
    },
    /// Started in the background; completion arrives as [`EngineMessage::Finished`].
    Started { operation_id: String },
}

impl TriggerOutcome {
    pub fn operation_id(&self) -> Option<&str> {
        match self {
            TriggerOutcome::Completed { operation_id, .. }
            | TriggerOutcome::Started { operation_id } => Some(operation_id),
            TriggerOutcome::Busy | TriggerOutcome::Unsupported => None,
        }
    }
}

pub fn engine_channel() -> (Sender<EngineMessage>, Receiver<EngineMessage>) {
    mpsc::channel()
}

pub struct ExecutionEngine {
    executor: Arc<dyn AsyncExecutor>,
    tx: Sender<EngineMessage>,
}

impl ExecutionEngine {
    pub fn new(executor: Arc<dyn AsyncExecutor>, tx: Sender<EngineMessage>) -> Self {
        Self { executor, tx }
    }

    pub fn trigger(
        &self,
        target: FieldAddress,
        field: &mut Field,
        ledger: &Arc<MessageLedger>,
        op: Operation,
    ) -> TriggerOutcome {
        let handler = field.handler().clone();
        let name = handler.name().to_string();

        if field.is_running() {
            tracing::debug!(
                handler = %name,
                operation = %field.async_state().operation_id(),
                "field busy, trigger dropped"
            );
            return TriggerOutcome::Busy;
        }
        if !handler.supports(&op) {
            return TriggerOutcome::Unsupported;
        }

        let operation_id = resolve_operation_id(&handler);
        let sink = ProgressSink::new(Arc::clone(ledger), &name, &operation_id);
        let cancel = CancellationToken::new();
        let ctx = OperationContext::new(sink.clone(), cancel.clone());
        let timeout = handler.timeout();

        tracing::debug!(
            handler = %name,
            operation = %operation_id,
            kind = op.name(),
            timeout_ms = timeout.as_millis() as u64,
            "operation starting"
        );

        if timeout.is_zero() {
            let started = Instant::now();
            let outcome = run_inline(&handler, &op, &ctx);
            finish(&sink, &outcome);
            log_outcome(&name, &operation_id, &outcome, started.elapsed());
            return TriggerOutcome::Completed {
                operation_id,
                outcome,
            };
        }

        field.async_state_mut().start(&operation_id, cancel.clone());

        let tx = self.tx.clone();
        let task_operation_id = operation_id.clone();
        self.executor.spawn(Box::pin(async move {
            let started = Instant::now();
            let work_handler = handler.clone();
            let work_ctx = ctx.clone();
            let mut work =
                tokio::task::spawn_blocking(move || work_handler.invoke(&op, &work_ctx));

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(OperationError::Cancelled),
                joined = &mut work => match joined {
                    Ok(result) => result.map_err(OperationError::from),
                    Err(e) if e.is_panic() => {
                        let payload = e.into_panic();
                        Err(OperationError::PanicRecovered(panic_message(&*payload)))
                    }
                    Err(_) => Err(OperationError::Cancelled),
                },
                _ = tokio::time::sleep(timeout) => Err(OperationError::TimedOut(timeout)),
            };

            if matches!(
                outcome,
                Err(OperationError::TimedOut(_)) | Err(OperationError::Cancelled)
            ) {
                cancel.cancel();
            }

            finish(&sink, &outcome);
            let elapsed = started.elapsed();
            log_outcome(&name, &task_operation_id, &outcome, elapsed);

            let _ = tx.send(EngineMessage::Finished {
                target,
                operation_id: task_operation_id,
                outcome,
                elapsed,
            });
        }));

        TriggerOutcome::Started { operation_id }
    }

    /// Requests cooperative cancellation of the field's in-flight operation.
    pub fn cancel(&self, field: &Field) -> bool {
        let requested = field.async_state().cancel();
        if requested {
            tracing::info!(
                handler = %field.name(),
                operation = %field.async_state().operation_id(),
                "cancellation requested"
            );
        }
        requested
    }
}

/// Reuses the token the handler reports, minting (and storing back) a fresh one otherwise.
fn resolve_operation_id(handler: &HandlerFacade) -> String {
    let reported = handler.last_operation_id();
    if !reported.is_empty() {
        return reported;
    }
    let fresh = uuid::Uuid::new_v4().simple().to_string();
    handler.set_last_operation_id(&fresh);
    fresh
}

fn run_inline(
    handler: &HandlerFacade,
    op: &Operation,
    ctx: &OperationContext,
) -> Result<(), OperationError> {
    match std::panic::catch_unwind(AssertUnwindSafe(|| handler.invoke(op, ctx))) {
        Ok(result) => result.map_err(OperationError::from),
        Err(payload) => Err(OperationError::PanicRecovered(panic_message(&*payload))),
    }
}

fn finish(sink: &ProgressSink, outcome: &Result<(), OperationError>) {
    let name = sink.handler_name().to_string();
    match outcome {
        Ok(()) => {
            sink.finish_ok();
        }
        Err(OperationError::Cancelled) => {
            sink.finish_with(MessageType::Warning, &format!("{name}: operation cancelled"));
        }
        Err(e) => {
            sink.finish_with(MessageType::Error, &format!("{name}: {e}"));
        }
    }
}

fn log_outcome(
    name: &str,
    operation_id: &str,
    outcome: &Result<(), OperationError>,
    elapsed: Duration,
) {
    let elapsed_ms = elapsed.as_millis() as u64;
    match outcome {
        Ok(()) => tracing::debug!(handler = %name, operation = %operation_id, elapsed_ms, "operation completed"),
        Err(OperationError::Handler(e)) => {
            tracing::info!(handler = %name, operation = %operation_id, error = %e, elapsed_ms, "operation failed")
        }
        Err(e) => {
            tracing::warn!(handler = %name, operation = %operation_id, error = %e, elapsed_ms, "operation aborted")
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/engine.rs"]
mod tests;
