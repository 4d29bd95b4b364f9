use std::future::Future;
use std::io;
use std::pin::Pin;

pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Where the engine schedules background operations.
pub trait AsyncExecutor: Send + Sync {
    fn spawn(&self, task: BoxFuture);
}

impl AsyncExecutor for tokio::runtime::Handle {
    fn spawn(&self, task: BoxFuture) {
        drop(tokio::runtime::Handle::spawn(self, task));
    }
}

/// Owns the tokio runtime background operations run on.
pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
}

impl AsyncRuntime {
    pub fn new() -> io::Result<Self> {
        Self::with_workers(2)
    }

    pub fn with_workers(worker_threads: usize) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("devdash-worker")
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self { runtime })
    }

    pub fn tokio_handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }
}

impl AsyncExecutor for AsyncRuntime {
    fn spawn(&self, task: BoxFuture) {
        drop(self.runtime.spawn(task));
    }
}
