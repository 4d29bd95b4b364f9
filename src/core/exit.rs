use tokio_util::sync::CancellationToken;

/// Process-wide exit request. Closing is idempotent and observable from any thread.
#[derive(Debug, Clone, Default)]
pub struct ExitSignal {
    token: CancellationToken,
}

impl ExitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the signal was already closed.
    pub fn close(&self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.token.cancel();
        tracing::info!("exit requested");
        true
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token to await from async code (`token.cancelled().await`).
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/exit.rs"]
mod tests;
