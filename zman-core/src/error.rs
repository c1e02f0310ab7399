use thiserror::Error;

/// Errors surfaced by timer session operations.
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("timer already running")]
    TimerAlreadyRunning,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors reported by a time-entry store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entry not found: {0}")]
    NotFound(String),
    #[error("a running entry already exists: {0}")]
    DuplicateRunning(String),
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
