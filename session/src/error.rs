use thiserror::Error;

/// Errors surfaced by the session store's public operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An operation was invoked before `setup()` completed.
    #[error("session store is not ready: setup() has not been run")]
    NotReady,

    /// The underlying repository query failed. This is an opaque passthrough
    /// of the driver error; no retry is attempted.
    #[error("session query failed: {0}")]
    Query(#[source] anyhow::Error),
}
