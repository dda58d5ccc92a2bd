use thiserror::Error;

use crate::session::Phase;

/// Programming errors raised by the typing-test core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("target text must contain at least one character")]
    EmptyTarget,

    #[error("final stats requested while the test is {phase}")]
    NotFinished { phase: Phase },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported test duration `{0}`, expected 15, 30 or 60")]
pub struct InvalidDuration(pub String);

/// Failures from the local results store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("results database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not prepare results directory: {0}")]
    Io(#[from] std::io::Error),
}
