//! Error types for vtynest.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for vtynest operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level errors from the borrowed connection
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Session-level errors (negotiation, command execution)
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Errors raised by the send/expect primitive.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// No expected pattern matched within the timeout
    #[error("No pattern matched within {0:?}")]
    Timeout(Duration),

    /// The remote process closed the stream while a pattern was still
    /// awaited. Only an error when `ExpectTarget::Eof` was not among the
    /// supplied targets.
    #[error("End of stream from the remote process")]
    Eof,

    /// I/O error on the underlying channel
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Session layer errors (prompt negotiation, crash classification).
#[derive(Error, Debug)]
pub enum SessionError {
    /// A negotiation step did not reach its expected prompt
    #[error("Prompt negotiation failed at step '{step}': {source}")]
    NegotiationFailed {
        step: &'static str,
        #[source]
        source: ConnectionError,
    },

    /// The inner CLI terminated abnormally while running a command
    #[error("Inner CLI crashed while executing '{command}'")]
    InnerCliCrashed { command: String },

    /// Commands were issued before the prompt was negotiated
    #[error("Session not negotiated - call negotiate() first")]
    NotNegotiated,
}

/// Result type alias using vtynest's Error.
pub type Result<T> = std::result::Result<T, Error>;
