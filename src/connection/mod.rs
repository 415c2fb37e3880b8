//! The send/expect boundary to the remote pseudo-terminal.
//!
//! This crate does not own a transport. Everything it does is expressed
//! against the [`Connection`] trait, a thin duplex primitive: write one
//! line, then block until one of N targets matches the incoming stream.
//! Implementations typically wrap an SSH channel or a `docker exec` PTY.

mod targets;

pub use targets::ExpectTarget;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ConnectionError;

/// A duplex channel to a pseudo-terminal, borrowed per call.
///
/// The session layer never stores a connection; each operation takes
/// `&mut dyn Connection` so that a session can keep its negotiated state
/// across a transport reconnect.
#[async_trait]
pub trait Connection: Send {
    /// Write raw text to the remote side, without a line terminator.
    async fn send(&mut self, text: &str) -> Result<(), ConnectionError>;

    /// Write text followed by a line terminator.
    async fn send_line(&mut self, text: &str) -> Result<(), ConnectionError> {
        self.send(text).await?;
        self.send("\n").await
    }

    /// Block until one of `targets` matches the incoming stream.
    ///
    /// Returns the index of the first matching target together with the
    /// bytes consumed before the match and the matched text itself.
    ///
    /// Fails with [`ConnectionError::Timeout`] if nothing matches within
    /// `timeout`. If the stream closes first, this is a successful match
    /// when [`ExpectTarget::Eof`] is among `targets` and
    /// [`ConnectionError::Eof`] otherwise.
    async fn expect(
        &mut self,
        targets: &[ExpectTarget],
        timeout: Duration,
    ) -> Result<ExpectMatch, ConnectionError>;
}

/// Result of a successful [`Connection::expect`] call.
#[derive(Debug, Clone)]
pub struct ExpectMatch {
    /// Index into the supplied targets of the one that matched.
    pub index: usize,

    /// Everything consumed from the stream up to the match.
    pub before: Bytes,

    /// The matched text itself (empty for an end-of-stream match).
    pub after: Bytes,
}

impl ExpectMatch {
    /// The `before` segment as a string (lossy UTF-8).
    pub fn before_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.before)
    }

    /// The matched text as a string (lossy UTF-8).
    pub fn after_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.after)
    }
}
