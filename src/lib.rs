//! # Vtynest
//!
//! Async prompt-synchronization library for driving a nested vtysh-style
//! CLI launched inside a container's shell.
//!
//! Test harnesses that manage switch containers reach the management CLI
//! in two hops: log into the container's shell, then start vtysh as a
//! subprocess of that shell. The hard part is knowing, at every point,
//! which of the two prompts the automation is facing - and telling "the
//! command returned to the prompt" apart from "the command crashed the CLI
//! and dropped back to the outer shell". Vtynest implements that
//! negotiation and classification protocol over any transport that can
//! send a line and wait for a pattern.
//!
//! ## Features
//!
//! - Deterministic prompt negotiation: echo off, line-buffered launch,
//!   forced sentinel prompts on both shell levels
//! - Crash classification: distinguishes a crashed inner CLI from a
//!   deliberate exit to the outer shell
//! - Best-effort teardown that never fails the caller
//! - Transport-agnostic via the [`Connection`] trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vtynest::{Connection, SessionConfig, VtyshSession};
//!
//! async fn run(conn: &mut dyn Connection) -> Result<(), vtynest::Error> {
//!     let mut session = VtyshSession::new(SessionConfig::default());
//!
//!     // Precondition: conn is authenticated and sitting at the outer
//!     // shell's forced prompt.
//!     session.negotiate(conn).await?;
//!
//!     let matched = session.execute(conn, "show version").await?;
//!     assert_eq!(matched, 0); // inner prompt: command completed normally
//!
//!     session.close(conn).await; // infallible
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod error;
pub mod prompt;
pub mod session;

// Re-export main types for convenience
pub use connection::{Connection, ExpectMatch, ExpectTarget};
pub use error::{ConnectionError, Error, SessionError};
pub use prompt::{
    CRASH_SIGNATURE, INNER_FORCED_PROMPT, OUTER_FORCED_PROMPT, PromptSpec, inner_prompt_pattern,
};
pub use session::{ExecuteOpts, SessionConfig, VtyshSession};
