//! The nested-CLI session state machine.
//!
//! A [`VtyshSession`] drives a vtysh-style CLI launched inside an outer
//! container shell, over any [`Connection`]. It has exactly three
//! operations: [`negotiate`](VtyshSession::negotiate) installs an
//! unambiguous prompt inside the inner CLI, [`execute`](VtyshSession::execute)
//! runs one command and classifies how it terminated, and
//! [`close`](VtyshSession::close) is a best-effort exit that never fails
//! the caller.

mod config;

pub use config::SessionConfig;

use std::time::Duration;

use log::{debug, warn};
use memchr::memmem;

use crate::connection::{Connection, ExpectMatch, ExpectTarget};
use crate::error::{Result, SessionError};
use crate::prompt::{CRASH_SIGNATURE, INNER_FORCED_PROMPT, OUTER_FORCED_PROMPT, PromptSpec};

/// Options for a single [`VtyshSession::execute_with`] call.
#[derive(Debug, Clone)]
pub struct ExecuteOpts {
    /// Override for the accepted terminal targets. Defaults to the
    /// session's negotiated prompt alternation.
    pub matches: Option<Vec<ExpectTarget>>,

    /// Whether to append a line terminator to the command.
    pub newline: bool,

    /// Per-call timeout override.
    pub timeout: Option<Duration>,
}

impl Default for ExecuteOpts {
    fn default() -> Self {
        Self {
            matches: None,
            newline: true,
            timeout: None,
        }
    }
}

impl ExecuteOpts {
    /// Accept these targets instead of the negotiated prompt alternation.
    pub fn matches(mut self, targets: Vec<ExpectTarget>) -> Self {
        self.matches = Some(targets);
        self
    }

    /// Control whether a line terminator is appended.
    pub fn newline(mut self, newline: bool) -> Self {
        self.newline = newline;
        self
    }

    /// Override the timeout for this call only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// State machine for one outer-shell → inner-CLI session.
///
/// The connection is not owned; every operation borrows one, so the
/// negotiated state survives a transport reconnect. One session per
/// connection at a time; operations are strictly sequential.
#[derive(Debug)]
pub struct VtyshSession {
    /// Session configuration.
    config: SessionConfig,

    /// Targets currently accepted as a command's terminal state. Empty
    /// until negotiation; afterwards always the two-entry alternation of
    /// the forced inner prompt and the outer sentinel.
    active_prompt: Vec<ExpectTarget>,

    /// Most recently executed command, for crash and shutdown diagnostics.
    last_command: Option<String>,
}

impl VtyshSession {
    /// Create a session with the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            active_prompt: Vec::new(),
            last_command: None,
        }
    }

    /// Create a session with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SessionConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The currently accepted terminal targets (empty before negotiation).
    pub fn active_prompt(&self) -> &[ExpectTarget] {
        &self.active_prompt
    }

    /// The most recently executed command, if any.
    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    /// Whether negotiation has completed.
    pub fn is_negotiated(&self) -> bool {
        !self.active_prompt.is_empty()
    }

    /// Launch the inner CLI and install its forced prompt.
    ///
    /// Precondition: `conn` is authenticated and sitting at the outer
    /// shell's forced prompt. Each step blocks until its expected prompt
    /// is seen; the steps cannot be reordered because each command's
    /// effect depends on the previous one having completed.
    ///
    /// A step timing out is fatal and is not retried here; retry policy
    /// belongs to the caller.
    pub async fn negotiate(&mut self, conn: &mut dyn Connection) -> Result<()> {
        let timeout = self.config.timeout;
        let outer = [PromptSpec::Outer.to_target()];

        debug!("confirming outer shell prompt");
        expect_step(conn, &outer, timeout, "confirm outer prompt").await?;

        // Without this, every sent line is echoed back into the stream,
        // inside the inner CLI too, and corrupts pattern matching.
        debug!("disabling terminal echo");
        send_step(conn, "stty -echo", "disable echo").await?;
        expect_step(conn, &outer, timeout, "await prompt after echo disable").await?;

        debug!("launching inner CLI: {}", self.config.launch_command);
        send_step(conn, &self.config.launch_command, "launch inner CLI").await?;

        // The default prompt is only needed transiently, before the forced
        // sentinel replaces it.
        let default_prompt = [PromptSpec::inner(&self.config.target).to_target()];
        expect_step(conn, &default_prompt, timeout, "await default inner prompt").await?;

        debug!("installing forced inner prompt");
        let set_prompt = format!("set prompt {INNER_FORCED_PROMPT}");
        send_step(conn, &set_prompt, "install forced prompt").await?;

        // Either prompt may legitimately appear from here on: the forced
        // inner prompt, or the outer sentinel when the inner CLI dies.
        // The `set prompt` response itself is consumed by the next
        // execute() against this alternation.
        self.active_prompt = vec![
            PromptSpec::inner(INNER_FORCED_PROMPT).to_target(),
            PromptSpec::Outer.to_target(),
        ];

        Ok(())
    }

    /// Execute one command and wait for a recognized terminal state.
    ///
    /// Returns the index of the matched target within the negotiated
    /// prompt alternation: 0 for the inner forced prompt, 1 for the outer
    /// sentinel.
    pub async fn execute(&mut self, conn: &mut dyn Connection, command: &str) -> Result<usize> {
        self.execute_with(conn, command, ExecuteOpts::default()).await
    }

    /// Execute one command with explicit options.
    ///
    /// Returns the index of the matched target within `opts.matches` (or
    /// the negotiated alternation when no override is given), preserving
    /// the connection's own semantics for that index.
    pub async fn execute_with(
        &mut self,
        conn: &mut dyn Connection,
        command: &str,
        opts: ExecuteOpts,
    ) -> Result<usize> {
        if opts.matches.is_none() && self.active_prompt.is_empty() {
            return Err(SessionError::NotNegotiated.into());
        }

        self.last_command = Some(command.to_string());
        let targets = opts.matches.as_deref().unwrap_or(&self.active_prompt);
        let timeout = opts.timeout.unwrap_or(self.config.timeout);

        debug!("executing: {command}");
        if opts.newline {
            conn.send_line(command).await?;
        } else {
            conn.send(command).await?;
        }

        let matched = conn.expect(targets, timeout).await?;
        self.classify_crash(&matched)?;

        Ok(matched.index)
    }

    /// Escalate when the inner CLI died mid-command.
    ///
    /// The crash signature alone can appear in legitimate output, and
    /// landing on the outer sentinel alone also happens on a deliberate
    /// exit; only the conjunction means the inner process crashed.
    fn classify_crash(&self, matched: &ExpectMatch) -> Result<()> {
        let crashed = memmem::find(&matched.before, CRASH_SIGNATURE.as_bytes()).is_some();
        let outer_landing = matched.after.as_ref() == OUTER_FORCED_PROMPT.as_bytes();

        if crashed && outer_landing {
            return Err(SessionError::InnerCliCrashed {
                command: self.last_command.clone().unwrap_or_default(),
            }
            .into());
        }

        Ok(())
    }

    /// Attempt a clean exit from the inner CLI.
    ///
    /// Never fails: this typically runs while a larger test session is
    /// being torn down, and one broken session must not abort cleanup of
    /// the rest. Any error is downgraded to a warning, and the connection
    /// is then left in whatever state the failed step produced.
    pub async fn close(&mut self, conn: &mut dyn Connection) {
        if let Err(error) = self.try_close(conn).await {
            let command = self.last_command.as_deref().unwrap_or("<none>");
            warn!("Exiting the inner CLI failed on '{command}': {error}");
        }
    }

    async fn try_close(&mut self, conn: &mut dyn Connection) -> Result<()> {
        // Ascend out of any nested configuration context first.
        self.execute(conn, "end").await?;

        // Both end-of-stream and the outer sentinel mean the inner CLI has
        // terminated and control is back at the outer shell.
        let exit_targets = vec![ExpectTarget::Eof, PromptSpec::Outer.to_target()];
        self.execute_with(conn, "exit", ExecuteOpts::default().matches(exit_targets))
            .await?;

        Ok(())
    }
}

async fn send_step(
    conn: &mut dyn Connection,
    line: &str,
    step: &'static str,
) -> Result<()> {
    conn.send_line(line)
        .await
        .map_err(|source| SessionError::NegotiationFailed { step, source }.into())
}

async fn expect_step(
    conn: &mut dyn Connection,
    targets: &[ExpectTarget],
    timeout: Duration,
    step: &'static str,
) -> Result<ExpectMatch> {
    conn.expect(targets, timeout)
        .await
        .map_err(|source| SessionError::NegotiationFailed { step, source }.into())
}
