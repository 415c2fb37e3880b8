//! Session configuration.

use std::time::Duration;

/// Configuration for a nested-CLI session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Default timeout for every send/expect round trip.
    pub timeout: Duration,

    /// Default hostname of the inner CLI, used to match its prompt during
    /// the short window before the forced sentinel is installed.
    pub target: String,

    /// Command that launches the inner CLI from the outer shell.
    ///
    /// The default forces line-buffered output via stdbuf; with block
    /// buffering the prompt can sit in a buffer and never reach the
    /// matcher.
    pub launch_command: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            target: "switch".to_string(),
            launch_command: "stdbuf -oL vtysh".to_string(),
        }
    }
}

impl SessionConfig {
    /// Set the round-trip timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the inner CLI's default hostname.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Set the command that launches the inner CLI.
    pub fn with_launch_command(mut self, command: impl Into<String>) -> Self {
        self.launch_command = command.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.target, "switch");
        assert_eq!(config.launch_command, "stdbuf -oL vtysh");
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_target("router")
            .with_launch_command("stdbuf -oL cli");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.target, "router");
        assert_eq!(config.launch_command, "stdbuf -oL cli");
    }
}
