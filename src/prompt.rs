//! Prompt markers and pattern builders.
//!
//! Prompt matching against an interactive CLI is only reliable when the
//! prompt is a string that cannot occur in command output. Both shell
//! levels therefore get a sentinel installed: the outer container shell
//! before this crate is involved (a precondition of negotiation), the
//! inner CLI by the negotiator itself via `set prompt`.

use regex::bytes::Regex;

use crate::connection::ExpectTarget;

/// Sentinel prompt of the outer container shell.
///
/// Installed by the surrounding session harness before negotiation starts;
/// seeing it after a command means control fell back out of the inner CLI.
pub const OUTER_FORCED_PROMPT: &str = "@~~==::BASH_PROMPT::==~~@";

/// Sentinel prompt installed into the inner CLI during negotiation.
pub const INNER_FORCED_PROMPT: &str = "X@~~==::VTYSH_PROMPT::==~~@X";

/// Literal marking abnormal termination of the inner CLI in its output.
pub const CRASH_SIGNATURE: &str = "Segmentation fault";

/// One of the two shell flavors a prompt pattern can describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSpec {
    /// The outer container shell, matched by its exact sentinel.
    Outer,

    /// The inner CLI: a base name, an optional bracketed configuration
    /// context such as `(config-if)`, then `#`.
    Inner {
        /// The base name, either the CLI's default hostname or the forced
        /// sentinel once installed.
        base: String,
    },
}

impl PromptSpec {
    /// Inner-CLI prompt spec for the given base name.
    pub fn inner(base: impl Into<String>) -> Self {
        Self::Inner { base: base.into() }
    }

    /// Compile this spec into an expect target.
    pub fn to_target(&self) -> ExpectTarget {
        match self {
            Self::Outer => ExpectTarget::literal(OUTER_FORCED_PROMPT),
            Self::Inner { base } => ExpectTarget::Pattern(inner_prompt_pattern(base)),
        }
    }
}

/// Build the inner-CLI prompt pattern for a base name.
///
/// The template is `{base}(\([-a-zA-Z0-9]*\))?#`: the base, an optional
/// bracketed context suffix, then the vtysh `#`. The base is escaped, so
/// it works both for plain hostnames and for the forced sentinel.
pub fn inner_prompt_pattern(base: &str) -> Regex {
    let pattern = format!(r"{}(\([-a-zA-Z0-9]*\))?#", regex::escape(base));
    Regex::new(&pattern).expect("prompt template is a valid regex")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_pattern_plain_prompt() {
        let re = inner_prompt_pattern("switch");
        assert!(re.is_match(b"switch#"));
        assert!(re.is_match(b"some output\nswitch# "));
    }

    #[test]
    fn test_inner_pattern_config_context() {
        let re = inner_prompt_pattern("switch");
        assert!(re.is_match(b"switch(config)#"));
        assert!(re.is_match(b"switch(config-if)#"));
        assert!(re.is_match(b"switch(config-vlan-20)#"));
    }

    #[test]
    fn test_inner_pattern_rejects_missing_hash() {
        let re = inner_prompt_pattern("switch");
        assert!(!re.is_match(b"switch(config)"));
        assert!(!re.is_match(b"switch>"));
    }

    #[test]
    fn test_inner_pattern_over_forced_marker() {
        // After `set prompt`, the same template is applied to the sentinel,
        // whose regex metacharacters must be escaped.
        let re = inner_prompt_pattern(INNER_FORCED_PROMPT);
        assert!(re.is_match(b"X@~~==::VTYSH_PROMPT::==~~@X#"));
        assert!(re.is_match(b"X@~~==::VTYSH_PROMPT::==~~@X(config)#"));
        assert!(!re.is_match(b"X@~~==::VTYSH_PROMPT::==~~@X"));
    }

    #[test]
    fn test_prompt_spec_targets() {
        let outer = PromptSpec::Outer.to_target();
        assert!(outer.is_match(OUTER_FORCED_PROMPT.as_bytes()));

        let inner = PromptSpec::inner("switch").to_target();
        assert!(inner.is_match(b"switch(config)#"));
        assert!(!inner.is_match(OUTER_FORCED_PROMPT.as_bytes()));
    }
}
