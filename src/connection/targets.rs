//! Match targets for `expect` calls.

use regex::bytes::Regex;

/// One terminal state an `expect` call may resolve to.
///
/// Most targets are prompt patterns; `Eof` makes a closed stream a valid
/// outcome instead of an error, which the session closer relies on when
/// waiting for the inner CLI to exit.
#[derive(Debug, Clone)]
pub enum ExpectTarget {
    /// A regex over the raw byte stream.
    Pattern(Regex),

    /// End of stream from the remote process.
    Eof,
}

impl ExpectTarget {
    /// Create a regex target, failing on an invalid pattern.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    /// Create a target matching a literal string exactly as written.
    pub fn literal(text: &str) -> Self {
        // Escaped literals always compile.
        Self::Pattern(Regex::new(&regex::escape(text)).expect("escaped literal is a valid regex"))
    }

    /// Check whether this target matches the given data.
    ///
    /// `Eof` never matches data; it is resolved by the connection when the
    /// stream closes, not by content.
    pub fn is_match(&self, data: &[u8]) -> bool {
        match self {
            Self::Pattern(re) => re.is_match(data),
            Self::Eof => false,
        }
    }

    /// Byte offset where the match ends, or None.
    ///
    /// For [`Connection`](crate::connection::Connection) implementors:
    /// this is the split point between a match's `before` segment and the
    /// matched text when resolving an `expect` call.
    pub fn find_match(&self, data: &[u8]) -> Option<usize> {
        match self {
            Self::Pattern(re) => re.find(data).map(|m| m.end()),
            Self::Eof => None,
        }
    }

    /// Whether this is the end-of-stream target.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_target() {
        let target = ExpectTarget::pattern(r"switch#\s*$").unwrap();
        assert!(target.is_match(b"switch# "));
        assert!(!target.is_match(b"switch> "));
    }

    #[test]
    fn test_literal_target_escapes_metacharacters() {
        let target = ExpectTarget::literal("X@~~==::PROMPT::==~~@X");
        assert!(target.is_match(b"X@~~==::PROMPT::==~~@X"));
        // The sentinel must not be interpreted as a regex
        assert!(!target.is_match(b"X@~~==::PROMPTA::==~~@X"));
    }

    #[test]
    fn test_eof_never_matches_data() {
        let target = ExpectTarget::Eof;
        assert!(!target.is_match(b"anything"));
        assert!(target.find_match(b"anything").is_none());
        assert!(target.is_eof());
    }

    #[test]
    fn test_find_match_offset() {
        let target = ExpectTarget::pattern(r"prompt#").unwrap();
        assert_eq!(target.find_match(b"output\nprompt#"), Some(14));
    }
}
