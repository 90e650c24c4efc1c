//! Warning codes for skipped input.
//!
//! All codes are in the `W1xx` range: the parser recovers from every one of
//! them by dropping the offending line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Unrecognized line.
    ///
    /// The line matches none of the accepted shapes for its context (inside
    /// an element body, or at container level).
    W100,

    /// Unresolved relationship endpoint.
    ///
    /// An endpoint names neither an alias nor a display name declared
    /// earlier in the text.
    W101,

    /// Unsupported arrow.
    ///
    /// The arrow between two endpoints does not map to any relationship
    /// kind.
    W102,

    /// Unbalanced braces.
    ///
    /// A `}` without an open block, or a block still open at end of input.
    W103,

    /// Element rejected by the model store.
    W104,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "W100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::W100 => "W100",
            ErrorCode::W101 => "W101",
            ErrorCode::W102 => "W102",
            ErrorCode::W103 => "W103",
            ErrorCode::W104 => "W104",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::W100 => "unrecognized line",
            ErrorCode::W101 => "unresolved relationship endpoint",
            ErrorCode::W102 => "unsupported arrow",
            ErrorCode::W103 => "unbalanced braces",
            ErrorCode::W104 => "element rejected by the model store",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::W100.to_string(), "W100");
        assert_eq!(ErrorCode::W104.to_string(), "W104");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::W102.description(), "unsupported arrow");
        assert_eq!(ErrorCode::W103.description(), "unbalanced braces");
    }
}
