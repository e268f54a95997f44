//! Construction-time error types for settle.
//!
//! These never describe an operation failure (that is [`crate::Failure`]).
//! They describe a programming error in building a failure or an executor,
//! and they propagate to the caller as ordinary `Result`s.

use thiserror::Error;

/// Core error type for construction-time failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // Formatting errors
    #[error("template placeholder #{index} has no matching argument")]
    MissingArgument { index: usize },

    #[error("template consumed {expected} argument(s) but {supplied} were supplied")]
    ExtraArguments { expected: usize, supplied: usize },

    #[error("placeholder '%{verb}' cannot format argument #{index} ({found})")]
    ArgumentMismatch {
        verb: char,
        index: usize,
        found: &'static str,
    },

    #[error("unknown placeholder '%{verb}' in template")]
    UnknownPlaceholder { verb: char },

    #[error("template ends with a dangling '%'")]
    DanglingPercent,

    // Configuration errors
    #[error("invalid executor configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("failed to parse executor configuration: {reason}")]
    ConfigParseFailed { reason: String },
}

impl Error {
    /// Create an argument mismatch error.
    pub const fn argument_mismatch(verb: char, index: usize, found: &'static str) -> Self {
        Self::ArgumentMismatch { verb, index, found }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a configuration parse error.
    pub fn config_parse_failed(reason: impl Into<String>) -> Self {
        Self::ConfigParseFailed {
            reason: reason.into(),
        }
    }

    /// Returns the machine-readable error code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingArgument { .. } => "MISSING_ARGUMENT",
            Self::ExtraArguments { .. } => "EXTRA_ARGUMENTS",
            Self::ArgumentMismatch { .. } => "ARGUMENT_MISMATCH",
            Self::UnknownPlaceholder { .. } => "UNKNOWN_PLACEHOLDER",
            Self::DanglingPercent => "DANGLING_PERCENT",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::ConfigParseFailed { .. } => "CONFIG_PARSE_FAILED",
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::config_parse_failed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_missing_argument() {
        let err = Error::MissingArgument { index: 2 };
        assert_eq!(
            err.to_string(),
            "template placeholder #2 has no matching argument"
        );
    }

    #[test]
    fn test_display_argument_mismatch() {
        let err = Error::argument_mismatch('d', 0, "string");
        assert_eq!(
            err.to_string(),
            "placeholder '%d' cannot format argument #0 (string)"
        );
    }

    #[test]
    fn test_codes_are_screaming_snake_case() {
        let errors = [
            Error::MissingArgument { index: 0 },
            Error::ExtraArguments {
                expected: 0,
                supplied: 1,
            },
            Error::argument_mismatch('f', 0, "bool"),
            Error::UnknownPlaceholder { verb: 'q' },
            Error::DanglingPercent,
            Error::invalid_config("x"),
            Error::config_parse_failed("y"),
        ];

        assert!(errors.iter().all(|e| e
            .code()
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '_')));
    }
}
