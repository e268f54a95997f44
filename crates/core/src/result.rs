//! Result type definition and extension traits for construction-time errors.
//!
//! Operation outcomes live in [`crate::Outcome`]; this alias covers the
//! fallible *construction* paths (formatted failures, executor config).

use crate::error::Error;

/// The standard Result type for settle construction calls.
///
/// # Examples
///
/// ```
/// use settle_core::{Failure, Result};
///
/// fn build() -> Result<Failure> {
///     Failure::formatted("%d items failed", &[3.into()])
/// }
///
/// assert_eq!(build().map(|f| f.message()), Ok("3 items failed".to_string()));
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait providing safe combinators for Results.
///
/// This trait provides ergonomic methods that avoid the need for unwrap/expect.
pub trait ResultExt<T> {
    /// Convert a Result to an Option, logging the error if present.
    fn into_option_logged(self) -> Option<T>;

    /// Get the value or a default, logging the error if present.
    fn or_default_logged(self, default: T) -> T;

    /// Inspect the error without consuming the Result.
    #[must_use]
    fn inspect_error<F: FnOnce(&Error)>(self, f: F) -> Self;
}

impl<T> ResultExt<T> for Result<T> {
    fn into_option_logged(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(code = e.code(), "Construction failed: {}", e);
                None
            }
        }
    }

    fn or_default_logged(self, default: T) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(code = e.code(), "Construction failed, using default: {}", e);
                default
            }
        }
    }

    fn inspect_error<F: FnOnce(&Error)>(self, f: F) -> Self {
        if let Err(ref e) = self {
            f(e);
        }
        self
    }
}
