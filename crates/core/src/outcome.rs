//! The settled outcome of an asynchronous operation.

use serde::Serialize;

use crate::failure::Failure;
use crate::thrown::{self, Thrown};

/// Either the value an operation produced, or the [`Failure`] it ended with.
///
/// The state is fixed at construction. Every query and reaction is total:
/// nothing on an `Outcome` panics because of the state it is in.
///
/// # Examples
///
/// ```
/// use settle_core::{Failure, Outcome};
///
/// let ok = Outcome::resolved(42);
/// assert!(ok.is_resolved());
/// assert_eq!(ok.value(), 42);
///
/// let failed: Outcome<i32> = Outcome::rejected(Failure::new("disk full"));
/// assert_eq!(failed.value(), 0);
/// assert_eq!(failed.failure().map(Failure::message).as_deref(), Some("disk full"));
///
/// let anonymous: Outcome<i32> = Outcome::rejected(None);
/// assert!(anonymous.failure().is_some_and(Failure::is_unknown));
/// ```
#[derive(Debug, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
#[must_use]
pub enum Outcome<T> {
    Resolved(T),
    Rejected(Failure),
}

impl<T> Outcome<T> {
    /// A successful outcome holding `value`.
    pub const fn resolved(value: T) -> Self {
        Self::Resolved(value)
    }

    /// A failed outcome.
    ///
    /// Passing `None` stores the canonical unknown-error failure, so a
    /// rejection always has something to report.
    pub fn rejected(failure: impl Into<Option<Failure>>) -> Self {
        Self::Rejected(failure.into().unwrap_or_else(Failure::unknown))
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        !self.is_resolved()
    }

    /// The stored value, or `T::default()` when rejected.
    #[must_use]
    pub fn value(&self) -> T
    where
        T: Clone + Default,
    {
        self.as_value().cloned().unwrap_or_default()
    }

    /// Borrow the stored value, if resolved.
    #[must_use]
    pub const fn as_value(&self) -> Option<&T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    /// Take the stored value, or `T::default()` when rejected.
    #[must_use]
    pub fn into_value(self) -> T
    where
        T: Default,
    {
        match self {
            Self::Resolved(value) => value,
            Self::Rejected(_) => T::default(),
        }
    }

    /// Borrow the stored failure, if rejected.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Resolved(_) => None,
            Self::Rejected(failure) => Some(failure),
        }
    }

    /// Take the stored failure, if rejected.
    #[must_use]
    pub fn into_failure(self) -> Option<Failure> {
        match self {
            Self::Resolved(_) => None,
            Self::Rejected(failure) => Some(failure),
        }
    }

    /// Run `f` on the value if resolved. Returns `self` unchanged.
    pub fn on_resolved<F: FnOnce(&T)>(&self, f: F) -> &Self {
        if let Self::Resolved(value) = self {
            f(value);
        }
        self
    }

    /// Run `f` on the failure if rejected. Returns `self` unchanged.
    pub fn on_rejected<F: FnOnce(&Failure)>(&self, f: F) -> &Self {
        if let Self::Rejected(failure) = self {
            f(failure);
        }
        self
    }

    /// Terminal reaction: hand the value to `f` if resolved.
    pub fn on_success<F: FnOnce(T)>(self, f: F) {
        if let Self::Resolved(value) = self {
            f(value);
        }
    }

    /// Terminal reaction: hand the failure to `f` if rejected.
    pub fn on_failure<F: FnOnce(Failure)>(self, f: F) {
        if let Self::Rejected(failure) = self {
            f(failure);
        }
    }

    /// Consume the outcome through exactly one of two callbacks.
    pub fn fold<R, S, E>(self, on_success: S, on_failure: E) -> R
    where
        S: FnOnce(T) -> R,
        E: FnOnce(Failure) -> R,
    {
        match self {
            Self::Resolved(value) => on_success(value),
            Self::Rejected(failure) => on_failure(failure),
        }
    }

    /// Transform the value, keeping a rejection as-is.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Resolved(value) => Outcome::Resolved(f(value)),
            Self::Rejected(failure) => Outcome::Rejected(failure),
        }
    }

    /// Convert into a standard `Result` for use with `?`.
    ///
    /// # Errors
    ///
    /// Returns the stored failure when rejected.
    pub fn into_result(self) -> Result<T, Failure> {
        self.into()
    }

    /// Convert to an Option, logging the failure if present.
    #[must_use]
    pub fn into_option_logged(self) -> Option<T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Rejected(failure) => {
                tracing::error!("Operation failed: {}", failure);
                None
            }
        }
    }

    /// Get the value or `default`, logging the failure if present.
    pub fn or_default_logged(self, default: T) -> T {
        match self {
            Self::Resolved(value) => value,
            Self::Rejected(failure) => {
                tracing::error!("Operation failed, using default: {}", failure);
                default
            }
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, Failure> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Resolved(value) => Ok(value),
            Outcome::Rejected(failure) => Err(failure),
        }
    }
}

impl<T, E: Into<Thrown>> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Resolved(value),
            Err(thrown) => Self::Rejected(thrown::classify(thrown.into()).1),
        }
    }
}
