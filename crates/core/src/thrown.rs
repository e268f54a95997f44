//! Foreign failure signals and their classification into [`Failure`].

use std::any::Any;
use std::fmt::{self, Write};

use crate::failure::Failure;

/// Type-erased error values that still carry a message.
type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Anything an operation may fail with.
///
/// Operations return `Result<T, E>` with `E: Into<Thrown>`, so a domain
/// [`Failure`], any `anyhow::Error` (and through it any `std::error::Error`),
/// a `Box<dyn Error + Send + Sync>`, or an arbitrary opaque value can all
/// flow through `?`.
#[derive(Debug)]
pub enum Thrown {
    /// A failure the operation author built on purpose.
    Failure(Failure),
    /// An error-like value that carries a message.
    Error(anyhow::Error),
    /// Any other value, including panic payloads.
    Opaque(Box<dyn Any + Send>),
}

impl Thrown {
    /// Wrap an arbitrary value as an opaque failure signal.
    pub fn opaque<V: Any + Send>(value: V) -> Self {
        Self::Opaque(Box::new(value))
    }
}

impl From<Failure> for Thrown {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}

impl From<anyhow::Error> for Thrown {
    fn from(err: anyhow::Error) -> Self {
        Self::Error(err)
    }
}

impl From<BoxedError> for Thrown {
    fn from(err: BoxedError) -> Self {
        match err.downcast::<Failure>() {
            Ok(failure) => Self::Failure(*failure),
            Err(err) => Self::Error(anyhow::Error::from_boxed(err)),
        }
    }
}

impl From<Box<dyn Any + Send>> for Thrown {
    fn from(payload: Box<dyn Any + Send>) -> Self {
        Self::Opaque(payload)
    }
}

/// Which branch of the classification produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The operation failed with a [`Failure`], kept as-is.
    Domain,
    /// A foreign error whose message was extracted.
    Foreign,
    /// A foreign value with no usable message.
    Unknown,
}

impl Classification {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Foreign => "foreign",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a failure signal to a [`Failure`].
///
/// Order matters: an existing `Failure` wins over a message-bearing error,
/// which wins over the unknown fallback. The opaque value itself is dropped.
#[must_use]
pub fn classify(thrown: Thrown) -> (Classification, Failure) {
    match thrown {
        Thrown::Failure(failure) => (Classification::Domain, failure),
        Thrown::Error(err) => classify_error(err),
        Thrown::Opaque(payload) => classify_opaque(payload),
    }
}

fn classify_error(err: anyhow::Error) -> (Classification, Failure) {
    match err.downcast::<Failure>() {
        Ok(failure) => (Classification::Domain, failure),
        Err(err) => from_display(&err),
    }
}

fn classify_opaque(payload: Box<dyn Any + Send>) -> (Classification, Failure) {
    let payload = match payload.downcast::<Failure>() {
        Ok(failure) => return (Classification::Domain, *failure),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<anyhow::Error>() {
        Ok(err) => return classify_error(*err),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<BoxedError>() {
        Ok(err) => return from_display(&err),
        Err(payload) => payload,
    };

    // Panic payloads from `panic!` are either a `&'static str` or a `String`.
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return from_message((*message).to_string());
    }
    match payload.downcast::<String>() {
        Ok(message) => from_message(*message),
        Err(_) => (Classification::Unknown, Failure::unknown()),
    }
}

/// A `Display` impl that reports `fmt::Error` has no usable message.
fn from_display(value: &dyn fmt::Display) -> (Classification, Failure) {
    let mut message = String::new();
    match write!(message, "{value}") {
        Ok(()) => from_message(message),
        Err(fmt::Error) => (Classification::Unknown, Failure::unknown()),
    }
}

fn from_message(message: String) -> (Classification, Failure) {
    if message.is_empty() {
        (Classification::Unknown, Failure::unknown())
    } else {
        (Classification::Foreign, Failure::new(message))
    }
}

impl Failure {
    /// Normalize any failure signal into a `Failure`.
    #[must_use]
    pub fn from_thrown(thrown: impl Into<Thrown>) -> Self {
        classify(thrown.into()).1
    }

    /// Normalize a caught panic payload into a `Failure`.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        classify_opaque(payload).1
    }
}
