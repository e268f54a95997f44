//! The normalized, message-bearing failure type.
//!
//! Every way an operation can fail ends up as a [`Failure`]: an explicit
//! domain failure built by the operation author, a custom consumer-defined
//! [`Fault`], or a failure synthesized from a foreign error value.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::format::{self, Arg};
use crate::result::Result;

/// Message carried by failures that have nothing more specific to say.
pub const UNKNOWN_ERROR_MESSAGE: &str = "an unknown error occurred";

mod any {
    use std::any::Any;

    /// Upcast helper so custom faults can be downcast again.
    pub trait AsAny {
        fn as_any(&self) -> &dyn Any;
    }

    impl<T: Any> AsAny for T {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }
}

/// Capability implemented by consumer-defined failure payloads.
///
/// A fault is any `std::error::Error` that can render a message. The default
/// message is the `Display` output; override [`Fault::message`] to compose
/// extra fields into it.
///
/// # Examples
///
/// ```
/// use settle_core::{Failure, Fault};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("{reason}")]
/// struct HttpFault {
///     status: u16,
///     reason: String,
/// }
///
/// impl Fault for HttpFault {
///     fn message(&self) -> String {
///         format!("[{}] {}", self.status, self.reason)
///     }
/// }
///
/// let failure = Failure::custom(HttpFault { status: 404, reason: "not found".into() });
/// assert_eq!(failure.message(), "[404] not found");
/// assert_eq!(failure.downcast_ref::<HttpFault>().map(|f| f.status), Some(404));
/// ```
pub trait Fault: any::AsAny + std::error::Error + Send + Sync + 'static {
    /// Render the human-readable message for this fault.
    fn message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug)]
enum Repr {
    Unknown,
    Message(String),
    Custom(Box<dyn Fault>),
}

/// Why an operation did not produce a value.
///
/// A `Failure` always renders a non-empty message. It is owned by exactly
/// one [`crate::Outcome`] and is never cloned or shared.
#[derive(Debug)]
pub struct Failure {
    repr: Repr,
}

impl Failure {
    /// Create a failure carrying `message` verbatim.
    ///
    /// An empty message is replaced by [`UNKNOWN_ERROR_MESSAGE`].
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            return Self::unknown();
        }
        Self {
            repr: Repr::Message(message),
        }
    }

    /// Create a failure from a positional `%` template.
    ///
    /// # Errors
    ///
    /// Returns a construction error when `args` do not satisfy the
    /// placeholders of `template`. See [`crate::format`] for the verbs.
    pub fn formatted(template: &str, args: &[Arg]) -> Result<Self> {
        format::interpolate(template, args).map(Self::new)
    }

    /// The canonical failure for foreign values with no usable message.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            repr: Repr::Unknown,
        }
    }

    /// Wrap a consumer-defined fault, keeping its type and fields.
    #[must_use]
    pub fn custom<F: Fault>(fault: F) -> Self {
        Self {
            repr: Repr::Custom(Box::new(fault)),
        }
    }

    /// The failure's message.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.repr {
            Repr::Unknown => UNKNOWN_ERROR_MESSAGE.to_string(),
            Repr::Message(message) => message.clone(),
            Repr::Custom(fault) => {
                let message = fault.message();
                if message.is_empty() {
                    UNKNOWN_ERROR_MESSAGE.to_string()
                } else {
                    message
                }
            }
        }
    }

    /// Whether this failure had nothing more specific to say.
    ///
    /// True for [`Failure::unknown`], an empty message, and a custom fault
    /// that renders nothing. A domain failure whose text happens to equal
    /// [`UNKNOWN_ERROR_MESSAGE`] is not unknown.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        match &self.repr {
            Repr::Unknown => true,
            Repr::Message(_) => false,
            Repr::Custom(fault) => fault.message().is_empty(),
        }
    }

    /// Whether this failure wraps a consumer-defined [`Fault`].
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self.repr, Repr::Custom(_))
    }

    /// Borrow the wrapped custom fault as `F`, if that is what it is.
    #[must_use]
    pub fn downcast_ref<F: Fault>(&self) -> Option<&F> {
        match &self.repr {
            Repr::Custom(fault) => {
                let fault: &dyn Fault = &**fault;
                fault.as_any().downcast_ref::<F>()
            }
            Repr::Unknown | Repr::Message(_) => None,
        }
    }

    /// Render this failure as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "message": self.message() })
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Unknown => f.write_str(UNKNOWN_ERROR_MESSAGE),
            Repr::Message(message) => f.write_str(message),
            Repr::Custom(_) => f.write_str(&self.message()),
        }
    }
}

impl std::error::Error for Failure {}

impl Serialize for Failure {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Failure", 1)?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}

/// Build a [`Failure`] from a compile-time checked format string.
///
/// ```
/// let failure = settle_core::failure!("{} items failed", 3);
/// assert_eq!(failure.message(), "3 items failed");
/// ```
#[macro_export]
macro_rules! failure {
    ($($arg:tt)*) => {
        $crate::Failure::new(::std::format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[derive(Debug, thiserror::Error)]
    #[error("{reason}")]
    struct StatusFault {
        status: u16,
        reason: String,
    }

    impl Fault for StatusFault {
        fn message(&self) -> String {
            format!("{}: {}", self.status, self.reason)
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("")]
    struct SilentFault;

    impl Fault for SilentFault {}

    #[test]
    fn test_new_stores_message_verbatim() {
        let failure = Failure::new("disk full");
        assert_eq!(failure.message(), "disk full");
        assert_eq!(failure.to_string(), "disk full");
        assert!(!failure.is_unknown());
        assert!(!failure.is_custom());
    }

    #[test]
    fn test_new_empty_message_falls_back_to_unknown() {
        assert!(Failure::new("").is_unknown());
    }

    #[test]
    fn test_unknown_message() {
        assert_eq!(Failure::unknown().message(), "an unknown error occurred");
        assert_eq!(Failure::unknown().to_string(), "an unknown error occurred");
    }

    #[test]
    fn test_domain_failure_with_unknown_text_is_not_unknown() {
        let failure = Failure::new(UNKNOWN_ERROR_MESSAGE);
        assert_eq!(failure.message(), Failure::unknown().message());
        assert!(!failure.is_unknown());
        assert!(Failure::unknown().is_unknown());
    }

    #[test]
    fn test_formatted() {
        let failure = Failure::formatted("%d items failed", &[3.into()]);
        assert_eq!(
            failure.map(|f| f.message()),
            Ok("3 items failed".to_string())
        );
    }

    #[test]
    fn test_formatted_mismatch_is_construction_error() {
        assert_eq!(
            Failure::formatted("%d items failed", &[]).map(|f| f.message()),
            Err(Error::MissingArgument { index: 0 })
        );
        assert_eq!(
            Failure::formatted("%d items failed", &["x".into()]).map(|f| f.message()),
            Err(Error::argument_mismatch('d', 0, "string"))
        );
    }

    #[test]
    fn test_failure_macro() {
        let name = "upload";
        assert_eq!(failure!("{name} timed out").message(), "upload timed out");
    }

    #[test]
    fn test_custom_overrides_message() {
        let failure = Failure::custom(StatusFault {
            status: 503,
            reason: "unavailable".into(),
        });
        assert!(failure.is_custom());
        assert_eq!(failure.message(), "503: unavailable");
        assert_eq!(failure.to_string(), "503: unavailable");
    }

    #[test]
    fn test_custom_downcast() {
        let failure = Failure::custom(StatusFault {
            status: 404,
            reason: "missing".into(),
        });
        assert_eq!(
            failure.downcast_ref::<StatusFault>().map(|f| f.status),
            Some(404)
        );
        assert!(failure.downcast_ref::<SilentFault>().is_none());
        assert!(Failure::new("plain").downcast_ref::<StatusFault>().is_none());
    }

    #[test]
    fn test_custom_with_empty_message_is_unknown() {
        assert!(Failure::custom(SilentFault).is_unknown());
    }

    #[test]
    fn test_to_json() {
        let json = Failure::new("disk full").to_json();
        assert_eq!(json, serde_json::json!({ "message": "disk full" }));
    }

    #[test]
    fn test_serialize() {
        let rendered = serde_json::to_string(&Failure::new("boom"));
        assert_eq!(rendered.ok().as_deref(), Some(r#"{"message":"boom"}"#));
    }
}
