//! The execution adapter: run an operation, always get an [`Outcome`].
//!
//! The adapter owns the single suspension point of an execution. Everything
//! that can go wrong inside the operation (an `Err`, a panic while building
//! the future, a panic while polling it) is caught there and classified
//! into a [`Failure`](crate::Failure). Nothing crosses the boundary as
//! control flow.
//!
//! Panics are only intercepted when the binary is built with
//! `panic = "unwind"` (the default).

use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};

use futures::FutureExt;
use tracing::Instrument;

use crate::config::ExecutorConfig;
use crate::failure::Failure;
use crate::outcome::Outcome;
use crate::thrown::{self, Classification, Thrown};

/// Runs operations and reifies their settlement as an [`Outcome`].
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: ExecutorConfig,
}

impl Executor {
    #[must_use]
    pub const fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Start the operation, wait for it to settle and classify the result.
    ///
    /// The returned future always completes with an `Outcome`; it never
    /// panics because the operation did.
    pub async fn execute<T, E, F, Fut>(&self, start: F) -> Outcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<Thrown>,
    {
        let span = tracing::debug_span!("execute", label = %self.config.label());

        async move {
            let settled = match catch_unwind(AssertUnwindSafe(start)) {
                Ok(operation) => AssertUnwindSafe(operation).catch_unwind().await,
                Err(payload) => Err(payload),
            };

            match settled {
                Ok(Ok(value)) => {
                    tracing::debug!(classification = "resolved", "operation settled");
                    Outcome::Resolved(value)
                }
                Ok(Err(thrown)) => self.reject(thrown.into()),
                Err(payload) => self.reject(Thrown::Opaque(payload)),
            }
        }
        .instrument(span)
        .await
    }

    /// Classify and log a rejection.
    ///
    /// Both steps can run consumer `Display` and `Fault::message` code; a
    /// panic in either is contained here.
    fn reject<T>(&self, thrown: Thrown) -> Outcome<T> {
        let (classification, failure) = catch_unwind(AssertUnwindSafe(|| thrown::classify(thrown)))
            .unwrap_or_else(|_| (Classification::Unknown, Failure::unknown()));
        tracing::debug!(%classification, "operation settled");

        if self.config.log_rejections() {
            let logged = catch_unwind(AssertUnwindSafe(|| {
                tracing::warn!(%classification, "operation rejected: {}", failure);
            }));
            if logged.is_err() {
                tracing::warn!(%classification, "operation rejected with an unprintable failure");
            }
        }
        Outcome::Rejected(failure)
    }
}

/// Run `start` with the default executor.
///
/// # Examples
///
/// ```
/// use settle_core::{execute, Failure};
///
/// let outcome = futures::executor::block_on(execute(|| async {
///     Err::<u32, _>(Failure::new("disk full"))
/// }));
/// assert_eq!(outcome.failure().map(Failure::message).as_deref(), Some("disk full"));
/// ```
pub async fn execute<T, E, F, Fut>(start: F) -> Outcome<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<Thrown>,
{
    Executor::default().execute(start).await
}

/// Method-call form of [`execute`] for futures that are already built.
///
/// ```
/// use settle_core::Settle;
///
/// let outcome = futures::executor::block_on(async { Ok::<_, anyhow::Error>(42) }.settle());
/// assert_eq!(outcome.value(), 42);
/// ```
pub trait Settle: Sized {
    type Value;

    /// Await this future and classify its settlement.
    fn settle(self) -> impl Future<Output = Outcome<Self::Value>>;
}

impl<Fut, T, E> Settle for Fut
where
    Fut: Future<Output = Result<T, E>>,
    E: Into<Thrown>,
{
    type Value = T;

    fn settle(self) -> impl Future<Output = Outcome<T>> {
        execute(move || self)
    }
}

#[cfg(test)]
mod tests {
    use std::future::{Ready, ready};

    use tokio_test::block_on;

    use std::fmt;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("quota exceeded for {tenant}")]
    struct QuotaFault {
        tenant: String,
    }

    impl crate::Fault for QuotaFault {}

    #[derive(Debug)]
    struct UnprintableError;

    impl fmt::Display for UnprintableError {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    impl std::error::Error for UnprintableError {}

    #[derive(Debug)]
    struct ExplodingDisplay;

    impl fmt::Display for ExplodingDisplay {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            std::panic::panic_any("display exploded")
        }
    }

    impl std::error::Error for ExplodingDisplay {}

    async fn explode(payload: Box<dyn std::any::Any + Send>) -> Result<i32, Thrown> {
        std::panic::resume_unwind(payload)
    }

    fn explode_before_start() -> Ready<Result<i32, Thrown>> {
        std::panic::panic_any(String::from("refused to start"))
    }

    #[test]
    fn test_execute_resolves() {
        let outcome = block_on(execute(|| async { Ok::<_, Thrown>(42) }));
        assert!(outcome.is_resolved());
        assert_eq!(outcome.value(), 42);
    }

    #[test]
    fn test_execute_domain_failure() {
        let outcome: Outcome<i32> =
            block_on(execute(|| async { Err(Failure::new("disk full")) }));
        assert!(outcome.is_rejected());
        assert_eq!(
            outcome.failure().map(Failure::message).as_deref(),
            Some("disk full")
        );
    }

    #[test]
    fn test_execute_preserves_custom_fault() {
        let outcome: Outcome<()> = block_on(execute(|| async {
            Err(Failure::custom(QuotaFault {
                tenant: "acme".into(),
            }))
        }));
        let tenant = outcome
            .failure()
            .and_then(|f| f.downcast_ref::<QuotaFault>())
            .map(|q| q.tenant.as_str());
        assert_eq!(tenant, Some("acme"));
    }

    #[test]
    fn test_execute_foreign_error() {
        let outcome: Outcome<i32> =
            block_on(execute(|| async { Err(anyhow::anyhow!("timeout")) }));
        assert_eq!(
            outcome.failure().map(Failure::message).as_deref(),
            Some("timeout")
        );
    }

    #[test]
    fn test_execute_question_mark_in_operation() {
        let outcome: Outcome<u16> = block_on(execute(|| async {
            let port: u16 = "not-a-port".parse()?;
            Ok::<_, anyhow::Error>(port)
        }));
        assert!(outcome.is_rejected());
        assert_eq!(outcome.value(), 0);
        assert_eq!(
            outcome.failure().map(Failure::message).as_deref(),
            Some("invalid digit found in string")
        );
    }

    #[test]
    fn test_execute_opaque_value() {
        let outcome: Outcome<i32> =
            block_on(execute(|| async { Err(Thrown::opaque(12345_i32)) }));
        assert_eq!(
            outcome.failure().map(Failure::message).as_deref(),
            Some("an unknown error occurred")
        );
    }

    #[test]
    fn test_execute_catches_panic_while_polling() {
        let outcome = block_on(execute(|| explode(Box::new("poisoned"))));
        assert_eq!(
            outcome.failure().map(Failure::message).as_deref(),
            Some("poisoned")
        );

        let outcome = block_on(execute(|| explode(Box::new(12345_i32))));
        assert!(outcome.failure().is_some_and(Failure::is_unknown));

        let outcome = block_on(execute(|| explode(Box::new(Failure::new("typed")))));
        assert_eq!(
            outcome.failure().map(Failure::message).as_deref(),
            Some("typed")
        );
    }

    #[test]
    fn test_execute_catches_panic_before_start() {
        let outcome = block_on(execute(explode_before_start));
        assert_eq!(
            outcome.failure().map(Failure::message).as_deref(),
            Some("refused to start")
        );
    }

    #[test]
    fn test_execute_error_with_failing_display() {
        let outcome: Outcome<i32> =
            block_on(execute(|| async { Err(anyhow::Error::new(UnprintableError)) }));
        assert!(outcome.is_rejected());
        assert!(outcome.failure().is_some_and(Failure::is_unknown));
    }

    #[test]
    fn test_execute_error_with_panicking_display() {
        let outcome: Outcome<i32> =
            block_on(execute(|| async { Err(anyhow::Error::new(ExplodingDisplay)) }));
        assert!(outcome.is_rejected());
        assert!(outcome.failure().is_some_and(Failure::is_unknown));
    }

    #[test]
    fn test_execute_boxed_std_error() {
        let outcome: Outcome<u16> = block_on(execute(|| async {
            let port: u16 = "70000".parse()?;
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(port)
        }));
        assert_eq!(
            outcome.failure().map(Failure::message).as_deref(),
            Some("number too large to fit in target type")
        );
    }

    #[test]
    fn test_execute_synchronous_ready_future() {
        let outcome = block_on(execute(|| ready(Ok::<_, Failure>("done"))));
        assert_eq!(outcome.value(), "done");
    }

    #[test]
    fn test_executor_with_config() {
        let config = ExecutorConfig::builder()
            .with_label("load-profile")
            .log_rejections(true)
            .build();
        assert!(config.is_ok());

        let executor = Executor::new(config.unwrap_or_default());
        assert_eq!(executor.config().label(), "load-profile");

        let outcome: Outcome<i32> =
            block_on(executor.execute(|| async { Err(Failure::new("not found")) }));
        assert!(outcome.is_rejected());
    }

    #[test]
    fn test_settle_extension() {
        let outcome = block_on(async { Ok::<_, Failure>(5) }.settle());
        assert_eq!(outcome.value(), 5);

        let outcome = block_on(async { Err::<i32, _>(anyhow::anyhow!("nope")) }.settle());
        assert!(outcome.is_rejected());
    }
}
