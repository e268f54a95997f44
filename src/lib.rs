#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # settle
//!
//! Reify the outcome of an async operation as a value.
//!
//! This library re-exports the settle workspace crates for convenience.
//! See [`settle_core`] for the `Outcome` container, the `Failure`
//! normalization rules and the `execute` adapter.

// Re-export all crates
pub use settle_core;
pub use settle_core::*;
