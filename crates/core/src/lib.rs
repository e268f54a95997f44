//! # settle-core
//!
//! Turn the settlement of an asynchronous operation into a value.
//!
//! [`execute`] runs an operation and always yields an [`Outcome`]: either
//! the value it produced, or a [`Failure`] describing why it did not. Errors,
//! foreign error values and panics inside the operation are all classified
//! into a `Failure`, so callers never need a catch-all.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` / `expect()` / `panic!()` in library code
//! - No `unsafe`
//! - Construction mistakes (bad format templates, bad config) are returned
//!   as [`Error`], never swallowed
//!
//! ## Example
//!
//! ```
//! use settle_core::{execute, Failure, Outcome};
//!
//! # futures::executor::block_on(async {
//! let outcome: Outcome<u32> = execute(|| async {
//!     Err(Failure::formatted("%d items failed", &[3.into()]).unwrap_or_else(|_| Failure::unknown()))
//! })
//! .await;
//!
//! outcome
//!     .on_resolved(|count| println!("processed {count}"))
//!     .on_rejected(|failure| println!("failed: {failure}"));
//!
//! assert_eq!(outcome.failure().map(Failure::message).as_deref(), Some("3 items failed"));
//! # });
//! ```

pub mod config;
mod error;
pub mod execute;
mod failure;
pub mod format;
mod outcome;
mod result;
mod thrown;

pub use config::{ExecutorConfig, ExecutorConfigBuilder};
pub use error::Error;
pub use execute::{Executor, Settle, execute};
pub use failure::{Failure, Fault, UNKNOWN_ERROR_MESSAGE};
pub use format::Arg;
pub use outcome::Outcome;
pub use result::{Result, ResultExt};
pub use thrown::{Classification, Thrown, classify};
