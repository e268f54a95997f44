//! Executor configuration.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::result::Result;

const DEFAULT_LABEL: &str = "operation";
const MAX_LABEL_LEN: usize = 64;

/// A validated executor configuration.
///
/// Only obtainable through [`ExecutorConfig::builder`],
/// [`ExecutorConfig::from_toml_str`] or `Default`, so the label has always
/// passed [`ExecutorConfig::validate_label`].
///
/// ```compile_fail
/// let config = settle_core::ExecutorConfig {
///     label: "fetch user".into(),
///     log_rejections: false,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorConfig {
    label: String,
    log_rejections: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            log_rejections: false,
        }
    }
}

impl ExecutorConfig {
    /// Create a new config builder.
    #[must_use]
    pub const fn builder() -> ExecutorConfigBuilder {
        ExecutorConfigBuilder::new()
    }

    /// Name of the tracing span each execution runs in.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether every rejection is also emitted at `warn` level.
    #[must_use]
    pub const fn log_rejections(&self) -> bool {
        self.log_rejections
    }

    /// Parse and validate a configuration from TOML.
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, has unknown keys, or the
    /// resulting configuration fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        Self::validate_label(&config.label)?;
        Ok(config)
    }

    /// Validate a span label.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is empty, too long, or contains
    /// whitespace.
    pub fn validate_label(label: &str) -> Result<()> {
        if label.is_empty() {
            return Err(Error::invalid_config("label cannot be empty"));
        }

        if label.chars().count() > MAX_LABEL_LEN {
            return Err(Error::invalid_config(format!(
                "label cannot exceed {MAX_LABEL_LEN} characters"
            )));
        }

        if label.chars().any(char::is_whitespace) {
            return Err(Error::invalid_config("label cannot contain whitespace"));
        }

        Ok(())
    }
}

/// Configuration builder with fallible construction.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfigBuilder {
    label: Option<String>,
    log_rejections: bool,
}

impl ExecutorConfigBuilder {
    /// Create a new config builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            label: None,
            log_rejections: false,
        }
    }

    /// Set the span label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Log every rejection at `warn` level.
    #[must_use]
    pub fn log_rejections(mut self, enabled: bool) -> Self {
        self.log_rejections = enabled;
        self
    }

    /// Build the configuration, returning an error if validation fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is invalid.
    pub fn build(self) -> Result<ExecutorConfig> {
        let label = self.label.unwrap_or_else(|| DEFAULT_LABEL.to_string());
        ExecutorConfig::validate_label(&label).map(|()| ExecutorConfig {
            label,
            log_rejections: self.log_rejections,
        })
    }
}
