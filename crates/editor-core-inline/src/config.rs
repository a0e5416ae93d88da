//! Inline diagnostics configuration.

use crate::error::InlineError;
use crate::format::DiagnosticFormatter;
use serde::Deserialize;
use std::time::Duration;

/// Default prefix prepended to every inline message.
pub const DEFAULT_PREFIX: &str = "~> ";

/// User-facing options.
///
/// Every field is optional when deserializing; missing fields take their defaults.
///
/// ```rust
/// use editor_core_inline::InlineConfig;
///
/// let config = InlineConfig::from_json_str(r#"{ "prefix": ">> " }"#).unwrap();
/// assert_eq!(config.prefix, ">> ");
/// assert!(config.display_error_id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InlineConfig {
    /// String prepended to every displayed message.
    pub prefix: String,
    /// Whether to append diagnostic codes (` [E0308]`).
    pub display_error_id: bool,
    /// Delay (milliseconds) a host may wait before calling
    /// [`InlineMode::show_at_point`](crate::InlineMode::show_at_point). Not applied by this crate.
    pub delay_ms: u64,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            display_error_id: true,
            delay_ms: 0,
        }
    }
}

impl InlineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, InlineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the message prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enable or disable diagnostic codes.
    pub fn with_display_error_id(mut self, display_error_id: bool) -> Self {
        self.display_error_id = display_error_id;
        self
    }

    /// Debounce delay as a [`Duration`].
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Formatter matching these options.
    pub fn formatter(&self) -> DiagnosticFormatter {
        DiagnosticFormatter::new(self.display_error_id)
    }
}
