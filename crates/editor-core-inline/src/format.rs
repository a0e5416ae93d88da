//! Turning diagnostics into styled inline messages.

use crate::diagnostics::{Diagnostic, Severity};
use crate::surface::StyleId;
use std::path::Path;

/// Built-in style id for inline notes.
///
/// Consumers should map this to a muted/informational style.
pub const INLINE_NOTE_STYLE_ID: StyleId = 0x0500_0001;
/// Built-in style id for inline warnings.
pub const INLINE_WARNING_STYLE_ID: StyleId = 0x0500_0002;
/// Built-in style id for inline errors.
pub const INLINE_ERROR_STYLE_ID: StyleId = 0x0500_0003;

/// Display style of an inline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineStyle {
    /// Style for notes.
    Note,
    /// Style for warnings.
    Warning,
    /// Style for errors.
    Error,
}

impl InlineStyle {
    /// The host-themed style id.
    pub const fn style_id(self) -> StyleId {
        match self {
            InlineStyle::Note => INLINE_NOTE_STYLE_ID,
            InlineStyle::Warning => INLINE_WARNING_STYLE_ID,
            InlineStyle::Error => INLINE_ERROR_STYLE_ID,
        }
    }
}

impl From<Severity> for InlineStyle {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Note => InlineStyle::Note,
            Severity::Warning => InlineStyle::Warning,
            Severity::Error => InlineStyle::Error,
        }
    }
}

/// Message text plus the style to show it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledMessage {
    /// Message text (without the inline prefix).
    pub text: String,
    /// Display style.
    pub style: InlineStyle,
}

impl StyledMessage {
    /// Create a styled message.
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Formats diagnostics for inline display.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticFormatter {
    /// Append ` [<code>]` when the diagnostic has a code.
    pub display_error_id: bool,
}

impl Default for DiagnosticFormatter {
    fn default() -> Self {
        Self {
            display_error_id: true,
        }
    }
}

impl DiagnosticFormatter {
    /// Create a formatter.
    pub fn new(display_error_id: bool) -> Self {
        Self { display_error_id }
    }

    /// Format `diagnostic` as seen from a surface showing `current_path`.
    pub fn format(&self, diagnostic: &Diagnostic, current_path: Option<&Path>) -> StyledMessage {
        let mut text = String::new();

        if diagnostic.is_foreign(current_path) {
            if let Some(origin) = &diagnostic.origin {
                text.push_str(&format!("In \"{}\":\n", origin.display()));
            }
        }

        text.push_str(&diagnostic.message);

        if self.display_error_id {
            if let Some(code) = &diagnostic.code {
                text.push_str(&format!(" [{code}]"));
            }
        }

        StyledMessage::new(text, diagnostic.severity.into())
    }
}
