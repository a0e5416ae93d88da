//! Error type shared by the inline diagnostics layer.

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while configuring or rendering inline diagnostics.
pub enum InlineError {
    #[error("invalid overlay range {start}..{end} (document has {len} chars)")]
    /// An overlay range was reversed or ran past the end of the document.
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
        /// Document length in characters.
        len: usize,
    },

    #[error("invalid offset: {0}")]
    /// A character offset was outside the document.
    InvalidOffset(usize),

    #[error("invalid position: line {line}, column {column}")]
    /// A logical position was outside the document.
    InvalidPosition {
        /// Logical line index.
        line: usize,
        /// Column in characters.
        column: usize,
    },

    #[error("unknown severity tag '{0}'")]
    /// A producer severity tag matched no entry of the alias table.
    UnknownSeverity(String),

    #[error("config parse error: {0}")]
    /// Configuration or diagnostics JSON failed to deserialize.
    Config(#[from] serde_json::Error),
}
