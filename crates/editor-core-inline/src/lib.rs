#![warn(missing_docs)]
//! Editor Core Inline - inline diagnostics for headless editors
//!
//! # Overview
//!
//! `editor-core-inline` shows checker/linter diagnostics as phantom lines directly beneath the
//! code they refer to. Messages appear when the cursor is on a diagnostic and disappear as soon as
//! the cursor leaves it, or the diagnostic itself goes away.
//!
//! The crate does not detect diagnostics, store text, or draw anything. The host supplies those
//! through two seams:
//!
//! - [`DiagnosticProvider`] - read access to the diagnostics engine
//! - [`EditorSurface`] - cursor, line addressing and overlay primitives of one editor view
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  InlineMode (enable / cursor hooks)         │  ← Host-facing API
//! ├─────────────────────────────────────────────┤
//! │  DiagnosticFormatter + InlineConfig         │  ← Message text & style
//! ├─────────────────────────────────────────────┤
//! │  InlineRenderer (PhantomRenderer)           │  ← Placement
//! ├─────────────────────────────────────────────┤
//! │  AnnotationRegistry + visibility policy     │  ← Per-surface state
//! ├─────────────────────────────────────────────┤
//! │  DiagnosticProvider / EditorSurface         │  ← Host seams
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Module Description
//!
//! - [`diagnostics`] - diagnostic model, severity aliases, provider trait, in-memory store
//! - [`surface`] - surface trait, overlays, rope-backed in-memory surface
//! - [`format`] - diagnostic to styled message
//! - [`annotation`] - annotations, registry, visibility policy
//! - [`render`] - rendering strategies
//! - [`mode`] - per-surface controller
//! - [`config`] - options

pub mod annotation;
pub mod config;
pub mod diagnostics;
mod error;
pub mod format;
pub mod mode;
pub mod render;
pub mod surface;

pub use annotation::{Annotation, AnnotationRegistry, InlineState, Visibility, should_remove};
pub use config::{DEFAULT_PREFIX, InlineConfig};
pub use diagnostics::{
    Diagnostic, DiagnosticEdit, DiagnosticId, DiagnosticProvider, DiagnosticRange,
    DiagnosticStore, SEVERITY_ALIASES, Severity,
};
pub use error::InlineError;
pub use format::{
    DiagnosticFormatter, INLINE_ERROR_STYLE_ID, INLINE_NOTE_STYLE_ID, INLINE_WARNING_STYLE_ID,
    InlineStyle, StyledMessage,
};
pub use mode::{InlineMode, ModeState};
pub use render::{InlineRenderer, PhantomRenderer, RenderContext};
pub use surface::{EditorSurface, MemorySurface, Overlay, OverlayId, StyleId};
