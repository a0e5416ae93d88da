//! Per-surface inline diagnostics mode.
//!
//! [`InlineMode`] is the piece a host wires into its event loop:
//!
//! 1. Host toggles the mode for a surface ([`InlineMode::enable`] / [`InlineMode::disable`])
//! 2. After every cursor-moving command, host calls [`InlineMode::on_cursor_moved`]
//! 3. When the user (or an idle timer) asks for diagnostics at point, host calls
//!    [`InlineMode::show_at_point`]
//! 4. When the diagnostics engine publishes new results, host calls
//!    [`InlineMode::on_diagnostics_changed`]
//!
//! # Example
//!
//! ```rust
//! use editor_core_inline::{
//!     Diagnostic, DiagnosticId, DiagnosticRange, DiagnosticStore, InlineConfig, InlineMode,
//!     MemorySurface, Severity,
//! };
//!
//! let mut surface = MemorySurface::new("let x = 1;\nlet y = 2;\n");
//! let diagnostics = DiagnosticStore::from_diagnostics(vec![Diagnostic::new(
//!     DiagnosticId::new(1),
//!     DiagnosticRange::new(4, 5),
//!     Severity::Warning,
//!     "unused variable",
//! )]);
//!
//! let mut mode = InlineMode::new(InlineConfig::default());
//! mode.enable();
//!
//! surface.set_cursor(4).unwrap();
//! mode.show_at_point(&mut surface, &diagnostics).unwrap();
//! assert_eq!(surface.display_text(), "let x = 1;\n~> unused variable\nlet y = 2;\n");
//!
//! surface.set_cursor(15).unwrap();
//! mode.on_cursor_moved(&mut surface, &diagnostics);
//! assert_eq!(surface.overlay_count(), 0);
//! ```

use crate::annotation::{Annotation, InlineState};
use crate::config::InlineConfig;
use crate::diagnostics::{Diagnostic, DiagnosticId, DiagnosticProvider};
use crate::error::InlineError;
use crate::format::StyledMessage;
use crate::render::{InlineRenderer, PhantomRenderer, RenderContext};
use crate::surface::{EditorSurface, OverlayId};
use tracing::{debug, trace};

/// Mode state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeState {
    /// Cursor events are ignored and nothing is displayed.
    Disabled,
    /// Cursor events are observed.
    Enabled,
}

/// Inline diagnostics controller for one editing surface.
pub struct InlineMode {
    mode: ModeState,
    state: InlineState,
    config: InlineConfig,
    renderer: Box<dyn InlineRenderer>,
}

impl Default for InlineMode {
    fn default() -> Self {
        Self::new(InlineConfig::default())
    }
}

impl InlineMode {
    /// Create a disabled mode using the [`PhantomRenderer`].
    pub fn new(config: InlineConfig) -> Self {
        Self::with_renderer(config, Box::new(PhantomRenderer::new()))
    }

    /// Create a disabled mode with a custom rendering strategy.
    pub fn with_renderer(config: InlineConfig, renderer: Box<dyn InlineRenderer>) -> Self {
        Self {
            mode: ModeState::Disabled,
            state: InlineState::new(),
            config,
            renderer,
        }
    }

    /// Current mode state.
    pub fn state(&self) -> ModeState {
        self.mode
    }

    /// Whether cursor events are being observed.
    pub fn is_enabled(&self) -> bool {
        self.mode == ModeState::Enabled
    }

    /// Active options.
    pub fn config(&self) -> &InlineConfig {
        &self.config
    }

    /// Replace the options. Messages already on screen keep their text.
    pub fn set_config(&mut self, config: InlineConfig) {
        self.config = config;
    }

    /// Displayed annotations, newest first.
    pub fn annotations(&self) -> &[Annotation] {
        self.state.registry.as_slice()
    }

    /// Cursor offset recorded by the last display call.
    pub fn last_position(&self) -> Option<usize> {
        self.state.last_position
    }

    /// Start observing cursor movement. Returns `false` if already enabled.
    pub fn enable(&mut self) -> bool {
        if self.is_enabled() {
            return false;
        }
        self.mode = ModeState::Enabled;
        debug!("inline diagnostics enabled");
        true
    }

    /// Stop observing cursor movement and remove every annotation.
    ///
    /// Safe to call repeatedly.
    pub fn disable(&mut self, surface: &mut dyn EditorSurface) {
        self.renderer.clear_all(surface, &mut self.state);
        self.state.last_position = None;
        if self.is_enabled() {
            self.mode = ModeState::Disabled;
            debug!("inline diagnostics disabled");
        }
    }

    /// Flip between enabled and disabled; returns the new state.
    pub fn toggle(&mut self, surface: &mut dyn EditorSurface) -> ModeState {
        if self.is_enabled() {
            self.disable(surface);
        } else {
            self.enable();
        }
        self.mode
    }

    /// Cursor-moved hook: removes stale annotations if the cursor left the recorded position.
    ///
    /// Returns the number of annotations removed.
    pub fn on_cursor_moved(
        &mut self,
        surface: &mut dyn EditorSurface,
        diagnostics: &dyn DiagnosticProvider,
    ) -> usize {
        if !self.is_enabled() {
            return 0;
        }
        let cursor = surface.cursor();
        if self.state.last_position == Some(cursor) {
            trace!(cursor, "cursor at recorded position");
            return 0;
        }
        self.state.registry.remove_stale(cursor, diagnostics, surface)
    }

    /// Diagnostics-changed hook: drops annotations whose diagnostic vanished or no longer covers
    /// the cursor.
    pub fn on_diagnostics_changed(
        &mut self,
        surface: &mut dyn EditorSurface,
        diagnostics: &dyn DiagnosticProvider,
    ) -> usize {
        if !self.is_enabled() {
            return 0;
        }
        let cursor = surface.cursor();
        self.state.registry.remove_stale(cursor, diagnostics, surface)
    }

    /// Display every diagnostic at the cursor (and the diagnostics grouped with them) that is not
    /// displayed yet.
    ///
    /// Returns the overlays created by this call.
    pub fn show_at_point(
        &mut self,
        surface: &mut dyn EditorSurface,
        diagnostics: &dyn DiagnosticProvider,
    ) -> Result<Vec<OverlayId>, InlineError> {
        if !self.is_enabled() {
            return Ok(Vec::new());
        }
        self.on_cursor_moved(surface, diagnostics);

        let cursor = surface.cursor();
        let mut pending: Vec<&Diagnostic> = Vec::new();
        for at_point in diagnostics.diagnostics_at(cursor) {
            for related in diagnostics.related(at_point) {
                if !pending.iter().any(|d| d.id == related.id) {
                    pending.push(related);
                }
            }
        }

        let current_path = surface.path().map(|path| path.to_path_buf());
        let formatter = self.config.formatter();
        let mut created = Vec::new();
        for diagnostic in pending {
            if self.state.registry.contains_diagnostic(diagnostic.id) {
                continue;
            }
            let message = formatter.format(diagnostic, current_path.as_deref());
            let position = if diagnostic.is_foreign(current_path.as_deref()) {
                cursor
            } else {
                diagnostic.range.start.min(surface.len_chars())
            };

            let mut cx = RenderContext {
                surface: &mut *surface,
                diagnostics,
                state: &mut self.state,
                config: &self.config,
            };
            if let Some(overlay) =
                self.renderer
                    .render(&mut cx, &message, Some(position), Some(diagnostic.id))?
            {
                created.push(overlay);
            }
        }
        Ok(created)
    }

    /// Display a caller-supplied message through the active renderer.
    ///
    /// `position` defaults to the cursor and `diagnostic` to the first diagnostic attached there.
    pub fn display(
        &mut self,
        surface: &mut dyn EditorSurface,
        diagnostics: &dyn DiagnosticProvider,
        message: &StyledMessage,
        position: Option<usize>,
        diagnostic: Option<DiagnosticId>,
    ) -> Result<Option<OverlayId>, InlineError> {
        if !self.is_enabled() {
            return Ok(None);
        }
        let mut cx = RenderContext {
            surface,
            diagnostics,
            state: &mut self.state,
            config: &self.config,
        };
        self.renderer.render(&mut cx, message, position, diagnostic)
    }
}
