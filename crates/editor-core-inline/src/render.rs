//! Rendering strategies for inline messages.
//!
//! A renderer decides where an inline message goes and creates the overlay for it. The default
//! [`PhantomRenderer`] places each message on a virtual line directly beneath the line it refers
//! to. Hosts with a different presentation (a popup, a side panel) implement [`InlineRenderer`]
//! themselves and hand it to [`InlineMode::with_renderer`](crate::InlineMode::with_renderer).

use crate::annotation::{Annotation, InlineState};
use crate::config::InlineConfig;
use crate::diagnostics::{DiagnosticId, DiagnosticProvider};
use crate::error::InlineError;
use crate::format::StyledMessage;
use crate::surface::{EditorSurface, Overlay, OverlayId};
use tracing::{debug, trace};

/// Everything a renderer may touch while displaying a message.
pub struct RenderContext<'a> {
    /// Surface to draw on.
    pub surface: &'a mut dyn EditorSurface,
    /// Diagnostics engine.
    pub diagnostics: &'a dyn DiagnosticProvider,
    /// Per-surface registry and cursor marker.
    pub state: &'a mut InlineState,
    /// Active options.
    pub config: &'a InlineConfig,
}

/// Pluggable display/clear strategy.
pub trait InlineRenderer {
    /// Display `message` at `position` (default: the cursor) for `diagnostic` (default: the first
    /// diagnostic attached at that position).
    ///
    /// Returns the created overlay, or `None` when nothing new was displayed.
    fn render(
        &mut self,
        cx: &mut RenderContext<'_>,
        message: &StyledMessage,
        position: Option<usize>,
        diagnostic: Option<DiagnosticId>,
    ) -> Result<Option<OverlayId>, InlineError>;

    /// Remove everything this renderer displayed.
    fn clear_all(&mut self, surface: &mut dyn EditorSurface, state: &mut InlineState);
}

/// Renders messages as phantom lines beneath the code.
///
/// Starting at the line of the requested position, the renderer skips lines that already carry
/// an annotation, so several messages for the same line stack downwards instead of overlapping.
/// On the last line of the document the message is prefixed with a newline, since there is no
/// following line for it to sit on.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhantomRenderer;

impl PhantomRenderer {
    /// Create a phantom renderer.
    pub fn new() -> Self {
        Self
    }
}

impl InlineRenderer for PhantomRenderer {
    fn render(
        &mut self,
        cx: &mut RenderContext<'_>,
        message: &StyledMessage,
        position: Option<usize>,
        diagnostic: Option<DiagnosticId>,
    ) -> Result<Option<OverlayId>, InlineError> {
        let cursor = cx.surface.cursor();
        // Recorded even when nothing gets displayed below.
        cx.state.last_position = Some(cursor);

        let position = position.unwrap_or(cursor);
        if position > cx.surface.len_chars() {
            return Err(InlineError::InvalidOffset(position));
        }
        let diagnostic = diagnostic.or_else(|| {
            cx.diagnostics
                .diagnostics_at(position)
                .first()
                .map(|diagnostic| diagnostic.id)
        });

        let last_line = cx.surface.line_count().saturating_sub(1);
        let mut line = cx.surface.line_of_offset(position);
        while line < last_line && cx.state.registry.starts_within(cx.surface.line_bounds(line)) {
            line += 1;
        }
        let bounds = cx.surface.line_bounds(line);
        let is_last = line == last_line;

        let text = format!("{}{}", cx.config.prefix, message.text);
        if cx.state.registry.contains_text(&text) {
            trace!(line, "inline message already displayed");
            return Ok(None);
        }
        if let Some(id) = diagnostic {
            if cx.state.registry.contains_diagnostic(id) {
                trace!(diagnostic = id.get(), "diagnostic already displayed");
                return Ok(None);
            }
        }

        let range = if is_last {
            bounds
        } else {
            bounds.end..cx.surface.line_bounds(line + 1).start
        };
        // The last line has no following line to sit on.
        let virtual_text = if is_last {
            format!("\n{text}")
        } else {
            text.clone()
        };
        let overlay = cx.surface.create_overlay(Overlay {
            range: range.clone(),
            text: virtual_text,
            style: message.style.style_id(),
        })?;

        debug!(
            overlay = overlay.get(),
            line,
            diagnostic = ?diagnostic,
            "displayed inline annotation"
        );
        let added = cx.state.registry.add(Annotation {
            overlay,
            range,
            text,
            style: message.style,
            diagnostic,
        });
        debug_assert!(added, "registry refused a checked annotation");
        Ok(Some(overlay))
    }

    fn clear_all(&mut self, surface: &mut dyn EditorSurface, state: &mut InlineState) {
        let count = state.registry.len();
        state.registry.clear_all(surface);
        if count > 0 {
            debug!(count, "cleared inline annotations");
        }
    }
}
