//! Displayed annotations, the per-surface registry, and the visibility policy.

use crate::diagnostics::{DiagnosticId, DiagnosticProvider};
use crate::format::InlineStyle;
use crate::surface::{EditorSurface, OverlayId};
use std::ops::Range;
use tracing::debug;

/// One inline message currently shown on a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Overlay backing this annotation.
    pub overlay: OverlayId,
    /// Anchor range in character offsets.
    pub range: Range<usize>,
    /// Rendered text: the configured prefix followed by the message.
    ///
    /// The overlay may decorate this (a leading newline on the last line), but dedup compares
    /// this field only.
    pub text: String,
    /// Display style.
    pub style: InlineStyle,
    /// The diagnostic this annotation shows, if any.
    pub diagnostic: Option<DiagnosticId>,
}

/// Outcome of the visibility policy for one annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Leave the annotation on screen.
    Keep,
    /// Delete the annotation.
    Remove,
}

/// Decide whether `annotation` survives the cursor being at `cursor`.
///
/// An annotation is kept only while its diagnostic is live and its span still contains the
/// cursor. Annotations without a diagnostic are always removed.
pub fn should_remove(
    annotation: &Annotation,
    cursor: usize,
    diagnostics: &dyn DiagnosticProvider,
) -> Visibility {
    let keep = annotation
        .diagnostic
        .and_then(|id| diagnostics.diagnostic(id))
        .is_some_and(|diagnostic| diagnostic.range.contains(cursor));

    if keep {
        Visibility::Keep
    } else {
        Visibility::Remove
    }
}

/// Live annotations of one editing surface, newest first.
///
/// No two annotations reference the same diagnostic.
#[derive(Debug, Clone, Default)]
pub struct AnnotationRegistry {
    annotations: Vec<Annotation>,
}

impl AnnotationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an annotation at the front.
    ///
    /// Returns `false` and leaves the registry unchanged when an annotation for the same
    /// diagnostic is already registered.
    pub fn add(&mut self, annotation: Annotation) -> bool {
        if let Some(id) = annotation.diagnostic {
            if self.contains_diagnostic(id) {
                return false;
            }
        }
        self.annotations.insert(0, annotation);
        true
    }

    /// Live annotations, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// Live annotations as a slice, newest first.
    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Number of live annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Whether nothing is displayed.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Whether an annotation for `id` is displayed.
    pub fn contains_diagnostic(&self, id: DiagnosticId) -> bool {
        self.annotations.iter().any(|a| a.diagnostic == Some(id))
    }

    /// Whether an annotation with exactly this rendered text is displayed.
    pub fn contains_text(&self, text: &str) -> bool {
        self.annotations.iter().any(|a| a.text == text)
    }

    /// Whether any annotation is anchored inside `range` (inclusive of its end).
    pub fn starts_within(&self, range: Range<usize>) -> bool {
        self.annotations
            .iter()
            .any(|a| range.start <= a.range.start && a.range.start <= range.end)
    }

    /// Remove every annotation the visibility policy rejects at `cursor`.
    ///
    /// Survivors keep their relative order. Returns the number of annotations removed.
    pub fn remove_stale(
        &mut self,
        cursor: usize,
        diagnostics: &dyn DiagnosticProvider,
        surface: &mut dyn EditorSurface,
    ) -> usize {
        let (keep, remove): (Vec<_>, Vec<_>) = self
            .annotations
            .drain(..)
            .partition(|a| should_remove(a, cursor, diagnostics) == Visibility::Keep);
        self.annotations = keep;

        for annotation in &remove {
            surface.remove_overlay(annotation.overlay);
            debug!(
                overlay = annotation.overlay.get(),
                diagnostic = ?annotation.diagnostic,
                cursor,
                "removed stale inline annotation"
            );
        }
        remove.len()
    }

    /// Remove every annotation and its overlay.
    pub fn clear_all(&mut self, surface: &mut dyn EditorSurface) {
        for annotation in self.annotations.drain(..) {
            surface.remove_overlay(annotation.overlay);
        }
    }
}

/// Per-surface inline diagnostics state.
#[derive(Debug, Clone, Default)]
pub struct InlineState {
    /// Displayed annotations.
    pub registry: AnnotationRegistry,
    /// Cursor offset recorded by the last display call.
    pub last_position: Option<usize>,
}

impl InlineState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }
}
