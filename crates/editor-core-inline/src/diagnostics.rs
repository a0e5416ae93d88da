//! Diagnostics data model and the provider seam.
//!
//! Diagnostics are owned by the host's checker/linter engine. This crate only reads them through
//! [`DiagnosticProvider`]. [`DiagnosticStore`] is a small in-memory provider for hosts that do not
//! have an engine of their own yet (and for tests).
//!
//! Producers tag severities in many ways (`"warning"`, `"clippy::warning"`, LSP `2`, ...). All of
//! them are resolved once, at ingestion, to one of three canonical [`Severity`] values through a
//! fixed alias table.

use crate::error::InlineError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Stable identity of a diagnostic inside its provider.
///
/// Annotations keep a `DiagnosticId` as their back-reference; liveness is checked by asking the
/// provider whether the id is still present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticId(pub u64);

impl DiagnosticId {
    /// Create a diagnostic id from a raw numeric identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A character-offset span (`start..end`) in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DiagnosticRange {
    /// Range start offset, in Unicode scalar values (`char`) from the start of the document.
    pub start: usize,
    /// Range end offset, in Unicode scalar values (`char`) from the start of the document.
    pub end: usize,
}

impl DiagnosticRange {
    /// Create a new diagnostic range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether the cursor at `offset` is still "on" this diagnostic.
    ///
    /// Both ends are inclusive: a cursor resting right after the flagged symbol still belongs to
    /// it.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Whether the diagnostic is attached to the character at `offset` (half-open; an empty range
    /// is attached at its start).
    pub fn covers(&self, offset: usize) -> bool {
        if self.start == self.end {
            offset == self.start
        } else {
            self.start <= offset && offset < self.end
        }
    }
}

/// Canonical severity classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "SeverityTag")]
pub enum Severity {
    /// Informational notes, hints and help messages.
    Note,
    /// Warnings.
    Warning,
    /// Errors.
    Error,
}

/// Producer tags and the canonical severity each one resolves to.
///
/// Tags are matched case-insensitively against the last segment of the producer tag, so
/// `"clippy::warning"`, `"rustc-error"` and `"Warning"` resolve like their bare forms.
pub const SEVERITY_ALIASES: &[(&str, Severity)] = &[
    ("error", Severity::Error),
    ("err", Severity::Error),
    ("fatal", Severity::Error),
    ("warning", Severity::Warning),
    ("warn", Severity::Warning),
    ("note", Severity::Note),
    ("info", Severity::Note),
    ("information", Severity::Note),
    ("hint", Severity::Note),
    ("help", Severity::Note),
];

impl Severity {
    /// Resolve a producer-specific severity tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lowered = tag.trim().to_ascii_lowercase();
        let segment = lowered
            .rsplit(|c: char| matches!(c, ':' | '-' | '/' | '.'))
            .next()
            .unwrap_or(lowered.as_str());

        SEVERITY_ALIASES
            .iter()
            .find(|(alias, _)| *alias == segment)
            .map(|(_, severity)| *severity)
    }

    /// Resolve an LSP `DiagnosticSeverity` number (1 = Error .. 4 = Hint).
    pub fn from_lsp(severity: u64) -> Option<Self> {
        match severity {
            1 => Some(Severity::Error),
            2 => Some(Severity::Warning),
            3 | 4 => Some(Severity::Note),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = InlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::from_tag(s).ok_or_else(|| InlineError::UnknownSeverity(s.to_string()))
    }
}

/// Wire form of a severity: either a producer tag or an LSP number.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityTag {
    Lsp(u64),
    Tag(String),
}

impl TryFrom<SeverityTag> for Severity {
    type Error = InlineError;

    fn try_from(tag: SeverityTag) -> Result<Self, InlineError> {
        match tag {
            SeverityTag::Lsp(n) => {
                Severity::from_lsp(n).ok_or_else(|| InlineError::UnknownSeverity(n.to_string()))
            }
            SeverityTag::Tag(s) => s.parse(),
        }
    }
}

/// A single diagnostic reported by the host engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Diagnostic {
    /// Identity inside the provider.
    pub id: DiagnosticId,
    /// Span in character offsets.
    pub range: DiagnosticRange,
    /// Canonical severity.
    pub severity: Severity,
    /// Optional checker-specific identifier (e.g. `"E0308"`, `"unused_variables"`).
    #[serde(default)]
    pub code: Option<String>,
    /// Diagnostic message.
    pub message: String,
    /// File the diagnostic was reported for, when the checker knows it.
    #[serde(default)]
    pub origin: Option<PathBuf>,
    /// Diagnostics sharing a group belong together (a primary error and its notes).
    #[serde(default)]
    pub group: Option<u64>,
}

impl Diagnostic {
    /// Create a diagnostic with no code, origin, or group.
    pub fn new(
        id: DiagnosticId,
        range: DiagnosticRange,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            range,
            severity,
            code: None,
            message: message.into(),
            origin: None,
            group: None,
        }
    }

    /// Attach a checker identifier.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the originating file.
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Attach a group tag.
    pub fn with_group(mut self, group: u64) -> Self {
        self.group = Some(group);
        self
    }

    /// Whether this diagnostic was reported for a file other than `current`.
    ///
    /// A diagnostic without an origin always belongs to the current surface.
    pub fn is_foreign(&self, current: Option<&Path>) -> bool {
        match &self.origin {
            Some(origin) => current != Some(origin.as_path()),
            None => false,
        }
    }
}

/// Read access to the host's diagnostics engine.
pub trait DiagnosticProvider {
    /// The full current set of live diagnostics, in engine order.
    fn live_diagnostics(&self) -> &[Diagnostic];

    /// Diagnostics attached at `offset`, in engine order.
    fn diagnostics_at(&self, offset: usize) -> Vec<&Diagnostic> {
        self.live_diagnostics()
            .iter()
            .filter(|diagnostic| diagnostic.range.covers(offset))
            .collect()
    }

    /// Look up a live diagnostic by id.
    fn diagnostic(&self, id: DiagnosticId) -> Option<&Diagnostic> {
        self.live_diagnostics()
            .iter()
            .find(|diagnostic| diagnostic.id == id)
    }

    /// Whether `id` is still in the live set.
    fn is_live(&self, id: DiagnosticId) -> bool {
        self.diagnostic(id).is_some()
    }

    /// `diagnostic` plus every live diagnostic that shares its group.
    fn related(&self, diagnostic: &Diagnostic) -> Vec<&Diagnostic> {
        match diagnostic.group {
            Some(group) => self
                .live_diagnostics()
                .iter()
                .filter(|other| other.id == diagnostic.id || other.group == Some(group))
                .collect(),
            None => self.diagnostic(diagnostic.id).into_iter().collect(),
        }
    }
}

/// A change to a [`DiagnosticStore`].
#[derive(Debug, Clone)]
pub enum DiagnosticEdit {
    /// Replace the full diagnostic set.
    Replace {
        /// The complete set of diagnostics.
        diagnostics: Vec<Diagnostic>,
    },
    /// Add or overwrite (by id) a single diagnostic.
    Upsert(Diagnostic),
    /// Remove a single diagnostic.
    Remove(DiagnosticId),
    /// Clear every diagnostic.
    Clear,
}

/// In-memory [`DiagnosticProvider`].
#[derive(Debug, Clone, Default)]
pub struct DiagnosticStore {
    diagnostics: Vec<Diagnostic>,
    version: u64,
}

impl DiagnosticStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `diagnostics`.
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            version: 0,
        }
    }

    /// Load a store from a JSON array of diagnostics.
    ///
    /// Severities may be producer tags (`"warning"`, `"clippy::warning"`) or LSP numbers.
    pub fn from_json_str(json: &str) -> Result<Self, InlineError> {
        let diagnostics: Vec<Diagnostic> = serde_json::from_str(json)?;
        Ok(Self::from_diagnostics(diagnostics))
    }

    /// Number of edits applied so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of live diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Apply a batch of edits. The version is bumped once per edit.
    pub fn apply_edits(&mut self, edits: impl IntoIterator<Item = DiagnosticEdit>) {
        for edit in edits {
            self.apply_edit(edit);
        }
    }

    /// Apply a single edit.
    pub fn apply_edit(&mut self, edit: DiagnosticEdit) {
        match edit {
            DiagnosticEdit::Replace { diagnostics } => {
                self.diagnostics = diagnostics;
            }
            DiagnosticEdit::Upsert(diagnostic) => {
                match self.diagnostics.iter_mut().find(|d| d.id == diagnostic.id) {
                    Some(slot) => *slot = diagnostic,
                    None => self.diagnostics.push(diagnostic),
                }
            }
            DiagnosticEdit::Remove(id) => {
                self.diagnostics.retain(|d| d.id != id);
            }
            DiagnosticEdit::Clear => {
                self.diagnostics.clear();
            }
        }
        self.version += 1;
    }
}

impl DiagnosticProvider for DiagnosticStore {
    fn live_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
