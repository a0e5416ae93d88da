//! The editing surface seam.
//!
//! An [`EditorSurface`] is one open view of a document: it knows the cursor, can translate
//! between character offsets and logical lines, and owns the overlays drawn on top of the text.
//! Overlays are virtual text: they never modify the document.
//!
//! [`MemorySurface`] is a rope-backed implementation used by tests, benchmarks and hosts that keep
//! their text in memory.

use crate::error::InlineError;
use ropey::{Rope, RopeSlice};
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Style ID type (host-themed).
pub type StyleId = u32;

/// Opaque handle of an overlay created on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(u64);

impl OverlayId {
    /// Create an overlay id from a raw numeric identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A non-editable overlay.
///
/// `text` is rendered immediately after `range.end`. When `range.end` sits at the start of a
/// line, the text occupies a virtual line of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    /// Anchor range in character offsets (half-open).
    pub range: Range<usize>,
    /// Virtual text.
    pub text: String,
    /// Style to render `text` with.
    pub style: StyleId,
}

/// Host editing surface.
pub trait EditorSurface {
    /// Path of the document shown in this surface, if it has one.
    fn path(&self) -> Option<&Path>;

    /// Cursor position as a character offset.
    fn cursor(&self) -> usize;

    /// Document length in characters.
    fn len_chars(&self) -> usize;

    /// Number of logical lines (at least 1).
    fn line_count(&self) -> usize;

    /// Logical line containing `offset` (clamped to the document).
    fn line_of_offset(&self, offset: usize) -> usize;

    /// Character range of `line`, excluding its terminator (clamped to the last line).
    fn line_bounds(&self, line: usize) -> Range<usize>;

    /// Create an overlay and return its handle.
    fn create_overlay(&mut self, overlay: Overlay) -> Result<OverlayId, InlineError>;

    /// Delete an overlay. Returns `false` if it was already gone.
    fn remove_overlay(&mut self, id: OverlayId) -> bool;

    /// Look up an overlay.
    fn overlay(&self, id: OverlayId) -> Option<&Overlay>;
}

/// Rope-backed in-memory [`EditorSurface`].
#[derive(Debug, Clone)]
pub struct MemorySurface {
    rope: Rope,
    path: Option<PathBuf>,
    cursor: usize,
    overlays: BTreeMap<OverlayId, Overlay>,
    next_overlay_id: u64,
}

impl MemorySurface {
    /// Create a surface over `text` with the cursor at the start.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
            cursor: 0,
            overlays: BTreeMap::new(),
            next_overlay_id: 1,
        }
    }

    /// Set the document path.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Move the cursor to a character offset.
    pub fn set_cursor(&mut self, offset: usize) -> Result<(), InlineError> {
        if offset > self.rope.len_chars() {
            return Err(InlineError::InvalidOffset(offset));
        }
        self.cursor = offset;
        Ok(())
    }

    /// Character offset of a logical `(line, column)` position, if it exists.
    pub fn offset_of(&self, line: usize, column: usize) -> Option<usize> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let bounds = self.line_bounds(line);
        let offset = bounds.start + column;
        (offset <= bounds.end).then_some(offset)
    }

    /// Move the cursor to a logical `(line, column)` position.
    pub fn move_cursor_to(&mut self, line: usize, column: usize) -> Result<(), InlineError> {
        let offset = self
            .offset_of(line, column)
            .ok_or(InlineError::InvalidPosition { line, column })?;
        self.cursor = offset;
        Ok(())
    }

    /// All overlays, ordered by creation.
    pub fn overlays(&self) -> impl Iterator<Item = (OverlayId, &Overlay)> {
        self.overlays.iter().map(|(id, overlay)| (*id, overlay))
    }

    /// Number of overlays currently on the surface.
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Document text with every overlay rendered in place.
    pub fn display_text(&self) -> String {
        let len = self.rope.len_chars();
        let mut anchored: Vec<(usize, OverlayId, &Overlay)> = self
            .overlays
            .iter()
            .map(|(id, overlay)| (overlay.range.end.min(len), *id, overlay))
            .collect();
        anchored.sort_by_key(|(end, id, _)| (*end, *id));

        let mut out = String::with_capacity(self.rope.len_bytes());
        let mut pending = anchored.into_iter().peekable();
        for (idx, ch) in self.rope.chars().enumerate() {
            while let Some((_, _, overlay)) = pending.next_if(|(end, _, _)| *end == idx) {
                self.push_virtual_text(&mut out, idx, &overlay.text);
            }
            out.push(ch);
        }
        for (_, _, overlay) in pending {
            self.push_virtual_text(&mut out, len, &overlay.text);
        }
        out
    }

    fn push_virtual_text(&self, out: &mut String, at: usize, text: &str) {
        out.push_str(text);
        if self.is_line_start(at) && !text.starts_with('\n') {
            out.push('\n');
        }
    }

    fn is_line_start(&self, offset: usize) -> bool {
        offset == 0 || self.rope.char(offset - 1) == '\n'
    }
}

/// Number of trailing line-terminator chars in a rope line.
fn terminator_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    if len == 0 {
        return 0;
    }
    match line.char(len - 1) {
        '\n' if len >= 2 && line.char(len - 2) == '\r' => 2,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}' => 1,
        _ => 0,
    }
}

impl EditorSurface for MemorySurface {
    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_of_offset(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    fn line_bounds(&self, line: usize) -> Range<usize> {
        let line = line.min(self.rope.len_lines() - 1);
        let start = self.rope.line_to_char(line);
        let slice = self.rope.line(line);
        let end = start + slice.len_chars() - terminator_len(slice);
        start..end
    }

    fn create_overlay(&mut self, overlay: Overlay) -> Result<OverlayId, InlineError> {
        let len = self.rope.len_chars();
        if overlay.range.start > overlay.range.end || overlay.range.end > len {
            return Err(InlineError::InvalidRange {
                start: overlay.range.start,
                end: overlay.range.end,
                len,
            });
        }
        let id = OverlayId(self.next_overlay_id);
        self.next_overlay_id += 1;
        self.overlays.insert(id, overlay);
        Ok(id)
    }

    fn remove_overlay(&mut self, id: OverlayId) -> bool {
        self.overlays.remove(&id).is_some()
    }

    fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&id)
    }
}
