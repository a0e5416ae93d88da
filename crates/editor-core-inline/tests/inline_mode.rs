use editor_core_inline::{
    Diagnostic, DiagnosticEdit, DiagnosticId, DiagnosticRange, DiagnosticStore, EditorSurface,
    INLINE_WARNING_STYLE_ID, InlineConfig, InlineError, InlineMode, InlineRenderer, InlineState,
    InlineStyle, MemorySurface, ModeState, OverlayId, RenderContext, Severity, StyledMessage,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

fn numbered_lines(count: usize) -> String {
    (0..count).map(|i| format!("line {i}\n")).collect()
}

fn warning(id: u64, start: usize, end: usize, message: &str) -> Diagnostic {
    Diagnostic::new(
        DiagnosticId::new(id),
        DiagnosticRange::new(start, end),
        Severity::Warning,
        message,
    )
}

#[test]
fn test_unused_variable_scenario() {
    let mut surface = MemorySurface::new(&numbered_lines(12));
    // Lines are 0-based: the diagnostic sits on the fifth line.
    let start = surface.offset_of(4, 0).unwrap();
    let diagnostics =
        DiagnosticStore::from_diagnostics(vec![warning(1, start, start + 4, "unused variable")]);

    let mut mode = InlineMode::new(InlineConfig::default());
    assert!(mode.enable());

    surface.set_cursor(start + 2).unwrap();
    let created = mode.show_at_point(&mut surface, &diagnostics).unwrap();
    assert_eq!(created.len(), 1);

    let annotations = mode.annotations();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].text, "~> unused variable");
    assert_eq!(annotations[0].style, InlineStyle::Warning);
    assert_eq!(annotations[0].diagnostic, Some(DiagnosticId::new(1)));
    // The phantom hangs off the end of line 4 and renders as the first thing on line 5.
    assert_eq!(surface.line_of_offset(annotations[0].range.start), 4);
    assert_eq!(surface.line_of_offset(annotations[0].range.end), 5);

    let overlay = surface.overlay(created[0]).unwrap();
    assert_eq!(overlay.style, INLINE_WARNING_STYLE_ID);
    assert!(
        surface
            .display_text()
            .contains("line 4\n~> unused variable\nline 5\n")
    );

    surface.move_cursor_to(9, 0).unwrap();
    assert_eq!(mode.on_cursor_moved(&mut surface, &diagnostics), 1);
    assert!(mode.annotations().is_empty());
    assert_eq!(surface.overlay_count(), 0);
}

#[test]
fn test_show_at_point_is_idempotent() {
    let mut surface = MemorySurface::new("let x = 1;\n");
    let diagnostics = DiagnosticStore::from_diagnostics(vec![warning(1, 4, 5, "unused")]);
    let mut mode = InlineMode::default();
    mode.enable();
    surface.set_cursor(4).unwrap();

    assert_eq!(mode.show_at_point(&mut surface, &diagnostics).unwrap().len(), 1);
    assert!(mode.show_at_point(&mut surface, &diagnostics).unwrap().is_empty());
    assert_eq!(mode.annotations().len(), 1);
    assert_eq!(surface.overlay_count(), 1);
}

#[test]
fn test_cursor_moves_within_span_keep_annotation() {
    let mut surface = MemorySurface::new("let value = 1;\nother\n");
    let diagnostics = DiagnosticStore::from_diagnostics(vec![warning(1, 4, 9, "unused")]);
    let mut mode = InlineMode::default();
    mode.enable();

    surface.set_cursor(4).unwrap();
    mode.show_at_point(&mut surface, &diagnostics).unwrap();

    for offset in [5, 7, 9] {
        surface.set_cursor(offset).unwrap();
        assert_eq!(mode.on_cursor_moved(&mut surface, &diagnostics), 0);
        assert_eq!(mode.annotations().len(), 1);
    }

    surface.set_cursor(10).unwrap();
    assert_eq!(mode.on_cursor_moved(&mut surface, &diagnostics), 1);
}

#[test]
fn test_several_diagnostics_on_one_line_stack_downwards() {
    let mut surface = MemorySurface::new("foo(bar)\nnext\nlast");
    let diagnostics = DiagnosticStore::from_diagnostics(vec![
        warning(1, 0, 8, "first"),
        Diagnostic::new(
            DiagnosticId::new(2),
            DiagnosticRange::new(4, 7),
            Severity::Error,
            "second",
        ),
    ]);
    let mut mode = InlineMode::default();
    mode.enable();
    surface.set_cursor(5).unwrap();

    let created = mode.show_at_point(&mut surface, &diagnostics).unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(
        surface.display_text(),
        "foo(bar)\n~> first\nnext\n~> second\nlast"
    );
    // Newest first.
    assert_eq!(mode.annotations()[0].diagnostic, Some(DiagnosticId::new(2)));
}

#[test]
fn test_show_at_point_hides_stale_annotations_first() {
    let mut surface = MemorySurface::new("let a = 1;\nlet b = 2;\n");
    let diagnostics = DiagnosticStore::from_diagnostics(vec![
        warning(1, 4, 5, "unused a"),
        warning(2, 15, 16, "unused b"),
    ]);
    let mut mode = InlineMode::default();
    mode.enable();

    surface.set_cursor(4).unwrap();
    mode.show_at_point(&mut surface, &diagnostics).unwrap();
    assert_eq!(mode.annotations()[0].diagnostic, Some(DiagnosticId::new(1)));

    // No cursor event in between.
    surface.set_cursor(15).unwrap();
    let created = mode.show_at_point(&mut surface, &diagnostics).unwrap();
    assert_eq!(created.len(), 1);

    let ids: Vec<_> = mode.annotations().iter().map(|a| a.diagnostic).collect();
    assert_eq!(ids, vec![Some(DiagnosticId::new(2))]);
    assert_eq!(surface.overlay_count(), 1);
    assert_eq!(
        surface.display_text(),
        "let a = 1;\nlet b = 2;\n~> unused b\n"
    );
}

#[test]
fn test_disabled_mode_ignores_events() {
    let mut surface = MemorySurface::new("let x = 1;\n");
    let diagnostics = DiagnosticStore::from_diagnostics(vec![warning(1, 4, 5, "unused")]);
    let mut mode = InlineMode::default();
    assert_eq!(mode.state(), ModeState::Disabled);

    surface.set_cursor(4).unwrap();
    assert!(mode.show_at_point(&mut surface, &diagnostics).unwrap().is_empty());
    let message = StyledMessage::new("manual", InlineStyle::Note);
    assert_eq!(
        mode.display(&mut surface, &diagnostics, &message, None, None)
            .unwrap(),
        None
    );
    assert_eq!(mode.on_cursor_moved(&mut surface, &diagnostics), 0);
    assert_eq!(surface.overlay_count(), 0);
}

#[test]
fn test_disable_tears_down_and_is_idempotent() {
    let mut surface = MemorySurface::new("a\nb\nc\n");
    let diagnostics = DiagnosticStore::from_diagnostics(vec![
        warning(1, 0, 1, "on a"),
        warning(2, 0, 1, "also on a"),
    ]);
    let mut mode = InlineMode::default();
    mode.enable();
    mode.show_at_point(&mut surface, &diagnostics).unwrap();
    assert_eq!(surface.overlay_count(), 2);

    mode.disable(&mut surface);
    assert_eq!(mode.state(), ModeState::Disabled);
    assert!(mode.annotations().is_empty());
    assert_eq!(mode.last_position(), None);
    assert_eq!(surface.overlay_count(), 0);

    mode.disable(&mut surface);
    assert_eq!(mode.state(), ModeState::Disabled);
    assert_eq!(surface.overlay_count(), 0);
}

#[test]
fn test_toggle() {
    let mut surface = MemorySurface::new("text");
    let mut mode = InlineMode::default();
    assert_eq!(mode.toggle(&mut surface), ModeState::Enabled);
    assert!(!mode.enable());
    assert_eq!(mode.toggle(&mut surface), ModeState::Disabled);
}

#[test]
fn test_vanished_diagnostic_is_removed_on_next_move() {
    let mut surface = MemorySurface::new("let x = 1;\n");
    let mut diagnostics = DiagnosticStore::from_diagnostics(vec![warning(1, 4, 5, "unused")]);
    let mut mode = InlineMode::default();
    mode.enable();
    surface.set_cursor(4).unwrap();
    mode.show_at_point(&mut surface, &diagnostics).unwrap();

    diagnostics.apply_edit(DiagnosticEdit::Clear);
    // Still within the old span, but the diagnostic is gone.
    surface.set_cursor(5).unwrap();
    assert_eq!(mode.on_cursor_moved(&mut surface, &diagnostics), 1);
    assert_eq!(surface.overlay_count(), 0);
}

#[test]
fn test_diagnostics_changed_removes_without_cursor_movement() {
    let mut surface = MemorySurface::new("let x = 1;\n");
    let mut diagnostics = DiagnosticStore::from_diagnostics(vec![warning(1, 4, 5, "unused")]);
    let mut mode = InlineMode::default();
    mode.enable();
    surface.set_cursor(4).unwrap();
    mode.show_at_point(&mut surface, &diagnostics).unwrap();

    // Cursor did not move, so the cursor hook is a no-op.
    assert_eq!(mode.on_cursor_moved(&mut surface, &diagnostics), 0);

    diagnostics.apply_edit(DiagnosticEdit::Remove(DiagnosticId::new(1)));
    assert_eq!(mode.on_diagnostics_changed(&mut surface, &diagnostics), 1);
    assert!(mode.annotations().is_empty());
}

#[test]
fn test_dedup_skip_still_records_cursor_marker() {
    // A display call that ends up displaying nothing still records the cursor. The following
    // cursor event at that same position is then treated as "no movement" and stale annotations
    // survive it.
    let mut surface = MemorySurface::new("let x = 1;\nlet y = 2;\n");
    let diagnostics = DiagnosticStore::from_diagnostics(vec![warning(1, 4, 5, "unused")]);
    let mut mode = InlineMode::default();
    mode.enable();

    surface.set_cursor(4).unwrap();
    mode.show_at_point(&mut surface, &diagnostics).unwrap();
    assert_eq!(mode.last_position(), Some(4));

    surface.set_cursor(15).unwrap();
    let duplicate = mode.annotations()[0].text.clone();
    let skipped = mode
        .display(
            &mut surface,
            &diagnostics,
            &StyledMessage::new(duplicate.trim_start_matches("~> "), InlineStyle::Warning),
            Some(4),
            None,
        )
        .unwrap();
    assert_eq!(skipped, None);
    assert_eq!(mode.last_position(), Some(15));

    assert_eq!(mode.on_cursor_moved(&mut surface, &diagnostics), 0);
    assert_eq!(mode.annotations().len(), 1);

    surface.set_cursor(16).unwrap();
    assert_eq!(mode.on_cursor_moved(&mut surface, &diagnostics), 1);
}

#[test]
fn test_grouped_diagnostics_are_shown_together() {
    let mut surface = MemorySurface::new("fn a() {}\nfn b() {}\nfn c() {}\n");
    let diagnostics = DiagnosticStore::from_diagnostics(vec![
        Diagnostic::new(
            DiagnosticId::new(1),
            DiagnosticRange::new(3, 4),
            Severity::Error,
            "mismatched types",
        )
        .with_group(7),
        Diagnostic::new(
            DiagnosticId::new(2),
            DiagnosticRange::new(23, 24),
            Severity::Note,
            "expected because of this",
        )
        .with_group(7),
        warning(3, 13, 14, "unrelated"),
    ]);
    let mut mode = InlineMode::default();
    mode.enable();
    surface.set_cursor(3).unwrap();

    let created = mode.show_at_point(&mut surface, &diagnostics).unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(
        surface.display_text(),
        "fn a() {}\n~> mismatched types\nfn b() {}\nfn c() {}\n~> expected because of this\n"
    );

    // The note does not contain the cursor, so it goes away on the next move.
    surface.set_cursor(4).unwrap();
    assert_eq!(mode.on_cursor_moved(&mut surface, &diagnostics), 1);
    assert_eq!(mode.annotations()[0].diagnostic, Some(DiagnosticId::new(1)));
}

#[test]
fn test_foreign_diagnostic_is_shown_at_cursor() {
    let mut surface = MemorySurface::new("mod util;\nfn main() {}\n").with_path("src/main.rs");
    let diagnostics = DiagnosticStore::from_diagnostics(vec![
        Diagnostic::new(
            DiagnosticId::new(1),
            DiagnosticRange::new(0, 9),
            Severity::Error,
            "cannot find value `x`",
        )
        .with_origin("src/util.rs")
        .with_code("E0425"),
    ]);
    let mut mode = InlineMode::default();
    mode.enable();
    surface.set_cursor(4).unwrap();

    mode.show_at_point(&mut surface, &diagnostics).unwrap();
    assert_eq!(
        mode.annotations()[0].text,
        "~> In \"src/util.rs\":\ncannot find value `x` [E0425]"
    );
}

#[test]
fn test_custom_prefix_and_error_id_config() {
    let mut surface = MemorySurface::new("let x = 1;\n");
    let diagnostics = DiagnosticStore::from_diagnostics(vec![
        warning(1, 4, 5, "unused variable").with_code("unused_variables"),
    ]);
    let config = InlineConfig::from_json_str(r#"{ "prefix": "// ", "display_error_id": false }"#)
        .unwrap();
    let mut mode = InlineMode::new(config);
    mode.enable();
    surface.set_cursor(4).unwrap();

    mode.show_at_point(&mut surface, &diagnostics).unwrap();
    assert_eq!(mode.annotations()[0].text, "// unused variable");

    mode.set_config(InlineConfig::default());
    assert_eq!(mode.config().prefix, "~> ");
    // Already displayed for this diagnostic; the new options do not duplicate it.
    assert!(mode.show_at_point(&mut surface, &diagnostics).unwrap().is_empty());
}

#[test]
fn test_out_of_range_overlay_propagates() {
    struct Shrunk(MemorySurface);

    impl EditorSurface for Shrunk {
        fn path(&self) -> Option<&std::path::Path> {
            self.0.path()
        }
        fn cursor(&self) -> usize {
            self.0.cursor()
        }
        fn len_chars(&self) -> usize {
            self.0.len_chars()
        }
        fn line_count(&self) -> usize {
            self.0.line_count()
        }
        fn line_of_offset(&self, offset: usize) -> usize {
            self.0.line_of_offset(offset)
        }
        fn line_bounds(&self, line: usize) -> std::ops::Range<usize> {
            self.0.line_bounds(line)
        }
        fn create_overlay(
            &mut self,
            overlay: editor_core_inline::Overlay,
        ) -> Result<OverlayId, InlineError> {
            Err(InlineError::InvalidRange {
                start: overlay.range.start,
                end: overlay.range.end,
                len: 0,
            })
        }
        fn remove_overlay(&mut self, id: OverlayId) -> bool {
            self.0.remove_overlay(id)
        }
        fn overlay(&self, id: OverlayId) -> Option<&editor_core_inline::Overlay> {
            self.0.overlay(id)
        }
    }

    let mut surface = Shrunk(MemorySurface::new("let x = 1;\n"));
    let diagnostics = DiagnosticStore::from_diagnostics(vec![warning(1, 4, 5, "unused")]);
    let mut mode = InlineMode::default();
    mode.enable();
    surface.0.set_cursor(4).unwrap();

    let err = mode.show_at_point(&mut surface, &diagnostics).unwrap_err();
    assert!(matches!(err, InlineError::InvalidRange { .. }));
    assert!(mode.annotations().is_empty());
}

struct RecordingRenderer {
    log: Arc<Mutex<Vec<String>>>,
}

impl InlineRenderer for RecordingRenderer {
    fn render(
        &mut self,
        cx: &mut RenderContext<'_>,
        message: &StyledMessage,
        position: Option<usize>,
        _diagnostic: Option<DiagnosticId>,
    ) -> Result<Option<OverlayId>, InlineError> {
        let position = position.unwrap_or(cx.surface.cursor());
        self.log
            .lock()
            .unwrap()
            .push(format!("render {position}: {}", message.text));
        Ok(None)
    }

    fn clear_all(&mut self, _surface: &mut dyn EditorSurface, state: &mut InlineState) {
        self.log
            .lock()
            .unwrap()
            .push(format!("clear {}", state.registry.len()));
    }
}

#[test]
fn test_custom_renderer_is_used() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let renderer = RecordingRenderer {
        log: Arc::clone(&log),
    };
    let mut surface = MemorySurface::new("let x = 1;\n");
    let diagnostics = DiagnosticStore::from_diagnostics(vec![warning(1, 4, 5, "unused")]);
    let mut mode = InlineMode::with_renderer(InlineConfig::default(), Box::new(renderer));
    mode.enable();
    surface.set_cursor(4).unwrap();

    assert!(mode.show_at_point(&mut surface, &diagnostics).unwrap().is_empty());
    mode.disable(&mut surface);

    let log = log.lock().unwrap().clone();
    assert_eq!(log, vec!["render 4: unused".to_string(), "clear 0".to_string()]);
}
