use editor_core_inline::{
    Diagnostic, DiagnosticEdit, DiagnosticId, DiagnosticRange, DiagnosticStore, InlineConfig,
    InlineMode, MemorySurface, Severity,
};

fn main() {
    let mut surface =
        MemorySurface::new("fn main() {\n    let x = 1;\n    let y: u8 = 300;\n}").with_path("main.rs");
    let mut diagnostics = DiagnosticStore::from_diagnostics(vec![
        Diagnostic::new(
            DiagnosticId::new(1),
            DiagnosticRange::new(20, 21),
            Severity::Warning,
            "unused variable: `x`",
        )
        .with_code("unused_variables"),
        Diagnostic::new(
            DiagnosticId::new(2),
            DiagnosticRange::new(43, 46),
            Severity::Error,
            "literal out of range for `u8`",
        )
        .with_code("overflowing_literals"),
    ]);

    let mut mode = InlineMode::new(InlineConfig::default());
    mode.enable();

    // Cursor on `x`.
    surface.move_cursor_to(1, 8).unwrap();
    mode.show_at_point(&mut surface, &diagnostics).unwrap();
    assert_eq!(
        surface.display_text(),
        "fn main() {\n    let x = 1;\n~> unused variable: `x` [unused_variables]\n    let y: u8 = 300;\n}"
    );

    // Cursor on `300`: the warning goes away, the error shows up.
    surface.move_cursor_to(2, 17).unwrap();
    mode.on_cursor_moved(&mut surface, &diagnostics);
    mode.show_at_point(&mut surface, &diagnostics).unwrap();
    assert_eq!(
        surface.display_text(),
        "fn main() {\n    let x = 1;\n    let y: u8 = 300;\n~> literal out of range for `u8` [overflowing_literals]\n}"
    );

    // The checker re-runs and the error is fixed.
    diagnostics.apply_edit(DiagnosticEdit::Remove(DiagnosticId::new(2)));
    mode.on_diagnostics_changed(&mut surface, &diagnostics);
    assert_eq!(surface.display_text(), surface.text());

    mode.disable(&mut surface);
    println!("{}", surface.display_text());
}
