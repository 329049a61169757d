use std::sync::Arc;

use super::*;

fn system_font() -> Option<PreparedFont> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
    .map(|bytes| PreparedFont {
        bytes: Arc::new(bytes),
    })
}

#[test]
fn layout_line_rejects_bad_sizes() {
    let mut engine = TextEngine::new();
    let font = PreparedFont {
        bytes: Arc::new(Vec::new()),
    };
    assert!(matches!(
        engine.layout_line("f", &font, "x", 0.0, Rgba8::BLACK),
        Err(WrappedError::Validation(_))
    ));
    assert!(matches!(
        engine.layout_line("f", &font, "x", f32::NAN, Rgba8::BLACK),
        Err(WrappedError::Validation(_))
    ));
}

#[test]
fn garbage_font_bytes_are_asset_errors() {
    let mut engine = TextEngine::new();
    let font = PreparedFont {
        bytes: Arc::new(b"not a font".to_vec()),
    };
    assert!(matches!(
        engine.layout_line("junk.ttf", &font, "x", 12.0, Rgba8::BLACK),
        Err(WrappedError::Asset(_))
    ));
}

#[test]
fn metrics_scale_with_size_and_are_cached() {
    let Some(font) = system_font() else {
        return;
    };
    let mut engine = TextEngine::new();
    let small = engine.metrics("sys.ttf", &font, 32.0).unwrap();
    let big = engine.metrics("sys.ttf", &font, 64.0).unwrap();
    assert!(small.ascent > 0.0);
    assert!(small.descent > 0.0);
    assert!((big.ascent - 2.0 * small.ascent).abs() < 1.0);
    assert_eq!(engine.metrics("sys.ttf", &font, 32.0).unwrap(), small);
}

#[test]
fn wider_text_shapes_wider() {
    let Some(font) = system_font() else {
        return;
    };
    let mut engine = TextEngine::new();
    let short = engine
        .layout_line("sys.ttf", &font, "Go", 48.0, Rgba8::WHITE)
        .unwrap();
    let long = engine
        .layout_line("sys.ttf", &font, "Go Go Go Go", 48.0, Rgba8::WHITE)
        .unwrap();
    assert_eq!(long.lines().count(), 1);
    assert!(long.width() > short.width());
}
