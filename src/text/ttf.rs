//! TrueType faces via `ab_glyph`.
//!
//! Used when a font file is configured (for example a CJK face). Glyphs are
//! laid out on a single baseline with kerning and rasterised to coverage
//! values for anti-aliased compositing.

use ab_glyph::{Font, FontArc, ScaleFont};

/// Advance width of a line in pixels, including kerning.
pub fn line_width(font: &FontArc, text: &str, size: f32) -> u32 {
    let scaled = font.as_scaled(size);
    let mut caret_x = 0.0f32;
    let mut previous = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret_x += scaled.kern(prev, glyph_id);
        }
        caret_x += scaled.h_advance(glyph_id);
        previous = Some(glyph_id);
    }

    caret_x.ceil().max(0.0) as u32
}

/// Line height from font metrics (ascent to descent).
pub fn line_height(font: &FontArc, size: f32) -> u32 {
    let scaled = font.as_scaled(size);
    (scaled.ascent() - scaled.descent()).ceil().max(1.0) as u32
}

/// Rasterise a line, calling `plot(x, y, coverage)` for every covered pixel.
///
/// Coordinates are relative to the line's top-left corner; glyph overhang
/// may produce coordinates outside the measured box, callers clip.
pub fn draw_line(font: &FontArc, text: &str, size: f32, mut plot: impl FnMut(i32, i32, f32)) {
    let scaled = font.as_scaled(size);
    let baseline_y = scaled.ascent();
    let mut caret_x = 0.0f32;
    let mut previous = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret_x += scaled.kern(prev, glyph_id);
        }
        let glyph = glyph_id.with_scale_and_position(size, ab_glyph::point(caret_x, baseline_y));
        caret_x += scaled.h_advance(glyph_id);
        previous = Some(glyph_id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;
                plot(x, y, coverage);
            });
        }
    }
}
