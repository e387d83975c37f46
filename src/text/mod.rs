//! # Text Metrics and Rendering
//!
//! Measures and renders text onto transparent [`RenderedImage`]s, which the
//! layout code then composites with alpha blending.
//!
//! ## Faces
//!
//! | Face | Source | Notes |
//! |------|--------|-------|
//! | [`FontFace::Bitmap`] | built-in Spleen 12x24 | deterministic metrics, no files needed |
//! | [`FontFace::TrueType`] | font file via `ab_glyph` | anti-aliased, any script the font covers |
//!
//! ## Operations
//!
//! - [`measure_line`]: single-line `(width, height)`
//! - [`render_line`]: single line, tight bounding image
//! - [`layout_wrapped`]: multi-line block wrapped to a width
//! - [`auto_resize_text`]: single line shrunk until it fits a box

pub mod bitmap;
pub mod ttf;

use ab_glyph::FontArc;
use image::Rgba;
use std::fmt;
use std::path::Path;
use unicode_width::UnicodeWidthChar;

use crate::error::MenuError;
use crate::raster::RenderedImage;

/// Padding reserved on a strict border so anti-aliasing has room to bleed.
pub const EDGE_BLEED: u32 = 1;

/// Smallest size [`auto_resize_text`] will shrink to.
pub const MIN_AUTO_SIZE: f32 = 12.0;

/// A font face used for measuring and drawing.
#[derive(Clone, Default)]
pub enum FontFace {
    /// The built-in Spleen bitmap face.
    #[default]
    Bitmap,
    /// A TrueType/OpenType face loaded at runtime.
    TrueType(FontArc),
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFace::Bitmap => f.write_str("FontFace::Bitmap"),
            FontFace::TrueType(_) => f.write_str("FontFace::TrueType(..)"),
        }
    }
}

impl FontFace {
    /// Load a TrueType/OpenType face from disk.
    pub fn from_file(path: &Path) -> Result<Self, MenuError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
            .map_err(|e| MenuError::Font(format!("{}: {}", path.display(), e)))
    }

    /// Parse a face from font file bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, MenuError> {
        FontArc::try_from_vec(bytes)
            .map(FontFace::TrueType)
            .map_err(|e| MenuError::Font(e.to_string()))
    }

    fn advance_width(&self, text: &str, size: f32) -> u32 {
        match self {
            FontFace::Bitmap => bitmap::line_width(text, size),
            FontFace::TrueType(font) => ttf::line_width(font, text, size),
        }
    }

    fn line_height(&self, size: f32) -> u32 {
        match self {
            FontFace::Bitmap => bitmap::line_height(size),
            FontFace::TrueType(font) => ttf::line_height(font, size),
        }
    }

    fn draw(&self, text: &str, size: f32, plot: impl FnMut(i32, i32, f32)) {
        match self {
            FontFace::Bitmap => bitmap::draw_line(text, size, plot),
            FontFace::TrueType(font) => ttf::draw_line(font, text, size, plot),
        }
    }
}

/// Horizontal alignment of lines inside a wrapped block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Options for [`layout_wrapped`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapOptions {
    /// Maximum block width in pixels. `0` means unconstrained: only explicit
    /// line breaks split lines.
    pub box_width: u32,
    /// Extra pixels between lines.
    pub spacing: u32,
    pub align: HorizontalAlign,
    /// Do not reserve [`EDGE_BLEED`] on the left/right edges.
    pub ignore_border_horizontally: bool,
    /// Do not reserve [`EDGE_BLEED`] on the top/bottom edges.
    pub ignore_border_vertically: bool,
}

impl WrapOptions {
    pub fn new(box_width: u32) -> Self {
        Self {
            box_width,
            spacing: 4,
            align: HorizontalAlign::Left,
            ignore_border_horizontally: false,
            ignore_border_vertically: false,
        }
    }

    pub fn spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn align(mut self, align: HorizontalAlign) -> Self {
        self.align = align;
        self
    }

    pub fn ignore_border(mut self, horizontally: bool, vertically: bool) -> Self {
        self.ignore_border_horizontally = horizontally;
        self.ignore_border_vertically = vertically;
        self
    }
}

/// Measure a single line: `(advance width, line height)` in pixels.
pub fn measure_line(text: &str, face: &FontFace, size: f32) -> (u32, u32) {
    (face.advance_width(text, size), face.line_height(size))
}

/// Render a single line on a transparent background, sized to its metrics.
pub fn render_line(text: &str, face: &FontFace, size: f32, color: Rgba<u8>) -> RenderedImage {
    let (width, height) = measure_line(text, face, size);
    let mut block = RenderedImage::transparent(width, height).into_rgba();
    stamp(&mut block, face, text, size, color, 0, 0);
    block.into()
}

/// Wrap `text` and render it as one block on a transparent background.
///
/// When `box_width > 0` the returned image is never wider than `box_width`.
pub fn layout_wrapped(
    text: &str,
    face: &FontFace,
    size: f32,
    color: Rgba<u8>,
    options: &WrapOptions,
) -> RenderedImage {
    let pad_x = if options.ignore_border_horizontally { 0 } else { EDGE_BLEED };
    let pad_y = if options.ignore_border_vertically { 0 } else { EDGE_BLEED };
    let limit = (options.box_width > 0).then(|| options.box_width.saturating_sub(2 * pad_x).max(1));

    let lines = wrap_lines(text, face, size, limit);
    let line_height = face.line_height(size);
    let widths: Vec<u32> = lines.iter().map(|l| face.advance_width(l, size)).collect();
    let content_width = widths.iter().copied().max().unwrap_or(0);

    let mut width = content_width + 2 * pad_x;
    if options.box_width > 0 {
        width = width.min(options.box_width);
    }
    let line_count = lines.len() as u32;
    let height = line_count * line_height + line_count.saturating_sub(1) * options.spacing + 2 * pad_y;

    let mut block = RenderedImage::transparent(width, height).into_rgba();
    let inner_width = width.saturating_sub(2 * pad_x);
    for (i, (line, line_width)) in lines.iter().zip(&widths).enumerate() {
        let slack = inner_width.saturating_sub(*line_width);
        let offset_x = match options.align {
            HorizontalAlign::Left => 0,
            HorizontalAlign::Center => slack / 2,
            HorizontalAlign::Right => slack,
        };
        let y = pad_y + i as u32 * (line_height + options.spacing);
        stamp(&mut block, face, line, size, color, (pad_x + offset_x) as i32, y as i32);
    }
    block.into()
}

/// Render a single line at `start_size`, shrinking the size until it fits
/// inside `max_size` or [`MIN_AUTO_SIZE`] is reached.
///
/// The result is never wider than `max_size.0`; text that does not fit even
/// at the minimum size is clipped on the right.
pub fn auto_resize_text(
    text: &str,
    start_size: f32,
    face: &FontFace,
    max_size: (u32, u32),
    color: Rgba<u8>,
) -> RenderedImage {
    let max_width = max_size.0.max(1);
    let max_height = max_size.1.max(1);
    let mut size = start_size.max(MIN_AUTO_SIZE);

    loop {
        let (width, height) = measure_line(text, face, size);
        if (width <= max_width && height <= max_height) || size <= MIN_AUTO_SIZE {
            break;
        }
        size = (size - 1.0).max(MIN_AUTO_SIZE);
    }

    let line = render_line(text, face, size, color);
    if line.width() <= max_width {
        return line;
    }
    image::imageops::crop_imm(line.as_rgba(), 0, 0, max_width, line.height())
        .to_image()
        .into()
}

/// Split text into lines no wider than `limit` pixels.
///
/// Explicit `\n` always breaks. With a limit, lines break after whitespace
/// or around wide (CJK) characters, falling back to a character break when a
/// single word is too long. A lone glyph wider than the limit stays on its
/// own line.
pub fn wrap_lines(text: &str, face: &FontFace, size: f32, limit: Option<u32>) -> Vec<String> {
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        match limit {
            None => out.push(paragraph.to_string()),
            Some(limit) => wrap_paragraph(paragraph, face, size, limit, &mut out),
        }
    }
    out
}

fn wrap_paragraph(paragraph: &str, face: &FontFace, size: f32, limit: u32, out: &mut Vec<String>) {
    let fits = |chars: &[char]| {
        let s: String = chars.iter().collect();
        face.advance_width(s.trim_end(), size) <= limit
    };

    let mut line: Vec<char> = Vec::new();
    let mut break_at: Option<usize> = None;

    for ch in paragraph.chars() {
        let wide = ch.width().unwrap_or(0) > 1;
        if wide && !line.is_empty() {
            break_at = Some(line.len());
        }
        line.push(ch);
        if ch.is_whitespace() {
            break_at = Some(line.len());
            continue;
        }
        if fits(&line) {
            if wide {
                break_at = Some(line.len());
            }
            continue;
        }

        let split = match break_at {
            Some(b) if b > 0 && b < line.len() => b,
            _ if line.len() > 1 => line.len() - 1,
            _ => continue,
        };
        let mut rest = line.split_off(split);
        out.push(line.iter().collect::<String>().trim_end().to_string());

        while rest.first().is_some_and(|c| c.is_whitespace()) {
            rest.remove(0);
        }
        while rest.len() > 1 && !fits(&rest) {
            let tail = rest.split_off(rest.len() - 1);
            out.push(rest.iter().collect::<String>().trim_end().to_string());
            rest = tail;
        }
        line = rest;
        break_at = None;
    }

    out.push(line.iter().collect::<String>().trim_end().to_string());
}

/// Draw `text` into `target` at `(origin_x, origin_y)`, keeping the strongest
/// coverage per pixel and clipping to the image.
fn stamp(
    target: &mut image::RgbaImage,
    face: &FontFace,
    text: &str,
    size: f32,
    color: Rgba<u8>,
    origin_x: i32,
    origin_y: i32,
) {
    let (width, height) = (target.width() as i32, target.height() as i32);
    face.draw(text, size, |x, y, coverage| {
        let (px, py) = (origin_x + x, origin_y + y);
        if px < 0 || py < 0 || px >= width || py >= height {
            return;
        }
        let alpha = (coverage.clamp(0.0, 1.0) * color[3] as f32).round() as u8;
        let pixel = target.get_pixel_mut(px as u32, py as u32);
        if alpha > pixel[3] {
            *pixel = Rgba([color[0], color[1], color[2], alpha]);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgba<u8> = Rgba([34, 52, 73, 255]);

    #[test]
    fn measure_line_bitmap_is_cell_based() {
        let face = FontFace::Bitmap;
        assert_eq!(measure_line("AlphaTool", &face, 25.0), (9 * 13, 25));
        assert_eq!(measure_line("", &face, 25.0), (0, 25));
    }

    #[test]
    fn render_line_matches_measurement() {
        let face = FontFace::Bitmap;
        let img = render_line("Hello", &face, 24.0, INK);
        assert_eq!(img.size(), measure_line("Hello", &face, 24.0));
        assert!(img.has_ink());
    }

    #[test]
    fn unconstrained_wrap_breaks_only_on_newlines() {
        let face = FontFace::Bitmap;
        let lines = wrap_lines("one two three\nfour", &face, 24.0, None);
        assert_eq!(lines, vec!["one two three", "four"]);
    }

    #[test]
    fn wrap_prefers_whitespace_breaks() {
        let face = FontFace::Bitmap;
        // 12px cells: "one two" = 84px, "one two three" = 156px
        let lines = wrap_lines("one two three", &face, 24.0, Some(100));
        assert_eq!(lines, vec!["one two", "three"]);
    }

    #[test]
    fn wrap_breaks_long_words_by_character() {
        let face = FontFace::Bitmap;
        let lines = wrap_lines("abcdefghij", &face, 24.0, Some(48));
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_breaks_between_wide_characters() {
        let face = FontFace::Bitmap;
        let lines = wrap_lines("查询菜单详细", &face, 24.0, Some(48));
        assert_eq!(lines, vec!["查询", "菜单", "详细"]);
    }

    #[test]
    fn wrapped_block_never_exceeds_box_width() {
        let face = FontFace::Bitmap;
        for box_width in [1, 13, 40, 100, 333] {
            let img = layout_wrapped(
                "A fairly long description that needs several lines",
                &face,
                25.0,
                INK,
                &WrapOptions::new(box_width),
            );
            assert!(img.width() <= box_width, "{} > {}", img.width(), box_width);
        }
    }

    #[test]
    fn wrapped_block_height_counts_lines_and_spacing() {
        let face = FontFace::Bitmap;
        let options = WrapOptions::new(0).spacing(10).ignore_border(true, true);
        let img = layout_wrapped("a\nb\nc", &face, 24.0, INK, &options);
        assert_eq!(img.height(), 3 * 24 + 2 * 10);
        assert_eq!(img.width(), 12);
    }

    #[test]
    fn strict_border_reserves_bleed() {
        let face = FontFace::Bitmap;
        let strict = layout_wrapped("abc", &face, 24.0, INK, &WrapOptions::new(0));
        let relaxed = layout_wrapped(
            "abc",
            &face,
            24.0,
            INK,
            &WrapOptions::new(0).ignore_border(true, true),
        );
        assert_eq!(strict.width(), relaxed.width() + 2 * EDGE_BLEED);
        assert_eq!(strict.height(), relaxed.height() + 2 * EDGE_BLEED);
    }

    #[test]
    fn auto_resize_shrinks_to_fit() {
        let face = FontFace::Bitmap;
        let img = auto_resize_text("A rather long catalog title", 60.0, &face, (300, 66), INK);
        assert!(img.width() <= 300);
        assert!(img.height() < 60);
    }

    #[test]
    fn auto_resize_keeps_start_size_when_it_fits() {
        let face = FontFace::Bitmap;
        let img = auto_resize_text("Menu", 60.0, &face, (1000, 66), INK);
        assert_eq!(img.size(), measure_line("Menu", &face, 60.0));
    }

    #[test]
    fn auto_resize_clips_at_floor() {
        let face = FontFace::Bitmap;
        let img = auto_resize_text("an extremely long title that cannot fit", 60.0, &face, (50, 66), INK);
        assert_eq!(img.width(), 50);
        assert_eq!(img.height(), MIN_AUTO_SIZE as u32);
    }
}
