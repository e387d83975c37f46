//! Built-in bitmap face.
//!
//! Uses the Spleen 12x24 bitmap font, scaled with nearest neighbour to the
//! requested pixel size. A cell is `size` pixels tall and `ceil(size / 2)`
//! pixels wide; East Asian wide characters take two cells. Characters Spleen
//! does not cover are drawn as an outlined box, so measurement never depends
//! on glyph coverage.

use spleen_font::{FONT_12X24, PSF2Font};
use unicode_width::UnicodeWidthChar;

const BASE_WIDTH: usize = 12;
const BASE_HEIGHT: usize = 24;

/// Pixel size of one cell at the given font size.
pub fn cell_size(size: f32) -> (u32, u32) {
    let height = size.round().max(1.0) as u32;
    (height.div_ceil(2), height)
}

/// Number of cells a character occupies.
pub fn char_cells(ch: char) -> u32 {
    match ch.width() {
        Some(w) => w as u32,
        // Control characters: treat tabs as a single blank cell, drop the rest.
        None => u32::from(ch == '\t'),
    }
}

/// Advance width of a line in pixels.
pub fn line_width(text: &str, size: f32) -> u32 {
    let (cell_w, _) = cell_size(size);
    text.chars().map(char_cells).sum::<u32>() * cell_w
}

pub fn line_height(size: f32) -> u32 {
    cell_size(size).1
}

/// Rasterise a line, calling `plot(x, y, coverage)` for every inked pixel.
pub fn draw_line(text: &str, size: f32, mut plot: impl FnMut(i32, i32, f32)) {
    let (cell_w, cell_h) = cell_size(size);
    let mut spleen = PSF2Font::new(FONT_12X24).ok();
    let mut cursor_x = 0u32;

    for ch in text.chars() {
        let cells = char_cells(ch);
        if cells == 0 {
            continue;
        }
        let target_w = cell_w * cells;
        let glyph = spleen
            .as_mut()
            .and_then(|font| base_glyph(font, ch))
            .unwrap_or_else(missing_glyph);

        for dy in 0..cell_h {
            for dx in 0..target_w {
                let sx = dx as usize * BASE_WIDTH / target_w as usize;
                let sy = dy as usize * BASE_HEIGHT / cell_h as usize;
                if glyph[sy * BASE_WIDTH + sx] {
                    plot((cursor_x + dx) as i32, dy as i32, 1.0);
                }
            }
        }
        cursor_x += target_w;
    }
}

/// Look up a glyph in the 12x24 face.
fn base_glyph(font: &mut PSF2Font, ch: char) -> Option<Vec<bool>> {
    let utf8_bytes = ch.to_string();
    let spleen_glyph = font.glyph_for_utf8(utf8_bytes.as_bytes())?;
    let mut glyph = vec![false; BASE_WIDTH * BASE_HEIGHT];
    for (row_y, row) in spleen_glyph.enumerate() {
        for (col_x, on) in row.enumerate() {
            if row_y < BASE_HEIGHT && col_x < BASE_WIDTH {
                glyph[row_y * BASE_WIDTH + col_x] = on;
            }
        }
    }
    Some(glyph)
}

/// Outlined box for characters outside the face.
fn missing_glyph() -> Vec<bool> {
    let mut glyph = vec![false; BASE_WIDTH * BASE_HEIGHT];
    for y in 2..BASE_HEIGHT - 2 {
        for x in 1..BASE_WIDTH - 1 {
            let edge = y == 2 || y == BASE_HEIGHT - 3 || x == 1 || x == BASE_WIDTH - 2;
            glyph[y * BASE_WIDTH + x] = edge;
        }
    }
    glyph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_size_rounds_up_half_width() {
        assert_eq!(cell_size(24.0), (12, 24));
        assert_eq!(cell_size(25.0), (13, 25));
        assert_eq!(cell_size(0.0), (1, 1));
    }

    #[test]
    fn wide_characters_take_two_cells() {
        assert_eq!(line_width("ab", 24.0), 24);
        assert_eq!(line_width("菜单", 24.0), 48);
    }

    #[test]
    fn draw_stays_inside_measured_box() {
        let width = line_width("Hello 菜单", 25.0) as i32;
        let height = line_height(25.0) as i32;
        let mut inked = 0;
        draw_line("Hello 菜单", 25.0, |x, y, _| {
            assert!(x >= 0 && x < width);
            assert!(y >= 0 && y < height);
            inked += 1;
        });
        assert!(inked > 0);
    }

    #[test]
    fn missing_glyph_is_a_hollow_box() {
        let glyph = missing_glyph();
        assert!(glyph[2 * BASE_WIDTH + 1]);
        assert!(!glyph[10 * BASE_WIDTH + 5]);
    }
}
