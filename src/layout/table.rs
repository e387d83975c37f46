//! Table layout.
//!
//! Two passes: measure every cell (row heights and column widths are the
//! max over their cells plus margins), then place boxes from a moving anchor
//! starting at `(1, 1)`. Adjacent boxes share edges exactly, so the grid has
//! no gaps and no overlap regardless of content.

use image::Rgba;
use std::iter;

use super::boxes::{Align, Canvas, Rect};
use crate::error::LayoutError;
use crate::raster::RenderedImage;

/// Padding between a cell's border and its content, on every side.
pub const CELL_MARGIN: u32 = 10;

/// Stroke width of cell borders.
pub const CELL_STROKE: u32 = 2;

/// Stroke width of the outer decorative frame and its accent square.
pub const FRAME_STROKE: u32 = 5;

/// Side length of the accent square.
pub const ACCENT_SIZE: u32 = 50;

/// Extra pixels added to the table canvas beyond the sum of cell sizes.
const TABLE_SLACK: u32 = 3;

/// Options for [`layout_table`].
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub margin: u32,
    pub stroke: u32,
    pub line_color: Rgba<u8>,
    pub background: Rgba<u8>,
    /// Minimum width per column index; missing entries mean no minimum.
    pub min_column_widths: Vec<u32>,
}

impl TableOptions {
    pub fn new(line_color: Rgba<u8>, background: Rgba<u8>) -> Self {
        Self {
            margin: CELL_MARGIN,
            stroke: CELL_STROKE,
            line_color,
            background,
            min_column_widths: Vec::new(),
        }
    }

    /// Force column `column` to be at least `width` pixels wide.
    pub fn min_column_width(mut self, column: usize, width: u32) -> Self {
        if self.min_column_widths.len() <= column {
            self.min_column_widths.resize(column + 1, 0);
        }
        self.min_column_widths[column] = width;
        self
    }
}

/// A placed cell: its box name on the table canvas and its rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBox {
    pub name: String,
    pub rect: Rect,
}

/// Result of [`layout_table`].
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub image: RenderedImage,
    pub row_heights: Vec<u32>,
    pub column_widths: Vec<u32>,
    /// `cells[row][column]`; row 0 is the header.
    pub cells: Vec<Vec<CellBox>>,
}

impl TableLayout {
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellBox> {
        self.cells.get(row).and_then(|r| r.get(column))
    }

    /// Number of data rows (excluding the header).
    pub fn data_rows(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }
}

/// Box name of a cell on the table canvas.
pub fn cell_box_name(row: usize, column: usize) -> String {
    format!("cell_{}_{}", row, column)
}

/// Lay out and draw a table.
///
/// `header` and every row of `rows` must have the same length. Cell
/// contents are pre-rendered on transparent backgrounds and are centred in
/// their boxes with alpha blending.
pub fn layout_table(
    header: &[RenderedImage],
    rows: &[Vec<RenderedImage>],
    options: &TableOptions,
) -> Result<TableLayout, LayoutError> {
    let columns = header.len();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != columns {
            return Err(LayoutError::RaggedTable {
                row: i + 1,
                expected: columns,
                found: row.len(),
            });
        }
    }

    let grid: Vec<&[RenderedImage]> = iter::once(header)
        .chain(rows.iter().map(Vec::as_slice))
        .collect();

    // Measure
    let row_heights: Vec<u32> = grid
        .iter()
        .map(|row| row.iter().map(RenderedImage::height).max().unwrap_or(0) + 2 * options.margin)
        .collect();
    let column_widths: Vec<u32> = (0..columns)
        .map(|c| {
            let natural = grid.iter().map(|row| row[c].width()).max().unwrap_or(0) + 2 * options.margin;
            natural.max(options.min_column_widths.get(c).copied().unwrap_or(0))
        })
        .collect();

    // Place
    let table_width = column_widths.iter().sum::<u32>() + TABLE_SLACK;
    let table_height = row_heights.iter().sum::<u32>() + TABLE_SLACK;
    let mut canvas = Canvas::new(table_width, table_height, options.background);

    let initial = (1i32, 1i32);
    let mut anchor = initial;
    let mut cells = Vec::with_capacity(grid.len());
    for (r, row) in grid.iter().enumerate() {
        let mut placed = Vec::with_capacity(columns);
        for (c, content) in row.iter().enumerate() {
            let name = cell_box_name(r, c);
            let rect = canvas.define_box(name.clone(), anchor, (column_widths[c], row_heights[r]));
            canvas.outline_box(&name, options.line_color, options.stroke)?;
            let position = canvas.align_box(&name, content.size(), Align::Center)?;
            canvas.composite(content, position, true);
            anchor.0 += column_widths[c] as i32;
            placed.push(CellBox { name, rect });
        }
        anchor.0 = initial.0;
        anchor.1 += row_heights[r] as i32;
        cells.push(placed);
    }

    Ok(TableLayout {
        image: canvas.into_image(),
        row_heights,
        column_widths,
        cells,
    })
}

/// Colours and geometry of the decorative frame shared by every menu tier.
#[derive(Debug, Clone, Copy)]
pub struct FrameStyle {
    pub border: Rgba<u8>,
    pub accent: Rgba<u8>,
    pub stroke: u32,
    /// How far the accent square sits outward from the frame's top-left corner.
    pub accent_offset: (i32, i32),
}

impl FrameStyle {
    pub fn new(border: Rgba<u8>, accent: Rgba<u8>) -> Self {
        Self {
            border,
            accent,
            stroke: FRAME_STROKE,
            accent_offset: (ACCENT_SIZE as i32 / 2, ACCENT_SIZE as i32 / 2),
        }
    }

    pub fn accent_offset(mut self, dx: i32, dy: i32) -> Self {
        self.accent_offset = (dx, dy);
        self
    }
}

/// Register `rect` as box `name`, outline it, and draw the accent square
/// anchored at its top-left corner. Returns the accent square's rectangle.
pub fn draw_frame(canvas: &mut Canvas, name: &str, rect: Rect, style: &FrameStyle) -> Result<Rect, LayoutError> {
    canvas.define_box(name, rect.top_left(), rect.size());
    let frame = canvas.outline_box(name, style.border, style.stroke)?;
    let accent = Rect::new(
        (
            frame.left() - style.accent_offset.0,
            frame.top() - style.accent_offset.1,
        ),
        (ACCENT_SIZE, ACCENT_SIZE),
    );
    canvas.outline(accent, style.accent, style.stroke);
    Ok(accent)
}
