//! # Box-Model Layout
//!
//! Named rectangles over a canvas ([`boxes`]) and the table engine built on
//! them ([`table`]). Every menu image is assembled from these two pieces.

pub mod boxes;
pub mod table;

pub use boxes::{Align, Canvas, Rect};
pub use table::{
    CellBox, FrameStyle, TableLayout, TableOptions, draw_frame, layout_table, ACCENT_SIZE, CELL_MARGIN, CELL_STROKE,
    FRAME_STROKE,
};
