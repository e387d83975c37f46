//! Named rectangles over a canvas.
//!
//! A [`Canvas`] owns an RGBA image plus a registry of named [`Rect`]s in the
//! canvas' own coordinates. Boxes are used to place content (via [`Align`])
//! and to draw outlines; they are never shared between canvases.

use image::{Rgba, RgbaImage, imageops};
use std::collections::HashMap;

use crate::error::LayoutError;
use crate::raster::RenderedImage;

/// An axis-aligned rectangle: origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(origin: (i32, i32), size: (u32, u32)) -> Self {
        Self {
            x: origin.0,
            y: origin.1,
            width: size.0,
            height: size.1,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn top_left(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Top-left position for content of `content` size placed by `mode`.
    ///
    /// Pure: the rectangle itself is never changed. Content larger than the
    /// rectangle gets a negative offset and overhangs both sides evenly.
    pub fn align(&self, content: (u32, u32), mode: Align) -> (i32, i32) {
        let centered_x = self.x + (self.width as i32 - content.0 as i32) / 2;
        let centered_y = self.y + (self.height as i32 - content.1 as i32) / 2;
        match mode {
            Align::Center => (centered_x, centered_y),
            Align::Horizontal { y } => (centered_x, y),
            Align::At { x, y } => (x, y),
        }
    }
}

/// How content is placed against a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Centre on both axes.
    Center,
    /// Centre horizontally, use the given absolute `y`.
    Horizontal { y: i32 },
    /// Explicit absolute position.
    At { x: i32, y: i32 },
}

/// An RGBA drawing surface with a registry of named boxes.
pub struct Canvas {
    image: RgbaImage,
    boxes: HashMap<String, Rect>,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RenderedImage::filled(width, height, background).into_rgba(),
            boxes: HashMap::new(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// The whole canvas as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new((0, 0), self.size())
    }

    /// Register (or replace) a named box.
    pub fn define_box(&mut self, name: impl Into<String>, origin: (i32, i32), size: (u32, u32)) -> Rect {
        let rect = Rect::new(origin, size);
        self.boxes.insert(name.into(), rect);
        rect
    }

    /// Look up a named box.
    pub fn rect(&self, name: &str) -> Result<Rect, LayoutError> {
        self.boxes
            .get(name)
            .copied()
            .ok_or_else(|| LayoutError::UnknownBox(name.to_string()))
    }

    /// Position content of `content` size against a named box.
    pub fn align_box(&self, name: &str, content: (u32, u32), mode: Align) -> Result<(i32, i32), LayoutError> {
        Ok(self.rect(name)?.align(content, mode))
    }

    /// Paste `content` with its top-left corner at `position`.
    ///
    /// With `alpha_blend` the content's alpha channel acts as a mask over the
    /// destination; without it destination pixels are overwritten. Returns
    /// the rectangle the content occupies (possibly partly off-canvas).
    pub fn composite(&mut self, content: &RenderedImage, position: (i32, i32), alpha_blend: bool) -> Rect {
        if !alpha_blend {
            imageops::replace(
                &mut self.image,
                content.as_rgba(),
                i64::from(position.0),
                i64::from(position.1),
            );
            return Rect::new(position, content.size());
        }

        let (width, height) = self.size();
        for (cx, cy, src) in content.as_rgba().enumerate_pixels() {
            let x = position.0 + cx as i32;
            let y = position.1 + cy as i32;
            if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                continue;
            }
            let dst = self.image.get_pixel_mut(x as u32, y as u32);
            *dst = blend_over(*dst, *src);
        }
        Rect::new(position, content.size())
    }

    /// Draw a rectangle outline `stroke` pixels thick, inside `rect`.
    pub fn outline(&mut self, rect: Rect, color: Rgba<u8>, stroke: u32) {
        let stroke = stroke.min(rect.width.div_ceil(2)).min(rect.height.div_ceil(2)) as i32;
        for i in 0..stroke {
            let (left, right) = (rect.left() + i, rect.right() - 1 - i);
            let (top, bottom) = (rect.top() + i, rect.bottom() - 1 - i);
            for x in left..=right {
                self.put(x, top, color);
                self.put(x, bottom, color);
            }
            for y in top..=bottom {
                self.put(left, y, color);
                self.put(right, y, color);
            }
        }
    }

    /// Outline a named box.
    pub fn outline_box(&mut self, name: &str, color: Rgba<u8>, stroke: u32) -> Result<Rect, LayoutError> {
        let rect = self.rect(name)?;
        self.outline(rect, color, stroke);
        Ok(rect)
    }

    pub fn into_image(self) -> RenderedImage {
        self.image.into()
    }

    fn put(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Source-over compositing of `src` onto `dst`.
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        0 => dst,
        255 => src,
        a => {
            let src_a = a as f32 / 255.0;
            let dst_a = dst[3] as f32 / 255.0 * (1.0 - src_a);
            let out_a = src_a + dst_a;
            let channel = |i: usize| {
                ((src[i] as f32 * src_a + dst[i] as f32 * dst_a) / out_a).round() as u8
            };
            Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round() as u8])
        }
    }
}
