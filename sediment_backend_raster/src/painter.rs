// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU painter over plain pixel buffers.
//!
//! Pixels are packed RGBA, channels least-significant-byte first (`r` in
//! the low byte), so on little-endian hosts [`Pixmap::as_bytes`] yields
//! interleaved RGBA bytes ready for upload or file dumps. Coordinates are
//! physical pixels; shape geometry is rounded to the pixel grid and clipped
//! to the target bounds.

use core::fmt;
use std::collections::HashMap;

use kurbo::{Point, Rect};

use sediment_core::backend::{BlendMode, Blit, Painter, Rgba8, TextureId};
use sediment_core::geom::PhysicalSize;

// ---------------------------------------------------------------------------
// Pixel helpers
// ---------------------------------------------------------------------------

const fn pack(color: Rgba8) -> u32 {
    u32::from_le_bytes([color.r, color.g, color.b, color.a])
}

const fn unpack(pixel: u32) -> Rgba8 {
    let [r, g, b, a] = pixel.to_le_bytes();
    Rgba8::new(r, g, b, a)
}

#[expect(clippy::cast_possible_truncation, reason = "channel math never exceeds u8 range")]
fn mix(s: u8, d: u8, sa: u32, inv: u32) -> u8 {
    ((u32::from(s) * sa + u32::from(d) * inv) / 255) as u8
}

/// Straight-alpha source-over: `out = src + dst * (1 - src.a)`.
fn source_over(src: Rgba8, dst: Rgba8) -> Rgba8 {
    let sa = u32::from(src.a);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255 - sa;
    Rgba8::new(
        mix(src.r, dst.r, sa, inv),
        mix(src.g, dst.g, sa, inv),
        mix(src.b, dst.b, sa, inv),
        mix(255, dst.a, sa, inv),
    )
}

/// Rounds a coordinate to the pixel grid.
#[expect(
    clippy::cast_possible_truncation,
    reason = "coordinates are window-scale, well inside i32"
)]
fn px(v: f64) -> i32 {
    v.round() as i32
}

// ---------------------------------------------------------------------------
// Pixmap
// ---------------------------------------------------------------------------

/// A sized buffer of packed RGBA pixels.
pub struct Pixmap {
    size: PhysicalSize,
    pixels: Vec<u32>,
}

impl Pixmap {
    /// Creates a fully transparent pixmap.
    #[must_use]
    pub fn new(size: PhysicalSize) -> Self {
        Self {
            size,
            pixels: vec![0; size.width as usize * size.height as usize],
        }
    }

    /// Size in physical pixels.
    #[must_use]
    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    /// The color at `(x, y)`, or `None` outside the pixmap.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(unpack(self.pixels[self.index(x, y)]))
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: Rgba8) {
        self.pixels.fill(pack(color));
    }

    /// The packed pixels, row-major.
    #[must_use]
    pub fn data(&self) -> &[u32] {
        &self.pixels
    }

    /// The pixels as raw bytes, row-major.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }

    fn pixel_signed(&self, x: i32, y: i32) -> Option<Rgba8> {
        if x < 0 || y < 0 {
            return None;
        }
        self.pixel(x as u32, y as u32)
    }

    fn write(&mut self, index: usize, color: Rgba8, mode: BlendMode) {
        self.pixels[index] = match mode {
            BlendMode::Opaque => pack(color),
            BlendMode::SourceOver => pack(source_over(color, unpack(self.pixels[index]))),
        };
    }

    pub(crate) fn set_pixel(&mut self, x: i32, y: i32, color: Rgba8, mode: BlendMode) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.size.width || y >= self.size.height {
            return;
        }
        let index = self.index(x, y);
        self.write(index, color, mode);
    }

    /// Half-open horizontal run `[x0, x1)` on row `y`, clipped.
    pub(crate) fn span(&mut self, y: i32, x0: i32, x1: i32, color: Rgba8, mode: BlendMode) {
        if y < 0 || x1 <= 0 {
            return;
        }
        let y = y as u32;
        if y >= self.size.height {
            return;
        }
        let x0 = x0.max(0) as u32;
        let x1 = (x1 as u32).min(self.size.width);
        for x in x0..x1 {
            let index = self.index(x, y);
            self.write(index, color, mode);
        }
    }
}

impl fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pixmap")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// RasterPainter
// ---------------------------------------------------------------------------

/// Software [`Painter`] drawing into [`Pixmap`] textures.
///
/// The painter owns a root *frame* pixmap standing in for the window. Draw
/// operations land in the top of the target stack, or in the frame when the
/// stack is empty. [`compose`](Self::compose) applies the blits a display
/// pass returns, copying texture pixels onto the frame.
#[derive(Debug)]
pub struct RasterPainter {
    frame: Pixmap,
    textures: HashMap<TextureId, Pixmap>,
    target_stack: Vec<TextureId>,
    next_texture: u64,
    color: Rgba8,
    blend: BlendMode,
}

impl RasterPainter {
    /// Creates a painter with a transparent frame of the given size.
    #[must_use]
    pub fn new(frame_size: PhysicalSize) -> Self {
        Self {
            frame: Pixmap::new(frame_size),
            textures: HashMap::new(),
            target_stack: Vec::new(),
            next_texture: 0,
            color: Rgba8::BLACK,
            blend: BlendMode::default(),
        }
    }

    /// The root frame pixmap.
    #[must_use]
    pub fn frame(&self) -> &Pixmap {
        &self.frame
    }

    /// A texture's pixels, or `None` after destruction.
    #[must_use]
    pub fn texture(&self, id: TextureId) -> Option<&Pixmap> {
        self.textures.get(&id)
    }

    /// Number of live textures.
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Resets the frame to a solid color, as a compositor clear would.
    pub fn clear_frame(&mut self, color: Rgba8) {
        self.frame.fill(color);
    }

    /// Applies blits onto the frame with source-over blending.
    ///
    /// Source and destination regions are expected congruent; no scaling is
    /// performed. Blits naming destroyed textures are dropped.
    pub fn compose(&mut self, blits: &[Blit]) {
        for blit in blits {
            let Some(texture) = self.textures.get(&blit.texture) else {
                continue;
            };
            let src_x = px(blit.src.x0);
            let src_y = px(blit.src.y0);
            let dst_x = px(blit.dst.x0);
            let dst_y = px(blit.dst.y0);
            for row in 0..px(blit.src.height()) {
                for col in 0..px(blit.src.width()) {
                    if let Some(pixel) = texture.pixel_signed(src_x + col, src_y + row) {
                        self.frame
                            .set_pixel(dst_x + col, dst_y + row, pixel, BlendMode::SourceOver);
                    }
                }
            }
        }
    }

    fn target_mut(&mut self) -> &mut Pixmap {
        match self.target_stack.last().copied() {
            Some(id) => match self.textures.get_mut(&id) {
                Some(pixmap) => pixmap,
                None => panic!("render target {id:?} was destroyed while targeted"),
            },
            None => &mut self.frame,
        }
    }
}

impl Painter for RasterPainter {
    fn set_color(&mut self, color: Rgba8) {
        self.color = color;
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        let (color, mode) = (self.color, self.blend);
        let (mut x, mut y) = (px(from.x), px(from.y));
        let (x1, y1) = (px(to.x), px(to.y));
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let target = self.target_mut();
        loop {
            target.set_pixel(x, y, color, mode);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                if x == x1 {
                    break;
                }
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                if y == y1 {
                    break;
                }
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_rect(&mut self, rect: Rect) {
        let (color, mode) = (self.color, self.blend);
        let (x0, y0) = (px(rect.x0), px(rect.y0));
        let (x1, y1) = (px(rect.x1), px(rect.y1));
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let target = self.target_mut();
        target.span(y0, x0, x1, color, mode);
        if y1 - 1 > y0 {
            target.span(y1 - 1, x0, x1, color, mode);
        }
        for y in (y0 + 1)..(y1 - 1) {
            target.set_pixel(x0, y, color, mode);
            target.set_pixel(x1 - 1, y, color, mode);
        }
    }

    fn fill_rect(&mut self, rect: Rect) {
        let (color, mode) = (self.color, self.blend);
        let (x0, y0) = (px(rect.x0), px(rect.y0));
        let (x1, y1) = (px(rect.x1), px(rect.y1));
        let target = self.target_mut();
        for y in y0..y1 {
            target.span(y, x0, x1, color, mode);
        }
    }

    fn draw_circle(&mut self, center: Point, radius: f64) {
        let (color, mode) = (self.color, self.blend);
        let (cx, cy) = (px(center.x), px(center.y));
        let r = px(radius.abs());
        let target = self.target_mut();
        if r <= 0 {
            target.set_pixel(cx, cy, color, mode);
            return;
        }
        let mut x = r;
        let mut y = 0_i32;
        let mut err = 0_i32;
        while x >= y {
            for (dx, dy) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                target.set_pixel(cx + dx, cy + dy, color, mode);
            }
            y += 1;
            err += 1 + 2 * y;
            if 2 * (err - x) + 1 > 0 {
                x -= 1;
                err += 1 - 2 * x;
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64) {
        let (color, mode) = (self.color, self.blend);
        let (cx, cy) = (px(center.x), px(center.y));
        let r = px(radius.abs());
        let target = self.target_mut();
        if r <= 0 {
            target.set_pixel(cx, cy, color, mode);
            return;
        }
        let mut x = r;
        let mut y = 0_i32;
        let mut err = 0_i32;
        while x >= y {
            target.span(cy + y, cx - x, cx + x + 1, color, mode);
            target.span(cy - y, cx - x, cx + x + 1, color, mode);
            target.span(cy + x, cx - y, cx + y + 1, color, mode);
            target.span(cy - x, cx - y, cx + y + 1, color, mode);
            y += 1;
            err += 1 + 2 * y;
            if 2 * (err - x) + 1 > 0 {
                x -= 1;
                err += 1 - 2 * x;
            }
        }
    }

    fn create_texture(&mut self, size: PhysicalSize) -> TextureId {
        self.next_texture += 1;
        let id = TextureId(self.next_texture);
        self.textures.insert(id, Pixmap::new(size));
        id
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
    }

    fn push_target(&mut self, texture: TextureId) {
        debug_assert!(
            self.textures.contains_key(&texture),
            "push_target of a texture this painter does not own"
        );
        self.target_stack.push(texture);
    }

    fn pop_target(&mut self) {
        let popped = self.target_stack.pop();
        debug_assert!(popped.is_some(), "pop_target without matching push_target");
    }
}
