// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared test doubles: a painter that records calls and a surface that
//! follows the cache-texture contract without rasterizing anything.

use kurbo::{Point, Rect, Size};

use crate::backend::{BlendMode, Blit, Painter, Rgba8, Surface, TextureId};
use crate::geom::PhysicalSize;

/// A [`Painter`] that records every call for assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingPainter {
    pub(crate) draw_calls: u64,
    pub(crate) colors: Vec<Rgba8>,
    pub(crate) blends: Vec<BlendMode>,
    pub(crate) lines: Vec<(Point, Point)>,
    pub(crate) rects: Vec<(Rect, bool)>,
    pub(crate) circles: Vec<(Point, f64, bool)>,
    pub(crate) created: Vec<TextureId>,
    pub(crate) destroyed: Vec<TextureId>,
    pub(crate) target_stack: Vec<TextureId>,
    pub(crate) pushes: u64,
    pub(crate) pops: u64,
    pub(crate) presents: u64,
    next_texture: u64,
}

impl Painter for RecordingPainter {
    fn set_color(&mut self, color: Rgba8) {
        self.colors.push(color);
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blends.push(mode);
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        self.draw_calls += 1;
        self.lines.push((from, to));
    }

    fn draw_rect(&mut self, rect: Rect) {
        self.draw_calls += 1;
        self.rects.push((rect, false));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.draw_calls += 1;
        self.rects.push((rect, true));
    }

    fn draw_circle(&mut self, center: Point, radius: f64) {
        self.draw_calls += 1;
        self.circles.push((center, radius, false));
    }

    fn fill_circle(&mut self, center: Point, radius: f64) {
        self.draw_calls += 1;
        self.circles.push((center, radius, true));
    }

    fn create_texture(&mut self, _size: PhysicalSize) -> TextureId {
        self.next_texture += 1;
        let id = TextureId(self.next_texture);
        self.created.push(id);
        id
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.destroyed.push(texture);
    }

    fn push_target(&mut self, texture: TextureId) {
        self.pushes += 1;
        self.target_stack.push(texture);
    }

    fn pop_target(&mut self) {
        self.pops += 1;
        let _ = self.target_stack.pop();
    }

    fn present(&mut self) {
        self.presents += 1;
    }
}

/// A [`Surface`] that keeps the cache-texture bookkeeping honest (create on
/// blit, rebuild on size change, destroy on unload) without drawing pixels.
#[derive(Debug)]
pub(crate) struct ScriptedSurface {
    pub(crate) logical: Size,
    pub(crate) scale: f64,
    pub(crate) texture: Option<TextureId>,
    pub(crate) texture_size: Option<PhysicalSize>,
    pub(crate) blit_calls: u64,
    pub(crate) unload_calls: u64,
    /// When true, `blit` "forgets" to create the texture, violating the
    /// surface contract on purpose.
    pub(crate) fail_texture_creation: bool,
}

impl ScriptedSurface {
    pub(crate) fn new(logical: Size, scale: f64) -> Self {
        Self {
            logical,
            scale,
            texture: None,
            texture_size: None,
            blit_calls: 0,
            unload_calls: 0,
            fail_texture_creation: false,
        }
    }

    fn desired_size(&self) -> PhysicalSize {
        PhysicalSize::from_logical(self.logical, self.scale)
    }
}

impl Surface for ScriptedSurface {
    fn logical_size(&self) -> Size {
        self.logical
    }

    fn resize(&mut self, size: Size) {
        self.logical = size;
    }

    fn scale_factor(&self) -> f64 {
        self.scale
    }

    fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    fn texture_size(&self) -> Option<PhysicalSize> {
        self.texture_size
    }

    fn set_texture(&mut self, texture: Option<TextureId>) {
        self.texture = texture;
        self.texture_size = texture.map(|_| self.desired_size());
    }

    fn unload(&mut self, painter: &mut dyn Painter) {
        self.unload_calls += 1;
        if let Some(texture) = self.texture.take() {
            painter.destroy_texture(texture);
        }
        self.texture_size = None;
    }

    fn blit(&mut self, painter: &mut dyn Painter, frame: Rect) -> Vec<Blit> {
        self.blit_calls += 1;
        let desired = self.desired_size();
        if self.texture_size.is_some() && self.texture_size != Some(desired) {
            if let Some(texture) = self.texture.take() {
                painter.destroy_texture(texture);
            }
            self.texture_size = None;
        }
        if self.texture.is_none() && !self.fail_texture_creation {
            self.texture = Some(painter.create_texture(desired));
            self.texture_size = Some(desired);
        }
        match self.texture {
            Some(texture) => vec![Blit {
                texture,
                src: desired.to_rect(),
                dst: frame,
            }],
            None => Vec::new(),
        }
    }
}
