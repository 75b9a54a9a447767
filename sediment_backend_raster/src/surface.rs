// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The software surface: cache-texture bookkeeping plus a background fill.

use kurbo::{Rect, Size};

use sediment_core::backend::{BlendMode, Blit, Painter, Rgba8, Surface, TextureId};
use sediment_core::geom::PhysicalSize;

/// A [`Surface`] backed by [`RasterPainter`](crate::RasterPainter) textures.
///
/// The surface rebuilds its cache texture whenever the physical size no
/// longer matches, filling it with the background color. Replay passes then
/// accumulate on top; an up-to-date texture is never touched here.
#[derive(Debug)]
pub struct RasterSurface {
    logical: Size,
    scale: f64,
    background: Rgba8,
    texture: Option<TextureId>,
    texture_size: Option<PhysicalSize>,
}

impl RasterSurface {
    /// Creates a surface with no texture yet; the first
    /// [`blit`](Surface::blit) builds one.
    #[must_use]
    pub fn new(logical: Size, scale: f64, background: Rgba8) -> Self {
        Self {
            logical,
            scale,
            background,
            texture: None,
            texture_size: None,
        }
    }

    /// The color freshly built textures are filled with.
    #[must_use]
    pub fn background(&self) -> Rgba8 {
        self.background
    }

    /// Changes the background. Shows after the next texture rebuild, so
    /// callers wanting it now should invalidate their canvas.
    pub fn set_background(&mut self, color: Rgba8) {
        self.background = color;
    }

    fn desired_size(&self) -> PhysicalSize {
        PhysicalSize::from_logical(self.logical, self.scale)
    }
}

impl Surface for RasterSurface {
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
        if let Some(texture) = self.texture.take() {
            painter.destroy_texture(texture);
        }
        self.texture_size = None;
    }

    fn blit(&mut self, painter: &mut dyn Painter, frame: Rect) -> Vec<Blit> {
        let desired = self.desired_size();
        if self.texture_size.is_some() && self.texture_size != Some(desired) {
            self.unload(painter);
        }
        let texture = match self.texture {
            Some(texture) => texture,
            None => {
                let texture = painter.create_texture(desired);
                painter.push_target(texture);
                painter.set_blend_mode(BlendMode::Opaque);
                painter.set_color(self.background);
                painter.fill_rect(desired.to_rect());
                painter.pop_target();
                self.texture = Some(texture);
                self.texture_size = Some(desired);
                texture
            }
        };
        vec![Blit {
            texture,
            src: desired.to_rect(),
            dst: frame,
        }]
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use sediment_core::canvas::{Canvas, CanvasOptions};
    use sediment_core::display::DisplayOutcome;
    use sediment_core::redraw::{RedrawRequests, WindowId};
    use sediment_core::trace::Tracer;

    use super::*;
    use crate::RasterPainter;

    const BLUE: Rgba8 = Rgba8::new(0, 0, 200, 255);

    fn fixture() -> (RasterSurface, RasterPainter) {
        (
            RasterSurface::new(Size::new(8.0, 8.0), 1.0, BLUE),
            RasterPainter::new(PhysicalSize::new(16, 16)),
        )
    }

    #[test]
    fn first_blit_builds_a_background_filled_texture() {
        let (mut surface, mut painter) = fixture();
        let blits = surface.blit(&mut painter, Rect::new(0.0, 0.0, 8.0, 8.0));

        assert_eq!(blits.len(), 1);
        let id = surface.texture().unwrap();
        assert_eq!(surface.texture_size(), Some(PhysicalSize::new(8, 8)));
        assert_eq!(painter.texture(id).unwrap().pixel(7, 7), Some(BLUE));
    }

    #[test]
    fn repeated_blits_leave_contents_alone() {
        let (mut surface, mut painter) = fixture();
        let frame = Rect::new(0.0, 0.0, 8.0, 8.0);
        surface.blit(&mut painter, frame);
        let id = surface.texture().unwrap();

        // Scribble on the texture the way a replay pass would.
        painter.push_target(id);
        painter.set_color(Rgba8::WHITE);
        painter.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
        painter.pop_target();

        surface.blit(&mut painter, frame);
        assert_eq!(surface.texture(), Some(id));
        assert_eq!(painter.texture(id).unwrap().pixel(1, 1), Some(Rgba8::WHITE));
    }

    #[test]
    fn size_change_rebuilds_the_texture() {
        let (mut surface, mut painter) = fixture();
        let frame = Rect::new(0.0, 0.0, 8.0, 8.0);
        surface.blit(&mut painter, frame);
        let old = surface.texture().unwrap();

        surface.resize(Size::new(4.0, 4.0));
        surface.blit(&mut painter, frame);
        let new = surface.texture().unwrap();

        assert_ne!(old, new);
        assert!(painter.texture(old).is_none());
        assert_eq!(surface.texture_size(), Some(PhysicalSize::new(4, 4)));
    }

    #[test]
    fn scale_factor_drives_physical_size() {
        let mut surface = RasterSurface::new(Size::new(8.0, 8.0), 2.0, BLUE);
        let mut painter = RasterPainter::new(PhysicalSize::new(32, 32));
        surface.blit(&mut painter, Rect::new(0.0, 0.0, 8.0, 8.0));
        assert_eq!(surface.texture_size(), Some(PhysicalSize::new(16, 16)));
    }

    #[test]
    fn unload_destroys_and_forgets() {
        let (mut surface, mut painter) = fixture();
        surface.blit(&mut painter, Rect::new(0.0, 0.0, 8.0, 8.0));
        let id = surface.texture().unwrap();

        surface.unload(&mut painter);
        assert_eq!(surface.texture(), None);
        assert_eq!(surface.texture_size(), None);
        assert!(painter.texture(id).is_none());
    }

    #[test]
    fn adopted_textures_are_taken_at_face_value() {
        let (mut surface, mut painter) = fixture();
        let foreign = painter.create_texture(PhysicalSize::new(8, 8));
        surface.set_texture(Some(foreign));

        let blits = surface.blit(&mut painter, Rect::new(0.0, 0.0, 8.0, 8.0));
        assert_eq!(blits[0].texture, foreign);
        assert_eq!(painter.texture_count(), 1);
    }

    #[test]
    fn canvas_replays_onto_the_raster_texture() {
        let surface = RasterSurface::new(Size::new(8.0, 8.0), 1.0, BLUE);
        let mut painter = RasterPainter::new(PhysicalSize::new(16, 16));
        let mut canvas = Canvas::new(Box::new(surface), CanvasOptions::default());
        let redraw = RedrawRequests::new();
        let frame = Rect::new(0.0, 0.0, 8.0, 8.0);

        canvas.add(|painter| {
            painter.set_color(Rgba8::WHITE);
            painter.fill_rect(Rect::new(0.0, 0.0, 3.0, 3.0));
        });
        canvas.draw_circle(Point::new(5.0, 5.0), 1.0, Rgba8::BLACK, true);

        let mut report = canvas.display(
            WindowId(0),
            frame,
            &mut painter,
            &redraw,
            &mut Tracer::none(),
        );
        while report.outcome == DisplayOutcome::Yielded {
            redraw.drain();
            report = canvas.display(
                WindowId(0),
                frame,
                &mut painter,
                &redraw,
                &mut Tracer::none(),
            );
        }

        let texture = painter.texture(canvas.texture().unwrap()).unwrap();
        assert_eq!(texture.pixel(1, 1), Some(Rgba8::WHITE));
        assert_eq!(texture.pixel(5, 5), Some(Rgba8::BLACK));
        assert_eq!(texture.pixel(7, 0), Some(BLUE));

        painter.compose(&report.blits);
        assert_eq!(painter.frame().pixel(1, 1), Some(Rgba8::WHITE));
    }
}
