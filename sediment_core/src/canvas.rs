// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canvas: an owned surface plus the backlog that paints it.
//!
//! A [`Canvas`] ties together one [`Surface`], one [`Backlog`], a frame
//! budget, and a clock. Everything here is bookkeeping and recording; the
//! actual replay lives in the display driver (see
//! [`display`](crate::display)).

use core::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use kurbo::{Point, Rect, Size, Vec2};

use crate::backend::{Painter, Rgba8, Surface, TextureId};
use crate::backlog::Backlog;
use crate::clock::{Clock, MonotonicClock};
use crate::command::DrawCommand;
use crate::geom::PhysicalSize;

/// Default per-frame replay budget.
///
/// Modest on purpose: well under a 60 Hz frame interval once the surface
/// blit and the surrounding compositor take their share.
pub const DEFAULT_BUDGET: Duration = Duration::from_millis(50);

/// Construction options for a [`Canvas`].
pub struct CanvasOptions {
    /// Per-frame replay budget.
    pub budget: Duration,
    /// Time source for the budget check.
    pub clock: Arc<dyn Clock>,
}

impl CanvasOptions {
    /// Default options with a specific budget.
    #[must_use]
    pub fn with_budget(budget: Duration) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    /// Default options with a specific clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            clock: Arc::new(MonotonicClock),
        }
    }
}

impl fmt::Debug for CanvasOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasOptions")
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}

/// A drawing surface with a retained, resumable command backlog.
///
/// The canvas exclusively owns its surface and the cache texture behind it.
/// Mutation (add/remove/clear) is `&self` and may come from any thread via
/// [`backlog`](Self::backlog) clones; `display`, `resize`, and the texture
/// escape hatches are render-thread operations.
pub struct Canvas {
    pub(crate) surface: Box<dyn Surface>,
    pub(crate) backlog: Backlog,
    pub(crate) budget: Duration,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) epoch: Instant,
    pub(crate) passes: u64,
}

impl Canvas {
    /// Creates a canvas over an externally built surface.
    ///
    /// The backlog starts empty and dirty, so the first display always runs
    /// a fresh pass and produces the texture.
    #[must_use]
    pub fn new(surface: Box<dyn Surface>, options: CanvasOptions) -> Self {
        let epoch = options.clock.now();
        Self {
            surface,
            backlog: Backlog::new(),
            budget: options.budget,
            clock: options.clock,
            epoch,
            passes: 0,
        }
    }

    // -- Backlog API --

    /// Records a draw action and returns its command handle.
    ///
    /// Keep the handle to [`disable`](DrawCommand::disable) or
    /// [`remove`](Self::remove) the command later; drop it when the command
    /// should simply live until [`clear`](Self::clear).
    pub fn add(
        &self,
        action: impl Fn(&mut dyn Painter) + Send + Sync + 'static,
    ) -> Arc<DrawCommand> {
        let command = Arc::new(DrawCommand::new(action));
        self.backlog.push(Arc::clone(&command));
        command
    }

    /// Records a labeled draw action and returns its command handle.
    pub fn add_named(
        &self,
        name: impl Into<String>,
        action: impl Fn(&mut dyn Painter) + Send + Sync + 'static,
    ) -> Arc<DrawCommand> {
        let command = Arc::new(DrawCommand::named(name, action));
        self.backlog.push(Arc::clone(&command));
        command
    }

    /// Appends an existing command, e.g. one built disabled.
    pub fn add_command(&self, command: Arc<DrawCommand>) {
        self.backlog.push(command);
    }

    /// Removes a command by identity. Returns `false` (after a debug-level
    /// log) when the command is not queued; either way the canvas is left
    /// dirty.
    pub fn remove(&self, command: &DrawCommand) -> bool {
        self.backlog.remove(command)
    }

    /// True iff the command is currently queued.
    #[must_use]
    pub fn contains(&self, command: &DrawCommand) -> bool {
        self.backlog.contains(command)
    }

    /// Discards every queued command and marks the canvas dirty.
    pub fn clear(&self) {
        self.backlog.clear();
    }

    /// Forces the next display into a full fresh pass.
    pub fn invalidate(&self) {
        self.backlog.mark_dirty();
    }

    /// A clone-able handle to this canvas's backlog for event-thread
    /// mutation.
    #[must_use]
    pub fn backlog(&self) -> Backlog {
        self.backlog.clone()
    }

    // -- Geometry API --

    /// Current logical size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.surface.logical_size()
    }

    /// Resizes the surface and marks the canvas dirty: the cache texture is
    /// now the wrong size and is rebuilt on the next display.
    pub fn resize(&mut self, size: Size) {
        tracing::trace!(width = size.width, height = size.height, "canvas resized");
        self.surface.resize(size);
        self.backlog.mark_dirty();
    }

    /// Ratio of physical pixels to logical units.
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        self.surface.scale_factor()
    }

    /// Size of the pixel grid draw actions target: the cache texture's
    /// physical size when one exists, otherwise the logical size converted
    /// at the current scale factor.
    #[must_use]
    pub fn drawing_size(&self) -> PhysicalSize {
        self.surface
            .texture_size()
            .unwrap_or_else(|| self.to_pixels(self.surface.logical_size()))
    }

    /// Converts a logical size to physical pixels at the surface's scale
    /// factor.
    #[must_use]
    pub fn to_pixels(&self, logical: Size) -> PhysicalSize {
        PhysicalSize::from_logical(logical, self.surface.scale_factor())
    }

    // -- Texture escape hatches --

    /// The cache texture, if one currently exists.
    #[must_use]
    pub fn texture(&self) -> Option<TextureId> {
        self.surface.texture()
    }

    /// Replaces the cache texture and marks the canvas *not* dirty: the
    /// caller asserts the texture already holds valid content, bypassing
    /// the backlog for this frame. Pending commands stay queued and resume
    /// on the new texture.
    pub fn set_texture(&mut self, texture: Option<TextureId>) {
        self.surface.set_texture(texture);
        self.backlog.set_dirty(false);
    }

    /// Releases the cache texture while keeping the canvas usable.
    ///
    /// The backlog and dirty flag are untouched: reusing the canvas after
    /// an unload means asking for a fresh render via
    /// [`invalidate`](Self::invalidate).
    pub fn unload(&mut self, painter: &mut dyn Painter) {
        tracing::trace!("cache texture released");
        self.surface.unload(painter);
    }

    /// Full reset: releases the cache texture and discards the backlog
    /// (leaving the canvas dirty, as [`clear`](Self::clear) does).
    pub fn free(&mut self, painter: &mut dyn Painter) {
        tracing::trace!("canvas freed");
        self.surface.unload(painter);
        self.backlog.clear();
    }

    // -- Accessors --

    /// Per-frame replay budget.
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Number of display calls made on this canvas.
    #[must_use]
    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    // -- Shape helpers --
    //
    // Sugar over `add`. Geometry is captured in physical pixels at call
    // time and does not adapt to later resizes.

    /// Records a circle.
    pub fn draw_circle(&self, center: Point, radius: f64, color: Rgba8, filled: bool) {
        self.add(move |painter| {
            painter.set_color(color);
            if filled {
                painter.fill_circle(center, radius);
            } else {
                painter.draw_circle(center, radius);
            }
        });
    }

    /// Records a rectangle.
    pub fn draw_rect(&self, rect: Rect, color: Rgba8, filled: bool) {
        self.add(move |painter| {
            painter.set_color(color);
            if filled {
                painter.fill_rect(rect);
            } else {
                painter.draw_rect(rect);
            }
        });
    }

    /// Records a line of the given width in pixels.
    ///
    /// Widths up to one pixel use the backend's primitive line directly;
    /// wider lines are stroked as parallel one-pixel lines offset along the
    /// normal. Degenerate (zero-length) lines fall back to the primitive.
    pub fn draw_line(&self, from: Point, to: Point, width: f64, color: Rgba8) {
        let delta = to - from;
        let length = delta.hypot();
        if width <= 1.0 || length == 0.0 {
            self.add(move |painter| {
                painter.set_color(color);
                painter.draw_line(from, to);
            });
            return;
        }

        let normal = Vec2::new(-delta.y, delta.x) * (1.0 / length);
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "line widths are small positive pixel counts"
        )]
        let strokes = width.round().max(1.0) as u32;
        self.add(move |painter| {
            painter.set_color(color);
            for stroke in 0..strokes {
                let offset = f64::from(stroke) - f64::from(strokes - 1) / 2.0;
                let shift = normal * offset;
                painter.draw_line(from + shift, to + shift);
            }
        });
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("backlog", &self.backlog)
            .field("budget", &self.budget)
            .field("passes", &self.passes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingPainter, ScriptedSurface};
    use core::ops::ControlFlow;

    fn canvas() -> Canvas {
        Canvas::new(
            Box::new(ScriptedSurface::new(Size::new(80.0, 60.0), 2.0)),
            CanvasOptions::default(),
        )
    }

    /// Replays every recorded action against `painter`, outside the display
    /// driver.
    fn run_actions(canvas: &Canvas, painter: &mut RecordingPainter) {
        let mut state = canvas.backlog.lock();
        state.queue.rewind();
        state.queue.advance(|command| {
            command.run(painter);
            ControlFlow::Continue(())
        });
    }

    #[test]
    fn new_canvas_is_dirty_with_default_budget() {
        let canvas = canvas();
        assert_eq!(canvas.budget(), DEFAULT_BUDGET);
        assert!(canvas.backlog.is_dirty());
        assert!(canvas.backlog.is_empty());
        assert_eq!(canvas.pass_count(), 0);
        assert_eq!(canvas.size(), Size::new(80.0, 60.0));
    }

    #[test]
    fn options_builders_override_one_field() {
        let options = CanvasOptions::with_budget(Duration::from_millis(8));
        assert_eq!(options.budget, Duration::from_millis(8));

        let options = CanvasOptions::with_clock(Arc::new(crate::clock::ManualClock::new()));
        assert_eq!(options.budget, DEFAULT_BUDGET);
    }

    #[test]
    fn add_variants_queue_commands() {
        let canvas = canvas();
        let plain = canvas.add(|_| {});
        let named = canvas.add_named("grid", |_| {});
        canvas.add_command(Arc::new(DrawCommand::new(|_| {})));

        assert_eq!(canvas.backlog.len(), 3);
        assert!(canvas.contains(&plain));
        assert!(canvas.contains(&named));
        assert_eq!(named.name(), Some("grid"));
    }

    #[test]
    fn remove_forwards_and_reports_misses() {
        let canvas = canvas();
        let command = canvas.add(|_| {});
        assert!(canvas.remove(&command));
        assert!(!canvas.remove(&command));
        assert!(!canvas.contains(&command));
    }

    #[test]
    fn resize_forwards_and_dirties() {
        let mut canvas = canvas();
        canvas.backlog.set_dirty(false);

        canvas.resize(Size::new(100.0, 40.0));
        assert_eq!(canvas.size(), Size::new(100.0, 40.0));
        assert!(canvas.backlog.is_dirty());
    }

    #[test]
    fn drawing_size_prefers_texture_size() {
        let mut surface = ScriptedSurface::new(Size::new(80.0, 60.0), 2.0);
        surface.texture = Some(TextureId(5));
        surface.texture_size = Some(PhysicalSize::new(64, 64));
        let with_texture = Canvas::new(Box::new(surface), CanvasOptions::default());
        assert_eq!(with_texture.drawing_size(), PhysicalSize::new(64, 64));

        // Without a texture: logical size at the surface scale factor.
        let without_texture = canvas();
        assert_eq!(without_texture.drawing_size(), PhysicalSize::new(160, 120));
    }

    #[test]
    fn to_pixels_uses_surface_scale() {
        let canvas = canvas();
        assert_eq!(
            canvas.to_pixels(Size::new(10.0, 4.5)),
            PhysicalSize::new(20, 9),
        );
        assert_eq!(canvas.scale_factor(), 2.0);
    }

    #[test]
    fn set_texture_clears_dirty() {
        let mut canvas = canvas();
        assert!(canvas.backlog.is_dirty());

        canvas.set_texture(Some(TextureId(9)));
        assert_eq!(canvas.texture(), Some(TextureId(9)));
        assert!(!canvas.backlog.is_dirty());

        canvas.set_texture(None);
        assert_eq!(canvas.texture(), None);
        assert!(!canvas.backlog.is_dirty());
    }

    #[test]
    fn unload_releases_texture_and_keeps_backlog() {
        let mut canvas = canvas();
        let command = canvas.add(|_| {});
        let mut painter = RecordingPainter::default();
        canvas.set_texture(Some(TextureId(3)));

        canvas.unload(&mut painter);
        assert_eq!(canvas.texture(), None);
        assert_eq!(painter.destroyed, vec![TextureId(3)]);
        assert!(canvas.contains(&command));
        // Reuse is the caller's call: unload itself does not invalidate.
        assert!(!canvas.backlog.is_dirty());
    }

    #[test]
    fn free_releases_texture_and_discards_backlog() {
        let mut canvas = canvas();
        canvas.add(|_| {});
        let mut painter = RecordingPainter::default();
        canvas.set_texture(Some(TextureId(4)));

        canvas.free(&mut painter);
        assert_eq!(canvas.texture(), None);
        assert!(canvas.backlog.is_empty());
        assert!(canvas.backlog.is_dirty());
    }

    #[test]
    fn draw_circle_records_color_and_fill() {
        let canvas = canvas();
        canvas.draw_circle(Point::new(10.0, 12.0), 5.0, Rgba8::opaque(1, 2, 3), true);
        canvas.draw_circle(Point::new(4.0, 4.0), 2.0, Rgba8::WHITE, false);

        let mut painter = RecordingPainter::default();
        run_actions(&canvas, &mut painter);
        assert_eq!(
            painter.circles,
            vec![
                (Point::new(10.0, 12.0), 5.0, true),
                (Point::new(4.0, 4.0), 2.0, false),
            ],
        );
        assert_eq!(painter.colors, vec![Rgba8::opaque(1, 2, 3), Rgba8::WHITE]);
    }

    #[test]
    fn draw_rect_records_outline_and_fill() {
        let canvas = canvas();
        let rect = Rect::new(1.0, 2.0, 9.0, 8.0);
        canvas.draw_rect(rect, Rgba8::BLACK, false);
        canvas.draw_rect(rect, Rgba8::BLACK, true);

        let mut painter = RecordingPainter::default();
        run_actions(&canvas, &mut painter);
        assert_eq!(painter.rects, vec![(rect, false), (rect, true)]);
    }

    #[test]
    fn thin_line_uses_single_primitive() {
        let canvas = canvas();
        canvas.draw_line(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            1.0,
            Rgba8::WHITE,
        );

        let mut painter = RecordingPainter::default();
        run_actions(&canvas, &mut painter);
        assert_eq!(
            painter.lines,
            vec![(Point::new(0.0, 0.0), Point::new(10.0, 0.0))],
        );
    }

    #[test]
    fn wide_line_strokes_parallel_offsets() {
        let canvas = canvas();
        // Horizontal line of width 3: offsets along the vertical normal.
        canvas.draw_line(
            Point::new(0.0, 5.0),
            Point::new(8.0, 5.0),
            3.0,
            Rgba8::WHITE,
        );

        let mut painter = RecordingPainter::default();
        run_actions(&canvas, &mut painter);
        assert_eq!(painter.lines.len(), 3);
        let mut ys: Vec<f64> = painter.lines.iter().map(|(from, _)| from.y).collect();
        ys.sort_by(f64::total_cmp);
        assert_eq!(ys, vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn zero_length_line_falls_back_to_primitive() {
        let canvas = canvas();
        let point = Point::new(3.0, 3.0);
        canvas.draw_line(point, point, 4.0, Rgba8::WHITE);

        let mut painter = RecordingPainter::default();
        run_actions(&canvas, &mut painter);
        assert_eq!(painter.lines, vec![(point, point)]);
    }
}
