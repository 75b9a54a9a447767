// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for rendering integrations.
//!
//! Sediment splits pixel-producing work into *backend* crates. Each backend
//! provides two pieces:
//!
//! - **Painter** — Implements [`Painter`]: stateful draw color and blend
//!   mode, the primitive shape operations, texture allocation, and a
//!   render-target stack. All coordinates are physical pixels.
//!
//! - **Surface** — Implements [`Surface`]: a sized box that owns the cache
//!   texture the canvas replays onto, knows its logical size and scale
//!   factor, and produces [`Blit`] descriptors for the surrounding
//!   compositor.
//!
//! # Crate boundaries
//!
//! `sediment_core` owns the backlog, the replay protocol, and this contract
//! module. Backend crates depend on `sediment_core` and rasterize (the
//! in-tree `sediment_backend_raster` does it in software). Application code
//! depends on both and calls [`Canvas::display`](crate::canvas::Canvas) from
//! its frame callback.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(window: WindowId, frame: Rect) {
//!     let report = canvas.display(window, frame, &mut painter, &redraw, &mut tracer);
//!
//!     // Compose: hand the cache texture to the surrounding compositor.
//!     compositor.submit(report.blits);
//!     painter.present();
//!
//!     // Continue: windows named by the redraw queue get another frame.
//!     for window in redraw.drain() {
//!         schedule_frame(window);
//!     }
//! }
//! ```

use kurbo::{Point, Rect, Size};

use crate::geom::PhysicalSize;

/// Opaque handle to a backend-managed texture.
///
/// Handles are minted by [`Painter::create_texture`] and mean nothing
/// outside the painter that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// 8-bit RGBA color with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; 255 is fully opaque.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    /// Creates a color from channel values.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque color.
    #[inline]
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// How source pixels combine with what the target already holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Standard alpha compositing; the replay pass runs with this mode so
    /// resumed passes layer correctly over earlier partial work.
    #[default]
    SourceOver,
    /// Source replaces destination outright, alpha included.
    Opaque,
}

/// One composition instruction: where a texture region should land.
///
/// Opaque to the canvas; it returns blits unchanged for the surrounding
/// compositor to apply.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blit {
    /// Texture to sample.
    pub texture: TextureId,
    /// Source region in physical pixels of `texture`.
    pub src: Rect,
    /// Destination region in the coordinate space of the compositor.
    pub dst: Rect,
}

/// Stateful rasterizing backend the draw actions run against.
///
/// The painter carries current color and blend mode; shape operations use
/// both. Render targets form a stack: [`push_target`](Self::push_target)
/// redirects subsequent operations into a texture *without clearing it* —
/// the replay protocol depends on partial work surviving between passes —
/// and [`pop_target`](Self::pop_target) restores the previous target.
pub trait Painter {
    /// Sets the color used by subsequent shape operations.
    fn set_color(&mut self, color: Rgba8);

    /// Sets the blend mode used by subsequent shape operations.
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Draws a one-pixel line between two points.
    fn draw_line(&mut self, from: Point, to: Point);

    /// Outlines a rectangle.
    fn draw_rect(&mut self, rect: Rect);

    /// Fills a rectangle.
    fn fill_rect(&mut self, rect: Rect);

    /// Outlines a circle.
    fn draw_circle(&mut self, center: Point, radius: f64);

    /// Fills a circle.
    fn fill_circle(&mut self, center: Point, radius: f64);

    /// Allocates a texture of the given size, cleared to transparent.
    fn create_texture(&mut self, size: PhysicalSize) -> TextureId;

    /// Releases a texture. The handle is dead afterwards.
    fn destroy_texture(&mut self, texture: TextureId);

    /// Redirects subsequent operations into `texture`, preserving its
    /// current contents.
    fn push_target(&mut self, texture: TextureId);

    /// Restores the render target that was active before the matching
    /// [`push_target`](Self::push_target).
    fn pop_target(&mut self);

    /// Flushes the frame to wherever this backend shows pixels. The canvas
    /// never calls this; the surrounding frame loop does.
    fn present(&mut self) {}
}

/// A sized box owning the cache texture the canvas replays onto.
///
/// The surface is the keeper of geometry (logical size, scale factor) and
/// of the texture cache. The canvas drives it through [`blit`](Self::blit)
/// each frame and through [`unload`](Self::unload) on invalidation.
pub trait Surface {
    /// Current logical size, in layout units.
    fn logical_size(&self) -> Size;

    /// Records a new logical size. A cached texture of the wrong size is
    /// replaced on the next [`blit`](Self::blit), not here: resizing needs
    /// no painter.
    fn resize(&mut self, size: Size);

    /// Ratio of physical pixels to logical units.
    fn scale_factor(&self) -> f64;

    /// The cache texture, if one currently exists.
    fn texture(&self) -> Option<TextureId>;

    /// Physical size of the cache texture, if one currently exists.
    fn texture_size(&self) -> Option<PhysicalSize>;

    /// Replaces the cache texture wholesale. `None` drops the cache. The
    /// caller asserts the texture is valid and correctly sized; no contents
    /// are checked.
    fn set_texture(&mut self, texture: Option<TextureId>);

    /// Destroys the cache texture, if any. The next
    /// [`blit`](Self::blit) recreates it from the background.
    fn unload(&mut self, painter: &mut dyn Painter);

    /// Per-frame surface draw step.
    ///
    /// Always ensures the cache texture exists and matches the current
    /// size (creating it and painting the base/background content when it
    /// does not), then returns the blits that place the texture into
    /// `frame` for the surrounding compositor. Must not touch the contents
    /// of an up-to-date texture: replay passes accumulate onto it.
    fn blit(&mut self, painter: &mut dyn Painter, frame: Rect) -> Vec<Blit>;
}
