// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Software raster backend for sediment.
//!
//! Everything happens on the CPU in plain pixel buffers:
//!
//! - [`RasterPainter`] implements [`Painter`] over [`Pixmap`] textures:
//!   source-over blending, Bresenham lines, midpoint circles, and a
//!   render-target stack.
//! - [`RasterSurface`] implements [`Surface`]: it owns the cache texture
//!   and fills the background when (re)building it.
//!
//! No GPU, no windowing. The painter's root *frame* pixmap stands in for
//! the window; [`RasterPainter::compose`] applies the blits a display pass
//! returns onto it. That makes this backend suitable for tests, headless
//! rendering, and piping frames somewhere else entirely.

mod painter;
mod surface;

pub use painter::{Pixmap, RasterPainter};
pub use sediment_core::backend::{Painter, Surface};
pub use surface::RasterSurface;
