// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Physical pixel sizes and DPI-aware conversion.
//!
//! Layout hands the canvas *logical* sizes; the cache texture and every
//! recorded draw coordinate live in *physical* pixels. [`PhysicalSize`] keeps
//! the two unit systems from mixing silently.

use kurbo::{Rect, Size};

/// A size in physical (device) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PhysicalSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PhysicalSize {
    /// The zero size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a size from pixel dimensions.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Converts a logical size to physical pixels at the given scale factor.
    ///
    /// Dimensions round to the nearest pixel; a non-empty logical dimension
    /// never collapses below one pixel, so a visible surface always gets a
    /// texture.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "dimensions are clamped non-negative and pixel counts fit u32"
    )]
    pub fn from_logical(logical: Size, scale_factor: f64) -> Self {
        let scale = |value: f64| {
            if value <= 0.0 {
                0
            } else {
                ((value * scale_factor).round() as u32).max(1)
            }
        };
        Self {
            width: scale(logical.width),
            height: scale(logical.height),
        }
    }

    /// Converts back to a logical size at the given scale factor.
    #[must_use]
    pub fn to_logical(self, scale_factor: f64) -> Size {
        Size::new(
            f64::from(self.width) / scale_factor,
            f64::from(self.height) / scale_factor,
        )
    }

    /// This size as a pixel rectangle anchored at the origin.
    #[must_use]
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Pixel count.
    #[inline]
    #[must_use]
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True iff either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}
