// src/surface.rs

//! The pixel-access capability that every drawable buffer exposes.
//!
//! The compositor never looks at how a buffer stores its pixels. It only needs
//! to know the buffer's dimensions and to read or write one pixel at a time.
//! The capability is split into a read half (`PixelSource`) and a write half
//! (`PixelSurface`) so that read-only data, such as a glyph bitmap borrowed
//! from a font, can act as a stencil without being copied.

use crate::color::Color;

/// Read access to a rectangular grid of pixels.
pub trait PixelSource {
    /// Width of the grid in pixels.
    fn width(&self) -> usize;

    /// Height of the grid in pixels.
    fn height(&self) -> usize;

    /// Returns the pixel at (`x`, `y`).
    ///
    /// Only defined for `x < width()` and `y < height()`. Callers are
    /// responsible for staying inside the grid.
    fn get_pixel(&self, x: usize, y: usize) -> Color;
}

/// Read and write access to a rectangular grid of pixels.
pub trait PixelSurface: PixelSource {
    /// Stores `color` at (`x`, `y`). Same domain restriction as
    /// [`PixelSource::get_pixel`].
    fn set_pixel(&mut self, x: usize, y: usize, color: Color);
}

impl<T: PixelSource + ?Sized> PixelSource for &T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn get_pixel(&self, x: usize, y: usize) -> Color {
        (**self).get_pixel(x, y)
    }
}

impl<T: PixelSource + ?Sized> PixelSource for &mut T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn get_pixel(&self, x: usize, y: usize) -> Color {
        (**self).get_pixel(x, y)
    }
}

impl<T: PixelSurface + ?Sized> PixelSurface for &mut T {
    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        (**self).set_pixel(x, y, color)
    }
}
