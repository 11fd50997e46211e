// src/compositor.rs

//! Masked blit of one surface onto another.
//!
//! `render` copies the part of `source` that lands inside `dest` when the
//! source's origin is placed at (`x`, `y`) in destination coordinates. Each
//! copied pixel is replaced by `fg` if the source pixel is non-zero and by
//! `bg` otherwise, so the source behaves as a stencil whatever its format.
//!
//! The offset may be negative or lie beyond the destination. Only the overlap
//! of the two rectangles is visited, in row-major order, and no accessor is
//! ever called outside a surface's bounds.

use crate::color::Color;
use crate::surface::{PixelSource, PixelSurface};

/// The overlap of a placed source with its destination.
///
/// `dest_x`/`dest_y` and `src_x`/`src_y` are the top-left corners of the
/// overlap in each surface's own coordinates; `width` and `height` are never
/// zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    pub dest_x: usize,
    pub dest_y: usize,
    pub src_x: usize,
    pub src_y: usize,
    pub width: usize,
    pub height: usize,
}

/// Computes where a `src_width` x `src_height` source placed at (`x`, `y`)
/// overlaps a `dest_width` x `dest_height` destination.
///
/// Returns `None` when the rectangles do not overlap. The arithmetic is done
/// in `i64`, so offsets at the extremes of `i32` cannot overflow.
pub fn clip(
    dest_width: usize,
    dest_height: usize,
    src_width: usize,
    src_height: usize,
    x: i32,
    y: i32,
) -> Option<Clip> {
    let (x, y) = (x as i64, y as i64);
    let (dest_w, dest_h) = (dest_width as i64, dest_height as i64);
    let (src_w, src_h) = (src_width as i64, src_height as i64);

    if x >= dest_w || y >= dest_h || -x >= src_w || -y >= src_h {
        return None;
    }

    let dest_x_start = x.max(0);
    let dest_y_start = y.max(0);
    let dest_x_end = dest_w.min(x + src_w);
    let dest_y_end = dest_h.min(y + src_h);
    if dest_x_end <= dest_x_start || dest_y_end <= dest_y_start {
        return None;
    }

    Some(Clip {
        dest_x: dest_x_start as usize,
        dest_y: dest_y_start as usize,
        src_x: (-x).max(0) as usize,
        src_y: (-y).max(0) as usize,
        width: (dest_x_end - dest_x_start) as usize,
        height: (dest_y_end - dest_y_start) as usize,
    })
}

/// Stencils `source` onto `dest` at (`x`, `y`), painting `fg` where the
/// source is non-zero and `bg` where it is zero.
///
/// A placement with no overlap is a no-op. Pixels of `dest` outside the
/// overlap are left untouched.
pub fn render<D, S>(dest: &mut D, source: &S, x: i32, y: i32, fg: Color, bg: Color)
where
    D: PixelSurface + ?Sized,
    S: PixelSource + ?Sized,
{
    let Some(clip) = clip(
        dest.width(),
        dest.height(),
        source.width(),
        source.height(),
        x,
        y,
    ) else {
        return;
    };

    for row in 0..clip.height {
        let dest_y = clip.dest_y + row;
        let src_y = clip.src_y + row;
        for col in 0..clip.width {
            let value = source.get_pixel(clip.src_x + col, src_y);
            let color = if value != 0 { fg } else { bg };
            dest.set_pixel(clip.dest_x + col, dest_y, color);
        }
    }
}

/// [`render`] with the background defaulted to 0.
pub fn render_fg<D, S>(dest: &mut D, source: &S, x: i32, y: i32, fg: Color)
where
    D: PixelSurface + ?Sized,
    S: PixelSource + ?Sized,
{
    render(dest, source, x, y, fg, 0);
}

/// [`render`] where the destination and the source are the same surface.
///
/// Rows are walked bottom-up when `y > 0`, and columns right-to-left when
/// `y == 0 && x > 0`, so every source pixel is read before its coordinate is
/// overwritten.
pub fn render_in_place<S>(surface: &mut S, x: i32, y: i32, fg: Color, bg: Color)
where
    S: PixelSurface + ?Sized,
{
    let Some(clip) = clip(
        surface.width(),
        surface.height(),
        surface.width(),
        surface.height(),
        x,
        y,
    ) else {
        return;
    };

    let bottom_up = y > 0;
    let right_to_left = y == 0 && x > 0;

    for i in 0..clip.height {
        let row = if bottom_up { clip.height - 1 - i } else { i };
        for j in 0..clip.width {
            let col = if right_to_left { clip.width - 1 - j } else { j };
            let value = surface.get_pixel(clip.src_x + col, clip.src_y + row);
            let color = if value != 0 { fg } else { bg };
            surface.set_pixel(clip.dest_x + col, clip.dest_y + row, color);
        }
    }
}
