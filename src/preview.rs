// src/preview.rs

//! Text dump of a surface for terminals and test assertions.

use crate::surface::PixelSource;

pub const SET: char = '#';
pub const CLEAR: char = '.';

/// Renders `surface` as one line per row, `#` for non-zero pixels and `.`
/// for zero. Every line, including the last, ends with `\n`.
pub fn to_ascii<S: PixelSource + ?Sized>(surface: &S) -> String {
    let mut out = String::with_capacity((surface.width() + 1) * surface.height());
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            out.push(if surface.get_pixel(x, y) != 0 { SET } else { CLEAR });
        }
        out.push('\n');
    }
    out
}
