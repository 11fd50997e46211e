// src/format.rs

//! Pixel storage formats understood by [`FrameBuffer`](crate::framebuffer::FrameBuffer).
//!
//! The layouts follow the classic embedded framebuffer conventions:
//!
//! | Format    | bpp | Addressing                                              |
//! |-----------|-----|---------------------------------------------------------|
//! | MonoVlsb  | 1   | byte `(y >> 3) * stride + x`, bit `y & 7`               |
//! | MonoHlsb  | 1   | byte `(x + y * stride) >> 3`, bit `7 - (x & 7)`         |
//! | MonoHmsb  | 1   | byte `(x + y * stride) >> 3`, bit `x & 7`               |
//! | Rgb565    | 16  | little-endian `u16` at pixel `x + y * stride`           |
//! | Gs2Hmsb   | 2   | byte `(x + y * stride) >> 2`, shift `(x & 3) * 2`       |
//! | Gs4Hmsb   | 4   | byte `(x + y * stride) >> 1`, even x in the high nibble |
//! | Gs8       | 8   | byte `x + y * stride`                                   |

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// Monochrome, vertical bytes, least significant bit at the top.
    #[default]
    MonoVlsb,
    /// Monochrome, horizontal bytes, most significant bit on the left.
    MonoHlsb,
    /// Monochrome, horizontal bytes, least significant bit on the left.
    MonoHmsb,
    /// 16-bit color, 5-6-5.
    Rgb565,
    /// 2-bit grayscale, four pixels per byte.
    Gs2Hmsb,
    /// 4-bit grayscale, two pixels per byte.
    Gs4Hmsb,
    /// 8-bit grayscale or palette index.
    Gs8,
}

impl PixelFormat {
    pub fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::MonoVlsb | PixelFormat::MonoHlsb | PixelFormat::MonoHmsb => 1,
            PixelFormat::Gs2Hmsb => 2,
            PixelFormat::Gs4Hmsb => 4,
            PixelFormat::Gs8 => 8,
            PixelFormat::Rgb565 => 16,
        }
    }

    /// Rounds a stride (in pixels) up so every row starts on a byte boundary.
    pub fn align_stride(self, stride: usize) -> usize {
        match self {
            PixelFormat::MonoHlsb | PixelFormat::MonoHmsb => (stride + 7) & !7,
            PixelFormat::Gs2Hmsb => (stride + 3) & !3,
            PixelFormat::Gs4Hmsb => (stride + 1) & !1,
            PixelFormat::MonoVlsb | PixelFormat::Rgb565 | PixelFormat::Gs8 => stride,
        }
    }

    /// Number of bytes needed to hold `height` rows of an aligned `stride`.
    pub fn buffer_len(self, stride: usize, height: usize) -> usize {
        match self {
            PixelFormat::MonoVlsb => height.div_ceil(8) * stride,
            PixelFormat::MonoHlsb | PixelFormat::MonoHmsb => stride * height / 8,
            PixelFormat::Gs2Hmsb => stride * height / 4,
            PixelFormat::Gs4Hmsb => stride * height / 2,
            PixelFormat::Gs8 => stride * height,
            PixelFormat::Rgb565 => stride * height * 2,
        }
    }
}
