// src/framebuffer.rs

//! Byte-buffer backed surfaces in the formats of [`PixelFormat`].
//!
//! A `FrameBuffer` is generic over its storage. Owned buffers (`Vec<u8>`,
//! `Box<[u8]>`) are readable and writable; borrowed slices (`&[u8]`) are
//! read-only, which is how glyph bitmaps are wrapped without copying them.

use std::fmt;

use crate::color::Color;
use crate::format::PixelFormat;
use crate::surface::{PixelSource, PixelSurface};

/// Why a buffer could not be wrapped as a framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBufferError {
    /// The buffer holds fewer bytes than the format needs.
    BufferTooSmall { needed: usize, actual: usize },
    /// The stride is narrower than the width.
    InvalidStride { stride: usize, width: usize },
}

impl fmt::Display for FrameBufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameBufferError::BufferTooSmall { needed, actual } => {
                write!(f, "buffer too small: need {} bytes, got {}", needed, actual)
            }
            FrameBufferError::InvalidStride { stride, width } => {
                write!(f, "stride {} is less than width {}", stride, width)
            }
        }
    }
}

impl std::error::Error for FrameBufferError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer<B> {
    buf: B,
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
}

impl FrameBuffer<Vec<u8>> {
    /// Allocates a zeroed framebuffer.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        let stride = format.align_stride(width);
        let buf = vec![0u8; format.buffer_len(stride, height)];
        Self {
            buf,
            width,
            height,
            stride,
            format,
        }
    }
}

impl<B: AsRef<[u8]>> FrameBuffer<B> {
    /// Wraps an existing buffer whose stride equals its width.
    pub fn from_buffer(
        buf: B,
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> Result<Self, FrameBufferError> {
        Self::with_stride(buf, width, height, format, width)
    }

    /// Wraps an existing buffer with an explicit row stride in pixels.
    ///
    /// The stride is rounded up to the format's byte alignment before the
    /// buffer length is checked.
    pub fn with_stride(
        buf: B,
        width: usize,
        height: usize,
        format: PixelFormat,
        stride: usize,
    ) -> Result<Self, FrameBufferError> {
        if stride < width {
            return Err(FrameBufferError::InvalidStride { stride, width });
        }
        let stride = format.align_stride(stride);
        let needed = format.buffer_len(stride, height);
        let actual = buf.as_ref().len();
        if actual < needed {
            return Err(FrameBufferError::BufferTooSmall { needed, actual });
        }
        Ok(Self {
            buf,
            width,
            height,
            stride,
            format,
        })
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Row stride in pixels, after alignment.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    fn read(&self, x: usize, y: usize) -> Color {
        let buf = self.buf.as_ref();
        match self.format {
            PixelFormat::MonoVlsb => {
                let byte = buf[(y >> 3) * self.stride + x];
                ((byte >> (y & 7)) & 1) as Color
            }
            PixelFormat::MonoHlsb => {
                let byte = buf[(x + y * self.stride) >> 3];
                ((byte >> (7 - (x & 7))) & 1) as Color
            }
            PixelFormat::MonoHmsb => {
                let byte = buf[(x + y * self.stride) >> 3];
                ((byte >> (x & 7)) & 1) as Color
            }
            PixelFormat::Rgb565 => {
                let i = (x + y * self.stride) * 2;
                u16::from_le_bytes([buf[i], buf[i + 1]]) as Color
            }
            PixelFormat::Gs2Hmsb => {
                let byte = buf[(x + y * self.stride) >> 2];
                ((byte >> ((x & 3) << 1)) & 0x3) as Color
            }
            PixelFormat::Gs4Hmsb => {
                let byte = buf[(x + y * self.stride) >> 1];
                if x & 1 == 1 {
                    (byte & 0x0f) as Color
                } else {
                    (byte >> 4) as Color
                }
            }
            PixelFormat::Gs8 => buf[x + y * self.stride] as Color,
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> FrameBuffer<B> {
    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: Color) {
        for y in 0..self.height {
            for x in 0..self.width {
                self.write(x, y, color);
            }
        }
    }

    /// Fills a rectangle, clipped to the buffer.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: usize, h: usize, color: Color) {
        let x0 = (x as i64).max(0);
        let y0 = (y as i64).max(0);
        let x1 = (x as i64 + w as i64).min(self.width as i64);
        let y1 = (y as i64 + h as i64).min(self.height as i64);
        for row in y0..y1 {
            for col in x0..x1 {
                self.write(col as usize, row as usize, color);
            }
        }
    }

    fn write(&mut self, x: usize, y: usize, color: Color) {
        let stride = self.stride;
        let buf = self.buf.as_mut();
        match self.format {
            PixelFormat::MonoVlsb => {
                let i = (y >> 3) * stride + x;
                let bit = (y & 7) as u8;
                buf[i] = (buf[i] & !(1 << bit)) | (((color != 0) as u8) << bit);
            }
            PixelFormat::MonoHlsb => {
                let i = (x + y * stride) >> 3;
                let bit = (7 - (x & 7)) as u8;
                buf[i] = (buf[i] & !(1 << bit)) | (((color != 0) as u8) << bit);
            }
            PixelFormat::MonoHmsb => {
                let i = (x + y * stride) >> 3;
                let bit = (x & 7) as u8;
                buf[i] = (buf[i] & !(1 << bit)) | (((color != 0) as u8) << bit);
            }
            PixelFormat::Rgb565 => {
                let i = (x + y * stride) * 2;
                buf[i..i + 2].copy_from_slice(&(color as u16).to_le_bytes());
            }
            PixelFormat::Gs2Hmsb => {
                let i = (x + y * stride) >> 2;
                let shift = ((x & 3) << 1) as u8;
                buf[i] = (buf[i] & !(0x3 << shift)) | (((color & 0x3) as u8) << shift);
            }
            PixelFormat::Gs4Hmsb => {
                let i = (x + y * stride) >> 1;
                let nibble = (color & 0x0f) as u8;
                buf[i] = if x & 1 == 1 {
                    (buf[i] & 0xf0) | nibble
                } else {
                    (buf[i] & 0x0f) | (nibble << 4)
                };
            }
            PixelFormat::Gs8 => buf[x + y * stride] = color as u8,
        }
    }
}

impl<B: AsRef<[u8]>> PixelSource for FrameBuffer<B> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get_pixel(&self, x: usize, y: usize) -> Color {
        debug_assert!(x < self.width && y < self.height, "read ({x}, {y}) out of bounds");
        self.read(x, y)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> PixelSurface for FrameBuffer<B> {
    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        debug_assert!(x < self.width && y < self.height, "write ({x}, {y}) out of bounds");
        self.write(x, y, color);
    }
}
