// src/font.rs

//! Bitmap fonts in the font_to_py layout.
//!
//! A glyph is a packed 1-bit bitmap. Horizontally mapped fonts store one run
//! of `ceil(stride / 8)` bytes per row; vertically mapped fonts store one run
//! of `ceil(height / 8)` bytes per column. "Reverse" flips the bit order
//! inside each byte. A [`Glyph`] reads its pixels straight from the font data,
//! so it can be handed to the compositor as a stencil without unpacking.

use std::fmt;

use crate::color::Color;
use crate::surface::PixelSource;

/// First and last character stored in a binary font.
const BINARY_FIRST_CHAR: u8 = b' ';
const BINARY_LAST_CHAR: u8 = b'~';
const BINARY_MAGIC: u8 = 0xe7;
const BINARY_SIG_BASE: u8 = 0x3f;
const FALLBACK_CHAR: char = '?';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontError {
    /// The data is shorter than the 4-byte header.
    TooShort { len: usize },
    /// The header does not carry a known signature.
    BadMagic { bytes: [u8; 2] },
    /// The data ends inside the record for `ch`.
    Truncated { ch: char },
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::TooShort { len } => write!(f, "font data too short ({} bytes)", len),
            FontError::BadMagic { bytes } => {
                write!(f, "bad font signature {:#04x} {:#04x}", bytes[0], bytes[1])
            }
            FontError::Truncated { ch } => write!(f, "font data truncated at {:?}", ch),
        }
    }
}

impl std::error::Error for FontError {}

/// A borrowed glyph bitmap.
///
/// `width` is the advance. `stride` is the width the bitmap was stored at,
/// which for binary fonts is the font's maximum width whatever the advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph<'a> {
    pub data: &'a [u8],
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    pub hmap: bool,
    pub reverse: bool,
}

impl PixelSource for Glyph<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get_pixel(&self, x: usize, y: usize) -> Color {
        let (byte, bit) = if self.hmap {
            (self.data[y * self.stride.div_ceil(8) + x / 8], x % 8)
        } else {
            (self.data[x * self.height.div_ceil(8) + y / 8], y % 8)
        };
        // Normal hmap and reversed vmap put the first pixel in the MSB.
        let shift = if self.hmap != self.reverse { 7 - bit } else { bit };
        ((byte >> shift) & 1) as Color
    }
}

/// Number of bytes one glyph occupies.
pub fn glyph_len(hmap: bool, width: usize, height: usize) -> usize {
    if hmap {
        width.div_ceil(8) * height
    } else {
        height.div_ceil(8) * width
    }
}

pub trait Font {
    /// Height of every glyph in pixels.
    fn height(&self) -> usize;

    /// Width of the widest glyph.
    fn max_width(&self) -> usize;

    /// True for row-major (horizontal) glyph data.
    fn hmap(&self) -> bool;

    /// True when bit order within each byte is reversed.
    fn reverse(&self) -> bool;

    fn monospaced(&self) -> bool {
        false
    }

    /// Returns the glyph for `ch`, or the font's fallback glyph when `ch` is
    /// not covered.
    fn glyph(&self, ch: char) -> Glyph<'_>;
}

/// A font loaded from font_to_py's binary output.
///
/// Layout: `[0x3f + sig, 0xe7, max_width, height]` where `sig` is
/// `hmap + 2 * reverse`, then one record per character from `' '` to `'~'`
/// made of a width byte followed by the glyph bitmap. Every bitmap is stored
/// `max_width` pixels wide; the width byte only gives the advance.
#[derive(Debug, Clone)]
pub struct BinaryFont {
    data: Vec<u8>,
    hmap: bool,
    reverse: bool,
    max_width: usize,
    height: usize,
    /// (offset into `data`, advance) per character.
    index: Vec<(usize, usize)>,
}

impl BinaryFont {
    pub fn parse(data: Vec<u8>) -> Result<Self, FontError> {
        if data.len() < 4 {
            return Err(FontError::TooShort { len: data.len() });
        }
        let sig = data[0].wrapping_sub(BINARY_SIG_BASE);
        if data[1] != BINARY_MAGIC || sig > 3 {
            return Err(FontError::BadMagic {
                bytes: [data[0], data[1]],
            });
        }
        let hmap = sig & 1 != 0;
        let reverse = sig & 2 != 0;
        let max_width = data[2] as usize;
        let height = data[3] as usize;

        let len = glyph_len(hmap, max_width, height);
        let mut index = Vec::with_capacity((BINARY_LAST_CHAR - BINARY_FIRST_CHAR + 1) as usize);
        let mut pos = 4;
        for code in BINARY_FIRST_CHAR..=BINARY_LAST_CHAR {
            let ch = code as char;
            let width = *data.get(pos).ok_or(FontError::Truncated { ch })? as usize;
            let start = pos + 1;
            if start + len > data.len() {
                return Err(FontError::Truncated { ch });
            }
            index.push((start, width.min(max_width)));
            pos = start + len;
        }

        Ok(Self {
            data,
            hmap,
            reverse,
            max_width,
            height,
            index,
        })
    }
}

impl Font for BinaryFont {
    fn height(&self) -> usize {
        self.height
    }

    fn max_width(&self) -> usize {
        self.max_width
    }

    fn hmap(&self) -> bool {
        self.hmap
    }

    fn reverse(&self) -> bool {
        self.reverse
    }

    fn monospaced(&self) -> bool {
        true
    }

    fn glyph(&self, ch: char) -> Glyph<'_> {
        let code = match u8::try_from(ch) {
            Ok(c) if (BINARY_FIRST_CHAR..=BINARY_LAST_CHAR).contains(&c) => c,
            _ => FALLBACK_CHAR as u8,
        };
        let (start, width) = self.index[(code - BINARY_FIRST_CHAR) as usize];
        let len = glyph_len(self.hmap, self.max_width, self.height);
        Glyph {
            data: &self.data[start..start + len],
            width,
            height: self.height,
            stride: self.max_width,
            hmap: self.hmap,
            reverse: self.reverse,
        }
    }
}

/// Width of a built-in glyph, including one blank column of spacing.
const BUILTIN_WIDTH: usize = 6;
const BUILTIN_HEIGHT: usize = 8;

/// A small 5x7 font (in 6x8 cells) that needs no external data.
///
/// Covers space, digits, `A`-`Z` and `.:-!?`. Lowercase letters are drawn as
/// uppercase; anything else falls back to `?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFont;

#[rustfmt::skip]
static BUILTIN_GLYPHS: &[(char, [u8; BUILTIN_WIDTH])] = &[
    (' ', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    ('!', [0x00, 0x00, 0x5f, 0x00, 0x00, 0x00]),
    ('-', [0x08, 0x08, 0x08, 0x08, 0x08, 0x00]),
    ('.', [0x00, 0x60, 0x60, 0x00, 0x00, 0x00]),
    (':', [0x00, 0x36, 0x36, 0x00, 0x00, 0x00]),
    ('?', [0x02, 0x01, 0x51, 0x09, 0x06, 0x00]),
    ('0', [0x3e, 0x51, 0x49, 0x45, 0x3e, 0x00]),
    ('1', [0x00, 0x42, 0x7f, 0x40, 0x00, 0x00]),
    ('2', [0x42, 0x61, 0x51, 0x49, 0x46, 0x00]),
    ('3', [0x21, 0x41, 0x45, 0x4b, 0x31, 0x00]),
    ('4', [0x18, 0x14, 0x12, 0x7f, 0x10, 0x00]),
    ('5', [0x27, 0x45, 0x45, 0x45, 0x39, 0x00]),
    ('6', [0x3c, 0x4a, 0x49, 0x49, 0x30, 0x00]),
    ('7', [0x01, 0x71, 0x09, 0x05, 0x03, 0x00]),
    ('8', [0x36, 0x49, 0x49, 0x49, 0x36, 0x00]),
    ('9', [0x06, 0x49, 0x49, 0x29, 0x1e, 0x00]),
    ('A', [0x7e, 0x11, 0x11, 0x11, 0x7e, 0x00]),
    ('B', [0x7f, 0x49, 0x49, 0x49, 0x36, 0x00]),
    ('C', [0x3e, 0x41, 0x41, 0x41, 0x22, 0x00]),
    ('D', [0x7f, 0x41, 0x41, 0x22, 0x1c, 0x00]),
    ('E', [0x7f, 0x49, 0x49, 0x49, 0x41, 0x00]),
    ('F', [0x7f, 0x09, 0x09, 0x09, 0x01, 0x00]),
    ('G', [0x3e, 0x41, 0x49, 0x49, 0x7a, 0x00]),
    ('H', [0x7f, 0x08, 0x08, 0x08, 0x7f, 0x00]),
    ('I', [0x00, 0x41, 0x7f, 0x41, 0x00, 0x00]),
    ('J', [0x20, 0x40, 0x41, 0x3f, 0x01, 0x00]),
    ('K', [0x7f, 0x08, 0x14, 0x22, 0x41, 0x00]),
    ('L', [0x7f, 0x40, 0x40, 0x40, 0x40, 0x00]),
    ('M', [0x7f, 0x02, 0x0c, 0x02, 0x7f, 0x00]),
    ('N', [0x7f, 0x04, 0x08, 0x10, 0x7f, 0x00]),
    ('O', [0x3e, 0x41, 0x41, 0x41, 0x3e, 0x00]),
    ('P', [0x7f, 0x09, 0x09, 0x09, 0x06, 0x00]),
    ('Q', [0x3e, 0x41, 0x51, 0x21, 0x5e, 0x00]),
    ('R', [0x7f, 0x09, 0x19, 0x29, 0x46, 0x00]),
    ('S', [0x46, 0x49, 0x49, 0x49, 0x31, 0x00]),
    ('T', [0x01, 0x01, 0x7f, 0x01, 0x01, 0x00]),
    ('U', [0x3f, 0x40, 0x40, 0x40, 0x3f, 0x00]),
    ('V', [0x1f, 0x20, 0x40, 0x20, 0x1f, 0x00]),
    ('W', [0x3f, 0x40, 0x38, 0x40, 0x3f, 0x00]),
    ('X', [0x63, 0x14, 0x08, 0x14, 0x63, 0x00]),
    ('Y', [0x07, 0x08, 0x70, 0x08, 0x07, 0x00]),
    ('Z', [0x61, 0x51, 0x49, 0x45, 0x43, 0x00]),
];

impl BuiltinFont {
    fn lookup(ch: char) -> Option<&'static [u8; BUILTIN_WIDTH]> {
        let ch = ch.to_ascii_uppercase();
        BUILTIN_GLYPHS
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, data)| data)
    }
}

impl Font for BuiltinFont {
    fn height(&self) -> usize {
        BUILTIN_HEIGHT
    }

    fn max_width(&self) -> usize {
        BUILTIN_WIDTH
    }

    fn hmap(&self) -> bool {
        false
    }

    fn reverse(&self) -> bool {
        false
    }

    fn monospaced(&self) -> bool {
        true
    }

    fn glyph(&self, ch: char) -> Glyph<'_> {
        let data = Self::lookup(ch)
            .or_else(|| Self::lookup(FALLBACK_CHAR))
            .unwrap_or(&BUILTIN_GLYPHS[0].1);
        Glyph {
            data,
            width: BUILTIN_WIDTH,
            height: BUILTIN_HEIGHT,
            stride: BUILTIN_WIDTH,
            hmap: false,
            reverse: false,
        }
    }
}
