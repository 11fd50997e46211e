// src/writer.rs

//! Text output onto any [`PixelSurface`] using a bitmap [`Font`].
//!
//! Each [`Glyph`](crate::font::Glyph) reads straight from the font data and is
//! stencilled onto the surface with [`compositor::render`], so a glyph cell is
//! painted with the foreground where the glyph is set and with the background
//! everywhere else.

use bitflags::bitflags;
use log::{debug, trace};

use crate::color::Color;
use crate::compositor;
use crate::font::Font;
use crate::surface::PixelSurface;

/// Default tab stop spacing, in widths of the space glyph.
pub const DEFAULT_TAB: usize = 4;

bitflags! {
    /// How text behaves at the edges of the surface.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClipFlags: u8 {
        /// Drop output below the bottom edge instead of scrolling.
        const ROW_CLIP = 1 << 0;
        /// Drop glyphs past the right edge instead of wrapping.
        const COL_CLIP = 1 << 1;
        /// Wrap at word boundaries.
        const WRAP     = 1 << 2;
    }
}

pub struct Writer<F> {
    font: F,
    row: usize,
    col: usize,
    fg: Color,
    bg: Color,
    clip: ClipFlags,
    tab: usize,
}

impl<F: Font> Writer<F> {
    /// Creates a writer at the top-left corner, drawing 1 on 0.
    pub fn new(font: F) -> Self {
        Self {
            font,
            row: 0,
            col: 0,
            fg: 1,
            bg: 0,
            clip: ClipFlags::empty(),
            tab: DEFAULT_TAB,
        }
    }

    /// Height of a text line in pixels.
    pub fn height(&self) -> usize {
        self.font.height()
    }

    pub fn set_textpos(&mut self, row: usize, col: usize) {
        self.row = row;
        self.col = col;
    }

    /// Current text position as (row, col) in pixels.
    pub fn textpos(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn setcolor(&mut self, fg: Color, bg: Color) {
        self.fg = fg;
        self.bg = bg;
    }

    pub fn set_clip(&mut self, row_clip: bool, col_clip: bool, wrap: bool) {
        self.clip = ClipFlags::empty();
        self.clip.set(ClipFlags::ROW_CLIP, row_clip);
        self.clip.set(ClipFlags::COL_CLIP, col_clip);
        self.clip.set(ClipFlags::WRAP, wrap);
    }

    /// Sets the tab stop spacing in space widths. Zero disables tabs.
    pub fn set_tab(&mut self, spaces: usize) {
        self.tab = spaces;
    }

    /// Width of `text` in pixels if printed on one line.
    pub fn stringlen(&self, text: &str) -> usize {
        text.chars()
            .filter(|&c| c != '\n')
            .map(|c| self.font.glyph(c).width)
            .sum()
    }

    /// Prints `text` at the current position. `invert` swaps the colors.
    pub fn printstring<D>(&mut self, dev: &mut D, text: &str, invert: bool)
    where
        D: PixelSurface + ?Sized,
    {
        trace!("printstring {:?} at ({}, {})", text, self.row, self.col);
        if !self.clip.contains(ClipFlags::WRAP) {
            for ch in text.chars() {
                self.printchar(dev, ch, invert);
            }
            return;
        }

        let space = self.font.glyph(' ').width;
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.newline(dev);
            }
            for (j, word) in line.split(' ').enumerate() {
                if j > 0 {
                    if self.col + space > dev.width() {
                        self.newline(dev);
                    } else {
                        self.printchar(dev, ' ', invert);
                    }
                }
                let width = self.stringlen(word);
                if self.col > 0 && self.col + width > dev.width() {
                    self.newline(dev);
                }
                for ch in word.chars() {
                    self.printchar(dev, ch, invert);
                }
            }
        }
    }

    fn printchar<D>(&mut self, dev: &mut D, ch: char, invert: bool)
    where
        D: PixelSurface + ?Sized,
    {
        match ch {
            '\n' => {
                self.newline(dev);
                return;
            }
            '\t' => {
                let stop = self.tab * self.font.glyph(' ').width;
                if stop > 0 {
                    self.col = (self.col / stop + 1) * stop;
                }
                return;
            }
            _ => {}
        }

        let (width, height) = {
            let glyph = self.font.glyph(ch);
            (glyph.width, glyph.height)
        };
        if self.col + width > dev.width() {
            if self.clip.contains(ClipFlags::COL_CLIP) {
                return;
            }
            self.newline(dev);
        }
        if self.row + height > dev.height() {
            return;
        }

        let (fg, bg) = if invert {
            (self.bg, self.fg)
        } else {
            (self.fg, self.bg)
        };
        let glyph = self.font.glyph(ch);
        compositor::render(dev, &glyph, to_offset(self.col), to_offset(self.row), fg, bg);
        self.col += width;
    }

    fn newline<D>(&mut self, dev: &mut D)
    where
        D: PixelSurface + ?Sized,
    {
        let height = self.font.height();
        self.col = 0;
        self.row += height;
        if self.row + height <= dev.height() || self.clip.contains(ClipFlags::ROW_CLIP) {
            return;
        }
        let overflow = self.row + height - dev.height();
        debug!("scrolling up {} rows", overflow);
        scroll_up(dev, overflow, self.bg);
        self.row = dev.height().saturating_sub(height);
    }
}

fn to_offset(pos: usize) -> i32 {
    i32::try_from(pos).unwrap_or(i32::MAX)
}

/// Moves the contents of `dev` up by `lines` rows and fills the exposed rows
/// with `bg`.
pub fn scroll_up<D>(dev: &mut D, lines: usize, bg: Color)
where
    D: PixelSurface + ?Sized,
{
    let (width, height) = (dev.width(), dev.height());
    let lines = lines.min(height);
    for y in 0..height - lines {
        for x in 0..width {
            let color = dev.get_pixel(x, y + lines);
            dev.set_pixel(x, y, color);
        }
    }
    for y in height - lines..height {
        for x in 0..width {
            dev.set_pixel(x, y, bg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{BuiltinFont, Glyph};
    use crate::format::PixelFormat;
    use crate::framebuffer::FrameBuffer;
    use crate::surface::PixelSource;
    use test_log::test;

    static FULL: [u8; 2] = [0xc0, 0xc0];
    static LEFT: [u8; 2] = [0x80, 0x80];
    static EMPTY: [u8; 2] = [0x00, 0x00];
    static TOP_PAIR: [u8; 1] = [0xc0];

    /// 2x2 horizontally mapped font: `X` is solid, `|` is the left column,
    /// everything else is blank.
    struct BlockFont;

    impl Font for BlockFont {
        fn height(&self) -> usize {
            2
        }

        fn max_width(&self) -> usize {
            2
        }

        fn hmap(&self) -> bool {
            true
        }

        fn reverse(&self) -> bool {
            false
        }

        fn glyph(&self, ch: char) -> Glyph<'_> {
            let data: &[u8] = match ch {
                'X' => &FULL,
                '|' => &LEFT,
                _ => &EMPTY,
            };
            Glyph {
                data,
                width: 2,
                height: 2,
                stride: 2,
                hmap: true,
                reverse: false,
            }
        }
    }

    struct ReversedVmapFont;

    impl Font for ReversedVmapFont {
        fn height(&self) -> usize {
            8
        }

        fn max_width(&self) -> usize {
            1
        }

        fn hmap(&self) -> bool {
            false
        }

        fn reverse(&self) -> bool {
            true
        }

        fn glyph(&self, _ch: char) -> Glyph<'_> {
            Glyph {
                data: &TOP_PAIR,
                width: 1,
                height: 8,
                stride: 1,
                hmap: false,
                reverse: true,
            }
        }
    }

    fn rows(fb: &FrameBuffer<Vec<u8>>) -> Vec<Vec<Color>> {
        (0..fb.height())
            .map(|y| (0..fb.width()).map(|x| fb.get_pixel(x, y)).collect())
            .collect()
    }

    fn writer() -> Writer<BlockFont> {
        Writer::new(BlockFont)
    }

    #[test]
    fn glyphs_advance_left_to_right() {
        let mut dev = FrameBuffer::new(6, 2, PixelFormat::Gs8);
        dev.fill(7);
        let mut wri = writer();
        wri.printstring(&mut dev, "X X", false);
        assert_eq!(rows(&dev), vec![vec![1, 1, 0, 0, 1, 1]; 2]);
        assert_eq!(wri.textpos(), (0, 6));
    }

    #[test]
    fn invert_swaps_colors() {
        let mut dev = FrameBuffer::new(4, 2, PixelFormat::Gs8);
        let mut wri = writer();
        wri.setcolor(9, 3);
        wri.printstring(&mut dev, " |", true);
        assert_eq!(rows(&dev), vec![vec![9, 9, 3, 9]; 2]);
    }

    #[test]
    fn newline_returns_to_first_column() {
        let mut dev = FrameBuffer::new(4, 4, PixelFormat::Gs8);
        let mut wri = writer();
        wri.printstring(&mut dev, "X\n X", false);
        assert_eq!(
            rows(&dev),
            vec![
                vec![1, 1, 0, 0],
                vec![1, 1, 0, 0],
                vec![0, 0, 1, 1],
                vec![0, 0, 1, 1],
            ]
        );
    }

    #[test]
    fn long_lines_wrap_by_character() {
        let mut dev = FrameBuffer::new(4, 4, PixelFormat::Gs8);
        let mut wri = writer();
        wri.printstring(&mut dev, "XXX", false);
        assert_eq!(rows(&dev)[2], vec![1, 1, 0, 0]);
        assert_eq!(wri.textpos(), (2, 2));
    }

    #[test]
    fn col_clip_drops_overflowing_glyphs() {
        let mut dev = FrameBuffer::new(4, 4, PixelFormat::Gs8);
        let mut wri = writer();
        wri.set_clip(false, true, false);
        wri.printstring(&mut dev, "XXX", false);
        assert_eq!(rows(&dev)[2], vec![0, 0, 0, 0]);
        assert_eq!(wri.textpos(), (0, 4));
    }

    #[test]
    fn row_clip_drops_output_below_the_bottom() {
        let mut dev = FrameBuffer::new(4, 2, PixelFormat::Gs8);
        let mut wri = writer();
        wri.set_clip(true, false, false);
        wri.printstring(&mut dev, " \nX", false);
        assert!(dev.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(wri.textpos(), (2, 0));
    }

    #[test]
    fn overflowing_rows_scroll_the_surface() {
        let mut dev = FrameBuffer::new(2, 4, PixelFormat::Gs8);
        let mut wri = writer();
        wri.printstring(&mut dev, "X\n|\nX", false);
        assert_eq!(
            rows(&dev),
            vec![vec![1, 0], vec![1, 0], vec![1, 1], vec![1, 1]]
        );
        assert_eq!(wri.textpos(), (2, 2));
    }

    #[test]
    fn tabs_jump_to_the_next_stop() {
        let mut dev = FrameBuffer::new(8, 2, PixelFormat::Gs8);
        dev.fill(5);
        let mut wri = writer();
        wri.set_tab(2);
        wri.printstring(&mut dev, "X\tX", false);
        assert_eq!(rows(&dev)[0], vec![1, 1, 5, 5, 1, 1, 5, 5]);

        wri.set_tab(0);
        wri.set_textpos(0, 2);
        wri.printstring(&mut dev, "\t", false);
        assert_eq!(wri.textpos(), (0, 2));
    }

    #[test]
    fn word_wrap_moves_whole_words() {
        let mut dev = FrameBuffer::new(8, 4, PixelFormat::Gs8);
        let mut wri = writer();
        wri.set_clip(false, false, true);
        wri.printstring(&mut dev, "XX XX", false);
        assert_eq!(
            rows(&dev),
            vec![
                vec![1, 1, 1, 1, 0, 0, 0, 0],
                vec![1, 1, 1, 1, 0, 0, 0, 0],
                vec![1, 1, 1, 1, 0, 0, 0, 0],
                vec![1, 1, 1, 1, 0, 0, 0, 0],
            ]
        );
        assert_eq!(wri.textpos(), (2, 4));
    }

    #[test]
    fn stringlen_ignores_newlines() {
        let wri = writer();
        assert_eq!(wri.stringlen("XX\nX"), 6);
        assert_eq!(wri.stringlen(""), 0);
    }

    #[test]
    fn reversed_vertical_fonts_read_msb_first() {
        let mut dev = FrameBuffer::new(2, 8, PixelFormat::Gs8);
        let mut wri = Writer::new(ReversedVmapFont);
        wri.printstring(&mut dev, "ab", false);
        let column: Vec<Color> = (0..8).map(|y| dev.get_pixel(1, y)).collect();
        assert_eq!(column, vec![1, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(wri.textpos(), (0, 2));
    }

    #[test]
    fn builtin_font_renders_onto_mono_display() {
        let mut dev = FrameBuffer::new(12, 8, PixelFormat::MonoVlsb);
        let mut wri = Writer::new(BuiltinFont);
        wri.printstring(&mut dev, "1", false);
        // Column 2 of '1' is 0x7f: rows 0..7 set, row 7 clear.
        let column: Vec<Color> = (0..8).map(|y| dev.get_pixel(2, y)).collect();
        assert_eq!(column, vec![1, 1, 1, 1, 1, 1, 1, 0]);
        assert_eq!(dev.as_bytes()[..6], [0x00, 0x42, 0x7f, 0x40, 0x00, 0x00]);
    }

    #[test]
    fn scroll_up_fills_exposed_rows() {
        let mut dev = FrameBuffer::new(2, 3, PixelFormat::Gs8);
        dev.set_pixel(0, 2, 8);
        scroll_up(&mut dev, 2, 4);
        assert_eq!(rows(&dev), vec![vec![8, 0], vec![4, 4], vec![4, 4]]);
        scroll_up(&mut dev, 10, 1);
        assert!(dev.as_bytes().iter().all(|&b| b == 1));
    }
}
