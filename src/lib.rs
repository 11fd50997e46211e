// src/lib.rs

//! Masked blitting between pixel surfaces, and bitmap text built on top of it.

pub mod binding;
pub mod color;
pub mod compositor;
pub mod config;
pub mod font;
pub mod format;
pub mod framebuffer;
pub mod preview;
pub mod surface;
pub mod writer;

pub use color::Color;
pub use compositor::{render, render_fg, render_in_place};
pub use surface::{PixelSource, PixelSurface};
