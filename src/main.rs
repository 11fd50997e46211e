// src/main.rs

use std::fs;

use anyhow::Context;
use log::info;

use framebuf_render::{
    config::{Config, CONFIG},
    font::{BinaryFont, BuiltinFont, Font},
    framebuffer::FrameBuffer,
    preview,
    writer::Writer,
};

const DEFAULT_TEXT: &str = "HELLO 123";

fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting framebuf-render...");
    let config: &Config = &CONFIG;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = if args.is_empty() {
        DEFAULT_TEXT.to_string()
    } else {
        args.join(" ")
    };

    let fb = match &config.font.path {
        Some(path) => {
            let data = fs::read(path)
                .with_context(|| format!("Failed to read font file {}", path.display()))?;
            let font = BinaryFont::parse(data)
                .with_context(|| format!("Failed to parse font file {}", path.display()))?;
            info!("Loaded font {} ({}px high)", path.display(), font.height());
            draw(config, font, &text)
        }
        None => {
            info!("No font file configured, using the built-in font");
            draw(config, BuiltinFont, &text)
        }
    };

    print!("{}", preview::to_ascii(&fb));
    Ok(())
}

fn draw<F: Font>(config: &Config, font: F, text: &str) -> FrameBuffer<Vec<u8>> {
    let display = &config.display;
    let mut fb = FrameBuffer::new(display.width, display.height, display.format);
    info!(
        "Framebuffer {}x{} {:?}",
        display.width, display.height, display.format
    );

    let mut writer = Writer::new(font);
    let fg = config.text.fg.resolve(display.format);
    let bg = config.text.bg.resolve(display.format);
    fb.fill(bg);
    writer.setcolor(fg, bg);
    writer.set_clip(config.text.row_clip, config.text.col_clip, config.text.wrap);
    writer.set_tab(config.text.tab);
    writer.printstring(&mut fb, text, config.text.invert);
    info!("Rendered {:?}, cursor at {:?}", text, writer.textpos());
    fb
}
