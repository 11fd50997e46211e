// src/config.rs

//! Configuration for the `framebuf-render` tool.
//!
//! Settings are read from a JSON file named by the `FRAMEBUF_RENDER_CONFIG`
//! environment variable. Every field has a default, so a missing file, a
//! missing section, or a missing key all fall back to the values below.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::color::{ColorSpec, NamedColor};
use crate::format::PixelFormat;

/// Environment variable holding the path of the configuration file.
pub const CONFIG_ENV: &str = "FRAMEBUF_RENDER_CONFIG";

/// Process-wide configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub text: TextConfig,
    pub font: FontConfig,
}

/// The framebuffer text is rendered into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 64,
            height: 16,
            format: PixelFormat::MonoVlsb,
        }
    }
}

/// Colors and layout options handed to the text writer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextConfig {
    /// Either a raw pixel value or a named color.
    pub fg: ColorSpec,
    pub bg: ColorSpec,
    pub invert: bool,
    pub row_clip: bool,
    pub col_clip: bool,
    pub wrap: bool,
    /// Tab stop spacing, in multiples of the space width.
    pub tab: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        TextConfig {
            fg: ColorSpec::Named(NamedColor::White),
            bg: ColorSpec::Named(NamedColor::Black),
            invert: false,
            row_clip: false,
            col_clip: false,
            wrap: true,
            tab: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    /// A binary font file. The built-in 6x8 font is used when unset.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Reads and parses a JSON configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Loads the file named by [`CONFIG_ENV`], falling back to defaults when
    /// the variable is unset or the file cannot be used.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            info!("{} not set, using default configuration", CONFIG_ENV);
            return Config::default();
        };
        let path = PathBuf::from(path);
        match Config::load(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{:#}; using default configuration", e);
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn empty_document_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.text.tab, 4);
        assert!(config.text.wrap);
        assert_eq!(config.font.path, None);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "display": { "format": "rgb565", "width": 128 },
                "text": { "fg": "bright_red", "bg": 0, "col_clip": true }
            }"#,
        )
        .unwrap();

        assert_eq!(config.display.width, 128);
        assert_eq!(config.display.height, 16);
        assert_eq!(config.display.format, PixelFormat::Rgb565);
        assert_eq!(config.text.fg, ColorSpec::Named(NamedColor::BrightRed));
        assert_eq!(config.text.bg, ColorSpec::Raw(0));
        assert!(config.text.col_clip);
        assert!(!config.text.row_clip);
    }

    #[test]
    fn load_reads_a_file_and_reports_failures() {
        let dir = std::env::temp_dir()
            .join(format!("framebuf-render-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let good = dir.join("good.json");
        fs::write(&good, r#"{ "font": { "path": "fonts/courier.bin" } }"#).unwrap();
        let config = Config::load(&good).unwrap();
        assert_eq!(config.font.path, Some(PathBuf::from("fonts/courier.bin")));

        let bad = dir.join("bad.json");
        fs::write(&bad, "{ display: ").unwrap();
        let err = Config::load(&bad).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));

        let missing = dir.join("missing.json");
        let err = Config::load(&missing).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
