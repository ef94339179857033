//! Style palette loaded from a TOML file at startup.
//!
//! The palette file is a hard dependency: a missing or unparsable file is a
//! startup-fatal error. A default ships at `themes/cyberpunk.toml`.

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default palette location, relative to the working directory.
pub const DEFAULT_STYLE_PATH: &str = "themes/cyberpunk.toml";

/// Raw palette file shape: hex color codes.
#[derive(Debug, Deserialize)]
struct PaletteFile {
    /// Glow-theme line color
    neon: String,
    /// Glow-theme halo color, drawn under the line
    halo: String,
    /// Increasing candles / positive changes
    gain: String,
    /// Decreasing candles / negative changes
    loss: String,
    /// Volume bars
    volume: String,
    /// Regular text
    text: String,
    /// De-emphasized text
    dim: String,
    /// Borders
    border: String,
    /// Title accent
    title: String,
}

/// Resolved palette used by the renderer.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub neon: Color,
    pub halo: Color,
    pub gain: Color,
    pub loss: Color,
    pub volume: Color,
    pub text: Color,
    pub dim: Color,
    pub border: Color,
    pub title: Color,
}

impl Palette {
    /// Load and parse the palette file. Fatal on any failure.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read style file: {}", path.display()))?;

        let file: PaletteFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse style file: {}", path.display()))?;

        Ok(Self {
            neon: parse_hex(&file.neon)?,
            halo: parse_hex(&file.halo)?,
            gain: parse_hex(&file.gain)?,
            loss: parse_hex(&file.loss)?,
            volume: parse_hex(&file.volume)?,
            text: parse_hex(&file.text)?,
            dim: parse_hex(&file.dim)?,
            border: parse_hex(&file.border)?,
            title: parse_hex(&file.title)?,
        })
    }
}

/// Parse a `#rrggbb` hex code into an RGB color.
fn parse_hex(code: &str) -> Result<Color> {
    let hex = code.strip_prefix('#').unwrap_or(code);
    if hex.len() != 6 {
        anyhow::bail!("invalid hex color: {}", code);
    }

    let r = u8::from_str_radix(&hex[0..2], 16)
        .with_context(|| format!("invalid hex color: {}", code))?;
    let g = u8::from_str_radix(&hex[2..4], 16)
        .with_context(|| format!("invalid hex color: {}", code))?;
    let b = u8::from_str_radix(&hex[4..6], 16)
        .with_context(|| format!("invalid hex color: {}", code))?;

    Ok(Color::Rgb(r, g, b))
}
