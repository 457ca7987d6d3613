//! Font registration for the `ab_glyph` text path.
//!
//! `ab_glyph` does not discover OS fonts, so one TTF/OTF file is read and
//! registered under the "sans-serif" family once per process.

use anyhow::{Context, Result, anyhow};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static REGISTERED: OnceLock<PathBuf> = OnceLock::new();

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Places searched when no font is given explicitly, in order.
pub fn font_candidates() -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(dir) = dirs::font_dir() {
        out.push(dir.join("DejaVuSans.ttf"));
        out.push(dir.join("LiberationSans-Regular.ttf"));
    }
    out.extend(SYSTEM_FONTS.iter().map(PathBuf::from));
    out
}

/// First existing font: `explicit` if given (and only it), otherwise the first candidate on disk.
pub fn discover_font(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(p) => p.is_file().then(|| p.to_path_buf()),
        None => font_candidates().into_iter().find(|p| p.is_file()),
    }
}

/// Register a font for chart text unless one already is. Returns the font in use.
pub fn ensure_fonts_registered(explicit: Option<&Path>) -> Result<&'static Path> {
    if let Some(p) = REGISTERED.get() {
        return Ok(p.as_path());
    }
    let path = discover_font(explicit).ok_or_else(|| match explicit {
        Some(p) => anyhow!("font file {} does not exist", p.display()),
        None => anyhow!("no TTF font found on this system; pass --font or set GRG_FONT"),
    })?;
    let bytes = std::fs::read(&path).with_context(|| format!("read font {}", path.display()))?;
    // Plotters keeps a reference for the rest of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("{} is not a usable font", path.display()))?;
    debug!("registered chart font {}", path.display());
    Ok(REGISTERED.get_or_init(|| path).as_path())
}
