//! Public types and constants for the visualization module.

use std::path::PathBuf;

/// Plot types supported by this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    /// One marker per book (default).
    #[default]
    Scatter,
    /// One bar per book, drawn from zero.
    Bar,
    /// Books joined by a line in pipeline order.
    Line,
    /// Line + markers overlay.
    LinePoints,
}

/// Books beyond this count get position numbers on the x axis instead of titles.
pub const MAX_TITLE_LABELS: usize = 40;

/// Pixel cap for a single rotated title label.
pub const MAX_TITLE_LABEL_PX: u32 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub kind: ChartKind,
    /// Caption; derived from the book count when `None`.
    pub title: Option<String>,
    /// TTF/OTF file for labels; system fonts are searched when `None`.
    pub font: Option<PathBuf>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            kind: ChartKind::Scatter,
            title: None,
            font: None,
        }
    }
}
