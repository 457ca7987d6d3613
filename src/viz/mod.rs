//! Visualization: render a ratings chart to **SVG** or **PNG**.
//!
//! - One unit-wide slot per book on the x axis, in the order the pipeline produced
//! - Plot kinds: `Scatter`, `Bar`, `Line`, `LinePoints`
//! - Rotated, truncated title labels for small charts; positions for large ones

pub mod fonts;
pub mod text;
pub mod types;
pub mod util;

pub use types::{ChartKind, ChartOptions};

use crate::models::BookRecord;
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::LineSeries;
use plotters::style::{FontFamily, FontTransform};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;

use util::{
    BOOK_COLOR, bottom_label_area_px, rating_axis_range, slot_index, x_key_points, x_tick_labels,
};

const MARGIN: u32 = 16;
const TICK_FONT_PX: u32 = 11;
const BAR_HALF_WIDTH: f64 = 0.35;

/// Render `records` to `out_path` (`.svg` → SVG, anything else → PNG).
///
/// The caption is `opts.title`, or "Average rating of N books" when unset.
pub fn plot_ratings<P: AsRef<Path>>(
    records: &[BookRecord],
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    if records.is_empty() {
        return Err(anyhow!("no books to plot"));
    }
    fonts::ensure_fonts_registered(opts.font.as_deref())?;

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    let caption = match opts.title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => format!("Average rating of {} books", records.len()),
    };
    // Bars start at zero; everything else zooms to the data.
    let y_range = match opts.kind {
        ChartKind::Bar => (0.0, 5.0),
        _ => rating_axis_range(records),
    };

    let is_svg = out_path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        let root = SVGBackend::new(path_string.as_str(), (opts.width, opts.height))
            .into_drawing_area();
        draw_chart(root, records, &caption, opts.kind, y_range)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (opts.width, opts.height))
            .into_drawing_area();
        draw_chart(root, records, &caption, opts.kind, y_range)?;
    }
    Ok(())
}

/// Helper that draws to any Plotters backend.
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    records: &[BookRecord],
    caption: &str,
    kind: ChartKind,
    (y_min, y_max): (f64, f64),
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let n = records.len();
    let labels = x_tick_labels(records, TICK_FONT_PX);
    let rotated = n <= types::MAX_TITLE_LABELS;
    let bottom_px = bottom_label_area_px(&labels, TICK_FONT_PX, rotated);

    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption(caption, (FontFamily::SansSerif, 22))
        .set_label_area_size(LabelAreaPosition::Left, 56)
        .set_label_area_size(LabelAreaPosition::Bottom, bottom_px)
        .build_cartesian_2d(
            (0.0..n as f64).with_key_points(x_key_points(n, rotated)),
            y_min..y_max,
        )
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_label_fmt = |v: &f64| {
        slot_index(*v, n)
            .and_then(|i| labels.get(i).cloned())
            .unwrap_or_default()
    };
    let y_label_fmt = |v: &f64| format!("{:.2}", v);

    let tick_style = TextStyle::from((FontFamily::SansSerif, TICK_FONT_PX as i32));
    let tick_style = if rotated {
        tick_style.transform(FontTransform::Rotate90)
    } else {
        tick_style
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(if rotated { "" } else { "Book (position)" })
        .y_desc("Average rating")
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .x_label_style(tick_style)
        .y_label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let color = BOOK_COLOR.to_rgba();
    // Book i owns the slot [i, i + 1).
    let centers: Vec<(f64, f64)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64 + 0.5, r.average_rating()))
        .collect();

    match kind {
        ChartKind::Scatter => {
            chart
                .draw_series(
                    centers
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
                )
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        ChartKind::Bar => {
            chart
                .draw_series(centers.iter().map(|&(x, y)| {
                    Rectangle::new(
                        [(x - BAR_HALF_WIDTH, y_min), (x + BAR_HALF_WIDTH, y)],
                        color.filled(),
                    )
                }))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        ChartKind::Line | ChartKind::LinePoints => {
            let style = ShapeStyle {
                color,
                filled: false,
                stroke_width: 2,
            };
            chart
                .draw_series(LineSeries::new(centers.clone(), style))
                .map_err(|e| anyhow!("{:?}", e))?;
            if kind == ChartKind::LinePoints {
                chart
                    .draw_series(
                        centers
                            .iter()
                            .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
                    )
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
