//! Utility functions for visualization: axis ranges, tick positions, labels, captions.

use crate::models::BookRecord;
use plotters::prelude::*;

use super::text::{estimate_text_width_px, truncate_to_width};
use super::types::{MAX_TITLE_LABELS, MAX_TITLE_LABEL_PX};

/// Marker, bar and line colour (#4472C4).
pub const BOOK_COLOR: RGBColor = RGBColor(68, 114, 196);

/// Upper bound on position ticks once titles no longer fit.
const MAX_POSITION_TICKS: usize = 20;

/// Y range for a ratings chart: the data range padded by a quarter star,
/// at least half a star tall, and never outside `0..=5`.
pub fn rating_axis_range(records: &[BookRecord]) -> (f64, f64) {
    let (min, max) = records
        .iter()
        .map(|r| r.average_rating())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 5.0);
    }
    let mut lo = (min - 0.25).max(0.0);
    let mut hi = (max + 0.25).min(5.0);
    if hi - lo < 0.5 {
        let mid = (lo + hi) / 2.0;
        lo = (mid - 0.25).max(0.0);
        hi = (lo + 0.5).min(5.0);
        lo = hi - 0.5;
    }
    (lo, hi)
}

/// X tick labels, one per book: truncated titles for small charts,
/// 1-based positions once there are more than [`MAX_TITLE_LABELS`] books.
pub fn x_tick_labels(records: &[BookRecord], font_px: u32) -> Vec<String> {
    if records.len() > MAX_TITLE_LABELS {
        return (1..=records.len()).map(|i| i.to_string()).collect();
    }
    records
        .iter()
        .map(|r| truncate_to_width(r.title().trim(), font_px, MAX_TITLE_LABEL_PX))
        .collect()
}

/// Tick positions at slot centers: every book when titles are shown,
/// otherwise about [`MAX_POSITION_TICKS`] evenly spaced positions.
pub fn x_key_points(n: usize, titles: bool) -> Vec<f64> {
    let step = if titles {
        1
    } else {
        n.div_ceil(MAX_POSITION_TICKS).max(1)
    };
    (0..n).step_by(step).map(|i| i as f64 + 0.5).collect()
}

/// Book index of the slot containing `x`, if any.
pub fn slot_index(x: f64, n: usize) -> Option<usize> {
    if !x.is_finite() || x < 0.0 {
        return None;
    }
    let i = x.floor() as usize;
    (i < n).then_some(i)
}

/// Height of the bottom label area so rotated titles are not clipped.
pub fn bottom_label_area_px(labels: &[String], font_px: u32, rotated: bool) -> u32 {
    if !rotated {
        return 40;
    }
    let longest = labels
        .iter()
        .map(|l| estimate_text_width_px(l, font_px))
        .max()
        .unwrap_or(0);
    longest.saturating_add(16).clamp(40, MAX_TITLE_LABEL_PX + 20)
}

/// Caption from the names of what was fetched: one name, up to three joined,
/// or "first + N more".
pub fn derive_caption(labels: &[String]) -> String {
    match labels {
        [] => "GoodReads ratings".to_string(),
        [one] => format!("{one}: average rating per book"),
        few if few.len() <= 3 => format!("{}: average rating per book", few.join(", ")),
        [first, rest @ ..] => format!("{first} + {} more: average rating per book", rest.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(t: &str, avg: f64) -> BookRecord {
        BookRecord::new(t, avg, 1).unwrap()
    }

    #[test]
    fn axis_range_pads_and_clamps() {
        let (lo, hi) = rating_axis_range(&[rec("a", 3.5), rec("b", 4.1)]);
        assert!((lo - 3.25).abs() < 1e-9);
        assert!((hi - 4.35).abs() < 1e-9);

        let (lo, hi) = rating_axis_range(&[rec("a", 0.1), rec("b", 4.95)]);
        assert_eq!((lo, hi), (0.0, 5.0));
    }

    #[test]
    fn axis_range_is_at_least_half_a_star() {
        let (lo, hi) = rating_axis_range(&[rec("a", 5.0)]);
        assert!((hi - lo - 0.5).abs() < 1e-9);
        assert!(hi <= 5.0 && lo >= 0.0);

        let (lo, hi) = rating_axis_range(&[rec("a", 0.0)]);
        assert!((hi - lo - 0.5).abs() < 1e-9);
        assert!(lo >= 0.0);

        assert_eq!(rating_axis_range(&[]), (0.0, 5.0));
    }

    #[test]
    fn many_books_get_numbered_labels() {
        let many: Vec<BookRecord> = (0..MAX_TITLE_LABELS + 1).map(|i| rec(&format!("b{i}"), 3.0)).collect();
        let labels = x_tick_labels(&many, 11);
        assert_eq!(labels.first().map(String::as_str), Some("1"));
        assert_eq!(labels.len(), MAX_TITLE_LABELS + 1);

        let few = x_tick_labels(&many[..2], 11);
        assert_eq!(few, ["b0", "b1"]);
    }

    #[test]
    fn every_book_gets_exactly_one_slot() {
        assert_eq!(x_key_points(1, true), [0.5]);
        assert_eq!(x_key_points(3, true), [0.5, 1.5, 2.5]);

        let sparse = x_key_points(120, false);
        assert!(sparse.len() <= 20);
        assert_eq!(sparse[0], 0.5);
        assert!(sparse.iter().all(|&x| slot_index(x, 120).is_some()));

        assert_eq!(slot_index(0.5, 1), Some(0));
        assert_eq!(slot_index(0.99, 1), Some(0));
        assert_eq!(slot_index(1.0, 1), None);
        assert_eq!(slot_index(-0.1, 3), None);
        assert_eq!(slot_index(2.5, 3), Some(2));
    }

    #[test]
    fn captions() {
        assert_eq!(derive_caption(&["Ian Fleming".into()]), "Ian Fleming: average rating per book");
        assert_eq!(
            derive_caption(&["A".into(), "B".into()]),
            "A, B: average rating per book"
        );
        let four: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        assert_eq!(derive_caption(&four), "A + 3 more: average rating per book");
    }
}
