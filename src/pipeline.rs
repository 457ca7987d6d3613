//! Filter, sort and truncate aggregated records.
//!
//! All steps are pure: they borrow the input and return a new vector, so an
//! interactive session can re-run them with a different cutoff without
//! refetching anything.

use crate::config::RunConfig;
use crate::models::{BookRecord, Mode};
use std::collections::HashSet;

/// Drop records below `min_num_ratings`. Only applies in author mode.
pub fn filter_min_ratings(
    records: &[BookRecord],
    mode: Mode,
    min_num_ratings: Option<u64>,
) -> Vec<BookRecord> {
    match (mode, min_num_ratings) {
        (Mode::Author, Some(min)) => records
            .iter()
            .filter(|r| r.ratings_count() >= min)
            .cloned()
            .collect(),
        _ => records.to_vec(),
    }
}

/// Keep the first record of each title (trimmed, case-insensitive).
pub fn dedup_titles(records: &[BookRecord]) -> Vec<BookRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.title().trim().to_lowercase()))
        .cloned()
        .collect()
}

/// Highest average rating first; equal ratings keep their input order.
pub fn sort_by_rating(records: &[BookRecord]) -> Vec<BookRecord> {
    let mut out = records.to_vec();
    // `sort_by` is stable. Ratings are finite by construction, so total_cmp
    // agrees with the numeric order.
    out.sort_by(|a, b| b.average_rating().total_cmp(&a.average_rating()));
    out
}

/// The first `cutoff` records, or all of them when `cutoff` is unset.
pub fn apply_cutoff(records: &[BookRecord], cutoff: Option<usize>) -> &[BookRecord] {
    match cutoff {
        Some(n) if n < records.len() => &records[..n],
        _ => records,
    }
}

/// filter → dedup → sort → cutoff, as configured.
pub fn run(records: &[BookRecord], cfg: &RunConfig) -> Vec<BookRecord> {
    let mut out = filter_min_ratings(records, cfg.mode, cfg.min_num_ratings);
    if cfg.dedup_titles {
        out = dedup_titles(&out);
    }
    if cfg.sort_by_rating {
        out = sort_by_rating(&out);
    }
    apply_cutoff(&out, cfg.cutoff).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(t: &str, avg: f64, n: u64) -> BookRecord {
        BookRecord::new(t, avg, n).unwrap()
    }

    fn sample() -> Vec<BookRecord> {
        vec![rec("A", 4.5, 1000), rec("B", 4.8, 50), rec("C", 4.2, 200)]
    }

    fn titles(rs: &[BookRecord]) -> Vec<&str> {
        rs.iter().map(|r| r.title()).collect()
    }

    #[test]
    fn worked_example_filter_then_sort_then_cutoff() {
        let filtered = filter_min_ratings(&sample(), Mode::Author, Some(100));
        assert_eq!(filtered, vec![rec("A", 4.5, 1000), rec("C", 4.2, 200)]);

        let sorted = sort_by_rating(&filtered);
        assert_eq!(sorted, vec![rec("A", 4.5, 1000), rec("C", 4.2, 200)]);

        assert_eq!(apply_cutoff(&sorted, Some(1)), &[rec("A", 4.5, 1000)]);

        let cfg = RunConfig {
            mode: Mode::Author,
            cutoff: Some(1),
            min_num_ratings: Some(100),
            sort_by_rating: true,
            dedup_titles: false,
        };
        assert_eq!(run(&sample(), &cfg), vec![rec("A", 4.5, 1000)]);
    }

    #[test]
    fn threshold_is_inclusive_and_author_only() {
        let got = filter_min_ratings(&sample(), Mode::Author, Some(200));
        assert_eq!(titles(&got), ["A", "C"]);

        let got = filter_min_ratings(&sample(), Mode::Series, Some(10_000));
        assert_eq!(got.len(), 3);

        let got = filter_min_ratings(&sample(), Mode::Author, None);
        assert_eq!(got.len(), 3);
    }

    #[test]
    fn filter_is_idempotent() {
        for min in [0, 50, 51, 200, 5000] {
            let once = filter_min_ratings(&sample(), Mode::Author, Some(min));
            let twice = filter_min_ratings(&once, Mode::Author, Some(min));
            assert_eq!(once, twice, "min={min}");
        }
    }

    #[test]
    fn sort_is_stable_and_keeps_every_record() {
        let input = vec![
            rec("first-4.0", 4.0, 1),
            rec("top", 4.9, 1),
            rec("second-4.0", 4.0, 2),
            rec("low", 1.0, 3),
            rec("third-4.0", 4.0, 3),
        ];
        let sorted = sort_by_rating(&input);
        assert_eq!(
            titles(&sorted),
            ["top", "first-4.0", "second-4.0", "third-4.0", "low"]
        );

        let mut a = titles(&input);
        let mut b = titles(&sorted);
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn cutoff_never_exceeds_min_of_len_and_cutoff() {
        let rs = sample();
        for cutoff in [None, Some(0), Some(1), Some(2), Some(3), Some(4), Some(100)] {
            let got = apply_cutoff(&rs, cutoff);
            let bound = cutoff.map_or(rs.len(), |c| c.min(rs.len()));
            assert!(got.len() <= bound, "cutoff={cutoff:?}");
            assert_eq!(got, &rs[..got.len()]);
        }
        assert!(apply_cutoff(&[], Some(5)).is_empty());
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let input = vec![
            rec("Dune", 4.2, 10),
            rec("Emma", 3.9, 5),
            rec(" dune ", 4.9, 1),
        ];
        let got = dedup_titles(&input);
        assert_eq!(got, vec![rec("Dune", 4.2, 10), rec("Emma", 3.9, 5)]);

        let cfg = RunConfig {
            dedup_titles: true,
            sort_by_rating: true,
            ..RunConfig::new(Mode::Series)
        };
        assert_eq!(titles(&run(&input, &cfg)), ["Dune", "Emma"]);
    }
}
