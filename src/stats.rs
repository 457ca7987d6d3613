use crate::models::BookRecord;
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

/// Summary statistics over the books of one chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub books: usize,
    pub total_ratings: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Mean rating weighted by each book's ratings count; `None` if nobody rated anything.
    pub weighted_mean: Option<f64>,
}

/// Compute summary statistics of the average ratings. `None` for no books.
pub fn summarize(records: &[BookRecord]) -> Option<Summary> {
    if records.is_empty() {
        return None;
    }
    let mut vals: Vec<f64> = records.iter().map(|r| r.average_rating()).collect();
    vals.sort_by(|a, b| a.total_cmp(b));
    let count = vals.len();
    let mean = vals.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 1 {
        vals[count / 2]
    } else {
        (vals[count / 2 - 1] + vals[count / 2]) / 2.0
    };

    let total_ratings: u64 = records.iter().map(|r| r.ratings_count()).sum();
    let weighted_mean = (total_ratings > 0).then(|| {
        records
            .iter()
            .map(|r| r.average_rating() * r.ratings_count() as f64)
            .sum::<f64>()
            / total_ratings as f64
    });

    Some(Summary {
        books: count,
        total_ratings,
        min: vals[0],
        max: vals[count - 1],
        mean,
        median,
        weighted_mean,
    })
}

/// Map a user-provided locale tag to a num-format Locale.
/// Supported tags (case-insensitive): "en", "us", "en_US", "de", "de_DE", "german", "fr", "es", "it", "pt", "nl"
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// One-line human rendering, e.g.
/// `books=12 ratings=1,234,567 min=3.41 max=4.37 mean=3.85 median=3.88 weighted=3.92`.
pub fn format_summary(s: &Summary, locale: &Locale) -> String {
    let weighted = match s.weighted_mean {
        Some(w) => format!("{w:.2}"),
        None => "NA".to_string(),
    };
    format!(
        "books={} ratings={} min={:.2} max={:.2} mean={:.2} median={:.2} weighted={}",
        s.books,
        s.total_ratings.to_formatted_string(locale),
        s.min,
        s.max,
        s.mean,
        s.median,
        weighted
    )
}
