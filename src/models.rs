use crate::error::{GrapherError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of GoodReads page the URLs of a run point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Author,
    Series,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Author => f.write_str("author"),
            Mode::Series => f.write_str("series"),
        }
    }
}

/// One book as the pipeline sees it (one row = one point on the chart).
///
/// Built only through [`BookRecord::new`], which enforces
/// `0 <= average_rating <= 5`; the count is unsigned so it cannot go negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecord {
    title: String,
    average_rating: f64,
    ratings_count: u64,
}

impl BookRecord {
    pub fn new(title: impl Into<String>, average_rating: f64, ratings_count: u64) -> Result<Self> {
        let title = title.into();
        if !average_rating.is_finite() || !(0.0..=5.0).contains(&average_rating) {
            return Err(GrapherError::data(format!(
                "average rating {average_rating} of `{title}` is outside 0..=5"
            )));
        }
        Ok(Self {
            title,
            average_rating,
            ratings_count,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    pub fn ratings_count(&self) -> u64 {
        self.ratings_count
    }
}

// ---------------------------------------------------------------------------
// Raw XML payloads.
//
// Scalars are kept as `Option<String>`: GoodReads emits empty elements
// (`<average_rating/>`) for unrated books, and the aggregator wants to report
// exactly which field was missing instead of a generic decode error.
// ---------------------------------------------------------------------------

/// `GET /author/list/{id}.xml`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorListResponse {
    pub author: AuthorList,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorList {
    #[serde(default)]
    pub name: Option<String>,
    pub books: BookPage,
}

/// `<books start="1" end="30" total="81">` plus its `<book>` children.
/// Only `total` matters; pagination is driven by page numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct BookPage {
    #[serde(rename = "@total", default)]
    pub total: u32,
    #[serde(rename = "book", default)]
    pub books: Vec<RawBook>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_without_series: Option<String>,
    #[serde(default)]
    pub average_rating: Option<String>,
    #[serde(default)]
    pub ratings_count: Option<String>,
    #[serde(default)]
    pub authors: Option<RawAuthors>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthors {
    #[serde(rename = "author", default)]
    pub authors: Vec<RawAuthorRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthorRef {
    #[serde(default)]
    pub id: Option<String>,
}

impl RawBook {
    /// Ids of every author credited on the book; unparsable ids are skipped.
    pub fn author_ids(&self) -> Vec<u64> {
        self.authors
            .as_ref()
            .map(|a| {
                a.authors
                    .iter()
                    .filter_map(|r| r.id.as_deref())
                    .filter_map(|id| id.trim().parse().ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// `GET /series/show/{id}.xml`
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesShowResponse {
    pub series: SeriesShow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesShow {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub series_works_count: Option<String>,
    #[serde(default)]
    pub series_works: Option<SeriesWorks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesWorks {
    #[serde(rename = "series_work", default)]
    pub works: Vec<SeriesWork>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesWork {
    #[serde(default)]
    pub work: Option<RawWork>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWork {
    #[serde(default)]
    pub ratings_count: Option<String>,
    #[serde(default)]
    pub ratings_sum: Option<String>,
    #[serde(default)]
    pub best_book: Option<BestBook>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BestBook {
    #[serde(default)]
    pub title: Option<String>,
}

impl SeriesShow {
    /// Works on this page, empty when `<series_works>` is absent.
    pub fn works(&self) -> &[SeriesWork] {
        self.series_works
            .as_ref()
            .map(|w| w.works.as_slice())
            .unwrap_or(&[])
    }

    /// `series_works_count` as a number; `None` when missing or garbled.
    pub fn works_count(&self) -> Option<u32> {
        self.series_works_count
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
    }
}
