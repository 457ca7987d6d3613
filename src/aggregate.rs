//! Normalize author and series payloads into [`BookRecord`]s.
//!
//! Author pages already carry an average rating per book. Series pages only
//! carry `ratings_sum` and `ratings_count` per work, so the average is derived.

use crate::error::{GrapherError, Result};
use crate::models::{AuthorList, BookRecord, RawBook, SeriesShow, SeriesWork};
use log::debug;

/// Records for every book on the given author pages, in page order.
///
/// Books that list `author_id` nowhere in their `<authors>` are dropped; those
/// are anthologies or translations filed under the author but credited to
/// someone else.
pub fn author_records(author_id: u64, pages: &[AuthorList]) -> Result<Vec<BookRecord>> {
    let mut out = Vec::new();
    let mut skipped = 0usize;
    for page in pages {
        for book in &page.books.books {
            if !book.author_ids().contains(&author_id) {
                skipped += 1;
                continue;
            }
            out.push(author_book_record(book)?);
        }
    }
    if skipped > 0 {
        debug!("author {author_id}: skipped {skipped} books credited to other authors");
    }
    Ok(out)
}

fn author_book_record(book: &RawBook) -> Result<BookRecord> {
    let title = non_empty(book.title_without_series.as_deref())
        .or_else(|| non_empty(book.title.as_deref()))
        .ok_or_else(|| GrapherError::data("book without a title"))?;
    let average_rating: f64 = parse_field(book.average_rating.as_deref(), "average_rating", title)?;
    let ratings_count: u64 = parse_field(book.ratings_count.as_deref(), "ratings_count", title)?;
    BookRecord::new(title, average_rating, ratings_count)
}

/// Records for every work on the given series pages, in series order.
pub fn series_records(pages: &[SeriesShow]) -> Result<Vec<BookRecord>> {
    pages
        .iter()
        .flat_map(|p| p.works())
        .map(series_work_record)
        .collect()
}

fn series_work_record(sw: &SeriesWork) -> Result<BookRecord> {
    let work = sw
        .work
        .as_ref()
        .ok_or_else(|| GrapherError::data("series_work without a <work>"))?;
    let title = work
        .best_book
        .as_ref()
        .and_then(|b| non_empty(b.title.as_deref()))
        .ok_or_else(|| GrapherError::data("series work without a best_book title"))?;
    let ratings_count: u64 = parse_field(work.ratings_count.as_deref(), "ratings_count", title)?;
    let ratings_sum: u64 = parse_field(work.ratings_sum.as_deref(), "ratings_sum", title)?;
    let average_rating = if ratings_count == 0 {
        0.0
    } else {
        ratings_sum as f64 / ratings_count as f64
    };
    BookRecord::new(title, average_rating, ratings_count)
}

/// Concatenate per-URL record lists in input order. No dedup happens here.
pub fn merge(batches: impl IntoIterator<Item = Vec<BookRecord>>) -> Vec<BookRecord> {
    batches.into_iter().flatten().collect()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_field<T: std::str::FromStr>(raw: Option<&str>, field: &str, title: &str) -> Result<T> {
    let raw = non_empty(raw)
        .ok_or_else(|| GrapherError::data(format!("`{title}` is missing {field}")))?;
    // Counts occasionally come formatted ("1,234").
    let cleaned = raw.replace(',', "");
    cleaned
        .parse()
        .map_err(|_| GrapherError::data(format!("`{title}` has non-numeric {field} `{raw}`")))
}
