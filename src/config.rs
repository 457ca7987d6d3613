//! Run configuration: what to fetch with, and how to shape the result.

use crate::error::{GrapherError, Result};
use crate::models::Mode;
use std::fmt;

/// GoodReads developer credentials (https://www.goodreads.com/api/keys).
///
/// Only the key travels with the `author/list` and `series/show` requests.
/// The secret is checked up front so a half-configured environment fails
/// before any network traffic, then dropped.
#[derive(Clone)]
pub struct Credentials {
    key: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(GrapherError::Auth("client key is empty".into()));
        }
        if secret.into().trim().is_empty() {
            return Err(GrapherError::Auth("client secret is empty".into()));
        }
        Ok(Self { key })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Pipeline settings for one run (or one iteration of an interactive loop).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: Mode,
    /// Keep at most this many records after filtering and sorting.
    pub cutoff: Option<usize>,
    /// Author mode only: drop books with fewer ratings than this.
    pub min_num_ratings: Option<u64>,
    /// Order by average rating, highest first (stable).
    pub sort_by_rating: bool,
    /// Drop later books whose title repeats an earlier one.
    pub dedup_titles: bool,
}

impl RunConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            cutoff: None,
            min_num_ratings: None,
            sort_by_rating: false,
            dedup_titles: false,
        }
    }

    /// Same settings with a different cutoff; `Some(0)` means "no cutoff".
    pub fn with_cutoff(&self, cutoff: Option<usize>) -> Self {
        Self {
            cutoff: cutoff.filter(|&n| n > 0),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_both_parts() {
        assert!(Credentials::new("k", "s").is_ok());
        assert!(matches!(
            Credentials::new("  ", "s"),
            Err(GrapherError::Auth(_))
        ));
        assert!(matches!(Credentials::new("k", ""), Err(GrapherError::Auth(_))));
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let c = Credentials::new("my-key", "my-secret").unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("my-key"));
        assert!(!dbg.contains("my-secret"));
        assert_eq!(c.key(), "my-key");
    }

    #[test]
    fn zero_cutoff_means_unlimited() {
        let cfg = RunConfig::new(Mode::Series);
        assert_eq!(cfg.with_cutoff(Some(0)).cutoff, None);
        assert_eq!(cfg.with_cutoff(Some(3)).cutoff, Some(3));
        assert_eq!(cfg.with_cutoff(Some(3)).mode, Mode::Series);
    }
}
