//! Synchronous client for the **GoodReads XML API**.
//!
//! This module covers the two endpoints the grapher needs, `author/list` and
//! `series/show`, and returns decoded page payloads or normalized
//! [`BookRecord`]s. Pagination is handled automatically.
//!
//! ### Notes
//! - Every request carries the developer key as the `key` query parameter.
//! - HTTP 401/403 surface as [`GrapherError::Auth`]; GoodReads answers an
//!   unknown key with 401.
//! - There is no retry: a failed page fails the whole target.
//!
//! Typical usage:
//! ```no_run
//! # use grg_rs::{Client, Credentials, Target};
//! use grg_rs::api::RatingsSource;
//! let client = Client::new(Credentials::new("KEY", "SECRET")?)?;
//! let fetched = client.fetch(&Target::Author(2565))?;
//! println!("{}: {} books", fetched.label, fetched.records.len());
//! # Ok::<(), grg_rs::GrapherError>(())
//! ```
use crate::aggregate;
use crate::config::Credentials;
use crate::error::{GrapherError, Result};
use crate::models::{AuthorList, AuthorListResponse, BookRecord, SeriesShow, SeriesShowResponse};
use crate::target::Target;
use log::{debug, info};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Books per `author/list` page.
pub const AUTHOR_BOOKS_PER_PAGE: u32 = 30;
/// Works per `series/show` page.
pub const SERIES_WORKS_PER_PAGE: u32 = 100;
/// Safety cap to avoid pathological jobs.
const MAX_PAGES: u32 = 1000;

/// Records for one target plus a human label (author name or series title).
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub target: Target,
    pub label: String,
    pub records: Vec<BookRecord>,
}

/// Anything that can turn a [`Target`] into normalized records.
///
/// [`Client`] is the real implementation; the session only depends on this
/// trait.
pub trait RatingsSource {
    fn fetch(&self, target: &Target) -> Result<Fetched>;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
    credentials: Credentials,
}

/// Number of pages needed for `total` items at `per_page`; never less than one.
pub fn page_count(total: u32, per_page: u32) -> u32 {
    total.div_ceil(per_page.max(1)).max(1)
}

impl Client {
    pub fn new(credentials: Credentials) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("grg/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: "https://www.goodreads.com".into(),
            http,
            credentials,
        })
    }

    /// Point the client at another host (a local fixture server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn get_xml<T: DeserializeOwned>(&self, path: &str, page: u32) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {url} page={page}");
        let page_param = page.to_string();
        let resp = self
            .http
            .get(&url)
            .query(&[("key", self.credentials.key()), ("page", page_param.as_str())])
            .send()?;

        match resp.status() {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(GrapherError::Auth(format!(
                    "goodreads rejected the client key (HTTP {})",
                    resp.status().as_u16()
                )));
            }
            s => {
                return Err(GrapherError::Status {
                    status: s.as_u16(),
                    url,
                });
            }
        }

        let body = resp.text()?;
        quick_xml::de::from_str(&body)
            .map_err(|e| GrapherError::data(format!("decode {path} page {page}: {e}")))
    }

    /// One page of an author's books, most popular first.
    pub fn author_books_page(&self, author_id: u64, page: u32) -> Result<AuthorList> {
        let resp: AuthorListResponse =
            self.get_xml(&format!("author/list/{author_id}.xml"), page)?;
        Ok(resp.author)
    }

    /// Every page of an author's books.
    pub fn author_books(&self, author_id: u64) -> Result<Vec<AuthorList>> {
        let first = self.author_books_page(author_id, 1)?;
        let total_pages = page_count(first.books.total, AUTHOR_BOOKS_PER_PAGE);
        collect_pages(first, total_pages, |p| self.author_books_page(author_id, p), |l| {
            l.books.books.is_empty()
        })
    }

    /// One page of a series' works, in series order.
    pub fn series_works_page(&self, series_id: u64, page: u32) -> Result<SeriesShow> {
        let resp: SeriesShowResponse =
            self.get_xml(&format!("series/show/{series_id}.xml"), page)?;
        Ok(resp.series)
    }

    /// Every page of a series' works.
    pub fn series_works(&self, series_id: u64) -> Result<Vec<SeriesShow>> {
        let first = self.series_works_page(series_id, 1)?;
        let total = first
            .works_count()
            .unwrap_or(first.works().len() as u32);
        let total_pages = page_count(total, SERIES_WORKS_PER_PAGE);
        collect_pages(first, total_pages, |p| self.series_works_page(series_id, p), |s| {
            s.works().is_empty()
        })
    }
}

// Paginate until we retrieved all pages, or a page comes back empty.
fn collect_pages<P>(
    first: P,
    total_pages: u32,
    fetch_page: impl Fn(u32) -> Result<P>,
    is_empty: impl Fn(&P) -> bool,
) -> Result<Vec<P>> {
    if total_pages > MAX_PAGES {
        return Err(GrapherError::data(format!(
            "page limit exceeded ({total_pages} > {MAX_PAGES})"
        )));
    }
    let mut out = vec![first];
    for page in 2..=total_pages {
        let p = fetch_page(page)?;
        if is_empty(&p) {
            debug!("page {page} of {total_pages} is empty, stopping");
            break;
        }
        out.push(p);
    }
    Ok(out)
}

impl RatingsSource for Client {
    fn fetch(&self, target: &Target) -> Result<Fetched> {
        let (label, records) = match *target {
            Target::Author(id) => {
                let pages = self.author_books(id)?;
                let label = first_label(pages.first().and_then(|p| p.name.as_deref()), target);
                (label, aggregate::author_records(id, &pages)?)
            }
            Target::Series(id) => {
                let pages = self.series_works(id)?;
                let label = first_label(pages.first().and_then(|p| p.title.as_deref()), target);
                (label, aggregate::series_records(&pages)?)
            }
        };
        info!("{target} ({label}): {} books", records.len());
        Ok(Fetched {
            target: *target,
            label,
            records,
        })
    }
}

fn first_label(raw: Option<&str>, target: &Target) -> String {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(|| target.to_string())
}
