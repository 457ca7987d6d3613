//! grg_rs
//!
//! A small Rust library for graphing GoodReads ratings. Pairs with the `grg` CLI.
//!
//! ### Features
//! - Fetch every book of an author, or every work of a series, from the GoodReads API
//! - Normalize both into one record shape (title, average rating, ratings count)
//! - Filter by number of ratings, sort by rating, cut off after N books
//! - Quick summary statistics (min, max, mean, median, weighted mean)
//! - Render SVG/PNG scatter, bar and line charts
//!
//! ### Example
//! ```no_run
//! use grg_rs::api::RatingsSource;
//! use grg_rs::{Client, Credentials, Mode, RunConfig, Target};
//!
//! let client = Client::new(Credentials::new("KEY", "SECRET")?)?;
//! let fetched = client.fetch(&Target::parse(
//!     "https://www.goodreads.com/author/show/2565.Ian_Fleming",
//!     Mode::Author,
//! )?)?;
//! let cfg = RunConfig {
//!     min_num_ratings: Some(100),
//!     sort_by_rating: true,
//!     cutoff: Some(20),
//!     ..RunConfig::new(Mode::Author)
//! };
//! let books = grg_rs::pipeline::run(&fetched.records, &cfg);
//! grg_rs::viz::plot_ratings(&books, "fleming.svg", &Default::default())?;
//! println!("{:#?}", grg_rs::stats::summarize(&books));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod session;
pub mod stats;
pub mod target;
pub mod viz;

pub use api::Client;
pub use config::{Credentials, RunConfig};
pub use error::GrapherError;
pub use models::{BookRecord, Mode};
pub use target::Target;
