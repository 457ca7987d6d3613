//! Error type shared by the API client, target parsing and the aggregator.
//!
//! The binary and the chart renderer work with `anyhow::Error`; the session
//! downcasts to [`GrapherError`] to decide whether an interactive run can
//! keep prompting (see [`GrapherError::is_fatal`]).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrapherError {
    /// Missing/blank credentials, or GoodReads rejected the client key.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The response decoded, but lacks fields the pipeline needs (or did not decode at all).
    #[error("malformed goodreads response: {0}")]
    Data(String),

    /// A URL that is neither an author nor a series link, or one of the wrong mode.
    #[error("unusable goodreads url `{url}`: {reason}")]
    Url { url: String, reason: String },

    #[error("goodreads request failed with HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
}

impl GrapherError {
    pub(crate) fn data(msg: impl Into<String>) -> Self {
        GrapherError::Data(msg.into())
    }

    pub(crate) fn url(url: &str, reason: impl Into<String>) -> Self {
        GrapherError::Url {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// Auth failures end the process even in interactive mode; nothing else does.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GrapherError::Auth(_))
    }
}

impl From<quick_xml::DeError> for GrapherError {
    fn from(e: quick_xml::DeError) -> Self {
        GrapherError::Data(format!("decode xml: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, GrapherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_auth_is_fatal() {
        assert!(GrapherError::Auth("bad key".into()).is_fatal());
        assert!(!GrapherError::data("missing average_rating").is_fatal());
        assert!(!GrapherError::url("https://example.com", "not goodreads").is_fatal());
        assert!(
            !GrapherError::Status {
                status: 500,
                url: "x".into()
            }
            .is_fatal()
        );
    }

    #[test]
    fn url_error_names_the_url() {
        let e = GrapherError::url("https://www.goodreads.com/book/show/1", "not an author link");
        let msg = e.to_string();
        assert!(msg.contains("book/show/1"));
        assert!(msg.contains("not an author link"));
    }
}
