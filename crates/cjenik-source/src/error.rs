use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("snapshot not found: {locator}")]
    NotFound { locator: String },

    #[error("access denied for {locator}")]
    AuthDenied { locator: String },

    #[error("rate limited fetching {locator} (retry after {retry_after_secs}s)")]
    RateLimited {
        locator: String,
        retry_after_secs: u64,
    },

    #[error("transient failure fetching {locator}: {reason}")]
    Transient { locator: String, reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("I/O error reading {locator}: {source}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid locator \"{locator}\": {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("invalid store URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl SourceError {
    /// `NotFound` and `AuthDenied` end the source's branch for this query;
    /// retrying cannot change their outcome.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !crate::retry::is_retriable(self)
    }
}
