use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::SourceError;
use crate::reader::{validate_locator, SourceReader};
use crate::retry::retry_with_backoff;

/// Reads snapshots from an HTTP file store at `{base_url}/{locator}`.
///
/// Maps 404 to [`SourceError::NotFound`], 401/403 to
/// [`SourceError::AuthDenied`], and 429/5xx to retriable errors. Transient
/// failures are retried with exponential backoff up to `max_retries`
/// additional attempts.
pub struct HttpSourceReader {
    client: Client,
    base_url: Url,
    bearer_token: Option<String>,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    backoff_base_ms: u64,
}

/// Parses the store URL and guarantees a trailing slash so that
/// `Url::join` appends the locator instead of replacing the last segment.
fn parse_base_url(base_url: &str) -> Result<Url, SourceError> {
    let invalid = |reason: String| SourceError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason,
    };
    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl HttpSourceReader {
    /// Creates a reader with configured timeout, `User-Agent`, optional bearer
    /// token and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidBaseUrl`] if `base_url` is not an
    /// http(s) URL, or [`SourceError::Http`] if the `reqwest::Client` cannot
    /// be constructed.
    pub fn new(
        base_url: &str,
        bearer_token: Option<String>,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, SourceError> {
        let base_url = parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url,
            bearer_token,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Builds the URL of one snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidLocator`] if the locator fails
    /// [`validate_locator`] or cannot be joined onto the base URL.
    fn snapshot_url(&self, locator: &str) -> Result<Url, SourceError> {
        validate_locator(locator)?;
        self.base_url
            .join(locator)
            .map_err(|e| SourceError::InvalidLocator {
                locator: locator.to_owned(),
                reason: e.to_string(),
            })
    }

    async fn fetch_once(&self, url: &Url, locator: &str) -> Result<Vec<u8>, SourceError> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SourceError::RateLimited {
                locator: locator.to_owned(),
                retry_after_secs,
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound {
                locator: locator.to_owned(),
            });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SourceError::AuthDenied {
                locator: locator.to_owned(),
            });
        }

        if status.is_server_error() {
            return Err(SourceError::Transient {
                locator: locator.to_owned(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

impl SourceReader for HttpSourceReader {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, SourceError> {
        let url = self.snapshot_url(locator)?;
        tracing::debug!(%url, "fetching snapshot");
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.fetch_once(&url, locator)
        })
        .await
    }
}
