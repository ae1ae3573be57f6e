use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// YAML chain catalog; `None` selects the built-in catalog.
    pub chains_path: Option<PathBuf>,
    pub snapshot_tag: String,
    pub source_dir: PathBuf,
    /// When set, snapshots are fetched over HTTP instead of from `source_dir`.
    pub source_base_url: Option<String>,
    pub source_token: Option<String>,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub cache_ttl_secs: u64,
    /// `0` means one slot per configured chain.
    pub max_concurrent_sources: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("chains_path", &self.chains_path)
            .field("snapshot_tag", &self.snapshot_tag)
            .field("source_dir", &self.source_dir)
            .field("source_base_url", &self.source_base_url)
            .field(
                "source_token",
                &self.source_token.as_ref().map(|_| "[redacted]"),
            )
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("max_concurrent_sources", &self.max_concurrent_sources)
            .finish()
    }
}
