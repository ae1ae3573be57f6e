use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::SourceError;
use crate::reader::{validate_locator, SourceReader};

#[derive(Debug, Clone)]
enum Entry {
    Bytes(Vec<u8>),
    Denied,
    Broken(String),
}

/// In-process snapshot store. Used by tests and for replaying captured
/// snapshots without touching disk or network.
///
/// Unknown locators answer with [`SourceError::NotFound`]. Every call to
/// `fetch` is counted, including failing ones.
#[derive(Debug, Default)]
pub struct MemorySourceReader {
    entries: HashMap<String, Entry>,
    delays: HashMap<String, Duration>,
    fetches: AtomicUsize,
}

impl MemorySourceReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `bytes` under `locator`.
    #[must_use]
    pub fn with_snapshot(mut self, locator: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries
            .insert(locator.into(), Entry::Bytes(bytes.into()));
        self
    }

    /// Makes `locator` answer with [`SourceError::AuthDenied`].
    #[must_use]
    pub fn with_denied(mut self, locator: impl Into<String>) -> Self {
        self.entries.insert(locator.into(), Entry::Denied);
        self
    }

    /// Makes `locator` answer with [`SourceError::Transient`], as if retries
    /// had already been exhausted.
    #[must_use]
    pub fn with_failure(mut self, locator: impl Into<String>, reason: impl Into<String>) -> Self {
        self.entries
            .insert(locator.into(), Entry::Broken(reason.into()));
        self
    }

    /// Delays every fetch of `locator` by `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, locator: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(locator.into(), delay);
        self
    }

    /// Number of `fetch` calls made so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl SourceReader for MemorySourceReader {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        validate_locator(locator)?;
        if let Some(delay) = self.delays.get(locator) {
            tokio::time::sleep(*delay).await;
        }
        match self.entries.get(locator) {
            Some(Entry::Bytes(bytes)) => Ok(bytes.clone()),
            Some(Entry::Denied) => Err(SourceError::AuthDenied {
                locator: locator.to_owned(),
            }),
            Some(Entry::Broken(reason)) => Err(SourceError::Transient {
                locator: locator.to_owned(),
                reason: reason.clone(),
            }),
            None => Err(SourceError::NotFound {
                locator: locator.to_owned(),
            }),
        }
    }
}
