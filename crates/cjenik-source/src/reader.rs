use std::future::Future;

use crate::error::SourceError;

/// Fetches the raw bytes of one published snapshot.
///
/// Implementations retry transient failures themselves; an `Err` returned
/// from `fetch` is final for the current query.
pub trait SourceReader: Send + Sync {
    fn fetch(&self, locator: &str) -> impl Future<Output = Result<Vec<u8>, SourceError>> + Send;
}

/// Rejects locators that could escape the snapshot store.
///
/// # Errors
///
/// Returns [`SourceError::InvalidLocator`] for empty locators, absolute
/// paths, `..` segments, and query or fragment characters.
pub fn validate_locator(locator: &str) -> Result<(), SourceError> {
    let invalid = |reason: &str| SourceError::InvalidLocator {
        locator: locator.to_owned(),
        reason: reason.to_owned(),
    };

    if locator.trim().is_empty() {
        return Err(invalid("locator is empty"));
    }
    if locator.starts_with('/') || locator.starts_with('\\') {
        return Err(invalid("locator must be relative"));
    }
    if locator.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(invalid("locator must not contain '..'"));
    }
    if locator.contains(['?', '#']) {
        return Err(invalid("locator must not contain '?' or '#'"));
    }
    Ok(())
}
