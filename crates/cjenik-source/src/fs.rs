use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::SourceError;
use crate::reader::{validate_locator, SourceReader};

/// Reads snapshots from a local directory, e.g. a synced copy of the store.
#[derive(Debug, Clone)]
pub struct FsSourceReader {
    root: PathBuf,
}

impl FsSourceReader {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceReader for FsSourceReader {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, SourceError> {
        validate_locator(locator)?;
        let path = self.root.join(locator);
        tracing::debug!(path = %path.display(), "reading snapshot");
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound {
                locator: locator.to_owned(),
            },
            ErrorKind::PermissionDenied => SourceError::AuthDenied {
                locator: locator.to_owned(),
            },
            _ => SourceError::Io {
                locator: locator.to_owned(),
                source: e,
            },
        })
    }
}
