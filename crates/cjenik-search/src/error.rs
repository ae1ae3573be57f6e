use thiserror::Error;

/// Caller-facing failures. Everything that goes wrong inside a single source
/// is reported as a [`cjenik_core::Diagnostic`] instead.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid query: {reason}")]
    QueryInvalid { reason: String },

    #[error("CSV export failed: {0}")]
    Export(#[from] csv::Error),
}

impl SearchError {
    pub(crate) fn query_invalid(reason: impl Into<String>) -> Self {
        Self::QueryInvalid {
            reason: reason.into(),
        }
    }
}
