use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown text encoding label \"{label}\"")]
    UnknownEncoding { label: String },

    #[error("delimiter {delimiter:?} is not a single ASCII byte")]
    InvalidDelimiter { delimiter: char },

    #[error("snapshot has no header row")]
    MissingHeader,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(
        "no usable regular price column among {header_count} header cells{}",
        rejected_suffix(.rejected)
    )]
    SchemaUnresolved {
        header_count: usize,
        /// Headers dropped by the poison-column guard.
        rejected: Vec<String>,
    },

    #[error("invalid wildcard pattern \"{term}\": {source}")]
    Pattern {
        term: String,
        #[source]
        source: regex::Error,
    },
}

fn rejected_suffix(rejected: &[String]) -> String {
    if rejected.is_empty() {
        String::new()
    } else {
        format!(" (rejected: {})", rejected.join(", "))
    }
}
