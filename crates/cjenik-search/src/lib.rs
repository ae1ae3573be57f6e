//! Search orchestration: validates a query, runs it against every configured
//! chain concurrently and merges the hits into one ranked table.

pub mod aggregator;
pub mod cache;
pub mod error;
pub mod export;
pub mod query;

mod pipeline;

pub use aggregator::{rank_records, Aggregator, SearchSettings};
pub use cache::SnapshotCache;
pub use error::SearchError;
pub use export::{export_row, format_price, write_csv, EXPORT_COLUMNS};
pub use query::{Query, QueryKind, MAX_TERMS};
