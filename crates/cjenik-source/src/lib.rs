//! Snapshot readers: the boundary between the search core and wherever the
//! published price lists are stored.
//!
//! The core only needs [`SourceReader::fetch`]; which store backs it is a
//! deployment decision. Transient failures are retried inside the reader and
//! never seen by the caller unless retries run out.

pub mod error;
pub mod fs;
pub mod http;
pub mod memory;
pub mod reader;

mod retry;

pub use error::SourceError;
pub use fs::FsSourceReader;
pub use http::HttpSourceReader;
pub use memory::MemorySourceReader;
pub use reader::{validate_locator, SourceReader};
