//! Catalog normalization for published retailer price lists.
//!
//! Turns a raw snapshot (bytes in a chain-specific encoding and delimiter)
//! into [`CatalogRow`]s with canonical fields and an effective price, and
//! compiles the wildcard patterns used to search them. Everything here is
//! synchronous and free of I/O.

pub mod error;
pub mod price;
pub mod row;
pub mod schema;
pub mod table;
pub mod wildcard;

pub use error::CatalogError;
pub use price::{parse_price, select_price};
pub use row::{normalize_barcode, normalize_rows, CatalogRow};
pub use schema::{resolve_schema, Resolution, ResolutionNote, ResolvedColumn, ResolvedSchema};
pub use table::{decode_text, load_table, parse_table, RawTable};
pub use wildcard::WildcardPattern;
