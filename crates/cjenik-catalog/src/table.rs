//! Decoding and delimited-text parsing of one published snapshot.

use cjenik_core::SourceSchema;
use encoding_rs::Encoding;

use crate::error::CatalogError;

/// A decoded snapshot: trimmed header cells plus rows padded to header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decodes raw snapshot bytes using a WHATWG encoding label.
///
/// A byte-order mark is honoured and stripped. Malformed sequences are
/// replaced with U+FFFD rather than failing the whole snapshot.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownEncoding`] if `label` names no known encoding.
pub fn decode_text(bytes: &[u8], label: &str) -> Result<String, CatalogError> {
    let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
        CatalogError::UnknownEncoding {
            label: label.to_owned(),
        }
    })?;

    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            encoding = actual.name(),
            "replaced malformed byte sequences while decoding snapshot"
        );
    }
    Ok(text.into_owned())
}

/// Parses delimited text whose first row is the header.
///
/// Parsing is lenient: rows with more cells than the header, or rows the
/// CSV reader rejects, are dropped; short rows are padded with empty cells.
///
/// # Errors
///
/// Returns [`CatalogError::MissingHeader`] if the text has no non-empty header
/// cell, or [`CatalogError::Csv`] if the header row itself cannot be read.
pub fn parse_table(text: &str, delimiter: u8) -> Result<RawTable, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(CatalogError::MissingHeader);
    }

    let width = headers.len();
    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                tracing::trace!(error = %e, "dropping unreadable row");
                dropped += 1;
                continue;
            }
        };
        if record.len() > width {
            dropped += 1;
            continue;
        }
        let mut row: Vec<String> = record.iter().map(str::to_owned).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    if dropped > 0 {
        tracing::debug!(dropped, kept = rows.len(), "dropped malformed rows");
    }

    Ok(RawTable { headers, rows })
}

/// Decodes and parses a snapshot using the chain's declared encoding and delimiter.
///
/// # Errors
///
/// Propagates [`decode_text`] and [`parse_table`] errors, and returns
/// [`CatalogError::InvalidDelimiter`] for a non-ASCII delimiter.
pub fn load_table(bytes: &[u8], schema: &SourceSchema) -> Result<RawTable, CatalogError> {
    let delimiter = schema
        .delimiter_byte()
        .ok_or(CatalogError::InvalidDelimiter {
            delimiter: schema.delimiter,
        })?;
    let text = decode_text(bytes, &schema.text_encoding)?;
    parse_table(&text, delimiter)
}
