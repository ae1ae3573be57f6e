//! Resolution of a chain's configured column names against the header row
//! actually present in a snapshot.
//!
//! Header text drifts between snapshots, so resolution runs on every load
//! and produces a fresh [`ResolvedSchema`]; the configured [`SourceSchema`]
//! is never written to.
//!
//! Each configured target is tried in three tiers, first hit wins at each
//! tier, scanning headers left to right:
//!
//! 1. exact match (case-insensitive, trimmed, BOM stripped);
//! 2. a header that contains the whole target;
//! 3. a header longer than four characters that the target contains.
//!
//! Price columns are then checked against the poison markers, and a missing
//! regular price is discovered by scanning for `maloprod`.

use cjenik_core::{CanonicalField, SourceSchema};

use crate::error::CatalogError;

/// Marker found in every regular-price header across the configured chains.
const PRICE_DISCOVERY_MARKER: &str = "maloprod";

/// Headers of the statutory "lowest price in the last 30 days" column.
const POISON_MARKERS: [&str; 3] = ["najniža", "najniza", "30 dana"];

/// Tier-3 matches need a header longer than this many characters.
const MIN_CONTAINED_HEADER_CHARS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub index: usize,
    pub header: String,
}

/// Canonical field → column in the current header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSchema {
    columns: [Option<ResolvedColumn>; CanonicalField::COUNT],
}

impl ResolvedSchema {
    #[must_use]
    pub fn column(&self, field: CanonicalField) -> Option<&ResolvedColumn> {
        self.columns[field.index()].as_ref()
    }

    #[must_use]
    pub fn index(&self, field: CanonicalField) -> Option<usize> {
        self.column(field).map(|c| c.index)
    }

    fn set(&mut self, field: CanonicalField, index: usize, header: &str) {
        self.columns[field.index()] = Some(ResolvedColumn {
            index,
            header: header.to_owned(),
        });
    }

    fn take(&mut self, field: CanonicalField) -> Option<ResolvedColumn> {
        self.columns[field.index()].take()
    }
}

/// Recoverable observations made while resolving one header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionNote {
    /// A configured target matched no header cell.
    Unresolved {
        field: CanonicalField,
        target: String,
    },
    /// A price field landed on a lowest-price-in-window column and was dropped.
    PoisonColumnRejected {
        field: CanonicalField,
        header: String,
    },
    /// The regular price column was found by the discovery scan.
    Discovered { header: String },
}

impl std::fmt::Display for ResolutionNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionNote::Unresolved { field, target } => {
                write!(f, "column \"{target}\" for {field} not found in header")
            }
            ResolutionNote::PoisonColumnRejected { field, header } => write!(
                f,
                "rejected \"{header}\" for {field}: it holds the lowest price over a reporting window"
            ),
            ResolutionNote::Discovered { header } => {
                write!(f, "regular price discovered as \"{header}\"")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub schema: ResolvedSchema,
    pub notes: Vec<ResolutionNote>,
}

fn clean_header(cell: &str) -> String {
    cell.trim()
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
}

fn is_poison(clean: &str) -> bool {
    POISON_MARKERS.iter().any(|m| clean.contains(m))
}

/// Finds the column for one cleaned target using the three matching tiers.
fn match_target(clean_headers: &[String], target: &str) -> Option<usize> {
    clean_headers
        .iter()
        .position(|h| h == target)
        .or_else(|| clean_headers.iter().position(|h| h.contains(target)))
        .or_else(|| {
            clean_headers.iter().position(|h| {
                h.chars().count() > MIN_CONTAINED_HEADER_CHARS && target.contains(h.as_str())
            })
        })
}

/// Resolves every canonical field of `schema` against `headers`.
///
/// # Errors
///
/// Returns [`CatalogError::SchemaUnresolved`] if no usable regular price
/// column exists, even after discovery. Every other unresolved field is
/// reported as a [`ResolutionNote`] and left absent.
pub fn resolve_schema(
    schema: &SourceSchema,
    headers: &[String],
) -> Result<Resolution, CatalogError> {
    let clean_headers: Vec<String> = headers.iter().map(|h| clean_header(h)).collect();
    let mut resolved = ResolvedSchema::default();
    let mut notes = Vec::new();

    for field in CanonicalField::ALL {
        let Some(target) = schema.field_targets.get(field) else {
            continue;
        };
        let target = clean_header(target);
        if target.is_empty() {
            continue;
        }
        match match_target(&clean_headers, &target) {
            Some(index) => resolved.set(field, index, &headers[index]),
            None => notes.push(ResolutionNote::Unresolved { field, target }),
        }
    }

    for field in CanonicalField::ALL.into_iter().filter(|f| f.is_price()) {
        let poisoned = resolved
            .index(field)
            .is_some_and(|i| is_poison(&clean_headers[i]));
        if poisoned {
            if let Some(column) = resolved.take(field) {
                tracing::warn!(
                    chain = %schema.name,
                    field = %field,
                    header = %column.header,
                    "rejecting lowest-price-in-window column"
                );
                notes.push(ResolutionNote::PoisonColumnRejected {
                    field,
                    header: column.header,
                });
            }
        }
    }

    if resolved.index(CanonicalField::RegularPrice).is_none() {
        let discovered = clean_headers
            .iter()
            .position(|h| h.contains(PRICE_DISCOVERY_MARKER) && !is_poison(h));
        match discovered {
            Some(index) => {
                resolved.set(CanonicalField::RegularPrice, index, &headers[index]);
                notes.push(ResolutionNote::Discovered {
                    header: headers[index].clone(),
                });
            }
            None => {
                let rejected = notes
                    .into_iter()
                    .filter_map(|note| match note {
                        ResolutionNote::PoisonColumnRejected { header, .. } => Some(header),
                        _ => None,
                    })
                    .collect();
                return Err(CatalogError::SchemaUnresolved {
                    header_count: headers.len(),
                    rejected,
                });
            }
        }
    }

    Ok(Resolution {
        schema: resolved,
        notes,
    })
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
