//! Canonical rows with normalized prices.

use cjenik_core::CanonicalField;

use crate::price::{parse_price, select_price};
use crate::schema::ResolvedSchema;
use crate::table::RawTable;

/// One snapshot row projected onto the canonical fields.
///
/// Unresolved fields are empty strings; prices are absent unless the cell
/// parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogRow {
    pub name: String,
    pub code: String,
    pub barcode: String,
    pub category: String,
    pub unit: String,
    pub regular_price_value: Option<f64>,
    pub promo_price_value: Option<f64>,
    pub effective_price: Option<f64>,
}

/// Strips the float artifact spreadsheets leave on numeric barcodes
/// (`3017620422003.0`), along with surrounding whitespace.
#[must_use]
pub fn normalize_barcode(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_suffix(".0").unwrap_or(trimmed)
}

fn cell<'a>(row: &'a [String], resolved: &ResolvedSchema, field: CanonicalField) -> &'a str {
    resolved
        .index(field)
        .and_then(|i| row.get(i))
        .map_or("", String::as_str)
}

/// Projects every table row through `resolved`.
///
/// Both price columns are normalized for the whole row before the selection
/// policy runs, so the effective price only ever sees parsed values.
#[must_use]
pub fn normalize_rows(table: &RawTable, resolved: &ResolvedSchema) -> Vec<CatalogRow> {
    table
        .rows
        .iter()
        .map(|row| {
            let regular_price_value = parse_price(cell(row, resolved, CanonicalField::RegularPrice));
            let promo_price_value = parse_price(cell(row, resolved, CanonicalField::PromoPrice));
            CatalogRow {
                name: cell(row, resolved, CanonicalField::Name).trim().to_owned(),
                code: cell(row, resolved, CanonicalField::Code).trim().to_owned(),
                barcode: normalize_barcode(cell(row, resolved, CanonicalField::Barcode)).to_owned(),
                category: cell(row, resolved, CanonicalField::Category).trim().to_owned(),
                unit: cell(row, resolved, CanonicalField::Unit).trim().to_owned(),
                regular_price_value,
                promo_price_value,
                effective_price: select_price(regular_price_value, promo_price_value),
            }
        })
        .collect()
}
