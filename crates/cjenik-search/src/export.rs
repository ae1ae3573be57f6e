//! Tabular export of ranked records.

use std::io::Write;

use cjenik_core::MatchRecord;

use crate::error::SearchError;

/// Column order every export follows.
pub const EXPORT_COLUMNS: [&str; 8] = [
    "Traženi pojam",
    "Naziv proizvoda",
    "Jedinica mjere",
    "Cijena (€)",
    "Trgovački lanac",
    "Šifra",
    "Barkod",
    "Kategorija",
];

/// Two decimals, or an empty cell when the record has no price.
#[must_use]
pub fn format_price(price: Option<f64>) -> String {
    price.map_or_else(String::new, |p| format!("{p:.2}"))
}

/// One record as cells in [`EXPORT_COLUMNS`] order.
#[must_use]
pub fn export_row(record: &MatchRecord) -> [String; 8] {
    [
        record.matched_term.to_string(),
        record.name.clone(),
        record.unit.clone(),
        format_price(record.effective_price),
        record.chain.clone(),
        record.code.clone(),
        record.barcode.clone(),
        record.category.clone(),
    ]
}

/// Writes a header row and one row per record, in the order given.
///
/// # Errors
///
/// Returns [`SearchError::Export`] if the underlying writer fails.
pub fn write_csv<W: Write>(records: &[MatchRecord], writer: W) -> Result<(), SearchError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(EXPORT_COLUMNS)?;
    for record in records {
        out.write_record(export_row(record))?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use cjenik_core::MatchedTerm;

    use super::*;

    fn record(term: MatchedTerm, price: Option<f64>) -> MatchRecord {
        MatchRecord {
            chain: "Konzum".to_owned(),
            matched_term: term,
            code: "1001".to_owned(),
            barcode: "3850102123456".to_owned(),
            name: "Mlijeko Dukat, 1l".to_owned(),
            effective_price: price,
            unit: "kom".to_owned(),
            category: "Mliječni".to_owned(),
        }
    }

    #[test]
    fn writes_header_then_rows_in_column_order() {
        let mut buf = Vec::new();
        write_csv(
            &[record(MatchedTerm::Term("mlijeko".to_owned()), Some(1.09))],
            &mut buf,
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Traženi pojam,Naziv proizvoda,Jedinica mjere,Cijena (€),Trgovački lanac,Šifra,Barkod,Kategorija")
        );
        assert_eq!(
            lines.next(),
            Some("mlijeko,\"Mlijeko Dukat, 1l\",kom,1.09,Konzum,1001,3850102123456,Mliječni")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn absent_price_is_an_empty_cell() {
        let row = export_row(&record(MatchedTerm::Term("x".to_owned()), None));
        assert_eq!(row[3], "");
        assert_eq!(format_price(Some(2.5)), "2.50");
    }

    #[test]
    fn barcode_hits_are_labelled() {
        let row = export_row(&record(
            MatchedTerm::Barcode("3850102123456".to_owned()),
            Some(1.0),
        ));
        assert_eq!(row[0], "[barkod] 3850102123456");
    }
}
