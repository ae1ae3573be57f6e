//! Output records handed to presentation and export collaborators.

use serde::{Deserialize, Serialize};

/// The query input that produced a hit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MatchedTerm {
    Term(String),
    Barcode(String),
}

impl std::fmt::Display for MatchedTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchedTerm::Term(term) => f.write_str(term),
            MatchedTerm::Barcode(code) => write!(f, "[barkod] {code}"),
        }
    }
}

/// One ranked hit: a catalog row from one chain matched by one query input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub chain: String,
    pub matched_term: MatchedTerm,
    pub code: String,
    pub barcode: String,
    pub name: String,
    pub effective_price: Option<f64>,
    pub unit: String,
    pub category: String,
}

/// Pipeline stage at which a source branch produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStage {
    Fetch,
    Parse,
    Resolve,
}

impl std::fmt::Display for SourceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceStage::Fetch => write!(f, "fetch"),
            SourceStage::Parse => write!(f, "parse"),
            SourceStage::Resolve => write!(f, "resolve"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The snapshot could not be fetched or decoded; the chain was skipped.
    SourceUnavailable,
    /// No regular-price column was found; the chain was skipped.
    SchemaUnresolved,
    /// A column was resolved but rejected; the chain still contributed rows.
    ColumnRejected,
    /// A configured column is missing from the header; that field is empty.
    ColumnUnresolved,
}

impl DiagnosticKind {
    /// Whether the chain contributed nothing to this search.
    #[must_use]
    pub const fn skipped_source(self) -> bool {
        matches!(
            self,
            DiagnosticKind::SourceUnavailable | DiagnosticKind::SchemaUnresolved
        )
    }
}

/// Per-source observability entry surfaced alongside the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub chain: String,
    pub stage: SourceStage,
    pub kind: DiagnosticKind,
    pub reason: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.chain, self.stage, self.reason)
    }
}

/// Result of one search: ranked records plus per-source diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub records: Vec<MatchRecord>,
    pub diagnostics: Vec<Diagnostic>,
    /// `true` when a barcode was supplied together with terms and the terms were dropped.
    pub terms_ignored: bool,
}

impl SearchOutcome {
    /// Records that carry an effective price.
    pub fn priced(&self) -> impl Iterator<Item = &MatchRecord> {
        self.records.iter().filter(|r| r.effective_price.is_some())
    }

    /// Lowest effective price across all records.
    #[must_use]
    pub fn cheapest(&self) -> Option<f64> {
        self.priced()
            .filter_map(|r| r.effective_price)
            .min_by(f64::total_cmp)
    }

    /// Number of distinct chains represented in the records.
    #[must_use]
    pub fn chain_count(&self) -> usize {
        let mut chains: Vec<&str> = self.records.iter().map(|r| r.chain.as_str()).collect();
        chains.sort_unstable();
        chains.dedup();
        chains.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(chain: &str, price: Option<f64>) -> MatchRecord {
        MatchRecord {
            chain: chain.to_owned(),
            matched_term: MatchedTerm::Term("mlijeko".to_owned()),
            code: "1".to_owned(),
            barcode: String::new(),
            name: "Mlijeko".to_owned(),
            effective_price: price,
            unit: "kom".to_owned(),
            category: String::new(),
        }
    }

    #[test]
    fn barcode_terms_display_distinctly() {
        let term = MatchedTerm::Term("3017620422003".to_owned());
        let barcode = MatchedTerm::Barcode("3017620422003".to_owned());
        assert_ne!(term.to_string(), barcode.to_string());
        assert!(barcode.to_string().ends_with("3017620422003"));
    }

    #[test]
    fn outcome_summaries_ignore_unpriced_records() {
        let outcome = SearchOutcome {
            records: vec![
                record("Konzum", Some(1.29)),
                record("Spar", Some(0.99)),
                record("Spar", None),
            ],
            ..SearchOutcome::default()
        };
        assert_eq!(outcome.priced().count(), 2);
        assert_eq!(outcome.cheapest(), Some(0.99));
        assert_eq!(outcome.chain_count(), 2);
    }

    #[test]
    fn only_fetch_and_schema_failures_skip_a_source() {
        assert!(DiagnosticKind::SourceUnavailable.skipped_source());
        assert!(DiagnosticKind::SchemaUnresolved.skipped_source());
        assert!(!DiagnosticKind::ColumnRejected.skipped_source());
        assert!(!DiagnosticKind::ColumnUnresolved.skipped_source());
    }
}
