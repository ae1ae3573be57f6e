//! Query validation and row predicates.

use cjenik_catalog::{normalize_barcode, CatalogRow, WildcardPattern};
use cjenik_core::MatchedTerm;

use crate::error::SearchError;

/// Upper bound on wildcard terms per query.
pub const MAX_TERMS: usize = 6;

#[derive(Debug, Clone)]
pub enum QueryKind {
    /// Compiled wildcard patterns, in the order the caller gave them.
    Terms(Vec<WildcardPattern>),
    /// Exact barcode, already stripped of a trailing `.0`.
    Barcode(String),
}

/// A validated search request. Built only through [`Query::from_input`].
#[derive(Debug, Clone)]
pub struct Query {
    kind: QueryKind,
    terms_ignored: bool,
}

impl Query {
    /// Validates raw caller input.
    ///
    /// Terms are trimmed and blank ones dropped. A non-blank barcode takes
    /// precedence over any terms; the dropped terms are reported through
    /// [`Query::terms_ignored`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::QueryInvalid`] when nothing searchable remains,
    /// when more than [`MAX_TERMS`] terms are given, or when a term cannot be
    /// compiled.
    pub fn from_input<I, S>(terms: I, barcode: Option<&str>) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect();

        let barcode = barcode.map(normalize_barcode).filter(|b| !b.is_empty());

        if let Some(barcode) = barcode {
            let terms_ignored = !terms.is_empty();
            if terms_ignored {
                tracing::warn!(
                    barcode,
                    ignored = terms.len(),
                    "barcode supplied together with terms; terms ignored"
                );
            }
            return Ok(Self {
                kind: QueryKind::Barcode(barcode.to_owned()),
                terms_ignored,
            });
        }

        if terms.is_empty() {
            return Err(SearchError::query_invalid(
                "enter at least one search term or a barcode",
            ));
        }
        if terms.len() > MAX_TERMS {
            return Err(SearchError::query_invalid(format!(
                "at most {MAX_TERMS} search terms are allowed, got {}",
                terms.len()
            )));
        }

        let patterns = terms
            .iter()
            .map(|t| WildcardPattern::compile(t))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SearchError::query_invalid(e.to_string()))?;

        Ok(Self {
            kind: QueryKind::Terms(patterns),
            terms_ignored: false,
        })
    }

    #[must_use]
    pub fn kind(&self) -> &QueryKind {
        &self.kind
    }

    #[must_use]
    pub fn terms_ignored(&self) -> bool {
        self.terms_ignored
    }

    /// Every query input that `row` satisfies, one entry per matching term.
    pub(crate) fn matches(&self, row: &CatalogRow) -> Vec<MatchedTerm> {
        match &self.kind {
            QueryKind::Barcode(barcode) => {
                if normalize_barcode(&row.barcode) == barcode {
                    vec![MatchedTerm::Barcode(barcode.clone())]
                } else {
                    Vec::new()
                }
            }
            QueryKind::Terms(patterns) => patterns
                .iter()
                .filter(|p| p.matches(&row.name))
                .map(|p| MatchedTerm::Term(p.term().to_owned()))
                .collect(),
        }
    }
}
