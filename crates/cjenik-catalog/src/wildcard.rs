//! Wildcard search patterns over product names.
//!
//! `*` matches any run of characters (including none) and `?` matches
//! exactly one. Patterns are anchored at the start of the name, so a bare
//! term is a prefix match; a leading `*` lifts that anchor. The end is never
//! anchored. Matching is case-insensitive and every other character is
//! literal.

use regex::{Regex, RegexBuilder};

use crate::error::CatalogError;

#[derive(Debug, Clone)]
pub struct WildcardPattern {
    term: String,
    regex: Regex,
}

/// Escapes `term` and expands the wildcards into an anchored regex source.
fn to_regex_source(term: &str) -> String {
    let mut source = String::with_capacity(term.len() + 8);
    source.push('^');
    let mut literal = String::new();
    for c in term.chars() {
        match c {
            '*' | '?' => {
                source.push_str(&regex::escape(&literal));
                literal.clear();
                source.push_str(if c == '*' { ".*" } else { "." });
            }
            other => literal.push(other),
        }
    }
    source.push_str(&regex::escape(&literal));
    source
}

impl WildcardPattern {
    /// Compiles a trimmed, non-empty term.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Pattern`] only if the expanded pattern exceeds
    /// the regex engine's size limits.
    pub fn compile(term: &str) -> Result<Self, CatalogError> {
        let regex = RegexBuilder::new(&to_regex_source(term))
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| CatalogError::Pattern {
                term: term.to_owned(),
                source,
            })?;
        Ok(Self {
            term: term.to_owned(),
            regex,
        })
    }

    /// The term as the caller supplied it.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}
