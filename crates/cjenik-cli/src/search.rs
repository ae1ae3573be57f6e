use std::io::Write as _;

use cjenik_core::{AppConfig, Diagnostic, SearchOutcome, SourceSchema};
use cjenik_search::{export_row, write_csv, Aggregator, Query, SearchSettings, EXPORT_COLUMNS};
use cjenik_source::{FsSourceReader, HttpSourceReader, SourceReader};

use crate::OutputFormat;

const NAME_WIDTH: usize = 40;

/// Run one search and print the ranked results to stdout.
///
/// Snapshots come from `CJENIK_SOURCE_BASE_URL` when it is set, otherwise
/// from `CJENIK_SOURCE_DIR`. Diagnostics go to stderr.
///
/// # Errors
///
/// Returns an error if the query is invalid, the HTTP reader cannot be built,
/// the search is interrupted, or writing the output fails.
pub(crate) async fn run_search(
    config: &AppConfig,
    chains: Vec<SourceSchema>,
    terms: &[String],
    barcode: Option<&str>,
    format: OutputFormat,
    priced_only: bool,
) -> anyhow::Result<()> {
    let query = Query::from_input(terms, barcode)?;
    let settings = SearchSettings {
        require_price: priced_only,
        ..SearchSettings::from_config(config)
    };

    if let Some(base_url) = &config.source_base_url {
        let reader = HttpSourceReader::new(
            base_url,
            config.source_token.clone(),
            config.fetch_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )?;
        tracing::debug!(%base_url, "reading snapshots over HTTP");
        execute(reader, chains, settings, &query, format).await
    } else {
        tracing::debug!(dir = %config.source_dir.display(), "reading snapshots from disk");
        let reader = FsSourceReader::new(&config.source_dir);
        execute(reader, chains, settings, &query, format).await
    }
}

async fn execute<R: SourceReader>(
    reader: R,
    chains: Vec<SourceSchema>,
    settings: SearchSettings,
    query: &Query,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let aggregator = Aggregator::new(reader, chains, settings);

    let outcome = tokio::select! {
        outcome = aggregator.search(query) => outcome,
        _ = tokio::signal::ctrl_c() => {
            anyhow::bail!("search interrupted; partial results discarded");
        }
    };

    if outcome.terms_ignored {
        eprintln!("warning: barcode given, search terms ignored");
    }
    for diagnostic in &outcome.diagnostics {
        eprintln!("{}", diagnostic_line(diagnostic));
    }

    let stdout = std::io::stdout();
    match format {
        OutputFormat::Table => {
            let mut out = stdout.lock();
            out.write_all(render_table(&outcome).as_bytes())?;
        }
        OutputFormat::Csv => write_csv(&outcome.records, stdout.lock())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(stdout.lock(), &outcome)?;
            println!();
        }
    }
    Ok(())
}

/// Chains that contributed nothing are reported as skipped; anything else is
/// a note about a chain whose rows were still searched.
fn diagnostic_line(diagnostic: &Diagnostic) -> String {
    if diagnostic.kind.skipped_source() {
        format!("skipped: {diagnostic}")
    } else {
        format!("note: {diagnostic}")
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

fn table_line(cells: &[String; 8]) -> String {
    let [term, name, unit, price, chain, code, barcode, category] = cells;
    format!(
        "{:<18}{:<42}{:<8}{:>10}  {:<10}{:<12}{:<15}{}",
        truncate(term, 16),
        truncate(name, NAME_WIDTH),
        truncate(unit, 6),
        price,
        chain,
        code,
        barcode,
        category
    )
}

/// Fixed-width table in export column order, followed by a summary line.
pub(crate) fn render_table(outcome: &SearchOutcome) -> String {
    if outcome.records.is_empty() {
        return "no results\n".to_string();
    }

    let header = EXPORT_COLUMNS.map(str::to_string);
    let mut out = String::new();
    out.push_str(&format!("{}\n", table_line(&header).trim_end()));
    for record in &outcome.records {
        out.push_str(&format!("{}\n", table_line(&export_row(record)).trim_end()));
    }
    out.push_str(&format!("{}\n", summary(outcome)));
    out
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

fn summary(outcome: &SearchOutcome) -> String {
    let products = plural(outcome.records.len(), "product", "products");
    let chains = plural(outcome.chain_count(), "chain", "chains");
    match outcome.cheapest() {
        Some(price) => format!("{products} from {chains}, cheapest €{price:.2}"),
        None => format!("{products} from {chains}, none priced"),
    }
}

#[cfg(test)]
mod tests {
    use cjenik_core::{DiagnosticKind, MatchRecord, MatchedTerm, SourceStage};

    use super::*;

    fn record(chain: &str, name: &str, price: Option<f64>) -> MatchRecord {
        MatchRecord {
            chain: chain.to_string(),
            matched_term: MatchedTerm::Term("mlijeko".to_string()),
            code: "1001".to_string(),
            barcode: String::new(),
            name: name.to_string(),
            effective_price: price,
            unit: "kom".to_string(),
            category: String::new(),
        }
    }

    #[test]
    fn empty_outcome_renders_no_results() {
        assert_eq!(render_table(&SearchOutcome::default()), "no results\n");
    }

    #[test]
    fn table_lists_header_rows_and_summary() {
        let outcome = SearchOutcome {
            records: vec![
                record("Spar", "Mlijeko Dukat", Some(1.09)),
                record("Konzum", "Mlijeko Dukat", Some(1.29)),
            ],
            ..SearchOutcome::default()
        };
        let table = render_table(&outcome);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Traženi pojam"));
        assert!(lines[1].contains("1.09") && lines[1].contains("Spar"));
        assert!(lines[2].contains("1.29") && lines[2].contains("Konzum"));
        assert_eq!(lines[3], "2 products from 2 chains, cheapest €1.09");
    }

    #[test]
    fn long_names_are_truncated() {
        let long = "Čokolada mliječna s lješnjacima i grožđicama 300g";
        let truncated = truncate(long, NAME_WIDTH);
        assert_eq!(truncated.chars().count(), NAME_WIDTH);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate("Sol", NAME_WIDTH), "Sol");
    }

    #[test]
    fn unpriced_results_are_summarised() {
        let outcome = SearchOutcome {
            records: vec![record("Lidl", "Vrećica", None)],
            ..SearchOutcome::default()
        };
        assert!(render_table(&outcome).ends_with("1 product from 1 chain, none priced\n"));
    }

    #[test]
    fn skipped_chains_are_told_apart_from_notes() {
        let diagnostic = |kind| Diagnostic {
            chain: "Kaufland".to_string(),
            stage: SourceStage::Resolve,
            kind,
            reason: "no price column".to_string(),
        };
        assert_eq!(
            diagnostic_line(&diagnostic(DiagnosticKind::SchemaUnresolved)),
            "skipped: Kaufland [resolve]: no price column"
        );
        assert_eq!(
            diagnostic_line(&diagnostic(DiagnosticKind::ColumnUnresolved)),
            "note: Kaufland [resolve]: no price column"
        );
    }
}
