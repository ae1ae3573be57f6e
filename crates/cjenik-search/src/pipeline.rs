//! One source's branch of a search: fetch, parse, resolve, filter.

use std::sync::Arc;
use std::time::Duration;

use cjenik_catalog::{load_table, normalize_rows, resolve_schema, RawTable, ResolutionNote};
use cjenik_core::{Diagnostic, DiagnosticKind, MatchRecord, SourceSchema, SourceStage};
use cjenik_source::SourceReader;

use crate::cache::SnapshotCache;
use crate::query::Query;

/// Records and diagnostics produced by one source branch.
#[derive(Debug, Default)]
pub(crate) struct BranchOutput {
    pub records: Vec<MatchRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Why a snapshot could not be turned into a table.
struct LoadFailure {
    stage: SourceStage,
    reason: String,
}

fn diagnostic(
    chain: &SourceSchema,
    stage: SourceStage,
    kind: DiagnosticKind,
    reason: String,
) -> Diagnostic {
    Diagnostic {
        chain: chain.name.clone(),
        stage,
        kind,
        reason,
    }
}

/// Fetches and parses one snapshot. Decoding and parsing run on the blocking
/// pool so a large snapshot does not hold up the other branches.
async fn load_snapshot<R: SourceReader>(
    reader: &R,
    chain: &SourceSchema,
    fetch_timeout: Duration,
) -> Result<RawTable, LoadFailure> {
    let bytes = match tokio::time::timeout(fetch_timeout, reader.fetch(&chain.file_locator)).await
    {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            return Err(LoadFailure {
                stage: SourceStage::Fetch,
                reason: e.to_string(),
            })
        }
        Err(_) => {
            return Err(LoadFailure {
                stage: SourceStage::Fetch,
                reason: format!("fetch timed out after {}s", fetch_timeout.as_secs_f64()),
            })
        }
    };
    tracing::debug!(chain = %chain.name, bytes = bytes.len(), "snapshot fetched");

    let owned = chain.clone();
    let table = match tokio::task::spawn_blocking(move || load_table(&bytes, &owned)).await {
        Ok(Ok(table)) => table,
        Ok(Err(e)) => {
            return Err(LoadFailure {
                stage: SourceStage::Parse,
                reason: e.to_string(),
            })
        }
        Err(join_err) => {
            return Err(LoadFailure {
                stage: SourceStage::Parse,
                reason: format!("parse worker failed: {join_err}"),
            })
        }
    };
    tracing::debug!(
        chain = %chain.name,
        rows = table.len(),
        columns = table.headers.len(),
        "snapshot parsed"
    );
    Ok(table)
}

/// Runs the full per-source pipeline. Never fails: a broken source yields no
/// records and a diagnostic explaining why.
///
/// Everything after the fetch is CPU-bound and runs on the blocking pool.
/// Dropping the returned future abandons the worker's result.
pub(crate) async fn search_source<R: SourceReader>(
    reader: &R,
    cache: &SnapshotCache<RawTable>,
    fetch_timeout: Duration,
    chain: &SourceSchema,
    query: &Query,
) -> BranchOutput {
    let table: Arc<RawTable> = match cache
        .get_or_load(&chain.name, || load_snapshot(reader, chain, fetch_timeout))
        .await
    {
        Ok(table) => table,
        Err(failure) => {
            tracing::warn!(
                chain = %chain.name,
                stage = %failure.stage,
                error = %failure.reason,
                "skipping source"
            );
            return BranchOutput {
                records: Vec::new(),
                diagnostics: vec![diagnostic(
                    chain,
                    failure.stage,
                    DiagnosticKind::SourceUnavailable,
                    failure.reason,
                )],
            };
        }
    };

    let owned_chain = chain.clone();
    let owned_query = query.clone();
    match tokio::task::spawn_blocking(move || filter_table(&table, &owned_chain, &owned_query))
        .await
    {
        Ok(output) => output,
        Err(join_err) => {
            let reason = format!("filter worker failed: {join_err}");
            tracing::warn!(
                chain = %chain.name,
                stage = %SourceStage::Resolve,
                error = %reason,
                "skipping source"
            );
            BranchOutput {
                records: Vec::new(),
                diagnostics: vec![diagnostic(
                    chain,
                    SourceStage::Resolve,
                    DiagnosticKind::SourceUnavailable,
                    reason,
                )],
            }
        }
    }
}

/// Resolves the header row, normalizes every row and keeps the matches.
fn filter_table(table: &RawTable, chain: &SourceSchema, query: &Query) -> BranchOutput {
    let resolution = match resolve_schema(chain, &table.headers) {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::warn!(
                chain = %chain.name,
                stage = %SourceStage::Resolve,
                error = %e,
                "skipping source"
            );
            return BranchOutput {
                records: Vec::new(),
                diagnostics: vec![diagnostic(
                    chain,
                    SourceStage::Resolve,
                    DiagnosticKind::SchemaUnresolved,
                    e.to_string(),
                )],
            };
        }
    };

    let mut diagnostics = Vec::new();
    for note in &resolution.notes {
        let kind = match note {
            ResolutionNote::PoisonColumnRejected { .. } => DiagnosticKind::ColumnRejected,
            ResolutionNote::Unresolved { .. } => DiagnosticKind::ColumnUnresolved,
            ResolutionNote::Discovered { .. } => {
                tracing::debug!(chain = %chain.name, %note, "column discovered");
                continue;
            }
        };
        tracing::warn!(chain = %chain.name, %note, "schema resolution note");
        diagnostics.push(diagnostic(
            chain,
            SourceStage::Resolve,
            kind,
            note.to_string(),
        ));
    }

    let rows = normalize_rows(table, &resolution.schema);
    let mut records = Vec::new();
    for row in &rows {
        for matched_term in query.matches(row) {
            records.push(MatchRecord {
                chain: chain.name.clone(),
                matched_term,
                code: row.code.clone(),
                barcode: row.barcode.clone(),
                name: row.name.clone(),
                effective_price: row.effective_price,
                unit: row.unit.clone(),
                category: row.category.clone(),
            });
        }
    }
    tracing::debug!(
        chain = %chain.name,
        rows = rows.len(),
        hits = records.len(),
        "source filtered"
    );

    BranchOutput {
        records,
        diagnostics,
    }
}
