//! Sequential batch resolution into a `ResultTable`.
//!
//! Every term yields exactly one row, in input order. A term whose
//! resolution fails is logged and gets a row with absent fields; the batch
//! carries on with the next term.

use log::{info, warn};
use std::time::Instant;

use crate::gateway::JsonFetch;
use crate::models::{ResolutionRow, ResultTable};
use crate::progress::{format_duration, BatchProgress, ProgressMode};
use crate::resolver::ArtistResolver;

/// Resolve one term into a row, containing any failure.
pub fn resolve_row<F: JsonFetch>(resolver: &ArtistResolver<F>, term: &str) -> ResolutionRow {
    match resolver.resolve(term) {
        Ok(Some(record)) => ResolutionRow::from_record(term, &record),
        Ok(None) => ResolutionRow::unresolved(term),
        Err(err) => {
            warn!("'{}': resolution failed: {}", term, err);
            ResolutionRow::unresolved(term)
        }
    }
}

/// Resolve `terms` in order, reporting progress in the given `mode`.
pub fn resolve_batch<F, S>(resolver: &ArtistResolver<F>, terms: &[S], mode: ProgressMode) -> ResultTable
where
    F: JsonFetch,
    S: AsRef<str>,
{
    let start = Instant::now();
    let total = terms.len() as u64;
    info!("Resolving {} search terms", total);

    let mut progress = BatchProgress::new(mode, "resolve", total);
    let mut table = ResultTable::new();
    for term in terms {
        table.push(resolve_row(resolver, term.as_ref()));
        progress.step();
    }
    progress.finish();

    info!(
        "Resolved {}/{} terms in {}",
        table.resolved_count(),
        table.len(),
        format_duration(start.elapsed())
    );
    table
}
