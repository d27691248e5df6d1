//! One resolution run: metadata lookup and mirror sweep side by side.
//!
//! The two halves are independent: a failed lookup is recorded in the report
//! and the sweep still runs to completion.

use std::sync::Arc;

use super::{sweep, SweepOptions};
use crate::candidate::Candidate;
use crate::edition::{Edition, EditionFilter};
use crate::matching::{match_editions, normalize_aliases};
use crate::metadata::{lookup_editions, LookupError};
use crate::report::ResolveReport;
use crate::transport::Transport;

/// Inputs of one resolution run.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Alias tokens for the reciter, e.g. ["yasser", "dossari"].
    pub aliases: Vec<String>,
    /// Candidate URL templates, in probe order.
    pub candidates: Vec<Candidate>,
    pub surah: u16,
    /// Metadata API base.
    pub api_base: String,
    /// Server-side edition filter.
    pub filter: EditionFilter,
}

/// Looks up matching editions and sweeps the candidate URLs concurrently.
///
/// With no aliases the lookup is skipped (nothing could match).
pub async fn resolve(
    transport: Arc<dyn Transport>,
    request: &ResolveRequest,
    opts: &SweepOptions,
) -> ResolveReport {
    let aliases = normalize_aliases(&request.aliases);

    let lookup = {
        let transport = Arc::clone(&transport);
        let api_base = request.api_base.clone();
        let filter = request.filter.clone();
        let timeout = opts.probe.timeout;
        let skip = aliases.is_empty();
        async move {
            let editions: Result<Vec<Edition>, LookupError> = if skip {
                Ok(Vec::new())
            } else {
                tokio::task::spawn_blocking(move || {
                    lookup_editions(transport.as_ref(), &api_base, &filter, timeout)
                })
                .await
                .unwrap_or_else(|e| {
                    Err(LookupError::InvalidResponse(format!(
                        "lookup task failed: {e}"
                    )))
                })
            };
            editions
        }
    };
    let probes = sweep(
        Arc::clone(&transport),
        request.candidates.clone(),
        request.surah,
        opts,
    );

    let (lookup, probes) = tokio::join!(lookup, probes);

    let (matched_editions, lookup_error) = match lookup {
        Ok(editions) => (match_editions(&editions, &aliases), None),
        Err(e) => {
            tracing::warn!("edition lookup failed: {}", e);
            (Vec::new(), Some(e))
        }
    };
    tracing::info!(
        matched = matched_editions.len(),
        working = probes.found().count(),
        "resolve finished"
    );

    ResolveReport {
        aliases,
        surah: request.surah,
        matched_editions,
        lookup_error,
        probes: probes.entries,
        skipped: probes.skipped,
        timed_out: probes.timed_out,
    }
}
