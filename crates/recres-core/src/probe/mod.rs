//! Single-URL existence probe.
//!
//! HEAD first; servers that refuse HEAD get a two-byte ranged GET instead.
//! A probe never fails: transport errors become an `Unreachable` result so a
//! batch of probes always completes.

mod classify;

pub use classify::{classify, classify_status, head_rejected, looks_like_audio, ProbeOutcome};

use serde::Serialize;
use std::time::Duration;

use crate::transport::{HttpRequest, HttpResponse, Method, Transport, TransportErrorKind};

/// Bytes requested by the GET fallback.
const FALLBACK_RANGE_LEN: u64 = 2;

/// Per-probe settings.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Timeout of each HTTP request.
    pub timeout: Duration,
    /// Follow one 3xx hop to its `Location`.
    pub follow_redirects: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            follow_redirects: true,
        }
    }
}

/// Outcome of probing one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    /// URL that was probed (before any redirect).
    pub url: String,
    pub outcome: ProbeOutcome,
    /// HTTP status of the final answer, if one was received.
    pub status: Option<u32>,
    /// Method that produced the final answer.
    pub method: Option<Method>,
    /// Transport failure class when `outcome` is Unreachable.
    pub error_kind: Option<TransportErrorKind>,
    pub error: Option<String>,
    /// Found, and the answer looks like an audio file.
    pub serves_audio: bool,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    /// Redirect target: the followed hop, or the unfollowed `Location`.
    pub redirected_to: Option<String>,
}

impl ProbeResult {
    /// Result for a URL that never got an answer.
    pub fn unreachable(
        url: impl Into<String>,
        kind: TransportErrorKind,
        error: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            outcome: ProbeOutcome::Unreachable,
            status: None,
            method: None,
            error_kind: Some(kind),
            error: Some(error.into()),
            serves_audio: false,
            content_type: None,
            content_length: None,
            redirected_to: None,
        }
    }

    fn from_response(url: &str, method: Method, resp: &HttpResponse) -> Self {
        let outcome = classify_status(resp.status);
        let content_type = resp.headers.content_type.clone();
        let serves_audio =
            outcome == ProbeOutcome::Found && looks_like_audio(content_type.as_deref(), url);
        Self {
            url: url.to_string(),
            outcome,
            status: Some(resp.status),
            method: Some(method),
            error_kind: None,
            error: None,
            serves_audio,
            content_type,
            content_length: resp.headers.content_length,
            redirected_to: if outcome == ProbeOutcome::Redirected {
                resp.headers.location.clone()
            } else {
                None
            },
        }
    }

    pub fn is_found(&self) -> bool {
        self.outcome == ProbeOutcome::Found
    }
}

/// Resolves a possibly relative `Location` against the URL that returned it.
fn resolve_location(base: &str, location: &str) -> Option<String> {
    let base = url::Url::parse(base).ok()?;
    base.join(location).ok().map(String::from)
}

/// One HEAD, plus the ranged GET fallback when HEAD is refused.
fn probe_once(transport: &dyn Transport, url: &str, opts: &ProbeOptions) -> ProbeResult {
    match transport.send(&HttpRequest::head(url, opts.timeout)) {
        Ok(resp) if head_rejected(resp.status) => {
            tracing::debug!(url, status = resp.status, "HEAD refused, trying ranged GET");
            let req = HttpRequest::ranged_get(url, opts.timeout, FALLBACK_RANGE_LEN);
            match transport.send(&req) {
                Ok(resp) => ProbeResult::from_response(url, Method::Get, &resp),
                Err(e) => ProbeResult::unreachable(url, e.kind, e.message),
            }
        }
        Ok(resp) => ProbeResult::from_response(url, Method::Head, &resp),
        Err(e) => ProbeResult::unreachable(url, e.kind, e.message),
    }
}

/// Probes `url` and classifies the answer. Follows at most one redirect.
pub fn probe(transport: &dyn Transport, url: &str, opts: &ProbeOptions) -> ProbeResult {
    let first = probe_once(transport, url, opts);
    if first.outcome != ProbeOutcome::Redirected || !opts.follow_redirects {
        tracing::debug!(url, outcome = %first.outcome, status = ?first.status, "probe done");
        return first;
    }
    let Some(target) = first
        .redirected_to
        .as_deref()
        .and_then(|loc| resolve_location(url, loc))
    else {
        return first;
    };

    let mut followed = probe_once(transport, &target, opts);
    tracing::debug!(url, %target, outcome = %followed.outcome, "probe followed redirect");
    // One hop only: a second 3xx stays Redirected and reports the first hop.
    followed.url = url.to_string();
    followed.redirected_to = Some(target);
    followed
}
