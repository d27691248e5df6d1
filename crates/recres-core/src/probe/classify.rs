//! Classify probe answers into outcomes.

use serde::Serialize;
use std::fmt;

/// Terminal outcome of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// 2xx: the file exists.
    Found,
    /// 4xx: the file is not there (or not for us).
    Missing,
    /// 3xx that was not (or could not be) followed.
    Redirected,
    /// 5xx, or a status outside every known class.
    ServerError,
    /// No HTTP status at all: DNS, connect, timeout, abandoned at deadline.
    Unreachable,
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProbeOutcome::Found => "FOUND",
            ProbeOutcome::Missing => "MISSING",
            ProbeOutcome::Redirected => "REDIRECT",
            ProbeOutcome::ServerError => "SERVER-ERROR",
            ProbeOutcome::Unreachable => "UNREACHABLE",
        };
        f.write_str(s)
    }
}

/// Classify an HTTP status.
///
/// 200 (and 206 from the ranged fallback) is Found, 404 is Missing, 3xx is
/// Redirected, 5xx is ServerError. Other 4xx count as Missing; 1xx and other
/// oddities count as ServerError.
pub fn classify_status(status: u32) -> ProbeOutcome {
    match status {
        200..=299 => ProbeOutcome::Found,
        300..=399 => ProbeOutcome::Redirected,
        400..=499 => ProbeOutcome::Missing,
        _ => ProbeOutcome::ServerError,
    }
}

/// Classify a transport result: `None` means no status was received.
pub fn classify(status: Option<u32>) -> ProbeOutcome {
    status.map_or(ProbeOutcome::Unreachable, classify_status)
}

/// True when the server refuses HEAD and a ranged GET should be tried instead.
pub fn head_rejected(status: u32) -> bool {
    matches!(status, 405 | 501)
}

/// Heuristic: does a successful answer look like an audio file?
///
/// Trusts an `audio/*` or generic binary content type; when the server sends
/// none, falls back to the URL extension.
pub fn looks_like_audio(content_type: Option<&str>, url: &str) -> bool {
    match content_type {
        Some(ct) => {
            ct.starts_with("audio/")
                || ct == "application/octet-stream"
                || ct == "binary/octet-stream"
        }
        None => {
            let path = url.split(['?', '#']).next().unwrap_or(url);
            let lower = path.to_ascii_lowercase();
            [".mp3", ".ogg", ".m4a", ".opus", ".wav", ".flac"]
                .iter()
                .any(|ext| lower.ends_with(ext))
        }
    }
}
