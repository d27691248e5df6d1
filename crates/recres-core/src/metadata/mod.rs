//! Metadata API client.
//!
//! Lists editions (`GET <api>/edition?format=&type=&language=`) and fetches the
//! per-ayah audio listing of one edition (`GET <api>/surah/<n>/<edition>`).
//! Both are single, side-effect-free GETs; failures come back as [`LookupError`].

mod dto;

use anyhow::Context;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::edition::{Edition, EditionFilter};
use crate::transport::{HttpRequest, Transport, TransportError};
use dto::{Envelope, SurahDto};

/// Public endpoint used when the config does not override it.
pub const DEFAULT_API_BASE: &str = "https://api.alquran.cloud/v1";

/// Why a metadata call produced no usable data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Transport-level failure (DNS, connection refused, timeout).
    #[error("network error: {0}")]
    Network(#[from] TransportError),
    /// Body is not JSON or lacks the expected `data` shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// Well-formed HTTP answer with a non-200 status.
    #[error("remote error: HTTP {status}")]
    Remote { status: u32 },
    /// The endpoint URL could not be built from the configured base.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl Serialize for LookupError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Audio URLs of one ayah.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AyahAudio {
    pub number_in_surah: u32,
    pub audio: Option<String>,
    pub audio_secondary: Vec<String>,
}

/// Audio listing of one surah for one edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurahAudio {
    pub edition: String,
    pub surah: u16,
    pub english_name: Option<String>,
    pub ayahs: Vec<AyahAudio>,
}

impl SurahAudio {
    /// Writes the listing as pretty JSON.
    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("write surah listing {}", path.display()))?;
        tracing::info!(path = %path.display(), edition = %self.edition, "surah listing written");
        Ok(())
    }
}

fn endpoint(api_base: &str, segments: &[&str]) -> Result<url::Url, LookupError> {
    let mut url = url::Url::parse(api_base.trim_end_matches('/'))
        .map_err(|e| LookupError::InvalidUrl(format!("{api_base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| LookupError::InvalidUrl(format!("{api_base}: cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Performs one GET and returns the body of a 200 response.
fn get_ok(transport: &dyn Transport, url: &str, timeout: Duration) -> Result<Vec<u8>, LookupError> {
    let resp = transport.send(&HttpRequest::get(url, timeout))?;
    if resp.status != 200 {
        tracing::debug!(url, status = resp.status, "metadata request rejected");
        return Err(LookupError::Remote {
            status: resp.status,
        });
    }
    Ok(resp.body)
}

/// Parses an edition listing body. Duplicate identifiers keep their first occurrence.
pub fn parse_editions(body: &[u8]) -> Result<Vec<Edition>, LookupError> {
    let envelope: Envelope<Vec<Edition>> = serde_json::from_slice(body)
        .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;
    let mut seen = HashSet::new();
    Ok(envelope
        .data
        .into_iter()
        .filter(|e| seen.insert(e.identifier.clone()))
        .collect())
}

/// Lists editions matching `filter`.
pub fn lookup_editions(
    transport: &dyn Transport,
    api_base: &str,
    filter: &EditionFilter,
    timeout: Duration,
) -> Result<Vec<Edition>, LookupError> {
    let mut url = endpoint(api_base, &["edition"])?;
    {
        let pairs = filter.query_pairs();
        if !pairs.is_empty() {
            let mut q = url.query_pairs_mut();
            for (k, v) in pairs {
                q.append_pair(k, &v);
            }
        }
    }
    tracing::debug!(url = %url, "looking up editions");
    let body = get_ok(transport, url.as_str(), timeout)?;
    let editions = parse_editions(&body)?;
    tracing::debug!(count = editions.len(), "editions received");
    Ok(editions)
}

/// Parses a surah listing body into its audio URLs.
pub fn parse_surah_audio(edition: &str, body: &[u8]) -> Result<SurahAudio, LookupError> {
    let envelope: Envelope<SurahDto> = serde_json::from_slice(body)
        .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;
    let surah = envelope.data;
    Ok(SurahAudio {
        edition: edition.to_string(),
        surah: surah.number,
        english_name: surah.english_name,
        ayahs: surah
            .ayahs
            .into_iter()
            .map(|a| AyahAudio {
                number_in_surah: a.number_in_surah,
                audio: a.audio.filter(|s| !s.is_empty()),
                audio_secondary: a.audio_secondary.unwrap_or_default(),
            })
            .collect(),
    })
}

/// Fetches the audio listing of `surah` for the edition `edition`.
pub fn fetch_surah_audio(
    transport: &dyn Transport,
    api_base: &str,
    surah: u16,
    edition: &str,
    timeout: Duration,
) -> Result<SurahAudio, LookupError> {
    let surah_segment = surah.to_string();
    let url = endpoint(api_base, &["surah", &surah_segment, edition])?;
    tracing::debug!(url = %url, "fetching surah audio");
    let body = get_ok(transport, url.as_str(), timeout)?;
    parse_surah_audio(edition, &body)
}
