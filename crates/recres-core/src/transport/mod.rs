//! HTTP transport seam.
//!
//! The resolver only depends on the [`Transport`] trait, so sweeps and lookups
//! can run against libcurl in production and against scripted fakes in tests.

mod curl_transport;
mod parse;

pub use curl_transport::CurlTransport;
pub use parse::{parse_headers, ResponseHeaders};

use std::fmt;
use std::time::Duration;

/// HTTP method used by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Head,
    Get,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Head => f.write_str("HEAD"),
            Method::Get => f.write_str("GET"),
        }
    }
}

/// A single request. Redirects are never followed by the transport itself.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Inclusive byte range sent as `Range: bytes=start-end`.
    pub range: Option<(u64, u64)>,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Stop reading the body after this many bytes (None = read it all).
    pub max_body: Option<usize>,
}

impl HttpRequest {
    pub fn head(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: Method::Head,
            url: url.into(),
            range: None,
            timeout,
            max_body: None,
        }
    }

    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            range: None,
            timeout,
            max_body: None,
        }
    }

    /// GET of the first `len` bytes; the body is capped at `len` even if the
    /// server ignores the range.
    pub fn ranged_get(url: impl Into<String>, timeout: Duration, len: u64) -> Self {
        let len = len.max(1);
        Self {
            method: Method::Get,
            url: url.into(),
            range: Some((0, len - 1)),
            timeout,
            max_body: Some(len as usize),
        }
    }
}

/// Status, selected headers and (possibly truncated) body of a response.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u32,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

/// Transport-level failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// Request exceeded its timeout.
    Timeout,
    /// DNS, connect, send or receive failure.
    Connection,
    /// Anything else (bad URL, TLS, internal).
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Timeout => f.write_str("timeout"),
            TransportErrorKind::Connection => f.write_str("connection"),
            TransportErrorKind::Other => f.write_str("other"),
        }
    }
}

/// The request never produced an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connection, message)
    }
}

/// Blocking HTTP transport. Call from `spawn_blocking` when used from async code.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}
