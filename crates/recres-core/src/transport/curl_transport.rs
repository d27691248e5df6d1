//! libcurl-backed transport.
//!
//! One easy handle per request; redirects are not followed here so the probe
//! layer can classify 3xx answers itself.

use std::str;
use std::time::Duration;

use super::{
    parse_headers, HttpRequest, HttpResponse, Method, Transport, TransportError,
    TransportErrorKind,
};

const USER_AGENT: &str = concat!("recres/", env!("CARGO_PKG_VERSION"));

/// Connect phase never gets more than this, even with a long request timeout.
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Blocking transport built on the `curl` crate.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    /// Extra request headers (e.g. "Accept: application/json").
    headers: Vec<(String, String)>,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn perform(&self, request: &HttpRequest) -> Result<HttpResponse, curl::Error> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        let mut truncated = false;

        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url)?;
        easy.useragent(USER_AGENT)?;
        easy.follow_location(false)?;
        match request.method {
            Method::Head => easy.nobody(true)?,
            Method::Get => easy.get(true)?,
        }
        if let Some((start, end)) = request.range {
            easy.range(&format!("{}-{}", start, end))?;
        }
        easy.connect_timeout(request.timeout.min(MAX_CONNECT_TIMEOUT))?;
        easy.timeout(request.timeout)?;

        let mut list = curl::easy::List::new();
        for (k, v) in &self.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !self.headers.is_empty() {
            easy.http_headers(list)?;
        }

        let max_body = request.max_body;
        let result = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    // A new status line starts a new header block (e.g. after 100 Continue).
                    if line.starts_with("HTTP/") {
                        header_lines.clear();
                    }
                    header_lines.push(line.to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                if let Some(limit) = max_body {
                    let room = limit.saturating_sub(body.len());
                    if room < data.len() {
                        body.extend_from_slice(&data[..room]);
                        truncated = true;
                        // Returning a short count aborts the transfer.
                        return Ok(0);
                    }
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()
        };

        match result {
            Ok(()) => {}
            Err(e) if truncated && e.is_write_error() => {}
            Err(e) => return Err(e),
        }

        let status = easy.response_code()?;
        Ok(HttpResponse {
            status,
            headers: parse_headers(&header_lines),
            body,
        })
    }
}

/// Classify a curl error into a transport failure kind.
pub(crate) fn classify_curl_error(e: &curl::Error) -> TransportErrorKind {
    if e.is_operation_timedout() {
        return TransportErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return TransportErrorKind::Connection;
    }
    TransportErrorKind::Other
}

impl Transport for CurlTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::trace!(method = %request.method, url = %request.url, "http request");
        match self.perform(request) {
            Ok(resp) => {
                tracing::trace!(status = resp.status, url = %request.url, "http response");
                Ok(resp)
            }
            Err(e) => {
                let kind = classify_curl_error(&e);
                tracing::debug!(url = %request.url, %kind, "transport error: {}", e);
                Err(TransportError::new(kind, e.to_string()))
            }
        }
    }
}
