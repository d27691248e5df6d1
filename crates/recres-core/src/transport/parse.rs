//! Parse HTTP response header lines into ResponseHeaders.

use serde::Serialize;

/// Headers the resolver cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseHeaders {
    /// `Content-Type` without parameters, lowercased.
    pub content_type: Option<String>,
    /// `Content-Length`, if present and numeric.
    pub content_length: Option<u64>,
    /// `Location` as sent by the server (may be relative).
    pub location: Option<String>,
}

/// Parse collected header lines into ResponseHeaders.
///
/// Status lines and blank lines are ignored. When a header repeats (e.g. an
/// interim `100 Continue` block), the last value wins.
pub fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut out = ResponseHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with("HTTP/") {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                let mime = value.split(';').next().unwrap_or("").trim();
                if !mime.is_empty() {
                    out.content_type = Some(mime.to_ascii_lowercase());
                }
            }
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    out.content_length = Some(n);
                }
            }
            if name.eq_ignore_ascii_case("location") && !value.is_empty() {
                out.location = Some(value.to_string());
            }
        }
    }

    out
}
