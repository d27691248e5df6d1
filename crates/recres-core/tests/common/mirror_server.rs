//! Minimal HTTP/1.1 server standing in for mirror hosts and the metadata API.
//!
//! Serves a fixed route table. Unknown paths get 404. Optionally refuses HEAD
//! with 405 (simulates mirrors that only answer GET).

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
    /// Sent as `Location` (for 3xx routes).
    pub location: Option<String>,
}

impl Route {
    pub fn audio(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: Some("audio/mpeg"),
            body,
            location: None,
        }
    }

    pub fn json(body: String) -> Self {
        Self {
            status: 200,
            content_type: Some("application/json"),
            body: body.into_bytes(),
            location: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: Vec::new(),
            location: None,
        }
    }

    pub fn redirect(to: &str) -> Self {
        Self {
            status: 302,
            content_type: None,
            body: Vec::new(),
            location: Some(to.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MirrorServerOptions {
    /// If false, HEAD returns 405 (simulates servers that block HEAD).
    pub head_allowed: bool,
}

impl Default for MirrorServerOptions {
    fn default() -> Self {
        Self { head_allowed: true }
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(routes: HashMap<String, Route>) -> String {
    start_with_options(routes, MirrorServerOptions::default())
}

pub fn start_with_options(routes: HashMap<String, Route>, opts: MirrorServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes, opts));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        206 => "Partial Content",
        302 => "Found",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &HashMap<String, Route>, opts: MirrorServerOptions) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, target, ranged) = parse_request(request);
    let is_head = method.eq_ignore_ascii_case("HEAD");
    if is_head && !opts.head_allowed {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }
    if !is_head && !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }

    let missing = Route::status(404);
    let route = routes.get(target).unwrap_or(&missing);

    // Ranged GET of a 200 route answers 206 with the first bytes.
    let (status, body): (u16, &[u8]) = if ranged && route.status == 200 && !route.body.is_empty() {
        (206, &route.body[..route.body.len().min(2)])
    } else {
        (route.status, &route.body)
    };

    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        reason(status),
        body.len()
    );
    if let Some(ct) = route.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    if let Some(loc) = &route.location {
        head.push_str(&format!("Location: {}\r\n", loc));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    if !is_head {
        let _ = stream.write_all(body);
    }
}

/// Returns (method, path-and-query, has Range header).
fn parse_request(request: &str) -> (&str, &str, bool) {
    let mut method = "";
    let mut target = "";
    let mut ranged = false;
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if method.is_empty() {
            let mut parts = line.split_whitespace();
            method = parts.next().unwrap_or("");
            target = parts.next().unwrap_or("");
            continue;
        }
        if let Some((name, _)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                ranged = true;
            }
        }
    }
    (method, target, ranged)
}
