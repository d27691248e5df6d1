//! `recres probe <url>` – probe a single URL.

use anyhow::{Context, Result};
use recres_core::config::{check_timeout_secs, RecresConfig};
use recres_core::probe::{probe, ProbeOptions};
use recres_core::transport::CurlTransport;
use std::time::Duration;

use super::probe_line;
use crate::cli::{EXIT_FOUND, EXIT_NOT_FOUND};

pub async fn run_probe(
    cfg: &RecresConfig,
    url: &str,
    timeout: Option<u64>,
    no_follow_redirects: bool,
) -> Result<i32> {
    let opts = ProbeOptions {
        timeout: Duration::from_secs(check_timeout_secs(
            "--timeout",
            timeout.unwrap_or(cfg.probe_timeout_secs),
        )?),
        follow_redirects: cfg.follow_redirects && !no_follow_redirects,
    };
    let result = tokio::task::spawn_blocking({
        let url = url.to_string();
        move || probe(&CurlTransport::new(), &url, &opts)
    })
    .await
    .context("probe task join")?;

    println!("{}", probe_line(&result));
    println!("  outcome:      {}", result.outcome);
    if let Some(method) = result.method {
        println!("  method:       {}", method);
    }
    if let Some(ct) = &result.content_type {
        println!("  content-type: {}", ct);
    }
    if let Some(len) = result.content_length {
        println!("  length:       {}", len);
    }
    if let Some(to) = &result.redirected_to {
        println!("  redirect:     {}", to);
    }
    if let Some(err) = &result.error {
        println!("  error:        {}", err);
    }

    if result.is_found() {
        println!("FOUND: {}", result.url);
        Ok(EXIT_FOUND)
    } else {
        Ok(EXIT_NOT_FOUND)
    }
}
