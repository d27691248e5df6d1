//! `recres list` – print `identifier : englishName` for every edition matching a filter.

use anyhow::{Context, Result};
use recres_core::config::RecresConfig;
use recres_core::metadata::lookup_editions;
use recres_core::report::editions_to_text;
use recres_core::transport::CurlTransport;
use std::fs;
use std::path::Path;

use crate::cli::{FilterArgs, EXIT_FOUND, EXIT_NOT_FOUND};

pub async fn run_list(cfg: &RecresConfig, filter: &FilterArgs, output: Option<&Path>) -> Result<i32> {
    let filter = filter.apply(&cfg.edition_filter);
    let editions = tokio::task::spawn_blocking({
        let api_base = cfg.api_base.clone();
        let timeout = cfg.probe_timeout();
        move || lookup_editions(&CurlTransport::new(), &api_base, &filter, timeout)
    })
    .await
    .context("lookup task join")?
    .context("edition lookup failed")?;

    let text = editions_to_text(&editions);
    print!("{}", text);
    if let Some(path) = output {
        fs::write(path, &text).with_context(|| format!("write {}", path.display()))?;
        println!("Saved {} edition(s) to {}", editions.len(), path.display());
    }
    if editions.is_empty() {
        println!("No editions matched the filter.");
        return Ok(EXIT_NOT_FOUND);
    }
    Ok(EXIT_FOUND)
}
