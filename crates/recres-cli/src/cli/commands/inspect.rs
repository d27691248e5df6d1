//! `recres inspect <edition>` – per-ayah audio URLs of one edition.

use anyhow::{Context, Result};
use recres_core::candidate::is_valid_surah;
use recres_core::config::{ConfigError, RecresConfig};
use recres_core::metadata::fetch_surah_audio;
use recres_core::transport::CurlTransport;
use std::path::Path;

use crate::cli::{EXIT_FOUND, EXIT_NOT_FOUND};

pub async fn run_inspect(
    cfg: &RecresConfig,
    edition: &str,
    surah: u16,
    output: Option<&Path>,
) -> Result<i32> {
    if !is_valid_surah(surah) {
        return Err(ConfigError::InvalidSurah(surah).into());
    }
    let listing = tokio::task::spawn_blocking({
        let api_base = cfg.api_base.clone();
        let edition = edition.to_string();
        let timeout = cfg.probe_timeout();
        move || fetch_surah_audio(&CurlTransport::new(), &api_base, surah, &edition, timeout)
    })
    .await
    .context("inspect task join")?
    .with_context(|| format!("surah {} of {}", surah, edition))?;

    match &listing.english_name {
        Some(name) => println!("{} surah {} ({})", listing.edition, listing.surah, name),
        None => println!("{} surah {}", listing.edition, listing.surah),
    }
    let mut with_audio = 0;
    for ayah in &listing.ayahs {
        match &ayah.audio {
            Some(url) => {
                with_audio += 1;
                println!("{:>4}  {}", ayah.number_in_surah, url);
            }
            None => println!("{:>4}  -", ayah.number_in_surah),
        }
        for alt in &ayah.audio_secondary {
            println!("      {}", alt);
        }
    }

    if let Some(path) = output {
        listing.write_json(path)?;
        println!("Saved {} ayah(s) to {}", listing.ayahs.len(), path.display());
    }

    if with_audio == 0 {
        println!("No audio URLs in this edition.");
        return Ok(EXIT_NOT_FOUND);
    }
    Ok(EXIT_FOUND)
}
