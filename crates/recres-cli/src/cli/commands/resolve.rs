//! `recres resolve` – editions and working mirror URLs for a reciter.

use anyhow::Result;
use recres_core::candidate::{expand, is_valid_surah, Candidate, MirrorSet};
use recres_core::config::{check_timeout_secs, ConfigError, RecresConfig};
use recres_core::matching::normalize_aliases;
use recres_core::probe::ProbeOptions;
use recres_core::report::ResolveReport;
use recres_core::sweep::{resolve, ResolveRequest, SweepOptions};
use recres_core::transport::{CurlTransport, Transport};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use super::{nonzero, probe_line};
use crate::cli::{ResolveArgs, EXIT_FOUND, EXIT_NOT_FOUND};

/// Mirror sets named with `--mirror`, or else every set whose aliases match.
fn select_mirrors<'a>(
    cfg: &'a RecresConfig,
    names: &[String],
    aliases: &[String],
) -> Result<Vec<&'a MirrorSet>, ConfigError> {
    if names.is_empty() {
        return Ok(cfg
            .mirrors
            .iter()
            .filter(|m| m.matches_aliases(aliases))
            .collect());
    }
    names
        .iter()
        .map(|n| {
            cfg.mirror_set(n)
                .ok_or_else(|| ConfigError::UnknownMirrorSet(n.clone()))
        })
        .collect()
}

pub(crate) fn build_request(cfg: &RecresConfig, args: &ResolveArgs) -> Result<ResolveRequest, ConfigError> {
    if !is_valid_surah(args.surah) {
        return Err(ConfigError::InvalidSurah(args.surah));
    }
    let aliases = normalize_aliases(&args.aliases);
    let sets: Vec<MirrorSet> = select_mirrors(cfg, &args.mirrors, &aliases)?
        .into_iter()
        .cloned()
        .collect();
    let mut candidates = expand(&sets);
    let mut seen: HashSet<String> = candidates.iter().map(|c| c.template.clone()).collect();
    for t in &args.templates {
        let candidate = Candidate::from_template(t)?;
        if seen.insert(candidate.template.clone()) {
            candidates.push(candidate);
        }
    }
    if aliases.is_empty() && candidates.is_empty() {
        return Err(ConfigError::NothingToResolve);
    }
    tracing::debug!(
        mirror_sets = sets.len(),
        candidates = candidates.len(),
        "resolve request built"
    );
    Ok(ResolveRequest {
        aliases,
        candidates,
        surah: args.surah,
        api_base: cfg.api_base.clone(),
        filter: args.filter.apply(&cfg.edition_filter),
    })
}

pub(crate) fn sweep_options(cfg: &RecresConfig, args: &ResolveArgs) -> Result<SweepOptions, ConfigError> {
    let timeout = check_timeout_secs("--timeout", args.timeout.unwrap_or(cfg.probe_timeout_secs))?;
    let sweep_timeout = check_timeout_secs(
        "--sweep-timeout",
        args.sweep_timeout.unwrap_or(cfg.sweep_timeout_secs),
    )?;
    let concurrency = nonzero("--concurrency", args.concurrency.unwrap_or(cfg.concurrency))?;
    Ok(SweepOptions {
        concurrency,
        sweep_timeout: Duration::from_secs(sweep_timeout),
        probe: ProbeOptions {
            timeout: Duration::from_secs(timeout),
            follow_redirects: cfg.follow_redirects && !args.no_follow_redirects,
        },
    })
}

fn print_report(report: &ResolveReport) {
    if let Some(err) = &report.lookup_error {
        eprintln!("warning: edition lookup failed: {}", err);
    } else if !report.aliases.is_empty() {
        if report.matched_editions.is_empty() {
            println!("No matching editions for {}.", report.aliases.join(", "));
        } else {
            println!("Matching editions:");
            for e in report.editions() {
                println!("  {} : {}", e.identifier, e.english_name);
            }
        }
    }

    for entry in &report.probes {
        println!("{}", probe_line(&entry.result));
    }
    if !report.skipped.is_empty() {
        println!(
            "Skipped {} candidate(s) on mirrors that already answered.",
            report.skipped.len()
        );
    }
    if report.timed_out {
        println!("Sweep deadline reached; unfinished probes reported as UNREACHABLE.");
    }
    for url in report.working_urls() {
        println!("FOUND: {}", url);
    }
}

pub async fn run_resolve(cfg: &RecresConfig, args: &ResolveArgs) -> Result<i32> {
    let request = build_request(cfg, args)?;
    let opts = sweep_options(cfg, args)?;
    let transport: Arc<dyn Transport> = Arc::new(CurlTransport::new());

    let report = resolve(transport, &request, &opts).await;
    print_report(&report);

    if let Some(path) = &args.output {
        report.write_to(path, args.format)?;
        println!(
            "Saved {} edition(s) and {} URL(s) to {}",
            report.matched_editions.len(),
            report.working_urls().len(),
            path.display()
        );
    }

    if report.found_anything() {
        Ok(EXIT_FOUND)
    } else {
        println!("Nothing found.");
        Ok(EXIT_NOT_FOUND)
    }
}
