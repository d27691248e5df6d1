//! Resolution report and its text / JSON renderings.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::candidate::Candidate;
use crate::edition::Edition;
use crate::matching::EditionMatch;
use crate::metadata::LookupError;
use crate::sweep::SweepEntry;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `identifier : englishName` lines, then one working URL per line.
    #[default]
    Text,
    /// Both lists plus every probe outcome.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}' (expected text or json)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Everything one `resolve` run found.
///
/// Editions and working URLs are independent advisory answers: the API may
/// list no edition while a mirror still serves the file, or the reverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
    /// Normalized aliases the run used.
    pub aliases: Vec<String>,
    pub surah: u16,
    pub matched_editions: Vec<EditionMatch>,
    pub lookup_error: Option<LookupError>,
    /// Every probed candidate with its outcome, in candidate order.
    pub probes: Vec<SweepEntry>,
    /// Candidates not probed because their family was already found.
    pub skipped: Vec<Candidate>,
    pub timed_out: bool,
}

/// JSON document written by `--format json`.
#[derive(Serialize)]
struct JsonDump<'a> {
    aliases: &'a [String],
    surah: u16,
    matched_editions: Vec<&'a Edition>,
    working_urls: Vec<&'a str>,
    lookup_error: Option<String>,
    timed_out: bool,
    probes: &'a [SweepEntry],
    skipped: &'a [Candidate],
}

impl ResolveReport {
    /// Entries whose URL answered Found.
    pub fn working(&self) -> impl Iterator<Item = &SweepEntry> {
        self.probes.iter().filter(|e| e.result.is_found())
    }

    /// URLs that answered Found, in candidate order.
    pub fn working_urls(&self) -> Vec<&str> {
        self.working().map(|e| e.result.url.as_str()).collect()
    }

    pub fn editions(&self) -> impl Iterator<Item = &Edition> {
        self.matched_editions.iter().map(|m| &m.edition)
    }

    /// True if at least one edition matched or one URL answered Found.
    pub fn found_anything(&self) -> bool {
        !self.matched_editions.is_empty() || self.working().next().is_some()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for e in self.editions() {
            out.push_str(&format!("{} : {}\n", e.identifier, e.english_name));
        }
        for url in self.working_urls() {
            out.push_str(url);
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        let dump = JsonDump {
            aliases: &self.aliases,
            surah: self.surah,
            matched_editions: self.editions().collect(),
            working_urls: self.working_urls(),
            lookup_error: self.lookup_error.as_ref().map(|e| e.to_string()),
            timed_out: self.timed_out,
            probes: &self.probes,
            skipped: &self.skipped,
        };
        Ok(serde_json::to_string_pretty(&dump)?)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => self.to_json(),
        }
    }

    /// Writes the report to `path` as UTF-8.
    pub fn write_to(&self, path: &Path, format: OutputFormat) -> Result<()> {
        let rendered = self.render(format)?;
        fs::write(path, rendered).with_context(|| format!("write report {}", path.display()))?;
        tracing::info!(path = %path.display(), %format, "report written");
        Ok(())
    }
}

/// `identifier : englishName` lines for an edition listing.
pub fn editions_to_text(editions: &[Edition]) -> String {
    editions
        .iter()
        .map(|e| format!("{} : {}\n", e.identifier, e.english_name))
        .collect()
}
