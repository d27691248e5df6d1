//! CLI for the recres reciter resolver.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use recres_core::config::{self, ConfigError, RecresConfig};
use recres_core::edition::{EditionFilter, EditionFormat, EditionType};
use recres_core::report::OutputFormat;
use std::path::PathBuf;

use commands::{run_completions, run_inspect, run_list, run_probe, run_resolve};

/// At least one edition matched or one URL answered.
pub const EXIT_FOUND: i32 = 0;
/// Nothing found, or a runtime failure.
pub const EXIT_NOT_FOUND: i32 = 1;
/// Invalid configuration or arguments.
pub const EXIT_USAGE: i32 = 2;

/// Top-level CLI for the recres reciter resolver.
#[derive(Debug, Parser)]
#[command(name = "recres")]
#[command(
    about = "recres: find Quran audio editions and working mirror URLs for a reciter",
    long_about = None
)]
pub struct Cli {
    /// Config file to use instead of ~/.config/recres/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Server-side edition filter flags. Unset flags keep the configured value.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Edition format: audio, text.
    #[arg(long, value_name = "FORMAT")]
    pub edition_format: Option<EditionFormat>,
    /// Edition type: versebyverse, translation, tafsir, quran, transliteration.
    #[arg(long, value_name = "TYPE")]
    pub edition_type: Option<EditionType>,
    /// Language code, e.g. "ar".
    #[arg(long, value_name = "CODE")]
    pub language: Option<String>,
}

impl FilterArgs {
    pub fn apply(&self, base: &EditionFilter) -> EditionFilter {
        EditionFilter {
            format: self.edition_format.or(base.format),
            edition_type: self.edition_type.or(base.edition_type),
            language: self.language.clone().or_else(|| base.language.clone()),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Reciter alias, e.g. "yasser". Repeat or separate with commas.
    #[arg(long = "alias", value_name = "NAME", value_delimiter = ',')]
    pub aliases: Vec<String>,

    /// Surah number used to build probe URLs (1-114).
    #[arg(long, default_value_t = 1)]
    pub surah: u16,

    /// Also write the result to this file.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output file format: text or json.
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Per-request timeout in seconds (overrides config).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Deadline for the whole probe sweep in seconds (overrides config).
    #[arg(long, value_name = "SECS")]
    pub sweep_timeout: Option<u64>,

    /// Maximum probes in flight (overrides config).
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Probe this configured mirror set. Default: sets whose aliases match.
    #[arg(long = "mirror", value_name = "NAME")]
    pub mirrors: Vec<String>,

    /// Extra URL template containing "{n}", e.g. "https://host/slug/{n}.mp3".
    #[arg(long = "template", value_name = "URL")]
    pub templates: Vec<String>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Report 3xx answers as REDIRECT instead of following them.
    #[arg(long)]
    pub no_follow_redirects: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Look up matching editions and probe mirror URLs for a reciter.
    Resolve(ResolveArgs),

    /// List editions (identifier : englishName).
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Also write the listing to this file.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Probe a single URL.
    Probe {
        url: String,
        /// Request timeout in seconds (overrides config).
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Report 3xx answers as REDIRECT instead of following them.
        #[arg(long)]
        no_follow_redirects: bool,
    },

    /// Show the per-ayah audio URLs of one edition.
    Inspect {
        /// Edition identifier, e.g. "ar.yasseraldossari".
        edition: String,
        #[arg(long, default_value_t = 1)]
        surah: u16,
        /// Also save the listing as JSON to this file.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn load_config(cli: &Cli) -> Result<RecresConfig> {
    match &cli.config {
        Some(path) => config::load_from_path(path),
        None => config::load_or_init(),
    }
}

/// Exit code for an error that ended the run.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.chain().any(|e| e.is::<ConfigError>()) {
        EXIT_USAGE
    } else {
        EXIT_NOT_FOUND
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        if let CliCommand::Completions { shell } = &cli.command {
            run_completions(*shell);
            return Ok(EXIT_FOUND);
        }
        let cfg = load_config(&cli)?;
        tracing::debug!("loaded config: {:?}", cfg);

        match &cli.command {
            CliCommand::Resolve(args) => run_resolve(&cfg, args).await,
            CliCommand::List { filter, output } => run_list(&cfg, filter, output.as_deref()).await,
            CliCommand::Probe {
                url,
                timeout,
                no_follow_redirects,
            } => run_probe(&cfg, url, *timeout, *no_follow_redirects).await,
            CliCommand::Inspect {
                edition,
                surah,
                output,
            } => run_inspect(&cfg, edition, *surah, output.as_deref()).await,
            CliCommand::Completions { .. } => Ok(EXIT_FOUND),
        }
    }
}

#[cfg(test)]
mod tests;
