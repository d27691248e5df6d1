//! Tests for `resolve` argument parsing.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use recres_core::edition::{EditionFormat, EditionType};
use recres_core::report::OutputFormat;
use std::path::PathBuf;

#[test]
fn cli_parse_resolve_defaults() {
    match parse(&["recres", "resolve", "--alias", "yasser"]) {
        CliCommand::Resolve(args) => {
            assert_eq!(args.aliases, vec!["yasser"]);
            assert_eq!(args.surah, 1);
            assert_eq!(args.format, OutputFormat::Text);
            assert!(args.output.is_none());
            assert!(args.timeout.is_none());
            assert!(args.sweep_timeout.is_none());
            assert!(args.concurrency.is_none());
            assert!(args.mirrors.is_empty());
            assert!(args.templates.is_empty());
            assert!(args.filter.edition_format.is_none());
            assert!(!args.no_follow_redirects);
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_resolve_repeated_and_comma_aliases() {
    match parse(&[
        "recres", "resolve", "--alias", "yasser,dossari", "--alias", "Al-Dossari",
    ]) {
        CliCommand::Resolve(args) => {
            assert_eq!(args.aliases, vec!["yasser", "dossari", "Al-Dossari"]);
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_resolve_all_flags() {
    match parse(&[
        "recres",
        "resolve",
        "--alias",
        "lhdan",
        "--surah",
        "36",
        "--output",
        "out.json",
        "--format",
        "json",
        "--timeout",
        "3",
        "--sweep-timeout",
        "30",
        "--concurrency",
        "4",
        "--mirror",
        "luhaidan",
        "--template",
        "https://server8.mp3quran.net/lhdan/{n}.mp3",
        "--edition-format",
        "audio",
        "--edition-type",
        "versebyverse",
        "--language",
        "ar",
        "--no-follow-redirects",
    ]) {
        CliCommand::Resolve(args) => {
            assert_eq!(args.surah, 36);
            assert_eq!(args.output, Some(PathBuf::from("out.json")));
            assert_eq!(args.format, OutputFormat::Json);
            assert_eq!(args.timeout, Some(3));
            assert_eq!(args.sweep_timeout, Some(30));
            assert_eq!(args.concurrency, Some(4));
            assert_eq!(args.mirrors, vec!["luhaidan"]);
            assert_eq!(
                args.templates,
                vec!["https://server8.mp3quran.net/lhdan/{n}.mp3"]
            );
            assert_eq!(args.filter.edition_format, Some(EditionFormat::Audio));
            assert_eq!(args.filter.edition_type, Some(EditionType::VerseByVerse));
            assert_eq!(args.filter.language.as_deref(), Some("ar"));
            assert!(args.no_follow_redirects);
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_resolve_rejects_bad_values() {
    assert!(Cli::try_parse_from(["recres", "resolve", "--format", "xml"]).is_err());
    assert!(Cli::try_parse_from(["recres", "resolve", "--surah", "abc"]).is_err());
    assert!(Cli::try_parse_from(["recres", "resolve", "--edition-type", "poetry"]).is_err());
}

#[test]
fn cli_parse_global_config_after_subcommand() {
    let cli = Cli::try_parse_from(["recres", "resolve", "--alias", "x", "--config", "/tmp/c.toml"])
        .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
}
