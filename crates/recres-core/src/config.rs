use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::candidate::MirrorSet;
use crate::edition::EditionFilter;
use crate::metadata::DEFAULT_API_BASE;

/// Invalid configuration or command-line values. The CLI maps this to exit code 2.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {message}")]
    Read { path: String, message: String },
    #[error("cannot parse {path}: {message}")]
    Parse { path: String, message: String },
    #[error("api_base '{0}' is not a valid URL")]
    InvalidApiBase(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("{name} must be at most {max}")]
    TooLarge { name: &'static str, max: u64 },
    #[error("mirror set '{set}': base '{base}' is not a valid URL")]
    InvalidMirrorBase { set: String, base: String },
    #[error("mirror set '{0}' has no bases or no slugs")]
    EmptyMirrorSet(String),
    #[error("surah {0} is out of range (1-114)")]
    InvalidSurah(u16),
    #[error("unknown mirror set '{0}'")]
    UnknownMirrorSet(String),
    #[error(transparent)]
    Template(#[from] crate::candidate::TemplateError),
    #[error("nothing to resolve: give at least one alias or template")]
    NothingToResolve,
}

/// Upper bound for every timeout setting, in seconds (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Accepts a timeout in seconds within `1..=MAX_TIMEOUT_SECS`.
pub fn check_timeout_secs(name: &'static str, secs: u64) -> Result<u64, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Zero(name));
    }
    if secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::TooLarge {
            name,
            max: MAX_TIMEOUT_SECS,
        });
    }
    Ok(secs)
}

/// Global configuration loaded from `~/.config/recres/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecresConfig {
    /// Metadata API base, e.g. "https://api.alquran.cloud/v1".
    pub api_base: String,
    /// Timeout of each HTTP request, in seconds.
    pub probe_timeout_secs: u64,
    /// Deadline for a whole probe sweep, in seconds.
    pub sweep_timeout_secs: u64,
    /// Maximum probes in flight at once.
    pub concurrency: usize,
    /// Follow one redirect hop when a mirror answers 3xx.
    #[serde(default = "default_true")]
    pub follow_redirects: bool,
    /// Server-side filter for the edition listing used by `resolve`.
    #[serde(default = "EditionFilter::audio")]
    pub edition_filter: EditionFilter,
    /// Known mirrors per reciter.
    #[serde(default)]
    pub mirrors: Vec<MirrorSet>,
}

fn default_true() -> bool {
    true
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Mirror sets seeded into a fresh config.
pub fn default_mirrors() -> Vec<MirrorSet> {
    vec![
        MirrorSet {
            name: "luhaidan".to_string(),
            aliases: strings(&["luhaidan", "lhdan", "muhammadalluhaidan"]),
            bases: strings(&[
                "https://server6.mp3quran.net",
                "https://server8.mp3quran.net",
                "https://server9.mp3quran.net",
                "https://server10.mp3quran.net",
                "https://server11.mp3quran.net",
                "https://server12.mp3quran.net",
                "https://download.quranicaudio.com/quran",
            ]),
            slugs: strings(&[
                "lhdan",
                "luhdan",
                "al_luhaidan",
                "muhammad_al_luhaidan",
                "moh_alahidan",
            ]),
        },
        MirrorSet {
            name: "yasser".to_string(),
            aliases: strings(&["yasser", "dossari", "dosari", "dussary"]),
            bases: strings(&[
                "https://server11.mp3quran.net",
                "https://download.quranicaudio.com/quran",
            ]),
            slugs: strings(&["yasser", "yasser_ad-dussary"]),
        },
        MirrorSet {
            name: "binhameed".to_string(),
            aliases: strings(&["talib", "binhameed", "ahmedtalib"]),
            bases: strings(&["https://server16.mp3quran.net"]),
            slugs: strings(&["a_binhameed/Rewayat-Hafs-A-n-Assem"]),
        },
    ]
}

impl Default for RecresConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            probe_timeout_secs: 5,
            sweep_timeout_secs: 60,
            concurrency: 8,
            follow_redirects: true,
            edition_filter: EditionFilter::audio(),
            mirrors: default_mirrors(),
        }
    }
}

impl RecresConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn sweep_timeout(&self) -> Duration {
        Duration::from_secs(self.sweep_timeout_secs)
    }

    /// Looks up a mirror set by name (case-insensitive).
    pub fn mirror_set(&self, name: &str) -> Option<&MirrorSet> {
        self.mirrors
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Rejects values that would make every run fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if url::Url::parse(&self.api_base).is_err() {
            return Err(ConfigError::InvalidApiBase(self.api_base.clone()));
        }
        check_timeout_secs("probe_timeout_secs", self.probe_timeout_secs)?;
        check_timeout_secs("sweep_timeout_secs", self.sweep_timeout_secs)?;
        if self.concurrency == 0 {
            return Err(ConfigError::Zero("concurrency"));
        }
        for set in &self.mirrors {
            if set.bases.is_empty() || set.slugs.is_empty() {
                return Err(ConfigError::EmptyMirrorSet(set.name.clone()));
            }
            for base in &set.bases {
                if url::Url::parse(base.trim()).is_err() {
                    return Err(ConfigError::InvalidMirrorBase {
                        set: set.name.clone(),
                        base: base.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("recres")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load and validate configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<RecresConfig> {
    let data = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let cfg: RecresConfig = toml::from_str(&data).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RecresConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RecresConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}
