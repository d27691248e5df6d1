//! Edition records as returned by the metadata API, and the server-side filter
//! used to narrow the edition listing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Edition format (`format` field of the API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditionFormat {
    Audio,
    Text,
    #[serde(other)]
    Other,
}

/// Edition type (`type` field of the API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditionType {
    VerseByVerse,
    Translation,
    Tafsir,
    Quran,
    Transliteration,
    #[serde(other)]
    Other,
}

impl EditionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditionFormat::Audio => "audio",
            EditionFormat::Text => "text",
            EditionFormat::Other => "other",
        }
    }
}

impl EditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditionType::VerseByVerse => "versebyverse",
            EditionType::Translation => "translation",
            EditionType::Tafsir => "tafsir",
            EditionType::Quran => "quran",
            EditionType::Transliteration => "transliteration",
            EditionType::Other => "other",
        }
    }
}

impl fmt::Display for EditionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "audio" => Ok(EditionFormat::Audio),
            "text" => Ok(EditionFormat::Text),
            other => Err(format!("unknown edition format '{other}' (expected audio or text)")),
        }
    }
}

impl FromStr for EditionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "versebyverse" => Ok(EditionType::VerseByVerse),
            "translation" => Ok(EditionType::Translation),
            "tafsir" => Ok(EditionType::Tafsir),
            "quran" => Ok(EditionType::Quran),
            "transliteration" => Ok(EditionType::Transliteration),
            other => Err(format!(
                "unknown edition type '{other}' (expected versebyverse, translation, tafsir, quran or transliteration)"
            )),
        }
    }
}

/// One reciter / recitation-style combination exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edition {
    /// Unique within one response, e.g. `ar.yasseraldossari`.
    pub identifier: String,
    /// Native-script name, when the API provides one.
    #[serde(default)]
    pub name: Option<String>,
    pub english_name: String,
    pub language: String,
    pub format: EditionFormat,
    #[serde(rename = "type")]
    pub edition_type: EditionType,
    /// Text direction (`rtl` / `ltr`); null for audio editions.
    #[serde(default)]
    pub direction: Option<String>,
}

/// Server-side filter for the edition listing. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionFilter {
    #[serde(default)]
    pub format: Option<EditionFormat>,
    #[serde(default, rename = "type")]
    pub edition_type: Option<EditionType>,
    #[serde(default)]
    pub language: Option<String>,
}

impl EditionFilter {
    /// Filter for audio editions of any type and language.
    pub fn audio() -> Self {
        Self {
            format: Some(EditionFormat::Audio),
            ..Self::default()
        }
    }

    /// Query parameters in a stable order (format, type, language).
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(format) = self.format {
            pairs.push(("format", format.as_str().to_string()));
        }
        if let Some(edition_type) = self.edition_type {
            pairs.push(("type", edition_type.as_str().to_string()));
        }
        if let Some(language) = self.language.as_deref().map(str::trim) {
            if !language.is_empty() {
                pairs.push(("language", language.to_string()));
            }
        }
        pairs
    }
}
