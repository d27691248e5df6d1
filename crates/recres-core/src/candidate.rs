//! Candidate mirror URLs.
//!
//! A [`MirrorSet`] (config data) names a reciter's known mirror bases and slug
//! guesses. Expanding it yields one [`Candidate`] per base × slug, each a URL
//! template with a `{n}` surah placeholder. Candidates sharing a base form a
//! mirror family: the sweep stops probing a family once one of them is found.

use serde::{Deserialize, Serialize};

/// Surah number placeholder in templates.
pub const SURAH_PLACEHOLDER: &str = "{n}";

/// Number of surahs; valid surah numbers are `1..=SURAH_COUNT`.
pub const SURAH_COUNT: u16 = 114;

/// Known mirrors and slug guesses for one reciter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorSet {
    /// Short label, e.g. "luhaidan".
    pub name: String,
    /// Alias tokens that select this set in `resolve` (matched like edition aliases).
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Mirror bases in probe order, e.g. "https://server8.mp3quran.net".
    pub bases: Vec<String>,
    /// Slug variants in probe order, e.g. "lhdan".
    pub slugs: Vec<String>,
}

/// One URL template to probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate {
    /// Early-stop group (the mirror base, or the origin of an explicit template).
    pub family: String,
    /// Template containing `{n}`.
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template '{0}' has no {{n}} placeholder")]
    MissingPlaceholder(String),
    #[error("template '{0}' is not a valid URL: {1}")]
    InvalidUrl(String, String),
}

/// Zero-padded three-digit surah path component: 1 -> "001".
pub fn surah_component(surah: u16) -> String {
    format!("{:03}", surah)
}

pub fn is_valid_surah(surah: u16) -> bool {
    (1..=SURAH_COUNT).contains(&surah)
}

impl Candidate {
    /// Builds a candidate from an explicit template; its family is the URL origin.
    pub fn from_template(template: &str) -> Result<Self, TemplateError> {
        let template = template.trim();
        if !template.contains(SURAH_PLACEHOLDER) {
            return Err(TemplateError::MissingPlaceholder(template.to_string()));
        }
        let sample = template.replace(SURAH_PLACEHOLDER, &surah_component(1));
        let parsed = url::Url::parse(&sample)
            .map_err(|e| TemplateError::InvalidUrl(template.to_string(), e.to_string()))?;
        if parsed.host_str().is_none() {
            return Err(TemplateError::InvalidUrl(
                template.to_string(),
                "missing host".to_string(),
            ));
        }
        Ok(Self {
            family: parsed.origin().ascii_serialization(),
            template: template.to_string(),
        })
    }

    /// Concrete URL for `surah`.
    pub fn render(&self, surah: u16) -> String {
        self.template.replace(SURAH_PLACEHOLDER, &surah_component(surah))
    }
}

impl MirrorSet {
    /// Base-major cross product: every slug of the first base, then the next base.
    pub fn candidates(&self) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(self.bases.len() * self.slugs.len());
        for base in &self.bases {
            let base = base.trim().trim_end_matches('/');
            for slug in &self.slugs {
                let slug = slug.trim().trim_matches('/');
                out.push(Candidate {
                    family: base.to_string(),
                    template: format!("{}/{}/{}.mp3", base, slug, SURAH_PLACEHOLDER),
                });
            }
        }
        out
    }

    /// True if any alias token (normalized) appears in this set's name or aliases.
    pub fn matches_aliases(&self, aliases: &[String]) -> bool {
        let own: Vec<String> = std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .map(|s| crate::matching::normalize(s))
            .filter(|s| !s.is_empty())
            .collect();
        aliases
            .iter()
            .any(|a| own.iter().any(|o| o.contains(a.as_str()) || a.contains(o.as_str())))
    }
}

/// Expands mirror sets into candidates, dropping duplicate templates (first wins).
pub fn expand(sets: &[MirrorSet]) -> Vec<Candidate> {
    let mut seen = std::collections::HashSet::new();
    sets.iter()
        .flat_map(MirrorSet::candidates)
        .filter(|c| seen.insert(c.template.clone()))
        .collect()
}
