//! Alias matching of editions.
//!
//! Reciter names are transliterated differently across sources
//! ("Al-Dossari", "aldosari", "ad-dussary"), so matching is a substring test on
//! normalized text rather than equality on identifiers.

use serde::Serialize;

use crate::edition::Edition;

/// Which edition field an alias matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    /// Alias found in the identifier (preferred).
    Identifier,
    /// Alias found only in the English display name.
    EnglishName,
}

/// An edition selected by alias, with the reason it was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditionMatch {
    pub edition: Edition,
    pub field: MatchField,
    /// The normalized alias token that matched.
    pub alias: String,
}

/// Lowercases and drops every non-alphanumeric character.
///
/// `"Yasser Al-Dossari"` becomes `"yasseraldossari"`.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalizes alias tokens, dropping ones that normalize to nothing and duplicates.
pub fn normalize_aliases<S: AsRef<str>>(aliases: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for alias in aliases {
        let n = normalize(alias.as_ref());
        if !n.is_empty() && !out.contains(&n) {
            out.push(n);
        }
    }
    out
}

/// Returns the field an alias set matches on, if any. Identifier wins over display name.
pub fn match_field(edition: &Edition, aliases: &[String]) -> Option<(MatchField, String)> {
    let id = normalize(&edition.identifier);
    if let Some(a) = aliases.iter().find(|a| id.contains(a.as_str())) {
        return Some((MatchField::Identifier, a.clone()));
    }
    let name = normalize(&edition.english_name);
    aliases
        .iter()
        .find(|a| name.contains(a.as_str()))
        .map(|a| (MatchField::EnglishName, a.clone()))
}

/// Selects every edition whose identifier or English name contains one of `aliases`.
///
/// Identifier matches come first, then display-name matches; input order is kept
/// within each group.
pub fn match_editions<S: AsRef<str>>(editions: &[Edition], aliases: &[S]) -> Vec<EditionMatch> {
    let aliases = normalize_aliases(aliases);
    if aliases.is_empty() {
        return Vec::new();
    }
    let mut matches: Vec<EditionMatch> = editions
        .iter()
        .filter_map(|e| {
            match_field(e, &aliases).map(|(field, alias)| EditionMatch {
                edition: e.clone(),
                field,
                alias,
            })
        })
        .collect();
    // Stable sort keeps API order inside each rank.
    matches.sort_by_key(|m| m.field);
    matches
}
