//! Wire shapes of the metadata API.

use serde::Deserialize;

/// Every API response wraps its payload in `{code, status, data}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SurahDto {
    pub number: u16,
    #[serde(default)]
    pub english_name: Option<String>,
    pub ayahs: Vec<AyahDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AyahDto {
    pub number_in_surah: u32,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub audio_secondary: Option<Vec<String>>,
}
