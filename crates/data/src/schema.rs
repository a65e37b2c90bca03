use serde::{Deserialize, Serialize};

pub use hotseat_core::{Category, Settings, Theme};

/// One category file as written on disk. Themes may leave out the fields
/// they share with the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFile {
    pub category: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub themes: Vec<ThemeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeEntry {
    #[serde(default)]
    pub category: Option<String>,
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, rename = "excludedRounds")]
    pub excluded_rounds: Vec<u8>,
}
