use crate::schema::{CategoryFile, ThemeEntry};
use anyhow::{bail, Context};
use hotseat_core::{Category, CategoryCatalog, CategorySource, DeckError, Settings, SettingsStore, Theme};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CATEGORY_EXT: &str = "json";
const SETTINGS_ENV: &str = "HOTSEAT_SETTINGS";
const SETTINGS_FILE: &str = ".hotseat_settings.json";

pub fn load_category(path: &Path) -> anyhow::Result<Category> {
    let file: CategoryFile = load_json(path)?;
    if file.category.trim().is_empty() {
        bail!("{} has no category name", path.display());
    }
    Ok(resolve_category(file))
}

/// Fills themes in from their file and drops repeated titles.
fn resolve_category(file: CategoryFile) -> Category {
    let CategoryFile {
        category,
        color,
        themes,
    } = file;
    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(themes.len());
    for entry in themes {
        let title = entry.title.trim();
        if title.is_empty() {
            warn!(%category, "skipping theme without a title");
            continue;
        }
        if !seen.insert(title.to_lowercase()) {
            warn!(%category, title, "skipping duplicate theme");
            continue;
        }
        resolved.push(resolve_theme(&entry, title, &category, &color));
    }
    Category {
        category,
        color,
        themes: resolved,
    }
}

fn resolve_theme(entry: &ThemeEntry, title: &str, category: &str, color: &str) -> Theme {
    let theme_category = entry
        .category
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(category);
    let theme_color = entry
        .color
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(color);
    Theme::new(theme_category, title)
        .with_color(theme_color)
        .excluding(&entry.excluded_rounds)
}

/// Categories stored one per `*.json` file, named after the file stem.
#[derive(Debug, Clone)]
pub struct JsonCategorySource {
    dir: PathBuf,
}

impl JsonCategorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn category_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{CATEGORY_EXT}"))
    }
}

impl CategorySource for JsonCategorySource {
    fn category_names(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %self.dir.display(), %err, "cannot list categories");
                return Vec::new();
            }
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|ext| ext.to_str()) == Some(CATEGORY_EXT)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        names
    }

    fn load_category(&self, name: &str) -> Result<Category, DeckError> {
        load_category(&self.category_path(name)).map_err(|err| DeckError::ResourceLoad {
            name: name.to_string(),
            reason: format!("{err:#}"),
        })
    }
}

/// Loads every readable category under `dir`.
pub fn load_catalog(dir: &Path) -> anyhow::Result<CategoryCatalog> {
    if !dir.is_dir() {
        bail!("category directory {} not found", dir.display());
    }
    let catalog = CategoryCatalog::from_source(&JsonCategorySource::new(dir));
    debug!(
        dir = %dir.display(),
        categories = catalog.categories().len(),
        themes = catalog.theme_count(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Reads settings from `path`. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    load_json(path)
}

/// `HOTSEAT_SETTINGS` if set, else `~/.hotseat_settings.json`.
pub fn default_settings_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(SETTINGS_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(SETTINGS_FILE))
}

/// Settings read from a JSON file each time they are asked for, so edits
/// apply from the next round on.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn settings(&self) -> Settings {
        match load_settings(&self.path) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(path = %self.path.display(), "unreadable settings, using defaults: {err:#}");
                Settings::default()
            }
        }
    }
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
