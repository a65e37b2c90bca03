use crate::{Category, DeckError, RoundNumber, Theme};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Supplies category content by name. Loading may fail per category.
pub trait CategorySource {
    fn category_names(&self) -> Vec<String>;
    fn load_category(&self, name: &str) -> Result<Category, DeckError>;
}

#[derive(Debug, Clone)]
pub struct CategoryEntry {
    pub name: String,
    pub color: String,
    pub themes: Vec<Arc<Theme>>,
}

/// Every theme the deck can draw from, grouped by category.
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    categories: Vec<CategoryEntry>,
}

impl CategoryCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        let mut catalog = Self::default();
        for category in categories {
            catalog.insert(category);
        }
        catalog
    }

    /// Loads every category the source knows about. Categories that fail to
    /// load are logged and left out.
    pub fn from_source(source: &dyn CategorySource) -> Self {
        let mut catalog = Self::default();
        for name in source.category_names() {
            match source.load_category(&name) {
                Ok(category) => catalog.insert(category),
                Err(err) => warn!(category = %name, error = %err, "skipping category"),
            }
        }
        debug!(
            categories = catalog.categories.len(),
            themes = catalog.theme_count(),
            "category catalog loaded"
        );
        catalog
    }

    pub fn insert(&mut self, category: Category) {
        let themes = category.themes.into_iter().map(Arc::new).collect();
        if let Some(existing) = self
            .categories
            .iter_mut()
            .find(|entry| entry.name.eq_ignore_ascii_case(&category.category))
        {
            existing.themes = themes;
            existing.color = category.color;
            return;
        }
        self.categories.push(CategoryEntry {
            name: category.category,
            color: category.color,
            themes,
        });
    }

    pub fn categories(&self) -> &[CategoryEntry] {
        &self.categories
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.theme_count() == 0
    }

    pub fn theme_count(&self) -> usize {
        self.categories.iter().map(|entry| entry.themes.len()).sum()
    }

    pub fn themes(&self) -> impl Iterator<Item = &Arc<Theme>> + '_ {
        self.categories.iter().flat_map(|entry| entry.themes.iter())
    }

    pub fn themes_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Arc<Theme>> + 'a {
        self.themes().filter(move |theme| theme.in_category(category))
    }

    /// Themes playable in `round` under an optional explicit category, or the
    /// selected set when no category is given. Each (category, title) appears
    /// once even when several files supply it.
    pub fn eligible_themes(
        &self,
        round: RoundNumber,
        category: Option<&str>,
        selected: &BTreeSet<String>,
    ) -> Vec<Arc<Theme>> {
        let mut seen = HashSet::new();
        self.themes()
            .filter(|theme| !theme.is_excluded_from(round))
            .filter(|theme| match category {
                Some(name) => theme.in_category(name),
                None => {
                    selected.is_empty()
                        || selected.iter().any(|name| theme.in_category(name))
                }
            })
            .filter(|theme| seen.insert((theme.category.clone(), theme.title.clone())))
            .cloned()
            .collect()
    }
}
