use crate::RoundNumber;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Something a player has to describe, name or guess.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Theme {
    pub category: String,
    pub title: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, rename = "excludedRounds")]
    pub excluded_rounds: Vec<u8>,
}

impl Theme {
    pub fn new(category: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            title: title.into(),
            color: String::new(),
            excluded_rounds: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn excluding(mut self, rounds: &[u8]) -> Self {
        self.excluded_rounds = rounds.to_vec();
        self
    }

    pub fn is_excluded_from(&self, round: RoundNumber) -> bool {
        self.excluded_rounds.contains(&round.ordinal())
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }

    /// Identity used for card equality, case-sensitive on both parts.
    pub fn key(&self) -> (&str, &str) {
        (&self.category, &self.title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub category: String,
    #[serde(default)]
    pub color: String,
    pub themes: Vec<Theme>,
}

/// A drawn card. Cards share their theme and compare by (category, title).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    theme: Arc<Theme>,
}

impl Card {
    pub fn new(theme: Arc<Theme>) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn title(&self) -> &str {
        &self.theme.title
    }

    pub fn category(&self) -> &str {
        &self.theme.category
    }

    pub fn color(&self) -> &str {
        &self.theme.color
    }
}

impl From<Theme> for Card {
    fn from(theme: Theme) -> Self {
        Self::new(Arc::new(theme))
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.theme.key() == other.theme.key()
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.theme.key().hash(state);
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.theme.title, self.theme.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_compare_by_category_and_title() {
        let a = Card::from(Theme::new("Animals", "Cat").with_color("red"));
        let b = Card::from(Theme::new("Animals", "Cat").excluding(&[3]));
        let c = Card::from(Theme::new("Movies", "Cat"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn exclusion_uses_round_ordinal() {
        let theme = Theme::new("Animals", "Cat").excluding(&[2]);
        assert!(theme.is_excluded_from(RoundNumber::Two));
        assert!(!theme.is_excluded_from(RoundNumber::Three));
    }
}
