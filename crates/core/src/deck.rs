use crate::{Card, CategoryCatalog, DeckError, RngState, RoundNumber, Theme};
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::debug;

#[derive(Debug, Clone)]
struct DeckFilter {
    round: RoundNumber,
    category: Option<String>,
}

/// Shared themed deck for one game. `used` keeps draw order, most recent last.
#[derive(Debug, Default, Clone)]
pub struct Deck {
    pending: VecDeque<Card>,
    used: Vec<Card>,
    current: Option<Card>,
    personal: HashSet<Card>,
    selected: BTreeSet<String>,
    filter: Option<DeckFilter>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_selected_categories(&mut self, selected: BTreeSet<String>) {
        self.selected = selected;
    }

    pub fn selected_categories(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Replaces the pending cards with up to `count` fresh cards for `round`.
    /// Returns how many cards are now pending.
    pub fn generate(
        &mut self,
        catalog: &CategoryCatalog,
        count: usize,
        category: Option<&str>,
        round: RoundNumber,
        rng: &mut RngState,
    ) -> Result<usize, DeckError> {
        if count == 0 {
            return Err(DeckError::NoCardsAvailable);
        }
        let pool = catalog.eligible_themes(round, category, &self.selected);
        if pool.is_empty() {
            if let Some(name) = category {
                if catalog.themes_in(name).next().is_none() {
                    return Err(DeckError::CategoryNotFound(name.to_string()));
                }
            }
            return Err(DeckError::NoCardsAvailable);
        }

        let mut fresh: Vec<Card> = pool
            .into_iter()
            .map(Card::new)
            .filter(|card| !self.used.contains(card) && !self.personal.contains(card))
            .collect();
        rng.shuffle(&mut fresh);
        fresh.truncate(count);

        self.pending = fresh.into();
        self.filter = Some(DeckFilter {
            round,
            category: category.map(str::to_string),
        });
        debug!(
            round = round.ordinal(),
            category = category.unwrap_or("*"),
            pending = self.pending.len(),
            used = self.used.len(),
            "deck generated"
        );
        Ok(self.pending.len())
    }

    pub fn next_card(&mut self, rng: &mut RngState) -> Result<Card, DeckError> {
        if self.pending.is_empty() {
            self.recycle(rng);
        }
        let card = self.pending.pop_front().ok_or(DeckError::NoCardsAvailable)?;
        self.used.push(card.clone());
        self.current = Some(card.clone());
        Ok(card)
    }

    /// Moves used cards back into the pending pile, holding back the most
    /// recent one so it cannot be drawn next.
    fn recycle(&mut self, rng: &mut RngState) {
        let Some(last) = self.used.pop() else {
            return;
        };
        let (mut recycled, kept): (Vec<Card>, Vec<Card>) = std::mem::take(&mut self.used)
            .into_iter()
            .partition(|card| self.is_recyclable(card));
        rng.shuffle(&mut recycled);
        self.used = kept;
        self.used.push(last);
        debug!(recycled = recycled.len(), "deck recycled");
        self.pending = recycled.into();
    }

    fn is_recyclable(&self, card: &Card) -> bool {
        !self.personal.contains(card) && self.passes_filter(card.theme())
    }

    fn passes_filter(&self, theme: &Theme) -> bool {
        let Some(filter) = &self.filter else {
            return true;
        };
        if theme.is_excluded_from(filter.round) {
            return false;
        }
        match &filter.category {
            Some(name) => theme.in_category(name),
            None => {
                self.selected.is_empty() || self.selected.iter().any(|name| theme.in_category(name))
            }
        }
    }

    /// Draws a theme reserved for one player. It never enters the shared deck.
    pub fn generate_personal_card(
        &mut self,
        catalog: &CategoryCatalog,
        category: &str,
        rng: &mut RngState,
    ) -> Result<Card, DeckError> {
        let mut seen = HashSet::new();
        let in_category: Vec<Card> = catalog
            .themes_in(category)
            .cloned()
            .map(Card::new)
            .filter(|card| seen.insert(card.clone()))
            .collect();
        if in_category.is_empty() {
            return Err(DeckError::CategoryNotFound(category.to_string()));
        }
        let candidates: Vec<Card> = in_category
            .into_iter()
            .filter(|card| !card.theme().is_excluded_from(RoundNumber::Three))
            .filter(|card| !self.personal.contains(card))
            .collect();
        let index = rng
            .pick_index(candidates.len())
            .ok_or(DeckError::NoCardsAvailable)?;
        let card = candidates[index].clone();
        self.personal.insert(card.clone());
        self.pending.retain(|pending| pending != &card);
        Ok(card)
    }

    pub fn is_personal(&self, card: &Card) -> bool {
        self.personal.contains(card)
    }

    pub fn clear_personal_cards(&mut self) {
        self.personal.clear();
    }

    /// True when nothing is pending and recycling would not produce a card.
    pub fn is_exhausted(&self) -> bool {
        if !self.pending.is_empty() {
            return false;
        }
        match self.used.split_last() {
            Some((_, rest)) => !rest.iter().any(|card| self.is_recyclable(card)),
            None => true,
        }
    }

    pub fn reset(&mut self) {
        self.pending.clear();
        self.used.clear();
        self.current = None;
        self.personal.clear();
        self.filter = None;
    }

    pub fn set_current(&mut self, card: Option<Card>) {
        self.current = card;
    }

    pub fn current(&self) -> Option<&Card> {
        self.current.as_ref()
    }

    pub fn pending(&self) -> impl ExactSizeIterator<Item = &Card> + '_ {
        self.pending.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn used(&self) -> &[Card] {
        &self.used
    }
}
