//! Process-wide reference data: the deck and the spread table.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::card::Deck;
use crate::error::{DeckError, DeckResult};
use crate::spread::{Spread, SpreadTable};

/// Read-only card and spread tables, loaded once at startup.
///
/// A store either loads completely or not at all, so a `Store` value is
/// always safe to serve requests from.
#[derive(Debug, Clone)]
pub struct Store {
    deck: Deck,
    spreads: SpreadTable,
}

impl Store {
    /// Assemble a store from already-built tables.
    pub fn new(deck: Deck, spreads: SpreadTable) -> Self {
        Self { deck, spreads }
    }

    /// Load `cards.json` and `spreads.json` from disk.
    pub fn load(cards_path: &Path, spreads_path: &Path) -> DeckResult<Self> {
        let cards = read(cards_path)?;
        let spreads = read(spreads_path)?;
        let store = Self::from_json(&cards, &spreads)?;
        debug!(
            cards = store.deck.len(),
            spreads = store.spreads.len(),
            "reference data loaded"
        );
        Ok(store)
    }

    /// Parse both tables from JSON text.
    pub fn from_json(cards: &str, spreads: &str) -> DeckResult<Self> {
        Ok(Self::new(Deck::from_json(cards)?, SpreadTable::from_json(spreads)?))
    }

    /// The full deck.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Iterate over spreads in id order.
    pub fn spreads(&self) -> impl Iterator<Item = &Spread> {
        self.spreads.iter()
    }

    /// Look up a spread by id.
    pub fn lookup_spread(&self, id: &str) -> Option<&Spread> {
        self.spreads.get(id)
    }
}

fn read(path: &Path) -> DeckResult<String> {
    fs::read_to_string(path).map_err(|source| DeckError::Io {
        path: path.to_path_buf(),
        source,
    })
}
