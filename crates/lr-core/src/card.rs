//! Cards and the deck they are drawn from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entries::Entries;
use crate::error::{DeckError, DeckResult};

/// A single card definition.
///
/// The id is taken from the key the card is stored under in `cards.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique card number (1-36 for a Lenormand deck).
    #[serde(skip_deserializing)]
    pub id: u32,
    /// English name, also the key for note lookup.
    pub name_en: String,
    /// Korean name.
    pub name_ko: String,
    /// English meaning, may be empty.
    #[serde(default)]
    pub meaning_en: String,
    /// Korean meaning, may be empty.
    #[serde(default)]
    pub meaning_ko: String,
    /// English keywords in order of importance.
    #[serde(default)]
    pub keywords_en: Vec<String>,
    /// Korean keywords in order of importance.
    #[serde(default)]
    pub keywords_ko: Vec<String>,
}

impl Card {
    /// Create a card with names only.
    pub fn new(id: u32, name_en: impl Into<String>, name_ko: impl Into<String>) -> Self {
        Self {
            id,
            name_en: name_en.into(),
            name_ko: name_ko.into(),
            meaning_en: String::new(),
            meaning_ko: String::new(),
            keywords_en: Vec::new(),
            keywords_ko: Vec::new(),
        }
    }

    /// Set both meanings.
    pub fn with_meaning(mut self, en: impl Into<String>, ko: impl Into<String>) -> Self {
        self.meaning_en = en.into();
        self.meaning_ko = ko.into();
        self
    }
}

/// The full deck, keyed and ordered by card id.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: BTreeMap<u32, Card>,
}

impl Deck {
    /// Build a deck, rejecting repeated ids and an empty card list.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> DeckResult<Self> {
        let mut map = BTreeMap::new();
        for card in cards {
            let id = card.id;
            if map.insert(id, card).is_some() {
                return Err(DeckError::Configuration(format!("duplicate card id {id}")));
            }
        }
        if map.is_empty() {
            return Err(DeckError::Configuration("deck is empty".to_string()));
        }
        Ok(Self { cards: map })
    }

    /// Parse the `cards.json` format: an object keyed by decimal card id.
    pub fn from_json(json: &str) -> DeckResult<Self> {
        let entries: Entries<Card> =
            serde_json::from_str(json).map_err(|source| DeckError::Json {
                table: "cards",
                source,
            })?;

        let cards = entries
            .0
            .into_iter()
            .map(|(key, mut card)| {
                card.id = key.trim().parse().map_err(|_| {
                    DeckError::Configuration(format!("card key \"{key}\" is not a card number"))
                })?;
                Ok(card)
            })
            .collect::<DeckResult<Vec<_>>>()?;

        Self::from_cards(cards)
    }

    /// Number of cards in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns true if the deck has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look up a card by id.
    pub fn get(&self, id: u32) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Iterate over cards in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }
}
