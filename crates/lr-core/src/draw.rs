//! Draw engine: random cards bound to a spread's positions.
//!
//! A draw is a uniformly random k-permutation of the deck, where k is the
//! spread's card count. The i-th sampled card fills the i-th position, so the
//! spread's narrative order is kept end to end.

use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::card::{Card, Deck};
use crate::error::{DeckError, DeckResult};
use crate::spread::{Position, Spread};
use crate::store::Store;

/// A card placed in a position, with its reader note if one was found.
#[derive(Debug, Clone)]
pub struct DrawnCard<'a> {
    /// The position this card fills.
    pub position: &'a Position,
    /// The drawn card.
    pub card: &'a Card,
    /// Reader note attached by annotation.
    pub note: Option<Arc<str>>,
}

/// One realized sampling of a spread. Borrows the store's tables.
#[derive(Debug, Clone)]
pub struct Draw<'a> {
    spread: &'a Spread,
    cards: Vec<DrawnCard<'a>>,
}

impl<'a> Draw<'a> {
    /// Sample `spread.card_count` distinct cards from `deck`.
    pub fn sample<R: Rng + ?Sized>(
        spread: &'a Spread,
        deck: &'a Deck,
        rng: &mut R,
    ) -> DeckResult<Self> {
        let count = spread.card_count;
        if count > deck.len() {
            return Err(DeckError::InsufficientDeck {
                requested: count,
                available: deck.len(),
            });
        }

        let mut pool: Vec<&'a Card> = deck.iter().collect();
        let (picked, _) = pool.partial_shuffle(rng, count);

        let cards = spread
            .positions
            .iter()
            .zip(picked.iter().copied())
            .map(|(position, card)| DrawnCard {
                position,
                card,
                note: None,
            })
            .collect();

        Ok(Self { spread, cards })
    }

    /// The spread this draw was made for.
    pub fn spread(&self) -> &'a Spread {
        self.spread
    }

    /// Drawn cards in position order.
    pub fn cards(&self) -> &[DrawnCard<'a>] {
        &self.cards
    }

    /// Number of drawn cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns true if nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card ids in position order.
    pub fn card_ids(&self) -> Vec<u32> {
        self.cards.iter().map(|drawn| drawn.card.id).collect()
    }

    /// Replace each card's note with the result of `lookup`.
    pub fn with_notes(mut self, mut lookup: impl FnMut(&Card) -> Option<Arc<str>>) -> Self {
        for drawn in &mut self.cards {
            drawn.note = lookup(drawn.card);
        }
        self
    }
}

impl Store {
    /// Draw cards for the spread with the given id.
    ///
    /// Fails with [`DeckError::UnknownSpread`] before any sampling happens if
    /// the id is not in the spread table.
    pub fn draw<R: Rng + ?Sized>(&self, spread_id: &str, rng: &mut R) -> DeckResult<Draw<'_>> {
        let spread = self
            .lookup_spread(spread_id)
            .ok_or_else(|| DeckError::UnknownSpread(spread_id.to_string()))?;
        let draw = Draw::sample(spread, self.deck(), rng)?;
        debug!(spread = spread_id, cards = ?draw.card_ids(), "cards drawn");
        Ok(draw)
    }
}
