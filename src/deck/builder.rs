//! Deck construction: two cards per asset, uniformly shuffled.

use std::sync::Arc;

use im::{HashMap as ImHashMap, Vector};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::{Asset, Card, CardId, PairSide};
use crate::core::{GameRng, MatchError};

/// An ordered, shuffled board of cards.
///
/// Uses `im` persistent structures so snapshots handed to presentation are
/// O(1) to clone. Order is fixed once built; only card flags change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
    positions: ImHashMap<CardId, usize>,
}

impl Deck {
    fn from_cards(cards: Vec<Card>) -> Self {
        let positions = cards
            .iter()
            .enumerate()
            .map(|(position, card)| (card.id, position))
            .collect();
        Self {
            cards: cards.into_iter().collect(),
            positions,
        }
    }

    /// Number of cards (twice the pair count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// Iterate cards in board order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Card at a board position.
    #[must_use]
    pub fn at(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.position(id).and_then(|position| self.cards.get(position))
    }

    /// Board position of a card.
    #[must_use]
    pub fn position(&self, id: CardId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub(crate) fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        let position = self.position(id)?;
        self.cards.get_mut(position)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.cards.iter_mut()
    }

    /// One card per asset (the A side), in board order.
    pub fn unique_half(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|card| card.id.side == PairSide::A)
    }

    /// Have all pairs been found?
    #[must_use]
    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(|card| card.matched)
    }
}

/// Builds shuffled decks from generated assets.
#[derive(Clone, Debug)]
pub struct DeckBuilder {
    rng: GameRng,
}

impl DeckBuilder {
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }

    /// Turn N assets into a shuffled deck of 2N face-down cards.
    ///
    /// Asset `i` becomes `card-i-a` and `card-i-b`. Fails if there are no
    /// assets or two assets share a label, since pairs are matched by label.
    pub fn build(&mut self, assets: Vec<Asset>) -> Result<Deck, MatchError> {
        if assets.is_empty() {
            return Err(MatchError::InvalidConfiguration(
                "cannot build a deck from zero assets".to_string(),
            ));
        }

        let mut seen = FxHashSet::default();
        for asset in &assets {
            if !seen.insert(asset.label()) {
                return Err(MatchError::InvalidConfiguration(format!(
                    "duplicate label '{}'",
                    asset.label()
                )));
            }
        }

        let mut cards = Vec::with_capacity(assets.len() * 2);
        for (pair, asset) in assets.into_iter().enumerate() {
            let asset = Arc::new(asset);
            let pair = pair as u32;
            cards.push(Card::new(CardId::new(pair, PairSide::A), Arc::clone(&asset)));
            cards.push(Card::new(CardId::new(pair, PairSide::B), asset));
        }

        self.rng.shuffle(&mut cards);
        debug!(cards = cards.len(), "deck built");

        Ok(Deck::from_cards(cards))
    }
}
