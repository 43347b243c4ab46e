//! Cards on the board.
//!
//! Every asset becomes two cards, the A and B sides of a pair. Both share
//! the asset (label and image) through an `Arc`, so cloning a deck never
//! copies image data.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::asset::{Asset, ImageRef};

/// Which of the two cards of a pair this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PairSide {
    A,
    B,
}

impl PairSide {
    #[must_use]
    pub const fn suffix(self) -> char {
        match self {
            PairSide::A => 'a',
            PairSide::B => 'b',
        }
    }
}

/// Unique identifier of a card within a deck.
///
/// `pair` is the index of the asset the card was built from. Displayed as
/// `card-<pair>-a` / `card-<pair>-b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId {
    pub pair: u32,
    pub side: PairSide,
}

impl CardId {
    #[must_use]
    pub const fn new(pair: u32, side: PairSide) -> Self {
        Self { pair, side }
    }

    /// The other card of the same pair.
    #[must_use]
    pub const fn partner(self) -> Self {
        let side = match self.side {
            PairSide::A => PairSide::B,
            PairSide::B => PairSide::A,
        };
        Self { pair: self.pair, side }
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "card-{}-{}", self.pair, self.side.suffix())
    }
}

impl std::str::FromStr for CardId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("card-")
            .ok_or_else(|| format!("card id must start with 'card-': {s}"))?;
        let (pair, side) = rest
            .rsplit_once('-')
            .ok_or_else(|| format!("card id missing side: {s}"))?;
        let pair = pair
            .parse::<u32>()
            .map_err(|_| format!("card id has a bad pair index: {s}"))?;
        let side = match side {
            "a" => PairSide::A,
            "b" => PairSide::B,
            _ => return Err(format!("card id side must be 'a' or 'b': {s}")),
        };
        Ok(Self::new(pair, side))
    }
}

/// A card on the board.
///
/// Created face-down and unmatched by the deck builder. Only the match
/// engine flips or matches cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    asset: Arc<Asset>,
    /// Is the image currently showing?
    pub face_up: bool,
    /// Has this card's pair been found?
    pub matched: bool,
}

impl Card {
    #[must_use]
    pub fn new(id: CardId, asset: Arc<Asset>) -> Self {
        Self {
            id,
            asset,
            face_up: false,
            matched: false,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        self.asset.label()
    }

    #[must_use]
    pub fn image(&self) -> &ImageRef {
        self.asset.image()
    }

    #[must_use]
    pub fn asset(&self) -> &Arc<Asset> {
        &self.asset
    }

    /// Can this card be picked right now?
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.face_up && !self.matched
    }
}
