//! Deck construction.
//!
//! `DeckBuilder` turns N generated assets into a `Deck` of 2N cards in a
//! uniformly random order. The order never changes after that; the match
//! engine only flips and matches cards in place.

mod builder;

pub use builder::{Deck, DeckBuilder};
