//! The match engine: selection, pair evaluation, and progress.
//!
//! The engine is synchronous and owns the deck. Work that must happen later
//! (flipping a mismatch back, declaring the win) is returned to the caller as
//! a [`Deferred`] request; the session schedules it and calls back into the
//! engine when it fires.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::cards::CardId;
use crate::deck::Deck;

/// Face-up cards awaiting evaluation (0, 1 or 2 entries).
pub type PendingSelection = SmallVec<[CardId; 2]>;

/// Pairs found so far versus pairs on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchProgress {
    pub matched_pairs: u32,
    pub total_pairs: u32,
}

impl MatchProgress {
    #[must_use]
    pub fn new(total_pairs: u32) -> Self {
        Self {
            matched_pairs: 0,
            total_pairs,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_pairs > 0 && self.matched_pairs == self.total_pairs
    }
}

impl std::fmt::Display for MatchProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.matched_pairs, self.total_pairs)
    }
}

/// Why a selection was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Two cards are already face-up awaiting the reveal hold.
    SelectionFull,
    /// The card is the one already pending.
    AlreadyPending,
    AlreadyFaceUp,
    AlreadyMatched,
    UnknownCard,
    /// No game is in progress.
    NotPlaying,
}

/// Result of a single `select` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// State unchanged.
    Rejected(RejectReason),
    /// First card of a pair turned face-up.
    Flipped(CardId),
    /// The two pending cards share a label.
    Matched {
        label: String,
        progress: MatchProgress,
    },
    /// The two pending cards differ; they stay face-up until the reveal hold ends.
    Mismatched { first: CardId, second: CardId },
}

impl SelectOutcome {
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, SelectOutcome::Rejected(_))
    }
}

/// Deferred work requested by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Flip a mismatched pair back after the reveal hold.
    RevealHold { first: CardId, second: CardId },
    /// Declare the session finished after the win delay.
    Finish,
}

/// Tracks flipped and matched cards for one deck.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    deck: Deck,
    pending: PendingSelection,
    progress: MatchProgress,
    finish_requested: bool,
}

impl MatchEngine {
    /// Start matching on a freshly built deck.
    #[must_use]
    pub fn new(deck: Deck) -> Self {
        let total_pairs = deck.pair_count() as u32;
        Self {
            deck,
            pending: PendingSelection::new(),
            progress: MatchProgress::new(total_pairs),
            finish_requested: false,
        }
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn pending(&self) -> &[CardId] {
        &self.pending
    }

    #[must_use]
    pub fn progress(&self) -> MatchProgress {
        self.progress
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress.is_complete()
    }

    /// Pick a card.
    ///
    /// Returns the outcome plus any deferred work the caller must schedule.
    pub fn select(&mut self, id: CardId) -> (SelectOutcome, Option<Deferred>) {
        if let Some(reason) = self.rejection(id) {
            debug!(card = %id, ?reason, "selection rejected");
            return (SelectOutcome::Rejected(reason), None);
        }

        if let Some(card) = self.deck.get_mut(id) {
            card.face_up = true;
        }
        self.pending.push(id);

        if self.pending.len() < 2 {
            return (SelectOutcome::Flipped(id), None);
        }

        let (first, second) = (self.pending[0], self.pending[1]);
        match (self.label_of(first), self.label_of(second)) {
            (Some(label), Some(other)) if label == other => {
                (self.resolve_match(label), self.request_finish())
            }
            _ => {
                debug!(%first, %second, "mismatch");
                (
                    SelectOutcome::Mismatched { first, second },
                    Some(Deferred::RevealHold { first, second }),
                )
            }
        }
    }

    /// End a reveal hold: flip the mismatched pair back and clear the selection.
    ///
    /// Ignored unless `first` and `second` are exactly the pending pair.
    pub fn end_reveal_hold(&mut self, first: CardId, second: CardId) -> bool {
        if self.pending.as_slice() != &[first, second][..] {
            return false;
        }
        for id in [first, second] {
            if let Some(card) = self.deck.get_mut(id) {
                if !card.matched {
                    card.face_up = false;
                }
            }
        }
        self.pending.clear();
        true
    }

    fn rejection(&self, id: CardId) -> Option<RejectReason> {
        if self.pending.len() >= 2 {
            return Some(RejectReason::SelectionFull);
        }
        if self.pending.contains(&id) {
            return Some(RejectReason::AlreadyPending);
        }
        let card = match self.deck.get(id) {
            Some(card) => card,
            None => return Some(RejectReason::UnknownCard),
        };
        if card.matched {
            return Some(RejectReason::AlreadyMatched);
        }
        if card.face_up {
            return Some(RejectReason::AlreadyFaceUp);
        }
        None
    }

    fn label_of(&self, id: CardId) -> Option<String> {
        self.deck.get(id).map(|card| card.label().to_string())
    }

    fn resolve_match(&mut self, label: String) -> SelectOutcome {
        for card in self.deck.iter_mut() {
            if card.label() == label {
                card.matched = true;
                card.face_up = true;
            }
        }
        self.pending.clear();
        self.progress.matched_pairs = (self.progress.matched_pairs + 1).min(self.progress.total_pairs);
        debug!(%label, progress = %self.progress, "pair matched");

        SelectOutcome::Matched {
            label,
            progress: self.progress,
        }
    }

    fn request_finish(&mut self) -> Option<Deferred> {
        if self.progress.is_complete() && !self.finish_requested {
            self.finish_requested = true;
            Some(Deferred::Finish)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Asset, ImageRef, PairSide};
    use crate::core::GameRng;
    use crate::deck::DeckBuilder;

    fn engine(labels: &[&str]) -> MatchEngine {
        let assets = labels
            .iter()
            .map(|l| Asset::new(*l, ImageRef::Url(format!("https://example.test/{l}"))))
            .collect();
        let deck = DeckBuilder::new(GameRng::new(42)).build(assets).unwrap();
        MatchEngine::new(deck)
    }

    fn a(pair: u32) -> CardId {
        CardId::new(pair, PairSide::A)
    }

    fn b(pair: u32) -> CardId {
        CardId::new(pair, PairSide::B)
    }

    #[test]
    fn test_first_selection_flips() {
        let mut engine = engine(&["Tree", "Boat"]);
        let (outcome, deferred) = engine.select(a(0));

        assert_eq!(outcome, SelectOutcome::Flipped(a(0)));
        assert!(deferred.is_none());
        assert!(engine.deck().get(a(0)).unwrap().face_up);
        assert_eq!(engine.pending(), &[a(0)]);
    }

    #[test]
    fn test_match_clears_pending_synchronously() {
        let mut engine = engine(&["Tree", "Boat"]);
        engine.select(a(0));
        let (outcome, deferred) = engine.select(b(0));

        assert_eq!(
            outcome,
            SelectOutcome::Matched {
                label: "Tree".into(),
                progress: MatchProgress {
                    matched_pairs: 1,
                    total_pairs: 2
                },
            }
        );
        assert!(deferred.is_none());
        assert!(engine.pending().is_empty());
        assert!(engine.deck().get(a(0)).unwrap().matched);
        assert!(engine.deck().get(b(0)).unwrap().matched);

        // Next selection is legal immediately
        assert_eq!(engine.select(a(1)).0, SelectOutcome::Flipped(a(1)));
    }

    #[test]
    fn test_mismatch_requests_reveal_hold() {
        let mut engine = engine(&["Tree", "Boat"]);
        engine.select(a(0));
        let (outcome, deferred) = engine.select(a(1));

        assert_eq!(outcome, SelectOutcome::Mismatched { first: a(0), second: a(1) });
        assert_eq!(deferred, Some(Deferred::RevealHold { first: a(0), second: a(1) }));
        assert!(engine.deck().get(a(0)).unwrap().face_up);
        assert!(engine.deck().get(a(1)).unwrap().face_up);
        assert_eq!(engine.progress().matched_pairs, 0);
    }

    #[test]
    fn test_third_selection_rejected_during_hold() {
        let mut engine = engine(&["Tree", "Boat", "Lamp"]);
        engine.select(a(0));
        engine.select(a(1));

        let before = engine.deck().clone();
        let (outcome, deferred) = engine.select(a(2));

        assert_eq!(outcome, SelectOutcome::Rejected(RejectReason::SelectionFull));
        assert!(deferred.is_none());
        assert_eq!(engine.pending(), &[a(0), a(1)]);
        assert!(engine.deck().cards().eq(before.cards()));
    }

    #[test]
    fn test_end_reveal_hold_flips_back() {
        let mut engine = engine(&["Tree", "Boat"]);
        engine.select(a(0));
        engine.select(a(1));

        assert!(engine.end_reveal_hold(a(0), a(1)));
        assert!(!engine.deck().get(a(0)).unwrap().face_up);
        assert!(!engine.deck().get(a(1)).unwrap().face_up);
        assert!(engine.pending().is_empty());

        // A second delivery of the same hold is ignored
        assert!(!engine.end_reveal_hold(a(0), a(1)));
    }

    #[test]
    fn test_duplicate_selection_rejected() {
        let mut engine = engine(&["Tree", "Boat"]);
        engine.select(a(0));
        assert_eq!(
            engine.select(a(0)).0,
            SelectOutcome::Rejected(RejectReason::AlreadyPending)
        );
        assert_eq!(engine.pending(), &[a(0)]);
    }

    #[test]
    fn test_matched_and_unknown_cards_rejected() {
        let mut engine = engine(&["Tree", "Boat"]);
        engine.select(a(0));
        engine.select(b(0));

        assert_eq!(
            engine.select(a(0)).0,
            SelectOutcome::Rejected(RejectReason::AlreadyMatched)
        );
        assert_eq!(
            engine.select(a(7)).0,
            SelectOutcome::Rejected(RejectReason::UnknownCard)
        );
    }

    #[test]
    fn test_last_match_requests_finish_once() {
        let mut engine = engine(&["Tree", "Boat"]);
        engine.select(a(0));
        assert!(engine.select(b(0)).1.is_none());
        engine.select(a(1));
        let (_, deferred) = engine.select(b(1));

        assert_eq!(deferred, Some(Deferred::Finish));
        assert!(engine.is_complete());
        assert!(engine.deck().all_matched());
        assert_eq!(engine.progress().to_string(), "2 / 2");
    }
}
