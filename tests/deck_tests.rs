//! Deck and match engine invariants.
//!
//! Property tests over arbitrary pair counts and seeds, plus a statistical
//! check that the shuffle places cards uniformly.

use std::collections::HashMap;

use proptest::prelude::*;

use mindmatch::{
    Asset, CardId, DeckBuilder, GameRng, ImageRef, MatchEngine, PairSide, RejectReason,
    SelectOutcome,
};

fn assets(n: usize) -> Vec<Asset> {
    (0..n)
        .map(|i| Asset::new(format!("Label {i}"), ImageRef::Url(format!("https://example.test/{i}"))))
        .collect()
}

proptest! {
    /// N assets always give 2N face-down cards with every label exactly twice.
    #[test]
    fn prop_deck_shape(n in 1usize..40, seed in any::<u64>()) {
        let deck = DeckBuilder::new(GameRng::new(seed)).build(assets(n)).unwrap();

        prop_assert_eq!(deck.len(), 2 * n);
        prop_assert_eq!(deck.pair_count(), n);

        let mut labels: HashMap<&str, usize> = HashMap::new();
        for card in deck.cards() {
            *labels.entry(card.label()).or_default() += 1;
            prop_assert!(!card.face_up && !card.matched);
        }
        prop_assert_eq!(labels.len(), n);
        prop_assert!(labels.values().all(|&count| count == 2));
    }

    /// The shuffle is a permutation of the unshuffled ids.
    #[test]
    fn prop_shuffle_is_permutation(n in 1usize..40, seed in any::<u64>()) {
        let deck = DeckBuilder::new(GameRng::new(seed)).build(assets(n)).unwrap();

        let mut ids: Vec<CardId> = deck.cards().map(|card| card.id).collect();
        ids.sort();
        let expected: Vec<CardId> = (0..n as u32)
            .flat_map(|pair| [CardId::new(pair, PairSide::A), CardId::new(pair, PairSide::B)])
            .collect();
        prop_assert_eq!(ids, expected);
    }

    /// Whatever cards are picked, a third pick with two pending never changes
    /// the board, and progress never exceeds the pair count.
    #[test]
    fn prop_engine_respects_pending_limit(
        n in 2usize..10,
        seed in any::<u64>(),
        picks in prop::collection::vec(0usize..20, 1..60),
    ) {
        let deck = DeckBuilder::new(GameRng::new(seed)).build(assets(n)).unwrap();
        let mut engine = MatchEngine::new(deck);

        for pick in picks {
            let Some(id) = engine.deck().at(pick % (2 * n)).map(|card| card.id) else {
                continue;
            };
            let full = engine.pending().len() == 2;
            let before = engine.deck().cards().filter(|card| card.face_up).count();
            let (outcome, _) = engine.select(id);

            if full {
                prop_assert_eq!(&outcome, &SelectOutcome::Rejected(RejectReason::SelectionFull));
                let after = engine.deck().cards().filter(|card| card.face_up).count();
                prop_assert_eq!(before, after);
            }
            prop_assert!(engine.pending().len() <= 2);
            prop_assert!(engine.progress().matched_pairs as usize <= n);

            // Release the hold on every other mismatch so play continues
            if let SelectOutcome::Mismatched { first, second } = outcome {
                if pick % 2 == 0 {
                    prop_assert!(engine.end_reveal_hold(first, second));
                    prop_assert!(engine.pending().is_empty());
                }
            }
        }
    }
}

/// Each card lands in each position with roughly equal frequency.
#[test]
fn test_shuffle_positions_are_uniform() {
    const TRIALS: u64 = 6000;
    const CARDS: usize = 6;

    let target = CardId::new(0, PairSide::A);
    let mut counts = [0u64; CARDS];
    for seed in 0..TRIALS {
        let deck = DeckBuilder::new(GameRng::new(seed)).build(assets(CARDS / 2)).unwrap();
        let position = deck.position(target).unwrap();
        counts[position] += 1;
    }

    // Expected 1000 per slot, standard deviation about 29
    let expected = TRIALS / CARDS as u64;
    for (position, &count) in counts.iter().enumerate() {
        assert!(
            count.abs_diff(expected) < 150,
            "position {position} got {count} of {TRIALS}"
        );
    }
}

/// Matching every pair in board order completes the deck.
#[test]
fn test_matching_all_pairs_completes() {
    let deck = DeckBuilder::new(GameRng::new(3)).build(assets(4)).unwrap();
    let mut engine = MatchEngine::new(deck);

    for pair in 0..4 {
        engine.select(CardId::new(pair, PairSide::A));
        engine.select(CardId::new(pair, PairSide::B));
    }

    assert!(engine.is_complete());
    assert!(engine.deck().all_matched());
    assert!(engine.deck().cards().all(|card| card.face_up));
}
