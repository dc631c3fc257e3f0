//! Property tests for the deal and the reveal state machine.

use proptest::prelude::*;
use rustc_hash::FxHashMap;

use pelmanism::{
    CardId, Deck, Engine, EngineConfig, GameRng, RevealOutcome, SymbolId,
};

proptest! {
    /// Dealing produces `2 * pair_count` cards with every symbol on
    /// exactly two of them, ids matching board positions.
    #[test]
    fn deal_is_a_perfect_pairing(pair_count in 1usize..64, seed: u64) {
        let mut rng = GameRng::new(seed);
        let deck = Deck::dealt(pair_count, &mut rng);

        prop_assert_eq!(deck.len(), 2 * pair_count);

        let mut counts: FxHashMap<SymbolId, usize> = FxHashMap::default();
        for (index, card) in deck.iter().enumerate() {
            prop_assert_eq!(card.id.index(), index);
            *counts.entry(card.symbol).or_default() += 1;
        }
        prop_assert_eq!(counts.len(), pair_count);
        for (_, count) in counts {
            prop_assert_eq!(count, 2);
        }
    }

    /// The shuffle is a permutation: re-dealing never changes the symbol
    /// multiset, only the order.
    #[test]
    fn redeal_preserves_symbol_multiset(pair_count in 1usize..32, seed: u64) {
        let mut engine = Engine::new(EngineConfig::new(pair_count), seed);
        let sorted = |deck: &Deck| {
            let mut symbols: Vec<u16> = deck.iter().map(|c| c.symbol.raw()).collect();
            symbols.sort_unstable();
            symbols
        };
        let before = sorted(engine.deck());

        engine.new_game();

        prop_assert_eq!(sorted(engine.deck()), before);
    }

    /// Under arbitrary (mostly invalid) input the core invariants hold:
    /// the selection never exceeds two cards, the lock tracks the pending
    /// evaluation, and matched cards only appear in pairs.
    #[test]
    fn invariants_hold_under_arbitrary_input(
        seed: u64,
        commands in prop::collection::vec((0u16..12, any::<bool>()), 1..200),
    ) {
        let mut engine = Engine::new(EngineConfig::new(4), seed);
        let mut pending_token = None;

        for (id, resolve_now) in commands {
            if let RevealOutcome::PairPending { token, .. } = engine.reveal(CardId::new(id)) {
                pending_token = Some(token);
            }

            prop_assert!(engine.selection().len() <= 2);
            prop_assert_eq!(engine.is_locked(), engine.pending().is_some());
            prop_assert_eq!(engine.deck().matched_count() % 2, 0);

            if resolve_now {
                if let Some(token) = pending_token.take() {
                    engine.resolve(token);
                    prop_assert!(engine.selection().is_empty());
                    prop_assert!(!engine.is_locked());
                }
            }
        }
    }

    /// The move counter counts completed pairs of reveals: it equals the
    /// number of `PairPending` outcomes handed out.
    #[test]
    fn moves_count_pair_completions(
        seed: u64,
        commands in prop::collection::vec(0u16..12, 1..200),
    ) {
        let mut engine = Engine::new(EngineConfig::new(4), seed);
        let mut pairs_formed = 0u32;

        for id in commands {
            match engine.reveal(CardId::new(id)) {
                RevealOutcome::PairPending { token, .. } => {
                    pairs_formed += 1;
                    engine.resolve(token);
                }
                RevealOutcome::FirstUp { .. } | RevealOutcome::Ignored => {}
            }
            prop_assert_eq!(engine.moves(), pairs_formed);
        }
    }
}
