//! The game engine: the flip/match/reset state machine.
//!
//! ## State machine
//!
//! Per card: `Hidden → Revealed → { Matched (terminal) | Hidden (cycle) }`.
//!
//! Globally the engine is *Idle* (selection size 0 or 1, input allowed) or
//! *Evaluating* (selection size 2, input locked) until every card is
//! Matched. Reveal requests that arrive locked, out of range, or against a
//! non-hidden card are deliberate no-ops, not errors - an invalid click
//! gets no response.
//!
//! ## Driving the engine
//!
//! ```
//! use pelmanism::{Engine, EngineConfig, RevealOutcome, CardId};
//!
//! let mut engine = Engine::new(EngineConfig::default(), 42);
//!
//! match engine.reveal(CardId::new(0)) {
//!     RevealOutcome::FirstUp { .. } => { /* await the second card */ }
//!     RevealOutcome::PairPending { token, delay } => {
//!         // sleep `delay`, then:
//!         engine.resolve(token);
//!     }
//!     RevealOutcome::Ignored => {}
//! }
//! ```
//!
//! The selection invariant (never more than two cards up and unresolved)
//! holds because the second reveal of a pair locks input until the pair is
//! resolved, and at most one evaluation is ever pending.

mod events;
mod schedule;

pub use events::EngineEvent;
pub use schedule::{EvalToken, Generation, PendingEvaluation};

use std::time::Duration;

use im::Vector;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CardId, CardState, EngineConfig, GameRng, SymbolId};
use crate::deck::{Deck, LayoutError};

/// Result of a reveal request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The request was invalid (locked, out of range, or the card is not
    /// hidden) and changed nothing.
    Ignored,

    /// The first card of a pair is up; awaiting further input.
    FirstUp {
        /// The revealed card.
        card: CardId,
    },

    /// The second card is up and input is locked. Wait `delay`, then call
    /// `Engine::resolve` with the token.
    PairPending {
        /// Handle for the deferred evaluation.
        token: EvalToken,
        /// How long the presentation should hold both faces up.
        delay: Duration,
    },
}

/// Result of resolving a pending evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Equal symbols: both cards are now Matched.
    Matched {
        /// The resolved pair, in reveal order.
        pair: [CardId; 2],
        /// The shared symbol.
        symbol: SymbolId,
        /// True when this match finished the game.
        complete: bool,
    },

    /// Unequal symbols: both cards flipped back to Hidden.
    Mismatched {
        /// The resolved pair, in reveal order.
        pair: [CardId; 2],
    },

    /// The token belongs to an earlier deal (or nothing was pending);
    /// nothing changed.
    Stale,
}

/// One accepted reveal, for replay and snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealRecord {
    /// The revealed card.
    pub card: CardId,

    /// Its symbol.
    pub symbol: SymbolId,

    /// The move this reveal belongs to (1-based; both reveals of a pair
    /// share it).
    pub move_number: u32,

    /// Running reveal index within the game.
    pub sequence: u32,
}

/// The concentration game engine.
///
/// Owns the deck, the selection, the move counter, and the input lock
/// behind explicit methods; there is no shared state. Presentation
/// layers drive it through `reveal`/`resolve` and render from
/// `view::project` - the engine is fully testable without any UI.
#[derive(Clone, Debug)]
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) deck: Deck,
    /// Revealed-but-unresolved cards, in reveal order. Never exceeds 2.
    pub(crate) selection: SmallVec<[CardId; 2]>,
    pub(crate) moves: u32,
    pub(crate) locked: bool,
    pub(crate) generation: Generation,
    pub(crate) pending: Option<PendingEvaluation>,
    pub(crate) history: Vector<RevealRecord>,
    pub(crate) events: Vec<EngineEvent>,
    pub(crate) rng: GameRng,
}

impl Engine {
    /// Create an engine with a freshly dealt, shuffled deck.
    ///
    /// The same config and seed always produce the same board.
    #[must_use]
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        let mut rng = GameRng::new(seed);
        let deck = Deck::dealt(config.pair_count, &mut rng);

        let mut engine = Self {
            config,
            deck,
            selection: SmallVec::new(),
            moves: 0,
            locked: false,
            generation: Generation::default(),
            pending: None,
            history: Vector::new(),
            events: Vec::new(),
            rng,
        };
        engine.announce_deal();
        engine
    }

    /// Create an engine with an explicit board layout.
    ///
    /// The layout's pair count wins over `config.pair_count`; a later
    /// `new_game` deals a random board of that size. Intended for tests
    /// and scripted demos.
    pub fn with_layout(
        config: EngineConfig,
        layout: &[SymbolId],
        seed: u64,
    ) -> Result<Self, LayoutError> {
        let deck = Deck::from_layout(layout)?;
        let config = config.with_pair_count(deck.pair_count());

        let mut engine = Self {
            config,
            deck,
            selection: SmallVec::new(),
            moves: 0,
            locked: false,
            generation: Generation::default(),
            pending: None,
            history: Vector::new(),
            events: Vec::new(),
            rng: GameRng::new(seed),
        };
        engine.announce_deal();
        Ok(engine)
    }

    /// Start a new game: fresh shuffled deck, counters reset, any pending
    /// evaluation invalidated.
    ///
    /// The reset is atomic - a timer still in flight from the previous
    /// deal holds a stale token and resolves to `Resolution::Stale`.
    pub fn new_game(&mut self) {
        self.generation = self.generation.next();
        self.pending = None;
        self.deck = Deck::dealt(self.config.pair_count, &mut self.rng);
        self.selection.clear();
        self.moves = 0;
        self.locked = false;
        self.history = Vector::new();
        // Undrained events describe the previous deal; drop them.
        self.events.clear();
        self.announce_deal();
        debug!("new game: {}", self.generation);
    }

    fn announce_deal(&mut self) {
        self.events.push(EngineEvent::GameStarted {
            generation: self.generation,
        });
        self.events.push(EngineEvent::MovesChanged { moves: 0 });
    }

    /// Request a reveal.
    ///
    /// Invalid requests (input locked, unknown id, card not hidden) return
    /// `RevealOutcome::Ignored` and change nothing. A valid second reveal
    /// completes the move: the counter increments, input locks, and the
    /// returned token must be resolved after the returned delay.
    pub fn reveal(&mut self, card: CardId) -> RevealOutcome {
        if self.locked {
            trace!("reveal {} ignored: input locked", card);
            return RevealOutcome::Ignored;
        }

        let symbol = match self.deck.get(card) {
            Some(target) if target.is_hidden() => target.symbol,
            Some(_) => {
                trace!("reveal {} ignored: card is not hidden", card);
                return RevealOutcome::Ignored;
            }
            None => {
                trace!("reveal {} ignored: no such card", card);
                return RevealOutcome::Ignored;
            }
        };

        // Defensive: the Hidden check already excludes selected cards.
        if self.selection.contains(&card) {
            return RevealOutcome::Ignored;
        }

        if let Some(target) = self.deck.get_mut(card) {
            target.state = CardState::Revealed;
        }
        self.history.push_back(RevealRecord {
            card,
            symbol,
            move_number: self.moves + 1,
            sequence: self.history.len() as u32,
        });
        self.selection.push(card);

        if self.selection.len() == 1 {
            trace!("first card up: {} showing {}", card, symbol);
            return RevealOutcome::FirstUp { card };
        }

        // Second card: the move counts now, the evaluation happens later.
        self.moves += 1;
        self.locked = true;
        self.events.push(EngineEvent::MovesChanged { moves: self.moves });

        let first = self.selection[0];
        let first_symbol = self
            .deck
            .get(first)
            .map(|c| c.symbol)
            .expect("selected card exists");

        let pending = PendingEvaluation {
            pair: [first, card],
            symbols: [first_symbol, symbol],
            generation: self.generation,
        };
        let delay = self.config.evaluation_delay(pending.is_match());
        self.pending = Some(pending);
        debug!(
            "pair up: {} and {} on move {}, resolving in {:?}",
            first, card, self.moves, delay
        );

        RevealOutcome::PairPending {
            token: EvalToken::new(self.generation),
            delay,
        }
    }

    /// Resolve a pending pair evaluation.
    ///
    /// Equal symbols lock both cards in as Matched (emitting
    /// `GameComplete` when they were the last pair); unequal symbols flip
    /// both back to Hidden. Either way the selection clears and input
    /// unlocks. A token from an earlier deal is dropped as
    /// `Resolution::Stale` without touching the board.
    pub fn resolve(&mut self, token: EvalToken) -> Resolution {
        if token.generation() != self.generation {
            debug!(
                "stale evaluation token ignored: issued under {}, now {}",
                token.generation(),
                self.generation
            );
            return Resolution::Stale;
        }

        let Some(pending) = self.pending.take() else {
            debug!("evaluation token ignored: nothing pending");
            return Resolution::Stale;
        };

        self.selection.clear();
        self.locked = false;

        if pending.is_match() {
            for id in pending.pair {
                if let Some(card) = self.deck.get_mut(id) {
                    card.state = CardState::Matched;
                }
            }
            self.events.push(EngineEvent::PairMatched {
                pair: pending.pair,
                symbol: pending.symbols[0],
            });

            let complete = self.deck.is_all_matched();
            if complete {
                debug!(
                    "all {} pairs found in {} moves",
                    self.deck.pair_count(),
                    self.moves
                );
                self.events.push(EngineEvent::GameComplete { moves: self.moves });
            }

            Resolution::Matched {
                pair: pending.pair,
                symbol: pending.symbols[0],
                complete,
            }
        } else {
            for id in pending.pair {
                if let Some(card) = self.deck.get_mut(id) {
                    card.state = CardState::Hidden;
                }
            }
            self.events.push(EngineEvent::PairHidden { pair: pending.pair });

            Resolution::Mismatched { pair: pending.pair }
        }
    }

    /// Drain accumulated events, oldest first.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // === Queries ===

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The board.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Look up a card by id.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&crate::core::Card> {
        self.deck.get(id)
    }

    /// Completed moves (pairs of reveals) this game.
    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Is input currently locked for a pending evaluation?
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The revealed-but-unresolved cards, in reveal order.
    #[must_use]
    pub fn selection(&self) -> &[CardId] {
        &self.selection
    }

    /// The current game generation.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The pair awaiting resolution, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingEvaluation> {
        self.pending.as_ref()
    }

    /// Has every pair been found?
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.deck.is_all_matched()
    }

    /// Every accepted reveal this game, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<RevealRecord> {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EngineConfig;

    fn forced_engine(raw: &[u16]) -> Engine {
        let layout: Vec<SymbolId> = raw.iter().copied().map(SymbolId::new).collect();
        Engine::with_layout(EngineConfig::default(), &layout, 42).unwrap()
    }

    #[test]
    fn test_new_deals_full_board() {
        let engine = Engine::new(EngineConfig::default(), 42);

        assert_eq!(engine.deck().len(), 16);
        assert_eq!(engine.moves(), 0);
        assert!(!engine.is_locked());
        assert!(engine.selection().is_empty());
        assert!(!engine.is_complete());
        assert_eq!(engine.generation(), Generation::default());
    }

    #[test]
    fn test_new_is_deterministic() {
        let a = Engine::new(EngineConfig::default(), 7);
        let b = Engine::new(EngineConfig::default(), 7);

        assert_eq!(a.deck(), b.deck());
    }

    #[test]
    fn test_first_reveal() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        let outcome = engine.reveal(CardId::new(0));

        assert_eq!(
            outcome,
            RevealOutcome::FirstUp {
                card: CardId::new(0)
            }
        );
        assert_eq!(engine.selection(), &[CardId::new(0)]);
        assert!(engine.card(CardId::new(0)).unwrap().state.is_revealed());
        assert_eq!(engine.moves(), 0);
        assert!(!engine.is_locked());
    }

    #[test]
    fn test_repeated_reveal_is_noop() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        engine.reveal(CardId::new(0));
        let outcome = engine.reveal(CardId::new(0));

        assert_eq!(outcome, RevealOutcome::Ignored);
        assert_eq!(engine.selection(), &[CardId::new(0)]);
    }

    #[test]
    fn test_out_of_range_reveal_is_noop() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        assert_eq!(engine.reveal(CardId::new(99)), RevealOutcome::Ignored);
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn test_second_reveal_locks_and_counts() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        engine.reveal(CardId::new(0));
        let outcome = engine.reveal(CardId::new(1));

        let RevealOutcome::PairPending { delay, .. } = outcome else {
            panic!("expected a pending pair, got {:?}", outcome);
        };
        assert_eq!(delay, engine.config().mismatch_delay);
        assert_eq!(engine.moves(), 1);
        assert!(engine.is_locked());
        assert_eq!(engine.selection().len(), 2);
        assert!(engine.pending().is_some());
    }

    #[test]
    fn test_match_uses_match_delay() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        engine.reveal(CardId::new(0));
        let outcome = engine.reveal(CardId::new(2));

        let RevealOutcome::PairPending { delay, .. } = outcome else {
            panic!("expected a pending pair");
        };
        assert_eq!(delay, engine.config().match_delay);
        assert!(engine.pending().unwrap().is_match());
    }

    #[test]
    fn test_third_reveal_rejected_while_locked() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        engine.reveal(CardId::new(0));
        engine.reveal(CardId::new(1));

        assert_eq!(engine.reveal(CardId::new(2)), RevealOutcome::Ignored);
        assert_eq!(engine.selection().len(), 2);
        assert!(engine.card(CardId::new(2)).unwrap().is_hidden());
    }

    #[test]
    fn test_mismatch_resolution() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        engine.reveal(CardId::new(0));
        let RevealOutcome::PairPending { token, .. } = engine.reveal(CardId::new(1)) else {
            panic!("expected a pending pair");
        };

        let resolution = engine.resolve(token);

        assert_eq!(
            resolution,
            Resolution::Mismatched {
                pair: [CardId::new(0), CardId::new(1)]
            }
        );
        assert!(engine.card(CardId::new(0)).unwrap().is_hidden());
        assert!(engine.card(CardId::new(1)).unwrap().is_hidden());
        assert!(engine.selection().is_empty());
        assert!(!engine.is_locked());
        assert_eq!(engine.moves(), 1);
    }

    #[test]
    fn test_match_resolution() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        engine.reveal(CardId::new(0));
        let RevealOutcome::PairPending { token, .. } = engine.reveal(CardId::new(2)) else {
            panic!("expected a pending pair");
        };

        let resolution = engine.resolve(token);

        assert_eq!(
            resolution,
            Resolution::Matched {
                pair: [CardId::new(0), CardId::new(2)],
                symbol: SymbolId::new(0),
                complete: false,
            }
        );
        assert!(engine.card(CardId::new(0)).unwrap().is_matched());
        assert!(engine.card(CardId::new(2)).unwrap().is_matched());
        assert!(engine.selection().is_empty());
        assert!(!engine.is_locked());
    }

    #[test]
    fn test_matched_card_cannot_be_revealed() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        engine.reveal(CardId::new(0));
        let RevealOutcome::PairPending { token, .. } = engine.reveal(CardId::new(2)) else {
            panic!("expected a pending pair");
        };
        engine.resolve(token);

        assert_eq!(engine.reveal(CardId::new(0)), RevealOutcome::Ignored);
    }

    #[test]
    fn test_double_resolve_is_stale() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        engine.reveal(CardId::new(0));
        let RevealOutcome::PairPending { token, .. } = engine.reveal(CardId::new(1)) else {
            panic!("expected a pending pair");
        };

        assert_ne!(engine.resolve(token), Resolution::Stale);
        assert_eq!(engine.resolve(token), Resolution::Stale);
    }

    #[test]
    fn test_new_game_resets_everything() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        engine.reveal(CardId::new(0));
        let RevealOutcome::PairPending { token, .. } = engine.reveal(CardId::new(2)) else {
            panic!("expected a pending pair");
        };
        engine.resolve(token);
        assert_eq!(engine.moves(), 1);

        engine.new_game();

        assert_eq!(engine.moves(), 0);
        assert!(!engine.is_locked());
        assert!(engine.selection().is_empty());
        assert!(engine.pending().is_none());
        assert!(engine.history().is_empty());
        assert_eq!(engine.generation(), Generation::new(1));
        assert!(engine.deck().iter().all(|c| c.is_hidden()));
        // A forced layout re-deals at its own size.
        assert_eq!(engine.deck().len(), 4);
    }

    #[test]
    fn test_history_records_reveals() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        engine.reveal(CardId::new(0));
        let RevealOutcome::PairPending { token, .. } = engine.reveal(CardId::new(1)) else {
            panic!("expected a pending pair");
        };
        engine.resolve(token);
        engine.reveal(CardId::new(3));

        let records: Vec<_> = engine.history().iter().copied().collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].card, CardId::new(0));
        assert_eq!(records[0].move_number, 1);
        assert_eq!(records[1].card, CardId::new(1));
        assert_eq!(records[1].move_number, 1);
        assert_eq!(records[2].card, CardId::new(3));
        assert_eq!(records[2].move_number, 2);
        assert_eq!(records[2].sequence, 2);
    }

    #[test]
    fn test_events_for_mismatch() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);
        engine.take_events();

        engine.reveal(CardId::new(0));
        let RevealOutcome::PairPending { token, .. } = engine.reveal(CardId::new(1)) else {
            panic!("expected a pending pair");
        };
        engine.resolve(token);

        assert_eq!(
            engine.take_events(),
            vec![
                EngineEvent::MovesChanged { moves: 1 },
                EngineEvent::PairHidden {
                    pair: [CardId::new(0), CardId::new(1)]
                },
            ]
        );
    }

    #[test]
    fn test_deal_events() {
        let mut engine = forced_engine(&[0, 1, 0, 1]);

        assert_eq!(
            engine.take_events(),
            vec![
                EngineEvent::GameStarted {
                    generation: Generation::default()
                },
                EngineEvent::MovesChanged { moves: 0 },
            ]
        );
        assert!(engine.take_events().is_empty());
    }
}
