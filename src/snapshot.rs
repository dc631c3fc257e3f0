//! Whole-game capture and restore.
//!
//! A `GameSnapshot` is a plain serializable record of everything the
//! engine owns: board, counters, lock, selection, pending evaluation,
//! reveal history, and the RNG position (so a restored game deals the
//! same future boards as the original would have). `to_bytes`/`from_bytes`
//! give a compact bincode wire form.
//!
//! Restore re-validates every invariant the engine maintains; a snapshot
//! that breaks one is rejected with a descriptive `SnapshotError` instead
//! of producing an engine in an impossible state.
//!
//! Snapshots do not carry undrained events - a presentation that restores
//! a game re-renders from `view::project`.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::core::{Card, CardId, EngineConfig, GameRng, GameRngState, SymbolId};
use crate::deck::Deck;
use crate::engine::{Engine, Generation, PendingEvaluation, RevealRecord};

/// Rejected snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Deck size disagrees with the configuration.
    #[error("deck holds {found} cards, config expects {expected}")]
    DeckSizeMismatch {
        /// `2 * pair_count` per the config.
        expected: usize,
        /// Cards actually present.
        found: usize,
    },

    /// A card id disagrees with its board position.
    #[error("card at index {index} carries id {found}")]
    CardIdMismatch {
        /// Board position.
        index: usize,
        /// Id stored on the card.
        found: CardId,
    },

    /// A symbol does not appear exactly twice.
    #[error("symbol {symbol} appears {count} times, expected 2")]
    UnpairedSymbol {
        /// The offending symbol.
        symbol: SymbolId,
        /// How often it actually appears.
        count: usize,
    },

    /// More than two cards in the selection.
    #[error("selection holds {0} cards, limit is 2")]
    SelectionTooLarge(usize),

    /// The same card selected twice.
    #[error("card {0} appears twice in the selection")]
    DuplicateSelection(CardId),

    /// A selected card is missing or not revealed.
    #[error("selected card {0} is not revealed")]
    SelectionNotRevealed(CardId),

    /// A revealed card is not in the selection.
    #[error("revealed card {0} is not in the selection")]
    RevealedNotSelected(CardId),

    /// Lock state disagrees with the selection size.
    #[error("input lock state is inconsistent with the selection")]
    LockInconsistent,

    /// The lock is held but nothing is pending.
    #[error("input lock held with no pending evaluation")]
    LockWithoutPending,

    /// A pending evaluation without the lock held.
    #[error("pending evaluation without the input lock held")]
    PendingWithoutLock,

    /// The pending evaluation disagrees with the selection or generation.
    #[error("pending evaluation is inconsistent with the selection")]
    PendingMismatch,

    /// Snapshot bytes did not encode.
    #[error("snapshot did not encode: {0}")]
    Encode(String),

    /// Snapshot bytes did not decode.
    #[error("snapshot did not decode: {0}")]
    Decode(String),
}

/// A complete serializable game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Engine configuration.
    pub config: EngineConfig,

    /// Cards in board order.
    pub cards: Vec<Card>,

    /// Revealed-but-unresolved cards, in reveal order.
    pub selection: Vec<CardId>,

    /// Completed moves.
    pub moves: u32,

    /// Input lock state.
    pub locked: bool,

    /// Game generation.
    pub generation: Generation,

    /// Pair awaiting resolution, if any.
    pub pending: Option<PendingEvaluation>,

    /// Every accepted reveal, oldest first.
    pub history: Vec<RevealRecord>,

    /// RNG position, so future deals continue the original sequence.
    pub rng: GameRngState,
}

impl Engine {
    /// Capture the complete game state.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            config: self.config,
            cards: self.deck.cards().to_vec(),
            selection: self.selection.to_vec(),
            moves: self.moves,
            locked: self.locked,
            generation: self.generation,
            pending: self.pending,
            history: self.history.iter().copied().collect(),
            rng: self.rng.state(),
        }
    }
}

impl GameSnapshot {
    /// Rebuild an engine, re-validating every invariant.
    pub fn restore(&self) -> Result<Engine, SnapshotError> {
        self.validate()?;

        Ok(Engine {
            config: self.config,
            deck: Deck::from_cards(self.cards.clone()),
            selection: SmallVec::from_slice(&self.selection),
            moves: self.moves,
            locked: self.locked,
            generation: self.generation,
            pending: self.pending,
            history: self.history.iter().copied().collect::<Vector<_>>(),
            events: Vec::new(),
            rng: GameRng::from_state(&self.rng),
        })
    }

    /// Serialize to compact bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Deserialize from bytes. Invariants are checked by `restore`, not
    /// here.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        let expected = self.config.deck_size();
        if self.cards.len() != expected {
            return Err(SnapshotError::DeckSizeMismatch {
                expected,
                found: self.cards.len(),
            });
        }

        for (index, card) in self.cards.iter().enumerate() {
            if card.id.index() != index {
                return Err(SnapshotError::CardIdMismatch {
                    index,
                    found: card.id,
                });
            }
        }

        let mut counts: FxHashMap<SymbolId, usize> = FxHashMap::default();
        for card in &self.cards {
            *counts.entry(card.symbol).or_default() += 1;
        }
        for (&symbol, &count) in &counts {
            if count != 2 {
                return Err(SnapshotError::UnpairedSymbol { symbol, count });
            }
        }

        if self.selection.len() > 2 {
            return Err(SnapshotError::SelectionTooLarge(self.selection.len()));
        }
        if self.selection.len() == 2 && self.selection[0] == self.selection[1] {
            return Err(SnapshotError::DuplicateSelection(self.selection[0]));
        }
        for &id in &self.selection {
            let revealed = self
                .cards
                .get(id.index())
                .is_some_and(|c| c.state.is_revealed());
            if !revealed {
                return Err(SnapshotError::SelectionNotRevealed(id));
            }
        }
        for card in &self.cards {
            if card.state.is_revealed() && !self.selection.contains(&card.id) {
                return Err(SnapshotError::RevealedNotSelected(card.id));
            }
        }

        if self.locked != (self.selection.len() == 2) {
            return Err(SnapshotError::LockInconsistent);
        }

        match &self.pending {
            Some(pending) => {
                if !self.locked {
                    return Err(SnapshotError::PendingWithoutLock);
                }
                let consistent = pending.generation == self.generation
                    && pending.pair[..] == self.selection[..]
                    && pending.pair.iter().zip(&pending.symbols).all(|(id, &symbol)| {
                        self.cards
                            .get(id.index())
                            .is_some_and(|c| c.symbol == symbol)
                    });
                if !consistent {
                    return Err(SnapshotError::PendingMismatch);
                }
            }
            None => {
                if self.locked {
                    return Err(SnapshotError::LockWithoutPending);
                }
            }
        }

        Ok(())
    }
}
