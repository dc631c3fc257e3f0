//! Events the engine emits for the presentation layer.
//!
//! The engine accumulates events as side effects of `reveal`, `resolve`,
//! and `new_game`; the presentation drains them with `Engine::take_events`
//! after each call and maps them onto its own callbacks (counter display,
//! face updates, end-of-game summary).
//!
//! The event set is closed: this game has a fixed vocabulary, so a plain
//! enum replaces a registry of game-defined event types.

use serde::{Deserialize, Serialize};

use super::schedule::Generation;
use crate::core::{CardId, SymbolId};

/// A state change the presentation should reflect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A fresh deal, after construction or restart. Everything the
    /// presentation shows is stale; re-render the whole board.
    GameStarted {
        /// The new game's generation.
        generation: Generation,
    },

    /// The move counter changed (including the reset to zero on a deal).
    MovesChanged {
        /// The new counter value.
        moves: u32,
    },

    /// A pair resolved equal; both cards are now locked in face up.
    PairMatched {
        /// The two cards, in reveal order.
        pair: [CardId; 2],
        /// Their shared symbol.
        symbol: SymbolId,
    },

    /// A pair resolved unequal; both cards flipped back face down.
    PairHidden {
        /// The two cards, in reveal order.
        pair: [CardId; 2],
    },

    /// Every pair has been found. Fires exactly once per game.
    GameComplete {
        /// Total completed moves for the end-of-game summary.
        moves: u32,
    },
}
