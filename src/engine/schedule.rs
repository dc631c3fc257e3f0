//! Deferred pair evaluation.
//!
//! The engine never sleeps. When a second card comes up it hands the
//! presentation an `EvalToken` plus the delay to wait; the presentation
//! sleeps (or sets a timer) and calls `Engine::resolve` with the token.
//!
//! Tokens are tagged with the `Generation` they were issued under. A
//! restart bumps the generation, so a timer that outlives its game resolves
//! to `Resolution::Stale` and cannot touch the fresh deck.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, SymbolId};

/// Game generation counter, bumped on every (re)start.
///
/// Opaque to the engine's callers; its only job is invalidating deferred
/// work issued under an earlier deal.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Generation(pub u32);

impl Generation {
    /// Create a generation counter.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw counter value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The generation after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Generation({})", self.0)
    }
}

/// Handle for a scheduled pair evaluation.
///
/// Returned by `Engine::reveal` when the second card of a pair comes up;
/// redeemed through `Engine::resolve` after the accompanying delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvalToken {
    generation: Generation,
}

impl EvalToken {
    pub(crate) const fn new(generation: Generation) -> Self {
        Self { generation }
    }

    /// The generation this token was issued under.
    #[must_use]
    pub const fn generation(self) -> Generation {
        self.generation
    }
}

/// A pair waiting on its evaluation delay.
///
/// At most one exists at a time; the input lock is held for exactly as long
/// as one is pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEvaluation {
    /// The two revealed cards, in reveal order.
    pub pair: [CardId; 2],

    /// Their symbols, in the same order.
    pub symbols: [SymbolId; 2],

    /// The generation the pair was revealed under.
    pub generation: Generation,
}

impl PendingEvaluation {
    /// Will this pair resolve as a match?
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.symbols[0].raw() == self.symbols[1].raw()
    }
}
