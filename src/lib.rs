//! # pelmanism
//!
//! A UI-agnostic concentration (memory pairs) game engine.
//!
//! ## Design Principles
//!
//! 1. **No UI coupling**: The engine owns pure data (cards, selection,
//!    counters) and knows nothing about rendering. Presentations draw from
//!    `view::project` and feed input back as `reveal` calls.
//!
//! 2. **The presentation owns the clock**: The engine never sleeps. Pair
//!    evaluation is deferred through an `EvalToken` plus a delay; the
//!    caller waits and then calls `resolve`. Tokens are generation-tagged,
//!    so a timer that outlives a restart is dropped instead of mutating
//!    the fresh board.
//!
//! 3. **Deterministic**: All randomness flows through a seeded ChaCha8
//!    RNG. The same config and seed reproduce the same game; snapshots
//!    capture the RNG position so restored games continue the sequence.
//!
//! ## Modules
//!
//! - `core`: Card identity and state, configuration, RNG
//! - `deck`: Board construction (shuffled deals, validated layouts)
//! - `engine`: The flip/match/reset state machine and its events
//! - `snapshot`: Whole-game capture, validation, and restore
//! - `view`: Pure render projection for presentation layers

pub mod core;
pub mod deck;
pub mod engine;
pub mod snapshot;
pub mod view;

// Re-export commonly used types
pub use crate::core::{
    Card, CardId, CardState, EngineConfig, GameRng, GameRngState, SymbolId,
};

pub use crate::deck::{Deck, LayoutError};

pub use crate::engine::{
    Engine, EngineEvent, EvalToken, Generation, PendingEvaluation, Resolution, RevealOutcome,
    RevealRecord,
};

pub use crate::snapshot::{GameSnapshot, SnapshotError};

pub use crate::view::{glyph, project, BoardView, CardFace, HIDDEN_GLYPH};
