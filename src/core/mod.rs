//! Core types: card identity and state, configuration, deterministic RNG.

pub mod card;
pub mod config;
pub mod rng;

pub use card::{Card, CardId, CardState, SymbolId};
pub use config::{
    EngineConfig, DEFAULT_MATCH_DELAY, DEFAULT_MISMATCH_DELAY, DEFAULT_PAIR_COUNT,
};
pub use rng::{GameRng, GameRngState};
