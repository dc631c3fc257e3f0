//! Engine configuration.
//!
//! An `EngineConfig` fixes the board size and the two evaluation delays at
//! startup. The defaults give the classic sixteen-card board: eight pairs,
//! a 500 ms match-confirm delay and a 1000 ms mismatch-recovery delay.
//!
//! The delays are carried as data, never slept on inside the engine - the
//! presentation layer owns the clock (see `engine::EvalToken`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of pairs on the board.
pub const DEFAULT_PAIR_COUNT: usize = 8;

/// Default delay before a matched pair locks in.
pub const DEFAULT_MATCH_DELAY: Duration = Duration::from_millis(500);

/// Default delay before a mismatched pair flips back.
///
/// Longer than the match delay so a human observer sees both faces.
pub const DEFAULT_MISMATCH_DELAY: Duration = Duration::from_millis(1000);

/// Complete engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of symbol pairs; the deck holds `2 * pair_count` cards.
    pub pair_count: usize,

    /// Delay before a matched pair locks in.
    pub match_delay: Duration,

    /// Delay before a mismatched pair flips back.
    pub mismatch_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pair_count: DEFAULT_PAIR_COUNT,
            match_delay: DEFAULT_MATCH_DELAY,
            mismatch_delay: DEFAULT_MISMATCH_DELAY,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with the given pair count and default delays.
    #[must_use]
    pub fn new(pair_count: usize) -> Self {
        assert!(pair_count > 0, "Must have at least 1 pair");
        assert!(
            pair_count <= u16::MAX as usize / 2,
            "Pair count must fit u16 card ids"
        );

        Self {
            pair_count,
            ..Self::default()
        }
    }

    /// Set the pair count.
    #[must_use]
    pub fn with_pair_count(mut self, pair_count: usize) -> Self {
        assert!(pair_count > 0, "Must have at least 1 pair");
        assert!(
            pair_count <= u16::MAX as usize / 2,
            "Pair count must fit u16 card ids"
        );
        self.pair_count = pair_count;
        self
    }

    /// Set the match-confirm delay.
    #[must_use]
    pub fn with_match_delay(mut self, delay: Duration) -> Self {
        self.match_delay = delay;
        self
    }

    /// Set the mismatch-recovery delay.
    #[must_use]
    pub fn with_mismatch_delay(mut self, delay: Duration) -> Self {
        self.mismatch_delay = delay;
        self
    }

    /// Number of cards in a full deck.
    #[must_use]
    pub const fn deck_size(&self) -> usize {
        self.pair_count * 2
    }

    /// The delay the presentation should wait before resolving a pair.
    #[must_use]
    pub const fn evaluation_delay(&self, matched: bool) -> Duration {
        if matched {
            self.match_delay
        } else {
            self.mismatch_delay
        }
    }
}
