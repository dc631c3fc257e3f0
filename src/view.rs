//! Pure render projection.
//!
//! Presentations never read engine internals; they render a `BoardView`,
//! a plain-data snapshot of what each card should show right now. The
//! projection is a pure function of engine state, so any UI layer - a web
//! page, a TUI, a chat bot - can call it after draining events and redraw.
//!
//! `glyph` provides a default symbol-to-emoji table for presentations that
//! don't bring their own art.

use serde::{Deserialize, Serialize};

use crate::core::{CardState, SymbolId};
use crate::engine::Engine;

/// Default face shown for a hidden card.
pub const HIDDEN_GLYPH: &str = "❓";

/// Default symbol faces, in symbol order. The first eight cover the
/// default board.
const GLYPHS: [&str; 24] = [
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🍎", "🍌", "🍇", "🍒", "🍋", "🍉", "🍓",
    "🍑", "🥝", "🍊", "🍍", "🌽", "🍄", "🧀", "🍩", "🍰",
];

/// Default emoji face for a symbol.
///
/// Symbols beyond the table wrap around; boards that large should supply
/// their own faces.
#[must_use]
pub fn glyph(symbol: SymbolId) -> &'static str {
    GLYPHS[symbol.raw() as usize % GLYPHS.len()]
}

/// What a single card should display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFace {
    /// Face down.
    Down,
    /// Face up, pair unresolved.
    Up(SymbolId),
    /// Face up and locked in.
    Matched(SymbolId),
}

impl CardFace {
    /// Is the symbol visible?
    #[must_use]
    pub const fn is_face_up(self) -> bool {
        matches!(self, Self::Up(_) | Self::Matched(_))
    }
}

/// A complete, render-ready picture of the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// Per-card faces, in board order.
    pub faces: Vec<CardFace>,

    /// Completed moves.
    pub moves: u32,

    /// Is input locked for a pending evaluation?
    pub locked: bool,

    /// Pairs found so far.
    pub matched_pairs: usize,

    /// Total pairs on the board.
    pub total_pairs: usize,

    /// Has every pair been found?
    pub complete: bool,
}

impl BoardView {
    /// The board chunked into grid rows of `columns` cards.
    ///
    /// The last row may be short if the board size is not a multiple of
    /// `columns`.
    pub fn rows(&self, columns: usize) -> impl Iterator<Item = &[CardFace]> {
        assert!(columns > 0, "Must have at least 1 column");
        self.faces.chunks(columns)
    }
}

/// Project the engine into a render-ready view.
#[must_use]
pub fn project(engine: &Engine) -> BoardView {
    let faces = engine
        .deck()
        .iter()
        .map(|card| match card.state {
            CardState::Hidden => CardFace::Down,
            CardState::Revealed => CardFace::Up(card.symbol),
            CardState::Matched => CardFace::Matched(card.symbol),
        })
        .collect();

    BoardView {
        faces,
        moves: engine.moves(),
        locked: engine.is_locked(),
        matched_pairs: engine.deck().matched_count() / 2,
        total_pairs: engine.deck().pair_count(),
        complete: engine.is_complete(),
    }
}
