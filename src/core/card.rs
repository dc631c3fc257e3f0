//! Card identity and per-card state.
//!
//! Every card on the board has a `CardId` (its stable position index) and a
//! `SymbolId` (its face). Exactly two cards in a deck share each symbol.
//!
//! ## Card lifecycle
//!
//! `Hidden → Revealed → Matched` (terminal) on a successful pair, or
//! `Revealed → Hidden` when the pair resolves unequal. Only a full re-deal
//! resets a `Matched` card.

use serde::{Deserialize, Serialize};

/// Stable position index of a card on the board.
///
/// Assigned once when the deck is dealt and never changes afterwards;
/// presentation layers use it to address grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u16);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Get the ID as a board index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u16> for CardId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card face identifier. Each symbol appears on exactly two cards.
///
/// The engine doesn't interpret symbols - they're opaque identifiers
/// compared for equality. Presentations assign faces (see `view::glyph`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u16);

impl SymbolId {
    /// Create a new symbol ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Visibility state of a single card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardState {
    /// Face down; a valid reveal target.
    #[default]
    Hidden,
    /// Face up, awaiting its pair's resolution.
    Revealed,
    /// Resolved as part of a pair. Terminal until the next deal.
    Matched,
}

impl CardState {
    /// Is this card face down?
    #[must_use]
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    /// Is this card face up but unresolved?
    #[must_use]
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }

    /// Has this card's pair been found?
    #[must_use]
    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }
}

/// A card on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Stable position index.
    pub id: CardId,

    /// The face this card shows when revealed.
    pub symbol: SymbolId,

    /// Current visibility state.
    pub state: CardState,
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub const fn new(id: CardId, symbol: SymbolId) -> Self {
        Self {
            id,
            symbol,
            state: CardState::Hidden,
        }
    }

    /// Is this card a valid reveal target?
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.state.is_hidden()
    }

    /// Has this card's pair been found?
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        self.state.is_matched()
    }
}
