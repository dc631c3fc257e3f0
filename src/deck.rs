//! Deck construction and queries.
//!
//! A `Deck` is the ordered board: `2 * pair_count` cards, each symbol on
//! exactly two of them. Fresh games deal through `Deck::dealt`, which
//! duplicates every symbol and applies an unbiased Fisher-Yates shuffle.
//! Tests and scripted demos can pin the board with `Deck::from_layout`.
//!
//! Card ids are assigned *after* shuffling, so they are stable position
//! indexes for the life of the deal.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Card, CardId, GameRng, SymbolId};

/// Rejected explicit layouts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout holds no cards.
    #[error("layout is empty")]
    Empty,

    /// The layout cannot split into pairs.
    #[error("layout has odd length {0}")]
    OddLength(usize),

    /// A symbol does not appear exactly twice.
    #[error("symbol {symbol} appears {count} times, expected 2")]
    UnpairedSymbol {
        /// The offending symbol.
        symbol: SymbolId,
        /// How often it actually appears.
        count: usize,
    },
}

/// The ordered board of cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Deal a fresh shuffled deck of `pair_count` symbol pairs.
    ///
    /// Symbols `0..pair_count` each appear exactly twice; the permutation
    /// is drawn uniformly from the RNG.
    #[must_use]
    pub fn dealt(pair_count: usize, rng: &mut GameRng) -> Self {
        assert!(pair_count > 0, "Must have at least 1 pair");
        assert!(
            pair_count <= u16::MAX as usize / 2,
            "Pair count must fit u16 card ids"
        );

        let mut symbols: Vec<SymbolId> = (0..pair_count as u16)
            .flat_map(|s| [SymbolId::new(s), SymbolId::new(s)])
            .collect();
        rng.shuffle(&mut symbols);

        Self::from_symbols(symbols)
    }

    /// Build a deck with an explicit symbol order.
    ///
    /// Validates the pairing invariant: non-empty, even length, every
    /// symbol on exactly two cards.
    pub fn from_layout(symbols: &[SymbolId]) -> Result<Self, LayoutError> {
        if symbols.is_empty() {
            return Err(LayoutError::Empty);
        }
        if symbols.len() % 2 != 0 {
            return Err(LayoutError::OddLength(symbols.len()));
        }

        let mut counts: FxHashMap<SymbolId, usize> = FxHashMap::default();
        for &symbol in symbols {
            *counts.entry(symbol).or_default() += 1;
        }
        for (&symbol, &count) in &counts {
            if count != 2 {
                return Err(LayoutError::UnpairedSymbol { symbol, count });
            }
        }

        Ok(Self::from_symbols(symbols.to_vec()))
    }

    /// Rebuild a deck from already-validated cards (snapshot restore).
    pub(crate) fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    fn from_symbols(symbols: Vec<SymbolId>) -> Self {
        let cards = symbols
            .into_iter()
            .enumerate()
            .map(|(i, symbol)| Card::new(CardId::new(i as u16), symbol))
            .collect();

        Self { cards }
    }

    /// Number of cards on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Is the board empty? (Never true for a dealt deck.)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of symbol pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// Get a card by id.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    /// Get a mutable card by id.
    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(id.index())
    }

    /// All cards in board order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Iterate over cards in board order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Count of cards whose pair has been found.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_matched()).count()
    }

    /// Has every pair been found?
    #[must_use]
    pub fn is_all_matched(&self) -> bool {
        self.cards.iter().all(|c| c.is_matched())
    }
}
