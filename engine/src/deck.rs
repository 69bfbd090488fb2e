use rand::seq::SliceRandom;
use rand::Rng;

use crate::card::{Card, RANKS, SUITS};
use crate::error::EngineError;

/// An ordered sequence of cards. `draw` takes from the end so shuffling and
/// popping stay O(1); `reset` restores the canonical suit-major order.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(52);
        for &suit in &SUITS {
            for &rank in &RANKS {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    /// Restore all 52 cards in canonical order, discarding any prior shuffle
    /// or draws.
    pub fn reset(&mut self) {
        *self = Deck::new();
    }

    /// Fisher-Yates shuffle on the caller-supplied RNG, so callers can pin
    /// a seeded RNG in tests and a real one in production.
    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.cards.shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn draw(&mut self) -> Result<Card, EngineError> {
        self.cards.pop().ok_or(EngineError::DeckExhausted)
    }

    pub fn draw_n(&mut self, n: usize) -> Result<Vec<Card>, EngineError> {
        if self.cards.len() < n {
            return Err(EngineError::DeckExhausted);
        }
        Ok((0..n).map(|_| self.cards.pop().unwrap()).collect())
    }
}

impl Default for Deck {
    fn default() -> Self {
        Deck::new()
    }
}
