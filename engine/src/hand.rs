use std::cmp::Ordering;
use std::collections::HashMap;

use itertools::Itertools;

use crate::card::{Card, Rank};

/// Hand categories, ordered low to high by declaration order (the `Ord`
/// derive walks variants top to bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl HandCategory {
    pub fn name(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::Pair => "Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        }
    }
}

/// A five-card hand's ranking: category plus a tiebreak key rich enough to
/// resolve any non-tied pair. `tiebreak` holds rank values (2=0..A=12) in
/// the order that matters for the category (group ranks first, then
/// descending kickers); the ace-low straight is represented as tiebreak
/// value `-1` via `WHEEL_HIGH` so it sorts below every other straight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandValue {
    pub category: HandCategory,
    pub tiebreak: Vec<i8>,
}

impl PartialOrd for HandValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.tiebreak.cmp(&other.tiebreak))
    }
}

/// Sentinel tiebreak value for the wheel (A-2-3-4-5), which ranks as the
/// lowest possible straight/straight-flush.
const WHEEL_HIGH: i8 = -1;

/// Evaluate the best 5-card hand out of 5..=7 cards.
pub fn evaluate(cards: &[Card]) -> HandValue {
    assert!(
        (5..=7).contains(&cards.len()),
        "evaluate expects 5 to 7 cards, got {}",
        cards.len()
    );
    if cards.len() == 5 {
        return evaluate_five(cards);
    }
    cards
        .iter()
        .copied()
        .combinations(5)
        .map(|five| evaluate_five(&five))
        .max()
        .expect("combinations(5) of a non-empty slice is non-empty")
}

fn evaluate_five(cards: &[Card]) -> HandValue {
    debug_assert_eq!(cards.len(), 5);

    let mut rank_counts: HashMap<Rank, u8> = HashMap::new();
    for card in cards {
        *rank_counts.entry(card.rank).or_insert(0) += 1;
    }
    let first_suit = cards[0].suit;
    let is_flush = cards.iter().all(|c| c.suit == first_suit);
    let straight_high = straight_high_tiebreak(cards);

    if let Some(high) = straight_high {
        if is_flush {
            let category = if high == Rank::Ace.value() as i8 {
                HandCategory::RoyalFlush
            } else {
                HandCategory::StraightFlush
            };
            return HandValue {
                category,
                tiebreak: vec![high],
            };
        }
    }

    let mut groups: Vec<(Rank, u8)> = rank_counts.into_iter().collect();
    // Sort by count desc, then rank desc, so grouped tiebreaks and kickers
    // fall out in the right order without extra bookkeeping per category.
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    let counts: Vec<u8> = groups.iter().map(|&(_, c)| c).collect();

    if counts[0] == 4 {
        let tiebreak = groups.iter().map(|&(r, _)| r.value() as i8).collect();
        return HandValue {
            category: HandCategory::FourOfAKind,
            tiebreak,
        };
    }

    if counts[0] == 3 && counts.get(1) == Some(&2) {
        return HandValue {
            category: HandCategory::FullHouse,
            tiebreak: vec![groups[0].0.value() as i8, groups[1].0.value() as i8],
        };
    }

    if is_flush {
        let mut tiebreak: Vec<i8> = cards.iter().map(|c| c.rank.value() as i8).collect();
        tiebreak.sort_unstable_by(|a, b| b.cmp(a));
        return HandValue {
            category: HandCategory::Flush,
            tiebreak,
        };
    }

    if let Some(high) = straight_high {
        return HandValue {
            category: HandCategory::Straight,
            tiebreak: vec![high],
        };
    }

    if counts[0] == 3 {
        let mut tiebreak = vec![groups[0].0.value() as i8];
        tiebreak.extend(groups[1..].iter().map(|&(r, _)| r.value() as i8));
        return HandValue {
            category: HandCategory::ThreeOfAKind,
            tiebreak,
        };
    }

    if counts[0] == 2 && counts.get(1) == Some(&2) {
        let kicker = groups[2].0.value() as i8;
        return HandValue {
            category: HandCategory::TwoPair,
            tiebreak: vec![groups[0].0.value() as i8, groups[1].0.value() as i8, kicker],
        };
    }

    if counts[0] == 2 {
        let mut tiebreak = vec![groups[0].0.value() as i8];
        tiebreak.extend(groups[1..].iter().map(|&(r, _)| r.value() as i8));
        return HandValue {
            category: HandCategory::Pair,
            tiebreak,
        };
    }

    let mut tiebreak: Vec<i8> = groups.iter().map(|&(r, _)| r.value() as i8).collect();
    tiebreak.sort_unstable_by(|a, b| b.cmp(a));
    HandValue {
        category: HandCategory::HighCard,
        tiebreak,
    }
}

/// Returns the tiebreak value of the straight's high card, or `None` if the
/// five cards don't form a straight. The wheel (A-2-3-4-5) reports
/// `WHEEL_HIGH`, ranking below every other straight's high card.
fn straight_high_tiebreak(cards: &[Card]) -> Option<i8> {
    let mut values: Vec<i8> = cards.iter().map(|c| c.rank.value() as i8).collect();
    values.sort_unstable();
    values.dedup();
    if values.len() != 5 {
        return None;
    }
    let is_run = values.windows(2).all(|w| w[1] - w[0] == 1);
    if is_run {
        return Some(values[4]);
    }
    let ace = Rank::Ace.value() as i8;
    if values == [0, 1, 2, 3, ace] {
        return Some(WHEEL_HIGH);
    }
    None
}

/// Result of evaluating a hand worth surfacing to a client: category name
/// plus the machine-comparable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub value: HandValue,
}

impl Evaluation {
    pub fn of(cards: &[Card]) -> Self {
        Evaluation {
            value: evaluate(cards),
        }
    }

    pub fn category_name(&self) -> &'static str {
        self.value.category.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn c(text: &str) -> Card {
        text.parse().unwrap()
    }

    fn hand(cards: &[&str]) -> HandValue {
        evaluate(&cards.iter().map(|s| c(s)).collect::<Vec<_>>())
    }

    #[test]
    fn royal_flush_beats_straight_flush() {
        let royal = hand(&["AH", "KH", "QH", "JH", "TH"]);
        let straight_flush = hand(&["9S", "8S", "7S", "6S", "5S"]);
        assert_eq!(royal.category, HandCategory::RoyalFlush);
        assert_eq!(straight_flush.category, HandCategory::StraightFlush);
        assert!(royal > straight_flush);
    }

    #[test]
    fn wheel_is_lowest_straight() {
        let wheel = hand(&["AH", "2D", "3C", "4S", "5H"]);
        let six_high = hand(&["6H", "5D", "4C", "3S", "2H"]);
        assert_eq!(wheel.category, HandCategory::Straight);
        assert!(wheel < six_high);
    }

    #[test]
    fn broadway_beats_wheel_and_kqjt9() {
        let broadway = hand(&["AH", "KD", "QC", "JS", "TH"]);
        let kqjt9 = hand(&["KH", "QD", "JC", "TS", "9H"]);
        assert!(kqjt9 < broadway);
    }

    #[test]
    fn full_house_tiebreak_is_trip_then_pair() {
        let aces_over_kings = hand(&["AH", "AD", "AC", "KS", "KH"]);
        let kings_over_aces = hand(&["KH", "KD", "KC", "AS", "AH"]);
        assert!(aces_over_kings > kings_over_aces);
    }

    #[test]
    fn four_of_a_kind_tiebreak_uses_kicker() {
        let quad_with_ace_kicker = hand(&["9H", "9D", "9C", "9S", "AH"]);
        let quad_with_king_kicker = hand(&["9H", "9D", "9C", "9S", "KH"]);
        assert!(quad_with_ace_kicker > quad_with_king_kicker);
    }

    #[test]
    fn seven_card_evaluator_picks_best_five() {
        let cards: Vec<Card> = ["AH", "KH", "QH", "JH", "TH", "2C", "3D"]
            .iter()
            .map(|s| c(s))
            .collect();
        assert_eq!(evaluate(&cards).category, HandCategory::RoyalFlush);
    }

    #[test]
    fn category_name_is_human_readable() {
        let eval = Evaluation::of(&["AH", "AD", "KC", "KS", "2H", "3D", "4C"]
            .iter()
            .map(|s| c(s))
            .collect::<Vec<_>>());
        assert_eq!(eval.category_name(), "Two Pair");
    }

    #[test]
    fn deterministic_for_same_cards() {
        let cards: Vec<Card> = ["AH", "KD", "QC", "JS", "TH", "9C", "8D"]
            .iter()
            .map(|s| c(s))
            .collect();
        assert_eq!(evaluate(&cards), evaluate(&cards));
    }
}
