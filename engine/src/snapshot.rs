use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::action::LegalActionParams;
use crate::card::Card;
use crate::seat::PositionRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Phase {
    /// The wire string for this phase (spec §6).
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::PreFlop => "pre_flop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::River => "river",
            Phase::Showdown => "showdown",
        }
    }

    /// The number of community cards that must be visible in this phase.
    pub fn community_card_count(self) -> usize {
        match self {
            Phase::PreFlop => 0,
            Phase::Flop => 3,
            Phase::Turn => 4,
            Phase::River | Phase::Showdown => 5,
        }
    }
}

/// Who a `Snapshot` call is addressed to, which governs whose hole cards
/// come back populated (spec §6, "Snapshot" / "God snapshot").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerScope {
    Seat(usize),
    Spectator,
    God,
}

/// The public view of one seat within a snapshot. `hole_cards` is populated
/// only for the seat the snapshot is addressed to (or for the god-view).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatView {
    pub index: usize,
    pub name: String,
    pub chips: u64,
    pub round_contribution: u64,
    pub position: PositionRole,
    pub folded: bool,
    pub all_in: bool,
    pub hole_cards: Option<(Card, Card)>,
}

/// One seat's share of a hand's payout, recorded for the snapshot
/// immediately following a showdown or fold-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Winner {
    pub seat: usize,
    pub category_name: String,
    pub amount: u64,
}

/// The authoritative, personalizable view of a table, returned by
/// `Engine::snapshot` (spec §4.3.8).
#[derive(Debug, Clone, Serialize)]
pub struct TableSnapshot {
    pub phase: Option<Phase>,
    pub community_cards: Vec<Card>,
    pub seats: Vec<SeatView>,
    pub to_act: Option<usize>,
    pub dealer: Option<usize>,
    pub small_blind_seat: Option<usize>,
    pub big_blind_seat: Option<usize>,
    pub pot_total: u64,
    pub high_bet: u64,
    /// Keyed by action name (spec §6, "legal-action map keyed by action
    /// name"), not an array — a client looks up `legal_actions.get("call")`
    /// rather than scanning a list for a tag.
    pub legal_actions: BTreeMap<&'static str, LegalActionParams>,
    pub winners: Option<Vec<Winner>>,
    /// Free-text summary of the last settlement, e.g. "Alice wins 40 with
    /// Two Pair". `None` whenever no hand has concluded yet.
    pub message: Option<String>,
    pub hands_played: u64,
}
