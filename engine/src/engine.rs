use std::collections::HashMap;

use rand::Rng;

use crate::action::{self, LegalAction, PlayerAction};
use crate::card::Card;
use crate::config::TableConfig;
use crate::deck::Deck;
use crate::error::{EngineError, IllegalActionReason};
use crate::hand::Evaluation;
use crate::pot::{self, Pot};
use crate::seat::{PositionRole, Seat};
use crate::snapshot::{Phase, SeatView, TableSnapshot, ViewerScope, Winner};

/// The rules core for a single table. Holds everything needed to drive one
/// hand at a time; owns no I/O and knows nothing about transport, which is
/// exactly what lets the Table Actor wrap it behind a serial command loop.
#[derive(Debug, Clone)]
pub struct Engine {
    config: TableConfig,
    seats: Vec<Seat>,
    deck: Deck,
    community: Vec<Card>,
    phase: Option<Phase>,
    high_bet: u64,
    /// The contribution level immediately before the most recent full
    /// (reopening) bet or raise. The standard min-raise-to is
    /// `2 * high_bet - last_raise_base`.
    last_raise_base: u64,
    to_act: Option<usize>,
    dealer: Option<usize>,
    hands_played: u64,
    winners: Option<Vec<Winner>>,
}

impl Engine {
    pub fn new(config: TableConfig) -> Self {
        Engine {
            config,
            seats: Vec::new(),
            deck: Deck::new(),
            community: Vec::new(),
            phase: None,
            high_bet: 0,
            last_raise_base: 0,
            to_act: None,
            dealer: None,
            hands_played: 0,
            winners: None,
        }
    }

    pub fn config(&self) -> TableConfig {
        self.config
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_occupied()).count()
    }

    fn seat(&self, index: usize) -> Result<&Seat, EngineError> {
        self.seats
            .get(index)
            .filter(|s| s.is_occupied())
            .ok_or(EngineError::UnknownSeat)
    }

    fn seat_mut(&mut self, index: usize) -> Result<&mut Seat, EngineError> {
        self.seats
            .get_mut(index)
            .filter(|s| s.is_occupied())
            .ok_or(EngineError::UnknownSeat)
    }

    /// Add a new player, returning the seat index assigned. Indices are
    /// handed out by a monotonic counter (`seats.len()`) and never reused,
    /// even after `remove_seat` vacates one.
    pub fn add_seat(&mut self, name: String, chips: u64) -> Result<usize, EngineError> {
        if self.occupied_count() >= self.config.max_seats {
            return Err(EngineError::TableFull);
        }
        let index = self.seats.len();
        self.seats.push(Seat::new(index, name, chips));
        Ok(index)
    }

    /// Vacate a seat. If a hand is in progress the seat keeps playing it out
    /// (already-dealt chips and cards are untouched); it simply won't be
    /// dealt into the next hand.
    pub fn remove_seat(&mut self, index: usize) -> Result<(), EngineError> {
        let seat = self.seat_mut(index)?;
        seat.removed = true;
        Ok(())
    }

    /// Find the next occupied seat, in increasing-index (clockwise) order
    /// starting after `from` and wrapping, whose current state satisfies
    /// `pred`.
    fn next_seat_matching(&self, from: usize, pred: impl Fn(&Seat) -> bool) -> Option<usize> {
        let n = self.seats.len();
        if n == 0 {
            return None;
        }
        for step in 1..=n {
            let idx = (from + step) % n;
            let seat = &self.seats[idx];
            if seat.is_occupied() && pred(seat) {
                return Some(idx);
            }
        }
        None
    }

    fn funded_seat_indices(&self) -> Vec<usize> {
        self.seats
            .iter()
            .filter(|s| s.is_funded())
            .map(|s| s.index)
            .collect()
    }

    /// Begin a new hand: rotate the button, collect antes and blinds, deal
    /// hole cards, and set the first seat to act (spec §4.3.1).
    pub fn start_hand(&mut self, rng: &mut impl Rng) -> Result<(), EngineError> {
        let funded = self.funded_seat_indices();
        if funded.len() < 2 {
            return Err(EngineError::InsufficientPlayers);
        }

        self.deck.reset();
        self.deck.shuffle(rng);
        self.community.clear();
        self.winners = None;
        for seat in self.seats.iter_mut().filter(|s| s.is_occupied()) {
            seat.reset_for_hand();
        }

        let dealer = match self.dealer {
            None => self
                .seats
                .iter()
                .find(|s| s.is_funded() && s.index == 0)
                .map(|s| s.index)
                .unwrap_or(funded[0]),
            Some(previous) => self
                .next_seat_matching(previous, |s| s.is_funded())
                .expect("at least two funded seats means a next funded seat exists"),
        };
        self.dealer = Some(dealer);

        let heads_up = funded.len() == 2;
        let (sb, bb) = if heads_up {
            let bb = self
                .next_seat_matching(dealer, |s| s.is_funded())
                .expect("heads-up has exactly one other funded seat");
            (dealer, bb)
        } else {
            let sb = self
                .next_seat_matching(dealer, |s| s.is_funded())
                .expect("funded seats >= 2");
            let bb = self
                .next_seat_matching(sb, |s| s.is_funded())
                .expect("funded seats >= 3");
            (sb, bb)
        };

        for &idx in &funded {
            self.seats[idx].in_hand = true;
        }
        self.seats[dealer].position = if heads_up {
            PositionRole::SmallBlind
        } else {
            PositionRole::Dealer
        };
        self.seats[sb].position = PositionRole::SmallBlind;
        self.seats[bb].position = PositionRole::BigBlind;

        if self.config.ante > 0 {
            for &idx in &funded {
                let ante = self.config.ante;
                self.seats[idx].contribute(ante);
            }
        }
        let small_blind = self.config.small_blind;
        let big_blind = self.config.big_blind;
        self.seats[sb].contribute(small_blind);
        self.seats[bb].contribute(big_blind);

        for &idx in &funded {
            let cards = self.deck.draw_n(2)?;
            self.seats[idx].hole_cards = Some((cards[0], cards[1]));
        }

        self.high_bet = big_blind;
        self.last_raise_base = 0;
        self.phase = Some(Phase::PreFlop);
        self.hands_played += 1;

        if self.actable_seats().is_empty() {
            // Every funded seat went all-in posting antes/blinds: run the
            // board out with no betting at all.
            self.close_round_and_advance()?;
        } else {
            self.to_act = Some(if heads_up {
                if self.seats[dealer].can_act() {
                    dealer
                } else {
                    self.next_seat_matching(dealer, |s| s.can_act()).unwrap_or(dealer)
                }
            } else {
                self.next_seat_matching(bb, |s| s.can_act()).unwrap_or(bb)
            });
        }
        Ok(())
    }

    fn min_raise_to(&self, high_bet: u64) -> u64 {
        2 * high_bet - self.last_raise_base
    }

    /// The structured set of actions legal for `seat_index` right now. Empty
    /// (not an error) whenever it isn't that seat's turn.
    pub fn legal_actions(&self, seat_index: usize) -> Result<Vec<LegalAction>, EngineError> {
        let seat = self.seat(seat_index)?;
        if self.to_act != Some(seat_index) {
            return Ok(Vec::new());
        }
        let c = seat.chips;
        let r = seat.round_contribution;
        let h = self.high_bet;

        let mut actions = vec![LegalAction::Fold];
        if h == r {
            actions.push(LegalAction::Check);
        } else {
            actions.push(LegalAction::Call {
                amount: c.min(h - r),
            });
        }
        if h == 0 && c >= self.config.big_blind {
            actions.push(LegalAction::Bet { min: self.config.big_blind, max: c });
        }
        if h > 0 && !seat.has_acted {
            let min_to = self.min_raise_to(h);
            if min_to <= c + r {
                actions.push(LegalAction::RaiseTo { min: min_to, max: c + r });
            }
        }
        if c > 0 {
            actions.push(LegalAction::AllIn { amount: c });
        }
        Ok(actions)
    }

    /// Apply one action from the seat currently to act (spec §4.3.2-4.3.3).
    pub fn act(&mut self, seat_index: usize, action: PlayerAction) -> Result<(), EngineError> {
        match self.phase {
            Some(Phase::PreFlop) | Some(Phase::Flop) | Some(Phase::Turn) | Some(Phase::River) => {}
            _ => return Err(EngineError::WrongPhase),
        }
        if self.to_act != Some(seat_index) {
            return Err(EngineError::NotYourTurn);
        }

        let seat = self.seat(seat_index)?;
        let c = seat.chips;
        let r = seat.round_contribution;
        let h = self.high_bet;

        match action {
            PlayerAction::Fold => {}
            PlayerAction::Check => {
                if h != r {
                    return Err(illegal(IllegalActionReason::CheckWithBetOutstanding));
                }
            }
            PlayerAction::Call => {
                if h <= r {
                    return Err(illegal(IllegalActionReason::CallWithNoBet));
                }
            }
            PlayerAction::Bet(x) => {
                if h != 0 {
                    return Err(illegal(IllegalActionReason::BetWhileBetOutstanding));
                }
                if x < self.config.big_blind {
                    return Err(illegal(IllegalActionReason::BetBelowMinimum));
                }
                if x > c {
                    return Err(illegal(IllegalActionReason::AmountExceedsStack));
                }
            }
            PlayerAction::RaiseTo(x) => {
                if h == 0 {
                    return Err(illegal(IllegalActionReason::RaiseWithNoBet));
                }
                if seat.has_acted {
                    return Err(illegal(IllegalActionReason::RaiseRightsExhausted));
                }
                if x < self.min_raise_to(h) {
                    return Err(illegal(IllegalActionReason::RaiseBelowMinimum));
                }
                if x > c + r {
                    return Err(illegal(IllegalActionReason::AmountExceedsStack));
                }
            }
            PlayerAction::AllIn => {
                if c == 0 {
                    return Err(illegal(IllegalActionReason::ActionRequiresChips));
                }
            }
        }

        self.apply_action(seat_index, action);
        self.after_action()
    }

    fn apply_action(&mut self, seat_index: usize, action: PlayerAction) {
        let h = self.high_bet;
        match action {
            PlayerAction::Fold => {
                self.seats[seat_index].folded = true;
                self.seats[seat_index].has_acted = true;
            }
            PlayerAction::Check => {
                self.seats[seat_index].has_acted = true;
            }
            PlayerAction::Call => {
                let r = self.seats[seat_index].round_contribution;
                let cost = h.saturating_sub(r);
                self.seats[seat_index].contribute(cost);
                self.seats[seat_index].has_acted = true;
            }
            PlayerAction::Bet(x) => {
                self.seats[seat_index].contribute(x);
                self.last_raise_base = 0;
                self.high_bet = x;
                self.seats[seat_index].has_acted = true;
                self.reopen_for_others(seat_index);
            }
            PlayerAction::RaiseTo(x) => {
                let r = self.seats[seat_index].round_contribution;
                self.seats[seat_index].contribute(x - r);
                self.last_raise_base = h;
                self.high_bet = x;
                self.seats[seat_index].has_acted = true;
                self.reopen_for_others(seat_index);
            }
            PlayerAction::AllIn => {
                let r = self.seats[seat_index].round_contribution;
                let c = self.seats[seat_index].chips;
                self.seats[seat_index].contribute(c);
                let new_total = r + c;
                self.seats[seat_index].has_acted = true;
                if new_total > h {
                    let required = if h == 0 { 0 } else { self.min_raise_to(h) };
                    let is_full_raise = h == 0 || new_total >= required;
                    self.high_bet = new_total;
                    if is_full_raise {
                        self.last_raise_base = h;
                        self.reopen_for_others(seat_index);
                    }
                }
            }
        }
    }

    fn reopen_for_others(&mut self, actor: usize) {
        for seat in self.seats.iter_mut() {
            if seat.index != actor && seat.is_occupied() && seat.in_hand && !seat.folded && !seat.all_in {
                seat.has_acted = false;
            }
        }
    }

    fn live_seats(&self) -> Vec<usize> {
        self.seats
            .iter()
            .filter(|s| s.is_live())
            .map(|s| s.index)
            .collect()
    }

    fn actable_seats(&self) -> Vec<usize> {
        self.seats
            .iter()
            .filter(|s| s.can_act())
            .map(|s| s.index)
            .collect()
    }

    /// Decide what happens after chip movement settles: the hand ends
    /// uncontested, the round stays open, or it closes and the phase
    /// advances (spec §4.3.5-4.3.6).
    fn after_action(&mut self) -> Result<(), EngineError> {
        let live = self.live_seats();
        if live.len() <= 1 {
            let winner = live.first().copied();
            self.finish_uncontested(winner);
            return Ok(());
        }

        let actable = self.actable_seats();
        if actable.is_empty() {
            return self.close_round_and_advance();
        }

        let round_complete = live.iter().all(|&i| {
            let s = &self.seats[i];
            s.all_in || (s.has_acted && s.round_contribution == self.high_bet)
        });
        if round_complete {
            return self.close_round_and_advance();
        }

        let current = self.to_act.expect("a live round always has someone to act");
        self.to_act = self.next_seat_matching(current, |s| s.can_act());
        Ok(())
    }

    fn close_round_and_advance(&mut self) -> Result<(), EngineError> {
        loop {
            let reached_showdown = self.advance_phase()?;
            if reached_showdown {
                self.settle_showdown();
                return Ok(());
            }
            let dealer = self.dealer.expect("dealer is set once a hand has started");
            if let Some(idx) = self.next_seat_matching(dealer, |s| s.can_act()) {
                self.to_act = Some(idx);
                return Ok(());
            }
            // Nobody left who can voluntarily act: keep running the board out.
        }
    }

    /// Perform one phase step: burn/deal the appropriate community cards and
    /// reset per-round seat fields. Returns `true` once showdown is reached.
    fn advance_phase(&mut self) -> Result<bool, EngineError> {
        for seat in self.seats.iter_mut() {
            if seat.is_occupied() && seat.in_hand && !seat.folded {
                seat.reset_for_round();
            }
        }
        self.high_bet = 0;
        self.last_raise_base = 0;

        let next = match self.phase {
            Some(Phase::PreFlop) => Phase::Flop,
            Some(Phase::Flop) => Phase::Turn,
            Some(Phase::Turn) => Phase::River,
            Some(Phase::River) => Phase::Showdown,
            _ => return Err(EngineError::WrongPhase),
        };

        match next {
            Phase::Flop => {
                self.deck.draw()?;
                self.community.extend(self.deck.draw_n(3)?);
            }
            Phase::Turn | Phase::River => {
                self.deck.draw()?;
                self.community.extend(self.deck.draw_n(1)?);
            }
            _ => {}
        }

        self.phase = Some(next);
        Ok(next == Phase::Showdown)
    }

    /// The hand ended by folds rather than reaching showdown: the sole
    /// remaining seat takes every pot it's eligible for, no evaluation
    /// needed (spec §4.3.7, open question: no further cards are dealt).
    fn finish_uncontested(&mut self, winner: Option<usize>) {
        let pots = pot::recompute_side_pots(&self.seats);
        let total = pot::total(&pots);
        let mut winners = Vec::new();
        if let (Some(w), true) = (winner, total > 0) {
            self.seats[w].chips += total;
            winners.push(Winner {
                seat: w,
                category_name: "Uncontested".to_string(),
                amount: total,
            });
        }
        self.drain_contributions();
        self.winners = Some(winners);
        self.phase = Some(Phase::Showdown);
        self.to_act = None;
    }

    fn drain_contributions(&mut self) {
        for seat in self.seats.iter_mut() {
            seat.hand_contribution = 0;
            seat.round_contribution = 0;
        }
    }

    fn order_clockwise_from_dealer(&self, subset: &[usize]) -> Vec<usize> {
        let dealer = self.dealer.unwrap_or(0);
        let n = self.seats.len();
        let mut ordered = Vec::new();
        for step in 1..=n {
            let idx = (dealer + step) % n;
            if subset.contains(&idx) {
                ordered.push(idx);
            }
        }
        ordered
    }

    /// Evaluate every eligible hand pot by pot and pay out (spec §4.3.7).
    fn settle_showdown(&mut self) {
        let pots: Vec<Pot> = pot::recompute_side_pots(&self.seats);
        let mut payouts: HashMap<usize, u64> = HashMap::new();
        let mut categories: HashMap<usize, &'static str> = HashMap::new();

        for pot in &pots {
            let mut best: Option<Evaluation> = None;
            let mut winners: Vec<usize> = Vec::new();
            for &idx in &pot.eligible {
                let seat = &self.seats[idx];
                if seat.folded {
                    continue;
                }
                let (h1, h2) = seat
                    .hole_cards
                    .expect("every seat dealt into a showdown hand has hole cards");
                let mut cards = self.community.clone();
                cards.push(h1);
                cards.push(h2);
                let eval = Evaluation::of(&cards);
                categories.insert(idx, eval.category_name());
                match &best {
                    None => {
                        best = Some(eval);
                        winners = vec![idx];
                    }
                    Some(current) if eval.value > current.value => {
                        best = Some(eval);
                        winners = vec![idx];
                    }
                    Some(current) if eval.value == current.value => {
                        winners.push(idx);
                    }
                    _ => {}
                }
            }
            if winners.is_empty() {
                continue;
            }
            let ordered = self.order_clockwise_from_dealer(&winners);
            let share = pot.amount / ordered.len() as u64;
            let remainder = pot.amount % ordered.len() as u64;
            for (i, &w) in ordered.iter().enumerate() {
                let extra = if (i as u64) < remainder { 1 } else { 0 };
                *payouts.entry(w).or_insert(0) += share + extra;
            }
        }

        let mut winner_list: Vec<Winner> = payouts
            .into_iter()
            .map(|(seat, amount)| Winner {
                seat,
                category_name: categories.get(&seat).copied().unwrap_or("").to_string(),
                amount,
            })
            .collect();
        winner_list.sort_by_key(|w| w.seat);

        for w in &winner_list {
            self.seats[w.seat].chips += w.amount;
        }
        self.drain_contributions();
        self.winners = Some(winner_list);
        self.to_act = None;
    }

    /// The authoritative, personalizable view of the table (spec §4.3.8).
    /// `ViewerScope::God` surfaces every seat's hole cards; everyone else
    /// only ever sees their own.
    pub fn snapshot(&self, viewer: ViewerScope) -> TableSnapshot {
        let pots = pot::recompute_side_pots(&self.seats);
        let pot_total = pot::total(&pots);

        let seats = self
            .seats
            .iter()
            .filter(|s| s.is_occupied())
            .map(|s| SeatView {
                index: s.index,
                name: s.name.clone(),
                chips: s.chips,
                round_contribution: s.round_contribution,
                position: s.position,
                folded: s.folded,
                all_in: s.all_in,
                hole_cards: match viewer {
                    ViewerScope::Seat(v) if v == s.index => s.hole_cards,
                    ViewerScope::God => s.hole_cards,
                    _ => None,
                },
            })
            .collect();

        let legal_actions = match viewer {
            ViewerScope::Seat(v) if self.to_act == Some(v) => self.legal_actions(v).unwrap_or_default(),
            _ => Vec::new(),
        };

        let small_blind_seat = self
            .seats
            .iter()
            .find(|s| s.position == PositionRole::SmallBlind)
            .map(|s| s.index);
        let big_blind_seat = self
            .seats
            .iter()
            .find(|s| s.position == PositionRole::BigBlind)
            .map(|s| s.index);

        TableSnapshot {
            phase: self.phase,
            community_cards: self.community.clone(),
            seats,
            to_act: self.to_act,
            dealer: self.dealer,
            small_blind_seat,
            big_blind_seat,
            pot_total,
            high_bet: self.high_bet,
            legal_actions: action::to_wire_map(&legal_actions),
            winners: self.winners.clone(),
            message: self.settlement_message(),
            hands_played: self.hands_played,
        }
    }

    /// A human-readable summary of the most recent settlement, e.g. "Alice
    /// wins 40 with Two Pair" or "Alice and Bob split 30".
    fn settlement_message(&self) -> Option<String> {
        let winners = self.winners.as_ref()?;
        match winners.as_slice() {
            [] => None,
            [w] => {
                let name = &self.seats[w.seat].name;
                Some(format!("{name} wins {} with {}", w.amount, w.category_name))
            }
            many => {
                let names: Vec<&str> = many.iter().map(|w| self.seats[w.seat].name.as_str()).collect();
                let total: u64 = many.iter().map(|w| w.amount).sum();
                Some(format!("{} split {}", names.join(" and "), total))
            }
        }
    }
}

fn illegal(reason: IllegalActionReason) -> EngineError {
    EngineError::IllegalAction(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn c(text: &str) -> Card {
        text.parse().unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn total_chips(engine: &Engine) -> u64 {
        let in_play: u64 = engine.seats.iter().map(|s| s.chips).sum();
        let pots = pot::total(&pot::recompute_side_pots(&engine.seats));
        in_play + pots
    }

    #[test]
    fn heads_up_preflop_fold_awards_pot_uncontested() {
        let mut engine = Engine::new(TableConfig::new(5, 10, 6));
        engine.add_seat("Alice".into(), 1000).unwrap();
        engine.add_seat("Bob".into(), 1000).unwrap();
        let before = total_chips(&engine);

        engine.start_hand(&mut rng()).unwrap();
        let to_act = engine.to_act.unwrap();
        engine.act(to_act, PlayerAction::Fold).unwrap();

        let snapshot = engine.snapshot(ViewerScope::Spectator);
        assert_eq!(snapshot.phase, Some(Phase::Showdown));
        assert_eq!(snapshot.to_act, None);
        let winners = snapshot.winners.expect("uncontested hand reports a winner");
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].category_name, "Uncontested");
        // An uncontested hand never deals past whatever the board was at
        // the moment of the fold (open question: no run-out on a fold).
        assert_eq!(snapshot.community_cards.len(), 0);
        assert_eq!(total_chips(&engine), before);
    }

    #[test]
    fn min_raise_grows_by_the_last_full_raise_size() {
        let mut engine = Engine::new(TableConfig::new(5, 10, 6));
        engine.add_seat("Alice".into(), 1000).unwrap();
        engine.add_seat("Bob".into(), 1000).unwrap();
        engine.add_seat("Carol".into(), 1000).unwrap();
        engine.start_hand(&mut rng()).unwrap();

        // Preflop: high_bet = 10 (the big blind), nobody has raised yet, so
        // the first raise must reach at least double it.
        let first_to_act = engine.to_act.unwrap();
        let actions = engine.legal_actions(first_to_act).unwrap();
        let raise = actions.iter().find_map(|a| match a {
            LegalAction::RaiseTo { min, .. } => Some(*min),
            _ => None,
        });
        assert_eq!(raise, Some(20));

        engine.act(first_to_act, PlayerAction::RaiseTo(30)).unwrap();
        let next = engine.to_act.unwrap();
        let actions = engine.legal_actions(next).unwrap();
        let raise = actions.iter().find_map(|a| match a {
            LegalAction::RaiseTo { min, .. } => Some(*min),
            _ => None,
        });
        // Raised from 10 to 30 (a 20-chip raise); the next full raise must
        // reach 30 + 20 = 50.
        assert_eq!(raise, Some(50));
    }

    #[test]
    fn short_all_in_does_not_reopen_a_seat_that_already_raised() {
        let mut engine = Engine::new(TableConfig::new(5, 10, 6));
        engine.add_seat("Alice".into(), 1000).unwrap();
        engine.add_seat("Bob".into(), 25).unwrap();
        engine.add_seat("Carol".into(), 1000).unwrap();
        engine.start_hand(&mut rng()).unwrap();

        let alice = engine.to_act.unwrap();
        engine.act(alice, PlayerAction::RaiseTo(20)).unwrap();
        let bob = engine.next_seat_matching(alice, |s| s.can_act()).unwrap();
        engine.act(bob, PlayerAction::AllIn).unwrap(); // 20 more chips: high_bet becomes 25, short of the 30 min-raise-to.
        assert_eq!(engine.high_bet, 25);

        let carol = engine.next_seat_matching(bob, |s| s.can_act()).unwrap();
        engine.act(carol, PlayerAction::Call).unwrap();

        // Alice is forced back to the table to cover Bob's extra 5, but
        // since his shove didn't meet the full raise size, she should not
        // be offered a raise again.
        assert_eq!(engine.to_act, Some(alice));
        let actions = engine.legal_actions(alice).unwrap();
        assert!(!actions.iter().any(|a| matches!(a, LegalAction::RaiseTo { .. })));
        let err = engine.act(alice, PlayerAction::RaiseTo(50)).unwrap_err();
        assert_eq!(
            err,
            EngineError::IllegalAction(IllegalActionReason::RaiseRightsExhausted)
        );
    }

    #[test]
    fn side_pots_split_correctly_among_tiered_all_ins() {
        let mut engine = Engine::new(TableConfig::new(5, 10, 6));
        engine.add_seat("Alice".into(), 50).unwrap();
        engine.add_seat("Bob".into(), 100).unwrap();
        engine.add_seat("Carol".into(), 200).unwrap();
        for seat in engine.seats.iter_mut() {
            seat.in_hand = true;
            seat.contribute(seat.chips);
        }
        engine.community = vec![c("2H"), c("7D"), c("9C"), c("JS"), c("4C")];
        engine.seats[0].hole_cards = Some((c("AH"), c("AS"))); // Alice: best hand, wins every pot she's eligible for.
        engine.seats[1].hole_cards = Some((c("KH"), c("KS")));
        engine.seats[2].hole_cards = Some((c("QH"), c("QS")));
        engine.phase = Some(Phase::River);
        engine.dealer = Some(0);

        engine.settle_showdown();

        // Main pot (150 = 50*3) to Alice. Side pot (100, Bob vs Carol's
        // next 50 each) to Bob. The top tier (Carol's own uncontested
        // excess, 100) returns to Carol since nobody else reached it.
        assert_eq!(engine.seats[0].chips, 150);
        assert_eq!(engine.seats[1].chips, 100);
        assert_eq!(engine.seats[2].chips, 100);
        assert_eq!(total_chips(&engine), 350);
    }

    #[test]
    fn tied_hands_split_the_pot_with_clockwise_remainder() {
        let mut engine = Engine::new(TableConfig::new(5, 10, 6));
        engine.add_seat("Alice".into(), 50).unwrap();
        engine.add_seat("Bob".into(), 50).unwrap();
        engine.add_seat("Carol".into(), 50).unwrap();
        for seat in engine.seats.iter_mut() {
            seat.in_hand = true;
            seat.contribute(seat.chips);
        }
        engine.community = vec![c("2H"), c("7D"), c("9C"), c("JS"), c("4C")];
        engine.seats[0].hole_cards = Some((c("AH"), c("AS")));
        engine.seats[1].hole_cards = Some((c("AD"), c("AC"))); // Tied with Alice.
        engine.seats[2].hole_cards = Some((c("QH"), c("QS")));
        engine.phase = Some(Phase::River);
        engine.dealer = Some(2); // Clockwise from dealer: Alice then Bob.

        engine.settle_showdown();

        // 150 split two ways is 75 apiece; no remainder to distribute.
        assert_eq!(engine.seats[0].chips, 75);
        assert_eq!(engine.seats[1].chips, 75);
        assert_eq!(engine.seats[2].chips, 0);
    }

    #[test]
    fn full_four_way_hand_conserves_chips_through_showdown() {
        let mut engine = Engine::new(TableConfig::new(5, 10, 6));
        for name in ["Alice", "Bob", "Carol", "Dave"] {
            engine.add_seat(name.into(), 500).unwrap();
        }
        let before = total_chips(&engine);
        engine.start_hand(&mut rng()).unwrap();

        // Everyone checks or calls their way to showdown.
        for _ in 0..40 {
            let Some(seat) = engine.to_act else { break };
            let actions = engine.legal_actions(seat).unwrap();
            let action = if actions.contains(&LegalAction::Check) {
                PlayerAction::Check
            } else {
                PlayerAction::Call
            };
            engine.act(seat, action).unwrap();
            if engine.phase == Some(Phase::Showdown) {
                break;
            }
        }

        assert_eq!(engine.phase, Some(Phase::Showdown));
        assert_eq!(engine.community.len(), 5);
        assert_eq!(total_chips(&engine), before);
    }

    #[test]
    fn rejected_action_leaves_state_unchanged() {
        let mut engine = Engine::new(TableConfig::new(5, 10, 6));
        engine.add_seat("Alice".into(), 1000).unwrap();
        engine.add_seat("Bob".into(), 1000).unwrap();
        engine.start_hand(&mut rng()).unwrap();

        let before = engine.snapshot(ViewerScope::God);
        let to_act = engine.to_act.unwrap();
        let err = engine.act(to_act, PlayerAction::Check).unwrap_err();
        assert_eq!(
            err,
            EngineError::IllegalAction(IllegalActionReason::CheckWithBetOutstanding)
        );
        let after = engine.snapshot(ViewerScope::God);
        assert_eq!(before.to_act, after.to_act);
        assert_eq!(before.pot_total, after.pot_total);
    }
}
