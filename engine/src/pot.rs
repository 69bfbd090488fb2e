use serde::{Deserialize, Serialize};

use crate::seat::Seat;

/// A chip pool plus the seats eligible to win it. Pots form a chain after
/// all-ins: for any two pots `P` before `Q`, `eligible(Q) ⊂ eligible(P)`
/// (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pot {
    pub amount: u64,
    pub eligible: Vec<usize>,
}

/// Recompute the pot chain from each seat's hand-to-date contribution,
/// folding status, and chip count (spec §4.3.4). Layers are built from
/// distinct all-in totals: seats with a smaller total contribution cap
/// what later seats can win from them.
pub fn recompute_side_pots(seats: &[Seat]) -> Vec<Pot> {
    let mut thresholds: Vec<u64> = seats
        .iter()
        .filter(|s| s.hand_contribution > 0)
        .map(|s| s.hand_contribution)
        .collect();
    thresholds.sort_unstable();
    thresholds.dedup();

    let mut pots = Vec::new();
    let mut previous = 0u64;

    for &threshold in &thresholds {
        let amount: u64 = seats
            .iter()
            .map(|s| {
                s.hand_contribution
                    .min(threshold)
                    .saturating_sub(s.hand_contribution.min(previous))
            })
            .sum();
        if amount > 0 {
            let eligible = seats
                .iter()
                .filter(|s| !s.folded && s.hand_contribution >= threshold)
                .map(|s| s.index)
                .collect();
            pots.push(Pot { amount, eligible });
        }
        previous = threshold;
    }

    pots
}

pub fn total(pots: &[Pot]) -> u64 {
    pots.iter().map(|p| p.amount).sum()
}
