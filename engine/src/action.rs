use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A player action (spec §4.3.2). `AllIn` is kept as its own variant rather
/// than collapsed into auto-sized Bet/Call/Raise, so the wire layer can
/// always tell the difference between "called the exact amount" and
/// "shoved everything".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Bet(u64),
    RaiseTo(u64),
    AllIn,
}

/// A legal action offered to the seat to act, with the parameters a client
/// needs to build a request (spec §6, "legal-action map"). Used internally
/// by `Engine::legal_actions`; `to_wire_map` below is what actually reaches
/// the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LegalAction {
    Fold,
    Check,
    Call { amount: u64 },
    Bet { min: u64, max: u64 },
    RaiseTo { min: u64, max: u64 },
    AllIn { amount: u64 },
}

/// The parameters attached to one entry of the wire-level legal-action map.
/// Fields absent for a given action are omitted rather than sent as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LegalActionParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl LegalAction {
    fn name(self) -> &'static str {
        match self {
            LegalAction::Fold => "fold",
            LegalAction::Check => "check",
            LegalAction::Call { .. } => "call",
            LegalAction::Bet { .. } => "bet",
            LegalAction::RaiseTo { .. } => "raise_to",
            LegalAction::AllIn { .. } => "all_in",
        }
    }

    fn params(self) -> LegalActionParams {
        match self {
            LegalAction::Fold | LegalAction::Check => LegalActionParams::default(),
            LegalAction::Call { amount } | LegalAction::AllIn { amount } => LegalActionParams {
                amount: Some(amount),
                ..Default::default()
            },
            LegalAction::Bet { min, max } | LegalAction::RaiseTo { min, max } => LegalActionParams {
                min: Some(min),
                max: Some(max),
                ..Default::default()
            },
        }
    }
}

/// Build the spec §6 "legal-action map keyed by action name" from the
/// engine's internal `Vec<LegalAction>`.
pub fn to_wire_map(actions: &[LegalAction]) -> BTreeMap<&'static str, LegalActionParams> {
    actions.iter().map(|a| (a.name(), a.params())).collect()
}
