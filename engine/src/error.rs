use thiserror::Error;

/// Why an otherwise-plausible action was rejected by `Engine::act`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalActionReason {
    #[error("cannot check while a bet is outstanding")]
    CheckWithBetOutstanding,
    #[error("cannot bet while a bet is already outstanding")]
    BetWhileBetOutstanding,
    #[error("cannot bet below the big blind")]
    BetBelowMinimum,
    #[error("raise must meet or exceed the last raise increment")]
    RaiseBelowMinimum,
    #[error("there is no bet to raise")]
    RaiseWithNoBet,
    #[error("there is no bet to call")]
    CallWithNoBet,
    #[error("amount exceeds the seat's stack")]
    AmountExceedsStack,
    #[error("seat has no chips left to act with")]
    ActionRequiresChips,
    #[error("cannot raise again after a short all-in capped this round's reopening")]
    RaiseRightsExhausted,
}

/// The engine's closed error set (spec §7). All variants surface unchanged
/// out of `Engine::act`/`add_seat`/`start_hand`; the server never invents
/// new ones, it only maps these onto transport-level responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("seat index not present at this table")]
    UnknownSeat,
    #[error("table is full")]
    TableFull,
    #[error("fewer than two seats have chips")]
    InsufficientPlayers,
    #[error("it is not this seat's turn to act")]
    NotYourTurn,
    #[error("illegal action: {0}")]
    IllegalAction(IllegalActionReason),
    #[error("action not valid in the current phase")]
    WrongPhase,
    #[error("deck has no cards left to draw")]
    DeckExhausted,
}
