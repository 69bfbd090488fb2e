use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;

use holdem_engine::{Engine, EngineError, IllegalActionReason, PlayerAction, TableConfig};

fn seeded() -> StdRng {
    StdRng::seed_from_u64(11)
}

fn two_handed(stack: u64) -> Engine {
    let mut engine = Engine::new(TableConfig::new(5, 10, 6));
    engine.add_seat("Alice".into(), stack).unwrap();
    engine.add_seat("Bob".into(), stack).unwrap();
    engine.start_hand(&mut seeded()).unwrap();
    engine
}

#[rstest]
#[case(PlayerAction::Fold, 15)]
#[case(PlayerAction::Call, 20)]
#[case(PlayerAction::RaiseTo(30), 40)]
fn preflop_action_moves_the_pot_by_the_expected_amount(
    #[case] action: PlayerAction,
    #[case] expected_pot: u64,
) {
    let mut engine = two_handed(1000);
    let to_act = engine.to_act.unwrap();
    let snapshot = engine.act(to_act, action).unwrap();
    assert_eq!(snapshot.pot_total, expected_pot);
}

#[rstest]
#[case(PlayerAction::Check, IllegalActionReason::CheckWithBetOutstanding)]
#[case(PlayerAction::RaiseTo(12), IllegalActionReason::RaiseBelowMinimum)]
fn illegal_preflop_actions_are_rejected_with_the_expected_reason(
    #[case] action: PlayerAction,
    #[case] expected: IllegalActionReason,
) {
    let mut engine = two_handed(1000);
    let to_act = engine.to_act.unwrap();
    let err = engine.act(to_act, action).unwrap_err();
    assert_eq!(err, EngineError::IllegalAction(expected));
}

#[rstest]
#[case(5)]
#[case(25)]
fn an_all_in_below_the_big_blind_never_reopens_raising(#[case] short_stack: u64) {
    let mut engine = Engine::new(TableConfig::new(5, 10, 6));
    engine.add_seat("Alice".into(), 1000).unwrap();
    engine.add_seat("Bob".into(), short_stack).unwrap();
    engine.start_hand(&mut seeded()).unwrap();

    let to_act = engine.to_act.unwrap();
    let snapshot = engine.act(to_act, PlayerAction::AllIn).unwrap();
    assert_eq!(snapshot.community_cards.len(), 0);
}
