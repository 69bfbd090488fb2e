use std::time::Duration;

use holdem_engine::{PlayerAction, TableConfig, ViewerScope};
use holdem_server::{timeout::ACTION_DEADLINE, Registry};

#[tokio::test]
async fn join_start_and_act_round_trip_through_the_registry() {
    let registry = Registry::new();
    let table_id = registry.create_table(TableConfig::new(5, 10, 6)).await;
    let handle = registry.get(&table_id).await.expect("table was just created");

    let alice = handle.join("Alice".to_string(), 1000).await.unwrap();
    let bob = handle.join("Bob".to_string(), 1000).await.unwrap();
    assert_eq!((alice, bob), (0, 1));

    let snapshot = handle.start_hand().await.unwrap();
    assert_eq!(snapshot.pot_total, 15);
    let to_act = snapshot.to_act.expect("a fresh hand always has someone to act");

    let snapshot = handle.act(to_act, PlayerAction::Fold).await.unwrap();
    assert!(snapshot.winners.is_some());
}

#[tokio::test]
async fn unknown_table_id_is_absent_from_the_registry() {
    let registry = Registry::new();
    assert!(registry.get("no-such-table").await.is_none());
}

#[tokio::test]
async fn snapshot_hides_hole_cards_from_a_spectator_but_not_from_god() {
    let registry = Registry::new();
    let table_id = registry.create_table(TableConfig::new(5, 10, 6)).await;
    let handle = registry.get(&table_id).await.unwrap();
    handle.join("Alice".to_string(), 1000).await.unwrap();
    handle.join("Bob".to_string(), 1000).await.unwrap();
    handle.start_hand().await.unwrap();

    let spectator_view = handle.snapshot(ViewerScope::Spectator).await;
    assert!(spectator_view.seats.iter().all(|s| s.hole_cards.is_none()));

    let god_view = handle.snapshot(ViewerScope::God).await;
    assert!(god_view.seats.iter().all(|s| s.hole_cards.is_some()));
}

#[tokio::test]
async fn a_subscriber_receives_a_push_after_every_mutation() {
    let registry = Registry::new();
    let table_id = registry.create_table(TableConfig::new(5, 10, 6)).await;
    let handle = registry.get(&table_id).await.unwrap();

    let (_id, mut receiver) = handle
        .subscribe(holdem_server::fanout::Viewer::Spectator)
        .await;

    handle.join("Alice".to_string(), 1000).await.unwrap();
    handle.join("Bob".to_string(), 1000).await.unwrap();
    handle.start_hand().await.unwrap();

    // At least one push should have landed in the queue by now.
    let first = tokio::time::timeout(std::time::Duration::from_secs(1), receiver.recv())
        .await
        .expect("a snapshot should arrive before the timeout");
    assert!(first.is_some());
}

#[tokio::test]
async fn rejected_action_does_not_crash_the_actor() {
    let registry = Registry::new();
    let table_id = registry.create_table(TableConfig::new(5, 10, 6)).await;
    let handle = registry.get(&table_id).await.unwrap();
    handle.join("Alice".to_string(), 1000).await.unwrap();
    handle.join("Bob".to_string(), 1000).await.unwrap();
    let snapshot = handle.start_hand().await.unwrap();
    let to_act = snapshot.to_act.unwrap();

    let other_seat = if to_act == 0 { 1 } else { 0 };
    let err = handle
        .act(other_seat, PlayerAction::Check)
        .await
        .unwrap_err();
    assert_eq!(err, holdem_engine::EngineError::NotYourTurn);

    // The actor is still alive and answers further commands normally.
    let snapshot = handle.snapshot(ViewerScope::Spectator).await;
    assert_eq!(snapshot.to_act, Some(to_act));
}

#[tokio::test]
async fn a_seat_that_never_acts_is_auto_folded_once_the_deadline_passes() {
    tokio::time::pause();
    let registry = Registry::new();
    let table_id = registry.create_table(TableConfig::new(5, 10, 6)).await;
    let handle = registry.get(&table_id).await.unwrap();
    handle.join("Alice".to_string(), 1000).await.unwrap();
    handle.join("Bob".to_string(), 1000).await.unwrap();
    handle.start_hand().await.unwrap();

    tokio::time::advance(ACTION_DEADLINE + Duration::from_millis(1)).await;

    let snapshot = handle.snapshot(ViewerScope::Spectator).await;
    assert_eq!(snapshot.to_act, None, "the timed-out seat should have been auto-folded");
    assert!(snapshot.winners.is_some(), "the other seat wins the now-uncontested hand");
}

#[tokio::test]
async fn reconnect_rearms_the_deadline_so_the_stale_timer_is_rejected() {
    tokio::time::pause();
    let registry = Registry::new();
    let table_id = registry.create_table(TableConfig::new(5, 10, 6)).await;
    let handle = registry.get(&table_id).await.unwrap();
    handle.join("Alice".to_string(), 1000).await.unwrap();
    handle.join("Bob".to_string(), 1000).await.unwrap();
    let snapshot = handle.start_hand().await.unwrap();
    let to_act = snapshot.to_act.unwrap();

    // Let the original deadline nearly expire, then reconnect just in time.
    tokio::time::advance(ACTION_DEADLINE - Duration::from_millis(1)).await;
    handle.reconnect(to_act).await.unwrap();

    // The moment the original deadline would have fired comes and goes; its
    // generation is now stale, so the actor must reject it.
    tokio::time::advance(Duration::from_millis(2)).await;

    let snapshot = handle.snapshot(ViewerScope::Spectator).await;
    assert_eq!(
        snapshot.to_act,
        Some(to_act),
        "reconnect should have armed a fresh deadline instead of letting the stale one auto-fold"
    );
}
