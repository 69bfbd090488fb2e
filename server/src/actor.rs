use tokio::sync::{mpsc, oneshot};

use holdem_engine::{Engine, EngineError, PlayerAction, TableConfig, TableSnapshot, ViewerScope};

use crate::fanout::{FanOut, QueueReceiver, Viewer};
use crate::timeout::TimeoutManager;

const COMMAND_BUFFER: usize = 64;

/// Requests the Table Actor accepts on its intake channel (spec §4.4). Each
/// mutating command carries a reply slot; the actor answers every command
/// exactly once, after applying it (or rejecting it) in full.
pub enum Command {
    Join {
        name: String,
        chips: u64,
        reply: oneshot::Sender<Result<usize, EngineError>>,
    },
    StartHand {
        reply: oneshot::Sender<Result<TableSnapshot, EngineError>>,
    },
    Act {
        seat: usize,
        action: PlayerAction,
        reply: oneshot::Sender<Result<TableSnapshot, EngineError>>,
    },
    Snapshot {
        viewer: ViewerScope,
        reply: oneshot::Sender<TableSnapshot>,
    },
    Subscribe {
        viewer: Viewer,
        reply: oneshot::Sender<(u64, QueueReceiver)>,
    },
    Unsubscribe {
        id: u64,
    },
    Reconnect {
        seat: usize,
        reply: oneshot::Sender<Result<(), EngineError>>,
    },
    TimeoutFired {
        seat: usize,
        generation: u64,
    },
}

/// A cheaply-cloneable reference to a running Table Actor. This is what the
/// Registry hands out; every control-surface operation becomes one message
/// round-trip through `commands`.
#[derive(Clone)]
pub struct TableHandle {
    commands: mpsc::Sender<Command>,
}

impl TableHandle {
    pub async fn join(&self, name: String, chips: u64) -> Result<usize, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Join { name, chips, reply }).await;
        rx.await.unwrap_or(Err(EngineError::UnknownSeat))
    }

    pub async fn start_hand(&self) -> Result<TableSnapshot, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::StartHand { reply }).await;
        rx.await.unwrap_or(Err(EngineError::InsufficientPlayers))
    }

    pub async fn act(&self, seat: usize, action: PlayerAction) -> Result<TableSnapshot, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Act { seat, action, reply }).await;
        rx.await.unwrap_or(Err(EngineError::WrongPhase))
    }

    pub async fn snapshot(&self, viewer: ViewerScope) -> TableSnapshot {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { viewer, reply }).await;
        rx.await.expect("actor always answers a Snapshot command")
    }

    pub async fn subscribe(&self, viewer: Viewer) -> (u64, QueueReceiver) {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Subscribe { viewer, reply }).await;
        rx.await.expect("actor always answers a Subscribe command")
    }

    pub async fn unsubscribe(&self, id: u64) {
        self.send(Command::Unsubscribe { id }).await;
    }

    pub async fn reconnect(&self, seat: usize) -> Result<(), EngineError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Reconnect { seat, reply }).await;
        rx.await.unwrap_or(Err(EngineError::UnknownSeat))
    }

    async fn send(&self, command: Command) {
        let _ = self.commands.send(command).await;
    }
}

/// Exclusively owns one `Engine`. The actor loop is the only writer; every
/// mutation flows through `commands` and is processed one at a time, so no
/// two operations on the same table ever race (spec §4.4, §5).
pub struct TableActor {
    engine: Engine,
    fan_out: FanOut,
    timeouts: TimeoutManager,
    current_timeout_generation: Option<u64>,
}

impl TableActor {
    pub fn spawn(table_id: String, config: TableConfig) -> TableHandle {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let actor = TableActor {
            engine: Engine::new(config),
            fan_out: FanOut::new(),
            timeouts: TimeoutManager::new(tx.clone()),
            current_timeout_generation: None,
        };
        tokio::spawn(actor.run(rx, table_id));
        TableHandle { commands: tx }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<Command>, table_id: String) {
        tracing::info!(table_id, "table actor started");
        while let Some(command) = rx.recv().await {
            self.handle(command).await;
        }
        tracing::info!(table_id, "table actor shut down");
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Join { name, chips, reply } => {
                let result = self.engine.add_seat(name, chips);
                let mutated = result.is_ok();
                let _ = reply.send(result);
                if mutated {
                    self.publish().await;
                }
            }
            Command::StartHand { reply } => {
                let result = {
                    let mut rng = rand::rng();
                    self.engine.start_hand(&mut rng)
                };
                match result {
                    Ok(()) => {
                        self.rearm_timeout();
                        let snapshot = self.engine.snapshot(ViewerScope::Spectator);
                        self.publish().await;
                        let _ = reply.send(Ok(snapshot));
                    }
                    Err(e) => {
                        let _ = reply.send(Err(e));
                    }
                }
            }
            Command::Act { seat, action, reply } => {
                let result = self.engine.act(seat, action);
                match result {
                    Ok(()) => {
                        self.rearm_timeout();
                        let snapshot = self.engine.snapshot(ViewerScope::Seat(seat));
                        self.publish().await;
                        let _ = reply.send(Ok(snapshot));
                    }
                    Err(e) => {
                        let _ = reply.send(Err(e));
                    }
                }
            }
            Command::Snapshot { viewer, reply } => {
                let _ = reply.send(self.engine.snapshot(viewer));
            }
            Command::Subscribe { viewer, reply } => {
                let (id, rx) = self.fan_out.subscribe(viewer);
                let _ = reply.send((id, rx));
            }
            Command::Unsubscribe { id } => {
                self.fan_out.unsubscribe(id);
            }
            Command::Reconnect { seat, reply } => {
                // A reconnect just re-arms the deadline for the seat if it's
                // still to-act; the engine has no seat-presence concept to
                // update (spec §4.6).
                let snapshot = self.engine.snapshot(ViewerScope::Seat(seat));
                if snapshot.to_act == Some(seat) {
                    self.rearm_timeout();
                } else {
                    self.timeouts.cancel();
                    self.current_timeout_generation = None;
                }
                let _ = reply.send(Ok(()));
            }
            Command::TimeoutFired { seat, generation } => {
                if self.current_timeout_generation != Some(generation) {
                    return; // stale fire, a newer deadline has since been armed.
                }
                // Route through the normal Act path: if the seat is no
                // longer to-act (phase moved on some other way) this is a
                // harmless no-op rejection, never a panic (spec §4.6).
                if self.engine.act(seat, PlayerAction::Fold).is_ok() {
                    self.rearm_timeout();
                    self.publish().await;
                }
            }
        }
    }

    fn rearm_timeout(&mut self) {
        self.timeouts.cancel();
        self.current_timeout_generation = None;
        let snapshot = self.engine.snapshot(ViewerScope::Spectator);
        if let Some(seat) = snapshot.to_act {
            self.timeouts.arm(seat);
            // `arm` bumps the generation by one past the cancel above.
            self.current_timeout_generation = Some(self.peek_generation());
        }
    }

    fn peek_generation(&self) -> u64 {
        self.timeouts.current_generation()
    }

    async fn publish(&mut self) {
        let engine = &self.engine;
        self.fan_out
            .publish(|viewer| match viewer {
                Viewer::Seat(s) => engine.snapshot(ViewerScope::Seat(s)),
                Viewer::Spectator => engine.snapshot(ViewerScope::Spectator),
            })
            .await;
    }
}
