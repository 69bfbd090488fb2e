use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::actor::Command;

/// 30 seconds to act before the Timeout Manager auto-folds the to-act seat.
pub const ACTION_DEADLINE: Duration = Duration::from_secs(30);

/// Schedules and cancels the single outstanding action deadline for a
/// table. Cancellation is advisory: bumping the generation just makes an
/// in-flight timer's fire a no-op once it wakes up and notices it's stale
/// (spec §4.6), rather than actually killing the sleeping task.
pub struct TimeoutManager {
    generation: Arc<AtomicU64>,
    commands: mpsc::Sender<Command>,
}

impl TimeoutManager {
    pub fn new(commands: mpsc::Sender<Command>) -> Self {
        TimeoutManager {
            generation: Arc::new(AtomicU64::new(0)),
            commands,
        }
    }

    /// Cancel any pending deadline. Called before arming a new one, and
    /// whenever the to-act seat no longer needs a timer (hand over, a
    /// different seat now to act).
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Arm a fresh deadline for `seat`. The enqueued `TimeoutFired` carries
    /// the generation it was scheduled under, so the actor can tell a fresh
    /// fire from a stale one apart without the manager tracking per-seat
    /// state itself.
    pub fn arm(&self, seat: usize) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let gen_marker = self.generation.clone();
        let commands = self.commands.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ACTION_DEADLINE).await;
            if gen_marker.load(Ordering::SeqCst) != generation {
                return; // cancelled or superseded before it fired.
            }
            let _ = commands
                .send(Command::TimeoutFired { seat, generation })
                .await;
        });
    }

    /// The generation last handed out by `arm`, for the actor to stash as
    /// "the deadline currently outstanding".
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn arm_sends_timeout_fired_after_the_deadline_with_the_current_generation() {
        let (tx, mut rx) = mpsc::channel(4);
        let manager = TimeoutManager::new(tx);
        manager.arm(3);

        tokio::time::advance(ACTION_DEADLINE + Duration::from_millis(1)).await;

        match rx.recv().await.expect("the armed timer should have fired") {
            Command::TimeoutFired { seat, generation } => {
                assert_eq!(seat, 3);
                assert_eq!(generation, manager.current_generation());
            }
            _ => panic!("expected a TimeoutFired command"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_before_the_deadline_leaves_the_fire_stale() {
        let (tx, mut rx) = mpsc::channel(4);
        let manager = TimeoutManager::new(tx);
        manager.arm(1);
        manager.cancel();
        manager.arm(2);

        tokio::time::advance(ACTION_DEADLINE + Duration::from_millis(1)).await;

        let mut fires = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            if let Command::TimeoutFired { seat, generation } = cmd {
                fires.push((seat, generation));
            }
        }
        let current = manager.current_generation();
        assert!(
            fires.iter().any(|&(seat, gen)| seat == 2 && gen == current),
            "the live re-arm should fire with the current generation"
        );
        assert!(
            fires.iter().any(|&(seat, gen)| seat == 1 && gen != current),
            "the cancelled arm should still fire, but with a stale generation"
        );
    }
}
