use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use holdem_engine::TableSnapshot;
use tokio::sync::{Mutex, Notify};

/// What a subscriber wants to see: either a specific seat's personalized
/// view (their own hole cards, legal actions when it's their turn) or a
/// spectator's public view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Seat(usize),
    Spectator,
}

const QUEUE_CAPACITY: usize = 16;

struct Queue {
    items: Mutex<VecDeque<TableSnapshot>>,
    notify: Notify,
    closed: Mutex<bool>,
}

/// The producer half, held by the Fan-out. `push` never blocks: once the
/// queue is at capacity the oldest unread snapshot is dropped to make room
/// (spec §4.5), so a slow subscriber only ever sees recent state.
#[derive(Clone)]
pub struct QueueSender {
    queue: Arc<Queue>,
}

impl QueueSender {
    pub async fn push(&self, snapshot: TableSnapshot) {
        if *self.queue.closed.lock().await {
            return;
        }
        let mut items = self.queue.items.lock().await;
        if items.len() >= QUEUE_CAPACITY {
            items.pop_front();
        }
        items.push_back(snapshot);
        drop(items);
        self.queue.notify.notify_one();
    }

    pub async fn is_closed(&self) -> bool {
        *self.queue.closed.lock().await
    }
}

/// The consumer half, held by the task (WebSocket writer, CLI poller, ...)
/// draining this subscription.
pub struct QueueReceiver {
    queue: Arc<Queue>,
}

impl QueueReceiver {
    pub async fn recv(&mut self) -> Option<TableSnapshot> {
        loop {
            {
                let mut items = self.queue.items.lock().await;
                if let Some(item) = items.pop_front() {
                    return Some(item);
                }
                if *self.queue.closed.lock().await {
                    return None;
                }
            }
            self.queue.notify.notified().await;
        }
    }
}

impl Drop for QueueReceiver {
    fn drop(&mut self) {
        let queue = self.queue.clone();
        tokio::spawn(async move {
            *queue.closed.lock().await = true;
            queue.notify.notify_one();
        });
    }
}

fn drop_oldest_channel() -> (QueueSender, QueueReceiver) {
    let queue = Arc::new(Queue {
        items: Mutex::new(VecDeque::with_capacity(QUEUE_CAPACITY)),
        notify: Notify::new(),
        closed: Mutex::new(false),
    });
    (
        QueueSender { queue: queue.clone() },
        QueueReceiver { queue },
    )
}

/// Per-table map from subscription id to outbound queue (spec §4.5).
#[derive(Default)]
pub struct FanOut {
    next_id: u64,
    subscriptions: HashMap<u64, (Viewer, QueueSender)>,
}

impl FanOut {
    pub fn new() -> Self {
        FanOut::default()
    }

    pub fn subscribe(&mut self, viewer: Viewer) -> (u64, QueueReceiver) {
        let (tx, rx) = drop_oldest_channel();
        let id = self.next_id;
        self.next_id += 1;
        self.subscriptions.insert(id, (viewer, tx));
        (id, rx)
    }

    pub fn unsubscribe(&mut self, id: u64) {
        self.subscriptions.remove(&id);
    }

    /// Push one personalized snapshot to every still-open subscription,
    /// pruning ones whose receiver has dropped.
    pub async fn publish(&mut self, snapshot_for: impl Fn(Viewer) -> TableSnapshot) {
        let mut dead = Vec::new();
        for (&id, (viewer, sender)) in self.subscriptions.iter() {
            if sender.is_closed().await {
                dead.push(id);
                continue;
            }
            sender.push(snapshot_for(*viewer)).await;
        }
        for id in dead {
            self.subscriptions.remove(&id);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
