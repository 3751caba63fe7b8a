//! Live history fan-out.
//!
//! DESIGN
//! ======
//! Each open websocket registers a bounded sender under its user id.
//! Publishing clones the event into every sender of that user. A full or
//! closed channel never blocks the publisher: full channels drop the event,
//! closed channels are pruned.

use std::collections::HashMap;
use std::sync::Arc;

use records::LiveEvent;
use tokio::sync::{RwLock, mpsc};
use tracing::warn;
use uuid::Uuid;

const SUBSCRIBER_CHANNEL_CAPACITY: usize = 64;

type Subscribers = HashMap<Uuid, HashMap<Uuid, mpsc::Sender<LiveEvent>>>;

#[derive(Clone, Default)]
pub struct LiveHub {
    inner: Arc<RwLock<Subscribers>>,
}

impl LiveHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Returns its id (for [`Self::unsubscribe`]) and
    /// the receiving end of its channel.
    pub async fn subscribe(&self, user_id: Uuid) -> (Uuid, mpsc::Receiver<LiveEvent>) {
        let subscriber_id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        self.inner
            .write()
            .await
            .entry(user_id)
            .or_default()
            .insert(subscriber_id, tx);
        (subscriber_id, rx)
    }

    pub async fn unsubscribe(&self, user_id: Uuid, subscriber_id: Uuid) {
        let mut subs = self.inner.write().await;
        if let Some(user_subs) = subs.get_mut(&user_id) {
            user_subs.remove(&subscriber_id);
            if user_subs.is_empty() {
                subs.remove(&user_id);
            }
        }
    }

    /// Deliver `event` to every subscriber of `user_id`. Returns how many
    /// subscribers accepted it.
    pub async fn publish(&self, user_id: Uuid, event: &LiveEvent) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();
        {
            let subs = self.inner.read().await;
            let Some(user_subs) = subs.get(&user_id) else {
                return 0;
            };
            for (subscriber_id, tx) in user_subs {
                match tx.try_send(event.clone()) {
                    Ok(()) => delivered += 1,
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!(%user_id, %subscriber_id, "live: subscriber channel full; dropping event");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => closed.push(*subscriber_id),
                }
            }
        }

        for subscriber_id in closed {
            self.unsubscribe(user_id, subscriber_id).await;
        }
        delivered
    }

    pub async fn subscriber_count(&self, user_id: Uuid) -> usize {
        self.inner.read().await.get(&user_id).map_or(0, HashMap::len)
    }
}

#[cfg(test)]
#[path = "live_test.rs"]
mod tests;
