//! In-process change feed.
//!
//! A broadcast-channel implementation of [`ChangeFeed`] used by tests and
//! local development. Events are published once and fanned out; each
//! subscription gets a forwarding task that filters rows to its institution,
//! which is "server-side" filtering from the consumer's point of view.

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use intake_core::error::Result;
use intake_core::session::{ChangeFeed, SessionChangeEvent, SessionRow};

/// Allows for bursty update scenarios without dropping notifications.
const FEED_CHANNEL_CAPACITY: usize = 256;

/// One published notification plus its routing key.
///
/// Delete events carry only the old row id, so the institution rides beside
/// the event rather than inside it.
#[derive(Debug, Clone)]
struct FeedFrame {
    institution_id: String,
    event: SessionChangeEvent,
}

/// Broadcast-backed change feed.
#[derive(Debug, Clone)]
pub struct ChannelChangeFeed {
    sender: broadcast::Sender<FeedFrame>,
}

impl ChannelChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publishes an insert notification for the row's institution.
    pub fn publish_insert(&self, row: SessionRow) {
        self.publish(row.institution_id.clone(), SessionChangeEvent::insert(row));
    }

    /// Publishes an update notification for the row's institution.
    pub fn publish_update(&self, row: SessionRow) {
        self.publish(row.institution_id.clone(), SessionChangeEvent::update(row));
    }

    /// Publishes a delete notification. The institution must be supplied by
    /// the caller since the event carries only the old row id.
    pub fn publish_delete(&self, institution_id: impl Into<String>, id: impl Into<String>) {
        self.publish(institution_id.into(), SessionChangeEvent::delete(id));
    }

    /// Number of live subscriptions (forwarding tasks still attached).
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn publish(&self, institution_id: String, event: SessionChangeEvent) {
        // No subscribers is fine; the event just has no audience.
        let _ = self.sender.send(FeedFrame {
            institution_id,
            event,
        });
    }
}

impl Default for ChannelChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangeFeed for ChannelChangeFeed {
    async fn subscribe(&self, institution_id: &str) -> Result<mpsc::Receiver<SessionChangeEvent>> {
        let mut feed_rx = self.sender.subscribe();
        let (tx, rx) = mpsc::channel(FEED_CHANNEL_CAPACITY);
        let institution = institution_id.to_string();

        tokio::spawn(async move {
            loop {
                match feed_rx.recv().await {
                    Ok(frame) => {
                        if frame.institution_id != institution {
                            continue;
                        }
                        if tx.send(frame.event).await.is_err() {
                            // Consumer dropped its receiver; release the
                            // subscription.
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            target: "change_feed",
                            "subscription for {} lagged, {} notifications dropped",
                            institution,
                            skipped
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(rx)
    }
}
