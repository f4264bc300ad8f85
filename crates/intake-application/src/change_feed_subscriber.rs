//! Change-feed subscriber.
//!
//! Maintains at most one live subscription per institution and translates
//! each row-level notification into a reconciliation call against the local
//! session store. Notifications are applied in arrival order with no
//! reordering or coalescing; because `upsert` is last-write-wins per field, a
//! stale retransmit can regress a field. That limitation is part of the
//! upstream contract and is not corrected here.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use intake_core::authority::AuthorityFlag;
use intake_core::error::Result;
use intake_core::session::{ChangeEventKind, ChangeFeed, SessionChangeEvent};

use crate::session_store::SessionStore;

struct LiveSubscription {
    institution_id: String,
    handle: JoinHandle<()>,
}

/// Subscribes to the per-tenant change feed and reconciles into the store.
pub struct ChangeFeedSubscriber {
    feed: Arc<dyn ChangeFeed>,
    store: SessionStore,
    authority: AuthorityFlag,
    live: Mutex<Option<LiveSubscription>>,
}

impl ChangeFeedSubscriber {
    pub fn new(feed: Arc<dyn ChangeFeed>, store: SessionStore, authority: AuthorityFlag) -> Self {
        Self {
            feed,
            store,
            authority,
            live: Mutex::new(None),
        }
    }

    /// Opens a subscription for the institution.
    ///
    /// Any existing subscription is torn down first, so two calls in
    /// succession leave exactly one live subscription and no duplicate
    /// delivery. When the server-authoritative subsystem owns state this is a
    /// no-op after teardown; that subsystem runs its own subscription and a
    /// second one here would double-deliver.
    pub async fn subscribe(&self, institution_id: &str) -> Result<()> {
        self.teardown();

        if self.authority.is_server_authoritative() {
            tracing::debug!(
                target: "change_feed",
                "subscribe({}) skipped, server authority owns the feed",
                institution_id
            );
            return Ok(());
        }

        let mut receiver = self.feed.subscribe(institution_id).await?;
        let store = self.store.clone();
        let institution = institution_id.to_string();
        let handle = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                apply_event(&store, event).await;
            }
            tracing::debug!(target: "change_feed", "feed closed for {}", institution);
        });

        let mut live = self.live.lock().unwrap();
        // A concurrent subscribe may have slipped in while awaiting the feed;
        // the newest subscription wins.
        if let Some(previous) = live.replace(LiveSubscription {
            institution_id: institution_id.to_string(),
            handle,
        }) {
            previous.handle.abort();
        }
        tracing::info!(target: "change_feed", "subscribed to {}", institution_id);
        Ok(())
    }

    /// Tears down the live subscription, if any. Idempotent.
    pub fn unsubscribe(&self) {
        self.teardown();
    }

    pub fn is_subscribed(&self) -> bool {
        self.live.lock().unwrap().is_some()
    }

    /// The institution the live subscription is scoped to, if any.
    pub fn subscribed_institution(&self) -> Option<String> {
        self.live
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.institution_id.clone())
    }

    fn teardown(&self) {
        if let Some(previous) = self.live.lock().unwrap().take() {
            previous.handle.abort();
            tracing::debug!(
                target: "change_feed",
                "unsubscribed from {}",
                previous.institution_id
            );
        }
    }
}

impl Drop for ChangeFeedSubscriber {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Applies one notification to the store, in arrival order.
async fn apply_event(store: &SessionStore, event: SessionChangeEvent) {
    match event.kind {
        ChangeEventKind::Insert | ChangeEventKind::Update => match event.new {
            Some(row) => store.upsert(row.into()).await,
            None => {
                tracing::warn!(
                    target: "change_feed",
                    "{:?} notification without a row, skipping",
                    event.kind
                );
            }
        },
        ChangeEventKind::Delete => match event.old {
            Some(old) => store.remove(&old.id).await,
            None => {
                tracing::warn!(
                    target: "change_feed",
                    "delete notification without an id, skipping"
                );
            }
        },
    }
}
