//! Change-feed interface.
//!
//! One logical subscription per tenant to a row-level change feed. The feed
//! filters events to the requested institution before delivery, so consumers
//! see only their tenant's rows.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;

use super::event::SessionChangeEvent;

/// An abstract per-tenant change feed.
///
/// Each `subscribe` call opens a fresh subscription. Dropping the returned
/// receiver releases it; there is no separate teardown call, so release
/// happens on every exit path, including task abort.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Opens a subscription filtered to the given institution.
    ///
    /// Events arrive in the order the feed emitted them; no reordering or
    /// coalescing is performed on delivery.
    async fn subscribe(&self, institution_id: &str) -> Result<mpsc::Receiver<SessionChangeEvent>>;
}
