//! End-to-end reconciliation tests: change feed through subscriber into the
//! local session store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use intake_application::change_feed_subscriber::ChangeFeedSubscriber;
use intake_application::session_store::SessionStore;
use intake_core::authority::{Authority, AuthorityFlag};
use intake_core::error::Result;
use intake_core::session::{
    AgentKind, AgentSession, CreateSessionRequest, SessionApi, SessionRow, SessionStatus,
};
use intake_infrastructure::ChannelChangeFeed;

struct NullSessionApi;

#[async_trait]
impl SessionApi for NullSessionApi {
    async fn list_sessions(&self, _institution_id: &str) -> Result<Vec<AgentSession>> {
        Ok(Vec::new())
    }

    async fn create_session(
        &self,
        institution_id: &str,
        request: CreateSessionRequest,
    ) -> Result<AgentSession> {
        Ok(AgentSession::new(
            request.agent_kind,
            institution_id,
            request.course_id,
        ))
    }
}

fn row(id: &str, institution_id: &str, status: SessionStatus, processed: u32) -> SessionRow {
    SessionRow {
        id: id.to_string(),
        agent_type: AgentKind::DocumentReview,
        institution_id: institution_id.to_string(),
        course_id: None,
        status,
        processed_items: processed,
        total_items: 20,
        created_at: "2025-06-01T08:00:00Z".to_string(),
    }
}

fn store_and_subscriber(feed: &ChannelChangeFeed) -> (SessionStore, ChangeFeedSubscriber) {
    let flag = AuthorityFlag::new(Authority::Local);
    let store = SessionStore::new(Arc::new(NullSessionApi), flag.clone());
    let subscriber = ChangeFeedSubscriber::new(Arc::new(feed.clone()), store.clone(), flag);
    (store, subscriber)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(30)).await;
}

#[tokio::test]
async fn feed_lifecycle_reconciles_into_store() {
    let feed = ChannelChangeFeed::new();
    let (store, subscriber) = store_and_subscriber(&feed);
    subscriber.subscribe("inst-1").await.unwrap();

    feed.publish_insert(row("s-1", "inst-1", SessionStatus::Queued, 0));
    feed.publish_update(row("s-1", "inst-1", SessionStatus::Running, 8));
    settle().await;

    let sessions = store.sessions().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].status, SessionStatus::Running);
    assert_eq!(sessions[0].processed_items, 8);

    feed.publish_delete("inst-1", "s-1");
    settle().await;
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn double_subscribe_leaves_one_live_subscription() {
    let feed = ChannelChangeFeed::new();
    let (store, subscriber) = store_and_subscriber(&feed);

    subscriber.subscribe("inst-1").await.unwrap();
    subscriber.subscribe("inst-1").await.unwrap();

    feed.publish_insert(row("s-1", "inst-1", SessionStatus::Queued, 0));
    settle().await;

    assert_eq!(store.len().await, 1);
    assert_eq!(feed.subscriber_count(), 1);
}

#[tokio::test]
async fn subscriptions_are_tenant_isolated() {
    let feed = ChannelChangeFeed::new();
    let (store_one, subscriber_one) = store_and_subscriber(&feed);
    let (store_two, subscriber_two) = store_and_subscriber(&feed);
    subscriber_one.subscribe("inst-1").await.unwrap();
    subscriber_two.subscribe("inst-2").await.unwrap();

    feed.publish_insert(row("s-1", "inst-1", SessionStatus::Queued, 0));
    feed.publish_insert(row("s-2", "inst-2", SessionStatus::Queued, 0));
    settle().await;

    assert_eq!(store_one.sessions().await[0].id, "s-1");
    assert_eq!(store_one.len().await, 1);
    assert_eq!(store_two.sessions().await[0].id, "s-2");
    assert_eq!(store_two.len().await, 1);
}

#[tokio::test]
async fn unsubscribe_stops_delivery() {
    let feed = ChannelChangeFeed::new();
    let (store, subscriber) = store_and_subscriber(&feed);
    subscriber.subscribe("inst-1").await.unwrap();
    subscriber.unsubscribe();
    settle().await;

    feed.publish_insert(row("s-1", "inst-1", SessionStatus::Queued, 0));
    settle().await;

    assert!(store.is_empty().await);
}
