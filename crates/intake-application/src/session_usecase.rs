//! Session use case implementation.
//!
//! `SessionUseCase` wires the local session store, the change-feed
//! subscriber, and the conversation store together under one dual-authority
//! flag, and owns the tenant-context lifecycle: entering an institution
//! subscribes before the snapshot read, and resetting tears the subscription
//! down before any state is cleared so no reconciliation callback can fire
//! against already-cleared state.

use std::sync::Arc;

use anyhow::Result;

use intake_core::authority::AuthorityFlag;
use intake_core::ranking::{Applicant, RankingOutcome, classify};
use intake_core::session::{
    AgentKind, ChangeFeed, ConversationStatus, CreateSessionRequest, SessionApi, SessionStatus,
};

use crate::change_feed_subscriber::ChangeFeedSubscriber;
use crate::conversation_store::{Conversation, ConversationStore, StartAgentOutcome};
use crate::session_store::SessionStore;

/// Coordinates session state for one UI surface.
pub struct SessionUseCase {
    session_store: SessionStore,
    subscriber: ChangeFeedSubscriber,
    conversation_store: ConversationStore,
    authority: AuthorityFlag,
}

impl SessionUseCase {
    /// Creates a use case over the given remote API client and change feed.
    pub fn new(
        api: Arc<dyn SessionApi>,
        feed: Arc<dyn ChangeFeed>,
        authority: AuthorityFlag,
    ) -> Self {
        let session_store = SessionStore::new(api, authority.clone());
        let subscriber =
            ChangeFeedSubscriber::new(feed, session_store.clone(), authority.clone());
        Self {
            session_store,
            subscriber,
            conversation_store: ConversationStore::new(),
            authority,
        }
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.session_store
    }

    pub fn conversation_store(&self) -> &ConversationStore {
        &self.conversation_store
    }

    pub fn subscriber(&self) -> &ChangeFeedSubscriber {
        &self.subscriber
    }

    pub fn authority(&self) -> &AuthorityFlag {
        &self.authority
    }

    /// Enters an institution's context.
    ///
    /// The subscription is opened before the snapshot read so no change
    /// falls into the gap between the two.
    pub async fn enter_institution(&self, institution_id: &str) -> Result<()> {
        tracing::info!("[SessionUseCase] entering institution {}", institution_id);
        self.subscriber.subscribe(institution_id).await?;
        self.session_store.fetch_all(institution_id).await;
        Ok(())
    }

    /// Leaves the current institution context.
    ///
    /// Teardown order matters: the subscriber goes first, then the stores.
    pub async fn reset(&self) {
        tracing::info!("[SessionUseCase] reset");
        self.subscriber.unsubscribe();
        self.session_store.clear().await;
        self.conversation_store.clear().await;
    }

    /// Creates a session record through the dual-authority mutation path.
    ///
    /// Returns `None` when the creation failed; the failure detail is in the
    /// session store's error string.
    pub async fn create_session(
        &self,
        institution_id: &str,
        request: CreateSessionRequest,
    ) -> Option<intake_core::session::AgentSession> {
        self.session_store.create(institution_id, request).await
    }

    /// Requests a new agent conversation and, when one starts, creates its
    /// backing session record through the dual-authority mutation path.
    ///
    /// A failed session creation does not retract the conversation; the
    /// failure is surfaced through the session store's error string, matching
    /// the optimistic semantics of every other mutation.
    pub async fn start_agent(
        &self,
        institution_id: &str,
        agent_kind: AgentKind,
        course_id: Option<String>,
        instructions: &str,
    ) -> StartAgentOutcome {
        let outcome = self
            .conversation_store
            .start_agent(institution_id, agent_kind, course_id.clone())
            .await;
        if let StartAgentOutcome::Started(_) = &outcome {
            self.create_backing_session(institution_id, agent_kind, course_id, instructions)
                .await;
        }
        outcome
    }

    /// Confirms an agent switch and creates the new backing session record.
    pub async fn confirm_switch(
        &self,
        institution_id: &str,
        agent_kind: AgentKind,
        course_id: Option<String>,
        instructions: &str,
    ) -> Conversation {
        let conversation = self
            .conversation_store
            .confirm_switch(institution_id, agent_kind, course_id.clone())
            .await;
        self.create_backing_session(institution_id, agent_kind, course_id, instructions)
            .await;
        conversation
    }

    /// Runs the ranking classifier and threads the outcome back through the
    /// conversation's message history, marking the backing session completed.
    ///
    /// A classifier rejection is surfaced through the session store's error
    /// string as well as the returned error.
    pub async fn run_ranking(
        &self,
        conversation_id: &str,
        session_id: &str,
        applicants: &[Applicant],
        intake_limit: u32,
        cutoff_override: Option<u32>,
    ) -> intake_core::error::Result<RankingOutcome> {
        match classify(applicants, intake_limit, cutoff_override) {
            Ok(outcome) => {
                let total = applicants.len() as u32;
                self.conversation_store
                    .attach_ranking_outcome(conversation_id, outcome.clone())
                    .await;
                self.conversation_store
                    .set_status(
                        conversation_id,
                        ConversationStatus::from_session_status(SessionStatus::Completed),
                    )
                    .await;
                self.session_store
                    .update_status(session_id, SessionStatus::Completed)
                    .await;
                self.session_store
                    .update_progress(session_id, total, total)
                    .await;
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!("[SessionUseCase] ranking rejected: {}", e);
                self.session_store.record_error(e.to_string()).await;
                Err(e)
            }
        }
    }

    async fn create_backing_session(
        &self,
        institution_id: &str,
        agent_kind: AgentKind,
        course_id: Option<String>,
        instructions: &str,
    ) {
        let mut request = CreateSessionRequest::new(agent_kind, instructions);
        if let Some(course_id) = course_id {
            request = request.with_course(course_id);
        }
        if self.session_store.create(institution_id, request).await.is_none() {
            tracing::warn!(
                "[SessionUseCase] backing session creation failed for {} {}",
                institution_id,
                agent_kind
            );
        }
    }
}
