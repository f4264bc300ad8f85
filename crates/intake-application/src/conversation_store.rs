//! Conversation store.
//!
//! The chat-oriented variant of the session concept: conversations own their
//! message history and track the UI-only [`ConversationStatus`] vocabulary.
//! Starting a new agent on top of an active one goes through the
//! agent-switch state machine, so in-flight work is never silently abandoned.
//!
//! UI preferences (expanded messages, sidebar collapse) are mutated through
//! this store but live in their own partition, [`UiPreferences`], so they
//! survive any future removal of the conversation cache itself.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use intake_core::ranking::RankingOutcome;
use intake_core::session::{
    AgentKind, ChartKind, ChartSpec, ConversationMessage, ConversationStatus, MessageRole,
    ProgressUpdate, ResultCard, SwitchDecision, evaluate_switch,
};
use intake_core::state::UiPreferences;

/// One agent conversation and its message history.
///
/// Messages are exclusively owned by the conversation and deleted with it;
/// insertion order is the display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub agent_kind: AgentKind,
    pub institution_id: String,
    pub course_id: Option<String>,
    pub status: ConversationStatus,
    pub messages: Vec<ConversationMessage>,
    pub created_at: String,
}

/// Result of requesting a new agent conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum StartAgentOutcome {
    /// The conversation was created and is now active.
    Started(Conversation),
    /// A different agent is mid-task; nothing was created. The caller must
    /// confirm through [`ConversationStore::confirm_switch`].
    ConfirmationRequired { active_kind: AgentKind },
}

#[derive(Default)]
struct ConversationState {
    /// Newest-first.
    conversations: Vec<Conversation>,
    active_conversation_id: Option<String>,
    preferences: UiPreferences,
}

/// In-memory store for agent conversations.
#[derive(Clone, Default)]
pub struct ConversationStore {
    state: Arc<RwLock<ConversationState>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a new agent conversation.
    ///
    /// Runs the agent-switch state machine against the active conversation.
    /// No conversation is created when confirmation is required.
    pub async fn start_agent(
        &self,
        institution_id: &str,
        agent_kind: AgentKind,
        course_id: Option<String>,
    ) -> StartAgentOutcome {
        let mut state = self.state.write().await;
        let current = active_of(&state).map(|c| (c.agent_kind, c.status));
        match evaluate_switch(current, agent_kind) {
            SwitchDecision::NeedsConfirmation { active_kind } => {
                tracing::debug!(
                    "[ConversationStore] switch from {} to {} needs confirmation",
                    active_kind,
                    agent_kind
                );
                StartAgentOutcome::ConfirmationRequired { active_kind }
            }
            SwitchDecision::Start => StartAgentOutcome::Started(create_and_activate(
                &mut state,
                institution_id,
                agent_kind,
                course_id,
            )),
        }
    }

    /// Confirms an agent switch.
    ///
    /// The previously active conversation, if still active, is marked
    /// completed; then the requested conversation is created and activated.
    pub async fn confirm_switch(
        &self,
        institution_id: &str,
        agent_kind: AgentKind,
        course_id: Option<String>,
    ) -> Conversation {
        let mut state = self.state.write().await;
        if let Some(active_id) = state.active_conversation_id.clone() {
            if let Some(previous) = state
                .conversations
                .iter_mut()
                .find(|c| c.id == active_id && c.status == ConversationStatus::Active)
            {
                previous.status = ConversationStatus::Completed;
            }
        }
        create_and_activate(&mut state, institution_id, agent_kind, course_id)
    }

    /// Appends a message to a conversation. Unknown id is a no-op.
    pub async fn append_message(&self, conversation_id: &str, message: ConversationMessage) {
        let mut state = self.state.write().await;
        match state
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            Some(conversation) => conversation.messages.push(message),
            None => {
                tracing::debug!(
                    "[ConversationStore] append_message for unknown conversation {}",
                    conversation_id
                );
            }
        }
    }

    /// Records task progress in the conversation's message history.
    ///
    /// A trailing system progress message is updated in place; otherwise a
    /// new one is appended, preserving display order for everything else.
    pub async fn record_progress(
        &self,
        conversation_id: &str,
        processed: u32,
        total: u32,
        current_item: Option<String>,
    ) {
        let progress = ProgressUpdate {
            processed,
            total,
            current_item,
        };
        let content = format!("Processed {} of {}", progress.processed, progress.total);

        let mut state = self.state.write().await;
        let Some(conversation) = state
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        else {
            tracing::debug!(
                "[ConversationStore] record_progress for unknown conversation {}",
                conversation_id
            );
            return;
        };

        match conversation.messages.last_mut() {
            Some(last) if last.role == MessageRole::System && last.progress_update.is_some() => {
                last.content = content;
                last.progress_update = Some(progress);
            }
            _ => {
                conversation.messages.push(
                    ConversationMessage::text(MessageRole::System, content)
                        .with_progress(progress),
                );
            }
        }
    }

    /// Threads a ranking outcome back into the conversation as an assistant
    /// message carrying the typed result card and a chart descriptor.
    pub async fn attach_ranking_outcome(&self, conversation_id: &str, outcome: RankingOutcome) {
        let counts = outcome.tier_counts();
        let chart = ChartSpec {
            kind: ChartKind::Bar,
            labels: counts.iter().map(|(label, _)| label.to_string()).collect(),
            values: counts.iter().map(|(_, count)| *count as f64).collect(),
        };
        let message = ConversationMessage::text(MessageRole::Assistant, outcome.summary())
            .with_result_card(ResultCard::Ranking(outcome))
            .with_chart(chart);
        self.append_message(conversation_id, message).await;
    }

    /// Sets a conversation's status. Unknown id is a no-op.
    pub async fn set_status(&self, conversation_id: &str, status: ConversationStatus) {
        let mut state = self.state.write().await;
        if let Some(conversation) = state
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        {
            conversation.status = status;
        }
    }

    pub async fn active_conversation(&self) -> Option<Conversation> {
        let state = self.state.read().await;
        active_of(&state).cloned()
    }

    pub async fn conversations(&self) -> Vec<Conversation> {
        self.state.read().await.conversations.clone()
    }

    /// Drops all conversations and the selection. UI preferences are a
    /// separate partition and survive.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.conversations.clear();
        state.active_conversation_id = None;
    }

    // ============================================================================
    // UI preference partition
    // ============================================================================

    pub async fn toggle_message_expanded(&self, message_id: &str) {
        self.state
            .write()
            .await
            .preferences
            .toggle_expanded(message_id);
    }

    pub async fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.state.write().await.preferences.sidebar_collapsed = collapsed;
    }

    pub async fn preferences(&self) -> UiPreferences {
        self.state.read().await.preferences.clone()
    }
}

fn active_of(state: &ConversationState) -> Option<&Conversation> {
    let active_id = state.active_conversation_id.as_deref()?;
    state.conversations.iter().find(|c| c.id == active_id)
}

fn create_and_activate(
    state: &mut ConversationState,
    institution_id: &str,
    agent_kind: AgentKind,
    course_id: Option<String>,
) -> Conversation {
    let conversation = Conversation {
        id: uuid::Uuid::new_v4().to_string(),
        agent_kind,
        institution_id: institution_id.to_string(),
        course_id,
        status: ConversationStatus::Active,
        messages: Vec::new(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    state.conversations.insert(0, conversation.clone());
    state.active_conversation_id = Some(conversation.id.clone());
    tracing::debug!(
        "[ConversationStore] started {} conversation {}",
        agent_kind,
        conversation.id
    );
    conversation
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn started(store: &ConversationStore, kind: AgentKind) -> Conversation {
        match store.start_agent("inst-1", kind, None).await {
            StartAgentOutcome::Started(conversation) => conversation,
            other => panic!("expected Started, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_first_start_creates_and_activates() {
        let store = ConversationStore::new();

        let conversation = started(&store, AgentKind::Ranking).await;

        assert_eq!(conversation.status, ConversationStatus::Active);
        assert_eq!(
            store.active_conversation().await.unwrap().id,
            conversation.id
        );
    }

    #[tokio::test]
    async fn test_different_kind_while_active_never_creates_before_confirm() {
        let store = ConversationStore::new();
        let ranking = started(&store, AgentKind::Ranking).await;

        let outcome = store
            .start_agent("inst-1", AgentKind::Analytics, None)
            .await;

        assert_eq!(
            outcome,
            StartAgentOutcome::ConfirmationRequired {
                active_kind: AgentKind::Ranking
            }
        );
        assert_eq!(store.conversations().await.len(), 1);
        assert_eq!(store.active_conversation().await.unwrap().id, ranking.id);
    }

    #[tokio::test]
    async fn test_confirm_switch_completes_previous_and_activates_new() {
        let store = ConversationStore::new();
        let ranking = started(&store, AgentKind::Ranking).await;

        let analytics = store
            .confirm_switch("inst-1", AgentKind::Analytics, None)
            .await;

        let conversations = store.conversations().await;
        assert_eq!(conversations.len(), 2);
        let previous = conversations.iter().find(|c| c.id == ranking.id).unwrap();
        assert_eq!(previous.status, ConversationStatus::Completed);
        assert_eq!(store.active_conversation().await.unwrap().id, analytics.id);
    }

    #[tokio::test]
    async fn test_same_kind_while_active_starts_fresh_conversation() {
        let store = ConversationStore::new();
        let first = started(&store, AgentKind::Ranking).await;

        let second = started(&store, AgentKind::Ranking).await;

        assert_ne!(first.id, second.id);
        assert_eq!(store.conversations().await.len(), 2);
    }

    #[tokio::test]
    async fn test_idle_or_completed_conversation_needs_no_confirmation() {
        let store = ConversationStore::new();
        let ranking = started(&store, AgentKind::Ranking).await;
        store
            .set_status(&ranking.id, ConversationStatus::Completed)
            .await;

        let outcome = store
            .start_agent("inst-1", AgentKind::Assistant, None)
            .await;

        assert!(matches!(outcome, StartAgentOutcome::Started(_)));
    }

    #[tokio::test]
    async fn test_messages_preserve_insertion_order() {
        let store = ConversationStore::new();
        let conversation = started(&store, AgentKind::Assistant).await;

        for content in ["first", "second", "third"] {
            store
                .append_message(
                    &conversation.id,
                    ConversationMessage::text(MessageRole::User, content),
                )
                .await;
        }

        let messages = store.active_conversation().await.unwrap().messages;
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_append_to_unknown_conversation_is_noop() {
        let store = ConversationStore::new();
        started(&store, AgentKind::Assistant).await;

        store
            .append_message(
                "missing",
                ConversationMessage::text(MessageRole::User, "lost"),
            )
            .await;

        assert!(store.active_conversation().await.unwrap().messages.is_empty());
    }

    #[tokio::test]
    async fn test_record_progress_updates_trailing_message_in_place() {
        let store = ConversationStore::new();
        let conversation = started(&store, AgentKind::DocumentReview).await;

        store.record_progress(&conversation.id, 1, 10, None).await;
        store
            .record_progress(&conversation.id, 2, 10, Some("transcript.pdf".to_string()))
            .await;

        let messages = store.active_conversation().await.unwrap().messages;
        assert_eq!(messages.len(), 1);
        let progress = messages[0].progress_update.as_ref().unwrap();
        assert_eq!(progress.processed, 2);
        assert_eq!(progress.current_item.as_deref(), Some("transcript.pdf"));
    }

    #[tokio::test]
    async fn test_attach_ranking_outcome_threads_card_and_chart() {
        let store = ConversationStore::new();
        let conversation = started(&store, AgentKind::Ranking).await;
        let outcome = RankingOutcome {
            auto_accept: Vec::new(),
            conditional: Vec::new(),
            waitlist: Vec::new(),
            rejected: Vec::new(),
            cutoff_aps: Some(30),
            intake_limit: 5,
        };

        store
            .attach_ranking_outcome(&conversation.id, outcome)
            .await;

        let messages = store.active_conversation().await.unwrap().messages;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, MessageRole::Assistant);
        assert!(matches!(
            messages[0].result_card,
            Some(ResultCard::Ranking(_))
        ));
        let chart = messages[0].chart.as_ref().unwrap();
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.labels.len(), 4);
    }

    #[tokio::test]
    async fn test_clear_keeps_ui_preferences() {
        let store = ConversationStore::new();
        started(&store, AgentKind::Assistant).await;
        store.toggle_message_expanded("m-1").await;
        store.set_sidebar_collapsed(true).await;

        store.clear().await;

        assert!(store.conversations().await.is_empty());
        assert!(store.active_conversation().await.is_none());
        let preferences = store.preferences().await;
        assert!(preferences.is_expanded("m-1"));
        assert!(preferences.sidebar_collapsed);
    }
}
