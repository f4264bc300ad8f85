//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation,
//! including roles, progress payloads, and typed result cards.

use serde::{Deserialize, Serialize};

use crate::ranking::RankingOutcome;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the agent.
    Assistant,
    /// System-generated message.
    System,
}

/// Incremental progress reported by a running agent task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub processed: u32,
    pub total: u32,
    /// Item currently being worked on, when the task reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_item: Option<String>,
}

/// Typed result payload attached to a message by a finished agent task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultCard {
    /// Admission tiers produced by the ranking classifier.
    Ranking(RankingOutcome),
    /// Document review totals.
    DocumentReview { reviewed: u32, flagged: u32 },
    /// Analytics digest.
    Analytics { summary: String },
}

/// Shape of a chart a message asks the UI to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

/// Chart descriptor carried by a message. Rendering is out of scope here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// A single message in a conversation history.
///
/// Messages are exclusively owned by their parent conversation and are
/// deleted with it. Insertion order is the display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Unique message identifier.
    pub id: String,
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_update: Option<ProgressUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_card: Option<ResultCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSpec>,
}

impl ConversationMessage {
    /// Creates a plain text message with a generated id and current timestamp.
    pub fn text(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            progress_update: None,
            result_card: None,
            chart: None,
        }
    }

    /// Attaches a progress payload.
    pub fn with_progress(mut self, progress: ProgressUpdate) -> Self {
        self.progress_update = Some(progress);
        self
    }

    /// Attaches a typed result card.
    pub fn with_result_card(mut self, card: ResultCard) -> Self {
        self.result_card = Some(card);
        self
    }

    /// Attaches a chart descriptor.
    pub fn with_chart(mut self, chart: ChartSpec) -> Self {
        self.chart = Some(chart);
        self
    }
}
