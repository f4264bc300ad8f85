//! Conversational status vocabulary.
//!
//! The chat-oriented session variant tracks a UI-only status that is
//! intentionally separate from the persisted [`SessionStatus`] vocabulary.

use serde::{Deserialize, Serialize};

use super::model::SessionStatus;

/// UI-only status of a conversation.
///
/// This carries strictly less information than [`SessionStatus`]: the mapping
/// below is the only sanctioned bridge between the two vocabularies, and it
/// is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// Created but nothing in flight.
    Idle,
    /// A task or exchange is in progress.
    Active,
    /// The conversation has concluded.
    Completed,
}

impl ConversationStatus {
    /// Maps a persisted session status into the conversational vocabulary.
    ///
    /// A failed session still concludes its conversation; the failure detail
    /// lives on the session record, not here.
    pub fn from_session_status(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Queued | SessionStatus::Running => Self::Active,
            SessionStatus::Completed | SessionStatus::Failed => Self::Completed,
        }
    }
}
