//! Agent-switch state machine.
//!
//! Agent conversations are stateful and mutually exclusive per UI surface.
//! Switching to a different agent kind while one is mid-task would silently
//! abandon in-flight work, so the machine demands an explicit confirmation
//! exactly when data could be lost, and never otherwise.

use serde::{Deserialize, Serialize};

use super::conversation::ConversationStatus;
use super::model::AgentKind;

/// Outcome of requesting a new agent conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum SwitchDecision {
    /// Create the new conversation immediately.
    Start,
    /// A different agent is mid-task; the caller must confirm before any
    /// conversation is created.
    NeedsConfirmation { active_kind: AgentKind },
}

/// Evaluates whether starting `requested` needs user confirmation.
///
/// `current` is the active conversation's kind and status, if any. Requesting
/// the same kind that is already active starts a fresh conversation without
/// confirmation.
pub fn evaluate_switch(
    current: Option<(AgentKind, ConversationStatus)>,
    requested: AgentKind,
) -> SwitchDecision {
    match current {
        Some((active_kind, ConversationStatus::Active)) if active_kind != requested => {
            SwitchDecision::NeedsConfirmation { active_kind }
        }
        _ => SwitchDecision::Start,
    }
}
