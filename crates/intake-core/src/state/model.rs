//! UI preference state.
//!
//! Purely client-local preferences persisted alongside, but strictly apart
//! from, server-authoritative session data. Removing the local-cache code
//! path must never require touching this partition.

use serde::{Deserialize, Serialize};

/// Persisted UI preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UiPreferences {
    /// Ids of messages the user has expanded.
    #[serde(default)]
    pub expanded_message_ids: Vec<String>,
    /// Whether the session sidebar is collapsed.
    #[serde(default)]
    pub sidebar_collapsed: bool,
}

impl UiPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles a message's expanded state.
    pub fn toggle_expanded(&mut self, message_id: &str) {
        if let Some(position) = self
            .expanded_message_ids
            .iter()
            .position(|id| id == message_id)
        {
            self.expanded_message_ids.remove(position);
        } else {
            self.expanded_message_ids.push(message_id.to_string());
        }
    }

    /// Whether a message is currently expanded.
    pub fn is_expanded(&self, message_id: &str) -> bool {
        self.expanded_message_ids.iter().any(|id| id == message_id)
    }
}
