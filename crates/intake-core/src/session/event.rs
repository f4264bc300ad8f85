//! Change-feed event types.
//!
//! Row-level notifications delivered by the per-tenant change feed. The row
//! carries the external snake_case field names; mapping into the internal
//! [`AgentSession`] shape happens in exactly one place, the `From` impl below.

use serde::{Deserialize, Serialize};

use super::model::{AgentKind, AgentSession, SessionStatus};

/// Kind of a row-level change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeEventKind {
    Insert,
    Update,
    Delete,
}

/// The session row as delivered by the change feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRow {
    pub id: String,
    pub agent_type: AgentKind,
    pub institution_id: String,
    #[serde(default)]
    pub course_id: Option<String>,
    pub status: SessionStatus,
    pub processed_items: u32,
    pub total_items: u32,
    pub created_at: String,
}

impl From<SessionRow> for AgentSession {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            agent_kind: row.agent_type,
            institution_id: row.institution_id,
            course_id: row.course_id,
            status: row.status,
            processed_items: row.processed_items,
            total_items: row.total_items,
            created_at: row.created_at,
        }
    }
}

/// Replica identity of a deleted row. Only the id survives deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedRow {
    pub id: String,
}

/// One notification from the change feed.
///
/// `insert` and `update` events carry the new row; `delete` events carry only
/// the old row's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionChangeEvent {
    #[serde(rename = "eventType")]
    pub kind: ChangeEventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<SessionRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<DeletedRow>,
}

impl SessionChangeEvent {
    /// Builds an insert notification.
    pub fn insert(row: SessionRow) -> Self {
        Self {
            kind: ChangeEventKind::Insert,
            new: Some(row),
            old: None,
        }
    }

    /// Builds an update notification.
    pub fn update(row: SessionRow) -> Self {
        Self {
            kind: ChangeEventKind::Update,
            new: Some(row),
            old: None,
        }
    }

    /// Builds a delete notification.
    pub fn delete(id: impl Into<String>) -> Self {
        Self {
            kind: ChangeEventKind::Delete,
            new: None,
            old: Some(DeletedRow { id: id.into() }),
        }
    }
}
