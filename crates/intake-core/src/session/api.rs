//! Remote session store interface.
//!
//! The HTTP endpoints that persist sessions server-side are external
//! collaborators; this trait is their seam. Implementations live in the
//! infrastructure layer, mocks in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::model::{AgentKind, AgentSession};

/// Request payload for creating a session server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub agent_kind: AgentKind,
    #[serde(default)]
    pub course_id: Option<String>,
    /// Free-form instructions forwarded to the agent task.
    pub instructions: String,
}

impl CreateSessionRequest {
    pub fn new(agent_kind: AgentKind, instructions: impl Into<String>) -> Self {
        Self {
            agent_kind,
            course_id: None,
            instructions: instructions.into(),
        }
    }

    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.course_id = Some(course_id.into());
        self
    }
}

/// An abstract client for the authoritative session store.
///
/// # Implementation Notes
///
/// Implementations should map transport and decoding failures into
/// [`crate::error::IntakeError`] rather than panicking; callers convert
/// errors into user-visible state at the store boundary.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Fetches every session belonging to the institution.
    async fn list_sessions(&self, institution_id: &str) -> Result<Vec<AgentSession>>;

    /// Creates a session server-side and returns the stored record.
    async fn create_session(
        &self,
        institution_id: &str,
        request: CreateSessionRequest,
    ) -> Result<AgentSession>;
}
