//! Session domain types.
//!
//! The session record, its two status vocabularies, conversation messages,
//! change-feed events, the agent-switch state machine, and the traits that
//! abstract the remote store and the change feed.

mod api;
mod conversation;
mod event;
mod feed;
mod message;
mod model;
mod switch;

pub use api::{CreateSessionRequest, SessionApi};
pub use conversation::ConversationStatus;
pub use event::{ChangeEventKind, DeletedRow, SessionChangeEvent, SessionRow};
pub use feed::ChangeFeed;
pub use message::{
    ChartKind, ChartSpec, ConversationMessage, MessageRole, ProgressUpdate, ResultCard,
};
pub use model::{AgentKind, AgentSession, SessionStatus};
pub use switch::{SwitchDecision, evaluate_switch};
