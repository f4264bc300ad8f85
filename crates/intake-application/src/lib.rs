//! Application layer for Intake.
//!
//! This crate provides the local session store, the conversation store, the
//! change-feed subscriber, and the use case that coordinates them under one
//! dual-authority flag.

pub mod change_feed_subscriber;
pub mod conversation_store;
pub mod session_store;
pub mod session_usecase;

pub use change_feed_subscriber::ChangeFeedSubscriber;
pub use conversation_store::{Conversation, ConversationStore, StartAgentOutcome};
pub use session_store::{SessionStore, SortOrder, StatusFilter};
pub use session_usecase::SessionUseCase;
