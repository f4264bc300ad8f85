//! Infrastructure layer for Intake.
//!
//! Adapters behind the core traits: the HTTP session API client, the
//! in-process change feed, and the configuration service.

pub mod channel_feed;
pub mod config_service;
pub mod dto;
pub mod http_session_api;

pub use channel_feed::ChannelChangeFeed;
pub use config_service::{ConfigService, RootConfig};
pub use http_session_api::HttpSessionApi;
