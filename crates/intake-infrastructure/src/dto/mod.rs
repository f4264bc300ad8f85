//! Wire-shape DTOs and their domain mappings.

pub mod session;

pub use session::{CreateSessionBody, SessionDto};
