//! Dual-authority switch.
//!
//! During the migration window either the local session store or the external
//! server-backed cache may be the source of truth. The selection is a runtime
//! flag read fresh on every branching call, so a toggle is observed by the
//! next operation; operations already in flight complete under the mode they
//! started with.
//!
//! The flag is an explicitly passed handle, not ambient global state, so
//! tests can exercise both branches deterministically.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Which subsystem owns the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    /// The local session store is the source of truth.
    Local,
    /// An external server-authoritative cache owns state; local operations
    /// perform only UI-local bookkeeping.
    Server,
}

/// Cheap cloneable handle over the capability flag.
#[derive(Debug, Clone)]
pub struct AuthorityFlag {
    server_authoritative: Arc<AtomicBool>,
}

impl AuthorityFlag {
    /// Creates a flag starting in the given mode.
    pub fn new(authority: Authority) -> Self {
        Self {
            server_authoritative: Arc::new(AtomicBool::new(authority == Authority::Server)),
        }
    }

    /// Reads the current authority. Every branching call reads fresh.
    pub fn current(&self) -> Authority {
        if self.server_authoritative.load(Ordering::SeqCst) {
            Authority::Server
        } else {
            Authority::Local
        }
    }

    /// Flips the flag at runtime. In-flight operations are not affected.
    pub fn set(&self, authority: Authority) {
        self.server_authoritative
            .store(authority == Authority::Server, Ordering::SeqCst);
    }

    /// Whether the external subsystem currently owns server state.
    pub fn is_server_authoritative(&self) -> bool {
        self.current() == Authority::Server
    }
}

impl Default for AuthorityFlag {
    fn default() -> Self {
        Self::new(Authority::Local)
    }
}
