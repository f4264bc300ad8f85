//! Local session store.
//!
//! An in-memory, optimistically-updated working set of [`AgentSession`]
//! records for the current institution, plus the client-local list state the
//! UI reads (selection, status filter, sort order, loading and error flags).
//!
//! Every network-backed operation catches failures and converts them into a
//! single stored error string; nothing throws past the store boundary. The
//! dual-authority flag is read fresh at each operation entry, and an
//! operation completes under the mode it started with.

use std::sync::Arc;

use tokio::sync::RwLock;

use intake_core::authority::AuthorityFlag;
use intake_core::session::{AgentSession, CreateSessionRequest, SessionApi, SessionStatus};

/// Status filter applied by the derived list projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(SessionStatus),
}

impl StatusFilter {
    fn matches(&self, status: SessionStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

/// Sort order applied by the derived list projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Default)]
struct StoreState {
    /// Working set, newest-first.
    sessions: Vec<AgentSession>,
    /// UI selection.
    active_session_id: Option<String>,
    status_filter: StatusFilter,
    sort_order: SortOrder,
    loading: bool,
    /// Single human-readable error, cleared explicitly by the caller.
    error: Option<String>,
    /// Request-generation token. A fetch response arriving after the
    /// generation moved on belongs to a stale tenant context and is dropped.
    generation: u64,
}

/// The local, optimistic session cache.
///
/// Cloning is cheap and clones share state; the change-feed subscriber holds
/// a clone and reconciles into it through [`SessionStore::upsert`] and
/// [`SessionStore::remove`].
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<StoreState>>,
    api: Arc<dyn SessionApi>,
    authority: AuthorityFlag,
}

impl SessionStore {
    /// Creates an empty store backed by the given remote API client.
    pub fn new(api: Arc<dyn SessionApi>, authority: AuthorityFlag) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            api,
            authority,
        }
    }

    /// Replaces the working set wholesale from a remote read.
    ///
    /// Sets the loading flag for the duration. On failure the prior contents
    /// are left untouched (stale-but-available) and the error is stored. A
    /// response that arrives after [`SessionStore::clear`] bumped the
    /// generation is discarded.
    pub async fn fetch_all(&self, institution_id: &str) {
        if self.authority.is_server_authoritative() {
            tracing::debug!(
                "[SessionStore] fetch_all deferred to server authority for {}",
                institution_id
            );
            return;
        }

        let generation = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.generation
        };

        let result = self.api.list_sessions(institution_id).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(
                "[SessionStore] discarding stale fetch for {} (generation {} superseded)",
                institution_id,
                generation
            );
            return;
        }
        state.loading = false;
        match result {
            Ok(mut sessions) => {
                sessions.sort_by(|a, b| compare_created_at(&b.created_at, &a.created_at));
                tracing::debug!(
                    "[SessionStore] loaded {} sessions for {}",
                    sessions.len(),
                    institution_id
                );
                state.sessions = sessions;
            }
            Err(e) => {
                tracing::warn!("[SessionStore] fetch_all failed for {}: {}", institution_id, e);
                state.error = Some(e.to_string());
            }
        }
    }

    /// Sends a creation request and returns the stored record on success.
    ///
    /// The new record is prepended and selected when the local store is
    /// authoritative. Under server authority the record is not written
    /// locally (the authoritative subsystem pushes it back through the change
    /// feed), but the selection is still updated synchronously so the UI has
    /// an active session without waiting for the round-trip.
    ///
    /// On failure the error is stored and `None` is returned; callers must
    /// treat an absent result as "not created".
    pub async fn create(
        &self,
        institution_id: &str,
        request: CreateSessionRequest,
    ) -> Option<AgentSession> {
        let defer_to_server = self.authority.is_server_authoritative();

        match self.api.create_session(institution_id, request).await {
            Ok(session) => {
                let mut state = self.state.write().await;
                state.active_session_id = Some(session.id.clone());
                if !defer_to_server {
                    state.sessions.insert(0, session.clone());
                }
                Some(session)
            }
            Err(e) => {
                tracing::warn!("[SessionStore] create failed for {}: {}", institution_id, e);
                let mut state = self.state.write().await;
                state.error = Some(e.to_string());
                None
            }
        }
    }

    /// Merges a status change into the record with the given id.
    ///
    /// Idempotent; a missing id is a no-op since the update can legitimately
    /// race a deletion.
    pub async fn update_status(&self, id: &str, status: SessionStatus) {
        if self.authority.is_server_authoritative() {
            return;
        }
        let mut state = self.state.write().await;
        match state.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => session.status = status,
            None => {
                tracing::debug!("[SessionStore] update_status for unknown session {}", id);
            }
        }
    }

    /// Merges progress counters into the record with the given id.
    ///
    /// `processed` is clamped to `total` once the extent is known. Missing id
    /// is a no-op.
    pub async fn update_progress(&self, id: &str, processed: u32, total: u32) {
        if self.authority.is_server_authoritative() {
            return;
        }
        let mut state = self.state.write().await;
        match state.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.total_items = total;
                session.processed_items = if total > 0 {
                    processed.min(total)
                } else {
                    processed
                };
            }
            None => {
                tracing::debug!("[SessionStore] update_progress for unknown session {}", id);
            }
        }
    }

    /// Reconciliation primitive: replaces the record in place when the id
    /// exists, otherwise inserts at the front.
    ///
    /// An update never changes the record's position in the newest-first
    /// ordering; reordering a list the user is scrolling is worse than a
    /// momentarily misplaced row.
    pub async fn upsert(&self, record: AgentSession) {
        let mut state = self.state.write().await;
        match state.sessions.iter_mut().find(|s| s.id == record.id) {
            Some(existing) => *existing = record,
            None => state.sessions.insert(0, record),
        }
    }

    /// Reconciliation primitive: drops the record with the given id.
    ///
    /// Clears the selection when it pointed at the removed record. Missing id
    /// is a no-op.
    pub async fn remove(&self, id: &str) {
        let mut state = self.state.write().await;
        state.sessions.retain(|s| s.id != id);
        if state.active_session_id.as_deref() == Some(id) {
            state.active_session_id = None;
        }
    }

    /// Derived read: the working set filtered by the current status filter
    /// and sorted by `created_at` per the current sort order.
    ///
    /// A pure projection over current state; never mutates the store.
    pub async fn filtered_sorted(&self) -> Vec<AgentSession> {
        let state = self.state.read().await;
        let mut sessions: Vec<AgentSession> = state
            .sessions
            .iter()
            .filter(|s| state.status_filter.matches(s.status))
            .cloned()
            .collect();
        match state.sort_order {
            SortOrder::NewestFirst => {
                sessions.sort_by(|a, b| compare_created_at(&b.created_at, &a.created_at))
            }
            SortOrder::OldestFirst => {
                sessions.sort_by(|a, b| compare_created_at(&a.created_at, &b.created_at))
            }
        }
        sessions
    }

    /// Snapshot of the raw working set, newest-first.
    pub async fn sessions(&self) -> Vec<AgentSession> {
        self.state.read().await.sessions.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.sessions.is_empty()
    }

    pub async fn set_status_filter(&self, filter: StatusFilter) {
        self.state.write().await.status_filter = filter;
    }

    pub async fn set_sort_order(&self, order: SortOrder) {
        self.state.write().await.sort_order = order;
    }

    /// Sets the UI selection. The id is not required to exist yet; the
    /// record may still be in flight through the change feed.
    pub async fn set_active(&self, id: Option<String>) {
        self.state.write().await.active_session_id = id;
    }

    pub async fn active_session_id(&self) -> Option<String> {
        self.state.read().await.active_session_id.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// Clears the stored error string. Errors never auto-expire.
    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    /// Records a user-visible error string.
    pub async fn record_error(&self, message: impl Into<String>) {
        self.state.write().await.error = Some(message.into());
    }

    /// Drops the working set and selection and bumps the request generation
    /// so in-flight fetch responses are discarded on arrival.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.sessions.clear();
        state.active_session_id = None;
        state.loading = false;
        state.generation += 1;
    }
}

/// Orders two RFC 3339 timestamps, falling back to string comparison when
/// either fails to parse.
fn compare_created_at(a: &str, b: &str) -> std::cmp::Ordering {
    use chrono::DateTime;
    match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}
