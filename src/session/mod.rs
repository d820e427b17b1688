//! Conversation-scoped user identity.
//!
//! Many tools are keyed only by a lead id but must still authenticate
//! as the user who started the conversation.  The [`SessionStore`]
//! remembers the last user id seen on each session: any call that
//! carries a `user_id` overwrites its session's identity, and later
//! calls on the same session reuse it.  Entries are evicted after a
//! TTL so an idle conversation does not hold an identity forever.
//!
//! Identity is deliberately *not* process-global — two concurrent
//! conversations never observe each other's user.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

/// Default retention for a session's identity.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

struct Entry {
    user_id: String,
    touched: Instant,
}

/// Shared map of session id → last-known user id.
///
/// Cheap to clone; all clones see the same entries.  The lock is only
/// held for map operations, never across an await point.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Handle bound to one session id, passed alongside every tool
    /// invocation in that conversation.
    pub fn handle(&self, session_id: impl Into<String>) -> SessionHandle {
        SessionHandle {
            store: self.clone(),
            session_id: session_id.into(),
        }
    }

    /// Record `user_id` as the identity for `session_id`.  Last write
    /// wins.
    pub fn record_user(&self, session_id: &str, user_id: &str) {
        let mut map = self.inner.lock().expect("session store poisoned");
        prune(&mut map, self.ttl);
        debug!(session = session_id, user = user_id, "session identity set");
        map.insert(
            session_id.to_string(),
            Entry {
                user_id: user_id.to_string(),
                touched: Instant::now(),
            },
        );
    }

    /// The last user id recorded for `session_id`, if it has not
    /// expired.
    pub fn user(&self, session_id: &str) -> Option<String> {
        let mut map = self.inner.lock().expect("session store poisoned");
        prune(&mut map, self.ttl);
        map.get(session_id).map(|e| e.user_id.clone())
    }

    /// Number of live (non-expired) sessions.
    pub fn len(&self) -> usize {
        let mut map = self.inner.lock().expect("session store poisoned");
        prune(&mut map, self.ttl);
        map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

/// Drop entries whose identity has outlived the TTL.  Expiry counts
/// from the last write, not the last read.
fn prune(map: &mut HashMap<String, Entry>, ttl: Duration) {
    map.retain(|_, e| e.touched.elapsed() < ttl);
}

/// A [`SessionStore`] scoped to one session id.
#[derive(Clone)]
pub struct SessionHandle {
    store: SessionStore,
    session_id: String,
}

impl SessionHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn record_user(&self, user_id: &str) {
        self.store.record_user(&self.session_id, user_id);
    }

    pub fn user(&self) -> Option<String> {
        self.store.user(&self.session_id)
    }
}
