//! Single source of truth for the current identity.
//!
//! Every consumer reads the session through this store; only the login,
//! refresh, and logout flows write it. Snapshots are replaced wholesale so
//! no caller ever observes a partially updated identity.

use crate::auth::models::Role;
use std::sync::Arc;
use tokio::sync::watch;

/// Identity snapshot held for the lifetime of the process.
///
/// A default-valued identity means "not logged in": empty username, id 0,
/// empty access token, no role grants. A non-empty `access_token` is the
/// single signal that the holder is authenticated for API calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionIdentity {
    pub username: String,
    pub user_id: i64,
    pub access_token: String,
    pub roles: Vec<Role>,
}

impl SessionIdentity {
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Process-wide session store with a read/write/subscribe contract.
///
/// Cloning is cheap; all clones observe the same snapshot. Writes notify
/// subscribers so dependent tasks can re-evaluate what they render.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<watch::Sender<SessionIdentity>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (inner, _) = watch::channel(SessionIdentity::default());
        SessionStore {
            inner: Arc::new(inner),
        }
    }

    /// Returns the current identity snapshot.
    pub fn read(&self) -> SessionIdentity {
        self.inner.borrow().clone()
    }

    /// Replaces the entire snapshot. No validation is performed.
    pub fn write(&self, identity: SessionIdentity) {
        self.inner.send_replace(identity);
    }

    /// Equivalent to writing an empty identity.
    pub fn clear(&self) {
        self.write(SessionIdentity::default());
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionIdentity> {
        self.inner.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
