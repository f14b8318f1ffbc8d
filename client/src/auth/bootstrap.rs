//! Startup gate that restores a persisted session before guarded views render.
//!
//! After a full reload the in-memory session is empty even when the user is
//! still holding a valid refresh cookie. This guard blocks protected content
//! exactly long enough to find out: if the persist flag is set and no access
//! token is present, it runs the refresh operation once, then reports ready
//! whether or not the refresh succeeded. Unmounting the guard cancels the
//! pending result instead of applying it late.

use crate::auth::service::RefreshSession;
use crate::session::store::SessionStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::warn;

/// Lifecycle of the startup session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    /// A refresh is plausibly in flight; hold guarded content.
    Checking,
    /// The check finished (or was never needed); render normally.
    Ready,
}

pub struct PersistLogin {
    store: SessionStore,
    refresher: Arc<dyn RefreshSession>,
    state: watch::Sender<BootstrapState>,
    mounted: AtomicBool,
    started: AtomicBool,
}

impl PersistLogin {
    /// Decides the initial state synchronously: with persistence off, or an
    /// access token already in memory, there is nothing to recover and the
    /// guard is born ready.
    pub fn new(store: SessionStore, refresher: Arc<dyn RefreshSession>, persist: bool) -> Self {
        let initial = if !persist || store.read().is_authenticated() {
            BootstrapState::Ready
        } else {
            BootstrapState::Checking
        };
        let (state, _) = watch::channel(initial);

        PersistLogin {
            store,
            refresher,
            state,
            mounted: AtomicBool::new(true),
            started: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> BootstrapState {
        *self.state.borrow()
    }

    /// Subscribes to state transitions, e.g. to swap a loading placeholder
    /// for real content once the guard reports ready.
    pub fn subscribe(&self) -> watch::Receiver<BootstrapState> {
        self.state.subscribe()
    }

    /// Runs the session check. The refresh operation is invoked at most once
    /// per guard lifetime; repeated calls return the current state.
    pub async fn run(&self) -> BootstrapState {
        if self.state() == BootstrapState::Ready || self.started.swap(true, Ordering::SeqCst) {
            return self.state();
        }

        match self.refresher.refresh_identity().await {
            Ok(identity) => {
                // A result that lands after unmount is dropped, not applied.
                if self.mounted.load(Ordering::SeqCst) {
                    self.store.write(identity);
                }
            }
            Err(err) => warn!("session refresh failed during startup: {}", err),
        }

        if self.mounted.load(Ordering::SeqCst) {
            self.state.send_replace(BootstrapState::Ready);
        }
        self.state()
    }

    /// Treats the guard as unmounted: any still-pending refresh result must
    /// no longer mutate the session or the guard state.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::errors::{ClientError, ClientResult};
    use crate::session::store::SessionIdentity;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    struct StubRefresher {
        calls: AtomicUsize,
        identity: Option<SessionIdentity>,
        release: Option<Arc<Notify>>,
    }

    impl StubRefresher {
        fn succeeding(identity: SessionIdentity) -> Self {
            StubRefresher {
                calls: AtomicUsize::new(0),
                identity: Some(identity),
                release: None,
            }
        }

        fn failing() -> Self {
            StubRefresher {
                calls: AtomicUsize::new(0),
                identity: None,
                release: None,
            }
        }

        fn gated(identity: SessionIdentity, release: Arc<Notify>) -> Self {
            StubRefresher {
                calls: AtomicUsize::new(0),
                identity: Some(identity),
                release: Some(release),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RefreshSession for StubRefresher {
        async fn refresh_identity(&self) -> ClientResult<SessionIdentity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(release) = &self.release {
                release.notified().await;
            }
            match &self.identity {
                Some(identity) => Ok(identity.clone()),
                None => Err(ClientError::authentication_expired("stub rejection")),
            }
        }
    }

    fn carol() -> SessionIdentity {
        SessionIdentity {
            username: "carol".to_string(),
            user_id: 7,
            access_token: "tok123".to_string(),
            roles: vec![Role::User, Role::Admin],
        }
    }

    #[tokio::test]
    async fn no_persistence_means_ready_without_a_network_call() {
        let store = SessionStore::new();
        let refresher = Arc::new(StubRefresher::succeeding(carol()));
        let guard = PersistLogin::new(store.clone(), refresher.clone(), false);

        assert_eq!(guard.state(), BootstrapState::Ready);
        assert_eq!(guard.run().await, BootstrapState::Ready);
        assert_eq!(refresher.calls(), 0);
        assert_eq!(store.read(), SessionIdentity::default());
    }

    #[tokio::test]
    async fn existing_token_skips_the_check() {
        let store = SessionStore::new();
        store.write(carol());
        let refresher = Arc::new(StubRefresher::succeeding(carol()));
        let guard = PersistLogin::new(store, refresher.clone(), true);

        assert_eq!(guard.state(), BootstrapState::Ready);
        guard.run().await;
        assert_eq!(refresher.calls(), 0);
    }

    #[tokio::test]
    async fn persisted_empty_session_refreshes_exactly_once() {
        let store = SessionStore::new();
        let refresher = Arc::new(StubRefresher::succeeding(carol()));
        let guard = PersistLogin::new(store.clone(), refresher.clone(), true);

        assert_eq!(guard.state(), BootstrapState::Checking);
        assert_eq!(guard.run().await, BootstrapState::Ready);
        assert_eq!(refresher.calls(), 1);
        assert_eq!(store.read(), carol());

        // A second run never re-checks within the same mount.
        guard.run().await;
        assert_eq!(refresher.calls(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_still_reaches_ready() {
        let store = SessionStore::new();
        let refresher = Arc::new(StubRefresher::failing());
        let guard = PersistLogin::new(store.clone(), refresher.clone(), true);

        assert_eq!(guard.run().await, BootstrapState::Ready);
        assert_eq!(refresher.calls(), 1);
        // Failure is swallowed; the route guard redirects later.
        assert_eq!(store.read(), SessionIdentity::default());
    }

    #[tokio::test]
    async fn unmount_drops_a_late_refresh_result() {
        let store = SessionStore::new();
        let release = Arc::new(Notify::new());
        let refresher = Arc::new(StubRefresher::gated(carol(), release.clone()));
        let guard = Arc::new(PersistLogin::new(store.clone(), refresher.clone(), true));

        let running = {
            let guard = guard.clone();
            tokio::spawn(async move { guard.run().await })
        };

        // Wait for the refresh call to be in flight before unmounting.
        while refresher.calls() == 0 {
            tokio::task::yield_now().await;
        }
        guard.unmount();
        release.notify_one();
        running.await.unwrap();

        assert_eq!(store.read(), SessionIdentity::default());
        assert_eq!(guard.state(), BootstrapState::Checking);
    }
}
