//! Session state and its lifecycle.
//!
//! Two pieces live here:
//!
//! - [`SessionHandle`] owns the authentication state and publishes it on a
//!   `watch` channel, with discrete [`SessionEvent`]s on a `broadcast`
//!   channel. The request client receives it only as a
//!   [`SessionTeardown`], so the one thing the transport layer can do to the
//!   session is end it.
//! - [`SessionStore`] drives the handle through hydrate / login / logout using
//!   the request client.
//!
//! ```text
//!   Uninitialized ──hydrate──▶ Authenticated ◀──set_user──┐
//!        │                         │                     │
//!        └───────hydrate──▶ Unauthenticated ◀──clear_user/logout/expiry
//! ```

use std::fmt;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::client::{ClientBuilder, RequestClient};
use crate::error::Result;
use crate::types::{LoginRequest, User};

const EVENT_CAPACITY: usize = 16;

/// Snapshot of the authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// True only until the first hydration settles.
    pub is_loading: bool,
}

impl Session {
    fn uninitialized() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
        }
    }

    fn unauthenticated() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: false,
        }
    }
}

/// Discrete session transitions, for observers that react to changes rather
/// than poll state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A user became signed in.
    Authenticated(User),
    /// The session ended locally (logout or explicit clear).
    SignedOut,
    /// The session could not be refreshed and was torn down.
    Expired,
}

/// The capability the request client holds over the session.
pub trait SessionTeardown: Send + Sync + fmt::Debug {
    /// Drop the current user without any network call.
    fn clear_user(&self);

    /// Tear the session down after an unrecoverable refresh failure.
    fn session_expired(&self) {
        self.clear_user();
    }
}

struct HandleInner {
    state: watch::Sender<Session>,
    events: broadcast::Sender<SessionEvent>,
}

/// Shared, observable session state. Cloning shares the state.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<HandleInner>,
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("session", &*self.inner.state.borrow())
            .finish()
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHandle {
    /// Create a handle in the uninitialized (loading) state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(Session::uninitialized());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(HandleInner { state, events }),
        }
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Observe every state change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// Observe discrete transitions.
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Transition to `Authenticated`.
    pub fn set_user(&self, user: User) {
        tracing::info!(user_id = %user.id, "session authenticated");
        self.inner
            .state
            .send_replace(Session::authenticated(user.clone()));
        let _ = self.inner.events.send(SessionEvent::Authenticated(user));
    }

    /// Transition to `Unauthenticated`; returns whether anything changed.
    fn transition_out(&self) -> bool {
        let mut was_signed_in = false;
        let changed = self.inner.state.send_if_modified(|session| {
            was_signed_in = session.is_authenticated;
            let next = Session::unauthenticated();
            if *session == next {
                false
            } else {
                *session = next;
                true
            }
        });
        changed && was_signed_in
    }
}

impl SessionTeardown for SessionHandle {
    fn clear_user(&self) {
        if self.transition_out() {
            tracing::info!("session cleared");
            let _ = self.inner.events.send(SessionEvent::SignedOut);
        }
    }

    fn session_expired(&self) {
        if self.transition_out() {
            tracing::warn!("session expired");
            let _ = self.inner.events.send(SessionEvent::Expired);
        }
    }
}

/// Drives the session lifecycle over the admin API.
#[derive(Debug, Clone)]
pub struct SessionStore {
    client: RequestClient,
    handle: SessionHandle,
}

impl SessionStore {
    /// Pair an existing client with the handle it tears down.
    pub fn new(client: RequestClient, handle: SessionHandle) -> Self {
        Self { client, handle }
    }

    /// Build a request client wired to a fresh session handle.
    pub fn connect(builder: ClientBuilder) -> Result<Self> {
        let handle = SessionHandle::new();
        let client = builder.session(Arc::new(handle.clone())).build()?;
        Ok(Self::new(client, handle))
    }

    /// The request client this store talks through.
    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    /// The underlying state handle.
    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn snapshot(&self) -> Session {
        self.handle.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.handle.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.handle.events()
    }

    /// Restore the session from the cookie jar by asking the server who we are.
    ///
    /// Never fails: any error, including an expired session, resolves to
    /// `Unauthenticated`.
    pub async fn hydrate(&self) -> Session {
        match self.client.auth().me().await {
            Ok(me) => match (me.authenticated, me.user) {
                (true, Some(profile)) => self.handle.set_user(profile.into()),
                _ => {
                    tracing::debug!("no authenticated session");
                    self.handle.clear_user();
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "session hydration failed");
                self.handle.clear_user();
            }
        }
        self.snapshot()
    }

    /// Transition to `Authenticated` after a successful login call.
    pub fn set_user(&self, user: User) {
        self.handle.set_user(user);
    }

    /// Transition to `Unauthenticated` without a network call.
    pub fn clear_user(&self) {
        self.handle.clear_user();
    }

    /// Sign in and load the resulting profile.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Session> {
        self.client.auth().login(credentials).await?;
        Ok(self.hydrate().await)
    }

    /// Best-effort server logout, then local teardown regardless of outcome.
    pub async fn logout(&self) {
        if let Err(e) = self.client.auth().logout().await {
            tracing::debug!(error = %e, "logout request failed, clearing session anyway");
        }
        self.handle.clear_user();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "1".to_string(),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            role: "admin".to_string(),
        }
    }

    #[test]
    fn test_handle_starts_loading() {
        let handle = SessionHandle::new();
        let session = handle.snapshot();
        assert!(session.is_loading);
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
    }

    #[test]
    fn test_set_user_then_clear_keeps_invariant() {
        let handle = SessionHandle::new();
        handle.set_user(user());
        let session = handle.snapshot();
        assert!(session.is_authenticated && session.user.is_some());
        assert!(!session.is_loading);

        handle.clear_user();
        let session = handle.snapshot();
        assert!(!session.is_authenticated && session.user.is_none());
        assert!(!session.is_loading);
    }

    #[tokio::test]
    async fn test_events_are_published() {
        let handle = SessionHandle::new();
        let mut events = handle.events();

        handle.set_user(user());
        handle.session_expired();

        assert_eq!(events.recv().await.unwrap(), SessionEvent::Authenticated(user()));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
    }

    #[tokio::test]
    async fn test_repeated_teardown_emits_once() {
        let handle = SessionHandle::new();
        let mut events = handle.events();

        handle.set_user(user());
        handle.session_expired();
        handle.session_expired();
        handle.clear_user();

        assert!(matches!(events.recv().await.unwrap(), SessionEvent::Authenticated(_)));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_watchers_see_changes() {
        let handle = SessionHandle::new();
        let mut rx = handle.subscribe();

        handle.set_user(user());
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_authenticated);
    }

    #[test]
    fn test_clear_from_loading_leaves_loading_state() {
        let handle = SessionHandle::new();
        handle.clear_user();
        assert!(!handle.snapshot().is_loading);
    }
}
