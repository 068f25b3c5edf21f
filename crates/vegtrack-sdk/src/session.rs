//! Authentication session context
//!
//! A [`Session`] is the single shared view of the caller's authentication
//! state. Components read the current state through it and subscribe to
//! transition events instead of polling; the reconciler in particular keys
//! off the "became authenticated" edge.

use std::sync::Arc;
use tokio::sync::{broadcast, watch};

/// Current authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Bearer token attached to outgoing calls, when authenticated
    pub token: Option<String>,
    /// Set when the previous credential was rejected by the server,
    /// signalling the embedding UI to redirect to login
    pub expired: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Discrete session transition events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Unauthenticated -> authenticated edge. Re-authentication without an
    /// intervening logout does not emit this again.
    Authenticated,
    /// Explicit logout
    LoggedOut,
    /// Credential rejected by the server (401)
    Expired,
}

/// Shared session context
#[derive(Clone)]
pub struct Session {
    state: Arc<watch::Sender<AuthState>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// Create an unauthenticated session
    pub fn new() -> Self {
        let (state, _) = watch::channel(AuthState::default());
        let (events, _) = broadcast::channel(16);
        Self {
            state: Arc::new(state),
            events,
        }
    }

    /// Create a session that starts out authenticated
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.login(token);
        session
    }

    /// Store a credential. Emits [`SessionEvent::Authenticated`] only on the
    /// unauthenticated -> authenticated edge.
    pub fn login(&self, token: impl Into<String>) {
        let was_authenticated = self.is_authenticated();
        self.state.send_replace(AuthState {
            token: Some(token.into()),
            expired: false,
        });
        if !was_authenticated {
            let _ = self.events.send(SessionEvent::Authenticated);
        }
    }

    /// Clear the credential. Local-only entries are unaffected and remain
    /// pending sync across logins.
    pub fn logout(&self) {
        let was_authenticated = self.is_authenticated();
        self.state.send_replace(AuthState::default());
        if was_authenticated {
            let _ = self.events.send(SessionEvent::LoggedOut);
        }
    }

    /// Handle a credential rejection: clear the token and flag the expiry.
    pub fn expire(&self) {
        let was_authenticated = self.is_authenticated();
        self.state.send_replace(AuthState {
            token: None,
            expired: true,
        });
        if was_authenticated {
            tracing::warn!("session expired, credential cleared");
            let _ = self.events.send(SessionEvent::Expired);
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    /// Current state snapshot
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Observe state changes (latest value wins)
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Observe discrete transition events
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_emits_edge_once() {
        let session = Session::new();
        let mut events = session.events();

        session.login("token-a");
        // Re-authentication without logout: no second edge
        session.login("token-b");

        assert_eq!(events.recv().await.unwrap(), SessionEvent::Authenticated);
        assert!(events.try_recv().is_err());
        assert_eq!(session.token().as_deref(), Some("token-b"));
    }

    #[tokio::test]
    async fn test_logout_then_login_emits_new_edge() {
        let session = Session::with_token("token-a");
        let mut events = session.events();

        session.logout();
        session.login("token-b");

        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedOut);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::Authenticated);
    }

    #[tokio::test]
    async fn test_expire_clears_token_and_flags_state() {
        let session = Session::with_token("token-a");
        session.expire();

        assert!(!session.is_authenticated());
        assert!(session.state().expired);
    }

    #[tokio::test]
    async fn test_expire_when_unauthenticated_is_silent() {
        let session = Session::new();
        let mut events = session.events();
        session.expire();
        assert!(events.try_recv().is_err());
    }
}
