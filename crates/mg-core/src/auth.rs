//! # Shared authentication state
//!
//! The process-wide "current user" capsule, fed by the identity provider and
//! fanned out to every page that needs it. Subscribers receive the current
//! value immediately; dropping the receiver releases the subscription.

use tokio::sync::watch;

use crate::models::AuthenticatedUser;

/// Observable authentication state.
#[derive(Debug, Clone)]
pub struct AuthState {
    tx: watch::Sender<Option<AuthenticatedUser>>,
}

impl AuthState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// The current user, if signed in.
    pub fn current(&self) -> Option<AuthenticatedUser> {
        self.tx.borrow().clone()
    }

    /// Subscribes to sign-in/sign-out changes. The receiver observes the
    /// current value right away, before any change is published.
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthenticatedUser>> {
        self.tx.subscribe()
    }

    pub fn set(&self, user: AuthenticatedUser) {
        self.tx.send_replace(Some(user));
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}
