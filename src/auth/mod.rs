//! Bearer-token access for API calls.
//!
//! Token storage belongs to the host shell; the client only needs a way to
//! read the current token and, for host chrome that reacts to login state,
//! a change notification. Both are behind the `TokenProvider` trait so the
//! upload flow can be exercised in isolation with a canned token.

use std::sync::Arc;

use tokio::sync::watch;

/// Read access to the current bearer token. `None` means logged out, in
/// which case requests go out unauthenticated and the backend rejects them.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// In-memory token store with change subscription.
#[derive(Debug)]
pub struct MemoryTokenStore {
    current: watch::Sender<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_token(token);
        store
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.current.send_replace(Some(token.into()));
    }

    pub fn clear_token(&self) {
        self.current.send_replace(None);
    }

    /// Receiver that resolves whenever the token changes (login, logout,
    /// refresh). Host chrome subscribes; the upload flow does not.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.current.subscribe()
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenProvider for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.current.borrow().clone()
    }
}

impl TokenProvider for Arc<MemoryTokenStore> {
    fn token(&self) -> Option<String> {
        self.as_ref().token()
    }
}
