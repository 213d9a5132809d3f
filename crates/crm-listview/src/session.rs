//! Session Context
//!
//! The bearer token is the only client-side persisted state. Everything that
//! talks to the backend receives a `Session` instead of touching storage.

use std::cell::RefCell;
use std::rc::Rc;

/// Where the bearer token lives (browser storage, memory, ...)
pub trait TokenStore {
    fn read(&self) -> Option<String>;
    fn write(&self, token: &str);
    fn clear(&self);
}

/// In-process token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn write(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.borrow_mut() = None;
    }
}

/// Shared handle over a token store
#[derive(Clone)]
pub struct Session {
    store: Rc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Rc::new(store),
        }
    }

    /// Current bearer token; blank tokens count as absent
    pub fn bearer(&self) -> Option<String> {
        self.store.read().filter(|t| !t.trim().is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }

    pub fn set_token(&self, token: &str) {
        self.store.write(token);
    }

    pub fn clear(&self) {
        log::debug!("session: clearing stored credential");
        self.store.clear();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_absent() {
        let session = Session::new(MemoryTokenStore::with_token("   "));
        assert_eq!(session.bearer(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_clones_share_the_store() {
        let session = Session::new(MemoryTokenStore::new());
        let other = session.clone();
        session.set_token("abc");
        assert_eq!(other.bearer().as_deref(), Some("abc"));
        other.clear();
        assert!(!session.is_authenticated());
    }
}
