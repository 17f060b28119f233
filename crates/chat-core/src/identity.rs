//! Durable conversation identity.
//!
//! The token lives under a single storage key and survives page reloads.
//! Storage failures are never fatal: the identity degrades to an in-memory
//! token that lasts for this lifetime only.

use std::cell::RefCell;
use std::rc::Rc;

use futures::lock::Mutex;

use crate::ports::StoragePort;

pub struct SessionIdentity {
    storage: Rc<dyn StoragePort>,
    key: String,
    token: RefCell<Option<String>>,
    /// Held across storage I/O so overlapping calls never mint twice
    io: Mutex<()>,
}

impl SessionIdentity {
    pub fn new(storage: Rc<dyn StoragePort>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            token: RefCell::new(None),
            io: Mutex::new(()),
        }
    }

    /// Current token, `None` until `initialize` has completed.
    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Reuse the stored token or mint and persist a new one.
    ///
    /// Once a token is held, later calls return it without touching storage.
    pub async fn initialize(&self) -> String {
        if let Some(token) = self.token() {
            return token;
        }

        let _io = self.io.lock().await;
        if let Some(token) = self.token() {
            return token;
        }

        let token = match self.storage.get(&self.key).await {
            Ok(Some(existing)) if !existing.trim().is_empty() => {
                log::info!("Using existing session: {}", existing);
                existing
            }
            Ok(_) => {
                let fresh = new_token();
                self.persist(&fresh).await;
                log::info!("Created new session: {}", fresh);
                fresh
            }
            Err(e) => {
                log::warn!(
                    "Session storage '{}' unavailable ({}), using temporary session",
                    self.storage.backend_name(),
                    e
                );
                new_token()
            }
        };

        *self.token.borrow_mut() = Some(token.clone());
        token
    }

    /// Discard the stored token and start over with a fresh one.
    /// The new token always differs from the one it replaces.
    pub async fn reset(&self) -> String {
        let _io = self.io.lock().await;
        if let Err(e) = self.storage.delete(&self.key).await {
            log::warn!("Could not clear session from storage: {}", e);
        }

        let previous = self.token();
        let mut fresh = new_token();
        while previous.as_deref() == Some(fresh.as_str()) {
            fresh = new_token();
        }
        self.persist(&fresh).await;

        *self.token.borrow_mut() = Some(fresh.clone());
        log::info!("Session cleared and reset: {}", fresh);
        fresh
    }

    async fn persist(&self, token: &str) {
        if let Err(e) = self.storage.set(&self.key, token).await {
            log::warn!("Session token kept in memory only: {}", e);
        }
    }
}

fn new_token() -> String {
    uuid::Uuid::new_v4().to_string()
}
