//! # Session Store Contract
//!
//! The key-value slot the engine persists the cart into.
//!
//! ## Contract
//! ```text
//! get(key)        → Some(value) | None        (absent is not an error)
//! put(key, value) → replaces the whole slot    (no partial writes)
//! delete(key)     → removes the slot           (absent is not an error)
//! ```
//!
//! Values are opaque strings; [`crate::codec`] decides what goes in them.
//! Stores are synchronous. Timeouts, retries and locking across requests
//! are the store's (or the host's) business: last writer wins.

use std::collections::HashMap;

use crate::error::SessionResult;

/// Key-value persistence for serialized carts.
pub trait SessionStore {
    fn get(&self, key: &str) -> SessionResult<Option<String>>;

    fn put(&mut self, key: &str, value: String) -> SessionResult<()>;

    fn delete(&mut self, key: &str) -> SessionResult<()>;

    fn contains(&self, key: &str) -> SessionResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Lets a host lend its store to a short-lived engine.
impl<S: SessionStore + ?Sized> SessionStore for &mut S {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: String) -> SessionResult<()> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &str) -> SessionResult<()> {
        (**self).delete(key)
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: String) -> SessionResult<()> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &str) -> SessionResult<()> {
        (**self).delete(key)
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-process store backed by a `HashMap`.
///
/// Useful for tests and for hosts that keep sessions in memory anyway.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slots: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> SessionResult<()> {
        self.slots.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> SessionResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}
