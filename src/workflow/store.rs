//! Session-scoped instance storage.
//!
//! # Responsibilities
//! - Define the keyed-store interface the continuation depends on
//! - Provide an in-memory implementation for tests and single-process shells
//!
//! # Design Decisions
//! - Stored values are type-erased `Arc`s so the shell's own handler and
//!   form types flow through without the core knowing them
//! - The store performs no per-session locking; two requests racing on the
//!   same key observe last-write-wins

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;

/// A type-erased handler or form instance held by a session.
pub type StoredInstance = Arc<dyn Any + Send + Sync>;

/// Keyed storage scoped by session, supplied by the embedding application.
///
/// Implementations must provide at-least-read-your-writes consistency within
/// one session.
pub trait SessionStore: Send + Sync {
    fn get(&self, session_id: &str, key: &str) -> Option<StoredInstance>;
    fn put(&self, session_id: &str, key: &str, value: StoredInstance);
    fn remove(&self, session_id: &str, key: &str);
}

/// Concurrent in-memory session store.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: DashMap<(String, String), StoredInstance>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, session_id: &str, key: &str) -> Option<StoredInstance> {
        self.entries
            .get(&(session_id.to_string(), key.to_string()))
            .map(|entry| Arc::clone(entry.value()))
    }

    fn put(&self, session_id: &str, key: &str, value: StoredInstance) {
        self.entries
            .insert((session_id.to_string(), key.to_string()), value);
    }

    fn remove(&self, session_id: &str, key: &str) {
        self.entries
            .remove(&(session_id.to_string(), key.to_string()));
    }
}
