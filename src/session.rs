//! Session-scoped quiz storage.
//!
//! Each browser session holds at most one active quiz, replaced wholesale
//! whenever a new generation run succeeds and gone when the process exits —
//! there is deliberately no persistence layer behind this. Sessions are
//! keyed by an opaque v4 UUID carried in a cookie; the store itself knows
//! nothing about cookies.
//!
//! Requests from *different* sessions never contend on data, only on the map
//! itself, and the lock is held just long enough to clone a quiz in or out.
//! Concurrent requests from the *same* session can interleave; last write
//! wins, which matches the replace-wholesale semantics.

use crate::quiz::Question;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Shared handle to every session's active quiz.
///
/// Cloning is cheap and every clone addresses the same underlying map, so
/// handlers take the store by value out of shared state.
#[derive(Debug, Clone, Default)]
pub struct QuizStore {
    inner: Arc<Mutex<HashMap<Uuid, Vec<Question>>>>,
}

impl QuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session's quiz (or create the session's slot).
    pub fn replace(&self, session: Uuid, quiz: Vec<Question>) {
        self.lock().insert(session, quiz);
    }

    /// A clone of the session's active quiz; `None` when the session has
    /// never generated one.
    pub fn get(&self, session: Uuid) -> Option<Vec<Question>> {
        self.lock().get(&session).cloned()
    }

    /// Drop the session's quiz entirely.
    pub fn remove(&self, session: Uuid) {
        self.lock().remove(&session);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Vec<Question>>> {
        // A poisoned lock only means some other request panicked mid-access;
        // the map itself is still coherent for this whole-value usage.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
