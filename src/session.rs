//! Analyzed-text sessions
//!
//! Every `/analyze` call opens a session holding the document text. The
//! most recent session is also the "latest" slot, which quiz requests
//! without a session id fall back to. That slot is last-write-wins across
//! all clients; pass the session id to avoid picking up someone else's
//! document.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::error::AppResult;

pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Default)]
struct Sessions {
    texts: HashMap<Uuid, Arc<str>>,
    order: VecDeque<Uuid>,
}

pub struct SessionStore {
    inner: Mutex<Sessions>,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Sessions::default()),
            capacity: capacity.max(1),
        }
    }

    /// Store `text` under a fresh id, evicting the oldest session when full.
    pub fn insert(&self, text: String) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        let mut sessions = self.inner.lock().map_err(|e| e.to_string())?;
        sessions.texts.insert(id, Arc::from(text));
        sessions.order.push_back(id);
        while sessions.order.len() > self.capacity {
            if let Some(oldest) = sessions.order.pop_front() {
                sessions.texts.remove(&oldest);
                log::debug!("Evicted analysis session {}", oldest);
            }
        }
        Ok(id)
    }

    pub fn get(&self, id: &Uuid) -> AppResult<Option<Arc<str>>> {
        let sessions = self.inner.lock().map_err(|e| e.to_string())?;
        Ok(sessions.texts.get(id).cloned())
    }

    /// Text of the most recent analysis, whoever submitted it.
    pub fn latest(&self) -> AppResult<Option<Arc<str>>> {
        let sessions = self.inner.lock().map_err(|e| e.to_string())?;
        Ok(sessions
            .order
            .back()
            .and_then(|id| sessions.texts.get(id))
            .cloned())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|s| s.texts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
