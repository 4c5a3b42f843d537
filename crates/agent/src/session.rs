//! In-memory session store, one conversation state per thread.
//!
//! Threads never survive a restart; that matches the checkpointing scope
//! the assistant needs (short advisory conversations) and keeps the store
//! a plain map.

use std::collections::HashMap;
use std::sync::Arc;

use sevahealth_core::message::{ConversationState, Message, ThreadId};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Default number of live threads before idle ones are evicted.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Thread-keyed store of conversation state.
///
/// Each entry is an `Arc<Mutex<ConversationState>>`: a caller locks a
/// thread for the duration of a turn, so concurrent turns on the same
/// thread serialize while different threads proceed independently. Lookups
/// for the same thread return the same entry, never a copy.
pub struct SessionStore {
    threads: RwLock<HashMap<String, Arc<Mutex<ConversationState>>>>,
    primer: String,
    capacity: usize,
}

impl SessionStore {
    /// Create a store that seeds new threads with `primer`.
    pub fn new(primer: impl Into<String>, capacity: usize) -> Self {
        Self {
            threads: RwLock::new(HashMap::new()),
            primer: primer.into(),
            capacity: capacity.max(1),
        }
    }

    /// Get the state for a thread, creating it when absent.
    ///
    /// A new thread starts with the system primer as its first message.
    pub async fn get_or_create(&self, thread_id: &str) -> Arc<Mutex<ConversationState>> {
        if let Some(entry) = self.threads.read().await.get(thread_id) {
            return Arc::clone(entry);
        }

        let mut threads = self.threads.write().await;
        // Lost the race: another task created it between the locks
        if let Some(entry) = threads.get(thread_id) {
            return Arc::clone(entry);
        }

        if threads.len() >= self.capacity {
            evict_idle(&mut threads, self.capacity);
        }

        let mut state = ConversationState::new(ThreadId::from(thread_id));
        state.push(Message::system(&self.primer));
        let entry = Arc::new(Mutex::new(state));
        threads.insert(thread_id.to_string(), Arc::clone(&entry));
        debug!(thread_id, threads = threads.len(), "Created conversation thread");
        entry
    }

    /// Look up an existing thread without creating it.
    pub async fn get(&self, thread_id: &str) -> Option<Arc<Mutex<ConversationState>>> {
        self.threads.read().await.get(thread_id).cloned()
    }

    /// Drop a thread's state. Returns whether it existed.
    pub async fn remove(&self, thread_id: &str) -> bool {
        self.threads.write().await.remove(thread_id).is_some()
    }

    /// Number of live threads.
    pub async fn len(&self) -> usize {
        self.threads.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.threads.read().await.is_empty()
    }
}

/// Evict least-recently-updated threads until under capacity.
///
/// Only idle threads are candidates: a thread whose mutex is held is
/// mid-turn and must not lose its state. If every thread is mid-turn the
/// map is left over capacity.
fn evict_idle(
    threads: &mut HashMap<String, Arc<Mutex<ConversationState>>>,
    capacity: usize,
) {
    while threads.len() >= capacity {
        let victim = threads
            .iter()
            .filter_map(|(id, entry)| {
                entry
                    .try_lock()
                    .ok()
                    .map(|state| (id.clone(), state.updated_at))
            })
            .min_by_key(|(_, updated_at)| *updated_at)
            .map(|(id, _)| id);

        match victim {
            Some(id) => {
                threads.remove(&id);
                info!(thread_id = %id, "Evicted idle conversation thread");
            }
            None => break,
        }
    }
}
