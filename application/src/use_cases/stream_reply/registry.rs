//! Per-conversation session registry.
//!
//! At most one session per conversation is live. Registering a new session
//! replaces the previous entry under a single lock, then closes the previous
//! session's delivery gate and cancels its token before returning.
//!
//! The delivery gate is a mutex held while a token is handed to the caller.
//! Closing a session waits for an in-flight delivery on another thread to
//! finish, so once [`SessionRegistry::register`] returns, the superseded
//! session can never deliver another token. Closing from inside a delivery
//! callback does not wait; that delivery completes and none follow it.

use aivy_domain::ConversationId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Shared state of one registered session.
#[derive(Debug)]
struct SessionSlot {
    request_id: u64,
    cancel: CancellationToken,
    closed: AtomicBool,
    gate: Mutex<()>,
    delivering: Mutex<Option<ThreadId>>,
}

impl SessionSlot {
    fn new(request_id: u64, cancel: CancellationToken) -> Self {
        Self {
            request_id,
            cancel,
            closed: AtomicBool::new(false),
            gate: Mutex::new(()),
            delivering: Mutex::new(None),
        }
    }

    /// Waits out a delivery running on another thread.
    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.cancel.cancel();
        if self.delivering_thread() != Some(thread::current().id()) {
            drop(self.gate.lock().unwrap_or_else(PoisonError::into_inner));
        }
    }

    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire) && !self.cancel.is_cancelled()
    }

    fn delivering_thread(&self) -> Option<ThreadId> {
        *self.delivering.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_delivering(&self, thread: Option<ThreadId>) {
        *self.delivering.lock().unwrap_or_else(PoisonError::into_inner) = thread;
    }
}

/// Marks the current thread as delivering until dropped.
struct DeliveringGuard<'a>(&'a SessionSlot);

impl<'a> DeliveringGuard<'a> {
    fn enter(slot: &'a SessionSlot) -> Self {
        slot.set_delivering(Some(thread::current().id()));
        Self(slot)
    }
}

impl Drop for DeliveringGuard<'_> {
    fn drop(&mut self) {
        self.0.set_delivering(None);
    }
}

/// Registry of live sessions keyed by conversation.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_request_id: AtomicU64,
    sessions: Mutex<HashMap<ConversationId, Arc<SessionSlot>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session for `conversation_id`, superseding any live one.
    ///
    /// The session's token is a child of `parent`, so cancelling the
    /// caller's token also cancels the session. Called from a delivery
    /// callback of the session it supersedes, it returns without waiting
    /// for that callback.
    pub fn register(
        self: &Arc<Self>,
        conversation_id: ConversationId,
        parent: &CancellationToken,
    ) -> SessionLease {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed) + 1;
        let slot = Arc::new(SessionSlot::new(request_id, parent.child_token()));

        let previous = self
            .lock_sessions()
            .insert(conversation_id.clone(), Arc::clone(&slot));

        if let Some(previous) = previous {
            info!(
                "Conversation {}: request {} supersedes request {}",
                conversation_id, request_id, previous.request_id
            );
            previous.close();
        } else {
            debug!(
                "Conversation {}: registered request {}",
                conversation_id, request_id
            );
        }

        SessionLease {
            registry: Arc::clone(self),
            conversation_id,
            slot,
        }
    }

    /// Request id of the live session for `conversation_id`, if any.
    pub fn active_request(&self, conversation_id: &ConversationId) -> Option<u64> {
        self.lock_sessions()
            .get(conversation_id)
            .map(|slot| slot.request_id)
    }

    /// Number of conversations with a live session.
    pub fn active_count(&self) -> usize {
        self.lock_sessions().len()
    }

    /// Cancel the live session of `conversation_id`. Returns whether one existed.
    ///
    /// Safe to call from that session's own delivery callback.
    pub fn cancel(&self, conversation_id: &ConversationId) -> bool {
        let slot = self.lock_sessions().remove(conversation_id);
        match slot {
            Some(slot) => {
                slot.close();
                true
            }
            None => false,
        }
    }

    fn deregister(&self, conversation_id: &ConversationId, request_id: u64) {
        let mut sessions = self.lock_sessions();
        if sessions
            .get(conversation_id)
            .is_some_and(|slot| slot.request_id == request_id)
        {
            sessions.remove(conversation_id);
            debug!(
                "Conversation {}: request {} deregistered",
                conversation_id, request_id
            );
        }
    }

    fn lock_sessions(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<ConversationId, Arc<SessionSlot>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Membership of one session in the registry.
///
/// Dropping the lease removes the registry entry, unless a newer session
/// has already replaced it.
#[derive(Debug)]
pub struct SessionLease {
    registry: Arc<SessionRegistry>,
    conversation_id: ConversationId,
    slot: Arc<SessionSlot>,
}

impl SessionLease {
    pub fn request_id(&self) -> u64 {
        self.slot.request_id
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.slot.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.slot.cancel.is_cancelled()
    }

    /// Run `deliver` while holding the gate, if the session is still live.
    ///
    /// Returns `false` without running it when the session was superseded
    /// or cancelled.
    pub fn deliver(&self, deliver: impl FnOnce()) -> bool {
        let _gate = self.slot.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.slot.is_open() {
            return false;
        }
        let _delivering = DeliveringGuard::enter(&self.slot);
        deliver();
        true
    }

    /// Cancel this session and close its gate.
    pub fn close(&self) {
        self.slot.close();
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.registry
            .deregister(&self.conversation_id, self.slot.request_id);
    }
}
