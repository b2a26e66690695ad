//! Session Store: the tab-wide authenticated-session state.
//!
//! [`SessionState`] holds the data and its pure transition functions.
//! [`SessionStore`] is the shared container handed to action handlers and
//! views. It applies transitions and broadcasts every new state to
//! subscribers so views can re-render.
//!
//! ```text
//!            begin_mutation            complete_mutation
//!   Idle ───────────────────▶ Pending ───────────────────▶ Idle
//!    ▲                           │
//!    │                           │ fail_mutation
//!    │       begin_mutation      ▼
//!    │   ◀─────────────────── Error
//!    └── clear_session (from any state)
//! ```

use estate_core::Identity;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Derived lifecycle status of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No request in flight and no error to show
    Idle,
    /// An identity-mutating request is in flight
    Pending,
    /// The last request failed; `last_error` holds the message
    Error,
}

/// Current identity plus request-lifecycle flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_identity: Option<Identity>,
    pub pending: bool,
    pub last_error: Option<String>,
}

impl SessionState {
    /// A signed-in, idle session
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            current_identity: Some(identity),
            pending: false,
            last_error: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.pending {
            SessionStatus::Pending
        } else if self.last_error.is_some() {
            SessionStatus::Error
        } else {
            SessionStatus::Idle
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_identity.is_some()
    }

    pub fn begin_mutation(&mut self) {
        self.pending = true;
        self.last_error = None;
    }

    /// Replace the identity wholesale with what the server returned
    pub fn complete_mutation(&mut self, identity: Identity) {
        self.current_identity = Some(identity);
        self.pending = false;
        self.last_error = None;
    }

    /// Record a failure. The identity is left exactly as it was.
    pub fn fail_mutation(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.pending = false;
    }

    pub fn clear_session(&mut self) {
        self.current_identity = None;
        self.pending = false;
        self.last_error = None;
    }
}

/// Proof that a mutation was begun, tagged with the store generation.
///
/// A ticket goes stale as soon as another `begin_mutation` or a
/// `clear_session` happens; completing or failing with a stale ticket is a
/// no-op, so an older response can never overwrite a newer outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a mutation must be completed or failed with its ticket"]
pub struct MutationTicket(u64);

#[derive(Debug, Default)]
struct Slot {
    state: SessionState,
    generation: u64,
}

/// Shared, injectable container for the session.
///
/// Clones share the same state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<watch::Sender<Slot>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::from_state(SessionState::default())
    }
}

impl SessionStore {
    /// A signed-out store
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `identity`, e.g. restored after a page load
    pub fn with_identity(identity: Identity) -> Self {
        Self::from_state(SessionState::signed_in(identity))
    }

    fn from_state(state: SessionState) -> Self {
        let (tx, _rx) = watch::channel(Slot {
            state,
            generation: 0,
        });
        Self {
            inner: Arc::new(tx),
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.inner.borrow().state.clone()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.inner.borrow().state.current_identity.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.borrow().state.status()
    }

    /// Receiver that is notified after every transition
    pub fn subscribe(&self) -> SessionWatcher {
        SessionWatcher {
            rx: self.inner.subscribe(),
        }
    }

    pub fn begin_mutation(&self) -> MutationTicket {
        let mut ticket = MutationTicket(0);
        self.inner.send_modify(|slot| {
            slot.generation += 1;
            slot.state.begin_mutation();
            ticket = MutationTicket(slot.generation);
        });
        ticket
    }

    /// Apply a successful outcome. Returns `false` if the ticket was stale.
    pub fn complete_mutation(&self, ticket: MutationTicket, identity: Identity) -> bool {
        self.inner.send_if_modified(|slot| {
            if slot.generation != ticket.0 {
                debug!(
                    ticket = ticket.0,
                    generation = slot.generation,
                    "Dropping stale mutation result"
                );
                return false;
            }
            slot.state.complete_mutation(identity);
            true
        })
    }

    /// Apply a failed outcome. Returns `false` if the ticket was stale.
    pub fn fail_mutation(&self, ticket: MutationTicket, message: impl Into<String>) -> bool {
        let message = message.into();
        self.inner.send_if_modified(|slot| {
            if slot.generation != ticket.0 {
                debug!(
                    ticket = ticket.0,
                    generation = slot.generation,
                    "Dropping stale mutation failure"
                );
                return false;
            }
            slot.state.fail_mutation(message);
            true
        })
    }

    pub fn clear_session(&self) {
        self.inner.send_modify(|slot| {
            slot.generation += 1;
            slot.state.clear_session();
        });
    }
}

/// Change notifications from a [`SessionStore`].
#[derive(Debug)]
pub struct SessionWatcher {
    rx: watch::Receiver<Slot>,
}

impl SessionWatcher {
    /// Wait for the next transition and return the resulting state.
    ///
    /// Returns `None` once every store handle has been dropped.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().state.clone())
    }

    pub fn current(&self) -> SessionState {
        self.rx.borrow().state.clone()
    }
}
