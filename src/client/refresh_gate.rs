//! Single-flight guard for session refresh.
//!
//! When a burst of requests all come back 401, exactly one of them (the
//! leader) performs the refresh. The rest park on a oneshot channel and are
//! woken in arrival order with the leader's outcome.
//!
//! A generation counter is bumped on every successful refresh. A request
//! remembers the generation it was sent under; if it sees a 401 after a
//! newer refresh already finished, it replays without refreshing again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use crate::client::error::ClientError;

type Outcome = Result<(), ClientError>;

#[derive(Debug, Default)]
struct GateState {
    in_progress: bool,
    waiters: Vec<oneshot::Sender<Outcome>>,
    generation: u64,
}

/// Shared handle; clones refer to the same gate.
#[derive(Debug, Clone, Default)]
pub struct RefreshGate {
    state: Arc<Mutex<GateState>>,
}

/// Role assigned to a caller that needs a refresh.
#[derive(Debug)]
pub enum GateEntry {
    /// Caller must run the refresh and complete the lease
    Leader(RefreshLease),
    /// A refresh is already running; await its outcome
    Follower(oneshot::Receiver<Outcome>),
    /// A refresh finished after the caller's request was sent
    AlreadyRefreshed,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count of successful refreshes so far.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().in_progress
    }

    /// Join the gate after observing a 401 on a request sent under `seen`.
    pub fn enter(&self, seen: u64) -> GateEntry {
        let mut state = self.lock();
        if state.in_progress {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            return GateEntry::Follower(rx);
        }
        if state.generation != seen {
            return GateEntry::AlreadyRefreshed;
        }
        state.in_progress = true;
        GateEntry::Leader(RefreshLease {
            gate: self.clone(),
            completed: false,
        })
    }

    fn finish(&self, outcome: Outcome) {
        let waiters = {
            let mut state = self.lock();
            state.in_progress = false;
            if outcome.is_ok() {
                state.generation += 1;
            }
            std::mem::take(&mut state.waiters)
        };

        tracing::debug!(waiters = waiters.len(), ok = outcome.is_ok(), "refresh settled");
        for waiter in waiters {
            // receiver gone means the waiting request was cancelled
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Proof of leadership. Completing it wakes every follower; dropping it
/// without completing (the leader was cancelled) fails them.
#[derive(Debug)]
pub struct RefreshLease {
    gate: RefreshGate,
    completed: bool,
}

impl RefreshLease {
    pub fn complete(mut self, outcome: Outcome) {
        self.completed = true;
        self.gate.finish(outcome);
    }
}

impl Drop for RefreshLease {
    fn drop(&mut self) {
        if !self.completed {
            self.gate
                .finish(Err(ClientError::Http("session refresh was cancelled".to_string())));
        }
    }
}
