use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Open,
}

/// What the caller wanted, judged from the unlocked fast-path read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleIntent {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Spawn,
    RequestClose,
    Noop,
}

/// Transition table. `state` is the authoritative value read under the
/// transition lock; a mismatch with `intent` means another toggle won the
/// race and this one does nothing.
pub fn next_action(state: SessionState, intent: ToggleIntent) -> ToggleAction {
    match (state, intent) {
        (SessionState::Closed, ToggleIntent::Open) => ToggleAction::Spawn,
        (SessionState::Open, ToggleIntent::Close) => ToggleAction::RequestClose,
        (SessionState::Open, ToggleIntent::Open) | (SessionState::Closed, ToggleIntent::Close) => {
            ToggleAction::Noop
        }
    }
}

/// Single-flight guard for the live session. The flag is the lock-free fast
/// path; the mutex owns the handle and serializes spawn decisions.
#[derive(Debug)]
pub struct SessionGuard<H> {
    open: AtomicBool,
    live: Mutex<Option<(SessionId, H)>>,
    next_id: AtomicU64,
}

impl<H> Default for SessionGuard<H> {
    fn default() -> Self {
        Self {
            open: AtomicBool::new(false),
            live: Mutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<H> SessionGuard<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.open.load(Ordering::Acquire) {
            SessionState::Open
        } else {
            SessionState::Closed
        }
    }

    /// Runs one toggle. `spawn` is called under the lock and must only start
    /// the session, not wait on it; `close` receives the live handle and must
    /// not block either.
    pub fn toggle<S, C>(&self, spawn: S, close: C) -> ToggleAction
    where
        S: FnOnce(SessionId) -> H,
        C: FnOnce(&H),
    {
        let intent = match self.state() {
            SessionState::Open => ToggleIntent::Close,
            SessionState::Closed => ToggleIntent::Open,
        };

        let mut live = self.live.lock();
        match next_action(self.state(), intent) {
            ToggleAction::Spawn => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
                *live = Some((id, spawn(id)));
                self.open.store(true, Ordering::Release);
                ToggleAction::Spawn
            }
            ToggleAction::RequestClose => match live.as_ref() {
                Some((_, handle)) => {
                    close(handle);
                    ToggleAction::RequestClose
                }
                None => ToggleAction::Noop,
            },
            ToggleAction::Noop => ToggleAction::Noop,
        }
    }

    /// Called by a session on its way out. Only the session that currently
    /// owns the slot can clear it.
    pub fn release(&self, id: SessionId) -> bool {
        let mut live = self.live.lock();
        match live.as_ref() {
            Some((current, _)) if *current == id => {
                *live = None;
                self.open.store(false, Ordering::Release);
                true
            }
            _ => false,
        }
    }

    pub fn with_live<R>(&self, f: impl FnOnce(SessionId, &H) -> R) -> Option<R> {
        self.live.lock().as_ref().map(|(id, handle)| f(*id, handle))
    }
}
