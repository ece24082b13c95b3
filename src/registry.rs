#![cfg(feature = "std")]

//! Process-wide home of the two player slots.
//!
//! The registry owns the canonical `Session` for the lifetime of the server.
//! Connection handlers reach it through an `Arc` and hold the lock only for
//! the synchronous reconciliation step, never across network I/O, so rounds
//! from the two players are serialized.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use rand::Rng;

use crate::common::{BoardError, PlayerId, SnapshotError};
use crate::player::PlayerState;
use crate::reconcile::{Round, Session};

pub struct SessionRegistry {
    session: Mutex<Session>,
    claimed: AtomicUsize,
}

impl SessionRegistry {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
            claimed: AtomicUsize::new(0),
        }
    }

    /// Registry whose two boards carry a freshly placed standard fleet.
    pub fn with_random_fleets<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, BoardError> {
        Ok(Self::new(Session::with_random_fleets(rng)?))
    }

    /// Hand out the next free slot in arrival order. Slots are never
    /// released, so a third caller always gets `None`.
    pub fn claim_slot(&self) -> Option<PlayerId> {
        self.claimed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < 2).then_some(n + 1))
            .ok()
            .and_then(PlayerId::from_index)
    }

    /// Number of slots handed out so far.
    pub fn claimed_slots(&self) -> usize {
        self.claimed.load(Ordering::SeqCst)
    }

    /// Copy of the stored state for `slot`.
    pub fn state(&self, slot: PlayerId) -> PlayerState {
        self.lock().player(slot).clone()
    }

    pub fn current_turn(&self) -> PlayerId {
        self.lock().current_turn()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.lock().winner()
    }

    /// Run one reconciliation round for `slot` under the registry lock.
    pub fn reconcile(
        &self,
        slot: PlayerId,
        submitted: &PlayerState,
    ) -> Result<Round, SnapshotError> {
        let mut session = self.lock();
        let round = session.reconcile(slot, submitted)?;
        debug!(
            "{} round: {} shots declared, {} resolved, turn -> {}",
            slot,
            round.own.shots_fired.len(),
            round.resolved.len(),
            session.current_turn()
        );
        Ok(round)
    }

    /// Run `f` with exclusive access to the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // Reconciliation has no panicking paths; a poisoned lock is recovered
        // instead of taking both handlers down.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
