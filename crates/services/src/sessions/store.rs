use parking_lot::Mutex;
use std::sync::Arc;

use quiz_core::model::{QuizId, QuizResult};

use super::projector::ResultProjector;
use super::reducer::{SessionEvent, apply};
use super::session::{QuizSession, SessionStatus};

/// Everything the store holds: the single session slot, the last result, a
/// pending-start marker and the generation counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    pub(super) session: Option<QuizSession>,
    pub(super) last_result: Option<QuizResult>,
    pub(super) starting: Option<QuizId>,
    pub(super) generation: u64,
}

impl StoreState {
    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// Most recent result, until dismissed or reset.
    #[must_use]
    pub fn last_result(&self) -> Option<&QuizResult> {
        self.last_result.as_ref()
    }

    /// Quiz whose start request is in flight, if any.
    #[must_use]
    pub fn starting(&self) -> Option<QuizId> {
        self.starting
    }

    /// Increases whenever the session slot changes identity.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Status of the session slot; `Finished` once only a result remains.
    #[must_use]
    pub fn status(&self) -> Option<SessionStatus> {
        self.session
            .as_ref()
            .map(QuizSession::status)
            .or_else(|| self.last_result.as_ref().map(|_| SessionStatus::Finished))
    }

    #[must_use]
    pub fn projector(&self) -> ResultProjector<'_> {
        ResultProjector::new(self.session.as_ref())
    }

    pub(super) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

/// Shared handle to the session slot.
///
/// Clones point at the same state, so the controller and any number of readers can
/// hold one each. The lock is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<StoreState>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Owned copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.inner.lock().clone()
    }

    /// Run `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.inner.lock())
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    /// Check preconditions and apply the resulting event under one lock.
    ///
    /// Returns the generation after the event was applied.
    pub(crate) fn transition<E>(
        &self,
        decide: impl FnOnce(&StoreState) -> Result<SessionEvent, E>,
    ) -> Result<u64, E> {
        let mut guard = self.inner.lock();
        let event = decide(&guard)?;
        let next = apply(std::mem::take(&mut *guard), event);
        *guard = next;
        Ok(guard.generation)
    }

    /// Apply an event unconditionally; the reducer drops it if it no longer fits.
    pub(crate) fn dispatch(&self, event: SessionEvent) -> u64 {
        let mut guard = self.inner.lock();
        let next = apply(std::mem::take(&mut *guard), event);
        *guard = next;
        guard.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_slot() {
        let store = SessionStore::new();
        let reader = store.clone();

        store.dispatch(SessionEvent::StartRequested {
            quiz_id: QuizId::new(4),
        });

        assert_eq!(reader.generation(), 1);
        assert_eq!(reader.read(StoreState::starting), Some(QuizId::new(4)));
    }

    #[test]
    fn rejected_transition_leaves_state_untouched() {
        let store = SessionStore::new();
        let before = store.snapshot();

        let outcome: Result<u64, &str> = store.transition(|_| Err("no"));

        assert_eq!(outcome, Err("no"));
        assert_eq!(store.snapshot(), before);
    }
}
