//! Pure state transitions for the session store.
//!
//! Every change to `StoreState` is expressed as a `SessionEvent` and applied here.
//! `apply` is total: events that are illegal for the current state, or completions
//! tagged with a generation that is no longer current, leave the state unchanged.

use quiz_core::model::{AnswerRecord, QuestionId, QuizId, QuizResult};

use super::session::{QuizSession, SessionStatus};
use super::store::StoreState;

/// Tagged transition request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A start request for `quiz_id` was sent; opens a new generation.
    StartRequested { quiz_id: QuizId },
    StartFailed { generation: u64 },
    Started { generation: u64, session: QuizSession },
    Navigated { index: usize },
    AnswerRequested { question_id: QuestionId },
    AnswerRecorded { generation: u64, record: AnswerRecord },
    AnswerFailed { generation: u64, question_id: QuestionId },
    FinishRequested,
    FinishFailed { generation: u64 },
    /// The server scored the attempt; closes the generation.
    Finished { generation: u64, result: QuizResult },
    ResultDismissed,
    Reset,
}

#[must_use]
pub fn apply(mut state: StoreState, event: SessionEvent) -> StoreState {
    match event {
        SessionEvent::StartRequested { quiz_id } => {
            if state.session.is_none() && state.starting.is_none() {
                state.starting = Some(quiz_id);
                state.generation += 1;
            }
        }
        SessionEvent::StartFailed { generation } => {
            if state.is_current(generation) {
                state.starting = None;
            }
        }
        SessionEvent::Started {
            generation,
            session,
        } => {
            if state.is_current(generation)
                && state.starting.is_some()
                && state.session.is_none()
            {
                state.starting = None;
                state.last_result = None;
                state.session = Some(session);
            }
        }
        SessionEvent::Navigated { index } => {
            if let Some(session) = state.session.as_mut() {
                session.set_current_index(index);
            }
        }
        SessionEvent::AnswerRequested { question_id } => {
            if let Some(session) = active_mut(&mut state) {
                session.mark_pending(question_id);
            }
        }
        SessionEvent::AnswerRecorded { generation, record } => {
            if state.is_current(generation)
                && let Some(session) = state.session.as_mut()
            {
                session.clear_pending(record.question_id);
                session.insert_answer(record);
            }
        }
        SessionEvent::AnswerFailed {
            generation,
            question_id,
        } => {
            if state.is_current(generation)
                && let Some(session) = state.session.as_mut()
            {
                session.clear_pending(question_id);
            }
        }
        SessionEvent::FinishRequested => {
            if let Some(session) = active_mut(&mut state) {
                session.set_status(SessionStatus::Finishing);
            }
        }
        SessionEvent::FinishFailed { generation } => {
            if state.is_current(generation)
                && let Some(session) = state.session.as_mut()
                && session.status() == SessionStatus::Finishing
            {
                session.set_status(SessionStatus::Active);
            }
        }
        SessionEvent::Finished { generation, result } => {
            let finishing = state
                .session
                .as_ref()
                .is_some_and(|s| s.status() == SessionStatus::Finishing);
            if state.is_current(generation) && finishing {
                state.session = None;
                state.last_result = Some(result);
                state.generation += 1;
            }
        }
        SessionEvent::ResultDismissed => {
            state.last_result = None;
        }
        SessionEvent::Reset => {
            if state.session.is_some() || state.starting.is_some() {
                state.generation += 1;
            }
            state.session = None;
            state.starting = None;
            state.last_result = None;
        }
    }
    state
}

fn active_mut(state: &mut StoreState) -> Option<&mut QuizSession> {
    state
        .session
        .as_mut()
        .filter(|s| s.status() == SessionStatus::Active)
}
