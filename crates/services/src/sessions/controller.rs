use std::sync::Arc;

use quiz_api::{ApiError, QuizApi};
use quiz_core::model::{AnswerOutcome, AnswerRecord, OptionId, QuestionId, QuizId, QuizResult};

use crate::Clock;
use crate::error::{FinishError, Missing, NavigationError, StartError, StateConflict, SubmitError};

use super::reducer::SessionEvent;
use super::session::{QuizSession, SessionStatus};
use super::store::{SessionStore, StoreState};

/// The only writer of the session store.
///
/// Every operation checks its preconditions and records its request under the store
/// lock before any network call, then applies the completion only if the store is
/// still on the generation the request was issued against.
#[derive(Clone)]
pub struct SessionController {
    clock: Clock,
    api: Arc<dyn QuizApi>,
    store: SessionStore,
}

impl SessionController {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn QuizApi>, store: SessionStore) -> Self {
        Self { clock, api, store }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.store.snapshot()
    }

    //
    // ─── LIFECYCLE ─────────────────────────────────────────────────────────────
    //

    /// Fetch the quiz and install a fresh session at question 0.
    ///
    /// # Errors
    ///
    /// - `SessionAlreadyActive` if a session exists or another start is in flight.
    /// - `QuizNotFound` / `QuizUnpublished` from the server, `EmptyQuiz` if it has no
    ///   questions, `Network` for anything else the server or transport reports.
    /// - `InvalidState` if the store was reset while the request was in flight.
    pub async fn start_session(&self, quiz_id: QuizId) -> Result<QuizSession, StartError> {
        let generation = self.store.transition(|state| {
            if state.session.is_some() || state.starting.is_some() {
                return Err(StartError::SessionAlreadyActive);
            }
            Ok(SessionEvent::StartRequested { quiz_id })
        })?;
        tracing::debug!(%quiz_id, generation, "starting quiz session");

        let started = match self.api.start_quiz(quiz_id).await {
            Ok(quiz) => QuizSession::new(quiz, self.clock.now()),
            Err(err) => Err(start_error(quiz_id, err)),
        };
        let session = match started {
            Ok(session) => session,
            Err(err) => {
                self.store
                    .dispatch(SessionEvent::StartFailed { generation });
                tracing::warn!(%quiz_id, error = %err, "quiz session failed to start");
                return Err(err);
            }
        };

        let installed = session.clone();
        self.store.transition(|state| {
            if !state.is_current(generation) {
                tracing::debug!(%quiz_id, generation, "discarding stale start");
                return Err(StartError::InvalidState(StateConflict::Discarded));
            }
            Ok(SessionEvent::Started {
                generation,
                session: installed,
            })
        })?;
        tracing::info!(
            %quiz_id,
            questions = session.len(),
            "quiz session started"
        );
        Ok(session)
    }

    /// Submit the chosen option for a question of the active session.
    ///
    /// # Errors
    ///
    /// Checked before the request: `InvalidState` without an active session,
    /// `NotFound` for foreign question or option ids, `AlreadyAnswered` if a record
    /// exists, `AnswerPending` if the same question is still in flight.
    /// From the server: 409 `AlreadyAnswered`, 404 `NotFound`, anything else
    /// `Network`. `InvalidState` if the session was discarded meanwhile.
    ///
    /// A 409 carries no verdict, so no local record is installed: a retry of a
    /// request the server already committed leaves the question unanswered here
    /// while the server grades the first submission at finish.
    pub async fn submit_answer(
        &self,
        question_id: QuestionId,
        option_id: OptionId,
    ) -> Result<AnswerOutcome, SubmitError> {
        let generation = self.store.transition(|state| {
            let session = active_session(state).map_err(SubmitError::InvalidState)?;
            let question = session
                .question_by_id(question_id)
                .ok_or(SubmitError::NotFound(Missing::Question(question_id)))?;
            if !question.has_option(option_id) {
                return Err(SubmitError::NotFound(Missing::Option {
                    question: question_id,
                    option: option_id,
                }));
            }
            if session.answer(question_id).is_some() {
                return Err(SubmitError::AlreadyAnswered(question_id));
            }
            if session.is_pending(question_id) {
                return Err(SubmitError::AnswerPending(question_id));
            }
            Ok(SessionEvent::AnswerRequested { question_id })
        })?;

        match self.api.submit_answer(question_id, option_id).await {
            Ok(outcome) => {
                let record = AnswerRecord::from_outcome(question_id, option_id, outcome);
                self.store.transition(|state| {
                    if !state.is_current(generation) {
                        tracing::debug!(%question_id, generation, "discarding stale answer");
                        return Err(SubmitError::InvalidState(StateConflict::Discarded));
                    }
                    Ok(SessionEvent::AnswerRecorded { generation, record })
                })?;
                tracing::debug!(%question_id, is_correct = outcome.is_correct, "answer recorded");
                Ok(outcome)
            }
            Err(err) => {
                self.store.transition(|state| {
                    if !state.is_current(generation) {
                        return Err(SubmitError::InvalidState(StateConflict::Discarded));
                    }
                    Ok(SessionEvent::AnswerFailed {
                        generation,
                        question_id,
                    })
                })?;
                tracing::warn!(%question_id, error = %err, "answer submission failed");
                Err(submit_error(question_id, err))
            }
        }
    }

    /// Ask the server to score the attempt and replace the session with the result.
    ///
    /// # Errors
    ///
    /// Checked before the request: `InvalidState` unless the session is active (a
    /// second concurrent call sees `Finishing`), `QuizMismatch` for another quiz id,
    /// `InsufficientAnswers` while nothing is answered.
    /// On server failure the session goes back to active and `QuizNotFound` (404) or
    /// `Network` is returned. `InvalidState` if the session was discarded meanwhile.
    pub async fn finish_session(&self, quiz_id: QuizId) -> Result<QuizResult, FinishError> {
        let generation = self.store.transition(|state| {
            let session = active_session(state).map_err(FinishError::InvalidState)?;
            if session.quiz_id() != quiz_id {
                return Err(FinishError::QuizMismatch {
                    expected: session.quiz_id(),
                    actual: quiz_id,
                });
            }
            if !state.projector().can_finish() {
                return Err(FinishError::InsufficientAnswers);
            }
            Ok(SessionEvent::FinishRequested)
        })?;
        tracing::debug!(%quiz_id, generation, "finishing quiz session");

        match self.api.finish_quiz(quiz_id).await {
            Ok(result) => {
                let finished = result.clone();
                self.store.transition(|state| {
                    if !state.is_current(generation) {
                        tracing::debug!(%quiz_id, generation, "discarding stale result");
                        return Err(FinishError::InvalidState(StateConflict::Discarded));
                    }
                    Ok(SessionEvent::Finished {
                        generation,
                        result: finished,
                    })
                })?;
                tracing::info!(
                    %quiz_id,
                    score = result.score(),
                    correct = result.correct_answers(),
                    total = result.total_questions(),
                    "quiz session finished"
                );
                Ok(result)
            }
            Err(err) => {
                self.store.transition(|state| {
                    if !state.is_current(generation) {
                        return Err(FinishError::InvalidState(StateConflict::Discarded));
                    }
                    Ok(SessionEvent::FinishFailed { generation })
                })?;
                tracing::warn!(%quiz_id, error = %err, "quiz session failed to finish");
                Err(finish_error(quiz_id, err))
            }
        }
    }

    /// Abandon the current attempt, any pending start and the last result.
    pub fn reset_session(&self) {
        let before = self.store.generation();
        let after = self.store.dispatch(SessionEvent::Reset);
        if after != before {
            tracing::info!(generation = after, "quiz session reset");
        }
    }

    /// Close the result screen.
    pub fn dismiss_result(&self) {
        self.store.dispatch(SessionEvent::ResultDismissed);
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `IndexOutOfRange` past the last question and `InvalidState` without a
    /// session.
    pub fn go_to_question(&self, index: usize) -> Result<(), NavigationError> {
        self.store
            .transition(|state| {
                let session = state
                    .session()
                    .ok_or(NavigationError::InvalidState(StateConflict::NoSession))?;
                if index >= session.len() {
                    return Err(NavigationError::IndexOutOfRange {
                        index,
                        len: session.len(),
                    });
                }
                Ok(SessionEvent::Navigated { index })
            })
            .map(|_| ())
    }

    /// Step forward; returns whether the pointer moved.
    pub fn next_question(&self) -> bool {
        self.step(|index, len| (index + 1 < len).then_some(index + 1))
    }

    /// Step back; returns whether the pointer moved.
    pub fn previous_question(&self) -> bool {
        self.step(|index, _| index.checked_sub(1))
    }

    fn step(&self, target: impl FnOnce(usize, usize) -> Option<usize>) -> bool {
        self.store
            .transition(|state| -> Result<SessionEvent, ()> {
                let session = state.session().ok_or(())?;
                let index = target(session.current_index(), session.len()).ok_or(())?;
                Ok(SessionEvent::Navigated { index })
            })
            .is_ok()
    }
}

fn active_session(state: &StoreState) -> Result<&QuizSession, StateConflict> {
    let session = state.session().ok_or(StateConflict::NoSession)?;
    match session.status() {
        SessionStatus::Active => Ok(session),
        other => Err(StateConflict::NotActive(other)),
    }
}

fn start_error(quiz_id: QuizId, err: ApiError) -> StartError {
    match err {
        ApiError::NotFound(_) => StartError::QuizNotFound(quiz_id),
        ApiError::Forbidden(_) => StartError::QuizUnpublished(quiz_id),
        other => StartError::Network(other),
    }
}

fn submit_error(question_id: QuestionId, err: ApiError) -> SubmitError {
    match err {
        ApiError::Conflict(_) => SubmitError::AlreadyAnswered(question_id),
        ApiError::NotFound(message) => SubmitError::NotFound(Missing::Remote(message)),
        other => SubmitError::Network(other),
    }
}

fn finish_error(quiz_id: QuizId, err: ApiError) -> FinishError {
    match err {
        ApiError::NotFound(_) => FinishError::QuizNotFound(quiz_id),
        other => FinishError::Network(other),
    }
}
