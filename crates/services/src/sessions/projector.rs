use chrono::Duration;

use quiz_core::Clock;
use quiz_core::model::{AnswerRecord, Question, QuestionId};

use super::progress::SessionProgress;
use super::session::QuizSession;

/// How a question shows up in a navigation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionState {
    Current,
    Answered,
    Unanswered,
}

/// Read-only views derived from the current session.
///
/// Every query is defined without a session too, so the UI can render an empty
/// store without special-casing.
#[derive(Debug, Clone, Copy)]
pub struct ResultProjector<'a> {
    session: Option<&'a QuizSession>,
}

impl<'a> ResultProjector<'a> {
    #[must_use]
    pub fn new(session: Option<&'a QuizSession>) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&'a Question> {
        self.session.and_then(|s| s.question(s.current_index()))
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.session.map(QuizSession::current_index)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.session.map_or(0, QuizSession::len)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.session.map_or(0, |s| s.answers().len())
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.total_questions().saturating_sub(self.answered_count())
    }

    /// Whether the question at `index` has a recorded answer; `false` out of range.
    #[must_use]
    pub fn is_question_answered(&self, index: usize) -> bool {
        self.session
            .and_then(|s| s.question(index).map(|q| s.answer(q.id()).is_some()))
            .unwrap_or(false)
    }

    /// Finishing is allowed once at least one answer is recorded; unanswered
    /// questions are scored as incorrect by the server.
    #[must_use]
    pub fn can_finish(&self) -> bool {
        self.answered_count() > 0
    }

    /// Position of the pointer as a fraction in `(0, 1]`, `0.0` without a session.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_fraction(&self) -> f64 {
        match self.session {
            Some(s) if !s.is_empty() => (s.current_index() + 1) as f64 / s.len() as f64,
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn answer_for(&self, question_id: QuestionId) -> Option<&'a AnswerRecord> {
        self.session.and_then(|s| s.answer(question_id))
    }

    #[must_use]
    pub fn is_pending(&self, question_id: QuestionId) -> bool {
        self.session.is_some_and(|s| s.is_pending(question_id))
    }

    #[must_use]
    pub fn question_states(&self) -> Vec<QuestionState> {
        let Some(session) = self.session else {
            return Vec::new();
        };
        session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                if index == session.current_index() {
                    QuestionState::Current
                } else if session.answer(question.id()).is_some() {
                    QuestionState::Answered
                } else {
                    QuestionState::Unanswered
                }
            })
            .collect()
    }

    /// Time since the session was installed, never negative.
    #[must_use]
    pub fn elapsed(&self, clock: &Clock) -> Duration {
        self.session
            .map_or_else(Duration::zero, |s| clock.elapsed_since(s.started_at()))
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.answered_count(),
            remaining: self.unanswered_count(),
            position: self.current_index().map_or(0, |i| i + 1),
            is_complete: self.total_questions() > 0 && self.unanswered_count() == 0,
        }
    }
}
