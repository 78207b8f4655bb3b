use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt;

use quiz_core::model::{AnswerRecord, Question, QuestionId, Quiz, QuizId};

use crate::error::StartError;

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of an attempt held in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// Accepting answers and navigation.
    Active,
    /// A finish request is in flight; answers are frozen.
    Finishing,
    /// The server scored the attempt; only the result remains.
    Finished,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Finishing => "finishing",
            Self::Finished => "finished",
        })
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-progress attempt at one quiz.
///
/// Questions are fixed at start and never empty, so `current_index` always points at
/// a real question. Answers are write-once and only ever keyed by questions of this
/// quiz. Mutation is restricted to the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    quiz_id: QuizId,
    title: String,
    questions: Vec<Question>,
    current_index: usize,
    answers: HashMap<QuestionId, AnswerRecord>,
    pending: HashSet<QuestionId>,
    status: SessionStatus,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Install a fresh attempt positioned at the first question.
    ///
    /// # Errors
    ///
    /// Returns `StartError::EmptyQuiz` if the quiz has no questions.
    pub fn new(quiz: Quiz, started_at: DateTime<Utc>) -> Result<Self, StartError> {
        let (quiz_id, title, questions) = quiz.into_parts();
        if questions.is_empty() {
            return Err(StartError::EmptyQuiz(quiz_id));
        }

        Ok(Self {
            quiz_id,
            title,
            questions,
            current_index: 0,
            answers: HashMap::new(),
            pending: HashSet::new(),
            status: SessionStatus::Active,
            started_at,
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions in the attempt.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false` for a constructed session.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<QuestionId, AnswerRecord> {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, question_id: QuestionId) -> Option<&AnswerRecord> {
        self.answers.get(&question_id)
    }

    /// Whether a submission for this question is awaiting the server.
    #[must_use]
    pub fn is_pending(&self, question_id: QuestionId) -> bool {
        self.pending.contains(&question_id)
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_by_id(&self, question_id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == question_id)
    }

    #[must_use]
    pub fn index_of(&self, question_id: QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| q.id() == question_id)
    }

    /// Moves the pointer; out-of-range indices are ignored.
    pub(crate) fn set_current_index(&mut self, index: usize) {
        if index < self.questions.len() {
            self.current_index = index;
        }
    }

    pub(crate) fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    pub(crate) fn mark_pending(&mut self, question_id: QuestionId) -> bool {
        self.pending.insert(question_id)
    }

    pub(crate) fn clear_pending(&mut self, question_id: QuestionId) {
        self.pending.remove(&question_id);
    }

    /// Installs a record unless one exists or the question is foreign.
    pub(crate) fn insert_answer(&mut self, record: AnswerRecord) -> bool {
        if self.index_of(record.question_id).is_none()
            || self.answers.contains_key(&record.question_id)
        {
            return false;
        }
        self.answers.insert(record.question_id, record);
        true
    }
}
