use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use quiz_core::Clock;
use quiz_core::model::{
    AnswerOutcome, OptionId, QuestionId, Quiz, QuizId, QuizRef, QuizResult, QuizResultRecord,
    QuizSummary, ResultId,
};

use crate::client::QuizApi;
use crate::error::ApiError;

/// Seed data for one quiz served by `InMemoryQuizApi`, answer key included.
#[derive(Debug, Clone)]
pub struct QuizFixture {
    quiz: Quiz,
    description: Option<String>,
    category: Option<String>,
    published: bool,
    answer_key: HashMap<QuestionId, OptionId>,
}

impl QuizFixture {
    #[must_use]
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            description: None,
            category: None,
            published: true,
            answer_key: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_correct(mut self, question: QuestionId, option: OptionId) -> Self {
        self.answer_key.insert(question, option);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn unpublished(mut self) -> Self {
        self.published = false;
        self
    }

    fn summary(&self) -> QuizSummary {
        QuizSummary {
            id: self.quiz.id(),
            title: self.quiz.title().to_owned(),
            description: self.description.clone(),
            category: self.category.clone(),
            question_count: u32::try_from(self.quiz.questions().len()).unwrap_or(u32::MAX),
        }
    }
}

struct Attempt {
    quiz_id: QuizId,
    started_at: chrono::DateTime<chrono::Utc>,
    graded: HashMap<QuestionId, bool>,
}

struct Backend {
    clock: Clock,
    quizzes: Vec<QuizFixture>,
    attempt: Option<Attempt>,
    results: Vec<QuizResultRecord>,
    next_result_id: u64,
    failures_pending: u32,
}

/// Single-user, in-process stand-in for the quiz backend.
///
/// Grades answers against its own answer key and scores unanswered questions as
/// incorrect, the way the real service does.
#[derive(Clone)]
pub struct InMemoryQuizApi {
    backend: Arc<Mutex<Backend>>,
}

impl InMemoryQuizApi {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            backend: Arc::new(Mutex::new(Backend {
                clock,
                quizzes: Vec::new(),
                attempt: None,
                results: Vec::new(),
                next_result_id: 1,
                failures_pending: 0,
            })),
        }
    }

    /// Add or replace a quiz.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the backend lock is poisoned.
    pub fn insert_quiz(&self, fixture: QuizFixture) -> Result<(), ApiError> {
        let mut backend = self.lock()?;
        let id = fixture.quiz.id();
        match backend.quizzes.iter_mut().find(|f| f.quiz.id() == id) {
            Some(existing) => *existing = fixture,
            None => backend.quizzes.push(fixture),
        }
        Ok(())
    }

    /// Make the next `count` calls fail as if the network dropped.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the backend lock is poisoned.
    pub fn fail_next(&self, count: u32) -> Result<(), ApiError> {
        self.lock()?.failures_pending = count;
        Ok(())
    }

    /// Move the backend's fixed clock forward.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the backend lock is poisoned.
    pub fn advance_clock(&self, delta: Duration) -> Result<(), ApiError> {
        self.lock()?.clock.advance(delta);
        Ok(())
    }

    /// Number of results recorded so far.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the backend lock is poisoned.
    pub fn result_count(&self) -> Result<usize, ApiError> {
        Ok(self.lock()?.results.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Backend>, ApiError> {
        self.backend
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))
    }

    /// Lock the backend for one request, consuming an injected failure if any.
    fn begin(&self) -> Result<MutexGuard<'_, Backend>, ApiError> {
        let mut backend = self.lock()?;
        if backend.failures_pending > 0 {
            backend.failures_pending -= 1;
            return Err(ApiError::Unavailable("injected failure".into()));
        }
        Ok(backend)
    }
}

impl Backend {
    fn fixture(&self, id: QuizId) -> Result<&QuizFixture, ApiError> {
        self.quizzes
            .iter()
            .find(|f| f.quiz.id() == id)
            .ok_or_else(|| ApiError::NotFound("Quiz not found".into()))
    }
}

#[async_trait]
impl QuizApi for InMemoryQuizApi {
    async fn list_public_quizzes(&self) -> Result<Vec<QuizSummary>, ApiError> {
        let backend = self.begin()?;
        Ok(backend
            .quizzes
            .iter()
            .filter(|f| f.published)
            .map(QuizFixture::summary)
            .collect())
    }

    async fn start_quiz(&self, quiz_id: QuizId) -> Result<Quiz, ApiError> {
        let mut backend = self.begin()?;
        let fixture = backend.fixture(quiz_id)?;
        if !fixture.published {
            return Err(ApiError::Forbidden("Quiz is not published".into()));
        }
        let quiz = fixture.quiz.clone();
        let started_at = backend.clock.now();
        backend.attempt = Some(Attempt {
            quiz_id,
            started_at,
            graded: HashMap::new(),
        });
        Ok(quiz)
    }

    async fn submit_answer(
        &self,
        question_id: QuestionId,
        option_id: OptionId,
    ) -> Result<AnswerOutcome, ApiError> {
        let mut backend = self.begin()?;
        let submitted_at = backend.clock.now();
        let quiz_id = backend
            .attempt
            .as_ref()
            .map(|a| a.quiz_id)
            .ok_or_else(|| ApiError::NotFound("No active attempt".into()))?;
        let fixture = backend.fixture(quiz_id)?;
        let question = fixture
            .quiz
            .questions()
            .iter()
            .find(|q| q.id() == question_id)
            .ok_or_else(|| ApiError::NotFound("Question not found".into()))?;
        if !question.has_option(option_id) {
            return Err(ApiError::NotFound("Option not found".into()));
        }
        let is_correct = fixture.answer_key.get(&question_id) == Some(&option_id);

        let attempt = backend
            .attempt
            .as_mut()
            .ok_or_else(|| ApiError::NotFound("No active attempt".into()))?;
        if attempt.graded.contains_key(&question_id) {
            return Err(ApiError::Conflict("Question already answered".into()));
        }
        attempt.graded.insert(question_id, is_correct);

        Ok(AnswerOutcome {
            is_correct,
            submitted_at,
        })
    }

    async fn finish_quiz(&self, quiz_id: QuizId) -> Result<QuizResult, ApiError> {
        let mut backend = self.begin()?;
        let finished_at = backend.clock.now();
        let open = backend.attempt.take();
        let attempt = match open {
            Some(attempt) if attempt.quiz_id == quiz_id => attempt,
            other => {
                backend.attempt = other;
                return Err(ApiError::NotFound("No active attempt for quiz".into()));
            }
        };
        let fixture = backend.fixture(quiz_id)?;
        let title = fixture.quiz.title().to_owned();
        let total = u32::try_from(fixture.quiz.questions().len()).unwrap_or(u32::MAX);
        let correct = u32::try_from(attempt.graded.values().filter(|ok| **ok).count())
            .unwrap_or(u32::MAX);
        let score = if total == 0 {
            0
        } else {
            (correct * 200 + total) / (total * 2)
        };

        let result = QuizResult::new(score, correct, total, attempt.started_at, finished_at)
            .map_err(quiz_core::Error::from)?;
        let id = ResultId::new(backend.next_result_id);
        backend.next_result_id += 1;
        backend.results.push(QuizResultRecord {
            id,
            quiz: QuizRef { id: quiz_id, title },
            result: result.clone(),
        });
        Ok(result)
    }

    async fn list_results(&self) -> Result<Vec<QuizResultRecord>, ApiError> {
        let backend = self.begin()?;
        Ok(backend.results.iter().rev().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuizOption};
    use quiz_core::time::{fixed_clock, fixed_now};

    fn fixture() -> QuizFixture {
        let questions = (1..=3)
            .map(|n| {
                Question::new(
                    QuestionId::new(n),
                    format!("Q{n}"),
                    vec![
                        QuizOption::new(OptionId::new(n * 10), "right"),
                        QuizOption::new(OptionId::new(n * 10 + 1), "wrong"),
                    ],
                )
                .unwrap()
            })
            .collect();
        let quiz = Quiz::new(QuizId::new(1), "Fixture", questions).unwrap();
        (1..=3).fold(QuizFixture::new(quiz), |f, n| {
            f.with_correct(QuestionId::new(n), OptionId::new(n * 10))
        })
    }

    #[tokio::test]
    async fn grades_and_scores_unanswered_as_incorrect() {
        let api = InMemoryQuizApi::new(fixed_clock());
        api.insert_quiz(fixture()).unwrap();

        api.start_quiz(QuizId::new(1)).await.unwrap();
        let right = api
            .submit_answer(QuestionId::new(1), OptionId::new(10))
            .await
            .unwrap();
        let wrong = api
            .submit_answer(QuestionId::new(2), OptionId::new(21))
            .await
            .unwrap();
        assert!(right.is_correct);
        assert!(!wrong.is_correct);

        api.advance_clock(Duration::minutes(2)).unwrap();
        let result = api.finish_quiz(QuizId::new(1)).await.unwrap();
        assert_eq!(result.correct_answers(), 1);
        assert_eq!(result.total_questions(), 3);
        assert_eq!(result.score(), 33);
        assert_eq!(result.finished_at(), fixed_now() + Duration::minutes(2));
        assert_eq!(api.result_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn rejects_second_answer_and_unknown_ids() {
        let api = InMemoryQuizApi::new(fixed_clock());
        api.insert_quiz(fixture()).unwrap();
        api.start_quiz(QuizId::new(1)).await.unwrap();

        api.submit_answer(QuestionId::new(1), OptionId::new(10))
            .await
            .unwrap();
        assert!(matches!(
            api.submit_answer(QuestionId::new(1), OptionId::new(11)).await,
            Err(ApiError::Conflict(_))
        ));
        assert!(matches!(
            api.submit_answer(QuestionId::new(9), OptionId::new(10)).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            api.start_quiz(QuizId::new(99)).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unpublished_quizzes_are_hidden_and_forbidden() {
        let api = InMemoryQuizApi::new(fixed_clock());
        api.insert_quiz(fixture().unpublished()).unwrap();

        assert!(api.list_public_quizzes().await.unwrap().is_empty());
        assert!(matches!(
            api.start_quiz(QuizId::new(1)).await,
            Err(ApiError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let api = InMemoryQuizApi::new(fixed_clock());
        api.insert_quiz(fixture()).unwrap();
        api.fail_next(1).unwrap();

        assert!(matches!(
            api.list_public_quizzes().await,
            Err(ApiError::Unavailable(_))
        ));
        assert_eq!(api.list_public_quizzes().await.unwrap().len(), 1);
    }
}
