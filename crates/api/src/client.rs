use async_trait::async_trait;

use quiz_core::model::{
    AnswerOutcome, OptionId, QuestionId, Quiz, QuizId, QuizResult, QuizResultRecord, QuizSummary,
};

use crate::error::ApiError;

/// Contract of the quiz backend as seen by the client.
///
/// Implementations must report correctness only through `AnswerOutcome`;
/// quizzes handed out by `start_quiz` carry no answer key.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Published quizzes available to the current user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn list_public_quizzes(&self) -> Result<Vec<QuizSummary>, ApiError>;

    /// Open an attempt and fetch its question set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown quizzes, `ApiError::Forbidden` for
    /// unpublished ones, or other transport errors.
    async fn start_quiz(&self, quiz_id: QuizId) -> Result<Quiz, ApiError>;

    /// Submit the selected option for a question.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Conflict` if the question was already answered,
    /// `ApiError::NotFound` for unknown question/option ids, or transport errors.
    async fn submit_answer(
        &self,
        question_id: QuestionId,
        option_id: OptionId,
    ) -> Result<AnswerOutcome, ApiError>;

    /// Close the attempt and obtain the scored result.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` when no attempt is open, or transport errors.
    async fn finish_quiz(&self, quiz_id: QuizId) -> Result<QuizResult, ApiError>;

    /// Past results of the current user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn list_results(&self) -> Result<Vec<QuizResultRecord>, ApiError>;
}
