//! JSON shapes exchanged with the quiz backend and their domain conversions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    AnswerOutcome, OptionId, Question, QuestionId, Quiz, QuizId, QuizOption, QuizRef,
    QuizResult, QuizResultRecord, QuizSummary, ResultId,
};

use crate::error::ApiError;

/// Every response body is wrapped as `{ success, message, data }`.
///
/// A missing `success` counts as success; `data` may be absent when it is false.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default = "succeeded")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

fn succeeded() -> bool {
    true
}

/// Error bodies only need the human-readable message.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

//
// ─── REQUESTS ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub(crate) struct AnswerRequest {
    pub option_id: OptionId,
}

//
// ─── RESPONSES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct StartQuizData {
    pub quiz: QuizDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizDto {
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionDto {
    pub id: QuestionId,
    pub text: String,
    #[serde(default)]
    pub options: Vec<OptionDto>,
}

/// Any extra option fields the server sends (e.g. for admins) are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct OptionDto {
    pub id: OptionId,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerData {
    pub is_correct: bool,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultData {
    pub score: f64,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultRecordDto {
    pub id: ResultId,
    pub quiz: QuizRefDto,
    #[serde(flatten)]
    pub result: ResultData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizRefDto {
    pub id: QuizId,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizSummaryDto {
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryDto>,
    #[serde(default, rename = "_count")]
    pub count: Option<CountDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryDto {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountDto {
    #[serde(default)]
    pub questions: u32,
}

//
// ─── CONVERSIONS ──────────────────────────────────────────────────────────────
//

impl TryFrom<QuizDto> for Quiz {
    type Error = ApiError;

    fn try_from(dto: QuizDto) -> Result<Self, Self::Error> {
        let questions = dto
            .questions
            .into_iter()
            .map(|q| {
                let options = q
                    .options
                    .into_iter()
                    .map(|o| QuizOption::new(o.id, o.text))
                    .collect();
                Question::new(q.id, q.text, options)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(quiz_core::Error::from)?;

        Ok(Quiz::new(dto.id, dto.title, questions).map_err(quiz_core::Error::from)?)
    }
}

impl From<AnswerData> for AnswerOutcome {
    fn from(data: AnswerData) -> Self {
        Self {
            is_correct: data.is_correct,
            submitted_at: data.submitted_at,
        }
    }
}

impl TryFrom<ResultData> for QuizResult {
    type Error = ApiError;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn try_from(data: ResultData) -> Result<Self, Self::Error> {
        if !data.score.is_finite() || !(0.0..=100.0).contains(&data.score) {
            return Err(ApiError::InvalidPayload(format!(
                "score {} is outside 0..=100",
                data.score
            )));
        }
        // Range checked above, so the rounded value fits.
        let score = data.score.round() as u32;

        Ok(QuizResult::new(
            score,
            data.correct_answers,
            data.total_questions,
            data.started_at,
            data.finished_at,
        )
        .map_err(quiz_core::Error::from)?)
    }
}

impl TryFrom<ResultRecordDto> for QuizResultRecord {
    type Error = ApiError;

    fn try_from(dto: ResultRecordDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: dto.id,
            quiz: QuizRef {
                id: dto.quiz.id,
                title: dto.quiz.title,
            },
            result: dto.result.try_into()?,
        })
    }
}

impl From<QuizSummaryDto> for QuizSummary {
    fn from(dto: QuizSummaryDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            description: dto.description.filter(|d| !d.trim().is_empty()),
            category: dto.category.map(|c| c.name),
            question_count: dto.count.map_or(0, |c| c.questions),
        }
    }
}
