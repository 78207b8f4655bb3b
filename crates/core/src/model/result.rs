use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::model::ids::{QuizId, ResultId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("finished_at is before started_at")]
    InvalidTimeRange,

    #[error("score {0} is outside 0..=100")]
    ScoreOutOfRange(u32),

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { correct: u32, total: u32 },
}

/// Coarse grading used by result listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScoreBand {
    NeedsWork,
    Good,
    Excellent,
}

impl ScoreBand {
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            _ => Self::NeedsWork,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::NeedsWork => "Needs Work",
        }
    }
}

/// Scored outcome of a finished attempt, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    score: u32,
    correct_answers: u32,
    total_questions: u32,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl QuizResult {
    /// # Errors
    ///
    /// Returns `QuizResultError` if the score, counts or timestamps are inconsistent.
    pub fn new(
        score: u32,
        correct_answers: u32,
        total_questions: u32,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Result<Self, QuizResultError> {
        if finished_at < started_at {
            return Err(QuizResultError::InvalidTimeRange);
        }
        if score > 100 {
            return Err(QuizResultError::ScoreOutOfRange(score));
        }
        if correct_answers > total_questions {
            return Err(QuizResultError::CountMismatch {
                correct: correct_answers,
                total: total_questions,
            });
        }

        Ok(Self {
            score,
            correct_answers,
            total_questions,
            started_at,
            finished_at,
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }

    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }
}

/// Quiz identity attached to a historical result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRef {
    pub id: QuizId,
    pub title: String,
}

/// One entry of the current user's result history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResultRecord {
    pub id: ResultId,
    pub quiz: QuizRef,
    pub result: QuizResult,
}
