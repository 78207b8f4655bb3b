use chrono::{DateTime, Utc};

use crate::model::ids::{OptionId, QuestionId};

/// Server verdict for one submitted answer.
///
/// `is_correct` is only ever produced by the backend; the client has no answer key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub submitted_at: DateTime<Utc>,
}

/// Write-once record of how a question was answered in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub selected_option_id: OptionId,
    pub is_correct: bool,
    pub submitted_at: DateTime<Utc>,
}

impl AnswerRecord {
    #[must_use]
    pub fn from_outcome(
        question_id: QuestionId,
        selected_option_id: OptionId,
        outcome: AnswerOutcome,
    ) -> Self {
        Self {
            question_id,
            selected_option_id,
            is_correct: outcome.is_correct,
            submitted_at: outcome.submitted_at,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> AnswerOutcome {
        AnswerOutcome {
            is_correct: self.is_correct,
            submitted_at: self.submitted_at,
        }
    }
}
