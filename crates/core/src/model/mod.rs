mod answer;
mod ids;
mod quiz;
mod result;

pub use answer::{AnswerOutcome, AnswerRecord};
pub use ids::{OptionId, ParseIdError, QuestionId, QuizId, ResultId};
pub use quiz::{Question, Quiz, QuizError, QuizOption, QuizSummary};
pub use result::{QuizRef, QuizResult, QuizResultError, QuizResultRecord, ScoreBand};
