use thiserror::Error;

use crate::model::{QuizError, QuizResultError};

/// Any domain validation failure raised by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Result(#[from] QuizResultError),
}
