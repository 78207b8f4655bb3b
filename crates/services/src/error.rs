//! Shared error types for the services crate.

use std::fmt;

use thiserror::Error;

use quiz_api::ApiError;
use quiz_core::model::{OptionId, QuestionId, QuizId};

use crate::sessions::SessionStatus;

/// Coarse error category the UI branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SessionAlreadyActive,
    QuizNotFound,
    QuizUnpublished,
    EmptyQuiz,
    AlreadyAnswered,
    AnswerPending,
    IndexOutOfRange,
    InvalidState,
    QuizMismatch,
    InsufficientAnswers,
    NetworkError,
    NotFound,
}

/// Why an operation was not legal in the current store state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateConflict {
    /// No session is installed.
    NoSession,
    /// A session exists but is not in the status the operation needs.
    NotActive(SessionStatus),
    /// The session the call was issued against was reset or replaced meanwhile.
    Discarded,
}

impl fmt::Display for StateConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSession => f.write_str("no active session"),
            Self::NotActive(status) => write!(f, "session is {status}"),
            Self::Discarded => f.write_str("session was discarded while the request was in flight"),
        }
    }
}

/// What could not be found when submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Question(QuestionId),
    Option {
        question: QuestionId,
        option: OptionId,
    },
    /// The server reported a 404 with this message.
    Remote(String),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question(id) => write!(f, "question {id} is not part of the session"),
            Self::Option { question, option } => {
                write!(f, "option {option} does not belong to question {question}")
            }
            Self::Remote(message) => f.write_str(message),
        }
    }
}

/// Errors emitted by `SessionController::start_session`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartError {
    #[error("a quiz session is already active")]
    SessionAlreadyActive,
    #[error("quiz {0} not found")]
    QuizNotFound(QuizId),
    #[error("quiz {0} is not published")]
    QuizUnpublished(QuizId),
    #[error("quiz {0} has no questions")]
    EmptyQuiz(QuizId),
    #[error("invalid session state: {0}")]
    InvalidState(StateConflict),
    #[error("could not start quiz")]
    Network(#[source] ApiError),
}

impl StartError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SessionAlreadyActive => ErrorKind::SessionAlreadyActive,
            Self::QuizNotFound(_) => ErrorKind::QuizNotFound,
            Self::QuizUnpublished(_) => ErrorKind::QuizUnpublished,
            Self::EmptyQuiz(_) => ErrorKind::EmptyQuiz,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::Network(_) => ErrorKind::NetworkError,
        }
    }
}

/// Errors emitted by `SessionController::submit_answer`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("invalid session state: {0}")]
    InvalidState(StateConflict),
    #[error("{0}")]
    NotFound(Missing),
    #[error("question {0} was already answered")]
    AlreadyAnswered(QuestionId),
    #[error("an answer for question {0} is already being submitted")]
    AnswerPending(QuestionId),
    #[error("could not submit answer")]
    Network(#[source] ApiError),
}

impl SubmitError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyAnswered(_) => ErrorKind::AlreadyAnswered,
            Self::AnswerPending(_) => ErrorKind::AnswerPending,
            Self::Network(_) => ErrorKind::NetworkError,
        }
    }
}

/// Errors emitted by `SessionController::go_to_question`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("question index {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid session state: {0}")]
    InvalidState(StateConflict),
}

impl NavigationError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::InvalidState(_) => ErrorKind::InvalidState,
        }
    }
}

/// Errors emitted by `SessionController::finish_session`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FinishError {
    #[error("invalid session state: {0}")]
    InvalidState(StateConflict),
    #[error("session belongs to quiz {expected}, not {actual}")]
    QuizMismatch { expected: QuizId, actual: QuizId },
    #[error("answer at least one question before finishing")]
    InsufficientAnswers,
    #[error("quiz {0} not found")]
    QuizNotFound(QuizId),
    #[error("could not finish quiz")]
    Network(#[source] ApiError),
}

impl FinishError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::QuizMismatch { .. } => ErrorKind::QuizMismatch,
            Self::InsufficientAnswers => ErrorKind::InsufficientAnswers,
            Self::QuizNotFound(_) => ErrorKind::QuizNotFound,
            Self::Network(_) => ErrorKind::NetworkError,
        }
    }
}

/// Errors emitted by `ResultsService` and `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultsError {
    #[error("could not load from the quiz service")]
    Network(#[from] ApiError),
}

impl ResultsError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::NetworkError,
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Api(#[from] ApiError),
}
