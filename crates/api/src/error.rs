use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by quiz backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Domain(#[from] quiz_core::Error),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    /// Map a non-success status and the server's message to an error.
    #[must_use]
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_owned()
        });
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            status => Self::Status { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_statuses() {
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, Some("Quiz not found".into())),
            ApiError::NotFound(msg) if msg == "Quiz not found"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, None),
            ApiError::Forbidden(msg) if msg == "Forbidden"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, None),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, None),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, None),
            ApiError::Status { status, .. } if status == StatusCode::BAD_GATEWAY
        ));
    }
}
