// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Failures of the quiz core (catalog lookup, scoring, attempt recording).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The requested quiz identifier does not resolve in the catalog.
    QuizNotFound(String),

    /// A quiz without questions reached the scoring engine.
    InvalidQuiz(String),

    /// The attempt recorder was handed a quiz identifier it cannot resolve.
    MissingQuiz(String),
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::QuizNotFound(id) => write!(f, "Quiz '{}' not found", id),
            QuizError::InvalidQuiz(id) => write!(f, "Quiz '{}' has no questions", id),
            QuizError::MissingQuiz(id) => write!(f, "Cannot record attempt for unknown quiz '{}'", id),
        }
    }
}

impl std::error::Error for QuizError {}

/// Rejected questionnaire-session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The operation is not allowed in the session's current state.
    InvalidState { expected: &'static str, actual: &'static str },

    /// The question ID does not belong to the session's quiz.
    UnknownQuestion(String),

    /// The selected option does not index into the question's options.
    OptionOutOfRange { question_id: String, option: usize, options: usize },

    /// Cursor target outside `[0, total_questions)`.
    CursorOutOfRange { index: usize, total: usize },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidState { expected, actual } => {
                write!(f, "Session is {} (expected {})", actual, expected)
            }
            SessionError::UnknownQuestion(id) => write!(f, "Unknown question '{}'", id),
            SessionError::OptionOutOfRange {
                question_id,
                option,
                options,
            } => write!(
                f,
                "Option {} is out of range for question '{}' ({} options)",
                option, question_id, options
            ),
            SessionError::CursorOutOfRange { index, total } => {
                write!(f, "Question index {} is out of range (0..{})", index, total)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Failure while submitting a session.
#[derive(Debug)]
pub enum SubmitError {
    Session(SessionError),
    Quiz(QuizError),
}

impl From<SessionError> for SubmitError {
    fn from(err: SessionError) -> Self {
        SubmitError::Session(err)
    }
}

impl From<QuizError> for SubmitError {
    fn from(err: QuizError) -> Self {
        SubmitError::Quiz(err)
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Session(e) => e.into(),
            SubmitError::Quiz(e) => e.into(),
        }
    }
}

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., session already submitted)
    Conflict(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Maps core failures onto HTTP semantics.
/// An empty quiz is a broken catalog, never the client's fault.
impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::QuizNotFound(_) | QuizError::MissingQuiz(_) => {
                AppError::NotFound(err.to_string())
            }
            QuizError::InvalidQuiz(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidState { .. } => AppError::Conflict(err.to_string()),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_not_found_maps_to_404() {
        let response = AppError::from(QuizError::QuizNotFound("x".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_quiz_maps_to_500() {
        let response = AppError::from(QuizError::InvalidQuiz("empty".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn session_state_conflict_maps_to_409() {
        let err = SessionError::InvalidState {
            expected: "in_progress",
            actual: "completed",
        };
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
