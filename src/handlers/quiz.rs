// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    error::AppError,
    models::attempt::SubmitQuizRequest,
    services::{recorder::AttemptRecorder, scoring},
    utils::jwt::Claims,
};

/// Scores a full answer set in one request.
///
/// * Resolves the quiz (404 when unknown).
/// * Scores the answers; unanswered questions count as incorrect.
/// * Records the attempt for the calling user.
/// * Returns the result bundle for the review view.
pub async fn submit_quiz(
    State(recorder): State<AttemptRecorder>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<String>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let submission = recorder
        .submit(&claims.sub, &quiz_id, &req.answers, req.time_spent, Utc::now())
        .map_err(|e| {
            tracing::warn!("Failed to submit quiz {}: {}", quiz_id, e);
            AppError::from(e)
        })?;

    Ok(Json(scoring::bundle(&submission.quiz, submission.result)))
}
