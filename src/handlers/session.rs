// src/handlers/session.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::AppError, session::SessionStore, utils::jwt::Claims};

/// DTO for selecting an answer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question_id: String,
    pub option: usize,
}

/// DTO for moving the question cursor.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NavigateRequest {
    Next,
    Previous,
    Goto { index: usize },
}

/// Starts a questionnaire session on a quiz.
pub async fn start_session(
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions.start(&claims.sub, &quiz_id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_session(
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.get(&claims.sub, id).await?;
    let view = session.lock().await.view();
    Ok(Json(view))
}

pub async fn answer(
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.get(&claims.sub, id).await?;
    let mut session = session.lock().await;
    session.select_answer(&req.question_id, req.option)?;
    Ok(Json(session.view()))
}

pub async fn navigate(
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<NavigateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions.get(&claims.sub, id).await?;
    let mut session = session.lock().await;
    match req {
        NavigateRequest::Next => session.next()?,
        NavigateRequest::Previous => session.previous()?,
        NavigateRequest::Goto { index } => session.go_to(index)?,
    };
    Ok(Json(session.view()))
}

/// Submits the session and returns the result bundle.
pub async fn submit_session(
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let bundle = sessions.submit(&claims.sub, id).await?;
    Ok(Json(bundle))
}

/// Result bundle of a completed session, including time-outs.
pub async fn session_result(
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let bundle = sessions.result(&claims.sub, id).await?;
    Ok(Json(bundle))
}

/// Abandons a session. Any running countdown is cancelled.
pub async fn delete_session(
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    sessions.remove(&claims.sub, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
