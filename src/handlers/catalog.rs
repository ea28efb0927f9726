// src/handlers/catalog.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    error::{AppError, QuizError},
    models::{
        question::Difficulty,
        quiz::{PublicQuiz, QuizSummary},
    },
    state::Catalog,
};

/// Query parameters for listing quizzes.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub language: Option<String>,
    pub difficulty: Option<String>,
}

/// Lists all quizzes, optionally filtered by language and difficulty.
pub async fn list_quizzes(
    State(catalog): State<Catalog>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let difficulty = params
        .difficulty
        .as_deref()
        .map(str::parse::<Difficulty>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let quizzes = match &params.language {
        Some(language) => catalog.filter_by_language(language),
        None => catalog.list_all(),
    };

    let summaries: Vec<QuizSummary> = quizzes
        .iter()
        .filter(|q| difficulty.is_none_or(|d| q.difficulty == d))
        .map(|q| QuizSummary::from(q.as_ref()))
        .collect();

    Ok(Json(summaries))
}

/// Retrieves a single quiz by ID, without its answer key.
pub async fn get_quiz(
    State(catalog): State<Catalog>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = catalog
        .get_by_id(&id)
        .ok_or(QuizError::QuizNotFound(id))?;

    Ok(Json(PublicQuiz::from(quiz.as_ref())))
}
