// src/models/attempt.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quiz::Quiz;

/// Question ID -> zero-based option index the user selected.
/// Unanswered questions are simply absent.
pub type AnswerMap = BTreeMap<String, usize>;

/// Scoring summary for one answer map against one quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    /// Same as `correct_answers`.
    pub score: u32,
    pub total_questions: u32,
    /// Rounded half-up, always within 0..=100.
    pub percentage: u32,
    /// Seconds.
    pub time_spent: u64,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub answers: AnswerMap,
}

/// Record of a completed attempt, handed to an `AttemptSink`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String,
    pub answers: AnswerMap,
    pub score: u32,
    pub total_questions: u32,
    pub time_spent: u64,
    pub completed_at: DateTime<Utc>,
}

/// Per-question breakdown for the results review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    /// 1-based position in the quiz.
    pub number: usize,
    pub question_id: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    pub options: Vec<String>,
    pub selected_answer: Option<usize>,
    pub correct_answer: usize,
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Everything the results view needs: the result, the quiz it was scored
/// against and the answers that produced it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBundle {
    pub result: QuizResult,
    pub quiz: Quiz,
    pub answers: AnswerMap,
    pub review: Vec<QuestionReview>,
    pub message: &'static str,
}

/// DTO for scoring a quiz in one request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    #[serde(default)]
    pub answers: AnswerMap,

    /// Seconds the client spent on the quiz.
    #[serde(default)]
    pub time_spent: u64,
}
