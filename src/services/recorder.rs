// src/services/recorder.rs

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    catalog::QuizRepository,
    error::QuizError,
    models::{
        attempt::{AnswerMap, QuizAttempt, QuizResult},
        quiz::Quiz,
    },
    services::scoring,
};

/// Destination for finished attempts. Swap in a storage-backed sink to
/// persist attempts; nothing else needs to change.
pub trait AttemptSink: Send + Sync {
    fn record(&self, attempt: &QuizAttempt);
}

/// Writes each attempt to the log and drops it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAttemptSink;

impl AttemptSink for LogAttemptSink {
    fn record(&self, attempt: &QuizAttempt) {
        tracing::info!(
            attempt_id = %attempt.id,
            user_id = %attempt.user_id,
            quiz_id = %attempt.quiz_id,
            score = attempt.score,
            total = attempt.total_questions,
            time_spent = attempt.time_spent,
            "Quiz attempt submitted"
        );
    }
}

/// Keeps attempts in memory. Useful for tests and local inspection.
#[derive(Debug, Default)]
pub struct MemoryAttemptSink {
    attempts: Mutex<Vec<QuizAttempt>>,
}

impl MemoryAttemptSink {
    pub fn attempts(&self) -> Vec<QuizAttempt> {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl AttemptSink for MemoryAttemptSink {
    fn record(&self, attempt: &QuizAttempt) {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(attempt.clone());
    }
}

/// Outcome of a submission: the quiz scored against, its result and the
/// attempt record that was forwarded to the sink.
#[derive(Debug, Clone)]
pub struct Submission {
    pub quiz: Arc<Quiz>,
    pub result: QuizResult,
    pub attempt: QuizAttempt,
}

/// Turns scored results into attempt records and hands them to a sink.
#[derive(Clone)]
pub struct AttemptRecorder {
    catalog: Arc<dyn QuizRepository>,
    sink: Arc<dyn AttemptSink>,
}

impl AttemptRecorder {
    pub fn new(catalog: Arc<dyn QuizRepository>, sink: Arc<dyn AttemptSink>) -> Self {
        Self { catalog, sink }
    }

    /// Packages a result into an attempt record.
    ///
    /// Only `quiz_id` is checked; the answers are trusted as given.
    pub fn build_attempt(
        &self,
        user_id: &str,
        quiz_id: &str,
        answers: &AnswerMap,
        result: &QuizResult,
        completed_at: DateTime<Utc>,
    ) -> Result<QuizAttempt, QuizError> {
        if self.catalog.get_by_id(quiz_id).is_none() {
            return Err(QuizError::MissingQuiz(quiz_id.to_string()));
        }

        Ok(QuizAttempt {
            id: format!("attempt-{}", Uuid::now_v7()),
            user_id: user_id.to_string(),
            quiz_id: quiz_id.to_string(),
            answers: answers.clone(),
            score: result.score,
            total_questions: result.total_questions,
            time_spent: result.time_spent,
            completed_at,
        })
    }

    /// Forwards a finished attempt to the sink.
    pub fn record(&self, attempt: &QuizAttempt) {
        self.sink.record(attempt);
    }

    /// Resolves the quiz, scores the answers, then builds and records the
    /// attempt.
    pub fn submit(
        &self,
        user_id: &str,
        quiz_id: &str,
        answers: &AnswerMap,
        time_spent: u64,
        completed_at: DateTime<Utc>,
    ) -> Result<Submission, QuizError> {
        let quiz = self
            .catalog
            .get_by_id(quiz_id)
            .ok_or_else(|| QuizError::QuizNotFound(quiz_id.to_string()))?;

        self.complete(user_id, quiz, answers, time_spent, completed_at)
    }

    /// Scores and records against an already-resolved quiz.
    pub fn complete(
        &self,
        user_id: &str,
        quiz: Arc<Quiz>,
        answers: &AnswerMap,
        time_spent: u64,
        completed_at: DateTime<Utc>,
    ) -> Result<Submission, QuizError> {
        let result = scoring::score(&quiz, answers, time_spent)?;
        let attempt = self.build_attempt(user_id, &quiz.id, answers, &result, completed_at)?;
        self.record(&attempt);

        Ok(Submission {
            quiz,
            result,
            attempt,
        })
    }
}
