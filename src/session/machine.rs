// src/session/machine.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    catalog::QuizRepository,
    error::{QuizError, SessionError, SubmitError},
    models::{
        attempt::{AnswerMap, QuizAttempt, QuizResult},
        question::{PublicQuestion, Question},
        quiz::Quiz,
    },
    services::{recorder::AttemptRecorder, scoring},
};

use super::countdown::{Countdown, TickOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Quiz not yet resolved. `QuizSession::load` resolves the quiz before
    /// returning, so a stored session never reports this state.
    Loading,
    InProgress,
    Submitting,
    Completed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Loading => "loading",
            SessionState::InProgress => "in_progress",
            SessionState::Submitting => "submitting",
            SessionState::Completed => "completed",
        }
    }
}

/// What moved the session out of `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitTrigger {
    User,
    Timeout,
}

/// Scored outcome kept on a completed session.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub result: QuizResult,
    pub attempt: QuizAttempt,
}

/// One user's pass through one quiz.
///
/// `Loading -> InProgress -> Submitting -> Completed`. Answers and the
/// cursor can only change while `InProgress`.
#[derive(Debug)]
pub struct QuizSession {
    id: Uuid,
    user_id: String,
    quiz: Arc<Quiz>,
    state: SessionState,
    cursor: usize,
    answers: AnswerMap,
    countdown: Option<Countdown>,
    started_at: DateTime<Utc>,
    trigger: Option<SubmitTrigger>,
    time_spent: Option<u64>,
    outcome: Option<SessionOutcome>,
}

impl QuizSession {
    /// Resolves `quiz_id` and opens a session on it.
    /// An unknown quiz never produces a session.
    pub fn load(
        catalog: &dyn QuizRepository,
        quiz_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        let quiz = catalog
            .get_by_id(quiz_id)
            .ok_or_else(|| QuizError::QuizNotFound(quiz_id.to_string()))?;

        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            countdown: quiz.time_limit_secs().map(Countdown::new),
            quiz,
            state: SessionState::InProgress,
            cursor: 0,
            answers: AnswerMap::new(),
            started_at: now,
            trigger: None,
            time_spent: None,
            outcome: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn quiz(&self) -> &Arc<Quiz> {
        &self.quiz
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn trigger(&self) -> Option<SubmitTrigger> {
        self.trigger
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_timed(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn time_remaining(&self) -> Option<u64> {
        self.countdown.as_ref().map(Countdown::remaining)
    }

    pub fn total_questions(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions[self.cursor]
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Position of the cursor through the quiz, as a whole percentage.
    pub fn progress_percent(&self) -> u32 {
        scoring::percentage(self.cursor as u32 + 1, self.total_questions() as u32)
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                expected: expected.as_str(),
                actual: self.state.as_str(),
            })
        }
    }

    /// Records (or replaces) the answer to a question.
    pub fn select_answer(&mut self, question_id: &str, option: usize) -> Result<(), SessionError> {
        self.expect_state(SessionState::InProgress)?;

        let question = self
            .quiz
            .question(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;
        if option >= question.options.len() {
            return Err(SessionError::OptionOutOfRange {
                question_id: question_id.to_string(),
                option,
                options: question.options.len(),
            });
        }

        self.answers.insert(question_id.to_string(), option);
        Ok(())
    }

    /// Moves to the next question; stays put on the last one.
    pub fn next(&mut self) -> Result<usize, SessionError> {
        self.expect_state(SessionState::InProgress)?;
        if self.cursor + 1 < self.total_questions() {
            self.cursor += 1;
        }
        Ok(self.cursor)
    }

    /// Moves to the previous question; stays put on the first one.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.expect_state(SessionState::InProgress)?;
        self.cursor = self.cursor.saturating_sub(1);
        Ok(self.cursor)
    }

    pub fn go_to(&mut self, index: usize) -> Result<usize, SessionError> {
        self.expect_state(SessionState::InProgress)?;
        if index >= self.total_questions() {
            return Err(SessionError::CursorOutOfRange {
                index,
                total: self.total_questions(),
            });
        }
        self.cursor = index;
        Ok(self.cursor)
    }

    /// Advances the countdown by one second. Ticks outside `InProgress`, or
    /// on an untimed session, are ignored.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != SessionState::InProgress {
            return TickOutcome::Stopped;
        }
        match self.countdown.as_mut() {
            Some(countdown) => countdown.tick(),
            None => TickOutcome::Stopped,
        }
    }

    /// `InProgress -> Submitting`. Stops the countdown and fixes the time
    /// spent: the consumed part of the limit for timed quizzes, wall-clock
    /// seconds since start otherwise.
    pub fn begin_submit(
        &mut self,
        trigger: SubmitTrigger,
        now: DateTime<Utc>,
    ) -> Result<u64, SessionError> {
        self.expect_state(SessionState::InProgress)?;

        let time_spent = match self.countdown.as_mut() {
            Some(countdown) => {
                countdown.stop();
                countdown.elapsed()
            }
            None => (now - self.started_at).num_seconds().max(0) as u64,
        };

        self.state = SessionState::Submitting;
        self.trigger = Some(trigger);
        self.time_spent = Some(time_spent);
        Ok(time_spent)
    }

    /// `Submitting -> Completed`.
    pub fn complete(&mut self, outcome: SessionOutcome) -> Result<(), SessionError> {
        self.expect_state(SessionState::Submitting)?;
        self.outcome = Some(outcome);
        self.state = SessionState::Completed;
        Ok(())
    }

    /// Runs the whole submission: freeze, score, record, complete.
    pub fn submit(
        &mut self,
        recorder: &AttemptRecorder,
        trigger: SubmitTrigger,
        now: DateTime<Utc>,
    ) -> Result<&SessionOutcome, SubmitError> {
        let time_spent = self.begin_submit(trigger, now)?;
        let submission =
            recorder.complete(&self.user_id, self.quiz.clone(), &self.answers, time_spent, now)?;

        self.complete(SessionOutcome {
            result: submission.result,
            attempt: submission.attempt,
        })?;
        tracing::info!(
            session_id = %self.id,
            quiz_id = %self.quiz.id,
            ?trigger,
            "Session completed"
        );

        self.outcome
            .as_ref()
            .ok_or(SubmitError::Session(SessionError::InvalidState {
                expected: SessionState::Completed.as_str(),
                actual: self.state.as_str(),
            }))
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            quiz_id: self.quiz.id.clone(),
            quiz_title: self.quiz.title.clone(),
            state: self.state,
            current_index: self.cursor,
            total_questions: self.total_questions(),
            current_question: PublicQuestion::from(self.current_question()),
            answers: self.answers.clone(),
            answered_count: self.answered_count(),
            progress: self.progress_percent(),
            time_remaining: self.time_remaining(),
            time_spent: self.time_spent,
            submitted_by: self.trigger,
        }
    }
}

/// Client-facing snapshot of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub quiz_id: String,
    pub quiz_title: String,
    pub state: SessionState,
    pub current_index: usize,
    pub total_questions: usize,
    pub current_question: PublicQuestion,
    pub answers: AnswerMap,
    pub answered_count: usize,
    pub progress: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<SubmitTrigger>,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::models::quiz::fixtures::quiz_with_key;
    use crate::services::recorder::MemoryAttemptSink;

    fn catalog() -> Arc<InMemoryCatalog> {
        Arc::new(
            InMemoryCatalog::new(vec![
                quiz_with_key("timed", &[0, 2, 0], Some(1)),
                quiz_with_key("untimed", &[1, 1], None),
            ])
            .unwrap(),
        )
    }

    fn open(quiz_id: &str) -> QuizSession {
        QuizSession::load(catalog().as_ref(), quiz_id, "u1", Utc::now()).unwrap()
    }

    fn recorder() -> AttemptRecorder {
        AttemptRecorder::new(catalog(), Arc::new(MemoryAttemptSink::default()))
    }

    #[test]
    fn load_unknown_quiz_fails() {
        let err = QuizSession::load(catalog().as_ref(), "nope", "u1", Utc::now()).unwrap_err();
        assert_eq!(err, QuizError::QuizNotFound("nope".into()));
    }

    #[test]
    fn load_starts_in_progress_at_first_question() {
        let s = open("timed");
        assert_eq!(s.state(), SessionState::InProgress);
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.time_remaining(), Some(60));
        assert_eq!(s.answered_count(), 0);
        assert!(open("untimed").time_remaining().is_none());
    }

    #[test]
    fn cursor_is_bounded() {
        let mut s = open("timed");
        assert_eq!(s.previous().unwrap(), 0);
        assert_eq!(s.next().unwrap(), 1);
        assert_eq!(s.next().unwrap(), 2);
        assert_eq!(s.next().unwrap(), 2);
        assert_eq!(s.go_to(0).unwrap(), 0);
        assert_eq!(
            s.go_to(3).unwrap_err(),
            SessionError::CursorOutOfRange { index: 3, total: 3 }
        );
        assert_eq!(s.progress_percent(), 33);
    }

    #[test]
    fn select_answer_validates_question_and_option() {
        let mut s = open("timed");
        s.select_answer("q1", 3).unwrap();
        s.select_answer("q1", 0).unwrap();
        assert_eq!(s.answers().get("q1"), Some(&0));
        assert_eq!(s.answered_count(), 1);

        assert!(matches!(
            s.select_answer("q9", 0),
            Err(SessionError::UnknownQuestion(_))
        ));
        assert!(matches!(
            s.select_answer("q2", 4),
            Err(SessionError::OptionOutOfRange { option: 4, options: 4, .. })
        ));
    }

    #[test]
    fn user_submit_scores_and_locks_session() {
        let mut s = open("timed");
        s.select_answer("q1", 0).unwrap();
        s.select_answer("q2", 1).unwrap();
        s.select_answer("q3", 0).unwrap();
        for _ in 0..42 {
            assert!(matches!(s.tick(), TickOutcome::Running(_)));
        }

        let outcome = s.submit(&recorder(), SubmitTrigger::User, Utc::now()).unwrap();
        assert_eq!(outcome.result.percentage, 67);
        assert_eq!(outcome.result.time_spent, 42);
        assert_eq!(outcome.attempt.user_id, "u1");

        assert_eq!(s.state(), SessionState::Completed);
        assert_eq!(s.trigger(), Some(SubmitTrigger::User));
        assert!(matches!(
            s.select_answer("q1", 1),
            Err(SessionError::InvalidState { .. })
        ));
        assert!(s.next().is_err());
        assert_eq!(s.tick(), TickOutcome::Stopped);
    }

    #[test]
    fn second_submit_is_rejected() {
        let mut s = open("untimed");
        let rec = recorder();
        s.submit(&rec, SubmitTrigger::User, Utc::now()).unwrap();
        assert!(matches!(
            s.submit(&rec, SubmitTrigger::Timeout, Utc::now()),
            Err(SubmitError::Session(SessionError::InvalidState { .. }))
        ));
    }

    #[test]
    fn expiry_fires_exactly_once() {
        let mut s = open("timed");
        let mut expired = 0;
        for _ in 0..120 {
            if s.tick() == TickOutcome::Expired {
                expired += 1;
                s.submit(&recorder(), SubmitTrigger::Timeout, Utc::now()).unwrap();
            }
        }
        assert_eq!(expired, 1);
        assert_eq!(s.trigger(), Some(SubmitTrigger::Timeout));
        assert_eq!(s.outcome().unwrap().result.time_spent, 60);
        assert_eq!(s.outcome().unwrap().result.correct_answers, 0);
    }

    #[test]
    fn untimed_session_measures_wall_clock() {
        let started = Utc::now();
        let mut s = QuizSession::load(catalog().as_ref(), "untimed", "u1", started).unwrap();
        let spent = s
            .begin_submit(SubmitTrigger::User, started + Duration::seconds(95))
            .unwrap();
        assert_eq!(spent, 95);
        assert_eq!(s.state(), SessionState::Submitting);
    }

    #[test]
    fn view_hides_answer_key() {
        let s = open("timed");
        let json = serde_json::to_value(s.view()).unwrap();
        assert_eq!(json["state"], "in_progress");
        assert_eq!(json["totalQuestions"], 3);
        assert!(json["currentQuestion"].get("correctAnswer").is_none());
    }
}
