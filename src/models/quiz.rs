// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::{Difficulty, PublicQuestion, Question};

/// A named, ordered collection of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub language: String,
    pub difficulty: Difficulty,

    /// Time limit in whole minutes. Untimed when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Time limit converted to seconds. A limit of zero means untimed.
    pub fn time_limit_secs(&self) -> Option<u64> {
        self.time_limit
            .filter(|&minutes| minutes > 0)
            .map(|minutes| u64::from(minutes) * 60)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Catalog listing entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub language: String,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    pub question_count: usize,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            category: quiz.category.clone(),
            language: quiz.language.clone(),
            difficulty: quiz.difficulty,
            time_limit: quiz.time_limit,
            question_count: quiz.questions.len(),
        }
    }
}

/// DTO for a quiz about to be taken (answer keys stripped).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub language: String,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    pub questions: Vec<PublicQuestion>,
}

impl From<&Quiz> for PublicQuiz {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            category: quiz.category.clone(),
            language: quiz.language.clone(),
            difficulty: quiz.difficulty,
            time_limit: quiz.time_limit,
            questions: quiz.questions.iter().map(PublicQuestion::from).collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::TimeZone;

    use super::*;

    /// Builds a quiz whose question `i` has id `q{i+1}`, four options and
    /// `correct[i]` as its answer key.
    pub fn quiz_with_key(id: &str, correct: &[usize], time_limit: Option<u32>) -> Quiz {
        let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Quiz {
            id: id.to_string(),
            title: format!("Quiz {}", id),
            description: "fixture".into(),
            category: "Programming".into(),
            language: "Rust".into(),
            difficulty: Difficulty::Medium,
            time_limit,
            created_at: stamp,
            updated_at: stamp,
            questions: correct
                .iter()
                .enumerate()
                .map(|(i, &answer)| Question {
                    id: format!("q{}", i + 1),
                    question: format!("Question {}", i + 1),
                    code_snippet: None,
                    options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    correct_answer: answer,
                    explanation: Some(format!("Explanation {}", i + 1)),
                    difficulty: Difficulty::Medium,
                    category: "Programming".into(),
                    language: "Rust".into(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::quiz_with_key;

    #[test]
    fn time_limit_is_reported_in_seconds() {
        assert_eq!(quiz_with_key("a", &[0], Some(15)).time_limit_secs(), Some(900));
        assert_eq!(quiz_with_key("b", &[0], None).time_limit_secs(), None);
    }

    #[test]
    fn zero_time_limit_is_untimed() {
        assert_eq!(quiz_with_key("z", &[0], Some(0)).time_limit_secs(), None);
    }
}
