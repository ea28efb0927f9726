// src/models/question.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Difficulty tier shared by quizzes and questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty '{}'", other)),
        }
    }
}

/// A single multiple-choice item as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique within the parent quiz.
    pub id: String,

    /// The prompt shown to the user.
    pub question: String,

    /// Verbatim code listing displayed with the prompt. Never executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,

    /// Answer options in display order. At least two.
    pub options: Vec<String>,

    /// Zero-based index into `options`.
    pub correct_answer: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    pub difficulty: Difficulty,
    pub category: String,
    pub language: String,
}

impl Question {
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer
    }
}

/// DTO for sending a question to the client (excludes answer and explanation).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            question: q.question.clone(),
            code_snippet: q.code_snippet.clone(),
            options: q.options.clone(),
            difficulty: q.difficulty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_round_trips_through_its_label() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(d.as_str().parse::<Difficulty>(), Ok(d));
        }
        assert!("EASY".parse::<Difficulty>().is_err());
    }

    #[test]
    fn public_question_hides_the_answer_key() {
        let q = Question {
            id: "q1".into(),
            question: "Pick".into(),
            code_snippet: None,
            options: vec!["a".into(), "b".into()],
            correct_answer: 1,
            explanation: Some("because".into()),
            difficulty: Difficulty::Easy,
            category: "c".into(),
            language: "Rust".into(),
        };
        let json = serde_json::to_value(PublicQuestion::from(&q)).unwrap();
        assert!(json.get("correctAnswer").is_none());
        assert!(json.get("explanation").is_none());
        assert_eq!(json["options"][1], "b");
    }
}
