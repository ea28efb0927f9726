// src/catalog.rs

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::models::{question::Difficulty, quiz::Quiz};

/// Catalog format version understood by this build.
pub const CATALOG_VERSION: u32 = 1;

const BUILTIN_CATALOG: &str = include_str!("../data/quizzes.json");

/// Read-only access to quizzes.
///
/// Implementations hand out shared references; repeated lookups of the same
/// identifier yield the same `Arc`. The scoring engine never sees this trait,
/// only the `Quiz` values it returns.
pub trait QuizRepository: Send + Sync {
    /// Every quiz, in catalog order.
    fn list_all(&self) -> Vec<Arc<Quiz>>;

    /// Exact-match lookup. `None` is not an error.
    fn get_by_id(&self, id: &str) -> Option<Arc<Quiz>>;

    /// Case-insensitive exact match on the language label.
    fn filter_by_language(&self, language: &str) -> Vec<Arc<Quiz>> {
        let wanted = language.to_lowercase();
        self.list_all()
            .into_iter()
            .filter(|q| q.language.to_lowercase() == wanted)
            .collect()
    }

    fn filter_by_difficulty(&self, difficulty: Difficulty) -> Vec<Arc<Quiz>> {
        self.list_all()
            .into_iter()
            .filter(|q| q.difficulty == difficulty)
            .collect()
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Io(String),
    Parse(serde_json::Error),
    UnsupportedVersion(u32),
    Invalid(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(msg) => write!(f, "Failed to read catalog: {}", msg),
            CatalogError::Parse(e) => write!(f, "Malformed catalog: {}", e),
            CatalogError::UnsupportedVersion(v) => write!(
                f,
                "Unsupported catalog version {} (expected {})",
                v, CATALOG_VERSION
            ),
            CatalogError::Invalid(msg) => write!(f, "Invalid catalog: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err)
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    version: u32,
    quizzes: Vec<Quiz>,
}

/// Static catalog held in memory. Immutable after construction, so it can
/// be shared across any number of readers without locking.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    quizzes: Vec<Arc<Quiz>>,
}

impl InMemoryCatalog {
    /// Builds a catalog after checking every quiz and question invariant.
    pub fn new(quizzes: Vec<Quiz>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for quiz in &quizzes {
            if !seen.insert(quiz.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate quiz id '{}'",
                    quiz.id
                )));
            }
            validate_quiz(quiz)?;
        }

        Ok(Self {
            quizzes: quizzes.into_iter().map(Arc::new).collect(),
        })
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        if file.version != CATALOG_VERSION {
            return Err(CatalogError::UnsupportedVersion(file.version));
        }
        Self::new(file.quizzes)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}

impl QuizRepository for InMemoryCatalog {
    fn list_all(&self) -> Vec<Arc<Quiz>> {
        self.quizzes.clone()
    }

    fn get_by_id(&self, id: &str) -> Option<Arc<Quiz>> {
        self.quizzes.iter().find(|q| q.id == id).cloned()
    }
}

fn validate_quiz(quiz: &Quiz) -> Result<(), CatalogError> {
    if quiz.questions.is_empty() {
        return Err(CatalogError::Invalid(format!(
            "quiz '{}' has no questions",
            quiz.id
        )));
    }

    let mut ids = HashSet::new();
    for q in &quiz.questions {
        if !ids.insert(q.id.as_str()) {
            return Err(CatalogError::Invalid(format!(
                "quiz '{}' repeats question id '{}'",
                quiz.id, q.id
            )));
        }
        if q.options.len() < 2 {
            return Err(CatalogError::Invalid(format!(
                "question '{}' in quiz '{}' needs at least two options",
                q.id, quiz.id
            )));
        }
        if q.correct_answer >= q.options.len() {
            return Err(CatalogError::Invalid(format!(
                "question '{}' in quiz '{}' points at option {} of {}",
                q.id,
                quiz.id,
                q.correct_answer,
                q.options.len()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::fixtures::quiz_with_key;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::builtin().expect("built-in catalog must be valid")
    }

    #[test]
    fn builtin_catalog_loads_in_order() {
        let ids: Vec<String> = catalog().list_all().iter().map(|q| q.id.clone()).collect();
        assert_eq!(ids, vec!["javascript-basics", "python-basics"]);
    }

    #[test]
    fn list_all_is_restartable() {
        let c = catalog();
        assert_eq!(c.list_all().len(), c.list_all().len());
    }

    #[test]
    fn get_by_id_returns_same_instance() {
        let c = catalog();
        let a = c.get_by_id("python-basics").unwrap();
        let b = c.get_by_id("python-basics").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn get_by_id_unknown_is_none() {
        assert!(catalog().get_by_id("does-not-exist").is_none());
    }

    #[test]
    fn filter_by_language_ignores_case() {
        let c = catalog();
        let hits = c.filter_by_language("jAvAsCrIpT");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "javascript-basics");
        assert!(c.filter_by_language("Java").is_empty());
    }

    #[test]
    fn filter_by_difficulty_matches_exactly() {
        let c = catalog();
        assert_eq!(c.filter_by_difficulty(Difficulty::Easy).len(), 2);
        assert!(c.filter_by_difficulty(Difficulty::Hard).is_empty());
    }

    #[test]
    fn rejects_empty_quiz() {
        let err = InMemoryCatalog::new(vec![quiz_with_key("empty", &[], None)]).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn rejects_out_of_range_answer_key() {
        let err = InMemoryCatalog::new(vec![quiz_with_key("bad", &[4], None)]).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn rejects_duplicate_question_ids() {
        let mut quiz = quiz_with_key("dup", &[0, 1], None);
        quiz.questions[1].id = "q1".into();
        assert!(InMemoryCatalog::new(vec![quiz]).is_err());
    }

    #[test]
    fn rejects_duplicate_quiz_ids() {
        let quizzes = vec![quiz_with_key("same", &[0], None), quiz_with_key("same", &[1], None)];
        assert!(InMemoryCatalog::new(quizzes).is_err());
    }

    #[test]
    fn rejects_unknown_version() {
        let err = InMemoryCatalog::from_json(r#"{"version": 2, "quizzes": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedVersion(2)));
    }
}
