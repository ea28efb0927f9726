// src/services/scoring.rs

use crate::{
    error::QuizError,
    models::{
        attempt::{AnswerMap, QuestionReview, QuizResult, ResultBundle},
        quiz::Quiz,
    },
};

/// Scores an answer map against a quiz.
///
/// A question counts as correct only when its ID is present in `answers`
/// with the key's index. Unanswered questions count as incorrect.
/// Pure: identical inputs always give an identical result.
pub fn score(quiz: &Quiz, answers: &AnswerMap, time_spent: u64) -> Result<QuizResult, QuizError> {
    if quiz.questions.is_empty() {
        return Err(QuizError::InvalidQuiz(quiz.id.clone()));
    }

    let total = quiz.questions.len() as u32;
    let correct = quiz
        .questions
        .iter()
        .filter(|q| answers.get(&q.id).is_some_and(|&sel| q.is_correct(sel)))
        .count() as u32;

    Ok(QuizResult {
        score: correct,
        total_questions: total,
        percentage: percentage(correct, total),
        time_spent,
        correct_answers: correct,
        incorrect_answers: total - correct,
        answers: answers.clone(),
    })
}

/// `round(correct / total * 100)` with halves rounded up, in integer
/// arithmetic so 1/8 gives 13 and 1/3 gives 33 exactly.
/// `total` must be non-zero.
pub fn percentage(correct: u32, total: u32) -> u32 {
    let (correct, total) = (u64::from(correct), u64::from(total));
    ((correct * 200 + total) / (total * 2)) as u32
}

/// Question-by-question breakdown in quiz order.
pub fn review(quiz: &Quiz, answers: &AnswerMap) -> Vec<QuestionReview> {
    quiz.questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let selected = answers.get(&q.id).copied();
            QuestionReview {
                number: i + 1,
                question_id: q.id.clone(),
                question: q.question.clone(),
                code_snippet: q.code_snippet.clone(),
                options: q.options.clone(),
                selected_answer: selected,
                correct_answer: q.correct_answer,
                is_correct: selected.is_some_and(|sel| q.is_correct(sel)),
                explanation: q.explanation.clone(),
            }
        })
        .collect()
}

/// Feedback line shown with a result.
pub fn performance_band(percentage: u32) -> &'static str {
    match percentage {
        90.. => "Excellent! Outstanding performance!",
        80..=89 => "Great job! Well done!",
        70..=79 => "Good work! Keep it up!",
        60..=69 => "Not bad! Room for improvement.",
        _ => "Keep practicing! You'll get better!",
    }
}

/// Packages a result for the review view, alongside the quiz and the
/// answers it was computed from.
pub fn bundle(quiz: &Quiz, result: QuizResult) -> ResultBundle {
    ResultBundle {
        review: review(quiz, &result.answers),
        message: performance_band(result.percentage),
        answers: result.answers.clone(),
        quiz: quiz.clone(),
        result,
    }
}
