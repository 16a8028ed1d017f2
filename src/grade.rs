//! Grading: score a submitted answer sheet against the stored quiz.
//!
//! Pure in-memory computation, no external calls. A question's submitted
//! label comes out of the form by its id; an unanswered question stays
//! `None` and can never be correct, even when the stored `correct_label` is
//! itself empty (a degraded parse).

use crate::quiz::{Question, QuizReport};
use std::collections::HashMap;
use uuid::Uuid;

/// Apply the submitted answers and tally the score.
///
/// Consumes the quiz, returns it graded: every question gets its
/// `submitted_label` (absent → `None`) and `is_correct` filled in, and the
/// report carries `correct_count` / `total_count` for the results view.
pub fn grade(mut questions: Vec<Question>, answers: &HashMap<Uuid, String>) -> QuizReport {
    for question in &mut questions {
        let submitted = answers.get(&question.id).cloned();
        let correct = matches!(&submitted, Some(label) if *label == question.correct_label);
        question.submitted_label = submitted;
        question.is_correct = Some(correct);
    }

    let correct_count = questions
        .iter()
        .filter(|q| q.is_correct == Some(true))
        .count();
    let total_count = questions.len();

    QuizReport {
        questions,
        correct_count,
        total_count,
    }
}
