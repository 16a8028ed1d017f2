//! Quiz data model: questions, their kind, and the graded report.
//!
//! A quiz is an ordered `Vec<Question>` held as ephemeral per-session state.
//! Everything here derives `Serialize`/`Deserialize` because the session
//! store keeps the active quiz as a serialized sequence and the results view
//! reads the graded copy back out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The question format, fixed per generation request.
///
/// Modelled as a tagged variant and matched exhaustively — the wire form
/// (`multiple_choice` / `true_false`) only ever appears at the serde and
/// form-parsing boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => f.write_str("multiple_choice"),
            QuestionKind::TrueFalse => f.write_str("true_false"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple_choice" => Ok(QuestionKind::MultipleChoice),
            "true_false" => Ok(QuestionKind::TrueFalse),
            other => Err(format!("unknown question type: '{other}'")),
        }
    }
}

/// One quiz item, produced by the parser and mutated once during grading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique within a quiz; doubles as the HTML form field key that
    /// correlates a submitted answer back to this question.
    pub id: Uuid,
    /// The question stem. Non-empty for any block the parser accepted.
    pub prompt_text: String,
    pub kind: QuestionKind,
    /// Ordered (label, text) pairs. For multiple choice these are whatever
    /// labelled options the model emitted, in source order; for true/false
    /// always `[("True","True"), ("False","False")]`.
    pub options: Vec<(String, String)>,
    /// Label considered correct. Empty string when the model's output was
    /// malformed — degraded, not fatal.
    pub correct_label: String,
    /// Free-text rationale; empty string when absent from the model's output.
    pub explanation: String,
    /// The label the user picked. `None` until graded.
    #[serde(default)]
    pub submitted_label: Option<String>,
    /// Set during grading only.
    #[serde(default)]
    pub is_correct: Option<bool>,
}

impl Question {
    /// Fresh ungraded question with a newly generated id.
    pub fn new(
        prompt_text: String,
        kind: QuestionKind,
        options: Vec<(String, String)>,
        correct_label: String,
        explanation: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt_text,
            kind,
            options,
            correct_label,
            explanation,
            submitted_label: None,
            is_correct: None,
        }
    }

    /// The fixed option pair every true/false question carries.
    pub fn true_false_options() -> Vec<(String, String)> {
        vec![
            ("True".to_string(), "True".to_string()),
            ("False".to_string(), "False".to_string()),
        ]
    }
}

/// A graded quiz: the questions with `submitted_label`/`is_correct` filled
/// in, plus the tally the results view displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizReport {
    pub questions: Vec<Question>,
    pub correct_count: usize,
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [QuestionKind::MultipleChoice, QuestionKind::TrueFalse] {
            assert_eq!(kind.to_string().parse::<QuestionKind>(), Ok(kind));
        }
        assert!("essay".parse::<QuestionKind>().is_err());
    }

    #[test]
    fn kind_serde_uses_snake_case() {
        let json = serde_json::to_string(&QuestionKind::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple_choice\"");
        let back: QuestionKind = serde_json::from_str("\"true_false\"").unwrap();
        assert_eq!(back, QuestionKind::TrueFalse);
    }

    #[test]
    fn new_questions_get_distinct_ids() {
        let a = Question::new(
            "What is ownership?".into(),
            QuestionKind::TrueFalse,
            Question::true_false_options(),
            "True".into(),
            String::new(),
        );
        let b = Question::new(
            "What is ownership?".into(),
            QuestionKind::TrueFalse,
            Question::true_false_options(),
            "True".into(),
            String::new(),
        );
        assert_ne!(a.id, b.id);
        assert!(a.submitted_label.is_none());
        assert!(a.is_correct.is_none());
    }

    #[test]
    fn question_survives_serde_round_trip() {
        let q = Question::new(
            "Pick one".into(),
            QuestionKind::MultipleChoice,
            vec![("A".into(), "first".into()), ("B".into(), "second".into())],
            "B".into(),
            "second is right".into(),
        );
        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, q.id);
        assert_eq!(back.options, q.options);
        assert_eq!(back.correct_label, "B");
    }
}
