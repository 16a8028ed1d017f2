//! Quiz-text parsing: turn the model's free-text reply into typed questions.
//!
//! ## Why regex over a grammar?
//!
//! The completion is *semi*-structured at best — the model was told to follow
//! the templates in [`crate::prompts`] but occasionally adds commentary,
//! blank lines, or drops a marker. A handful of line-oriented rules tolerant
//! of that noise beats a strict grammar that would reject an entire quiz over
//! one stray line. The rules here and the prompt templates are one
//! co-versioned contract: every literal matched below is demanded verbatim by
//! a template in `prompts.rs`.
//!
//! ## Degradation policy
//!
//! Field-level damage degrades, block-level damage skips:
//!
//! * A block missing `Correct Answer:` or `Explanation:` still yields a
//!   question, with the affected field as `""`.
//! * A block whose first line has no `:` (or whose stem is empty) cannot
//!   yield a question; it is skipped with a warning and the rest of the quiz
//!   survives. See [`BlockError`].
//!
//! The parser never fails outright and has no network or storage side
//! effects, which is what makes it the natural unit-test target.

use crate::error::BlockError;
use crate::quiz::{Question, QuestionKind};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// A question block starts where a line begins with `Q<digits>:`.
///
/// The regex crate has no lookahead, so instead of splitting on
/// `\n(?=Q\d+:)` we take every `(?m)^Q\d+:` match position as a slice
/// boundary — the delimiter stays attached to the block it opens, which is
/// the same thing the lookahead split produces. Anything before the first
/// marker (model pleasantries, "Here are your questions") forms a leading
/// block that is discarded when empty and otherwise subject to the same
/// per-block rules.
static RE_BLOCK_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Q[0-9]+:").unwrap());

/// An option line: a single uppercase letter A–D followed by a period at
/// line start. The templates demand exactly `A. text`.
static RE_OPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-D]\.").unwrap());

/// Parse the raw completion text into an ordered question sequence.
///
/// `kind` must be the kind the prompt was built with — it selects which
/// markers are scanned for. Block order in the text becomes question order;
/// each question gets a freshly generated id, so re-parsing the same text
/// yields equal questions modulo ids.
pub fn parse_quiz(raw: &str, kind: QuestionKind) -> Vec<Question> {
    let mut questions = Vec::new();

    for (index, block) in split_blocks(raw).into_iter().enumerate() {
        let trimmed = block.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_block(index, trimmed, kind) {
            Ok(question) => questions.push(question),
            Err(e) => warn!("Skipping malformed question block: {e}"),
        }
    }

    debug!("Parsed {} questions from completion text", questions.len());
    questions
}

/// Slice the text into blocks at every `Q<n>:` line start.
///
/// With no marker at all the whole text is a single block, so completions
/// that ignored the format entirely still flow through the normal per-block
/// error path instead of a special case.
fn split_blocks(raw: &str) -> Vec<&str> {
    let starts: Vec<usize> = RE_BLOCK_START.find_iter(raw).map(|m| m.start()).collect();
    if starts.is_empty() {
        return vec![raw];
    }

    let mut blocks = Vec::with_capacity(starts.len() + 1);
    blocks.push(&raw[..starts[0]]);
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(raw.len());
        blocks.push(&raw[start..end]);
    }
    blocks
}

/// Parse one non-empty block into a question.
fn parse_block(index: usize, block: &str, kind: QuestionKind) -> Result<Question, BlockError> {
    let lines: Vec<&str> = block.lines().collect();
    let first = lines.first().copied().unwrap_or_default();

    let Some((_, stem)) = first.split_once(':') else {
        return Err(BlockError::MissingPromptDelimiter {
            index,
            line: first.to_string(),
        });
    };
    let prompt_text = stem.trim();
    if prompt_text.is_empty() {
        return Err(BlockError::EmptyPrompt { index });
    }

    let explanation = field_after_marker(&lines, "Explanation:");

    let (options, correct_label) = match kind {
        QuestionKind::MultipleChoice => {
            let options = lines
                .iter()
                .filter(|line| RE_OPTION.is_match(line))
                .map(|line| (line[..1].to_string(), option_text(line).to_string()))
                .collect();
            (options, field_after_marker(&lines, "Correct Answer:"))
        }
        // The answer value is accepted verbatim, not validated to True/False.
        QuestionKind::TrueFalse => (
            Question::true_false_options(),
            field_after_marker(&lines, "Answer:"),
        ),
    };

    Ok(Question::new(
        prompt_text.to_string(),
        kind,
        options,
        correct_label,
        explanation,
    ))
}

/// First line starting with `marker` → substring after its first colon,
/// trimmed. Missing marker degrades to `""`.
fn field_after_marker(lines: &[&str], marker: &str) -> String {
    lines
        .iter()
        .find(|line| line.starts_with(marker))
        .and_then(|line| line.split_once(':'))
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

/// Option text: everything from the fourth character on, trimmed.
///
/// The template is `A. text` — label, period, one space — so character four
/// is where the text begins. Counting characters rather than bytes keeps a
/// multibyte option ("A. 所有权") from splitting a UTF-8 boundary.
fn option_text(line: &str) -> &str {
    line.char_indices()
        .nth(3)
        .map(|(i, _)| line[i..].trim())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED_MC: &str = "\
Q1: What does the borrow checker enforce?
A. Reference lifetimes
B. Code formatting
C. Crate versions
D. Build order
Correct Answer: A
Explanation: The borrow checker validates reference lifetimes; the other options are toolchain concerns.

Q2: Which keyword declares an immutable binding?
A. mut
B. let
C. static
D. const
Correct Answer: B
Explanation: let bindings are immutable by default.";

    #[test]
    fn well_formed_multiple_choice_block() {
        let questions = parse_quiz(WELL_FORMED_MC, QuestionKind::MultipleChoice);
        assert_eq!(questions.len(), 2);

        let q = &questions[0];
        assert_eq!(q.prompt_text, "What does the borrow checker enforce?");
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.options[0], ("A".to_string(), "Reference lifetimes".to_string()));
        assert_eq!(q.options[3], ("D".to_string(), "Build order".to_string()));
        assert_eq!(q.correct_label, "A");
        assert!(q.explanation.starts_with("The borrow checker"));
        assert!(q.submitted_label.is_none());
        assert!(q.is_correct.is_none());
    }

    #[test]
    fn block_order_becomes_question_order_with_distinct_ids() {
        let questions = parse_quiz(WELL_FORMED_MC, QuestionKind::MultipleChoice);
        assert!(questions[0].prompt_text.contains("borrow checker"));
        assert!(questions[1].prompt_text.contains("immutable binding"));
        assert_ne!(questions[0].id, questions[1].id);
    }

    #[test]
    fn true_false_options_are_fixed_regardless_of_content() {
        let raw = "Q1: Rust has a garbage collector.\nAnswer: False\nExplanation: Memory is managed through ownership.";
        let questions = parse_quiz(raw, QuestionKind::TrueFalse);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options, Question::true_false_options());
        assert_eq!(questions[0].correct_label, "False");
        assert_eq!(
            questions[0].explanation,
            "Memory is managed through ownership."
        );
    }

    #[test]
    fn true_false_answer_is_not_validated() {
        let raw = "Q1: Statement.\nAnswer: Probably\nExplanation: x";
        let questions = parse_quiz(raw, QuestionKind::TrueFalse);
        assert_eq!(questions[0].correct_label, "Probably");
    }

    #[test]
    fn missing_correct_answer_degrades_to_empty() {
        let raw = "Q1: Pick one.\nA. first\nB. second\nExplanation: none apply";
        let questions = parse_quiz(raw, QuestionKind::MultipleChoice);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_label, "");
        assert_eq!(questions[0].explanation, "none apply");
    }

    #[test]
    fn missing_explanation_degrades_to_empty() {
        let raw = "Q1: Pick one.\nA. first\nB. second\nCorrect Answer: B";
        let questions = parse_quiz(raw, QuestionKind::MultipleChoice);
        assert_eq!(questions[0].explanation, "");
        assert_eq!(questions[0].correct_label, "B");
    }

    #[test]
    fn leading_commentary_is_skipped() {
        let raw = "Sure! Here are your questions\n\nQ1: Statement.\nAnswer: True\nExplanation: x";
        let questions = parse_quiz(raw, QuestionKind::TrueFalse);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt_text, "Statement.");
    }

    #[test]
    fn blank_lines_between_blocks_are_tolerated() {
        let raw = "Q1: First.\nAnswer: True\nExplanation: a\n\n\n\nQ2: Second.\nAnswer: False\nExplanation: b";
        let questions = parse_quiz(raw, QuestionKind::TrueFalse);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].prompt_text, "Second.");
    }

    #[test]
    fn mid_line_marker_does_not_split() {
        let raw = "Q1: See section Q2: of the text for details.\nAnswer: True\nExplanation: x";
        let questions = parse_quiz(raw, QuestionKind::TrueFalse);
        assert_eq!(questions.len(), 1);
        assert_eq!(
            questions[0].prompt_text,
            "See section Q2: of the text for details."
        );
    }

    #[test]
    fn block_without_colon_is_skipped_not_fatal() {
        let raw = "Q1 missing its colon\nAnswer: True\n\nQ2: Survives.\nAnswer: False\nExplanation: y";
        let questions = parse_quiz(raw, QuestionKind::TrueFalse);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt_text, "Survives.");
    }

    #[test]
    fn empty_stem_is_skipped() {
        let raw = "Here you go:\n\nQ1: Real question.\nAnswer: True\nExplanation: z";
        let questions = parse_quiz(raw, QuestionKind::TrueFalse);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt_text, "Real question.");
    }

    #[test]
    fn empty_input_yields_no_questions() {
        assert!(parse_quiz("", QuestionKind::MultipleChoice).is_empty());
        assert!(parse_quiz("   \n\n  ", QuestionKind::TrueFalse).is_empty());
    }

    #[test]
    fn options_keep_source_order_even_when_reordered() {
        let raw = "Q1: Pick.\nC. third\nA. first\nD. fourth\nB. second\nCorrect Answer: C\nExplanation: x";
        let questions = parse_quiz(raw, QuestionKind::MultipleChoice);
        let labels: Vec<&str> = questions[0].options.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["C", "A", "D", "B"]);
    }

    #[test]
    fn multibyte_option_text_does_not_panic() {
        let raw = "Q1: 所有権とは?\nA. 所有権\nB. 借用\nCorrect Answer: A\nExplanation: x";
        let questions = parse_quiz(raw, QuestionKind::MultipleChoice);
        assert_eq!(questions[0].options[0], ("A".to_string(), "所有権".to_string()));
        assert_eq!(questions[0].options[1], ("B".to_string(), "借用".to_string()));
    }

    #[test]
    fn reparsing_is_identical_modulo_ids() {
        let a = parse_quiz(WELL_FORMED_MC, QuestionKind::MultipleChoice);
        let b = parse_quiz(WELL_FORMED_MC, QuestionKind::MultipleChoice);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_ne!(x.id, y.id);
            assert_eq!(x.prompt_text, y.prompt_text);
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.options, y.options);
            assert_eq!(x.correct_label, y.correct_label);
            assert_eq!(x.explanation, y.explanation);
        }
    }

    #[test]
    fn option_text_slices_from_fourth_character() {
        assert_eq!(option_text("A. Reference lifetimes"), "Reference lifetimes");
        assert_eq!(option_text("B.text"), "ext"); // malformed spacing, literal slice
        assert_eq!(option_text("C."), "");
    }
}
