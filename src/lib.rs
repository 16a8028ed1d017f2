//! # pdf2quiz
//!
//! Turn an uploaded PDF into an interactive quiz using a large language
//! model.
//!
//! ## Why this crate?
//!
//! Writing practice questions from lecture notes is rote work the model does
//! well — *if* its free-text reply is turned back into something typed. This
//! crate wires the four moving parts together: ship the PDF to a conversion
//! service for LLM-ready text, ask the completion API for a quiz in a pinned
//! textual format, parse that reply into typed [`Question`]s, and serve an
//! upload → take-quiz → results flow over HTTP.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF upload
//!  │
//!  ├─ 1. Input    validate filename, persist to the scratch dir
//!  ├─ 2. Storage  put into the object store → public URL
//!  ├─ 3. Extract  remote document→text conversion, fetch the result
//!  ├─ 4. Prompt   render the co-versioned quiz-format prompt
//!  ├─ 5. LLM      one synchronous chat completion
//!  ├─ 6. Parse    free text → ordered, typed questions
//!  └─ 7. Session  store as the session's active quiz; grade on submit
//! ```
//!
//! Stages run strictly forward; every failure maps into the
//! [`QuizGenError`] taxonomy at its call site.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2quiz::{generate_quiz, persist_upload, QuestionKind, QuizConfig, QuizRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = QuizConfig::from_env()?;
//!     let request = QuizRequest::new(5, QuestionKind::MultipleChoice)?;
//!
//!     let pdf = std::fs::read("lecture.pdf")?;
//!     let upload = persist_upload(&config.scratch_dir, "lecture.pdf", &pdf).await?;
//!     let questions = generate_quiz(&upload, &request, &config).await?;
//!     for q in &questions {
//!         println!("{} [{}]", q.prompt_text, q.correct_label);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | Enables the `pdf2quiz` web server binary (axum + clap + anyhow + tracing-subscriber + dotenv) |
//!
//! Disable `server` when using only the library to avoid pulling in
//! server-only deps:
//! ```toml
//! pdf2quiz = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod grade;
pub mod pipeline;
pub mod prompts;
pub mod quiz;
#[cfg(feature = "server")]
pub mod serve;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{QuizConfig, QuizConfigBuilder};
pub use error::{BlockError, QuizGenError};
pub use generate::{generate_quiz, QuizRequest};
pub use grade::grade;
pub use pipeline::input::persist_upload;
pub use pipeline::parse::parse_quiz;
pub use quiz::{Question, QuestionKind, QuizReport};
pub use session::QuizStore;
