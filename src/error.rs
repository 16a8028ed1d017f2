//! Error types for the pdf2quiz library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`QuizGenError`] — **Fatal**: the quiz cannot be generated at all
//!   (bad upload, object store rejected the file, completion API failed).
//!   Returned as `Err(QuizGenError)` from the top-level
//!   [`crate::generate::generate_quiz`] entry point.
//!
//! * [`BlockError`] — **Non-fatal**: a single question block in the model's
//!   reply was malformed but the remaining blocks are fine. The parser skips
//!   the block, logs it, and keeps going rather than losing the whole quiz
//!   to one garbled question.
//!
//! Every remote call site wraps its failure into a [`QuizGenError`] variant;
//! nothing propagates as an opaque transport error.
//! [`QuizGenError::is_transient`] records which faults would be retryable,
//! even though this crate itself never retries.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2quiz library.
///
/// Block-level parse failures use [`BlockError`] and are handled inside the
/// parser rather than propagated here.
#[derive(Debug, Error)]
pub enum QuizGenError {
    // ── Upload validation errors ──────────────────────────────────────────
    /// The request carried no file, or the file had no name.
    #[error("No PDF file was uploaded.")]
    MissingUpload,

    /// The uploaded filename does not end in `.pdf`.
    #[error("'{name}' is not a PDF — only .pdf uploads are accepted.")]
    NotAPdf { name: String },

    /// The filename sanitised down to nothing (e.g. `../../` or `???`).
    #[error("Invalid upload filename: '{name}'")]
    InvalidFilename { name: String },

    /// Could not write the upload to the scratch directory.
    #[error("Failed to save upload to '{path}': {source}")]
    ScratchWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Remote collaborator errors ────────────────────────────────────────
    /// The object store rejected the file or the request never completed.
    #[error("Upload to object store failed: {reason}")]
    UploadFailed { reason: String },

    /// The document-conversion service failed or returned an unusable reply.
    #[error("Document conversion failed: {reason}")]
    ConversionFailed { reason: String },

    /// Fetching the extracted text from the converter's result URL failed.
    #[error("Failed to fetch extracted text from '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    /// The completion API returned a non-retryable error.
    #[error("LLM API error: {message}")]
    LlmApi { message: String },

    /// The completion API answered HTTP 429 — caller should back off.
    #[error("Rate limit exceeded for model '{model}'")]
    RateLimited {
        model: String,
        retry_after_secs: Option<u64>,
    },

    /// The completion API returned an authentication error (401/403).
    #[error("Authentication error from completion API: {detail}")]
    AuthFailed { detail: String },

    /// The completion succeeded but carried no choices / no content.
    #[error("LLM returned an empty completion for model '{model}'")]
    EmptyCompletion { model: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or environment validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuizGenError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Timeouts, rate limits, and transport failures are transient; bad
    /// uploads, auth failures, and malformed configuration are permanent.
    /// Recorded for callers and logs only — this crate never retries.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            QuizGenError::UploadFailed { .. }
                | QuizGenError::ConversionFailed { .. }
                | QuizGenError::FetchFailed { .. }
                | QuizGenError::RateLimited { .. }
        )
    }

    /// Whether this error came from the caller's input rather than a
    /// collaborator. Validation errors get a specific user-visible message;
    /// everything else collapses to a generic one.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            QuizGenError::MissingUpload
                | QuizGenError::NotAPdf { .. }
                | QuizGenError::InvalidFilename { .. }
        )
    }
}

/// A non-fatal error for a single question block in the model's reply.
///
/// The parser logs these and continues with the remaining blocks; a quiz is
/// only ever missing its malformed questions, never aborted wholesale.
#[derive(Debug, Clone, Error)]
pub enum BlockError {
    /// The block's first line has no `:` separating the `Q<n>` marker from
    /// the question stem, so no prompt text can be extracted.
    #[error("Block {index}: first line has no ':' after the question marker: {line:?}")]
    MissingPromptDelimiter { index: usize, line: String },

    /// The first line had a colon but nothing after it — a question with an
    /// empty stem would violate the data model, so the block is dropped.
    #[error("Block {index}: question stem is empty")]
    EmptyPrompt { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_pdf_display() {
        let e = QuizGenError::NotAPdf {
            name: "notes.txt".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("notes.txt"), "got: {msg}");
        assert!(msg.contains(".pdf"));
    }

    #[test]
    fn rate_limited_is_transient() {
        let e = QuizGenError::RateLimited {
            model: "gpt-4".into(),
            retry_after_secs: Some(30),
        };
        assert!(e.is_transient());
        assert!(!e.is_validation());
    }

    #[test]
    fn auth_failure_is_permanent() {
        let e = QuizGenError::AuthFailed {
            detail: "invalid key".into(),
        };
        assert!(!e.is_transient());
    }

    #[test]
    fn validation_classification() {
        assert!(QuizGenError::MissingUpload.is_validation());
        assert!(QuizGenError::NotAPdf { name: "a.txt".into() }.is_validation());
        assert!(!QuizGenError::UploadFailed { reason: "boom".into() }.is_validation());
    }

    #[test]
    fn block_error_display() {
        let e = BlockError::MissingPromptDelimiter {
            index: 2,
            line: "Q3 What is Rust".into(),
        };
        assert!(e.to_string().contains("Block 2"));
    }
}
