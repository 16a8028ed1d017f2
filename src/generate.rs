//! The quiz-generation entry point: one pipeline run per uploaded PDF.
//!
//! ## Why a single eager function?
//!
//! The pipeline is strictly sequential — every stage consumes exactly the
//! previous stage's output and nothing else — so there is no value in
//! exposing the stages individually to callers. One function owns the run,
//! gates each step on the previous one succeeding, and maps every remote
//! fault into the [`crate::error::QuizGenError`] taxonomy so nothing
//! propagates as an opaque transport error.

use crate::config::QuizConfig;
use crate::error::QuizGenError;
use crate::pipeline::input::UploadedPdf;
use crate::pipeline::{extract, llm, parse, storage};
use crate::prompts;
use crate::quiz::{Question, QuestionKind};
use std::time::Instant;
use tracing::{debug, info, warn};

/// What the caller asked for: how many questions, in which format.
#[derive(Debug, Clone, Copy)]
pub struct QuizRequest {
    num_questions: usize,
    kind: QuestionKind,
}

impl QuizRequest {
    /// A request for `num_questions` questions of `kind`.
    ///
    /// The count is validated here, before the request can reach the prompt
    /// builder or cost anything remote.
    pub fn new(num_questions: usize, kind: QuestionKind) -> Result<Self, QuizGenError> {
        if num_questions == 0 {
            return Err(QuizGenError::InvalidConfig(
                "number of questions must be at least 1".into(),
            ));
        }
        Ok(Self {
            num_questions,
            kind,
        })
    }

    pub fn num_questions(&self) -> usize {
        self.num_questions
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }
}

/// Run the full pipeline for an already-persisted upload.
///
/// Upload validation and scratch persistence happen earlier, in
/// [`crate::pipeline::input::persist_upload`] — by the time this runs, the
/// PDF is on disk and named acceptably. Each remote step aborts the run on
/// failure; no later step is attempted and no quiz state is touched.
///
/// Returns the parsed questions in the order the model emitted them. An
/// empty vector is not an error: a model reply with no parseable block
/// yields an empty quiz, which the caller renders as such.
pub async fn generate_quiz(
    upload: &UploadedPdf,
    request: &QuizRequest,
    config: &QuizConfig,
) -> Result<Vec<Question>, QuizGenError> {
    let total_start = Instant::now();
    info!(
        "Starting quiz generation: {} ({} {} questions)",
        upload.original_name,
        request.num_questions(),
        request.kind()
    );

    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()
        .map_err(|e| QuizGenError::Internal(format!("failed to build HTTP client: {e}")))?;

    // ── Step 1: Object-store put ─────────────────────────────────────────
    // Failing here costs nothing downstream; the store is the cheapest
    // collaborator to fail against.
    let store = storage::ObjectStore::new(
        http_client.clone(),
        &config.storage_endpoint,
        &config.storage_bucket,
        config.storage_token.clone(),
    );
    let document_url = store.put(&upload.path, &upload.stored_name).await?;

    // ── Step 2: Document conversion ──────────────────────────────────────
    let converter = extract::Converter::new(
        http_client.clone(),
        &config.converter_endpoint,
        &config.converter_api_key,
        Some(config.llm_api_key.clone()),
    );
    let text_url = converter.convert(&document_url).await?;

    // ── Step 3: Fetch extracted text ─────────────────────────────────────
    let source_text = extract::fetch_text(&http_client, &text_url).await?;
    debug!("Extracted text: {} chars", source_text.len());

    // ── Step 4: Build prompt, call the model once ────────────────────────
    let prompt = prompts::build_prompt(&source_text, request.num_questions(), request.kind());
    debug!("Prompt:\n{prompt}");

    let llm_client = reqwest::Client::builder()
        .timeout(config.llm_timeout())
        .build()
        .map_err(|e| QuizGenError::Internal(format!("failed to build HTTP client: {e}")))?;
    let completions = llm::CompletionClient::new(
        llm_client,
        &config.llm_base_url,
        &config.llm_api_key,
        &config.model,
        config.temperature,
    );
    let completion = completions.complete(&prompt).await?;
    debug!("Raw completion:\n{completion}");

    // ── Step 5: Parse into questions ─────────────────────────────────────
    let questions = parse::parse_quiz(&completion, request.kind());
    if questions.len() != request.num_questions() {
        warn!(
            "Model produced {} parseable questions, {} were requested",
            questions.len(),
            request.num_questions()
        );
    }

    info!(
        "Quiz generated: {} questions in {:?}",
        questions.len(),
        total_start.elapsed()
    );
    Ok(questions)
}
