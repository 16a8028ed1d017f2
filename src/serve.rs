//! HTTP surface: upload form, generation endpoint, quiz view, grading view.
//!
//! Four routes over the library pipeline:
//!
//! * `GET  /`     — upload form
//! * `POST /`     — multipart upload → full pipeline run → redirect to `/quiz`
//! * `GET  /quiz` — the session's active quiz (empty state if none)
//! * `POST /quiz` — submitted answers → graded results view
//!
//! Sessions are a `sid` cookie holding a v4 UUID; the quiz store maps that id
//! to the active quiz. Handlers stay thin — validation, generation, and
//! grading all live in the library so the interesting logic is testable
//! without a server.
//!
//! ## User-visible errors
//!
//! Validation problems (no file, not a `.pdf`) echo a specific plain-text
//! message. An object-store failure reports "upload failed". Every other
//! fault — converter, fetch, completion API — collapses into one generic
//! response; the detail goes to the log, never to the browser.

use crate::config::QuizConfig;
use crate::error::QuizGenError;
use crate::generate::{generate_quiz, QuizRequest};
use crate::grade::grade;
use crate::pipeline::input::persist_upload;
use crate::quiz::{Question, QuestionKind, QuizReport};
use crate::session::QuizStore;
use axum::extract::{Form, Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Shared state injected into every handler: the pipeline configuration and
/// the session-keyed quiz store. No ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<QuizConfig>,
    pub quizzes: QuizStore,
}

impl AppState {
    pub fn new(config: QuizConfig) -> Self {
        Self {
            config: Arc::new(config),
            quizzes: QuizStore::new(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(create_quiz))
        .route("/quiz", get(show_quiz).post(submit_answers))
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn index() -> Html<String> {
    Html(render_index())
}

async fn create_quiz(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let upload = match read_upload_form(multipart).await {
        Ok(upload) => upload,
        Err(e) => return error_response(&e),
    };
    let request = match QuizRequest::new(upload.num_questions, upload.kind) {
        Ok(request) => request,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                "Number of questions must be at least 1.",
            )
                .into_response()
        }
    };

    let saved = match persist_upload(&state.config.scratch_dir, &upload.filename, &upload.bytes).await
    {
        Ok(saved) => saved,
        Err(e) => return error_response(&e),
    };

    let questions = match generate_quiz(&saved, &request, &state.config).await {
        Ok(questions) => questions,
        Err(e) => return error_response(&e),
    };

    let (session, fresh) = session_or_new(&headers);
    state.quizzes.replace(session, questions);
    info!("Stored new quiz for session {session}");

    let redirect = Redirect::to("/quiz");
    if fresh {
        ([(header::SET_COOKIE, session_cookie(session))], redirect).into_response()
    } else {
        redirect.into_response()
    }
}

async fn show_quiz(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let quiz = session_id(&headers)
        .and_then(|session| state.quizzes.get(session))
        .unwrap_or_default();
    Html(render_quiz(&quiz))
}

async fn submit_answers(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Html<String> {
    let quiz = session_id(&headers)
        .and_then(|session| state.quizzes.get(session))
        .unwrap_or_default();

    // Only form keys that are question ids count as answers; the rest
    // (submit buttons etc.) are noise.
    let answers: HashMap<Uuid, String> = form
        .into_iter()
        .filter_map(|(key, value)| Uuid::parse_str(&key).ok().map(|id| (id, value)))
        .collect();

    let report = grade(quiz, &answers);
    Html(render_results(&report))
}

// ── Upload form parsing ──────────────────────────────────────────────────

struct UploadForm {
    filename: String,
    bytes: Vec<u8>,
    num_questions: usize,
    kind: QuestionKind,
}

/// Pull the three expected fields out of the multipart body.
///
/// A missing file maps to the same validation error the pipeline uses, so
/// the user sees one consistent message regardless of where the absence is
/// noticed.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, QuizGenError> {
    let mut filename = None;
    let mut bytes = None;
    let mut num_questions = None;
    let mut kind = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| QuizGenError::Internal(format!("unreadable multipart body: {e}")))?
    {
        // Detach the name: reading the field's body consumes the field.
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("pdf") => {
                filename = field.file_name().map(str::to_string);
                bytes = Some(field.bytes().await.map_err(|e| {
                    QuizGenError::Internal(format!("failed to read upload: {e}"))
                })?);
            }
            Some("num_questions") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| QuizGenError::Internal(format!("unreadable field: {e}")))?;
                num_questions = raw.trim().parse::<usize>().ok();
            }
            Some("question_type") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| QuizGenError::Internal(format!("unreadable field: {e}")))?;
                kind = raw.trim().parse::<QuestionKind>().ok();
            }
            _ => {}
        }
    }

    let filename = filename.filter(|f| !f.is_empty()).ok_or(QuizGenError::MissingUpload)?;
    let bytes = bytes.ok_or(QuizGenError::MissingUpload)?;
    let num_questions = num_questions.ok_or_else(|| {
        QuizGenError::InvalidConfig("num_questions must be a positive integer".into())
    })?;
    let kind = kind.ok_or_else(|| {
        QuizGenError::InvalidConfig("question_type must be multiple_choice or true_false".into())
    })?;

    Ok(UploadForm {
        filename,
        bytes: bytes.to_vec(),
        num_questions,
        kind,
    })
}

// ── Error mapping ────────────────────────────────────────────────────────

fn error_response(err: &QuizGenError) -> Response {
    if err.is_validation() {
        return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
    }
    if matches!(err, QuizGenError::UploadFailed { .. }) {
        error!("Object-store upload failed: {err}");
        return (StatusCode::BAD_GATEWAY, "Error: file upload failed.").into_response();
    }
    if let QuizGenError::InvalidConfig(detail) = err {
        return (StatusCode::BAD_REQUEST, detail.clone()).into_response();
    }

    // Converter, fetch, LLM, and internal faults: log the detail, show the
    // user nothing specific.
    error!(
        "Quiz generation failed (transient: {}): {err}",
        err.is_transient()
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Something went wrong generating the quiz. Please try again.",
    )
        .into_response()
}

// ── Session cookie ───────────────────────────────────────────────────────

const SESSION_COOKIE: &str = "sid";

/// Extract the session id from the `Cookie` header, if present and valid.
fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
}

/// The caller's session id, or a freshly minted one (`true` = needs a
/// `Set-Cookie`).
fn session_or_new(headers: &HeaderMap) -> (Uuid, bool) {
    match session_id(headers) {
        Some(session) => (session, false),
        None => (Uuid::new_v4(), true),
    }
}

fn session_cookie(session: Uuid) -> String {
    format!("{SESSION_COOKIE}={session}; Path=/; HttpOnly; SameSite=Lax")
}

// ── Views ────────────────────────────────────────────────────────────────
//
// The views are deliberately plain: three small HTML pages with no client
// script, rendered straight from the typed model. Everything user- or
// model-authored passes through `escape`.

fn render_index() -> String {
    page(
        "Generate a quiz",
        r#"<h1>PDF to Quiz</h1>
<form method="post" action="/" enctype="multipart/form-data">
  <p><label>Lecture PDF <input type="file" name="pdf" accept=".pdf" required></label></p>
  <p><label>Number of questions <input type="number" name="num_questions" value="5" min="1" required></label></p>
  <p><label>Question type
    <select name="question_type">
      <option value="multiple_choice">Multiple choice</option>
      <option value="true_false">True / false</option>
    </select>
  </label></p>
  <p><button type="submit">Generate quiz</button></p>
</form>"#,
    )
}

fn render_quiz(quiz: &[Question]) -> String {
    if quiz.is_empty() {
        return page(
            "Quiz",
            r#"<h1>No quiz yet</h1><p>Upload a PDF on the <a href="/">start page</a> to generate one.</p>"#,
        );
    }

    let mut body = String::from("<h1>Quiz</h1>\n<form method=\"post\" action=\"/quiz\">\n");
    for (i, question) in quiz.iter().enumerate() {
        body.push_str(&format!(
            "<fieldset>\n<legend>{}. {}</legend>\n",
            i + 1,
            escape(&question.prompt_text)
        ));
        for (label, text) in &question.options {
            body.push_str(&format!(
                "<p><label><input type=\"radio\" name=\"{}\" value=\"{}\"> {}. {}</label></p>\n",
                question.id,
                escape(label),
                escape(label),
                escape(text)
            ));
        }
        body.push_str("</fieldset>\n");
    }
    body.push_str("<p><button type=\"submit\">Submit answers</button></p>\n</form>");
    page("Quiz", &body)
}

fn render_results(report: &QuizReport) -> String {
    let mut body = format!(
        "<h1>Results</h1>\n<p>You scored {} out of {}.</p>\n",
        report.correct_count, report.total_count
    );
    for (i, question) in report.questions.iter().enumerate() {
        let verdict = if question.is_correct == Some(true) {
            "correct"
        } else {
            "incorrect"
        };
        let submitted = question
            .submitted_label
            .as_deref()
            .unwrap_or("(no answer)");
        body.push_str(&format!(
            "<div class=\"{verdict}\">\n<h2>{}. {}</h2>\n<p>Your answer: {} — {}</p>\n<p>Correct answer: {}</p>\n",
            i + 1,
            escape(&question.prompt_text),
            escape(submitted),
            verdict,
            escape(&question.correct_label)
        ));
        if !question.explanation.is_empty() {
            body.push_str(&format!("<p>{}</p>\n", escape(&question.explanation)));
        }
        body.push_str("</div>\n");
    }
    body.push_str("<p><a href=\"/\">Generate another quiz</a></p>");
    page("Results", &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn session_id_parses_sid_cookie() {
        let session = Uuid::new_v4();
        let headers = headers_with_cookie(&format!("theme=dark; sid={session}; lang=en"));
        assert_eq!(session_id(&headers), Some(session));
    }

    #[test]
    fn session_id_rejects_garbage() {
        assert_eq!(session_id(&headers_with_cookie("sid=not-a-uuid")), None);
        assert_eq!(session_id(&headers_with_cookie("other=1")), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn session_or_new_mints_when_absent() {
        let (session, fresh) = session_or_new(&HeaderMap::new());
        assert!(fresh);
        let headers = headers_with_cookie(&format!("sid={session}"));
        assert_eq!(session_or_new(&headers), (session, false));
    }

    #[test]
    fn session_cookie_is_scoped_and_http_only() {
        let cookie = session_cookie(Uuid::new_v4());
        assert!(cookie.starts_with("sid="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn escape_neutralises_markup() {
        assert_eq!(
            escape(r#"<script>alert("1")</script>"#),
            "&lt;script&gt;alert(&quot;1&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("a & b"), "a &amp; b");
    }

    #[test]
    fn quiz_view_renders_one_radio_group_per_question() {
        let quiz = vec![
            Question::new(
                "Stack or heap?".into(),
                QuestionKind::MultipleChoice,
                vec![("A".into(), "stack".into()), ("B".into(), "heap".into())],
                "A".into(),
                String::new(),
            ),
            Question::new(
                "Rust is compiled.".into(),
                QuestionKind::TrueFalse,
                Question::true_false_options(),
                "True".into(),
                String::new(),
            ),
        ];
        let html = render_quiz(&quiz);
        assert!(html.contains("Stack or heap?"));
        assert!(html.contains(&quiz[0].id.to_string()));
        assert!(html.contains(&quiz[1].id.to_string()));
        assert_eq!(html.matches("<fieldset>").count(), 2);
        assert_eq!(html.matches("type=\"radio\"").count(), 4);
    }

    #[test]
    fn empty_quiz_view_points_back_to_upload() {
        let html = render_quiz(&[]);
        assert!(html.contains("No quiz yet"));
        assert!(html.contains("href=\"/\""));
    }

    #[test]
    fn results_view_shows_score_and_explanations() {
        let mut question = Question::new(
            "2 + 2?".into(),
            QuestionKind::MultipleChoice,
            vec![("A".into(), "4".into()), ("B".into(), "5".into())],
            "A".into(),
            "Basic arithmetic.".into(),
        );
        question.submitted_label = Some("A".into());
        question.is_correct = Some(true);
        let report = QuizReport {
            questions: vec![question],
            correct_count: 1,
            total_count: 1,
        };
        let html = render_results(&report);
        assert!(html.contains("You scored 1 out of 1."));
        assert!(html.contains("Basic arithmetic."));
        assert!(html.contains("correct"));
    }

    #[test]
    fn model_authored_text_is_escaped_in_views() {
        let question = Question::new(
            "<b>bold?</b>".into(),
            QuestionKind::TrueFalse,
            Question::true_false_options(),
            "True".into(),
            String::new(),
        );
        let html = render_quiz(&[question]);
        assert!(html.contains("&lt;b&gt;bold?&lt;/b&gt;"));
        assert!(!html.contains("<b>bold?</b>"));
    }
}
