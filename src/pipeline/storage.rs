//! Object-store upload: put the scratch file where the converter can see it.
//!
//! The document-conversion service takes a URL, not bytes, so the uploaded
//! PDF must first land somewhere publicly resolvable. The store is an opaque
//! collaborator behind one call: `put(file) → public URL`. Any failure here
//! aborts the pipeline before a single LLM token is spent.

use crate::error::QuizGenError;
use std::path::Path;
use tracing::{debug, info};

/// Client for an S3-style object store: objects are PUT to
/// `{endpoint}/{bucket}/{key}` and readable from the same URL.
pub struct ObjectStore {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
    token: Option<String>,
}

impl ObjectStore {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            token,
        }
    }

    /// Upload a local file and return its publicly resolvable URL.
    pub async fn put(&self, local: &Path, key: &str) -> Result<String, QuizGenError> {
        let url = object_url(&self.endpoint, &self.bucket, key);

        let bytes = tokio::fs::read(local)
            .await
            .map_err(|e| QuizGenError::UploadFailed {
                reason: format!("could not read '{}': {e}", local.display()),
            })?;
        debug!("Uploading {} bytes to {}", bytes.len(), url);

        let mut request = self
            .client
            .put(&url)
            .header("Content-Type", "application/pdf")
            .body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| QuizGenError::UploadFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuizGenError::UploadFailed {
                reason: format!("HTTP {status}"),
            });
        }

        info!("Stored upload at {}", url);
        Ok(url)
    }
}

/// `{endpoint}/{bucket}/{key}`, tolerant of a trailing slash on the endpoint.
fn object_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_has_no_double_slash() {
        assert_eq!(
            object_url("https://store.example.com/", "quiz-uploads", "slides.pdf"),
            "https://store.example.com/quiz-uploads/slides.pdf"
        );
        assert_eq!(
            object_url("https://store.example.com", "quiz-uploads", "slides.pdf"),
            "https://store.example.com/quiz-uploads/slides.pdf"
        );
    }
}
