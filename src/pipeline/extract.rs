//! Document conversion: turn the stored PDF's URL into extracted text.
//!
//! Two hops, both through opaque collaborators:
//!
//! 1. **Convert** — submit the PDF's public URL to the conversion service;
//!    it answers with a second URL pointing at the extracted, LLM-ready text.
//! 2. **Fetch** — plain GET of that result URL for the text body.
//!
//! The converter also receives the completion API key because the service
//! runs its own model-assisted extraction pass under the caller's account.

use crate::error::QuizGenError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct ConvertRequest<'a> {
    input: ConvertInput<'a>,
}

#[derive(Debug, Serialize)]
struct ConvertInput<'a> {
    doc: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    openai_api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    output: String,
}

/// Client for the document-to-text conversion service.
pub struct Converter {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    llm_api_key: Option<String>,
}

impl Converter {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        llm_api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            llm_api_key,
        }
    }

    /// Submit the document URL for conversion; returns the result-text URL.
    pub async fn convert(&self, document_url: &str) -> Result<String, QuizGenError> {
        info!("Submitting document for conversion: {}", document_url);
        let body = ConvertRequest {
            input: ConvertInput {
                doc: document_url,
                openai_api_key: self.llm_api_key.as_deref(),
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| QuizGenError::ConversionFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuizGenError::ConversionFailed {
                reason: format!("HTTP {status}"),
            });
        }

        let parsed: ConvertResponse =
            response
                .json()
                .await
                .map_err(|e| QuizGenError::ConversionFailed {
                    reason: format!("unreadable response: {e}"),
                })?;
        debug!("Converter produced result URL: {}", parsed.output);
        Ok(parsed.output)
    }
}

/// Fetch the extracted text from the converter's result URL.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, QuizGenError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| QuizGenError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(QuizGenError::FetchFailed {
            url: url.to_string(),
            reason: format!("HTTP {status}"),
        });
    }

    response.text().await.map_err(|e| QuizGenError::FetchFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_request_shape() {
        let body = ConvertRequest {
            input: ConvertInput {
                doc: "https://store.example.com/b/doc.pdf",
                openai_api_key: Some("sk-test"),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["input"]["doc"], "https://store.example.com/b/doc.pdf");
        assert_eq!(json["input"]["openai_api_key"], "sk-test");
    }

    #[test]
    fn convert_request_omits_absent_key() {
        let body = ConvertRequest {
            input: ConvertInput {
                doc: "https://x/doc.pdf",
                openai_api_key: None,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["input"].get("openai_api_key").is_none());
    }

    #[test]
    fn convert_response_parses() {
        let parsed: ConvertResponse =
            serde_json::from_str(r#"{"output":"https://cdn.example.com/text.md","extra":1}"#)
                .unwrap();
        assert_eq!(parsed.output, "https://cdn.example.com/text.md");
    }
}
