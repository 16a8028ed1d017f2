//! Configuration for quiz generation.
//!
//! All pipeline behaviour is controlled through [`QuizConfig`], built via its
//! [`QuizConfigBuilder`] or loaded from the environment with
//! [`QuizConfig::from_env`]. Keeping every knob in one struct makes it
//! trivial to share across handlers and to see at a glance which collaborator
//! each credential belongs to.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about; required collaborator
//! settings are validated once in `build()` instead of failing deep inside a
//! request.

use crate::error::QuizGenError;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the generation pipeline and its three collaborators.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    /// Directory uploads are persisted to before the object-store put.
    /// Created on startup if absent. Default: `uploads`.
    pub scratch_dir: PathBuf,

    /// Object-store endpoint, e.g. `https://storage.example.com`.
    pub storage_endpoint: String,
    /// Bucket the uploads land in; part of the public URL.
    pub storage_bucket: String,
    /// Optional bearer token for the store. Public-write buckets need none.
    pub storage_token: Option<String>,

    /// Document-conversion service endpoint.
    pub converter_endpoint: String,
    /// API key for the conversion service.
    pub converter_api_key: String,

    /// Base URL of the OpenAI-compatible completion API.
    /// Default: `https://api.openai.com/v1`.
    pub llm_base_url: String,
    /// API key for the completion API.
    pub llm_api_key: String,
    /// Model identifier. Default: `gpt-4`.
    pub model: String,

    /// Sampling temperature for the completion. Default: 0.7.
    ///
    /// High enough that repeated runs over the same document produce varied
    /// questions, low enough that the model sticks to the requested format.
    pub temperature: f32,

    /// Timeout for store/converter/fetch requests in seconds. Default: 120.
    ///
    /// These calls move documents around; two minutes covers large PDFs on
    /// slow links without letting one dead collaborator pin a request
    /// forever.
    pub http_timeout_secs: u64,

    /// Timeout for the completion call in seconds. Default: 300.
    ///
    /// Generating twenty questions over a long document can take minutes of
    /// model time; this is deliberately far above `http_timeout_secs`.
    pub llm_timeout_secs: u64,
}

impl QuizConfig {
    pub fn builder() -> QuizConfigBuilder {
        QuizConfigBuilder::default()
    }

    /// Load configuration from the environment.
    ///
    /// Required: `STORAGE_ENDPOINT`, `STORAGE_BUCKET`, `CONVERTER_ENDPOINT`,
    /// `CONVERTER_API_KEY`, `LLM_API_KEY`. Everything else falls back to the
    /// builder defaults; `STORAGE_TOKEN`, `LLM_BASE_URL`, `LLM_MODEL`,
    /// `LLM_TEMPERATURE`, `SCRATCH_DIR`, `HTTP_TIMEOUT_SECS`, and
    /// `LLM_TIMEOUT_SECS` override them.
    pub fn from_env() -> Result<Self, QuizGenError> {
        let mut builder = Self::builder()
            .storage_endpoint(require_env("STORAGE_ENDPOINT")?)
            .storage_bucket(require_env("STORAGE_BUCKET")?)
            .converter_endpoint(require_env("CONVERTER_ENDPOINT")?)
            .converter_api_key(require_env("CONVERTER_API_KEY")?)
            .llm_api_key(require_env("LLM_API_KEY")?);

        if let Ok(token) = std::env::var("STORAGE_TOKEN") {
            builder = builder.storage_token(token);
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            builder = builder.llm_base_url(url);
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            builder = builder.model(model);
        }
        if let Ok(dir) = std::env::var("SCRATCH_DIR") {
            builder = builder.scratch_dir(dir);
        }
        if let Ok(raw) = std::env::var("LLM_TEMPERATURE") {
            let t = raw.parse().map_err(|_| {
                QuizGenError::InvalidConfig(format!("LLM_TEMPERATURE is not a number: '{raw}'"))
            })?;
            builder = builder.temperature(t);
        }
        if let Ok(raw) = std::env::var("HTTP_TIMEOUT_SECS") {
            let secs = raw.parse().map_err(|_| {
                QuizGenError::InvalidConfig(format!("HTTP_TIMEOUT_SECS is not an integer: '{raw}'"))
            })?;
            builder = builder.http_timeout_secs(secs);
        }
        if let Ok(raw) = std::env::var("LLM_TIMEOUT_SECS") {
            let secs = raw.parse().map_err(|_| {
                QuizGenError::InvalidConfig(format!("LLM_TIMEOUT_SECS is not an integer: '{raw}'"))
            })?;
            builder = builder.llm_timeout_secs(secs);
        }

        builder.build()
    }

    /// Timeout for store/converter/fetch requests.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Timeout for the completion call.
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

fn require_env(name: &str) -> Result<String, QuizGenError> {
    std::env::var(name)
        .map_err(|_| QuizGenError::InvalidConfig(format!("environment variable {name} is not set")))
}

/// Builder for [`QuizConfig`].
#[derive(Debug, Default, Clone)]
pub struct QuizConfigBuilder {
    scratch_dir: Option<PathBuf>,
    storage_endpoint: Option<String>,
    storage_bucket: Option<String>,
    storage_token: Option<String>,
    converter_endpoint: Option<String>,
    converter_api_key: Option<String>,
    llm_base_url: Option<String>,
    llm_api_key: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    http_timeout_secs: Option<u64>,
    llm_timeout_secs: Option<u64>,
}

impl QuizConfigBuilder {
    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn storage_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.storage_endpoint = Some(endpoint.into());
        self
    }

    pub fn storage_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.storage_bucket = Some(bucket.into());
        self
    }

    pub fn storage_token(mut self, token: impl Into<String>) -> Self {
        self.storage_token = Some(token.into());
        self
    }

    pub fn converter_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.converter_endpoint = Some(endpoint.into());
        self
    }

    pub fn converter_api_key(mut self, key: impl Into<String>) -> Self {
        self.converter_api_key = Some(key.into());
        self
    }

    pub fn llm_base_url(mut self, url: impl Into<String>) -> Self {
        self.llm_base_url = Some(url.into());
        self
    }

    pub fn llm_api_key(mut self, key: impl Into<String>) -> Self {
        self.llm_api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = Some(secs);
        self
    }

    pub fn llm_timeout_secs(mut self, secs: u64) -> Self {
        self.llm_timeout_secs = Some(secs);
        self
    }

    /// Validate and build the config.
    pub fn build(self) -> Result<QuizConfig, QuizGenError> {
        let required = |field: Option<String>, name: &str| {
            field
                .filter(|v| !v.is_empty())
                .ok_or_else(|| QuizGenError::InvalidConfig(format!("{name} is required")))
        };

        let temperature = self.temperature.unwrap_or(0.7);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(QuizGenError::InvalidConfig(format!(
                "temperature must be within 0.0–2.0, got {temperature}"
            )));
        }

        let http_timeout_secs = self.http_timeout_secs.unwrap_or(120);
        let llm_timeout_secs = self.llm_timeout_secs.unwrap_or(300);
        if http_timeout_secs == 0 || llm_timeout_secs == 0 {
            return Err(QuizGenError::InvalidConfig(
                "timeouts must be non-zero".into(),
            ));
        }

        Ok(QuizConfig {
            scratch_dir: self.scratch_dir.unwrap_or_else(|| PathBuf::from("uploads")),
            storage_endpoint: required(self.storage_endpoint, "storage_endpoint")?,
            storage_bucket: required(self.storage_bucket, "storage_bucket")?,
            storage_token: self.storage_token,
            converter_endpoint: required(self.converter_endpoint, "converter_endpoint")?,
            converter_api_key: required(self.converter_api_key, "converter_api_key")?,
            llm_base_url: self
                .llm_base_url
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            llm_api_key: required(self.llm_api_key, "llm_api_key")?,
            model: self.model.unwrap_or_else(|| "gpt-4".to_string()),
            temperature,
            http_timeout_secs,
            llm_timeout_secs,
        })
    }
}
