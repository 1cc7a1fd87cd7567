//! Text generation through an Ollama-compatible HTTP server.

use crate::config::toml_config::ModelConfig;
use crate::domain::ports::TextGenerator;
use crate::utils::error::{Result, TriageError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pulling a multi-gigabyte model can take a long time.
const PULL_TIMEOUT_SECS: u64 = 3600;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct PullResponse {
    status: String,
}

pub struct OllamaGenerator {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: Client,
    timeout_secs: u64,
    probe_timeout_secs: u64,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaGenerator {
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.name.clone(),
            api_key: config.api_key.clone(),
            client,
            timeout_secs: config.timeout_seconds,
            probe_timeout_secs: config.probe_timeout_seconds,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) if !key.is_empty() => request.bearer_auth(key),
            _ => request,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> TriageError {
        if e.is_connect() {
            TriageError::ModelUnavailable {
                message: format!("cannot connect to {}", self.base_url),
            }
        } else if e.is_timeout() {
            TriageError::ModelTimeout {
                seconds: self.timeout_secs,
            }
        } else {
            TriageError::HttpError(e)
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TriageError::ModelResponseError {
            status: status.as_u16(),
            body,
        })
    }

    /// Whether `installed` lists the configured model, either by exact name or
    /// as `<model>:<tag>`.
    pub fn is_installed(&self, installed: &[String]) -> bool {
        installed.iter().any(|name| {
            name == &self.model
                || name
                    .strip_prefix(self.model.as_str())
                    .is_some_and(|tag| tag.starts_with(':'))
        })
    }

    /// Names of the models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);
        let request = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(self.probe_timeout_secs));

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let tags: TagsResponse = Self::check_status(response).await?.json().await?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Ask the server to download the configured model. Returns the final status.
    pub async fn pull_model(&self) -> Result<String> {
        let url = format!("{}/api/pull", self.base_url);
        let body = PullRequest {
            model: &self.model,
            stream: false,
        };
        let request = self
            .client
            .post(&url)
            .json(&body)
            .timeout(Duration::from_secs(PULL_TIMEOUT_SECS));

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let pulled: PullResponse = Self::check_status(response).await?.json().await?;

        Ok(pulled.status)
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        tracing::debug!("Sending prompt ({} chars) to {}", prompt.len(), url);
        let response = self
            .authorized(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let parsed: GenerateResponse = Self::check_status(response).await?.json().await?;
        Ok(parsed.response)
    }

    async fn is_available(&self) -> Result<bool> {
        let models = self.list_models().await?;
        Ok(self.is_installed(&models))
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_secs
    }
}
