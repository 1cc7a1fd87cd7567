//! Speech-to-text through an OpenAI-compatible transcription endpoint
//! (`POST /v1/audio/transcriptions`), as served by whisper.cpp, faster-whisper
//! and similar self-hosted servers.

use crate::config::toml_config::TranscriptionConfig;
use crate::domain::ports::Transcriber;
use crate::utils::error::{Result, TriageError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

pub struct WhisperTranscriber {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

impl WhisperTranscriber {
    pub fn from_config(config: &TranscriptionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: &[u8], file_name: &str) -> Result<String> {
        let url = format!("{}/v1/audio/transcriptions", self.base_url);
        let form = Form::new()
            .text("model", self.model.clone())
            .part(
                "file",
                Part::bytes(audio.to_vec()).file_name(file_name.to_string()),
            );

        let mut request = self.client.post(&url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!("🎤 Uploading {} bytes of audio to {}", audio.len(), url);
        let response = request
            .send()
            .await
            .map_err(|e| TriageError::TranscriptionError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TriageError::TranscriptionError {
                message: format!("server returned {}: {}", status.as_u16(), body),
            });
        }

        let parsed: TranscriptionResponse = response.json().await?;
        Ok(parsed.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn transcriber_for(server: &MockServer) -> WhisperTranscriber {
        WhisperTranscriber::from_config(&TranscriptionConfig {
            endpoint: server.base_url(),
            model: "whisper-1".to_string(),
            api_key: None,
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_transcribe_returns_text() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/audio/transcriptions")
                .body_contains("whisper-1")
                .body_contains("visit.wav");
            then.status(200)
                .json_body(serde_json::json!({"text": " I have a bad toothache. "}));
        });

        let text = transcriber_for(&server)
            .transcribe(b"RIFF....WAVE", "visit.wav")
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(text, "I have a bad toothache.");
    }

    #[tokio::test]
    async fn test_transcribe_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/audio/transcriptions");
            then.status(500).body("decoder crashed");
        });

        let err = transcriber_for(&server)
            .transcribe(b"noise", "visit.wav")
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::TranscriptionError { .. }));
        assert!(err.to_string().contains("decoder crashed"));
    }
}
