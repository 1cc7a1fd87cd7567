use crate::domain::model::ClassificationResult;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Maps sanitized symptom text to a specialty, urgency and summary.
///
/// Implementations are total: every input yields a result and internal
/// failures degrade to [`ClassificationResult::general_consultation`].
#[async_trait]
pub trait SymptomClassifier: Send + Sync {
    async fn classify(&self, sanitized_text: &str) -> ClassificationResult;

    /// 分類器名稱，用於日誌
    fn name(&self) -> &'static str;
}

/// Generative model inference.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    async fn is_available(&self) -> Result<bool>;

    /// Upper bound a caller should wait for one `generate` call.
    fn timeout_seconds(&self) -> u64;
}

/// Document text extraction. Failures yield an empty string.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> String;
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8], file_name: &str) -> Result<String>;
}
