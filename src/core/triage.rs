use crate::adapters::document::DocumentExtractor;
use crate::adapters::roster::{builtin_roster, load_roster};
use crate::adapters::transcription::WhisperTranscriber;
use crate::config::toml_config::{AppConfig, MIN_DOCUMENT_CHARS};
use crate::core::analyzer::SymptomAnalyzer;
use crate::core::ranker::DoctorRanker;
use crate::core::sanitizer::is_sufficient;
use crate::domain::model::{ClassificationResult, InputSource, PricePreference, TriageReport};
use crate::domain::ports::{TextExtractor, Transcriber};
use crate::utils::error::{Result, TriageError};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

pub const EXTRACTION_WARNING: &str =
    "Could not extract text from document. Please try another file.";
pub const NO_SPEECH_WARNING: &str = "No speech was recognized in the recording.";

/// One of the three ways a user can describe symptoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymptomInput {
    Text(String),
    Document(PathBuf),
    Audio(PathBuf),
}

/// Runs acquisition, analysis and ranking for a single request.
#[derive(Clone)]
pub struct TriageEngine {
    analyzer: SymptomAnalyzer,
    ranker: DoctorRanker,
    extractor: Arc<dyn TextExtractor>,
    transcriber: Option<Arc<dyn Transcriber>>,
    min_document_chars: usize,
}

impl TriageEngine {
    pub fn new(analyzer: SymptomAnalyzer, ranker: DoctorRanker) -> Self {
        Self {
            analyzer,
            ranker,
            extractor: Arc::new(DocumentExtractor::new()),
            transcriber: None,
            min_document_chars: MIN_DOCUMENT_CHARS,
        }
    }

    /// Build the process-wide engine: load the roster once, pick the classifier
    /// once and set up transcription when it is configured.
    pub async fn from_config(config: &AppConfig, use_model: bool) -> Result<Self> {
        let roster = match &config.roster {
            Some(roster_config) => load_roster(&roster_config.path)?,
            None => builtin_roster()?,
        };
        tracing::debug!("Roster has {} doctors", roster.len());

        let analyzer = SymptomAnalyzer::initialize(config, use_model).await;
        let mut engine = Self::new(analyzer, DoctorRanker::new(roster))
            .with_min_document_chars(config.input.min_document_chars);

        match &config.transcription {
            Some(transcription) => {
                engine = engine.with_transcriber(Arc::new(WhisperTranscriber::from_config(
                    transcription,
                )?));
            }
            None => tracing::debug!("🎤 Voice input not configured"),
        }

        Ok(engine)
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn with_min_document_chars(mut self, min_document_chars: usize) -> Self {
        self.min_document_chars = min_document_chars;
        self
    }

    pub fn analyzer(&self) -> &SymptomAnalyzer {
        &self.analyzer
    }

    pub fn ranker(&self) -> &DoctorRanker {
        &self.ranker
    }

    pub fn supports_voice(&self) -> bool {
        self.transcriber.is_some()
    }

    pub async fn run(&self, input: SymptomInput, preference: PricePreference) -> Result<TriageReport> {
        tracing::info!("🩺 Starting symptom analysis");

        let mut warnings = Vec::new();
        let (source, text) = self.acquire(input, &mut warnings).await?;

        let analysis = if matches!(source, InputSource::Document { .. })
            && !is_sufficient(&text, self.min_document_chars)
        {
            // 文件內容不足，不進行分類
            ClassificationResult::insufficient_information()
        } else {
            self.analyzer.analyze(&text).await
        };

        tracing::info!(
            "✅ Recommended specialty: {} (urgency: {})",
            analysis.specialty,
            analysis.urgency
        );

        let doctors = self.ranker.find_doctors(&analysis.specialty, preference);
        tracing::info!("👩‍⚕️ Found {} recommended doctors", doctors.len());

        Ok(TriageReport {
            source,
            analysis,
            price_preference: preference,
            doctors,
            warnings,
            analyzed_at: Utc::now(),
        })
    }

    async fn acquire(
        &self,
        input: SymptomInput,
        warnings: &mut Vec<String>,
    ) -> Result<(InputSource, String)> {
        match input {
            SymptomInput::Text(text) => Ok((InputSource::Text, text)),
            SymptomInput::Document(path) => {
                tracing::info!("📄 Processing document {}", path.display());
                let file = path.display().to_string();
                let extractor = Arc::clone(&self.extractor);

                let text = tokio::task::spawn_blocking(move || extractor.extract_text(&path))
                    .await
                    .unwrap_or_else(|e| {
                        tracing::warn!("⚠️ Document extraction task failed: {}", e);
                        String::new()
                    });

                if !is_sufficient(&text, self.min_document_chars) {
                    warnings.push(EXTRACTION_WARNING.to_string());
                }
                Ok((InputSource::Document { file }, text))
            }
            SymptomInput::Audio(path) => {
                let transcriber =
                    self.transcriber
                        .as_ref()
                        .ok_or_else(|| TriageError::CapabilityUnavailable {
                            capability: "Voice input".to_string(),
                        })?;

                tracing::info!("🎤 Transcribing {}", path.display());
                let audio = tokio::fs::read(&path).await?;
                let file_name = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or("audio.wav")
                    .to_string();

                let text = transcriber.transcribe(&audio, &file_name).await?;
                tracing::info!("🎤 Recognized: {}", text);
                if text.trim().is_empty() {
                    warnings.push(NO_SPEECH_WARNING.to_string());
                }

                Ok((
                    InputSource::Voice {
                        file: path.display().to_string(),
                    },
                    text,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Urgency, GENERAL_MEDICINE};
    use async_trait::async_trait;
    use std::path::Path;

    struct FixedExtractor(&'static str);

    impl TextExtractor for FixedExtractor {
        fn extract_text(&self, _path: &Path) -> String {
            self.0.to_string()
        }
    }

    struct FixedTranscriber(&'static str);

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _audio: &[u8], _file_name: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn engine() -> TriageEngine {
        TriageEngine::new(
            SymptomAnalyzer::rule_based(),
            DoctorRanker::new(builtin_roster().unwrap()),
        )
    }

    #[tokio::test]
    async fn test_text_input_end_to_end() {
        let report = engine()
            .run(
                SymptomInput::Text("chest pain and palpitations".to_string()),
                PricePreference::Low,
            )
            .await
            .unwrap();

        assert_eq!(report.source, InputSource::Text);
        assert_eq!(report.analysis.specialty, "Cardiology");
        assert_eq!(report.analysis.urgency, Urgency::High);
        assert_eq!(report.doctors.len(), 3);
        assert!(report.doctors.iter().all(|d| d.specialty == "Cardiology"));
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_document_input_uses_extractor() {
        let engine = engine().with_extractor(Arc::new(FixedExtractor(
            "Referral: persistent migraine with aura",
        )));

        let report = engine
            .run(
                SymptomInput::Document(PathBuf::from("referral.pdf")),
                PricePreference::Medium,
            )
            .await
            .unwrap();

        assert_eq!(
            report.source,
            InputSource::Document {
                file: "referral.pdf".to_string()
            }
        );
        assert_eq!(report.analysis.specialty, "Neurology");
    }

    #[tokio::test]
    async fn test_unreadable_document_warns_instead_of_failing() {
        let engine = engine().with_extractor(Arc::new(FixedExtractor("  rash ")));

        let report = engine
            .run(
                SymptomInput::Document(PathBuf::from("scan.pdf")),
                PricePreference::Medium,
            )
            .await
            .unwrap();

        assert_eq!(report.warnings, vec![EXTRACTION_WARNING.to_string()]);
        assert_eq!(report.analysis, ClassificationResult::insufficient_information());
        assert!(report
            .doctors
            .iter()
            .all(|d| d.specialty == GENERAL_MEDICINE));
    }

    #[tokio::test]
    async fn test_audio_without_transcriber_is_unavailable() {
        let err = engine()
            .run(
                SymptomInput::Audio(PathBuf::from("visit.wav")),
                PricePreference::Medium,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TriageError::CapabilityUnavailable { .. }));
        assert!(err.recovery_suggestion().contains("--file"));
    }

    #[tokio::test]
    async fn test_audio_input_is_transcribed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("visit.wav");
        std::fs::write(&path, b"RIFF").unwrap();

        let engine = engine().with_transcriber(Arc::new(FixedTranscriber(
            "my wisdom tooth is killing me",
        )));
        assert!(engine.supports_voice());

        let report = engine
            .run(SymptomInput::Audio(path), PricePreference::High)
            .await
            .unwrap();

        assert!(matches!(report.source, InputSource::Voice { .. }));
        assert_eq!(report.analysis.specialty, "Dentistry");
        assert_eq!(report.doctors[0].name, "Dr. Nina Patel");
    }

    #[tokio::test]
    async fn test_report_serializes_to_json() {
        let report = engine()
            .run(
                SymptomInput::Text("itchy skin rash".to_string()),
                PricePreference::Medium,
            )
            .await
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["source"]["kind"], "text");
        assert_eq!(json["analysis"]["specialty"], "Dermatology");
        assert_eq!(json["price_preference"], "medium");
        assert_eq!(json["doctors"].as_array().unwrap().len(), 2);
    }
}
