use crate::core::rules;
use crate::core::sanitizer::strip_prompt_delimiters;
use crate::domain::model::{ClassificationResult, Urgency, DEFAULT_SUMMARY};
use crate::domain::ports::{SymptomClassifier, TextGenerator};
use crate::utils::error::{Result, TriageError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

const SPECIALTY_LABEL: &str = "SPECIALTY:";
const URGENCY_LABEL: &str = "URGENCY:";
const SUMMARY_LABEL: &str = "SUMMARY:";

/// Offline classifier backed by the ordered keyword table in [`rules::RULES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_text(&self, text: &str) -> ClassificationResult {
        let preview: String = text.chars().take(100).collect();
        tracing::debug!("📏 Rule-based analysis input: {}...", preview);

        let result = match rules::first_match(text) {
            Some(rule) => ClassificationResult::new(rule.specialty, rule.urgency, rule.summary),
            None => ClassificationResult::general_consultation(),
        };

        tracing::debug!("📏 Rule-based analysis result: {:?}", result);
        result
    }
}

#[async_trait]
impl SymptomClassifier for RuleBasedClassifier {
    async fn classify(&self, sanitized_text: &str) -> ClassificationResult {
        self.classify_text(sanitized_text)
    }

    fn name(&self) -> &'static str {
        "rule-based"
    }
}

/// Fields scanned out of a model response. Missing labels stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedModelResponse {
    pub specialty: String,
    pub urgency: String,
    pub summary: String,
}

/// Classifier that prompts a generative model and parses its labelled answer.
///
/// Transport errors, timeouts and answers without a `SPECIALTY:` line all fall
/// back to the rule-based result for the same text.
pub struct ModelClassifier {
    generator: Arc<dyn TextGenerator>,
    fallback: RuleBasedClassifier,
}

impl ModelClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            fallback: RuleBasedClassifier::new(),
        }
    }

    async fn ask_model(&self, prompt: &str) -> Result<String> {
        let seconds = self.generator.timeout_seconds();
        match tokio::time::timeout(Duration::from_secs(seconds), self.generator.generate(prompt))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(TriageError::ModelTimeout { seconds }),
        }
    }

    fn into_classification(
        &self,
        parsed: ParsedModelResponse,
        sanitized_text: &str,
    ) -> ClassificationResult {
        if parsed.specialty.is_empty() {
            tracing::warn!("⚠️ Model response had no SPECIALTY line, using rule-based result");
            return self.fallback.classify_text(sanitized_text);
        }

        let urgency = parse_urgency(&parsed.urgency).unwrap_or_else(|| {
            tracing::debug!("Unrecognised urgency '{}', using Medium", parsed.urgency);
            Urgency::Medium
        });

        let summary = if parsed.summary.is_empty() {
            DEFAULT_SUMMARY.to_string()
        } else {
            parsed.summary
        };

        ClassificationResult::new(parsed.specialty, urgency, summary)
    }
}

#[async_trait]
impl SymptomClassifier for ModelClassifier {
    async fn classify(&self, sanitized_text: &str) -> ClassificationResult {
        let prompt = build_prompt(sanitized_text);

        match self.ask_model(&prompt).await {
            Ok(response) => {
                tracing::debug!("🤖 Model output:\n{}", response);
                self.into_classification(parse_response(&response), sanitized_text)
            }
            Err(e) => {
                tracing::warn!("⚠️ Model classification failed: {}. Using rule-based fallback", e);
                self.fallback.classify_text(sanitized_text)
            }
        }
    }

    fn name(&self) -> &'static str {
        "model"
    }
}

/// 建立固定格式的分類提示詞
pub fn build_prompt(sanitized_text: &str) -> String {
    let text = strip_prompt_delimiters(sanitized_text);
    format!(
        "Analyze the following medical information and identify:
1. Primary medical specialty needed (e.g., Cardiology, Dermatology, Neurology, Orthopedics, Gastroenterology, Endocrinology, Pulmonology, Rheumatology, Dentistry, Ophthalmology, Psychiatry, Urology, Gynecology)
2. Urgency level (Low, Medium, High)
3. Brief summary of the condition

Patient input: {}

Respond in this exact format:
SPECIALTY: [specialty name]
URGENCY: [urgency level]
SUMMARY: [brief summary]",
        text
    )
}

/// Scan lines for the three labelled prefixes. A later line with the same label
/// overwrites an earlier one.
pub fn parse_response(response: &str) -> ParsedModelResponse {
    let mut parsed = ParsedModelResponse::default();

    for line in response.trim().lines() {
        if let Some(value) = labelled_value(line, SPECIALTY_LABEL) {
            parsed.specialty = value;
        } else if let Some(value) = labelled_value(line, URGENCY_LABEL) {
            parsed.urgency = value;
        } else if let Some(value) = labelled_value(line, SUMMARY_LABEL) {
            parsed.summary = value;
        }
    }

    parsed
}

fn labelled_value(line: &str, label: &str) -> Option<String> {
    let (_, value) = line.rsplit_once(label)?;
    // 移除 markdown 粗體/斜體符號
    Some(value.replace('*', "").trim().to_string())
}

/// Reads the first word of a model urgency value, e.g. "High - go to ER".
fn parse_urgency(value: &str) -> Option<Urgency> {
    value
        .split(|c: char| !c.is_alphabetic())
        .find(|word| !word.is_empty())
        .and_then(|word| word.parse().ok())
}
