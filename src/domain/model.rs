use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const GENERAL_MEDICINE: &str = "General Medicine";
pub const DEFAULT_SUMMARY: &str = "General medical consultation needed";
pub const INSUFFICIENT_SUMMARY: &str = "Insufficient information provided";

/// 單次請求的症狀描述，清理後即不可變更
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomReport {
    raw_text: String,
    sanitized_text: String,
}

impl SymptomReport {
    pub fn new(raw_text: String, sanitized_text: String) -> Self {
        Self {
            raw_text,
            sanitized_text,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn sanitized_text(&self) -> &str {
        &self.sanitized_text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" | "moderate" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            other => Err(format!("unknown urgency level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub specialty: String,
    pub urgency: Urgency,
    pub summary: String,
}

impl ClassificationResult {
    pub fn new(specialty: impl Into<String>, urgency: Urgency, summary: impl Into<String>) -> Self {
        Self {
            specialty: specialty.into(),
            urgency,
            summary: summary.into(),
        }
    }

    /// 無法判斷時的預設結果
    pub fn general_consultation() -> Self {
        Self::new(GENERAL_MEDICINE, Urgency::Medium, DEFAULT_SUMMARY)
    }

    /// 輸入過短時的結果
    pub fn insufficient_information() -> Self {
        Self::new(GENERAL_MEDICINE, Urgency::Low, INSUFFICIENT_SUMMARY)
    }
}

/// A roster entry. `price` is the consultation fee in whole dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub name: String,
    pub specialty: String,
    pub experience: u32,
    pub rating: f64,
    pub price: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PricePreference {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for PricePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricePreference::Low => f.write_str("low"),
            PricePreference::Medium => f.write_str("medium"),
            PricePreference::High => f.write_str("high"),
        }
    }
}

impl FromStr for PricePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(PricePreference::Low),
            "medium" => Ok(PricePreference::Medium),
            "high" => Ok(PricePreference::High),
            other => Err(format!("unknown price preference: {}", other)),
        }
    }
}

/// Where the symptom text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InputSource {
    Text,
    Document { file: String },
    Voice { file: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageReport {
    pub source: InputSource,
    pub analysis: ClassificationResult,
    pub price_preference: PricePreference,
    pub doctors: Vec<DoctorRecord>,
    pub warnings: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}
