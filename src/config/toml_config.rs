use crate::core::sanitizer::{MAX_INPUT_CHARS, MIN_INPUT_CHARS};
use crate::utils::error::{Result, TriageError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Minimum trimmed length of extracted document text before it is worth analysing.
pub const MIN_DOCUMENT_CHARS: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub transcription: Option<TranscriptionConfig>,
    pub roster: Option<RosterConfig>,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub name: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub probe_timeout_seconds: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:11434".to_string(),
            name: "medgemma".to_string(),
            api_key: None,
            timeout_seconds: 120,
            probe_timeout_seconds: 3,
            temperature: 0.7,
            max_tokens: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    pub endpoint: String,
    #[serde(default = "default_transcription_model")]
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_transcription_timeout")]
    pub timeout_seconds: u64,
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_transcription_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub min_chars: usize,
    pub max_chars: usize,
    pub min_document_chars: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            min_chars: MIN_INPUT_CHARS,
            max_chars: MAX_INPUT_CHARS,
            min_document_chars: MIN_DOCUMENT_CHARS,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TriageError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TriageError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HF_TOKEN})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if self.model.enabled {
            validation::validate_url("model.endpoint", &self.model.endpoint)?;
            validation::validate_non_empty_string("model.name", &self.model.name)?;
            validation::validate_positive_number(
                "model.timeout_seconds",
                self.model.timeout_seconds as usize,
                1,
            )?;
            validation::validate_range("model.temperature", self.model.temperature, 0.0, 2.0)?;
        }

        if let Some(transcription) = &self.transcription {
            validation::validate_url("transcription.endpoint", &transcription.endpoint)?;
        }

        if let Some(roster) = &self.roster {
            validation::validate_path("roster.path", &roster.path)?;
        }

        validation::validate_positive_number("input.min_chars", self.input.min_chars, 1)?;
        if self.input.max_chars <= self.input.min_chars {
            return Err(TriageError::InvalidConfigValueError {
                field: "input.max_chars".to_string(),
                value: self.input.max_chars.to_string(),
                reason: format!("Must be greater than input.min_chars ({})", self.input.min_chars),
            });
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
