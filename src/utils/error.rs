use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Model unavailable: {message}")]
    ModelUnavailable { message: String },

    #[error("Model server returned {status}: {body}")]
    ModelResponseError { status: u16, body: String },

    #[error("Model did not answer within {seconds}s")]
    ModelTimeout { seconds: u64 },

    #[error("Text extraction failed for '{file}': {message}")]
    ExtractionError { file: String, message: String },

    #[error("Transcription failed: {message}")]
    TranscriptionError { message: String },

    #[error("Roster error: {message}")]
    RosterError { message: String },

    #[error("{capability} is not available")]
    CapabilityUnavailable { capability: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Input,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TriageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TriageError::ConfigValidationError { .. }
            | TriageError::InvalidConfigValueError { .. }
            | TriageError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TriageError::HttpError(_)
            | TriageError::ModelUnavailable { .. }
            | TriageError::ModelResponseError { .. }
            | TriageError::ModelTimeout { .. }
            | TriageError::TranscriptionError { .. } => ErrorCategory::Network,
            TriageError::ExtractionError { .. }
            | TriageError::CapabilityUnavailable { .. }
            | TriageError::ValidationError { .. } => ErrorCategory::Input,
            TriageError::CsvError(_)
            | TriageError::ZipError(_)
            | TriageError::RosterError { .. } => ErrorCategory::Data,
            TriageError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 輸入問題可由使用者改用其他來源解決
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            TriageError::ConfigValidationError { .. }
            | TriageError::InvalidConfigValueError { .. }
            | TriageError::MissingConfigError { .. } => {
                "Check the configuration file and command line arguments".to_string()
            }
            TriageError::HttpError(_) | TriageError::ModelUnavailable { .. } => {
                "Make sure the model server is running and reachable, or run with --no-model"
                    .to_string()
            }
            TriageError::ModelResponseError { status, .. } if *status == 404 => {
                "Pull the model first with the prefetch_model tool".to_string()
            }
            TriageError::ModelResponseError { .. } => {
                "Inspect the model server logs for details".to_string()
            }
            TriageError::ModelTimeout { .. } => {
                "Increase model.timeout_seconds or use a smaller model".to_string()
            }
            TriageError::ExtractionError { .. } => {
                "Try another file (PDF, DOCX or TXT) or type the symptoms instead".to_string()
            }
            TriageError::TranscriptionError { .. } | TriageError::CapabilityUnavailable { .. } => {
                "Use text input (--text) or upload a document (--file) instead".to_string()
            }
            TriageError::CsvError(_) | TriageError::RosterError { .. } => {
                "Check that the roster CSV has the header name,specialty,experience,rating,price"
                    .to_string()
            }
            TriageError::ZipError(_) => "The DOCX file appears to be corrupted".to_string(),
            TriageError::IoError(_) => "Check file paths and permissions".to_string(),
            TriageError::ValidationError { .. } => "Review the provided input".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TriageError::CapabilityUnavailable { capability } => {
                format!("{} is not available on this installation.", capability)
            }
            TriageError::ExtractionError { .. } => {
                "Could not extract text from document. Please try another file.".to_string()
            }
            TriageError::ModelUnavailable { .. } | TriageError::HttpError(_) => {
                "The language model could not be reached.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TriageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_unavailable_suggests_other_inputs() {
        let err = TriageError::CapabilityUnavailable {
            capability: "Voice input".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.recovery_suggestion().contains("--text"));
        assert_eq!(
            err.user_friendly_message(),
            "Voice input is not available on this installation."
        );
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = TriageError::MissingConfigError {
            field: "model.endpoint".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_missing_model_suggests_prefetch() {
        let err = TriageError::ModelResponseError {
            status: 404,
            body: "model not found".to_string(),
        };
        assert!(err.recovery_suggestion().contains("prefetch_model"));
    }
}
