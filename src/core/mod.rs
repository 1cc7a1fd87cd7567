pub mod analyzer;
pub mod classifier;
pub mod ranker;
pub mod rules;
pub mod sanitizer;
pub mod triage;

pub use crate::domain::model::{ClassificationResult, DoctorRecord, PricePreference, Urgency};
pub use crate::domain::ports::{SymptomClassifier, TextExtractor, TextGenerator, Transcriber};
pub use crate::utils::error::Result;
