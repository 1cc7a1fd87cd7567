pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::AppConfig;
pub use core::{
    analyzer::SymptomAnalyzer,
    ranker::{DoctorRanker, Roster},
    triage::{SymptomInput, TriageEngine},
};
pub use domain::model::{
    ClassificationResult, DoctorRecord, PricePreference, SymptomReport, TriageReport, Urgency,
};
pub use utils::error::{Result, TriageError};
