pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use crate::domain::model::PricePreference;
    use crate::utils::error::{Result, TriageError};
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "ogg", "flac", "webm"];

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "doctor-finder")]
    #[command(about = "Find the right specialist for a description of symptoms")]
    pub struct CliConfig {
        /// Symptoms typed as free text
        #[arg(long)]
        pub text: Option<String>,

        /// Health record to read symptoms from (PDF, DOCX or TXT)
        #[arg(long)]
        pub file: Option<String>,

        /// Audio recording to transcribe
        #[arg(long)]
        pub audio: Option<String>,

        #[arg(long, value_enum, default_value_t = PricePreference::Medium)]
        pub price: PricePreference,

        #[arg(long, default_value = "doctor-finder.toml")]
        pub config: String,

        /// Skip the language model and use keyword rules only
        #[arg(long)]
        pub no_model: bool,

        /// Print the report as JSON
        #[arg(long)]
        pub json: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        fn input_count(&self) -> usize {
            [self.text.is_some(), self.file.is_some(), self.audio.is_some()]
                .iter()
                .filter(|set| **set)
                .count()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            match self.input_count() {
                0 => {
                    return Err(TriageError::MissingConfigError {
                        field: "--text, --file or --audio".to_string(),
                    })
                }
                1 => {}
                _ => {
                    return Err(TriageError::ValidationError {
                        message: "Use only one of --text, --file or --audio".to_string(),
                    })
                }
            }

            if let Some(file) = &self.file {
                validation::validate_path("file", file)?;
            }
            if let Some(audio) = &self.audio {
                validation::validate_path("audio", audio)?;
                validation::validate_file_extension("audio", audio, AUDIO_EXTENSIONS)?;
            }
            validation::validate_path("config", &self.config)?;

            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> CliConfig {
            let mut argv = vec!["doctor-finder"];
            argv.extend_from_slice(args);
            CliConfig::parse_from(argv)
        }

        #[test]
        fn test_defaults() {
            let config = parse(&["--text", "sore throat"]);
            assert_eq!(config.price, PricePreference::Medium);
            assert_eq!(config.config, "doctor-finder.toml");
            assert!(!config.no_model);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_price_preference_parsing() {
            let config = parse(&["--text", "sore throat", "--price", "low"]);
            assert_eq!(config.price, PricePreference::Low);
            assert!(CliConfig::try_parse_from(["doctor-finder", "--price", "cheap"]).is_err());
        }

        #[test]
        fn test_exactly_one_input_required() {
            assert!(parse(&[]).validate().is_err());
            assert!(parse(&["--text", "cough", "--file", "notes.txt"])
                .validate()
                .is_err());
            assert!(parse(&["--file", "notes.pdf"]).validate().is_ok());
        }

        #[test]
        fn test_audio_extension_checked() {
            assert!(parse(&["--audio", "visit.wav"]).validate().is_ok());
            assert!(parse(&["--audio", "visit.docx"]).validate().is_err());
        }
    }
}
