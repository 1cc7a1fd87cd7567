use clap::Parser;
use doctor_finder::utils::error::ErrorSeverity;
use doctor_finder::utils::{logger, validation::Validate};
use doctor_finder::{AppConfig, CliConfig, SymptomInput, TriageEngine, TriageError, TriageReport};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting doctor-finder CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let app_config = match load_app_config(&config.config) {
        Ok(app_config) => app_config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", config.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let input = symptom_input(&config);

    let result = match TriageEngine::from_config(&app_config, !config.no_model).await {
        Ok(engine) => {
            tracing::info!("🔎 Classifier: {}", engine.analyzer().classifier_name());
            engine.run(input, config.price).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            if config.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn load_app_config(path: &str) -> doctor_finder::Result<AppConfig> {
    let app_config = AppConfig::from_file_or_default(path)?;
    app_config.validate()?;
    Ok(app_config)
}

fn symptom_input(config: &CliConfig) -> SymptomInput {
    match (&config.text, &config.file, &config.audio) {
        (Some(text), _, _) => SymptomInput::Text(text.clone()),
        (None, Some(file), _) => SymptomInput::Document(PathBuf::from(file)),
        (None, None, Some(audio)) => SymptomInput::Audio(PathBuf::from(audio)),
        // validate() 已保證恰好一種輸入
        (None, None, None) => SymptomInput::Text(String::new()),
    }
}

fn print_report(report: &TriageReport) {
    for warning in &report.warnings {
        println!("⚠️ {}", warning);
    }

    let analysis = &report.analysis;
    println!("🏥 Recommended specialty: {}", analysis.specialty);
    println!("📝 Summary: {}", analysis.summary);
    println!("🚨 Urgency: {}", analysis.urgency);
    println!();

    if report.doctors.is_empty() {
        println!("No doctors found in the roster.");
        return;
    }

    println!("👩‍⚕️ Recommended doctors ({} price):", report.price_preference);
    for (rank, doctor) in report.doctors.iter().enumerate() {
        println!(
            "  {}. {} - {} ({} yrs) ⭐ {:.1} 💰 ${}",
            rank + 1,
            doctor.name,
            doctor.specialty,
            doctor.experience,
            doctor.rating,
            doctor.price
        );
    }
}

fn exit_with(e: TriageError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Symptom analysis failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2, // 可重試
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
