use anyhow::Context;
use clap::Parser;
use doctor_finder::adapters::ollama::OllamaGenerator;
use doctor_finder::utils::{logger, validation::Validate};
use doctor_finder::AppConfig;

#[derive(Parser)]
#[command(name = "prefetch-model")]
#[command(about = "Download the configured language model ahead of the first run")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "doctor-finder.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Only report whether the model is already installed
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("📁 Loading configuration from: {}", args.config);
    let config = match AppConfig::from_file_or_default(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let generator = OllamaGenerator::from_config(&config.model)
        .context("failed to create model server client")?;
    println!(
        "🤖 Model '{}' on {}",
        generator.model(),
        config.model.endpoint
    );

    let installed = match generator.list_models().await {
        Ok(models) => models,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    };
    tracing::debug!("Installed models: {:?}", installed);

    if generator.is_installed(&installed) {
        println!("✅ Model is already installed");
        return Ok(());
    }

    if args.check {
        println!("⚠️ Model is not installed");
        std::process::exit(1);
    }

    println!("⬇️ Downloading model, this can take a while...");
    match generator.pull_model().await {
        Ok(status) => {
            tracing::info!("Pull finished with status: {}", status);
            println!("✅ Model downloaded successfully ({})", status);
        }
        Err(e) => {
            eprintln!("❌ Error downloading model: {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
