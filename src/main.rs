use clap::Parser;
use txn_categorizer::utils::{logger, validation::Validate};
use txn_categorizer::{
    CategorizeEngine, CategorizeError, CategorizePipeline, CliConfig, ConfigProvider,
    LocalStorage, OllamaClient, RunOutcome, TomlConfig,
};

fn report(e: &CategorizeError) {
    tracing::error!("❌ Error in main process: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

async fn run<C: ConfigProvider + Validate>(config: C, monitor_enabled: bool) -> bool {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        report(&e);
        return false;
    }

    tracing::info!("Model: {} at {}", config.model(), config.endpoint());
    if let Ok(cwd) = std::env::current_dir() {
        tracing::info!("Current working directory: {}", cwd.display());
    }
    if monitor_enabled {
        tracing::info!("🔍 Run monitoring enabled");
    }

    let model = config.model().to_string();
    let endpoint = config.endpoint().to_string();
    let classifier = OllamaClient::from_config(&config);
    let storage = LocalStorage::new(".".to_string());
    let pipeline = CategorizePipeline::new(storage, config, classifier);
    let engine = CategorizeEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(RunOutcome::Completed { rows, output_path }) => {
            tracing::info!("✅ Categorized {} transactions", rows);
            println!("✅ Categorized {} transactions", rows);
            println!("📁 Output saved to: {}", output_path);
            true
        }
        Ok(RunOutcome::ModelUnavailable) => {
            report(&CategorizeError::ModelUnavailable { model, endpoint });
            false
        }
        Err(e) => {
            report(&e);
            false
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let monitor_enabled = cli.monitor;
    let succeeded = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(config, monitor_enabled).await,
                Err(e) => {
                    report(&e);
                    false
                }
            }
        }
        None => run(cli, monitor_enabled).await,
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
