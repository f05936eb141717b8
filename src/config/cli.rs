use crate::core::{ConfigProvider, Storage};
use crate::core::inference::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::domain::ports::RetryPolicy;
use crate::utils::error::{CategorizeError, Result};
use crate::utils::validation::{validate_provider, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "categorize")]
#[command(about = "Categorize bank transactions with a local language model")]
pub struct CliConfig {
    /// Model identifier passed to the endpoint
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the Ollama-compatible server
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Category listing: unindented category lines, "- subcategory" lines below
    #[arg(long, default_value = super::DEFAULT_TAXONOMY_PATH)]
    pub taxonomy: String,

    /// CSV with Date, Description, Amount and optional Balance columns
    #[arg(long, default_value = super::DEFAULT_TRANSACTIONS_PATH)]
    pub transactions: String,

    #[arg(long, default_value = super::DEFAULT_OUTPUT_DIR)]
    pub output_dir: String,

    #[arg(long, default_value = "0.1")]
    pub temperature: f32,

    /// Per-request timeout for classification calls; unset waits indefinitely
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value = "5")]
    pub probe_timeout_secs: u64,

    /// Attempts per transaction, including the first
    #[arg(long, default_value = "1")]
    pub max_attempts: u32,

    #[arg(long, default_value = "500")]
    pub retry_backoff_ms: u64,

    /// Replace labels that are not in the taxonomy with "Uncategorized"
    #[arg(long)]
    pub strict: bool,

    #[arg(long, default_value = "10")]
    pub progress_interval: usize,

    /// Load settings from a TOML file instead of these flags
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Log memory and timing per phase")]
    pub monitor: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            taxonomy: super::DEFAULT_TAXONOMY_PATH.to_string(),
            transactions: super::DEFAULT_TRANSACTIONS_PATH.to_string(),
            output_dir: super::DEFAULT_OUTPUT_DIR.to_string(),
            temperature: crate::core::inference::DEFAULT_TEMPERATURE,
            timeout_secs: None,
            probe_timeout_secs: 5,
            max_attempts: 1,
            retry_backoff_ms: super::DEFAULT_RETRY_BACKOFF_MS,
            strict: false,
            progress_interval: super::DEFAULT_PROGRESS_INTERVAL,
            config: None,
            verbose: false,
            json_logs: false,
            monitor: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn taxonomy_path(&self) -> &str {
        &self.taxonomy
    }

    fn transactions_path(&self) -> &str {
        &self.transactions
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }

    fn strict_labels(&self) -> bool {
        self.strict
    }

    fn progress_interval(&self) -> usize {
        self.progress_interval
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// Files on the local disk, resolved against `base_path` unless absolute.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        if !full_path.exists() {
            return Err(CategorizeError::NotFound {
                path: full_path.to_string_lossy().into_owned(),
            });
        }
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}
