#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, LocalStorage};
pub use toml_config::TomlConfig;

pub const DEFAULT_TAXONOMY_PATH: &str = "stessa_fields.txt";
pub const DEFAULT_TRANSACTIONS_PATH: &str = "transactions.csv";
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;
