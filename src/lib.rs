pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, LocalStorage};
pub use config::TomlConfig;

pub use crate::core::{
    engine::CategorizeEngine,
    inference::{InferenceSettings, OllamaClient},
    pipeline::CategorizePipeline,
};
pub use domain::model::{Classification, RunOutcome, Taxonomy, Transaction, TransactionBatch};
pub use domain::ports::{Classifier, ConfigProvider, RetryPolicy, Storage};
pub use utils::error::{CategorizeError, Result};
