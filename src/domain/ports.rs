use crate::domain::model::{
    Classification, ExtractedData, Taxonomy, Transaction, TransactionBatch,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// How many times a classify request is attempted and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    /// Linear backoff: the wait grows with each failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}


pub trait ConfigProvider: Send + Sync {
    fn model(&self) -> &str;
    fn endpoint(&self) -> &str;
    fn taxonomy_path(&self) -> &str;
    fn transactions_path(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn temperature(&self) -> f32;
    fn request_timeout(&self) -> Option<Duration>;
    fn probe_timeout(&self) -> Duration;
    fn retry_policy(&self) -> RetryPolicy;
    fn strict_labels(&self) -> bool;
    fn progress_interval(&self) -> usize;
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// True when the model endpoint answers a trivial prompt.
    async fn is_available(&self) -> bool;

    /// Model failures come back as `Classification::Uncategorized`; an `Err`
    /// means the row itself could not be processed.
    async fn classify(&self, transaction: &Transaction, taxonomy: &Taxonomy)
        -> Result<Classification>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn preflight(&self) -> Result<bool>;
    async fn extract(&self) -> Result<ExtractedData>;
    async fn transform(&self, data: ExtractedData) -> Result<TransactionBatch>;
    async fn load(&self, batch: TransactionBatch) -> Result<String>;
}
