//! In-memory doubles shared by the orchestration tests.

use crate::domain::model::{Classification, Taxonomy, Transaction};
use crate::domain::ports::{Classifier, ConfigProvider, RetryPolicy, Storage};
use crate::utils::error::{CategorizeError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn put(&self, path: &str, data: &str) {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.as_bytes().to_vec());
    }

    pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned()
    }

    pub async fn paths(&self) -> Vec<String> {
        let files = self.files.lock().await;
        let mut paths: Vec<String> = files.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl Storage for MockStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned().ok_or_else(|| CategorizeError::NotFound {
            path: path.to_string(),
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }
}

pub struct MockConfig {
    pub strict: bool,
}

impl ConfigProvider for MockConfig {
    fn model(&self) -> &str {
        "llama3.1:latest"
    }

    fn endpoint(&self) -> &str {
        "http://localhost:11434"
    }

    fn taxonomy_path(&self) -> &str {
        "stessa_fields.txt"
    }

    fn transactions_path(&self) -> &str {
        "transactions.csv"
    }

    fn output_dir(&self) -> &str {
        "out"
    }

    fn temperature(&self) -> f32 {
        0.1
    }

    fn request_timeout(&self) -> Option<Duration> {
        None
    }

    fn probe_timeout(&self) -> Duration {
        Duration::from_secs(5)
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::none()
    }

    fn strict_labels(&self) -> bool {
        self.strict
    }

    fn progress_interval(&self) -> usize {
        10
    }
}

/// Answers from a description -> outcome table; unknown descriptions fail the row.
pub struct ScriptedClassifier {
    pub available: bool,
    pub answers: HashMap<String, Classification>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedClassifier {
    pub fn new(answers: &[(&str, Classification)]) -> Self {
        Self {
            available: true,
            answers: answers
                .iter()
                .map(|(d, c)| (d.to_string(), c.clone()))
                .collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait::async_trait]
impl Classifier for ScriptedClassifier {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn classify(
        &self,
        transaction: &Transaction,
        _taxonomy: &Taxonomy,
    ) -> Result<Classification> {
        self.calls.lock().await.push(transaction.description.clone());
        self.answers
            .get(&transaction.description)
            .cloned()
            .ok_or_else(|| CategorizeError::ProcessingError {
                message: format!("no answer for {}", transaction.description),
            })
    }
}
