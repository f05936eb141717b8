use crate::core::prompt::build_prompt;
use crate::domain::model::{Classification, Taxonomy, Transaction};
use crate::domain::ports::{Classifier, ConfigProvider, RetryPolicy};
use crate::utils::error::{CategorizeError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1:latest";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const PROBE_PROMPT: &str = "hi";

/// Everything that selects which model is asked and how.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    /// Applies to classify requests only; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    pub probe_timeout: Duration,
    pub retry: RetryPolicy,
}

impl InferenceSettings {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: None,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            retry: RetryPolicy::none(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            endpoint: config.endpoint().to_string(),
            model: config.model().to_string(),
            temperature: config.temperature(),
            request_timeout: config.request_timeout(),
            probe_timeout: config.probe_timeout(),
            retry: config.retry_policy(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.endpoint.trim_end_matches('/'))
    }
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL)
    }
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for an Ollama-style `/api/generate` endpoint.
pub struct OllamaClient {
    settings: InferenceSettings,
    client: Client,
}

impl OllamaClient {
    pub fn new(settings: InferenceSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(InferenceSettings::from_config(config))
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            model: &self.settings.model,
            prompt,
            stream: false,
            raw: Some(true),
            options: Some(GenerateOptions {
                temperature: self.settings.temperature,
            }),
        };

        let mut request = self.client.post(self.settings.generate_url()).json(&body);
        if let Some(timeout) = self.settings.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        tracing::debug!("Model response status: {}", response.status());

        if response.status() != StatusCode::OK {
            return Err(CategorizeError::ModelStatus {
                status: response.status().as_u16(),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.response)
    }

    /// Asks the model for a subcategory. Never fails: any transport or
    /// status problem yields `Classification::Uncategorized`. The answer is
    /// stored as given, even when empty.
    pub async fn classify(
        &self,
        description: &str,
        amount: f64,
        taxonomy: &Taxonomy,
    ) -> Classification {
        let prompt = build_prompt(description, amount, taxonomy);
        let policy = self.settings.retry;
        let attempts = policy.max_attempts.max(1);

        for attempt in 1..=attempts {
            match self.generate(&prompt).await {
                Ok(text) => {
                    let label = first_line(&text);
                    if label.is_empty() {
                        tracing::warn!(
                            "{} returned an empty answer for '{}'",
                            self.settings.model,
                            description
                        );
                    }
                    tracing::info!(
                        "Categorized '{}' (${}) as '{}'",
                        description,
                        amount,
                        label
                    );
                    return Classification::Label(label.to_string());
                }
                Err(e) => {
                    tracing::warn!(
                        "Error calling {} API (attempt {}/{}): {}",
                        self.settings.model,
                        attempt,
                        attempts,
                        e
                    );
                    if attempt < attempts {
                        tokio::time::sleep(policy.delay_after(attempt)).await;
                    }
                }
            }
        }

        Classification::Uncategorized
    }

    /// Sends a trivial prompt with a short timeout. Only HTTP 200 counts as available.
    pub async fn is_available(&self) -> bool {
        let model = &self.settings.model;
        let body = GenerateRequest {
            model,
            prompt: PROBE_PROMPT,
            stream: false,
            raw: None,
            options: None,
        };

        let result = self
            .client
            .post(self.settings.generate_url())
            .json(&body)
            .timeout(self.settings.probe_timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => {
                tracing::info!("✓ {} model is running and accessible", model);
                true
            }
            Ok(response) => {
                tracing::error!("✗ {} model returned error status: {}", model, response.status());
                false
            }
            Err(e) if e.is_connect() => {
                tracing::error!(
                    "✗ Could not connect to {} model at {}",
                    model,
                    self.settings.endpoint
                );
                tracing::error!("  Please make sure Ollama is running with: ollama run {}", model);
                false
            }
            Err(e) if e.is_timeout() => {
                tracing::error!(
                    "✗ {} model did not answer within {:?}",
                    model,
                    self.settings.probe_timeout
                );
                false
            }
            Err(e) => {
                tracing::error!("✗ Error checking {} model: {}", model, e);
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl Classifier for OllamaClient {
    async fn is_available(&self) -> bool {
        OllamaClient::is_available(self).await
    }

    async fn classify(
        &self,
        transaction: &Transaction,
        taxonomy: &Taxonomy,
    ) -> Result<Classification> {
        Ok(OllamaClient::classify(self, &transaction.description, transaction.amount, taxonomy).await)
    }
}

/// First line of the completion, trimmed.
fn first_line(text: &str) -> &str {
    text.trim().lines().next().unwrap_or("").trim()
}
