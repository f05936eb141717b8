use crate::core::inference::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_PROBE_TIMEOUT, DEFAULT_TEMPERATURE};
use crate::core::ConfigProvider;
use crate::domain::ports::RetryPolicy;
use crate::utils::error::{CategorizeError, Result};
use crate::utils::validation::{validate_provider, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: Option<String>,
    pub endpoint: Option<String>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub taxonomy: Option<String>,
    pub transactions: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub timeout_seconds: Option<u64>,
    pub probe_timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub strict_labels: Option<bool>,
    pub progress_interval: Option<usize>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CategorizeError::NotFound {
                path: path.to_string_lossy().into_owned(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CategorizeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OLLAMA_HOST})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn model(&self) -> &str {
        self.model.name.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    fn endpoint(&self) -> &str {
        self.model.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn taxonomy_path(&self) -> &str {
        self.input
            .taxonomy
            .as_deref()
            .unwrap_or(super::DEFAULT_TAXONOMY_PATH)
    }

    fn transactions_path(&self) -> &str {
        self.input
            .transactions
            .as_deref()
            .unwrap_or(super::DEFAULT_TRANSACTIONS_PATH)
    }

    fn output_dir(&self) -> &str {
        self.output
            .directory
            .as_deref()
            .unwrap_or(super::DEFAULT_OUTPUT_DIR)
    }

    fn temperature(&self) -> f32 {
        self.model.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.inference.timeout_seconds.map(Duration::from_secs)
    }

    fn probe_timeout(&self) -> Duration {
        self.inference
            .probe_timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT)
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.inference.retry_attempts.unwrap_or(1),
            backoff: Duration::from_millis(
                self.inference
                    .retry_delay_ms
                    .unwrap_or(super::DEFAULT_RETRY_BACKOFF_MS),
            ),
        }
    }

    fn strict_labels(&self) -> bool {
        self.inference.strict_labels.unwrap_or(false)
    }

    fn progress_interval(&self) -> usize {
        self.inference
            .progress_interval
            .unwrap_or(super::DEFAULT_PROGRESS_INTERVAL)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[model]
name = "deepseek-r1:14b"
endpoint = "http://gpu-box:11434"
temperature = 0.2

[input]
taxonomy = "fields/stessa.txt"
transactions = "data/march.csv"

[output]
directory = "out"

[inference]
timeout_seconds = 60
retry_attempts = 3
retry_delay_ms = 250
strict_labels = true
progress_interval = 25
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.model(), "deepseek-r1:14b");
        assert_eq!(config.endpoint(), "http://gpu-box:11434");
        assert_eq!(config.temperature(), 0.2);
        assert_eq!(config.taxonomy_path(), "fields/stessa.txt");
        assert_eq!(config.transactions_path(), "data/march.csv");
        assert_eq!(config.output_dir(), "out");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(
            config.retry_policy(),
            RetryPolicy {
                max_attempts: 3,
                backoff: Duration::from_millis(250)
            }
        );
        assert!(config.strict_labels());
        assert_eq!(config.progress_interval(), 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.taxonomy_path(), "stessa_fields.txt");
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.retry_policy(), RetryPolicy {
            max_attempts: 1,
            backoff: Duration::from_millis(500),
        });
        assert!(!config.strict_labels());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TXN_CATEGORIZER_TEST_HOST", "http://10.0.0.5:11434");

        let toml_content = r#"
[model]
endpoint = "${TXN_CATEGORIZER_TEST_HOST}"
name = "${TXN_CATEGORIZER_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.endpoint(), "http://10.0.0.5:11434");
        assert_eq!(config.model(), "${TXN_CATEGORIZER_UNSET_VAR}");

        std::env::remove_var("TXN_CATEGORIZER_TEST_HOST");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[model]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[inference]\nprogress_interval = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[model\nname = 1").unwrap_err();
        assert!(matches!(err, CategorizeError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[model]\nname = \"mistral:7b\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.model(), "mistral:7b");
    }

    #[test]
    fn test_missing_config_file_is_not_found() {
        let err = TomlConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, CategorizeError::NotFound { .. }));
    }
}
