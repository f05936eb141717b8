use thiserror::Error;

#[derive(Error, Debug)]
pub enum CategorizeError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Invalid date '{value}' on row {row}")]
    InvalidDate { row: usize, value: String },

    #[error("Model endpoint returned HTTP {status}")]
    ModelStatus { status: u16 },

    #[error("Model '{model}' is not reachable at {endpoint}")]
    ModelUnavailable { model: String, endpoint: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

impl CategorizeError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            CategorizeError::NotFound { path } => {
                format!("Input file '{}' does not exist", path)
            }
            CategorizeError::MissingColumn { column } => {
                format!("The transactions file has no '{}' column", column)
            }
            CategorizeError::InvalidDate { row, value } => {
                format!("Row {} has a date that cannot be read: '{}'", row, value)
            }
            CategorizeError::ModelUnavailable { model, .. } => {
                format!("The {} model is not running", model)
            }
            CategorizeError::ApiError(_) => "Could not talk to the model endpoint".to_string(),
            CategorizeError::CsvError(e) => format!("Could not read or write CSV data: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CategorizeError::NotFound { .. } => {
                "Check the path, or pass --taxonomy / --transactions explicitly".to_string()
            }
            CategorizeError::MissingColumn { .. } => {
                "The header row needs Date, Description and Amount columns".to_string()
            }
            CategorizeError::InvalidDate { .. } => {
                "Use YYYY-MM-DD or MM/DD/YYYY dates in the Date column".to_string()
            }
            CategorizeError::ModelUnavailable { model, .. } => {
                format!("Start the model with: ollama run {}", model)
            }
            CategorizeError::ApiError(_) => {
                "Make sure Ollama is running and the endpoint URL is correct".to_string()
            }
            CategorizeError::ConfigValidationError { .. }
            | CategorizeError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML configuration file".to_string()
            }
            _ => "Re-run with --verbose for more detail".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CategorizeError>;
