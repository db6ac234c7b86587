use crate::domain::model::InvalidField;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Prediction service answered with status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Malformed response from prediction service: {reason}")]
    MalformedResponse { reason: String },

    #[error("Prediction request timed out after {after:?}")]
    TimeoutError { after: Duration },

    #[error("Prediction service error: {message}")]
    ServiceError { message: String },

    #[error("Validation failed for {} field(s): {}", .fields.len(), describe_fields(.fields))]
    ValidationError { fields: Vec<InvalidField> },

    #[error("A submission is already in progress")]
    Busy,

    #[error("Submission was dismissed before the response arrived")]
    Cancelled,

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Timeout,
    Network,
    Service,
    Lifecycle,
    Configuration,
    Io,
}

impl PredictError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PredictError::HttpError(_)
            | PredictError::UnexpectedStatus { .. }
            | PredictError::MalformedResponse { .. } => ErrorCategory::Network,
            PredictError::TimeoutError { .. } => ErrorCategory::Timeout,
            PredictError::ServiceError { .. } => ErrorCategory::Service,
            PredictError::ValidationError { .. } => ErrorCategory::Validation,
            PredictError::Busy | PredictError::Cancelled => ErrorCategory::Lifecycle,
            PredictError::ConfigError { .. } | PredictError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            PredictError::CsvError(_)
            | PredictError::IoError(_)
            | PredictError::SerializationError(_) => ErrorCategory::Io,
        }
    }

    /// Text shown in the notification area when a submission ends with this error.
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => {
                "Please fill in all required fields with valid numbers.".to_string()
            }
            ErrorCategory::Timeout => {
                "Request timed out. Please try again with valid data.".to_string()
            }
            ErrorCategory::Network => {
                "Network error occurred. Please check your connection and try again.".to_string()
            }
            ErrorCategory::Service => match self {
                PredictError::ServiceError { message } => message.clone(),
                _ => self.to_string(),
            },
            ErrorCategory::Lifecycle | ErrorCategory::Configuration | ErrorCategory::Io => {
                self.to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Check that every measurement is a non-negative number",
            ErrorCategory::Timeout => "Retry the submission; the service may be overloaded",
            ErrorCategory::Network => "Verify the service endpoint is reachable",
            ErrorCategory::Service => "Review the input values reported by the service",
            ErrorCategory::Lifecycle => "Wait for the current submission to finish",
            ErrorCategory::Configuration => "Fix the configuration value and try again",
            ErrorCategory::Io => "Check the input or export file path and its contents",
        }
    }
}

fn describe_fields(fields: &[InvalidField]) -> String {
    fields
        .iter()
        .map(|f| format!("{} ({})", f.name, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, PredictError>;
