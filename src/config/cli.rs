use crate::adapters::http::{DEFAULT_MODEL_INFO_PATH, DEFAULT_PREDICT_PATH};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use clap::{Parser, ValueEnum};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "predict-form")]
#[command(about = "Submit tumour cell measurements to a prediction service")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file; replaces the service flags below")]
    pub config: Option<String>,

    #[arg(long, default_value = "http://localhost:5000")]
    pub endpoint: String,

    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    #[arg(long, default_value = "2000")]
    pub min_loading_ms: u64,

    #[arg(long, default_value = "5")]
    pub reconcile_secs: u64,

    #[arg(long, help = "Start from the built-in sample measurements")]
    pub sample: bool,

    #[arg(long, conflicts_with = "sample", help = "CSV file with measurements")]
    pub input: Option<String>,

    #[arg(long = "set", value_name = "NAME=VALUE", help = "Override one measurement")]
    pub assignments: Vec<String>,

    #[arg(long, help = "Write the result to a .json or .csv file")]
    pub export: Option<String>,

    #[arg(long, help = "Show the service's model information and exit")]
    pub model_info: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

impl ConfigProvider for CliConfig {
    fn service_url(&self) -> &str {
        &self.endpoint
    }

    fn predict_path(&self) -> &str {
        DEFAULT_PREDICT_PATH
    }

    fn model_info_path(&self) -> &str {
        DEFAULT_MODEL_INFO_PATH
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn min_loading(&self) -> Duration {
        Duration::from_millis(self.min_loading_ms)
    }

    fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        validate_range("timeout_secs", self.timeout_secs, 1, 300)?;
        validate_range("min_loading_ms", self.min_loading_ms, 0, 10_000)?;
        validate_range("reconcile_secs", self.reconcile_secs, 1, 3600)?;
        if let Some(input) = &self.input {
            validate_path("input", input)?;
        }
        if let Some(export) = &self.export {
            validate_path("export", export)?;
            crate::adapters::export::ExportFormat::from_path(export)?;
        }
        Ok(())
    }
}
