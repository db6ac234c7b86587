use crate::adapters::export::ExportFormat;
use crate::adapters::http::{DEFAULT_MODEL_INFO_PATH, DEFAULT_PREDICT_PATH};
use crate::core::controller::{
    DEFAULT_MIN_LOADING, DEFAULT_RECONCILE_INTERVAL, DEFAULT_REQUEST_TIMEOUT,
};
use crate::core::ConfigProvider;
use crate::utils::error::{PredictError, Result};
use crate::utils::validation::{
    validate_path, validate_range, validate_request_path, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub loading: LoadingConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: String,
    #[serde(default = "default_predict_path")]
    pub predict_path: String,
    #[serde(default = "default_model_info_path")]
    pub model_info_path: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadingConfig {
    pub minimum_ms: Option<u64>,
    pub reconcile_interval_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub export_path: Option<String>,
}

fn default_predict_path() -> String {
    DEFAULT_PREDICT_PATH.to_string()
}

fn default_model_info_path() -> String {
    DEFAULT_MODEL_INFO_PATH.to_string()
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PredictError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PREDICT_ENDPOINT})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn export_path(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.export_path.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn service_url(&self) -> &str {
        &self.service.endpoint
    }

    fn predict_path(&self) -> &str {
        &self.service.predict_path
    }

    fn model_info_path(&self) -> &str {
        &self.service.model_info_path
    }

    fn request_timeout(&self) -> Duration {
        self.service
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    fn min_loading(&self) -> Duration {
        self.loading
            .minimum_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_MIN_LOADING)
    }

    fn reconcile_interval(&self) -> Duration {
        self.loading
            .reconcile_interval_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RECONCILE_INTERVAL)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("service.endpoint", &self.service.endpoint)?;
        validate_request_path("service.predict_path", &self.service.predict_path)?;
        validate_request_path("service.model_info_path", &self.service.model_info_path)?;

        if let Some(timeout) = self.service.timeout_seconds {
            validate_range("service.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some(minimum) = self.loading.minimum_ms {
            validate_range("loading.minimum_ms", minimum, 0, 10_000)?;
        }
        if let Some(interval) = self.loading.reconcile_interval_seconds {
            validate_range("loading.reconcile_interval_seconds", interval, 1, 3600)?;
        }
        if let Some(export_path) = self.export_path() {
            validate_path("output.export_path", export_path)?;
            ExportFormat::from_path(export_path)?;
        }

        Ok(())
    }
}
