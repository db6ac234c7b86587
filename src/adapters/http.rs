use crate::domain::features::FeatureSet;
use crate::domain::model::{ModelInfo, ServiceReply};
use crate::domain::ports::{ConfigProvider, PredictionService};
use crate::utils::error::{PredictError, Result};
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_PREDICT_PATH: &str = "/predict";
pub const DEFAULT_MODEL_INFO_PATH: &str = "/api/model-info";

/// Prediction service reached over HTTP with form-encoded measurements.
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    client: Client,
    predict_url: String,
    model_info_url: String,
}

impl HttpPredictionService {
    pub fn new(base_url: &str, predict_path: &str, model_info_path: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            client: Client::new(),
            predict_url: format!("{}{}", base, predict_path),
            model_info_url: format!("{}{}", base, model_info_path),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(
            config.service_url(),
            config.predict_path(),
            config.model_info_path(),
        )
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(&self, features: &FeatureSet) -> Result<ServiceReply> {
        tracing::debug!(
            "📡 POST {} with {} measurements",
            self.predict_url,
            features.len()
        );
        let response = self
            .client
            .post(&self.predict_url)
            .form(&features.form_pairs())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 Prediction response status: {}", status);
        let body = response.bytes().await?;

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(|e| PredictError::MalformedResponse {
                reason: e.to_string(),
            });
        }

        // The service reports bad input with a 4xx/5xx and an error payload.
        match serde_json::from_slice::<ServiceReply>(&body) {
            Ok(failure @ ServiceReply::Failure { .. }) => Ok(failure),
            _ => Err(PredictError::UnexpectedStatus {
                status: status.as_u16(),
            }),
        }
    }

    async fn model_info(&self) -> Result<ModelInfo> {
        tracing::debug!("📡 GET {}", self.model_info_url);
        let response = self.client.get(&self.model_info_url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(PredictError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<ModelInfo>()
            .await
            .map_err(|e| PredictError::MalformedResponse {
                reason: e.to_string(),
            })
    }
}
