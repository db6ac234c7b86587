use crate::domain::features::FeatureSet;
use crate::domain::model::{InvalidField, ModelInfo, Notification, ResultView, ServiceReply};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// The external classifier.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, features: &FeatureSet) -> Result<ServiceReply>;
    async fn model_info(&self) -> Result<ModelInfo>;
}

/// The view the submission controller drives. Every method must be safe to
/// call in any state and any number of times.
pub trait PresentationSurface: Send + Sync {
    fn show_loading(&self);
    /// Ignored while the loading indicator is hidden.
    fn update_loading(&self, progress: u8, message: &str);
    /// Hides the loading indicator and its overlay, resetting progress and text.
    fn hide_loading(&self);
    fn overlay_active(&self) -> bool;
    fn set_trigger_enabled(&self, enabled: bool);
    /// An empty slice clears previous marks.
    fn mark_invalid(&self, fields: &[InvalidField]);
    fn render_result(&self, view: &ResultView);
    fn clear_result(&self);
    fn notify(&self, notification: &Notification);
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn service_url(&self) -> &str;
    fn predict_path(&self) -> &str;
    fn model_info_path(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn min_loading(&self) -> Duration;
    fn reconcile_interval(&self) -> Duration;
}
