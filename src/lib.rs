pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{
    export::ResultExporter, http::HttpPredictionService, storage::LocalStorage,
    terminal::TerminalSurface,
};
pub use self::core::controller::{ControllerSettings, Phase, SubmissionController};
pub use domain::features::{FeatureSet, FormInput, FEATURE_NAMES};
pub use domain::model::{Label, PredictionResult, ResultView};
pub use utils::error::{PredictError, Result};
