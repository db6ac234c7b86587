pub mod controller;
pub mod loading;

pub use crate::domain::features::{FeatureSet, FormInput};
pub use crate::domain::model::{PredictionResult, ResultView, ServiceReply};
pub use crate::domain::ports::{ConfigProvider, PredictionService, PresentationSurface, Storage};
pub use crate::utils::error::Result;
