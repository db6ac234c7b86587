use crate::domain::model::ResultView;
use crate::domain::ports::Storage;
use crate::utils::error::{PredictError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(ExportFormat::Json),
            Some("csv") => Ok(ExportFormat::Csv),
            _ => Err(PredictError::InvalidConfigValueError {
                field: "export".to_string(),
                value: path.to_string(),
                reason: "Unsupported export format. Valid formats: json, csv".to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    generated_at: DateTime<Utc>,
    prediction: String,
    benign: &'a str,
    malignant: &'a str,
    risk_level: &'a str,
    advice: &'a str,
}

/// Writes a rendered prediction to storage so it can be kept alongside the case.
pub struct ResultExporter<S: Storage> {
    storage: S,
}

impl<S: Storage> ResultExporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn export(&self, view: &ResultView, path: &str) -> Result<()> {
        self.export_at(view, path, Utc::now()).await
    }

    pub async fn export_at(
        &self,
        view: &ResultView,
        path: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<()> {
        let format = ExportFormat::from_path(path)?;
        let record = ExportRecord {
            generated_at,
            prediction: view.label.to_string(),
            benign: &view.benign,
            malignant: &view.malignant,
            risk_level: &view.risk_level,
            advice: view.advice,
        };

        let data = match format {
            ExportFormat::Json => serde_json::to_vec_pretty(&record)?,
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.serialize(&record)?;
                writer.into_inner().map_err(|e| e.into_error())?
            }
        };

        self.storage.write_file(path, &data).await?;
        tracing::info!("💾 Result exported to {} ({:?})", path, format);
        Ok(())
    }
}
