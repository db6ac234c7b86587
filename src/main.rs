use anyhow::Context;
use clap::Parser;
use predict_form::config::LogFormat;
use predict_form::core::{ConfigProvider, PresentationSurface};
use predict_form::domain::model::Notification;
use predict_form::utils::error::ErrorCategory;
use predict_form::utils::{logger, validation::Validate};
use predict_form::{
    CliConfig, ControllerSettings, FormInput, HttpPredictionService, LocalStorage, PredictError,
    ResultExporter, ResultView, SubmissionController, TerminalSurface, TomlConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting predict-form");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // TOML 配置檔優先於命令列的服務設定
    let toml_config = cli
        .config
        .as_deref()
        .map(TomlConfig::from_file)
        .transpose()?;

    let validation = cli
        .validate()
        .and_then(|_| toml_config.as_ref().map_or(Ok(()), |c| c.validate()));
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let provider: &dyn ConfigProvider = match &toml_config {
        Some(config) => config,
        None => &cli,
    };
    tracing::info!("Prediction service: {}", provider.service_url());

    let surface = Arc::new(TerminalSurface::stdout());
    let controller = Arc::new(SubmissionController::new(
        HttpPredictionService::from_config(provider),
        Arc::clone(&surface),
        ControllerSettings::from_config(provider),
    ));
    controller.initialize();

    if cli.model_info {
        let info = controller.model_info().await?;
        println!("Model: {}", info.model_type);
        println!("Features: {}", info.features_count);
        for approach in [
            &info.training_approach,
            &info.model_selection,
            &info.data_preprocessing,
        ]
        .into_iter()
        .flatten()
        {
            println!("  - {}", approach);
        }
        return Ok(());
    }

    let mut form = if cli.sample {
        controller.fill_sample()
    } else if let Some(path) = &cli.input {
        let file = std::fs::File::open(path)
            .with_context(|| format!("cannot open measurements file {}", path))?;
        FormInput::from_csv_reader(file)?
    } else {
        FormInput::new()
    };
    form.apply_assignments(&cli.assignments)?;

    let reconciler = controller.spawn_reconciler();
    // Ctrl-C drops the in-flight submit here; the process exits right after.
    let outcome = tokio::select! {
        outcome = controller.submit(&form) => outcome,
        _ = tokio::signal::ctrl_c() => {
            controller.cancel();
            surface.notify(&Notification::warning("Prediction cancelled."));
            Err(PredictError::Cancelled)
        }
    };
    reconciler.abort();

    match outcome {
        Ok(result) => {
            let export_path = cli
                .export
                .as_deref()
                .or_else(|| toml_config.as_ref().and_then(|c| c.export_path()));
            if let Some(path) = export_path {
                let exporter = ResultExporter::new(LocalStorage::new("."));
                exporter.export(&ResultView::from(&result), path).await?;
                surface.notify(&Notification::info(format!("Result saved to {}", path)));
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Prediction failed: {} (Category: {:?})",
                e,
                e.category()
            );
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.category() {
                ErrorCategory::Validation => 2,
                ErrorCategory::Timeout | ErrorCategory::Network | ErrorCategory::Service => 3,
                ErrorCategory::Lifecycle => 130,
                ErrorCategory::Configuration | ErrorCategory::Io => 1,
            };
            std::process::exit(exit_code);
        }
    }
}
