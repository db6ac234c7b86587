use crate::core::loading::spawn_loading_animation;
use crate::domain::features::{FeatureSet, FormInput};
use crate::domain::model::{ModelInfo, Notification, PredictionResult, ResultView, ServiceReply};
use crate::domain::ports::{ConfigProvider, PredictionService, PresentationSurface};
use crate::utils::error::{PredictError, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MIN_LOADING: Duration = Duration::from_secs(2);
pub const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub request_timeout: Duration,
    pub min_loading: Duration,
    pub reconcile_interval: Duration,
}

impl ControllerSettings {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            request_timeout: config.request_timeout(),
            min_loading: config.min_loading(),
            reconcile_interval: config.reconcile_interval(),
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            min_loading: DEFAULT_MIN_LOADING,
            reconcile_interval: DEFAULT_RECONCILE_INTERVAL,
        }
    }
}

#[derive(Debug)]
struct ControllerState {
    phase: Phase,
    generation: u64,
    animation: Option<JoinHandle<()>>,
}

/// Owns the life cycle of one prediction request and the loading UI around it.
///
/// Every path back to [`Phase::Idle`] runs the same reset as
/// [`SubmissionController::teardown`], which may be called at any time and any
/// number of times. Phase changes and the surface calls that go with them
/// happen under one lock acquisition.
pub struct SubmissionController<P: PredictionService, S: PresentationSurface> {
    service: P,
    surface: Arc<S>,
    settings: ControllerSettings,
    state: Mutex<ControllerState>,
}

impl<P, S> SubmissionController<P, S>
where
    P: PredictionService,
    S: PresentationSurface + 'static,
{
    pub fn new(service: P, surface: Arc<S>, settings: ControllerSettings) -> Self {
        Self {
            service,
            surface,
            settings,
            state: Mutex::new(ControllerState {
                phase: Phase::Idle,
                generation: 0,
                animation: None,
            }),
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase() == Phase::Submitting
    }

    /// Clears whatever loading state a previous session left behind.
    pub fn initialize(&self) {
        tracing::debug!("Attaching controller to presentation surface");
        self.teardown();
    }

    /// Validates the form and, if it is complete, runs one prediction request.
    ///
    /// The loading indicator stays up for at least `min_loading`, even when the
    /// service answers or fails sooner.
    pub async fn submit(&self, form: &FormInput) -> Result<PredictionResult> {
        {
            let mut state = self.state();
            if state.phase != Phase::Idle {
                tracing::warn!("Submit ignored while {:?}", state.phase);
                return Err(PredictError::Busy);
            }
            state.phase = Phase::Validating;
        }

        let features = match FeatureSet::from_form(form) {
            Ok(features) => features,
            Err(err) => {
                if let PredictError::ValidationError { fields } = &err {
                    tracing::info!("Validation rejected {} field(s)", fields.len());
                    self.surface.mark_invalid(fields);
                }
                self.surface
                    .notify(&Notification::danger(err.user_friendly_message()));
                self.state().phase = Phase::Idle;
                return Err(err);
            }
        };
        self.surface.mark_invalid(&[]);

        let (generation, started) = self.enter_submitting();

        let outcome = match tokio::time::timeout(
            self.settings.request_timeout,
            self.service.predict(&features),
        )
        .await
        {
            Ok(reply) => reply,
            Err(_) => Err(PredictError::TimeoutError {
                after: self.settings.request_timeout,
            }),
        };

        let remaining = self.settings.min_loading.saturating_sub(started.elapsed());
        if !remaining.is_zero() {
            tracing::debug!("Holding outcome for {:?} of minimum loading time", remaining);
            tokio::time::sleep(remaining).await;
        }

        self.complete(generation, outcome)
    }

    fn enter_submitting(&self) -> (u64, Instant) {
        let mut state = self.state();
        state.generation += 1;
        state.phase = Phase::Submitting;

        let started = Instant::now();
        self.surface.set_trigger_enabled(false);
        self.surface.show_loading();
        let animation = spawn_loading_animation(Arc::clone(&self.surface));
        if let Some(previous) = state.animation.replace(animation) {
            previous.abort();
        }
        tracing::info!("⏳ Submission #{} sent to prediction service", state.generation);
        (state.generation, started)
    }

    fn complete(
        &self,
        generation: u64,
        outcome: Result<ServiceReply>,
    ) -> Result<PredictionResult> {
        let outcome = outcome.and_then(|reply| match reply {
            ServiceReply::Prediction(result) => Ok(result),
            ServiceReply::Failure { error } => Err(PredictError::ServiceError { message: error }),
        });

        {
            let mut state = self.state();
            if state.phase != Phase::Submitting || state.generation != generation {
                tracing::warn!(
                    "Discarding outcome of submission #{}: it was dismissed",
                    generation
                );
                return Err(PredictError::Cancelled);
            }
            state.phase = if outcome.is_ok() {
                Phase::Succeeded
            } else {
                Phase::Failed
            };
            self.reset(&mut state);
        }

        match &outcome {
            Ok(result) => {
                tracing::info!(
                    "✅ Submission #{} predicted {} ({})",
                    generation,
                    result.prediction,
                    result.risk_level
                );
                self.surface.render_result(&ResultView::from(result));
            }
            Err(err) => {
                tracing::error!(
                    "❌ Submission #{} failed: {} (Category: {:?})",
                    generation,
                    err,
                    err.category()
                );
                self.surface
                    .notify(&Notification::danger(err.user_friendly_message()));
            }
        }

        outcome
    }

    /// Forces the controller back to idle: stops the animation, removes the
    /// loading indicator and overlay, re-enables the trigger.
    pub fn teardown(&self) {
        let mut state = self.state();
        self.reset(&mut state);
    }

    // Caller holds the state lock for the phase change and the surface calls.
    fn reset(&self, state: &mut ControllerState) {
        if state.phase != Phase::Idle {
            tracing::debug!("Tearing down from {:?}", state.phase);
        }
        state.phase = Phase::Idle;
        if let Some(animation) = state.animation.take() {
            animation.abort();
        }
        self.surface.hide_loading();
        self.surface.set_trigger_enabled(true);
    }

    /// Explicit cancel signal from the user (Escape, Ctrl-C).
    ///
    /// The request itself keeps running until it answers or times out; its
    /// outcome is discarded.
    pub fn cancel(&self) {
        tracing::info!("Cancel signal received, dismissing loading indicator");
        self.teardown();
    }

    /// Removes an overlay left behind without an active submission.
    /// Returns true when something had to be cleaned up.
    pub fn reconcile(&self) -> bool {
        let mut state = self.state();
        if state.phase != Phase::Idle || !self.surface.overlay_active() {
            return false;
        }
        tracing::warn!("Found orphaned loading overlay, cleaning up");
        self.reset(&mut state);
        true
    }

    pub fn fill_sample(&self) -> FormInput {
        self.surface
            .notify(&Notification::success("Sample data filled successfully!"));
        FormInput::sample()
    }

    pub fn clear(&self) {
        self.surface.clear_result();
        self.surface.mark_invalid(&[]);
        self.surface
            .notify(&Notification::success("Form cleared successfully!"));
    }

    pub async fn model_info(&self) -> Result<ModelInfo> {
        tokio::time::timeout(self.settings.request_timeout, self.service.model_info())
            .await
            .map_err(|_| PredictError::TimeoutError {
                after: self.settings.request_timeout,
            })?
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P, S> SubmissionController<P, S>
where
    P: PredictionService + 'static,
    S: PresentationSurface + 'static,
{
    /// Runs [`SubmissionController::reconcile`] every `reconcile_interval`
    /// until the returned handle is aborted.
    pub fn spawn_reconciler(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        let every = self.settings.reconcile_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                controller.reconcile();
            }
        })
    }
}

impl<P: PredictionService, S: PresentationSurface> Drop for SubmissionController<P, S> {
    fn drop(&mut self) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(animation) = state.animation.take() {
            animation.abort();
        }
    }
}
