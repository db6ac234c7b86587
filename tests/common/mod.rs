#![allow(dead_code)]

use async_trait::async_trait;
use predict_form::core::{FeatureSet, PredictionService, PresentationSurface, ServiceReply};
use predict_form::domain::model::{
    Confidence, InvalidField, Label, ModelInfo, Notification, NotificationKind, PredictionResult,
    ResultView,
};
use predict_form::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ShowLoading,
    HideLoading,
    Trigger(bool),
    MarkInvalid(Vec<String>),
    Render(Label),
    ClearResult,
    Notify(NotificationKind, String),
}

struct Recorded {
    events: Vec<(Instant, Event)>,
    progress: Vec<(u8, String)>,
    rendered: Option<ResultView>,
    overlay: bool,
    trigger_enabled: bool,
}

/// Surface that remembers every call, timestamped on the tokio clock.
pub struct RecordingSurface {
    inner: Mutex<Recorded>,
    show_delay: Duration,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Self::with_show_delay(Duration::ZERO)
    }

    /// Blocks the calling thread inside `show_loading`, like a slow UI.
    pub fn with_show_delay(show_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Recorded {
                events: Vec::new(),
                progress: Vec::new(),
                rendered: None,
                overlay: false,
                trigger_enabled: true,
            }),
            show_delay,
        })
    }

    fn record(&self, event: Event) {
        self.inner
            .lock()
            .unwrap()
            .events
            .push((Instant::now(), event));
    }

    pub fn events(&self) -> Vec<Event> {
        self.inner
            .lock()
            .unwrap()
            .events
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn render_at(&self) -> Option<Instant> {
        self.inner
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|(_, e)| matches!(e, Event::Render(_)))
            .map(|(at, _)| *at)
    }

    pub fn rendered(&self) -> Option<ResultView> {
        self.inner.lock().unwrap().rendered.clone()
    }

    pub fn notifications(&self) -> Vec<(NotificationKind, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Notify(kind, message) => Some((kind, message)),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<(u8, String)> {
        self.inner.lock().unwrap().progress.clone()
    }

    pub fn overlay_active_now(&self) -> bool {
        self.inner.lock().unwrap().overlay
    }

    pub fn trigger_enabled(&self) -> bool {
        self.inner.lock().unwrap().trigger_enabled
    }

    /// Simulates an overlay left behind by a missed dismissal.
    pub fn force_overlay(&self) {
        self.inner.lock().unwrap().overlay = true;
    }
}

impl PresentationSurface for RecordingSurface {
    fn show_loading(&self) {
        if !self.show_delay.is_zero() {
            std::thread::sleep(self.show_delay);
        }
        self.inner.lock().unwrap().overlay = true;
        self.record(Event::ShowLoading);
    }

    fn update_loading(&self, progress: u8, message: &str) {
        let mut inner = self.inner.lock().unwrap();
        if inner.overlay {
            inner.progress.push((progress, message.to_string()));
        }
    }

    fn hide_loading(&self) {
        self.inner.lock().unwrap().overlay = false;
        self.record(Event::HideLoading);
    }

    fn overlay_active(&self) -> bool {
        self.inner.lock().unwrap().overlay
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        self.inner.lock().unwrap().trigger_enabled = enabled;
        self.record(Event::Trigger(enabled));
    }

    fn mark_invalid(&self, fields: &[InvalidField]) {
        self.record(Event::MarkInvalid(
            fields.iter().map(|f| f.name.clone()).collect(),
        ));
    }

    fn render_result(&self, view: &ResultView) {
        self.inner.lock().unwrap().rendered = Some(view.clone());
        self.record(Event::Render(view.label));
    }

    fn clear_result(&self) {
        self.inner.lock().unwrap().rendered = None;
        self.record(Event::ClearResult);
    }

    fn notify(&self, notification: &Notification) {
        self.record(Event::Notify(
            notification.kind,
            notification.message.clone(),
        ));
    }
}

type Respond = dyn Fn(usize) -> Result<ServiceReply> + Send + Sync;

/// Prediction service answering after a fixed delay with a scripted reply.
pub struct ScriptedService {
    delay: Duration,
    respond: Box<Respond>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedService {
    pub fn new<F>(delay: Duration, respond: F) -> Self
    where
        F: Fn(usize) -> Result<ServiceReply> + Send + Sync + 'static,
    {
        Self {
            delay,
            respond: Box::new(respond),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn replying(delay: Duration, reply: ServiceReply) -> Self {
        Self::new(delay, move |_| Ok(reply.clone()))
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl PredictionService for ScriptedService {
    async fn predict(&self, features: &FeatureSet) -> Result<ServiceReply> {
        assert_eq!(features.len(), 30);
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        (self.respond)(call)
    }

    async fn model_info(&self) -> Result<ModelInfo> {
        tokio::time::sleep(self.delay).await;
        Ok(ModelInfo {
            model_type: "LogisticRegression".to_string(),
            features_count: 30,
            feature_names: predict_form::FEATURE_NAMES
                .iter()
                .map(|n| n.to_string())
                .collect(),
            training_approach: None,
            model_selection: None,
            data_preprocessing: None,
        })
    }
}

pub fn benign_reply() -> ServiceReply {
    ServiceReply::Prediction(PredictionResult {
        prediction: Label::Benign,
        confidence: Confidence {
            benign: "92%".to_string(),
            malignant: "8%".to_string(),
        },
        risk_level: "Low".to_string(),
        confidence_score: None,
    })
}

pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
