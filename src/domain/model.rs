use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Benign,
    Malignant,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Benign => write!(f, "Benign"),
            Label::Malignant => write!(f, "Malignant"),
        }
    }
}

/// Confidence values as formatted by the service, e.g. `"92.0%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub benign: String,
    pub malignant: String,
}

impl Confidence {
    pub fn benign_percent(&self) -> Option<f64> {
        parse_percent(&self.benign)
    }

    pub fn malignant_percent(&self) -> Option<f64> {
        parse_percent(&self.malignant)
    }
}

/// Reads the leading number of a formatted value, so `"92.0%"`,
/// `"92.0 % (high)"` and `"92.0 percent"` all give 92.0.
fn parse_percent(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let numeric = value
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')))
        .unwrap_or(value.len());

    (1..=numeric)
        .rev()
        .find_map(|end| value[..end].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: Label,
    pub confidence: Confidence,
    pub risk_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

/// Body returned by the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ServiceReply {
    Failure { error: String },
    Prediction(PredictionResult),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub features_count: usize,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub training_approach: Option<String>,
    #[serde(default)]
    pub model_selection: Option<String>,
    #[serde(default)]
    pub data_preprocessing: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    Missing,
    NotANumber,
    NotFinite,
    Negative,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InvalidReason::Missing => "missing",
            InvalidReason::NotANumber => "not a number",
            InvalidReason::NotFinite => "not finite",
            InvalidReason::Negative => "negative",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    pub name: String,
    pub reason: InvalidReason,
}

impl InvalidField {
    pub fn new(name: impl Into<String>, reason: InvalidReason) -> Self {
        Self {
            name: name.into(),
            reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Danger,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Danger,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Warning,
}

const BENIGN_ADVICE: &str = "The model predicts this sample is likely benign (non-cancerous). \
However, always consult with healthcare professionals for proper medical diagnosis.";
const MALIGNANT_ADVICE: &str = "The model predicts this sample may be malignant (cancerous). \
This requires immediate attention from qualified healthcare professionals for proper diagnosis and treatment.";

/// What the results region shows for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub label: Label,
    pub tone: Tone,
    pub headline: String,
    pub benign: String,
    pub malignant: String,
    pub benign_percent: f64,
    pub malignant_percent: f64,
    pub risk_level: String,
    pub advice: &'static str,
}

impl From<&PredictionResult> for ResultView {
    fn from(result: &PredictionResult) -> Self {
        let (tone, advice) = match result.prediction {
            Label::Benign => (Tone::Success, BENIGN_ADVICE),
            Label::Malignant => (Tone::Warning, MALIGNANT_ADVICE),
        };
        Self {
            label: result.prediction,
            tone,
            headline: format!("Prediction: {}", result.prediction),
            benign: result.confidence.benign.clone(),
            malignant: result.confidence.malignant.clone(),
            benign_percent: result.confidence.benign_percent().unwrap_or(0.0),
            malignant_percent: result.confidence.malignant_percent().unwrap_or(0.0),
            risk_level: result.risk_level.clone(),
            advice,
        }
    }
}
