use crate::domain::model::{InvalidField, InvalidReason};
use crate::utils::error::{PredictError, Result};
use std::collections::HashMap;
use std::io::Read;

/// Measurement fields in the order the classifier was trained on.
pub const FEATURE_NAMES: [&str; 30] = [
    "mean radius",
    "mean texture",
    "mean perimeter",
    "mean area",
    "mean smoothness",
    "mean compactness",
    "mean concavity",
    "mean concave points",
    "mean symmetry",
    "mean fractal dimension",
    "radius error",
    "texture error",
    "perimeter error",
    "area error",
    "smoothness error",
    "compactness error",
    "concavity error",
    "concave points error",
    "symmetry error",
    "fractal dimension error",
    "worst radius",
    "worst texture",
    "worst perimeter",
    "worst area",
    "worst smoothness",
    "worst compactness",
    "worst concavity",
    "worst concave points",
    "worst symmetry",
    "worst fractal dimension",
];

const SAMPLE_VALUES: [f64; 30] = [
    14.6, 22.7, 96.4, 657.0, 0.085, 0.133, 0.103, 0.04, 0.1654, 0.05147, 0.3354, 1.108, 2.244,
    19.74, 0.004342, 0.04649, 0.06578, 0.01506, 0.01738, 0.0045406, 13.48, 37.27, 105.9, 734.5,
    0.1206, 0.317, 0.3682, 0.1305, 0.2348, 0.08004,
];

pub fn is_feature(name: &str) -> bool {
    FEATURE_NAMES.contains(&name)
}

/// Raw text of the form fields, exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    values: HashMap<String, String>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample() -> Self {
        let mut form = Self::new();
        for (name, value) in FEATURE_NAMES.iter().zip(SAMPLE_VALUES.iter()) {
            form.set(*name, value.to_string());
        }
        form
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Applies `name=value` assignments on top of the current values.
    pub fn apply_assignments<I, S>(&mut self, assignments: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (name, value) =
                assignment
                    .split_once('=')
                    .ok_or_else(|| PredictError::InvalidConfigValueError {
                        field: "set".to_string(),
                        value: assignment.to_string(),
                        reason: "expected name=value".to_string(),
                    })?;
            let name = name.trim();
            if !is_feature(name) {
                return Err(PredictError::InvalidConfigValueError {
                    field: "set".to_string(),
                    value: assignment.to_string(),
                    reason: format!("unknown measurement '{}'", name),
                });
            }
            self.set(name, value);
        }
        Ok(())
    }

    /// Reads form values from CSV.
    ///
    /// Two layouts are accepted: a header row of feature names followed by one
    /// row of values, or one `name,value` pair per row (an optional
    /// `name,value` header is skipped).
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for row in csv_reader.records() {
            rows.push(row?);
        }

        let Some(first) = rows.first() else {
            return Err(PredictError::ConfigError {
                message: "feature CSV is empty".to_string(),
            });
        };

        let pair_layout =
            rows.iter().all(|r| r.len() == 2) && first.get(1).is_some_and(|c| !is_feature(c));

        let mut form = Self::new();
        if pair_layout {
            for row in &rows {
                let (name, value) = (&row[0], &row[1]);
                if name.eq_ignore_ascii_case("name") || name.eq_ignore_ascii_case("feature") {
                    continue;
                }
                form.set(name, value);
            }
        } else {
            let values = rows.get(1).ok_or_else(|| PredictError::ConfigError {
                message: "feature CSV has a header row but no values".to_string(),
            })?;
            for (name, value) in first.iter().zip(values.iter()) {
                form.set(name, value);
            }
        }

        tracing::debug!("Loaded {} form values from CSV", form.len());
        Ok(form)
    }
}

/// Validated measurements, snapshotted at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    values: Vec<(&'static str, f64)>,
}

impl FeatureSet {
    /// Parses every required field, collecting all invalid ones.
    pub fn from_form(form: &FormInput) -> Result<Self> {
        let mut values = Vec::with_capacity(FEATURE_NAMES.len());
        let mut invalid = Vec::new();

        for name in FEATURE_NAMES {
            match parse_measurement(form.get(name)) {
                Ok(value) => values.push((name, value)),
                Err(reason) => invalid.push(InvalidField::new(name, reason)),
            }
        }

        if !invalid.is_empty() {
            return Err(PredictError::ValidationError { fields: invalid });
        }

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Field/value pairs ready for form encoding.
    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        self.values
            .iter()
            .map(|(name, value)| (*name, value.to_string()))
            .collect()
    }
}

fn parse_measurement(raw: Option<&str>) -> std::result::Result<f64, InvalidReason> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(InvalidReason::Missing);
    }
    let value: f64 = text.parse().map_err(|_| InvalidReason::NotANumber)?;
    if !value.is_finite() {
        return Err(InvalidReason::NotFinite);
    }
    if value < 0.0 {
        return Err(InvalidReason::Negative);
    }
    Ok(value)
}
