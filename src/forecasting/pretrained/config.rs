//! Configuration of the pretrained-model adapter.
//!
//! The adapter configuration is plain serde data. Model configuration and
//! training arguments are typed structs that keep unknown keys in a
//! flattened map, so user overrides can be merged key-by-key over the
//! pretrained values.

use crate::error::{EstimatorError, Result};
use crate::utils::Metric;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// How much of the pretrained model is trained in `fit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitStrategy {
    /// Train only parameters reinitialised because of shape mismatches;
    /// skip training when there are none.
    #[default]
    Minimal,
    /// Train every parameter.
    Full,
}

impl FitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitStrategy::Minimal => "minimal",
            FitStrategy::Full => "full",
        }
    }
}

impl FromStr for FitStrategy {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "minimal" => Ok(FitStrategy::Minimal),
            "full" => Ok(FitStrategy::Full),
            other => Err(EstimatorError::UnknownFitStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for FitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of [`super::PretrainedForecaster`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PretrainedForecasterConfig {
    /// Location of the pretrained model, resolved by the model hub.
    pub model_path: String,

    /// `"minimal"` or `"full"`; parsed in fit.
    #[serde(default = "default_fit_strategy")]
    pub fit_strategy: String,

    /// Fraction of the series held out for evaluation; `None` trains on all.
    #[serde(default = "default_validation_split")]
    pub validation_split: Option<f64>,

    /// Model configuration overrides.
    #[serde(default)]
    pub config: Map<String, Value>,

    /// Training argument overrides.
    #[serde(default)]
    pub training_args: Map<String, Value>,

    /// Metrics computed on the evaluation windows after training.
    #[serde(default)]
    pub compute_metrics: Vec<Metric>,

    /// Seed generation with a fixed seed.
    #[serde(default)]
    pub deterministic: bool,
}

fn default_fit_strategy() -> String {
    FitStrategy::Minimal.as_str().to_string()
}

fn default_validation_split() -> Option<f64> {
    Some(0.2)
}

impl PretrainedForecasterConfig {
    pub fn new(model_path: impl Into<String>) -> Self {
        Self {
            model_path: model_path.into(),
            fit_strategy: default_fit_strategy(),
            validation_split: default_validation_split(),
            config: Map::new(),
            training_args: Map::new(),
            compute_metrics: Vec::new(),
            deterministic: false,
        }
    }

    /// Parse from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_fit_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.fit_strategy = strategy.into();
        self
    }

    pub fn with_validation_split(mut self, split: Option<f64>) -> Self {
        self.validation_split = split;
        self
    }

    /// Override one model configuration key.
    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    /// Override one training argument.
    pub fn with_training_arg(mut self, key: impl Into<String>, value: Value) -> Self {
        self.training_args.insert(key.into(), value);
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.compute_metrics = metrics;
        self
    }

    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Validate values that are not checked by deserialisation.
    pub fn validate(&self) -> Result<FitStrategy> {
        let strategy: FitStrategy = self.fit_strategy.parse()?;
        if let Some(split) = self.validation_split {
            if !(0.0..1.0).contains(&split) {
                return Err(EstimatorError::InvalidParameter(format!(
                    "validation_split must be in [0, 1), got {split}"
                )));
            }
        }
        Ok(strategy)
    }
}

/// Configuration of a pretrained forecasting model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model class names; the first one is instantiated.
    #[serde(default)]
    pub architectures: Vec<String>,

    pub context_length: usize,

    pub prediction_length: usize,

    /// Lagged positions used as extra inputs.
    #[serde(default)]
    pub lags_sequence: Vec<usize>,

    #[serde(default)]
    pub num_dynamic_real_features: usize,

    #[serde(default)]
    pub num_static_real_features: usize,

    #[serde(default)]
    pub num_static_categorical_features: usize,

    #[serde(default)]
    pub num_time_features: usize,

    /// Derived input width; dropped before reloading so the model
    /// recomputes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_size: Option<usize>,

    /// Any other key.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelConfig {
    pub fn new(context_length: usize, prediction_length: usize, lags_sequence: Vec<usize>) -> Self {
        Self {
            architectures: Vec::new(),
            context_length,
            prediction_length,
            lags_sequence,
            num_dynamic_real_features: 0,
            num_static_real_features: 0,
            num_static_categorical_features: 0,
            num_time_features: 0,
            feature_size: None,
            extra: Map::new(),
        }
    }

    /// Parse from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn max_lag(&self) -> usize {
        self.lags_sequence.iter().copied().max().unwrap_or(0)
    }

    /// History length fed to the model: `context_length + max(lags_sequence)`.
    pub fn window_length(&self) -> usize {
        self.context_length + self.max_lag()
    }

    /// Copy with `overrides` applied key-by-key.
    pub fn merged(&self, overrides: &Map<String, Value>) -> Result<ModelConfig> {
        let mut map = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => {
                return Err(EstimatorError::Config(
                    "model configuration must serialise to an object".to_string(),
                ))
            }
        };
        for (key, value) in overrides {
            map.insert(key.clone(), value.clone());
        }
        let merged: ModelConfig = serde_json::from_value(Value::Object(map))?;
        if merged.prediction_length == 0 {
            return Err(EstimatorError::InvalidParameter(
                "prediction_length must be positive".to_string(),
            ));
        }
        Ok(merged)
    }

    /// Configure the model inputs for `num_exogenous` dynamic features and
    /// no static or time features.
    pub fn for_exogenous(mut self, num_exogenous: usize) -> Self {
        self.num_dynamic_real_features = num_exogenous;
        self.num_static_real_features = 0;
        self.num_static_categorical_features = 0;
        self.num_time_features = 0;
        self.feature_size = None;
        self.extra.remove("feature_size");
        self
    }
}

/// Arguments passed to a [`super::Trainer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingArguments {
    #[serde(default)]
    pub output_dir: Option<String>,

    #[serde(default = "default_epochs")]
    pub num_train_epochs: f64,

    #[serde(default = "default_batch_size")]
    pub per_device_train_batch_size: usize,

    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Trainer-specific keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_epochs() -> f64 {
    3.0
}

fn default_batch_size() -> usize {
    8
}

fn default_learning_rate() -> f64 {
    5e-5
}

fn default_seed() -> u64 {
    42
}

impl Default for TrainingArguments {
    fn default() -> Self {
        Self {
            output_dir: None,
            num_train_epochs: default_epochs(),
            per_device_train_batch_size: default_batch_size(),
            learning_rate: default_learning_rate(),
            seed: default_seed(),
            extra: Map::new(),
        }
    }
}

impl TrainingArguments {
    /// Build from user overrides over the defaults.
    pub fn from_map(overrides: &Map<String, Value>) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(overrides.clone()))?)
    }
}
